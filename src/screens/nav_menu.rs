use iced::widget::{button, column, text, vertical_space, Container, Row};
use iced::{Alignment, Element, Length, Renderer, Theme};
use iced_font_awesome::fa_icon_solid;

use crate::app::{App, Message};

pub fn icon_button_content<'a>(
    icon_element: impl Into<Element<'a, Message, Theme, Renderer>>,
    label: &'a str,
) -> Row<'a, Message> {
    Row::new()
        .align_y(Alignment::Center)
        .spacing(5)
        .push(icon_element)
        .push(text(label))
}

pub fn nav_menu(app: &App) -> Container<Message> {
    let content = column![
        button(icon_button_content(
            fa_icon_solid("address-card").style(move |_| text::base(&app.theme)),
            "Профиль"
        ))
        .on_press(Message::GoToProfile)
        .width(Length::Fill),
        button(icon_button_content(
            fa_icon_solid("graduation-cap").style(move |_| text::base(&app.theme)),
            "Модули"
        ))
        .on_press(Message::GoToModules)
        .width(Length::Fill),
        button(icon_button_content(
            fa_icon_solid("stamp").style(move |_| text::base(&app.theme)),
            "Сертификаты"
        ))
        .on_press(Message::GoToCertificates)
        .width(Length::Fill),
        button(icon_button_content(
            fa_icon_solid("wallet").style(move |_| text::base(&app.theme)),
            "Финансы"
        ))
        .on_press(Message::GoToFinance)
        .width(Length::Fill),
        button(icon_button_content(
            fa_icon_solid("file-invoice-dollar").style(move |_| text::base(&app.theme)),
            "Оплата"
        ))
        .on_press(Message::GoToPayment)
        .width(Length::Fill),
        vertical_space(),
        button(icon_button_content(
            fa_icon_solid("gear").style(move |_| text::base(&app.theme)),
            "Настройки"
        ))
        .on_press(Message::GoToSettings)
        .width(Length::Fill),
        // Выход всегда через подтверждение
        button(icon_button_content(
            fa_icon_solid("arrow-right-from-bracket").style(move |_| text::base(&app.theme)),
            "Выход"
        ))
        .on_press(Message::LogoutRequested)
        .width(Length::Fill),
    ]
    .spacing(10);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10)
}
