use iced::widget::container::bordered_box;
use iced::widget::{button, horizontal_space, text, Column, Container, Row, Scrollable, Text};
use iced::{Alignment, Length};
use iced_font_awesome::fa_icon_solid;

use crate::app::update::format_date;
use crate::app::{App, Message};
use crate::screens::nav_menu::icon_button_content;

pub fn certificates_screen(app: &App) -> Container<Message> {
    let mut certificates_col = Column::new()
        .spacing(15)
        .padding(20)
        .push(Text::new("Мои сертификаты").size(30));

    if app.certificates.is_empty() {
        certificates_col = certificates_col.push(
            Text::new("Сертификатов пока нет. Они выдаются за пройденные тесты модулей.").size(16),
        );
    }

    for certificate in &app.certificates {
        let header = Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(fa_icon_solid("stamp").style(move |_| text::base(&app.theme)))
            .push(Text::new(certificate.course_title.clone()).size(20))
            .push(horizontal_space())
            .push(
                // Сертификат открывается в браузере, PDF собирает сервер
                button(icon_button_content(
                    fa_icon_solid("up-right-from-square").style(move |_| text::base(&app.theme)),
                    "Открыть",
                ))
                .on_press(Message::OpenCertificate(certificate.url.clone())),
            );

        let info = Column::new()
            .spacing(5)
            .push(Text::new(format!("Номер: {}", certificate.serial)).size(16))
            .push(Text::new(format!("Выдан: {}", format_date(&certificate.issued_at))).size(16));

        certificates_col = certificates_col.push(
            Container::new(Column::new().push(header).push(info).spacing(10))
                .style(move |_| bordered_box(&app.theme))
                .padding(15)
                .width(Length::Fill),
        );
    }

    let scrollable = Scrollable::new(certificates_col)
        .width(Length::Fill)
        .height(Length::Fill);

    Container::new(scrollable)
        .width(Length::Fill)
        .height(Length::Fill)
}
