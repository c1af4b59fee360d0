use iced::widget::container::{background, bordered_box};
use iced::widget::{button, horizontal_space, mouse_area, text, Button, Column, Container, Row,
    Text, TextInput};
use iced::{Alignment, Color, Element, Length};
use iced_font_awesome::fa_icon_solid;

use crate::app::dialogs::{AlertKind, ConfirmKind, DialogMessage};
use crate::app::{App, Message};

// Презентеры четырёх прерывающих окон. Состояние целиком лежит в
// app.dialogs, здесь только отрисовка и отправка DialogMessage.

/// Затемнённая подложка поверх всего экрана с окном по центру.
/// Клик по подложке шлёт on_backdrop, клик по самому окну не считается.
fn modal_shell<'a>(
    app: &'a App,
    content: Column<'a, Message>,
    width: f32,
    on_backdrop: Message,
) -> Container<'a, Message> {
    let dialog_box = Container::new(content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(width));

    Container::new(
        mouse_area(
            Container::new(
                // Внутренняя mouse_area гасит клик, чтобы он не
                // считался кликом по подложке
                mouse_area(dialog_box).on_press(Message::NoOp),
            )
            .center(Length::Fill),
        )
        .on_press(on_backdrop),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }))
}

fn alert_icon<'a>(app: &'a App, kind: AlertKind) -> Element<'a, Message> {
    let name = match kind {
        AlertKind::Success => "circle-check",
        AlertKind::Error => "circle-xmark",
        AlertKind::Warning => "triangle-exclamation",
        AlertKind::Info => "circle-info",
    };
    fa_icon_solid(name)
        .size(28.0)
        .style(move |_| text::base(&app.theme))
        .into()
}

fn confirm_icon<'a>(app: &'a App, kind: ConfirmKind) -> Element<'a, Message> {
    let name = match kind {
        ConfirmKind::Danger => "trash-can",
        ConfirmKind::Warning => "triangle-exclamation",
        ConfirmKind::Info => "circle-question",
    };
    fa_icon_solid(name)
        .size(28.0)
        .style(move |_| text::base(&app.theme))
        .into()
}

pub fn alert_dialog(app: &App) -> Container<Message> {
    let slot = &app.dialogs.alert;

    let header = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(alert_icon(app, slot.kind))
        .push(Text::new(slot.title.clone()).size(22));

    let ok_button = Button::new(Text::new("ОК"))
        .on_press(Message::Dialog(DialogMessage::AlertAcknowledged))
        .padding([8.0, 24.0])
        .style(match slot.kind {
            AlertKind::Error => button::danger,
            AlertKind::Success => button::success,
            _ => button::primary,
        });

    let content = Column::new()
        .spacing(15)
        .push(header)
        .push(Text::new(slot.message.clone()).size(16))
        .push(Row::new().push(horizontal_space()).push(ok_button));

    modal_shell(
        app,
        content,
        420.0,
        Message::Dialog(DialogMessage::AlertBackdropPressed),
    )
}

pub fn confirm_dialog(app: &App) -> Container<Message> {
    let slot = &app.dialogs.confirm;

    let header = Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(confirm_icon(app, slot.kind))
        .push(Text::new(slot.title.clone()).size(22));

    let mut cancel_button = Button::new(Text::new(slot.cancel_label.clone()))
        .padding([8.0, 24.0])
        .style(button::secondary);
    let confirm_style = match slot.kind {
        ConfirmKind::Danger => button::danger,
        _ => button::primary,
    };
    let confirm_caption = if slot.is_busy {
        "Подождите...".to_string()
    } else {
        slot.confirm_label.clone()
    };
    let mut confirm_button = Button::new(Text::new(confirm_caption))
        .padding([8.0, 24.0])
        .style(confirm_style);

    // Пока операция в полёте, обе кнопки выключены
    if !slot.is_busy {
        cancel_button = cancel_button.on_press(Message::Dialog(DialogMessage::ConfirmCancelled));
        confirm_button = confirm_button.on_press(Message::Dialog(DialogMessage::ConfirmAccepted));
    }

    let content = Column::new()
        .spacing(15)
        .push(header)
        .push(Text::new(slot.message.clone()).size(16))
        .push(
            Row::new()
                .spacing(10)
                .push(horizontal_space())
                .push(cancel_button)
                .push(confirm_button),
        );

    // Подложка тоже «заморожена»: сообщение уйдёт, но update его
    // проигнорирует, пока is_busy
    modal_shell(
        app,
        content,
        440.0,
        Message::Dialog(DialogMessage::ConfirmCancelled),
    )
}

pub fn input_dialog(app: &App) -> Container<Message> {
    let slot = &app.dialogs.input;

    let mut field = TextInput::new(&slot.placeholder, &slot.value)
        .padding(10)
        .size(16);
    if !slot.is_busy {
        field = field
            .on_input(|v| Message::Dialog(DialogMessage::InputChanged(v)))
            // Enter подчиняется тому же правилу, что и кнопка
            .on_submit(Message::Dialog(DialogMessage::InputSubmitted));
    }

    let mut cancel_button = Button::new(Text::new("Отмена"))
        .padding([8.0, 24.0])
        .style(button::secondary);
    let submit_caption = if slot.is_busy { "Подождите..." } else { "Сохранить" };
    let mut submit_button = Button::new(Text::new(submit_caption))
        .padding([8.0, 24.0])
        .style(button::primary);

    if !slot.is_busy {
        cancel_button = cancel_button.on_press(Message::Dialog(DialogMessage::InputCancelled));
    }
    // Пустое (после trim) значение подтвердить нельзя
    if slot.can_submit() {
        submit_button = submit_button.on_press(Message::Dialog(DialogMessage::InputSubmitted));
    }

    let content = Column::new()
        .spacing(15)
        .push(Text::new(slot.title.clone()).size(22))
        .push(Text::new(slot.message.clone()).size(16))
        .push(field)
        .push(
            Row::new()
                .spacing(10)
                .push(horizontal_space())
                .push(cancel_button)
                .push(submit_button),
        );

    modal_shell(
        app,
        content,
        440.0,
        Message::Dialog(DialogMessage::InputCancelled),
    )
}

pub fn validation_dialog(app: &App) -> Container<Message> {
    let slot = &app.dialogs.validation;

    let mut content = Column::new()
        .spacing(15)
        .push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(
                    fa_icon_solid("list-check")
                        .size(28.0)
                        .style(move |_| text::base(&app.theme)),
                )
                .push(Text::new(slot.title.clone()).size(22)),
        )
        .push(Text::new(slot.message.clone()).size(16));

    if !slot.fields.is_empty() {
        // Пофилдовая разбивка 422-й ошибки
        let mut fields_col = Column::new().spacing(8);
        for (field, messages) in &slot.fields {
            let mut field_col = Column::new()
                .spacing(3)
                .push(Text::new(field.clone()).size(15));
            for message in messages {
                field_col = field_col.push(Text::new(format!("— {}", message)).size(14));
            }
            fields_col = fields_col.push(field_col);
        }
        content = content.push(
            Container::new(fields_col)
                .style(move |_| bordered_box(&app.theme))
                .padding(10)
                .width(Length::Fill),
        );
    }

    let dismiss_button = Button::new(Text::new("Понятно"))
        .on_press(Message::Dialog(DialogMessage::ValidationDismissed))
        .padding([8.0, 24.0])
        .style(button::primary);
    content = content.push(Row::new().push(horizontal_space()).push(dismiss_button));

    modal_shell(
        app,
        content,
        460.0,
        Message::Dialog(DialogMessage::ValidationDismissed),
    )
}
