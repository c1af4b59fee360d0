use iced::widget::container::bordered_box;
use iced::widget::{button, column, row, text, Button, Column, Container, Row, Text, TextInput};
use iced::{Alignment, Center, Length};
use iced_font_awesome::fa_icon_solid;

use crate::api::PaymentStatus;
use crate::app::update::format_date;
use crate::app::{App, Message};
use crate::screens::nav_menu::icon_button_content;

pub fn payment_screen(app: &App) -> Container<Message> {
    let status = app
        .payment_info
        .as_ref()
        .map(|info| info.status)
        .unwrap_or(PaymentStatus::None);

    let status_icon = match status {
        PaymentStatus::Approved => "circle-check",
        PaymentStatus::Pending => "hourglass-half",
        PaymentStatus::Rejected => "circle-xmark",
        PaymentStatus::None => "file-invoice-dollar",
    };

    let mut status_card = Column::new()
        .spacing(10)
        .push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(fa_icon_solid(status_icon).size(28.0).style(move |_| text::base(&app.theme)))
                .push(Text::new(format!("Статус оплаты: {}", status)).size(22)),
        );

    if let Some(info) = &app.payment_info {
        if let Some(date) = &info.submitted_at {
            status_card = status_card
                .push(Text::new(format!("Квитанция отправлена: {}", format_date(date))).size(15));
        }
        if let Some(comment) = &info.comment {
            if !comment.is_empty() {
                status_card = status_card
                    .push(Text::new(format!("Комментарий проверяющего: {}", comment)).size(15));
            }
        }
    }

    let mut content = column![
        text("Оплата доступа").size(30),
        Container::new(status_card)
            .style(move |_| bordered_box(&app.theme))
            .padding(15)
            .width(Length::Fill),
    ]
    .spacing(20);

    match status {
        PaymentStatus::Approved => {
            content = content.push(
                button("Перейти к финансовым инструментам")
                    .on_press(Message::GoToFinance)
                    .padding(10),
            );
        }
        PaymentStatus::Pending => {
            content = content.push(
                text("Оплата проверяется вручную, обычно это занимает до одного рабочего дня.")
                    .size(16),
            );
        }
        // Нет оплаты или отклонена: показываем форму загрузки квитанции
        _ => {
            let receipt_line = match &app.receipt_file {
                Some((filename, _)) => format!("Файл: {}", filename),
                None => "Файл не выбран".to_string(),
            };

            let submit_label = if app.is_submitting_payment {
                "Отправка..."
            } else {
                "Отправить на проверку"
            };
            let mut submit_button = Button::new(Text::new(submit_label)).padding(10);
            if !app.is_submitting_payment && app.receipt_file.is_some() {
                submit_button = submit_button.on_press(Message::SubmitPaymentProof);
            }

            let form = column![
                text("Загрузите квитанцию об оплате — доступ откроет администратор.").size(16),
                row![
                    Button::new(icon_button_content(
                        fa_icon_solid("paperclip").style(move |_| text::base(&app.theme)),
                        "Выбрать файл",
                    ))
                    .on_press(Message::ChooseReceipt),
                    Text::new(receipt_line).size(15),
                ]
                .spacing(10)
                .align_y(Center),
                TextInput::new("Комментарий к платежу (необязательно)", &app.payment_comment)
                    .on_input(Message::PaymentCommentChanged)
                    .padding(10),
                submit_button,
            ]
            .spacing(15);

            content = content.push(
                Container::new(form)
                    .style(move |_| bordered_box(&app.theme))
                    .padding(15)
                    .width(Length::Fill),
            );
        }
    }

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
}
