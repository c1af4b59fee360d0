use iced::widget::container::bordered_box;
use iced::widget::image::Handle;
use iced::widget::{button, column, horizontal_space, image, row, text, Column, Container, Row,
    Scrollable, Text};
use iced::{Alignment, ContentFit, Length};
use iced_font_awesome::fa_icon_solid;

use crate::app::update::format_date;
use crate::app::{App, Message};
use crate::config::DEFAULT_AVATAR;

pub fn profile_screen(app: &App) -> Container<Message> {
    let avatar_widget = if let Some(ref data) = app.user_avatar_data {
        let image_handle = Handle::from_bytes(data.clone());
        image(image_handle)
            .width(Length::Fixed(220.0))
            .height(Length::Fixed(220.0))
            .content_fit(ContentFit::Fill)
    } else {
        // Аватар по умолчанию, если с сервера ничего не пришло
        image(DEFAULT_AVATAR)
            .width(Length::Fixed(120.0))
            .height(Length::Fixed(120.0))
            .content_fit(ContentFit::Cover)
    };

    let (name, email, birthday) = match &app.current_user {
        Some(user) => (
            user.name.clone(),
            user.email.clone(),
            user.birthday.clone().map(|b| format_date(&b)).unwrap_or_default(),
        ),
        None => ("".to_string(), "".to_string(), "".to_string()),
    };

    let user_info = column![
        row![
            avatar_widget,
            column![
                text(format!("ФИО: {}", name)).size(24),
                text(format!("Дата рождения: {}", birthday)).size(24),
                text(format!("Почта: {}", email)).size(24),
            ]
            .spacing(10),
        ]
        .width(Length::Fill)
        .spacing(20),
        text(&app.error_message).size(12),
        button("Выбрать аватар").on_press(Message::ChooseAvatar),
    ]
    .spacing(20);

    let user_info_widget = Container::new(user_info)
        .style(move |_| bordered_box(&app.theme))
        .width(Length::Fill)
        .padding(10);

    let mut achievements_col = Column::new()
        .spacing(10)
        .push(text("Достижения").size(26));

    if app.achievements.is_empty() {
        achievements_col = achievements_col.push(text("Пока нет достижений.").size(16));
    }
    for achievement in &app.achievements {
        let unlocked = achievement.unlocked_at.is_some();
        let icon_name = if unlocked { "trophy" } else { "lock" };
        let mut header = Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(fa_icon_solid(icon_name).style(move |_| text::base(&app.theme)))
            .push(Text::new(achievement.title.clone()).size(18))
            .push(horizontal_space());
        if let Some(date) = &achievement.unlocked_at {
            header = header.push(Text::new(format_date(date)).size(14));
        }
        if unlocked && !achievement.seen {
            header = header.push(
                button(text("Скрыть").size(14))
                    .on_press(Message::DismissAchievement(achievement.id)),
            );
        }

        achievements_col = achievements_col.push(
            Container::new(
                Column::new()
                    .spacing(5)
                    .push(header)
                    .push(Text::new(achievement.description.clone()).size(14)),
            )
            .style(move |_| bordered_box(&app.theme))
            .padding(10)
            .width(Length::Fill),
        );
    }

    let content = column![
        user_info_widget,
        Scrollable::new(achievements_col).height(Length::Fill),
    ]
    .spacing(20);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
}
