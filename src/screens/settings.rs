use iced::widget::{column, pick_list, text, vertical_space, Container};
use iced::{Center, Length, Theme};

use crate::app::{App, Message};
use crate::config;

pub fn settings_screen(app: &App) -> Container<Message> {
    let current_name = config::theme_to_str(&app.theme);
    let theme_names: Vec<&'static str> = Theme::ALL.iter().map(config::theme_to_str).collect();
    let content = column![
        text("Настройки").size(30),
        vertical_space(),
        pick_list(theme_names, Some(current_name), Message::ThemeSelected)
            .placeholder("Выберите тему"),
        text(format!("Сервер: {}", config::api_base_url())).size(14),
    ]
    .spacing(15)
    .align_x(Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
}
