use iced::widget::{button, column, text, text_input, vertical_space, Container};
use iced::{Center, Length};

use crate::app::{App, Message};

pub fn login_screen(app: &App) -> Container<Message> {
    let login_label = if app.is_authenticating { "Входим..." } else { "Войти" };
    let mut login_button = button(login_label).padding(10);
    if !app.is_authenticating {
        login_button = login_button.on_press(Message::LoginPressed);
    }

    let content = column![
        text("Вход").size(30),
        vertical_space(),
        text_input("Почта", &app.user_email)
            .on_input(Message::EmailChanged)
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        text_input("Пароль", &app.user_password)
            .on_input(Message::PasswordChanged)
            .on_submit(Message::LoginPressed)
            .secure(true)
            .padding(10)
            .size(18)
            .width(Length::Fixed(350.0)),
        login_button,
        text(&app.error_message).size(16),
        vertical_space(),
        button("Регистрация")
            .on_press(Message::SwitchToRegister)
            .padding(10),
    ]
    .spacing(15)
    .width(Length::Fill)
    .align_x(Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(40)
}
