use iced::widget::{Column, Container, Row, Stack};
use iced::{Element, Length};

use crate::app::state::Screen;
use crate::screens::{
    certificates_screen, finance_screen, login_screen, modules_screen, nav_menu, payment_screen,
    profile_screen, register_screen, settings_screen,
};
use crate::screens::dialogs::{alert_dialog, confirm_dialog, input_dialog, validation_dialog};
use super::{App, Message};

impl App {
    pub fn view(&self) -> Element<Message> {
        let base = Row::new()
            .spacing(20)
            .push(
                // Левое меню (sidebar)
                if self.current_screen != Screen::Login && self.current_screen != Screen::Register {
                    Container::new(nav_menu(self))
                        .width(Length::Fixed(200.0))
                        .height(Length::Fill)
                        .padding(10)
                } else {
                    Container::new(Column::new())
                        .width(Length::Fixed(0.0))
                        .height(Length::Fill)
                },
            )
            .push(
                match &self.current_screen {
                    Screen::Login => login_screen(self),
                    Screen::Register => register_screen(self),
                    Screen::Profile => profile_screen(self),
                    Screen::Settings => settings_screen(self),
                    Screen::Modules => modules_screen(self),
                    Screen::Certificates => certificates_screen(self),
                    Screen::Finance => finance_screen(self),
                    Screen::Payment => payment_screen(self),
                }
                .width(Length::Fill),
            );

        // Прерывающие окна рисуются единым слоем поверх любого экрана.
        // Алерт кладётся последним: обратная связь из confirm-сценария
        // должна быть кликабельна поверх остальных окон.
        let mut ui = Stack::new().push(base);
        if self.dialogs.confirm.is_open {
            ui = ui.push(confirm_dialog(self));
        }
        if self.dialogs.input.is_open {
            ui = ui.push(input_dialog(self));
        }
        if self.dialogs.validation.is_open {
            ui = ui.push(validation_dialog(self));
        }
        if self.dialogs.alert.is_open {
            ui = ui.push(alert_dialog(self));
        }
        ui.into()
    }
}
