use std::sync::Arc;

use crate::api::ApiError;
use crate::app::Message;

// Реестр прерывающих окон. Экраны не держат состояние диалогов у себя:
// любая ветка update() может вызвать show_*, а рисуются все окна одним
// слоем поверх текущего экрана (см. app/view.rs и screens/dialogs.rs).
// На каждый вид окна ровно один слот; повторный show_* того же вида
// целиком замещает прежнее содержимое: последний вызов выигрывает,
// очереди нет.

pub const GENERIC_ERROR: &str = "Произошла ошибка. Попробуйте ещё раз.";
pub const VALIDATION_FAILED: &str = "Проверьте правильность заполнения формы";
pub const VALIDATION_TITLE: &str = "Ошибка";

/// Конструктор сообщения для окна ввода: значение подставляет реестр.
pub type InputHandler = Arc<dyn Fn(String) -> Message + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmKind {
    Danger,
    #[default]
    Warning,
    Info,
}

#[derive(Debug, Clone, Default)]
pub struct AlertDialog {
    pub is_open: bool,
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    /// Отправляется по кнопке «ОК»; клик по подложке окно просто закрывает.
    pub on_confirm: Option<Message>,
}

#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub is_open: bool,
    pub kind: ConfirmKind,
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub on_confirm: Option<Message>,
    /// Пока true, кнопки и подложка не работают, окно не закрыть.
    pub is_busy: bool,
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self {
            is_open: false,
            kind: ConfirmKind::default(),
            title: String::new(),
            message: String::new(),
            confirm_label: "Подтвердить".to_string(),
            cancel_label: "Отмена".to_string(),
            on_confirm: None,
            is_busy: false,
        }
    }
}

#[derive(Clone, Default)]
pub struct InputDialog {
    pub is_open: bool,
    pub title: String,
    pub message: String,
    pub placeholder: String,
    pub value: String,
    pub on_submit: Option<InputHandler>,
    pub is_busy: bool,
}

impl InputDialog {
    /// Пустое (после trim) значение подтвердить нельзя, в том числе по Enter.
    pub fn can_submit(&self) -> bool {
        !self.value.trim().is_empty() && !self.is_busy
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationDialog {
    pub is_open: bool,
    pub title: String,
    pub message: String,
    pub fields: Vec<(String, Vec<String>)>,
}

pub struct AlertParams {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub on_confirm: Option<Message>,
}

pub struct ConfirmParams {
    pub kind: ConfirmKind,
    pub title: String,
    pub message: String,
    pub confirm_label: Option<String>,
    pub cancel_label: Option<String>,
    pub on_confirm: Message,
}

pub struct InputParams {
    pub title: String,
    pub message: String,
    pub placeholder: String,
    pub initial_value: String,
    pub on_submit: InputHandler,
}

#[derive(Default)]
pub struct DialogRegistry {
    pub alert: AlertDialog,
    pub confirm: ConfirmDialog,
    pub input: InputDialog,
    pub validation: ValidationDialog,
}

impl DialogRegistry {
    pub fn show_alert(&mut self, params: AlertParams) {
        self.alert = AlertDialog {
            is_open: true,
            kind: params.kind,
            title: params.title,
            message: params.message,
            on_confirm: params.on_confirm,
        };
    }

    pub fn show_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.show_alert(AlertParams {
            kind: AlertKind::Error,
            title: title.into(),
            message: message.into(),
            on_confirm: None,
        });
    }

    pub fn show_success(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.show_alert(AlertParams {
            kind: AlertKind::Success,
            title: title.into(),
            message: message.into(),
            on_confirm: None,
        });
    }

    pub fn show_confirm(&mut self, params: ConfirmParams) {
        let defaults = ConfirmDialog::default();
        self.confirm = ConfirmDialog {
            is_open: true,
            kind: params.kind,
            title: params.title,
            message: params.message,
            confirm_label: params.confirm_label.unwrap_or(defaults.confirm_label),
            cancel_label: params.cancel_label.unwrap_or(defaults.cancel_label),
            on_confirm: Some(params.on_confirm),
            is_busy: false,
        };
    }

    pub fn show_input(&mut self, params: InputParams) {
        self.input = InputDialog {
            is_open: true,
            title: params.title,
            message: params.message,
            placeholder: params.placeholder,
            value: params.initial_value,
            on_submit: Some(params.on_submit),
            is_busy: false,
        };
    }

    pub fn show_validation(&mut self, title: Option<String>, error: &ApiError) {
        let formatted = format_validation(error);
        self.validation = ValidationDialog {
            is_open: true,
            title: title.unwrap_or_else(|| VALIDATION_TITLE.to_string()),
            message: formatted.message,
            fields: formatted.fields,
        };
    }

    pub fn set_confirm_busy(&mut self, busy: bool) {
        self.confirm.is_busy = busy;
    }

    pub fn set_input_busy(&mut self, busy: bool) {
        self.input.is_busy = busy;
    }

    pub fn close_alert(&mut self) {
        self.alert = AlertDialog::default();
    }

    pub fn close_confirm(&mut self) {
        self.confirm = ConfirmDialog::default();
    }

    pub fn close_input(&mut self) {
        self.input = InputDialog::default();
    }

    pub fn close_validation(&mut self) {
        self.validation = ValidationDialog::default();
    }
}

/// События самих окон. Вся логика живёт в App::handle_dialog (app/update.rs),
/// презентеры только отправляют эти сообщения.
#[derive(Debug, Clone)]
pub enum DialogMessage {
    AlertAcknowledged,
    AlertBackdropPressed,
    ConfirmAccepted,
    ConfirmCancelled,
    InputChanged(String),
    InputSubmitted,
    InputCancelled,
    ValidationDismissed,
}

pub struct FormattedValidation {
    pub message: String,
    pub fields: Vec<(String, Vec<String>)>,
    pub all_messages: Vec<String>,
}

/// Приводит любую ошибку API к виду для окна валидации.
/// Тотальная: на любом входе возвращает осмысленный результат.
pub fn format_validation(error: &ApiError) -> FormattedValidation {
    match error {
        ApiError::Network(message) => FormattedValidation {
            message: non_empty_or(message, GENERIC_ERROR),
            fields: Vec::new(),
            all_messages: Vec::new(),
        },
        ApiError::Validation { message, errors } => {
            let all_messages = errors
                .iter()
                .flat_map(|(_, messages)| messages.iter().cloned())
                .collect();
            FormattedValidation {
                message: non_empty_or(message, VALIDATION_FAILED),
                fields: errors.clone(),
                all_messages,
            }
        }
        ApiError::Http { message, .. } => FormattedValidation {
            message: non_empty_or(message, GENERIC_ERROR),
            fields: Vec::new(),
            all_messages: Vec::new(),
        },
        ApiError::Unauthorized => FormattedValidation {
            message: error.to_string(),
            fields: Vec::new(),
            all_messages: Vec::new(),
        },
    }
}

fn non_empty_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DialogRegistry {
        DialogRegistry::default()
    }

    #[test]
    fn show_alert_replaces_previous_without_closing() {
        let mut dialogs = registry();
        dialogs.show_alert(AlertParams {
            kind: AlertKind::Error,
            title: "A".to_string(),
            message: "first".to_string(),
            on_confirm: None,
        });
        assert!(dialogs.alert.is_open);

        dialogs.show_alert(AlertParams {
            kind: AlertKind::Success,
            title: "B".to_string(),
            message: "second".to_string(),
            on_confirm: None,
        });

        // Никакого слияния: содержимое целиком от последнего вызова
        assert!(dialogs.alert.is_open);
        assert_eq!(dialogs.alert.kind, AlertKind::Success);
        assert_eq!(dialogs.alert.title, "B");
        assert_eq!(dialogs.alert.message, "second");
    }

    #[test]
    fn show_confirm_replaces_previous_and_resets_busy() {
        let mut dialogs = registry();
        dialogs.show_confirm(ConfirmParams {
            kind: ConfirmKind::Danger,
            title: "Удаление".to_string(),
            message: "точно?".to_string(),
            confirm_label: Some("Удалить".to_string()),
            cancel_label: None,
            on_confirm: Message::NoOp,
        });
        dialogs.set_confirm_busy(true);

        dialogs.show_confirm(ConfirmParams {
            kind: ConfirmKind::Info,
            title: "Другое".to_string(),
            message: "новое".to_string(),
            confirm_label: None,
            cancel_label: None,
            on_confirm: Message::NoOp,
        });

        assert!(dialogs.confirm.is_open);
        assert!(!dialogs.confirm.is_busy);
        assert_eq!(dialogs.confirm.kind, ConfirmKind::Info);
        assert_eq!(dialogs.confirm.title, "Другое");
        assert_eq!(dialogs.confirm.confirm_label, "Подтвердить");
    }

    #[test]
    fn close_confirm_resets_to_documented_defaults() {
        let mut dialogs = registry();
        dialogs.show_confirm(ConfirmParams {
            kind: ConfirmKind::Danger,
            title: "Удаление".to_string(),
            message: "точно?".to_string(),
            confirm_label: Some("Удалить".to_string()),
            cancel_label: Some("Оставить".to_string()),
            on_confirm: Message::NoOp,
        });
        dialogs.set_confirm_busy(true);
        dialogs.close_confirm();

        let slot = &dialogs.confirm;
        assert!(!slot.is_open);
        assert_eq!(slot.kind, ConfirmKind::Warning);
        assert_eq!(slot.title, "");
        assert_eq!(slot.message, "");
        assert_eq!(slot.confirm_label, "Подтвердить");
        assert_eq!(slot.cancel_label, "Отмена");
        assert!(slot.on_confirm.is_none());
        assert!(!slot.is_busy);
    }

    #[test]
    fn close_input_resets_value_and_handler() {
        let mut dialogs = registry();
        dialogs.show_input(InputParams {
            title: "Название".to_string(),
            message: "Введите новое название".to_string(),
            placeholder: "Название".to_string(),
            initial_value: "Продукты".to_string(),
            on_submit: Arc::new(Message::NewTxNoteChanged),
        });
        dialogs.close_input();

        assert!(!dialogs.input.is_open);
        assert_eq!(dialogs.input.value, "");
        assert!(dialogs.input.on_submit.is_none());
        assert!(!dialogs.input.is_busy);
    }

    #[test]
    fn input_cannot_submit_blank_or_busy_value() {
        let mut dialogs = registry();
        dialogs.show_input(InputParams {
            title: String::new(),
            message: String::new(),
            placeholder: String::new(),
            initial_value: "Продукты".to_string(),
            on_submit: Arc::new(Message::NewTxNoteChanged),
        });
        assert!(dialogs.input.can_submit());

        // Пользователь стёр значение до пробелов
        dialogs.input.value = "   ".to_string();
        assert!(!dialogs.input.can_submit());

        dialogs.input.value = "Еда".to_string();
        dialogs.set_input_busy(true);
        assert!(!dialogs.input.can_submit());
    }

    #[test]
    fn show_validation_formats_field_errors() {
        let mut dialogs = registry();
        let error = ApiError::Validation {
            message: String::new(),
            errors: vec![
                ("email".to_string(), vec!["required".to_string()]),
                ("name".to_string(), vec![
                    "required".to_string(),
                    "too short".to_string(),
                ]),
            ],
        };
        dialogs.show_validation(None, &error);

        assert!(dialogs.validation.is_open);
        assert_eq!(dialogs.validation.title, VALIDATION_TITLE);
        assert_eq!(dialogs.validation.message, VALIDATION_FAILED);
        assert_eq!(dialogs.validation.fields.len(), 2);
    }

    #[test]
    fn format_validation_preserves_field_and_message_order() {
        let error = ApiError::Validation {
            message: String::new(),
            errors: vec![
                ("email".to_string(), vec!["required".to_string()]),
                ("name".to_string(), vec![
                    "required".to_string(),
                    "too short".to_string(),
                ]),
            ],
        };

        let formatted = format_validation(&error);
        assert_eq!(formatted.fields, vec![
            ("email".to_string(), vec!["required".to_string()]),
            ("name".to_string(), vec![
                "required".to_string(),
                "too short".to_string()
            ]),
        ]);
        assert_eq!(formatted.all_messages, vec![
            "required".to_string(),
            "required".to_string(),
            "too short".to_string(),
        ]);
    }

    #[test]
    fn format_validation_network_error_keeps_raw_message() {
        let formatted = format_validation(&ApiError::Network("Network Error".to_string()));
        assert_eq!(formatted.message, "Network Error");
        assert!(formatted.fields.is_empty());
        assert!(formatted.all_messages.is_empty());
    }

    #[test]
    fn format_validation_http_error_is_freeform_only() {
        let formatted = format_validation(&ApiError::Http {
            status: 500,
            message: "Server exploded".to_string(),
        });
        assert_eq!(formatted.message, "Server exploded");
        assert!(formatted.fields.is_empty());
        assert!(formatted.all_messages.is_empty());
    }

    #[test]
    fn format_validation_empty_messages_fall_back_to_generic() {
        let formatted = format_validation(&ApiError::Network(String::new()));
        assert_eq!(formatted.message, GENERIC_ERROR);

        let formatted = format_validation(&ApiError::Http {
            status: 503,
            message: "  ".to_string(),
        });
        assert_eq!(formatted.message, GENERIC_ERROR);
    }
}
