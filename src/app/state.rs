use std::collections::HashMap;
use std::fmt;

use iced::Theme;
use iced_aw::date_picker::Date;

use crate::api::{
    Achievement, ApiClient, Budget, Category, Certificate, CourseModule, PaymentInfo, QuizDetail,
    Transaction, TransactionKind, UserProfile,
};
use crate::app::dialogs::DialogRegistry;
use crate::config;

pub struct App {
    pub api: ApiClient,
    pub theme: Theme,
    pub current_screen: Screen,
    pub current_user: Option<UserProfile>,
    /// Единственный владелец состояния всех прерывающих окон.
    pub dialogs: DialogRegistry,
    //
    pub user_name: String,
    pub user_surname: String,
    pub user_email: String,
    pub user_password: String,
    pub user_password_repeat: String,
    pub date: Date,
    pub show_picker: bool,
    pub register_error: Option<String>,
    pub error_message: String,
    pub is_authenticating: bool,
    //
    pub user_avatar_data: Option<Vec<u8>>,
    pub achievements: Vec<Achievement>,
    //
    pub modules: Vec<CourseModule>,
    pub module_filter_text: String,
    pub show_quiz_modal: bool,
    pub active_quiz: Option<QuizDetail>,
    pub quiz_answers: HashMap<i64, usize>,
    pub is_submitting_quiz: bool,
    pub quiz_error_message: Option<String>,
    //
    pub certificates: Vec<Certificate>,
    //
    pub finance_tab: FinanceTab,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub show_add_transaction_modal: bool,
    pub new_tx_amount: String,
    pub new_tx_note: String,
    pub new_tx_kind: TransactionKind,
    pub new_tx_category: Option<Category>,
    pub new_tx_date: Date,
    pub show_tx_date_picker: bool,
    pub is_saving_transaction: bool,
    //
    pub payment_info: Option<PaymentInfo>,
    pub receipt_file: Option<(String, Vec<u8>)>,
    pub payment_comment: String,
    pub is_submitting_payment: bool,
}

impl Default for App {
    fn default() -> Self {
        let selected_theme = config::load_theme().unwrap_or(Theme::Light);
        // Токен из session.json подхватывается сразу: каждый запрос
        // клиента уходит с заголовком Authorization.
        let session = config::load_session();
        Self {
            api: ApiClient::new(
                config::api_base_url(),
                session.as_ref().map(|s| s.token.clone()),
            ),
            theme: selected_theme,
            current_screen: Default::default(),
            current_user: None,
            dialogs: DialogRegistry::default(),
            user_name: "".to_string(),
            user_surname: "".to_string(),
            user_email: "".to_string(),
            user_password: "".to_string(),
            user_password_repeat: "".to_string(),
            date: Date::today(),
            show_picker: false,
            register_error: None,
            error_message: "".to_string(),
            is_authenticating: false,
            user_avatar_data: None,
            achievements: vec![],
            modules: vec![],
            module_filter_text: "".to_string(),
            show_quiz_modal: false,
            active_quiz: None,
            quiz_answers: HashMap::new(),
            is_submitting_quiz: false,
            quiz_error_message: None,
            certificates: vec![],
            finance_tab: FinanceTab::Transactions,
            transactions: vec![],
            categories: vec![],
            budgets: vec![],
            show_add_transaction_modal: false,
            new_tx_amount: "".to_string(),
            new_tx_note: "".to_string(),
            new_tx_kind: TransactionKind::Expense,
            new_tx_category: None,
            new_tx_date: Date::today(),
            show_tx_date_picker: false,
            is_saving_transaction: false,
            payment_info: None,
            receipt_file: None,
            payment_comment: "".to_string(),
            is_submitting_payment: false,
        }
    }
}

#[derive(PartialEq, Default)]
pub enum Screen {
    #[default]
    Login,
    Register,
    Profile,
    Settings,
    Modules,
    Certificates,
    Finance,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinanceTab {
    Transactions,
    Budgets,
    Categories,
}

impl FinanceTab {
    pub const ALL: &'static [FinanceTab] = &[
        FinanceTab::Transactions,
        FinanceTab::Budgets,
        FinanceTab::Categories,
    ];
}

impl fmt::Display for FinanceTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            FinanceTab::Transactions => "Операции",
            FinanceTab::Budgets => "Бюджеты",
            FinanceTab::Categories => "Категории",
        })
    }
}
