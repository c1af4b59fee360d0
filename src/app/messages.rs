use iced_aw::date_picker::Date;

use crate::api::{
    Achievement, ApiError, Budget, Category, Certificate, CourseModule, PaymentInfo, QuizDetail,
    QuizOutcome, SessionData, Transaction, TransactionKind, UserProfile,
};
use crate::app::dialogs::DialogMessage;
use crate::app::state::FinanceTab;

#[derive(Debug, Clone)]
pub enum Message {
    // Вход и регистрация
    LoginPressed,
    LoggedIn(Result<SessionData, ApiError>),
    RegisterPressed,
    Registered(Result<SessionData, ApiError>),
    FirstNameChanged(String),
    LastNameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    PasswordRepeatChanged(String),
    ChooseDate,
    SubmitDate(Date),
    CancelDate,
    SwitchToLogin,
    SwitchToRegister,
    LogoutRequested,
    LogoutConfirmed,
    //
    GoToProfile,
    GoToSettings,
    GoToModules,
    GoToCertificates,
    GoToFinance,
    GoToPayment,
    //
    ThemeSelected(&'static str),
    //
    ProfileLoaded(Result<UserProfile, ApiError>),
    ChooseAvatar,
    AvatarChosen(Result<(String, Vec<u8>), String>),
    AvatarUploaded(Result<UserProfile, ApiError>),
    AvatarLoaded(Result<Vec<u8>, ApiError>),
    AchievementsLoaded(Result<Vec<Achievement>, ApiError>),
    DismissAchievement(i64),
    // Модули курса и тесты
    ModulesLoaded(Result<Vec<CourseModule>, ApiError>),
    ModuleFilterChanged(String),
    OpenQuiz(i64),
    QuizLoaded(Result<QuizDetail, ApiError>),
    AnswerSelected { question_id: i64, option_index: usize },
    SubmitQuiz,
    QuizSubmitted(Result<QuizOutcome, ApiError>),
    CloseQuizModal,
    //
    CertificatesLoaded(Result<Vec<Certificate>, ApiError>),
    OpenCertificate(String),
    // Финансовые инструменты
    FinanceTabSelected(FinanceTab),
    TransactionsLoaded(Result<Vec<Transaction>, ApiError>),
    CategoriesLoaded(Result<Vec<Category>, ApiError>),
    BudgetsLoaded(Result<Vec<Budget>, ApiError>),
    ToggleAddTransactionModal(bool),
    NewTxAmountChanged(String),
    NewTxNoteChanged(String),
    NewTxKindSelected(TransactionKind),
    NewTxCategorySelected(Category),
    ChooseTxDate,
    SubmitTxDate(Date),
    CancelTxDate,
    SubmitNewTransaction,
    TransactionCreated(Result<Transaction, ApiError>),
    DeleteTransaction(i64),
    DeleteTransactionConfirmed(i64),
    TransactionDeleted(Result<(), ApiError>),
    RenameCategory(Category),
    RenameCategorySubmitted { id: i64, name: String },
    CategoryRenamed(Result<Category, ApiError>),
    DeleteCategory(Category),
    DeleteCategoryConfirmed(i64),
    CategoryDeleted(Result<(), ApiError>),
    EditBudgetLimit(Budget),
    BudgetLimitSubmitted { id: i64, value: String },
    BudgetSaved(Result<Budget, ApiError>),
    // Оплата доступа
    PaymentStatusLoaded(Result<PaymentInfo, ApiError>),
    PaymentCommentChanged(String),
    ChooseReceipt,
    ReceiptChosen(Result<(String, Vec<u8>), String>),
    SubmitPaymentProof,
    PaymentProofSubmitted(Result<PaymentInfo, ApiError>),
    // Прерывающие окна
    Dialog(DialogMessage),
    NoOp,
}
