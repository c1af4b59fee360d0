use std::fmt;

use reqwest::multipart;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Все данные приложение получает и меняет только через этот слой.
// Экраны его не обходят: на каждую операцию свой метод клиента.

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Сервер недоступен либо ответ не удалось разобрать.
    #[error("{0}")]
    Network(String),
    /// HTTP 401: токен протух или отозван.
    #[error("Сессия истекла, войдите в систему заново")]
    Unauthorized,
    /// HTTP 422 с пофилдовой разбивкой ошибок.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<(String, Vec<String>)>,
    },
    /// Любой другой неуспешный статус.
    #[error("{message}")]
    Http { status: u16, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub birthday: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub birthday: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub unlocked_at: Option<String>,
    pub seen: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModuleLesson {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub question_count: i32,
    pub best_score: Option<f64>,
    pub passed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseModule {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub position: i32,
    pub lessons: Vec<ModuleLesson>,
    pub quiz: Option<QuizSummary>,
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizDetail {
    pub id: i64,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizAnswer {
    pub question_id: i64,
    pub option_index: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizOutcome {
    pub score: f64,
    pub passed: bool,
    pub certificate_issued: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Certificate {
    pub id: i64,
    pub course_title: String,
    pub serial: String,
    pub issued_at: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    None,
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            PaymentStatus::None => "Не оплачено",
            PaymentStatus::Pending => "На проверке",
            PaymentStatus::Approved => "Подтверждено",
            PaymentStatus::Rejected => "Отклонено",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInfo {
    pub status: PaymentStatus,
    pub submitted_at: Option<String>,
    /// Комментарий проверяющего, заполняется при отклонении.
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub const ALL: &'static [TransactionKind] =
        &[TransactionKind::Income, TransactionKind::Expense];
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", match self {
            TransactionKind::Income => "Доход",
            TransactionKind::Expense => "Расход",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    pub date: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category_id: Option<i64>,
    pub note: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: TransactionKind,
}

// Для PickList в форме операции
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub month: String,
    pub limit_amount: f64,
    pub spent: f64,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Network(format!("Некорректный ответ сервера: {}", e)))
    }

    // Для DELETE и прочих запросов, где тело ответа не нужно
    async fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn login(self, email: String, password: String) -> Result<SessionData, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        Self::send(self.request(Method::POST, "/auth/login").json(&body)).await
    }

    pub async fn register(self, payload: RegisterPayload) -> Result<SessionData, ApiError> {
        Self::send(self.request(Method::POST, "/auth/register").json(&payload)).await
    }

    pub async fn fetch_profile(self) -> Result<UserProfile, ApiError> {
        Self::send(self.request(Method::GET, "/profile")).await
    }

    /// multipart: тип содержимого выставляет reqwest, JSON-заголовок
    /// здесь не навязывается
    pub async fn upload_avatar(
        self,
        data: Vec<u8>,
        filename: String,
    ) -> Result<UserProfile, ApiError> {
        let part = multipart::Part::bytes(data).file_name(filename);
        let form = multipart::Form::new().part("avatar", part);
        Self::send(self.request(Method::POST, "/profile/avatar").multipart(form)).await
    }

    /// Скачивание произвольного файла (аватар) по абсолютному URL сервера.
    pub async fn fetch_bytes(self, url: String) -> Result<Vec<u8>, ApiError> {
        let mut builder = self.http.get(url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    pub async fn fetch_achievements(self) -> Result<Vec<Achievement>, ApiError> {
        Self::send(self.request(Method::GET, "/achievements")).await
    }

    pub async fn dismiss_achievement(self, id: i64) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::POST, &format!("/achievements/{}/seen", id))).await
    }

    pub async fn fetch_modules(self) -> Result<Vec<CourseModule>, ApiError> {
        Self::send(self.request(Method::GET, "/modules")).await
    }

    pub async fn fetch_quiz(self, id: i64) -> Result<QuizDetail, ApiError> {
        Self::send(self.request(Method::GET, &format!("/quizzes/{}", id))).await
    }

    pub async fn submit_quiz(
        self,
        id: i64,
        answers: Vec<QuizAnswer>,
    ) -> Result<QuizOutcome, ApiError> {
        let body = serde_json::json!({ "answers": answers });
        Self::send(
            self.request(Method::POST, &format!("/quizzes/{}/submit", id))
                .json(&body),
        )
        .await
    }

    pub async fn fetch_certificates(self) -> Result<Vec<Certificate>, ApiError> {
        Self::send(self.request(Method::GET, "/certificates")).await
    }

    pub async fn fetch_payment_status(self) -> Result<PaymentInfo, ApiError> {
        Self::send(self.request(Method::GET, "/payment")).await
    }

    pub async fn submit_payment_proof(
        self,
        data: Vec<u8>,
        filename: String,
        comment: String,
    ) -> Result<PaymentInfo, ApiError> {
        let part = multipart::Part::bytes(data).file_name(filename);
        let form = multipart::Form::new()
            .part("receipt", part)
            .text("comment", comment);
        Self::send(self.request(Method::POST, "/payment/proof").multipart(form)).await
    }

    pub async fn fetch_transactions(self) -> Result<Vec<Transaction>, ApiError> {
        Self::send(self.request(Method::GET, "/finance/transactions")).await
    }

    pub async fn create_transaction(
        self,
        payload: NewTransaction,
    ) -> Result<Transaction, ApiError> {
        Self::send(
            self.request(Method::POST, "/finance/transactions")
                .json(&payload),
        )
        .await
    }

    pub async fn delete_transaction(self, id: i64) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::DELETE, &format!("/finance/transactions/{}", id)))
            .await
    }

    pub async fn fetch_categories(self) -> Result<Vec<Category>, ApiError> {
        Self::send(self.request(Method::GET, "/finance/categories")).await
    }

    pub async fn rename_category(self, id: i64, name: String) -> Result<Category, ApiError> {
        let body = serde_json::json!({ "name": name });
        Self::send(
            self.request(Method::PATCH, &format!("/finance/categories/{}", id))
                .json(&body),
        )
        .await
    }

    pub async fn delete_category(self, id: i64) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::DELETE, &format!("/finance/categories/{}", id)))
            .await
    }

    pub async fn fetch_budgets(self) -> Result<Vec<Budget>, ApiError> {
        Self::send(self.request(Method::GET, "/finance/budgets")).await
    }

    pub async fn set_budget_limit(self, id: i64, limit: f64) -> Result<Budget, ApiError> {
        let body = serde_json::json!({ "limit_amount": limit });
        Self::send(
            self.request(Method::PATCH, &format!("/finance/budgets/{}", id))
                .json(&body),
        )
        .await
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    if status.is_success() {
        return Ok(response);
    }
    // Тело ошибки может быть каким угодно или отсутствовать,
    // разбор не должен падать ни на каком входе
    let payload = response.json::<Value>().await.unwrap_or(Value::Null);
    Err(error_from_payload(status.as_u16(), &payload))
}

fn error_from_payload(status: u16, payload: &Value) -> ApiError {
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| payload.get("error").and_then(Value::as_str))
        .unwrap_or("")
        .to_string();

    if status == 422 {
        if let Some(map) = payload.get("errors").and_then(Value::as_object) {
            let errors = map
                .iter()
                .map(|(field, value)| (field.clone(), normalize_messages(value)))
                .collect();
            return ApiError::Validation { message, errors };
        }
    }

    ApiError::Http { status, message }
}

// Сервер присылает либо строку, либо список строк на поле
fn normalize_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::Null => vec![],
        other => vec![other.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_422_with_field_map_becomes_validation() {
        let payload = serde_json::json!({
            "message": "Данные не прошли проверку",
            "errors": {
                "email": ["required"],
                "name": ["required", "too short"],
            }
        });

        match error_from_payload(422, &payload) {
            ApiError::Validation { message, errors } => {
                assert_eq!(message, "Данные не прошли проверку");
                assert_eq!(errors, vec![
                    ("email".to_string(), vec!["required".to_string()]),
                    ("name".to_string(), vec![
                        "required".to_string(),
                        "too short".to_string()
                    ]),
                ]);
            }
            other => panic!("ожидался Validation, получен {:?}", other),
        }
    }

    #[test]
    fn error_422_single_string_is_wrapped_into_list() {
        let payload = serde_json::json!({
            "errors": { "amount": "must be positive" }
        });

        match error_from_payload(422, &payload) {
            ApiError::Validation { errors, .. } => {
                assert_eq!(
                    errors,
                    vec![("amount".to_string(), vec!["must be positive".to_string()])]
                );
            }
            other => panic!("ожидался Validation, получен {:?}", other),
        }
    }

    #[test]
    fn error_422_without_field_map_stays_http() {
        let payload = serde_json::json!({ "message": "Unprocessable" });
        match error_from_payload(422, &payload) {
            ApiError::Http { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Unprocessable");
            }
            other => panic!("ожидался Http, получен {:?}", other),
        }
    }

    #[test]
    fn error_with_null_payload_degrades_to_empty_message() {
        match error_from_payload(500, &Value::Null) {
            ApiError::Http { status, message } => {
                assert_eq!(status, 500);
                assert!(message.is_empty());
            }
            other => panic!("ожидался Http, получен {:?}", other),
        }
    }
}
