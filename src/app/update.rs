use std::sync::Arc;

use iced::Task;
use regex::Regex;
use tokio::task::spawn_blocking;
use tracing::{debug, error, warn};

use crate::api::{ApiError, NewTransaction, QuizAnswer, RegisterPayload, SessionData};
use crate::app::dialogs::{
    AlertKind, AlertParams, ConfirmKind, ConfirmParams, DialogMessage, InputParams,
};
use crate::app::state::Screen;
use crate::config;
use super::{App, Message};

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LoginPressed => {
                if self.user_email.trim().is_empty() || self.user_password.trim().is_empty() {
                    self.error_message = "Пожалуйста, заполните все поля.".to_string();
                    return Task::none();
                }
                self.error_message = "".to_string();
                self.is_authenticating = true;
                Task::perform(
                    self.api
                        .clone()
                        .login(self.user_email.trim().to_string(), self.user_password.clone()),
                    Message::LoggedIn,
                )
            }
            Message::LoggedIn(result) => {
                self.is_authenticating = false;
                match result {
                    Ok(session) => self.enter_session(session),
                    Err(ApiError::Unauthorized) => {
                        // 401 на самом логине означает неверные данные, а не протухший токен
                        self.error_message = "Неверная почта или пароль.".to_string();
                        Task::none()
                    }
                    Err(err @ ApiError::Validation { .. }) => {
                        self.dialogs.show_validation(Some("Вход".to_string()), &err);
                        Task::none()
                    }
                    Err(err) => {
                        error!("Ошибка входа: {}", err);
                        self.dialogs.show_error("Вход", err.to_string());
                        Task::none()
                    }
                }
            }
            Message::RegisterPressed => {
                if self.user_name.trim().is_empty() || self.user_surname.trim().is_empty() {
                    self.register_error = Some("Пожалуйста, заполните Фамилию и Имя".to_string());
                    return Task::none();
                }

                let fio_re = Regex::new(r"^[А-Яа-яЁё\s-]+$").unwrap();
                if !fio_re.is_match(&self.user_name) || !fio_re.is_match(&self.user_surname) {
                    self.register_error =
                        Some("ФИО может содержать только русские буквы, пробелы и дефисы".to_string());
                    return Task::none();
                }

                let password = &self.user_password;
                if password.trim().is_empty() {
                    self.register_error = Some("Пароль не может быть пустым".to_string());
                    return Task::none();
                }
                if password != &self.user_password_repeat {
                    self.register_error = Some("Пароли не совпадают".to_string());
                    return Task::none();
                }
                if password.len() < 8 {
                    self.register_error =
                        Some("Пароль должен содержать минимум 8 символов".to_string());
                    return Task::none();
                }
                if !password.chars().any(|c| c.is_ascii_uppercase()) {
                    self.register_error =
                        Some("Пароль должен содержать хотя бы одну заглавную букву".to_string());
                    return Task::none();
                }
                if !password.chars().any(|c| c.is_ascii_digit()) {
                    self.register_error =
                        Some("Пароль должен содержать хотя бы одну цифру".to_string());
                    return Task::none();
                }

                let email = self.user_email.trim().to_string();
                let email_re = Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap();
                if !email_re.is_match(&email) {
                    self.register_error = Some("Некорректный формат email.".to_string());
                    return Task::none();
                }

                self.register_error = None;
                let payload = RegisterPayload {
                    name: format!("{} {}", self.user_surname.trim(), self.user_name.trim()),
                    email,
                    birthday: format!(
                        "{:04}-{:02}-{:02}",
                        self.date.year, self.date.month, self.date.day
                    ),
                    password: self.user_password.clone(),
                    password_confirmation: self.user_password_repeat.clone(),
                };
                Task::perform(self.api.clone().register(payload), Message::Registered)
            }
            Message::Registered(result) => match result {
                Ok(session) => self.enter_session(session),
                Err(err @ ApiError::Validation { .. }) => {
                    self.dialogs
                        .show_validation(Some("Регистрация".to_string()), &err);
                    Task::none()
                }
                Err(err) => {
                    self.register_error = Some(err.to_string());
                    Task::none()
                }
            },
            Message::FirstNameChanged(v) => {
                self.user_name = v;
                Task::none()
            }
            Message::LastNameChanged(v) => {
                self.user_surname = v;
                Task::none()
            }
            Message::EmailChanged(v) => {
                self.user_email = v;
                Task::none()
            }
            Message::PasswordChanged(v) => {
                self.user_password = v;
                Task::none()
            }
            Message::PasswordRepeatChanged(v) => {
                self.user_password_repeat = v;
                Task::none()
            }
            Message::ChooseDate => {
                self.show_picker = true;
                Task::none()
            }
            Message::SubmitDate(date) => {
                self.date = date;
                self.show_picker = false;
                Task::none()
            }
            Message::CancelDate => {
                self.show_picker = false;
                Task::none()
            }
            Message::SwitchToLogin => {
                self.current_screen = Screen::Login;
                self.clear_fields();
                Task::none()
            }
            Message::SwitchToRegister => {
                self.current_screen = Screen::Register;
                self.clear_fields();
                Task::none()
            }
            Message::LogoutRequested => {
                self.dialogs.show_confirm(ConfirmParams {
                    kind: ConfirmKind::Warning,
                    title: "Выход".to_string(),
                    message: "Выйти из аккаунта?".to_string(),
                    confirm_label: Some("Выйти".to_string()),
                    cancel_label: None,
                    on_confirm: Message::LogoutConfirmed,
                });
                Task::none()
            }
            Message::LogoutConfirmed => {
                config::clear_session();
                self.reset_to_login("");
                Task::none()
            }
            Message::GoToProfile => {
                self.current_screen = Screen::Profile;
                Task::batch(vec![
                    Task::perform(self.api.clone().fetch_profile(), Message::ProfileLoaded),
                    Task::perform(
                        self.api.clone().fetch_achievements(),
                        Message::AchievementsLoaded,
                    ),
                ])
            }
            Message::GoToSettings => {
                self.current_screen = Screen::Settings;
                Task::none()
            }
            Message::GoToModules => {
                self.current_screen = Screen::Modules;
                Task::perform(self.api.clone().fetch_modules(), Message::ModulesLoaded)
            }
            Message::GoToCertificates => {
                self.current_screen = Screen::Certificates;
                Task::perform(
                    self.api.clone().fetch_certificates(),
                    Message::CertificatesLoaded,
                )
            }
            Message::GoToFinance => {
                self.current_screen = Screen::Finance;
                // Инструменты доступны только после подтверждения оплаты,
                // поэтому статус перепроверяется при каждом заходе
                match &self.payment_info {
                    Some(info) if info.status == crate::api::PaymentStatus::Approved => {
                        self.load_finance_data()
                    }
                    _ => Task::perform(
                        self.api.clone().fetch_payment_status(),
                        Message::PaymentStatusLoaded,
                    ),
                }
            }
            Message::GoToPayment => {
                self.current_screen = Screen::Payment;
                Task::perform(
                    self.api.clone().fetch_payment_status(),
                    Message::PaymentStatusLoaded,
                )
            }
            Message::ThemeSelected(name) => {
                if let Some(theme) = config::theme_from_str(name) {
                    let base = config::load_config().and_then(|c| c.api_base_url);
                    if let Err(e) = config::save_config(&theme, base) {
                        warn!("Не удалось сохранить конфигурацию: {}", e);
                    }
                    self.theme = theme;
                }
                Task::none()
            }
            Message::ProfileLoaded(result) => match result {
                Ok(user) => {
                    let avatar_task = match (&user.avatar_url, &self.user_avatar_data) {
                        (Some(url), None) => Task::perform(
                            self.api.clone().fetch_bytes(url.clone()),
                            Message::AvatarLoaded,
                        ),
                        _ => Task::none(),
                    };
                    self.current_user = Some(user);
                    avatar_task
                }
                Err(err) => self.report_api_error("Профиль", err),
            },
            Message::ChooseAvatar => {
                if self.current_user.is_none() {
                    return Task::none();
                }
                Task::perform(
                    async move {
                        spawn_blocking(move || {
                            let Some(path) = rfd::FileDialog::new()
                                .add_filter("Image", &["png", "jpg", "jpeg"])
                                .pick_file()
                            else {
                                return Err("Выбор файла аватара отменён.".to_string());
                            };
                            let data = std::fs::read(&path)
                                .map_err(|e| format!("Ошибка чтения файла аватара: {}", e))?;
                            // Битый файл отсеиваем до отправки на сервер
                            image::load_from_memory(&data)
                                .map_err(|_| "Файл не является изображением.".to_string())?;
                            let filename = path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| "avatar.png".to_string());
                            Ok((filename, data))
                        })
                        .await
                        .unwrap_or_else(|join_err| {
                            Err(format!("Задача выбора аватара завершилась ошибкой: {:?}", join_err))
                        })
                    },
                    Message::AvatarChosen,
                )
            }
            Message::AvatarChosen(result) => match result {
                Ok((filename, data)) => {
                    // Показываем сразу, сервер подтвердит загрузку отдельно
                    self.user_avatar_data = Some(data.clone());
                    self.error_message = "".to_string();
                    Task::perform(
                        self.api.clone().upload_avatar(data, filename),
                        Message::AvatarUploaded,
                    )
                }
                Err(e) => {
                    debug!("Аватар не выбран: {}", e);
                    self.error_message = e;
                    Task::none()
                }
            },
            Message::AvatarUploaded(result) => match result {
                Ok(user) => {
                    debug!("Аватар обновлён для пользователя {}", user.id);
                    self.current_user = Some(user);
                    Task::none()
                }
                Err(err) => self.report_api_error("Аватар", err),
            },
            Message::AvatarLoaded(result) => {
                match result {
                    Ok(data) => self.user_avatar_data = Some(data),
                    // Профиль остаётся рабочим и без картинки
                    Err(err) => debug!("Не удалось загрузить аватар: {}", err),
                }
                Task::none()
            }
            Message::AchievementsLoaded(result) => match result {
                Ok(list) => {
                    self.achievements = list;
                    Task::none()
                }
                Err(err) => self.report_api_error("Достижения", err),
            },
            Message::DismissAchievement(id) => {
                if let Some(item) = self.achievements.iter_mut().find(|a| a.id == id) {
                    item.seen = true;
                }
                // Отметка «прочитано» не стоит диалога об ошибке:
                // результат запроса осознанно отбрасывается
                Task::perform(self.api.clone().dismiss_achievement(id), |res| {
                    let _ = res;
                    Message::NoOp
                })
            }
            Message::ModulesLoaded(result) => match result {
                Ok(modules) => {
                    self.modules = modules;
                    Task::none()
                }
                Err(err) => self.report_api_error("Модули курса", err),
            },
            Message::ModuleFilterChanged(v) => {
                self.module_filter_text = v;
                Task::none()
            }
            Message::OpenQuiz(id) => {
                self.show_quiz_modal = true;
                self.active_quiz = None;
                self.quiz_answers.clear();
                self.quiz_error_message = None;
                Task::perform(self.api.clone().fetch_quiz(id), Message::QuizLoaded)
            }
            Message::QuizLoaded(result) => match result {
                Ok(quiz) => {
                    self.active_quiz = Some(quiz);
                    Task::none()
                }
                Err(err) => {
                    self.show_quiz_modal = false;
                    self.report_api_error("Тест", err)
                }
            },
            Message::AnswerSelected {
                question_id,
                option_index,
            } => {
                self.quiz_answers.insert(question_id, option_index);
                Task::none()
            }
            Message::SubmitQuiz => {
                let Some(quiz) = &self.active_quiz else {
                    return Task::none();
                };
                if self.quiz_answers.len() < quiz.questions.len() {
                    self.quiz_error_message = Some("Ответьте на все вопросы.".to_string());
                    return Task::none();
                }
                self.quiz_error_message = None;
                self.is_submitting_quiz = true;
                let answers = quiz
                    .questions
                    .iter()
                    .filter_map(|q| {
                        self.quiz_answers.get(&q.id).map(|idx| QuizAnswer {
                            question_id: q.id,
                            option_index: *idx,
                        })
                    })
                    .collect();
                Task::perform(
                    self.api.clone().submit_quiz(quiz.id, answers),
                    Message::QuizSubmitted,
                )
            }
            Message::QuizSubmitted(result) => {
                self.is_submitting_quiz = false;
                match result {
                    Ok(outcome) => {
                        self.show_quiz_modal = false;
                        self.active_quiz = None;
                        self.quiz_answers.clear();
                        if outcome.certificate_issued {
                            self.dialogs.show_alert(AlertParams {
                                kind: AlertKind::Success,
                                title: "Тест пройден".to_string(),
                                message: format!(
                                    "Результат: {:.0}%. Вам выдан сертификат!",
                                    outcome.score
                                ),
                                on_confirm: Some(Message::GoToCertificates),
                            });
                        } else if outcome.passed {
                            self.dialogs.show_success(
                                "Тест пройден",
                                format!("Результат: {:.0}%.", outcome.score),
                            );
                        } else {
                            self.dialogs.show_alert(AlertParams {
                                kind: AlertKind::Warning,
                                title: "Тест не пройден".to_string(),
                                message: format!(
                                    "Результат: {:.0}%. Попробуйте ещё раз после повторения материала.",
                                    outcome.score
                                ),
                                on_confirm: None,
                            });
                        }
                        Task::perform(self.api.clone().fetch_modules(), Message::ModulesLoaded)
                    }
                    Err(err) => self.report_api_error("Тест", err),
                }
            }
            Message::CloseQuizModal => {
                self.show_quiz_modal = false;
                self.active_quiz = None;
                self.quiz_answers.clear();
                self.quiz_error_message = None;
                Task::none()
            }
            Message::CertificatesLoaded(result) => match result {
                Ok(list) => {
                    self.certificates = list;
                    Task::none()
                }
                Err(err) => self.report_api_error("Сертификаты", err),
            },
            Message::OpenCertificate(url) => {
                if let Err(e) = open::that(&url) {
                    error!("Не удалось открыть сертификат {}: {}", url, e);
                    self.dialogs.show_error(
                        "Сертификат",
                        "Не удалось открыть ссылку в браузере.",
                    );
                }
                Task::none()
            }
            Message::FinanceTabSelected(tab) => {
                self.finance_tab = tab;
                Task::none()
            }
            Message::TransactionsLoaded(result) => match result {
                Ok(list) => {
                    self.transactions = list;
                    Task::none()
                }
                Err(err) => self.report_api_error("Операции", err),
            },
            Message::CategoriesLoaded(result) => match result {
                Ok(list) => {
                    self.categories = list;
                    Task::none()
                }
                Err(err) => self.report_api_error("Категории", err),
            },
            Message::BudgetsLoaded(result) => match result {
                Ok(list) => {
                    self.budgets = list;
                    Task::none()
                }
                Err(err) => self.report_api_error("Бюджеты", err),
            },
            Message::ToggleAddTransactionModal(show) => {
                self.show_add_transaction_modal = show;
                if show {
                    self.reset_new_transaction_form();
                }
                Task::none()
            }
            Message::NewTxAmountChanged(v) => {
                self.new_tx_amount = v;
                Task::none()
            }
            Message::NewTxNoteChanged(v) => {
                self.new_tx_note = v;
                Task::none()
            }
            Message::NewTxKindSelected(kind) => {
                self.new_tx_kind = kind;
                // Категории привязаны к типу операции
                self.new_tx_category = None;
                Task::none()
            }
            Message::NewTxCategorySelected(category) => {
                self.new_tx_category = Some(category);
                Task::none()
            }
            Message::ChooseTxDate => {
                self.show_tx_date_picker = true;
                Task::none()
            }
            Message::SubmitTxDate(date) => {
                self.new_tx_date = date;
                self.show_tx_date_picker = false;
                Task::none()
            }
            Message::CancelTxDate => {
                self.show_tx_date_picker = false;
                Task::none()
            }
            Message::SubmitNewTransaction => {
                let amount = self.new_tx_amount.trim().replace(',', ".");
                let amount = match amount.parse::<f64>() {
                    Ok(value) if value > 0.0 => value,
                    _ => {
                        self.dialogs
                            .show_error("Новая операция", "Сумма должна быть числом больше нуля.");
                        return Task::none();
                    }
                };
                self.is_saving_transaction = true;
                let payload = NewTransaction {
                    date: format!(
                        "{:04}-{:02}-{:02}",
                        self.new_tx_date.year, self.new_tx_date.month, self.new_tx_date.day
                    ),
                    amount,
                    kind: self.new_tx_kind,
                    category_id: self.new_tx_category.as_ref().map(|c| c.id),
                    note: self.new_tx_note.trim().to_string(),
                };
                Task::perform(
                    self.api.clone().create_transaction(payload),
                    Message::TransactionCreated,
                )
            }
            Message::TransactionCreated(result) => {
                self.is_saving_transaction = false;
                match result {
                    Ok(_) => {
                        self.show_add_transaction_modal = false;
                        self.reset_new_transaction_form();
                        Task::batch(vec![
                            Task::perform(
                                self.api.clone().fetch_transactions(),
                                Message::TransactionsLoaded,
                            ),
                            Task::perform(self.api.clone().fetch_budgets(), Message::BudgetsLoaded),
                        ])
                    }
                    Err(err @ ApiError::Validation { .. }) => {
                        self.dialogs
                            .show_validation(Some("Новая операция".to_string()), &err);
                        Task::none()
                    }
                    Err(err) => self.report_api_error("Новая операция", err),
                }
            }
            Message::DeleteTransaction(id) => {
                let description = self
                    .transactions
                    .iter()
                    .find(|t| t.id == id)
                    .map(|t| format!("{} от {}", format_amount(t.amount), format_date(&t.date)))
                    .unwrap_or_else(|| format!("№{}", id));
                self.dialogs.show_confirm(ConfirmParams {
                    kind: ConfirmKind::Danger,
                    title: "Удаление операции".to_string(),
                    message: format!("Удалить операцию {}?", description),
                    confirm_label: Some("Удалить".to_string()),
                    cancel_label: None,
                    on_confirm: Message::DeleteTransactionConfirmed(id),
                });
                Task::none()
            }
            Message::DeleteTransactionConfirmed(id) => {
                // Окно остаётся открытым с блокированными кнопками
                // до ответа сервера
                self.dialogs.set_confirm_busy(true);
                Task::perform(
                    self.api.clone().delete_transaction(id),
                    Message::TransactionDeleted,
                )
            }
            Message::TransactionDeleted(result) => {
                self.dialogs.close_confirm();
                match result {
                    Ok(()) => Task::batch(vec![
                        Task::perform(
                            self.api.clone().fetch_transactions(),
                            Message::TransactionsLoaded,
                        ),
                        Task::perform(self.api.clone().fetch_budgets(), Message::BudgetsLoaded),
                    ]),
                    Err(err) => self.report_api_error("Удаление операции", err),
                }
            }
            Message::RenameCategory(category) => {
                let id = category.id;
                self.dialogs.show_input(InputParams {
                    title: "Переименование категории".to_string(),
                    message: format!("Новое название для «{}»:", category.name),
                    placeholder: "Название категории".to_string(),
                    initial_value: category.name.clone(),
                    on_submit: Arc::new(move |name| Message::RenameCategorySubmitted { id, name }),
                });
                Task::none()
            }
            Message::RenameCategorySubmitted { id, name } => {
                self.dialogs.set_input_busy(true);
                Task::perform(
                    self.api.clone().rename_category(id, name),
                    Message::CategoryRenamed,
                )
            }
            Message::CategoryRenamed(result) => {
                self.dialogs.close_input();
                match result {
                    Ok(_) => Task::batch(vec![
                        Task::perform(
                            self.api.clone().fetch_categories(),
                            Message::CategoriesLoaded,
                        ),
                        Task::perform(
                            self.api.clone().fetch_transactions(),
                            Message::TransactionsLoaded,
                        ),
                    ]),
                    Err(err) => self.report_api_error("Категория", err),
                }
            }
            Message::DeleteCategory(category) => {
                self.dialogs.show_confirm(ConfirmParams {
                    kind: ConfirmKind::Danger,
                    title: "Удаление категории".to_string(),
                    message: format!(
                        "Удалить категорию «{}»? Операции останутся без категории.",
                        category.name
                    ),
                    confirm_label: Some("Удалить".to_string()),
                    cancel_label: None,
                    on_confirm: Message::DeleteCategoryConfirmed(category.id),
                });
                Task::none()
            }
            Message::DeleteCategoryConfirmed(id) => Task::perform(
                self.api.clone().delete_category(id),
                Message::CategoryDeleted,
            ),
            Message::CategoryDeleted(result) => match result {
                Ok(()) => Task::batch(vec![
                    Task::perform(
                        self.api.clone().fetch_categories(),
                        Message::CategoriesLoaded,
                    ),
                    Task::perform(
                        self.api.clone().fetch_transactions(),
                        Message::TransactionsLoaded,
                    ),
                    Task::perform(self.api.clone().fetch_budgets(), Message::BudgetsLoaded),
                ]),
                Err(err) => self.report_api_error("Удаление категории", err),
            },
            Message::EditBudgetLimit(budget) => {
                let id = budget.id;
                self.dialogs.show_input(InputParams {
                    title: "Лимит бюджета".to_string(),
                    message: format!("Месячный лимит для «{}»:", budget.category_name),
                    placeholder: "Сумма".to_string(),
                    initial_value: format!("{:.2}", budget.limit_amount),
                    on_submit: Arc::new(move |value| Message::BudgetLimitSubmitted { id, value }),
                });
                Task::none()
            }
            Message::BudgetLimitSubmitted { id, value } => {
                let parsed = value.trim().replace(',', ".").parse::<f64>();
                match parsed {
                    Ok(limit) if limit >= 0.0 => {
                        self.dialogs.set_input_busy(true);
                        Task::perform(
                            self.api.clone().set_budget_limit(id, limit),
                            Message::BudgetSaved,
                        )
                    }
                    _ => {
                        // Окно ввода уже закрылось, сообщаем отдельным алертом
                        self.dialogs
                            .show_error("Лимит бюджета", "Введите неотрицательное число.");
                        Task::none()
                    }
                }
            }
            Message::BudgetSaved(result) => {
                self.dialogs.close_input();
                match result {
                    Ok(_) => {
                        Task::perform(self.api.clone().fetch_budgets(), Message::BudgetsLoaded)
                    }
                    Err(err) => self.report_api_error("Лимит бюджета", err),
                }
            }
            Message::PaymentStatusLoaded(result) => match result {
                Ok(info) => {
                    let approved = info.status == crate::api::PaymentStatus::Approved;
                    self.payment_info = Some(info);
                    if approved && self.current_screen == Screen::Finance {
                        self.load_finance_data()
                    } else {
                        Task::none()
                    }
                }
                Err(err) => self.report_api_error("Оплата", err),
            },
            Message::PaymentCommentChanged(v) => {
                self.payment_comment = v;
                Task::none()
            }
            Message::ChooseReceipt => Task::perform(
                async move {
                    spawn_blocking(move || {
                        let Some(path) = rfd::FileDialog::new()
                            .add_filter("Квитанция", &["pdf", "png", "jpg", "jpeg"])
                            .pick_file()
                        else {
                            return Err("Выбор файла отменён.".to_string());
                        };
                        let data = std::fs::read(&path)
                            .map_err(|e| format!("Ошибка чтения файла: {}", e))?;
                        let filename = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| "receipt".to_string());
                        Ok((filename, data))
                    })
                    .await
                    .unwrap_or_else(|join_err| {
                        Err(format!("Задача выбора файла завершилась ошибкой: {:?}", join_err))
                    })
                },
                Message::ReceiptChosen,
            ),
            Message::ReceiptChosen(result) => {
                match result {
                    Ok(file) => self.receipt_file = Some(file),
                    Err(e) => debug!("Квитанция не выбрана: {}", e),
                }
                Task::none()
            }
            Message::SubmitPaymentProof => {
                let Some((filename, data)) = self.receipt_file.clone() else {
                    return Task::none();
                };
                self.is_submitting_payment = true;
                Task::perform(
                    self.api.clone().submit_payment_proof(
                        data,
                        filename,
                        self.payment_comment.trim().to_string(),
                    ),
                    Message::PaymentProofSubmitted,
                )
            }
            Message::PaymentProofSubmitted(result) => {
                self.is_submitting_payment = false;
                match result {
                    Ok(info) => {
                        self.payment_info = Some(info);
                        self.receipt_file = None;
                        self.payment_comment.clear();
                        self.dialogs.show_success(
                            "Квитанция отправлена",
                            "Доступ к финансовым инструментам откроется после проверки оплаты.",
                        );
                        Task::none()
                    }
                    Err(err @ ApiError::Validation { .. }) => {
                        self.dialogs
                            .show_validation(Some("Оплата".to_string()), &err);
                        Task::none()
                    }
                    Err(err) => self.report_api_error("Оплата", err),
                }
            }
            Message::Dialog(dialog_message) => self.handle_dialog(dialog_message),
            Message::NoOp => Task::none(),
        }
    }

    /// События четырёх прерывающих окон. Общее правило: после отправки
    /// сохранённого сообщения окно закрывается безусловно, даже если
    /// запущенная им операция потом завершится ошибкой. Открытым его
    /// держит только busy-флаг, выставленный обработчиком во время
    /// отправки (см. DeleteTransactionConfirmed).
    fn handle_dialog(&mut self, message: DialogMessage) -> Task<Message> {
        match message {
            DialogMessage::AlertAcknowledged => {
                let callback = self.dialogs.alert.on_confirm.take();
                self.dialogs.close_alert();
                match callback {
                    Some(msg) => self.update(msg),
                    None => Task::none(),
                }
            }
            DialogMessage::AlertBackdropPressed => {
                self.dialogs.close_alert();
                Task::none()
            }
            DialogMessage::ConfirmAccepted => {
                if self.dialogs.confirm.is_busy {
                    return Task::none();
                }
                let Some(callback) = self.dialogs.confirm.on_confirm.clone() else {
                    self.dialogs.close_confirm();
                    return Task::none();
                };
                let task = self.update(callback);
                if !self.dialogs.confirm.is_busy {
                    self.dialogs.close_confirm();
                }
                task
            }
            DialogMessage::ConfirmCancelled => {
                if !self.dialogs.confirm.is_busy {
                    self.dialogs.close_confirm();
                }
                Task::none()
            }
            DialogMessage::InputChanged(value) => {
                if !self.dialogs.input.is_busy {
                    self.dialogs.input.value = value;
                }
                Task::none()
            }
            DialogMessage::InputSubmitted => {
                if !self.dialogs.input.can_submit() {
                    return Task::none();
                }
                let Some(handler) = self.dialogs.input.on_submit.clone() else {
                    self.dialogs.close_input();
                    return Task::none();
                };
                let value = self.dialogs.input.value.trim().to_string();
                let task = self.update(handler(value));
                if !self.dialogs.input.is_busy {
                    self.dialogs.close_input();
                }
                task
            }
            DialogMessage::InputCancelled => {
                if !self.dialogs.input.is_busy {
                    self.dialogs.close_input();
                }
                Task::none()
            }
            DialogMessage::ValidationDismissed => {
                self.dialogs.close_validation();
                Task::none()
            }
        }
    }

    fn enter_session(&mut self, session: SessionData) -> Task<Message> {
        if let Err(e) = config::save_session(&config::Session {
            token: session.token.clone(),
            user: session.user.clone(),
        }) {
            warn!("Не удалось сохранить сессию: {}", e);
        }
        self.api.set_token(Some(session.token));
        let avatar_url = session.user.avatar_url.clone();
        self.current_user = Some(session.user);
        self.error_message = "".to_string();
        self.clear_fields();
        self.current_screen = Screen::Profile;

        let mut tasks = vec![
            Task::perform(
                self.api.clone().fetch_achievements(),
                Message::AchievementsLoaded,
            ),
            Task::perform(
                self.api.clone().fetch_payment_status(),
                Message::PaymentStatusLoaded,
            ),
        ];
        if let Some(url) = avatar_url {
            tasks.push(Task::perform(
                self.api.clone().fetch_bytes(url),
                Message::AvatarLoaded,
            ));
        }
        Task::batch(tasks)
    }

    /// Единая реакция на ошибки API: 401 выбрасывает на экран входа
    /// (аналог редиректа на /login), 422 раскрывается в окно валидации,
    /// остальное показывается алертом с сообщением сервера.
    fn report_api_error(&mut self, title: &str, err: ApiError) -> Task<Message> {
        match err {
            ApiError::Unauthorized => {
                config::clear_session();
                self.reset_to_login("Сессия истекла, войдите в систему заново.");
            }
            err @ ApiError::Validation { .. } => {
                self.dialogs.show_validation(Some(title.to_string()), &err);
            }
            err => {
                error!("{}: {}", title, err);
                self.dialogs.show_error(title, err.to_string());
            }
        }
        Task::none()
    }

    fn reset_to_login(&mut self, notice: &str) {
        let theme = self.theme.clone();
        *self = App::default();
        self.theme = theme;
        self.api.set_token(None);
        self.error_message = notice.to_string();
        self.current_screen = Screen::Login;
    }

    fn load_finance_data(&self) -> Task<Message> {
        Task::batch(vec![
            Task::perform(
                self.api.clone().fetch_transactions(),
                Message::TransactionsLoaded,
            ),
            Task::perform(
                self.api.clone().fetch_categories(),
                Message::CategoriesLoaded,
            ),
            Task::perform(self.api.clone().fetch_budgets(), Message::BudgetsLoaded),
        ])
    }

    fn reset_new_transaction_form(&mut self) {
        self.new_tx_amount.clear();
        self.new_tx_note.clear();
        self.new_tx_kind = crate::api::TransactionKind::Expense;
        self.new_tx_category = None;
        self.new_tx_date = iced_aw::date_picker::Date::today();
        self.show_tx_date_picker = false;
        self.is_saving_transaction = false;
    }

    fn clear_fields(&mut self) {
        self.user_name.clear();
        self.user_surname.clear();
        self.user_email.clear();
        self.user_password.clear();
        self.user_password_repeat.clear();
        self.register_error = None;
    }
}

pub fn format_amount(amount: f64) -> String {
    format!("{:.2} ₽", amount)
}

/// Даты сервер отдаёт как YYYY-MM-DD; в карточках показываем привычный формат.
pub fn format_date(raw: &str) -> String {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Budget, Category, TransactionKind};
    use crate::app::dialogs::AlertKind;

    fn app() -> App {
        App::default()
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            kind: TransactionKind::Expense,
        }
    }

    #[test]
    fn confirm_accept_dispatches_callback_and_closes() {
        let mut app = app();
        let _ = app.update(Message::LogoutRequested);
        assert!(app.dialogs.confirm.is_open);

        let _ = app.update(Message::Dialog(DialogMessage::ConfirmAccepted));

        // Обработчик выполнен (вернулись на экран входа), окно закрыто
        assert!(app.current_screen == Screen::Login);
        assert!(!app.dialogs.confirm.is_open);
        assert!(app.dialogs.confirm.on_confirm.is_none());
    }

    #[test]
    fn confirm_busy_flow_keeps_dialog_open_until_result() {
        let mut app = app();
        let _ = app.update(Message::DeleteTransaction(7));
        assert!(app.dialogs.confirm.is_open);
        assert!(!app.dialogs.confirm.is_busy);

        let _ = app.update(Message::Dialog(DialogMessage::ConfirmAccepted));
        // Обработчик выставил busy во время отправки, окно не закрылось
        assert!(app.dialogs.confirm.is_open);
        assert!(app.dialogs.confirm.is_busy);

        // Пока busy, отмена и повторное подтверждение игнорируются
        let _ = app.update(Message::Dialog(DialogMessage::ConfirmCancelled));
        assert!(app.dialogs.confirm.is_open);
        let _ = app.update(Message::Dialog(DialogMessage::ConfirmAccepted));
        assert!(app.dialogs.confirm.is_open);

        // Ответ сервера закрывает окно даже при ошибке
        let _ = app.update(Message::TransactionDeleted(Err(ApiError::Http {
            status: 500,
            message: "Server exploded".to_string(),
        })));
        assert!(!app.dialogs.confirm.is_open);
        assert!(!app.dialogs.confirm.is_busy);
        // Ошибка ушла в алерт, а не потерялась
        assert!(app.dialogs.alert.is_open);
        assert_eq!(app.dialogs.alert.kind, AlertKind::Error);
    }

    #[test]
    fn confirm_closes_even_when_action_fails_synchronously() {
        let mut app = app();
        app.dialogs.show_confirm(crate::app::dialogs::ConfirmParams {
            kind: crate::app::dialogs::ConfirmKind::Warning,
            title: "Лимит".to_string(),
            message: "Сбросить лимит?".to_string(),
            confirm_label: None,
            cancel_label: None,
            on_confirm: Message::BudgetLimitSubmitted {
                id: 1,
                value: "не число".to_string(),
            },
        });

        let _ = app.update(Message::Dialog(DialogMessage::ConfirmAccepted));

        // Действие провалилось, но окно подтверждения всё равно закрыто
        assert!(!app.dialogs.confirm.is_open);
        assert!(app.dialogs.alert.is_open);
        assert_eq!(app.dialogs.alert.kind, AlertKind::Error);
    }

    #[test]
    fn input_submit_is_noop_for_blank_value() {
        let mut app = app();
        let _ = app.update(Message::RenameCategory(category(3, "Продукты")));
        assert!(app.dialogs.input.is_open);
        assert_eq!(app.dialogs.input.value, "Продукты");

        // Пользователь стёр исходное значение
        let _ = app.update(Message::Dialog(DialogMessage::InputChanged("   ".to_string())));
        let _ = app.update(Message::Dialog(DialogMessage::InputSubmitted));

        // Обработчик не вызван: окно открыто и не busy
        assert!(app.dialogs.input.is_open);
        assert!(!app.dialogs.input.is_busy);
    }

    #[test]
    fn input_busy_flow_keeps_dialog_open_until_result() {
        let mut app = app();
        let _ = app.update(Message::RenameCategory(category(3, "Продукты")));
        let _ = app.update(Message::Dialog(DialogMessage::InputChanged("Еда".to_string())));
        let _ = app.update(Message::Dialog(DialogMessage::InputSubmitted));

        // Переименование ушло на сервер, окно ждёт ответа
        assert!(app.dialogs.input.is_open);
        assert!(app.dialogs.input.is_busy);

        let _ = app.update(Message::CategoryRenamed(Err(ApiError::Network(
            "Network Error".to_string(),
        ))));
        assert!(!app.dialogs.input.is_open);
        assert!(app.dialogs.alert.is_open);
    }

    #[test]
    fn budget_limit_input_closes_and_alerts_on_bad_number() {
        let mut app = app();
        let budget = Budget {
            id: 5,
            category_id: 3,
            category_name: "Продукты".to_string(),
            month: "2026-08".to_string(),
            limit_amount: 1000.0,
            spent: 250.0,
        };
        let _ = app.update(Message::EditBudgetLimit(budget));
        let _ = app.update(Message::Dialog(DialogMessage::InputChanged("abc".to_string())));
        let _ = app.update(Message::Dialog(DialogMessage::InputSubmitted));

        // Значение непустое, поэтому обработчик вызван; он не выставил
        // busy, поэтому окно закрылось, а ошибка показана алертом
        assert!(!app.dialogs.input.is_open);
        assert!(app.dialogs.alert.is_open);
        assert_eq!(app.dialogs.alert.kind, AlertKind::Error);
    }

    #[test]
    fn alert_callback_fires_on_acknowledge_only() {
        let mut app = app();
        app.dialogs.show_alert(crate::app::dialogs::AlertParams {
            kind: AlertKind::Success,
            title: "Тест пройден".to_string(),
            message: "Сертификат выдан".to_string(),
            on_confirm: Some(Message::GoToSettings),
        });

        // Клик по подложке закрывает без перехода
        let _ = app.update(Message::Dialog(DialogMessage::AlertBackdropPressed));
        assert!(!app.dialogs.alert.is_open);
        assert!(app.current_screen == Screen::Login);

        app.dialogs.show_alert(crate::app::dialogs::AlertParams {
            kind: AlertKind::Success,
            title: "Тест пройден".to_string(),
            message: "Сертификат выдан".to_string(),
            on_confirm: Some(Message::GoToSettings),
        });
        let _ = app.update(Message::Dialog(DialogMessage::AlertAcknowledged));
        assert!(!app.dialogs.alert.is_open);
        assert!(app.current_screen == Screen::Settings);
    }

    #[test]
    fn unauthorized_resets_session_and_returns_to_login() {
        let mut app = app();
        app.current_screen = Screen::Finance;
        let _ = app.update(Message::TransactionsLoaded(Err(ApiError::Unauthorized)));

        assert!(app.current_screen == Screen::Login);
        assert!(!app.error_message.is_empty());
    }

    #[test]
    fn validation_error_from_form_opens_validation_dialog() {
        let mut app = app();
        let err = ApiError::Validation {
            message: String::new(),
            errors: vec![("amount".to_string(), vec!["required".to_string()])],
        };
        let _ = app.update(Message::TransactionCreated(Err(err)));

        assert!(app.dialogs.validation.is_open);
        assert_eq!(app.dialogs.validation.fields.len(), 1);
        assert!(!app.dialogs.alert.is_open);
    }

    #[test]
    fn format_date_falls_back_to_raw_string() {
        assert_eq!(format_date("2026-08-07"), "07.08.2026");
        assert_eq!(format_date("вчера"), "вчера");
    }
}
