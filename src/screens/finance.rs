use iced::widget::container::{background, bordered_box};
use iced::widget::{button, column, horizontal_space, row, text, Button, Column, Container,
    PickList, Row, Scrollable, Stack, Text, TextInput};
use iced::{Alignment, Center, Color, Length};
use iced_aw::date_picker;
use iced_font_awesome::fa_icon_solid;

use crate::api::{PaymentStatus, TransactionKind};
use crate::app::state::FinanceTab;
use crate::app::update::{format_amount, format_date};
use crate::app::{App, Message};
use crate::screens::nav_menu::icon_button_content;

pub fn finance_screen(app: &App) -> Container<Message> {
    let approved = app
        .payment_info
        .as_ref()
        .map(|info| info.status == PaymentStatus::Approved)
        .unwrap_or(false);

    // Финансовые инструменты открываются только после подтверждения
    // оплаты, до этого вместо вкладок заглушка
    if !approved {
        return locked_panel(app);
    }

    let mut tabs_row = Row::new().spacing(10);
    for tab in FinanceTab::ALL {
        let style = if *tab == app.finance_tab {
            button::primary
        } else {
            button::secondary
        };
        tabs_row = tabs_row.push(
            Button::new(Text::new(tab.to_string()))
                .style(style)
                .on_press(Message::FinanceTabSelected(*tab)),
        );
    }

    let tab_content: Column<Message> = match app.finance_tab {
        FinanceTab::Transactions => transactions_tab(app),
        FinanceTab::Budgets => budgets_tab(app),
        FinanceTab::Categories => categories_tab(app),
    };

    let layout = Column::new()
        .spacing(15)
        .padding(20)
        .push(Text::new("Финансовые инструменты").size(30))
        .push(tabs_row)
        .push(Scrollable::new(tab_content).width(Length::Fill).height(Length::Fill));

    let base_ui = Container::new(layout)
        .width(Length::Fill)
        .height(Length::Fill);

    let mut ui_stack = Stack::new().push(base_ui);

    // --- Модальное окно новой операции ---
    if app.show_add_transaction_modal {
        ui_stack = ui_stack.push(add_transaction_modal(app));
    }

    Container::new(ui_stack)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
}

fn locked_panel(app: &App) -> Container<Message> {
    let status_line = match &app.payment_info {
        Some(info) if info.status == PaymentStatus::Pending => {
            "Оплата на проверке. Доступ откроется после подтверждения."
        }
        Some(info) if info.status == PaymentStatus::Rejected => {
            "Оплата отклонена. Загрузите квитанцию ещё раз."
        }
        _ => "Раздел доступен после оплаты и её ручного подтверждения.",
    };

    let content = column![
        fa_icon_solid("lock").size(48.0).style(move |_| text::base(&app.theme)),
        text("Финансовые инструменты закрыты").size(26),
        text(status_line).size(16),
        button("Перейти к оплате").on_press(Message::GoToPayment).padding(10),
    ]
    .spacing(20)
    .align_x(Center);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
}

fn transactions_tab(app: &App) -> Column<Message> {
    let mut col = Column::new().spacing(15).push(
        Row::new().push(
            Button::new(icon_button_content(
                fa_icon_solid("plus").style(move |_| text::base(&app.theme)),
                "Добавить операцию",
            ))
            .on_press(Message::ToggleAddTransactionModal(true)),
        ),
    );

    if app.transactions.is_empty() {
        col = col.push(Text::new("Операций пока нет.").size(16));
    }

    for transaction in &app.transactions {
        let sign = match transaction.kind {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "−",
        };
        let header = Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(Text::new(format!("{}{}", sign, format_amount(transaction.amount))).size(20))
            .push(Text::new(format_date(&transaction.date)).size(16))
            .push(horizontal_space())
            .push(
                button(fa_icon_solid("xmark").style(move |_| text::base(&app.theme)))
                    .on_press(Message::DeleteTransaction(transaction.id)),
            );

        let mut info = Column::new().spacing(3).push(
            Text::new(format!(
                "Категория: {}",
                transaction.category_name.clone().unwrap_or_else(|| "без категории".to_string())
            ))
            .size(15),
        );
        if let Some(note) = &transaction.note {
            if !note.is_empty() {
                info = info.push(Text::new(note.clone()).size(14));
            }
        }

        col = col.push(
            Container::new(Column::new().push(header).push(info).spacing(8))
                .style(move |_| bordered_box(&app.theme))
                .padding(10)
                .width(Length::Fill),
        );
    }
    col
}

fn budgets_tab(app: &App) -> Column<Message> {
    let mut col = Column::new().spacing(15);

    if app.budgets.is_empty() {
        col = col.push(Text::new("Бюджеты появятся после создания категорий.").size(16));
    }

    for budget in &app.budgets {
        let over_limit = budget.spent > budget.limit_amount;
        let status = if over_limit {
            "лимит превышен"
        } else {
            "в пределах лимита"
        };
        let header = Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(Text::new(budget.category_name.clone()).size(20))
            .push(Text::new(budget.month.clone()).size(15))
            .push(horizontal_space())
            .push(
                Button::new(icon_button_content(
                    fa_icon_solid("pen").style(move |_| text::base(&app.theme)),
                    "Изменить лимит",
                ))
                .on_press(Message::EditBudgetLimit(budget.clone())),
            );

        let info = Text::new(format!(
            "Потрачено {} из {} — {}",
            format_amount(budget.spent),
            format_amount(budget.limit_amount),
            status
        ))
        .size(15);

        col = col.push(
            Container::new(Column::new().push(header).push(info).spacing(8))
                .style(move |_| bordered_box(&app.theme))
                .padding(10)
                .width(Length::Fill),
        );
    }
    col
}

fn categories_tab(app: &App) -> Column<Message> {
    let mut col = Column::new().spacing(10);

    if app.categories.is_empty() {
        col = col.push(Text::new("Категорий пока нет.").size(16));
    }

    for category in &app.categories {
        let category_row = Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(Text::new(category.name.clone()).size(17))
            .push(Text::new(format!("({})", category.kind)).size(14))
            .push(horizontal_space())
            .push(
                // Переименование идёт через общее окно ввода
                button(fa_icon_solid("pen").style(move |_| text::base(&app.theme)))
                    .on_press(Message::RenameCategory(category.clone())),
            )
            .push(
                button(fa_icon_solid("xmark").style(move |_| text::base(&app.theme)))
                    .on_press(Message::DeleteCategory(category.clone())),
            );

        col = col.push(
            Container::new(category_row)
                .style(move |_| bordered_box(&app.theme))
                .padding(8)
                .width(Length::Fill),
        );
    }
    col
}

fn add_transaction_modal(app: &App) -> Container<Message> {
    let date_button = Button::new(Text::new("Дата")).on_press(Message::ChooseTxDate);

    // В списке только категории подходящего типа
    let categories: Vec<crate::api::Category> = app
        .categories
        .iter()
        .filter(|c| c.kind == app.new_tx_kind)
        .cloned()
        .collect();

    let submit_label = if app.is_saving_transaction {
        "Сохранение..."
    } else {
        "Добавить"
    };
    let mut submit_button = Button::new(Text::new(submit_label));
    if !app.is_saving_transaction {
        submit_button = submit_button.on_press(Message::SubmitNewTransaction);
    }

    let modal_content = column![
        Text::new("Новая операция").size(24),
        PickList::new(
            TransactionKind::ALL.to_vec(),
            Some(app.new_tx_kind),
            Message::NewTxKindSelected
        )
        .placeholder("Тип операции"),
        TextInput::new("Сумма", &app.new_tx_amount)
            .on_input(Message::NewTxAmountChanged)
            .padding(10),
        PickList::new(
            categories,
            app.new_tx_category.clone(),
            Message::NewTxCategorySelected
        )
        .placeholder("Категория"),
        row![
            Text::new(format!(
                "{:02}.{:02}.{:04}",
                app.new_tx_date.day, app.new_tx_date.month, app.new_tx_date.year
            )),
            date_picker(
                app.show_tx_date_picker,
                app.new_tx_date,
                date_button,
                Message::CancelTxDate,
                Message::SubmitTxDate
            ),
        ]
        .spacing(10)
        .align_y(Center),
        TextInput::new("Заметка", &app.new_tx_note)
            .on_input(Message::NewTxNoteChanged)
            .padding(10),
        row![
            Button::new(Text::new("Отмена"))
                .on_press(Message::ToggleAddTransactionModal(false)),
            submit_button,
        ]
        .spacing(10),
    ]
    .spacing(10);

    let modal_container = Container::new(modal_content)
        .style(move |_| bordered_box(&app.theme))
        .padding(20)
        .width(Length::Fixed(400.0));

    Container::new(Container::new(modal_container).center(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }))
}
