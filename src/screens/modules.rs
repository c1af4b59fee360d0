use iced::widget::container::{background, bordered_box};
use iced::widget::{button, horizontal_space, row, text, Button, Column, Container, Row, Rule,
    Scrollable, Stack, Text, TextInput};
use iced::{Alignment, Color, Length};
use iced_font_awesome::fa_icon_solid;

use crate::api::CourseModule;
use crate::app::{App, Message};
use crate::screens::nav_menu::icon_button_content;

fn module_header(app: &App, module: &CourseModule) -> Row<'static, Message> {
    let status_icon = if module.completed { "circle-check" } else { "circle-half-stroke" };
    row![
        fa_icon_solid(status_icon).style({
            let theme = app.theme.clone();
            move |_| text::base(&theme)
        }),
        Text::new(format!("{}. {}", module.position, module.title)).size(24),
        horizontal_space(),
    ]
    .spacing(10)
    .width(Length::Fill)
    .align_y(Alignment::Center)
}

fn module_content(module: &CourseModule, app: &App) -> Column<'static, Message> {
    let mut lessons_col = Column::new().spacing(3);
    for lesson in &module.lessons {
        let mark = if lesson.completed { "✓" } else { "•" };
        lessons_col = lessons_col.push(Text::new(format!("{} {}", mark, lesson.title)).size(15));
    }

    let mut content_col = Column::new()
        .spacing(8)
        .push(Text::new(module.description.clone()).size(15))
        .push(lessons_col);

    if let Some(quiz) = &module.quiz {
        let score_text = match quiz.best_score {
            Some(score) => format!("Лучший результат: {:.0}%", score),
            None => "Тест ещё не пройден".to_string(),
        };
        let quiz_row = Row::new()
            .spacing(10)
            .align_y(Alignment::Center)
            .push(Text::new(format!("Тест: {} ({} вопросов)", quiz.title, quiz.question_count)).size(15))
            .push(Text::new(score_text).size(15))
            .push(horizontal_space())
            .push(
                Button::new(icon_button_content(
                    fa_icon_solid("pen-to-square").style({
                        let theme = app.theme.clone();
                        move |_| text::base(&theme)
                    }),
                    "Пройти тест",
                ))
                .on_press(Message::OpenQuiz(quiz.id)),
            );
        content_col = content_col.push(Rule::horizontal(5)).push(quiz_row);
    }

    content_col.padding(10)
}

pub fn modules_screen(app: &App) -> Container<Message> {
    let filter = app.module_filter_text.to_lowercase();
    let filtered: Vec<&CourseModule> = app
        .modules
        .iter()
        .filter(|m| {
            m.title.to_lowercase().contains(&filter)
                || m.description.to_lowercase().contains(&filter)
        })
        .collect();

    let mut modules_column = Column::new().spacing(15).padding(20);

    modules_column = modules_column.push(
        Row::new()
            .push(Text::new("Модули курса").size(30))
            .push(horizontal_space())
            .push(
                TextInput::new("Поиск по модулям...", &app.module_filter_text)
                    .on_input(Message::ModuleFilterChanged)
                    .padding(10)
                    .size(16)
                    .width(Length::Fixed(300.0)),
            )
            .spacing(10)
            .align_y(Alignment::Center),
    );

    for module in filtered {
        modules_column = modules_column.push(
            Container::new(
                Column::new()
                    .push(Container::new(module_header(app, module)).padding(10))
                    .push(module_content(module, app)),
            )
            .style(move |_| bordered_box(&app.theme))
            .padding(5)
            .width(Length::Fill),
        );
    }

    let scrollable_modules = Scrollable::new(modules_column)
        .width(Length::Fill)
        .height(Length::Fill);

    let base_ui = Container::new(scrollable_modules)
        .width(Length::Fill)
        .height(Length::Fill);

    let mut ui_stack = Stack::new().push(base_ui);

    // --- Модальное окно теста ---
    // Окно теста остаётся локальным для экрана: это форма с данными,
    // а не прерывающий диалог из общего реестра
    if app.show_quiz_modal {
        let modal_body: Column<Message> = match &app.active_quiz {
            None => Column::new().push(Text::new("Загрузка теста...").size(18)),
            Some(quiz) => {
                let mut questions_col = Column::new().spacing(15);
                for (number, question) in quiz.questions.iter().enumerate() {
                    let mut options_col = Column::new().spacing(5);
                    let selected = app.quiz_answers.get(&question.id).copied();
                    for (idx, option) in question.options.iter().enumerate() {
                        let style = if selected == Some(idx) {
                            button::primary
                        } else {
                            button::secondary
                        };
                        options_col = options_col.push(
                            Button::new(Text::new(option.clone()).size(15))
                                .style(style)
                                .width(Length::Fill)
                                .on_press(Message::AnswerSelected {
                                    question_id: question.id,
                                    option_index: idx,
                                }),
                        );
                    }
                    questions_col = questions_col.push(
                        Column::new()
                            .spacing(5)
                            .push(Text::new(format!("{}. {}", number + 1, question.text)).size(17))
                            .push(options_col),
                    );
                }

                let submit_label = if app.is_submitting_quiz {
                    "Отправка..."
                } else {
                    "Завершить тест"
                };
                let mut submit_button = Button::new(Text::new(submit_label)).padding(10);
                if !app.is_submitting_quiz {
                    submit_button = submit_button.on_press(Message::SubmitQuiz);
                }

                let mut col = Column::new()
                    .spacing(15)
                    .push(Text::new(quiz.title.clone()).size(24))
                    .push(Scrollable::new(questions_col).height(Length::FillPortion(3)))
                    .push(Rule::horizontal(10));
                if let Some(error_msg) = &app.quiz_error_message {
                    col = col.push(Text::new(error_msg.clone()).size(16));
                }
                col.push(
                    Row::new()
                        .spacing(10)
                        .push(horizontal_space())
                        .push(button("Закрыть").on_press(Message::CloseQuizModal))
                        .push(submit_button),
                )
            }
        };

        let quiz_modal_container = Container::new(modal_body)
            .style(move |_| bordered_box(&app.theme))
            .padding(20)
            .height(Length::Fixed(600.0))
            .width(Length::Fixed(700.0));

        let quiz_modal_overlay = Container::new(
            Container::new(quiz_modal_container).center(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| background(Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 }));
        ui_stack = ui_stack.push(quiz_modal_overlay);
    }

    Container::new(ui_stack)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
}
