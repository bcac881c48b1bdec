pub mod dialogs;
pub mod editor;
pub mod find_bar;
pub mod menus;
pub mod sidebar;

use iced::widget::{container, mouse_area, row, stack, Space};
use iced::{Background, Color, Element, Length};

use crate::app::{App, Message};
use crate::theme::colors;

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let mut main_items: Vec<Element<'_, Message>> = vec![
            self.view_toolbar(),
            row![
                if self.sidebar_visible {
                    self.view_sidebar()
                } else {
                    container(Space::new(0, 0)).into()
                },
                self.view_main_area(),
            ]
            .height(Length::Fill)
            .into(),
        ];

        if self.editor.find().open {
            main_items.push(self.view_find_bar());
        }
        main_items.push(self.view_status_bar());

        let main_view: Element<'_, Message> = container(iced::widget::Column::with_children(
            main_items,
        ))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_| container::Style {
            background: Some(Background::Color(colors::BG_DARK)),
            ..Default::default()
        })
        .into();

        // Modal overlays, topmost first
        if self.error_message.is_some() {
            self.overlay(main_view, Message::DismissError, self.view_error_modal())
        } else if self.pending_close.is_some() {
            self.overlay(main_view, Message::ConfirmCancel, self.view_confirm_close_modal())
        } else if self.goto_line_visible {
            self.overlay(main_view, Message::GotoLineCancel, self.view_goto_line_modal())
        } else if self.about_visible {
            self.overlay(main_view, Message::HideAbout, self.view_about_modal())
        } else if self.active_menu.is_some() {
            stack![
                mouse_area(
                    container(Space::new(Length::Fill, Length::Fill))
                        .width(Length::Fill)
                        .height(Length::Fill)
                )
                .on_press(Message::CloseTopMenu),
                main_view,
                self.view_menu_dropdown(),
            ]
            .into()
        } else {
            main_view
        }
    }

    /// Dims the screen behind a centered modal; clicking outside dismisses.
    fn overlay<'a>(
        &self,
        base: Element<'a, Message>,
        on_dismiss: Message,
        modal: Element<'a, Message>,
    ) -> Element<'a, Message> {
        stack![
            base,
            mouse_area(
                container(Space::new(Length::Fill, Length::Fill))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .style(|_| container::Style {
                        background: Some(Background::Color(Color::from_rgba(
                            0.0, 0.0, 0.0, 0.5
                        ))),
                        ..Default::default()
                    })
            )
            .on_press(on_dismiss),
            modal,
        ]
        .into()
    }

    pub fn view_status_bar(&self) -> Element<'_, Message> {
        use iced::widget::{horizontal_space, text};

        let position = self
            .editor
            .active_doc()
            .map(|doc| {
                let pos = doc.cursor_position();
                format!("Line {}, Column {}", pos.line + 1, pos.column + 1)
            })
            .unwrap_or_default();

        container(
            row![
                text(self.status_message.clone())
                    .size(12)
                    .color(colors::TEXT_SECONDARY),
                horizontal_space(),
                text(position).size(12).color(colors::TEXT_SECONDARY),
            ]
            .padding(iced::Padding::from([4, 12]))
            .align_y(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .style(|_| container::Style {
            background: Some(Background::Color(colors::BG_MEDIUM)),
            border: iced::Border {
                color: colors::BORDER,
                width: 1.0,
                radius: 0.0.into(),
            },
            ..Default::default()
        })
        .into()
    }
}
