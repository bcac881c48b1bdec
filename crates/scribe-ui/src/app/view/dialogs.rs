use iced::widget::{button, column, container, row, text, text_input, Space};
use iced::{Background, Border, Color, Element, Length, Padding, Theme};

use crate::app::{App, Message};
use crate::theme::colors;

impl App {
    fn modal_box<'a>(content: Element<'a, Message>) -> Element<'a, Message> {
        container(
            container(content)
                .style(|_| container::Style {
                    background: Some(Background::Color(colors::BG_LIGHT)),
                    border: Border {
                        color: colors::BORDER,
                        width: 1.0,
                        radius: 6.0.into(),
                    },
                    ..Default::default()
                }),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }

    fn modal_button<'a>(label: &'a str, msg: Message, accent: bool) -> Element<'a, Message> {
        button(text(label).size(13).color(if accent {
            Color::WHITE
        } else {
            colors::TEXT_PRIMARY
        }))
        .padding(Padding::from([8, 20]))
        .style(move |_: &Theme, status: button::Status| {
            let bg = if accent {
                match status {
                    button::Status::Hovered => Color::from_rgb(0.42, 0.60, 0.95),
                    _ => colors::ACCENT,
                }
            } else {
                match status {
                    button::Status::Hovered => colors::BG_HOVER,
                    _ => colors::BG_MEDIUM,
                }
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: if accent { Color::WHITE } else { colors::TEXT_PRIMARY },
                border: Border {
                    color: colors::BORDER,
                    width: if accent { 0.0 } else { 1.0 },
                    radius: 4.0.into(),
                },
                ..Default::default()
            }
        })
        .on_press(msg)
        .into()
    }

    pub fn view_confirm_close_modal(&self) -> Element<'_, Message> {
        let name = self
            .pending_close
            .and_then(|pending| {
                self.editor
                    .split_tree()
                    .pane(pending.pane)
                    .and_then(|p| p.tabs.get(pending.index))
                    .map(|d| d.name().to_string())
            })
            .unwrap_or_else(|| "this file".to_string());

        Self::modal_box(
            column![
                text("Unsaved Changes").size(16).color(colors::TEXT_PRIMARY),
                Space::with_height(12),
                text(format!("Save changes to {}?", name))
                    .size(13)
                    .color(colors::TEXT_SECONDARY),
                Space::with_height(16),
                row![
                    Self::modal_button("Save", Message::ConfirmSave, true),
                    Space::with_width(12),
                    Self::modal_button("Discard", Message::ConfirmDiscard, false),
                    Space::with_width(12),
                    Self::modal_button("Cancel", Message::ConfirmCancel, false),
                ]
                .align_y(iced::Alignment::Center),
            ]
            .padding(24)
            .width(Length::Fixed(380.0))
            .into(),
        )
    }

    pub fn view_goto_line_modal(&self) -> Element<'_, Message> {
        let max_line = self
            .editor
            .active_doc()
            .map(|d| d.line_count())
            .unwrap_or(1);

        Self::modal_box(
            column![
                text("Go to Line").size(16).color(colors::TEXT_PRIMARY),
                Space::with_height(12),
                text(format!("Line number (1-{}):", max_line))
                    .size(13)
                    .color(colors::TEXT_SECONDARY),
                Space::with_height(8),
                text_input("", &self.goto_line_input)
                    .size(13)
                    .padding(Padding::from([6, 8]))
                    .on_input(Message::GotoLineInputChanged)
                    .on_submit(Message::GotoLineConfirm),
                Space::with_height(16),
                row![
                    Self::modal_button("Go", Message::GotoLineConfirm, true),
                    Space::with_width(12),
                    Self::modal_button("Cancel", Message::GotoLineCancel, false),
                ]
                .align_y(iced::Alignment::Center),
            ]
            .padding(24)
            .width(Length::Fixed(320.0))
            .into(),
        )
    }

    pub fn view_error_modal(&self) -> Element<'_, Message> {
        let message = self.error_message.clone().unwrap_or_default();

        Self::modal_box(
            column![
                text("Error").size(16).color(Color::from_rgb(0.9, 0.4, 0.4)),
                Space::with_height(12),
                text(message).size(13).color(colors::TEXT_SECONDARY),
                Space::with_height(16),
                row![Self::modal_button("OK", Message::DismissError, true)],
            ]
            .padding(24)
            .width(Length::Fixed(420.0))
            .into(),
        )
    }

    pub fn view_about_modal(&self) -> Element<'_, Message> {
        Self::modal_box(
            column![
                text("Scribe").size(18).color(colors::TEXT_PRIMARY),
                Space::with_height(8),
                text(format!("Version {}", env!("CARGO_PKG_VERSION")))
                    .size(12)
                    .color(colors::TEXT_MUTED),
                Space::with_height(12),
                text("A tabbed, split-pane text editor built in Rust.")
                    .size(13)
                    .color(colors::TEXT_SECONDARY),
                Space::with_height(8),
                text("Tabs, split views, find and replace, line operations,\nand a workspace file tree.")
                    .size(12)
                    .color(colors::TEXT_MUTED),
                Space::with_height(16),
                row![Self::modal_button("Close", Message::HideAbout, true)],
            ]
            .padding(24)
            .width(Length::Fixed(380.0))
            .into(),
        )
    }
}
