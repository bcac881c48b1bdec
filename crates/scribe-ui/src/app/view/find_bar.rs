use iced::widget::{button, checkbox, column, container, horizontal_space, row, text, text_input};
use iced::{Background, Border, Element, Length, Padding, Theme};

use crate::app::{App, Message};
use crate::theme::colors;

impl App {
    pub fn view_find_bar(&self) -> Element<'_, Message> {
        let find = self.editor.find();

        let match_label = if find.query.is_empty() {
            String::new()
        } else {
            format!("{} matches", self.editor.match_count())
        };

        let find_row = row![
            text("Find:").size(12).color(colors::TEXT_SECONDARY).width(60),
            text_input("Search text...", &find.query)
                .size(13)
                .padding(Padding::from([4, 8]))
                .on_input(Message::FindQueryChanged)
                .on_submit(Message::FindNext),
            Self::bar_button("<", Message::FindPrevious),
            Self::bar_button(">", Message::FindNext),
            text(match_label).size(12).color(colors::TEXT_MUTED).width(90),
        ]
        .spacing(6)
        .align_y(iced::Alignment::Center);

        let replace_row = row![
            text("Replace:").size(12).color(colors::TEXT_SECONDARY).width(60),
            text_input("Replace with...", &find.replacement)
                .size(13)
                .padding(Padding::from([4, 8]))
                .on_input(Message::ReplacementChanged)
                .on_submit(Message::Replace),
            Self::bar_button("Replace", Message::Replace),
            Self::bar_button("Replace All", Message::ReplaceAll),
        ]
        .spacing(6)
        .align_y(iced::Alignment::Center);

        let options_row = row![
            checkbox("Case Sensitive", find.case_sensitive)
                .size(14)
                .text_size(12)
                .on_toggle(Message::ToggleCaseSensitive),
            checkbox("Whole Word", find.whole_word)
                .size(14)
                .text_size(12)
                .on_toggle(Message::ToggleWholeWord),
            horizontal_space(),
            Self::bar_button("x", Message::CloseFind),
        ]
        .spacing(16)
        .align_y(iced::Alignment::Center);

        container(
            column![find_row, replace_row, options_row]
                .spacing(4)
                .padding(8),
        )
        .width(Length::Fill)
        .style(|_| container::Style {
            background: Some(Background::Color(colors::BG_MEDIUM)),
            border: Border {
                color: colors::BORDER,
                width: 1.0,
                radius: 0.0.into(),
            },
            ..Default::default()
        })
        .into()
    }

    fn bar_button(label: &str, msg: Message) -> Element<'_, Message> {
        button(text(label.to_string()).size(12).color(colors::TEXT_PRIMARY))
            .padding(Padding::from([4, 10]))
            .style(|_: &Theme, status| {
                let bg = match status {
                    button::Status::Hovered => colors::BG_HOVER,
                    button::Status::Pressed => colors::BG_ACTIVE,
                    _ => colors::BG_LIGHT,
                };
                button::Style {
                    background: Some(Background::Color(bg)),
                    text_color: colors::TEXT_PRIMARY,
                    border: Border {
                        color: colors::BORDER,
                        width: 1.0,
                        radius: 3.0.into(),
                    },
                    ..Default::default()
                }
            })
            .on_press(msg)
            .into()
    }
}
