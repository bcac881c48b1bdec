use iced::widget::{button, column, container, horizontal_space, row, text, text_editor, Row, Space};
use iced::{Background, Border, Color, Element, Font, Length, Padding, Theme};

use scribe_core::{Orientation, Pane, PaneId, SplitNode};

use crate::app::{App, Message};
use crate::theme::colors;

impl App {
    pub fn view_main_area(&self) -> Element<'_, Message> {
        match self.editor.split_tree().root() {
            Some(root) => self.view_split_node(root),
            None => container(text("No pane open").size(16).color(colors::TEXT_MUTED))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        }
    }

    /// Renders the split tree recursively: leaves become panes, internal
    /// nodes become rows or columns per their orientation.
    fn view_split_node<'a>(&'a self, node: &'a SplitNode) -> Element<'a, Message> {
        match node {
            SplitNode::Leaf(pane) => self.view_pane(pane),
            SplitNode::Split {
                orientation,
                children,
            } => {
                let first = self.view_split_node(&children[0]);
                let second = self.view_split_node(&children[1]);
                match orientation {
                    Orientation::Horizontal => row![first, second]
                        .spacing(1)
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .into(),
                    Orientation::Vertical => column![first, second]
                        .spacing(1)
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .into(),
                }
            }
        }
    }

    fn view_pane<'a>(&'a self, pane: &'a Pane) -> Element<'a, Message> {
        let pane_id = pane.id();
        let show_focus =
            self.editor.split_tree().pane_count() > 1 && self.editor.active_pane_id() == pane_id;

        let pane_view = column![self.view_tabs(pane), self.view_editor(pane)]
            .width(Length::Fill)
            .height(Length::Fill);

        container(pane_view)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_| container::Style {
                border: Border {
                    color: if show_focus {
                        colors::ACCENT
                    } else {
                        colors::BORDER
                    },
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    fn view_tabs<'a>(&'a self, pane: &'a Pane) -> Element<'a, Message> {
        let pane_id = pane.id();
        let mut tabs_vec: Vec<Element<'a, Message>> = Vec::new();

        for index in 0..pane.tabs.len() {
            let is_active = pane.tabs.active_index() == index;
            tabs_vec.push(self.make_tab(pane_id, index, pane.tabs.title(index), is_active));
        }

        tabs_vec.push(horizontal_space().into());

        let tabs_row = Row::with_children(tabs_vec)
            .spacing(1)
            .align_y(iced::Alignment::End);

        container(tabs_row)
            .width(Length::Fill)
            .height(32)
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

    fn make_tab(
        &self,
        pane_id: PaneId,
        index: usize,
        title: String,
        is_active: bool,
    ) -> Element<'_, Message> {
        let close_btn = button(text("x").size(12).color(colors::TEXT_MUTED))
            .padding(Padding::from([1, 5]))
            .style(|_, status| {
                let bg = match status {
                    button::Status::Hovered => colors::BG_HOVER,
                    _ => Color::TRANSPARENT,
                };
                button::Style {
                    background: Some(Background::Color(bg)),
                    text_color: colors::TEXT_PRIMARY,
                    border: Border {
                        radius: 2.0.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                }
            })
            .on_press(Message::CloseTab(pane_id, index));

        let tab_content = row![
            text(title).size(13).color(if is_active {
                colors::TEXT_PRIMARY
            } else {
                colors::TEXT_SECONDARY
            }),
            Space::with_width(8),
            close_btn,
        ]
        .align_y(iced::Alignment::Center);

        let bg = if is_active {
            colors::BG_DARK
        } else {
            colors::BG_MEDIUM
        };

        button(tab_content)
            .padding(Padding::from([6, 12]))
            .style(move |_: &Theme, status| {
                let hover_bg = match status {
                    button::Status::Hovered if !is_active => colors::BG_HOVER,
                    _ => bg,
                };
                button::Style {
                    background: Some(Background::Color(hover_bg)),
                    text_color: colors::TEXT_PRIMARY,
                    border: Border {
                        color: if is_active {
                            colors::ACCENT
                        } else {
                            Color::TRANSPARENT
                        },
                        width: if is_active { 2.0 } else { 0.0 },
                        radius: 0.0.into(),
                    },
                    ..Default::default()
                }
            })
            .on_press(Message::TabSelected(pane_id, index))
            .into()
    }

    fn view_editor<'a>(&'a self, pane: &'a Pane) -> Element<'a, Message> {
        let pane_id = pane.id();
        let content = pane
            .tabs
            .active_doc()
            .and_then(|doc| self.contents.get(&doc.id()));

        if let Some(content) = content {
            // text_editor scrolls natively; wrapping it in scrollable()
            // would reset the scroll position on every re-render
            text_editor(content)
                .height(Length::Fill)
                .padding(iced::Padding {
                    top: 12.0,
                    right: 16.0,
                    bottom: 12.0,
                    left: 12.0,
                })
                .font(Font::MONOSPACE)
                .size(self.font_size)
                .style(|_theme: &Theme, _status| text_editor::Style {
                    background: Background::Color(colors::BG_DARK),
                    border: Border {
                        width: 0.0,
                        radius: 0.0.into(),
                        color: Color::TRANSPARENT,
                    },
                    icon: colors::TEXT_MUTED,
                    placeholder: colors::TEXT_MUTED,
                    value: colors::TEXT_PRIMARY,
                    selection: colors::SELECTION,
                })
                .on_action(move |action| Message::EditorAction(pane_id, action))
                .into()
        } else {
            container(text("No file open").size(16).color(colors::TEXT_MUTED))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(|_| container::Style {
                    background: Some(Background::Color(colors::BG_DARK)),
                    ..Default::default()
                })
                .into()
        }
    }
}
