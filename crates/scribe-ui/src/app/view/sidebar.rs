use iced::widget::{button, column, container, horizontal_space, row, scrollable, text, Column, Space};
use iced::{Background, Border, Color, Element, Font, Length, Padding, Theme};

use scribe_core::workspace::FileNode;

use crate::app::{App, Message};
use crate::theme::colors;

impl App {
    pub fn view_sidebar(&self) -> Element<'_, Message> {
        let header = container(
            row![
                text("EXPLORER").size(11).color(colors::TEXT_SECONDARY),
                horizontal_space(),
            ]
            .align_y(iced::Alignment::Center),
        )
        .padding(Padding::from([10, 12]))
        .width(Length::Fill)
        .style(|_| container::Style {
            background: Some(Background::Color(colors::BG_MEDIUM)),
            ..Default::default()
        });

        let tree_content: Element<'_, Message> = match self.editor.workspace() {
            Some(workspace) => {
                let mut items: Vec<Element<'_, Message>> = Vec::new();
                for child in &workspace.tree().children {
                    self.build_file_tree_items(child, &mut items);
                }
                scrollable(Column::with_children(items).spacing(1).width(Length::Fill))
                    .height(Length::Fill)
                    .into()
            }
            None => container(
                column![
                    Space::with_height(40),
                    text("No folder open").size(13).color(colors::TEXT_MUTED),
                    Space::with_height(16),
                    button(text("Open Folder").size(13).color(colors::ACCENT))
                        .padding(Padding::from([8, 16]))
                        .style(|_, status| {
                            let bg = match status {
                                button::Status::Hovered => colors::BG_HOVER,
                                _ => colors::BG_LIGHT,
                            };
                            button::Style {
                                background: Some(Background::Color(bg)),
                                text_color: colors::ACCENT,
                                border: Border {
                                    color: colors::ACCENT,
                                    width: 1.0,
                                    radius: 4.0.into(),
                                },
                                ..Default::default()
                            }
                        })
                        .on_press(Message::OpenFolderDialog),
                ]
                .align_x(iced::Alignment::Center)
                .width(Length::Fill),
            )
            .height(Length::Fill)
            .into(),
        };

        container(column![header, tree_content])
            .width(Length::Fixed(self.editor.config().ui.sidebar_width))
            .height(Length::Fill)
            .style(|_| container::Style {
                background: Some(Background::Color(colors::BG_LIGHT)),
                border: Border {
                    color: colors::BORDER,
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    fn build_file_tree_items<'a>(
        &'a self,
        node: &'a FileNode,
        items: &mut Vec<Element<'a, Message>>,
    ) {
        items.push(self.make_file_item(node));

        if node.expanded {
            for child in &node.children {
                self.build_file_tree_items(child, items);
            }
        }
    }

    fn make_file_item<'a>(&'a self, node: &'a FileNode) -> Element<'a, Message> {
        let icon = if node.is_dir {
            if node.expanded { "[-]" } else { "[+]" }
        } else {
            Self::file_icon(&node.name)
        };

        let is_open = self
            .editor
            .active_doc()
            .and_then(|d| d.path().map(|p| p == node.path))
            .unwrap_or(false);

        let bg = if is_open {
            colors::BG_ACTIVE
        } else {
            Color::TRANSPARENT
        };

        let indent = (node.depth.saturating_sub(1) as f32) * 16.0 + 8.0;
        let path = node.path.clone();

        button(
            row![
                Space::with_width(Length::Fixed(indent)),
                text(icon)
                    .size(12)
                    .font(Font::MONOSPACE)
                    .color(colors::TEXT_MUTED),
                Space::with_width(6),
                text(node.name.as_str()).size(13).color(if is_open {
                    colors::TEXT_PRIMARY
                } else {
                    colors::TEXT_SECONDARY
                }),
            ]
            .align_y(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .padding(Padding::from([4, 0]))
        .style(move |_: &Theme, status| {
            let hover_bg = match status {
                button::Status::Hovered => colors::BG_HOVER,
                _ => bg,
            };
            button::Style {
                background: Some(Background::Color(hover_bg)),
                text_color: colors::TEXT_PRIMARY,
                border: Border::default(),
                ..Default::default()
            }
        })
        .on_press(if node.is_dir {
            Message::ToggleFolder(path)
        } else {
            Message::FileClicked(path)
        })
        .into()
    }

    fn file_icon(name: &str) -> &'static str {
        let ext = name.rsplit('.').next().unwrap_or("");
        match ext {
            "rs" => " rs",
            "py" => " py",
            "js" | "ts" | "jsx" | "tsx" => " js",
            "html" => " <>",
            "css" | "scss" | "sass" => " cs",
            "json" | "toml" | "yaml" | "yml" => " {}",
            "md" => " md",
            "txt" => " tx",
            "sh" | "bash" | "zsh" => " sh",
            _ => "  .",
        }
    }
}
