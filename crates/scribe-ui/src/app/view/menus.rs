use iced::widget::{button, column, container, horizontal_space, row, text, Column, Row, Space};
use iced::{Background, Border, Color, Element, Length, Padding, Theme};

use scribe_core::Command;

use crate::app::{App, Message, TopMenu};
use crate::theme::colors;

impl App {
    pub fn view_toolbar(&self) -> Element<'_, Message> {
        let menus = [
            TopMenu::File,
            TopMenu::Edit,
            TopMenu::Search,
            TopMenu::View,
            TopMenu::Help,
        ];

        let mut menu_items: Vec<Element<'_, Message>> = Vec::new();

        for menu in menus {
            let is_active = self.active_menu == Some(menu);

            let menu_btn = button(
                text(Self::menu_label(menu)).size(12).color(if is_active {
                    colors::TEXT_PRIMARY
                } else {
                    colors::TEXT_SECONDARY
                }),
            )
            .padding(Padding::from([6, 10]))
            .style(move |_: &Theme, status: button::Status| {
                let bg = if is_active {
                    colors::BG_ACTIVE
                } else {
                    match status {
                        button::Status::Hovered => colors::BG_HOVER,
                        _ => colors::BG_MEDIUM,
                    }
                };
                button::Style {
                    background: Some(Background::Color(bg)),
                    text_color: colors::TEXT_PRIMARY,
                    border: Border {
                        radius: 4.0.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                }
            })
            .on_press(Message::ToggleTopMenu(menu));

            menu_items.push(menu_btn.into());
        }

        menu_items.push(horizontal_space().into());

        let toolbar = Row::with_children(menu_items)
            .spacing(2)
            .padding(Padding::from([4, 8]))
            .align_y(iced::Alignment::Center);

        container(toolbar)
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

    fn menu_label(menu: TopMenu) -> &'static str {
        match menu {
            TopMenu::File => "File",
            TopMenu::Edit => "Edit",
            TopMenu::Search => "Search",
            TopMenu::View => "View",
            TopMenu::Help => "Help",
        }
    }

    fn menu_x(menu: TopMenu) -> f32 {
        match menu {
            TopMenu::File => 8.0,
            TopMenu::Edit => 52.0,
            TopMenu::Search => 98.0,
            TopMenu::View => 160.0,
            TopMenu::Help => 212.0,
        }
    }

    /// A dropdown entry for a command, with its shortcut as a hint.
    fn command_item(&self, command: Command, message: Message) -> Element<'_, Message> {
        let shortcut = self
            .editor
            .keymap()
            .shortcut_for(command)
            .unwrap_or_default();
        Self::menu_item(command.display_name(), shortcut, message)
    }

    fn menu_item(label: &str, shortcut: String, msg: Message) -> Element<'_, Message> {
        button(
            row![
                text(label.to_string()).size(12).color(colors::TEXT_PRIMARY),
                horizontal_space(),
                text(shortcut).size(11).color(colors::TEXT_MUTED),
            ]
            .width(Length::Fill)
            .align_y(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .padding(Padding::from([6, 16]))
        .style(|_: &Theme, status: button::Status| {
            let bg = match status {
                button::Status::Hovered => colors::BG_HOVER,
                _ => Color::TRANSPARENT,
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color: colors::TEXT_PRIMARY,
                border: Border::default(),
                ..Default::default()
            }
        })
        .on_press(msg)
        .into()
    }

    fn menu_separator() -> Element<'static, Message> {
        container(Space::new(Length::Fill, 1))
            .padding(Padding::from([4, 8]))
            .style(|_| container::Style {
                background: Some(Background::Color(colors::BORDER)),
                ..Default::default()
            })
            .into()
    }

    pub fn view_menu_dropdown(&self) -> Element<'_, Message> {
        let Some(menu) = self.active_menu else {
            return Space::new(0, 0).into();
        };

        let items: Vec<Element<'_, Message>> = match menu {
            TopMenu::File => vec![
                self.command_item(Command::NewFile, Message::NewTab),
                self.command_item(Command::OpenFile, Message::OpenFileDialog),
                self.command_item(Command::OpenFolder, Message::OpenFolderDialog),
                Self::menu_separator(),
                self.command_item(Command::Save, Message::Save),
                self.command_item(Command::SaveAs, Message::SaveAs),
                Self::menu_separator(),
                self.command_item(Command::CloseTab, Message::CloseActiveTab),
                Self::menu_separator(),
                self.command_item(Command::Quit, Message::CloseWindow),
            ],
            TopMenu::Edit => vec![
                self.command_item(Command::Undo, Message::Undo),
                self.command_item(Command::Redo, Message::Redo),
                Self::menu_separator(),
                self.command_item(Command::Cut, Message::Cut),
                self.command_item(Command::Copy, Message::Copy),
                self.command_item(Command::Paste, Message::Paste),
                Self::menu_separator(),
                self.command_item(Command::SelectAll, Message::SelectAll),
                self.command_item(Command::SelectWord, Message::SelectWord),
                self.command_item(Command::SelectLine, Message::SelectLine),
                Self::menu_separator(),
                self.command_item(Command::DuplicateLine, Message::DuplicateLine),
                self.command_item(Command::DeleteLine, Message::DeleteLine),
                self.command_item(Command::MoveLineUp, Message::MoveLineUp),
                self.command_item(Command::MoveLineDown, Message::MoveLineDown),
            ],
            TopMenu::Search => vec![
                self.command_item(Command::Find, Message::ShowFind),
                self.command_item(Command::FindNext, Message::FindNext),
                self.command_item(Command::FindPrevious, Message::FindPrevious),
                Self::menu_separator(),
                self.command_item(Command::GotoLine, Message::ShowGotoLine),
            ],
            TopMenu::View => vec![
                self.command_item(Command::SplitRight, Message::SplitRight),
                self.command_item(Command::SplitDown, Message::SplitDown),
                self.command_item(Command::CloseSplit, Message::CloseSplit),
                Self::menu_separator(),
                self.command_item(Command::FocusNextSplit, Message::FocusNextSplit),
                self.command_item(Command::FocusPreviousSplit, Message::FocusPreviousSplit),
                Self::menu_separator(),
                self.command_item(Command::NextTab, Message::NextTab),
                self.command_item(Command::PreviousTab, Message::PrevTab),
                Self::menu_separator(),
                self.command_item(Command::ToggleSidebar, Message::ToggleSidebar),
            ],
            TopMenu::Help => vec![Self::menu_item(
                "About Scribe",
                String::new(),
                Message::ShowAbout,
            )],
        };

        let menu_box = container(Column::with_children(items).width(Length::Fixed(260.0)))
            .padding(4)
            .style(|_| container::Style {
                background: Some(Background::Color(colors::BG_MEDIUM)),
                border: Border {
                    color: colors::BORDER,
                    width: 1.0,
                    radius: 4.0.into(),
                },
                ..Default::default()
            });

        column![
            Space::with_height(Length::Fixed(34.0)),
            row![
                Space::with_width(Length::Fixed(Self::menu_x(menu))),
                menu_box,
            ],
        ]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }
}
