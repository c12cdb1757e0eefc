#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use ratatui::prelude::Rect;
use tui_textarea::Input;
use tui_textarea::Key;

use super::BubbleList;
use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::ChatMode;
use crate::domain::models::ClientSnapshot;
use crate::domain::models::Credentials;
use crate::domain::models::Form;
use crate::domain::models::NoticeKind;
use crate::domain::models::Palette;
use crate::domain::models::Registration;
use crate::domain::models::TextArea;
use crate::domain::models::View;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Input,
}

#[derive(Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Dispatch(Action),
    Quit,
}

/// Everything the terminal UI needs between two client snapshots.
pub struct AppState<'a> {
    pub snapshot: ClientSnapshot,
    pub palette: Palette,
    pub bubble_list: BubbleList,
    pub scroll: Scroll,
    pub textarea: tui_textarea::TextArea<'a>,
    pub login_form: Form,
    pub register_form: Form,
    pub rename_form: Option<Form>,
    pub focus: Focus,
    pub sidebar_cursor: usize,
    pub sidebar_visible: bool,
    pub last_known_height: u16,
    pub last_known_width: u16,
}

impl<'a> AppState<'a> {
    pub fn new(palette: Palette) -> AppState<'a> {
        return AppState {
            snapshot: ClientSnapshot::default(),
            sidebar_visible: palette.sidebar_visible,
            bubble_list: BubbleList::new(palette.clone()),
            palette,
            scroll: Scroll::default(),
            textarea: TextArea::default(),
            login_form: Form::login(),
            register_form: Form::register(),
            rename_form: None,
            focus: Focus::Input,
            sidebar_cursor: 0,
            last_known_height: 0,
            last_known_width: 0,
        };
    }

    /// Whether the conversation sidebar takes part in the layout.
    pub fn shows_sidebar(&self) -> bool {
        return self.sidebar_visible && self.snapshot.mode == ChatMode::Threads;
    }

    pub fn apply_snapshot(&mut self, snapshot: ClientSnapshot) {
        let active_changed = snapshot.active != self.snapshot.active;
        let messages_grew = snapshot.messages.len() > self.snapshot.messages.len();
        let was_at_bottom = self.scroll.is_at_bottom();

        if active_changed {
            self.bubble_list.reset();
            self.scroll = Scroll::default();
            if let Some(idx) = snapshot
                .active
                .as_deref()
                .and_then(|id| return snapshot.conversations.iter().position(|e| return e.id == id))
            {
                self.sidebar_cursor = idx;
            }
        }

        let registered = snapshot.view == View::Register
            && snapshot
                .notice
                .as_ref()
                .is_some_and(|e| return e.kind == NoticeKind::Success);
        if registered {
            self.register_form.clear();
        }
        if snapshot.authenticated && !self.snapshot.authenticated {
            self.login_form.clear();
        }

        match snapshot.renaming.as_deref() {
            Some(id) => {
                if self.rename_form.is_none() {
                    let title = snapshot
                        .conversation(id)
                        .map(|e| return e.title.as_str())
                        .unwrap_or("");
                    self.rename_form = Some(Form::rename(title));
                }
            }
            None => self.rename_form = None,
        }

        self.sidebar_cursor = self
            .sidebar_cursor
            .min(snapshot.conversations.len().saturating_sub(1));
        self.snapshot = snapshot;
        self.sync_dependants();

        if active_changed || messages_grew || was_at_bottom {
            self.scroll.last();
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.bubble_list.set_messages(
            &self.snapshot.messages,
            self.snapshot.username.as_deref(),
            self.last_known_width.into(),
        );

        let lines_len = u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX);
        self.scroll.set_state(lines_len, self.last_known_height);
    }

    fn cursor_id(&self) -> Option<String> {
        return self
            .snapshot
            .conversations
            .get(self.sidebar_cursor)
            .map(|e| return e.id.to_string());
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self.snapshot.view {
            View::Login => self.login_form.paste(text),
            View::Register => self.register_form.paste(text),
            View::Chat => {
                if let Some(form) = self.rename_form.as_mut() {
                    form.paste(text);
                } else {
                    self.textarea.insert_str(text);
                }
            }
        }
    }

    pub fn handle_input(&mut self, input: Input) -> KeyOutcome {
        if let Input {
            key: Key::Char('c'),
            ctrl: true,
            ..
        } = input
        {
            return KeyOutcome::Quit;
        }

        match self.snapshot.view {
            View::Login => return self.handle_login_input(input),
            View::Register => return self.handle_register_input(input),
            View::Chat => return self.handle_chat_input(input),
        }
    }

    fn handle_login_input(&mut self, input: Input) -> KeyOutcome {
        match input {
            Input {
                key: Key::Enter, ..
            } => {
                if self.snapshot.submitting {
                    return KeyOutcome::Continue;
                }

                return KeyOutcome::Dispatch(Action::Login(Credentials {
                    username: self.login_form.value(0).to_string(),
                    password: self.login_form.value(1).to_string(),
                }));
            }
            Input {
                key: Key::Char('r'),
                ctrl: true,
                ..
            } => {
                return KeyOutcome::Dispatch(Action::Navigate(View::Register));
            }
            Input { key: Key::Esc, .. } => {
                return KeyOutcome::Dispatch(Action::Navigate(View::Chat));
            }
            input => {
                self.login_form.input(input);
                return KeyOutcome::Continue;
            }
        }
    }

    fn handle_register_input(&mut self, input: Input) -> KeyOutcome {
        match input {
            Input {
                key: Key::Enter, ..
            } => {
                if self.snapshot.submitting {
                    return KeyOutcome::Continue;
                }

                return KeyOutcome::Dispatch(Action::Register(Registration {
                    username: self.register_form.value(0).to_string(),
                    email: self.register_form.value(1).to_string(),
                    password: self.register_form.value(2).to_string(),
                }));
            }
            Input { key: Key::Esc, .. } => {
                return KeyOutcome::Dispatch(Action::Navigate(View::Login));
            }
            input => {
                self.register_form.input(input);
                return KeyOutcome::Continue;
            }
        }
    }

    fn handle_chat_input(&mut self, input: Input) -> KeyOutcome {
        if let Some(id) = self.snapshot.renaming.clone() {
            return self.handle_rename_input(&id, input);
        }

        if self.snapshot.pending_delete.is_some() {
            match input.key {
                Key::Char('y') | Key::Char('Y') => {
                    return KeyOutcome::Dispatch(Action::ConfirmDelete());
                }
                Key::Char('n') | Key::Char('N') | Key::Esc => {
                    return KeyOutcome::Dispatch(Action::CancelDelete());
                }
                _ => return KeyOutcome::Continue,
            }
        }

        match input {
            Input {
                key: Key::Char('n'),
                ctrl: true,
                ..
            } => {
                return KeyOutcome::Dispatch(Action::CreateConversation());
            }
            Input {
                key: Key::Char('b'),
                ctrl: true,
                ..
            } => {
                self.sidebar_visible = !self.sidebar_visible;
                if !self.sidebar_visible {
                    self.focus = Focus::Input;
                }
                return KeyOutcome::Continue;
            }
            Input {
                key: Key::Char('r'),
                ctrl: true,
                ..
            } => {
                return KeyOutcome::Dispatch(Action::RetryMessage());
            }
            Input {
                key: Key::Char('l'),
                ctrl: true,
                ..
            } => {
                if self.snapshot.authenticated {
                    return KeyOutcome::Dispatch(Action::Logout());
                }
                return KeyOutcome::Dispatch(Action::Navigate(View::Login));
            }
            Input { key: Key::Tab, .. } => {
                if self.shows_sidebar() && self.focus == Focus::Input {
                    self.focus = Focus::Sidebar;
                } else {
                    self.focus = Focus::Input;
                }
                return KeyOutcome::Continue;
            }
            input => {
                if self.focus == Focus::Sidebar && self.shows_sidebar() {
                    return self.handle_sidebar_input(input);
                }
                return self.handle_textarea_input(input);
            }
        }
    }

    fn handle_rename_input(&mut self, id: &str, input: Input) -> KeyOutcome {
        match input {
            Input {
                key: Key::Enter, ..
            } => {
                let title = self
                    .rename_form
                    .as_ref()
                    .map(|form| return form.value(0).to_string())
                    .unwrap_or_default();
                return KeyOutcome::Dispatch(Action::RenameConversation(id.to_string(), title));
            }
            Input { key: Key::Esc, .. } => {
                return KeyOutcome::Dispatch(Action::CancelRename());
            }
            input => {
                if let Some(form) = self.rename_form.as_mut() {
                    form.input(input);
                }
                return KeyOutcome::Continue;
            }
        }
    }

    fn handle_sidebar_input(&mut self, input: Input) -> KeyOutcome {
        match input {
            Input { key: Key::Up, .. } => {
                self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1);
            }
            Input { key: Key::Down, .. } => {
                if self.sidebar_cursor + 1 < self.snapshot.conversations.len() {
                    self.sidebar_cursor += 1;
                }
            }
            Input {
                key: Key::Enter, ..
            } => {
                if let Some(id) = self.cursor_id() {
                    self.focus = Focus::Input;
                    return KeyOutcome::Dispatch(Action::SelectConversation(id));
                }
            }
            Input {
                key: Key::Char('r'),
                ctrl: false,
                ..
            } => {
                if let Some(id) = self.cursor_id() {
                    return KeyOutcome::Dispatch(Action::BeginRename(id));
                }
            }
            Input {
                key: Key::Char('d'),
                ctrl: false,
                ..
            } => {
                if let Some(id) = self.cursor_id() {
                    return KeyOutcome::Dispatch(Action::RequestDelete(id));
                }
            }
            _ => (),
        }

        return KeyOutcome::Continue;
    }

    fn handle_textarea_input(&mut self, input: Input) -> KeyOutcome {
        match input {
            Input { key: Key::Up, .. } => {
                self.scroll.up();
            }
            Input { key: Key::Down, .. } => {
                self.scroll.down();
            }
            Input {
                key: Key::Enter, ..
            } => {
                if self.snapshot.loading {
                    return KeyOutcome::Continue;
                }

                let text = self.textarea.lines().join("\n");
                if text.trim().is_empty() {
                    return KeyOutcome::Continue;
                }

                if self.snapshot.authenticated {
                    self.textarea = TextArea::default();
                }
                return KeyOutcome::Dispatch(Action::SendMessage(text));
            }
            input => {
                self.textarea.input(input);
            }
        }

        return KeyOutcome::Continue;
    }
}
