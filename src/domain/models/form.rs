#[cfg(test)]
#[path = "form_test.rs"]
mod tests;

use tui_textarea::Input;
use tui_textarea::Key;

pub struct FormField {
    pub label: String,
    pub value: String,
    masked: bool,
    required: bool,
}

impl FormField {
    fn new(label: &str, masked: bool, required: bool) -> FormField {
        return FormField {
            label: label.to_string(),
            value: "".to_string(),
            masked,
            required,
        };
    }

    pub fn display_value(&self) -> String {
        if self.masked {
            return "*".repeat(self.value.chars().count());
        }

        return self.value.to_string();
    }
}

/// Small line-based input form used by the login, register and rename
/// prompts.
pub struct Form {
    pub title: String,
    pub fields: Vec<FormField>,
    focused: usize,
}

impl Form {
    pub fn login() -> Form {
        return Form {
            title: "Log in".to_string(),
            fields: vec![
                FormField::new("Username", false, true),
                FormField::new("Password", true, true),
            ],
            focused: 0,
        };
    }

    pub fn register() -> Form {
        return Form {
            title: "Create an account".to_string(),
            fields: vec![
                FormField::new("Username", false, true),
                FormField::new("Email", false, false),
                FormField::new("Password", true, true),
            ],
            focused: 0,
        };
    }

    pub fn rename(current_title: &str) -> Form {
        let mut field = FormField::new("Title", false, true);
        field.value = current_title.to_string();

        return Form {
            title: "Rename conversation".to_string(),
            fields: vec![field],
            focused: 0,
        };
    }

    pub fn focused(&self) -> usize {
        return self.focused;
    }

    pub fn next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn prev(&mut self) {
        if self.focused == 0 {
            self.focused = self.fields.len() - 1;
        } else {
            self.focused -= 1;
        }
    }

    pub fn value(&self, idx: usize) -> &str {
        return self
            .fields
            .get(idx)
            .map(|field| return field.value.as_str())
            .unwrap_or("");
    }

    pub fn paste(&mut self, text: &str) {
        let cleaned = text.replace(['\n', '\r'], "");
        self.fields[self.focused].value.push_str(&cleaned);
    }

    /// Applies a key to the focused field. Returns false for keys the form
    /// does not handle.
    pub fn input(&mut self, input: Input) -> bool {
        match input {
            Input {
                key: Key::Char(c),
                ctrl: false,
                alt: false,
                ..
            } => {
                self.fields[self.focused].value.push(c);
                return true;
            }
            Input {
                key: Key::Backspace,
                ..
            } => {
                self.fields[self.focused].value.pop();
                return true;
            }
            Input { key: Key::Tab, .. } | Input { key: Key::Down, .. } => {
                self.next();
                return true;
            }
            Input { key: Key::Up, .. } => {
                self.prev();
                return true;
            }
            _ => return false,
        }
    }

    pub fn is_complete(&self) -> bool {
        return self
            .fields
            .iter()
            .all(|field| return !field.required || !field.value.trim().is_empty());
    }

    pub fn clear(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.clear();
        }
        self.focused = 0;
    }
}
