#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Role;

/// Local delivery state of a message. Never sent over the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MessageStatus {
    #[default]
    Sent,
    Pending,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip)]
    status: MessageStatus,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            role,
            content: content.to_string(),
            status: MessageStatus::Sent,
        };
    }

    pub fn new_pending(content: &str) -> Message {
        return Message {
            role: Role::User,
            content: content.to_string(),
            status: MessageStatus::Pending,
        };
    }

    pub fn status(&self) -> MessageStatus {
        return self.status;
    }

    pub fn set_status(&mut self, status: MessageStatus) {
        self.status = status;
    }

    /// Copy of the message as the backend expects it.
    pub fn outbound(&self) -> Message {
        return Message::new(self.role, &self.content);
    }

    pub fn as_string_lines(&self, line_max_width: usize) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let text = self.content.replace('\t', "  ");

        for full_line in text.split('\n') {
            if full_line.trim().is_empty() {
                lines.push(" ".to_string());
                continue;
            }

            let mut char_count = 0;
            let mut current_lines: Vec<&str> = vec![];

            for word in full_line.split(' ') {
                let word_len = word.chars().count();
                if word_len + char_count + 1 > line_max_width && !current_lines.is_empty() {
                    lines.push(current_lines.join(" ").trim_end().to_string());
                    current_lines = vec![word];
                    char_count = word_len + 1;
                } else {
                    current_lines.push(word);
                    char_count += word_len + 1;
                }
            }
            if !current_lines.is_empty() {
                lines.push(current_lines.join(" ").trim_end().to_string());
            }
        }

        return lines;
    }
}
