use std::collections::HashMap;

use ratatui::prelude::Rect;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Message;
use crate::domain::models::MessageStatus;
use crate::domain::models::Palette;
use crate::domain::models::Role;

#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

struct BubbleCacheEntry {
    text_len: usize,
    status: MessageStatus,
    lines: Vec<Line<'static>>,
}

pub struct BubbleList {
    cache: HashMap<usize, BubbleCacheEntry>,
    line_width: usize,
    lines_len: usize,
    palette: Palette,
}

impl BubbleList {
    pub fn new(palette: Palette) -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            line_width: 0,
            lines_len: 0,
            palette,
        };
    }

    pub fn set_messages(&mut self, messages: &[Message], username: Option<&str>, line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }
        self.cache.retain(|idx, _| return *idx < messages.len());

        self.lines_len = messages
            .iter()
            .enumerate()
            .map(|(idx, message)| {
                if let Some(entry) = self.cache.get(&idx) {
                    if entry.text_len == message.content.len() && entry.status == message.status() {
                        return entry.lines.len();
                    }
                }

                let mut align = BubbleAlignment::Left;
                if message.role == Role::User {
                    align = BubbleAlignment::Right;
                }

                let lines = Bubble::new(message, align, message.role.label(username), line_width)
                    .as_lines(&self.palette);
                let lines_len = lines.len();

                self.cache.insert(
                    idx,
                    BubbleCacheEntry {
                        text_len: message.content.len(),
                        status: message.status(),
                        lines,
                    },
                );

                return lines_len;
            })
            .sum();
    }

    /// Drops every cached bubble, e.g. when switching conversations.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.lines_len = 0;
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect, scroll: u16) {
        let mut indexes: Vec<usize> = self.cache.keys().cloned().collect();
        indexes.sort();
        let lines: Vec<Line> = indexes
            .iter()
            .filter_map(|idx| return self.cache.get(idx))
            .flat_map(|entry| return entry.lines.to_owned())
            .collect();

        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default())
                .scroll((scroll, 0)),
            rect,
        );
    }
}
