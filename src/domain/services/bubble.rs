#[cfg(test)]
#[path = "bubble_test.rs"]
mod tests;

use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::Message;
use crate::domain::models::MessageStatus;
use crate::domain::models::Palette;
use crate::domain::models::Role;

#[derive(Debug, PartialEq, Eq)]
pub enum BubbleAlignment {
    Left,
    Right,
}

pub struct Bubble<'a> {
    alignment: BubbleAlignment,
    message: &'a Message,
    label: String,
    window_max_width: usize,
}

pub struct BubbleConfig {
    pub border_elements_length: usize,
    pub outer_padding_percentage: f32,
}

fn width(text: &str) -> usize {
    return text.chars().count();
}

fn status_text(status: MessageStatus) -> &'static str {
    match status {
        MessageStatus::Sent => return "",
        MessageStatus::Pending => return "sending…",
        MessageStatus::Failed => return "not delivered",
    }
}

impl<'a> Bubble<'a> {
    pub fn new(
        message: &'a Message,
        alignment: BubbleAlignment,
        label: String,
        window_max_width: usize,
    ) -> Bubble<'a> {
        return Bubble {
            alignment,
            message,
            label,
            window_max_width,
        };
    }

    pub fn style_config() -> BubbleConfig {
        return BubbleConfig {
            // left border + left padding + (text, not counted) + right padding + right border.
            border_elements_length: 4,
            outer_padding_percentage: 0.04,
        };
    }

    fn max_text_width(&self) -> usize {
        let style_config = Bubble::style_config();
        let min_outer_padding =
            (self.window_max_width as f32 * style_config.outer_padding_percentage).ceil() as usize;

        return self
            .window_max_width
            .saturating_sub(style_config.border_elements_length + min_outer_padding)
            .max(1);
    }

    pub fn as_lines(&self, palette: &Palette) -> Vec<Line<'static>> {
        let text_lines = self.message.as_string_lines(self.max_text_width());
        let status = status_text(self.message.status());

        let inner_width = text_lines
            .iter()
            .map(|line| return width(line))
            .chain([width(&self.label), width(status)])
            .max()
            .unwrap_or(0);

        let style = self.style(palette);
        let mut lines = vec![self.pad(
            self.bar("╭", &self.label, "╮", inner_width),
            inner_width,
            style,
        )];

        for text in text_lines {
            let fill = " ".repeat(inner_width.saturating_sub(width(&text)));
            lines.push(self.pad(format!("│ {text}{fill} │"), inner_width, style));
        }

        lines.push(self.pad(self.bar("╰", status, "╯", inner_width), inner_width, style));

        return lines;
    }

    fn bar(&self, left: &str, text: &str, right: &str, inner_width: usize) -> String {
        // Add 2 for the inner padding.
        let dashes = "─".repeat(inner_width + 2 - width(text));
        return format!("{left}{text}{dashes}{right}");
    }

    fn pad(&self, text: String, inner_width: usize, style: Style) -> Line<'static> {
        let bubble_width = inner_width + Bubble::style_config().border_elements_length;
        let outer_padding = " ".repeat(self.window_max_width.saturating_sub(bubble_width));

        if self.alignment == BubbleAlignment::Left {
            return Line::from(vec![Span::styled(text, style), Span::from(outer_padding)]);
        }

        return Line::from(vec![Span::from(outer_padding), Span::styled(text, style)]);
    }

    fn style(&self, palette: &Palette) -> Style {
        let colour = match (self.message.status(), self.message.role) {
            (MessageStatus::Failed, _) => palette.error,
            (MessageStatus::Pending, _) => palette.muted,
            (MessageStatus::Sent, Role::User) => palette.user_bubble,
            (MessageStatus::Sent, Role::Bot) => palette.bot_bubble,
        };

        return Style::default().fg(colour);
    }
}
