use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Message;
use crate::domain::models::MessageStatus;
use crate::domain::models::Palette;
use crate::domain::models::Role;

fn create_lines(message: &Message, alignment: BubbleAlignment, label: &str) -> Vec<String> {
    let lines = Bubble::new(message, alignment, label.to_string(), 50).as_lines(&Palette::default());

    return lines
        .iter()
        .map(|line| {
            return line
                .spans
                .iter()
                .map(|span| {
                    return span.content.to_string();
                })
                .collect::<Vec<String>>()
                .join("");
        })
        .collect();
}

#[test]
fn it_creates_bot_text() {
    let message = Message::new(Role::Bot, "Hi there!");
    let lines_str = create_lines(&message, BubbleAlignment::Left, "JaviAI")
        .iter()
        .map(|line| return line.trim_end().to_string())
        .collect::<Vec<String>>()
        .join("\n");

    insta::assert_snapshot!(lines_str, @r###"
    ╭JaviAI─────╮
    │ Hi there! │
    ╰───────────╯
    "###);
}

#[test]
fn it_wraps_long_text_within_window() {
    let message = Message::new(Role::Bot, "Hi there! This is a really long line that pushes the boundaries of 50 characters across the screen, resulting in a bubble where the line is wrapped to the next line. Cool right?");
    let lines = create_lines(&message, BubbleAlignment::Left, "JaviAI");

    assert_eq!(lines.len(), 7);
    assert!(lines.iter().all(|line| return line.chars().count() == 50));
    assert_eq!(
        lines[1].trim_end(),
        "│ Hi there! This is a really long line that   │"
    );
    assert_eq!(lines[5].trim_end(), "│ Cool right?                                 │");
}

#[test]
fn it_right_aligns_user_messages() {
    let message = Message::new(Role::User, "hola");
    let lines = create_lines(&message, BubbleAlignment::Right, "javi");

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("{}╭javi──╮", " ".repeat(42)));
    assert_eq!(lines[1], format!("{}│ hola │", " ".repeat(42)));
    assert_eq!(lines[2], format!("{}╰──────╯", " ".repeat(42)));
}

#[test]
fn it_labels_pending_and_failed_messages() {
    let mut message = Message::new_pending("hola");
    let lines = create_lines(&message, BubbleAlignment::Right, "You");
    assert!(lines[2].trim_start().starts_with("╰sending…"));

    message.set_status(MessageStatus::Failed);
    let lines = create_lines(&message, BubbleAlignment::Right, "You");
    assert_eq!(lines[2].trim_start(), "╰not delivered──╯");
}
