use super::BubbleList;
use crate::domain::models::Message;
use crate::domain::models::MessageStatus;
use crate::domain::models::Palette;
use crate::domain::models::Role;

fn messages() -> Vec<Message> {
    return vec![
        Message::new(Role::User, "hola"),
        Message::new(Role::Bot, "¡Hola! ¿En qué te ayudo?"),
    ];
}

#[test]
fn it_has_no_cached_lines() {
    let bubble_list = BubbleList::new(Palette::default());

    assert_eq!(bubble_list.cache.len(), 0);
    assert_eq!(bubble_list.len(), 0);
}

#[test]
fn it_caches_lines() {
    let mut bubble_list = BubbleList::new(Palette::default());
    bubble_list.set_messages(&messages(), Some("javi"), 50);

    assert_eq!(bubble_list.cache.len(), 2);
    assert_eq!(bubble_list.len(), 6);
}

#[test]
fn it_drops_entries_for_removed_messages() {
    let mut bubble_list = BubbleList::new(Palette::default());
    bubble_list.set_messages(&messages(), None, 50);
    bubble_list.set_messages(&messages()[..1], None, 50);

    assert_eq!(bubble_list.cache.len(), 1);
    assert_eq!(bubble_list.len(), 3);
}

#[test]
fn it_rebuilds_when_status_changes() {
    let mut pending = Message::new_pending("hola");
    let mut bubble_list = BubbleList::new(Palette::default());
    bubble_list.set_messages(&[pending.clone()], None, 50);

    pending.set_status(MessageStatus::Failed);
    bubble_list.set_messages(&[pending], None, 50);

    let entry = bubble_list.cache.get(&0).unwrap();
    assert_eq!(entry.status, MessageStatus::Failed);
}
