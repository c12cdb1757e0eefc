use ratatui::prelude::Rect;
use tui_textarea::Input;
use tui_textarea::Key;

use super::AppState;
use super::Focus;
use super::KeyOutcome;
use crate::domain::models::Action;
use crate::domain::models::ChatMode;
use crate::domain::models::ClientSnapshot;
use crate::domain::models::Conversation;
use crate::domain::models::Credentials;
use crate::domain::models::Message;
use crate::domain::models::Notice;
use crate::domain::models::Palette;
use crate::domain::models::Role;
use crate::domain::models::View;

fn key(key: Key) -> Input {
    return Input {
        key,
        ..Input::default()
    };
}

fn ctrl(c: char) -> Input {
    return Input {
        key: Key::Char(c),
        ctrl: true,
        ..Input::default()
    };
}

fn chat_snapshot() -> ClientSnapshot {
    return ClientSnapshot {
        view: View::Chat,
        mode: ChatMode::Threads,
        authenticated: true,
        username: Some("javi".to_string()),
        conversations: vec![Conversation::new("1", "Primera"), Conversation::new("2", "Segunda")],
        active: Some("1".to_string()),
        ..ClientSnapshot::default()
    };
}

fn app_state() -> AppState<'static> {
    let mut app_state = AppState::new(Palette::default());
    app_state.set_rect(Rect::new(0, 0, 60, 20));
    app_state.apply_snapshot(chat_snapshot());
    return app_state;
}

fn type_text(app_state: &mut AppState, text: &str) {
    for c in text.chars() {
        app_state.handle_input(key(Key::Char(c)));
    }
}

#[test]
fn it_quits_on_ctrl_c_from_any_view() {
    let mut app_state = app_state();
    assert_eq!(app_state.handle_input(ctrl('c')), KeyOutcome::Quit);

    app_state.apply_snapshot(ClientSnapshot {
        view: View::Login,
        ..ClientSnapshot::default()
    });
    assert_eq!(app_state.handle_input(ctrl('c')), KeyOutcome::Quit);
}

#[test]
fn it_sends_typed_message_and_clears_input() {
    let mut app_state = app_state();
    type_text(&mut app_state, "hola");

    let outcome = app_state.handle_input(key(Key::Enter));
    assert_eq!(
        outcome,
        KeyOutcome::Dispatch(Action::SendMessage("hola".to_string()))
    );
    assert_eq!(app_state.textarea.lines().join(""), "");
}

#[test]
fn it_ignores_blank_input() {
    let mut app_state = app_state();
    type_text(&mut app_state, "   ");

    assert_eq!(app_state.handle_input(key(Key::Enter)), KeyOutcome::Continue);
}

#[test]
fn it_holds_input_while_reply_is_pending() {
    let mut app_state = app_state();
    app_state.apply_snapshot(ClientSnapshot {
        loading: true,
        messages: vec![Message::new_pending("hola")],
        ..chat_snapshot()
    });
    type_text(&mut app_state, "otra");

    assert_eq!(app_state.handle_input(key(Key::Enter)), KeyOutcome::Continue);
    assert_eq!(app_state.textarea.lines().join(""), "otra");
}

#[test]
fn it_navigates_sidebar_and_selects() {
    let mut app_state = app_state();
    app_state.handle_input(key(Key::Tab));
    assert_eq!(app_state.focus, Focus::Sidebar);

    app_state.handle_input(key(Key::Down));
    app_state.handle_input(key(Key::Down));
    assert_eq!(app_state.sidebar_cursor, 1);

    let outcome = app_state.handle_input(key(Key::Enter));
    assert_eq!(
        outcome,
        KeyOutcome::Dispatch(Action::SelectConversation("2".to_string()))
    );
    assert_eq!(app_state.focus, Focus::Input);
}

#[test]
fn it_requests_and_confirms_delete() {
    let mut app_state = app_state();
    app_state.handle_input(key(Key::Tab));

    let outcome = app_state.handle_input(key(Key::Char('d')));
    assert_eq!(
        outcome,
        KeyOutcome::Dispatch(Action::RequestDelete("1".to_string()))
    );

    app_state.apply_snapshot(ClientSnapshot {
        pending_delete: Some("1".to_string()),
        ..chat_snapshot()
    });
    assert_eq!(app_state.handle_input(key(Key::Char('x'))), KeyOutcome::Continue);
    assert_eq!(
        app_state.handle_input(key(Key::Char('n'))),
        KeyOutcome::Dispatch(Action::CancelDelete())
    );
    assert_eq!(
        app_state.handle_input(key(Key::Char('y'))),
        KeyOutcome::Dispatch(Action::ConfirmDelete())
    );
}

#[test]
fn it_prefills_rename_prompt_with_current_title() {
    let mut app_state = app_state();
    app_state.apply_snapshot(ClientSnapshot {
        renaming: Some("2".to_string()),
        ..chat_snapshot()
    });
    assert_eq!(app_state.rename_form.as_ref().unwrap().value(0), "Segunda");

    app_state.handle_input(key(Key::Backspace));
    type_text(&mut app_state, "o!");
    let outcome = app_state.handle_input(key(Key::Enter));
    assert_eq!(
        outcome,
        KeyOutcome::Dispatch(Action::RenameConversation(
            "2".to_string(),
            "Segundo!".to_string()
        ))
    );

    app_state.apply_snapshot(chat_snapshot());
    assert!(app_state.rename_form.is_none());
}

#[test]
fn it_hides_sidebar_in_single_mode() {
    let mut app_state = app_state();
    assert!(app_state.shows_sidebar());

    app_state.apply_snapshot(ClientSnapshot {
        mode: ChatMode::Single,
        ..chat_snapshot()
    });
    assert!(!app_state.shows_sidebar());

    app_state.handle_input(key(Key::Tab));
    assert_eq!(app_state.focus, Focus::Input);
}

#[test]
fn it_toggles_sidebar() {
    let mut app_state = app_state();
    app_state.handle_input(key(Key::Tab));
    app_state.handle_input(ctrl('b'));

    assert!(!app_state.shows_sidebar());
    assert_eq!(app_state.focus, Focus::Input);
}

#[test]
fn it_submits_login_form() {
    let mut app_state = app_state();
    app_state.apply_snapshot(ClientSnapshot {
        view: View::Login,
        ..ClientSnapshot::default()
    });

    type_text(&mut app_state, "javi");
    app_state.handle_input(key(Key::Tab));
    type_text(&mut app_state, "secret");

    let outcome = app_state.handle_input(key(Key::Enter));
    assert_eq!(
        outcome,
        KeyOutcome::Dispatch(Action::Login(Credentials {
            username: "javi".to_string(),
            password: "secret".to_string(),
        }))
    );
    assert_eq!(
        app_state.handle_input(ctrl('r')),
        KeyOutcome::Dispatch(Action::Navigate(View::Register))
    );
}

#[test]
fn it_clears_register_form_after_success() {
    let mut app_state = app_state();
    app_state.apply_snapshot(ClientSnapshot {
        view: View::Register,
        ..ClientSnapshot::default()
    });
    type_text(&mut app_state, "javi");

    app_state.apply_snapshot(ClientSnapshot {
        view: View::Register,
        notice: Some(Notice::success("User registered successfully")),
        ..ClientSnapshot::default()
    });
    assert_eq!(app_state.register_form.value(0), "");
}

#[test]
fn it_logs_out_or_asks_for_login() {
    let mut app_state = app_state();
    assert_eq!(
        app_state.handle_input(ctrl('l')),
        KeyOutcome::Dispatch(Action::Logout())
    );

    app_state.apply_snapshot(ClientSnapshot::default());
    assert_eq!(
        app_state.handle_input(ctrl('l')),
        KeyOutcome::Dispatch(Action::Navigate(View::Login))
    );
}

#[test]
fn it_follows_new_messages() {
    let mut app_state = app_state();
    let messages = (0..10)
        .map(|idx| return Message::new(Role::Bot, &format!("message {idx}")))
        .collect::<Vec<Message>>();

    app_state.apply_snapshot(ClientSnapshot {
        messages,
        ..chat_snapshot()
    });

    assert_eq!(app_state.bubble_list.len(), 30);
    assert!(app_state.scroll.is_at_bottom());
    assert_eq!(app_state.scroll.position, 10);
}
