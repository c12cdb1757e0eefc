use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Form;
use crate::domain::models::Loading;
use crate::domain::models::NoticeKind;
use crate::domain::models::Palette;
use crate::domain::models::ThemeName;
use crate::domain::models::View;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::Focus;
use crate::domain::services::KeyOutcome;

fn centered_rect(width: u16, height: u16, rect: Rect) -> Rect {
    let width = width.min(rect.width);
    let height = height.min(rect.height);

    return Rect::new(
        rect.x + (rect.width - width) / 2,
        rect.y + (rect.height - height) / 2,
        width,
        height,
    );
}

fn status_line(app_state: &AppState) -> Line<'static> {
    let palette = &app_state.palette;
    let snapshot = &app_state.snapshot;

    if let Some(id) = snapshot.pending_delete.as_deref() {
        let title = snapshot
            .conversation(id)
            .map(|e| return e.title.to_string())
            .unwrap_or_default();
        return Line::from(Span::styled(
            format!("Delete \"{title}\"? (y/n)"),
            Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(notice) = &snapshot.notice {
        let colour = match notice.kind {
            NoticeKind::Info => palette.accent,
            NoticeKind::Success => palette.success,
            NoticeKind::Error => palette.error,
        };
        return Line::from(Span::styled(notice.text.to_string(), Style::default().fg(colour)));
    }

    let who = match &snapshot.username {
        Some(username) if snapshot.authenticated => format!("Logged in as {username}"),
        _ => "Not logged in (Ctrl+L)".to_string(),
    };

    return Line::from(vec![
        Span::styled(who, Style::default().fg(palette.accent)),
        Span::styled(
            " · Ctrl+N new · Tab sidebar · Ctrl+C quit",
            Style::default().fg(palette.muted),
        ),
    ]);
}

fn render_sidebar(frame: &mut Frame, rect: Rect, app_state: &AppState) {
    let palette = &app_state.palette;
    let snapshot = &app_state.snapshot;

    let mut border_style = Style::default().fg(palette.muted);
    if app_state.focus == Focus::Sidebar {
        border_style = Style::default().fg(palette.accent);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title("Conversations");

    if snapshot.conversations.is_empty() {
        frame.render_widget(
            Paragraph::new("No conversations yet.\nCtrl+N starts one.")
                .style(Style::default().fg(palette.muted))
                .wrap(Wrap { trim: true })
                .block(block),
            rect,
        );
        return;
    }

    let items = snapshot
        .conversations
        .iter()
        .enumerate()
        .map(|(idx, conversation)| {
            let mut marker = "  ";
            let mut style = Style::default();
            if snapshot.active.as_deref() == Some(conversation.id.as_str()) {
                marker = "● ";
                style = style.fg(palette.accent).add_modifier(Modifier::BOLD);
            }
            if app_state.focus == Focus::Sidebar && idx == app_state.sidebar_cursor {
                style = style.bg(palette.highlight_bg);
            }

            return ListItem::new(format!("{marker}{}", conversation.title)).style(style);
        })
        .collect::<Vec<ListItem>>();

    frame.render_widget(List::new(items).block(block), rect);
}

fn render_form(frame: &mut Frame, rect: Rect, form: &Form, palette: &Palette, hint: &str) {
    let mut lines = vec![];
    for (idx, field) in form.fields.iter().enumerate() {
        let mut label_style = Style::default().fg(palette.muted);
        let mut cursor = "";
        if idx == form.focused() {
            label_style = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
            cursor = "▏";
        }

        lines.push(Line::from(Span::styled(field.label.to_string(), label_style)));
        lines.push(Line::from(format!("{}{cursor}", field.display_value())));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        hint.to_string(),
        Style::default().fg(palette.muted),
    )));

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX) + 2;
    let area = centered_rect(50, height, rect);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(palette.accent))
                .title(form.title.to_string())
                .padding(Padding::new(1, 1, 0, 0)),
        ),
        area,
    );
}

fn render_auth(frame: &mut Frame, app_state: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(1), Constraint::Length(1)])
        .split(frame.size());

    let mut hint = "Enter log in · Ctrl+R create an account · Esc back";
    let mut form = &app_state.login_form;
    if app_state.snapshot.view == View::Register {
        hint = "Enter register · Esc back to log in";
        form = &app_state.register_form;
    }
    if app_state.snapshot.submitting {
        hint = "Please wait…";
    }

    render_form(frame, layout[0], form, &app_state.palette, hint);
    frame.render_widget(Paragraph::new(status_line(app_state)), layout[1]);
}

fn render_chat(frame: &mut Frame, app_state: &mut AppState, loading: &Loading) {
    let mut main_rect = frame.size();
    if app_state.shows_sidebar() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![
                Constraint::Length(app_state.palette.sidebar_width),
                Constraint::Min(1),
            ])
            .split(frame.size());
        render_sidebar(frame, columns[0], app_state);
        main_rect = columns[1];
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Max(4),
        ])
        .split(main_rect);

    if layout[0].width != app_state.last_known_width
        || layout[0].height != app_state.last_known_height
    {
        app_state.set_rect(layout[0]);
    }

    if app_state.snapshot.messages.is_empty() && !app_state.snapshot.loading {
        let mut placeholder = "Say hi to JaviAI!";
        if !app_state.snapshot.authenticated {
            placeholder = "Log in with Ctrl+L to start chatting.";
        }
        frame.render_widget(
            Paragraph::new(placeholder)
                .style(Style::default().fg(app_state.palette.muted))
                .alignment(Alignment::Center),
            centered_rect(layout[0].width, 1, layout[0]),
        );
    } else {
        app_state
            .bubble_list
            .render(frame, layout[0], app_state.scroll.position);
    }

    frame.render_widget(Paragraph::new(status_line(app_state)), layout[1]);

    if let Some(form) = &app_state.rename_form {
        render_form(
            frame,
            layout[0],
            form,
            &app_state.palette,
            "Enter save · Esc cancel",
        );
    }

    if app_state.snapshot.loading {
        loading.render(frame, layout[2], "JaviAI is typing…");
    } else {
        frame.render_widget(app_state.textarea.widget(), layout[2]);
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let loading = Loading::default();
    let mut events = EventsService::new(rx);

    loop {
        terminal.draw(|frame| {
            if app_state.snapshot.view == View::Chat {
                render_chat(frame, app_state, &loading);
            } else {
                render_auth(frame, app_state);
            }
        })?;

        match events.next().await? {
            Event::ClientUpdate(snapshot) => {
                app_state.apply_snapshot(snapshot);
            }
            Event::KeyboardInput(input) => match app_state.handle_input(input) {
                KeyOutcome::Quit => break,
                KeyOutcome::Dispatch(action) => tx.send(action)?,
                KeyOutcome::Continue => (),
            },
            Event::KeyboardPaste(text) => {
                app_state.handle_paste(&text);
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UIResize() | Event::UITick() => (),
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let theme = ThemeName::parse(Config::get(ConfigKey::Theme)).unwrap_or_default();
    let sidebar_width = Config::get(ConfigKey::SidebarWidth)
        .parse::<u16>()
        .unwrap_or(28);
    let palette = Palette::new(
        theme,
        Config::get(ConfigKey::Sidebar) != "hidden",
        sidebar_width,
    );
    let mut app_state = AppState::new(palette);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
