//! Rendering tests against ratatui's `TestBackend`.
//!
//! Each test builds App state through events, draws the full UI into an
//! in-memory buffer and checks what a user would see.

use parley_app::{App, AppEvent, ClientConfig, KeyInput, Message, Style, Variant};
use parley_tui::ui;
use ratatui::{Terminal, backend::TestBackend, style::Color};

fn draw(app: &App, width: u16, height: u16) -> Terminal<TestBackend> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();
    terminal
}

fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (0..area.height)
        .map(|y| (0..area.width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
        .collect()
}

fn shows(lines: &[String], text: &str) -> bool {
    lines.iter().any(|line| line.contains(text))
}

fn receive(app: &mut App, content: &str, style: Style) {
    app.handle(AppEvent::MessageReceived(Message::new(content, style)));
}

#[test]
fn markup_is_drawn_verbatim() {
    let mut app = App::new(ClientConfig::preset(Variant::Agent));
    receive(&mut app, "<b>x</b>", Style::Speak);

    let lines = screen(&draw(&app, 40, 10));
    assert!(shows(&lines, "<b>x</b>"));
}

#[test]
fn human_messages_sit_on_the_right() {
    let mut app = App::new(ClientConfig::preset(Variant::Agent));
    receive(&mut app, "hello", Style::Human);
    receive(&mut app, "hi there", Style::Speak);

    let lines = screen(&draw(&app, 40, 10));
    assert!(shows(&lines, "hello│"));
    assert!(shows(&lines, "│hi there"));
}

#[test]
fn replaced_placeholder_is_not_drawn() {
    let mut app = App::new(ClientConfig::preset(Variant::Agent));
    receive(&mut app, "Thinking...", Style::System);
    assert!(shows(&screen(&draw(&app, 40, 10)), "Thinking..."));

    receive(&mut app, "Done", Style::Speak);
    let lines = screen(&draw(&app, 40, 10));
    assert!(!shows(&lines, "Thinking..."));
    assert!(shows(&lines, "Done"));
}

#[test]
fn tone_sets_the_colour() {
    let mut app = App::new(ClientConfig::preset(Variant::Agent));
    receive(&mut app, "ok", Style::Speak);

    let terminal = draw(&app, 40, 10);
    let lines = screen(&terminal);
    let row = lines.iter().position(|line| line.contains("│ok")).unwrap();

    // First column inside the left border
    let cell = &terminal.backend().buffer()[(1, u16::try_from(row).unwrap())];
    assert_eq!(cell.symbol(), "o");
    assert_eq!(cell.fg, Color::Green);
}

#[test]
fn token_dialog_masks_input() {
    let mut app = App::new(ClientConfig::preset(Variant::Gated));
    app.handle(AppEvent::Key(KeyInput::Enter));
    for c in "abc".chars() {
        app.handle(AppEvent::Key(KeyInput::Char(c)));
    }

    let lines = screen(&draw(&app, 60, 16));
    assert!(shows(&lines, "Access token"));
    assert!(shows(&lines, "> ***"));
    assert!(!shows(&lines, "abc"));
}

#[test]
fn scrolled_view_hides_newest_entries() {
    let mut app = App::new(ClientConfig::preset(Variant::Agent));
    app.handle(AppEvent::Resize(40, 12));
    for i in 0..30 {
        receive(&mut app, &format!("m{i}"), Style::Speak);
    }
    assert!(shows(&screen(&draw(&app, 40, 12)), "m29"));

    app.handle(AppEvent::Key(KeyInput::PageUp));
    let lines = screen(&draw(&app, 40, 12));
    assert!(!shows(&lines, "m29"));
    assert!(shows(&lines, "m23"));
}

#[test]
fn status_bar_reports_connection_and_token() {
    let mut app = App::new(ClientConfig::preset(Variant::Gated));
    app.handle(AppEvent::Connected { sid: "abc".into() });

    let lines = screen(&draw(&app, 40, 8));
    let status = lines.last().map(|line| line.trim().to_string()).unwrap();

    insta::assert_snapshot!(status, @"Connected (abc) | Token: missing");
}
