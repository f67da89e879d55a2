//! Whole editing sessions driven through an in-memory display.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use gridedit::display::MemoryDisplay;
use gridedit::editor::{Action, Editor};
use gridedit::markup::{Point, Style, plain_text};
use gridedit::ui::IndexEntry;

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn with(code: KeyCode, modifiers: KeyModifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

fn ctrl(c: char) -> Event {
    with(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn typed(text: &str) -> Vec<Event> {
    text.chars().map(|c| key(KeyCode::Char(c))).collect()
}

fn run(width: u16, height: u16, initial: &str, events: Vec<Event>) -> Editor<MemoryDisplay> {
    let display = MemoryDisplay::new(width, height).with_events(events);
    let mut editor = Editor::new(display);
    editor.edit(initial).unwrap();
    editor
}

#[test]
fn test_type_cut_paste_undo_redo() {
    let mut events = typed("hello");
    events.push(key(KeyCode::Enter));
    events.extend(typed("world"));
    events.extend((0..5).map(|_| with(KeyCode::Left, KeyModifiers::SHIFT)));
    events.push(ctrl('x'));
    events.push(key(KeyCode::Up));
    events.push(ctrl('v'));
    events.push(ctrl('z'));
    events.push(ctrl('y'));
    events.push(ctrl('w'));

    let editor = run(20, 5, "", events);
    assert_eq!(editor.content(), "worldhello\n");
    assert_eq!(editor.paste_buffer(), ["world"]);
    assert_eq!(editor.cursor(), Point::new(5, 0));
    assert_eq!(editor.display().row_text(0).trim_end(), "worldhello");
    assert!(editor.display().is_closed());
}

#[test]
fn test_undo_restores_cut_text() {
    let mut events = typed("abc");
    events.push(with(KeyCode::Left, KeyModifiers::SHIFT));
    events.push(ctrl('x'));
    events.push(ctrl('z'));

    let editor = run(20, 5, "", events);
    assert_eq!(editor.content(), "ab<select-to>c<select-from>");
    assert!(editor.is_selecting());
}

#[test]
fn test_ctrl_right_skips_whitespace_run() {
    let mut events = vec![key(KeyCode::Right), key(KeyCode::Right)];
    events.push(with(KeyCode::Right, KeyModifiers::CONTROL));
    events.extend(typed("X"));

    let editor = run(20, 5, "ab   cd", events);
    assert_eq!(editor.content(), "ab   Xcd");
}

#[test]
fn test_up_on_first_row_changes_nothing() {
    let events = vec![key(KeyCode::Right), key(KeyCode::Up)];
    let editor = run(20, 5, "abc\ndef", events);
    assert_eq!(editor.cursor(), Point::new(1, 0));
    assert_eq!(editor.display().cursor(), Some((1, 0)));
}

#[test]
fn test_typed_markup_stays_literal() {
    let editor = run(40, 5, "", typed("<select-from>&amp;"));
    assert_eq!(editor.content(), "&lt;select-from&gt;&amp;amp;");
    assert_eq!(plain_text(&editor.content()), "<select-from>&amp;");
    assert!(!editor.is_selecting());
}

#[test]
fn test_long_lines_wrap_on_screen() {
    let editor = run(4, 3, "abcdefghij", Vec::new());
    assert_eq!(editor.display().row_text(0), "abcd");
    assert_eq!(editor.display().row_text(1), "efgh");
    assert_eq!(editor.display().row_text(2), "ij  ");
}

#[test]
fn test_resize_rewraps_and_clamps_cursor() {
    let mut events = vec![key(KeyCode::Down)];
    events.extend((0..7).map(|_| key(KeyCode::Right)));
    let mut editor = run(20, 5, "abcdefgh\nij", events);
    assert_eq!(editor.cursor(), Point::new(2, 1));
    assert_eq!(editor.view().rendered().text_lines(), ["abcdefgh", "ij"]);

    editor.display_mut().resize(3, 2);
    editor.apply(Action::Resize);
    assert_eq!(
        editor.view().rendered().text_lines(),
        ["abc", "def", "gh", "ij"]
    );
    assert_eq!(editor.cursor(), Point::new(2, 1));
    assert_eq!(
        editor.view().entry_at_cursor(),
        Some(IndexEntry::Char(Point::new(5, 0)))
    );
    assert_eq!(editor.content(), "abcdefgh\nij");
}

#[test]
fn test_moving_down_scrolls() {
    let text = (0..10).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
    let events = (0..5).map(|_| key(KeyCode::Down)).collect();
    let editor = run(20, 3, &text, events);
    assert_eq!(editor.view().viewport().offset(), 3);
    assert!(editor.display().row_text(0).starts_with("line3"));
    assert_eq!(editor.cursor(), Point::new(0, 2));
}

#[test]
fn test_selection_is_drawn_inverted() {
    let events = vec![with(KeyCode::Right, KeyModifiers::SHIFT)];
    let editor = run(20, 3, "ab", events);
    assert_eq!(editor.display().cell_style(0, 0), Some(Style::SELECTED));
    assert_eq!(editor.display().cell_style(1, 0), Some(Style::TEXT));
}

#[test]
fn test_colored_text_keeps_its_style() {
    let editor = run(20, 3, "<color:ff0000:00ff00>r", Vec::new());
    assert_eq!(
        editor.display().cell_style(0, 0),
        Style::from_hex("ff0000", "00ff00")
    );
    assert_eq!(editor.display().cell_style(1, 0), Some(Style::BLANK));
}

#[test]
fn test_tab_and_word_delete() {
    let mut events = vec![key(KeyCode::Tab)];
    events.extend(typed("word"));
    events.push(ctrl('h'));
    let editor = run(20, 3, "", events);
    assert_eq!(editor.content(), "    ");
}
