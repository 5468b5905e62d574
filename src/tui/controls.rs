//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;
use crate::season::{Bound, Season};

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char('1') => app.select_season(Season::Winter),
        KeyCode::Char('2') => app.select_season(Season::Spring),
        KeyCode::Char('3') => app.select_season(Season::Summer),
        KeyCode::Char('4') => app.select_season(Season::Autumn),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.next_year(),
        KeyCode::Char('-') | KeyCode::Left => app.prev_year(),
        KeyCode::Char('g' | 'r') | KeyCode::Enter => app.generate(),
        KeyCode::Char('c') => app.toggle_custom(),
        KeyCode::Tab => app.select_next_parameter(),
        KeyCode::Char('[') => app.adjust_range(Bound::Low, -1),
        KeyCode::Char(']') => app.adjust_range(Bound::Low, 1),
        KeyCode::Char('{') => app.adjust_range(Bound::High, -1),
        KeyCode::Char('}') => app.adjust_range(Bound::High, 1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn keys_drive_the_app() {
        let mut app = App::new(RunConfig::default());
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.season, Season::Summer);
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.year, 2025);
        press(&mut app, KeyCode::Char('g'));
        assert!(app.run.is_some());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }

    #[test]
    fn bracket_keys_edit_selected_range() {
        let mut app = App::new(RunConfig::default());
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(']'));
        press(&mut app, KeyCode::Char('{'));
        assert!(app.use_custom);
        let humidity = app.active_ranges().humidity;
        assert_eq!((humidity.low(), humidity.high()), (35.0, 65.0));
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = App::new(RunConfig::default());
        handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.quit);
        assert!(!app.use_custom);
    }
}
