//! Key bindings.

use super::app::{Command, InputMode};
use crate::editor::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Translate a key press into a command for the current mode.
pub fn map_key(mode: InputMode, key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return Some(Command::Quit);
    }

    match mode {
        InputMode::Dialog => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Command::DialogClose),
            KeyCode::Char('c') | KeyCode::Char('y') => Some(Command::DialogCopy),
            KeyCode::Up => Some(Command::DialogScroll(-1)),
            KeyCode::Down => Some(Command::DialogScroll(1)),
            KeyCode::PageUp => Some(Command::DialogScroll(-10)),
            KeyCode::PageDown => Some(Command::DialogScroll(10)),
            _ => None,
        },
        InputMode::Prompt => match key.code {
            KeyCode::Esc => Some(Command::PromptCancel),
            KeyCode::Enter => Some(Command::PromptSubmit),
            KeyCode::Tab => Some(Command::PromptComplete),
            KeyCode::Backspace => Some(Command::PromptBackspace),
            KeyCode::Char(c) if !ctrl => Some(Command::PromptInput(c)),
            _ => None,
        },
        InputMode::Editing => {
            let action = match key.code {
                KeyCode::Enter if alt => Action::Newline,
                KeyCode::Enter => Action::Commit,
                KeyCode::Esc => Action::Cancel,
                KeyCode::Backspace => Action::Backspace,
                KeyCode::Tab => Action::Input('\t'),
                KeyCode::Char(c) if !ctrl => Action::Input(c),
                _ => return None,
            };
            Some(Command::Editor(action))
        }
        InputMode::Normal => {
            let command = match key.code {
                KeyCode::F(1) => Command::Help,
                KeyCode::F(2) => Command::Load,
                KeyCode::F(3) => Command::Save,
                KeyCode::F(4) => Command::Generate,
                KeyCode::F(5) => Command::PromptOnly,
                KeyCode::F(6) => Command::OpenLlmConfig,
                KeyCode::F(7) => Command::OpenUsage,
                KeyCode::F(8) => Command::OpenGeneralConfig,
                KeyCode::F(9) => Command::About,
                KeyCode::Right => Command::Editor(Action::NextSection),
                KeyCode::Left => Command::Editor(Action::PrevSection),
                KeyCode::Tab => Command::Editor(Action::FocusNext),
                KeyCode::BackTab => Command::Editor(Action::FocusPrev),
                KeyCode::Down => Command::Editor(Action::SelectNext),
                KeyCode::Up => Command::Editor(Action::SelectPrev),
                KeyCode::Enter => Command::Editor(Action::Edit),
                KeyCode::Char('a') if !ctrl => Command::Editor(Action::Add),
                KeyCode::Char('d') if !ctrl => Command::Editor(Action::Remove),
                KeyCode::Delete => Command::Editor(Action::Remove),
                _ => return None,
            };
            Some(command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_ctrl_q_quits_everywhere() {
        for mode in [
            InputMode::Normal,
            InputMode::Editing,
            InputMode::Prompt,
            InputMode::Dialog,
        ] {
            assert_eq!(
                map_key(mode, press(KeyCode::Char('q'), KeyModifiers::CONTROL)),
                Some(Command::Quit)
            );
        }
    }

    #[test]
    fn test_letters_are_commands_only_outside_edit() {
        let a = press(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(
            map_key(InputMode::Normal, a),
            Some(Command::Editor(Action::Add))
        );
        assert_eq!(
            map_key(InputMode::Editing, a),
            Some(Command::Editor(Action::Input('a')))
        );
        assert_eq!(
            map_key(InputMode::Prompt, a),
            Some(Command::PromptInput('a'))
        );
    }

    #[test]
    fn test_enter_variants_in_edit_mode() {
        assert_eq!(
            map_key(InputMode::Editing, press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Command::Editor(Action::Commit))
        );
        assert_eq!(
            map_key(InputMode::Editing, press(KeyCode::Enter, KeyModifiers::ALT)),
            Some(Command::Editor(Action::Newline))
        );
    }

    #[test]
    fn test_function_keys() {
        assert_eq!(
            map_key(InputMode::Normal, press(KeyCode::F(4), KeyModifiers::NONE)),
            Some(Command::Generate)
        );
        assert_eq!(
            map_key(InputMode::Editing, press(KeyCode::F(4), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_release_events_ignored() {
        let mut key = press(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        assert_eq!(map_key(InputMode::Normal, key), None);
    }
}
