use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::presentation::UiState;
use crate::view_model::{Event, Mode, ViewModel};

/// Translate a key press into UI state changes and, when the view model
/// needs to know, an event to dispatch.
pub(super) fn handle_key(key: KeyEvent, vm: &ViewModel, ui: &mut UiState) -> Option<Event> {
    if ui.token_prompt.is_some() {
        return handle_token_prompt_key(key, ui);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let mode = vm.mode();
    let suggestions = vm.completions();

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => {
            ui.quit();
            None
        }
        KeyCode::Char('t') if ctrl => {
            ui.open_token_prompt();
            None
        }
        KeyCode::Char('s') if ctrl => Some(Event::Stop),
        KeyCode::Char('a') if ctrl => {
            if mode != Mode::Running {
                ui.input.select_all();
            }
            None
        }
        KeyCode::Tab => {
            ui.toggle_suggestion_popup(suggestions);
            None
        }
        KeyCode::Up => {
            ui.move_selection(-1, suggestions);
            None
        }
        KeyCode::Down => {
            ui.move_selection(1, suggestions);
            None
        }
        KeyCode::Enter => {
            if ui.popup_visible {
                ui.commit_selection(suggestions)
            } else if mode == Mode::Running {
                Some(Event::Stop)
            } else {
                Some(Event::Start)
            }
        }
        KeyCode::Esc => {
            ui.close_popup();
            None
        }
        KeyCode::Left if shift => ui.edit(mode, |input| input.select_left()),
        KeyCode::Right if shift => ui.edit(mode, |input| input.select_right()),
        KeyCode::Left => ui.edit(mode, |input| input.move_left()),
        KeyCode::Right => ui.edit(mode, |input| input.move_right()),
        KeyCode::Home => ui.edit(mode, |input| input.home()),
        KeyCode::End => ui.edit(mode, |input| input.end()),
        KeyCode::Backspace => ui.edit(mode, |input| input.backspace()),
        KeyCode::Char(c) if !ctrl => ui.edit(mode, |input| input.insert(c)),
        _ => None,
    }
}

fn handle_token_prompt_key(key: KeyEvent, ui: &mut UiState) -> Option<Event> {
    match key.code {
        KeyCode::Enter => return ui.submit_token_prompt(),
        KeyCode::Esc => ui.cancel_token_prompt(),
        _ => {
            if let Some(prompt) = ui.token_prompt.as_mut() {
                match key.code {
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        prompt.insert(c)
                    }
                    KeyCode::Backspace => prompt.backspace(),
                    KeyCode::Left => prompt.move_left(),
                    KeyCode::Right => prompt.move_right(),
                    _ => {}
                }
            }
        }
    }
    None
}
