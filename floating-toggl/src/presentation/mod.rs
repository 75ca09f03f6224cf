//! UI-side state: the input field, the suggestion popup and the token prompt.
//! Updated from the same event loop as the view model, never from widgets.

use crate::view_model::{Event, Mode, ViewModel};

mod text_input;
pub use text_input::TextInput;

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub input: TextInput,
    pub popup_visible: bool,
    pub selected_index: usize,
    /// `Some` while the "set API token" prompt is open.
    pub token_prompt: Option<TextInput>,
    pub running: bool,

    seen_revision: u64,
    // Set by typing, consumed by the next completions recompute.
    input_dirty: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Apply a keystroke-level edit. Returns the event to dispatch when the
    /// text actually changed.
    pub fn edit(&mut self, mode: Mode, apply: impl FnOnce(&mut TextInput)) -> Option<Event> {
        if mode == Mode::Running {
            return None;
        }

        let before = self.input.value.clone();
        apply(&mut self.input);
        if self.input.value == before {
            return None;
        }

        self.input_dirty = true;
        Some(Event::InputChanged(self.input.value.clone()))
    }

    pub fn toggle_suggestion_popup(&mut self, suggestions: &[String]) {
        if self.popup_visible {
            self.popup_visible = false;
        } else if !suggestions.is_empty() && !self.input.has_multi_char_selection() {
            self.popup_visible = true;
            self.selected_index = 0;
        }
    }

    pub fn close_popup(&mut self) {
        self.popup_visible = false;
    }

    /// Move the highlighted row, stopping at either end.
    pub fn move_selection(&mut self, delta: isize, suggestions: &[String]) {
        if !self.popup_visible || suggestions.is_empty() {
            return;
        }
        let last = suggestions.len() - 1;
        self.selected_index = self.selected_index.saturating_add_signed(delta).min(last);
    }

    /// Replace the input with the highlighted suggestion and close the popup.
    pub fn commit_selection(&mut self, suggestions: &[String]) -> Option<Event> {
        if !self.popup_visible {
            return None;
        }
        let chosen = suggestions.get(self.selected_index)?.clone();
        self.popup_visible = false;
        self.input = TextInput::from_str(&chosen);
        Some(Event::InputChanged(chosen))
    }

    /// Bring the UI state in line with the view model after any dispatch.
    pub fn sync(&mut self, vm: &ViewModel) {
        if vm.mode() == Mode::Running {
            let mirrored = &vm.state().input_text;
            if &self.input.value != mirrored {
                self.input = TextInput::from_str(mirrored);
            }
            self.popup_visible = false;
            self.input_dirty = false;
        }

        let revision = vm.completions_revision();
        if revision == self.seen_revision {
            return;
        }
        self.seen_revision = revision;

        let suggestions = vm.completions();
        if suggestions.is_empty() {
            self.popup_visible = false;
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(suggestions.len() - 1);
            if self.input_dirty && !self.input.has_multi_char_selection() {
                if !self.popup_visible {
                    self.selected_index = 0;
                }
                self.popup_visible = true;
            }
        }
        self.input_dirty = false;
    }

    pub fn open_token_prompt(&mut self) {
        self.popup_visible = false;
        self.token_prompt = Some(TextInput::new());
    }

    /// Close the prompt, returning what was typed. An empty submission
    /// signs out.
    pub fn submit_token_prompt(&mut self) -> Option<Event> {
        let prompt = self.token_prompt.take()?;
        let token = prompt.value.trim().to_string();
        Some(Event::CredentialChanged(
            (!token.is_empty()).then_some(token),
        ))
    }

    pub fn cancel_token_prompt(&mut self) {
        self.token_prompt = None;
    }
}
