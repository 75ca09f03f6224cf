//! The reactive core: one state object mutated only through [`ViewModel::dispatch`].

use std::time::{Duration, Instant};

use time::OffsetDateTime;
use toggl::domain::{TimeEntry, UserProfile};

use crate::credential_store::CredentialStore;
use crate::suggestions;

mod event;
mod state;
pub use event::{Command, Event};
pub use state::{AppState, EntryDisplay, Mode};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

pub struct ViewModel {
    state: AppState,
    store: Box<dyn CredentialStore>,
    debounce: Duration,

    // Latest generation issued per stream; results tagged with anything else are stale.
    current_entry_generation: u64,
    profile_generation: u64,

    completions: Vec<String>,
    completions_revision: u64,
    completions_due: Option<Instant>,
}

impl ViewModel {
    /// Loads the stored credential. Nothing is written back for this initial value.
    pub fn new(store: Box<dyn CredentialStore>, debounce: Duration) -> Self {
        let credential = match store.get() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored api token");
                None
            }
        };

        Self {
            state: AppState::new(credential),
            store,
            debounce,
            current_entry_generation: 0,
            profile_generation: 0,
            completions: Vec::new(),
            completions_revision: 0,
            completions_due: None,
        }
    }

    /// Initial fetches for the credential loaded at startup.
    pub fn bootstrap(&mut self) -> Vec<Command> {
        self.fetch_all()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn completions(&self) -> &[String] {
        &self.completions
    }

    /// Bumped every time `completions` is recomputed.
    pub fn completions_revision(&self) -> u64 {
        self.completions_revision
    }

    pub fn mode(&self) -> Mode {
        if self.state.current_entry.is_some() {
            Mode::Running
        } else if self.state.input_text.is_empty() {
            Mode::Idle
        } else {
            Mode::Composing
        }
    }

    pub fn current_entry_display(&self, now: OffsetDateTime) -> Option<EntryDisplay> {
        self.state
            .current_entry
            .as_ref()
            .map(|entry| EntryDisplay::from_entry(entry, now))
    }

    pub fn dispatch(&mut self, event: Event, now: Instant) -> Vec<Command> {
        match event {
            Event::CredentialChanged(credential) => self.set_credential(credential),
            Event::ForegroundChanged(is_foreground) => self.set_foreground(is_foreground),
            Event::Refresh => self.refresh(),
            Event::InputChanged(text) => {
                self.set_input(text, now);
                Vec::new()
            }
            Event::Start => self.start(),
            Event::Stop => self.stop(),
            Event::Tick => {
                if self.completions_due.is_some_and(|due| due <= now) {
                    self.recompute_completions();
                }
                Vec::new()
            }
            Event::CurrentEntryLoaded { generation, entry } => {
                self.apply_current_entry(generation, entry, now)
            }
            Event::ProfileLoaded {
                generation,
                profile,
            } => {
                self.apply_profile(generation, profile);
                Vec::new()
            }
        }
    }

    fn set_credential(&mut self, credential: Option<String>) -> Vec<Command> {
        let credential = credential
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        if credential == self.state.credential {
            return Vec::new();
        }

        let persisted = match &credential {
            Some(token) => self.store.set(token),
            None => self.store.delete(),
        };
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "could not persist api token");
        }

        tracing::info!(signed_in = credential.is_some(), "api token changed");
        self.state.credential = credential;
        self.fetch_all()
    }

    /// Issues both fetches, or clears both streams when signed out. Either
    /// way anything in flight is superseded.
    fn fetch_all(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        commands.extend(self.fetch_current_entry());
        commands.extend(self.fetch_profile());
        commands
    }

    fn set_foreground(&mut self, is_foreground: bool) -> Vec<Command> {
        let became_foreground = is_foreground && !self.state.is_foreground;
        self.state.is_foreground = is_foreground;

        if became_foreground {
            tracing::debug!("returned to foreground");
            self.refresh()
        } else {
            Vec::new()
        }
    }

    fn refresh(&mut self) -> Vec<Command> {
        self.fetch_current_entry().into_iter().collect()
    }

    fn fetch_current_entry(&mut self) -> Option<Command> {
        self.current_entry_generation += 1;
        match self.state.credential.clone() {
            Some(token) => Some(Command::FetchCurrentEntry {
                generation: self.current_entry_generation,
                token,
            }),
            None => {
                self.state.current_entry = None;
                None
            }
        }
    }

    fn fetch_profile(&mut self) -> Option<Command> {
        self.profile_generation += 1;
        match self.state.credential.clone() {
            Some(token) => Some(Command::FetchProfile {
                generation: self.profile_generation,
                token,
            }),
            None => {
                if self.state.profile.take().is_some() {
                    self.recompute_completions();
                }
                None
            }
        }
    }

    fn set_input(&mut self, text: String, now: Instant) {
        if self.mode() == Mode::Running {
            tracing::debug!("ignoring input while an entry is running");
            return;
        }
        if text == self.state.input_text {
            return;
        }

        self.state.input_text = text;
        self.completions_due = Some(now + self.debounce);
    }

    fn start(&mut self) -> Vec<Command> {
        let Some(token) = self.state.credential.clone() else {
            return Vec::new();
        };

        let description = self.state.input_text.clone();
        let project_id = suggestions::extract_project_hint(&description).and_then(|hint| {
            let projects = self
                .state
                .profile
                .as_ref()
                .map(|p| p.projects.as_slice())
                .unwrap_or_default();
            let project = suggestions::resolve_project(projects, hint);
            if project.is_none() {
                tracing::debug!(hint, "no project matches hint, starting without one");
            }
            project.map(|p| p.id)
        });

        self.current_entry_generation += 1;
        vec![Command::StartEntry {
            generation: self.current_entry_generation,
            token,
            description,
            project_id,
        }]
    }

    fn stop(&mut self) -> Vec<Command> {
        let (Some(token), Some(entry_id)) = (
            self.state.credential.clone(),
            self.state.current_entry.as_ref().map(|e| e.id),
        ) else {
            return Vec::new();
        };

        self.current_entry_generation += 1;
        vec![Command::StopEntry {
            generation: self.current_entry_generation,
            token,
            entry_id,
        }]
    }

    fn apply_current_entry(
        &mut self,
        generation: u64,
        entry: Option<TimeEntry>,
        now: Instant,
    ) -> Vec<Command> {
        if generation != self.current_entry_generation {
            tracing::debug!(
                generation,
                latest = self.current_entry_generation,
                "dropping stale current entry"
            );
            return Vec::new();
        }

        if let Some(entry) = &entry {
            let description = entry.description.clone().unwrap_or_default();
            if description != self.state.input_text {
                self.state.input_text = description;
                self.completions_due = Some(now + self.debounce);
            }
        }
        self.state.current_entry = entry;

        self.fetch_profile().into_iter().collect()
    }

    fn apply_profile(&mut self, generation: u64, profile: Option<UserProfile>) {
        if generation != self.profile_generation {
            tracing::debug!(
                generation,
                latest = self.profile_generation,
                "dropping stale profile"
            );
            return;
        }

        self.state.profile = profile;
        self.recompute_completions();
    }

    fn recompute_completions(&mut self) {
        self.completions =
            suggestions::completions(self.state.profile.as_ref(), &self.state.input_text);
        self.completions_revision += 1;
        self.completions_due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential_store::MemoryCredentialStore;
    use time::macros::datetime;
    use toggl::domain::Project;

    fn entry(id: u64, description: &str) -> TimeEntry {
        TimeEntry {
            id,
            start: datetime!(2017-10-24 10:00 UTC),
            description: Some(description.to_string()),
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            display_name: "Ada".to_string(),
            projects: vec![Project::new(10, "Acme")],
            time_entries: vec![
                TimeEntry {
                    id: 1,
                    start: datetime!(2017-10-23 09:00 UTC),
                    description: Some("Fix bug".to_string()),
                },
                TimeEntry {
                    id: 2,
                    start: datetime!(2017-10-24 09:00 UTC),
                    description: Some("Write report".to_string()),
                },
            ],
        }
    }

    fn signed_in() -> (ViewModel, MemoryCredentialStore) {
        let store = MemoryCredentialStore::with_token("tok");
        let vm = ViewModel::new(Box::new(store.clone()), DEFAULT_DEBOUNCE);
        (vm, store)
    }

    fn generation_of(command: &Command) -> u64 {
        match command {
            Command::FetchCurrentEntry { generation, .. }
            | Command::FetchProfile { generation, .. }
            | Command::StartEntry { generation, .. }
            | Command::StopEntry { generation, .. } => *generation,
        }
    }

    /// Boots a signed-in view model with a loaded profile and nothing running.
    fn loaded() -> (ViewModel, MemoryCredentialStore, Instant) {
        let (mut vm, store) = signed_in();
        let now = Instant::now();
        let commands = vm.bootstrap();
        for command in commands {
            let event = match command {
                Command::FetchCurrentEntry { generation, .. } => Event::CurrentEntryLoaded {
                    generation,
                    entry: None,
                },
                Command::FetchProfile { generation, .. } => Event::ProfileLoaded {
                    generation,
                    profile: Some(profile()),
                },
                other => panic!("unexpected command {other:?}"),
            };
            for follow_up in vm.dispatch(event, now) {
                if let Command::FetchProfile { generation, .. } = follow_up {
                    vm.dispatch(
                        Event::ProfileLoaded {
                            generation,
                            profile: Some(profile()),
                        },
                        now,
                    );
                }
            }
        }
        (vm, store, now)
    }

    #[test]
    fn initial_load_does_not_write_credential() {
        let (mut vm, store) = signed_in();
        let commands = vm.bootstrap();

        assert_eq!(store.set_count(), 0);
        assert_eq!(store.delete_count(), 0);
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], Command::FetchCurrentEntry { .. }));
        assert!(matches!(commands[1], Command::FetchProfile { .. }));
    }

    #[test]
    fn credential_changes_are_persisted_once() {
        let (mut vm, store) = signed_in();
        let now = Instant::now();

        vm.dispatch(Event::CredentialChanged(Some("other".into())), now);
        vm.dispatch(Event::CredentialChanged(Some("other".into())), now);
        assert_eq!(store.set_count(), 1);
        assert_eq!(store.value().as_deref(), Some("other"));

        vm.dispatch(Event::CredentialChanged(None), now);
        assert_eq!(store.delete_count(), 1);
        assert_eq!(store.value(), None);
    }

    #[test]
    fn signing_out_clears_state_without_network() {
        let (mut vm, _store, now) = loaded();
        let running = vm.dispatch(Event::Start, now);
        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&running[0]),
                entry: Some(entry(5, "Work")),
            },
            now,
        );
        assert!(vm.state().current_entry.is_some());

        let commands = vm.dispatch(Event::CredentialChanged(Some("  ".into())), now);

        assert!(commands.is_empty());
        assert_eq!(vm.state().credential, None);
        assert_eq!(vm.state().current_entry, None);
        assert_eq!(vm.state().profile, None);
        assert!(vm.completions().is_empty());
    }

    #[test]
    fn results_in_flight_when_signing_out_are_dropped() {
        let (mut vm, _store) = signed_in();
        let now = Instant::now();
        let commands = vm.bootstrap();

        vm.dispatch(Event::CredentialChanged(None), now);
        for command in commands {
            let event = match command {
                Command::FetchCurrentEntry { generation, .. } => Event::CurrentEntryLoaded {
                    generation,
                    entry: Some(entry(1, "late")),
                },
                Command::FetchProfile { generation, .. } => Event::ProfileLoaded {
                    generation,
                    profile: Some(profile()),
                },
                other => panic!("unexpected command {other:?}"),
            };
            assert!(vm.dispatch(event, now).is_empty());
        }

        assert_eq!(vm.state().current_entry, None);
        assert_eq!(vm.state().profile, None);
    }

    #[test]
    fn newest_current_entry_fetch_wins() {
        let (mut vm, _store, now) = loaded();
        let first = vm.dispatch(Event::Refresh, now);
        let second = vm.dispatch(Event::Refresh, now);

        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&second[0]),
                entry: Some(entry(2, "B")),
            },
            now,
        );
        let follow_up = vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&first[0]),
                entry: Some(entry(1, "A")),
            },
            now,
        );

        assert!(follow_up.is_empty());
        assert_eq!(vm.state().current_entry.as_ref().map(|e| e.id), Some(2));
    }

    #[test]
    fn newest_profile_fetch_wins() {
        let (mut vm, _store) = signed_in();
        let now = Instant::now();
        let first = vm.bootstrap();
        let second = vm.dispatch(Event::CredentialChanged(Some("new".into())), now);

        let mut newer = profile();
        newer.display_name = "Newer".to_string();
        vm.dispatch(
            Event::ProfileLoaded {
                generation: generation_of(&second[1]),
                profile: Some(newer),
            },
            now,
        );
        vm.dispatch(
            Event::ProfileLoaded {
                generation: generation_of(&first[1]),
                profile: Some(profile()),
            },
            now,
        );

        assert_eq!(
            vm.state().profile.as_ref().map(|p| p.display_name.as_str()),
            Some("Newer")
        );
    }

    #[test]
    fn current_entry_result_triggers_profile_fetch() {
        let (mut vm, _store, now) = loaded();
        let refresh = vm.dispatch(Event::Refresh, now);

        let follow_up = vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&refresh[0]),
                entry: None,
            },
            now,
        );

        assert_eq!(follow_up.len(), 1);
        assert!(matches!(follow_up[0], Command::FetchProfile { .. }));
    }

    #[test]
    fn foreground_refresh_is_edge_triggered() {
        let (mut vm, _store, now) = loaded();

        assert!(vm.dispatch(Event::ForegroundChanged(false), now).is_empty());
        let first = vm.dispatch(Event::ForegroundChanged(true), now);
        let second = vm.dispatch(Event::ForegroundChanged(true), now);

        assert_eq!(first.len(), 1);
        assert!(matches!(first[0], Command::FetchCurrentEntry { .. }));
        assert!(second.is_empty());
    }

    #[test]
    fn refresh_without_credential_clears_entry() {
        let store = MemoryCredentialStore::default();
        let mut vm = ViewModel::new(Box::new(store), DEFAULT_DEBOUNCE);

        assert!(vm.bootstrap().is_empty());
        assert!(vm.dispatch(Event::Refresh, Instant::now()).is_empty());
        assert!(vm.dispatch(Event::Start, Instant::now()).is_empty());
        assert_eq!(vm.state().current_entry, None);
    }

    #[test]
    fn completions_are_debounced() {
        let (mut vm, _store, now) = loaded();
        assert_eq!(vm.completions(), ["#Acme", "Write report", "Fix bug"]);

        vm.dispatch(Event::InputChanged("w".into()), now);
        vm.dispatch(Event::InputChanged("wr".into()), now + Duration::from_millis(50));
        vm.dispatch(Event::Tick, now + Duration::from_millis(100));
        assert_eq!(vm.completions(), ["#Acme", "Write report", "Fix bug"]);

        let revision = vm.completions_revision();
        vm.dispatch(Event::Tick, now + Duration::from_millis(260));
        assert_eq!(vm.completions(), ["Write report"]);
        assert_eq!(vm.completions_revision(), revision + 1);
    }

    #[test]
    fn start_resolves_project_hint() {
        let (mut vm, _store, now) = loaded();
        vm.dispatch(Event::InputChanged("#Acme new task".into()), now);

        let commands = vm.dispatch(Event::Start, now);

        assert_eq!(commands.len(), 1);
        match &commands[0] {
            Command::StartEntry {
                description,
                project_id,
                ..
            } => {
                assert_eq!(description, "#Acme new task");
                assert_eq!(*project_id, Some(10));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn start_with_unknown_project_has_no_project() {
        let (mut vm, _store, now) = loaded();
        vm.dispatch(Event::InputChanged("#Nope task".into()), now);

        let commands = vm.dispatch(Event::Start, now);

        assert!(matches!(
            commands[0],
            Command::StartEntry {
                project_id: None,
                ..
            }
        ));
    }

    #[test]
    fn started_entry_becomes_running() {
        let (mut vm, _store, now) = loaded();
        vm.dispatch(Event::InputChanged("Write report".into()), now);
        let start = vm.dispatch(Event::Start, now);

        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&start[0]),
                entry: Some(entry(9, "Write report")),
            },
            now,
        );

        assert_eq!(vm.mode(), Mode::Running);
        // Input is read-only while running.
        vm.dispatch(Event::InputChanged("changed".into()), now);
        assert_eq!(vm.state().input_text, "Write report");
    }

    #[test]
    fn failed_start_leaves_nothing_running() {
        let (mut vm, _store, now) = loaded();
        vm.dispatch(Event::InputChanged("task".into()), now);
        let start = vm.dispatch(Event::Start, now);

        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&start[0]),
                entry: None,
            },
            now,
        );

        assert_eq!(vm.state().current_entry, None);
        assert_eq!(vm.mode(), Mode::Composing);
    }

    #[test]
    fn stop_requires_running_entry() {
        let (mut vm, _store, now) = loaded();
        assert!(vm.dispatch(Event::Stop, now).is_empty());
    }

    #[test]
    fn stop_resets_running_entry() {
        let (mut vm, _store, now) = loaded();
        let refresh = vm.dispatch(Event::Refresh, now);
        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&refresh[0]),
                entry: Some(entry(5, "Fix bug")),
            },
            now,
        );

        let stop = vm.dispatch(Event::Stop, now);
        match &stop[0] {
            Command::StopEntry { entry_id, .. } => assert_eq!(*entry_id, 5),
            other => panic!("unexpected command {other:?}"),
        }

        // The runtime reports every stop, failed or not, as "nothing running".
        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&stop[0]),
                entry: None,
            },
            now,
        );

        assert_eq!(vm.state().current_entry, None);
        assert_eq!(vm.mode(), Mode::Composing);
        assert_eq!(vm.state().input_text, "Fix bug");
    }

    #[test]
    fn start_supersedes_pending_refresh() {
        let (mut vm, _store, now) = loaded();
        let refresh = vm.dispatch(Event::Refresh, now);
        let start = vm.dispatch(Event::Start, now);

        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&start[0]),
                entry: Some(entry(7, "")),
            },
            now,
        );
        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&refresh[0]),
                entry: None,
            },
            now,
        );

        assert_eq!(vm.state().current_entry.as_ref().map(|e| e.id), Some(7));
    }

    #[test]
    fn display_reports_elapsed_time() {
        let (mut vm, _store, now) = loaded();
        let refresh = vm.dispatch(Event::Refresh, now);
        vm.dispatch(
            Event::CurrentEntryLoaded {
                generation: generation_of(&refresh[0]),
                entry: Some(entry(5, "Fix bug")),
            },
            now,
        );

        let display = vm
            .current_entry_display(datetime!(2017-10-24 10:02:05 UTC))
            .unwrap();
        assert_eq!(display.description, "Fix bug");
        assert_eq!(display.elapsed_seconds, 125);
    }
}
