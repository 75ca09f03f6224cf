use std::sync::Arc;

use toggl::TogglFetchError;

use super::api::TimeTrackingApi;
use super::event_queue::EventTx;
use crate::view_model::{Command, Event};

/// Run a command on a background task and post its result back to the loop.
pub(super) fn execute(command: Command, api: Arc<dyn TimeTrackingApi>, tx: EventTx) {
    tokio::spawn(async move {
        let event = run_command(command, api.as_ref()).await;
        // The loop has shut down if the receiver is gone; nothing left to update.
        let _ = tx.send(event);
    });
}

/// Failures are logged and reported as "absent".
pub(super) async fn run_command(command: Command, api: &dyn TimeTrackingApi) -> Event {
    let name = command.name();
    tracing::debug!(command = name, "running command");

    match command {
        Command::FetchCurrentEntry { generation, token } => Event::CurrentEntryLoaded {
            generation,
            entry: absent_on_error(api.fetch_current_entry(&token).await, name).flatten(),
        },
        Command::FetchProfile { generation, token } => Event::ProfileLoaded {
            generation,
            profile: absent_on_error(api.fetch_profile(&token).await, name),
        },
        Command::StartEntry {
            generation,
            token,
            description,
            project_id,
        } => Event::CurrentEntryLoaded {
            generation,
            entry: absent_on_error(
                api.start_entry(&token, &description, project_id).await,
                name,
            ),
        },
        Command::StopEntry {
            generation,
            token,
            entry_id,
        } => {
            // The stopped entry is discarded: afterwards nothing is running.
            let _ = absent_on_error(api.stop_entry(&token, entry_id).await, name);
            Event::CurrentEntryLoaded {
                generation,
                entry: None,
            }
        }
    }
}

fn absent_on_error<T>(result: Result<T, TogglFetchError>, command: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(command, error = %e, "request failed, treating result as absent");
            None
        }
    }
}
