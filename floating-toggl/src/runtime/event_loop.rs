use anyhow::Result;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::api::TimeTrackingApi;
use super::commands::execute;
use super::event_queue::{channel, EventTx};
use super::keys::handle_key;
use crate::presentation::UiState;
use crate::ui;
use crate::view_model::{Event, ViewModel};

const TICK: Duration = Duration::from_millis(100);

/// Owns the view model for the lifetime of the UI. Network work runs on
/// spawned tasks; their results come back through the event queue and are
/// applied here, so state is only ever touched from this loop.
pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    vm: &mut ViewModel,
    ui_state: &mut UiState,
    api: Arc<dyn TimeTrackingApi>,
    refresh_interval: Option<Duration>,
) -> Result<()> {
    let (event_tx, mut event_rx) = channel();

    for command in vm.bootstrap() {
        execute(command, api.clone(), event_tx.clone());
    }
    ui_state.sync(vm);

    let mut last_refresh = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, vm, ui_state))?;

        if event::poll(TICK)? {
            let event = match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(key, vm, ui_state)
                }
                TermEvent::FocusGained => Some(Event::ForegroundChanged(true)),
                TermEvent::FocusLost => Some(Event::ForegroundChanged(false)),
                _ => None,
            };
            if let Some(event) = event {
                dispatch(event, vm, ui_state, &api, &event_tx);
            }
        }

        if let Some(interval) = refresh_interval {
            if last_refresh.elapsed() >= interval {
                dispatch(Event::Refresh, vm, ui_state, &api, &event_tx);
                last_refresh = Instant::now();
            }
        }

        while let Ok(event) = event_rx.try_recv() {
            dispatch(event, vm, ui_state, &api, &event_tx);
        }

        dispatch(Event::Tick, vm, ui_state, &api, &event_tx);

        if !ui_state.running {
            break;
        }
    }

    Ok(())
}

fn dispatch(
    event: Event,
    vm: &mut ViewModel,
    ui_state: &mut UiState,
    api: &Arc<dyn TimeTrackingApi>,
    tx: &EventTx,
) {
    for command in vm.dispatch(event, Instant::now()) {
        execute(command, api.clone(), tx.clone());
    }
    ui_state.sync(vm);
}
