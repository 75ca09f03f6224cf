mod api;
mod commands;
mod event_loop;
mod event_queue;
mod keys;

pub use api::{TimeTrackingApi, TogglApi};
pub use event_loop::run_app;
