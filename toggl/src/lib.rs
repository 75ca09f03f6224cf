mod auth;
mod client;
pub mod domain;
mod toggl_url;

pub use auth::*;
pub use client::*;
pub use toggl_url::*;
