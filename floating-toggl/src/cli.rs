use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "floating-toggl")]
#[command(about = "Start and stop Toggl time entries from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the timer (default)
    Run,
    /// Save the Toggl API token
    SetToken {
        /// Token from https://toggl.com/app/profile
        token: String,
    },
    /// Remove the saved API token
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}
