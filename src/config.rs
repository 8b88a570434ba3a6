use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TOKEN_FILE: &str = ".activity-signup-token";

/// Terminal client for the class activity signup service
#[derive(Debug, Parser)]
#[command(name = "activity-signup", version, about)]
pub struct Cli {
    /// Root URL of the signup server
    #[arg(long, env = "ACTIVITY_SIGNUP_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// File holding the bearer token between runs
    #[arg(long, env = "ACTIVITY_SIGNUP_TOKEN_FILE", default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every activity (the default)
    List,
    /// Sign in and keep the token for later runs
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "ACTIVITY_SIGNUP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored token
    Logout,
    /// Show who the stored token belongs to
    Whoami,
    /// Register a participant for an activity
    Signup {
        #[arg(short, long)]
        activity: String,
        #[arg(short, long)]
        email: String,
    },
    /// Remove a participant from an activity
    Unregister {
        #[arg(short, long)]
        activity: String,
        #[arg(short, long)]
        email: String,
    },
}
