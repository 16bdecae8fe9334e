use std::path::PathBuf;

use agenda_core::conflict::Decision;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Schedule, request and approve institutional events")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name (API base URL and stored session)
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, sign up and inspect the stored session
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Scheduled events
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Event requests awaiting approval
    Pending {
        #[command(subcommand)]
        command: PendingCommands,
    },
    /// Registered users
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Registrations awaiting approval
    PendingUsers {
        #[command(subcommand)]
        command: PendingUserCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

/// How to answer a scheduling conflict without prompting.
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct ConflictArgs {
    /// Replace the conflicting event without asking
    #[arg(long, conflicts_with = "cancel")]
    pub replace: bool,
    /// Keep the conflicting event and drop this change without asking
    #[arg(long)]
    pub cancel: bool,
}

impl ConflictArgs {
    pub const fn preset(self) -> Option<Decision> {
        if self.replace {
            Some(Decision::Replace)
        } else if self.cancel {
            Some(Decision::Cancel)
        } else {
            None
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Backend base URL (e.g. <https://agenda.example.com>)
        #[arg(long, value_name = "URL")]
        api_base_url: Option<String>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout_secs: Option<u64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in and store the session in the keychain
    Login {
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Create an account (it stays pending until a MASTER approves it)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "EMAIL")]
        email: String,
        #[arg(long, value_name = "PASSWORD")]
        password: String,
        /// MASTER, REQUESTER or USER
        #[arg(long, default_value = "USER")]
        role: String,
    },
    /// Show the stored session
    Status,
    /// Forget the stored session
    Logout,
}

#[derive(Args, Clone, Debug, Default)]
pub struct EventFilterArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Day as YYYY-MM-DD
    #[arg(long)]
    pub day: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub organizer: Option<String>,
    /// PRESENCIAL, ONLINE or HIBRIDO
    #[arg(long)]
    pub mode: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub administrative_status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// List events
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one event
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create an event from a JSON form file or in $EDITOR
    Create {
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
        #[command(flatten)]
        conflict: ConflictArgs,
    },
    /// Edit an event from a JSON form file or in $EDITOR
    Edit {
        id: String,
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
        #[command(flatten)]
        conflict: ConflictArgs,
    },
    /// Delete an event
    Delete { id: String },
    /// Search events by field
    Search {
        #[command(flatten)]
        filters: EventFilterArgs,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum PendingCommands {
    /// List all pending requests
    List {
        #[arg(long)]
        json: bool,
    },
    /// List requests made by the signed-in user
    Mine {
        #[arg(long)]
        json: bool,
    },
    /// Show one pending request
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Request a new event
    Create {
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Edit a pending request
    Edit {
        id: String,
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Delete a pending request
    Delete { id: String },
    /// Approve a request, promoting it to an event
    Approve {
        id: String,
        #[command(flatten)]
        conflict: ConflictArgs,
    },
    /// Reject a request
    Reject { id: String },
}

#[derive(Args, Clone, Debug, Default)]
pub struct UserEditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_name = "EMAIL")]
    pub email: Option<String>,
    /// New password; the current one is kept when omitted
    #[arg(long, value_name = "PASSWORD")]
    pub password: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List registered users
    List {
        #[arg(long)]
        json: bool,
    },
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    Edit {
        id: String,
        #[command(flatten)]
        changes: UserEditArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PendingUserCommands {
    /// List registrations awaiting approval
    List {
        #[arg(long)]
        json: bool,
    },
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    Edit {
        id: String,
        #[command(flatten)]
        changes: UserEditArgs,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
    },
    Delete {
        id: String,
    },
}
