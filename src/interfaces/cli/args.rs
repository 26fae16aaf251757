//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Photography portfolio client
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Override the configured project store (rest or local)
    #[arg(long, global = true, value_name = "STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the project gallery
    #[command(visible_alias = "ls")]
    List,

    /// Show one project with its content timeline
    Show {
        id: String,

        /// Highlight this timeline entry
        #[arg(long, value_name = "ENTRY_ID")]
        focus: Option<String>,
    },

    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: Option<String>,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register(RegisterArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Add a new project
    Create(ProjectFields),

    /// Change a project's title, description, cover, date, tools or link
    Edit {
        id: String,

        #[command(flatten)]
        fields: EditFields,
    },

    /// Resize an image file and append it to a project's timeline
    AddImage {
        id: String,

        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Append a text block to a project's timeline
    AddText { id: String, text: String },

    /// Tag a project with a tool
    AddTool { id: String, tool: String },

    /// Remove a tool tag from a project
    RemoveTool {
        id: String,
        tool: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete a project
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Resize and re-encode an image without uploading it
    Normalize {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Write the JPEG here instead of printing the data URI
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    /// Read from stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ProjectFields {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Cover image file, resized before upload
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub image: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub date: String,

    /// Comma-separated tools
    #[arg(long, default_value = "")]
    pub technologies: String,

    #[arg(long, default_value = "")]
    pub link: String,
}

/// Unset flags keep the project's current value.
#[derive(Args, Debug, Clone, Default)]
pub struct EditFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub image: Option<PathBuf>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub technologies: Option<String>,

    #[arg(long)]
    pub link: Option<String>,
}
