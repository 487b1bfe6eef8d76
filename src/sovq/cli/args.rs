use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sovq")]
#[command(version)]
#[command(about = "Track research reports and the uploads feeding them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (overrides config and SOVQ_DATA_DIR)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Manage uploaded files and their sync status
    #[command(subcommand)]
    Upload(UploadCommands),

    /// Show what the processing agent should work on next
    #[command(alias = "q")]
    Queue,

    /// Counts of reports and uploads by status
    Summary,

    /// Print the markdown rendering of all reports
    #[command(alias = "md")]
    Markdown,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Register a new report (starts as raw-uploaded)
    #[command(alias = "n")]
    Add {
        /// Report name, e.g. a country
        name: String,

        /// sovereign | quasi-sovereign
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        report_type: String,

        #[arg(long, short)]
        description: Option<String>,
    },

    /// List reports, optionally filtered
    #[command(alias = "ls")]
    List {
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        report_type: Option<String>,

        /// needs-research | raw-uploaded | in-progress | completed | needs-update
        #[arg(long, short)]
        status: Option<String>,
    },

    /// Show one report in full
    #[command(alias = "v")]
    Show { id: String },

    /// Change a report's name, status or description
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, short)]
        status: Option<String>,

        #[arg(long, short)]
        description: Option<String>,
    },

    /// Delete a report (its uploads stay)
    #[command(alias = "rm")]
    Delete { id: String },

    /// Record a stored filename against a report
    Attach { id: String, filename: String },

    /// List a report's attachments
    Attachments { id: String },

    /// Apply a JSON list of status changes: [{"id": "...", "status": "..."}]
    BatchStatus { updates: String },
}

#[derive(Subcommand, Debug)]
pub enum UploadCommands {
    /// Store a file and track it as pending-sync
    Put {
        path: PathBuf,

        /// Attach to this report
        #[arg(long, short)]
        report: Option<String>,

        /// Original filename to record (defaults to the file's name)
        #[arg(long)]
        name: Option<String>,
    },

    /// List uploads waiting to be synced
    Pending,

    /// Mark pending uploads as synced
    MarkSynced {
        #[arg(required = true, num_args = 1..)]
        filenames: Vec<String>,
    },

    /// Set an upload's sync status directly
    SetStatus {
        filename: String,

        /// pending-sync | synced | processing | processed
        status: String,
    },

    /// Upload counts per sync status
    Status,

    /// Fetch a stored file
    Download {
        filename: String,

        /// Write to this path instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List every stored filename
    Files,
}
