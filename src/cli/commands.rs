use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

const VERSION: &str = env!("TASKDESK_BUILD_VERSION");

#[derive(Parser)]
#[command(
    name = "taskdesk",
    version = VERSION,
    about = "Task group authoring for workforce scheduling",
    after_help = "\
NOTE:
  All state lives in memory for the duration of one command.
  `group create` and `session` start from empty stores.

EXIT CODES:
  0  Success
  1  Error (validation, malformed input, config, or any failed session op)

IDS:
  Tasks are T-NNN, task groups TG-NNN. New ids continue from the highest
  id seen in the session and are never reused after a delete."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (JSON). Falls back to $TASKDESK_CONFIG
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List reference data used by the authoring form
    Catalog {
        #[arg(value_enum)]
        kind: CatalogKind,
    },

    /// Task group authoring
    #[command(subcommand)]
    Group(GroupCommands),

    /// Run a JSON-lines script of operations against one workspace
    #[command(after_help = "\
SCRIPT FORMAT:
  One JSON object per line, tagged by \"op\". Blank lines and lines starting
  with # are skipped. Examples:
    {\"op\":\"add_task\",\"name\":\"Sweep\",\"skill\":\"Operator\"}
    {\"op\":\"draft_set\",\"field\":\"department\",\"value\":\"Production\"}
    {\"op\":\"draft_submit\"}
    {\"op\":\"advance\",\"secs\":3}

NOTE:
  The session clock is virtual: it only moves on `advance`.
  A failing op is reported and the script continues.")]
    Session {
        /// Script file; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a task group from stdin JSON
    #[command(after_help = "\
STDIN FORMAT:
  {\"name\":\"Audit\", \"typeOfTG\":\"One-time\", \"unit\":\"Unit 1\",
   \"department\":\"Production\",
   \"tasks\":[{\"name\":\"Inspect\", \"assignToRole\":\"Auditor\", \"stepNumber\":\"1\"}]}

NOTE:
  Tasks are staged in order; dependentSteps may only name earlier steps.
  One repository task is created per embedded task.")]
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    Types,
    Skills,
    Units,
    Departments,
    Roles,
    GroupTypes,
}
