use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - a kanban board in one JSON page"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new board in the current directory
    Init(InitArgs),
    /// Show the board grid
    Show(ShowArgs),
    /// Validate the page document
    Check,
    /// Add a task to the end of a cell (provisional until confirmed)
    Add(AddArgs),
    /// Confirm a provisional task with its stored ID
    Confirm(ConfirmArgs),
    /// Remove a task
    Rm(RmArgs),
    /// Move a task between cell positions
    Mv(MvArgs),
    /// Change task title
    Title(TitleArgs),
    /// Set task content
    Note(NoteArgs),
    /// Add or clear schedule slots
    Schedule(ScheduleArgs),
    /// Link a calendar event to a task
    Link(LinkArgs),
    /// Unlink a calendar event from a task
    Unlink(LinkArgs),
    /// Group (row) management
    Group(GroupCmd),
    /// Progress status (column) management
    Status(StatusCmd),
    /// Rename the board
    Rename(RenameArgs),
    /// Set the ID prefix for provisional tasks
    Prefix(PrefixArgs),
}

// ---------------------------------------------------------------------------
// Init / read args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Initial group title (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub group: Vec<String>,
    /// Initial progress status title (repeatable; default: Todo, Doing, Done)
    #[arg(long, action = clap::ArgAction::Append)]
    pub status: Vec<String>,
    /// Reinitialize even if board/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Only show this group (ID or title)
    #[arg(long)]
    pub group: Option<String>,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Group ID or title
    pub group: String,
    /// Progress status ID or title
    pub status: String,
    /// Task title
    pub title: String,
}

#[derive(Args)]
pub struct ConfirmArgs {
    /// Provisional ID printed by `tb add`
    pub provisional_id: String,
    /// ID assigned by the store
    pub confirmed_id: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Source group
    pub group: String,
    /// Source status
    pub status: String,
    /// Position in the source cell (0-based)
    pub index: usize,
    /// Destination group
    pub to_group: String,
    /// Destination status
    pub to_status: String,
    /// Position in the destination cell (0-based)
    pub to_index: usize,
}

#[derive(Args)]
pub struct TitleArgs {
    /// Task ID
    pub id: String,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct NoteArgs {
    /// Task ID
    pub id: String,
    /// Content text (empty clears it)
    pub content: String,
}

#[derive(Args)]
pub struct ScheduleArgs {
    /// Task ID
    pub id: String,
    /// Slot start (RFC 3339)
    #[arg(long)]
    pub start: Option<String>,
    /// Slot end (RFC 3339)
    #[arg(long)]
    pub end: Option<String>,
    /// Remove all slots instead of adding one
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub clear: bool,
}

#[derive(Args)]
pub struct LinkArgs {
    /// Task ID
    pub id: String,
    /// Calendar ID
    pub calendar: String,
    /// Event ID
    pub event: String,
}

// ---------------------------------------------------------------------------
// Layout args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct GroupCmd {
    #[command(subcommand)]
    pub action: LayoutAction,
}

#[derive(Args)]
pub struct StatusCmd {
    #[command(subcommand)]
    pub action: LayoutAction,
}

#[derive(Subcommand)]
pub enum LayoutAction {
    /// Append a new row/column
    Add {
        /// Title
        title: String,
        /// Display color (e.g. "#44DDFF")
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a row/column and its tasks
    Rm {
        /// ID or title
        key: String,
    },
    /// Move a row/column to a new position
    Mv {
        /// ID or title
        key: String,
        /// Target position (0-based)
        to: usize,
    },
}

#[derive(Args)]
pub struct RenameArgs {
    /// New board name
    pub name: String,
}

#[derive(Args)]
pub struct PrefixArgs {
    /// New prefix (e.g. "draft" gives draft-1, draft-2, ...)
    pub prefix: String,
}
