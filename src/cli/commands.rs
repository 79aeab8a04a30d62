use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sd", about = concat!("[|] stride v", env!("CARGO_PKG_VERSION"), " - quarter-based work-stream tracking"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stride board in the current directory
    Init(InitArgs),
    /// List activities with schedule signals (default when no subcommand)
    List(ListArgs),
    /// Show one activity in full
    Show(ShowArgs),
    /// Show board-level statistics
    Stats,
    /// Validate board integrity
    Check,
    /// Add a new activity
    Add(AddArgs),
    /// Set an activity's target quarter
    Target(QuarterArgs),
    /// Set an activity's start quarter
    Start(QuarterArgs),
    /// Set an activity's status
    Status(StatusArgs),
    /// Set progress on an activity without sub-items
    Progress(ProgressArgs),
    /// Manage sub-items
    Sub(SubCmd),
    /// Manage notes
    Note(NoteCmd),
    /// Manage issues
    Issue(IssueCmd),
    /// Manage attachments
    Attach(AttachCmd),
    /// Save, list, load, and export reports
    Report(ReportCmd),
    /// Show or set the configured author name
    User(UserArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Seed the board with sample activities
    #[arg(long)]
    pub sample: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (on-track, at-risk, not-started, completed)
    #[arg(long)]
    pub status: Option<String>,
    /// Show only activities with a delayed sub-item
    #[arg(long)]
    pub delayed: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Activity id to show
    pub id: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Activity name (the id is a slug derived from it)
    pub name: String,
    /// Description
    #[arg(long)]
    pub desc: Option<String>,
    /// Target quarter (e.g. Q4-2025)
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct QuarterArgs {
    /// Activity id
    pub id: String,
    /// Quarter label (e.g. Q4-2025), or "clear" to unset
    pub quarter: String,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Activity id
    pub id: String,
    /// New status (on-track, at-risk, not-started, completed)
    pub status: String,
}

#[derive(Args)]
pub struct ProgressArgs {
    /// Activity id
    pub id: String,
    /// Progress percentage (0-100)
    pub percent: u8,
}

// ---------------------------------------------------------------------------
// Sub-items
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubCmd {
    #[command(subcommand)]
    pub action: SubAction,
}

#[derive(Subcommand)]
pub enum SubAction {
    /// Add a sub-item (progress 0, not completed)
    Add(SubAddArgs),
    /// Set a sub-item's progress (recomputes the parent aggregate)
    Progress(SubProgressArgs),
    /// Set a sub-item's target quarter
    Target(SubTargetArgs),
    /// Toggle a sub-item's completed flag
    Done(SubNameArgs),
}

#[derive(Args)]
pub struct SubAddArgs {
    /// Parent activity id
    pub id: String,
    /// Sub-item name (unique within the parent)
    pub name: String,
    /// Target quarter (e.g. Q2-2025)
    #[arg(long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct SubProgressArgs {
    /// Parent activity id
    pub id: String,
    /// Sub-item name
    pub name: String,
    /// Progress percentage (0-100)
    pub percent: u8,
}

#[derive(Args)]
pub struct SubTargetArgs {
    /// Parent activity id
    pub id: String,
    /// Sub-item name
    pub name: String,
    /// Quarter label (e.g. Q2-2025), or "clear" to unset
    pub quarter: String,
}

#[derive(Args)]
pub struct SubNameArgs {
    /// Parent activity id
    pub id: String,
    /// Sub-item name
    pub name: String,
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct NoteCmd {
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note (stamped with the configured author)
    Add(NoteAddArgs),
    /// Edit a note in place (sets its edited flag)
    Edit(NoteEditArgs),
    /// Delete a note by id
    Rm(NoteIdArgs),
}

#[derive(Args)]
pub struct NoteAddArgs {
    /// Activity id
    pub id: String,
    /// Note text
    pub text: String,
}

#[derive(Args)]
pub struct NoteEditArgs {
    /// Activity id
    pub id: String,
    /// Note id
    pub note_id: String,
    /// Replacement text
    pub text: String,
}

#[derive(Args)]
pub struct NoteIdArgs {
    /// Activity id
    pub id: String,
    /// Note id
    pub note_id: String,
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IssueCmd {
    #[command(subcommand)]
    pub action: IssueAction,
}

#[derive(Subcommand)]
pub enum IssueAction {
    /// Report an issue (status starts Open)
    Add(IssueAddArgs),
    /// Edit an issue's title, description, or severity
    Edit(IssueEditArgs),
    /// Change an issue's workflow status
    Status(IssueStatusArgs),
    /// Delete an issue by id
    Rm(IssueIdArgs),
}

#[derive(Args)]
pub struct IssueAddArgs {
    /// Activity id
    pub id: String,
    /// Issue title
    pub title: String,
    /// Longer description
    #[arg(long, default_value = "")]
    pub desc: String,
    /// Severity (low, medium, high)
    #[arg(long, default_value = "medium")]
    pub severity: String,
}

#[derive(Args)]
pub struct IssueEditArgs {
    /// Activity id
    pub id: String,
    /// Issue id
    pub issue_id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long)]
    pub desc: Option<String>,
    /// New severity (low, medium, high)
    #[arg(long)]
    pub severity: Option<String>,
}

#[derive(Args)]
pub struct IssueStatusArgs {
    /// Activity id
    pub id: String,
    /// Issue id
    pub issue_id: String,
    /// New status (open, in-progress, resolved)
    pub status: String,
}

#[derive(Args)]
pub struct IssueIdArgs {
    /// Activity id
    pub id: String,
    /// Issue id
    pub issue_id: String,
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AttachCmd {
    #[command(subcommand)]
    pub action: AttachAction,
}

#[derive(Subcommand)]
pub enum AttachAction {
    /// Copy a file into the board and attach it
    Add(AttachAddArgs),
    /// Remove an attachment by id
    Rm(AttachRmArgs),
}

#[derive(Args)]
pub struct AttachAddArgs {
    /// Activity id
    pub id: String,
    /// Path to the file to attach
    pub file: String,
}

#[derive(Args)]
pub struct AttachRmArgs {
    /// Activity id
    pub id: String,
    /// Attachment id
    pub attachment_id: String,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ReportCmd {
    #[command(subcommand)]
    pub action: ReportAction,
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Snapshot the current board as a named saved report
    Save(ReportSaveArgs),
    /// List saved reports
    List,
    /// Replace the live board with a saved report
    Load(ReportLoadArgs),
    /// Export a derived JSON report
    Export(ReportExportArgs),
}

#[derive(Args)]
pub struct ReportSaveArgs {
    /// Report name (default: "Report <date>")
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ReportLoadArgs {
    /// Saved report id
    pub report_id: String,
}

#[derive(Args)]
pub struct ReportExportArgs {
    /// Output path (default: stride-report-<date>.json)
    #[arg(long)]
    pub out: Option<String>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct UserArgs {
    /// New author name (omit to show the current one)
    pub name: Option<String>,
}
