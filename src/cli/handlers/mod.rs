mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::cli::commands::*;
use crate::cli::output::{self, activity_to_detail, activity_to_row, report_to_entry};
use crate::io::attach;
use crate::io::board_io;
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::reports_io;
use crate::model::activity::{IssueStatus, Severity, Status};
use crate::model::board::Board;
use crate::model::config::BoardConfig;
use crate::model::quarter::Quarter;
use crate::ops::{activity_ops, check, report_ops, stats};

/// Global override for board directory (set by -C flag)
static BOARD_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for stride_dir_cwd()
    if let Some(ref dir) = cli.board_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        BOARD_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        // No subcommand → board overview
        None => cmd_list(ListArgs { status: None, delayed: false }, json),
        Some(cmd) => match cmd {
            // Init is handled before board discovery
            Commands::Init(args) => cmd_init(args),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Stats => cmd_stats(json),
            Commands::Check => cmd_check(json),

            // Write commands
            Commands::Add(args) => cmd_add(args),
            Commands::Target(args) => cmd_target(args),
            Commands::Start(args) => cmd_start(args),
            Commands::Status(args) => cmd_status(args),
            Commands::Progress(args) => cmd_progress(args),
            Commands::Sub(args) => cmd_sub(args),
            Commands::Note(args) => cmd_note(args),
            Commands::Issue(args) => cmd_issue(args),
            Commands::Attach(args) => cmd_attach(args),

            // Reports and config
            Commands::Report(args) => cmd_report(args, json),
            Commands::User(args) => cmd_user(args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn stride_dir_cwd() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let start = match BOARD_DIR_OVERRIDE.lock().unwrap().as_ref() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let root = board_io::discover_board(&start)?;
    Ok(root.join("stride"))
}

fn load_config(stride_dir: &std::path::Path) -> Result<BoardConfig, Box<dyn std::error::Error>> {
    let (config, _) = config_io::read_config(stride_dir)?;
    Ok(config)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a quarter argument: a `Qn-YYYY` label, or "clear" to unset.
fn parse_quarter_arg(s: &str) -> Result<Option<Quarter>, Box<dyn std::error::Error>> {
    if s.eq_ignore_ascii_case("clear") {
        return Ok(None);
    }
    Ok(Some(s.parse::<Quarter>()?))
}

fn parse_uuid(s: &str, what: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    Uuid::parse_str(s).map_err(|_| format!("invalid {} id: {}", what, s).into())
}

fn parse_status(s: &str) -> Result<Status, Box<dyn std::error::Error>> {
    Status::parse_label(s)
        .ok_or_else(|| format!("unknown status \"{}\" — use on-track, at-risk, not-started, or completed", s).into())
}

fn parse_severity(s: &str) -> Result<Severity, Box<dyn std::error::Error>> {
    Severity::parse_label(s)
        .ok_or_else(|| format!("unknown severity \"{}\" — use low, medium, or high", s).into())
}

fn parse_issue_status(s: &str) -> Result<IssueStatus, Box<dyn std::error::Error>> {
    IssueStatus::parse_label(s)
        .ok_or_else(|| format!("unknown issue status \"{}\" — use open, in-progress, or resolved", s).into())
}

/// Load the board, run a mutation under the write lock, save, and print a
/// confirmation line.
fn with_board_mut<F>(f: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut Board, &BoardConfig) -> Result<String, Box<dyn std::error::Error>>,
{
    let stride_dir = stride_dir_cwd()?;
    let config = load_config(&stride_dir)?;
    let _lock = FileLock::acquire_default(&stride_dir)?;
    let mut board = board_io::load_board(&stride_dir)?;
    let message = f(&mut board, &config)?;
    board_io::save_board(&stride_dir, &board)?;
    println!("{}", message);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stride_dir = stride_dir_cwd()?;
    let board = board_io::load_board(&stride_dir)?;
    let today = today();

    let status_filter = match &args.status {
        Some(s) => Some(parse_status(s)?),
        None => None,
    };

    let rows: Vec<_> = board
        .activities
        .iter()
        .filter(|a| status_filter.is_none_or(|s| a.status == s))
        .map(|a| activity_to_row(a, today))
        .filter(|row| !args.delayed || row.delayed)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("no activities");
        return Ok(());
    }
    for row in &rows {
        println!(
            "{:<32} {:>3}% (exp {:>3}%)  {:<8} {:<12}{}",
            row.id,
            row.progress,
            row.expected_progress,
            output::quarter_label(row.target),
            row.status,
            output::row_flags(row),
        );
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stride_dir = stride_dir_cwd()?;
    let board = board_io::load_board(&stride_dir)?;
    let activity = board
        .activity(&args.id)
        .ok_or_else(|| format!("activity not found: {}", args.id))?;
    let detail = activity_to_detail(activity, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    println!("{} ({})", activity.name, activity.id);
    if let Some(desc) = &activity.description {
        println!("  {}", desc);
    }
    println!(
        "  {} | {}% (expected {}%) | {} → {}{}",
        detail.row.status,
        detail.row.progress,
        detail.row.expected_progress,
        output::quarter_label(activity.start),
        output::quarter_label(activity.target),
        output::row_flags(&detail.row),
    );

    if !detail.subs.is_empty() {
        println!("  sub-items:");
        for sub in &detail.subs {
            println!(
                "    [{}] {:<32} {:>3}%  {}{}",
                if sub.completed { "x" } else { " " },
                sub.name,
                sub.progress,
                output::quarter_label(sub.target),
                if sub.delayed { "  [delayed]" } else { "" },
            );
        }
    }
    if !activity.notes.is_empty() {
        println!("  notes:");
        for note in &activity.notes {
            println!(
                "    {}  {} — {}{}",
                note.id,
                note.author,
                note.content,
                if note.edited { " (edited)" } else { "" },
            );
        }
    }
    if !activity.issues.is_empty() {
        println!("  issues:");
        for issue in &activity.issues {
            println!(
                "    {}  [{:?}/{}] {} — {}",
                issue.id,
                issue.severity,
                issue.status.label(),
                issue.title,
                issue.author,
            );
        }
    }
    if !activity.attachments.is_empty() {
        println!("  attachments:");
        for att in &activity.attachments {
            println!("    {}  {} ({})", att.id, att.name, att.url);
        }
    }
    Ok(())
}

fn cmd_stats(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stride_dir = stride_dir_cwd()?;
    let board = board_io::load_board(&stride_dir)?;
    let stats = stats::board_stats(&board);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("on track:    {}", stats.on_track);
    println!("at risk:     {}", stats.at_risk);
    println!("not started: {}", stats.not_started);
    println!("completed:   {}", stats.completed);
    println!("overall:     {}%", stats.overall_progress);
    Ok(())
}

fn cmd_check(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let stride_dir = stride_dir_cwd()?;
    let board = board_io::load_board(&stride_dir)?;
    let result = check::check_board(&board);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for e in &result.errors {
            println!("error: {:?}", e);
        }
        for w in &result.warnings {
            println!("warning: {:?}", w);
        }
        if result.valid && result.warnings.is_empty() {
            println!("ok");
        }
    }

    if !result.valid {
        return Err(format!("board has {} error(s)", result.errors.len()).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let target = match &args.target {
        Some(s) => Some(s.parse::<Quarter>()?),
        None => None,
    };
    with_board_mut(|board, _| {
        let id = activity_ops::add_activity(board, &args.name, args.desc.clone(), target)?;
        Ok(format!("added {}", id))
    })
}

fn cmd_target(args: QuarterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let quarter = parse_quarter_arg(&args.quarter)?;
    with_board_mut(|board, _| {
        activity_ops::set_target(board, &args.id, quarter)?;
        Ok(format!("{} target → {}", args.id, output::quarter_label(quarter)))
    })
}

fn cmd_start(args: QuarterArgs) -> Result<(), Box<dyn std::error::Error>> {
    let quarter = parse_quarter_arg(&args.quarter)?;
    with_board_mut(|board, _| {
        activity_ops::set_start(board, &args.id, quarter)?;
        Ok(format!("{} start → {}", args.id, output::quarter_label(quarter)))
    })
}

fn cmd_status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let status = parse_status(&args.status)?;
    with_board_mut(|board, _| {
        activity_ops::set_status(board, &args.id, status)?;
        Ok(format!("{} status → {}", args.id, status.label()))
    })
}

fn cmd_progress(args: ProgressArgs) -> Result<(), Box<dyn std::error::Error>> {
    with_board_mut(|board, _| {
        activity_ops::set_progress(board, &args.id, args.percent)?;
        Ok(format!("{} progress → {}%", args.id, args.percent))
    })
}

fn cmd_sub(args: SubCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        SubAction::Add(a) => {
            let target = match &a.target {
                Some(s) => Some(s.parse::<Quarter>()?),
                None => None,
            };
            with_board_mut(|board, _| {
                activity_ops::add_sub_item(board, &a.id, &a.name, target)?;
                Ok(format!("added sub-item \"{}\" under {}", a.name, a.id))
            })
        }
        SubAction::Progress(a) => with_board_mut(|board, _| {
            activity_ops::set_sub_progress(board, &a.id, &a.name, a.percent)?;
            let aggregate = board
                .activity(&a.id)
                .map(|act| act.progress)
                .unwrap_or_default();
            Ok(format!(
                "{} / \"{}\" progress → {}% (aggregate {}%)",
                a.id, a.name, a.percent, aggregate
            ))
        }),
        SubAction::Target(a) => {
            let quarter = parse_quarter_arg(&a.quarter)?;
            with_board_mut(|board, _| {
                activity_ops::set_sub_target(board, &a.id, &a.name, quarter)?;
                Ok(format!(
                    "{} / \"{}\" target → {}",
                    a.id,
                    a.name,
                    output::quarter_label(quarter)
                ))
            })
        }
        SubAction::Done(a) => with_board_mut(|board, _| {
            let completed = activity_ops::toggle_sub_completed(board, &a.id, &a.name)?;
            Ok(format!(
                "{} / \"{}\" → {}",
                a.id,
                a.name,
                if completed { "completed" } else { "not completed" }
            ))
        }),
    }
}

fn cmd_note(args: NoteCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        NoteAction::Add(a) => with_board_mut(|board, config| {
            let note_id = activity_ops::add_note(board, &a.id, a.text.clone(), &config.user.name)?;
            Ok(format!("added note {} to {}", note_id, a.id))
        }),
        NoteAction::Edit(a) => {
            let note_id = parse_uuid(&a.note_id, "note")?;
            with_board_mut(|board, _| {
                activity_ops::edit_note(board, &a.id, note_id, a.text.clone())?;
                Ok(format!("edited note {}", note_id))
            })
        }
        NoteAction::Rm(a) => {
            let note_id = parse_uuid(&a.note_id, "note")?;
            with_board_mut(|board, _| {
                activity_ops::delete_note(board, &a.id, note_id)?;
                Ok(format!("deleted note {}", note_id))
            })
        }
    }
}

fn cmd_issue(args: IssueCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        IssueAction::Add(a) => {
            let severity = parse_severity(&a.severity)?;
            with_board_mut(|board, config| {
                let issue_id = activity_ops::add_issue(
                    board,
                    &a.id,
                    a.title.clone(),
                    a.desc.clone(),
                    severity,
                    &config.user.name,
                )?;
                Ok(format!("reported issue {} on {}", issue_id, a.id))
            })
        }
        IssueAction::Edit(a) => {
            let issue_id = parse_uuid(&a.issue_id, "issue")?;
            let severity = match &a.severity {
                Some(s) => Some(parse_severity(s)?),
                None => None,
            };
            with_board_mut(|board, _| {
                // Merge omitted fields from the current issue
                let current = board
                    .activity(&a.id)
                    .and_then(|act| act.issues.iter().find(|i| i.id == issue_id))
                    .ok_or_else(|| format!("issue not found: {}", issue_id))?;
                let title = a.title.clone().unwrap_or_else(|| current.title.clone());
                let desc = a.desc.clone().unwrap_or_else(|| current.description.clone());
                let severity = severity.unwrap_or(current.severity);
                activity_ops::edit_issue(board, &a.id, issue_id, title, desc, severity)?;
                Ok(format!("edited issue {}", issue_id))
            })
        }
        IssueAction::Status(a) => {
            let issue_id = parse_uuid(&a.issue_id, "issue")?;
            let status = parse_issue_status(&a.status)?;
            with_board_mut(|board, _| {
                activity_ops::set_issue_status(board, &a.id, issue_id, status)?;
                Ok(format!("issue {} → {}", issue_id, status.label()))
            })
        }
        IssueAction::Rm(a) => {
            let issue_id = parse_uuid(&a.issue_id, "issue")?;
            with_board_mut(|board, _| {
                activity_ops::delete_issue(board, &a.id, issue_id)?;
                Ok(format!("deleted issue {}", issue_id))
            })
        }
    }
}

fn cmd_attach(args: AttachCmd) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        AttachAction::Add(a) => {
            let stride_dir = stride_dir_cwd()?;
            let _lock = FileLock::acquire_default(&stride_dir)?;
            let mut board = board_io::load_board(&stride_dir)?;

            // Resolve the activity before copying anything in
            if board.activity(&a.id).is_none() {
                return Err(format!("activity not found: {}", a.id).into());
            }

            let source = PathBuf::from(&a.file);
            let (name, url) = attach::store_attachment(&stride_dir, &source)?;
            let attachment_id = activity_ops::add_attachment(&mut board, &a.id, name.clone(), url)?;
            board_io::save_board(&stride_dir, &board)?;
            println!("attached {} ({}) to {}", name, attachment_id, a.id);
            Ok(())
        }
        AttachAction::Rm(a) => {
            let attachment_id = parse_uuid(&a.attachment_id, "attachment")?;
            let stride_dir = stride_dir_cwd()?;
            let _lock = FileLock::acquire_default(&stride_dir)?;
            let mut board = board_io::load_board(&stride_dir)?;

            let url = board
                .activity(&a.id)
                .and_then(|act| act.attachments.iter().find(|at| at.id == attachment_id))
                .map(|at| at.url.clone());
            activity_ops::delete_attachment(&mut board, &a.id, attachment_id)?;
            board_io::save_board(&stride_dir, &board)?;
            if let Some(url) = url {
                attach::remove_attachment_file(&stride_dir, &url);
            }
            println!("removed attachment {}", attachment_id);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Reports and config
// ---------------------------------------------------------------------------

fn cmd_report(args: ReportCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        ReportAction::Save(a) => {
            let stride_dir = stride_dir_cwd()?;
            let _lock = FileLock::acquire_default(&stride_dir)?;
            let board = board_io::load_board(&stride_dir)?;

            let name = a
                .name
                .unwrap_or_else(|| format!("Report {}", today().format("%Y-%m-%d")));
            let report = report_ops::save_report(&board, name);
            let mut reports = reports_io::load_reports(&stride_dir)?;
            let id = report.id;
            reports.push(report);
            reports_io::save_reports(&stride_dir, &reports)?;
            println!("saved report {}", id);
            Ok(())
        }
        ReportAction::List => {
            let stride_dir = stride_dir_cwd()?;
            let reports = reports_io::load_reports(&stride_dir)?;
            let entries: Vec<_> = reports.iter().map(report_to_entry).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("no saved reports");
            }
            for entry in &entries {
                println!(
                    "{}  {}  {} ({} activities)",
                    entry.id, entry.date, entry.name, entry.activities
                );
            }
            Ok(())
        }
        ReportAction::Load(a) => {
            let report_id = parse_uuid(&a.report_id, "report")?;
            let stride_dir = stride_dir_cwd()?;
            let _lock = FileLock::acquire_default(&stride_dir)?;
            let reports = reports_io::load_reports(&stride_dir)?;
            let report = report_ops::find_report(&reports, report_id)
                .ok_or_else(|| format!("report not found: {}", report_id))?;

            let mut board = board_io::load_board(&stride_dir)?;
            report_ops::load_report(&mut board, report);
            board_io::save_board(&stride_dir, &board)?;
            println!("loaded report \"{}\" ({})", report.name, report.id);
            Ok(())
        }
        ReportAction::Export(a) => {
            let stride_dir = stride_dir_cwd()?;
            let board = board_io::load_board(&stride_dir)?;
            let doc = report_ops::build_report(&board, today());

            let out = a
                .out
                .map(PathBuf::from)
                .unwrap_or_else(|| {
                    PathBuf::from(format!("stride-report-{}.json", today().format("%Y-%m-%d")))
                });
            let content = serde_json::to_string_pretty(&doc)?;
            board_io::atomic_write(&out, content.as_bytes())?;
            println!("exported report to {}", out.display());
            Ok(())
        }
    }
}

fn cmd_user(args: UserArgs) -> Result<(), Box<dyn std::error::Error>> {
    let stride_dir = stride_dir_cwd()?;
    match args.name {
        None => {
            let config = load_config(&stride_dir)?;
            println!("{}", config.user.name);
            Ok(())
        }
        Some(name) => {
            let (_, mut doc) = config_io::read_config(&stride_dir)?;
            config_io::set_user_name(&mut doc, &name);
            config_io::write_config(&stride_dir, &doc)?;
            println!("user → {}", name);
            Ok(())
        }
    }
}
