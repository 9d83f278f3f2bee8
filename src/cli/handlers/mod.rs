mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io::{self, BOARD_DIR, BoardError};
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::model::board::Board;
use crate::model::page::{Group, Page, ProgressStatus};
use crate::ops::layout_ops::{self, LayoutError};
use crate::ops::{check, grid, task_ops};

type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Settings shared by every command
struct Context {
    json: bool,
    board_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let board_dir = match cli.board_dir {
        Some(ref dir) => Some(
            std::fs::canonicalize(dir)
                .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        ),
        None => None,
    };
    let ctx = Context {
        json: cli.json,
        board_dir,
    };

    match cli.command {
        // Init runs before any board exists
        Commands::Init(args) => cmd_init(args, cli.board_dir.as_deref()),

        // Read commands
        Commands::Show(args) => cmd_show(&ctx, args),
        Commands::Check => cmd_check(&ctx),

        // Task commands
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Confirm(args) => cmd_confirm(&ctx, args),
        Commands::Rm(args) => cmd_rm(&ctx, args),
        Commands::Mv(args) => cmd_mv(&ctx, args),
        Commands::Title(args) => cmd_title(&ctx, args),
        Commands::Note(args) => cmd_note(&ctx, args),
        Commands::Schedule(args) => cmd_schedule(&ctx, args),
        Commands::Link(args) => cmd_link(&ctx, args),
        Commands::Unlink(args) => cmd_unlink(&ctx, args),

        // Layout
        Commands::Group(args) => cmd_group(&ctx, args.action),
        Commands::Status(args) => cmd_status(&ctx, args.action),
        Commands::Rename(args) => cmd_rename(&ctx, args),
        Commands::Prefix(args) => cmd_prefix(&ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn board_root(ctx: &Context) -> Result<PathBuf, BoardError> {
    let start = match ctx.board_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    board_io::discover_board(&start)
}

fn load_board(ctx: &Context) -> Result<Board, BoardError> {
    board_io::load_board(&board_root(ctx)?)
}

/// Load the board under the write lock, apply `f`, save the page.
fn update_board<T>(ctx: &Context, f: impl FnOnce(&mut Board) -> CmdResult<T>) -> CmdResult<T> {
    let root = board_root(ctx)?;
    let _lock = FileLock::acquire_default(&root.join(BOARD_DIR))?;
    let mut board = board_io::load_board(&root)?;
    let out = f(&mut board)?;
    board_io::save_page(&board)?;
    Ok(out)
}

fn group_index(page: &Page, key: &str) -> Result<usize, LayoutError> {
    page.find_group(key)
        .ok_or_else(|| LayoutError::GroupNotFound(key.to_string()))
}

fn status_index(page: &Page, key: &str) -> Result<usize, LayoutError> {
    page.find_status(key)
        .ok_or_else(|| LayoutError::StatusNotFound(key.to_string()))
}

fn cell_for(page: &Page, group: &str, status: &str) -> Result<usize, LayoutError> {
    Ok(page.cell_index(group_index(page, group)?, status_index(page, status)?))
}

fn parse_time(value: Option<&str>) -> CmdResult<Option<DateTime<Utc>>> {
    let Some(v) = value else {
        return Ok(None);
    };
    let t = DateTime::parse_from_rfc3339(v)
        .map_err(|e| format!("invalid timestamp '{}': {}", v, e))?;
    Ok(Some(t.with_timezone(&Utc)))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &Context, args: ShowArgs) -> CmdResult {
    let board = load_board(ctx)?;
    let only = match args.group {
        Some(ref key) => Some(group_index(&board.page, key)?),
        None => None,
    };
    if ctx.json {
        let json = board_to_json(&board.config.board.name, &board.page, only);
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print!("{}", format_board(&board.config.board.name, &board.page, only));
    }
    Ok(())
}

fn cmd_check(ctx: &Context) -> CmdResult {
    // Read the document raw: load_board refuses inconsistent pages
    let root = board_root(ctx)?;
    let (config, _) = config_io::read_config(&root.join(BOARD_DIR))?;
    let page = board_io::load_page(&root.join(BOARD_DIR).join(&config.page.file))?;
    let result = check::check_page(&page);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_check(&result));
    }

    if result.valid {
        Ok(())
    } else {
        Err(format!("{} error(s) found", result.errors.len()).into())
    }
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let added = update_board(ctx, |board| {
        let group = group_index(&board.page, &args.group)?;
        let status = status_index(&board.page, &args.status)?;
        let prefix = board.config.tasks.provisional_prefix.clone();
        Ok(task_ops::add_task(&mut board.page, group, status, &args.title, &prefix)?)
    })?;

    if ctx.json {
        let json = AddedJson {
            id: added.id,
            index: added.index,
        };
        println!("{}", serde_json::to_string(&json)?);
    } else {
        println!("{}", added.id);
    }
    Ok(())
}

fn cmd_confirm(ctx: &Context, args: ConfirmArgs) -> CmdResult {
    let confirmed = update_board(ctx, |board| {
        // A repeated or late confirmation falls through to the no-op path
        let pending = board.page.find_task(&args.provisional_id).is_some();
        if pending && board.page.find_task(&args.confirmed_id).is_some() {
            return Err(format!("task ID already in use: {}", args.confirmed_id).into());
        }
        Ok(task_ops::confirm_task(
            &mut board.page,
            &args.provisional_id,
            &args.confirmed_id,
        ))
    })?;
    if !confirmed {
        eprintln!("{} no longer exists; nothing to confirm", args.provisional_id);
    }
    Ok(())
}

fn cmd_rm(ctx: &Context, args: RmArgs) -> CmdResult {
    let removed = update_board(ctx, |board| {
        Ok(task_ops::delete_task(&mut board.page, &args.id))
    })?;
    if removed.is_none() {
        eprintln!("{} not found; nothing removed", args.id);
    }
    Ok(())
}

fn cmd_mv(ctx: &Context, args: MvArgs) -> CmdResult {
    update_board(ctx, |board| {
        let from = cell_for(&board.page, &args.group, &args.status)?;
        let to = cell_for(&board.page, &args.to_group, &args.to_status)?;
        grid::move_within_grid(&mut board.page, from, args.index, to, args.to_index)?;
        Ok(())
    })
}

fn cmd_title(ctx: &Context, args: TitleArgs) -> CmdResult {
    update_board(ctx, |board| {
        Ok(task_ops::edit_title(&mut board.page, &args.id, &args.title)?)
    })
}

fn cmd_note(ctx: &Context, args: NoteArgs) -> CmdResult {
    update_board(ctx, |board| {
        Ok(task_ops::set_content(&mut board.page, &args.id, args.content)?)
    })
}

fn cmd_schedule(ctx: &Context, args: ScheduleArgs) -> CmdResult {
    let start = parse_time(args.start.as_deref())?;
    let end = parse_time(args.end.as_deref())?;
    update_board(ctx, |board| {
        if args.clear {
            task_ops::clear_schedules(&mut board.page, &args.id)?;
        } else {
            task_ops::add_schedule(&mut board.page, &args.id, start, end)?;
        }
        Ok(())
    })
}

fn cmd_link(ctx: &Context, args: LinkArgs) -> CmdResult {
    update_board(ctx, |board| {
        Ok(task_ops::link_event(
            &mut board.page,
            &args.id,
            &args.calendar,
            &args.event,
        )?)
    })
}

fn cmd_unlink(ctx: &Context, args: LinkArgs) -> CmdResult {
    let unlinked = update_board(ctx, |board| {
        Ok(task_ops::unlink_event(
            &mut board.page,
            &args.id,
            &args.calendar,
            &args.event,
        )?)
    })?;
    if !unlinked {
        eprintln!("{} was not linked to {}/{}", args.id, args.calendar, args.event);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Layout commands
// ---------------------------------------------------------------------------

fn cmd_group(ctx: &Context, action: LayoutAction) -> CmdResult {
    let change = update_board(ctx, |board| {
        let page = &mut board.page;
        let change = match action {
            LayoutAction::Add { title, color } => {
                let id = layout_ops::generate_id(&title, page.groups.iter().map(|g| g.id.as_str()));
                let mut group = Group::new(id.clone(), title.clone());
                group.color = color;
                layout_ops::add_group(page, group)?;
                layout_change("added", id, title)
            }
            LayoutAction::Rm { key } => {
                let (group, removed) = layout_ops::remove_group(page, &key)?;
                LayoutJson {
                    removed_tasks: Some(removed.len()),
                    ..layout_change("removed", group.id, group.title)
                }
            }
            LayoutAction::Mv { key, to } => {
                layout_ops::move_group(page, &key, to)?;
                let group = &page.groups[to];
                LayoutJson {
                    position: Some(to),
                    ..layout_change("moved", group.id.clone(), group.title.clone())
                }
            }
        };
        Ok(change)
    })?;
    print_layout_change(ctx, "group", &change)
}

fn cmd_status(ctx: &Context, action: LayoutAction) -> CmdResult {
    let change = update_board(ctx, |board| {
        let page = &mut board.page;
        let change = match action {
            LayoutAction::Add { title, color } => {
                let id = layout_ops::generate_id(
                    &title,
                    page.progress_statuses.iter().map(|s| s.id.as_str()),
                );
                let mut status = ProgressStatus::new(id.clone(), title.clone());
                status.color = color;
                layout_ops::add_status(page, status)?;
                layout_change("added", id, title)
            }
            LayoutAction::Rm { key } => {
                let (status, removed) = layout_ops::remove_status(page, &key)?;
                LayoutJson {
                    removed_tasks: Some(removed.len()),
                    ..layout_change("removed", status.id, status.title)
                }
            }
            LayoutAction::Mv { key, to } => {
                layout_ops::move_status(page, &key, to)?;
                let status = &page.progress_statuses[to];
                LayoutJson {
                    position: Some(to),
                    ..layout_change("moved", status.id.clone(), status.title.clone())
                }
            }
        };
        Ok(change)
    })?;
    print_layout_change(ctx, "status", &change)
}

fn layout_change(action: &'static str, id: String, title: String) -> LayoutJson {
    LayoutJson {
        action,
        id,
        title,
        position: None,
        removed_tasks: None,
    }
}

fn print_layout_change(ctx: &Context, kind: &str, change: &LayoutJson) -> CmdResult {
    if ctx.json {
        println!("{}", serde_json::to_string(change)?);
    } else {
        println!("{}", format_layout_change(kind, change));
    }
    Ok(())
}

fn cmd_rename(ctx: &Context, args: RenameArgs) -> CmdResult {
    let root = board_root(ctx)?;
    let board_dir = root.join(BOARD_DIR);
    let _lock = FileLock::acquire_default(&board_dir)?;
    let (_config, mut doc) = config_io::read_config(&board_dir)?;
    config_io::set_board_name(&mut doc, &args.name);
    config_io::write_config(&board_dir, &doc)?;
    Ok(())
}

fn cmd_prefix(ctx: &Context, args: PrefixArgs) -> CmdResult {
    let prefix = args.prefix.trim();
    if prefix.is_empty() || prefix.contains(char::is_whitespace) {
        return Err(format!("invalid provisional prefix: '{}'", args.prefix).into());
    }
    let root = board_root(ctx)?;
    let board_dir = root.join(BOARD_DIR);
    let _lock = FileLock::acquire_default(&board_dir)?;
    let (_config, mut doc) = config_io::read_config(&board_dir)?;
    config_io::set_provisional_prefix(&mut doc, prefix);
    config_io::write_config(&board_dir, &doc)?;
    Ok(())
}
