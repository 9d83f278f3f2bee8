use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::board_io;
use crate::model::page::{Group, Page, ProgressStatus};
use crate::ops::layout_ops::generate_id;

/// Columns used when `--status` is not given
const DEFAULT_STATUSES: [&str; 3] = ["Todo", "Doing", "Done"];
/// Row used when `--group` is not given
const DEFAULT_GROUP: &str = "Tasks";

pub fn cmd_init(args: InitArgs, dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match dir {
        Some(d) => Path::new(d).to_path_buf(),
        None => std::env::current_dir()?,
    };

    let name = match args.name {
        Some(n) => n,
        None => root
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("board")
            .to_string(),
    };

    let page = initial_page(&args.group, &args.status);
    let board = board_io::init_board(&root, &name, &page, args.force)?;
    println!(
        "Initialized board '{}' in {} ({} groups × {} statuses)",
        name,
        board.board_dir.display(),
        board.page.groups.len(),
        board.page.num_statuses()
    );
    Ok(())
}

/// Build the starting layout from the requested titles, falling back to
/// the defaults when none are given.
fn initial_page(groups: &[String], statuses: &[String]) -> Page {
    let group_titles: Vec<&str> = if groups.is_empty() {
        vec![DEFAULT_GROUP]
    } else {
        groups.iter().map(String::as_str).collect()
    };
    let status_titles: Vec<&str> = if statuses.is_empty() {
        DEFAULT_STATUSES.to_vec()
    } else {
        statuses.iter().map(String::as_str).collect()
    };

    let mut group_list: Vec<Group> = Vec::new();
    for title in group_titles {
        let id = generate_id(title, group_list.iter().map(|g| g.id.as_str()));
        group_list.push(Group::new(id, title));
    }
    let mut status_list: Vec<ProgressStatus> = Vec::new();
    for title in status_titles {
        let id = generate_id(title, status_list.iter().map(|s| s.id.as_str()));
        status_list.push(ProgressStatus::new(id, title));
    }
    Page::with_layout(group_list, status_list)
}
