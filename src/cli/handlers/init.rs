use std::fs;

use crate::cli::commands::InitArgs;
use crate::io::board_io;
use crate::model::board::Board;

const CONFIG_TOML_TEMPLATE: &str = r##"[board]
name = "{name}"

# Author recorded on new notes and issues.
# Change with: sd user <name>
[user]
name = "Team Member"
"##;

/// Infer a board name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + &chars.collect::<String>()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let stride_dir = cwd.join("stride");

    if stride_dir.is_dir() {
        return Err("stride board already exists in ./stride/".into());
    }

    let name = args.name.unwrap_or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .unwrap_or_else(|| "Untitled".to_string())
    });

    fs::create_dir_all(stride_dir.join("attachments"))?;

    let toml_content = CONFIG_TOML_TEMPLATE.replace("{name}", &name);
    fs::write(stride_dir.join("config.toml"), toml_content)?;

    let board = if args.sample {
        Board::sample()
    } else {
        Board::new()
    };
    board_io::save_board(&stride_dir, &board)?;

    println!("Initialized stride board: {}", name);
    if args.sample {
        println!("  seeded {} sample activities", board.activities.len());
    }

    Ok(())
}
