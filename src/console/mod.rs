use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::{Cell, Table, TableComponent};
use log::{debug, info, warn};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::bot::menu::{Keyboard, START};
use crate::bot::{Bot, Message, Reply};
use crate::chart::Image;
use crate::editor::ButtonHelper;
use crate::session::ChatId;

static COMMAND_HISTORY_FILE: &str = ".budgetbot_history";

/// Chat with the bot from the terminal, acting as one conversation
pub(crate) fn run(bot: &mut Bot, chat_id: ChatId, chart_dir: &Path) -> Result<()> {
    let mut rl = Editor::<ButtonHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(ButtonHelper::new("\x1b[1;32m> \x1b[0m")));
    if rl.load_history(COMMAND_HISTORY_FILE).is_err() {
        info!("No previous history.");
    }

    let buttons = deliver(&bot.handle(&Message::new(chat_id, START)), chart_dir);
    if let Some(helper) = rl.helper_mut() {
        helper.set_buttons(buttons);
    }

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                let buttons = deliver(&bot.handle(&Message::new(chat_id, line)), chart_dir);
                if let Some(helper) = rl.helper_mut() {
                    helper.set_buttons(buttons);
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break
            }
        }
    }

    rl.save_history(COMMAND_HISTORY_FILE)?;
    Ok(())
}

/// Print replies and save images. Returns the buttons of the last keyboard shown.
fn deliver(replies: &[Reply], chart_dir: &Path) -> Vec<String> {
    let mut buttons = vec![];
    for reply in replies {
        match reply {
            Reply::Text { chat_id, text, keyboard } => {
                debug!("Reply to chat {}", chat_id);
                println!("{text}");
                if !keyboard.rows.is_empty() {
                    println!("{}", keyboard_table(keyboard));
                }
                buttons = keyboard.buttons().map(str::to_string).collect();
            }
            Reply::Album { chat_id, images } => {
                debug!("{} images to chat {}", images.len(), chat_id);
                match save_album(images, chart_dir) {
                    Ok(paths) => {
                        for (image, path) in images.iter().zip(paths) {
                            println!("[{}] {}", image.mime, path.display());
                        }
                    }
                    Err(e) => warn!("Unable to save charts: {:#}", e),
                }
            }
        }
    }
    buttons
}

fn keyboard_table(keyboard: &Keyboard) -> Table {
    let mut table = Table::new();
    table.remove_style(TableComponent::HorizontalLines);
    table.remove_style(TableComponent::MiddleIntersections);
    table.remove_style(TableComponent::LeftBorderIntersections);
    table.remove_style(TableComponent::RightBorderIntersections);
    for row in &keyboard.rows {
        table.add_row(row.iter().map(Cell::new));
    }
    table
}

/// Write album images into `dir`, prefixed with the current local time
fn save_album(images: &[Image], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Unable to create {}", dir.display()))?;

    let prefix = Local::now().format("%Y%m%d-%H%M%S");
    let mut paths = vec![];
    for image in images {
        let path = dir.join(format!("{}-{}", prefix, image.file_name));
        fs::write(&path, &image.bytes).with_context(|| format!("Unable to write {}", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}
