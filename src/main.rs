use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod error;
mod state;
mod ui;

use error::BoardResult;
use state::registry::BoardRegistry;
use ui::terminal::TerminalView;
use ui::view::BoardView;

/// File filters handed to the open dialogs, comma-separated extensions
const IMAGE_FILTER: &str = "png,jpg,jpeg,bmp,gif";
const BOARD_FILTER: &str = "refboard";

#[derive(Parser)]
#[command(name = "refboard", about = "Floating reference-image boards with persistent layouts")]
struct Cli {
    /// Board file to open at startup; starts an empty board when omitted
    board: Option<PathBuf>,

    /// Log filter, e.g. "info" or "refboard=debug"
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)),
        )
        .init();

    let mut registry = BoardRegistry::new(Box::new(|_| Box::new(TerminalView)));
    let mut active = match registry.open_board(cli.board.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    };

    println!("refboard - type \"help\" for commands");
    let stdin = io::stdin();
    loop {
        print!("refboard> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Commands on the active board
        if let Some(board) = registry.board_mut(active) {
            match parts.as_slice() {
                [] => continue,
                ["help"] => {
                    print_help();
                    continue;
                }
                ["list"] => {
                    if board.model().reference_images.is_empty() {
                        println!("(no images)");
                    }
                    for (name, image) in &board.model().reference_images {
                        let hidden = if image.view_hidden { " [hidden]" } else { "" };
                        println!("{name}: {} zoom {}{hidden}", image.path, image.zoom);
                    }
                    continue;
                }
                ["add"] => {
                    let mut picker = TerminalView;
                    if let Some(path) = picker.request_open_path(IMAGE_FILTER) {
                        report(board.add_image(&path));
                    }
                    continue;
                }
                ["add", path] => {
                    report(board.add_image(Path::new(path)));
                    continue;
                }
                ["del", name] => {
                    report(board.delete_image(name));
                    continue;
                }
                ["info", name] => {
                    match board.image(name) {
                        Ok(image) => {
                            println!(
                                "{name}: {}\n  z_order {}  zoom {}  hidden {}\n  \
                                 center ({}, {})  size {}x{}  position ({}, {})",
                                image.path,
                                image.z_order,
                                image.zoom,
                                image.view_hidden,
                                image.image_center.x,
                                image.image_center.y,
                                image.view_size.w,
                                image.view_size.h,
                                image.view_position.w,
                                image.view_position.h,
                            );
                        }
                        Err(e) => println!("error: {e}"),
                    }
                    continue;
                }
                ["zoom", name, factor] => {
                    match (factor.parse::<f64>(), board.image(name).cloned()) {
                        (Ok(zoom), Ok(image)) => report(board.update_image_view(
                            name,
                            zoom,
                            image.image_center,
                            image.view_size,
                            image.view_position,
                        )),
                        (Err(_), _) => println!("error: \"{factor}\" is not a number"),
                        (_, Err(e)) => println!("error: {e}"),
                    }
                    continue;
                }
                ["move", name, x, y] => {
                    match (x.parse::<f64>(), y.parse::<f64>(), board.image(name).cloned()) {
                        (Ok(x), Ok(y), Ok(image)) => report(board.update_image_view(
                            name,
                            image.zoom,
                            image.image_center,
                            image.view_size,
                            state::model::Extent { w: x, h: y },
                        )),
                        (_, _, Err(e)) => println!("error: {e}"),
                        _ => println!("error: position must be two numbers"),
                    }
                    continue;
                }
                ["rename", old, new] => {
                    report(board.rename_image(old, new));
                    continue;
                }
                ["name", rest @ ..] if !rest.is_empty() => {
                    board.rename_board(&rest.join(" "));
                    continue;
                }
                ["hide", "all"] => {
                    board.set_all_hidden(true);
                    continue;
                }
                ["show", "all"] => {
                    board.set_all_hidden(false);
                    continue;
                }
                ["hide", name] => {
                    report(board.set_image_hidden(name, true));
                    continue;
                }
                ["show", name] => {
                    report(board.set_image_hidden(name, false));
                    continue;
                }
                ["save"] => {
                    report(board.save(false));
                    continue;
                }
                ["saveas"] => {
                    report(board.save(true));
                    continue;
                }
                _ => {}
            }
        }

        // Session-level commands
        match parts.as_slice() {
            ["new"] => match registry.open_board(None) {
                Ok(id) => active = id,
                Err(e) => println!("error: {e}"),
            },
            ["open"] => {
                let mut picker = TerminalView;
                if let Some(path) = picker.request_open_path(BOARD_FILTER) {
                    match registry.open_board(Some(&path)) {
                        Ok(id) => active = id,
                        Err(e) => println!("error: {e}"),
                    }
                }
            }
            ["open", path] => match registry.open_board(Some(Path::new(path))) {
                Ok(id) => active = id,
                Err(e) => println!("error: {e}"),
            },
            ["boards"] => {
                for id in registry.ids() {
                    if let Some(board) = registry.board(id) {
                        let marker = if id == active { "*" } else { " " };
                        let dirty = if board.is_modified() { " (modified)" } else { "" };
                        let location = match board.path() {
                            Some(path) => path.display().to_string(),
                            None => "(never saved)".to_string(),
                        };
                        println!("{marker}{}: {}{dirty} - {location}", board.board_id(), board.name());
                    }
                }
            }
            ["switch", id] => match id.parse::<u64>() {
                Ok(id) if registry.board(id).is_some() => active = id,
                _ => println!("no board with id {id}"),
            },
            ["close"] => {
                if registry.close_board(active) {
                    match registry.ids().first() {
                        Some(&next) => active = next,
                        None => break,
                    }
                }
            }
            ["quit"] | ["exit"] => {
                for id in registry.ids() {
                    registry.close_board(id);
                }
                if registry.is_empty() {
                    break;
                }
                println!("quit aborted, {} board(s) still open", registry.len());
                if registry.board(active).is_none() {
                    if let Some(&next) = registry.ids().first() {
                        active = next;
                    }
                }
            }
            [] => {}
            _ => println!("unknown command, try \"help\""),
        }
    }
}

fn report<T>(result: BoardResult<T>) {
    if let Err(e) = result {
        println!("error: {e}");
    }
}

fn print_help() {
    println!(
        "board commands:\n\
         \x20 list              list images on the active board\n\
         \x20 add [PATH]        add an image (dialog when no path given)\n\
         \x20 del NAME          remove an image\n\
         \x20 info NAME         show an image's display state\n\
         \x20 zoom NAME FACTOR  set an image's zoom factor\n\
         \x20 move NAME X Y     set an image's window position\n\
         \x20 rename OLD NEW    rename an image\n\
         \x20 name NEW          rename the board\n\
         \x20 hide NAME|all     hide an image / all images\n\
         \x20 show NAME|all     reveal an image / all images\n\
         \x20 save              save the board\n\
         \x20 saveas            save the board under a new path\n\
         session commands:\n\
         \x20 new               open a fresh empty board\n\
         \x20 open [PATH]       open a board file (dialog when no path given)\n\
         \x20 boards            list open boards\n\
         \x20 switch ID         make another board active\n\
         \x20 close             close the active board\n\
         \x20 quit              close all boards and exit"
    );
}
