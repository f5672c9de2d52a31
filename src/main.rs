//! CLI entry point for menubar-search.
//!
//! Diagnostic access to the same facade a host launcher embeds.
//!
//! # Usage
//!
//! ```bash
//! # Check if accessibility permissions are granted
//! menubar-search --check-permissions
//!
//! # List every actionable menu item of the frontmost application
//! menubar-search --list
//!
//! # Rank items against a query
//! menubar-search --search "paste"
//!
//! # Activate the best match
//! menubar-search --activate "new window"
//! ```

use std::env;
use std::process;

/// CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    /// Check if accessibility permissions are granted.
    CheckPermissions,
    /// List all items of the frontmost application.
    List { json: bool },
    /// Rank items against a query string.
    Search(String),
    /// Activate the best match for a query string.
    Activate(String),
    /// Show the help message.
    Help,
}

/// Parse command line arguments into the command to execute.
fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Ok(Command::Help);
    }

    match args[1].as_str() {
        "--check-permissions" | "-c" => Ok(Command::CheckPermissions),
        "--list" | "-l" => Ok(Command::List {
            json: args.get(2).map(String::as_str) == Some("--json"),
        }),
        "--search" | "-s" => match args.get(2) {
            Some(query) => Ok(Command::Search(query.clone())),
            None => Err("--search requires a query argument".into()),
        },
        "--activate" | "-a" => match args.get(2) {
            Some(query) => Ok(Command::Activate(query.clone())),
            None => Err("--activate requires a query argument".into()),
        },
        "--help" | "-h" => Ok(Command::Help),
        other => Err(format!("unknown option: {}", other)),
    }
}

fn print_help() {
    println!("menubar-search - search the frontmost application's menu bar items");
    println!();
    println!("USAGE:");
    println!("    menubar-search [OPTION]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --check-permissions    Print {{\"enabled\": bool}} for the accessibility gate");
    println!("    -l, --list [--json]        List every actionable item of the frontmost app");
    println!("    -s, --search <QUERY>       Rank items against QUERY");
    println!("    -a, --activate <QUERY>     Perform the press action of the best match");
    println!("    -h, --help                 Show this message");
    println!();
    println!("The frontmost application is whichever app has focus when the command");
    println!("runs; invoke from a terminal while the target app is active.");
}

fn main() {
    env_logger::init();

    let command = match parse_args() {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_help();
            process::exit(2);
        }
    };

    log::debug!("executing command: {:?}", command);
    process::exit(run(command));
}

#[cfg(target_os = "macos")]
fn run(command: Command) -> i32 {
    use menubar_search::{CancelFlag, MenuSearch};

    match command {
        Command::Help => {
            print_help();
            0
        }
        Command::CheckPermissions => {
            let enabled = menubar_search::platform::macos::permissions::trusted();
            println!("{}", serde_json::json!({ "enabled": enabled }));
            if enabled {
                0
            } else {
                1
            }
        }
        Command::List { json } => {
            let search = MenuSearch::system();
            match search.query("", &CancelFlag::new()) {
                Ok(results) if json => {
                    let infos: Vec<_> = results.iter().map(|r| r.record.info()).collect();
                    println!("{}", serde_json::to_string_pretty(&infos).unwrap_or_default());
                    0
                }
                Ok(results) => {
                    for ranked in &results {
                        print_row(&ranked.record.breadcrumb(), &ranked.record.shortcut);
                    }
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
        Command::Search(query) => {
            let search = MenuSearch::system();
            match search.query(&query, &CancelFlag::new()) {
                Ok(results) if results.is_empty() => {
                    eprintln!("No menu items match \"{}\"", query);
                    1
                }
                Ok(results) => {
                    for ranked in &results {
                        print_row(&ranked.record.breadcrumb(), &ranked.record.shortcut);
                    }
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
        Command::Activate(query) => {
            let search = MenuSearch::system();
            match search.query(&query, &CancelFlag::new()) {
                Ok(results) => match results.first() {
                    Some(best) => {
                        println!("Activating: {}", best.record.breadcrumb());
                        match search.activate(&best.record) {
                            Ok(()) => 0,
                            Err(e) => {
                                eprintln!("Error: {}", e);
                                1
                            }
                        }
                    }
                    None => {
                        eprintln!("No menu items match \"{}\"", query);
                        1
                    }
                },
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
    }
}

#[cfg(target_os = "macos")]
fn print_row(breadcrumb: &str, shortcut: &str) {
    if shortcut.is_empty() {
        println!("{}", breadcrumb);
    } else {
        println!("{}\t{}", breadcrumb, shortcut);
    }
}

#[cfg(not(target_os = "macos"))]
fn run(command: Command) -> i32 {
    if command == Command::Help {
        print_help();
        return 0;
    }
    eprintln!("Error: menubar-search requires the macOS accessibility API");
    1
}
