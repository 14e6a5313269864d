mod serve;
mod status;

use anyhow::Result;
use console::style;
use std::path::PathBuf;

use crate::core::terminal::{self, GuideSection, print_error};

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Commands")
        .command("serve", "Start the board server (default)")
        .command("status", "Show data directory, record counts and avatar setup")
        .command("help", "Show this help")
        .print();

    GuideSection::new("Flags")
        .flag("--host <addr>", "Bind address (overrides board.toml)")
        .flag("--port <port>", "Bind port (overrides board.toml)")
        .flag("--data-dir <path>", "Where tasks.json, staff.json and photos live")
        .flag("--verbose, -v", "Debug logging")
        .print();

    GuideSection::new("Environment")
        .flag("QUADBOARD_DATA_DIR", "Default data directory")
        .flag("GEMINI_API_KEY", "Enables quadrant avatar generation")
        .flag("GEMINI_API_ENDPOINT", "Image API base URL")
        .flag("GEMINI_IMAGE_MODEL", "Image model name")
        .print();

    println!(
        "\n {} {} <command> [flags]\n",
        style("Usage:").bold(),
        style("quadboard").green()
    );
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ServeArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub verbose: bool,
}

/// Reads flags from `args[start..]`. Unknown flags are ignored; a port that
/// does not parse is an error.
pub(crate) fn parse_serve_args(args: &[String], start: usize) -> Result<ServeArgs> {
    let mut parsed = ServeArgs::default();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                if i + 1 < args.len() {
                    parsed.host = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--port" => {
                if i + 1 < args.len() {
                    let port = args[i + 1]
                        .parse()
                        .map_err(|_| anyhow::anyhow!("invalid port: {}", args[i + 1]))?;
                    parsed.port = Some(port);
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--data-dir" => {
                if i + 1 < args.len() {
                    parsed.data_dir = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            "--verbose" | "-v" => {
                parsed.verbose = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    Ok(parsed)
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Bare flags with no command mean `serve`.
    let (cmd, flags_start) = match args.get(1).map(String::as_str) {
        None => ("serve", 1),
        Some(first) if first.starts_with('-') && first != "--help" && first != "-h" => {
            ("serve", 1)
        }
        Some(first) => (first, 2),
    };

    match cmd {
        "serve" => serve::run_serve(parse_serve_args(&args, flags_start)?).await,
        "status" => status::run_status(parse_serve_args(&args, flags_start)?).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        other => {
            print_error(&format!("Unknown command: {other}"));
            print_help();
            Ok(())
        }
    }
}
