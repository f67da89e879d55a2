//! gridedit - edit a marked-up text file in the terminal.
//!
//! # Usage
//!
//! ```bash
//! gridedit notes.txt
//! gridedit --tab-width 2 notes.txt
//! gridedit --plain notes.txt
//! ```

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gridedit::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use gridedit::display::TerminalDisplay;
use gridedit::editor::Editor;
use gridedit::markup::plain_text;

/// Edit a marked-up text file in the terminal
#[derive(Parser, Debug)]
#[command(name = "gridedit", version, about, long_about = None)]
struct Cli {
    /// File to edit; created on save if missing
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Spaces per tab stop
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(usize))]
    tab_width: Option<usize>,

    /// Write log output to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the file's plain text (markup removed) and exit
    #[arg(long)]
    plain: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// The terminal is in raw mode while editing, so logs only go to a file.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env("GRIDEDIT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::sink).init(),
    }
    Ok(())
}

/// A missing file reads as empty.
fn read_source(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.plain {
        let text = read_source(&cli.file)?;
        println!("{}", plain_text(&text));
        return Ok(());
    }

    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        tab_width: cli.tab_width.filter(|&width| width > 0),
        log_file: cli.log_file.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;
    tracing::info!(file = %cli.file.display(), ?effective, "starting");

    let original = read_source(&cli.file)?;
    let display = TerminalDisplay::init().context("Failed to initialize terminal")?;
    let mut editor = Editor::new(display).with_config(effective.editor_config());
    editor.edit(&original).context("Editor error")?;

    let content = editor.content();
    if content != original {
        fs::write(&cli.file, &content)
            .with_context(|| format!("Failed to write {}", cli.file.display()))?;
        tracing::info!(bytes = content.len(), "saved");
    }
    Ok(())
}
