//! Barn Layout CLI
//!
//! Usage:
//!   barn-layout [OPTIONS] show <BARN_ID>
//!   barn-layout [OPTIONS] edit <BARN_ID> <SCRIPT>
//!
//! Options:
//!   -c, --config <FILE>      Configuration file (TOML format)
//!   -s, --stylesheet <FILE>  Stylesheet file for color palette (TOML format)
//!   -h, --help               Print help

use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use barn_layout::{
    render_session, show_barn, BarnLayoutEditor, Config, Error, HttpLayoutApi, Notice, Prompter,
    Script, Stylesheet,
};

#[derive(Parser)]
#[command(name = "barn-layout")]
#[command(about = "View and edit the pen layout of a barn")]
struct Cli {
    /// Configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Stylesheet file for color palette (TOML format)
    #[arg(short, long, global = true)]
    stylesheet: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the stored layout of a barn as SVG
    Show {
        /// Barn to show
        barn_id: i64,
    },

    /// Replay an action script against a barn's layout and save it
    Edit {
        /// Barn to edit
        barn_id: i64,

        /// Action script (TOML format)
        script: PathBuf,

        /// Print the resulting layout as SVG instead of saving
        #[arg(long)]
        dry_run: bool,

        /// Answer yes to every confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Prompts on the terminal: questions on stderr, answers from stdin
struct ConsolePrompter {
    assume_yes: bool,
}

impl Prompter for ConsolePrompter {
    fn confirm(&mut self, question: &str) -> bool {
        if self.assume_yes {
            eprintln!("{} [y/N] y", question);
            return true;
        }
        eprint!("{} [y/N] ", question);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }

    fn notify(&mut self, notice: Notice) {
        eprintln!("{}", notice);
    }
}

fn main() {
    let cli = Cli::parse();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    }
    .with_env_overrides();

    if let Some(path) = &cli.stylesheet {
        let stylesheet = Stylesheet::from_file(path)?;
        config.palette.extend(stylesheet.colors);
    }

    let api = HttpLayoutApi::new(&config.api)?;

    match cli.command {
        Command::Show { barn_id } => {
            let svg = show_barn(&api, barn_id, &config)?;
            println!("{}", svg);
        }
        Command::Edit {
            barn_id,
            script,
            dry_run,
            yes,
        } => {
            let script = Script::from_file(&script)?;
            let saved = Rc::new(Cell::new(false));
            let on_saved = {
                let saved = Rc::clone(&saved);
                move || saved.set(true)
            };

            let mut editor = BarnLayoutEditor::new(
                barn_id,
                &api,
                ConsolePrompter { assume_yes: yes },
                || {},
                on_saved,
            )
            .with_grid(config.grid.clone());

            editor.load()?;
            let report = script.replay(&mut editor)?;
            info!(
                applied = report.applied,
                declined = report.declined,
                unchanged = report.unchanged,
                evicted = report.evicted.len(),
                "script replayed"
            );

            if dry_run {
                if let Some(session) = editor.session() {
                    println!("{}", render_session(session, &config)?);
                }
                editor.close();
                return Ok(());
            }

            editor.save()?;
            if saved.get() {
                eprintln!(
                    "{} action(s) applied, {} pen(s) returned to the sidebar",
                    report.applied,
                    report.evicted.len()
                );
            }
        }
    }

    Ok(())
}
