//! dsquest CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser, Subcommand};

mod app;
mod commands;
mod config;

use commands::ledger::Answer;

#[derive(Parser)]
#[command(
    name = "dsquest",
    version,
    about = "Data Science Quest: learn Python and pandas like a game"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a view by route fragment (e.g. "#/lesson/py-01")
    Open {
        /// Route fragment, default "#/"
        fragment: Option<String>,
    },

    /// Run a lesson's code and show whether the checks pass
    Run {
        /// Lesson id
        lesson: String,

        /// Save code from this file first
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Run a lesson's code and record completion when the checks pass
    Check {
        /// Lesson id
        lesson: String,

        /// Save code from this file first
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Save code for a lesson
    Save {
        /// Lesson id
        lesson: String,

        /// File holding the code
        #[arg(long)]
        file: PathBuf,
    },

    /// Print a lesson's saved code (or its starter)
    ShowCode {
        /// Lesson id
        lesson: String,
    },

    /// Restore a lesson's starter code
    ResetCode {
        /// Lesson id
        lesson: String,
    },

    /// Write one lesson's code to a .py file
    Download {
        /// Lesson id
        lesson: String,

        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export every lesson's code as a ZIP archive
    Export {
        /// Output archive path
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Reset all progress and saved code
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Validate the curriculum document
    Validate,

    /// Create a starter config and sample curriculum
    Init,

    /// Play The Great Ledger through its backend API
    Ledger {
        #[command(subcommand)]
        command: LedgerCommands,
    },
}

#[derive(Subcommand)]
enum LedgerCommands {
    /// Show the world map
    Map,

    /// Show the current node
    Node,

    /// Answer the current node
    #[command(group(
        ArgGroup::new("answer")
            .required(true)
            .args(["proceed", "quiz", "code_file"])
    ))]
    Submit {
        /// Finish reading a lesson node
        #[arg(long = "continue")]
        proceed: bool,

        /// Quiz option index (from 0)
        #[arg(long)]
        quiz: Option<usize>,

        /// File holding the challenge solution
        #[arg(long)]
        code_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "dsquest=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Commands::Init) {
        return commands::init::execute();
    }

    let config = config::load_config_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Open { fragment } => commands::open::execute(&config, fragment).await,
        Commands::Run { lesson, file } => commands::run::execute_run(&config, lesson, file).await,
        Commands::Check { lesson, file } => {
            commands::run::execute_check(&config, lesson, file).await
        }
        Commands::Save { lesson, file } => commands::code::execute_save(&config, lesson, file),
        Commands::ShowCode { lesson } => commands::code::execute_show(&config, lesson),
        Commands::ResetCode { lesson } => commands::code::execute_reset(&config, lesson),
        Commands::Download { lesson, out } => {
            commands::code::execute_download(&config, lesson, out)
        }
        Commands::Export { out } => commands::export::execute(&config, out),
        Commands::Reset { yes } => commands::reset::execute(&config, yes),
        Commands::Validate => commands::validate::execute(&config),
        Commands::Init => commands::init::execute(),
        Commands::Ledger { command } => match command {
            LedgerCommands::Map => commands::ledger::execute_map(&config).await,
            LedgerCommands::Node => commands::ledger::execute_node(&config).await,
            LedgerCommands::Submit {
                proceed,
                quiz,
                code_file,
            } => {
                let answer = match (proceed, quiz, code_file) {
                    (_, Some(index), _) => Answer::Quiz(index),
                    (_, _, Some(path)) => Answer::CodeFile(path),
                    _ => Answer::Continue,
                };
                commands::ledger::execute_submit(&config, answer).await
            }
        },
    }
}
