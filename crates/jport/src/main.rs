use clap::{Parser, Subcommand};
use jport::commands::{CommandStatus, MigrateArgs, run_migrate, run_plan, run_validate};
use jport::logging::{LogFormat, init_logging};
use owo_colors::{OwoColorize, Stream};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// jport - structural Java to Python migration
#[derive(Parser)]
#[command(name = "jport")]
#[command(about = "Migrate Java declarations to Python, plan the work and validate the result", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// Generate Python modules from Java files
    Migrate {
        /// Java files, directories or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Output directory (defaults to next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration file (defaults to ./jport.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
        /// Include the migration plan in the report
        #[arg(long)]
        plan: bool,
    },
    /// Print the ordered migration plan for a Java file
    Plan {
        /// Java file
        input: PathBuf,
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a Python module against the Java file it came from
    Validate {
        /// Java source file
        java: PathBuf,
        /// Python module to check
        python: PathBuf,
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn dispatch(command: Commands, cancel: &CancellationToken) -> anyhow::Result<CommandStatus> {
    match command {
        Commands::Migrate {
            inputs,
            output,
            config,
            json,
            plan,
        } => run_migrate(
            &MigrateArgs {
                inputs,
                output,
                config,
                json,
                plan,
            },
            cancel,
        ),
        Commands::Plan {
            input,
            config,
            json,
        } => run_plan(&input, config.as_deref(), json, cancel),
        Commands::Validate {
            java,
            python,
            config,
            json,
        } => run_validate(&java, &python, config.as_deref(), json),
    }
}

fn report_error(err: &anyhow::Error) -> ExitCode {
    eprintln!(
        "{} {err:#}",
        "error:".if_supports_color(Stream::Stderr, |t| t.red())
    );
    ExitCode::from(2)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    // Ctrl-C cancels pending units between stages.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let command = cli.command;
    match tokio::task::spawn_blocking(move || dispatch(command, &cancel)).await {
        Ok(Ok(status)) => status.into(),
        Ok(Err(err)) => report_error(&err),
        Err(join) => report_error(&anyhow::Error::new(join)),
    }
}
