//! oxide-changegen CLI
//!
//! Command-line tool for turning schema diff files into change operations.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_changegen::prelude::*;

/// Turns schema diffs into ordered change operations.
#[derive(Parser)]
#[command(name = "oxide-changegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// One line per operation.
    Summary,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate change operations from a diff file.
    Generate {
        /// Path to the diff result (JSON).
        #[arg(short, long, env = "CHANGEGEN_DIFF")]
        diff: PathBuf,

        /// Emit catalog names.
        #[arg(long, env = "CHANGEGEN_INCLUDE_CATALOG")]
        include_catalog: bool,

        /// Do not emit schema names.
        #[arg(long, env = "CHANGEGEN_NO_SCHEMA")]
        no_schema: bool,

        /// Do not emit tablespaces.
        #[arg(long, env = "CHANGEGEN_NO_TABLESPACE")]
        no_tablespace: bool,

        /// Only output objects matching these `kind:regex` entries.
        #[arg(long, env = "CHANGEGEN_INCLUDE_OBJECTS", conflicts_with = "exclude_objects")]
        include_objects: Option<String>,

        /// Skip objects matching these `kind:regex` entries.
        #[arg(long, env = "CHANGEGEN_EXCLUDE_OBJECTS")]
        exclude_objects: Option<String>,

        /// Group operations into change sets.
        #[arg(long)]
        change_sets: bool,

        /// Change set author.
        #[arg(long, env = "CHANGEGEN_AUTHOR", default_value = "generated")]
        author: String,

        /// Change set id prefix (current time in milliseconds if not specified).
        #[arg(long, env = "CHANGEGEN_ID_ROOT")]
        id_root: Option<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Show the kind order of the built-in generators.
    Order,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let engine = DiffToChangeLog::new(standard_registry())?;

    match cli.command {
        Commands::Order => {
            for (position, kind) in engine.kind_order().kinds().iter().enumerate() {
                println!("{:>2}. {}", position + 1, kind);
            }
        }

        Commands::Generate {
            diff,
            include_catalog,
            no_schema,
            no_tablespace,
            include_objects,
            exclude_objects,
            change_sets,
            author,
            id_root,
            format,
        } => {
            info!("Reading diff from {}", diff.display());
            let diff = DiffResult::from_path(&diff)?;

            let mut control = DiffOutputControl::new()
                .with_catalog(include_catalog)
                .with_schema(!no_schema)
                .with_tablespace(!no_tablespace);
            if let Some(expression) = include_objects {
                control =
                    control.with_filter(ObjectChangeFilter::parse(FilterMode::Include, &expression)?);
            } else if let Some(expression) = exclude_objects {
                control =
                    control.with_filter(ObjectChangeFilter::parse(FilterMode::Exclude, &expression)?);
            }

            if change_sets {
                let options = ChangeSetOptions::new(
                    author,
                    id_root.unwrap_or_else(|| ChangeSetOptions::default().id_root),
                );
                let sets = engine.generate_change_sets(&diff, control, &options)?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sets)?),
                    OutputFormat::Summary => {
                        for set in &sets {
                            println!("{} ({})", set.id, set.author);
                            for change in &set.changes {
                                println!("  - {}", change.description());
                            }
                        }
                    }
                }
            } else {
                let changes = engine.generate(&diff, control)?;
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changes)?),
                    OutputFormat::Summary => {
                        if changes.is_empty() {
                            info!("No changes.");
                        }
                        for change in &changes {
                            println!("{}", change.description());
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
