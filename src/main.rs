#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use viewmodel_profiles::constants::storage::DIR_ENV;
use viewmodel_profiles::{EditSession, FileAdapter, ProfileField};

/// Manage viewmodel settings profiles
#[derive(Parser)]
#[command(name = "viewmodel-profiles", version, about, long_about = None)]
struct Cli {
    /// Storage directory (defaults to <config dir>/viewmodel)
    #[arg(short, long, env = DIR_ENV)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List profiles, marking the active one
    #[command(alias = "ls")]
    List,

    /// Print a profile's settings as JSON
    Show {
        /// Profile to show (active profile by default)
        name: Option<String>,
    },

    /// Make a profile active
    #[command(alias = "switch")]
    Use { name: String },

    /// Create a profile with factory settings and make it active
    Create {
        #[arg(default_value = "")]
        name: String,
    },

    /// Copy a profile's settings into a new profile and make it active
    Duplicate {
        #[arg(default_value = "")]
        name: String,

        /// Profile to copy (active profile by default)
        #[arg(long)]
        from: Option<String>,
    },

    /// Rename a profile
    Rename {
        new_name: String,

        /// Profile to rename (active profile by default)
        #[arg(long)]
        from: Option<String>,
    },

    /// Delete a profile
    #[command(alias = "rm")]
    Delete {
        /// Profile to delete (active profile by default)
        name: Option<String>,
    },

    /// Change one setting of the active profile
    Set { field: ProfileField, value: String },

    /// Restore factory settings in the active profile
    Reset,
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let root = cli.dir.unwrap_or_else(FileAdapter::default_root);
    info!(path = %root.display(), "Using profile storage");
    let mut session = EditSession::open(FileAdapter::new(root));
    let current = session.store().current_name().to_string();

    match cli.command {
        Command::List => {
            for name in session.store().config_names() {
                let marker = if name == current { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
        Command::Show { name } => {
            let name = name.unwrap_or(current);
            let Some(record) = session.store().profile(&name) else {
                bail!("No profile named '{name}'");
            };
            let json = serde_json::to_string_pretty(&record)
                .context("Failed to serialize profile")?;
            println!("{json}");
        }
        Command::Use { name } => {
            if !session.switch_to(&name) {
                bail!("No profile named '{name}'");
            }
            println!("Switched to '{name}'");
        }
        Command::Create { name } => match session.create(&name) {
            Some(created) => println!("Created '{created}'"),
            None => bail!("Could not create profile: a profile with that name already exists"),
        },
        Command::Duplicate { name, from } => {
            let source = from.unwrap_or(current);
            match session.duplicate(&source, &name) {
                Some(created) => println!("Copied '{source}' to '{created}'"),
                None => bail!("Could not copy '{source}': unknown profile or name already in use"),
            }
        }
        Command::Rename { new_name, from } => {
            let old_name = from.unwrap_or(current);
            match session.rename(&old_name, &new_name) {
                Some(renamed) => println!("Renamed '{old_name}' to '{renamed}'"),
                None => bail!(
                    "Could not rename '{old_name}': unknown or default profile, name in use, or storage error"
                ),
            }
        }
        Command::Delete { name } => {
            let name = name.unwrap_or(current);
            if !session.delete(&name) {
                bail!("Could not delete '{name}': unknown, default or last profile");
            }
            println!(
                "Deleted '{name}', active profile is '{}'",
                session.store().current_name()
            );
        }
        Command::Set { field, value } => {
            let applied = session.edit(|record| field.set(record, &value))?;
            println!("{field} = {applied}");
        }
        Command::Reset => {
            session.reset_current();
            println!("Reset '{current}' to defaults");
        }
    }

    session.close();
    Ok(())
}
