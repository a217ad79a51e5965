use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use settings_store::{SettingsStore, StoreOptions};

#[derive(Parser)]
#[command(name = "settings-store", version, about = "Flat-file key-value settings store")]
struct Cli {
    /// Settings file path (default: Settings.ini)
    #[arg(long)]
    file: Option<PathBuf>,

    /// JSON file with store options; explicit flags override it
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Separator between a key and its value (\n and \t escapes accepted)
    #[arg(long)]
    kv_separator: Option<String>,

    /// Separator between consecutive pairs (\n and \t escapes accepted)
    #[arg(long)]
    pair_separator: Option<String>,

    /// Fail instead of creating a missing settings file
    #[arg(long)]
    no_create: bool,

    /// Strict mode: missing keys and refused writes become errors
    #[arg(long)]
    strict: bool,

    /// Do not persist automatically after each mutating command
    #[arg(long)]
    no_autosave: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the value for a key
    Get { key: String },
    /// Print the value for a key as an integer
    GetNum {
        key: String,
        /// Value printed when the key is absent
        #[arg(long, default_value_t = -1)]
        fallback: i64,
    },
    /// Set the value for a key
    Set { key: String, value: String },
    /// Seed defaults without overwriting existing keys
    Defaults {
        /// Delimited pair strings, e.g. "Name:Bob"
        pairs: Vec<String>,
        /// JSON object of key-to-value defaults
        #[arg(long)]
        json: Option<String>,
    },
    /// Print all in-memory entries
    Dump {
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Resolve store options from the profile (if any) and explicit flags
    fn options(&self) -> anyhow::Result<StoreOptions> {
        let mut options = match &self.profile {
            Some(path) => StoreOptions::from_file(path)
                .with_context(|| format!("failed to load profile '{}'", path.display()))?,
            None => StoreOptions::default(),
        };
        if let Some(file) = &self.file {
            options.path = file.clone();
        }
        if let Some(sep) = &self.kv_separator {
            options.kv_separator = unescape_separator(sep);
        }
        if let Some(sep) = &self.pair_separator {
            options.pair_separator = unescape_separator(sep);
        }
        if self.no_create {
            options.create_if_missing = false;
        }
        if self.strict {
            options.throw_on_missing = true;
        }
        if self.no_autosave {
            options.autosave = false;
        }
        Ok(options)
    }
}

/// Translate shell-friendly `\n` and `\t` escapes in separator flags
fn unescape_separator(raw: &str) -> String {
    raw.replace("\\n", "\n").replace("\\t", "\t")
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let options = cli.options()?;
    info!("opening settings file '{}'", options.path.display());
    let mut store = SettingsStore::open(options)?;

    match &cli.command {
        Command::Get { key } => match store.get(key)? {
            Some(value) => println!("{value}"),
            None => bail!("key '{key}' not set"),
        },
        Command::GetNum { key, fallback } => {
            println!("{}", store.get_numeric_or(key, *fallback)?);
        }
        Command::Set { key, value } => {
            if !store.set_value(key, value)? {
                bail!("key '{key}' is absent and appending new settings is disabled");
            }
        }
        Command::Defaults { pairs, json } => {
            if let Some(json) = json {
                let defaults: BTreeMap<String, String> =
                    serde_json::from_str(json).context("--json must be an object of strings")?;
                store.set_defaults(defaults)?;
            }
            if !pairs.is_empty() {
                store.set_defaults_lines(pairs.iter().map(String::as_str))?;
            }
        }
        Command::Dump { json } => {
            if *json {
                let entries: BTreeMap<&str, &str> = store.iter().collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                let sep = store.codec().kv_separator().to_string();
                for (key, value) in store.iter() {
                    println!("{key}{sep}{value}");
                }
            }
        }
    }
    Ok(())
}
