// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `unitconv`: command-line front end for the unit converter.
//!
//! Converts lengths, weights, and temperatures, shows the formula used, and
//! keeps the same bounded history and favorites lists as the browser widget,
//! stored as JSON files under the platform data directory.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use unitconv_config_fs::FsKvStore;
use unitconv_core::{
    formula_for, now_millis, units_for, ConversionCategory, ConversionRecord, FavoritePair,
    KvStore, Persistence, RawValue, StorageLayout, StoreError,
};

/// Store key for an optional [`StorageLayout`] override.
const LAYOUT_KEY: &str = "layout";

#[derive(Parser)]
#[command(name = "unitconv", version, about = "Convert lengths, weights, and temperatures")]
struct Cli {
    /// Directory holding history/favorites (default: platform data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a value and record it in the history.
    Convert(ConvertArgs),
    /// Show the formula for a unit pair.
    Formula(PairArgs),
    /// List the units of a category.
    Units {
        /// length, weight, or temperature.
        category: ConversionCategory,
    },
    /// Show or clear the conversion history.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Manage favorite unit pairs.
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Delete both history and favorites.
    Reset,
}

#[derive(Args)]
struct ConvertArgs {
    /// length, weight, or temperature.
    category: ConversionCategory,
    /// Value to convert.
    #[arg(allow_negative_numbers = true)]
    value: String,
    /// Source unit code (e.g. km).
    from: String,
    /// Target unit code (e.g. mi).
    to: String,
    /// Also print the formula.
    #[arg(long)]
    formula: bool,
    /// Do not add the conversion to the history.
    #[arg(long)]
    no_record: bool,
}

#[derive(Args)]
struct PairArgs {
    /// length, weight, or temperature.
    category: ConversionCategory,
    /// Source unit code.
    from: String,
    /// Target unit code.
    to: String,
}

impl PairArgs {
    fn into_pair(self) -> FavoritePair {
        FavoritePair::new(self.category, self.from, self.to)
    }
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Print the history, most recent first.
    List,
    /// Delete the whole history.
    Clear,
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// Print the favorites, most recent first.
    List,
    /// Add a pair (no-op if already present).
    Add(PairArgs),
    /// Remove a pair.
    Remove(PairArgs),
    /// Add the pair if absent, remove it otherwise.
    Toggle(PairArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_store(data_dir: Option<PathBuf>) -> Result<FsKvStore> {
    let store = match data_dir {
        Some(dir) => FsKvStore::at(&dir)
            .with_context(|| format!("failed to open data dir {}", dir.display()))?,
        None => FsKvStore::new().context("failed to open platform data dir")?,
    };
    debug!(base = %store.base().display(), "opened store");
    Ok(store)
}

/// Layout override from the store (best-effort; defaults on any problem).
fn load_layout(store: &impl KvStore) -> StorageLayout {
    match store.load_raw(LAYOUT_KEY) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(key = LAYOUT_KEY, error = %e, "ignoring unreadable layout");
            StorageLayout::default()
        }),
        Err(StoreError::NotFound) => StorageLayout::default(),
        Err(e) => {
            warn!(key = LAYOUT_KEY, error = %e, "failed to read layout");
            StorageLayout::default()
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Formula(args) => {
            writeln!(out, "{}", formula_for(args.category, &args.from, &args.to))?;
        }
        Commands::Units { category } => {
            for unit in units_for(category) {
                writeln!(out, "{}\t{}", unit.code, unit.label)?;
            }
        }
        command => {
            let store = open_store(cli.data_dir)?;
            let layout = load_layout(&store);
            let persistence = Persistence::with_layout(store, layout);
            run_stored(command, &persistence, &mut out)?;
        }
    }
    Ok(())
}

fn run_stored<S: KvStore>(
    command: Commands,
    persistence: &Persistence<S>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Convert(args) => run_convert(args, persistence, out)?,
        Commands::History(HistoryCommand::List) => {
            let history = persistence.get_history();
            if history.is_empty() {
                writeln!(out, "(no history)")?;
            }
            for r in history {
                writeln!(
                    out,
                    "{} {} = {} {}\t[{}]",
                    r.input_value, r.from_unit, r.result, r.to_unit, r.category
                )?;
            }
        }
        Commands::History(HistoryCommand::Clear) => persistence.clear_history(),
        Commands::Favorites(FavoritesCommand::List) => {
            let favorites = persistence.get_favorites();
            if favorites.is_empty() {
                writeln!(out, "(no favorites)")?;
            }
            for f in favorites {
                writeln!(out, "{}: {} → {}", f.category, f.from_unit, f.to_unit)?;
            }
        }
        Commands::Favorites(FavoritesCommand::Add(args)) => {
            persistence.save_favorite(&args.into_pair());
        }
        Commands::Favorites(FavoritesCommand::Remove(args)) => {
            persistence.remove_favorite(&args.into_pair());
        }
        Commands::Favorites(FavoritesCommand::Toggle(args)) => {
            let now_favorite = persistence.toggle_favorite(&args.into_pair());
            writeln!(out, "{}", if now_favorite { "added" } else { "removed" })?;
        }
        Commands::Reset => persistence.wipe().context("failed to reset storage")?,
        Commands::Formula(_) | Commands::Units { .. } => {}
    }
    Ok(())
}

fn run_convert<S: KvStore>(
    args: ConvertArgs,
    persistence: &Persistence<S>,
    out: &mut impl Write,
) -> Result<()> {
    let outcome = RawValue::Text(&args.value).parse().and_then(|value| {
        ConversionRecord::from_conversion(args.category, value, &args.from, &args.to, now_millis())
    });
    let record = match outcome {
        Ok(record) => record,
        Err(e) => {
            debug!(error = %e, "conversion rejected");
            bail!("{}", e.user_message());
        }
    };

    writeln!(out, "{}", record.result)?;
    if args.formula {
        writeln!(out, "{}", formula_for(args.category, &args.from, &args.to))?;
    }
    if !args.no_record {
        persistence.save_history(&record);
    }
    Ok(())
}
