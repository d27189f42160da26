use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dashgrid_layout::{
    GridCell, LAYOUT_STORAGE_KEY, LayoutEngine, LayoutOperation, LayoutSnapshot, LayoutStore,
    RawSlot, SPANS_STORAGE_KEY, Slot, load_snapshot, parse_slots_or_default, parse_spans,
    save_snapshot,
};
use serde::Serialize;
use serde_json::Value;

use crate::config::DashgridConfig;
use crate::error::{CliError, Result};
use crate::render::render_grid;
use crate::store::DirStore;

/// Config file looked up inside the state directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "dashgrid.json";

/// JSON body of `show --json`.
#[derive(Debug, Serialize)]
struct ShowReport<'a> {
    #[serde(flatten)]
    snapshot: &'a LayoutSnapshot,
    cells: Vec<GridCell<'a>>,
}

#[derive(Debug, Parser)]
#[command(
    name = "dashgrid",
    about = "Inspect and edit a persisted two-column dashboard layout",
    version
)]
pub struct Cli {
    /// Directory holding the persisted layout.
    #[arg(long, global = true, default_value = ".dashgrid")]
    pub state_dir: PathBuf,

    /// Config file with the default layout and module catalog.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the current grid.
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Expand the module at INDEX to full width, or collapse it.
    Toggle { index: usize },

    /// Add a catalog module, at a cell or in the first free one.
    Add {
        module: String,
        #[arg(long)]
        at: Option<usize>,
    },

    /// Clear the cell at INDEX.
    Remove { index: usize },

    /// Drag the module at SOURCE onto TARGET.
    Swap { source: usize, target: usize },

    /// Rewrite the stored layout in canonical form.
    Compact,

    /// Check the stored layout against the grid invariants.
    Validate {
        #[arg(long)]
        json: bool,
    },

    /// Restore the configured default layout.
    Reset,

    /// List catalog modules and where they are placed.
    Modules,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Dispatch `cli`, writing human or JSON output to `out`.
pub fn run_with_output<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.state_dir.join(CONFIG_FILE_NAME));
    let config = DashgridConfig::load(&config_path)?;
    let engine = LayoutEngine::new(config.clone().into());
    let mut store = DirStore::new(&cli.state_dir);
    tracing::debug!(
        state_dir = %store.root().display(),
        command = ?cli.command,
        "dispatching command"
    );

    match cli.command {
        Commands::Show { json } => {
            let snapshot = load_snapshot(&store, &engine)?;
            if json {
                let report = ShowReport {
                    snapshot: &snapshot,
                    cells: snapshot.cells(),
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                write!(out, "{}", render_grid(&snapshot))?;
            }
            Ok(())
        }
        Commands::Toggle { index } => {
            apply(&engine, &mut store, LayoutOperation::ToggleExpand { index }, out)
        }
        Commands::Add { module, at } => {
            let module = config.resolve_module(&module)?;
            let operation = match at {
                Some(index) => LayoutOperation::Add { index, module },
                None => LayoutOperation::Append { module },
            };
            apply(&engine, &mut store, operation, out)
        }
        Commands::Remove { index } => {
            apply(&engine, &mut store, LayoutOperation::Remove { index }, out)
        }
        Commands::Swap { source, target } => apply(
            &engine,
            &mut store,
            LayoutOperation::Swap { source, target },
            out,
        ),
        Commands::Compact => {
            let raw = load_raw(&store, &engine, false)?;
            commit(&engine, &mut store, &raw, LayoutOperation::Compact, out)
        }
        Commands::Validate { json } => validate(&store, &engine, json, out),
        Commands::Reset => {
            let snapshot = engine.default_snapshot();
            save_snapshot(&mut store, &snapshot)?;
            write!(out, "{}", render_grid(&snapshot))?;
            Ok(())
        }
        Commands::Modules => {
            let snapshot = load_snapshot(&store, &engine)?;
            for key in &config.catalog {
                match snapshot.position_of(key.as_str()) {
                    Some(index) if snapshot.span(key) > 1 => {
                        writeln!(out, "{:<16} slot {index} (full width)", key.as_str())?;
                    }
                    Some(index) => writeln!(out, "{:<16} slot {index}", key.as_str())?,
                    None => writeln!(out, "{:<16} available", key.as_str())?,
                }
            }
            Ok(())
        }
    }
}

fn apply<W: Write>(
    engine: &LayoutEngine,
    store: &mut DirStore,
    operation: LayoutOperation,
    out: &mut W,
) -> Result<()> {
    let snapshot = load_snapshot(store, engine)?;
    commit(engine, store, &snapshot, operation, out)
}

/// Apply `operation` to `snapshot`, persisting and printing only real changes.
fn commit<W: Write>(
    engine: &LayoutEngine,
    store: &mut DirStore,
    snapshot: &LayoutSnapshot,
    operation: LayoutOperation,
    out: &mut W,
) -> Result<()> {
    let name = operation.name();
    let outcome = engine.apply(snapshot, operation);
    if !outcome.changed {
        tracing::info!(operation = name, "operation was a no-op");
        writeln!(out, "no change")?;
        return Ok(());
    }
    save_snapshot(store, &outcome.snapshot)?;
    tracing::info!(
        operation = name,
        modules = outcome.snapshot.module_count(),
        "layout updated"
    );
    write!(out, "{}", render_grid(&outcome.snapshot))?;
    Ok(())
}

/// Read the stored values exactly as persisted, without normalizing or
/// compacting the slot array.
///
/// In `strict` mode unparseable JSON, a non-array layout and elements that are
/// neither a module key nor `null` are errors. Otherwise they fall back the
/// way loading does.
fn load_raw(store: &DirStore, engine: &LayoutEngine, strict: bool) -> Result<LayoutSnapshot> {
    let layout = read_value(store, LAYOUT_STORAGE_KEY, strict)?;
    let slots = match layout {
        Value::Array(items) => raw_slots(&items, strict)?,
        Value::Null => parse_slots_or_default(&Value::Null, engine.defaults()),
        _ if strict => {
            return Err(CliError::exit(
                1,
                format!("stored {LAYOUT_STORAGE_KEY} is not an array"),
            ));
        }
        other => parse_slots_or_default(&other, engine.defaults()),
    };
    let spans = read_value(store, SPANS_STORAGE_KEY, strict)?;
    Ok(LayoutSnapshot::new(slots, parse_spans(&spans)))
}

fn raw_slots(items: &[Value], strict: bool) -> Result<Vec<Slot>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match RawSlot::classify(item) {
            RawSlot::Invalid if strict => Err(CliError::exit(
                1,
                format!("stored {LAYOUT_STORAGE_KEY}[{index}] is not a module key or null"),
            )),
            raw => Ok(raw.into_slot()),
        })
        .collect()
}

fn read_value(store: &DirStore, key: &str, strict: bool) -> Result<Value> {
    let Some(raw) = store.read(key)? else {
        return Ok(Value::Null);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(error) if strict => Err(error.into()),
        Err(error) => {
            tracing::warn!(key, %error, "discarding unparseable stored value");
            Ok(Value::Null)
        }
    }
}

fn validate<W: Write>(
    store: &DirStore,
    engine: &LayoutEngine,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let snapshot = load_raw(store, engine, true)?;
    let report = snapshot.invariant_report();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else if report.issues.is_empty() {
        writeln!(out, "ok (hash={:016x})", report.snapshot_hash)?;
    } else {
        for issue in &report.issues {
            let index = issue
                .index
                .map_or_else(|| "-".to_string(), |index| index.to_string());
            writeln!(
                out,
                "{:?}[{:?}] slot {index}: {}",
                issue.severity, issue.code, issue.message
            )?;
        }
    }

    if report.issues.is_empty() {
        Ok(())
    } else {
        Err(CliError::exit(
            1,
            format!(
                "stored layout is not canonical ({} issue(s)); run `dashgrid compact`",
                report.issues.len()
            ),
        ))
    }
}
