//! ecscache CLI entry point.

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ecscache_runtime::{CacheConfig, CacheHandle, CacheIdentity, FileBackend, SnapshotBackend};
use ecscache_storage::{CacheStore, ComponentUpdate};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Ingest(PathBuf),
    Dump,
    Info,
}

/// CLI configuration parsed from arguments.
#[derive(Debug, Default)]
struct CliConfig {
    command: Option<Command>,
    chain_id: Option<u64>,
    world: Option<String>,
    schema_version: Option<u32>,
    dir: Option<PathBuf>,
    show_help: bool,
    show_version: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn value_of<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();
    let mut positional = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--chain-id" => {
                let raw = value_of(args, &mut i, "--chain-id")?;
                config.chain_id = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid --chain-id value: {raw}"))?,
                );
            }
            "--world" => config.world = Some(value_of(args, &mut i, "--world")?.to_owned()),
            "--schema-version" => {
                let raw = value_of(args, &mut i, "--schema-version")?;
                config.schema_version = Some(
                    raw.parse()
                        .map_err(|_| format!("invalid --schema-version value: {raw}"))?,
                );
            }
            "--dir" => config.dir = Some(PathBuf::from(value_of(args, &mut i, "--dir")?)),
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            arg => positional.push(arg.to_owned()),
        }
        i += 1;
    }

    let mut positional = positional.into_iter();
    config.command = match positional.next().as_deref() {
        None => None,
        Some("ingest") => Some(Command::Ingest(PathBuf::from(
            positional.next().ok_or("ingest requires an events file")?,
        ))),
        Some("dump") => Some(Command::Dump),
        Some("info") => Some(Command::Info),
        Some(other) => return Err(format!("unknown command: {other}").into()),
    };
    if let Some(extra) = positional.next() {
        return Err(format!("unexpected argument: {extra}").into());
    }

    Ok(config)
}

fn identity(config: &CliConfig) -> Result<CacheIdentity, Box<dyn std::error::Error>> {
    let chain_id = config.chain_id.ok_or("--chain-id is required")?;
    let world = config.world.clone().ok_or("--world is required")?;
    let version = config.schema_version.ok_or("--schema-version is required")?;
    Ok(CacheIdentity::new(chain_id, world, version))
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(&args)?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("ecscache {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(command) = &cli.command else {
        print_help();
        return Err("no command given".into());
    };

    let identity = identity(&cli)?;
    let mut cache = CacheConfig::from_env();
    if let Some(dir) = &cli.dir {
        cache = cache.with_cache_dir(dir);
    }

    match command {
        Command::Ingest(path) => ingest(&cache, identity, path),
        Command::Dump | Command::Info if !cache.enabled => {
            Err("cache is disabled (ECSCACHE_ENABLED=false)".into())
        }
        Command::Dump => dump(&open(&cache, identity)?),
        Command::Info => print_info(&open(&cache, identity)?),
    }
}

fn open(
    config: &CacheConfig,
    identity: CacheIdentity,
) -> Result<CacheHandle<FileBackend>, Box<dyn std::error::Error>> {
    let backend = FileBackend::new(&config.cache_dir)?;
    Ok(CacheHandle::open(backend, identity)?)
}

fn ingest(
    config: &CacheConfig,
    identity: CacheIdentity,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = if config.enabled {
        match open(config, identity) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "cache unavailable, ingesting without persistence");
                None
            }
        }
    } else {
        None
    };

    let file = File::open(path).map_err(|e| format!("failed to open '{}': {e}", path.display()))?;
    let ingested = ingest_events(
        handle.as_ref(),
        BufReader::new(file),
        config.save_interval,
        &path.display().to_string(),
    )?;

    println!(
        "applied {} events, skipped {}, {} entries at block {}",
        ingested.applied,
        ingested.skipped,
        ingested.store.len(),
        ingested.store.block_number()
    );
    Ok(())
}

/// Result of applying an event stream.
#[derive(Debug)]
struct Ingested {
    store: CacheStore,
    applied: usize,
    skipped: usize,
}

/// Applies JSON-lines events on top of the cached state.
///
/// Events at or below the watermark of a non-empty loaded snapshot are
/// skipped. Persistence failures are logged and never stop ingestion.
fn ingest_events<B, R>(
    handle: Option<&CacheHandle<B>>,
    reader: R,
    save_interval: u64,
    source: &str,
) -> Result<Ingested, Box<dyn std::error::Error>>
where
    B: SnapshotBackend,
    R: BufRead,
{
    let mut store = handle.map_or_else(CacheStore::new, CacheHandle::load_or_cold_start);
    let resume_after = (!store.is_empty()).then_some(store.block_number());
    let mut last_saved = store.block_number();

    let mut applied = 0usize;
    let mut skipped = 0usize;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: ComponentUpdate =
            serde_json::from_str(&line).map_err(|e| format!("{source}:{}: {e}", line_no + 1))?;

        if resume_after.is_some_and(|watermark| event.block_number <= watermark) {
            skipped += 1;
            continue;
        }

        store.store_event(&event)?;
        applied += 1;

        let due = store.block_number() > last_saved
            && store.block_number() >= last_saved.saturating_add(save_interval);
        if let (true, Some(handle)) = (due, handle) {
            match handle.save(&store) {
                Ok(()) => last_saved = store.block_number(),
                Err(e) => warn!(error = %e, "periodic save failed"),
            }
        }
    }

    if let Some(handle) = handle {
        match handle.save(&store) {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => warn!(error = %e, "final save failed, snapshot not updated"),
            Err(e) => return Err(e.into()),
        }
    }

    info!(applied, skipped, block_number = store.block_number(), "ingest complete");
    Ok(Ingested {
        store,
        applied,
        skipped,
    })
}

fn dump(handle: &CacheHandle<FileBackend>) -> Result<(), Box<dyn std::error::Error>> {
    let store = handle.load()?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in &store.materialize() {
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn print_info(handle: &CacheHandle<FileBackend>) -> Result<(), Box<dyn std::error::Error>> {
    let store = handle.load()?;
    println!("namespace:  {}", handle.namespace());
    println!("components: {}", store.components().len());
    println!("entities:   {}", store.entities().len());
    println!("entries:    {}", store.len());
    println!("block:      {}", store.block_number());
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mecscache\x1b[0m - Materialized-state cache for entity-component event streams

\x1b[1mUSAGE:\x1b[0m
    ecscache <COMMAND> --chain-id <N> --world <ADDRESS> --schema-version <N> [OPTIONS]

\x1b[1mCOMMANDS:\x1b[0m
    ingest <EVENTS>    Apply a JSON-lines event file on top of the cached state
    dump               Print cached records as JSON lines
    info               Print cache statistics

\x1b[1mOPTIONS:\x1b[0m
    --chain-id <N>          Chain the events come from
    --world <ADDRESS>       World contract address
    --schema-version <N>    Schema version of the cached data
    --dir <PATH>            Snapshot directory (overrides ECSCACHE_DIR)
    -h, --help              Print help information
    -V, --version           Print version information

\x1b[1mENVIRONMENT:\x1b[0m
    ECSCACHE_ENABLED          Persist snapshots (default: true)
    ECSCACHE_DIR              Snapshot directory
    ECSCACHE_SAVE_INTERVAL    Blocks between periodic saves (default: 100)
    RUST_LOG                  Log filter (default: info)"
    );
}
