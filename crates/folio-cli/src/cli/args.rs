use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Drive the folio paged cache over synthetic items and report what it did"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Walk a synthetic collection through a paged cache and print a JSON report
    Scan(ScanArgs),
    Version,
}

/// How the scan walks the collection.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Index 0, 1, 2, ...
    #[default]
    Sequential,
    /// Last index first
    Reverse,
    /// Uniformly random indices (seeded)
    Random,
    /// One page-sized window at a time, like a scrolling grid
    Screens,
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    /// Number of synthetic items
    #[arg(long, default_value_t = 1000)]
    pub items: usize,

    /// Items per page (overrides config file and FOLIO_PAGE_SIZE)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Resident pages kept (overrides config file and FOLIO_CACHE_CAPACITY)
    #[arg(long)]
    pub capacity: Option<usize>,

    #[arg(long, value_enum, default_value_t = Pattern::Sequential)]
    pub pattern: Pattern,

    /// Number of accesses for sequential/reverse/random (default: --items)
    #[arg(long)]
    pub accesses: Option<usize>,

    /// Seed for --pattern random
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Simulated latency of every item load
    #[arg(long, default_value_t = 1)]
    pub load_delay_ms: u64,

    /// Make every Nth item fail to load
    #[arg(long)]
    pub fail_every: Option<usize>,

    /// YAML cache config (name, page_size, capacity, verbose)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log page loads, evictions and timings
    #[arg(short, long)]
    pub verbose: bool,

    /// How long to wait for background unloads after freeing the cache
    #[arg(long, default_value_t = 2000)]
    pub unload_timeout_ms: u64,

    /// Write the report here instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}
