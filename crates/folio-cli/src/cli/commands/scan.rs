use crate::cli::args::{Pattern, ScanArgs};
use crate::exit_codes::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::report::{ScanReport, SCHEMA_VERSION};
use crate::sim::{self, SimItem, SimLedger};
use anyhow::{Context, Result};
use folio_cache::{get, CacheConfig, PagedCache};
use futures::StreamExt;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub async fn run(args: ScanArgs) -> Result<i32> {
    let config = match resolve_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e:#}");
            return Ok(EXIT_CONFIG_ERROR);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Config error: {e}");
        return Ok(EXIT_CONFIG_ERROR);
    }
    if args.fail_every == Some(0) {
        eprintln!("Config error: --fail-every must be > 0");
        return Ok(EXIT_CONFIG_ERROR);
    }

    let ledger = Arc::new(SimLedger::new(args.items));
    let items = sim::items(
        args.items,
        Duration::from_millis(args.load_delay_ms),
        args.fail_every,
        &ledger,
    );
    let cache = PagedCache::new(items, config.clone()).context("failed to create cache")?;
    info!(
        cache = %config.name,
        items = args.items,
        page_size = config.page_size,
        capacity = config.capacity,
        pattern = ?args.pattern,
        "starting scan"
    );

    let started = Instant::now();
    let accesses = match args.pattern {
        Pattern::Screens => walk_screens(&cache).await,
        pattern => {
            let plan = sim::access_plan(
                pattern,
                args.items,
                args.accesses.unwrap_or(args.items),
                args.seed,
            );
            walk_plan(&cache, &plan).await?
        }
    };
    let elapsed = started.elapsed();

    let stats = cache.stats().await.context("reading cache stats")?;
    let pages = cache.page_count();
    cache.free();

    let all_unloaded =
        wait_for_unloads(&ledger, Duration::from_millis(args.unload_timeout_ms)).await;
    if !all_unloaded {
        warn!(
            timeout_ms = args.unload_timeout_ms,
            "not every item was unloaded before the timeout"
        );
    }

    let report = ScanReport {
        schema_version: SCHEMA_VERSION.to_string(),
        cache_name: config.name,
        pattern: args.pattern,
        items: args.items,
        page_size: config.page_size,
        capacity: config.capacity,
        pages,
        accesses,
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        cache: stats,
        items_loaded: ledger.total_loads(),
        items_unloaded: ledger.total_unloads(),
        load_failures: ledger.failures(),
        reloaded_items: ledger.reloaded(),
        all_unloaded,
    };

    let json = serde_json::to_string_pretty(&report)?;
    match &args.out {
        Some(path) => fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(EXIT_SUCCESS)
}

/// Cache config for a scan. Precedence: `--config` file if given, otherwise
/// `FOLIO_*` environment; explicit flags override either.
fn resolve_config(args: &ScanArgs) -> Result<CacheConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("config file not found: {}", path.display()))?;
            serde_yaml::from_str::<CacheConfig>(&content)
                .with_context(|| format!("invalid cache config in {}", path.display()))?
        }
        None => CacheConfig::from_env(),
    };
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if args.verbose {
        config.verbose = true;
    }
    Ok(config)
}

async fn walk_plan(cache: &PagedCache<SimItem>, plan: &[usize]) -> Result<usize> {
    let mut accesses = 0;
    for &index in plan {
        if cache.at(index).await?.is_some() {
            accesses += 1;
        }
    }
    Ok(accesses)
}

/// Read the collection one page-sized window at a time.
async fn walk_screens(cache: &PagedCache<SimItem>) -> usize {
    let screen = cache.page_size();
    let mut accesses = 0;
    for from in (0..cache.len()).step_by(screen) {
        let to = (from + screen).min(cache.len());
        let shown = get(cache, from, to).count().await;
        if shown < to - from {
            warn!(from, to, shown, "screen came back short");
        }
        accesses += shown;
    }
    accesses
}

async fn wait_for_unloads(ledger: &SimLedger, limit: Duration) -> bool {
    tokio::time::timeout(limit, async {
        while !ledger.all_unloaded() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .is_ok()
}
