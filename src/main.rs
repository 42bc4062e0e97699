// SPDX-License-Identifier: MIT
//! gocoda — Go completion adapter harness.
//!
//! The long-lived editor host embeds the library directly; this binary is the
//! standalone harness: it reads one completion request (JSON) on stdin,
//! runs the gather pipeline, and prints the candidate list on stdout.
//!
//! Examples:
//!   gocoda --position "fmt.Pr"
//!   gocoda < request.json
//!   gocoda --use-cache --cache-dir ~/.cache/gocoda < request.json

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;

use gocoda::completion::engine::LogNotifier;
use gocoda::completion::handlers;
use gocoda::config::AdapterConfig;
use gocoda::AdapterContext;

#[derive(Parser)]
#[command(
    name = "gocoda",
    about = "Go completion adapter — gocode subprocess bridge",
    version
)]
struct Args {
    /// Path to the gocode binary (default: search $PATH)
    #[arg(long, env = "GOCODA_GOCODE_BINARY")]
    gocode_binary: Option<std::path::PathBuf>,

    /// Directory holding the indexer's package completion dumps
    #[arg(long, env = "GOCODA_CACHE_DIR")]
    cache_dir: Option<std::path::PathBuf>,

    /// Serve eligible requests from the package cache
    #[arg(long, env = "GOCODA_USE_CACHE")]
    use_cache: bool,

    /// Append a dot to inserted package names
    #[arg(long, env = "GOCODA_PACKAGE_DOT")]
    package_dot: bool,

    /// Class priority for candidate ordering (package,func,type,var,const)
    #[arg(long, env = "GOCODA_SORT_CLASS", value_delimiter = ',')]
    sort_class: Option<Vec<String>>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GOCODA_LOG")]
    log: Option<String>,

    /// Verbose per-request logging
    #[arg(long, env = "GOCODA_DEBUG")]
    debug: bool,

    /// Resolve the completion position for the given line text and exit
    #[arg(long, value_name = "INPUT")]
    position: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AdapterConfig::new(
        args.gocode_binary,
        args.cache_dir,
        args.use_cache.then_some(true),
        args.package_dot.then_some(true),
        args.sort_class,
        args.log,
        args.debug.then_some(true),
    );

    // The debug flag forces per-request logging regardless of the filter.
    let filter = if config.debug { "debug" } else { &config.log };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Position-only mode: no request document needed.
    if let Some(input) = args.position {
        let result = handlers::complete_position(serde_json::json!({ "input": input }))?;
        println!("{result}");
        return Ok(());
    }

    let ctx = AdapterContext {
        config: Arc::new(config),
        notifier: Arc::new(LogNotifier),
    };

    let mut request = String::new();
    std::io::stdin()
        .read_to_string(&mut request)
        .context("failed to read request from stdin")?;
    let params: serde_json::Value =
        serde_json::from_str(&request).context("request is not valid JSON")?;

    let result = handlers::gather_candidates(params, &ctx).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
