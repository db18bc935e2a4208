//! Cache router inspection CLI.
//!
//! # Architecture Overview
//!
//! ```text
//!   proxy.toml ──▶ config::loader ──▶ RouterGeneration ──▶ RouterState
//!                                       │
//!                     ┌─────────────────┼──────────────────┐
//!                     ▼                 ▼                  ▼
//!               route tree        CodecManager        destinations
//!          (Failover/Latest/     (per-thread           (in-memory
//!           leaf routes)          codec maps)           stores)
//! ```
//!
//! Subcommands:
//! - `check`: load config, build the generation, report what was built
//! - `route-handles`: print the route tree
//! - `codecs`: print the codec id range and per-codec settings
//! - `exec`: read cache commands from stdin and route each one

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cacheroute::config::load_config;
use cacheroute::observability::logging;
use cacheroute::protocol::{McReply, McRequest, Operation};
use cacheroute::routing::route_handles;
use cacheroute::{RouterGeneration, RouterState};

#[derive(Parser)]
#[command(name = "cacheroute")]
#[command(about = "Inspect and exercise cache routing configurations", long_about = None)]
struct Cli {
    /// Path to proxy.toml.
    #[arg(short, long, default_value = "proxy.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and build the router
    Check,
    /// Print the route tree
    RouteHandles,
    /// Print the configured compression codecs
    Codecs,
    /// Route commands read from stdin (`get k`, `set k v`, `delete k`, ...)
    Exec,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log = logging::init("info");
    let config = load_config(&cli.config)?;
    log.set_level(&config.observability.log_level);

    let state = RouterState::new(RouterGeneration::from_config(&config)?);
    let generation = state.load();

    match cli.command {
        Commands::Check => {
            let range = generation.codecs().id_range();
            println!(
                "ok: generation {}, {} routes, {} destinations, codecs {}..{}",
                generation.id(),
                route_handles(generation.root().as_ref()).len(),
                config.destinations.len(),
                range.first_id,
                u64::from(range.first_id) + u64::from(range.size),
            );
        }
        Commands::RouteHandles => {
            for (depth, name) in route_handles(generation.root().as_ref()) {
                println!("{}{}", "  ".repeat(depth), name);
            }
        }
        Commands::Codecs => {
            let map = generation.codecs().codec_map();
            let range = map.id_range();
            println!("first_id={} size={}", range.first_id, range.size);
            for offset in 0..range.size {
                if let Some(codec) = map.get(range.first_id + offset) {
                    println!(
                        "  {} {} level={} enabled={}",
                        codec.id(),
                        codec.codec_type(),
                        codec.options().compression_level,
                        codec.options().enabled,
                    );
                }
            }
        }
        Commands::Exec => {
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            let (mut requests, mut errors) = (0usize, 0usize);
            for line in stdin.lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(req) => {
                        let reply = state.route(&req);
                        requests += 1;
                        if reply.is_error() {
                            errors += 1;
                        }
                        writeln!(stdout, "{}", format_reply(&reply))?;
                    }
                    Err(e) => writeln!(stdout, "CLIENT_ERROR {}", e)?,
                }
            }
            tracing::info!(requests, errors, "Exec finished");
        }
    }

    Ok(())
}

/// Parse `<op> <key> [value]`, or `touch <key> [exptime]`.
fn parse_command(line: &str) -> Result<McRequest, String> {
    let mut parts = line.split_whitespace();
    let op: Operation = parts.next().ok_or("empty command")?.parse()?;
    let key = parts.next().ok_or("missing key")?;

    let mut req = McRequest::new(op, key);
    if op.has_value() {
        let value = parts.collect::<Vec<_>>().join(" ");
        req = req.with_value(value);
    } else if op == Operation::Touch {
        if let Some(exptime) = parts.next() {
            let exptime = exptime
                .parse()
                .map_err(|_| format!("invalid exptime {}", exptime))?;
            req = req.with_exptime(exptime);
        }
    }
    Ok(req)
}

fn format_reply(reply: &McReply) -> String {
    let mut out = reply.result.name().to_uppercase();
    if let Some(value) = &reply.value {
        out.push(' ');
        out.push_str(&String::from_utf8_lossy(value));
    }
    if let Some(message) = &reply.message {
        out.push_str(" (");
        out.push_str(message);
        out.push(')');
    }
    out
}
