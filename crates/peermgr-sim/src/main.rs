//! peermgr-sim — replay a peer activity trace against a registry.
//!
//!   peermgr-sim [TRACE_FILE]
//!
//! Reads stdin when no file is given. Registry size and picker seed come
//! from the peermgr config (see `peermgr_core::config`).

use std::io::{self, BufRead, BufReader, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::Serialize;

use peermgr::{PeerId, SharedPeerRegistry, Sighting, Timestamp};
use peermgr_core::config::PeerMgrConfig;

mod command;

use command::{parse_line, Command};

#[derive(Serialize)]
struct PeerView {
    peer: PeerId,
    last_seen: Timestamp,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = PeerMgrConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        PeerMgrConfig::default()
    });
    let registry =
        SharedPeerRegistry::from_config(&config).context("failed to create peer registry")?;
    tracing::info!(
        capacity = config.registry.capacity,
        seeded = config.sampling.fixed_seed().is_some(),
        "peermgr-sim starting"
    );

    let input: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("failed to open trace: {path}"))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    replay(input, &registry, &mut out)?;

    tracing::info!(tracked = registry.len(), "trace finished");
    Ok(())
}

/// Apply every command in `input`, writing pick/list results to `out`.
/// Malformed lines are logged and skipped.
fn replay(input: impl BufRead, registry: &SharedPeerRegistry, out: &mut impl Write) -> Result<()> {
    for (n, line) in input.lines().enumerate() {
        let line = line.context("failed to read trace")?;
        let cmd = match parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(line = n + 1, error = %e, "skipping malformed trace line");
                continue;
            }
        };

        match cmd {
            Command::Saw { peer, timestamp } => {
                let timestamp = timestamp.unwrap_or_else(now);
                if let Sighting::Evicted { evicted, .. } = registry.saw_peer(peer, timestamp) {
                    tracing::info!(peer, evicted, "registry full, forgot oldest peer");
                }
            }
            Command::Pick => match registry.pick_random_peer() {
                Some(peer) => writeln!(out, "{peer}")?,
                None => writeln!(out, "none")?,
            },
            Command::List => {
                let peers: Vec<PeerView> = registry
                    .snapshot()
                    .into_iter()
                    .map(|(peer, last_seen)| PeerView { peer, last_seen })
                    .collect();
                writeln!(out, "{}", serde_json::to_string(&peers)?)?;
            }
        }
    }
    Ok(())
}

fn now() -> Timestamp {
    seconds_since_epoch(SystemTime::now())
}

/// Whole seconds since the Unix epoch. Clocks set before the epoch read as 0.
fn seconds_since_epoch(time: SystemTime) -> Timestamp {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as Timestamp,
        Err(e) => {
            tracing::warn!(error = %e, "system clock is before the Unix epoch, using timestamp 0");
            0
        }
    }
}
