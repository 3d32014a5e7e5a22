//! Activity trace format — one command per line.
//!
//!   saw <peer_id> [timestamp]
//!   pick
//!   list
//!
//! Blank lines and `#` comments are skipped.

use anyhow::{bail, Context, Result};
use peermgr::{PeerId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Activity from a peer. No timestamp means "now".
    Saw {
        peer: PeerId,
        timestamp: Option<Timestamp>,
    },
    Pick,
    List,
}

/// Parse one trace line. `Ok(None)` for lines with nothing to do.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let cmd = match words.next() {
        Some("saw") => {
            let peer = words
                .next()
                .context("saw: missing peer id")?
                .parse()
                .context("saw: peer id is not an unsigned 64-bit integer")?;
            let timestamp = words
                .next()
                .map(|t| t.parse().context("saw: timestamp is not an integer"))
                .transpose()?;
            Command::Saw { peer, timestamp }
        }
        Some("pick") => Command::Pick,
        Some("list") => Command::List,
        Some(other) => bail!("unknown command: {other}"),
        None => return Ok(None),
    };

    if let Some(extra) = words.next() {
        bail!("unexpected argument: {extra}");
    }
    Ok(Some(cmd))
}
