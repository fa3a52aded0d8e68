//! Wire messages exchanged between two remote peers.
//!
//! Each message is one JSON object on its own line, for example
//! `{"type":"shot","attributes":{"x":3,"y":4}}`. A line longer than
//! [`MAX_MESSAGE_SIZE`] is rejected, as is any `type` other than `shot` or
//! `hit`.

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};

use crate::core::{Cell, ShotOutcome};

/// Largest accepted encoded message, newline included.
pub const MAX_MESSAGE_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "attributes", rename_all = "lowercase")]
pub enum Message {
    /// Fire at `(x, y)`.
    Shot { x: i64, y: i64 },
    /// Outcome code `hit` of the shot at `(x, y)`.
    Hit { x: i64, y: i64, hit: i64 },
}

impl Message {
    pub fn shot(cell: Cell) -> Self {
        Message::Shot {
            x: cell.x() as i64,
            y: cell.y() as i64,
        }
    }

    pub fn hit(cell: Cell, outcome: ShotOutcome) -> Self {
        Message::Hit {
            x: cell.x() as i64,
            y: cell.y() as i64,
            hit: outcome.code(),
        }
    }

    /// Target cell, validated against the board.
    pub fn cell(&self) -> anyhow::Result<Cell> {
        let (x, y) = match *self {
            Message::Shot { x, y } | Message::Hit { x, y, .. } => (x, y),
        };
        Cell::from_signed(x, y).ok_or_else(|| anyhow!("cell ({}, {}) is off the board", x, y))
    }

    /// Outcome carried by a `hit` message.
    pub fn outcome(&self) -> anyhow::Result<ShotOutcome> {
        match *self {
            Message::Hit { hit, .. } => {
                ShotOutcome::from_code(hit).ok_or_else(|| anyhow!("unknown outcome code {}", hit))
            }
            Message::Shot { .. } => bail!("a shot message carries no outcome"),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Message::Shot { .. } => "shot",
            Message::Hit { .. } => "hit",
        }
    }
}

/// Encode `msg` as a single newline-terminated line.
pub fn encode(msg: &Message) -> anyhow::Result<Vec<u8>> {
    let mut line = serde_json::to_vec(msg).context("Serialization error")?;
    line.push(b'\n');
    if line.len() > MAX_MESSAGE_SIZE {
        bail!("Message too large: {} bytes (max: {})", line.len(), MAX_MESSAGE_SIZE);
    }
    Ok(line)
}

/// Decode one line, with or without its trailing newline.
pub fn decode(line: &[u8]) -> anyhow::Result<Message> {
    if line.len() > MAX_MESSAGE_SIZE {
        bail!("Message too large: {} bytes (max: {})", line.len(), MAX_MESSAGE_SIZE);
    }
    let text = std::str::from_utf8(line).context("message is not valid UTF-8")?;
    let text = text.trim_end_matches(['\r', '\n']);
    serde_json::from_str(text).with_context(|| format!("malformed message {:?}", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shot_uses_type_and_attributes() {
        let cell = Cell::new(3, 4).unwrap();
        let line = encode(&Message::shot(cell)).unwrap();
        assert_eq!(
            std::str::from_utf8(&line).unwrap(),
            "{\"type\":\"shot\",\"attributes\":{\"x\":3,\"y\":4}}\n"
        );
    }

    #[test]
    fn decodes_hit_from_peer() {
        let msg = decode(br#"{"type": "hit", "attributes": {"x": 3, "y": 4, "hit": 1}}"#).unwrap();
        assert_eq!(msg.cell().unwrap(), Cell::new(3, 4).unwrap());
        assert_eq!(msg.outcome().unwrap(), ShotOutcome::Hit);
    }

    #[test]
    fn off_board_cell_is_rejected() {
        let msg = Message::Shot { x: 10, y: 0 };
        assert!(msg.cell().is_err());
        let msg = Message::Shot { x: -1, y: 0 };
        assert!(msg.cell().is_err());
    }
}
