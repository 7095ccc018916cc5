use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::betting::Street;
use crate::cards::Card;
use crate::hand::Category;
use crate::pot::PotAward;
use crate::rules::ValidatedAction;

/// Records a single accepted action during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player_id: usize,
    /// The betting street when this action occurred
    pub street: Street,
    pub action: ValidatedAction,
    /// Chips added to the pot by this action
    pub amount: u32,
}

/// Hand shown by one player at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShownHand {
    pub player_id: usize,
    pub category: Category,
    pub cards: Vec<Card>,
}

/// Information about the showdown phase when hands are revealed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    /// Players who won at least one pot
    pub winners: Vec<usize>,
    pub hands: Vec<ShownHand>,
}

/// Complete record of a hand: actions, board and the pot awards.
/// Serialized to JSONL, one line per hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Unique identifier for this hand (format: YYYYMMDD-NNNNNN)
    pub hand_id: String,
    /// RNG seed used for deck shuffling, if any
    pub seed: Option<u64>,
    pub dealer: usize,
    /// Chronological list of accepted actions, blinds first
    pub actions: Vec<ActionRecord>,
    /// Community cards on the board (up to 5 cards)
    pub board: Vec<Card>,
    pub pots: Vec<PotAward>,
    /// Timestamp when the hand was played (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends hand records to a JSONL file. Output only; nothing is read back.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that only hands out ids, starting from `date`.
    pub fn ids_only(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
