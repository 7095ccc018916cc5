use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::{Engine, HandOutcome, HandSummary};
use crate::errors::GameError;

/// Why a game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEnd {
    /// Fewer than two players have chips left
    OnePlayerLeft,
    /// A human seat ran out of chips
    HumanBusted { player_id: usize },
    PlayerExited { player_id: usize },
    /// The requested number of hands was played
    HandLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: usize,
    pub name: String,
    pub stack: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub hands: Vec<HandSummary>,
    pub ended_by: GameEnd,
    pub standings: Vec<Standing>,
}

impl Engine {
    /// Moves the button one seat clockwise and removes bots without chips.
    /// Broke humans keep their seat so the game can report them.
    ///
    /// The new dealer is the first seat after the old one that survives the
    /// removal. Returns the ids of the removed players.
    pub fn finish_hand(&mut self) -> Vec<usize> {
        let n = self.players.len();
        if n == 0 {
            return Vec::new();
        }
        let keeps: Vec<bool> = self
            .players
            .iter()
            .zip(&self.controllers)
            .map(|(p, c)| p.stack() > 0 || c.is_human())
            .collect();
        let next_dealer = (1..=n)
            .map(|k| (self.dealer + k) % n)
            .find(|&s| keeps[s])
            .map(|s| self.players[s].id());

        let mut removed = Vec::new();
        let mut seat = 0;
        self.players.retain(|p| {
            let keep = keeps[seat];
            seat += 1;
            if !keep {
                removed.push(p.id());
            }
            keep
        });
        let mut seat = 0;
        self.controllers.retain(|_| {
            let keep = keeps[seat];
            seat += 1;
            keep
        });
        for id in &removed {
            info!(player_id = id, "player eliminated");
        }

        self.dealer = next_dealer
            .and_then(|id| self.players.iter().position(|p| p.id() == id))
            .unwrap_or(0);
        removed
    }

    /// Reason the game cannot continue, if any.
    pub fn game_over(&self) -> Option<GameEnd> {
        if let Some(p) = self
            .players
            .iter()
            .zip(&self.controllers)
            .find(|(p, c)| c.is_human() && p.stack() == 0)
            .map(|(p, _)| p)
        {
            return Some(GameEnd::HumanBusted { player_id: p.id() });
        }
        let funded = self.players.iter().filter(|p| p.stack() > 0).count();
        (funded < 2).then_some(GameEnd::OnePlayerLeft)
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.players
            .iter()
            .map(|p| Standing {
                player_id: p.id(),
                name: p.name().to_string(),
                stack: p.stack(),
            })
            .collect()
    }

    /// Plays hands until the game is over, a player exits, or `max_hands`
    /// hands were played.
    pub fn run(&mut self, max_hands: Option<u32>) -> Result<GameSummary, GameError> {
        let mut hands = Vec::new();
        let ended_by = loop {
            if let Some(end) = self.game_over() {
                break end;
            }
            if max_hands.is_some_and(|max| hands.len() as u32 >= max) {
                break GameEnd::HandLimit;
            }
            match self.play_hand()? {
                HandOutcome::Completed(summary) => hands.push(summary),
                HandOutcome::Aborted { player_id, .. } => {
                    break GameEnd::PlayerExited { player_id }
                }
            }
            self.finish_hand();
            self.pace(2.0);
        };
        info!(hands = hands.len(), ended_by = ?ended_by, "game over");
        Ok(GameSummary {
            hands,
            ended_by,
            standings: self.standings(),
        })
    }
}
