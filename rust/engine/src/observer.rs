use serde::Serialize;

use crate::cards::Card;
use crate::errors::GameError;
use crate::player::PlayerStatus;

/// Public state of one seat, as shown to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatSnapshot {
    pub player_id: usize,
    pub name: String,
    pub stack: u32,
    pub round_bet: u32,
    pub status: PlayerStatus,
    pub is_dealer: bool,
}

/// Public table state at a notification point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub board: Vec<Card>,
    pub current_bet: u32,
    pub seats: Vec<SeatSnapshot>,
}

/// One-way notifications to whatever renders the table. Nothing returned
/// here feeds back into the hand.
pub trait TableObserver {
    fn display_state(&mut self, _table: &TableSnapshot, _pot: u32, _stage: &str) {}
    fn log_action(&mut self, _player_id: usize, _label: &str, _amount: u32) {}
    /// The player's last request was refused; they will be asked again
    /// unless they are a bot out of attempts.
    fn action_rejected(&mut self, _player_id: usize, _error: &GameError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TableObserver for NullObserver {}
