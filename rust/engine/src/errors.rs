use thiserror::Error;

use crate::cards::Card;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    // Upstream contract violations. Fatal to the hand.
    #[error("Hand evaluation needs at least 5 cards, got {got}")]
    InsufficientCards { got: usize },
    #[error("Hand evaluation accepts at most 7 cards, got {got}")]
    TooManyCards { got: usize },
    #[error("Duplicate card in evaluation input: {0}")]
    DuplicateCard(Card),
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    // Player protocol violations. Recoverable: the action is rejected.
    #[error("Cannot check while facing a bet of {to_call}")]
    CannotCheck { to_call: u32 },
    #[error("Invalid bet amount: {amount}, minimum: {minimum}")]
    InvalidBetAmount { amount: u32, minimum: u32 },
    #[error("Betting was not reopened; only call or fold is allowed")]
    RaiseNotReopened,
    #[error("Player already folded")]
    PlayerAlreadyFolded,
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: usize, actual: usize },
    #[error("Betting round already closed")]
    RoundClosed,

    #[error("Deck is empty")]
    DeckEmpty,

    #[error("Chip accounting mismatch: expected {expected}, found {actual}")]
    ChipMismatch { expected: u64, actual: u64 },

    #[error("Need at least 2 players with chips, have {seated}")]
    NotEnoughPlayers { seated: usize },
    #[error("Hole cards already full")]
    HoleCardsFull,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    /// True for player protocol violations, which the betting controller
    /// answers by rejecting the action and asking again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::CannotCheck { .. }
                | GameError::InvalidBetAmount { .. }
                | GameError::RaiseNotReopened
                | GameError::PlayerAlreadyFolded
                | GameError::NotPlayersTurn { .. }
        )
    }
}
