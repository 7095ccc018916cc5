//! Betting round controller.
//!
//! One [`BettingRound`] lives for one street. It decides who acts next,
//! validates and applies each action against the seat's [`Player`], and
//! reports when the round is over. Player state is owned by the caller and
//! passed in on every call.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::GameError;
use crate::player::{Player, PlayerAction};
use crate::rules::{validate_action, ActionContext, ValidatedAction};

/// A betting street in Texas Hold'em.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

impl Street {
    pub fn label(self) -> &'static str {
        match self {
            Street::Preflop => "Pre-flop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
        }
    }

    /// Community cards revealed when this street starts.
    pub fn cards_revealed(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }

    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    /// Someone still has to act.
    Open,
    /// Everyone able to act has acted since the last full raise and matched the bet.
    Closed,
    /// At most one player still holds cards; the hand ends now.
    Uncontested,
    /// A player chose to leave the table.
    Aborted { seat: usize },
}

/// Accepted action, as reported to the pot bookkeeping and the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEvent {
    pub seat: usize,
    pub player_id: usize,
    pub street: Street,
    pub action: ValidatedAction,
    /// Chips moved from the player's stack into the pot
    pub delta: u32,
    /// Player's total bet this round after the action
    pub round_bet: u32,
    /// Current bet to match after the action
    pub current_bet: u32,
}

/// Point-in-time view of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingRoundState {
    pub current_bet: u32,
    pub last_aggressor: Option<usize>,
    pub round_bets: Vec<u32>,
    pub players_yet_to_act: usize,
}

#[derive(Debug, Clone)]
pub struct BettingRound {
    street: Street,
    min_raise: u32,
    current_bet: u32,
    last_aggressor: Option<usize>,
    round_bets: Vec<u32>,
    // acted since the last full raise; forced bets do not count
    acted: Vec<bool>,
    cursor: usize,
    status: RoundStatus,
}

impl BettingRound {
    /// Starts a round; the first decision goes to the first seat at or after
    /// `first_to_act` that can still act. A round where nobody has anyone to
    /// bet against starts closed.
    pub fn new(street: Street, players: &[Player], first_to_act: usize, min_raise: u32) -> Self {
        let seats = players.len();
        let mut round = Self {
            street,
            min_raise,
            current_bet: 0,
            last_aggressor: None,
            round_bets: vec![0; seats],
            acted: vec![false; seats],
            cursor: if seats == 0 { 0 } else { first_to_act % seats },
            status: RoundStatus::Open,
        };
        round.refresh(players);
        round
    }

    pub fn street(&self) -> Street {
        self.street
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn min_raise(&self) -> u32 {
        self.min_raise
    }
    pub fn last_aggressor(&self) -> Option<usize> {
        self.last_aggressor
    }
    pub fn status(&self) -> RoundStatus {
        self.status
    }
    pub fn round_bet(&self, seat: usize) -> u32 {
        self.round_bets.get(seat).copied().unwrap_or(0)
    }

    /// A player may raise until they have acted; only a full raise by
    /// someone else gives them that right back.
    pub fn raise_open(&self, seat: usize) -> bool {
        !self.acted.get(seat).copied().unwrap_or(true)
    }

    pub fn snapshot(&self, players: &[Player]) -> BettingRoundState {
        BettingRoundState {
            current_bet: self.current_bet,
            last_aggressor: self.last_aggressor,
            round_bets: self.round_bets.clone(),
            players_yet_to_act: self.players_yet_to_act(players),
        }
    }

    pub fn players_yet_to_act(&self, players: &[Player]) -> usize {
        (0..players.len())
            .filter(|&s| self.needs_action(players, s))
            .count()
    }

    /// Posts a blind, capped at the player's stack. The bet to match becomes
    /// the full blind even when the poster is short. Returns the chips posted.
    pub fn post_forced(
        &mut self,
        players: &mut [Player],
        seat: usize,
        amount: u32,
    ) -> Result<u32, GameError> {
        self.check_seat(players, seat)?;
        let posted = amount.min(players[seat].stack());
        players[seat].commit(posted)?;
        self.round_bets[seat] += posted;
        self.current_bet = self.current_bet.max(amount);
        self.refresh(players);
        Ok(posted)
    }

    pub fn context(&self, players: &[Player], seat: usize) -> ActionContext {
        ActionContext {
            stack: players[seat].stack(),
            committed: self.round_bet(seat),
            current_bet: self.current_bet,
            min_raise: self.min_raise,
            raise_open: self.raise_open(seat),
        }
    }

    /// Seat whose decision is outstanding, if any.
    pub fn next_to_act(&self, players: &[Player]) -> Option<usize> {
        if self.status != RoundStatus::Open || players.is_empty() {
            return None;
        }
        let n = players.len();
        (0..n)
            .map(|k| (self.cursor + k) % n)
            .find(|&s| self.needs_action(players, s))
    }

    /// Validates and applies one action from `seat`.
    ///
    /// Protocol violations come back as recoverable errors and leave the
    /// round untouched, so the caller can ask again.
    pub fn apply(
        &mut self,
        players: &mut [Player],
        seat: usize,
        action: PlayerAction,
    ) -> Result<ActionEvent, GameError> {
        self.check_seat(players, seat)?;
        match self.next_to_act(players) {
            None => return Err(GameError::RoundClosed),
            Some(expected) if expected != seat => {
                return Err(GameError::NotPlayersTurn {
                    expected,
                    actual: seat,
                })
            }
            Some(_) => {}
        }

        let validated = validate_action(&self.context(players, seat), action)?;
        let delta = validated.chips();
        match validated {
            ValidatedAction::Exit => {
                self.status = RoundStatus::Aborted { seat };
            }
            ValidatedAction::Fold => players[seat].fold()?,
            ValidatedAction::Check => {}
            ValidatedAction::Blind(_)
            | ValidatedAction::Call(_)
            | ValidatedAction::Raise(_)
            | ValidatedAction::AllIn { .. } => {
                players[seat].commit(delta)?;
                self.round_bets[seat] += delta;
            }
        }

        let total = self.round_bets[seat];
        if total > self.current_bet {
            if validated.is_full_raise() {
                self.acted.iter_mut().for_each(|a| *a = false);
                self.last_aggressor = Some(seat);
            }
            self.current_bet = total;
        }
        self.acted[seat] = true;
        self.cursor = (seat + 1) % players.len();
        if validated != ValidatedAction::Exit {
            self.refresh(players);
        }

        debug!(
            street = self.street.label(),
            seat,
            player = players[seat].id(),
            action = validated.label(),
            delta,
            current_bet = self.current_bet,
            "action accepted"
        );

        Ok(ActionEvent {
            seat,
            player_id: players[seat].id(),
            street: self.street,
            action: validated,
            delta,
            round_bet: total,
            current_bet: self.current_bet,
        })
    }

    fn needs_action(&self, players: &[Player], seat: usize) -> bool {
        players[seat].can_act() && (!self.acted[seat] || self.round_bets[seat] < self.current_bet)
    }

    fn refresh(&mut self, players: &[Player]) {
        let in_hand = players.iter().filter(|p| p.is_in_hand()).count();
        let able: Vec<usize> = (0..players.len()).filter(|&s| players[s].can_act()).collect();
        self.status = if in_hand <= 1 {
            RoundStatus::Uncontested
        } else if able.is_empty() {
            RoundStatus::Closed
        } else if able.len() == 1 && self.round_bets[able[0]] >= self.current_bet {
            // nobody left to bet against
            RoundStatus::Closed
        } else if able.iter().any(|&s| self.needs_action(players, s)) {
            RoundStatus::Open
        } else {
            RoundStatus::Closed
        };
    }

    fn check_seat(&self, players: &[Player], seat: usize) -> Result<(), GameError> {
        if players.len() != self.round_bets.len() || seat >= players.len() {
            return Err(GameError::InconsistentState(format!(
                "seat {} outside a round of {} seats ({} players given)",
                seat,
                self.round_bets.len(),
                players.len()
            )));
        }
        Ok(())
    }
}
