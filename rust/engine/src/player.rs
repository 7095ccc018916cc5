use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::betting::Street;
use crate::cards::Card;
use crate::errors::GameError;

/// An action requested by a player at a decision point.
///
/// Chip amounts for `Raise` are chips to add to the pot this action;
/// `RaiseTo` carries the total round bet instead. The betting controller
/// normalizes both to "chips to add".
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Check (only valid if nothing to call)
    Check,
    /// Call the current bet
    Call,
    /// Raise by adding this many chips
    Raise(u32),
    /// Raise to this total round bet
    RaiseTo(u32),
    /// Put in all remaining chips
    AllIn,
    /// Leave the table; aborts the hand and the game
    Exit,
}

/// Where a player stands in the current hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
}

/// A seated player: chips, hole cards and hand status. Decision making lives
/// in [`Controller`].
#[derive(Debug, Clone)]
pub struct Player {
    /// Stable identifier, unchanged when other players leave
    id: usize,
    name: String,
    /// Chips behind (not yet in the pot)
    stack: u32,
    hole: [Option<Card>; 2],
    status: PlayerStatus,
    /// Chips put into the pot during the current hand, all rounds
    contributed: u32,
}

impl Player {
    pub fn new(id: usize, name: impl Into<String>, stack: u32) -> Self {
        Self {
            id,
            name: name.into(),
            stack,
            hole: [None, None],
            status: PlayerStatus::Active,
            contributed: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn status(&self) -> PlayerStatus {
        self.status
    }
    pub fn contributed(&self) -> u32 {
        self.contributed
    }

    pub fn hole_cards(&self) -> [Option<Card>; 2] {
        self.hole
    }

    /// Both hole cards, once dealt.
    pub fn hole(&self) -> Option<[Card; 2]> {
        match self.hole {
            [Some(a), Some(b)] => Some([a, b]),
            _ => None,
        }
    }

    pub fn give_card(&mut self, c: Card) -> Result<(), GameError> {
        if self.hole[0].is_none() {
            self.hole[0] = Some(c);
            Ok(())
        } else if self.hole[1].is_none() {
            self.hole[1] = Some(c);
            Ok(())
        } else {
            Err(GameError::HoleCardsFull)
        }
    }

    /// Clears cards and contribution. A player without chips sits the hand
    /// out as folded.
    pub fn reset_for_hand(&mut self) {
        self.hole = [None, None];
        self.contributed = 0;
        self.status = if self.stack > 0 {
            PlayerStatus::Active
        } else {
            PlayerStatus::Folded
        };
    }

    /// Still holding cards (active or all-in).
    pub fn is_in_hand(&self) -> bool {
        self.status != PlayerStatus::Folded
    }

    /// Can still make decisions this hand.
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active && self.stack > 0
    }

    pub fn add_chips(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }

    /// Moves chips from the stack into the pot. Emptying the stack makes the
    /// player all-in.
    pub fn commit(&mut self, amount: u32) -> Result<u32, GameError> {
        if amount > self.stack {
            return Err(GameError::InconsistentState(format!(
                "player {} cannot commit {} with {} behind",
                self.id, amount, self.stack
            )));
        }
        self.stack -= amount;
        self.contributed += amount;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        Ok(amount)
    }

    pub fn fold(&mut self) -> Result<(), GameError> {
        if self.status == PlayerStatus::Folded {
            return Err(GameError::PlayerAlreadyFolded);
        }
        self.status = PlayerStatus::Folded;
        Ok(())
    }

    /// Returns this hand's contribution to the stack.
    pub fn refund(&mut self) {
        self.stack = self.stack.saturating_add(self.contributed);
        self.contributed = 0;
    }
}

/// What a player sees when asked to act.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub player_id: usize,
    pub street: Street,
    pub board: Vec<Card>,
    pub hole: [Option<Card>; 2],
    pub stack: u32,
    /// Chips this player already put in this round
    pub committed: u32,
    pub to_call: u32,
    /// False when only call or fold is allowed
    pub raise_open: bool,
    /// All chips in the middle, all rounds
    pub pot: u32,
}

/// External input for a human seat, e.g. a console prompt. Parsing text
/// into a [`PlayerAction`] is the caller's business.
pub trait ActionSource {
    fn next_action(&mut self, view: &TableView, current_bet: u32, min_raise: u32) -> PlayerAction;
}

impl<F> ActionSource for F
where
    F: FnMut(&TableView, u32, u32) -> PlayerAction,
{
    fn next_action(&mut self, view: &TableView, current_bet: u32, min_raise: u32) -> PlayerAction {
        self(view, current_bet, min_raise)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStyle {
    /// Checks when free, otherwise calls
    Passive,
    /// Makes the minimum raise whenever it can, otherwise calls
    Aggressive,
}

/// Rule-based automated player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bot {
    style: BotStyle,
}

impl Bot {
    pub fn new(style: BotStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> BotStyle {
        self.style
    }

    pub fn decide(&self, view: &TableView, min_raise: u32) -> PlayerAction {
        match self.style {
            BotStyle::Aggressive
                if view.raise_open && view.stack > view.to_call.saturating_add(min_raise) =>
            {
                PlayerAction::Raise(view.to_call + min_raise)
            }
            _ if view.to_call == 0 => PlayerAction::Check,
            _ => PlayerAction::Call,
        }
    }
}

impl ActionSource for Bot {
    fn next_action(&mut self, view: &TableView, _current_bet: u32, min_raise: u32) -> PlayerAction {
        self.decide(view, min_raise)
    }
}

/// The decision point of a seat: a human behind some input, or an
/// automated policy. Bots are paced by a thinking delay and lose their turn
/// after too many rejected actions; humans are asked until they answer.
pub enum Controller {
    Human(Box<dyn ActionSource>),
    Bot {
        policy: Box<dyn ActionSource>,
        thinking: Duration,
    },
}

impl Controller {
    pub fn human<S: ActionSource + 'static>(source: S) -> Self {
        Controller::Human(Box::new(source))
    }

    pub fn bot(style: BotStyle, thinking: Duration) -> Self {
        Self::automated(Bot::new(style), thinking)
    }

    /// Bot seat driven by any policy.
    pub fn automated<S: ActionSource + 'static>(policy: S, thinking: Duration) -> Self {
        Controller::Bot {
            policy: Box::new(policy),
            thinking,
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Controller::Human(_))
    }

    /// Simulated think time the orchestrator waits before asking a bot.
    pub fn thinking_delay(&self) -> Duration {
        match self {
            Controller::Human(_) => Duration::ZERO,
            Controller::Bot { thinking, .. } => *thinking,
        }
    }

    pub fn take_turn(&mut self, view: &TableView, current_bet: u32, min_raise: u32) -> PlayerAction {
        match self {
            Controller::Human(source) => source.next_action(view, current_bet, min_raise),
            Controller::Bot { policy, .. } => policy.next_action(view, current_bet, min_raise),
        }
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Controller::Human(_) => f.write_str("Human"),
            Controller::Bot { thinking, .. } => {
                f.debug_struct("Bot").field("thinking", thinking).finish()
            }
        }
    }
}
