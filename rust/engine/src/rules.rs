use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::PlayerAction as A;

/// What an all-in amounts to relative to the current bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllInKind {
    /// Total stays at or below the current bet (exact or short call).
    Call,
    /// Raises the current bet by less than the minimum raise. Does not
    /// reopen the betting for players who already acted.
    ShortRaise,
    /// Raises by at least the minimum raise; a full raise.
    FullRaise,
}

/// An action after normalization. Amounts are always chips added to the pot
/// by this action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatedAction {
    /// Forced bet; never produced by [`validate_action`]
    Blind(u32),
    Fold,
    Check,
    Call(u32),
    Raise(u32),
    AllIn { amount: u32, kind: AllInKind },
    Exit,
}

impl ValidatedAction {
    pub fn chips(&self) -> u32 {
        match *self {
            ValidatedAction::Blind(n) | ValidatedAction::Call(n) | ValidatedAction::Raise(n) => n,
            ValidatedAction::AllIn { amount, .. } => amount,
            _ => 0,
        }
    }

    /// True when the action resets every other player's obligation to act.
    pub fn is_full_raise(&self) -> bool {
        matches!(
            self,
            ValidatedAction::Raise(_)
                | ValidatedAction::AllIn {
                    kind: AllInKind::FullRaise,
                    ..
                }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValidatedAction::Blind(_) => "posts blind",
            ValidatedAction::Fold => "folds",
            ValidatedAction::Check => "checks",
            ValidatedAction::Call(_) => "calls",
            ValidatedAction::Raise(_) => "raises",
            ValidatedAction::AllIn {
                kind: AllInKind::Call,
                ..
            } => "calls all-in",
            ValidatedAction::AllIn { .. } => "raises all-in",
            ValidatedAction::Exit => "leaves the table",
        }
    }
}

/// Betting position of the acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionContext {
    /// Chips behind
    pub stack: u32,
    /// Chips already put in during this round
    pub committed: u32,
    /// Highest round bet to match
    pub current_bet: u32,
    /// Smallest legal raise increment (one big blind)
    pub min_raise: u32,
    /// False once the player has acted and only short all-ins followed
    pub raise_open: bool,
}

impl ActionContext {
    pub fn to_call(&self) -> u32 {
        self.current_bet.saturating_sub(self.committed)
    }

    fn classify_all_in(&self) -> AllInKind {
        let total = u64::from(self.committed) + u64::from(self.stack);
        let current = u64::from(self.current_bet);
        if total <= current {
            AllInKind::Call
        } else if total - current >= u64::from(self.min_raise) {
            AllInKind::FullRaise
        } else {
            AllInKind::ShortRaise
        }
    }

    fn all_in(&self) -> Result<ValidatedAction, GameError> {
        let kind = self.classify_all_in();
        if kind != AllInKind::Call && !self.raise_open {
            return Err(GameError::RaiseNotReopened);
        }
        Ok(ValidatedAction::AllIn {
            amount: self.stack,
            kind,
        })
    }
}

/// Validates and normalizes a requested action.
///
/// Raise amounts are chips to add (`Raise`) or a total round bet (`RaiseTo`);
/// both come out as chips to add. Requests that can be read one way only are
/// coerced rather than rejected:
///
/// - a call with nothing to call is a check
/// - a call for at least the whole stack is an all-in call
/// - a raise that does not lift the total above the current bet is a call
/// - a raise for the whole stack or more is an all-in
///
/// # Errors
///
/// Returns a recoverable [`GameError`] for protocol violations:
/// - [`GameError::CannotCheck`] - check while facing a bet
/// - [`GameError::InvalidBetAmount`] - raise below the minimum without going all-in
/// - [`GameError::RaiseNotReopened`] - raise after a short all-in only
///
/// # Examples
///
/// ```
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::rules::{validate_action, ActionContext, AllInKind, ValidatedAction};
///
/// let ctx = ActionContext { stack: 60, committed: 0, current_bet: 100, min_raise: 2, raise_open: true };
/// assert_eq!(
///     validate_action(&ctx, PlayerAction::Call),
///     Ok(ValidatedAction::AllIn { amount: 60, kind: AllInKind::Call })
/// );
///
/// let ctx = ActionContext { stack: 1000, committed: 2, current_bet: 2, min_raise: 2, raise_open: true };
/// assert_eq!(validate_action(&ctx, PlayerAction::RaiseTo(10)), Ok(ValidatedAction::Raise(8)));
/// ```
pub fn validate_action(ctx: &ActionContext, action: A) -> Result<ValidatedAction, GameError> {
    let to_call = ctx.to_call();
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Exit => Ok(ValidatedAction::Exit),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::CannotCheck { to_call })
            }
        }
        A::Call => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else if ctx.stack <= to_call {
                ctx.all_in()
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        A::RaiseTo(total) => validate_action(ctx, A::Raise(total.saturating_sub(ctx.committed))),
        A::Raise(amount) => {
            if amount >= ctx.stack {
                return ctx.all_in();
            }
            if amount <= to_call {
                return validate_action(ctx, A::Call);
            }
            if !ctx.raise_open {
                return Err(GameError::RaiseNotReopened);
            }
            let raise_by = ctx.committed.saturating_add(amount) - ctx.current_bet;
            if raise_by < ctx.min_raise {
                return Err(GameError::InvalidBetAmount {
                    amount,
                    minimum: to_call.saturating_add(ctx.min_raise),
                });
            }
            Ok(ValidatedAction::Raise(amount))
        }
        A::AllIn => ctx.all_in(),
    }
}
