//! Pot settlement: main pot, side pots, and who gets paid.
//!
//! Pots are built in layers from the distinct contribution levels of the
//! hand. A layer is contested only by players who did not fold and put in at
//! least that level, so an all-in player can never win chips above their own
//! contribution. Folded players' chips stay in the layers they funded.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::errors::GameError;
use crate::hand::EvaluatedHand;

/// One player's chips in the pot for the whole hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub player_id: usize,
    pub amount: u32,
    pub folded: bool,
}

/// A main or side pot before it is awarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u32,
    /// Players who can win this pot, in contribution order
    pub eligible: Vec<usize>,
}

/// Chips paid to one winner of a pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub player_id: usize,
    pub amount: u32,
}

/// How one pot was distributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotAward {
    pub amount: u32,
    pub eligible: Vec<usize>,
    pub winners: Vec<usize>,
    pub payouts: Vec<Payout>,
    /// Won without a showdown
    pub uncontested: bool,
}

/// Splits the layered pots out of the hand's contributions, main pot first.
///
/// Consecutive layers contested by the same players are merged, so the result
/// has one pot per distinct contribution level among non-folded players.
/// Chips from a layer nobody can win (only folded players reached it) are
/// added to the pot below it.
///
/// # Errors
///
/// [`GameError::InconsistentState`] for a player listed twice or more chips
/// than a single pot can hold.
pub fn build_pots(contributions: &[Contribution]) -> Result<Vec<Pot>, GameError> {
    check_unique(contributions)?;
    let total = total_contributed(contributions);
    if total > u64::from(u32::MAX) {
        return Err(GameError::InconsistentState(format!(
            "{total} chips contributed, more than a pot can hold"
        )));
    }

    let mut levels: Vec<u32> = contributions
        .iter()
        .map(|c| c.amount)
        .filter(|&a| a > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<Pot> = Vec::new();
    let mut carry = 0u32;
    let mut prev = 0u32;
    for level in levels {
        let layer: u32 = contributions
            .iter()
            .map(|c| c.amount.min(level) - c.amount.min(prev))
            .sum();
        let eligible: Vec<usize> = contributions
            .iter()
            .filter(|c| !c.folded && c.amount >= level)
            .map(|c| c.player_id)
            .collect();
        prev = level;

        if eligible.is_empty() {
            match pots.last_mut() {
                Some(below) => below.amount += layer,
                None => carry += layer,
            }
            continue;
        }
        match pots.last_mut() {
            Some(last) if last.eligible == eligible => last.amount += layer,
            _ => pots.push(Pot {
                amount: layer + std::mem::take(&mut carry),
                eligible,
            }),
        }
    }

    if carry > 0 {
        // every contributor folded; only zero-contribution players remain
        let eligible: Vec<usize> = contributions
            .iter()
            .filter(|c| !c.folded)
            .map(|c| c.player_id)
            .collect();
        if eligible.is_empty() {
            return Err(GameError::InconsistentState(
                "chips in the pot but no player left to win them".into(),
            ));
        }
        pots.insert(
            0,
            Pot {
                amount: carry,
                eligible,
            },
        );
    }

    let built: u64 = pots.iter().map(|p| p.amount as u64).sum();
    if built != total {
        error!(expected = total, actual = built, "pot layering lost chips");
        return Err(GameError::ChipMismatch {
            expected: total,
            actual: built,
        });
    }
    Ok(pots)
}

/// Splits `amount` among `winners` as evenly as integers allow. Remainder
/// chips go one each to the first winners in the given order.
///
/// ```
/// use holdem_engine::pot::split_evenly;
///
/// let shares: Vec<u32> = split_evenly(101, &[4, 7]).iter().map(|p| p.amount).collect();
/// assert_eq!(shares, vec![51, 50]);
/// ```
pub fn split_evenly(amount: u32, winners: &[usize]) -> Vec<Payout> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u32;
    let share = amount / n;
    let remainder = (amount % n) as usize;
    winners
        .iter()
        .enumerate()
        .map(|(i, &player_id)| Payout {
            player_id,
            amount: share + u32::from(i < remainder),
        })
        .collect()
}

/// Distributes every pot of the hand.
///
/// `contributions` must list each player of the hand once, in the order used
/// for remainder chips (seat order starting left of the dealer). `hands`
/// holds the evaluated hand of every non-folded player; it may be empty when
/// only one player is left, in which case no hand is looked at and that
/// player takes every pot.
///
/// # Errors
///
/// - [`GameError::InconsistentState`] when a hand belongs to a player that is
///   not among the contributions or folded, a contested pot has an eligible
///   player without a hand, or the chips put in exceed what a pot can hold
/// - [`GameError::ChipMismatch`] if the payouts do not add up to the chips put in
pub fn settle(
    contributions: &[Contribution],
    hands: &HashMap<usize, EvaluatedHand>,
) -> Result<Vec<PotAward>, GameError> {
    check_unique(contributions)?;
    for id in hands.keys() {
        match contributions.iter().find(|c| c.player_id == *id) {
            None => {
                return Err(GameError::InconsistentState(format!(
                    "hand given for player {id} who has no contribution"
                )))
            }
            Some(c) if c.folded => {
                return Err(GameError::InconsistentState(format!(
                    "hand given for folded player {id}"
                )))
            }
            Some(_) => {}
        }
    }

    let total = total_contributed(contributions);
    if total == 0 {
        return Ok(Vec::new());
    }

    let live: Vec<usize> = contributions
        .iter()
        .filter(|c| !c.folded)
        .map(|c| c.player_id)
        .collect();
    let pots = build_pots(contributions)?;

    let awards = if let [sole] = live.as_slice() {
        pots.into_iter()
            .map(|pot| PotAward {
                payouts: vec![Payout {
                    player_id: *sole,
                    amount: pot.amount,
                }],
                winners: vec![*sole],
                amount: pot.amount,
                eligible: pot.eligible,
                uncontested: true,
            })
            .collect::<Vec<_>>()
    } else {
        pots.into_iter()
            .map(|pot| award_showdown(pot, hands))
            .collect::<Result<Vec<_>, _>>()?
    };

    let paid: u64 = awards
        .iter()
        .flat_map(|a| a.payouts.iter())
        .map(|p| p.amount as u64)
        .sum();
    if paid != total {
        error!(expected = total, actual = paid, "payouts do not match the pot");
        return Err(GameError::ChipMismatch {
            expected: total,
            actual: paid,
        });
    }

    for (i, award) in awards.iter().enumerate() {
        info!(
            pot = i,
            amount = award.amount,
            winners = ?award.winners,
            uncontested = award.uncontested,
            "pot awarded"
        );
    }
    Ok(awards)
}

fn award_showdown(
    pot: Pot,
    hands: &HashMap<usize, EvaluatedHand>,
) -> Result<PotAward, GameError> {
    let mut contenders = Vec::with_capacity(pot.eligible.len());
    for id in &pot.eligible {
        let hand = hands.get(id).ok_or_else(|| {
            GameError::InconsistentState(format!("no evaluated hand for player {id} at showdown"))
        })?;
        contenders.push((*id, hand));
    }
    let best = contenders
        .iter()
        .map(|&(_, h)| h)
        .max()
        .ok_or_else(|| GameError::InconsistentState("pot without eligible players".into()))?;
    let winners: Vec<usize> = contenders
        .iter()
        .filter(|(_, h)| *h == best)
        .map(|&(id, _)| id)
        .collect();
    Ok(PotAward {
        payouts: split_evenly(pot.amount, &winners),
        winners,
        amount: pot.amount,
        eligible: pot.eligible,
        uncontested: false,
    })
}

/// Total won per player across all pots.
pub fn payouts_by_player(awards: &[PotAward]) -> BTreeMap<usize, u32> {
    let mut totals = BTreeMap::new();
    for p in awards.iter().flat_map(|a| a.payouts.iter()) {
        *totals.entry(p.player_id).or_insert(0) += p.amount;
    }
    totals
}

fn total_contributed(contributions: &[Contribution]) -> u64 {
    contributions.iter().map(|c| c.amount as u64).sum()
}

fn check_unique(contributions: &[Contribution]) -> Result<(), GameError> {
    let mut seen = HashSet::with_capacity(contributions.len());
    for c in contributions {
        if !seen.insert(c.player_id) {
            return Err(GameError::InconsistentState(format!(
                "player {} listed twice in contributions",
                c.player_id
            )));
        }
    }
    Ok(())
}
