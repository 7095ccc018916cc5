use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

/// Hand category, weakest first. Any hand of a higher category beats every
/// hand of a lower one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Best five-card hand found for a player.
///
/// Ordering and equality look at `category` first and then `tiebreakers`
/// lexicographically; `cards` is informational only, so two hands made of
/// different cards but the same ranks compare equal and split the pot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedHand {
    pub category: Category,
    // rank values ordered by significance, zero padded
    pub tiebreakers: [u8; 5],
    /// The five cards that make the hand, most significant first.
    pub cards: [Card; 5],
}

impl PartialEq for EvaluatedHand {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EvaluatedHand {}

impl PartialOrd for EvaluatedHand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvaluatedHand {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_hands(self, other)
    }
}

/// Orders two hands by category, then tiebreakers. `Equal` means a split.
pub fn compare_hands(a: &EvaluatedHand, b: &EvaluatedHand) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.tiebreakers.cmp(&b.tiebreakers),
        ord => ord,
    }
}

/// Evaluates 5 to 7 distinct cards and returns the best five-card hand.
///
/// Every five-card subset is scored (at most 21 of them) and the greatest
/// one under [`compare_hands`] is kept. When several subsets tie, the first
/// one enumerated wins, so the result is a pure function of the input order.
///
/// # Errors
///
/// - [`GameError::InsufficientCards`] for fewer than 5 cards
/// - [`GameError::TooManyCards`] for more than 7 cards
/// - [`GameError::DuplicateCard`] if a card appears twice
///
/// # Examples
///
/// ```
/// use holdem_engine::cards::parse_cards;
/// use holdem_engine::hand::{evaluate, Category};
///
/// let cards = parse_cards("As 2h 3d 4c 5s 9d Kc").unwrap();
/// let best = evaluate(&cards).unwrap();
/// assert_eq!(best.category, Category::Straight);
/// assert_eq!(best.tiebreakers[0], 5);
/// ```
pub fn evaluate(cards: &[Card]) -> Result<EvaluatedHand, GameError> {
    if cards.len() < 5 {
        return Err(GameError::InsufficientCards { got: cards.len() });
    }
    if cards.len() > 7 {
        return Err(GameError::TooManyCards { got: cards.len() });
    }
    let mut seen = HashSet::with_capacity(cards.len());
    for &c in cards {
        if !seen.insert(c) {
            return Err(GameError::DuplicateCard(c));
        }
    }

    let mut best: Option<EvaluatedHand> = None;
    for idx in five_card_subsets(cards.len()) {
        let five = idx.map(|i| cards[i]);
        let candidate = rank_five(five);
        let better = match &best {
            None => true,
            Some(b) => candidate > *b,
        };
        if better {
            best = Some(candidate);
        }
    }
    best.ok_or(GameError::InsufficientCards { got: cards.len() })
}

/// Convenience for two hole cards plus the community cards dealt so far.
pub fn best_hand(hole: [Card; 2], board: &[Card]) -> Result<EvaluatedHand, GameError> {
    let mut all = Vec::with_capacity(2 + board.len());
    all.extend_from_slice(&hole);
    all.extend_from_slice(board);
    evaluate(&all)
}

/// All ascending index combinations of 5 out of `n`.
fn five_card_subsets(n: usize) -> Vec<[usize; 5]> {
    let mut out = Vec::new();
    if n < 5 {
        return out;
    }
    let mut idx = [0, 1, 2, 3, 4];
    loop {
        out.push(idx);
        // advance the rightmost index that still has room
        let mut i = 5;
        while i > 0 && idx[i - 1] == n - 5 + (i - 1) {
            i -= 1;
        }
        if i == 0 {
            return out;
        }
        idx[i - 1] += 1;
        for j in i..5 {
            idx[j] = idx[j - 1] + 1;
        }
    }
}

fn rank_five(cards: [Card; 5]) -> EvaluatedHand {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    for c in &cards {
        rank_counts[c.rank.value() as usize] += 1;
    }
    let flush = cards.iter().all(|c| c.suit == cards[0].suit);

    // (count, rank) groups, larger groups first, then higher ranks
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.cmp(a));

    let straight_high = if groups.len() == 5 {
        detect_straight_high(&groups.iter().map(|&(_, r)| r).collect::<Vec<_>>())
    } else {
        None
    };

    let category = match (straight_high, flush, groups[0].0, groups.get(1).map(|g| g.0)) {
        (Some(_), true, _, _) => Category::StraightFlush,
        (_, _, 4, _) => Category::FourOfAKind,
        (_, _, 3, Some(2)) => Category::FullHouse,
        (_, true, _, _) => Category::Flush,
        (Some(_), false, _, _) => Category::Straight,
        (_, _, 3, _) => Category::ThreeOfAKind,
        (_, _, 2, Some(2)) => Category::TwoPair,
        (_, _, 2, _) => Category::Pair,
        _ => Category::HighCard,
    };

    let mut tiebreakers = [0u8; 5];
    match straight_high {
        Some(high) if matches!(category, Category::Straight | Category::StraightFlush) => {
            tiebreakers[0] = high;
        }
        _ => {
            for (slot, &(_, r)) in tiebreakers.iter_mut().zip(groups.iter()) {
                *slot = r;
            }
        }
    }

    EvaluatedHand {
        category,
        tiebreakers,
        cards: order_cards(cards, &groups, straight_high == Some(5)),
    }
}

/// Orders the five cards by significance: grouped ranks first, the Ace last
/// in a wheel.
fn order_cards(mut cards: [Card; 5], groups: &[(u8, u8)], wheel: bool) -> [Card; 5] {
    let weight = |c: &Card| {
        let r = c.rank.value();
        let r = if wheel && r == 14 { 1 } else { r };
        let count = groups
            .iter()
            .find(|&&(_, gr)| gr == c.rank.value())
            .map_or(0, |g| g.0);
        (count, r, c.suit)
    };
    cards.sort_by_key(|c| std::cmp::Reverse(weight(c)));
    cards
}

/// High card of a five-rank run in `ranks` (descending, distinct), with
/// A-2-3-4-5 counting as a five-high straight.
fn detect_straight_high(ranks: &[u8]) -> Option<u8> {
    if ranks.len() != 5 {
        return None;
    }
    if ranks[0] - ranks[4] == 4 {
        return Some(ranks[0]);
    }
    if ranks == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}
