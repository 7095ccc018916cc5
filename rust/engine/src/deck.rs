use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// 52-card deck dealt from the top. Shuffling is the only source of
/// randomness in the engine; everything downstream is a pure function of the
/// dealt order.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng,
        }
    }

    pub fn from_entropy() -> Self {
        Self::new_with_seed(rand::random())
    }

    /// Deck that deals `cards` in the given order, then runs dry.
    /// [`CardSource::prepare`] puts the cards back in that order.
    pub fn stacked(cards: Vec<Card>) -> StackedDeck {
        StackedDeck {
            order: cards.clone(),
            deck: Self {
                cards,
                position: 0,
                rng: ChaCha20Rng::seed_from_u64(0),
            },
        }
    }

    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn deal_one(&mut self) -> Result<Card, GameError> {
        let c = *self.cards.get(self.position).ok_or(GameError::DeckEmpty)?;
        self.position += 1;
        Ok(c)
    }

    /// Deals `n` cards or none at all.
    pub fn deal_many(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if self.remaining() < n {
            return Err(GameError::DeckEmpty);
        }
        let dealt = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(dealt)
    }

    pub fn burn(&mut self) -> Result<(), GameError> {
        self.deal_one().map(|_| ())
    }

    pub fn reset(&mut self) {
        self.cards = full_deck();
        self.position = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

/// A deck with a fixed deal order, used to replay known hands.
#[derive(Debug)]
pub struct StackedDeck {
    order: Vec<Card>,
    deck: Deck,
}

/// Card source consumed by the orchestrator.
pub trait CardSource {
    fn prepare(&mut self);
    fn deal_one(&mut self) -> Result<Card, GameError>;
    fn deal_many(&mut self, n: usize) -> Result<Vec<Card>, GameError>;
    fn burn(&mut self) -> Result<(), GameError>;
}

impl CardSource for Deck {
    fn prepare(&mut self) {
        self.shuffle();
    }
    fn deal_one(&mut self) -> Result<Card, GameError> {
        Deck::deal_one(self)
    }
    fn deal_many(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        Deck::deal_many(self, n)
    }
    fn burn(&mut self) -> Result<(), GameError> {
        Deck::burn(self)
    }
}

impl CardSource for StackedDeck {
    fn prepare(&mut self) {
        self.deck.cards = self.order.clone();
        self.deck.position = 0;
    }
    fn deal_one(&mut self) -> Result<Card, GameError> {
        self.deck.deal_one()
    }
    fn deal_many(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        self.deck.deal_many(n)
    }
    fn burn(&mut self) -> Result<(), GameError> {
        self.deck.burn()
    }
}
