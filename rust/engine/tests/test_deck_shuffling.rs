use std::collections::HashSet;

use holdem_engine::cards::{parse_cards, Card};
use holdem_engine::deck::{CardSource, Deck};
use holdem_engine::errors::GameError;

#[test]
fn deck_reset_has_52_unique_cards() {
    let mut deck = Deck::new_with_seed(42);
    deck.reset();
    let mut set = HashSet::new();
    for i in 0..52 {
        let c = deck.deal_one().expect("should have 52 cards");
        assert!(set.insert(c), "card {:?} duplicated at position {}", c, i);
    }
    assert_eq!(deck.deal_one(), Err(GameError::DeckEmpty));
}

#[test]
fn shuffle_is_deterministic_with_same_seed() {
    let mut d1 = Deck::new_with_seed(12345);
    let mut d2 = Deck::new_with_seed(12345);
    d1.shuffle();
    d2.shuffle();
    let a = d1.deal_many(10).unwrap();
    let b = d2.deal_many(10).unwrap();
    assert_eq!(a, b, "same seed must yield identical order");
}

#[test]
fn shuffle_differs_with_different_seed() {
    let mut d1 = Deck::new_with_seed(1);
    let mut d2 = Deck::new_with_seed(2);
    d1.shuffle();
    d2.shuffle();
    let a: Vec<Card> = d1.deal_many(10).unwrap();
    let b: Vec<Card> = d2.deal_many(10).unwrap();
    assert_ne!(
        a, b,
        "different seeds should produce different orders (high probability)"
    );
}

#[test]
fn burn_and_deal_follow_holdem_procedure() {
    let mut deck = Deck::new_with_seed(777);
    deck.shuffle();

    let holes = deck.deal_many(4).unwrap();
    deck.burn().unwrap();
    let flop = deck.deal_many(3).unwrap();
    deck.burn().unwrap();
    let turn = deck.deal_one().unwrap();
    deck.burn().unwrap();
    let river = deck.deal_one().unwrap();

    // 4 hole cards, 5 board cards, 3 burns
    assert_eq!(deck.remaining(), 40);
    let mut set = HashSet::new();
    for c in holes.into_iter().chain(flop).chain([turn, river]) {
        assert!(set.insert(c));
    }
}

#[test]
fn stacked_deck_replays_the_same_hand() {
    let order = parse_cards("As Kd 7h 2c").unwrap();
    let mut deck = Deck::stacked(order.clone());
    for _ in 0..2 {
        deck.prepare();
        let dealt: Vec<Card> = (0..4).map(|_| deck.deal_one().unwrap()).collect();
        assert_eq!(dealt, order);
        assert_eq!(deck.deal_one(), Err(GameError::DeckEmpty));
    }
}
