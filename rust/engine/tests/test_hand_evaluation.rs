use holdem_engine::cards::{full_deck, parse_cards, Card, Rank as R, Suit as S};
use holdem_engine::errors::GameError;
use holdem_engine::hand::{best_hand, compare_hands, evaluate, Category, EvaluatedHand};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn c(s: S, r: R) -> Card {
    Card { suit: s, rank: r }
}

fn eval(codes: &str) -> holdem_engine::hand::EvaluatedHand {
    evaluate(&parse_cards(codes).expect("card codes")).expect("valid hand")
}

#[test]
fn detects_royal_flush() {
    let cards = [
        c(S::Hearts, R::Ten),
        c(S::Hearts, R::Jack),
        c(S::Hearts, R::Queen),
        c(S::Hearts, R::King),
        c(S::Hearts, R::Ace),
        c(S::Clubs, R::Two),
        c(S::Diamonds, R::Three),
    ];
    let hs = evaluate(&cards).unwrap();
    assert_eq!(hs.category, Category::StraightFlush);
    assert_eq!(hs.tiebreakers[0], 14);
}

#[test]
fn every_category_is_recognized() {
    let cases = [
        ("2c 5d 9h Js Kc 3d 7h", Category::HighCard),
        ("Ac Ad 9h Js Kc 3d 7h", Category::Pair),
        ("Ac Ad 9h 9s Kc 3d 7h", Category::TwoPair),
        ("Ac Ad Ah 9s Kc 3d 7h", Category::ThreeOfAKind),
        ("5c 6d 7h 8s 9c Kd Kh", Category::Straight),
        ("2h 5h 9h Jh Kh 3d 7c", Category::Flush),
        ("Ac Ad Ah 9s 9c 3d 7h", Category::FullHouse),
        ("Ac Ad Ah As Kc 3d 7h", Category::FourOfAKind),
        ("5s 6s 7s 8s 9s Kd Kh", Category::StraightFlush),
    ];
    for (codes, expected) in cases {
        assert_eq!(eval(codes).category, expected, "{codes}");
    }
}

#[test]
fn categories_order_strictly() {
    let ladder = [
        "2c 5d 9h Js Kc",
        "Ac Ad 9h Js Kc",
        "Ac Ad 9h 9s Kc",
        "Ac Ad Ah 9s Kc",
        "5c 6d 7h 8s 9c",
        "2h 5h 9h Jh Kh",
        "Ac Ad Ah 9s 9c",
        "Ac Ad Ah As Kc",
        "5s 6s 7s 8s 9s",
    ];
    let hands: Vec<_> = ladder.iter().map(|codes| eval(codes)).collect();
    for pair in hands.windows(2) {
        assert!(compare_hands(&pair[1], &pair[0]).is_gt());
    }
}

#[test]
fn ace_low_straight_plays_five_high() {
    let cards = [
        c(S::Spades, R::Ace),
        c(S::Hearts, R::Two),
        c(S::Diamonds, R::Three),
        c(S::Clubs, R::Four),
        c(S::Spades, R::Five),
        c(S::Diamonds, R::Nine),
        c(S::Clubs, R::King),
    ];
    let hs = evaluate(&cards).unwrap();
    assert_eq!(hs.category, Category::Straight);
    assert_eq!(hs.tiebreakers[0], 5);
    // the ace is the lowest card of the wheel
    assert_eq!(hs.cards[4].rank, R::Ace);

    let six_high = eval("2c 3d 4h 5s 6c");
    assert!(six_high > hs);
}

#[test]
fn steel_wheel_is_lowest_straight_flush() {
    let wheel = eval("Ad 2d 3d 4d 5d");
    let six = eval("2h 3h 4h 5h 6h");
    assert_eq!(wheel.category, Category::StraightFlush);
    assert!(six > wheel);
}

#[test]
fn full_house_compares_trips_then_pair() {
    let kings_full = eval("Kc Kd Kh 2s 2c");
    let queens_full = eval("Qc Qd Qh As Ac");
    assert!(kings_full > queens_full);
    assert_eq!(kings_full.tiebreakers[..2], [13, 2]);
}

#[test]
fn two_pair_uses_kicker() {
    let a = eval("Ac Ad 9h 9s Kc 3d 2h");
    let b = eval("As Ah 9c 9d Qc 3h 2d");
    assert!(a > b);
    assert_eq!(a.tiebreakers[..3], [14, 9, 13]);
}

#[test]
fn identical_ranks_tie_across_suits() {
    let a = eval("Ac Kd 9h 7s 4c");
    let b = eval("Ad Kh 9s 7c 4d");
    assert_eq!(a, b);
    assert!(compare_hands(&a, &b).is_eq());
}

#[test]
fn board_plays_for_both_players() {
    let board = parse_cards("Ts Js Qs Ks As").unwrap();
    let a = best_hand([c(S::Clubs, R::Two), c(S::Clubs, R::Three)], &board).unwrap();
    let b = best_hand([c(S::Hearts, R::Four), c(S::Diamonds, R::Five)], &board).unwrap();
    assert_eq!(a, b);
}

#[test]
fn fewer_than_five_cards_is_an_error() {
    let cards = parse_cards("As Kd 7h 2c").unwrap();
    assert_eq!(
        evaluate(&cards),
        Err(GameError::InsufficientCards { got: 4 })
    );
}

#[test]
fn more_than_seven_cards_is_an_error() {
    let cards = parse_cards("As Kd 7h 2c 3c 4c 5c 6c").unwrap();
    assert_eq!(evaluate(&cards), Err(GameError::TooManyCards { got: 8 }));
}

#[test]
fn duplicate_card_is_an_error() {
    let cards = parse_cards("As Kd 7h 2c As").unwrap();
    assert_eq!(
        evaluate(&cards),
        Err(GameError::DuplicateCard(c(S::Spades, R::Ace)))
    );
}

#[test]
fn result_does_not_depend_on_input_order() {
    let mut cards = parse_cards("9d 9h 4c 4s Kh 2d Jc").unwrap();
    let first = evaluate(&cards).unwrap();
    cards.reverse();
    let second = evaluate(&cards).unwrap();
    assert_eq!(first.category, second.category);
    assert_eq!(first.tiebreakers, second.tiebreakers);
}

fn deal_seven(rng: &mut ChaCha20Rng) -> Vec<Card> {
    let mut deck = full_deck();
    deck.shuffle(rng);
    deck.truncate(7);
    deck
}

#[test]
fn seven_card_result_beats_every_five_card_subset() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    for _ in 0..500 {
        let cards = deal_seven(&mut rng);
        let best = evaluate(&cards).unwrap();
        // the reported five cards make exactly the reported hand
        assert_eq!(evaluate(&best.cards).unwrap(), best, "{cards:?}");
        for skip_a in 0..7 {
            for skip_b in skip_a + 1..7 {
                let five: Vec<Card> = cards
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip_a && *i != skip_b)
                    .map(|(_, &card)| card)
                    .collect();
                assert!(evaluate(&five).unwrap() <= best, "{cards:?}");
            }
        }
    }
}

#[test]
fn higher_category_always_wins_on_dealt_hands() {
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let hands: Vec<EvaluatedHand> = (0..400)
        .map(|_| evaluate(&deal_seven(&mut rng)).unwrap())
        .collect();
    for a in &hands {
        for b in &hands {
            if a.category > b.category {
                assert!(compare_hands(a, b).is_gt(), "{a:?} vs {b:?}");
                assert!(compare_hands(b, a).is_lt(), "{b:?} vs {a:?}");
            }
        }
    }
}

#[test]
fn shuffled_input_evaluates_the_same() {
    let mut rng = ChaCha20Rng::seed_from_u64(99);
    for _ in 0..300 {
        let mut cards = deal_seven(&mut rng);
        let first = evaluate(&cards).unwrap();
        for _ in 0..3 {
            cards.shuffle(&mut rng);
            let again = evaluate(&cards).unwrap();
            assert_eq!(again.category, first.category);
            assert_eq!(again.tiebreakers, first.tiebreakers);
        }
    }
}
