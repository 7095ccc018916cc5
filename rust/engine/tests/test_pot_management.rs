use std::collections::HashMap;

use holdem_engine::cards::{full_deck, parse_cards};
use holdem_engine::errors::GameError;
use holdem_engine::hand::{best_hand, evaluate, EvaluatedHand};
use holdem_engine::pot::{build_pots, payouts_by_player, settle, split_evenly, Contribution};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn contrib(player_id: usize, amount: u32) -> Contribution {
    Contribution {
        player_id,
        amount,
        folded: false,
    }
}

fn folded(player_id: usize, amount: u32) -> Contribution {
    Contribution {
        player_id,
        amount,
        folded: true,
    }
}

fn hand(codes: &str) -> EvaluatedHand {
    evaluate(&parse_cards(codes).unwrap()).unwrap()
}

#[test]
fn three_layers_for_three_all_in_levels() {
    let pots = build_pots(&[contrib(0, 50), contrib(1, 100), contrib(2, 200)]).unwrap();
    assert_eq!(pots.len(), 3);
    assert_eq!(pots[0].amount, 150);
    assert_eq!(pots[0].eligible, vec![0, 1, 2]);
    assert_eq!(pots[1].amount, 100);
    assert_eq!(pots[1].eligible, vec![1, 2]);
    assert_eq!(pots[2].amount, 100);
    assert_eq!(pots[2].eligible, vec![2]);
}

#[test]
fn equal_contributions_make_one_pot() {
    let pots = build_pots(&[contrib(0, 1000), contrib(1, 1000)]).unwrap();
    assert_eq!(pots.len(), 1);
    assert_eq!(pots[0].amount, 2000);
}

#[test]
fn short_stack_cannot_win_above_its_level() {
    let contributions = [contrib(0, 50), contrib(1, 100), contrib(2, 200)];
    let mut hands = HashMap::new();
    hands.insert(0, hand("Ac Ad Ah As Kc"));
    hands.insert(1, hand("Kd Kh Ks 2c 2d"));
    hands.insert(2, hand("2h 5s 9c Jd Qh"));

    let awards = settle(&contributions, &hands).unwrap();
    let won = payouts_by_player(&awards);
    assert_eq!(won.get(&0), Some(&150));
    assert_eq!(won.get(&1), Some(&100));
    assert_eq!(won.get(&2), Some(&100));
}

#[test]
fn odd_chip_goes_to_first_winner_in_order() {
    let contributions = [folded(9, 1), contrib(4, 50), contrib(7, 50)];
    let mut hands = HashMap::new();
    hands.insert(4, hand("Ac Kd 9h 7s 4c"));
    hands.insert(7, hand("Ad Kh 9s 7c 4d"));

    for _ in 0..5 {
        let awards = settle(&contributions, &hands).unwrap();
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].amount, 101);
        assert_eq!(awards[0].winners, vec![4, 7]);
        let shares: Vec<(usize, u32)> = awards[0]
            .payouts
            .iter()
            .map(|p| (p.player_id, p.amount))
            .collect();
        assert_eq!(shares, vec![(4, 51), (7, 50)]);
    }

    // the order of the contributions decides who gets the chip
    let swapped = [folded(9, 1), contrib(7, 50), contrib(4, 50)];
    let awards = settle(&swapped, &hands).unwrap();
    assert_eq!(awards[0].payouts[0].player_id, 7);
    assert_eq!(awards[0].payouts[0].amount, 51);
}

#[test]
fn three_way_split_conserves_chips() {
    let shares: Vec<u32> = split_evenly(100, &[0, 1, 2])
        .iter()
        .map(|p| p.amount)
        .collect();
    assert_eq!(shares, vec![34, 33, 33]);
    assert_eq!(shares.iter().sum::<u32>(), 100);
}

#[test]
fn sole_survivor_takes_every_layer_without_hands() {
    let contributions = [folded(0, 300), contrib(1, 40), folded(2, 120)];
    let awards = settle(&contributions, &HashMap::new()).unwrap();
    assert!(awards.iter().all(|a| a.uncontested && a.winners == vec![1]));
    let won = payouts_by_player(&awards);
    assert_eq!(won.get(&1), Some(&460));
}

#[test]
fn folded_player_funds_but_never_wins() {
    let contributions = [folded(0, 100), contrib(1, 100), contrib(2, 100)];
    let mut hands = HashMap::new();
    hands.insert(1, hand("2c 3d 4h 5s 7c"));
    hands.insert(2, hand("2d 3h 4s 5c 8d"));
    let awards = settle(&contributions, &hands).unwrap();
    assert_eq!(awards.len(), 1);
    assert_eq!(awards[0].eligible, vec![1, 2]);
    assert_eq!(payouts_by_player(&awards).get(&2), Some(&300));
}

#[test]
fn no_chips_is_a_no_op() {
    let contributions = [contrib(0, 0), contrib(1, 0)];
    assert!(settle(&contributions, &HashMap::new()).unwrap().is_empty());
    assert!(build_pots(&[]).unwrap().is_empty());
}

#[test]
fn hand_without_contribution_is_inconsistent() {
    let contributions = [contrib(0, 10), contrib(1, 10)];
    let mut hands = HashMap::new();
    hands.insert(0, hand("2c 3d 4h 5s 7c"));
    hands.insert(1, hand("2d 3h 4s 5c 8d"));
    hands.insert(5, hand("Ac Ad Ah As Kc"));
    assert!(matches!(
        settle(&contributions, &hands),
        Err(GameError::InconsistentState(_))
    ));
}

#[test]
fn missing_hand_at_showdown_is_inconsistent() {
    let contributions = [contrib(0, 10), contrib(1, 10)];
    let mut hands = HashMap::new();
    hands.insert(0, hand("2c 3d 4h 5s 7c"));
    assert!(matches!(
        settle(&contributions, &hands),
        Err(GameError::InconsistentState(_))
    ));
}

#[test]
fn payouts_always_match_contributions() {
    let levels = [[5, 5, 5], [1, 2, 3], [0, 7, 7], [10, 3, 3], [9, 9, 1]];
    let boards = [
        ["2c 3d 4h 5s 7c", "2d 3h 4s 5c 7d", "Ac Ad Ah As Kc"],
        ["Kd Kh Ks 2c 2d", "Kc Qh Js Tc 9d", "Kd Kh Ks 2c 2d"],
    ];
    for amounts in levels {
        for codes in boards {
            let contributions: Vec<Contribution> = amounts
                .iter()
                .enumerate()
                .map(|(id, &a)| contrib(id, a))
                .collect();
            let hands: HashMap<usize, EvaluatedHand> =
                (0..3).map(|id| (id, hand(codes[id]))).collect();
            let awards = settle(&contributions, &hands).unwrap();
            let paid: u32 = awards.iter().flat_map(|a| &a.payouts).map(|p| p.amount).sum();
            assert_eq!(paid, amounts.iter().sum::<u32>());
        }
    }
}

#[test]
fn generated_contributions_are_paid_out_exactly() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    for _ in 0..500 {
        let players = rng.random_range(2..=6);
        let mut contributions: Vec<Contribution> = (0..players)
            .map(|id| Contribution {
                player_id: id,
                amount: rng.random_range(0..=300),
                folded: rng.random_bool(0.3),
            })
            .collect();
        contributions[rng.random_range(0..players)].folded = false;

        let mut deck = full_deck();
        deck.shuffle(&mut rng);
        let board = &deck[..5];
        let hands: HashMap<usize, EvaluatedHand> = contributions
            .iter()
            .filter(|c| !c.folded)
            .map(|c| {
                let hole = [deck[5 + 2 * c.player_id], deck[6 + 2 * c.player_id]];
                (c.player_id, best_hand(hole, board).unwrap())
            })
            .collect();

        let awards = settle(&contributions, &hands).unwrap();
        let put_in: u32 = contributions.iter().map(|c| c.amount).sum();
        let paid: u32 = awards.iter().flat_map(|a| &a.payouts).map(|p| p.amount).sum();
        assert_eq!(paid, put_in, "{contributions:?}");
        assert_eq!(awards.iter().map(|a| a.amount).sum::<u32>(), put_in);

        for award in &awards {
            assert!(!award.winners.is_empty());
            for w in &award.winners {
                assert!(award.eligible.contains(w), "{award:?}");
                let c = contributions.iter().find(|c| c.player_id == *w).unwrap();
                assert!(!c.folded);
            }
            let paid_to: Vec<usize> = award.payouts.iter().map(|p| p.player_id).collect();
            assert_eq!(paid_to, award.winners);
            let shares: Vec<u32> = award.payouts.iter().map(|p| p.amount).collect();
            let (lo, hi) = (shares.iter().min().unwrap(), shares.iter().max().unwrap());
            assert!(hi - lo <= 1, "{award:?}");
        }
    }
}

#[test]
fn contributions_beyond_one_pot_are_refused() {
    let contributions = [contrib(0, 3_000_000_000), folded(1, 3_000_000_000)];
    assert!(matches!(
        build_pots(&contributions),
        Err(GameError::InconsistentState(_))
    ));
    assert!(matches!(
        settle(&contributions, &HashMap::new()),
        Err(GameError::InconsistentState(_))
    ));
}

#[test]
fn largest_pot_that_fits_is_settled() {
    let contributions = [contrib(0, 2_000_000_000), folded(1, 2_000_000_000)];
    let awards = settle(&contributions, &HashMap::new()).unwrap();
    assert_eq!(payouts_by_player(&awards).get(&0), Some(&4_000_000_000));
}
