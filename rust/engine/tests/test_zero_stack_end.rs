use holdem_engine::config::{GameSpeed, TableConfig};
use holdem_engine::engine::Engine;
use holdem_engine::game::GameEnd;
use holdem_engine::player::{BotStyle, Controller, PlayerAction, TableView};

fn config(stack: u32) -> TableConfig {
    TableConfig {
        starting_stack: stack,
        seed: Some(2024),
        speed: GameSpeed::Instant,
        bot_thinking_ms: 0,
        ..TableConfig::default()
    }
}

#[test]
fn game_runs_until_one_player_has_all_chips() {
    let mut engine = Engine::new(config(20)).unwrap();
    engine.seat_bot("a", BotStyle::Aggressive);
    engine.seat_bot("b", BotStyle::Aggressive);
    engine.seat_bot("c", BotStyle::Aggressive);

    let summary = engine.run(None).unwrap();
    assert_eq!(summary.ended_by, GameEnd::OnePlayerLeft);
    // broke bots are removed between hands
    assert_eq!(summary.standings.len(), 1);
    assert_eq!(summary.standings[0].stack, 60);
    assert!(!summary.hands.is_empty());
}

#[test]
fn busted_human_ends_the_game_before_dealing() {
    let mut engine = Engine::new(config(20)).unwrap();
    engine.seat_with_stack(
        "you",
        0,
        Controller::human(|_: &TableView, _: u32, _: u32| PlayerAction::Call),
    );
    engine.seat_bot("a", BotStyle::Passive);
    engine.seat_bot("b", BotStyle::Passive);

    let summary = engine.run(None).unwrap();
    assert_eq!(summary.ended_by, GameEnd::HumanBusted { player_id: 0 });
    assert!(summary.hands.is_empty());
}

#[test]
fn exit_ends_the_game() {
    let mut engine = Engine::new(config(20)).unwrap();
    engine.seat_bot("a", BotStyle::Passive);
    engine.seat("you", Controller::human(|_: &TableView, _: u32, _: u32| PlayerAction::Exit));

    let summary = engine.run(Some(10)).unwrap();
    assert_eq!(summary.ended_by, GameEnd::PlayerExited { player_id: 1 });
    assert!(summary.hands.is_empty());
}
