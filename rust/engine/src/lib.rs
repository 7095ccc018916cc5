//! # holdem-engine: Texas Hold'em Hand Engine
//!
//! A deterministic Texas Hold'em engine for 2 to 10 seats. It evaluates
//! hands, runs the betting rounds, and settles main and side pots without
//! creating or losing a chip. Only the deck shuffle uses randomness, and it
//! is seeded.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and parsing
//! - [`deck`] - Seeded ChaCha20 deck and stacked decks for replays
//! - [`hand`] - Best five-card hand out of five to seven cards
//! - [`rules`] - Action normalization and legality
//! - [`betting`] - Per-street betting round controller
//! - [`pot`] - Side pot layering and pot distribution
//! - [`player`] - Seats, human and bot controllers
//! - [`observer`] - Notifications for whatever renders the table
//! - [`engine`] - Hand orchestration from blinds to payout
//! - [`game`] - Between-hand bookkeeping and the game loop
//! - [`config`] - Table configuration from TOML and the environment
//! - [`logger`] - Hand records as JSONL
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{evaluate, Category};
//!
//! let cards = parse_cards("Ah Kh Qh Jh Th 2c 3d").unwrap();
//! let best = evaluate(&cards).unwrap();
//! assert_eq!(best.category, Category::StraightFlush);
//! ```
//!
//! ## Settling Side Pots
//!
//! ```rust
//! use holdem_engine::pot::{build_pots, Contribution};
//!
//! let pots = build_pots(&[
//!     Contribution { player_id: 0, amount: 50, folded: false },
//!     Contribution { player_id: 1, amount: 100, folded: false },
//!     Contribution { player_id: 2, amount: 200, folded: false },
//! ])
//! .unwrap();
//! let amounts: Vec<u32> = pots.iter().map(|p| p.amount).collect();
//! assert_eq!(amounts, vec![150, 100, 100]);
//! ```
//!
//! ## Playing Hands
//!
//! ```rust
//! use std::time::Duration;
//! use holdem_engine::config::{GameSpeed, TableConfig};
//! use holdem_engine::engine::{Engine, HandOutcome};
//! use holdem_engine::player::{BotStyle, Controller};
//!
//! let config = TableConfig { seed: Some(42), speed: GameSpeed::Instant, bot_thinking_ms: 0, ..TableConfig::default() };
//! let mut engine = Engine::new(config).unwrap();
//! engine.seat("Alice", Controller::bot(BotStyle::Passive, Duration::ZERO));
//! engine.seat("Bob", Controller::bot(BotStyle::Aggressive, Duration::ZERO));
//!
//! match engine.play_hand().unwrap() {
//!     HandOutcome::Completed(summary) => assert!(!summary.awards.is_empty()),
//!     HandOutcome::Aborted { .. } => unreachable!(),
//! }
//! assert_eq!(engine.total_chips(), 2000);
//! ```

pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod observer;
pub mod player;
pub mod pot;
pub mod rules;
