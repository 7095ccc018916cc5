use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::betting::{ActionEvent, BettingRound, RoundStatus, Street};
use crate::cards::Card;
use crate::config::{GameSpeed, TableConfig};
use crate::deck::{CardSource, Deck};
use crate::errors::GameError;
use crate::hand::{best_hand, EvaluatedHand};
use crate::logger::{ActionRecord, HandLogger, HandRecord, ShowdownInfo, ShownHand};
use crate::observer::{NullObserver, SeatSnapshot, TableObserver, TableSnapshot};
use crate::player::{BotStyle, Controller, Player, PlayerAction, TableView};
use crate::pot::{payouts_by_player, settle, Contribution, PotAward};
use crate::rules::ValidatedAction;

/// Result of a completed hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSummary {
    pub record: HandRecord,
    /// Every seat's chips in the pot, seat order starting left of the dealer
    pub contributions: Vec<Contribution>,
    pub awards: Vec<PotAward>,
    /// Chips won minus chips put in, per player id
    pub net: BTreeMap<usize, i64>,
}

impl HandSummary {
    pub fn winners(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .awards
            .iter()
            .flat_map(|a| a.winners.iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// True when the hand ended before a showdown.
    pub fn uncontested(&self) -> bool {
        self.record.showdown.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandOutcome {
    Completed(HandSummary),
    /// A player exited. Chips already posted stay in the unawarded pot.
    Aborted { player_id: usize, pot: u32 },
}

// How the betting of a hand ended.
enum Betting {
    Showdown,
    Uncontested,
    Aborted { seat: usize },
}

/// Runs hands at one table. Seats are kept in clockwise order; players and
/// controllers are parallel vectors indexed by seat.
pub struct Engine {
    config: TableConfig,
    deck: Box<dyn CardSource>,
    pub(crate) players: Vec<Player>,
    pub(crate) controllers: Vec<Controller>,
    board: Vec<Card>,
    pub(crate) dealer: usize,
    observer: Box<dyn TableObserver>,
    logger: HandLogger,
    next_player_id: usize,
    hands_played: u32,
}

impl Engine {
    /// Engine with a shuffled deck seeded from `config.seed` (or entropy),
    /// no players and a silent observer.
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        config.validate()?;
        let deck = match config.seed {
            Some(seed) => Deck::new_with_seed(seed),
            None => Deck::from_entropy(),
        };
        let date = chrono::Utc::now().format("%Y%m%d").to_string();
        Ok(Self {
            config,
            deck: Box::new(deck),
            players: Vec::new(),
            controllers: Vec::new(),
            board: Vec::with_capacity(5),
            dealer: 0,
            observer: Box::new(NullObserver),
            logger: HandLogger::ids_only(&date),
            next_player_id: 0,
            hands_played: 0,
        })
    }

    pub fn with_deck<D: CardSource + 'static>(mut self, deck: D) -> Self {
        self.deck = Box::new(deck);
        self
    }

    pub fn with_observer<O: TableObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_logger(mut self, logger: HandLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Seats a player with the configured starting stack at the next seat
    /// clockwise. Returns the player's id.
    pub fn seat(&mut self, name: impl Into<String>, controller: Controller) -> usize {
        let stack = self.config.starting_stack;
        self.seat_with_stack(name, stack, controller)
    }

    /// Seats a rule-based bot that thinks for the configured time.
    pub fn seat_bot(&mut self, name: impl Into<String>, style: BotStyle) -> usize {
        let thinking = self.config.bot_thinking();
        self.seat(name, Controller::bot(style, thinking))
    }

    pub fn seat_with_stack(
        &mut self,
        name: impl Into<String>,
        stack: u32,
        controller: Controller,
    ) -> usize {
        let id = self.next_player_id;
        self.next_player_id += 1;
        self.players.push(Player::new(id, name, stack));
        self.controllers.push(controller);
        id
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    /// Seat index of the dealer button.
    pub fn dealer(&self) -> usize {
        self.dealer
    }
    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    pub fn set_dealer(&mut self, seat: usize) {
        self.dealer = if self.players.is_empty() {
            0
        } else {
            seat % self.players.len()
        };
    }

    /// Chips behind at every seat. Between hands this is all the chips at
    /// the table.
    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(|p| p.stack() as u64).sum()
    }

    /// Seats of the small and big blind for the next hand.
    pub fn blind_seats(&self) -> Option<(usize, usize)> {
        let n = self.players.len();
        let funded = self.players.iter().filter(|p| p.stack() > 0).count();
        if funded < 2 {
            return None;
        }
        let sb = if funded == 2 {
            self.next_funded(self.dealer)?
        } else {
            self.next_funded(self.dealer + 1)?
        };
        let bb = self.next_funded((sb + 1) % n)?;
        Some((sb, bb))
    }

    /// Plays one hand from blinds to payout.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotEnoughPlayers`] with fewer than two players holding chips
    /// - [`GameError::InvalidConfig`] if the stacks together exceed `u32::MAX`
    /// - [`GameError::DeckEmpty`] if the card source runs dry; every
    ///   contribution is refunded first
    /// - input contract and accounting errors from evaluation and settlement
    pub fn play_hand(&mut self) -> Result<HandOutcome, GameError> {
        let (sb, bb) = self.blind_seats().ok_or(GameError::NotEnoughPlayers {
            seated: self.players.iter().filter(|p| p.stack() > 0).count(),
        })?;
        let chips_before = self.total_chips();
        if chips_before > u64::from(u32::MAX) {
            return Err(GameError::InvalidConfig(format!(
                "{chips_before} chips at the table, more than a pot can hold"
            )));
        }
        let stacks_before: Vec<u32> = self.players.iter().map(|p| p.stack()).collect();

        for p in &mut self.players {
            p.reset_for_hand();
        }
        self.board.clear();
        self.deck.prepare();
        let hand_id = self.logger.next_id();
        info!(hand_id = %hand_id, dealer = self.dealer, players = self.players.len(), "hand started");

        let mut actions = Vec::new();
        let ending = match self.play_betting(sb, bb, &mut actions) {
            Ok(ending) => ending,
            Err(GameError::DeckEmpty) => {
                warn!(hand_id = %hand_id, "deck ran out, refunding the hand");
                for p in &mut self.players {
                    p.refund();
                }
                return Err(GameError::DeckEmpty);
            }
            Err(e) => return Err(e),
        };

        if let Betting::Aborted { seat } = ending {
            let player_id = self.players[seat].id();
            let pot = self.pot_total();
            info!(hand_id = %hand_id, player_id, pot, "hand aborted by exit");
            return Ok(HandOutcome::Aborted { player_id, pot });
        }

        let contributions = self.contributions();
        let hands = match ending {
            Betting::Showdown => self.evaluate_live()?,
            _ => HashMap::new(),
        };
        self.pace(1.0);
        let awards = settle(&contributions, &hands)?;
        let won = payouts_by_player(&awards);
        for p in &mut self.players {
            if let Some(&amount) = won.get(&p.id()) {
                p.add_chips(amount);
            }
        }

        let chips_after = self.total_chips();
        if chips_after != chips_before {
            error!(expected = chips_before, actual = chips_after, "chips not conserved over the hand");
            return Err(GameError::ChipMismatch {
                expected: chips_before,
                actual: chips_after,
            });
        }

        let net: BTreeMap<usize, i64> = self
            .players
            .iter()
            .zip(&stacks_before)
            .map(|(p, &before)| (p.id(), p.stack() as i64 - before as i64))
            .collect();
        let showdown = (!hands.is_empty()).then(|| self.showdown_info(&hands, &awards));
        let record = HandRecord {
            hand_id,
            seed: self.config.seed,
            dealer: self.players[self.dealer].id(),
            actions,
            board: self.board.clone(),
            pots: awards.clone(),
            ts: None,
            showdown,
        };
        if let Err(e) = self.logger.write(&record) {
            warn!(error = %e, "could not write hand record");
        }

        for award in &awards {
            for payout in &award.payouts {
                self.observer.log_action(payout.player_id, "wins", payout.amount);
            }
        }
        self.show_table(None, "Showdown");
        let pot: u32 = contributions.iter().map(|c| c.amount).sum();
        info!(hand_id = %record.hand_id, pot, pots = awards.len(), "hand finished");
        self.hands_played += 1;

        Ok(HandOutcome::Completed(HandSummary {
            record,
            contributions,
            awards,
            net,
        }))
    }

    fn play_betting(
        &mut self,
        sb: usize,
        bb: usize,
        actions: &mut Vec<ActionRecord>,
    ) -> Result<Betting, GameError> {
        let n = self.players.len();
        let big_blind = self.config.big_blind;
        let mut round = BettingRound::new(Street::Preflop, &self.players, bb + 1, big_blind);
        for (seat, amount, label) in [
            (sb, self.config.small_blind, "posts small blind"),
            (bb, big_blind, "posts big blind"),
        ] {
            let posted = round.post_forced(&mut self.players, seat, amount)?;
            let player_id = self.players[seat].id();
            debug!(seat, player_id, posted, "{}", label);
            actions.push(ActionRecord {
                player_id,
                street: Street::Preflop,
                action: ValidatedAction::Blind(posted),
                amount: posted,
            });
            self.observer.log_action(player_id, label, posted);
        }

        for _ in 0..2 {
            for k in 1..=n {
                let seat = (self.dealer + k) % n;
                if self.players[seat].is_in_hand() {
                    let card = self.deck.deal_one()?;
                    self.players[seat].give_card(card)?;
                }
            }
        }
        self.pace(1.0);

        let mut street = Street::Preflop;
        loop {
            match self.run_round(&mut round, actions)? {
                RoundStatus::Aborted { seat } => return Ok(Betting::Aborted { seat }),
                RoundStatus::Uncontested => return Ok(Betting::Uncontested),
                RoundStatus::Open | RoundStatus::Closed => {}
            }
            street = match street.next() {
                Some(next) => next,
                None => return Ok(Betting::Showdown),
            };
            self.deck.burn()?;
            let cards = self.deck.deal_many(street.cards_revealed())?;
            debug!(street = street.label(), cards = ?cards, "community cards dealt");
            self.board.extend(cards);
            round = BettingRound::new(street, &self.players, self.dealer + 1, big_blind);
        }
    }

    fn run_round(
        &mut self,
        round: &mut BettingRound,
        actions: &mut Vec<ActionRecord>,
    ) -> Result<RoundStatus, GameError> {
        let stage = format!("{} Betting", round.street().label());
        self.show_table(Some(&*round), &stage);

        while let Some(seat) = round.next_to_act(&self.players) {
            let event = self.request_action(round, seat)?;
            actions.push(ActionRecord {
                player_id: event.player_id,
                street: event.street,
                action: event.action,
                amount: event.delta,
            });
            self.observer
                .log_action(event.player_id, event.action.label(), event.delta);
            if let RoundStatus::Aborted { .. } = round.status() {
                break;
            }
            self.show_table(Some(&*round), &stage);
            self.pace(0.25);
        }
        self.pace(0.5);
        Ok(round.status())
    }

    /// Asks the seat's controller until the round accepts an action. A bot
    /// gets `max_invalid_actions` attempts and is folded after that; a human
    /// is asked again for as long as it takes.
    fn request_action(
        &mut self,
        round: &mut BettingRound,
        seat: usize,
    ) -> Result<ActionEvent, GameError> {
        let mut rejected = 0u32;
        loop {
            let thinking = self.controllers[seat].thinking_delay();
            if self.config.speed != GameSpeed::Instant && !thinking.is_zero() {
                std::thread::sleep(thinking);
            }
            let view = self.table_view(round, seat);
            let action =
                self.controllers[seat].take_turn(&view, round.current_bet(), round.min_raise());
            match round.apply(&mut self.players, seat, action) {
                Ok(event) => return Ok(event),
                Err(e) if e.is_recoverable() => {
                    rejected += 1;
                    let player_id = self.players[seat].id();
                    warn!(seat, player_id, ?action, error = %e, "action rejected");
                    self.observer.action_rejected(player_id, &e);
                    if !self.controllers[seat].is_human()
                        && rejected >= self.config.max_invalid_actions
                    {
                        warn!(seat, player_id, rejected, "folding bot after repeated invalid actions");
                        return round.apply(&mut self.players, seat, PlayerAction::Fold);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn table_view(&self, round: &BettingRound, seat: usize) -> TableView {
        let p = &self.players[seat];
        let ctx = round.context(&self.players, seat);
        TableView {
            player_id: p.id(),
            street: round.street(),
            board: self.board.clone(),
            hole: p.hole_cards(),
            stack: p.stack(),
            committed: ctx.committed,
            to_call: ctx.to_call(),
            raise_open: ctx.raise_open,
            pot: self.pot_total(),
        }
    }

    fn show_table(&mut self, round: Option<&BettingRound>, stage: &str) {
        let snapshot = self.snapshot(round);
        let pot = self.pot_total();
        self.observer.display_state(&snapshot, pot, stage);
    }

    fn snapshot(&self, round: Option<&BettingRound>) -> TableSnapshot {
        TableSnapshot {
            board: self.board.clone(),
            current_bet: round.map_or(0, |r| r.current_bet()),
            seats: self
                .players
                .iter()
                .enumerate()
                .map(|(seat, p)| SeatSnapshot {
                    player_id: p.id(),
                    name: p.name().to_string(),
                    stack: p.stack(),
                    round_bet: round.map_or(0, |r| r.round_bet(seat)),
                    status: p.status(),
                    is_dealer: seat == self.dealer,
                })
                .collect(),
        }
    }

    /// Contributions in seat order starting left of the dealer; this order
    /// decides who receives odd chips of a split pot.
    fn contributions(&self) -> Vec<Contribution> {
        let n = self.players.len();
        (1..=n)
            .map(|k| &self.players[(self.dealer + k) % n])
            .map(|p| Contribution {
                player_id: p.id(),
                amount: p.contributed(),
                folded: !p.is_in_hand(),
            })
            .collect()
    }

    fn evaluate_live(&self) -> Result<HashMap<usize, EvaluatedHand>, GameError> {
        let mut hands = HashMap::new();
        for p in self.players.iter().filter(|p| p.is_in_hand()) {
            let hole = p.hole().ok_or_else(|| {
                GameError::InconsistentState(format!("player {} reached showdown without cards", p.id()))
            })?;
            let hand = best_hand(hole, &self.board)?;
            debug!(player_id = p.id(), category = ?hand.category, "hand evaluated");
            hands.insert(p.id(), hand);
        }
        Ok(hands)
    }

    fn showdown_info(
        &self,
        hands: &HashMap<usize, EvaluatedHand>,
        awards: &[PotAward],
    ) -> ShowdownInfo {
        let mut winners: Vec<usize> = awards
            .iter()
            .flat_map(|a| a.winners.iter().copied())
            .collect();
        winners.sort_unstable();
        winners.dedup();
        let mut shown: Vec<ShownHand> = hands
            .iter()
            .map(|(&player_id, h)| ShownHand {
                player_id,
                category: h.category,
                cards: h.cards.to_vec(),
            })
            .collect();
        shown.sort_by_key(|h| h.player_id);
        ShowdownInfo {
            winners,
            hands: shown,
        }
    }

    fn pot_total(&self) -> u32 {
        self.players.iter().map(|p| p.contributed()).sum()
    }

    fn next_funded(&self, from: usize) -> Option<usize> {
        let n = self.players.len();
        (0..n)
            .map(|k| (from + k) % n)
            .find(|&s| self.players[s].stack() > 0)
    }

    /// Synchronous pause of `scale` times the configured base delay.
    pub(crate) fn pace(&self, scale: f32) {
        let delay: Duration = self.config.speed.base_delay().mul_f32(scale);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
