//! The multi hand orchestrator.
//!
//! A [`Session`] owns the players, their agents and the event ledger
//! for its whole life. Callers drive it in batches with
//! [`Session::play_hands`] and read it back through immutable
//! [`Snapshot`]s and the ledger tail.
use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{Level, event, trace_span};

use crate::core::{Card, Deck};

use super::agent::{Agent, Policy, PolicyKind};
use super::errors::{ConfigurationError, HoldemSimulationError};
use super::event::{Event, EventLedger};
use super::player::{Player, PlayerStatus};
use super::position::{Position, PositionAssignment};
use super::simulation::{HandSettings, HandSimulation};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 9;
pub const MAX_HANDS_PER_CALL: usize = 100;

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub player_count: usize,
    pub initial_stack: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    /// Seeds the deck shuffles and any random policies.
    pub seed: u64,
    /// Put every hole card in the ledger and snapshots.
    pub reveal_hole_cards: bool,
    /// The policy every seat plays unless agents are supplied.
    pub policy: PolicyKind,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_count: 6,
            initial_stack: 1000,
            small_blind: 5,
            big_blind: 10,
            seed: 0,
            reveal_hole_cards: false,
            policy: PolicyKind::Random,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigurationError::PlayerCount(self.player_count));
        }
        if self.initial_stack == 0 {
            return Err(ConfigurationError::NonPositiveStack);
        }
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(ConfigurationError::NonPositiveBlind);
        }
        if self.big_blind < self.small_blind {
            return Err(ConfigurationError::BigBlindBelowSmallBlind {
                small_blind: self.small_blind,
                big_blind: self.big_blind,
            });
        }
        Ok(())
    }
}

/// # SessionBuilder
///
/// Builds a [`Session`] from a config. Any setter overrides the
/// matching config field. Without agents every seat gets the
/// config's policy.
///
/// ## Examples
///
/// ```
/// use holdem_sim::arena::{PolicyKind, SessionBuilder};
///
/// let mut session = SessionBuilder::default()
///     .player_count(4)
///     .initial_stack(500)
///     .blinds(5, 10)
///     .seed(420)
///     .policy(PolicyKind::Threshold)
///     .build()
///     .unwrap();
/// let outcome = session.play_hands(10).unwrap();
/// assert_eq!(2000, outcome.snapshot.players.iter().map(|p| p.stack).sum::<u64>());
/// ```
#[derive(Default)]
pub struct SessionBuilder {
    config: SessionConfig,
    agents: Option<Vec<Box<dyn Agent>>>,
}

impl SessionBuilder {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn player_count(mut self, player_count: usize) -> Self {
        self.config.player_count = player_count;
        self
    }

    pub fn initial_stack(mut self, initial_stack: u64) -> Self {
        self.config.initial_stack = initial_stack;
        self
    }

    pub fn blinds(mut self, small_blind: u64, big_blind: u64) -> Self {
        self.config.small_blind = small_blind;
        self.config.big_blind = big_blind;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn reveal_hole_cards(mut self, reveal: bool) -> Self {
        self.config.reveal_hole_cards = reveal;
        self
    }

    pub fn policy(mut self, policy: PolicyKind) -> Self {
        self.config.policy = policy;
        self
    }

    /// One agent per seat, in seat order.
    pub fn agents(mut self, agents: Vec<Box<dyn Agent>>) -> Self {
        self.agents = Some(agents);
        self
    }

    pub fn build(self) -> Result<Session, ConfigurationError> {
        let config = self.config;
        config.validate()?;

        let agents = match self.agents {
            Some(agents) => {
                if agents.len() != config.player_count {
                    return Err(ConfigurationError::AgentCount {
                        expected: config.player_count,
                        found: agents.len(),
                    });
                }
                agents
            }
            None => (0..config.player_count)
                .map(|seat| -> Box<dyn Agent> {
                    Box::new(Policy::for_seat(config.policy, config.seed, seat))
                })
                .collect(),
        };

        let players: Vec<Player> = (0..config.player_count)
            .map(|seat| Player::new(seat, config.initial_stack))
            .collect();
        let chip_total = config.initial_stack * config.player_count as u64;
        let positions = PositionAssignment::assign(&players, None)
            .map(|a| a.roles)
            .unwrap_or_default();

        Ok(Session {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            players,
            agents,
            ledger: EventLedger::new(),
            button: None,
            positions,
            hand_number: 0,
            chip_total,
            last_pot_sizes: vec![],
            last_board: vec![],
            last_revealed: vec![],
        })
    }
}

/// Start a session with the default policy and seed.
pub fn new_session(
    player_count: usize,
    initial_stack: u64,
    small_blind: u64,
    big_blind: u64,
) -> Result<Session, ConfigurationError> {
    SessionBuilder::default()
        .player_count(player_count)
        .initial_stack(initial_stack)
        .blinds(small_blind, big_blind)
        .build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionStatus {
    /// More hands can be played.
    Active,
    /// Fewer than two players have chips. No more hands.
    Over,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSnapshot {
    pub name: String,
    pub seat: usize,
    pub stack: u64,
    pub status: PlayerStatus,
    pub profit: i64,
    pub hole_cards: Option<[Card; 2]>,
}

/// A read only copy of the table between batches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// The last hand played. Zero before the first hand.
    pub hand_number: u64,
    pub button: Option<usize>,
    pub players: Vec<PlayerSnapshot>,
    pub positions: BTreeMap<usize, Position>,
    pub pot_sizes: Vec<u64>,
    pub board: Vec<Card>,
    /// Pass this to [`Session::events`] to get only newer events.
    pub ledger_len: usize,
    pub status: SessionStatus,
}

/// What one call to [`Session::play_hands`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayOutcome {
    pub hands_played: usize,
    pub status: SessionStatus,
    pub snapshot: Snapshot,
    pub new_events: Vec<Event>,
}

pub struct Session {
    config: SessionConfig,
    players: Vec<Player>,
    agents: Vec<Box<dyn Agent>>,
    ledger: EventLedger,
    rng: StdRng,
    button: Option<usize>,
    positions: BTreeMap<usize, Position>,
    hand_number: u64,
    chip_total: u64,
    last_pot_sizes: Vec<u64>,
    last_board: Vec<Card>,
    last_revealed: Vec<usize>,
}

impl Session {
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn ledger(&self) -> &EventLedger {
        &self.ledger
    }

    /// Chips at the table. This never changes.
    pub fn chip_total(&self) -> u64 {
        self.chip_total
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    pub fn status(&self) -> SessionStatus {
        let seated = self.players.iter().filter(|p| !p.is_eliminated()).count();
        if seated < MIN_PLAYERS {
            SessionStatus::Over
        } else {
            SessionStatus::Active
        }
    }

    pub fn is_over(&self) -> bool {
        self.status() == SessionStatus::Over
    }

    /// Play up to `count` hands, stopping early if the session ends.
    ///
    /// A hand count outside 1..=100 is rejected before anything is
    /// played. Any other error aborts the hand in progress.
    pub fn play_hands(&mut self, count: usize) -> Result<PlayOutcome, HoldemSimulationError> {
        if !(1..=MAX_HANDS_PER_CALL).contains(&count) {
            return Err(ConfigurationError::HandCount(count).into());
        }

        let span = trace_span!("play_hands", count);
        let _enter = span.enter();

        let cursor = self.ledger.len();
        let mut hands_played = 0;
        for _ in 0..count {
            if self.is_over() {
                break;
            }
            self.play_hand()?;
            hands_played += 1;
        }

        let status = self.status();
        if status == SessionStatus::Over {
            event!(
                Level::INFO,
                hand_number = self.hand_number,
                "Session over, fewer than two players have chips"
            );
        }

        Ok(PlayOutcome {
            hands_played,
            status,
            snapshot: self.snapshot(),
            new_events: self.ledger.since(cursor).to_vec(),
        })
    }

    fn play_hand(&mut self) -> Result<(), HoldemSimulationError> {
        let Some(assignment) = PositionAssignment::assign(&self.players, self.button) else {
            return Ok(());
        };
        let hand_number = self.hand_number + 1;
        let button = assignment.button;
        let roles = assignment.roles.clone();
        let deck = Deck::shuffled(&mut self.rng);
        let settings = HandSettings {
            small_blind: self.config.small_blind,
            big_blind: self.config.big_blind,
            reveal_hole_cards: self.config.reveal_hole_cards,
        };

        let summary = HandSimulation::new(
            hand_number,
            settings,
            assignment,
            &mut self.players,
            &mut self.agents,
            &mut self.ledger,
            deck,
        )
        .run()?;

        self.hand_number = hand_number;
        self.button = Some(button);
        self.positions = roles;
        self.last_pot_sizes = summary.pot_sizes;
        self.last_board = summary.board;
        self.last_revealed = summary.revealed;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        let players = self
            .players
            .iter()
            .map(|p| {
                let shown = self.config.reveal_hole_cards || self.last_revealed.contains(&p.seat);
                PlayerSnapshot {
                    name: p.name.clone(),
                    seat: p.seat,
                    stack: p.stack,
                    status: p.status,
                    profit: p.profit,
                    hole_cards: if shown { p.hole_cards } else { None },
                }
            })
            .collect();

        Snapshot {
            hand_number: self.hand_number,
            button: self.button,
            players,
            positions: self.positions.clone(),
            pot_sizes: self.last_pot_sizes.clone(),
            board: self.last_board.clone(),
            ledger_len: self.ledger.len(),
            status: self.status(),
        }
    }

    /// Every event after `cursor`.
    pub fn events(&self, cursor: usize) -> &[Event] {
        self.ledger.since(cursor)
    }
}
