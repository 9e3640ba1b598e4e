//! This is the arena module. It plays multi hand Texas Hold'em sessions
//! between synthetic players.
//!
//! # Session Example
//!
//! A session is fully determined by its config. The same seed always
//! deals the same cards and produces the same ledger.
//!
//! ```
//! use holdem_sim::arena::{SessionBuilder, SessionStatus, SessionStats};
//!
//! let mut session = SessionBuilder::default()
//!     .player_count(6)
//!     .initial_stack(1000)
//!     .blinds(5, 10)
//!     .seed(420)
//!     .build()
//!     .unwrap();
//!
//! let outcome = session.play_hands(50).unwrap();
//! let chips: u64 = outcome.snapshot.players.iter().map(|p| p.stack).sum();
//! assert_eq!(6000, chips);
//!
//! // Pick up only what happened since the last look.
//! let cursor = outcome.snapshot.ledger_len;
//! if outcome.status == SessionStatus::Active {
//!     session.play_hands(5).unwrap();
//! }
//! let newer = session.events(cursor);
//!
//! let stats = SessionStats::replay(session.events(0));
//! println!("{} new events, {} hands", newer.len(), stats.hands);
//! ```
//!
//! # Custom Agents
//!
//! Any [`Agent`] can sit at the table.
//!
//! ```
//! use holdem_sim::arena::agent::{HumanProxyAgent, ThresholdAgent};
//! use holdem_sim::arena::{Agent, AgentAction, SessionBuilder};
//!
//! let human = HumanProxyAgent::default();
//! let queue = human.queue();
//! queue.borrow_mut().push_back(AgentAction::Call);
//!
//! let agents: Vec<Box<dyn Agent>> = vec![
//!     Box::new(human),
//!     Box::<ThresholdAgent>::default(),
//!     Box::<ThresholdAgent>::default(),
//! ];
//! let mut session = SessionBuilder::default()
//!     .player_count(3)
//!     .agents(agents)
//!     .build()
//!     .unwrap();
//! session.play_hands(1).unwrap();
//! ```
pub mod action;
pub mod agent;
pub mod betting;
pub mod errors;
pub mod event;
pub mod player;
pub mod position;
pub mod pot;
pub mod session;
pub mod simulation;
pub mod stats;

#[cfg(any(test, feature = "arena-test-util"))]
pub mod test_util;

pub use action::{ActionKind, AgentAction, AppliedAction};
pub use agent::{Agent, PlayerView, Policy, PolicyKind};
pub use betting::{BettingRound, RoundState, Street};
pub use errors::{ConfigurationError, GameStateError, HoldemSimulationError, InvariantViolation};
pub use event::{Event, EventLedger};
pub use player::{Player, PlayerStatus};
pub use position::{Position, PositionAssignment};
pub use pot::{Pot, PotAward};
pub use session::{
    PlayOutcome, PlayerSnapshot, Session, SessionBuilder, SessionConfig, SessionStatus, Snapshot,
    new_session,
};
pub use simulation::{HandSimulation, HandSummary};
pub use stats::{SeatStats, SessionStats};
