//! Plays a single hand from blinds to settlement.
//!
//! The hand moves through its phases one `step` at a time. Each betting
//! street asks agents for actions until the round closes. Once only one
//! player is left the remaining streets are skipped, and when nobody can
//! bet any more the board is run out without action.
use std::collections::BTreeMap;

use tracing::{Level, event, trace_span};

use crate::core::{Card, Deck};

use super::action::AgentAction;
use super::agent::{Agent, PlayerView};
use super::betting::{BettingRound, Street};
use super::errors::{HoldemSimulationError, InvariantViolation};
use super::event::{
    ActionTakenEvent, BlindsPostedEvent, CardsDealtEvent, Deal, Event, EventLedger,
    HandEndedEvent, HandStartedEvent, PlayerEliminatedEvent, ShowdownResultEvent, ShownHand,
    StreetAdvancedEvent,
};
use super::player::{Player, PlayerStatus};
use super::position::{Position, PositionAssignment};
use super::pot::{self, Pot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandPhase {
    Starting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl HandPhase {
    fn street(&self) -> Option<Street> {
        match self {
            HandPhase::Preflop => Some(Street::Preflop),
            HandPhase::Flop => Some(Street::Flop),
            HandPhase::Turn => Some(Street::Turn),
            HandPhase::River => Some(Street::River),
            _ => None,
        }
    }

    fn after(street: Street) -> HandPhase {
        match street.next() {
            Some(Street::Flop) => HandPhase::Flop,
            Some(Street::Turn) => HandPhase::Turn,
            Some(Street::River) => HandPhase::River,
            Some(Street::Preflop) | None => HandPhase::Showdown,
        }
    }
}

/// Table settings a hand needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandSettings {
    pub small_blind: u64,
    pub big_blind: u64,
    pub reveal_hole_cards: bool,
}

/// What the session keeps from a finished hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSummary {
    pub hand_number: u64,
    /// Pots as they stood before they were awarded.
    pub pot_sizes: Vec<u64>,
    pub board: Vec<Card>,
    /// Seats whose hole cards were shown.
    pub revealed: Vec<usize>,
    pub eliminated: Vec<usize>,
}

pub struct HandSimulation<'a> {
    hand_number: u64,
    settings: HandSettings,
    positions: PositionAssignment,
    players: &'a mut [Player],
    agents: &'a mut [Box<dyn Agent>],
    ledger: &'a mut EventLedger,
    deck: Deck,
    board: Vec<Card>,
    phase: HandPhase,
    /// Stacks when the hand started.
    starting_stacks: Vec<u64>,
    chip_total: u64,
    pot_sizes: Vec<u64>,
    revealed: Vec<usize>,
    eliminated: Vec<usize>,
}

impl<'a> HandSimulation<'a> {
    pub fn new(
        hand_number: u64,
        settings: HandSettings,
        positions: PositionAssignment,
        players: &'a mut [Player],
        agents: &'a mut [Box<dyn Agent>],
        ledger: &'a mut EventLedger,
        deck: Deck,
    ) -> Self {
        let starting_stacks = players.iter().map(|p| p.stack).collect();
        let chip_total = players.iter().map(|p| p.stack).sum();
        Self {
            hand_number,
            settings,
            positions,
            players,
            agents,
            ledger,
            deck,
            board: Vec::with_capacity(5),
            phase: HandPhase::Starting,
            starting_stacks,
            chip_total,
            pot_sizes: vec![],
            revealed: vec![],
            eliminated: vec![],
        }
    }

    pub fn phase(&self) -> HandPhase {
        self.phase
    }

    pub fn more_phases(&self) -> bool {
        self.phase != HandPhase::Complete
    }

    /// Play the hand out.
    pub fn run(mut self) -> Result<HandSummary, HoldemSimulationError> {
        let span = trace_span!("hand", hand_number = self.hand_number);
        let _enter = span.enter();

        while self.more_phases() {
            self.step()?;
        }
        Ok(HandSummary {
            hand_number: self.hand_number,
            pot_sizes: self.pot_sizes,
            board: self.board,
            revealed: self.revealed,
            eliminated: self.eliminated,
        })
    }

    pub fn step(&mut self) -> Result<(), HoldemSimulationError> {
        match self.phase {
            HandPhase::Starting => self.start(),
            HandPhase::Preflop | HandPhase::Flop | HandPhase::Turn | HandPhase::River => {
                self.street()
            }
            HandPhase::Showdown => self.showdown(),
            HandPhase::Complete => Ok(()),
        }
    }

    fn start(&mut self) -> Result<(), HoldemSimulationError> {
        for player in self.players.iter_mut() {
            player.reset_for_hand();
        }

        self.ledger.push(Event::HandStarted(HandStartedEvent {
            hand_number: self.hand_number,
            button: self.positions.button,
            positions: self.positions.roles.clone(),
            stacks: self.starting_stacks.clone(),
        }));

        // Deal two cards to each seat, starting left of the button.
        for seat in self.positions.odd_chip_order() {
            let cards = self.deck.deal(2)?;
            let hole = [cards[0], cards[1]];
            self.players[seat].hole_cards = Some(hole);
            self.ledger.push(Event::CardsDealt(CardsDealtEvent {
                hand_number: self.hand_number,
                deal: Deal::Hole {
                    seat,
                    cards: self.settings.reveal_hole_cards.then_some(hole),
                },
            }));
        }

        self.phase = HandPhase::Preflop;
        Ok(())
    }

    fn post_blinds(&mut self, round: &mut BettingRound) {
        let sb_seat = self.positions.small_blind;
        let bb_seat = self.positions.big_blind;
        let small_blind = round.post_blind(&mut self.players[sb_seat], self.settings.small_blind);
        let big_blind = round.post_blind(&mut self.players[bb_seat], self.settings.big_blind);

        event!(
            Level::DEBUG,
            sb_seat,
            small_blind,
            bb_seat,
            big_blind,
            "Posted blinds"
        );
        self.ledger.push(Event::BlindsPosted(BlindsPostedEvent {
            hand_number: self.hand_number,
            small_blind_seat: sb_seat,
            small_blind,
            big_blind_seat: bb_seat,
            big_blind,
        }));
    }

    fn street(&mut self) -> Result<(), HoldemSimulationError> {
        let Some(street) = self.phase.street() else {
            return Ok(());
        };
        let span = trace_span!("street", %street);
        let _enter = span.enter();

        let mut round;
        let order;
        if street == Street::Preflop {
            round = BettingRound::new(street, self.settings.big_blind, self.settings.big_blind);
            self.post_blinds(&mut round);
            order = self.positions.preflop_order();
        } else {
            let cards = self.deck.deal(street.cards_to_deal())?;
            self.board.extend_from_slice(&cards);
            self.ledger.push(Event::CardsDealt(CardsDealtEvent {
                hand_number: self.hand_number,
                deal: Deal::Board {
                    street,
                    cards: cards.clone(),
                },
            }));
            self.ledger.push(Event::StreetAdvanced(StreetAdvancedEvent {
                hand_number: self.hand_number,
                street,
                board: self.board.clone(),
                pot_sizes: pot::build_pots(self.players).iter().map(|p| p.amount).collect(),
            }));
            round = BettingRound::new(street, 0, self.settings.big_blind);
            order = self.positions.postflop_order();
        }

        round.start(self.players, &order);
        self.run_betting_round(&mut round)?;

        pot::collect_bets(self.players);
        let pots = pot::build_pots(self.players);
        pot::validate_pots(&pots, self.players)?;
        self.check_chips()?;

        let in_hand = self.players.iter().filter(|p| p.in_hand()).count();
        self.phase = if in_hand <= 1 {
            HandPhase::Showdown
        } else {
            HandPhase::after(street)
        };
        Ok(())
    }

    fn run_betting_round(&mut self, round: &mut BettingRound) -> Result<(), HoldemSimulationError> {
        while let Some(seat) = round.next_to_act() {
            let view = self.view_for(round, seat);
            let action = self.agents[seat].act(&view);

            let applied = match round.apply_action(self.players, seat, action) {
                Ok(applied) => applied,
                Err(error) => {
                    // Check when it's free, otherwise fold.
                    let fallback = if round.to_call(&self.players[seat]) == 0 {
                        AgentAction::Call
                    } else {
                        AgentAction::Fold
                    };
                    event!(
                        Level::WARN,
                        seat,
                        ?action,
                        ?fallback,
                        %error,
                        "Agent action was invalid, replacing it"
                    );
                    round.apply_action(self.players, seat, fallback)?
                }
            };

            self.ledger.push(Event::ActionTaken(ActionTakenEvent {
                hand_number: self.hand_number,
                street: round.street(),
                action: applied,
                pot_after: self.players.iter().map(|p| p.total_committed()).sum(),
            }));
            self.check_chips()?;
        }
        Ok(())
    }

    fn view_for(&self, round: &BettingRound, seat: usize) -> PlayerView {
        let player = &self.players[seat];
        PlayerView {
            hand_number: self.hand_number,
            seat,
            street: round.street(),
            position: self.positions.position_of(seat),
            hole_cards: player.hole_cards,
            board: self.board.clone(),
            stack: player.stack,
            player_bet: player.current_bet,
            current_bet: round.current_bet(),
            to_call: round.to_call(player),
            min_raise_to: round.min_raise_to(),
            raise_count: round.raise_count(),
            pot_total: self.players.iter().map(|p| p.total_committed()).sum(),
            big_blind: self.settings.big_blind,
            num_in_hand: self.players.iter().filter(|p| p.in_hand()).count(),
            num_can_act: self.players.iter().filter(|p| p.can_act()).count(),
            can_raise: round.can_raise(player),
        }
    }

    fn showdown(&mut self) -> Result<(), HoldemSimulationError> {
        pot::collect_bets(self.players);
        let pots: Vec<Pot> = pot::build_pots(self.players);
        pot::validate_pots(&pots, self.players)?;
        self.pot_sizes = pots.iter().map(|p| p.amount).collect();

        let odd_chip_order = self.positions.odd_chip_order();
        let awards = pot::settle(&pots, self.players, &self.board, &odd_chip_order)?;

        for award in awards {
            let hands = award
                .hands
                .iter()
                .map(|(seat, rank)| {
                    let shown = rank.is_some() || self.settings.reveal_hole_cards;
                    if shown && !self.revealed.contains(seat) {
                        self.revealed.push(*seat);
                    }
                    ShownHand {
                        seat: *seat,
                        hole_cards: if shown {
                            self.players[*seat].hole_cards
                        } else {
                            None
                        },
                        rank: *rank,
                    }
                })
                .collect();
            self.ledger.push(Event::ShowdownResult(ShowdownResultEvent {
                hand_number: self.hand_number,
                pot_index: award.pot_index,
                amount: award.amount,
                winners: award.winners,
                hands,
                uncalled: award.uncalled,
            }));
        }

        for player in self.players.iter_mut() {
            player.contributed = 0;
        }
        self.check_chips()?;

        let stacks: Vec<u64> = self.players.iter().map(|p| p.stack).collect();
        let net = stacks
            .iter()
            .zip(&self.starting_stacks)
            .map(|(after, before)| *after as i64 - *before as i64)
            .collect();
        self.ledger.push(Event::HandEnded(HandEndedEvent {
            hand_number: self.hand_number,
            stacks,
            net,
        }));

        for player in self.players.iter_mut() {
            if player.stack == 0 && !player.is_eliminated() {
                player.status = PlayerStatus::Eliminated;
                self.eliminated.push(player.seat);
                event!(
                    Level::INFO,
                    seat = player.seat,
                    hand_number = self.hand_number,
                    "Player eliminated"
                );
                self.ledger.push(Event::PlayerEliminated(PlayerEliminatedEvent {
                    hand_number: self.hand_number,
                    seat: player.seat,
                }));
            }
        }

        event!(
            Level::INFO,
            hand_number = self.hand_number,
            pots = ?self.pot_sizes,
            "Hand complete"
        );
        self.phase = HandPhase::Complete;
        Ok(())
    }

    /// Every chip is either in a stack or committed to this hand.
    fn check_chips(&self) -> Result<(), InvariantViolation> {
        let found: u64 = self
            .players
            .iter()
            .map(|p| p.stack + p.total_committed())
            .sum();
        if found != self.chip_total {
            return Err(InvariantViolation::ChipSumMismatch {
                expected: self.chip_total,
                found,
            });
        }
        Ok(())
    }

    pub fn positions(&self) -> &BTreeMap<usize, Position> {
        &self.positions.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::action::ActionKind;
    use crate::arena::agent::HumanProxyAgent;
    use crate::core::cards_from_str;

    const SETTINGS: HandSettings = HandSettings {
        small_blind: 5,
        big_blind: 10,
        reveal_hole_cards: false,
    };

    fn proxies(actions: &[&[AgentAction]]) -> Vec<Box<dyn Agent>> {
        actions
            .iter()
            .map(|seat_actions| {
                let agent = HumanProxyAgent::default();
                for a in seat_actions.iter() {
                    agent.push(*a);
                }
                Box::new(agent) as Box<dyn Agent>
            })
            .collect()
    }

    /// A deck that deals the given cards first.
    fn stacked(cards: &str) -> Deck {
        Deck::from(cards_from_str(cards).unwrap())
    }

    #[test_log::test]
    fn test_fold_to_big_blind() {
        let mut players: Vec<Player> = (0..3).map(|i| Player::new(i, 100)).collect();
        let positions = PositionAssignment::assign(&players, None).unwrap();
        let mut agents = proxies(&[&[AgentAction::Fold], &[AgentAction::Fold], &[]]);
        let mut ledger = EventLedger::new();

        let sim = HandSimulation::new(
            1,
            SETTINGS,
            positions,
            &mut players,
            &mut agents,
            &mut ledger,
            Deck::new(),
        );
        let summary = sim.run().unwrap();

        assert_eq!(vec![15], summary.pot_sizes);
        assert!(summary.board.is_empty());
        assert!(summary.revealed.is_empty());
        assert_eq!(vec![100, 95, 105], players.iter().map(|p| p.stack).collect::<Vec<_>>());

        let showdowns: Vec<&ShowdownResultEvent> = ledger
            .iter()
            .filter_map(|e| match e {
                Event::ShowdownResult(r) => Some(r),
                _ => None,
            })
            .collect();
        assert_eq!(1, showdowns.len());
        assert_eq!(vec![(2, 15)], showdowns[0].winners);
        assert_eq!(None, showdowns[0].hands[0].rank);
        assert_eq!(None, showdowns[0].hands[0].hole_cards);
    }

    #[test_log::test]
    fn test_invalid_action_becomes_fold() {
        let mut players: Vec<Player> = (0..2).map(|i| Player::new(i, 100)).collect();
        let positions = PositionAssignment::assign(&players, None).unwrap();
        // Seat 0 is the button and acts first heads up.
        let mut agents = proxies(&[&[AgentAction::Raise(11)], &[]]);
        let mut ledger = EventLedger::new();

        HandSimulation::new(
            1,
            SETTINGS,
            positions,
            &mut players,
            &mut agents,
            &mut ledger,
            Deck::new(),
        )
        .run()
        .unwrap();

        assert_eq!(95, players[0].stack);
        assert_eq!(105, players[1].stack);
    }

    #[test_log::test]
    fn test_invalid_action_checks_when_free() {
        let mut players: Vec<Player> = (0..2).map(|i| Player::new(i, 100)).collect();
        let positions = PositionAssignment::assign(&players, None).unwrap();
        // The button limps. The big blind asks for a raise below the
        // minimum, which is replaced by a free check.
        let mut agents = proxies(&[&[AgentAction::Call], &[AgentAction::Raise(11)]]);
        let mut ledger = EventLedger::new();

        let summary = HandSimulation::new(
            1,
            SETTINGS,
            positions,
            &mut players,
            &mut agents,
            &mut ledger,
            Deck::new(),
        )
        .run()
        .unwrap();

        let big_blind_preflop: Vec<ActionKind> = ledger
            .iter()
            .filter_map(|e| match e {
                Event::ActionTaken(taken)
                    if taken.street == Street::Preflop && taken.action.seat == 1 =>
                {
                    Some(taken.action.kind)
                }
                _ => None,
            })
            .collect();
        assert_eq!(vec![ActionKind::Check], big_blind_preflop);
        assert_ne!(PlayerStatus::Folded, players[1].status);
        assert_eq!(5, summary.board.len());
        assert_eq!(200, players.iter().map(|p| p.stack).sum::<u64>());
    }

    #[test_log::test]
    fn test_all_in_runs_out_the_board() {
        let mut players: Vec<Player> = (0..2).map(|i| Player::new(i, 100)).collect();
        let positions = PositionAssignment::assign(&players, None).unwrap();
        let mut agents = proxies(&[&[AgentAction::Raise(100)], &[AgentAction::Call]]);
        let mut ledger = EventLedger::new();

        // Hole cards go to seat 1 first, then the button.
        let deck = stacked("KsKd AsAd 2c7h9dJc3s");
        let summary = HandSimulation::new(
            1,
            SETTINGS,
            positions,
            &mut players,
            &mut agents,
            &mut ledger,
            deck,
        )
        .run()
        .unwrap();

        assert_eq!(5, summary.board.len());
        assert_eq!(vec![200], summary.pot_sizes);
        assert_eq!(200, players[0].stack);
        assert_eq!(0, players[1].stack);
        assert_eq!(vec![1], summary.eliminated);
        assert!(players[1].is_eliminated());
        assert_eq!(vec![1, 0], summary.revealed);

        let actions = ledger
            .iter()
            .filter(|e| matches!(e, Event::ActionTaken(_)))
            .count();
        assert_eq!(2, actions);
    }

    #[test_log::test]
    fn test_checked_down_hand_reaches_river() {
        let mut players: Vec<Player> = (0..3).map(|i| Player::new(i, 100)).collect();
        let positions = PositionAssignment::assign(&players, None).unwrap();
        // Button and small blind limp, then everyone checks it down.
        let mut agents = proxies(&[&[AgentAction::Call], &[AgentAction::Call], &[]]);
        let mut ledger = EventLedger::new();

        let summary = HandSimulation::new(
            1,
            SETTINGS,
            positions,
            &mut players,
            &mut agents,
            &mut ledger,
            Deck::new(),
        )
        .run()
        .unwrap();

        assert_eq!(5, summary.board.len());
        assert_eq!(vec![30], summary.pot_sizes);
        assert_eq!(300, players.iter().map(|p| p.stack).sum::<u64>());
        let streets = ledger
            .iter()
            .filter(|e| matches!(e, Event::StreetAdvanced(_)))
            .count();
        assert_eq!(3, streets);
    }
}
