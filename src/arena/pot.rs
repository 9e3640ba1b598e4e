//! Main and side pots.
//!
//! Pots are layered from what each player put in this hand. Every
//! distinct contribution level of a player still in the hand closes
//! off a layer, and only players who reached that level can win it.
use tracing::{Level, event};

use crate::core::{Card, Rank, Rankable};
use crate::utils::PlayerBitSet;

use super::errors::InvariantViolation;
use super::player::{Player, PlayerStatus};

/// One pot and the seats that can win it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pot {
    pub amount: u64,
    pub eligible: PlayerBitSet,
    /// Every chip in this pot came from its one eligible seat, so
    /// awarding it only returns an unmatched bet.
    #[cfg_attr(feature = "serde", serde(default))]
    pub uncalled: bool,
}

/// How one pot was handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PotAward {
    pub pot_index: usize,
    pub amount: u64,
    /// Seats that won and how much each got.
    pub winners: Vec<(usize, u64)>,
    /// Every eligible seat with the rank it showed. `None` when the
    /// pot went uncontested and no hand was evaluated.
    pub hands: Vec<(usize, Option<Rank>)>,
    /// The pot was an unmatched bet handed back.
    pub uncalled: bool,
}

/// Sweep every current bet into the players' hand contributions.
/// Returns the amount collected.
pub fn collect_bets(players: &mut [Player]) -> u64 {
    players
        .iter_mut()
        .map(|p| {
            let bet = p.current_bet;
            p.contributed += bet;
            p.current_bet = 0;
            bet
        })
        .sum()
}

/// Build the pots for everything committed so far, main pot first.
///
/// Bets that haven't been collected yet are included. Chips from
/// folded players fill the layers they reached but never make
/// the folded player eligible.
pub fn build_pots(players: &[Player]) -> Vec<Pot> {
    let mut levels: Vec<u64> = players
        .iter()
        .filter(|p| p.in_hand())
        .map(|p| p.total_committed())
        .filter(|c| *c > 0)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<Pot> = Vec::with_capacity(levels.len());
    let mut previous = 0;
    for level in levels {
        let amount: u64 = players
            .iter()
            .map(|p| p.total_committed().min(level) - p.total_committed().min(previous))
            .sum();
        let eligible: PlayerBitSet = players
            .iter()
            .filter(|p| p.in_hand() && p.total_committed() >= level)
            .map(|p| p.seat)
            .collect();
        let contributors = players
            .iter()
            .filter(|p| p.total_committed() > previous)
            .count();
        pots.push(Pot {
            amount,
            eligible,
            uncalled: contributors == 1,
        });
        previous = level;
    }

    // Anything a folded player put in above every live player's total
    // has nobody else to go to.
    let leftover: u64 = players
        .iter()
        .map(|p| p.total_committed().saturating_sub(previous))
        .sum();
    if leftover > 0 {
        if let Some(last) = pots.last_mut() {
            last.amount += leftover;
            last.uncalled = false;
        }
    }

    pots
}

/// Check that the pots account for every chip committed and that
/// each side pot's eligible set sits inside the main pot's.
pub fn validate_pots(pots: &[Pot], players: &[Player]) -> Result<(), InvariantViolation> {
    let pot_total: u64 = pots.iter().map(|p| p.amount).sum();
    let contributions: u64 = players.iter().map(|p| p.total_committed()).sum();
    if pot_total != contributions {
        return Err(InvariantViolation::PotTotalMismatch {
            pots: pot_total,
            contributions,
        });
    }

    if let Some(main) = pots.first() {
        for (pot_idx, pot) in pots.iter().enumerate() {
            let folded_eligible = pot
                .eligible
                .ones()
                .any(|s| players.get(s).is_none_or(|p| p.status == PlayerStatus::Folded));
            if !pot.eligible.is_subset(&main.eligible) || folded_eligible {
                return Err(InvariantViolation::PotEligibility { pot_idx });
            }
        }
    }
    Ok(())
}

/// Award every pot, main pot first.
///
/// A pot with a single eligible seat goes to it without looking at
/// any cards. Otherwise the best hand wins and exact ties split the
/// pot. The odd chip goes to the first winner in `odd_chip_order`.
pub fn settle(
    pots: &[Pot],
    players: &mut [Player],
    board: &[Card],
    odd_chip_order: &[usize],
) -> Result<Vec<PotAward>, InvariantViolation> {
    let mut awards = Vec::with_capacity(pots.len());
    let mut won = vec![0_u64; players.len()];

    for (pot_index, pot) in pots.iter().enumerate() {
        let eligible: Vec<usize> = odd_chip_order
            .iter()
            .copied()
            .filter(|s| pot.eligible.get(*s))
            .collect();

        let award = match eligible.as_slice() {
            [] => return Err(InvariantViolation::UnawardablePot { pot_idx: pot_index }),
            [only] => PotAward {
                pot_index,
                amount: pot.amount,
                winners: vec![(*only, pot.amount)],
                hands: vec![(*only, None)],
                uncalled: pot.uncalled,
            },
            _ => showdown(pot_index, pot.amount, &eligible, players, board),
        };

        for (seat, amount) in &award.winners {
            won[*seat] += amount;
        }
        event!(
            Level::DEBUG,
            pot_index,
            amount = pot.amount,
            winners = ?award.winners,
            "Awarded pot"
        );
        awards.push(award);
    }

    for player in players.iter_mut() {
        let winnings = won[player.seat];
        player.stack += winnings;
        player.profit += winnings as i64 - player.contributed as i64;
    }

    Ok(awards)
}

fn showdown(
    pot_index: usize,
    amount: u64,
    eligible: &[usize],
    players: &[Player],
    board: &[Card],
) -> PotAward {
    let hands: Vec<(usize, Option<Rank>)> = eligible
        .iter()
        .map(|seat| {
            let mut cards: Vec<Card> = board.to_vec();
            if let Some(hole) = players[*seat].hole_cards {
                cards.extend_from_slice(&hole);
            }
            (*seat, Some(cards.rank()))
        })
        .collect();

    let best = hands.iter().filter_map(|(_, r)| *r).max();
    let winning_seats: Vec<usize> = hands
        .iter()
        .filter(|(_, r)| *r == best)
        .map(|(s, _)| *s)
        .collect();

    let share = amount / winning_seats.len() as u64;
    let remainder = amount % winning_seats.len() as u64;
    let winners = winning_seats
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let extra = if i == 0 { remainder } else { 0 };
            (*s, share + extra)
        })
        .collect();

    PotAward {
        pot_index,
        amount,
        winners,
        hands,
        uncalled: false,
    }
}
