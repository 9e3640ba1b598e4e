use rand::Rng;
use rand::seq::SliceRandom;

use super::{Card, CoreError, Suit, Value};

/// `Deck` is the full 52 card deck for one hand.
///
/// Cards are kept in order and a cursor marks how many
/// have been dealt. Dealt cards are never handed out again
/// until the deck is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    /// Card storage.
    cards: Vec<Card>,
    /// How many cards from the front have been dealt.
    dealt: usize,
}

impl Deck {
    /// Create the ordered 52 card deck.
    ///
    /// ```
    /// use holdem_sim::core::Deck;
    ///
    /// assert_eq!(52, Deck::new().remaining());
    /// ```
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(52);
        for s in &Suit::suits() {
            for v in &Value::values() {
                cards.push(Card::new(*v, *s));
            }
        }
        Self { cards, dealt: 0 }
    }

    /// Create a new deck and shuffle it with the passed in rng.
    /// Seeding the rng makes the resulting order reproducible.
    pub fn shuffled<R: Rng>(rng: &mut R) -> Self {
        let mut deck = Self::new();
        deck.shuffle(rng);
        deck
    }

    /// Randomly shuffle the cards that have not been dealt yet.
    /// This is a Fisher-Yates shuffle under the hood.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards[self.dealt..].shuffle(rng);
    }

    /// Deal the next `n` cards.
    ///
    /// Nothing is dealt if there aren't enough cards left.
    ///
    /// ```
    /// use holdem_sim::core::{CoreError, Deck};
    ///
    /// let mut deck = Deck::new();
    /// assert_eq!(50, deck.deal(50).unwrap().len());
    /// assert_eq!(
    ///     Err(CoreError::DeckExhausted { requested: 3, remaining: 2 }),
    ///     deck.deal(3)
    /// );
    /// ```
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, CoreError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CoreError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let cards = self.cards[self.dealt..self.dealt + n].to_vec();
        self.dealt += n;
        Ok(cards)
    }

    /// Deal exactly one card.
    pub fn deal_one(&mut self) -> Result<Card, CoreError> {
        let card = *self.cards.get(self.dealt).ok_or(CoreError::DeckExhausted {
            requested: 1,
            remaining: 0,
        })?;
        self.dealt += 1;
        Ok(card)
    }

    /// How many cards can still be dealt.
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.dealt
    }

    /// Have all of the cards been dealt from this deck?
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The cards that are still to be dealt, in dealing order.
    pub fn undealt(&self) -> &[Card] {
        &self.cards[self.dealt..]
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a deck that will deal the given cards first, in order,
/// followed by the rest of the deck. Useful for scripting hands.
impl From<Vec<Card>> for Deck {
    fn from(front: Vec<Card>) -> Self {
        let mut cards = front;
        for c in Deck::new().cards {
            if !cards.contains(&c) {
                cards.push(c);
            }
        }
        Self { cards, dealt: 0 }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_new_has_all_distinct_cards() {
        let d = Deck::new();
        let set: HashSet<Card> = d.undealt().iter().copied().collect();
        assert_eq!(52, set.len());
        assert!(set.contains(&Card::new(Value::Eight, Suit::Heart)));
    }

    #[test]
    fn test_deal_moves_cursor() {
        let mut d = Deck::new();
        let first = d.deal(2).unwrap();
        assert_eq!(50, d.remaining());
        let next = d.deal_one().unwrap();
        assert!(!first.contains(&next));
        assert_eq!(49, d.remaining());
    }

    #[test]
    fn test_exhausted() {
        let mut d = Deck::new();
        d.deal(52).unwrap();
        assert!(d.is_empty());
        assert_eq!(
            Err(CoreError::DeckExhausted {
                requested: 1,
                remaining: 0
            }),
            d.deal_one()
        );
        assert_eq!(Ok(vec![]), d.deal(0));
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = Deck::shuffled(&mut StdRng::seed_from_u64(420));
        let b = Deck::shuffled(&mut StdRng::seed_from_u64(420));
        let c = Deck::shuffled(&mut StdRng::seed_from_u64(421));
        assert_eq!(a, b);
        assert_ne!(a, c);

        // Shuffling is a permutation.
        let set: HashSet<Card> = a.undealt().iter().copied().collect();
        assert_eq!(52, set.len());
    }

    #[test]
    fn test_from_front_cards() {
        let ace = Card::new(Value::Ace, Suit::Spade);
        let king = Card::new(Value::King, Suit::Club);
        let mut d = Deck::from(vec![ace, king]);
        assert_eq!(52, d.remaining());
        assert_eq!(vec![ace, king], d.deal(2).unwrap());
        assert!(!d.undealt().contains(&ace));
    }
}
