use std::fmt;

use super::card::{Card, Value};

/// All the different possible hand ranks.
/// For each hand rank the u32 corresponds to
/// the strength of the hand in comparison to others
/// of the same rank.
///
/// Made cards are kept as a value bitset shifted left by 13
/// with the kickers as a bitset in the low 13 bits. Straights
/// carry the index into `STRAIGHTS`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rank {
    /// The lowest rank.
    /// No matches
    HighCard(u32),
    /// One Card matches another.
    OnePair(u32),
    /// Two diffent pair of matching cards.
    TwoPair(u32),
    /// Three of the same value.
    ThreeOfAKind(u32),
    /// Five cards in a sequence
    Straight(u32),
    /// Five cards of the same suit
    Flush(u32),
    /// Three of one value and two of another value
    FullHouse(u32),
    /// Four of the same value.
    FourOfAKind(u32),
    /// Five cards in a sequence all fo the same suit.
    StraightFlush(u32),
}

/// Shorthand for the bit of a single value.
const fn bit(v: Value) -> u32 {
    1 << (v as u32)
}

/// Every straight from the wheel up to broadway, weakest first.
pub const STRAIGHTS: [u32; 10] = [
    // Wheel.
    bit(Value::Ace) | bit(Value::Two) | bit(Value::Three) | bit(Value::Four) | bit(Value::Five),
    // Two to six
    bit(Value::Two) | bit(Value::Three) | bit(Value::Four) | bit(Value::Five) | bit(Value::Six),
    // Three to Seven
    bit(Value::Three) | bit(Value::Four) | bit(Value::Five) | bit(Value::Six) | bit(Value::Seven),
    // Four to Eight
    bit(Value::Four) | bit(Value::Five) | bit(Value::Six) | bit(Value::Seven) | bit(Value::Eight),
    // Five to Nine
    bit(Value::Five) | bit(Value::Six) | bit(Value::Seven) | bit(Value::Eight) | bit(Value::Nine),
    // Six to Ten
    bit(Value::Six) | bit(Value::Seven) | bit(Value::Eight) | bit(Value::Nine) | bit(Value::Ten),
    // Seven to Jack.
    bit(Value::Seven) | bit(Value::Eight) | bit(Value::Nine) | bit(Value::Ten) | bit(Value::Jack),
    // Eight to Queen
    bit(Value::Eight) | bit(Value::Nine) | bit(Value::Ten) | bit(Value::Jack) | bit(Value::Queen),
    // Nine to king
    bit(Value::Nine) | bit(Value::Ten) | bit(Value::Jack) | bit(Value::Queen) | bit(Value::King),
    // Royal straight
    bit(Value::Ten) | bit(Value::Jack) | bit(Value::Queen) | bit(Value::King) | bit(Value::Ace),
];

impl Rank {
    /// A human readable name for the category.
    pub fn name(&self) -> &'static str {
        match self {
            Rank::HighCard(_) => "High Card",
            Rank::OnePair(_) => "One Pair",
            Rank::TwoPair(_) => "Two Pair",
            Rank::ThreeOfAKind(_) => "Three of a Kind",
            Rank::Straight(_) => "Straight",
            Rank::Flush(_) => "Flush",
            Rank::FullHouse(_) => "Full House",
            Rank::FourOfAKind(_) => "Four of a Kind",
            Rank::StraightFlush(9) => "Royal Flush",
            Rank::StraightFlush(_) => "Straight Flush",
        }
    }

    /// The category from 0 (high card) to 8 (straight flush).
    /// Useful for threshold comparisons that ignore kickers.
    pub fn category(&self) -> u8 {
        match self {
            Rank::HighCard(_) => 0,
            Rank::OnePair(_) => 1,
            Rank::TwoPair(_) => 2,
            Rank::ThreeOfAKind(_) => 3,
            Rank::Straight(_) => 4,
            Rank::Flush(_) => 5,
            Rank::FullHouse(_) => 6,
            Rank::FourOfAKind(_) => 7,
            Rank::StraightFlush(_) => 8,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keep only the `n` highest set bits.
fn keep_highest(mut value_set: u32, n: u32) -> u32 {
    while value_set.count_ones() > n {
        value_set &= value_set - 1;
    }
    value_set
}

/// Find the best straight contained in the value set.
fn rank_straight(value_set: u32) -> Option<u32> {
    STRAIGHTS
        .iter()
        .rposition(|s| value_set & s == *s)
        .map(|i| i as u32)
}

/// Can this turn into a hand rank?
///
/// Ranking picks the best five card hand out of however many
/// cards are given. It is total: any number of cards, including
/// fewer than five, produce a rank.
pub trait Rankable {
    fn cards(&self) -> &[Card];

    fn rank(&self) -> Rank {
        rank_cards(self.cards())
    }
}

impl Rankable for [Card] {
    fn cards(&self) -> &[Card] {
        self
    }
}

impl Rankable for Vec<Card> {
    fn cards(&self) -> &[Card] {
        self
    }
}

fn rank_cards(cards: &[Card]) -> Rank {
    // Use for bitset
    let mut value_set: u32 = 0;
    // Values seen in each suit
    let mut suit_value_sets = [0u32; 4];
    let mut value_to_count = [0u8; 13];

    for c in cards {
        let v = c.value as usize;
        value_set |= 1 << v;
        suit_value_sets[c.suit as usize] |= 1 << v;
        value_to_count[v] = value_to_count[v].saturating_add(1);
    }

    // Now rotate the value to count map.
    // Index is the number of copies, value is a bitset of card values.
    let mut count_to_value = [0u32; 5];
    for (v, count) in value_to_count.iter().enumerate() {
        count_to_value[usize::from((*count).min(4))] |= 1 << v;
    }

    let flush_set = suit_value_sets
        .iter()
        .copied()
        .find(|s| s.count_ones() >= 5);

    if let Some(straight) = flush_set.and_then(rank_straight) {
        return Rank::StraightFlush(straight);
    }

    if count_to_value[4] != 0 {
        let major_rank = keep_highest(count_to_value[4], 1);
        let minor_rank = keep_highest(value_set ^ major_rank, 1);
        return Rank::FourOfAKind(major_rank << 13 | minor_rank);
    }

    if count_to_value[3] != 0 {
        let three = keep_highest(count_to_value[3], 1);
        // A second set of trips plays as the pair.
        let pairs = (count_to_value[3] ^ three) | count_to_value[2];
        if pairs != 0 {
            return Rank::FullHouse(three << 13 | keep_highest(pairs, 1));
        }
    }

    if let Some(flush) = flush_set {
        return Rank::Flush(keep_highest(flush, 5));
    }

    if let Some(straight) = rank_straight(value_set) {
        return Rank::Straight(straight);
    }

    if count_to_value[3] != 0 {
        let major_rank = keep_highest(count_to_value[3], 1);
        let minor_rank = keep_highest(value_set ^ major_rank, 2);
        return Rank::ThreeOfAKind(major_rank << 13 | minor_rank);
    }

    if count_to_value[2].count_ones() >= 2 {
        let major_rank = keep_highest(count_to_value[2], 2);
        let minor_rank = keep_highest(value_set ^ major_rank, 1);
        return Rank::TwoPair(major_rank << 13 | minor_rank);
    }

    if count_to_value[2] != 0 {
        let major_rank = count_to_value[2];
        let minor_rank = keep_highest(value_set ^ major_rank, 3);
        return Rank::OnePair(major_rank << 13 | minor_rank);
    }

    Rank::HighCard(keep_highest(value_set, 5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::cards_from_str;

    fn rank_of(s: &str) -> Rank {
        cards_from_str(s).unwrap().rank()
    }

    #[test]
    fn test_cmp() {
        assert!(Rank::HighCard(0) < Rank::StraightFlush(0));
        assert!(Rank::HighCard(0) < Rank::FourOfAKind(0));
        assert!(Rank::HighCard(0) < Rank::ThreeOfAKind(0));
        assert!(Rank::HighCard(0) < Rank::HighCard(100));
    }

    #[test]
    fn test_high_card_hand() {
        let rank = bit(Value::Ace)
            | bit(Value::Eight)
            | bit(Value::Nine)
            | bit(Value::Ten)
            | bit(Value::Five);
        assert_eq!(Rank::HighCard(rank), rank_of("Ad8h9cTc5c"));
    }

    #[test]
    fn test_high_card_keeps_five_best() {
        // The deuce and trey never play.
        assert_eq!(rank_of("Ad8h9cTc5c"), rank_of("Ad8h9cTc5c2s3h"));
    }

    #[test]
    fn test_flush() {
        let rank = bit(Value::Ace)
            | bit(Value::Eight)
            | bit(Value::Nine)
            | bit(Value::Ten)
            | bit(Value::Five);
        assert_eq!(Rank::Flush(rank), rank_of("Ad8d9dTd5d"));
        // Six flush cards only use the top five
        assert_eq!(Rank::Flush(rank), rank_of("Ad8d9dTd5d2dKs"));
    }

    #[test]
    fn test_full_house() {
        let rank = bit(Value::Nine) << 13 | bit(Value::Ace);
        assert_eq!(Rank::FullHouse(rank), rank_of("AdAc9d9c9s"));
    }

    #[test]
    fn test_two_trips_is_full_house() {
        let rank = bit(Value::King) << 13 | bit(Value::Four);
        assert_eq!(Rank::FullHouse(rank), rank_of("KdKcKs4d4c4s2h"));
    }

    #[test]
    fn test_two_pair() {
        let rank = (bit(Value::Ace) | bit(Value::Nine)) << 13 | bit(Value::Ten);
        assert_eq!(Rank::TwoPair(rank), rank_of("AdAc9d9cTs"));
    }

    #[test]
    fn test_three_pair_uses_best_two() {
        // Three pairs on seven cards: the lowest pair can still kick.
        let rank = (bit(Value::Ace) | bit(Value::Nine)) << 13 | bit(Value::Four);
        assert_eq!(Rank::TwoPair(rank), rank_of("AdAc9d9c4s4h2c"));
    }

    #[test]
    fn test_one_pair() {
        let rank =
            bit(Value::Ace) << 13 | bit(Value::Nine) | bit(Value::Eight) | bit(Value::Ten);
        assert_eq!(Rank::OnePair(rank), rank_of("AdAc9d8cTs"));
    }

    #[test]
    fn test_four_of_a_kind() {
        assert_eq!(
            Rank::FourOfAKind(bit(Value::Ace) << 13 | bit(Value::Ten)),
            rank_of("AdAcAsAhTs")
        );
    }

    #[test]
    fn test_wheel() {
        assert_eq!(Rank::Straight(0), rank_of("Ad2c3s4h5s"));
    }

    #[test]
    fn test_wheel_ordering() {
        let wheel = rank_of("Ad2c3s4h5s");
        let six_high = rank_of("2c3s4h5s6d");
        let ace_high = rank_of("AdKc3s4h5s");
        assert!(wheel > ace_high);
        assert!(wheel < six_high);
    }

    #[test]
    fn test_straight() {
        assert_eq!(Rank::Straight(1), rank_of("2c3s4h5s6d"));
        // Picks the higher of the overlapping straights.
        assert_eq!(Rank::Straight(3), rank_of("2c3s4h5s6d7c8h"));
    }

    #[test]
    fn test_straight_flush_over_flush() {
        assert_eq!(Rank::StraightFlush(5), rank_of("6h7h8h9hThAhKs"));
        assert_eq!("Royal Flush", rank_of("ThJhQhKhAh").name());
    }

    #[test]
    fn test_three_of_a_kind() {
        let rank = bit(Value::Two) << 13 | bit(Value::Five) | bit(Value::Six);
        assert_eq!(Rank::ThreeOfAKind(rank), rank_of("2c2s2h5s6d"));
    }

    #[test]
    fn test_fewer_than_five_cards() {
        assert_eq!(Rank::OnePair(bit(Value::Ace) << 13), rank_of("AsAd"));
        assert_eq!(Rank::HighCard(0), rank_of(""));
    }

    #[test]
    fn test_known_hand_table_order() {
        let table = [
            "2c4d6h8sTc",
            "2c2d6h8sTc",
            "2c2d6h6sTc",
            "2c2d2h8sTc",
            "Ad2c3s4h5s",
            "2c4c6c8cTc",
            "2c2d2h8s8c",
            "2c2d2h2s8c",
            "Ad2d3d4d5d",
            "ThJhQhKhAh",
        ];
        let ranks: Vec<Rank> = table.iter().map(|h| rank_of(h)).collect();
        for pair in ranks.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should be below {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_kicker_tie_break_and_split() {
        // Same board plays for both: exact tie
        assert_eq!(rank_of("2c3dAsKsQsJs9h"), rank_of("2h3hAsKsQsJs9h"));
        // Kicker decides
        assert!(rank_of("AcKdAsQs7h3d2c") > rank_of("AcJdAsQs7h3d2c"));
    }

    #[test]
    fn test_straight_constants() {
        for c in STRAIGHTS.iter() {
            // Make sure that all of the constant hands have exactly 5 ones.
            assert_eq!(5, c.count_ones());
        }
    }
}
