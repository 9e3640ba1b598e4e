mod player_bit_set;

pub use player_bit_set::{ActivePlayerBitSetIter, PlayerBitSet};
