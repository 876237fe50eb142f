use serde::{Deserialize, Serialize};

/// A single incremental command for the falling piece.
///
/// A full placement is reached one command per game tick: the caller applies
/// the command and asks again on the next tick.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::IsVariant,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    /// Advance to the next rotation state.
    #[display("rotate")]
    Rotate,
    /// Shift one column left.
    #[display("left")]
    Left,
    /// Shift one column right.
    #[display("right")]
    Right,
    /// Fall one row (soft drop).
    #[display("down")]
    Down,
    /// Fall straight to the resting row (hard drop).
    #[display("drop")]
    Drop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serialization() {
        for mv in [Move::Rotate, Move::Left, Move::Right, Move::Down, Move::Drop] {
            let serialized = serde_json::to_string(&mv).unwrap();
            assert_eq!(serialized, format!("\"{mv}\""));
            assert_eq!(serde_json::from_str::<Move>(&serialized).unwrap(), mv);
        }
    }
}
