use std::fmt;

/// What an agent asks to do when it's their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentAction {
    /// Give up the hand.
    Fold,
    /// Match the current bet. With nothing to call this is a check.
    Call,
    /// Raise so that the total bet on this street becomes the given amount.
    Raise(u64),
}

/// What actually happened once an action was applied.
/// A call for more than the stack becomes `AllIn`, and so
/// does a raise that uses every chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "all-in",
        };
        f.write_str(s)
    }
}

/// The result of applying one action to a betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedAction {
    pub seat: usize,
    pub kind: ActionKind,
    /// Chips moved from the stack by this action.
    pub amount: u64,
    /// The player's total bet on this street afterwards.
    pub total_bet: u64,
    pub stack_after: u64,
    /// Did this action raise the bet by at least the minimum raise.
    pub reopened: bool,
}
