use thiserror::Error;

/// This is the core error type for the
/// card and deck code. It uses `thiserror` to provide
/// readable error messages
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CoreError {
    #[error("Unable to parse value")]
    UnexpectedValueChar,
    #[error("Unable to parse suit")]
    UnexpectedSuitChar,
    #[error("Error reading characters while parsing")]
    TooFewChars,
    #[error("Extra un-used characters found after parsing")]
    UnparsedCharsRemaining,
    #[error("Asked to deal {requested} cards but only {remaining} remain in the deck")]
    DeckExhausted { requested: usize, remaining: usize },
}
