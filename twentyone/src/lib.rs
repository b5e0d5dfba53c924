pub mod game;
pub mod simulation;

use thiserror::Error;

pub use game::{Card, DealerHand, Deck, GameState, Hand, Player, RoundOutcome, RoundPhase, Suit};
pub use simulation::{DealerOutcome, DealerOutcomes, MonteCarlo};

/// Errors reported by the deck and the round state machine. None of these is
/// fatal: a round can always be abandoned and a fresh one started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A draw was attempted on an exhausted deck. With one 52-card deck per
    /// round and bounded hand sizes this should be unreachable.
    #[error("cannot draw from an empty deck")]
    EmptyDeck,

    /// An action was attempted in the wrong phase, or its structural
    /// preconditions do not hold (e.g. doubling with more than two cards).
    #[error("{0}")]
    InvalidAction(String),

    /// The bet is non-positive, exceeds the cash balance, or doubling cannot
    /// be covered.
    #[error("{0}")]
    InvalidBet(String),
}
