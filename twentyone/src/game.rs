pub mod deck;
pub mod hand;

use crate::simulation::{DealerOutcomes, MonteCarlo};
use crate::GameError;
use twentyone_macros::allowed_phase;

use strum_macros::EnumIter;

pub use self::deck::Deck;
pub use self::hand::Hand;

static FACE_VALUE_TO_BLACKJACK_VALUE: [u16; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];

/// The dealer stands as soon as her score reaches this value.
pub const DEALER_STAND_SCORE: u16 = 17;
/// The highest score a hand can reach without busting.
pub const BLACKJACK_SCORE: u16 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Suit {
    Diamond = 0,
    Club,
    Heart,
    Spade,
}

/// Represents a card in the real world with a suit and a face value.
/// Immutable once created; the ace's 1-or-11 choice is resolved at hand
/// scoring time, not at card level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub face_value: u8,
    pub suit: Suit,
}

impl Card {
    /// The card's scoring contribution ignoring the soft-ace rule: face
    /// value for 2-10, 10 for J/Q/K, 1 for the ace.
    pub fn blackjack_value(&self) -> u16 {
        FACE_VALUE_TO_BLACKJACK_VALUE[(self.face_value - 1) as usize]
    }

    pub fn is_ace(&self) -> bool {
        self.face_value == 1
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self.face_value {
            1 => 'A',
            2 => '2',
            3 => '3',
            4 => '4',
            5 => '5',
            6 => '6',
            7 => '7',
            8 => '8',
            9 => '9',
            10 => 'T',
            11 => 'J',
            12 => 'Q',
            13 => 'K',
            _ => panic!("Invalid card face value!"),
        };
        let suit = match self.suit {
            Suit::Diamond => 'D',
            Suit::Club => 'C',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        };
        write!(f, "{}{}", value, suit)
    }
}

/// Lifecycle of a single round. Methods carrying an `allowed_phase`
/// attribute may only run in the phase the attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Dealing,
    PlayerTurn,
    DealerTurn,
    Settled,
}

/// How a settled round ended. Payouts are applied when the outcome is
/// recorded; the bet itself was already deducted at placement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Natural two-card 21 for the player only. Pays 1.5x the bet on top of
    /// the returned stake.
    PlayerBlackjack,
    /// Natural two-card 21 for the dealer only. The bet is lost outright.
    DealerBlackjack,
    PlayerBust,
    DealerBust,
    PlayerWin,
    DealerWin,
    /// Equal scores, or both sides dealt a natural. The stake is returned.
    Push,
}

/// The dealer's hand plus the reveal flag. While unrevealed, the first card
/// dealt to the dealer is hidden from the player even though it has already
/// left the deck.
#[derive(Debug, Clone, Default)]
pub struct DealerHand {
    hand: Hand,
    revealed: bool,
}

impl DealerHand {
    pub fn new() -> DealerHand {
        DealerHand {
            hand: Hand::new(),
            revealed: false,
        }
    }

    pub fn add(&mut self, card: Card) {
        self.hand.add(card);
    }

    pub fn score(&self) -> u16 {
        self.hand.score()
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// The card every player can see: the last one dealt.
    pub fn up_card(&self) -> Option<Card> {
        self.hand.cards().last().copied()
    }

    /// The face-down card (the first one dealt), as long as it is still
    /// hidden. Once revealed there is no hole card any more.
    pub fn hole_card(&self) -> Option<Card> {
        if self.revealed {
            None
        } else {
            self.hand.cards().first().copied()
        }
    }

    pub fn reset(&mut self) {
        self.hand.reset();
        self.revealed = false;
    }
}

/// The player's hand and cash balance.
#[derive(Debug, Clone)]
pub struct Player {
    hand: Hand,
    cash: u32,
}

impl Player {
    pub fn new(cash: u32) -> Player {
        Player {
            hand: Hand::new(),
            cash,
        }
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn cash(&self) -> u32 {
        self.cash
    }
}

/// Orchestrates one round of the game: owns the live deck and both hands,
/// applies player actions, plays out the dealer's fixed stand-on-17 policy
/// and keeps the Monte Carlo probability estimates current.
///
/// The simulator only ever receives clones of the live state; nothing here
/// is mutated by a simulation.
pub struct GameState {
    deck: Deck,
    player: Player,
    dealer: DealerHand,
    bet: u32,
    phase: RoundPhase,
    outcome: Option<RoundOutcome>,
    simulator: MonteCarlo,
    dealer_outcomes: DealerOutcomes,
    next_hit_prob: f64,
}

impl GameState {
    pub fn new(starting_cash: u32) -> GameState {
        GameState::with_simulator(starting_cash, MonteCarlo::default())
    }

    pub fn with_simulator(starting_cash: u32, simulator: MonteCarlo) -> GameState {
        GameState {
            deck: Deck::new(),
            player: Player::new(starting_cash),
            dealer: DealerHand::new(),
            bet: 0,
            phase: RoundPhase::Dealing,
            outcome: None,
            simulator,
            dealer_outcomes: DealerOutcomes::default(),
            next_hit_prob: 0.0,
        }
    }

    /// Deducts the bet from the cash balance up front. Losing a round needs
    /// no further deduction; winning credits the payout on settlement.
    #[allowed_phase(Dealing)]
    pub fn place_bet(&mut self, amount: u32) -> Result<(), GameError> {
        if self.bet != 0 {
            return Err(GameError::InvalidAction(String::from(
                "a bet has already been placed this round",
            )));
        }
        if amount == 0 {
            return Err(GameError::InvalidBet(String::from(
                "bet must be greater than zero",
            )));
        }
        if amount > self.player.cash {
            return Err(GameError::InvalidBet(format!(
                "bet of {} exceeds cash balance of {}",
                amount, self.player.cash
            )));
        }
        self.player.cash -= amount;
        self.bet = amount;
        Ok(())
    }

    /// Deals two cards each, alternating player and dealer. The first card
    /// dealt to the dealer stays hidden until she reveals her hand. Naturals
    /// settle the round immediately, before any player action is offered.
    #[allowed_phase(Dealing)]
    pub fn deal_initial_hands(&mut self) -> Result<(), GameError> {
        self.player.hand.add(self.deck.draw()?);
        self.dealer.add(self.deck.draw()?);
        self.player.hand.add(self.deck.draw()?);
        self.dealer.add(self.deck.draw()?);

        if self.resolve_initial_naturals() {
            return Ok(());
        }
        self.phase = RoundPhase::PlayerTurn;
        self.refresh_estimates()
    }

    /// Draws one card into the player's hand. A score above 21 loses the
    /// round on the spot; otherwise the probability estimates are brought up
    /// to date for the new hand.
    #[allowed_phase(PlayerTurn)]
    pub fn player_hit(&mut self) -> Result<(), GameError> {
        self.player.hand.add(self.deck.draw()?);
        if self.player.hand.score() > BLACKJACK_SCORE {
            self.settle(RoundOutcome::PlayerBust);
            return Ok(());
        }
        self.refresh_estimates()
    }

    /// Doubles the bet, draws exactly one card and, unless that card busts
    /// the hand, stands. Only valid as the very first action.
    #[allowed_phase(PlayerTurn)]
    pub fn player_double(&mut self) -> Result<(), GameError> {
        if self.player.hand.len() != 2 {
            return Err(GameError::InvalidAction(String::from(
                "double is only allowed on the initial two cards",
            )));
        }
        if self.bet > self.player.cash {
            return Err(GameError::InvalidBet(format!(
                "doubling requires another {} in cash, only {} available",
                self.bet, self.player.cash
            )));
        }
        self.player.cash -= self.bet;
        self.bet *= 2;

        self.player.hand.add(self.deck.draw()?);
        if self.player.hand.score() > BLACKJACK_SCORE {
            self.settle(RoundOutcome::PlayerBust);
            return Ok(());
        }
        self.finish_dealer_turn()
    }

    #[allowed_phase(PlayerTurn)]
    pub fn player_stand(&mut self) -> Result<(), GameError> {
        self.finish_dealer_turn()
    }

    /// Discards both hands and replaces the whole deck. Cards dealt in the
    /// finished round are not returned anywhere; round isolation is
    /// intended.
    #[allowed_phase(Settled)]
    pub fn next_round(&mut self) -> Result<(), GameError> {
        self.deck = Deck::new();
        self.player.hand.reset();
        self.dealer.reset();
        self.bet = 0;
        self.outcome = None;
        self.dealer_outcomes = DealerOutcomes::default();
        self.next_hit_prob = 0.0;
        self.phase = RoundPhase::Dealing;
        Ok(())
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn player_score(&self) -> u16 {
        self.player.hand.score()
    }

    /// The dealer's score, masked while her hand is unrevealed.
    pub fn dealer_score(&self) -> Option<u16> {
        if self.dealer.is_revealed() {
            Some(self.dealer.score())
        } else {
            None
        }
    }

    pub fn player_hand(&self) -> &Hand {
        &self.player.hand
    }

    pub fn dealer_hand(&self) -> &DealerHand {
        &self.dealer
    }

    pub fn cash_balance(&self) -> u32 {
        self.player.cash
    }

    pub fn current_bet(&self) -> u32 {
        self.bet
    }

    /// The most recent dealer final-score histogram.
    pub fn dealer_outcomes(&self) -> &DealerOutcomes {
        &self.dealer_outcomes
    }

    /// Percentage chance that the dealer's final score exceeds 21.
    pub fn dealer_bust_probability(&self) -> f64 {
        self.dealer_outcomes.bust_probability()
    }

    /// Percentage chance that the dealer finishes at or above `threshold`
    /// without busting. Busting is not scoring, so the bust bucket is
    /// excluded here.
    pub fn dealer_score_at_least_probability(&self, threshold: u16) -> f64 {
        self.dealer_outcomes.probability_at_least(threshold)
            - self.dealer_outcomes.probability_at_least(BLACKJACK_SCORE + 1)
    }

    /// The most recent estimate of the chance that one more hit lands the
    /// player's score in [17, 21]. Only maintained while the player's score
    /// is below 17.
    pub fn next_hit_success_probability(&self) -> f64 {
        self.next_hit_prob
    }

    /// Settles naturals right after the initial deal. Returns true if the
    /// round ended here.
    fn resolve_initial_naturals(&mut self) -> bool {
        let player_natural = self.player.hand.is_natural();
        let dealer_natural = self.dealer.hand.is_natural();
        if !player_natural && !dealer_natural {
            return false;
        }
        self.dealer.reveal();
        let outcome = if player_natural && dealer_natural {
            RoundOutcome::Push
        } else if player_natural {
            RoundOutcome::PlayerBlackjack
        } else {
            RoundOutcome::DealerBlackjack
        };
        self.settle(outcome);
        true
    }

    /// Reveals the dealer's hand, plays out the stand-on-17 policy with real
    /// draws and settles the showdown.
    fn finish_dealer_turn(&mut self) -> Result<(), GameError> {
        self.phase = RoundPhase::DealerTurn;
        self.dealer.reveal();
        while self.dealer.score() < DEALER_STAND_SCORE {
            self.dealer.add(self.deck.draw()?);
        }

        let dealer_score = self.dealer.score();
        let player_score = self.player.hand.score();
        let outcome = if dealer_score > BLACKJACK_SCORE {
            RoundOutcome::DealerBust
        } else if dealer_score > player_score {
            RoundOutcome::DealerWin
        } else if dealer_score < player_score {
            RoundOutcome::PlayerWin
        } else {
            RoundOutcome::Push
        };
        self.settle(outcome);
        Ok(())
    }

    fn settle(&mut self, outcome: RoundOutcome) {
        match outcome {
            // Stake plus 1.5x winnings, floored for odd bets.
            RoundOutcome::PlayerBlackjack => self.player.cash += self.bet * 5 / 2,
            RoundOutcome::PlayerWin | RoundOutcome::DealerBust => {
                self.player.cash += self.bet * 2
            }
            RoundOutcome::Push => self.player.cash += self.bet,
            RoundOutcome::PlayerBust
            | RoundOutcome::DealerWin
            | RoundOutcome::DealerBlackjack => {}
        }
        self.outcome = Some(outcome);
        self.phase = RoundPhase::Settled;
    }

    /// Recomputes the cached estimates from clones of the live state. The
    /// next-hit figure is only meaningful (and only surfaced) for scores
    /// below 17, so it is skipped for stronger hands.
    fn refresh_estimates(&mut self) -> Result<(), GameError> {
        self.dealer_outcomes = self.simulator.dealer_outcomes(&self.deck, &self.dealer)?;
        if self.player.hand.score() < DEALER_STAND_SCORE {
            self.next_hit_prob = self.simulator.next_hit_success(
                &self.deck,
                &self.player.hand,
                self.dealer.hole_card(),
            )?;
        }
        Ok(())
    }
}
