use crate::game::{Card, DealerHand, Deck, Hand, BLACKJACK_SCORE, DEALER_STAND_SCORE};
use crate::GameError;

use strum_macros::EnumIter;

const DEFAULT_TRIALS: u32 = 5000;

/// The six mutually exclusive ways a dealer hand can end once the
/// stand-on-17 policy has run: a final score of exactly 17 through 21, or a
/// bust. The declaration order is load-bearing: `Bust` sits in the ordinal
/// slot right after 21 so that threshold queries can sum a suffix of the
/// histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum DealerOutcome {
    Seventeen = 0,
    Eighteen,
    Nineteen,
    Twenty,
    TwentyOne,
    Bust,
}

impl DealerOutcome {
    /// Classifies a finished dealer score. Scores below 17 cannot occur
    /// because the dealer only stops drawing at 17 or more.
    fn from_score(score: u16) -> DealerOutcome {
        debug_assert!(score >= DEALER_STAND_SCORE);
        match score {
            17 => DealerOutcome::Seventeen,
            18 => DealerOutcome::Eighteen,
            19 => DealerOutcome::Nineteen,
            20 => DealerOutcome::Twenty,
            21 => DealerOutcome::TwentyOne,
            _ => DealerOutcome::Bust,
        }
    }
}

/// Histogram of simulated dealer final scores, one fixed slot per
/// `DealerOutcome`. Counts sum to the number of trials that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealerOutcomes {
    counts: [u32; 6],
    trials: u32,
}

impl DealerOutcomes {
    fn new(trials: u32) -> DealerOutcomes {
        DealerOutcomes {
            counts: [0; 6],
            trials,
        }
    }

    fn record(&mut self, score: u16) {
        self.counts[DealerOutcome::from_score(score) as usize] += 1;
    }

    pub fn count(&self, outcome: DealerOutcome) -> u32 {
        self.counts[outcome as usize]
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Percentage of trials whose bucket sits at or above `threshold`, with
    /// bust treated as the slot right after 21. `probability_at_least(22)`
    /// is therefore the bust percentage, and
    /// `probability_at_least(s) - probability_at_least(22)` the chance of
    /// the dealer finishing at `s` or better without busting.
    pub fn probability_at_least(&self, threshold: u16) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        let start = (threshold.saturating_sub(DEALER_STAND_SCORE) as usize).min(self.counts.len());
        let matched: u32 = self.counts[start..].iter().sum();
        f64::from(matched) / f64::from(self.trials) * 100.0
    }

    /// Percentage chance that the dealer busts.
    pub fn bust_probability(&self) -> f64 {
        self.probability_at_least(BLACKJACK_SCORE + 1)
    }
}

/// Monte Carlo estimator for the two win-relevant probabilities of a round.
/// Both routines run `trials` independent randomized continuations over
/// clones of the live deck and hands; the live state is never touched.
#[derive(Debug, Clone, Copy)]
pub struct MonteCarlo {
    trials: u32,
}

impl Default for MonteCarlo {
    fn default() -> Self {
        MonteCarlo {
            trials: DEFAULT_TRIALS,
        }
    }
}

impl MonteCarlo {
    /// Trial counts below 1 are clamped to 1, so a misconfigured zero can
    /// never divide a success count by nothing.
    pub fn new(trials: u32) -> MonteCarlo {
        MonteCarlo {
            trials: trials.max(1),
        }
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    /// Estimates the distribution of the dealer's final score by playing out
    /// the stand-on-17 policy on a cloned deck per trial.
    ///
    /// Each simulated hand starts from what an observer can see: while the
    /// dealer's hand is unrevealed only her up card seeds the hand and the
    /// hole card is deliberately left out, even though it has already left
    /// the deck. Once revealed, the full hand is copied.
    pub fn dealer_outcomes(
        &self,
        deck: &Deck,
        dealer: &DealerHand,
    ) -> Result<DealerOutcomes, GameError> {
        let mut outcomes = DealerOutcomes::new(self.trials);
        for _ in 0..self.trials {
            let mut sim_deck = deck.clone();
            let mut sim_hand = if dealer.is_revealed() {
                dealer.hand().clone()
            } else {
                let mut hand = Hand::new();
                if let Some(card) = dealer.up_card() {
                    hand.add(card);
                }
                hand
            };
            while sim_hand.score() < DEALER_STAND_SCORE {
                sim_hand.add(sim_deck.draw()?);
            }
            outcomes.record(sim_hand.score());
        }
        Ok(outcomes)
    }

    /// Estimates the chance that drawing exactly one more card lands the
    /// player's score in [17, 21].
    ///
    /// When the dealer's hole card is still hidden it is reinserted into the
    /// cloned deck before sampling: the player cannot tell it apart from an
    /// undealt card, so it belongs to the population being drawn from.
    pub fn next_hit_success(
        &self,
        deck: &Deck,
        player: &Hand,
        hole_card: Option<Card>,
    ) -> Result<f64, GameError> {
        let mut successes = 0u32;
        for _ in 0..self.trials {
            let mut sim_deck = deck.clone();
            if let Some(card) = hole_card {
                sim_deck.reinsert(card);
            }
            let mut sim_hand = player.clone();
            sim_hand.add(sim_deck.draw()?);
            let score = sim_hand.score();
            if (DEALER_STAND_SCORE..=BLACKJACK_SCORE).contains(&score) {
                successes += 1;
            }
        }
        Ok(f64::from(successes) / f64::from(self.trials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Suit;
    use strum::IntoEnumIterator;

    fn card(face_value: u8, suit: Suit) -> Card {
        Card { face_value, suit }
    }

    fn fixed_histogram() -> DealerOutcomes {
        DealerOutcomes {
            counts: [1000, 1000, 500, 500, 500, 1500],
            trials: 5000,
        }
    }

    #[test]
    fn probability_at_least_sums_a_suffix() {
        let outcomes = fixed_histogram();
        assert_eq!(outcomes.probability_at_least(22), 30.0);
        assert_eq!(outcomes.probability_at_least(17), 100.0);
        assert_eq!(
            outcomes.probability_at_least(17) - outcomes.probability_at_least(22),
            70.0
        );
        assert_eq!(outcomes.probability_at_least(19), 60.0);
        assert_eq!(outcomes.bust_probability(), 30.0);
    }

    #[test]
    fn empty_histogram_reports_zero() {
        let outcomes = DealerOutcomes::default();
        assert_eq!(outcomes.probability_at_least(17), 0.0);
        assert_eq!(outcomes.bust_probability(), 0.0);
    }

    #[test]
    fn zero_trials_is_clamped_to_one() {
        let simulator = MonteCarlo::new(0);
        assert_eq!(simulator.trials(), 1);

        // One trial, one winning card in the deck: the estimate is a clean
        // 1.0 rather than 0/0.
        let deck = Deck::from_cards(vec![card(5, Suit::Heart)]);
        let mut player = Hand::new();
        player.add(card(10, Suit::Spade));
        player.add(card(6, Suit::Spade));
        let prob = simulator.next_hit_success(&deck, &player, None).unwrap();
        assert_eq!(prob, 1.0);
    }

    #[test]
    fn dealer_trial_counts_sum_to_trials() {
        let simulator = MonteCarlo::new(200);
        let deck = Deck::new();
        let mut dealer = DealerHand::new();
        dealer.add(card(10, Suit::Diamond));
        dealer.add(card(6, Suit::Diamond));
        dealer.reveal();

        let outcomes = simulator.dealer_outcomes(&deck, &dealer).unwrap();
        let total: u32 = DealerOutcome::iter().map(|o| outcomes.count(o)).sum();
        assert_eq!(total, 200);
        assert_eq!(outcomes.trials(), 200);
    }

    #[test]
    fn revealed_sixteen_completes_below_22_about_five_ranks_in_thirteen() {
        // From 16 the dealer draws exactly once: values 1-5 land on 17..21,
        // everything else busts. With a full deck that is 20/52.
        let simulator = MonteCarlo::default();
        let deck = Deck::new();
        let mut dealer = DealerHand::new();
        dealer.add(card(10, Suit::Diamond));
        dealer.add(card(6, Suit::Diamond));
        dealer.reveal();

        let outcomes = simulator.dealer_outcomes(&deck, &dealer).unwrap();
        let below_22 = outcomes.probability_at_least(17) - outcomes.probability_at_least(22);
        let analytic = 20.0 / 52.0 * 100.0;
        assert!(
            (below_22 - analytic).abs() < 5.0,
            "got {below_22}, expected about {analytic}"
        );
    }

    #[test]
    fn unrevealed_hand_is_seeded_with_the_up_card_only() {
        // Hidden 10, up card 6. The only deck cards are a ten and a five, so
        // a simulation seeded with the 6 alone always finishes on exactly 21
        // (6 + 10 + 5 or 6 + 5 + 10). Were the hole card wrongly included,
        // drawing the ten from 16 would bust some trials.
        let simulator = MonteCarlo::new(300);
        let deck = Deck::from_cards(vec![card(10, Suit::Heart), card(5, Suit::Heart)]);
        let mut dealer = DealerHand::new();
        dealer.add(card(10, Suit::Diamond));
        dealer.add(card(6, Suit::Diamond));

        let outcomes = simulator.dealer_outcomes(&deck, &dealer).unwrap();
        assert_eq!(outcomes.count(DealerOutcome::TwentyOne), 300);
    }

    #[test]
    fn next_hit_success_converges_to_the_draw_odds() {
        // 10 + 6 needs a value of 1 through 5: 20 of the 52 cards.
        let simulator = MonteCarlo::default();
        let deck = Deck::new();
        let mut player = Hand::new();
        player.add(card(10, Suit::Spade));
        player.add(card(6, Suit::Spade));

        let prob = simulator.next_hit_success(&deck, &player, None).unwrap();
        let analytic = 20.0 / 52.0;
        assert!(
            (prob - analytic).abs() < 0.05,
            "got {prob}, expected about {analytic}"
        );
    }

    #[test]
    fn next_hit_success_is_exact_on_a_forced_deck() {
        let simulator = MonteCarlo::new(100);
        let mut player = Hand::new();
        player.add(card(10, Suit::Spade));
        player.add(card(6, Suit::Spade));

        let winning_deck = Deck::from_cards(vec![card(5, Suit::Heart)]);
        let prob = simulator
            .next_hit_success(&winning_deck, &player, None)
            .unwrap();
        assert_eq!(prob, 1.0);

        let busting_deck = Deck::from_cards(vec![card(10, Suit::Heart)]);
        let prob = simulator
            .next_hit_success(&busting_deck, &player, None)
            .unwrap();
        assert_eq!(prob, 0.0);
    }

    #[test]
    fn hidden_hole_card_rejoins_the_sampled_population() {
        // One busting card in the deck, one winning hole card. Reinsertion
        // makes the pool {ten, five}, so success lands near one half.
        let simulator = MonteCarlo::default();
        let deck = Deck::from_cards(vec![card(10, Suit::Heart)]);
        let mut player = Hand::new();
        player.add(card(10, Suit::Spade));
        player.add(card(6, Suit::Spade));

        let prob = simulator
            .next_hit_success(&deck, &player, Some(card(5, Suit::Diamond)))
            .unwrap();
        assert!((prob - 0.5).abs() < 0.05, "got {prob}, expected about 0.5");
    }

    #[test]
    fn simulating_with_an_exhausted_deck_reports_empty_deck() {
        let simulator = MonteCarlo::new(10);
        let deck = Deck::from_cards(vec![]);
        let mut dealer = DealerHand::new();
        dealer.add(card(10, Suit::Diamond));
        dealer.add(card(6, Suit::Diamond));

        assert_eq!(
            simulator.dealer_outcomes(&deck, &dealer),
            Err(GameError::EmptyDeck)
        );
    }
}
