use super::{Card, BLACKJACK_SCORE};

/// An ordered sequence of cards. Order matters for display only; the score
/// is a function of the card multiset.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(3),
        }
    }

    /// Appends a card. Duplicate prevention is the deck's responsibility,
    /// not the hand's.
    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Scores the hand with the soft-ace rule: non-ace cards count their
    /// blackjack value, then each ace counts 11 unless that would push the
    /// running total past 21. At most one ace can ever count 11 without
    /// busting, so the order aces are resolved in cannot change the result.
    pub fn score(&self) -> u16 {
        let mut score = 0;
        let mut aces = 0;
        for card in &self.cards {
            if card.is_ace() {
                aces += 1;
            } else {
                score += card.blackjack_value();
            }
        }
        for _ in 0..aces {
            if score + 11 > BLACKJACK_SCORE {
                score += 1;
            } else {
                score += 11;
            }
        }
        score
    }

    /// A two-card 21, only possible on the initial deal.
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.score() == BLACKJACK_SCORE
    }

    /// Removes all cards. Note that this does not return them to any deck.
    pub fn reset(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
