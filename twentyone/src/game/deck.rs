use super::{Card, Suit};
use crate::GameError;

use strum::IntoEnumIterator;

use rand::{thread_rng, Rng};

/// Represents the shrinking population of undealt cards for one round.
///
/// Every draw removes a uniformly random card among the remaining ones, so
/// the internal order of `cards` carries no meaning. Dealt cards never return
/// to a live deck; each round starts from a fresh one.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Creates a deck holding exactly one card per (face value, suit)
    /// combination, 52 in total.
    pub fn new() -> Deck {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::iter() {
            for face_value in 1..=13 {
                cards.push(Card { face_value, suit });
            }
        }
        Deck { cards }
    }

    /// Removes and returns a uniformly random card among the remaining ones.
    /// The swap removal is O(1) and keeps every remaining card equally likely
    /// on the next draw.
    pub fn draw(&mut self) -> Result<Card, GameError> {
        if self.cards.is_empty() {
            return Err(GameError::EmptyDeck);
        }
        let index = thread_rng().gen_range(0..self.cards.len());
        Ok(self.cards.swap_remove(index))
    }

    /// Puts a card back into the pool. The simulator uses this on cloned
    /// decks to treat the dealer's hole card as undealt from the player's
    /// point of view.
    pub fn reinsert(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_cards(cards: Vec<Card>) -> Deck {
        Deck { cards }
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_deck_has_52_distinct_cards() {
        let deck = Deck::new();
        assert_eq!(deck.len(), 52);
        let distinct: HashSet<Card> = deck.cards.iter().copied().collect();
        assert_eq!(distinct.len(), 52);
    }

    #[test]
    fn draw_shrinks_the_deck_without_duplicates() {
        let mut deck = Deck::new();
        let mut drawn: HashSet<Card> = HashSet::new();
        for k in 1..=20 {
            let card = deck.draw().unwrap();
            assert!(drawn.insert(card), "{} was drawn twice", card);
            assert_eq!(deck.len(), 52 - k);
            assert!(!deck.cards.contains(&card));
        }
    }

    #[test]
    fn drawing_the_whole_deck_then_fails() {
        let mut deck = Deck::new();
        for _ in 0..52 {
            assert!(deck.draw().is_ok());
        }
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(GameError::EmptyDeck));
    }

    #[test]
    fn reinserted_card_can_be_drawn_again() {
        let mut deck = Deck::from_cards(vec![]);
        let card = Card {
            face_value: 5,
            suit: Suit::Heart,
        };
        deck.reinsert(card);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.draw(), Ok(card));
    }
}
