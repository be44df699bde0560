//! Per-question answer shuffling
//!
//! `order[slot]` is the original choice index shown in `slot`. The correct
//! answer is tracked as the slot holding the original correct index, and
//! answers are validated against that slot only.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::Question;

/// A permutation of a question's choices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOrder {
    order: Vec<usize>,
    correct_slot: Option<usize>,
}

impl ChoiceOrder {
    /// Uniformly shuffled order
    pub fn shuffled<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..question.choices.len()).collect();
        order.shuffle(rng);
        Self::from_order(question, order)
    }

    fn from_order(question: &Question, order: Vec<usize>) -> Self {
        let correct_slot = order.iter().position(|&i| i == question.correct_index);
        Self {
            order,
            correct_slot,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Slot holding the correct answer (None only for malformed questions)
    pub fn correct_slot(&self) -> Option<usize> {
        self.correct_slot
    }

    /// Original choice index displayed in `slot`
    pub fn original_index(&self, slot: usize) -> Option<usize> {
        self.order.get(slot).copied()
    }

    pub fn is_correct(&self, slot: usize) -> bool {
        self.correct_slot == Some(slot)
    }

    /// Choice texts in display order
    pub fn labels<'q>(&self, question: &'q Question) -> Vec<&'q str> {
        self.order
            .iter()
            .map(|&i| question.choices.get(i).map_or("", String::as_str))
            .collect()
    }

    /// Text displayed in `slot` ("" when out of range)
    pub fn label<'q>(&self, question: &'q Question, slot: usize) -> &'q str {
        self.original_index(slot)
            .and_then(|i| question.choices.get(i))
            .map_or("", String::as_str)
    }
}
