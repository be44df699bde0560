//! Round selection
//!
//! Picks `min(target, level size)` distinct questions, unlearned first, padded
//! with already-correct questions when there are too few, then shuffles the
//! round and each question's choices.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::choices::ChoiceOrder;
use crate::catalog::{ContentCatalog, Question};
use crate::persistence::CategoryProgress;

/// A question prepared for play
#[derive(Debug, Clone, PartialEq)]
pub struct RoundQuestion {
    pub question: Question,
    pub choices: ChoiceOrder,
}

impl RoundQuestion {
    pub fn id(&self) -> &str {
        &self.question.id
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    /// Choice texts in display order
    pub fn labels(&self) -> Vec<&str> {
        self.choices.labels(&self.question)
    }

    pub fn correct_slot(&self) -> Option<usize> {
        self.choices.correct_slot()
    }

    /// Validate a pressed slot against the shuffled order
    pub fn is_correct(&self, slot: usize) -> bool {
        self.choices.is_correct(slot)
    }
}

/// Questions selected for one play session
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub category_id: String,
    pub level_index: u32,
    pub questions: Vec<RoundQuestion>,
}

impl Round {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Why no round could be built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyRoundReason {
    UnknownCategory,
    UnknownLevel,
    NoQuestions,
}

/// Result of a build request
#[derive(Debug, Clone, PartialEq)]
pub enum RoundPlan {
    Ready(Round),
    Empty(EmptyRoundReason),
}

impl RoundPlan {
    pub fn is_empty(&self) -> bool {
        match self {
            RoundPlan::Ready(round) => round.is_empty(),
            RoundPlan::Empty(_) => true,
        }
    }

    pub fn into_round(self) -> Option<Round> {
        match self {
            RoundPlan::Ready(round) => Some(round),
            RoundPlan::Empty(_) => None,
        }
    }
}

/// Builds rounds from a seeded RNG
#[derive(Debug, Clone)]
pub struct RoundBuilder {
    rng: Pcg32,
}

impl RoundBuilder {
    /// Reproducible builder (tests, replays)
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Builder seeded from the thread RNG
    pub fn from_entropy() -> Self {
        Self {
            rng: Pcg32::from_rng(&mut rand::rng()),
        }
    }

    /// Select and shuffle a round. `progress` is the category's record, if any.
    pub fn build(
        &mut self,
        catalog: &ContentCatalog,
        progress: Option<&CategoryProgress>,
        category_id: &str,
        level_index: u32,
        target_count: usize,
    ) -> RoundPlan {
        let Some(category) = catalog.category(category_id) else {
            log::warn!("Round requested for unknown category '{}'", category_id);
            return RoundPlan::Empty(EmptyRoundReason::UnknownCategory);
        };
        let Some(level) = category.level(level_index) else {
            log::warn!("Level {} not found in '{}'", level_index, category_id);
            return RoundPlan::Empty(EmptyRoundReason::UnknownLevel);
        };
        if level.is_empty() {
            log::warn!("Level {} has no questions in '{}'", level_index, category_id);
            return RoundPlan::Empty(EmptyRoundReason::NoQuestions);
        }

        let is_correct = |q: &Question| progress.is_some_and(|p| p.is_correct(&q.id));
        let (mut pool, mut already_correct): (Vec<&Question>, Vec<&Question>) =
            level.questions.iter().partition(|q| !is_correct(*q));

        if pool.len() < target_count {
            already_correct.shuffle(&mut self.rng);
            let mut ids: HashSet<&str> = pool.iter().map(|q| q.id.as_str()).collect();
            for q in already_correct {
                if pool.len() >= target_count {
                    break;
                }
                if ids.insert(q.id.as_str()) {
                    pool.push(q);
                }
            }
        } else if pool.len() > target_count {
            pool.shuffle(&mut self.rng);
            pool.truncate(target_count);
        }

        pool.shuffle(&mut self.rng);

        let questions = pool
            .into_iter()
            .map(|q| RoundQuestion {
                choices: ChoiceOrder::shuffled(q, &mut self.rng),
                question: q.clone(),
            })
            .collect::<Vec<_>>();

        log::info!(
            "Built round for '{}' level {}: {} questions",
            category_id,
            level_index,
            questions.len()
        );
        RoundPlan::Ready(Round {
            category_id: category_id.to_string(),
            level_index,
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::{Category, Level, LevelSource};
    use crate::progress::fixtures::*;

    fn progress_with(category: &str, correct: &[String]) -> CategoryProgress {
        let mut p = CategoryProgress::new(category);
        for id in correct {
            p.insert_correct(id);
        }
        p
    }

    fn ids(round: &Round) -> Vec<String> {
        round.questions.iter().map(|q| q.id().to_string()).collect()
    }

    fn ready(plan: RoundPlan) -> Round {
        plan.into_round().expect("expected a ready round")
    }

    #[test]
    fn test_scenario_all_unlearned_no_padding() {
        let catalog = catalog();
        let mut builder = RoundBuilder::from_seed(1);
        let round = ready(builder.build(&catalog, None, "science", 1, 10));

        let mut got = ids(&round);
        got.sort();
        let mut want = level_ids(&catalog, "science", 1);
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn test_scenario_two_unlearned_padded_with_correct() {
        let catalog = catalog();
        let level = level_ids(&catalog, "science", 1);
        let progress = progress_with("science", &level[..8]);

        let mut builder = RoundBuilder::from_seed(2);
        let round = ready(builder.build(&catalog, Some(&progress), "science", 1, 10));

        assert_eq!(round.len(), 10);
        let got: HashSet<String> = ids(&round).into_iter().collect();
        assert_eq!(got.len(), 10);
        assert!(got.contains(&level[8]));
        assert!(got.contains(&level[9]));
    }

    #[test]
    fn test_unlearned_are_prioritized_over_padding() {
        let catalog = catalog();
        let level = level_ids(&catalog, "science", 1);
        let progress = progress_with("science", &level[..7]);

        let mut builder = RoundBuilder::from_seed(3);
        let round = ready(builder.build(&catalog, Some(&progress), "science", 1, 5));

        // 3 unlearned always make it in
        let got: HashSet<String> = ids(&round).into_iter().collect();
        assert_eq!(got.len(), 5);
        for id in &level[7..] {
            assert!(got.contains(id));
        }
    }

    #[test]
    fn test_too_many_unlearned_truncates() {
        let catalog = catalog();
        let mut builder = RoundBuilder::from_seed(4);
        let round = ready(builder.build(&catalog, None, "science", 2, 4));
        assert_eq!(round.len(), 4);
        assert_eq!(round.level_index, 2);
    }

    #[test]
    fn test_short_level_gives_short_round() {
        let catalog = catalog();
        let mut builder = RoundBuilder::from_seed(5);
        let round = ready(builder.build(&catalog, None, "legacy", 1, 10));
        assert_eq!(round.len(), 4);
    }

    #[test]
    fn test_empty_outcomes_are_signaled() {
        let catalog = catalog();
        let mut builder = RoundBuilder::from_seed(6);

        assert_eq!(
            builder.build(&catalog, None, "nope", 1, 10),
            RoundPlan::Empty(EmptyRoundReason::UnknownCategory)
        );
        assert_eq!(
            builder.build(&catalog, None, "science", 7, 10),
            RoundPlan::Empty(EmptyRoundReason::UnknownLevel)
        );
        assert_eq!(
            builder.build(&catalog, None, "hollow", 1, 10),
            RoundPlan::Empty(EmptyRoundReason::NoQuestions)
        );
        assert!(builder.build(&catalog, None, "science", 1, 0).is_empty());
    }

    #[test]
    fn test_same_seed_same_round() {
        let catalog = catalog();
        let a = RoundBuilder::from_seed(42).build(&catalog, None, "science", 1, 6);
        let b = RoundBuilder::from_seed(42).build(&catalog, None, "science", 1, 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_entropy_builder_works() {
        let catalog = catalog();
        let round = ready(RoundBuilder::from_entropy().build(&catalog, None, "science", 3, 10));
        assert_eq!(round.len(), 10);
    }

    proptest! {
        #[test]
        fn prop_round_invariants(
            k in 1usize..25,
            n in 0usize..30,
            learned in 0usize..25,
            seed in any::<u64>(),
        ) {
            let cat = category("p", 1, k);
            let catalog = ContentCatalog::new().with_category(cat);
            let level = level_ids(&catalog, "p", 1);
            let progress = progress_with("p", &level[..learned.min(k)]);

            let mut builder = RoundBuilder::from_seed(seed);
            let plan = builder.build(&catalog, Some(&progress), "p", 1, n);
            let RoundPlan::Ready(round) = plan else {
                return Err(TestCaseError::fail("level has questions"));
            };

            prop_assert_eq!(round.len(), n.min(k));
            let distinct: HashSet<&str> = round.questions.iter().map(|q| q.id()).collect();
            prop_assert_eq!(distinct.len(), round.len());

            for rq in &round.questions {
                let slot = rq.correct_slot().unwrap();
                prop_assert_eq!(rq.labels()[slot], rq.question.correct_choice().unwrap());
            }
        }

        #[test]
        fn prop_unlearned_included_when_they_fit(
            k in 1usize..20,
            learned in 0usize..20,
            seed in any::<u64>(),
        ) {
            let catalog = ContentCatalog::new().with_category(Category::new(
                "u",
                "U",
                LevelSource::Leveled(vec![Level {
                    index: 1,
                    questions: (0..k).map(|i| question(&format!("u{i}"))).collect(),
                }]),
            ));
            let level = level_ids(&catalog, "u", 1);
            let learned = learned.min(k);
            let progress = progress_with("u", &level[..learned]);

            let round = RoundBuilder::from_seed(seed)
                .build(&catalog, Some(&progress), "u", 1, k)
                .into_round()
                .unwrap();
            let got: HashSet<&str> = round.questions.iter().map(|q| q.id()).collect();
            for id in &level[learned..] {
                prop_assert!(got.contains(id.as_str()));
            }
        }
    }
}
