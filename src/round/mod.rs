//! Round building and play

pub mod builder;
pub mod choices;
pub mod play;
pub mod timer;

pub use builder::{EmptyRoundReason, Round, RoundBuilder, RoundPlan, RoundQuestion};
pub use choices::ChoiceOrder;
pub use play::{AnswerResult, RoundPhase, RoundSession, RoundTick};
pub use timer::{QuestionTimer, TimerTick};
