mod attempt;
mod question;

pub use attempt::AnswerAttempt;
pub use question::{
    Choice, NewChoice, NewQuestion, PublicChoice, PublicQuestion, Question, QuestionSummary,
};
