mod messages;

pub use messages::{
    AnswerCheck, AnswerFeedback, DEFAULT_LIMIT, QuestionsQuery, RESET_SECRET_HEADER,
    ResetResponse, SubmitAnswer, parse_limit,
};
