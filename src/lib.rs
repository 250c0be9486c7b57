mod bank;
mod bulk;
mod engine;
mod error;
pub mod server;

pub use bank::{
    AnswerChoice, Band, Question, QuestionBank, Role, StressLevel, Thresholds, QUESTIONS_PER_ROLE,
    QUESTION_BANK,
};
pub use bulk::{read_bulk, BulkRow};
pub use engine::{
    evaluate_stress, evaluate_stress_json, get_questions, parse_answers, QuestionView,
    ScoredAnswer, StressResult,
};
pub use error::{Error, ShapeError};
