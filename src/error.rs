use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Role outside student / working_women / housewife
    #[error("Invalid role: {0:?}")]
    UnknownRole(String),
    /// Answers that do not fit the role's questions
    #[error("Invalid answers: {0}")]
    InvalidAnswerShape(#[from] ShapeError),
    /// The question master failed validation
    #[error("invalid question bank: {0}")]
    InvalidBank(String),
    #[error("malformed bulk row: {0}")]
    MalformedRow(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Errors caused by the caller's input rather than by the process.
    pub fn is_user_input(&self) -> bool {
        matches!(self, Error::UnknownRole(_) | Error::InvalidAnswerShape(_))
    }
}

/// Ways an answer set can fail to line up with a role's questions.
///
/// Positions are zero-based, matching the question order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("answers must be a list of {expected} integers")]
    NotAList { expected: usize },
    #[error("expected {expected} answers, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("answer at position {position} is not an integer")]
    NotInteger { position: usize },
    #[error("answer at position {position} selects choice {index}, but the question has {choices} choices")]
    OutOfRange {
        position: usize,
        index: i128,
        choices: usize,
    },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::UnknownRole("manager".into());
        assert_eq!(err.to_string(), "Invalid role: \"manager\"");

        let err: Error = ShapeError::WrongLength {
            expected: 8,
            actual: 3,
        }
        .into();
        assert_eq!(err.to_string(), "Invalid answers: expected 8 answers, got 3");
    }

    #[test]
    fn test_is_user_input() {
        assert!(Error::UnknownRole(String::new()).is_user_input());
        assert!(Error::from(ShapeError::NotInteger { position: 2 }).is_user_input());
        assert!(!Error::InvalidBank("empty".into()).is_user_input());
        assert!(!Error::MalformedRow("line 2".into()).is_user_input());
    }
}
