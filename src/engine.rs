use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::bank::{Question, QuestionBank, Role, StressLevel, QUESTIONS_PER_ROLE, QUESTION_BANK};
use crate::{Error, ShapeError};

/// A question as shown to the respondent: no point values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: u32,
    pub prompt: String,
    pub choices: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            prompt: question.prompt.clone(),
            choices: question
                .choices
                .iter()
                .map(|choice| choice.label.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredAnswer {
    pub question_id: u32,
    pub choice: usize,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StressResult {
    pub role: Role,
    pub total_score: u32,
    pub max_score: u32,
    pub category: StressLevel,
    pub advisory: String,
    pub answers: Vec<ScoredAnswer>,
}

/// Reads a loosely typed payload as a list of integers.
///
/// Length and range are checked later against the role's questions, so
/// integers beyond `i64` are kept and reported as out of range there.
pub fn parse_answers(value: &Value) -> Result<Vec<i128>, ShapeError> {
    let items = value.as_array().ok_or(ShapeError::NotAList {
        expected: QUESTIONS_PER_ROLE,
    })?;
    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            item.as_i64()
                .map(i128::from)
                .or_else(|| item.as_u64().map(i128::from))
                .ok_or(ShapeError::NotInteger { position })
        })
        .collect()
}

/// Checks answers against the questions and turns them into choice indices.
fn validate_answers<T>(questions: &[Question], answers: &[T]) -> Result<Vec<usize>, ShapeError>
where
    T: Copy + Into<i128>,
{
    if answers.len() != questions.len() {
        return Err(ShapeError::WrongLength {
            expected: questions.len(),
            actual: answers.len(),
        });
    }
    questions
        .iter()
        .zip(answers)
        .enumerate()
        .map(|(position, (question, &index))| {
            let index: i128 = index.into();
            usize::try_from(index)
                .ok()
                .filter(|&choice| choice < question.choices.len())
                .ok_or(ShapeError::OutOfRange {
                    position,
                    index,
                    choices: question.choices.len(),
                })
        })
        .collect()
}

impl QuestionBank {
    /// Questions for a role with the scoring weights stripped.
    pub fn get_questions(&self, role: &str) -> Result<Vec<QuestionView>, Error> {
        Ok(self
            .list_questions(role)?
            .iter()
            .map(QuestionView::from)
            .collect())
    }

    pub fn evaluate_stress(&self, role: &str, answers: &[i64]) -> Result<StressResult, Error> {
        let role: Role = role.parse()?;
        let choices = validate_answers(self.questions(role), answers)?;
        Ok(self.score(role, &choices))
    }

    /// Like [`QuestionBank::evaluate_stress`], for answers that have not been
    /// through a typed decoder yet. The role is checked before the answers.
    pub fn evaluate_stress_json(&self, role: &str, answers: &Value) -> Result<StressResult, Error> {
        let role: Role = role.parse()?;
        let answers = parse_answers(answers)?;
        let choices = validate_answers(self.questions(role), &answers)?;
        Ok(self.score(role, &choices))
    }

    fn score(&self, role: Role, choices: &[usize]) -> StressResult {
        let questions = self.questions(role);
        let answers = questions
            .iter()
            .zip(choices)
            .map(|(question, &choice)| ScoredAnswer {
                question_id: question.id,
                choice,
                points: question.choices[choice].points,
            })
            .collect::<Vec<_>>();
        let total_score = answers.iter().map(|answer| answer.points).sum();
        let max_score = questions.iter().map(Question::max_points).sum();
        let category = self.thresholds().classify(total_score);
        debug!(%role, total_score, %category, "evaluated stress");

        StressResult {
            role,
            total_score,
            max_score,
            category,
            advisory: self.advisory(category).to_string(),
            answers,
        }
    }
}

pub fn get_questions(role: &str) -> Result<Vec<QuestionView>, Error> {
    QUESTION_BANK.get_questions(role)
}

pub fn evaluate_stress(role: &str, answers: &[i64]) -> Result<StressResult, Error> {
    QUESTION_BANK.evaluate_stress(role, answers)
}

pub fn evaluate_stress_json(role: &str, answers: &Value) -> Result<StressResult, Error> {
    QUESTION_BANK.evaluate_stress_json(role, answers)
}
