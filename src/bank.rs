use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Number of questions every role answers.
pub const QUESTIONS_PER_ROLE: usize = 8;

const BANK_SOURCE: &str = include_str!("../resources/question_bank.json");

/// The bundled question master, parsed once and never mutated.
pub static QUESTION_BANK: Lazy<QuestionBank> = Lazy::new(|| {
    QuestionBank::from_json(BANK_SOURCE).expect("bundled resources/question_bank.json is invalid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    WorkingWomen,
    Housewife,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::WorkingWomen, Role::Housewife];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::WorkingWomen => "working_women",
            Role::Housewife => "housewife",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::UnknownRole(s.to_string()))
    }
}

/// Stress category, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StressLevel::Low => f.write_str("low"),
            StressLevel::Moderate => f.write_str("moderate"),
            StressLevel::High => f.write_str("high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerChoice {
    pub label: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    /// Ordered from lowest to highest severity; an answer is an index into this list.
    pub choices: Vec<AnswerChoice>,
}

impl Question {
    pub fn min_points(&self) -> u32 {
        self.choices.first().map_or(0, |choice| choice.points)
    }

    pub fn max_points(&self) -> u32 {
        self.choices.last().map_or(0, |choice| choice.points)
    }
}

/// One row of the threshold table. A band without `max` is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Band {
    pub level: StressLevel,
    #[serde(default)]
    pub max: Option<u32>,
}

/// Total score to stress level mapping.
///
/// Bands cover `0..=max` of the first band, then `(previous max, max]` for each
/// following one, and the final open band takes everything above. Every total
/// therefore lands in exactly one band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    bounded: Vec<(u32, StressLevel)>,
    top: StressLevel,
}

impl Thresholds {
    pub fn new(bands: Vec<Band>) -> Result<Self, Error> {
        let (last, rest) = bands
            .split_last()
            .ok_or_else(|| Error::InvalidBank("threshold table is empty".into()))?;
        if last.max.is_some() {
            return Err(Error::InvalidBank(
                "the last threshold band must be open-ended".into(),
            ));
        }

        let mut bounded = Vec::with_capacity(rest.len());
        for band in rest {
            let max = band.max.ok_or_else(|| {
                Error::InvalidBank(format!("band {} is open-ended but not last", band.level))
            })?;
            if let Some(&(previous_max, previous_level)) = bounded.last() {
                if max <= previous_max {
                    return Err(Error::InvalidBank(format!(
                        "band {} ends at {max}, not above {previous_max}",
                        band.level
                    )));
                }
                if band.level <= previous_level {
                    return Err(Error::InvalidBank(format!(
                        "band {} is not more severe than {previous_level}",
                        band.level
                    )));
                }
            }
            bounded.push((max, band.level));
        }
        if let Some(&(_, previous_level)) = bounded.last() {
            if last.level <= previous_level {
                return Err(Error::InvalidBank(format!(
                    "band {} is not more severe than {previous_level}",
                    last.level
                )));
            }
        }

        Ok(Self {
            bounded,
            top: last.level,
        })
    }

    pub fn classify(&self, total: u32) -> StressLevel {
        self.bounded
            .iter()
            .find(|(max, _)| total <= *max)
            .map_or(self.top, |&(_, level)| level)
    }

    /// Levels in ascending severity.
    pub fn levels(&self) -> impl Iterator<Item = StressLevel> + '_ {
        self.bounded
            .iter()
            .map(|&(_, level)| level)
            .chain(std::iter::once(self.top))
    }
}

#[derive(Debug, Deserialize)]
struct BankSource {
    scales: BTreeMap<String, Vec<AnswerChoice>>,
    roles: BTreeMap<Role, Vec<QuestionSource>>,
    thresholds: Vec<Band>,
    advisories: BTreeMap<StressLevel, String>,
}

#[derive(Debug, Deserialize)]
struct QuestionSource {
    id: u32,
    prompt: String,
    scale: String,
}

/// Questions per role plus the scoring table that goes with them.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: BTreeMap<Role, Vec<Question>>,
    thresholds: Thresholds,
    advisories: BTreeMap<StressLevel, String>,
}

impl QuestionBank {
    pub fn from_json(source: &str) -> Result<Self, Error> {
        let source: BankSource = serde_json::from_str(source)?;

        let mut questions = BTreeMap::new();
        for role in Role::ALL {
            let entries = source
                .roles
                .get(&role)
                .ok_or_else(|| Error::InvalidBank(format!("no questions for role {role}")))?;
            let resolved = entries
                .iter()
                .map(|entry| resolve_question(entry, &source.scales))
                .collect::<Result<Vec<_>, _>>()?;
            check_role(role, &resolved)?;
            questions.insert(role, resolved);
        }

        let thresholds = Thresholds::new(source.thresholds)?;
        if let Some(level) = thresholds
            .levels()
            .find(|level| !source.advisories.contains_key(level))
        {
            return Err(Error::InvalidBank(format!("no advisory for level {level}")));
        }

        Ok(Self {
            questions,
            thresholds,
            advisories: source.advisories,
        })
    }

    /// Full questions, point values included, for a role given by name.
    pub fn list_questions(&self, role: &str) -> Result<&[Question], Error> {
        Ok(self.questions(role.parse()?))
    }

    pub fn questions(&self, role: Role) -> &[Question] {
        self.questions
            .get(&role)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn advisory(&self, level: StressLevel) -> &str {
        self.advisories
            .get(&level)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

fn resolve_question(
    entry: &QuestionSource,
    scales: &BTreeMap<String, Vec<AnswerChoice>>,
) -> Result<Question, Error> {
    let choices = scales.get(&entry.scale).ok_or_else(|| {
        Error::InvalidBank(format!(
            "question {} uses unknown scale {:?}",
            entry.id, entry.scale
        ))
    })?;
    Ok(Question {
        id: entry.id,
        prompt: entry.prompt.clone(),
        choices: choices.clone(),
    })
}

fn check_role(role: Role, questions: &[Question]) -> Result<(), Error> {
    if questions.len() != QUESTIONS_PER_ROLE {
        return Err(Error::InvalidBank(format!(
            "role {role} has {} questions, expected {QUESTIONS_PER_ROLE}",
            questions.len()
        )));
    }
    let mut seen = BTreeSet::new();
    let mut max_total: u32 = 0;
    for question in questions {
        if !seen.insert(question.id) {
            return Err(Error::InvalidBank(format!(
                "role {role} repeats question id {}",
                question.id
            )));
        }
        if question.choices.len() < 2 {
            return Err(Error::InvalidBank(format!(
                "role {role} question {} has fewer than 2 choices",
                question.id
            )));
        }
        if question
            .choices
            .windows(2)
            .any(|pair| pair[0].points >= pair[1].points)
        {
            return Err(Error::InvalidBank(format!(
                "role {role} question {} has choices not in ascending point order",
                question.id
            )));
        }
        max_total = max_total.checked_add(question.max_points()).ok_or_else(|| {
            Error::InvalidBank(format!("role {role} maximum total score overflows"))
        })?;
    }
    Ok(())
}
