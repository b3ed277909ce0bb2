use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive bounds shared by every rated-scale question.
pub const SCALE_MIN: u8 = 1;
pub const SCALE_MAX: u8 = 5;

/// Identifier wrapper for scored candidates (careers).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    SingleChoice,
    RatedScale,
}

impl AnswerKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleChoice => "single choice",
            Self::RatedScale => "rated scale",
        }
    }
}

/// Selectable option. Scoring and branching only ever look at `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub key: String,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Visibility gate: the question is eligible only once `question` has been
/// answered with one of `any_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCondition {
    pub question: String,
    pub any_of: Vec<Answer>,
}

impl BranchCondition {
    pub fn is_met_by(&self, responses: &[Response]) -> bool {
        responses
            .iter()
            .find(|response| response.question_id == self.question)
            .map(|response| self.any_of.contains(&response.answer))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: AnswerKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchCondition>,
}

impl Question {
    pub fn option(&self, key: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|option| option.key == key)
    }

    /// Checks `answer` against the declared kind, choice set, and scale bounds.
    pub fn validate(&self, answer: &Answer) -> Result<(), AnswerRejection> {
        match (self.kind, answer) {
            (AnswerKind::SingleChoice, Answer::Choice(key)) => {
                if key.trim().is_empty() {
                    return Err(AnswerRejection::Blank);
                }
                if self.option(key).is_none() {
                    return Err(AnswerRejection::UnknownOption { key: key.clone() });
                }
                Ok(())
            }
            (AnswerKind::RatedScale, Answer::Scale(value)) => {
                if (SCALE_MIN..=SCALE_MAX).contains(value) {
                    Ok(())
                } else {
                    Err(AnswerRejection::ScaleOutOfBounds { value: *value })
                }
            }
            (AnswerKind::RatedScale, Answer::Choice(key)) if key.trim().is_empty() => {
                Err(AnswerRejection::Blank)
            }
            (expected, _) => Err(AnswerRejection::KindMismatch { expected }),
        }
    }

    /// Human-readable rendering of an answer, using the option label for choices.
    pub fn describe(&self, answer: &Answer) -> String {
        match answer {
            Answer::Choice(key) => self
                .option(key)
                .map(|option| option.label.clone())
                .unwrap_or_else(|| key.clone()),
            Answer::Scale(value) => format!("{value}/{SCALE_MAX}"),
        }
    }
}

/// Answer value. Serialized untagged: a JSON number is a scale rating, a string
/// is an option key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Scale(u8),
    Choice(String),
}

impl Answer {
    pub fn choice(key: &str) -> Self {
        Self::Choice(key.to_string())
    }

    pub fn scale_value(&self) -> Option<u8> {
        match self {
            Answer::Scale(value) => Some(*value),
            Answer::Choice(_) => None,
        }
    }

    pub fn choice_key(&self) -> Option<&str> {
        match self {
            Answer::Choice(key) => Some(key),
            Answer::Scale(_) => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Scale(value) => write!(f, "{value}"),
            Answer::Choice(key) => f.write_str(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub question_id: String,
    pub answer: Answer,
}

impl Response {
    pub fn new(question_id: &str, answer: Answer) -> Self {
        Self {
            question_id: question_id.to_string(),
            answer,
        }
    }
}

/// Why an answer was refused before being recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerRejection {
    #[error("answer is blank")]
    Blank,
    #[error("'{key}' is not one of the declared options")]
    UnknownOption { key: String },
    #[error("rating {value} is outside the 1-5 scale")]
    ScaleOutOfBounds { value: u8 },
    #[error("expected a {} answer", .expected.label())]
    KindMismatch { expected: AnswerKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationStage {
    #[serde(rename = "10th")]
    Class10,
    #[serde(rename = "11th")]
    Class11,
    #[serde(rename = "12th")]
    Class12,
    #[serde(rename = "college")]
    College,
    #[serde(rename = "graduate")]
    Graduate,
}

impl EducationStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Class10 => "Class 10th",
            Self::Class11 => "Class 11th",
            Self::Class12 => "Class 12th",
            Self::College => "College Student",
            Self::Graduate => "Graduate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Science,
    Commerce,
    Arts,
}

impl Stream {
    pub const fn ordered() -> [Self; 3] {
        [Self::Science, Self::Commerce, Self::Arts]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Science => "Science (PCM/PCB)",
            Self::Commerce => "Commerce",
            Self::Arts => "Arts/Humanities",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityTier {
    Tier1,
    Tier2,
    Tier3,
}

impl CityTier {
    pub const fn lowest() -> Self {
        Self::Tier3
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1 City",
            Self::Tier2 => "Tier 2 City",
            Self::Tier3 => "Tier 3 City/Town",
        }
    }
}

/// Optional scoring input collected during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub education_stage: EducationStage,
    #[serde(default)]
    pub stream: Option<Stream>,
    #[serde(default)]
    pub city_tier: Option<CityTier>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub exam_preparation: Vec<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl StudentProfile {
    pub fn new(education_stage: EducationStage) -> Self {
        Self {
            education_stage,
            stream: None,
            city_tier: None,
            languages: Vec::new(),
            exam_preparation: Vec::new(),
            state: None,
        }
    }
}
