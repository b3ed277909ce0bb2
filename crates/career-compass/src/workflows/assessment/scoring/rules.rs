use serde::{Deserialize, Serialize};

use super::super::domain::{Answer, CandidateId};

/// Which answers a rule reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "keys", rename_all = "snake_case")]
pub enum AnswerPattern {
    /// Any of the listed option keys (exact match).
    AnyOf(Vec<String>),
    /// Any rating on a scale question.
    Scale,
}

impl AnswerPattern {
    pub(crate) fn matches(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (AnswerPattern::AnyOf(keys), Answer::Choice(key)) => keys.iter().any(|k| k == key),
            (AnswerPattern::Scale, Answer::Scale(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weight {
    Fixed(f64),
    /// Multiplied by the scale rating.
    PerPoint(f64),
}

impl Weight {
    pub(crate) fn resolve(&self, answer: &Answer) -> Option<f64> {
        match (self, answer) {
            (Weight::Fixed(points), _) => Some(*points),
            (Weight::PerPoint(coefficient), Answer::Scale(value)) => {
                Some(f64::from(*value) * coefficient)
            }
            (Weight::PerPoint(_), Answer::Choice(_)) => None,
        }
    }

    pub(crate) fn magnitude(&self) -> f64 {
        match self {
            Weight::Fixed(value) | Weight::PerPoint(value) => *value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub candidate: CandidateId,
    pub weight: Weight,
    /// `{answer}` is replaced with the recorded answer value.
    pub reason: String,
}

impl Contribution {
    pub(crate) fn render_reason(&self, answer: &Answer) -> String {
        self.reason.replace("{answer}", &answer.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRule {
    pub question: String,
    pub pattern: AnswerPattern,
    pub contributions: Vec<Contribution>,
}

fn fixed(candidate: &str, points: f64, reason: &str) -> Contribution {
    Contribution {
        candidate: CandidateId::new(candidate),
        weight: Weight::Fixed(points),
        reason: reason.to_string(),
    }
}

fn per_point(candidate: &str, coefficient: f64, reason: &str) -> Contribution {
    Contribution {
        candidate: CandidateId::new(candidate),
        weight: Weight::PerPoint(coefficient),
        reason: reason.to_string(),
    }
}

fn on_choice(question: &str, key: &str, contributions: Vec<Contribution>) -> ResponseRule {
    ResponseRule {
        question: question.to_string(),
        pattern: AnswerPattern::AnyOf(vec![key.to_string()]),
        contributions,
    }
}

fn on_scale(question: &str, contributions: Vec<Contribution>) -> ResponseRule {
    ResponseRule {
        question: question.to_string(),
        pattern: AnswerPattern::Scale,
        contributions,
    }
}

/// Primary per-point coefficient for interest scales.
const PRIMARY: f64 = 4.0;

pub(crate) fn standard_response_rules() -> Vec<ResponseRule> {
    vec![
        on_choice(
            "work_environment",
            "people_teams",
            vec![
                fixed("teacher", 15.0, "You enjoy working with people"),
                fixed("doctor", 12.0, "Healthcare involves patient interaction"),
                fixed("digital-marketer", 8.0, "Marketing often involves team collaboration"),
            ],
        ),
        on_choice(
            "work_environment",
            "data_analysis",
            vec![
                fixed("data-analyst", 20.0, "Perfect match for data-focused work"),
                fixed("software-developer", 10.0, "Programming involves logical analysis"),
            ],
        ),
        on_choice(
            "work_environment",
            "hands_on",
            vec![
                fixed("graphic-designer", 12.0, "Design involves hands-on creative work"),
                fixed("software-developer", 8.0, "Coding is hands-on problem solving"),
            ],
        ),
        on_choice(
            "work_environment",
            "independent_creative",
            vec![
                fixed(
                    "graphic-designer",
                    18.0,
                    "Design work often involves independent creativity",
                ),
                fixed(
                    "software-developer",
                    10.0,
                    "Programming can be independent and creative",
                ),
                fixed("content-creator", 10.0, "Content creators set their own creative direction"),
            ],
        ),
        on_choice(
            "work_style",
            "creative_artistic",
            vec![
                fixed("graphic-designer", 20.0, "Design is inherently creative and artistic"),
                fixed("digital-marketer", 12.0, "Marketing requires creative thinking"),
            ],
        ),
        on_choice(
            "work_style",
            "analytical_problem_solving",
            vec![
                fixed("software-developer", 18.0, "Programming is pure problem-solving"),
                fixed("data-analyst", 20.0, "Data analysis is analytical work"),
                fixed("doctor", 10.0, "Medical diagnosis requires analytical thinking"),
            ],
        ),
        on_choice(
            "work_style",
            "structured_organized",
            vec![
                fixed("teacher", 15.0, "Teaching requires structured curriculum"),
                fixed("doctor", 12.0, "Medical practice follows structured protocols"),
                fixed("chartered-accountant", 12.0, "Audits and filings follow strict structure"),
            ],
        ),
        on_choice(
            "work_style",
            "flexible_varied",
            vec![
                fixed(
                    "digital-marketer",
                    15.0,
                    "Marketing involves varied campaigns and strategies",
                ),
                fixed("graphic-designer", 12.0, "Design projects are varied and flexible"),
            ],
        ),
        on_choice(
            "tech_focus",
            "build_software",
            vec![fixed("software-developer", 12.0, "You want to build software products")],
        ),
        on_choice(
            "tech_focus",
            "find_insights",
            vec![fixed("data-analyst", 12.0, "You enjoy turning data into insights")],
        ),
        on_choice(
            "tech_focus",
            "diagnose_problems",
            vec![
                fixed("doctor", 10.0, "Diagnosis is real-world problem solving"),
                fixed("data-analyst", 4.0, "Root-cause analysis is core to analytics"),
            ],
        ),
        on_choice(
            "creative_medium",
            "visual_design",
            vec![fixed("graphic-designer", 12.0, "You are drawn to visual design")],
        ),
        on_choice(
            "creative_medium",
            "video_storytelling",
            vec![
                fixed("content-creator", 15.0, "Video storytelling is the creator's craft"),
                fixed("digital-marketer", 5.0, "Video drives most digital campaigns"),
            ],
        ),
        on_choice(
            "creative_medium",
            "campaigns_copy",
            vec![
                fixed("digital-marketer", 12.0, "Campaigns and copy are marketing fundamentals"),
                fixed("content-creator", 6.0, "Strong copy helps creators grow an audience"),
            ],
        ),
        on_scale(
            "technology_interest",
            vec![
                per_point(
                    "software-developer",
                    PRIMARY,
                    "Strong interest in technology ({answer}/5)",
                ),
                per_point(
                    "data-analyst",
                    PRIMARY * 0.8,
                    "Technology skills valuable for data work",
                ),
                per_point(
                    "digital-marketer",
                    PRIMARY * 0.6,
                    "Digital marketing uses technology tools",
                ),
            ],
        ),
        on_scale(
            "arts_interest",
            vec![
                per_point(
                    "graphic-designer",
                    PRIMARY,
                    "Strong interest in arts ({answer}/5)",
                ),
                per_point(
                    "digital-marketer",
                    PRIMARY * 0.5,
                    "Marketing benefits from creative skills",
                ),
                per_point(
                    "content-creator",
                    PRIMARY * 0.75,
                    "Creative flair keeps content engaging",
                ),
            ],
        ),
        on_scale(
            "business_interest",
            vec![
                per_point(
                    "digital-marketer",
                    PRIMARY,
                    "Strong business interest ({answer}/5)",
                ),
                per_point(
                    "data-analyst",
                    PRIMARY * 0.7,
                    "Data analysis supports business decisions",
                ),
                per_point(
                    "chartered-accountant",
                    PRIMARY * 0.75,
                    "Accountants advise businesses on finance",
                ),
            ],
        ),
        on_scale(
            "numbers_comfort",
            vec![
                per_point(
                    "chartered-accountant",
                    PRIMARY,
                    "Comfortable with accounts and numbers ({answer}/5)",
                ),
                per_point(
                    "data-analyst",
                    PRIMARY * 0.5,
                    "Numerical comfort helps with analysis",
                ),
            ],
        ),
        on_scale(
            "healthcare_interest",
            vec![per_point(
                "doctor",
                PRIMARY,
                "Strong healthcare interest ({answer}/5)",
            )],
        ),
        on_scale(
            "education_interest",
            vec![per_point(
                "teacher",
                PRIMARY,
                "Strong education interest ({answer}/5)",
            )],
        ),
        on_scale(
            "public_service_interest",
            vec![
                per_point(
                    "civil-services",
                    PRIMARY,
                    "Strong public service interest ({answer}/5)",
                ),
                per_point(
                    "teacher",
                    PRIMARY * 0.5,
                    "Teaching is a form of public service",
                ),
            ],
        ),
    ]
}
