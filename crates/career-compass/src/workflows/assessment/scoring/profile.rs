use serde::{Deserialize, Serialize};

use super::super::domain::{CandidateId, CityTier, EducationStage, Stream, StudentProfile};

/// Profile field a rule keys on, with the values that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "any_of", rename_all = "snake_case")]
pub enum ProfileCondition {
    EducationStage(Vec<EducationStage>),
    Stream(Vec<Stream>),
    CityTier(Vec<CityTier>),
    Language(Vec<String>),
    ExamPreparation(Vec<String>),
    State(Vec<String>),
}

impl ProfileCondition {
    pub(crate) fn matches(&self, profile: &StudentProfile) -> bool {
        match self {
            ProfileCondition::EducationStage(stages) => stages.contains(&profile.education_stage),
            ProfileCondition::Stream(streams) => profile
                .stream
                .map(|stream| streams.contains(&stream))
                .unwrap_or(false),
            ProfileCondition::CityTier(tiers) => profile
                .city_tier
                .map(|tier| tiers.contains(&tier))
                .unwrap_or(false),
            ProfileCondition::Language(languages) => any_text_match(languages, &profile.languages),
            ProfileCondition::ExamPreparation(exams) => {
                any_text_match(exams, &profile.exam_preparation)
            }
            ProfileCondition::State(states) => profile
                .state
                .as_deref()
                .map(|state| {
                    states
                        .iter()
                        .any(|candidate| candidate.trim().eq_ignore_ascii_case(state.trim()))
                })
                .unwrap_or(false),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            ProfileCondition::EducationStage(values) => values.is_empty(),
            ProfileCondition::Stream(values) => values.is_empty(),
            ProfileCondition::CityTier(values) => values.is_empty(),
            ProfileCondition::Language(values)
            | ProfileCondition::ExamPreparation(values)
            | ProfileCondition::State(values) => values.is_empty(),
        }
    }
}

fn any_text_match(expected: &[String], actual: &[String]) -> bool {
    actual.iter().any(|value| {
        let value = value.trim();
        expected
            .iter()
            .any(|candidate| candidate.trim().eq_ignore_ascii_case(value))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileBoost {
    pub candidate: CandidateId,
    pub points: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ProfileEffect {
    Boost {
        contributions: Vec<ProfileBoost>,
    },
    /// Lowers a positive score by `delta`, never below `floor`.
    Penalty {
        candidate: CandidateId,
        delta: f64,
        floor: f64,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRule {
    pub when: ProfileCondition,
    #[serde(flatten)]
    pub effect: ProfileEffect,
}

/// Score after applying a floor-clamped penalty. Never raises the score.
pub(crate) fn penalized(score: f64, delta: f64, floor: f64) -> f64 {
    score.min((score - delta).max(floor))
}

fn boost(when: ProfileCondition, contributions: &[(&str, f64, &str)]) -> ProfileRule {
    ProfileRule {
        when,
        effect: ProfileEffect::Boost {
            contributions: contributions
                .iter()
                .map(|(candidate, points, reason)| ProfileBoost {
                    candidate: CandidateId::new(*candidate),
                    points: *points,
                    reason: reason.to_string(),
                })
                .collect(),
        },
    }
}

fn texts(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(crate) fn standard_profile_rules() -> Vec<ProfileRule> {
    vec![
        boost(
            ProfileCondition::Stream(vec![Stream::Science]),
            &[
                ("doctor", 10.0, "Science stream keeps the medical pathway open"),
                ("software-developer", 8.0, "Science with maths prepares you for engineering"),
                ("data-analyst", 5.0, "Science builds a quantitative foundation"),
            ],
        ),
        boost(
            ProfileCondition::Stream(vec![Stream::Commerce]),
            &[
                ("chartered-accountant", 12.0, "Commerce is the natural route to CA"),
                ("digital-marketer", 6.0, "Commerce covers marketing and business basics"),
                ("data-analyst", 5.0, "Economics and statistics support analytics"),
            ],
        ),
        boost(
            ProfileCondition::Stream(vec![Stream::Arts]),
            &[
                ("civil-services", 10.0, "Humanities subjects overlap heavily with the UPSC syllabus"),
                ("teacher", 8.0, "Arts graduates are in demand as subject teachers"),
                ("content-creator", 6.0, "Humanities sharpen storytelling"),
                ("graphic-designer", 6.0, "Arts stream supports a creative portfolio"),
            ],
        ),
        boost(
            ProfileCondition::EducationStage(vec![EducationStage::Graduate]),
            &[(
                "civil-services",
                5.0,
                "As a graduate you are already eligible for civil services exams",
            )],
        ),
        boost(
            ProfileCondition::ExamPreparation(texts(&["JEE Main/Advanced"])),
            &[("software-developer", 10.0, "JEE preparation leads into engineering colleges")],
        ),
        boost(
            ProfileCondition::ExamPreparation(texts(&["NEET"])),
            &[("doctor", 15.0, "You are already preparing for NEET")],
        ),
        boost(
            ProfileCondition::ExamPreparation(texts(&["UPSC"])),
            &[("civil-services", 15.0, "You are already preparing for UPSC")],
        ),
        boost(
            ProfileCondition::ExamPreparation(texts(&["State PSC", "SSC"])),
            &[("civil-services", 8.0, "Government exam preparation builds toward civil services")],
        ),
        boost(
            ProfileCondition::ExamPreparation(texts(&["Teaching (TET/CTET)"])),
            &[("teacher", 12.0, "TET/CTET qualifies you for government teaching posts")],
        ),
        boost(
            ProfileCondition::ExamPreparation(texts(&["CAT"])),
            &[
                ("digital-marketer", 6.0, "An MBA path opens marketing leadership roles"),
                ("data-analyst", 6.0, "CAT quantitative prep transfers to analytics"),
            ],
        ),
        boost(
            ProfileCondition::ExamPreparation(texts(&["GATE"])),
            &[
                ("software-developer", 6.0, "GATE opens PSU and M.Tech software roles"),
                ("data-analyst", 4.0, "GATE covers data structures and statistics"),
            ],
        ),
        boost(
            ProfileCondition::ExamPreparation(texts(&["Banking"])),
            &[("chartered-accountant", 5.0, "Banking preparation builds finance fundamentals")],
        ),
        boost(
            ProfileCondition::Language(texts(&[
                "Hindi", "Tamil", "Telugu", "Bengali", "Marathi", "Gujarati",
            ])),
            &[
                ("content-creator", 6.0, "Regional-language content has a fast-growing audience"),
                ("teacher", 4.0, "Teaching in your mother tongue is valued in schools"),
            ],
        ),
        boost(
            ProfileCondition::State(texts(&["Uttar Pradesh", "Maharashtra", "Bihar"])),
            &[(
                "civil-services",
                4.0,
                "Your state runs its own civil service exam (UPPSC/MPSC/BPSC)",
            )],
        ),
        boost(
            ProfileCondition::CityTier(vec![CityTier::Tier1]),
            &[
                ("software-developer", 5.0, "Metro cities host most IT and product companies"),
                ("digital-marketer", 5.0, "Digital agencies cluster in metro cities"),
            ],
        ),
        ProfileRule {
            when: ProfileCondition::CityTier(vec![CityTier::lowest()]),
            effect: ProfileEffect::Penalty {
                candidate: CandidateId::new("data-analyst"),
                delta: 15.0,
                floor: 10.0,
                reason: "Most data analyst roles sit in metro offices, so plan for relocation or remote work"
                    .to_string(),
            },
        },
    ]
}
