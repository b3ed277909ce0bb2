use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::super::catalog::QuestionCatalog;
use super::super::domain::{AnswerKind, CandidateId};
use super::profile::{standard_profile_rules, ProfileEffect, ProfileRule};
use super::rules::{standard_response_rules, AnswerPattern, ResponseRule, Weight};

/// Swappable scoring configuration: candidate order plus both rule tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBook {
    /// Registration order doubles as the ranking tie-break.
    pub candidates: Vec<CandidateId>,
    pub response_rules: Vec<ResponseRule>,
    #[serde(default)]
    pub profile_rules: Vec<ProfileRule>,
}

impl RuleBook {
    pub fn standard() -> Self {
        Self {
            candidates: standard_candidates(),
            response_rules: standard_response_rules(),
            profile_rules: standard_profile_rules(),
        }
    }

    pub fn position(&self, candidate: &CandidateId) -> Option<usize> {
        self.candidates.iter().position(|known| known == candidate)
    }

    pub fn rules_for<'a>(&'a self, question_id: &'a str) -> impl Iterator<Item = &'a ResponseRule> {
        self.response_rules
            .iter()
            .filter(move |rule| rule.question == question_id)
    }

    /// Cross-checks the tables against the catalog.
    pub fn validate(&self, catalog: &QuestionCatalog) -> Result<(), RuleError> {
        let mut registered = HashSet::new();
        for candidate in &self.candidates {
            if !registered.insert(candidate) {
                return Err(RuleError::DuplicateCandidate(candidate.clone()));
            }
        }

        for rule in &self.response_rules {
            let question = catalog
                .question(&rule.question)
                .ok_or_else(|| RuleError::UnknownQuestion(rule.question.clone()))?;

            match (&rule.pattern, question.kind) {
                (AnswerPattern::AnyOf(keys), AnswerKind::SingleChoice) => {
                    if keys.is_empty() {
                        return Err(RuleError::EmptyPattern(rule.question.clone()));
                    }
                    if let Some(key) = keys.iter().find(|key| question.option(key).is_none()) {
                        return Err(RuleError::UnknownOption {
                            question: rule.question.clone(),
                            key: key.clone(),
                        });
                    }
                }
                (AnswerPattern::Scale, AnswerKind::RatedScale) => {}
                _ => return Err(RuleError::PatternKindMismatch(rule.question.clone())),
            }

            for contribution in &rule.contributions {
                if !registered.contains(&contribution.candidate) {
                    return Err(RuleError::UnregisteredCandidate(
                        contribution.candidate.clone(),
                    ));
                }
                if matches!(contribution.weight, Weight::PerPoint(_))
                    && question.kind != AnswerKind::RatedScale
                {
                    return Err(RuleError::PatternKindMismatch(rule.question.clone()));
                }
                if !(contribution.weight.magnitude() > 0.0) {
                    return Err(RuleError::NonPositiveWeight {
                        candidate: contribution.candidate.clone(),
                        context: rule.question.clone(),
                    });
                }
                if contribution.reason.trim().is_empty() {
                    return Err(RuleError::EmptyReason(contribution.candidate.clone()));
                }
            }
        }

        let mut penalties = 0;
        for rule in &self.profile_rules {
            if rule.when.is_empty() {
                return Err(RuleError::EmptyProfileCondition);
            }
            match &rule.effect {
                ProfileEffect::Boost { contributions } => {
                    for boost in contributions {
                        if !registered.contains(&boost.candidate) {
                            return Err(RuleError::UnregisteredCandidate(boost.candidate.clone()));
                        }
                        if !(boost.points > 0.0) {
                            return Err(RuleError::NonPositiveWeight {
                                candidate: boost.candidate.clone(),
                                context: "profile".to_string(),
                            });
                        }
                        if boost.reason.trim().is_empty() {
                            return Err(RuleError::EmptyReason(boost.candidate.clone()));
                        }
                    }
                }
                ProfileEffect::Penalty {
                    candidate,
                    delta,
                    floor,
                    reason,
                } => {
                    penalties += 1;
                    if penalties > 1 {
                        return Err(RuleError::MultiplePenalties);
                    }
                    if !registered.contains(candidate) {
                        return Err(RuleError::UnregisteredCandidate(candidate.clone()));
                    }
                    if !(*delta > 0.0) || !(*floor >= 0.0) {
                        return Err(RuleError::InvalidPenalty(candidate.clone()));
                    }
                    if reason.trim().is_empty() {
                        return Err(RuleError::EmptyReason(candidate.clone()));
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("candidate '{0}' is registered more than once")]
    DuplicateCandidate(CandidateId),
    #[error("candidate '{0}' is not registered")]
    UnregisteredCandidate(CandidateId),
    #[error("rule references unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("rule for '{question}' references unknown option '{key}'")]
    UnknownOption { question: String, key: String },
    #[error("rule for '{0}' lists no option keys")]
    EmptyPattern(String),
    #[error("rule for '{0}' does not fit the question's answer kind")]
    PatternKindMismatch(String),
    #[error("weight for '{candidate}' ({context}) must be positive")]
    NonPositiveWeight {
        candidate: CandidateId,
        context: String,
    },
    #[error("contribution for '{0}' has an empty reason")]
    EmptyReason(CandidateId),
    #[error("profile rule has an empty condition")]
    EmptyProfileCondition,
    #[error("only one penalty rule is permitted")]
    MultiplePenalties,
    #[error("penalty for '{0}' needs a positive delta and a non-negative floor")]
    InvalidPenalty(CandidateId),
}

fn standard_candidates() -> Vec<CandidateId> {
    [
        "software-developer",
        "graphic-designer",
        "data-analyst",
        "doctor",
        "teacher",
        "digital-marketer",
        "civil-services",
        "chartered-accountant",
        "content-creator",
    ]
    .into_iter()
    .map(CandidateId::new)
    .collect()
}
