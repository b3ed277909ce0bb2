mod profile;
mod rulebook;
mod rules;

pub use profile::{ProfileBoost, ProfileCondition, ProfileEffect, ProfileRule};
pub use rulebook::{RuleBook, RuleError};
pub use rules::{AnswerPattern, Contribution, ResponseRule, Weight};

use serde::Serialize;
use tracing::{debug, warn};

use super::catalog::QuestionCatalog;
use super::domain::{AnswerRejection, CandidateId, Response, StudentProfile};
use profile::penalized;

/// Running total and justification trail for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateTally {
    pub candidate: CandidateId,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Why a response contributed nothing. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    UnknownQuestion,
    MalformedAnswer { rejection: AnswerRejection },
    NoMatchingRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedResponse {
    pub question_id: String,
    pub reason: SkipReason,
}

/// Per-run accumulator, laid out in candidate registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBoard {
    tallies: Vec<CandidateTally>,
    skipped: Vec<SkippedResponse>,
}

impl ScoreBoard {
    fn new(candidates: &[CandidateId]) -> Self {
        Self {
            tallies: candidates
                .iter()
                .map(|candidate| CandidateTally {
                    candidate: candidate.clone(),
                    score: 0.0,
                    reasons: Vec::new(),
                })
                .collect(),
            skipped: Vec::new(),
        }
    }

    fn tally_mut(&mut self, candidate: &CandidateId) -> Option<&mut CandidateTally> {
        self.tallies
            .iter_mut()
            .find(|tally| &tally.candidate == candidate)
    }

    fn add(&mut self, candidate: &CandidateId, points: f64, reason: String) -> bool {
        match self.tally_mut(candidate) {
            Some(tally) => {
                tally.score += points;
                tally.reasons.push(reason);
                true
            }
            None => {
                debug!(%candidate, "ignoring contribution for unregistered candidate");
                false
            }
        }
    }

    fn skip(&mut self, question_id: &str, reason: SkipReason) {
        self.skipped.push(SkippedResponse {
            question_id: question_id.to_string(),
            reason,
        });
    }

    pub fn tallies(&self) -> &[CandidateTally] {
        &self.tallies
    }

    pub fn tally(&self, candidate: &str) -> Option<&CandidateTally> {
        self.tallies
            .iter()
            .find(|tally| tally.candidate.as_str() == candidate)
    }

    pub fn score_of(&self, candidate: &str) -> f64 {
        self.tally(candidate).map(|tally| tally.score).unwrap_or(0.0)
    }

    pub fn skipped(&self) -> &[SkippedResponse] {
        &self.skipped
    }
}

/// Stateless evaluator applying the rule tables to a response set.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'a> {
    catalog: &'a QuestionCatalog,
    rules: &'a RuleBook,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(catalog: &'a QuestionCatalog, rules: &'a RuleBook) -> Self {
        Self { catalog, rules }
    }

    pub fn score(&self, responses: &[Response], profile: Option<&StudentProfile>) -> ScoreBoard {
        let mut board = ScoreBoard::new(&self.rules.candidates);

        for response in responses {
            self.apply_response(&mut board, response);
        }

        if let Some(profile) = profile {
            self.apply_profile(&mut board, profile);
        }

        board
    }

    fn apply_response(&self, board: &mut ScoreBoard, response: &Response) {
        let Some(question) = self.catalog.question(&response.question_id) else {
            debug!(question = %response.question_id, "skipping response for unknown question");
            board.skip(&response.question_id, SkipReason::UnknownQuestion);
            return;
        };

        if let Err(rejection) = question.validate(&response.answer) {
            warn!(
                question = %response.question_id,
                answer = %response.answer,
                %rejection,
                "skipping malformed response"
            );
            board.skip(
                &response.question_id,
                SkipReason::MalformedAnswer { rejection },
            );
            return;
        }

        let mut fired = false;
        for rule in self.rules.rules_for(&response.question_id) {
            if !rule.pattern.matches(&response.answer) {
                continue;
            }
            for contribution in &rule.contributions {
                let Some(points) = contribution.weight.resolve(&response.answer) else {
                    continue;
                };
                let reason = contribution.render_reason(&response.answer);
                fired |= board.add(&contribution.candidate, points, reason);
            }
        }

        if !fired {
            debug!(question = %response.question_id, answer = %response.answer, "no rule matched");
            board.skip(&response.question_id, SkipReason::NoMatchingRule);
        }
    }

    fn apply_profile(&self, board: &mut ScoreBoard, profile: &StudentProfile) {
        let matching: Vec<&ProfileRule> = self
            .rules
            .profile_rules
            .iter()
            .filter(|rule| rule.when.matches(profile))
            .collect();

        for rule in &matching {
            if let ProfileEffect::Boost { contributions } = &rule.effect {
                for boost in contributions {
                    board.add(&boost.candidate, boost.points, boost.reason.clone());
                }
            }
        }

        for rule in &matching {
            if let ProfileEffect::Penalty {
                candidate,
                delta,
                floor,
                reason,
            } = &rule.effect
            {
                let Some(tally) = board.tally_mut(candidate) else {
                    continue;
                };
                if tally.score <= 0.0 {
                    continue;
                }
                let adjusted = penalized(tally.score, *delta, *floor);
                debug!(%candidate, before = tally.score, after = adjusted, "applying profile penalty");
                tally.score = adjusted;
                tally.reasons.push(reason.clone());
            }
        }
    }
}
