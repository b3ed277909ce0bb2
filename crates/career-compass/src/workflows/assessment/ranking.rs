use serde::{Deserialize, Serialize};

use super::domain::CandidateId;
use super::scoring::ScoreBoard;

/// Selection knobs applied after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub max_results: usize,
    pub score_cap: u8,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_results: 3,
            score_cap: 100,
        }
    }
}

/// Ranked, explained match returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub candidate: CandidateId,
    pub match_score: u8,
    pub reasons: Vec<String>,
}

/// Drops non-positive tallies, normalizes the rest, and keeps the top
/// `max_results`. Ties keep registration order.
pub fn rank(board: &ScoreBoard, config: &RankingConfig) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = board
        .tallies()
        .iter()
        .filter(|tally| tally.score > 0.0)
        .map(|tally| Recommendation {
            candidate: tally.candidate.clone(),
            match_score: normalize(tally.score, config.score_cap),
            reasons: tally.reasons.clone(),
        })
        .collect();

    ranked.sort_by(|left, right| right.match_score.cmp(&left.match_score));
    ranked.truncate(config.max_results);
    ranked
}

fn normalize(score: f64, cap: u8) -> u8 {
    score.round().clamp(0.0, f64::from(cap)) as u8
}
