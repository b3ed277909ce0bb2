use serde::{Deserialize, Serialize};

use super::domain::{Stream, SCALE_MAX, SCALE_MIN};

/// Self-ratings collected before a Class 10 student chooses a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPreferences {
    pub math_comfort: u8,
    pub science_interest: u8,
    pub business_interest: u8,
    pub art_interest: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamScore {
    pub stream: Stream,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamAdvice {
    pub recommended: Stream,
    pub scores: Vec<StreamScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be between {min} and {max}, got {value}", min = SCALE_MIN, max = SCALE_MAX)]
pub struct StreamPreferenceError {
    pub field: &'static str,
    pub value: u8,
}

impl StreamPreferences {
    pub fn validate(&self) -> Result<(), StreamPreferenceError> {
        let fields = [
            ("math_comfort", self.math_comfort),
            ("science_interest", self.science_interest),
            ("business_interest", self.business_interest),
            ("art_interest", self.art_interest),
        ];
        for (field, value) in fields {
            if !(SCALE_MIN..=SCALE_MAX).contains(&value) {
                return Err(StreamPreferenceError { field, value });
            }
        }
        Ok(())
    }

    fn score(&self, stream: Stream) -> u8 {
        match stream {
            Stream::Science => self.math_comfort + self.science_interest,
            Stream::Commerce => self.math_comfort + self.business_interest,
            Stream::Arts => self.art_interest + (SCALE_MAX - self.math_comfort),
        }
    }
}

/// Picks the highest scoring stream. A later stream wins ties.
pub fn recommend_stream(
    preferences: &StreamPreferences,
) -> Result<StreamAdvice, StreamPreferenceError> {
    preferences.validate()?;

    let scores: Vec<StreamScore> = Stream::ordered()
        .into_iter()
        .map(|stream| StreamScore {
            stream,
            score: preferences.score(stream),
        })
        .collect();

    let recommended = scores
        .iter()
        .fold(None::<&StreamScore>, |best, candidate| match best {
            Some(best) if best.score > candidate.score => Some(best),
            _ => Some(candidate),
        })
        .map(|winner| winner.stream)
        .unwrap_or(Stream::Science);

    Ok(StreamAdvice {
        recommended,
        scores,
    })
}
