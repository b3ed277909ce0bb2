//! Career assessment: branching questionnaire, rule-based scoring, ranked
//! recommendations, and the session service wrapped around them.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod flow;
pub mod locale;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod stream;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, QuestionCatalog};
pub use domain::{
    Answer, AnswerKind, AnswerRejection, BranchCondition, CandidateId, ChoiceOption, CityTier,
    EducationStage, Question, Response, Stream, StudentProfile, SCALE_MAX, SCALE_MIN,
};
pub use engine::{AssessmentEngine, EngineError};
pub use flow::{Advance, AssessmentSession, FlowController, FlowError, Progress, Retreat};
pub use locale::{LocaleTable, QuestionView};
pub use ranking::{rank, RankingConfig, Recommendation};
pub use repository::{SessionId, SessionRecord, SessionStatus, SessionStore, StoreError};
pub use router::assessment_router;
pub use scoring::{
    CandidateTally, RuleBook, RuleError, ScoreBoard, ScoringEngine, SkipReason, SkippedResponse,
};
pub use service::{AssessmentService, BackOutcome, SessionServiceError, SessionSnapshot};
pub use stream::{recommend_stream, StreamAdvice, StreamPreferenceError, StreamPreferences};
