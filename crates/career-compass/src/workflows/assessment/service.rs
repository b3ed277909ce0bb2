use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::domain::{Answer, StudentProfile};
use super::engine::AssessmentEngine;
use super::flow::{Advance, AssessmentSession, FlowError, Progress, Retreat};
use super::locale::QuestionView;
use super::ranking::Recommendation;
use super::repository::{SessionId, SessionRecord, SessionStatus, SessionStore, StoreError};

/// Service composing the shared engine with a session store.
pub struct AssessmentService<S> {
    engine: Arc<AssessmentEngine>,
    store: Arc<S>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("asm-{id:06}"))
}

/// What a client needs to render the next step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub revision: u64,
    pub status: SessionStatus,
    pub progress: Progress,
    pub percent_complete: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_answer: Option<Answer>,
    pub answered: usize,
    pub profile_attached: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackOutcome {
    /// Already at the first question; nothing was changed.
    Exit,
    Previous(SessionSnapshot),
}

impl<S> AssessmentService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(engine: Arc<AssessmentEngine>, store: Arc<S>) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &AssessmentEngine {
        &self.engine
    }

    pub fn start(
        &self,
        profile: Option<StudentProfile>,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        let now = Utc::now();
        let record = SessionRecord {
            id: next_session_id(),
            session: AssessmentSession::new(),
            profile,
            status: SessionStatus::InProgress,
            revision: 0,
            started_at: now,
            updated_at: now,
        };

        let stored = self.store.insert(record)?;
        info!(session = %stored.id, profile = stored.profile.is_some(), "assessment started");
        Ok(self.snapshot(&stored, None, None))
    }

    pub fn get(&self, id: &SessionId) -> Result<SessionRecord, SessionServiceError> {
        self.store
            .fetch(id)?
            .ok_or_else(|| SessionServiceError::NotFound(id.clone()))
    }

    pub fn current(
        &self,
        id: &SessionId,
        locale: Option<&str>,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        let record = self.get(id)?;
        Ok(self.snapshot(&record, None, locale))
    }

    /// Records an answer for the current question. `revision` must match the
    /// stored revision.
    pub fn answer(
        &self,
        id: &SessionId,
        revision: u64,
        answer: Answer,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        let record = self.fetch_at(id, revision)?;

        let (session, status) = match self.engine.flow().advance(&record.session, answer)? {
            Advance::Next { session, .. } => (session, SessionStatus::InProgress),
            Advance::Complete { session, .. } => (session, SessionStatus::Completed),
        };

        let stored = self.commit(record, session, status, None)?;
        info!(
            session = %stored.id,
            revision = stored.revision,
            status = stored.status.label(),
            "answer recorded"
        );
        Ok(self.snapshot(&stored, None, None))
    }

    pub fn back(
        &self,
        id: &SessionId,
        revision: u64,
    ) -> Result<BackOutcome, SessionServiceError> {
        let record = self.fetch_at(id, revision)?;

        match self.engine.flow().retreat(&record.session) {
            Retreat::Exit => Ok(BackOutcome::Exit),
            Retreat::Previous {
                session,
                previous_answer,
                ..
            } => {
                let stored = self.commit(record, session, SessionStatus::InProgress, None)?;
                info!(session = %stored.id, revision = stored.revision, "stepped back");
                Ok(BackOutcome::Previous(self.snapshot(
                    &stored,
                    previous_answer,
                    None,
                )))
            }
        }
    }

    pub fn attach_profile(
        &self,
        id: &SessionId,
        revision: u64,
        profile: StudentProfile,
    ) -> Result<SessionSnapshot, SessionServiceError> {
        let record = self.fetch_at(id, revision)?;
        let session = record.session.clone();
        let status = record.status;

        let stored = self.commit(record, session, status, Some(profile))?;
        info!(session = %stored.id, revision = stored.revision, "profile attached");
        Ok(self.snapshot(&stored, None, None))
    }

    /// Ranked recommendations for a finished assessment.
    pub fn recommendations(
        &self,
        id: &SessionId,
    ) -> Result<Vec<Recommendation>, SessionServiceError> {
        let record = self.get(id)?;
        if record.status != SessionStatus::Completed {
            return Err(SessionServiceError::Incomplete(id.clone()));
        }

        let recommendations = self
            .engine
            .recommend(&record.session.responses, record.profile.as_ref());
        info!(
            session = %record.id,
            results = recommendations.len(),
            "recommendations generated"
        );
        Ok(recommendations)
    }

    fn fetch_at(
        &self,
        id: &SessionId,
        revision: u64,
    ) -> Result<SessionRecord, SessionServiceError> {
        let record = self.get(id)?;
        if record.revision != revision {
            return Err(SessionServiceError::StaleRevision {
                expected: revision,
                actual: record.revision,
            });
        }
        Ok(record)
    }

    fn commit(
        &self,
        record: SessionRecord,
        session: AssessmentSession,
        status: SessionStatus,
        profile: Option<StudentProfile>,
    ) -> Result<SessionRecord, SessionServiceError> {
        let expected = record.revision;
        let id = record.id.clone();
        let next = SessionRecord {
            session,
            status,
            profile: profile.or(record.profile),
            revision: expected + 1,
            updated_at: Utc::now(),
            ..record
        };

        self.store
            .replace(next, expected)
            .map_err(|error| match error {
                StoreError::NotFound => SessionServiceError::NotFound(id),
                other => other.into(),
            })
    }

    fn snapshot(
        &self,
        record: &SessionRecord,
        previous_answer: Option<Answer>,
        locale: Option<&str>,
    ) -> SessionSnapshot {
        let flow = self.engine.flow();
        let progress = flow.progress(&record.session);
        let question = flow
            .current_question(&record.session)
            .ok()
            .map(|question| self.engine.question_view(question, locale));

        SessionSnapshot {
            session_id: record.id.clone(),
            revision: record.revision,
            status: record.status,
            progress,
            percent_complete: progress.percent(),
            question,
            previous_answer,
            answered: record.session.responses.len(),
            profile_attached: record.profile.is_some(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error("assessment '{0}' not found")]
    NotFound(SessionId),
    #[error("stale revision {expected}; the assessment is at revision {actual}")]
    StaleRevision { expected: u64, actual: u64 },
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error("assessment '{0}' is not finished yet")]
    Incomplete(SessionId),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for SessionServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::StaleRevision { expected, actual } => {
                Self::StaleRevision { expected, actual }
            }
            other => Self::Store(other),
        }
    }
}
