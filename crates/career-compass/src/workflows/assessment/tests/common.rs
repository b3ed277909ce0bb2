use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::assessment::flow::{Advance, AssessmentSession, FlowController};
use crate::workflows::assessment::repository::{
    SessionId, SessionRecord, SessionStore, StoreError,
};
use crate::workflows::assessment::{
    assessment_router, Answer, AssessmentEngine, AssessmentService, CityTier, EducationStage,
    Response as AssessmentResponse, Stream, StudentProfile,
};

pub(super) fn engine() -> Arc<AssessmentEngine> {
    Arc::new(AssessmentEngine::standard())
}

pub(super) fn response(question: &str, answer: Answer) -> AssessmentResponse {
    AssessmentResponse::new(question, answer)
}

pub(super) fn choice(question: &str, key: &str) -> AssessmentResponse {
    AssessmentResponse::new(question, Answer::choice(key))
}

pub(super) fn rating(question: &str, value: u8) -> AssessmentResponse {
    AssessmentResponse::new(question, Answer::Scale(value))
}

pub(super) fn profile() -> StudentProfile {
    StudentProfile::new(EducationStage::Class12)
}

pub(super) fn tier3_profile() -> StudentProfile {
    let mut profile = profile();
    profile.city_tier = Some(CityTier::Tier3);
    profile
}

pub(super) fn science_profile() -> StudentProfile {
    let mut profile = profile();
    profile.stream = Some(Stream::Science);
    profile
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Answers questions in order, returning the session after the last answer.
pub(super) fn walk(
    flow: &FlowController<'_>,
    answers: &[(&str, Answer)],
) -> AssessmentSession {
    let mut session = AssessmentSession::new();
    for (question, answer) in answers {
        let current = flow
            .current_question(&session)
            .expect("flow still has questions");
        assert_eq!(&current.id, question, "unexpected question order");
        session = flow
            .advance(&session, answer.clone())
            .expect("answer accepted")
            .into_session();
    }
    session
}

/// Picks a valid answer for whatever question is current, using `seed` to
/// vary the choice.
pub(super) fn pick_answer(flow: &FlowController<'_>, session: &AssessmentSession, seed: u8) -> Answer {
    let question = flow.current_question(session).expect("question available");
    if question.options.is_empty() {
        Answer::Scale(seed % 5 + 1)
    } else {
        let index = usize::from(seed) % question.options.len();
        Answer::choice(&question.options[index].key)
    }
}

pub(super) fn complete(flow: &FlowController<'_>, seeds: &[u8]) -> AssessmentSession {
    let mut session = AssessmentSession::new();
    for seed in seeds.iter().cycle() {
        let answer = pick_answer(flow, &session, *seed);
        match flow.advance(&session, answer).expect("answer accepted") {
            Advance::Next { session: next, .. } => session = next,
            Advance::Complete { session, .. } => return session,
        }
    }
    session
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionStore for MemoryStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn replace(
        &self,
        record: SessionRecord,
        expected_revision: u64,
    ) -> Result<SessionRecord, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let current = guard.get(&record.id).ok_or(StoreError::NotFound)?;
        if current.revision != expected_revision {
            return Err(StoreError::StaleRevision {
                expected: expected_revision,
                actual: current.revision,
            });
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn replace(
        &self,
        _record: SessionRecord,
        _expected_revision: u64,
    ) -> Result<SessionRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (AssessmentService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = AssessmentService::new(engine(), store.clone());
    (service, store)
}

pub(super) fn router_with_service(service: AssessmentService<MemoryStore>) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
