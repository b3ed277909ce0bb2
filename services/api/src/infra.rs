use career_compass::config::EngineConfig;
use career_compass::error::{AppError, InputError};
use career_compass::workflows::assessment::{
    AssessmentEngine, LocaleTable, Question, QuestionCatalog, RankingConfig, RuleBook, SessionId,
    SessionRecord, SessionStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl InMemorySessionStore {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("session store lock poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, StoreError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&record.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, StoreError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn replace(
        &self,
        record: SessionRecord,
        expected_revision: u64,
    ) -> Result<SessionRecord, StoreError> {
        let mut guard = self.guard()?;
        let stored = guard.get(&record.id).ok_or(StoreError::NotFound)?;
        if stored.revision != expected_revision {
            return Err(StoreError::StaleRevision {
                expected: expected_revision,
                actual: stored.revision,
            });
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}

/// Builds the engine from configured table files, falling back to the
/// built-in catalog and rule book for any path left unset.
pub(crate) fn load_engine(config: &EngineConfig) -> Result<AssessmentEngine, AppError> {
    let catalog = match &config.question_catalog {
        Some(path) => {
            let questions: Vec<Question> = read_json(path)?;
            QuestionCatalog::new(questions).map_err(|err| AppError::Engine(err.into()))?
        }
        None => QuestionCatalog::standard(),
    };
    let rules = match &config.rulebook {
        Some(path) => read_json::<RuleBook>(path)?,
        None => RuleBook::standard(),
    };
    let ranking = RankingConfig {
        max_results: config.max_recommendations,
        ..RankingConfig::default()
    };

    let engine = AssessmentEngine::from_parts(catalog, rules, ranking)?;
    Ok(engine.with_locale(LocaleTable::hindi()))
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| {
        AppError::Input(InputError::Json {
            path: path.display().to_string(),
            source,
        })
    })
}
