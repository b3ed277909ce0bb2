use super::catalog::{CatalogError, QuestionCatalog};
use super::domain::{Answer, Question, Response, StudentProfile};
use super::flow::FlowController;
use super::locale::{LocaleTable, QuestionView};
use super::ranking::{rank, RankingConfig, Recommendation};
use super::scoring::{RuleBook, RuleError, ScoreBoard, ScoringEngine};

/// Match scores are percentages.
const MAX_SCORE_CAP: u8 = 100;

/// Immutable bundle of catalog, rule tables, and ranking settings shared by
/// every session.
#[derive(Debug, Clone)]
pub struct AssessmentEngine {
    catalog: QuestionCatalog,
    rules: RuleBook,
    ranking: RankingConfig,
    locales: Vec<LocaleTable>,
}

impl AssessmentEngine {
    pub fn standard() -> Self {
        Self {
            catalog: QuestionCatalog::standard(),
            rules: RuleBook::standard(),
            ranking: RankingConfig::default(),
            locales: vec![LocaleTable::hindi()],
        }
    }

    /// Builds an engine from swappable parts, cross-validating the rule book
    /// against the catalog.
    pub fn from_parts(
        catalog: QuestionCatalog,
        rules: RuleBook,
        ranking: RankingConfig,
    ) -> Result<Self, EngineError> {
        rules.validate(&catalog)?;
        if ranking.max_results == 0 {
            return Err(EngineError::InvalidRanking);
        }
        if ranking.score_cap == 0 || ranking.score_cap > MAX_SCORE_CAP {
            return Err(EngineError::InvalidScoreCap(ranking.score_cap));
        }
        Ok(Self {
            catalog,
            rules,
            ranking,
            locales: Vec::new(),
        })
    }

    pub fn with_locale(mut self, table: LocaleTable) -> Self {
        self.locales.retain(|existing| existing.locale != table.locale);
        self.locales.push(table);
        self
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn ranking(&self) -> &RankingConfig {
        &self.ranking
    }

    pub fn flow(&self) -> FlowController<'_> {
        FlowController::new(&self.catalog)
    }

    pub fn scorer(&self) -> ScoringEngine<'_> {
        ScoringEngine::new(&self.catalog, &self.rules)
    }

    pub fn score(&self, responses: &[Response], profile: Option<&StudentProfile>) -> ScoreBoard {
        self.scorer().score(responses, profile)
    }

    pub fn recommend(
        &self,
        responses: &[Response],
        profile: Option<&StudentProfile>,
    ) -> Vec<Recommendation> {
        rank(&self.score(responses, profile), &self.ranking)
    }

    /// Rewrites choice answers recorded as display labels to their option keys.
    /// Answers that already use a key, or match nothing, pass through untouched.
    pub fn resolve_labels(&self, responses: Vec<Response>) -> Vec<Response> {
        responses
            .into_iter()
            .map(|response| {
                let Answer::Choice(raw) = &response.answer else {
                    return response;
                };
                let known_key = self
                    .catalog
                    .question(&response.question_id)
                    .map(|question| question.option(raw).is_some())
                    .unwrap_or(true);
                if known_key {
                    return response;
                }
                match self.catalog.option_for_label(&response.question_id, raw) {
                    Some(answer) => Response {
                        answer,
                        ..response
                    },
                    None => response,
                }
            })
            .collect()
    }

    pub fn locale(&self, code: &str) -> Option<&LocaleTable> {
        let code = code.trim();
        self.locales
            .iter()
            .find(|table| table.locale.eq_ignore_ascii_case(code))
    }

    /// Catalog rendered for display. Unknown locales fall back to catalog text.
    pub fn question_views(&self, locale: Option<&str>) -> Vec<QuestionView> {
        let table = locale.and_then(|code| self.locale(code));
        self.catalog
            .all_questions()
            .iter()
            .map(|question| QuestionView::localized(question, table))
            .collect()
    }

    pub fn question_view(&self, question: &Question, locale: Option<&str>) -> QuestionView {
        QuestionView::localized(question, locale.and_then(|code| self.locale(code)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid question catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid rule book: {0}")]
    Rules(#[from] RuleError),
    #[error("ranking must keep at least one result")]
    InvalidRanking,
    #[error("score cap must be between 1 and {max}, got {0}", max = MAX_SCORE_CAP)]
    InvalidScoreCap(u8),
}
