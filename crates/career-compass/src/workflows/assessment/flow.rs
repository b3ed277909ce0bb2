use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::domain::{Answer, AnswerRejection, Question, Response};

/// Explicit per-user state threaded through every flow operation.
///
/// `cursor` indexes the *visible* question sequence, which is re-derived from
/// `responses` on every call. A cursor equal to the visible length is the
/// terminal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub responses: Vec<Response>,
    pub cursor: usize,
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn response_for(&self, question_id: &str) -> Option<&Response> {
        self.responses
            .iter()
            .find(|response| response.question_id == question_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.position as f32 / self.total as f32
    }

    pub fn percent(&self) -> u8 {
        (self.fraction() * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advance<'a> {
    Next {
        session: AssessmentSession,
        question: &'a Question,
        progress: Progress,
    },
    Complete {
        session: AssessmentSession,
        responses: Vec<Response>,
    },
}

impl Advance<'_> {
    pub fn session(&self) -> &AssessmentSession {
        match self {
            Advance::Next { session, .. } | Advance::Complete { session, .. } => session,
        }
    }

    pub fn into_session(self) -> AssessmentSession {
        match self {
            Advance::Next { session, .. } | Advance::Complete { session, .. } => session,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Retreat {
    /// Already at the first question; the caller should leave the flow.
    Exit,
    Previous {
        session: AssessmentSession,
        progress: Progress,
        previous_answer: Option<Answer>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("invalid answer for '{question}': {reason}")]
    InvalidAnswer {
        question: String,
        reason: AnswerRejection,
    },
    #[error("cursor {cursor} is outside the {visible} visible question(s)")]
    OutOfRange { cursor: usize, visible: usize },
}

/// Stateless navigator over a question catalog.
#[derive(Debug, Clone, Copy)]
pub struct FlowController<'a> {
    catalog: &'a QuestionCatalog,
}

impl<'a> FlowController<'a> {
    pub fn new(catalog: &'a QuestionCatalog) -> Self {
        Self { catalog }
    }

    pub fn visible_questions(&self, responses: &[Response]) -> Vec<&'a Question> {
        self.catalog
            .all_questions()
            .iter()
            .filter(|question| match &question.branch {
                None => true,
                Some(branch) => branch.is_met_by(responses),
            })
            .collect()
    }

    pub fn current_question(&self, session: &AssessmentSession) -> Result<&'a Question, FlowError> {
        let visible = self.visible_questions(&session.responses);
        visible
            .get(session.cursor)
            .copied()
            .ok_or(FlowError::OutOfRange {
                cursor: session.cursor,
                visible: visible.len(),
            })
    }

    pub fn progress(&self, session: &AssessmentSession) -> Progress {
        let total = self.visible_questions(&session.responses).len();
        Progress {
            position: (session.cursor + 1).min(total),
            total,
        }
    }

    pub fn is_complete(&self, session: &AssessmentSession) -> bool {
        session.cursor >= self.visible_questions(&session.responses).len()
    }

    pub fn advance(
        &self,
        session: &AssessmentSession,
        answer: Answer,
    ) -> Result<Advance<'a>, FlowError> {
        let question = self.current_question(session)?;
        question
            .validate(&answer)
            .map_err(|reason| FlowError::InvalidAnswer {
                question: question.id.clone(),
                reason,
            })?;

        let mut responses: Vec<Response> = session
            .responses
            .iter()
            .filter(|response| response.question_id != question.id)
            .cloned()
            .collect();
        responses.push(Response::new(&question.id, answer));
        let responses = self.prune_ineligible(responses);

        let visible = self.visible_questions(&responses);
        let cursor = visible
            .iter()
            .position(|candidate| candidate.id == question.id)
            .map(|index| index + 1)
            .unwrap_or(visible.len());

        match visible.get(cursor) {
            Some(next) => {
                let session = AssessmentSession { responses, cursor };
                let progress = Progress {
                    position: cursor + 1,
                    total: visible.len(),
                };
                Ok(Advance::Next {
                    session,
                    question: next,
                    progress,
                })
            }
            None => Ok(Advance::Complete {
                session: AssessmentSession {
                    responses: responses.clone(),
                    cursor: visible.len(),
                },
                responses,
            }),
        }
    }

    /// Steps back one visible question, undoing its recorded answer.
    pub fn retreat(&self, session: &AssessmentSession) -> Retreat {
        if session.cursor == 0 {
            return Retreat::Exit;
        }

        let visible = self.visible_questions(&session.responses);
        let cursor = session.cursor.min(visible.len()).saturating_sub(1);
        let Some(previous) = visible.get(cursor) else {
            return Retreat::Exit;
        };

        let mut previous_answer = None;
        let responses = session
            .responses
            .iter()
            .filter(|response| {
                if response.question_id == previous.id {
                    previous_answer = Some(response.answer.clone());
                    false
                } else {
                    true
                }
            })
            .cloned()
            .collect::<Vec<_>>();

        let total = self.visible_questions(&responses).len();
        Retreat::Previous {
            session: AssessmentSession { responses, cursor },
            progress: Progress {
                position: cursor + 1,
                total,
            },
            previous_answer,
        }
    }

    /// Drops responses whose questions are no longer eligible. Dependencies
    /// always precede dependents, so one pass in catalog order settles it.
    fn prune_ineligible(&self, responses: Vec<Response>) -> Vec<Response> {
        let mut eligible: Vec<&str> = Vec::new();
        let mut kept_so_far: Vec<Response> = Vec::new();

        for question in self.catalog.all_questions() {
            let visible = match &question.branch {
                None => true,
                Some(branch) => branch.is_met_by(&kept_so_far),
            };
            if !visible {
                continue;
            }
            eligible.push(question.id.as_str());
            if let Some(response) = responses
                .iter()
                .find(|response| response.question_id == question.id)
            {
                kept_so_far.push(response.clone());
            }
        }

        responses
            .into_iter()
            .filter(|response| eligible.contains(&response.question_id.as_str()))
            .collect()
    }
}
