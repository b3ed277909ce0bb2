use super::common::*;
use crate::workflows::assessment::domain::AnswerRejection;
use crate::workflows::assessment::flow::{
    Advance, AssessmentSession, FlowController, FlowError, Progress, Retreat,
};
use crate::workflows::assessment::{Answer, AnswerKind, QuestionCatalog};

fn ids(flow: &FlowController<'_>, session: &AssessmentSession) -> Vec<String> {
    flow.visible_questions(&session.responses)
        .into_iter()
        .map(|question| question.id.clone())
        .collect()
}

#[test]
fn unanswered_flow_shows_the_seven_unconditional_questions() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);
    let session = AssessmentSession::new();

    assert_eq!(
        ids(&flow, &session),
        vec![
            "work_environment",
            "work_style",
            "technology_interest",
            "arts_interest",
            "business_interest",
            "healthcare_interest",
            "education_interest",
        ]
    );
    assert_eq!(
        flow.current_question(&session).expect("first question").id,
        "work_environment"
    );
    assert_eq!(
        flow.progress(&session),
        Progress {
            position: 1,
            total: 7
        }
    );
}

#[test]
fn branch_answers_grow_the_visible_sequence() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);

    let session = AssessmentSession::new();
    let advance = flow
        .advance(&session, Answer::choice("people_teams"))
        .expect("valid answer");
    let Advance::Next {
        session,
        question,
        progress,
    } = advance
    else {
        panic!("flow should continue");
    };
    assert_eq!(question.id, "work_style");
    assert_eq!(
        progress,
        Progress {
            position: 2,
            total: 8
        }
    );
    assert!(ids(&flow, &session).contains(&"public_service_interest".to_string()));

    let advance = flow
        .advance(&session, Answer::choice("analytical_problem_solving"))
        .expect("valid answer");
    let Advance::Next { question, progress, .. } = advance else {
        panic!("flow should continue");
    };
    assert_eq!(question.id, "tech_focus");
    assert_eq!(progress.total, 9);
}

#[test]
fn tech_focus_only_follows_analytical_work_style() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);

    for key in [
        "creative_artistic",
        "structured_organized",
        "flexible_varied",
    ] {
        let session = walk(
            &flow,
            &[
                ("work_environment", Answer::choice("hands_on")),
                ("work_style", Answer::choice(key)),
            ],
        );
        assert!(
            !ids(&flow, &session).contains(&"tech_focus".to_string()),
            "tech_focus visible after {key}"
        );
    }

    let session = walk(
        &flow,
        &[
            ("work_environment", Answer::choice("hands_on")),
            ("work_style", Answer::choice("analytical_problem_solving")),
        ],
    );
    assert!(ids(&flow, &session).contains(&"tech_focus".to_string()));
}

#[test]
fn invalid_answers_leave_the_session_untouched() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);
    let session = walk(&flow, &[("work_environment", Answer::choice("hands_on"))]);

    let cases = [
        (Answer::choice("   "), AnswerRejection::Blank),
        (
            Answer::choice("remote"),
            AnswerRejection::UnknownOption {
                key: "remote".to_string(),
            },
        ),
        (
            Answer::Scale(3),
            AnswerRejection::KindMismatch {
                expected: AnswerKind::SingleChoice,
            },
        ),
    ];
    for (answer, reason) in cases {
        assert_eq!(
            flow.advance(&session, answer),
            Err(FlowError::InvalidAnswer {
                question: "work_style".to_string(),
                reason,
            })
        );
    }

    let session = walk(
        &flow,
        &[
            ("work_environment", Answer::choice("hands_on")),
            ("work_style", Answer::choice("structured_organized")),
        ],
    );
    assert!(matches!(
        flow.advance(&session, Answer::Scale(6)),
        Err(FlowError::InvalidAnswer {
            reason: AnswerRejection::ScaleOutOfBounds { value: 6 },
            ..
        })
    ));
    assert!(matches!(
        flow.advance(&session, Answer::Scale(0)),
        Err(FlowError::InvalidAnswer { .. })
    ));
    assert_eq!(session.responses.len(), 2);
}

#[test]
fn reanswering_a_branch_point_discards_stale_downstream_answers() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);
    let answered = walk(
        &flow,
        &[
            ("work_environment", Answer::choice("data_analysis")),
            ("work_style", Answer::choice("analytical_problem_solving")),
            ("tech_focus", Answer::choice("build_software")),
        ],
    );

    let rewound = AssessmentSession {
        responses: answered.responses.clone(),
        cursor: 1,
    };
    let advance = flow
        .advance(&rewound, Answer::choice("creative_artistic"))
        .expect("valid answer");
    let Advance::Next {
        session, question, ..
    } = advance
    else {
        panic!("flow should continue");
    };

    assert_eq!(question.id, "creative_medium");
    assert!(session.response_for("tech_focus").is_none());
    assert_eq!(
        session.response_for("work_style").map(|r| r.answer.clone()),
        Some(Answer::choice("creative_artistic"))
    );
    assert_eq!(session.responses.len(), 2);
}

#[test]
fn lowering_business_interest_hides_numbers_comfort_again() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);
    let answered = walk(
        &flow,
        &[
            ("work_environment", Answer::choice("hands_on")),
            ("work_style", Answer::choice("structured_organized")),
            ("technology_interest", Answer::Scale(2)),
            ("arts_interest", Answer::Scale(2)),
            ("business_interest", Answer::Scale(5)),
            ("numbers_comfort", Answer::Scale(4)),
        ],
    );
    assert!(answered.response_for("numbers_comfort").is_some());

    let rewound = AssessmentSession {
        responses: answered.responses.clone(),
        cursor: 4,
    };
    let next = flow
        .advance(&rewound, Answer::Scale(2))
        .expect("valid answer");
    assert!(next.session().response_for("numbers_comfort").is_none());
    let Advance::Next { question, .. } = next else {
        panic!("flow should continue");
    };
    assert_eq!(question.id, "healthcare_interest");
}

#[test]
fn last_answer_completes_and_clamps_progress() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);
    let session = walk(
        &flow,
        &[
            ("work_environment", Answer::choice("hands_on")),
            ("work_style", Answer::choice("structured_organized")),
            ("technology_interest", Answer::Scale(3)),
            ("arts_interest", Answer::Scale(3)),
            ("business_interest", Answer::Scale(3)),
            ("healthcare_interest", Answer::Scale(3)),
        ],
    );

    let advance = flow
        .advance(&session, Answer::Scale(5))
        .expect("valid answer");
    let Advance::Complete { session, responses } = advance else {
        panic!("flow should be complete");
    };

    assert_eq!(responses.len(), 7);
    assert_eq!(session.cursor, 7);
    assert!(flow.is_complete(&session));
    assert_eq!(
        flow.progress(&session),
        Progress {
            position: 7,
            total: 7
        }
    );
    assert_eq!(
        flow.current_question(&session),
        Err(FlowError::OutOfRange {
            cursor: 7,
            visible: 7
        })
    );
}

#[test]
fn retreat_returns_the_previous_answer_and_hides_its_dependents() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);
    let session = walk(
        &flow,
        &[
            ("work_environment", Answer::choice("data_analysis")),
            ("work_style", Answer::choice("analytical_problem_solving")),
        ],
    );
    assert_eq!(
        flow.current_question(&session).expect("question").id,
        "tech_focus"
    );

    let Retreat::Previous {
        session,
        progress,
        previous_answer,
    } = flow.retreat(&session)
    else {
        panic!("retreat should step back");
    };

    assert_eq!(
        previous_answer,
        Some(Answer::choice("analytical_problem_solving"))
    );
    assert_eq!(session.cursor, 1);
    assert_eq!(
        progress,
        Progress {
            position: 2,
            total: 7
        }
    );
    assert!(!ids(&flow, &session).contains(&"tech_focus".to_string()));
    assert_eq!(
        flow.current_question(&session).expect("question").id,
        "work_style"
    );
}

#[test]
fn retreat_from_the_terminal_state_reopens_the_last_question() {
    let catalog = QuestionCatalog::standard();
    let flow = FlowController::new(&catalog);
    let session = complete(&flow, &[1, 2, 3]);
    assert!(flow.is_complete(&session));
    let last = session
        .responses
        .last()
        .cloned()
        .expect("at least one response");

    let Retreat::Previous {
        session: reopened,
        previous_answer,
        ..
    } = flow.retreat(&session)
    else {
        panic!("retreat should step back");
    };

    assert_eq!(previous_answer, Some(last.answer.clone()));
    assert_eq!(
        flow.current_question(&reopened).expect("question").id,
        last.question_id
    );

    let replayed = flow
        .advance(&reopened, last.answer)
        .expect("same answer accepted")
        .into_session();
    assert_eq!(replayed, session);
}
