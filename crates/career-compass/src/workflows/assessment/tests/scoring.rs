use super::common::*;
use crate::workflows::assessment::domain::AnswerRejection;
use crate::workflows::assessment::scoring::{RuleBook, ScoringEngine, SkipReason};
use crate::workflows::assessment::{Answer, AnswerKind, QuestionCatalog};

const PENALTY_REASON: &str =
    "Most data analyst roles sit in metro offices, so plan for relocation or remote work";

#[test]
fn analytical_work_style_credits_analysts_developers_and_doctors() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let board = ScoringEngine::new(&catalog, &rules).score(
        &[choice("work_style", "analytical_problem_solving")],
        None,
    );

    assert_close(board.score_of("data-analyst"), 20.0);
    assert_close(board.score_of("software-developer"), 18.0);
    assert_close(board.score_of("doctor"), 10.0);
    assert_close(board.score_of("graphic-designer"), 0.0);
    assert_eq!(
        board.tally("data-analyst").map(|tally| tally.reasons.clone()),
        Some(vec!["Data analysis is analytical work".to_string()])
    );
    assert!(board.skipped().is_empty());
}

#[test]
fn scale_weights_multiply_the_rating_and_render_it_into_reasons() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let board = ScoringEngine::new(&catalog, &rules)
        .score(&[rating("technology_interest", 4)], None);

    assert_close(board.score_of("software-developer"), 16.0);
    assert_close(board.score_of("data-analyst"), 12.8);
    assert_close(board.score_of("digital-marketer"), 9.6);
    assert_eq!(
        board
            .tally("software-developer")
            .map(|tally| tally.reasons[0].as_str()),
        Some("Strong interest in technology (4/5)")
    );
}

#[test]
fn reasons_accumulate_in_response_order() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let board = ScoringEngine::new(&catalog, &rules).score(
        &[
            choice("work_environment", "people_teams"),
            choice("work_style", "structured_organized"),
            rating("education_interest", 3),
        ],
        None,
    );

    let teacher = board.tally("teacher").expect("teacher registered");
    assert_close(teacher.score, 15.0 + 15.0 + 12.0);
    assert_eq!(
        teacher.reasons,
        vec![
            "You enjoy working with people".to_string(),
            "Teaching requires structured curriculum".to_string(),
            "Strong education interest (3/5)".to_string(),
        ]
    );
}

#[test]
fn totals_do_not_depend_on_response_order() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let engine = ScoringEngine::new(&catalog, &rules);
    let forward = vec![
        choice("work_environment", "independent_creative"),
        rating("arts_interest", 5),
        rating("business_interest", 2),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let left = engine.score(&forward, None);
    let right = engine.score(&reversed, None);
    for tally in left.tallies() {
        assert_close(right.score_of(tally.candidate.as_str()), tally.score);
    }
}

#[test]
fn malformed_and_unknown_responses_are_skipped_not_fatal() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let board = ScoringEngine::new(&catalog, &rules).score(
        &[
            choice("favourite_colour", "blue"),
            rating("healthcare_interest", 9),
            response("work_style", Answer::Scale(3)),
            rating("healthcare_interest", 5),
        ],
        None,
    );

    assert_close(board.score_of("doctor"), 20.0);
    let reasons: Vec<_> = board
        .skipped()
        .iter()
        .map(|skipped| (skipped.question_id.as_str(), skipped.reason.clone()))
        .collect();
    assert_eq!(
        reasons,
        vec![
            ("favourite_colour", SkipReason::UnknownQuestion),
            (
                "healthcare_interest",
                SkipReason::MalformedAnswer {
                    rejection: AnswerRejection::ScaleOutOfBounds { value: 9 },
                },
            ),
            (
                "work_style",
                SkipReason::MalformedAnswer {
                    rejection: AnswerRejection::KindMismatch {
                        expected: AnswerKind::SingleChoice,
                    },
                },
            ),
        ]
    );
}

#[test]
fn responses_without_a_rule_are_recorded_as_unmatched() {
    let catalog = QuestionCatalog::standard();
    let mut rules = RuleBook::standard();
    rules
        .response_rules
        .retain(|rule| rule.question != "healthcare_interest");

    let board = ScoringEngine::new(&catalog, &rules)
        .score(&[rating("healthcare_interest", 5)], None);

    assert_close(board.score_of("doctor"), 0.0);
    assert_eq!(board.skipped().len(), 1);
    assert_eq!(board.skipped()[0].reason, SkipReason::NoMatchingRule);
}

#[test]
fn profile_boosts_apply_after_responses() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let mut profile = science_profile();
    profile.exam_preparation = vec!["NEET".to_string()];

    let board = ScoringEngine::new(&catalog, &rules)
        .score(&[rating("healthcare_interest", 4)], Some(&profile));

    assert_close(board.score_of("doctor"), 16.0 + 10.0 + 15.0);
    let doctor = board.tally("doctor").expect("doctor registered");
    assert_eq!(doctor.reasons[0], "Strong healthcare interest (4/5)");
    assert_eq!(doctor.reasons.len(), 3);
}

#[test]
fn tier3_penalty_lowers_data_analyst_once_and_respects_the_floor() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let engine = ScoringEngine::new(&catalog, &rules);
    let responses = vec![
        choice("work_environment", "data_analysis"),
        rating("technology_interest", 5),
    ];

    let baseline = engine.score(&responses, Some(&profile()));
    let penalized = engine.score(&responses, Some(&tier3_profile()));
    assert_close(baseline.score_of("data-analyst"), 36.0);
    assert_close(penalized.score_of("data-analyst"), 21.0);

    let reasons = &penalized
        .tally("data-analyst")
        .expect("analyst registered")
        .reasons;
    assert_eq!(
        reasons
            .iter()
            .filter(|reason| reason.as_str() == PENALTY_REASON)
            .count(),
        1
    );
    assert_eq!(reasons.last().map(String::as_str), Some(PENALTY_REASON));

    let floored = engine.score(
        &[choice("work_environment", "data_analysis")],
        Some(&tier3_profile()),
    );
    assert_close(floored.score_of("data-analyst"), 10.0);
}

#[test]
fn penalty_runs_after_boosts() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let mut profile = tier3_profile();
    profile.stream = science_profile().stream;

    let board = ScoringEngine::new(&catalog, &rules).score(
        &[choice("work_environment", "data_analysis")],
        Some(&profile),
    );

    // 20 + 5 science boost = 25, then max(25 - 15, 10)
    assert_close(board.score_of("data-analyst"), 10.0);
}

#[test]
fn penalty_skips_candidates_without_a_positive_score() {
    let catalog = QuestionCatalog::standard();
    let rules = RuleBook::standard();
    let board = ScoringEngine::new(&catalog, &rules)
        .score(&[rating("education_interest", 5)], Some(&tier3_profile()));

    let analyst = board.tally("data-analyst").expect("analyst registered");
    assert_close(analyst.score, 0.0);
    assert!(analyst.reasons.is_empty());
}
