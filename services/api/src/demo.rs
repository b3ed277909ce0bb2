use crate::infra::InMemorySessionStore;
use crate::report::render_recommendations;
use career_compass::error::AppError;
use career_compass::workflows::assessment::{
    Answer, AssessmentEngine, AssessmentService, BackOutcome, CityTier, EducationStage,
    Recommendation, SessionServiceError, SessionSnapshot, SessionStatus, StudentProfile,
};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Locale code for the printed prompts (e.g. `hi`)
    #[arg(long)]
    pub(crate) locale: Option<String>,
    /// Skip the profile step that shows the city-tier adjustment.
    #[arg(long)]
    pub(crate) skip_profile: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = Arc::new(AssessmentEngine::standard());
    let store = Arc::new(InMemorySessionStore::default());
    let service = AssessmentService::new(engine, store);

    println!("Career assessment demo");
    if let Err(err) = walkthrough(&service, &args) {
        println!("  Demo halted: {err}");
    }
    Ok(())
}

fn walkthrough(
    service: &AssessmentService<InMemorySessionStore>,
    args: &DemoArgs,
) -> Result<(), SessionServiceError> {
    let locale = args.locale.as_deref();
    let mut snapshot = opening_snapshot(service, locale)?;
    let id = snapshot.session_id.clone();
    println!("- Started session {id}");

    snapshot = answer(service, &snapshot, Answer::choice("data_analysis"), locale)?;
    snapshot = answer(service, &snapshot, Answer::choice("analytical_problem_solving"), locale)?;
    println!(
        "  Branch opened: {} questions are now in the flow",
        snapshot.progress.total
    );

    println!("\nBack navigation");
    match service.back(&id, snapshot.revision)? {
        BackOutcome::Exit => println!("  Already at the first question"),
        BackOutcome::Previous(previous) => {
            let prefill = previous
                .previous_answer
                .as_ref()
                .and_then(Answer::choice_key)
                .unwrap_or("none");
            println!(
                "  Returned to question {} of {} with '{}' prefilled",
                previous.progress.position, previous.progress.total, prefill
            );
            snapshot = answer(service, &previous, Answer::choice("creative_artistic"), locale)?;
            println!(
                "  Changed the answer: the flow now shows {} questions",
                snapshot.progress.total
            );
        }
    }

    while snapshot.status == SessionStatus::InProgress {
        let Some(question) = snapshot.question.as_ref() else {
            break;
        };
        let scripted = scripted_answer(&question.id);
        snapshot = answer(service, &snapshot, scripted, locale)?;
    }
    println!(
        "\nCompleted after {} answers ({}% complete)",
        snapshot.answered, snapshot.percent_complete
    );

    println!("Top matches");
    print_matches(&service.recommendations(&id)?);

    if args.skip_profile {
        return Ok(());
    }

    let mut profile = StudentProfile::new(EducationStage::College);
    profile.city_tier = Some(CityTier::Tier3);
    profile.languages = vec!["Hindi".to_string()];
    let snapshot = service.attach_profile(&id, snapshot.revision, profile)?;
    println!(
        "\nWith a {} profile attached (revision {})",
        CityTier::Tier3.label(),
        snapshot.revision
    );
    print_matches(&service.recommendations(&id)?);

    Ok(())
}

fn opening_snapshot(
    service: &AssessmentService<InMemorySessionStore>,
    locale: Option<&str>,
) -> Result<SessionSnapshot, SessionServiceError> {
    let started = service.start(None)?;
    match locale {
        Some(_) => service.current(&started.session_id, locale),
        None => Ok(started),
    }
}

fn answer(
    service: &AssessmentService<InMemorySessionStore>,
    current: &SessionSnapshot,
    answer: Answer,
    locale: Option<&str>,
) -> Result<SessionSnapshot, SessionServiceError> {
    if let Some(question) = &current.question {
        println!(
            "  [{}/{}] {} -> {}",
            current.progress.position,
            current.progress.total,
            question.prompt,
            describe(&answer)
        );
    }
    let next = service.answer(&current.session_id, current.revision, answer)?;
    match locale {
        Some(_) => service.current(&next.session_id, locale),
        None => Ok(next),
    }
}

fn describe(answer: &Answer) -> String {
    match answer {
        Answer::Scale(value) => format!("{value}/5"),
        Answer::Choice(key) => key.clone(),
    }
}

/// Fixed answers for a visual, data-curious student.
fn scripted_answer(question_id: &str) -> Answer {
    match question_id {
        "creative_medium" => Answer::choice("visual_design"),
        "technology_interest" => Answer::Scale(4),
        "arts_interest" => Answer::Scale(5),
        "business_interest" => Answer::Scale(2),
        "healthcare_interest" => Answer::Scale(1),
        "education_interest" => Answer::Scale(3),
        _ => Answer::Scale(3),
    }
}

fn print_matches(recommendations: &[Recommendation]) {
    let mut buffer = Vec::new();
    match render_recommendations(&mut buffer, recommendations) {
        Ok(()) => print!("{}", String::from_utf8_lossy(&buffer)),
        Err(err) => println!("  Recommendations unavailable: {err}"),
    }
}
