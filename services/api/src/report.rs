use crate::infra::{load_engine, read_json};
use career_compass::config::AppConfig;
use career_compass::error::AppError;
use career_compass::workflows::assessment::{
    rank, recommend_stream, AssessmentEngine, QuestionView, Recommendation, Response,
    SkippedResponse, StreamPreferences, StudentProfile,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    /// Locale code for prompts and option labels (e.g. `hi`)
    #[arg(long)]
    pub(crate) locale: Option<String>,
    /// Print the questionnaire as JSON instead of a readable listing
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// JSON file holding `responses` and an optional `profile`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Args, Debug)]
pub(crate) struct StreamArgs {
    /// Comfort with mathematics (1-5)
    #[arg(long)]
    pub(crate) math: u8,
    /// Interest in science (1-5)
    #[arg(long)]
    pub(crate) science: u8,
    /// Interest in business (1-5)
    #[arg(long)]
    pub(crate) business: u8,
    /// Interest in art (1-5)
    #[arg(long)]
    pub(crate) art: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Offline answers replayed through the engine.
#[derive(Debug, Deserialize)]
pub(crate) struct RecommendInput {
    #[serde(default)]
    pub(crate) responses: Vec<Response>,
    #[serde(default)]
    pub(crate) profile: Option<StudentProfile>,
}

#[derive(Debug, Serialize)]
struct RecommendOutput<'a> {
    recommendations: &'a [Recommendation],
    skipped: &'a [SkippedResponse],
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    rank: usize,
    candidate: &'a str,
    match_score: u8,
    reasons: String,
}

fn configured_engine() -> Result<AssessmentEngine, AppError> {
    let config = AppConfig::load()?;
    load_engine(&config.engine)
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let views = engine.question_views(args.locale.as_deref());
    let stdout = std::io::stdout();
    write_questions(stdout.lock(), &views, args.json)
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let engine = configured_engine()?;
    let input: RecommendInput = read_json(&args.input)?;
    let stdout = std::io::stdout();
    write_recommendations(stdout.lock(), &engine, input, args.format)
}

pub(crate) fn run_stream(args: StreamArgs) -> Result<(), AppError> {
    let preferences = StreamPreferences {
        math_comfort: args.math,
        science_interest: args.science,
        business_interest: args.business,
        art_interest: args.art,
    };
    let advice = recommend_stream(&preferences)?;

    println!("Recommended stream: {}", advice.recommended.label());
    for entry in &advice.scores {
        println!("  - {}: {}", entry.stream.label(), entry.score);
    }
    Ok(())
}

pub(crate) fn write_questions<W: Write>(
    mut out: W,
    views: &[QuestionView],
    as_json: bool,
) -> Result<(), AppError> {
    if as_json {
        let json = serde_json::to_string_pretty(views).map_err(std::io::Error::from)?;
        writeln!(out, "{json}")?;
        return Ok(());
    }

    for (index, view) in views.iter().enumerate() {
        let marker = if view.conditional { " (conditional)" } else { "" };
        writeln!(out, "{}. [{}] {}{}", index + 1, view.id, view.prompt, marker)?;
        for option in &view.options {
            writeln!(out, "     - {}: {}", option.key, option.label)?;
        }
        if let Some(scale) = &view.scale {
            writeln!(out, "     rate {} to {}", scale.min, scale.max)?;
        }
    }
    Ok(())
}

pub(crate) fn write_recommendations<W: Write>(
    mut out: W,
    engine: &AssessmentEngine,
    input: RecommendInput,
    format: OutputFormat,
) -> Result<(), AppError> {
    let responses = engine.resolve_labels(input.responses);
    let board = engine.score(&responses, input.profile.as_ref());
    let recommendations = rank(&board, engine.ranking());

    match format {
        OutputFormat::Text => {
            render_recommendations(&mut out, &recommendations)?;
            for skipped in board.skipped() {
                writeln!(out, "Skipped '{}': {:?}", skipped.question_id, skipped.reason)?;
            }
        }
        OutputFormat::Json => {
            let payload = RecommendOutput {
                recommendations: &recommendations,
                skipped: board.skipped(),
            };
            let json = serde_json::to_string_pretty(&payload).map_err(std::io::Error::from)?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for (index, recommendation) in recommendations.iter().enumerate() {
                writer
                    .serialize(CsvRow {
                        rank: index + 1,
                        candidate: recommendation.candidate.as_str(),
                        match_score: recommendation.match_score,
                        reasons: recommendation.reasons.join("; "),
                    })
                    .map_err(std::io::Error::from)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

pub(crate) fn render_recommendations<W: Write>(
    out: &mut W,
    recommendations: &[Recommendation],
) -> Result<(), AppError> {
    if recommendations.is_empty() {
        writeln!(out, "No recommendations yet. Answer more questions to see matches.")?;
        return Ok(());
    }

    for (index, recommendation) in recommendations.iter().enumerate() {
        writeln!(
            out,
            "{}. {} ({}% match)",
            index + 1,
            recommendation.candidate,
            recommendation.match_score
        )?;
        for reason in &recommendation.reasons {
            writeln!(out, "     - {reason}")?;
        }
    }
    Ok(())
}
