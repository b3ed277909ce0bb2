use crate::demo::{run_demo, DemoArgs};
use crate::report::{
    run_questions, run_recommend, run_stream, QuestionsArgs, RecommendArgs, StreamArgs,
};
use crate::server;
use career_compass::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Career Compass",
    about = "Run the career assessment service or explore it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the questionnaire, optionally localized
    Questions(QuestionsArgs),
    /// Score a saved set of answers and print the ranked careers
    Recommend(RecommendArgs),
    /// Suggest a Class 11 stream from four self-ratings
    Stream(StreamArgs),
    /// Walk a scripted student through branching, back navigation, and profile scoring
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Questions(args) => run_questions(args),
        Command::Recommend(args) => run_recommend(args),
        Command::Stream(args) => run_stream(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["career-compass"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn recommend_accepts_a_format() {
        let cli = Cli::try_parse_from([
            "career-compass",
            "recommend",
            "--input",
            "answers.json",
            "--format",
            "csv",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Recommend(args)) => assert_eq!(args.format, OutputFormat::Csv),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn stream_requires_all_four_ratings() {
        assert!(Cli::try_parse_from(["career-compass", "stream", "--math", "4"]).is_err());
    }
}
