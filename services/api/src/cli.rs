use crate::demo::{run_calculate, run_demo, CalculateArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use profile_matching::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Profile Matching",
    about = "Rank candidates against position target profiles with the gap-analysis method",
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
    /// Run one calculation against the dataset and print the ranking
    Calculate(CalculateArgs),
    /// Walk through the dataset, score every profiled position and explain the leaders
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
    /// Directory of CSV tables to load instead of the bundled sample
    #[arg(long)]
    pub(crate) dataset_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Calculate(args) => run_calculate(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_accepts_repeated_candidate_ids() {
        let cli = Cli::try_parse_from([
            "profile-matching-api",
            "calculate",
            "--position-id",
            "1",
            "--candidate-id",
            "3",
            "--candidate-id",
            "1",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Calculate(args)) => {
                assert_eq!(args.position_id, 1);
                assert_eq!(args.candidate_ids, vec![3, 1]);
                assert!(args.dataset_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["profile-matching-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
