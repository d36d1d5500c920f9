use crate::estimate::{run_estimate, EstimateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use care_cost::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Care Cost Estimator",
    about = "Serve or run tier-based senior care cost estimates from the command line",
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
    /// Estimate monthly cost for a saved assessment outcome
    Estimate(EstimateArgs),
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
        Command::Estimate(args) => run_estimate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_arguments_parse() {
        let cli = Cli::try_parse_from([
            "care-cost-api",
            "estimate",
            "assessment.json",
            "--state",
            "TX",
            "--compare",
            "assisted_living,memory_care",
            "--as-of",
            "2026-10-01",
            "--audience",
            "family",
        ])
        .expect("arguments parse");

        let Some(Command::Estimate(args)) = cli.command else {
            panic!("expected estimate command");
        };
        assert_eq!(args.state.as_deref(), Some("TX"));
        assert_eq!(
            args.compare,
            vec![
                care_cost::estimation::CareType::AssistedLiving,
                care_cost::estimation::CareType::MemoryCare
            ]
        );
        assert!(args.as_of.is_some());
        assert_eq!(args.audience, care_cost::estimation::explanations::Audience::Family);
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["care-cost-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
