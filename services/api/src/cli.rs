use crate::render::{render_analytics, render_residency};
use crate::server;
use clap::{Args, Parser, Subcommand};
use cohort_insight::analytics::AnalyticsFacade;
use cohort_insight::config::AppConfig;
use cohort_insight::dataset::{DatasetLoader, DatasetSnapshot, TabularDataset};
use cohort_insight::error::AppError;
use cohort_insight::residency::ResidencyArchive;
use cohort_insight::telemetry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "Cohort Insight",
    about = "Serve and query student cohort analytics from the command line",
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
    /// Run a single analytics query against the configured exports
    Query(QueryArgs),
    /// Summarize a residency placement roster
    Residency(ResidencyArgs),
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

#[derive(Args, Debug)]
pub(crate) struct QueryArgs {
    /// Student identifier to look up
    #[arg(long)]
    pub(crate) student_id: String,
    /// Query mode: search, distance or need
    #[arg(long, default_value = "search")]
    pub(crate) mode: String,
    /// Target rank (distance) or target percentage (need)
    #[arg(long)]
    pub(crate) target: Option<String>,
    /// Scores CSV export (defaults to APP_SCORES_PATH)
    #[arg(long)]
    pub(crate) scores_csv: Option<PathBuf>,
    /// Ranks CSV export (defaults to APP_RANKS_PATH)
    #[arg(long)]
    pub(crate) ranks_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ResidencyArgs {
    /// Roster year (falls back to the default year when unknown)
    #[arg(long)]
    pub(crate) year: Option<String>,
    /// Directory of `<year>.csv` rosters (defaults to APP_RESIDENCY_DIR)
    #[arg(long)]
    pub(crate) residency_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Query(args) => run_query(args),
        Command::Residency(args) => run_residency(args),
    }
}

fn run_query(args: QueryArgs) -> Result<(), AppError> {
    let QueryArgs {
        student_id,
        mode,
        target,
        scores_csv,
        ranks_csv,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let id_column = config.data.id_column.as_str();

    let scores_path = scores_csv.unwrap_or_else(|| config.data.scores_path.clone());
    let scores = DatasetLoader::from_path(&scores_path, id_column)?;

    let ranks_path = ranks_csv.unwrap_or_else(|| config.data.ranks_path.clone());
    let ranks = load_rank_history(&ranks_path, id_column);

    let snapshot = DatasetSnapshot::new(scores, ranks, ResidencyArchive::default());
    let facade = AnalyticsFacade::new(Arc::new(snapshot), config.grading);
    let result = facade.query(&student_id, &mode, target.as_deref());

    print!("{}", render_analytics(&student_id, &mode, result.as_ref()));
    Ok(())
}

/// Rank history is optional for a query; an unreadable export only drops the
/// trajectory.
fn load_rank_history(path: &Path, id_column: &str) -> TabularDataset {
    DatasetLoader::from_path(path, id_column).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "rank history unavailable; trajectory omitted");
        TabularDataset::empty(id_column)
    })
}

fn run_residency(args: ResidencyArgs) -> Result<(), AppError> {
    let dir = match args.residency_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.data.residency_dir,
    };

    let archive = ResidencyArchive::load_dir(&dir);
    let summary = archive.summary(args.year.as_deref());

    print!("{}", render_residency(&summary));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_rank_history_degrades_to_empty_table() {
        let ranks = load_rank_history(Path::new("./missing/ranks.csv"), "ID");
        assert!(ranks.is_empty());
        assert_eq!(ranks.id_column(), "ID");
    }

    #[test]
    fn query_arguments_default_to_search() {
        let cli = Cli::try_parse_from(["cohort-insight", "query", "--student-id", "007"])
            .expect("arguments parse");
        match cli.command {
            Some(Command::Query(args)) => {
                assert_eq!(args.student_id, "007");
                assert_eq!(args.mode, "search");
                assert!(args.target.is_none());
            }
            other => panic!("expected query command, got {other:?}"),
        }
    }
}
