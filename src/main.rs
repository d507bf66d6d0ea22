use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use harvest_planner::infra::{PlanFile, PlannerParams, Snapshot};
use harvest_planner::planners::strips::{
    DEFAULT_MAX_EXPANSIONS, DEFAULT_TIMEOUT_MS, Heuristic, Planner, PlannerConfig,
};
use harvest_planner::state::GameState;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const GENERATED_WIDTH: i32 = 16;
const GENERATED_HEIGHT: i32 = 16;

fn get_env_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.parse::<T>().ok())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("harvest_planner=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let params = PlannerParams::parse(&args)?;

    let scenario_path = env::var("PLANNER_SCENARIO").ok();
    let seed = get_env_var::<u64>("PLANNER_SEED").unwrap_or(0);
    let plan_folder = env::var("PLANNER_PLAN_FOLDER").unwrap_or_else(|_| "saves".to_string());
    let heuristic = match env::var("PLANNER_HEURISTIC") {
        Ok(value) => value.parse::<Heuristic>()?,
        Err(_) => Heuristic::default(),
    };
    let config = PlannerConfig {
        max_expansions: get_env_var("PLANNER_MAX_EXPANSIONS").unwrap_or(DEFAULT_MAX_EXPANSIONS),
        timeout: Duration::from_millis(
            get_env_var("PLANNER_TIMEOUT_MS").unwrap_or(DEFAULT_TIMEOUT_MS),
        ),
        heuristic,
    };

    tracing::info!(
        required_wood = params.required_wood,
        required_gold = params.required_gold,
        build_peasants = params.build_peasants,
        max_expansions = config.max_expansions,
        timeout_ms = config.timeout.as_millis() as u64,
        heuristic = %config.heuristic,
        "Planner configured"
    );

    let snapshot = match &scenario_path {
        Some(path) => {
            tracing::info!("Loading scenario from {}", path);
            Snapshot::load(path)?
        }
        None => {
            tracing::info!("Generating scenario with seed {}", seed);
            Snapshot::generate(seed, GENERATED_WIDTH, GENERATED_HEIGHT)
        }
    };

    let root = GameState::from_snapshot(&snapshot, params)?;
    let plan = tokio::task::spawn_blocking(move || Planner::new(config).plan(root)).await??;

    tracing::info!(
        actions = plan.len(),
        cost = plan.cost,
        expanded = plan.expanded,
        "Plan found"
    );
    for action in &plan.actions {
        tracing::info!("{}", action);
    }

    PlanFile::write(&plan_folder, &plan)?;

    Ok(())
}
