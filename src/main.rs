//! Life Grid CLI - run a Game of Life board file across worker threads.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use life_grid::{
    LifeError,
    compute::{Board, Coordinator, GenerationObserver},
    display::{TerminalRenderer, summary_line, worker_lines},
    schema::{DEFAULT_WORKERS, EngineKind, RunConfig, Seed},
};

#[derive(Parser, Debug)]
#[command(
    name = "life-grid",
    version,
    about = "Simulate Conway's Game of Life on a toroidal grid with parallel row workers"
)]
struct Cli {
    /// Board file: `rows cols generations pairs` followed by `col row` pairs.
    #[arg(short = 'c', value_name = "PATH")]
    config: PathBuf,

    /// Render the board after every generation.
    #[arg(short = 'v')]
    verbose: bool,

    /// Number of worker threads (1 to the board's row count).
    #[arg(short = 't', value_name = "N", default_value_t = DEFAULT_WORKERS)]
    threads: usize,

    /// Print each worker's row range after the run.
    #[arg(short = 'p', conflicts_with = "json")]
    print_partition: bool,

    /// Pause between rendered generations, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 100)]
    delay_ms: u64,

    /// Scheduling engine.
    #[arg(long, value_enum, default_value_t = Engine::Threads)]
    engine: Engine,

    /// Print the run report as JSON (including row ranges) instead of the summary line.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Engine {
    Threads,
    Rayon,
}

impl From<Engine> for EngineKind {
    fn from(engine: Engine) -> Self {
        match engine {
            Engine::Threads => EngineKind::Threads,
            Engine::Rayon => EngineKind::Rayon,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(parse_exit_code(&err));
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

/// Help and version requests exit 0; every usage error exits 1.
fn parse_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

fn run(cli: &Cli) -> Result<(), LifeError> {
    let seed = Seed::from_path(&cli.config)?;
    let config = RunConfig::new(seed.specs, cli.threads).with_engine(cli.engine.into());
    let coordinator = Coordinator::new(config)?;
    let board = Board::from_seed(&seed)?;

    let renderer = cli
        .verbose
        .then(|| TerminalRenderer::stdout(Duration::from_millis(cli.delay_ms)));
    let observer = renderer.as_ref().map(|r| r as &dyn GenerationObserver);

    let report = coordinator.run(&board, observer)?;

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => log::error!("Failed to serialize report: {}", err),
        }
        return Ok(());
    }

    if cli.print_partition {
        if report.worker_stats.is_empty() {
            println!("Row ranges are not fixed under the rayon engine");
        }
        for line in worker_lines(&report) {
            println!("{}", line);
        }
    }
    println!("{}", summary_line(&report));
    Ok(())
}
