use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use cycbit_cycle_rs::pipeline;
use cycbit_cycle_rs::{Config, Engine, Predictor, Pwm, Retry, Variant};

#[derive(Parser)]
#[command(name = "cycbit")]
#[command(about = "Predict intrinsic DNA cyclizability along sequences", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every window of each FASTA sequence, one table per sequence
    Fasta(Run),

    /// Score a file with one raw sequence per line
    Txt(Run),
}

#[derive(Args)]
struct Run {
    /// Input file, optionally gzip/bgzf compressed
    #[arg(short = 'i', long, value_name = "FILE")]
    input: PathBuf,

    /// Prefix of the output files
    #[arg(short = 'o', long, value_name = "PREFIX")]
    output: PathBuf,

    /// Weights of the scoring model
    #[arg(short = 'm', long, value_name = "FILE")]
    model: PathBuf,

    /// Calibration variant: original or smooth
    #[arg(long, value_name = "VARIANT", default_value_t = Variant::Smooth)]
    variant: Variant,

    /// Number of chunks each sequence is split into
    #[arg(long, value_name = "INT", default_value_t = Config::DEFAULT_CHUNKS)]
    chunks: NonZeroUsize,

    /// Threads used to decode BGZF inputs and prepare the windows (default: 1)
    #[arg(short = 't', long, value_name = "INT")]
    threads: Option<NonZeroUsize>,

    /// Attempts per model call before giving up
    #[arg(long, value_name = "INT", default_value = "1")]
    retries: NonZeroUsize,

    /// Only report warnings and errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report chunk-level progress
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Run {
    fn log_level(&self) -> log::LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => log::LevelFilter::Warn,
            (_, true) => log::LevelFilter::Debug,
            _ => log::LevelFilter::Info,
        }
    }

    fn engine(&self) -> Result<Engine> {
        let mut config = Config::new(self.variant);
        config.set_chunks(self.chunks);

        let mut engine = Engine::new(config);
        if let Some(threads) = self.threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads.get())
                .build()?;
            engine = engine.with_thread_pool(pool);
        }
        Ok(engine)
    }

    fn predictor(&self) -> Result<Box<dyn Predictor>> {
        let pwm = Pwm::from_path(&self.model)
            .wrap_err_with(|| format!("Failed to load model {}", self.model.display()))?;
        if self.retries.get() > 1 {
            Ok(Box::new(Retry::new(pwm, self.retries)))
        } else {
            Ok(Box::new(pwm))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let run = match &cli.command {
        Commands::Fasta(run) | Commands::Txt(run) => run,
    };

    env_logger::Builder::new()
        .filter_level(run.log_level())
        .parse_default_env()
        .init();

    let mut engine = run.engine()?;
    let mut predictor = run.predictor()?;
    match &cli.command {
        Commands::Fasta(run) => {
            pipeline::predict_fasta(&run.input, &run.output, &mut engine, &mut *predictor)?;
        }
        Commands::Txt(run) => {
            pipeline::predict_lines(&run.input, &run.output, &mut engine, &mut *predictor)?;
        }
    }
    log::info!("Done");
    Ok(())
}
