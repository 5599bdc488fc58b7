use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use kmeanspp::utilities::{
    KmeansError, KmeansOptions, elbow_curve, error::ERR_MSG_DEFAULT, find_elbow,
    parse::read_csv_files, run_pipeline,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "k-means++ seeding and Lloyd refinement over two keyed CSV files",
    long_about = None
)]
struct Cli {
    /// k [max_iter] eps file_1 file_2  (with --elbow: file_1 file_2)
    #[arg(num_args = 2..=5, required = true, allow_negative_numbers = true)]
    args: Vec<String>,

    /// RNG seed for k-means++
    #[arg(long, env = "KMEANSPP_SEED")]
    seed: Option<u64>,

    /// JSON file with {k, max_iter, eps, seed}; positional values win
    #[arg(long, env = "KMEANSPP_CONFIG")]
    config: Option<PathBuf>,

    /// Print k,inertia for k = 1..=MAX_K instead of clustering
    #[arg(long, value_name = "MAX_K")]
    elbow: Option<usize>,

    /// Worker threads for --elbow
    #[arg(long, default_value_t = 1)]
    cores: usize,

    /// Log format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "RUST_LOG_FORMAT")]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(_) => {
            println!("{ERR_MSG_DEFAULT}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.log_format);

    match run(&cli) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run failed");
            for line in e.user_messages() {
                println!("{line}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries only the result.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

fn run(cli: &Cli) -> Result<String, KmeansError> {
    let mut options = load_options(cli)?;

    if let Some(max_k) = cli.elbow {
        let [file_1, file_2] = &cli.args[cli.args.len() - 2..] else {
            return Err(KmeansError::InvalidArguments("expected two files".into()));
        };
        let dataset = read_csv_files(file_1, file_2)?;
        let curve = elbow_curve(&dataset, max_k, &options, cli.cores)
            .ok_or_else(|| KmeansError::InvalidArguments("cannot build thread pool".into()))?;
        let mut out = String::new();
        for (k, inertia) in &curve {
            out.push_str(&format!("{k},{inertia:.4}\n"));
        }
        if let Some(k) = find_elbow(&curve) {
            info!(k, "elbow");
            out.push_str(&format!("elbow,{k}\n"));
        }
        return Ok(out);
    }

    let (file_1, file_2) = match cli.args.as_slice() {
        [k, eps, f1, f2] => {
            options.k = parse_count(k)?;
            options.eps = parse_eps(eps)?;
            (f1, f2)
        }
        [k, max_iter, eps, f1, f2] => {
            options.k = parse_count(k)?;
            options.max_iter = parse_count(max_iter)?;
            options.eps = parse_eps(eps)?;
            (f1, f2)
        }
        other => {
            return Err(KmeansError::InvalidArguments(format!(
                "expected 4 or 5 arguments, got {}",
                other.len()
            )));
        }
    };

    let dataset = read_csv_files(file_1, file_2)?;
    info!(
        rows = dataset.len(),
        dim = dataset.dim(),
        k = options.k,
        max_iter = options.max_iter,
        "dataset loaded"
    );
    run_pipeline(&dataset, &options).map(|out| out.render())
}

fn load_options(cli: &Cli) -> Result<KmeansOptions, KmeansError> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| KmeansError::InvalidArguments(format!("{}: {e}", path.display())))?;
            KmeansOptions::from_json(&text)
                .map_err(|e| KmeansError::InvalidArguments(e.to_string()))?
        }
        None => KmeansOptions::default(),
    };
    if let Some(seed) = cli.seed {
        options.seed = seed;
    }
    Ok(options)
}

/// Negative counts become 0 so they fail validation like any other bad count.
fn parse_count(s: &str) -> Result<usize, KmeansError> {
    let v: i64 = s
        .trim()
        .parse()
        .map_err(|_| KmeansError::InvalidArguments(format!("not an integer: {s}")))?;
    Ok(usize::try_from(v).unwrap_or(0))
}

fn parse_eps(s: &str) -> Result<f64, KmeansError> {
    s.trim()
        .parse()
        .map_err(|_| KmeansError::InvalidArguments(format!("not a number: {s}")))
}
