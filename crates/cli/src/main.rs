use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use projection::algorithms::{
    AltP, Apop, ApopCfg, AvgP, Dykstra, Momentum, Optimizer, QPSolver, SolveOptions, SolveResult,
};
use projection::outer::OuterPolicy;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::fmt::SubscriberBuilder;

mod problem_file;
mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Run projection-based feasibility solvers on JSON problems")]
struct Cmd {
    /// Maximum log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve a problem file and write iterates plus provenance next to the output prefix
    Run(RunArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Solver {
    Altp,
    Avgp,
    Apop,
    Dyk,
    Qp,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Outer {
    Exact,
    Elra,
    Erandom,
    Subsample,
}

impl From<Outer> for OuterPolicy {
    fn from(o: Outer) -> Self {
        match o {
            Outer::Exact => OuterPolicy::Exact,
            Outer::Elra => OuterPolicy::Elra,
            Outer::Erandom => OuterPolicy::ERandom,
            Outer::Subsample => OuterPolicy::Subsample,
        }
    }
}

#[derive(clap::Args)]
struct RunArgs {
    /// Problem description (JSON)
    problem: PathBuf,
    /// Output prefix; `<prefix>_<timestamp>.json` is written
    output: PathBuf,
    solver: Solver,
    /// Label used in the output file and summary line (defaults to the solver)
    #[arg(long)]
    name: Option<String>,
    /// Outer-approximation policy (apop only)
    #[arg(long, value_enum, default_value_t = Outer::Exact)]
    outer: Outer,
    #[arg(long)]
    max_hyperplanes: Option<usize>,
    #[arg(long)]
    max_halfspaces: Option<usize>,
    /// Project the current iterate instead of the averaged projections (apop only)
    #[arg(long)]
    alt: bool,
    #[arg(long, default_value_t = 100)]
    max_iters: usize,
    #[arg(long)]
    do_all_iters: bool,
    /// Heavy-ball step: `--momentum ALPHA BETA`
    #[arg(long, num_args = 2, value_names = ["ALPHA", "BETA"])]
    momentum: Option<Vec<f64>>,
    #[arg(long, default_value_t = 1e-4)]
    atol: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Body of the output JSON.
#[derive(Serialize)]
struct RunRecord<'a> {
    it: Vec<Vec<f64>>,
    res: &'a [Vec<f64>],
    status: &'static str,
    problem: String,
    name: &'a str,
    solver: &'static str,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(cmd.log_level)
        .init();
    match cmd.action {
        Action::Run(args) => run(&args).map(|_| ()),
        Action::Report => report(),
    }
}

impl RunArgs {
    fn optimizer(&self) -> Box<dyn Optimizer> {
        match self.solver {
            Solver::Altp => Box::new(AltP),
            Solver::Avgp => Box::new(AvgP),
            Solver::Dyk => Box::new(Dykstra),
            Solver::Qp => Box::new(QPSolver::default()),
            Solver::Apop => Box::new(Apop::new(ApopCfg {
                policy: self.outer.into(),
                max_hyperplanes: self.max_hyperplanes,
                max_halfspaces: self.max_halfspaces,
                average: !self.alt,
            })),
        }
    }

    fn options(&self) -> Result<SolveOptions> {
        let momentum = match self.momentum.as_deref() {
            None => None,
            Some([alpha, beta]) => Some(Momentum {
                alpha: *alpha,
                beta: *beta,
            }),
            Some(other) => bail!("--momentum takes ALPHA BETA, got {} values", other.len()),
        };
        Ok(SolveOptions {
            initial_point: None,
            max_iters: self.max_iters,
            do_all_iters: self.do_all_iters,
            atol: self.atol,
            momentum,
            seed: self.seed,
        })
    }
}

/// Output path `<prefix>_<unix seconds>.json`; the prefix directory must already exist.
fn output_path(prefix: &Path, stamp: u64) -> Result<PathBuf> {
    let dir = match prefix.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let meta = fs::metadata(dir)
        .with_context(|| format!("output directory {} does not exist", dir.display()))?;
    if !meta.is_dir() {
        bail!("output directory {} is not a directory", dir.display());
    }
    if meta.permissions().readonly() {
        bail!("output directory {} is not writable", dir.display());
    }
    let Some(stem) = prefix.file_name() else {
        bail!("output prefix {} has no file name", prefix.display());
    };
    let mut name = stem.to_os_string();
    name.push(format!("_{stamp}.json"));
    Ok(dir.join(name))
}

/// `<n>` counts stored iterates, the initial point included.
fn summary_line(name: &str, result: &SolveResult) -> String {
    let last = result
        .residuals
        .last()
        .map_or(f64::NAN, |r| r.iter().sum::<f64>());
    format!(
        "{name} terminated after {} iterations; last residual {last:.5e}",
        result.iterates.len()
    )
}

fn run(args: &RunArgs) -> Result<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before 1970")?
        .as_secs();
    let out = output_path(&args.output, stamp)?;

    let optimizer = args.optimizer();
    let name = args.name.as_deref().unwrap_or(optimizer.name());
    tracing::info!(
        problem = %args.problem.display(),
        solver = optimizer.name(),
        name,
        "run"
    );
    let mut problem = problem_file::load(&args.problem)?;
    let options = args.options()?;
    let result = optimizer
        .solve(&mut problem, &options)
        .with_context(|| format!("{} failed", optimizer.name()))?;

    let record = RunRecord {
        it: result
            .iterates
            .iter()
            .map(|p| p.iter().copied().collect())
            .collect(),
        res: &result.residuals,
        status: result.status.as_str(),
        problem: args.problem.to_string_lossy().into_owned(),
        name,
        solver: optimizer.name(),
    };
    fs::write(&out, serde_json::to_vec(&record)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let payload = provenance::Payload::new(serde_json::json!({
        "solver": optimizer.name(),
        "problem": record.problem,
        "outer": format!("{:?}", args.outer).to_lowercase(),
        "max_hyperplanes": args.max_hyperplanes,
        "max_halfspaces": args.max_halfspaces,
        "alt": args.alt,
        "max_iters": args.max_iters,
        "do_all_iters": args.do_all_iters,
        "momentum": args.momentum,
        "atol": args.atol,
        "seed": args.seed,
    }));
    provenance::write_sidecar(&out, payload)?;

    println!("{}", summary_line(name, &result));
    Ok(out)
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": projection::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
