//! CLI entry point for the GPA rater.
//!
//! Provides subcommands for evaluating a course list under a calculator
//! profile, writing a markdown report, converting percentages, and
//! projecting the GPA needed to reach a target.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use gpa_rater::engine::calculator::{Evaluation, GpaCalculator};
use gpa_rater::engine::planner::required_gpa;
use gpa_rater::engine::scale::bandify;
use gpa_rater::engine::types::{Baseline, SemesterPlan};
use gpa_rater::engine::utility::{display_credits, display_gpa, round2};
use gpa_rater::output::{SummaryRecord, append_summary, print_pretty, to_json};
use gpa_rater::parser::load_courses;
use gpa_rater::profile::{CalculatorProfile, ProfileCatalog};
use gpa_rater::report::build_report;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gpa_rater")]
#[command(about = "Multi-scale GPA calculator", long_about = None)]
struct Cli {
    /// Extra profile definitions (JSON); defaults to $GPA_PROFILES_PATH
    #[arg(long, global = true)]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CourseInput {
    /// Course list CSV (semester,name,grade,credits,category,excluded)
    #[arg(short, long)]
    courses: PathBuf,

    /// Calculator profile to apply
    #[arg(short, long, default_value = "standard")]
    profile: String,

    /// GPA already earned before these courses
    #[arg(long, requires = "prior_credits")]
    prior_gpa: Option<f64>,

    /// Credits behind --prior-gpa
    #[arg(long, requires = "prior_gpa")]
    prior_credits: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute semester, cumulative and sub-GPAs for a course list
    Calculate {
        #[command(flatten)]
        input: CourseInput,

        /// Print the full evaluation as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a one-line summary to
        #[arg(long)]
        summary_csv: Option<PathBuf>,
    },
    /// Write a markdown report for a course list
    Report {
        #[command(flatten)]
        input: CourseInput,

        #[arg(short, long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List available calculator profiles
    Profiles,
    /// Convert a percentage into a letter grade and points
    Bandify {
        percentage: f64,

        #[arg(short, long, default_value = "percentage")]
        profile: String,
    },
    /// GPA needed over upcoming credits to reach a target
    Target {
        #[arg(long)]
        current_gpa: f64,
        #[arg(long)]
        current_credits: f64,
        #[arg(long)]
        target_gpa: f64,
        #[arg(long)]
        upcoming_credits: f64,
        #[arg(short, long, default_value = "standard")]
        profile: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gpa_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gpa_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.profiles.as_deref())?;

    match cli.command {
        Commands::Calculate {
            input,
            json,
            summary_csv,
        } => {
            let profile = catalog.get(&input.profile)?;
            let (_, evaluation) = calculate(profile, &input)?;
            print_pretty(&evaluation);

            if json {
                println!("{}", to_json(&evaluation)?);
            } else {
                print_evaluation(&evaluation);
            }

            if let Some(path) = summary_csv {
                let record = SummaryRecord::from_evaluation(&evaluation, Utc::now());
                append_summary(&path, &record)?;
                info!(path = %path.display(), "Summary appended");
            }
        }
        Commands::Report { input, out } => {
            let profile = catalog.get(&input.profile)?;
            let (plan, evaluation) = calculate(profile, &input)?;
            let report = build_report(profile, &evaluation, &plan, Utc::now());

            std::fs::write(&out, report)
                .with_context(|| format!("failed to write report to {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Profiles => {
            for profile in catalog.iter() {
                println!(
                    "- {} ({} scale, {:?} policy): {}",
                    profile.name,
                    profile.scale_table().name,
                    profile.policy,
                    profile.description
                );
            }
        }
        Commands::Bandify {
            percentage,
            profile,
        } => {
            let scale = catalog.get(&profile)?.scale_table();
            match bandify(percentage) {
                Some(letter) => println!(
                    "{percentage}% -> {letter} ({:.2} points on the {} scale)",
                    scale.points_for(letter),
                    scale.name
                ),
                None => println!("{percentage}% is outside 0-100."),
            }
        }
        Commands::Target {
            current_gpa,
            current_credits,
            target_gpa,
            upcoming_credits,
            profile,
        } => {
            let max_points = catalog.get(&profile)?.max_points();
            match required_gpa(
                current_gpa,
                current_credits,
                target_gpa,
                upcoming_credits,
                max_points,
            ) {
                Some(outlook) if outlook.already_secured => println!(
                    "Target {target_gpa:.2} is already secured over {} credits.",
                    display_credits(outlook.resulting_credits)
                ),
                Some(outlook) if outlook.achievable => println!(
                    "Need a {:.2} average over the next {} credits.",
                    round2(outlook.required_gpa),
                    display_credits(upcoming_credits)
                ),
                Some(outlook) => println!(
                    "Not reachable: would need {:.2}, above the {:.2} maximum.",
                    round2(outlook.required_gpa),
                    max_points
                ),
                None => println!("Inputs are out of range for this scale."),
            }
        }
    }

    Ok(())
}

/// Built-in profiles, overridden by `--profiles` or `$GPA_PROFILES_PATH`.
fn load_catalog(path: Option<&Path>) -> Result<ProfileCatalog> {
    let mut catalog = ProfileCatalog::builtin()?;

    let extra = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("GPA_PROFILES_PATH").map(PathBuf::from));
    if let Some(extra) = extra {
        catalog.merge(ProfileCatalog::load(&extra)?);
    }

    Ok(catalog)
}

fn baseline(input: &CourseInput) -> Option<Baseline> {
    let (Some(gpa), Some(credits)) = (input.prior_gpa, input.prior_credits) else {
        return None;
    };
    let baseline = Baseline::new(gpa, credits);
    if !baseline.is_valid() {
        warn!(
            prior_gpa = gpa,
            prior_credits = credits,
            "Prior GPA must be 0-4.0 with positive credits; ignoring it"
        );
    }
    Some(baseline)
}

#[tracing::instrument(skip(profile, input), fields(profile = %profile.name, courses = %input.courses.display()))]
fn calculate(profile: &CalculatorProfile, input: &CourseInput) -> Result<(SemesterPlan, Evaluation)> {
    let plan = load_courses(&input.courses)?;
    let evaluation =
        GpaCalculator::new(profile.clone()).evaluate(&plan, baseline(input).as_ref());
    Ok((plan, evaluation))
}

fn print_evaluation(evaluation: &Evaluation) {
    let overall = &evaluation.overall;
    println!(
        "Overall GPA ({}): {} over {} credits",
        evaluation.profile,
        display_gpa(overall.gpa),
        display_credits(overall.total_credits)
    );
    if let Some(science) = evaluation.science_gpa() {
        println!("Science GPA: {:.2}", round2(science));
    }
    for outcome in &evaluation.semesters {
        println!(
            "- {}: term {} | cumulative {}{}",
            outcome.label,
            display_gpa(outcome.term.gpa),
            display_gpa(outcome.cumulative.gpa),
            if outcome.deans_list { " | Dean's List" } else { "" }
        );
    }
    for classification in &evaluation.classifications {
        println!("{}: {}", classification.kind.title(), classification.label);
    }
    if overall.skipped_courses > 0 {
        println!("{} row(s) not counted.", overall.skipped_courses);
    }
}
