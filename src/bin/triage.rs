//! Triage CLI - Command-line interface for Scholar Triage
//!
//! Commands:
//! - assess: Score a student record and emit a report payload
//! - simulate: Re-score a record under what-if interventions
//! - validate: Validate a record against a feature schema
//! - schema: Print feature schema information

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use scholar_triage::classifier::{LexiconModel, LogisticModel};
use scholar_triage::features::FeatureEngineer;
use scholar_triage::pipeline::AssessmentEngine;
use scholar_triage::recommend::ActionPlan;
use scholar_triage::report::ReportEncoder;
use scholar_triage::schema::{FeatureSchema, SCHEMA_VERSION};
use scholar_triage::scorer::{DriverThresholds, RiskBands, RiskScorer};
use scholar_triage::simulate::Intervention;
use scholar_triage::types::RawStudentRecord;
use scholar_triage::{ScoreError, ENGINE_VERSION};

/// Triage - Deterministic risk scoring engine for student wellbeing signals
#[derive(Parser)]
#[command(name = "triage")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score student records into risk reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a student record and emit a report payload
    Assess {
        /// Record JSON file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Lexicon text model parameters (JSON); built-in model when omitted
        #[arg(long)]
        text_model: Option<PathBuf>,

        /// Logistic tabular model parameters (JSON); reference model when omitted
        #[arg(long)]
        tabular_model: Option<PathBuf>,

        /// Feature schema as a JSON array of names; training default when omitted
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Probability floor for the MEDIUM tier
        #[arg(long, default_value = "0.3")]
        medium_floor: f64,

        /// Probability floor for the HIGH tier
        #[arg(long, default_value = "0.5")]
        high_floor: f64,

        /// Include the standard what-if simulations in the report
        #[arg(long)]
        simulate: bool,

        /// Include the four-week action plan in the report
        #[arg(long)]
        include_plan: bool,
    },

    /// Re-score a record under interventions given as JSON
    Simulate {
        /// Record JSON file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Interventions JSON file; standard set when omitted
        #[arg(long)]
        interventions: Option<PathBuf>,

        /// Lexicon text model parameters (JSON)
        #[arg(long)]
        text_model: Option<PathBuf>,

        /// Logistic tabular model parameters (JSON)
        #[arg(long)]
        tabular_model: Option<PathBuf>,
    },

    /// Validate a record against a feature schema
    Validate {
        /// Record JSON file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Feature schema as a JSON array of names; training default when omitted
        #[arg(long)]
        schema: Option<PathBuf>,
    },

    /// Print feature schema information
    Schema {
        /// Output the default schema as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TriageCliError> {
    match cli.command {
        Commands::Assess {
            input,
            output,
            text_model,
            tabular_model,
            schema,
            medium_floor,
            high_floor,
            simulate,
            include_plan,
        } => cmd_assess(
            &input,
            &output,
            text_model.as_deref(),
            tabular_model.as_deref(),
            schema.as_deref(),
            medium_floor,
            high_floor,
            simulate,
            include_plan,
        ),

        Commands::Simulate {
            input,
            interventions,
            text_model,
            tabular_model,
        } => cmd_simulate(
            &input,
            interventions.as_deref(),
            text_model.as_deref(),
            tabular_model.as_deref(),
        ),

        Commands::Validate { input, schema } => cmd_validate(&input, schema.as_deref()),

        Commands::Schema { json } => cmd_schema(json),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_assess(
    input: &Path,
    output: &Path,
    text_model: Option<&Path>,
    tabular_model: Option<&Path>,
    schema: Option<&Path>,
    medium_floor: f64,
    high_floor: f64,
    simulate: bool,
    include_plan: bool,
) -> Result<(), TriageCliError> {
    let record = read_record(input)?;
    let engine = build_engine(text_model, tabular_model, schema, medium_floor, high_floor)?;

    let assessment = engine.assess(&record)?;
    let recommendations = engine.recommendations(&assessment);
    let simulations = if simulate {
        engine.simulate(&record, &standard_interventions())?
    } else {
        Vec::new()
    };
    let plan = include_plan.then(ActionPlan::four_week);

    let report = ReportEncoder::new().encode_to_json(
        &assessment,
        &recommendations,
        &simulations,
        plan,
    )?;

    if output.to_string_lossy() == "-" {
        println!("{report}");
    } else {
        fs::write(output, report)?;
    }

    Ok(())
}

fn cmd_simulate(
    input: &Path,
    interventions: Option<&Path>,
    text_model: Option<&Path>,
    tabular_model: Option<&Path>,
) -> Result<(), TriageCliError> {
    let record = read_record(input)?;
    let engine = build_engine(text_model, tabular_model, None, 0.3, 0.5)?;

    let interventions: Vec<Intervention> = match interventions {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => standard_interventions(),
    };

    let outcomes = engine.simulate(&record, &interventions)?;
    println!("{}", serde_json::to_string_pretty(&outcomes)?);

    Ok(())
}

fn cmd_validate(input: &Path, schema: Option<&Path>) -> Result<(), TriageCliError> {
    let record = read_record(input)?;
    let schema = load_schema(schema)?;

    // A stress placeholder is enough to prove the schema is satisfiable
    let features = FeatureEngineer::engineer(&record, 0.0);
    schema.vectorize(&features)?;

    println!(
        "OK: record satisfies {} ({} features)",
        SCHEMA_VERSION,
        schema.len()
    );
    Ok(())
}

fn cmd_schema(json: bool) -> Result<(), TriageCliError> {
    let schema = FeatureSchema::default_training_order();

    if json {
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        println!("Feature Schema: {SCHEMA_VERSION}");
        println!();
        println!("The tabular classifier consumes features in this exact order:");
        println!();
        for (i, name) in schema.names().iter().enumerate() {
            println!("{:>3}. {}", i + 1, name.as_str());
        }
        println!();
        println!("Schema-variant additions (when the model was trained with them):");
        println!("     avg_weekly_library_hours, extracurricular_engagement_score, is_exam_week");
    }

    Ok(())
}

fn standard_interventions() -> Vec<Intervention> {
    vec![
        Intervention::NormalizeSleep,
        Intervention::AddStudyHours { hours: 2.0 },
        Intervention::HalveSocialMedia,
    ]
}

fn read_record(input: &Path) -> Result<RawStudentRecord, TriageCliError> {
    let data = if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            eprintln!("reading record JSON from terminal; paste and end with Ctrl-D");
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    Ok(serde_json::from_str(&data)?)
}

fn load_schema(path: Option<&Path>) -> Result<FeatureSchema, TriageCliError> {
    match path {
        Some(path) => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => Ok(FeatureSchema::default_training_order()),
    }
}

fn build_engine(
    text_model: Option<&Path>,
    tabular_model: Option<&Path>,
    schema: Option<&Path>,
    medium_floor: f64,
    high_floor: f64,
) -> Result<AssessmentEngine, TriageCliError> {
    let text_model = match text_model {
        Some(path) => LexiconModel::from_json(&fs::read_to_string(path)?)?,
        None => LexiconModel::builtin(),
    };
    let tabular_model = match tabular_model {
        Some(path) => LogisticModel::from_json(&fs::read_to_string(path)?)?,
        None => LogisticModel::reference(),
    };
    let bands = RiskBands::new(medium_floor, high_floor)?;

    Ok(
        AssessmentEngine::new(Arc::new(text_model), Arc::new(tabular_model))
            .with_schema(load_schema(schema)?)
            .with_scorer(RiskScorer::new(bands, DriverThresholds::default())),
    )
}

#[derive(Debug)]
enum TriageCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Score(ScoreError),
}

impl std::fmt::Display for TriageCliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriageCliError::Io(e) => write!(f, "{e}"),
            TriageCliError::Json(e) => write!(f, "{e}"),
            TriageCliError::Score(e) => write!(f, "{e}"),
        }
    }
}

impl From<io::Error> for TriageCliError {
    fn from(e: io::Error) -> Self {
        TriageCliError::Io(e)
    }
}

impl From<serde_json::Error> for TriageCliError {
    fn from(e: serde_json::Error) -> Self {
        TriageCliError::Json(e)
    }
}

impl From<ScoreError> for TriageCliError {
    fn from(e: ScoreError) -> Self {
        TriageCliError::Score(e)
    }
}
