use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chart_pipeline::{ChartSpec, SubmissionDocument, build_pipeline, execute, shape};
use clap::{Parser, Subcommand};
use form_spec::{FormSchema, submission_schema, validate, visible_fields};
use serde_json::{Map, Value, json};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form schema validation and chart aggregation helper",
    long_about = "Validates submission payloads against form schemas and runs chart specs over stored submissions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a submission payload against a form schema.
    Validate {
        /// Path to the FormSchema JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Path to the submission payload JSON.
        #[arg(long, value_name = "DATA")]
        data: PathBuf,
    },
    /// Run a chart spec over an NDJSON file of stored submissions.
    Chart {
        /// Path to the ChartSpec JSON.
        #[arg(long, value_name = "CHART")]
        chart: PathBuf,
        /// Path to submissions, one JSON document per line.
        #[arg(long, value_name = "SUBMISSIONS")]
        submissions: PathBuf,
        /// Print the compiled pipeline descriptor instead of running it.
        #[arg(long)]
        descriptor: bool,
    },
    /// Emit the JSON Schema of the fields visible for a payload.
    Schema {
        /// Path to the FormSchema JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Optional payload JSON driving show/hide rules (defaults to empty).
        #[arg(long, value_name = "DATA")]
        data: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Validate { form, data } => run_validate(&form, &data),
        Command::Chart {
            chart,
            submissions,
            descriptor,
        } => run_chart(&chart, &submissions, descriptor),
        Command::Schema { form, data } => run_schema(&form, data.as_deref()),
    };
    match outcome {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(2)
        }
    }
}

fn run_validate(form: &Path, data: &Path) -> CliResult<ExitCode> {
    let schema: FormSchema = read_json(form)?;
    let payload: Value = read_json(data)?;
    let errors = validate(&schema, &payload)?;

    let report = json!({"valid": errors.is_empty(), "errors": errors});
    println!("{}", serde_json::to_string_pretty(&report)?);
    if errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn run_chart(chart: &Path, submissions: &Path, descriptor_only: bool) -> CliResult<ExitCode> {
    let spec: ChartSpec = read_json(chart)?;
    let descriptor = build_pipeline(&spec);
    if descriptor_only {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(ExitCode::SUCCESS);
    }

    let documents = read_submissions(submissions)?;
    let points = shape(execute(&descriptor, &documents));
    println!("{}", serde_json::to_string_pretty(&points)?);
    Ok(ExitCode::SUCCESS)
}

fn run_schema(form: &Path, data: Option<&Path>) -> CliResult<ExitCode> {
    let schema: FormSchema = read_json(form)?;
    let payload: Map<String, Value> = match data {
        Some(path) => {
            let value: Value = read_json(path)?;
            value
                .as_object()
                .cloned()
                .ok_or("payload must be a JSON object")?
        }
        None => Map::new(),
    };

    let visible = visible_fields(&schema, &payload);
    println!(
        "{}",
        serde_json::to_string_pretty(&submission_schema(&schema, &visible))?
    );
    Ok(ExitCode::SUCCESS)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = fs::read_to_string(path)
        .map_err(|error| format!("cannot read {}: {error}", path.display()))?;
    let parsed = serde_json::from_str(&text)
        .map_err(|error| format!("cannot parse {}: {error}", path.display()))?;
    Ok(parsed)
}

/// Reads newline-delimited submission documents, skipping blank lines.
fn read_submissions(path: &Path) -> CliResult<Vec<SubmissionDocument>> {
    let text = fs::read_to_string(path)
        .map_err(|error| format!("cannot read {}: {error}", path.display()))?;
    let mut documents = Vec::new();
    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let document = serde_json::from_str(line).map_err(|error| {
            format!("{} line {}: {error}", path.display(), number + 1)
        })?;
        documents.push(document);
    }
    Ok(documents)
}
