//! Replays the JSON fixture cases in `cases/` against the library.
//!
//! Usage: `cargo run -p dev-test-runner -- [NAME_REGEX] [--cases DIR]`
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value as Json};

use safecall::path_de::from_str_with_path;
use safecall::{Error, Value};

const CASES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/cases");

/// replay the JSON fixture cases against safecall
#[derive(Parser, Debug)]
struct RunnerArgs {
    /// only run cases whose name matches this regex
    #[arg(value_parser = Regex::new)]
    name_filter: Option<Regex>,

    /// directory holding the `*.json` case files
    #[arg(long, default_value = CASES_DIR)]
    cases: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    #[serde(flatten)]
    op: Op,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Op {
    Classify { input: Json, expect: String },
    Coerce {
        #[serde(rename = "type")]
        type_name: String,
        input: Json,
        expect: Json,
    },
    Lookup { path: Json, input: Json, expect: Json },
    StripEndQuotes { input: Option<String>, expect: String },
    StatusCode { input: Option<Json>, expect: i64 },
}

impl Op {
    /// (expected, actual) as JSON so every case reports the same way.
    fn evaluate(&self) -> (Json, Json) {
        match self {
            Op::Classify { input, expect } => {
                let actual = safecall::classify(&Value::from(input)).to_string();
                (json!(expect), json!(actual))
            }
            Op::Coerce { type_name, input, expect } => {
                let actual = safecall::coerce(type_name, Value::from(input))
                    .map(|v| v.to_json())
                    .unwrap_or_else(error_json);
                (expect.clone(), actual)
            }
            Op::Lookup { path, input, expect } => {
                let input = Value::from(input);
                let actual = safecall::Path::parse(&Value::from(path))
                    .map(|p| p.lookup(&input).map(Value::to_json).unwrap_or(Json::Null))
                    .unwrap_or_else(error_json);
                (expect.clone(), actual)
            }
            Op::StripEndQuotes { input, expect } => {
                let actual = safecall::strip_end_quotes(input.as_deref());
                (json!(expect), json!(actual))
            }
            Op::StatusCode { input, expect } => {
                let input = input.as_ref().map(Value::from).unwrap_or(Value::Undefined);
                (json!(expect), json!(safecall::parse_status_code(&input)))
            }
        }
    }
}

fn error_json(err: Error) -> Json {
    json!({ "error": err.to_string() })
}

fn load_cases(dir: &Path) -> Result<Vec<(PathBuf, Case)>, String> {
    let mut files = std::fs::read_dir(dir)
        .map_err(|e| format!("cannot read {}: {e}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect::<Vec<_>>();
    files.sort();

    let mut out = Vec::new();
    for file in files {
        let src = std::fs::read_to_string(&file)
            .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
        let cases: Vec<Case> = from_str_with_path(&src)
            .map_err(|e| format!("{}: {e}", file.display()))?;
        out.extend(cases.into_iter().map(|c| (file.clone(), c)));
    }
    Ok(out)
}

fn main() -> ExitCode {
    let args = RunnerArgs::parse();

    let cases = match load_cases(&args.cases) {
        Ok(cases) => cases,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };

    let (mut passed, mut failed) = (0usize, 0usize);
    for (file, case) in &cases {
        if args.name_filter.as_ref().is_some_and(|rx| !rx.is_match(&case.name)) {
            continue;
        }
        let (expected, actual) = case.op.evaluate();
        if expected == actual {
            passed += 1;
            eprintln!("✅ {}", case.name);
        } else {
            failed += 1;
            let file = file.file_name().map(|f| f.to_string_lossy()).unwrap_or_default();
            eprintln!("❌ {} ({file}): expected {expected}, got {actual}", case.name);
        }
    }

    eprintln!("—— {passed} passed, {failed} failed ——");
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
