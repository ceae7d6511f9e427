//! Minimal CLI: run the data-only helpers over JSON documents.
use std::io::Write;
use std::path::{Path as FsPath, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use safecall::{Coerced, Key, Path, TypeName, Value};

use crate::jq_exec::JqFilter;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// classify, coerce and look up values in JSON/NDJSON documents; strip quotes and parse
/// status codes
#[derive(Parser, Debug)]
#[command(name = "safecall", version)]
pub struct CommandLineInterface {
    /// tracing filter for diagnostics (e.g. `error`, `safecall=debug`)
    #[arg(long, global = true, default_value = "warn")]
    log_filter: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the runtime type of each input document
    Classify(ClassifyOut),
    /// coerce each input document to a type, substituting the type's default on mismatch
    Coerce(CoerceOut),
    /// print the value found at a key path in each input document
    Lookup(LookupOut),
    /// strip one leading and one trailing double quote from each argument
    StripQuotes(TextArgs),
    /// parse each argument as a base-10 status code (-1 when it has no numeric prefix)
    StatusCode(TextArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ClassifyOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CoerceOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// expected type (Array, Boolean, Function, Object, Null, Number, RegExp, String, Undefined)
    #[arg(long = "type")]
    type_name: String,

    /// prefix each line with `kept` or `replaced <found type>`
    #[arg(long)]
    report: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct LookupOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// path keys, outermost first; numeric keys also index arrays
    #[arg(long, short, num_args = 1.., required = true)]
    path: Vec<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct TextArgs {
    /// values to process
    #[arg(required = true)]
    values: Vec<String>,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(Value) -> Result<()>) -> Result<()> {
        let jq = self.jq_expr.as_deref().map(JqFilter::compile).transpose()?;
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            for document in self.parse_documents(&source, &source_path_str)? {
                let Some(document) = self.select(document, &source_path_str) else {
                    continue;
                };
                match jq.as_ref() {
                    None => apply(Value::from(document))?,
                    Some(jq) => {
                        let outputs = jq.run(&document).with_context(|| {
                            format!(
                                "failed to apply jq expression to source file ({source_path_str})"
                            )
                        })?;
                        for output in outputs {
                            apply(Value::from(output))?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn parse_documents(
        &self,
        source: &str,
        source_path_str: &str,
    ) -> Result<Vec<serde_json::Value>> {
        if !self.ndjson {
            let document = serde_json::from_str(source)
                .with_context(|| format!("failed to parse JSON source file ({source_path_str})"))?;
            return Ok(vec![document]);
        }
        source
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(ix, line)| {
                serde_json::from_str(line).with_context(|| {
                    format!("failed to parse NDJSON line {} ({source_path_str})", ix + 1)
                })
            })
            .collect()
    }

    fn select(
        &self,
        document: serde_json::Value,
        source_path_str: &str,
    ) -> Option<serde_json::Value> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Some(document);
        };
        let selected = document.pointer(pointer).cloned();
        if selected.is_none() {
            tracing::warn!(
                pointer,
                source = source_path_str,
                "JSON pointer matched nothing; skipping document"
            );
        }
        selected
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn init_tracing(&self) -> Result<()> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter()?)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
        Ok(())
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.log_filter)
            .with_context(|| format!("invalid --log-filter directive: {:?}", self.log_filter))
    }

    pub fn run(&self) -> Result<()> {
        self.run_with(&mut std::io::stdout().lock())
    }

    fn run_with(&self, stdout: &mut impl Write) -> Result<()> {
        match &self.cmd {
            Command::Classify(target) => {
                let mut lines = Vec::new();
                target.input_settings.load_process(|value| {
                    lines.push(safecall::classify(&value).to_string());
                    Ok(())
                })?;
                write_lines(target.out.as_deref(), &lines, stdout)
            }
            Command::Coerce(target) => {
                let expected = target.type_name.parse::<TypeName>()?;
                let mut lines = Vec::new();
                target.input_settings.load_process(|value| {
                    let line = if target.report {
                        match safecall::coerce_checked(expected, value) {
                            Coerced::Kept(value) => format!("kept {value}"),
                            Coerced::Replaced { found, value } => {
                                format!("replaced {found} {value}")
                            }
                        }
                    } else {
                        safecall::coerce(&target.type_name, value)?.to_string()
                    };
                    lines.push(line);
                    Ok(())
                })?;
                write_lines(target.out.as_deref(), &lines, stdout)
            }
            Command::Lookup(target) => {
                let path: Path = target.path.iter().cloned().map(Key::from).collect();
                let mut lines = Vec::new();
                target.input_settings.load_process(|value| {
                    let line = match path.lookup(&value) {
                        Some(found) => found.to_string(),
                        None => {
                            tracing::warn!(target: "safecall", %path, "no value at path");
                            Value::Null.to_string()
                        }
                    };
                    lines.push(line);
                    Ok(())
                })?;
                write_lines(target.out.as_deref(), &lines, stdout)
            }
            Command::StripQuotes(target) => {
                let lines: Vec<String> = target
                    .values
                    .iter()
                    .map(|v| safecall::strip_end_quotes(Some(v.as_str())))
                    .collect();
                write_lines(target.out.as_deref(), &lines, stdout)
            }
            Command::StatusCode(target) => {
                let lines: Vec<String> = target
                    .values
                    .iter()
                    .map(|v| safecall::parse_status_code_str(Some(v.as_str())).to_string())
                    .collect();
                write_lines(target.out.as_deref(), &lines, stdout)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_lines(out: Option<&FsPath>, lines: &[String], stdout: &mut impl Write) -> Result<()> {
    let Some(out) = out else {
        for line in lines {
            writeln!(stdout, "{line}").context("failed to write to stdout")?;
        }
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut src = lines.join("\n");
    src.push('\n');
    std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn settings(input: Vec<String>) -> InputSettings {
        InputSettings { ndjson: false, json_pointer: None, jq_expr: None, input }
    }

    fn collect(settings: &InputSettings) -> Result<Vec<Value>> {
        let mut seen = Vec::new();
        settings.load_process(|v| {
            seen.push(v);
            Ok(())
        })?;
        Ok(seen)
    }

    fn scratch(name: &str, body: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        (dir, path.to_string_lossy().to_string())
    }

    fn run_lines(args: &[&str]) -> Result<Vec<String>> {
        let cli = CommandLineInterface::try_parse_from(args.iter().copied())?;
        let mut stdout = Vec::new();
        cli.run_with(&mut stdout)?;
        Ok(String::from_utf8(stdout)?.lines().map(str::to_string).collect())
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        let logs = String::from_utf8_lossy(&capture.0.lock().unwrap()).to_string();
        (out, logs)
    }

    #[test]
    fn ndjson_skips_blank_lines() {
        let (_dir, path) = scratch("docs.ndjson", "{\"a\": 1}\n\n[2]\n");
        let mut s = settings(vec![path]);
        s.ndjson = true;
        let docs = collect(&s).unwrap();
        assert_eq!(docs, vec![Value::from(json!({"a": 1})), Value::from(json!([2]))]);
    }

    #[test]
    fn json_pointer_selects_and_skips() {
        let (_dir, path) = scratch("pointer.json", r#"{"data": {"status": "404"}}"#);
        let mut s = settings(vec![path]);
        s.json_pointer = Some("/data/status".into());
        assert_eq!(collect(&s).unwrap(), vec![Value::from("404")]);
        s.json_pointer = Some("/data/missing".into());
        assert!(collect(&s).unwrap().is_empty());
    }

    #[test]
    fn jq_expr_fans_out() {
        let (_dir, path) = scratch("jq.json", r#"{"xs": [1, 2, 3]}"#);
        let mut s = settings(vec![path]);
        s.jq_expr = Some(".xs[]".into());
        assert_eq!(collect(&s).unwrap().len(), 3);
    }

    #[test]
    fn unmatched_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["/definitely/not/here/*.json"]).is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = CommandLineInterface::try_parse_from([
            "safecall", "coerce", "--type", "number", "-i", "a.json", "--report",
        ])
        .unwrap();
        assert!(matches!(cli.cmd, Command::Coerce(CoerceOut { report: true, .. })));

        let args = ["safecall", "status-code", "404", "abc"];
        let cli = CommandLineInterface::try_parse_from(args).unwrap();
        assert!(matches!(cli.cmd, Command::StatusCode(_)));
    }

    #[test]
    fn classify_prints_one_type_per_document() {
        let (_dir, path) = scratch("kinds.ndjson", "5\n\"x\"\n[1]\n{\"a\": null}\nnull\ntrue\n");
        let lines = run_lines(&["safecall", "classify", "--ndjson", "-i", path.as_str()]).unwrap();
        assert_eq!(lines, ["Number", "String", "Array", "Object", "Null", "Boolean"]);
    }

    #[test]
    fn coerce_prints_value_or_default() {
        let (_dir, path) = scratch("mixed.ndjson", "\"s\"\n5\n");
        let args = ["safecall", "coerce", "--type", "string", "--ndjson", "-i", path.as_str()];
        let lines = run_lines(&args).unwrap();
        assert_eq!(lines, [r#""s""#, r#""""#]);
    }

    #[test]
    fn coerce_report_marks_kept_and_replaced() {
        let (_dir, path) = scratch("report.ndjson", "{\"a\": 1}\n7\n");
        let lines = run_lines(&[
            "safecall", "coerce", "--type", "number", "--report", "--ndjson", "-i", path.as_str(),
        ])
        .unwrap();
        assert_eq!(lines, ["replaced Object 0", "kept 7"]);
    }

    #[test]
    fn lookup_prints_found_value() {
        let (_dir, path) = scratch("doc.json", r#"{"a": {"b": [1, {"c": "deep"}]}}"#);
        let args = ["safecall", "lookup", "-i", path.as_str(), "-p", "a", "b", "1"];
        let lines = run_lines(&args).unwrap();
        assert_eq!(lines, [r#"{"c":"deep"}"#]);
    }

    #[test]
    fn lookup_miss_prints_null_and_warns() {
        let (_dir, path) = scratch("doc.json", r#"{"a": {"b": 1}}"#);
        let (lines, logs) = with_captured_logs(|| {
            run_lines(&["safecall", "lookup", "-i", path.as_str(), "-p", "a", "c"]).unwrap()
        });
        assert_eq!(lines, ["null"]);
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("no value at path"), "{logs}");
        assert!(logs.contains(r#"path=["a","c"]"#), "{logs}");
        assert!(!logs.contains("bad function"), "{logs}");
    }

    #[test]
    fn text_subcommands_print_one_line_per_argument() {
        let lines =
            run_lines(&["safecall", "strip-quotes", r#""quoted""#, r#""left"#, "plain"]).unwrap();
        assert_eq!(lines, ["quoted", "left", "plain"]);

        let lines = run_lines(&["safecall", "status-code", "404", "200ok", "abc"]).unwrap();
        assert_eq!(lines, ["404", "200", "-1"]);
    }

    #[test]
    fn out_flag_writes_file_instead_of_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("codes.txt");
        let out_str = out.to_string_lossy().to_string();
        let lines =
            run_lines(&["safecall", "status-code", "201", "x", "--out", out_str.as_str()]).unwrap();
        assert!(lines.is_empty());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "201\n-1\n");
    }

    #[test]
    fn invalid_log_filter_is_an_error() {
        let cli = CommandLineInterface::try_parse_from([
            "safecall", "--log-filter", "safecall=loud", "status-code", "1",
        ])
        .unwrap();
        let err = cli.init_tracing().unwrap_err();
        assert!(format!("{err:#}").contains("invalid --log-filter directive"), "{err:#}");

        let cli = CommandLineInterface::try_parse_from(["safecall", "status-code", "1"]).unwrap();
        assert!(cli.env_filter().is_ok());
    }

    #[test]
    fn unknown_type_name_fails_run() {
        let (_dir, path) = scratch("num.json", "5");
        let cli = CommandLineInterface::try_parse_from([
            "safecall", "coerce", "--type", "widget", "-i", path.as_str(),
        ])
        .unwrap();
        let err = cli.run().unwrap_err();
        assert!(err.to_string().contains("unknown type name"), "{err}");
    }
}
