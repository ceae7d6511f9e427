//! jq pre-filter for CLI input documents.
use anyhow::{anyhow, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, Native, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// A jq program compiled once and run against every input document.
pub struct JqFilter {
    source: String,
    filter: jaq_core::Filter<Native<Val>>,
}

impl JqFilter {
    pub fn compile(filter_src: &str) -> Result<Self> {
        let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let arena = load::Arena::default();
        let program = load::File { code: filter_src, path: () };

        let modules = loader
            .load(&arena, program)
            .map_err(format_parse_errors)?;

        let filter = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(format_undefined_errors)?;

        Ok(Self { source: filter_src.to_string(), filter })
    }

    /// Every output of the program, as JSON.
    pub fn run(&self, input: &Value) -> Result<Vec<Value>> {
        let inputs = RcIter::new(core::iter::empty());
        let it = self.filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

        let mut out = Vec::new();
        for item in it {
            let v = item.map_err(|e| anyhow!("jq `{}` failed: {e:?}", self.source))?;
            // Val: Display -> JSON text
            let json = serde_json::from_str::<Value>(&format!("{v}"))
                .with_context(|| format!("jq `{}` produced non-JSON output", self.source))?;
            out.push(json);
        }
        Ok(out)
    }
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow!(s)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow!(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_yields_each_output() {
        let jq = JqFilter::compile(".items[]").unwrap();
        let out = jq.run(&json!({"items": [1, {"a": "b"}]})).unwrap();
        assert_eq!(out, vec![json!(1), json!({"a": "b"})]);
    }

    #[test]
    fn parse_errors_surface() {
        assert!(JqFilter::compile(".[").is_err());
    }
}
