//! Built-in pattern checks that pin findings to exact source lines.
//!
//! Each [`Rule`] pairs a line matcher with a replacement template. Rules
//! run over the lines of each [`SourceSection`]; lines outside every
//! section and comment lines are never matched. Several rules may fire on
//! the same line, and each match becomes its own review part.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::constants::{FENCE_CLOSE, SUGGESTION_FENCE};
use crate::models::{ReviewPart, SourceSection};

static EVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w.])eval\s*\(").unwrap());
static YAML_LOAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\byaml\.load\s*\(").unwrap());
static BROAD_EXCEPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)except(?:\s+(?:Exception|BaseException)(?:\s+as\s+(\w+))?)?\s*:(.*)$").unwrap()
});
static OPEN_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(\w+)\s*=\s*open\((.*)\)\s*$").unwrap());
static DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:async\s+)?def\s+\w+\s*\(").unwrap());
static MUTABLE_DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(=\s*)(?:\[\s*\]|\{\s*\}|list\(\s*\)|dict\(\s*\)|set\(\s*\))").unwrap()
});

/// The fixed rule catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    UnsafeEval,
    UnsafeYamlLoad,
    BroadExcept,
    OpenWithoutWith,
    MutableDefaultArg,
}

impl Rule {
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn title(self) -> &'static str {
        match self {
            Rule::UnsafeEval => "Unsafe dynamic evaluation",
            Rule::UnsafeYamlLoad => "Unsafe YAML deserialization",
            Rule::BroadExcept => "Overly broad exception handler",
            Rule::OpenWithoutWith => "File handle opened without a context manager",
            Rule::MutableDefaultArg => "Mutable default argument",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Rule::UnsafeEval => {
                "`eval` executes arbitrary code. Use `ast.literal_eval` for literal data."
            }
            Rule::UnsafeYamlLoad => {
                "`yaml.load` without a restricted loader can construct arbitrary objects. Use `yaml.safe_load`."
            }
            Rule::BroadExcept => {
                "Catching every exception hides real failures. Catch the specific errors you expect."
            }
            Rule::OpenWithoutWith => {
                "The handle is never closed on error paths. Open it in a `with` block."
            }
            Rule::MutableDefaultArg => {
                "Default values are shared between calls. Default to `None` and create the value inside the function."
            }
        }
    }

    /// Replacement for `line` when this rule matches it.
    pub fn check(self, line: &str) -> Option<String> {
        match self {
            Rule::UnsafeEval => EVAL_RE
                .is_match(line)
                .then(|| EVAL_RE.replacen(line, 1, "${1}ast.literal_eval(").into_owned()),
            Rule::UnsafeYamlLoad => (YAML_LOAD_RE.is_match(line) && !line.contains("SafeLoader"))
                .then(|| YAML_LOAD_RE.replacen(line, 1, "yaml.safe_load(").into_owned()),
            Rule::BroadExcept => BROAD_EXCEPT_RE.captures(line).map(|caps| {
                let name = caps.get(2).map_or("exc", |m| m.as_str());
                format!("{}except (OSError, ValueError) as {name}:{}", &caps[1], &caps[3])
            }),
            Rule::OpenWithoutWith => OPEN_ASSIGN_RE
                .captures(line)
                .map(|caps| format!("{}with open({}) as {}:", &caps[1], &caps[3], &caps[2])),
            Rule::MutableDefaultArg => (DEF_RE.is_match(line) && MUTABLE_DEFAULT_RE.is_match(line))
                .then(|| MUTABLE_DEFAULT_RE.replace_all(line, "${1}None").into_owned()),
        }
    }
}

/// One rule firing on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    pub rule: Rule,
    /// 1-based line in the after-side file.
    pub line: u32,
    pub section: String,
    pub replacement: String,
}

impl RuleMatch {
    /// Comment body: title, explanation, and the replacement block.
    pub fn body(&self) -> String {
        format!(
            "**{}** (`{}`, section `{}`)\n\n{}\n\n{SUGGESTION_FENCE}\n{}\n{FENCE_CLOSE}",
            self.rule.title(),
            self.rule.id(),
            self.section,
            self.rule.message(),
            self.replacement,
        )
    }

    pub fn into_part(self, file_path: &str) -> ReviewPart {
        ReviewPart::from_rule(file_path, self.rule.id(), self.line, self.body())
    }
}

/// The rules active for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::all()
    }
}

impl RuleSet {
    pub fn all() -> Self {
        Self { rules: Rule::iter().collect() }
    }

    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    /// Catalogue minus the given ids. Unknown ids are reported and ignored.
    pub fn without(disabled: &[String]) -> Self {
        for id in disabled {
            if Rule::from_str(id).is_err() {
                tracing::warn!(rule = %id, "unknown rule id in disabled list");
            }
        }
        Self {
            rules: Rule::iter()
                .filter(|r| !disabled.iter().any(|d| d == r.id()))
                .collect(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every active rule over the lines covered by `sections`.
    pub fn check(&self, text: &str, sections: &[SourceSection]) -> Vec<RuleMatch> {
        if self.rules.is_empty() {
            return Vec::new();
        }
        let lines: Vec<&str> = text.lines().collect();
        let mut matches = Vec::new();

        for section in sections {
            let covered = lines
                .iter()
                .skip(section.start_line as usize - 1)
                .take(section.line_count());
            for (offset, line) in covered.enumerate() {
                if line.trim_start().starts_with('#') {
                    continue;
                }
                for &rule in &self.rules {
                    if let Some(replacement) = rule.check(line) {
                        matches.push(RuleMatch {
                            rule,
                            line: section.start_line + offset as u32,
                            section: section.title.clone(),
                            replacement,
                        });
                    }
                }
            }
        }
        matches
    }
}
