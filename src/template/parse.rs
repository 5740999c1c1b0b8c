//! Extracts asset formulas from template source.
//!
//! Recognises the block tags
//!
//! ```text
//! {% javascripts 'js/a.js' '@jquery' filter='?uglifyjs2' output='js/app.js' %}
//! {% stylesheets 'css/*.css' filter='cssrewrite' combine=false %}
//! {% image 'images/logo.png' %}
//! ```
//!
//! and calls to configured asset functions: `{{ yui_js('js/a.js') }}`.

use crate::asset::Formula;
use regex::Regex;
use serde::Deserialize;
use std::{collections::BTreeMap, sync::OnceLock};

/// Options of a configured asset function.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplateFunction {
    pub output: Option<String>,
    #[serde(alias = "filter")]
    pub filters: Vec<String>,
    pub debug: Option<bool>,
    pub combine: Option<bool>,
}

/// Default output for each block tag.
fn tag_output(tag: &str) -> &'static str {
    match tag {
        "javascripts" => "js/*.js",
        "stylesheets" => "css/*.css",
        _ => "images/*",
    }
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{%-?\s*(javascripts|stylesheets|image)\b(.*?)-?%\}").unwrap())
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(\w+)\s*=\s*('[^']*'|"[^"]*"|\[[^\]]*\]|\w+)|('[^']*'|"[^"]*")"#).unwrap()
    })
}

fn string_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"'([^']*)'|"([^"]*)""#).unwrap())
}

/// Turns template source into `(name, formula)` pairs.
#[derive(Debug, Clone, Default)]
pub struct FormulaLoader {
    functions: BTreeMap<String, TemplateFunction>,
    call_re: Option<Regex>,
}

impl FormulaLoader {
    pub fn new(functions: BTreeMap<String, TemplateFunction>) -> Self {
        let call_re = if functions.is_empty() {
            None
        } else {
            let names: Vec<_> = functions.keys().map(|n| regex::escape(n)).collect();
            Regex::new(&format!(r"(?s)\{{\{{-?\s*({})\s*\(([^)]*)\)", names.join("|"))).ok()
        };
        Self { functions, call_re }
    }

    /// Formulas in `source`, in order of appearance.
    ///
    /// Unnamed formulas are keyed by their generated name.
    pub fn load(&self, source: &str) -> Vec<(String, Formula)> {
        let mut found = Vec::new();

        for caps in tag_regex().captures_iter(source) {
            found.push((caps.get(0).map_or(0, |m| m.start()), parse_tag(&caps[1], &caps[2])));
        }
        if let Some(re) = &self.call_re {
            for caps in re.captures_iter(source) {
                let Some(options) = self.functions.get(&caps[1]) else {
                    continue;
                };
                let mut formula = Formula::new(strings(&caps[2]), options.filters.clone());
                formula.options.output = options.output.clone();
                formula.options.debug = options.debug;
                formula.options.combine = options.combine;
                found.push((caps.get(0).map_or(0, |m| m.start()), formula));
            }
        }

        found.sort_by_key(|(pos, _)| *pos);
        found
            .into_iter()
            .map(|(_, formula)| {
                let name = formula
                    .options
                    .name
                    .clone()
                    .unwrap_or_else(|| formula.generated_name());
                (name, formula)
            })
            .collect()
    }
}

fn parse_tag(tag: &str, body: &str) -> Formula {
    let mut formula = Formula::default();
    formula.options.output = Some(tag_output(tag).to_string());

    for caps in token_regex().captures_iter(body) {
        if let Some(input) = caps.get(3) {
            formula.inputs.push(unquote(input.as_str()).to_string());
            continue;
        }
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let value = value.as_str();
        match key.as_str() {
            "filter" => formula.filters.extend(
                unquote(value)
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from),
            ),
            "output" => formula.options.output = Some(unquote(value).to_string()),
            "name" => formula.options.name = Some(unquote(value).to_string()),
            "debug" => formula.options.debug = parse_bool(value),
            "combine" => formula.options.combine = parse_bool(value),
            "vars" => formula.options.vars = strings(value),
            _ => {}
        }
    }
    formula
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
        .unwrap_or(value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Every quoted string in `list`.
fn strings(list: &str) -> Vec<String> {
    string_regex()
        .captures_iter(list)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}
