//! Docstring analyzer.
//!
//! Pulls a one-line summary and per-parameter descriptions out of free-form
//! documentation. Two dialects are understood and may be mixed:
//!
//! ```text
//! Search for flights.
//!
//! Args:
//!     query (str): The search query.
//!         Continuation lines are joined with a space.
//!
//! :param limit: Maximum number of results.
//! ```
//!
//! Sphinx-style `:param` entries are read last and win over section entries
//! with the same name. Malformed input never errors; it just yields less.

use indexmap::IndexMap;

const SECTION_HEADERS: [&str; 3] = ["args:", "parameters:", "arguments:"];
const PARAM_MARKER: &str = ":param ";

/// Result of [`analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocSummary {
    /// First non-blank line of the documentation.
    pub summary: String,
    /// Parameter name → description, in discovery order.
    pub params: IndexMap<String, String>,
}

pub fn analyze(doc: &str) -> DocSummary {
    let lines = clean(doc);
    let Some(summary) = lines.iter().find(|line| !line.trim().is_empty()) else {
        return DocSummary::default();
    };

    let mut params = IndexMap::new();
    collect_sections(&lines, &mut params);
    collect_sphinx_params(&lines, &mut params);

    DocSummary {
        summary: summary.clone(),
        params,
    }
}

/// Normalizes raw doc text the way doc tooling does: surrounding blank
/// space is dropped, the common indentation of every line after the first
/// is removed and trailing whitespace goes.
fn clean(doc: &str) -> Vec<String> {
    let raw: Vec<&str> = doc.trim().lines().collect();
    let indent = raw
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    raw.iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.trim().to_owned()
            } else {
                line.get(indent..)
                    .unwrap_or_else(|| line.trim_start())
                    .trim_end()
                    .to_owned()
            }
        })
        .collect()
}

fn is_section_header(line: &str) -> bool {
    let line = line.trim();
    SECTION_HEADERS
        .iter()
        .any(|header| line.eq_ignore_ascii_case(header))
}

fn is_indented(line: &str) -> bool {
    line.starts_with([' ', '\t'])
}

/// Walks `Args:`-style blocks. A block runs while lines are blank or
/// indented; the first line that is neither is re-examined as a header.
fn collect_sections(lines: &[String], params: &mut IndexMap<String, String>) {
    let mut i = 0;
    while i < lines.len() {
        if !is_section_header(&lines[i]) {
            i += 1;
            continue;
        }

        i += 1;
        while let Some(raw) = lines.get(i) {
            let stripped = raw.trim();
            if stripped.is_empty() {
                i += 1;
                continue;
            }
            if !is_indented(raw) {
                break;
            }
            section_entry(stripped, params);
            i += 1;
        }
    }
}

fn section_entry(stripped: &str, params: &mut IndexMap<String, String>) {
    match stripped.split_once(':') {
        Some((head, description)) => {
            let Some(name) = entry_name(head) else {
                return;
            };
            params
                .entry(name.to_owned())
                .or_insert_with(|| description.trim().to_owned());
        }
        // Continuation of the most recently added parameter.
        None => {
            if let Some((_, description)) = params.last_mut() {
                if !description.is_empty() {
                    description.push(' ');
                }
                description.push_str(stripped);
            }
        }
    }
}

/// `"city (str)"` → `"city"`.
fn entry_name(head: &str) -> Option<&str> {
    let word = head.split_whitespace().next()?;
    let name = word.split('(').next().unwrap_or_default();
    (!name.is_empty()).then_some(name)
}

fn collect_sphinx_params(lines: &[String], params: &mut IndexMap<String, String>) {
    for line in lines {
        let line = line.trim();
        let Some(rest) = strip_param_marker(line) else {
            continue;
        };
        let Some((head, description)) = rest.split_once(':') else {
            continue;
        };
        // Only the first word names the parameter.
        let Some(name) = head.split_whitespace().next() else {
            continue;
        };
        params.insert(name.to_owned(), description.trim().to_owned());
    }
}

fn strip_param_marker(line: &str) -> Option<&str> {
    let marker = line.get(..PARAM_MARKER.len())?;
    marker
        .eq_ignore_ascii_case(PARAM_MARKER)
        .then(|| &line[PARAM_MARKER.len()..])
}
