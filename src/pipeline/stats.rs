use crate::constants::{
    BLOCKRATE_LABEL, BLOCKRATE_SUFFIX, DIFFICULTY_LABEL, MINERS_LABEL, TOTAL_BLOCKS_LABEL,
};
use crate::types::NetworkStats;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;

/// Raw network-stat structure as one source surfaced it. Each source
/// reduces its markup to one of these shapes, so everything downstream
/// only ever deals with (label, value) pairs.
#[derive(Debug, Clone)]
pub enum StatSource {
    /// Class-tagged title/value boxes (explorer markup, or a JSON stats
    /// payload mapped onto the same shape).
    LabeledBoxes(Vec<(String, String)>),
    /// Free-text heading lines, possibly combining two stats per line.
    HeadingLines(Vec<String>),
}

/// Canonical output of stats extraction, with the count of lines that
/// could not be parsed (skipped, never fatal).
#[derive(Debug, Default)]
pub struct StatsExtraction {
    pub stats: NetworkStats,
    pub skipped_lines: usize,
}

/// Lowercased stat titles the explorer has shipped, mapped to the
/// canonical labels the artifact publishes.
static STAT_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("total blocks", TOTAL_BLOCKS_LABEL),
        ("mining blockrate", BLOCKRATE_LABEL),
        ("current miners", MINERS_LABEL),
        ("current difficulty", DIFFICULTY_LABEL),
    ])
});

/// Parses whichever raw shape the source produced into the canonical
/// stats mapping. Malformed content is skipped, never an error; the
/// `timestamp` key is stamped by the pipeline, not here.
pub fn extract_stats(source: &StatSource) -> StatsExtraction {
    match source {
        StatSource::LabeledBoxes(boxes) => from_labeled_boxes(boxes),
        StatSource::HeadingLines(lines) => from_heading_lines(lines),
    }
}

fn from_labeled_boxes(boxes: &[(String, String)]) -> StatsExtraction {
    let mut extraction = StatsExtraction::default();
    for (title, value) in boxes {
        match canonical_label(title) {
            Some(label) => {
                let value = value.trim();
                let value = if label == BLOCKRATE_LABEL {
                    format!("{value}{BLOCKRATE_SUFFIX}")
                } else {
                    value.to_string()
                };
                extraction.stats.insert(label.to_string(), value);
            }
            None => {
                debug!("Ignoring unrecognized stat box title: {:?}", title);
            }
        }
    }
    extraction
}

/// Titles occasionally carry extra text around the label, so fall back to
/// containment when the exact lookup misses.
fn canonical_label(title: &str) -> Option<&'static str> {
    let lowered = title.trim().to_lowercase();
    if let Some(label) = STAT_SYNONYMS.get(lowered.as_str()) {
        return Some(label);
    }
    STAT_SYNONYMS
        .iter()
        .find(|(key, _)| lowered.contains(*key))
        .map(|(_, label)| *label)
}

fn from_heading_lines(lines: &[String]) -> StatsExtraction {
    let mut extraction = StatsExtraction::default();
    for line in lines {
        match parse_heading_line(line) {
            Some(pairs) => {
                for (label, value) in pairs {
                    extraction.stats.insert(label, value);
                }
            }
            None => {
                debug!("Skipping unparsable stat line: {:?}", line);
                extraction.skipped_lines += 1;
            }
        }
    }
    extraction
}

/// Splits one heading line into (label, value) pairs.
///
/// The hash-rate page has shipped these as one combined heading, as
/// separate "Label: value" headings, and as label-only headings with the
/// value glued on, so the rules are tried in that order.
fn parse_heading_line(line: &str) -> Option<Vec<(String, String)>> {
    let text = line.trim();
    if text.is_empty() {
        return None;
    }

    // Combined form: "Current miners: 1500 Current difficulty: 3200000"
    if text.contains(MINERS_LABEL) && text.contains(DIFFICULTY_LABEL) {
        if let Some((left, right)) = text.split_once("Current difficulty:") {
            let miners = strip_label(left.trim(), MINERS_LABEL);
            return Some(vec![
                (MINERS_LABEL.to_string(), miners),
                (DIFFICULTY_LABEL.to_string(), right.trim().to_string()),
            ]);
        }
    }

    // Plain "Label: value" form, stored verbatim under the label
    if text.matches(':').count() == 1 {
        let (label, value) = text.split_once(':')?;
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        return Some(vec![(label.to_string(), value.trim().to_string())]);
    }

    // Label-only form with the value glued on
    for label in [MINERS_LABEL, DIFFICULTY_LABEL] {
        if text.contains(label) {
            return Some(vec![(label.to_string(), strip_label(text, label))]);
        }
    }

    None
}

fn strip_label(text: &str, label: &str) -> String {
    match text.split_once(label) {
        Some((_, rest)) => rest.trim_start_matches(':').trim().to_string(),
        None => text.to_string(),
    }
}
