//! Citation markers.
//!
//! Three marker forms appear over the life of a run:
//!
//! | Stage | Form | Produced by |
//! |-------|------|-------------|
//! | per call | `[label](cite:{call}-{k})` | [`insert_citation_markers`] |
//! | run-wide | `[label](cite:{id})` | [`rewrite_local_markers`] |
//! | final | `[label](https://...)` | [`resolve_citations`] |
//!
//! `{k}` is the grounding chunk index within one search response, `{id}` is
//! the [`SourceId`] assigned by the run's [`SourceTable`].

use crate::llm::client::GroundingSupport;
use crate::research::sources::SourceTable;
use crate::types::{Source, SourceId};
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::warn;

static LOCAL_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"( ?)\[([^\]\[]*)\]\(cite:(\d+)-(\d+)\)").expect("valid local marker regex")
});

static RUN_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]\[]*)\]\(cite:(\d+)\)").expect("valid run marker regex")
});

/// Short label for a source: the title minus its last dot-separated segment
/// (`"wikipedia.org"` becomes `"wikipedia"`).
///
/// Square brackets become parentheses so the label can sit inside a marker.
pub fn source_label(title: &str) -> String {
    let title = title.trim();
    let label = match title.rsplit_once('.') {
        Some((head, _)) if !head.is_empty() => head,
        _ => title,
    };
    marker_safe(label)
}

fn marker_safe(label: &str) -> String {
    label.replace('[', "(").replace(']', ")")
}

/// Per-call marker target for chunk `k` of call `call`
pub fn local_marker(call: usize, k: usize) -> String {
    format!("cite:{}-{}", call, k)
}

/// Run-wide marker target for a source
pub fn run_marker(id: SourceId) -> String {
    format!("cite:{}", id)
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Insert per-call markers after every supported span.
///
/// Supports are applied from the end of the text backwards so earlier byte
/// offsets stay valid. `labels[k]` is the label of grounding chunk `k`;
/// supports pointing past `labels` are skipped.
pub fn insert_citation_markers(
    text: &str,
    supports: &[GroundingSupport],
    labels: &[String],
    call: usize,
) -> String {
    let mut ordered: Vec<&GroundingSupport> = supports.iter().collect();
    ordered.sort_by(|a, b| b.end_index.cmp(&a.end_index));

    let mut out = text.to_string();
    for support in ordered {
        let marker: String = support
            .chunk_indices
            .iter()
            .filter_map(|k| {
                labels
                    .get(*k)
                    .map(|label| format!(" [{}]({})", marker_safe(label), local_marker(call, *k)))
            })
            .collect();
        if marker.is_empty() {
            continue;
        }
        let at = floor_char_boundary(&out, support.end_index);
        out.insert_str(at, &marker);
    }
    out
}

/// Rewrite this call's per-call markers into run-wide markers.
///
/// `mapping[k]` is the source registered for chunk `k`, or `None` when the
/// chunk could not become a source. Markers without a mapping, or belonging
/// to another call, are removed so a summary only ever cites known sources.
pub fn rewrite_local_markers(text: &str, call: usize, mapping: &[Option<SourceId>]) -> String {
    LOCAL_MARKER
        .replace_all(text, |caps: &Captures| {
            let marker_call = caps[3].parse::<usize>().ok();
            let chunk = caps[4].parse::<usize>().ok();
            let id = match (marker_call, chunk) {
                (Some(c), Some(k)) if c == call => mapping.get(k).copied().flatten(),
                _ => None,
            };
            match id {
                Some(id) => format!("{}[{}]({})", &caps[1], &caps[2], run_marker(id)),
                None => String::new(),
            }
        })
        .into_owned()
}

/// Source identifiers referenced by run-wide markers, in order of first appearance
pub fn cited_sources(text: &str) -> Vec<SourceId> {
    let mut seen = HashSet::new();
    RUN_MARKER
        .captures_iter(text)
        .filter_map(|caps| caps[2].parse::<u32>().ok().map(SourceId))
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Final answer with markers swapped for URLs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCitations {
    pub text: String,
    /// Sources whose markers survived into `text`, first appearance first
    pub sources: Vec<Source>,
    /// Marker targets that matched no source and were left in place
    pub unresolved: Vec<String>,
}

/// Replace every known run-wide marker with its source URL.
///
/// Unknown markers are left untouched and reported; resolution is a pure
/// function of the text and the table, so repeating it on the same snapshot
/// gives the same result.
pub fn resolve_citations(text: &str, table: &SourceTable) -> ResolvedCitations {
    let mut order: Vec<SourceId> = Vec::new();
    let mut found: HashMap<SourceId, Source> = HashMap::new();
    let mut unresolved: Vec<String> = Vec::new();

    let rewritten = RUN_MARKER.replace_all(text, |caps: &Captures| {
        let source = caps[2]
            .parse::<u32>()
            .ok()
            .and_then(|raw| table.get(SourceId(raw)));

        match source {
            Some(source) => {
                let replacement = format!("[{}]({})", &caps[1], source.url);
                if !found.contains_key(&source.id) {
                    order.push(source.id);
                    found.insert(source.id, source);
                }
                replacement
            }
            None => {
                let target = format!("cite:{}", &caps[2]);
                if !unresolved.contains(&target) {
                    unresolved.push(target);
                }
                caps[0].to_string()
            }
        }
    });

    if !unresolved.is_empty() {
        warn!(
            markers = ?unresolved,
            "Answer contains citation markers with no matching source; left unresolved"
        );
    }

    ResolvedCitations {
        text: rewritten.into_owned(),
        sources: order
            .into_iter()
            .filter_map(|id| found.remove(&id))
            .collect(),
        unresolved,
    }
}
