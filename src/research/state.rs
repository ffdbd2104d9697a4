//! Per-run state and the loop controller's transition rules.

use crate::research::effort::EffortProfile;
use crate::research::reflector::Reflection;
use crate::research::sources::SourceTable;
use crate::types::{ResearchQuery, ResearchSummary};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Loop controller states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopPhase {
    Init,
    Researching(Vec<ResearchQuery>),
    Reflecting,
    Done(StopReason),
}

/// Why the loop stopped researching
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The reflector judged the research sufficient
    Sufficient,
    /// The effort profile's round ceiling was reached
    RoundLimit,
    /// Insufficient, but no new follow-up queries to run
    NoFollowUps,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StopReason::Sufficient => "sufficient",
            StopReason::RoundLimit => "round limit",
            StopReason::NoFollowUps => "no follow-up queries",
        };
        f.write_str(name)
    }
}

/// Everything one research session accumulates.
///
/// Owned by the loop controller; only the source table is shared with the
/// concurrent web researchers.
#[derive(Debug)]
pub struct RunState {
    pub question: String,
    pub summaries: Vec<ResearchSummary>,
    pub sources: Arc<SourceTable>,
    /// Completed research rounds
    pub round: u32,
    pub sufficient: bool,
    /// Every query dispatched so far, in call-index order
    pub issued: Vec<String>,
}

impl RunState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            summaries: Vec::new(),
            sources: Arc::new(SourceTable::new()),
            round: 0,
            sufficient: false,
            issued: Vec::new(),
        }
    }

    /// Record a batch as issued and return the call index of its first query
    pub fn dispatch(&mut self, batch: &[ResearchQuery]) -> usize {
        let base = self.issued.len();
        self.issued.extend(batch.iter().map(|q| q.query.clone()));
        base
    }

    /// Add a finished round's summaries, ordered by call index
    pub fn absorb_round(&mut self, mut summaries: Vec<(usize, ResearchSummary)>) {
        summaries.sort_by_key(|(idx, _)| *idx);
        self.summaries
            .extend(summaries.into_iter().map(|(_, summary)| summary));
        self.round += 1;
    }

    /// Turn follow-up strings into queries, dropping blanks and anything
    /// already issued (compared case-insensitively, whitespace collapsed).
    pub fn fresh_queries(&self, follow_ups: Vec<String>, rationale: &str) -> Vec<ResearchQuery> {
        let mut seen: HashSet<String> = self.issued.iter().map(|q| normalize(q)).collect();
        let mut fresh = Vec::new();

        for query in follow_ups {
            let key = normalize(&query);
            if key.is_empty() {
                continue;
            }
            if !seen.insert(key) {
                warn!(query = %query, "Dropping follow-up query that was already issued");
                continue;
            }
            fresh.push(ResearchQuery::new(query.trim(), rationale));
        }
        fresh
    }

    /// Decide where the loop goes after a reflection
    pub fn next_phase(&mut self, profile: &EffortProfile, reflection: Reflection) -> LoopPhase {
        self.sufficient = reflection.is_sufficient;

        if reflection.is_sufficient {
            return LoopPhase::Done(StopReason::Sufficient);
        }
        if self.round >= profile.max_loops {
            return LoopPhase::Done(StopReason::RoundLimit);
        }

        let follow_ups = self.fresh_queries(reflection.follow_up_queries, &reflection.knowledge_gap);
        if follow_ups.is_empty() {
            return LoopPhase::Done(StopReason::NoFollowUps);
        }
        LoopPhase::Researching(follow_ups)
    }
}

fn normalize(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
