//! Prompt templates for each research step.

use crate::types::ResearchSummary;

/// Separator between summaries when they are concatenated into a prompt
const SUMMARY_SEPARATOR: &str = "\n\n---\n\n";

pub fn join_summaries(summaries: &[ResearchSummary]) -> String {
    summaries
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR)
}

pub fn query_writer(question: &str, count: usize, current_date: &str) -> String {
    format!(
        r#"Your goal is to generate sophisticated and diverse web search queries for an automated research tool that reads web results.

Instructions:
- Prefer a single search query; only add more if the question has several distinct aspects that one query cannot cover.
- Each query must target a different aspect of the question.
- Never produce more than {count} queries.
- Do not produce several near-identical queries; one is enough.
- Queries should aim for the most current information. The current date is {current_date}.

Return a JSON object with a "queries" array. Every entry has:
- "query": the search query
- "rationale": a short explanation of why this query is relevant

Research question: {question}"#
    )
}

pub fn web_searcher(query: &str, current_date: &str) -> String {
    format!(
        r#"Conduct targeted web searches to gather the most recent, credible information on "{query}" and synthesize it into a verifiable text artifact.

Instructions:
- The current date is {current_date}; prefer the most recent information.
- Run multiple, diverse searches to gather comprehensive information.
- Consolidate key findings and keep track of the source of each specific piece of information.
- Write a well-written summary based on the search results.
- Only include information found in the search results; do not invent anything.

Research topic:
{query}"#
    )
}

pub fn reflection(question: &str, summaries: &[ResearchSummary]) -> String {
    format!(
        r#"You are an expert research assistant analyzing summaries about "{question}".

Instructions:
- Identify knowledge gaps or areas that need deeper exploration and generate follow-up queries for them.
- If the summaries are sufficient to answer the question, do not generate follow-up queries.
- If there is a gap, write follow-up queries that would close it, focusing on technical details, implementation specifics or emerging trends not yet covered.
- Each follow-up query must be self-contained and include the context needed for a web search.

Return a JSON object with:
- "is_sufficient": true if the summaries answer the question
- "knowledge_gap": what information is missing, or an empty string
- "follow_up_queries": the queries that address the gap, or an empty array

Summaries:
{summaries}"#,
        summaries = join_summaries(summaries)
    )
}

pub fn answer(question: &str, summaries: &[ResearchSummary], current_date: &str) -> String {
    format!(
        r#"Generate a high-quality answer to the user's question based on the provided summaries.

Instructions:
- The current date is {current_date}.
- You are the final step of a multi-step research process; do not mention that you are the final step.
- Use all of the information in the summaries and the user's question.
- Keep the citations exactly as they appear in the summaries, in the form [label](cite:N). This is required.

User question:
{question}

Summaries:
{summaries}"#,
        summaries = join_summaries(summaries)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_writer_mentions_limits() {
        let prompt = query_writer("What is AI?", 3, "January 01, 2026");
        assert!(prompt.contains("more than 3 queries"));
        assert!(prompt.contains("January 01, 2026"));
        assert!(prompt.ends_with("What is AI?"));
    }

    #[test]
    fn test_summaries_are_joined_with_separator() {
        let summaries = vec![
            ResearchSummary {
                query: "a".into(),
                text: "first".into(),
                cited: vec![],
            },
            ResearchSummary {
                query: "b".into(),
                text: "second".into(),
                cited: vec![],
            },
        ];
        assert_eq!(join_summaries(&summaries), "first\n\n---\n\nsecond");
        assert!(answer("q", &summaries, "today").contains("first\n\n---\n\nsecond"));
    }
}
