//! Knowledge lookup: keyword-overlap scoring over a small static table.
//!
//! Every query word longer than two characters is checked against each
//! entry's question, answer, keywords and category (all lowercased,
//! substring match). Scores add up per word; the three best entries with a
//! positive score win. This is a heuristic, not a classifier.

pub mod builtin;
pub mod suggestions;

use std::path::Path;

use dave_core::error::KnowledgeError;
use dave_core::knowledge::{KnowledgeEntry, KnowledgeResponse};
use tracing::debug;

pub use builtin::{FALLBACK_MESSAGE, SUGGESTIONS, builtin_entries};
pub use suggestions::random_suggestions;

/// Points for a query word found in the question.
pub const QUESTION_WEIGHT: u32 = 10;
/// Points for a query word found in the answer.
pub const ANSWER_WEIGHT: u32 = 5;
/// Points for a query word found inside any keyword.
pub const KEYWORD_WEIGHT: u32 = 15;
/// Points for a query word found in the category.
pub const CATEGORY_WEIGHT: u32 = 8;
/// Maximum number of entries returned by a search.
pub const MAX_RESULTS: usize = 3;

/// A search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a KnowledgeEntry,
    pub score: u32,
}

/// An immutable table of FAQ entries.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// The table DAVE ships with.
    pub fn builtin() -> Self {
        Self::new(builtin_entries())
    }

    /// Load a replacement table from a JSON array of entries.
    pub fn from_json_file(path: &Path) -> Result<Self, KnowledgeError> {
        let load_error = |reason: String| KnowledgeError::Load {
            path: path.display().to_string(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        let entries: Vec<KnowledgeEntry> =
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?;
        if entries.is_empty() {
            return Err(load_error("no entries".into()));
        }
        debug!(path = %path.display(), count = entries.len(), "Knowledge base loaded");
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Up to three entries with a positive score, best first.
    ///
    /// Equal scores keep table order.
    pub fn search(&self, query: &str) -> Vec<ScoredEntry<'_>> {
        let words = query_words(query);
        if words.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredEntry<'_>> = self
            .entries
            .iter()
            .map(|entry| ScoredEntry {
                entry,
                score: score_entry(entry, &words),
            })
            .filter(|hit| hit.score > 0)
            .collect();

        // Stable sort keeps table order among ties.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(MAX_RESULTS);
        scored
    }

    pub fn best_match(&self, query: &str) -> Option<ScoredEntry<'_>> {
        self.search(query).into_iter().next()
    }

    /// The answer to show for a query, or the fallback message.
    pub fn respond(&self, query: &str) -> KnowledgeResponse {
        match self.best_match(query) {
            Some(hit) => {
                debug!(entry = %hit.entry.id, score = hit.score, "Knowledge match");
                KnowledgeResponse {
                    content: hit.entry.answer.clone(),
                    knowledge_base_id: Some(hit.entry.id.clone()),
                    related_links: hit.entry.related_links.clone(),
                }
            }
            None => {
                debug!("No knowledge match, using fallback");
                KnowledgeResponse {
                    content: FALLBACK_MESSAGE.to_string(),
                    knowledge_base_id: None,
                    related_links: Vec::new(),
                }
            }
        }
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercase the query and keep the words longer than two characters.
pub fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Sum the per-word points of one entry.
pub fn score_entry(entry: &KnowledgeEntry, words: &[String]) -> u32 {
    let question = entry.question.to_lowercase();
    let answer = entry.answer.to_lowercase();
    let category = entry.category.to_lowercase();
    let keywords: Vec<String> = entry.keywords.iter().map(|k| k.to_lowercase()).collect();

    words
        .iter()
        .map(|word| {
            let mut score = 0;
            if question.contains(word.as_str()) {
                score += QUESTION_WEIGHT;
            }
            if answer.contains(word.as_str()) {
                score += ANSWER_WEIGHT;
            }
            if keywords.iter().any(|k| k.contains(word.as_str())) {
                score += KEYWORD_WEIGHT;
            }
            if category.contains(word.as_str()) {
                score += CATEGORY_WEIGHT;
            }
            score
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dave_core::knowledge::RelatedLink;
    use std::io::Write;

    fn sample(id: &str, category: &str, question: &str, answer: &str, keywords: &[&str]) -> KnowledgeEntry {
        KnowledgeEntry {
            id: id.into(),
            category: category.into(),
            question: question.into(),
            answer: answer.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            related_links: vec![],
        }
    }

    #[test]
    fn estimator_question_ranks_entry_three_first() {
        let kb = KnowledgeBase::builtin();
        let results = kb.search("Como usar o Estimador de Migração?");
        assert!(!results.is_empty());
        assert_eq!(results[0].entry.id, "3");
    }

    #[test]
    fn unrelated_query_yields_fallback() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.search("xylofone wwwww kkkkk").is_empty());

        let response = kb.respond("xylofone wwwww kkkkk");
        assert!(response.is_fallback());
        assert_eq!(response.content, FALLBACK_MESSAGE);
        assert!(response.related_links.is_empty());
    }

    #[test]
    fn short_words_are_ignored() {
        let kb = KnowledgeBase::builtin();
        // Every word has two characters or fewer.
        assert!(kb.search("o é de io pg").is_empty());
        assert!(query_words("o é de").is_empty());
    }

    #[test]
    fn empty_query_yields_fallback() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.respond("   ").is_fallback());
    }

    #[test]
    fn weights_add_up_per_field() {
        let entry = sample("x", "banco", "pergunta sobre banco", "resposta sobre banco", &["banco de dados"]);
        let words = query_words("banco");
        assert_eq!(
            score_entry(&entry, &words),
            QUESTION_WEIGHT + ANSWER_WEIGHT + KEYWORD_WEIGHT + CATEGORY_WEIGHT
        );
    }

    #[test]
    fn keyword_counts_once_per_word() {
        let entry = sample("x", "c", "q", "a", &["index", "indexes", "index tuning"]);
        assert_eq!(score_entry(&entry, &query_words("index")), KEYWORD_WEIGHT);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let entry = sample("x", "c", "What is PostgreSQL?", "a", &[]);
        assert_eq!(score_entry(&entry, &query_words("POSTGRESQL")), QUESTION_WEIGHT);
    }

    #[test]
    fn results_capped_at_three_and_sorted() {
        let kb = KnowledgeBase::new(vec![
            sample("1", "c", "alpha", "", &[]),
            sample("2", "c", "alpha", "alpha", &[]),
            sample("3", "c", "alpha", "alpha", &["alpha"]),
            sample("4", "c", "alpha", "", &[]),
            sample("5", "c", "beta", "", &[]),
        ]);
        let results = kb.search("alpha");
        assert_eq!(results.len(), MAX_RESULTS);
        assert_eq!(results[0].entry.id, "3");
        assert_eq!(results[1].entry.id, "2");
        // Tie between 1 and 4 keeps table order.
        assert_eq!(results[2].entry.id, "1");
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn respond_carries_links_and_id() {
        let mut entry = sample("7", "c", "alpha", "the answer", &[]);
        entry.related_links.push(RelatedLink {
            title: "Docs".into(),
            url: "https://example.com".into(),
            is_external: true,
        });
        let kb = KnowledgeBase::new(vec![entry]);
        let response = kb.respond("alpha");
        assert_eq!(response.knowledge_base_id.as_deref(), Some("7"));
        assert_eq!(response.content, "the answer");
        assert_eq!(response.related_links.len(), 1);
    }

    #[test]
    fn load_from_json_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"[{{"id":"a","category":"c","question":"custom question","answer":"custom answer","keywords":["custom"]}}]"#
        )
        .unwrap();

        let kb = KnowledgeBase::from_json_file(tmp.path()).unwrap();
        assert_eq!(kb.entries().len(), 1);
        assert_eq!(kb.respond("custom").knowledge_base_id.as_deref(), Some("a"));
        assert!(kb.get("a").is_some());
    }

    #[test]
    fn load_rejects_bad_json_and_empty_tables() {
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(KnowledgeBase::from_json_file(bad.path()).is_err());

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, "[]").unwrap();
        assert!(KnowledgeBase::from_json_file(empty.path()).is_err());

        assert!(KnowledgeBase::from_json_file(Path::new("/nonexistent/kb.json")).is_err());
    }
}
