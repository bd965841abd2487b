//! Knowledge base value types.

use serde::{Deserialize, Serialize};

/// A link shown under an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedLink {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub is_external: bool,
}

/// A static FAQ record. Defined at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub category: String,
    pub question: String,
    pub answer: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_links: Vec<RelatedLink>,
}

/// What the assistant should say in reply to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeResponse {
    pub content: String,
    /// Entry that produced the answer; `None` for the fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_links: Vec<RelatedLink>,
}

impl KnowledgeResponse {
    pub fn is_fallback(&self) -> bool {
        self.knowledge_base_id.is_none()
    }
}
