//! Text the assistant shows: the greeting and answers with their links.

use chrono::Utc;
use dave_core::knowledge::KnowledgeResponse;
use dave_core::message::{Message, Role};

/// Id of the greeting; it is shown but never persisted or rated.
pub const WELCOME_MESSAGE_ID: &str = "welcome";

pub const WELCOME_MESSAGE: &str = "👋 Olá! Eu sou o DAVE, seu assistente virtual!\n\nEstou aqui para ajudar com dúvidas sobre administração de bancos de dados, análise de performance, migrações e as ferramentas disponíveis na plataforma.\n\nComo posso ajudar você hoje?";

const LINKS_HEADER: &str = "\n\n**Links úteis:**";

pub fn welcome_message() -> Message {
    Message {
        id: WELCOME_MESSAGE_ID.to_string(),
        role: Role::Assistant,
        content: WELCOME_MESSAGE.to_string(),
        timestamp: Utc::now(),
        knowledge_base_id: None,
    }
}

/// The answer text followed by a markdown list of related links, if any.
pub fn render_response(response: &KnowledgeResponse) -> String {
    let mut content = response.content.clone();
    if !response.related_links.is_empty() {
        content.push_str(LINKS_HEADER);
        for link in &response.related_links {
            content.push_str(&format!("\n• [{}]({})", link.title, link.url));
        }
    }
    content
}
