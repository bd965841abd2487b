//! The per-session chat controller.

use std::collections::HashSet;
use std::sync::Arc;

use dave_conversation::ConversationService;
use dave_core::error::Result;
use dave_core::message::{Message, Role, SessionId};
use dave_knowledge::{KnowledgeBase, random_suggestions};
use tracing::{debug, info};

use crate::ponder::PonderDelay;
use crate::render::{WELCOME_MESSAGE_ID, render_response, welcome_message};

/// The pair of messages produced by one question.
#[derive(Debug, Clone)]
pub struct Reply {
    pub user: Message,
    pub assistant: Message,
}

/// Chat state for one session: current conversation, what has been shown,
/// which answers were already rated.
pub struct Assistant {
    conversations: ConversationService,
    knowledge: Arc<KnowledgeBase>,
    ponder: PonderDelay,
    suggestion_count: usize,

    conversation_id: String,
    transcript: Vec<Message>,
    feedback_given: HashSet<String>,
    suggestions: Vec<String>,
}

impl Assistant {
    /// Resume the session's current conversation (or start one).
    ///
    /// An empty conversation is shown as the welcome message alone.
    pub async fn open(
        conversations: ConversationService,
        knowledge: Arc<KnowledgeBase>,
    ) -> Result<Self> {
        let conversation = conversations.current_conversation().await?;
        let transcript = if conversation.is_empty() {
            vec![welcome_message()]
        } else {
            conversation.messages
        };

        let suggestion_count = 3;
        debug!(
            session = %conversations.session_id(),
            conversation = %conversation.id,
            messages = transcript.len(),
            "Assistant opened"
        );

        Ok(Self {
            conversations,
            knowledge,
            ponder: PonderDelay::default(),
            suggestion_count,
            conversation_id: conversation.id,
            transcript,
            feedback_given: HashSet::new(),
            suggestions: random_suggestions(suggestion_count),
        })
    }

    /// Set the pause before each reply.
    pub fn with_ponder(mut self, ponder: PonderDelay) -> Self {
        self.ponder = ponder;
        self
    }

    /// Set how many starter questions are offered.
    pub fn with_suggestion_count(mut self, count: usize) -> Self {
        self.suggestion_count = count;
        self.suggestions = random_suggestions(count);
        self
    }

    pub fn session_id(&self) -> &SessionId {
        self.conversations.session_id()
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Messages as shown, welcome message included.
    pub fn messages(&self) -> &[Message] {
        &self.transcript
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn has_feedback(&self, message_id: &str) -> bool {
        self.feedback_given.contains(message_id)
    }

    pub fn conversations(&self) -> &ConversationService {
        &self.conversations
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Ask a question. Blank input yields `None` and touches nothing.
    pub async fn send(&mut self, text: &str) -> Result<Option<Reply>> {
        let question = text.trim();
        if question.is_empty() {
            return Ok(None);
        }

        let user = self
            .conversations
            .add_message(&self.conversation_id, Role::User, question, None)
            .await?;
        self.transcript.push(user.clone());

        self.ponder.wait().await;

        let response = self.knowledge.respond(question);
        let content = render_response(&response);
        let assistant = self
            .conversations
            .add_message(
                &self.conversation_id,
                Role::Assistant,
                &content,
                response.knowledge_base_id.clone(),
            )
            .await?;
        self.transcript.push(assistant.clone());
        self.suggestions = random_suggestions(self.suggestion_count);

        info!(
            conversation = %self.conversation_id,
            entry = response.knowledge_base_id.as_deref().unwrap_or("fallback"),
            "Question answered"
        );

        Ok(Some(Reply { user, assistant }))
    }

    /// Rate an answer once.
    ///
    /// Returns `false` without recording anything for the welcome message,
    /// for ids that are not assistant messages of this transcript, and for
    /// answers already rated in this session.
    pub async fn give_feedback(
        &mut self,
        message_id: &str,
        was_helpful: bool,
        comment: Option<String>,
    ) -> Result<bool> {
        if message_id == WELCOME_MESSAGE_ID || self.feedback_given.contains(message_id) {
            return Ok(false);
        }
        let is_answer = self
            .transcript
            .iter()
            .any(|m| m.id == message_id && m.role == Role::Assistant);
        if !is_answer {
            return Ok(false);
        }

        self.conversations
            .submit_feedback(message_id, was_helpful, comment)
            .await?;
        self.feedback_given.insert(message_id.to_string());
        Ok(true)
    }

    /// Start over in a fresh conversation.
    pub async fn new_conversation(&mut self) -> Result<()> {
        let conversation = self.conversations.create_conversation().await?;
        self.conversation_id = conversation.id;
        self.transcript = vec![welcome_message()];
        self.feedback_given.clear();
        self.suggestions = random_suggestions(self.suggestion_count);
        Ok(())
    }

    /// Forget this session's stored conversations and start a fresh one.
    pub async fn clear_history(&mut self) -> Result<usize> {
        let removed = self.conversations.clear_history().await?;
        self.new_conversation().await?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dave_conversation::StoreLimits;
    use dave_core::storage::KeyValueStore;
    use dave_storage::InMemoryStore;

    async fn assistant_on(store: Arc<dyn KeyValueStore>) -> Assistant {
        let service = ConversationService::new(
            store,
            SessionId::from("session_test"),
            StoreLimits::default(),
        );
        Assistant::open(service, Arc::new(KnowledgeBase::builtin()))
            .await
            .unwrap()
            .with_ponder(PonderDelay::none())
    }

    async fn assistant() -> Assistant {
        assistant_on(Arc::new(InMemoryStore::new())).await
    }

    #[tokio::test]
    async fn fresh_session_shows_welcome() {
        let a = assistant().await;
        assert_eq!(a.messages().len(), 1);
        assert_eq!(a.messages()[0].id, WELCOME_MESSAGE_ID);
        assert_eq!(a.suggestions().len(), 3);
    }

    #[tokio::test]
    async fn welcome_is_not_persisted() {
        let a = assistant().await;
        let stored = a
            .conversations()
            .get_conversation(a.conversation_id())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.messages.is_empty());
    }

    #[tokio::test]
    async fn send_appends_question_then_answer() {
        let mut a = assistant().await;
        let reply = a
            .send("Como usar o Estimador de Migração?")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply.user.role, Role::User);
        assert_eq!(reply.assistant.role, Role::Assistant);
        assert_eq!(reply.assistant.knowledge_base_id.as_deref(), Some("3"));
        assert!(reply.assistant.content.contains("**Links úteis:**"));
        assert!(reply.assistant.content.contains("[Abrir Estimador](https://relatoriomigracao.vercel.app/)"));

        let stored = a
            .conversations()
            .get_conversation(a.conversation_id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.messages.len(), 2);
        assert_eq!(stored.messages[0].id, reply.user.id);
        assert_eq!(stored.messages[1].id, reply.assistant.id);
        // welcome + question + answer
        assert_eq!(a.messages().len(), 3);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut a = assistant().await;
        assert!(a.send("   ").await.unwrap().is_none());
        assert_eq!(a.messages().len(), 1);
    }

    #[tokio::test]
    async fn unknown_question_gets_fallback_without_id() {
        let mut a = assistant().await;
        let reply = a.send("xylofone wwwww kkkkk").await.unwrap().unwrap();
        assert!(reply.assistant.knowledge_base_id.is_none());
        assert!(reply.assistant.content.starts_with("Desculpe"));
    }

    #[tokio::test]
    async fn feedback_is_recorded_once_per_answer() {
        let mut a = assistant().await;
        let reply = a.send("O que é o DAVE?").await.unwrap().unwrap();

        assert!(a.give_feedback(&reply.assistant.id, true, None).await.unwrap());
        assert!(!a.give_feedback(&reply.assistant.id, false, None).await.unwrap());
        assert!(a.has_feedback(&reply.assistant.id));

        let stored = a.conversations().all_feedback().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].was_helpful);
    }

    #[tokio::test]
    async fn feedback_rejected_for_welcome_and_user_messages() {
        let mut a = assistant().await;
        let reply = a.send("O que é o DAVE?").await.unwrap().unwrap();

        assert!(!a.give_feedback(WELCOME_MESSAGE_ID, true, None).await.unwrap());
        assert!(!a.give_feedback(&reply.user.id, true, None).await.unwrap());
        assert!(!a.give_feedback("msg_unknown", true, None).await.unwrap());
        assert!(a.conversations().all_feedback().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_conversation_resets_view() {
        let mut a = assistant().await;
        let reply = a.send("O que é o DAVE?").await.unwrap().unwrap();
        a.give_feedback(&reply.assistant.id, true, None).await.unwrap();
        let first = a.conversation_id().to_string();

        a.new_conversation().await.unwrap();
        assert_ne!(a.conversation_id(), first);
        assert_eq!(a.messages().len(), 1);
        assert!(!a.has_feedback(&reply.assistant.id));
    }

    #[tokio::test]
    async fn reopening_resumes_conversation() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let mut first = assistant_on(store.clone()).await;
        first.send("Quanto tempo leva uma migração?").await.unwrap();

        let resumed = assistant_on(store).await;
        assert_eq!(resumed.conversation_id(), first.conversation_id());
        assert_eq!(resumed.messages().len(), 2);
        assert_ne!(resumed.messages()[0].id, WELCOME_MESSAGE_ID);
    }

    #[tokio::test]
    async fn clear_history_starts_fresh() {
        let mut a = assistant().await;
        a.send("O que é o DAVE?").await.unwrap();
        let removed = a.clear_history().await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(a.messages().len(), 1);

        let stored = a.conversations().all_conversations().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].messages.is_empty());
    }

    #[tokio::test]
    async fn suggestion_count_is_configurable() {
        let a = assistant().await.with_suggestion_count(5);
        assert_eq!(a.suggestions().len(), 5);
    }
}
