use std::sync::Arc;

use {
    tokio::task::JoinHandle,
    tracing::{debug, info},
};

use orion_chat::{ChatMessage, ChatStore, MessageCreated, Sender};

/// Fixed acknowledgment sent in reply to every user message.
pub const ACK_TEXT: &str =
    "Thank you for your message. I am the Orion agent. I have received your message.";

/// The in-flight agent reply. The responder hands this back to its host
/// instead of awaiting the write itself; append failures surface through
/// the handle to whoever tracks it.
pub type PendingReply = JoinHandle<orion_chat::Result<ChatMessage>>;

/// Per-event reply handler. Stateless apart from the store it writes to.
pub struct Responder {
    store: Arc<ChatStore>,
    ack_text: String,
}

impl Responder {
    pub fn new(store: Arc<ChatStore>) -> Self {
        Self {
            store,
            ack_text: ACK_TEXT.to_string(),
        }
    }

    /// Replace the built-in acknowledgment text.
    #[must_use]
    pub fn with_ack_text(mut self, text: impl Into<String>) -> Self {
        self.ack_text = text.into();
        self
    }

    /// Handle one message-created event.
    ///
    /// For a user message, starts appending the agent reply to the same chat
    /// and returns the pending write. For anything else returns `None`; this
    /// is the recursion guard: agent-authored messages never trigger a reply,
    /// so a reply can never trigger another reply.
    pub fn handle_created(&self, event: &MessageCreated) -> Option<PendingReply> {
        if event.message.sender != Sender::User {
            debug!(
                chat_id = %event.chat_id,
                message_id = %event.message.id,
                sender = %event.message.sender,
                "ignoring non-user message"
            );
            return None;
        }

        info!(
            chat_id = %event.chat_id,
            message_id = %event.message.id,
            "replying to user message"
        );

        let store = Arc::clone(&self.store);
        let chat_id = event.chat_id.clone();
        let text = self.ack_text.clone();

        Some(tokio::spawn(async move {
            store.append(&chat_id, Sender::Agent, text).await
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn temp_store() -> (Arc<ChatStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ChatStore::new(dir.path().to_path_buf()));
        (store, dir)
    }

    #[tokio::test]
    async fn user_message_gets_exactly_one_agent_reply() {
        let (store, _dir) = temp_store();
        let responder = Responder::new(Arc::clone(&store));
        let mut rx = store.subscribe();

        store.append("c1", Sender::User, "hello").await.unwrap();
        let event = rx.recv().await.unwrap();

        let pending = responder.handle_created(&event).expect("pending reply");
        let reply = pending.await.unwrap().unwrap();

        assert_eq!(reply.sender, Sender::Agent);
        assert_eq!(reply.text, ACK_TEXT);

        let msgs = store.history("c1").await.unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].sender, Sender::Agent);
        assert_eq!(msgs[1].text, ACK_TEXT);
    }

    #[tokio::test]
    async fn agent_message_is_a_no_op() {
        let (store, _dir) = temp_store();
        let responder = Responder::new(Arc::clone(&store));
        let mut rx = store.subscribe();

        store.append("c1", Sender::Agent, ACK_TEXT).await.unwrap();
        let event = rx.recv().await.unwrap();

        assert!(responder.handle_created(&event).is_none());
        assert_eq!(store.history("c1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reply_never_triggers_another_reply() {
        let (store, _dir) = temp_store();
        let responder = Responder::new(Arc::clone(&store));
        let mut rx = store.subscribe();

        store.append("c1", Sender::User, "hi").await.unwrap();
        let user_event = rx.recv().await.unwrap();
        responder
            .handle_created(&user_event)
            .expect("pending reply")
            .await
            .unwrap()
            .unwrap();

        // Feed the reply's own creation event back through the handler.
        let agent_event = rx.recv().await.unwrap();
        assert_eq!(agent_event.message.sender, Sender::Agent);
        assert!(responder.handle_created(&agent_event).is_none());

        assert_eq!(store.history("c1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn custom_ack_text_is_used() {
        let (store, _dir) = temp_store();
        let responder = Responder::new(Arc::clone(&store)).with_ack_text("noted.");
        let mut rx = store.subscribe();

        store.append("c1", Sender::User, "hi").await.unwrap();
        let event = rx.recv().await.unwrap();
        let reply = responder
            .handle_created(&event)
            .expect("pending reply")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply.text, "noted.");
    }

    #[tokio::test]
    async fn concurrent_chats_get_one_reply_each() {
        let (store, _dir) = temp_store();
        let responder = Arc::new(Responder::new(Arc::clone(&store)));
        let mut rx = store.subscribe();

        let chats = ["a", "b", "c", "d", "e"];
        let appends: Vec<_> = chats
            .iter()
            .map(|id| {
                let store = Arc::clone(&store);
                let id = id.to_string();
                tokio::spawn(async move { store.append(&id, Sender::User, "hello").await })
            })
            .collect();
        for handle in appends {
            handle.await.unwrap().unwrap();
        }

        let mut pending = Vec::new();
        for _ in &chats {
            let event = rx.recv().await.unwrap();
            pending.push(responder.handle_created(&event).expect("pending reply"));
        }
        for handle in pending {
            handle.await.unwrap().unwrap();
        }

        for id in &chats {
            let msgs = store.history(id).await.unwrap();
            assert_eq!(msgs.len(), 2, "chat {id} should have exactly two messages");
            assert_eq!(msgs[0].sender, Sender::User);
            assert_eq!(msgs[1].sender, Sender::Agent);
        }
    }
}
