use std::sync::Arc;

use {
    tokio::sync::broadcast::error::RecvError,
    tracing::{info, warn},
};

use orion_chat::ChatStore;

use crate::reply::Responder;

/// Long-running subscriber loop: one [`Responder`] invocation per
/// message-created event.
///
/// Each event is handled independently; the pending reply is tracked in a
/// detached task, so a slow or failing append never blocks the loop. The
/// loop ends when the store (and with it the event channel) is dropped.
pub async fn run(store: Arc<ChatStore>, responder: Responder) {
    let mut rx = store.subscribe();
    info!("responder service started");

    loop {
        match rx.recv().await {
            Ok(event) => {
                let Some(pending) = responder.handle_created(&event) else {
                    continue;
                };
                let chat_id = event.chat_id.clone();
                tokio::spawn(async move {
                    match pending.await {
                        Ok(Ok(_)) => {},
                        Ok(Err(e)) => {
                            warn!(chat_id = %chat_id, error = %e, "agent reply append failed");
                        },
                        Err(e) => {
                            warn!(chat_id = %chat_id, error = %e, "agent reply task failed");
                        },
                    }
                });
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "responder lagged behind message events");
            },
            Err(RecvError::Closed) => break,
        }
    }

    info!("responder service stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    use {orion_chat::Sender, std::time::Duration};

    #[tokio::test]
    async fn service_replies_to_user_messages() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ChatStore::new(dir.path().to_path_buf()));
        let responder = Responder::new(Arc::clone(&store));

        let service = tokio::spawn(run(Arc::clone(&store), responder));

        store.append("c1", Sender::User, "hello").await.unwrap();

        // The reply lands asynchronously; poll briefly.
        let mut replied = false;
        for _ in 0..50 {
            let msgs = store.history("c1").await.unwrap();
            if msgs.len() == 2 {
                assert_eq!(msgs[1].sender, Sender::Agent);
                replied = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(replied, "agent reply never appeared");

        // The agent reply's own event must not have produced a third message.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.history("c1").await.unwrap().len(), 2);

        service.abort();
    }
}
