use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::PathBuf,
};

use {fd_lock::RwLock, tokio::sync::broadcast};

use crate::{
    error::{Context, Result},
    message::{ChatMessage, Sender},
};

/// Emitted once per newly appended message. Carries the two variable
/// segments of the trigger path: the chat id and (inside the message)
/// the message id.
#[derive(Debug, Clone)]
pub struct MessageCreated {
    pub chat_id: String,
    pub message: ChatMessage,
}

/// Append-only JSONL chat storage with file locking.
///
/// One file per chat under `<base_dir>/chats/`. Appends assign the message
/// id and timestamp server-side and fan the new record out to subscribers.
pub struct ChatStore {
    pub base_dir: PathBuf,
    events: broadcast::Sender<MessageCreated>,
}

const EVENT_CAPACITY: usize = 256;

impl ChatStore {
    pub fn new(base_dir: PathBuf) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { base_dir, events }
    }

    /// Subscribe to message-created events. Each subscriber sees every
    /// append that happens after the subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<MessageCreated> {
        self.events.subscribe()
    }

    /// Sanitize a chat id for use as a filename.
    pub fn chat_to_filename(chat_id: &str) -> String {
        chat_id.replace([':', '/', '\\'], "_")
    }

    fn path_for(&self, chat_id: &str) -> PathBuf {
        self.base_dir
            .join("chats")
            .join(format!("{}.jsonl", Self::chat_to_filename(chat_id)))
    }

    /// Append a message to a chat and emit a [`MessageCreated`] event.
    ///
    /// The id and timestamp are assigned here, at write time; callers only
    /// supply the sender and text. Returns the stored record.
    pub async fn append(
        &self,
        chat_id: &str,
        sender: Sender,
        text: impl Into<String>,
    ) -> Result<ChatMessage> {
        let message = ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp: chrono::Utc::now(),
        };

        let path = self.path_for(chat_id);
        let line = serde_json::to_string(&message)?;

        tokio::task::spawn_blocking(move || -> Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("creating chats directory")?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening {}", path.display()))?;
            let mut lock = RwLock::new(file);
            let mut guard = lock.write().context("locking chat file")?;
            writeln!(*guard, "{line}")?;
            Ok(())
        })
        .await??;

        // Receivers may not exist yet; a dropped event is not an error.
        let _ = self.events.send(MessageCreated {
            chat_id: chat_id.to_string(),
            message: message.clone(),
        });

        Ok(message)
    }

    /// Read a chat's full history in append order.
    pub async fn history(&self, chat_id: &str) -> Result<Vec<ChatMessage>> {
        let path = self.path_for(chat_id);

        tokio::task::spawn_blocking(move || -> Result<Vec<ChatMessage>> {
            if !path.exists() {
                return Ok(vec![]);
            }
            let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            let reader = BufReader::new(file);
            let mut messages = Vec::new();
            for line in reader.lines() {
                let line = line?;
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match serde_json::from_str(trimmed) {
                    Ok(msg) => messages.push(msg),
                    Err(e) => {
                        tracing::warn!("skipping malformed JSONL line: {e}");
                    },
                }
            }
            Ok(messages)
        })
        .await?
    }

    /// Delete a chat's file. Does not emit events.
    pub async fn clear(&self, chat_id: &str) -> Result<()> {
        let path = self.path_for(chat_id);

        tokio::task::spawn_blocking(move || -> Result<()> {
            if path.exists() {
                fs::remove_file(&path)?;
            }
            Ok(())
        })
        .await??;

        Ok(())
    }

    /// List all chat ids by scanning JSONL files in the chats directory.
    pub fn list_chats(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.base_dir.join("chats")) else {
            return vec![];
        };
        let mut ids: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().to_string();
                name.strip_suffix(".jsonl").map(str::to_string)
            })
            .collect();
        ids.sort();
        ids
    }
}
