//! Concierge support chat.
//!
//! Each visitor gets a [`Conversation`] keyed by a UUID kept in their
//! session. Conversations live in a `moka` cache and are dropped after two
//! hours without activity.
//!
//! A send appends the shopper's message immediately, marks the conversation
//! as composing, asks Gemini for a reply with the whole transcript as
//! history, then appends the reply (or a fixed apology on failure) and
//! clears the composing flag. Sends on one conversation run one at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lumina_luxe_core::{ChatMessage, Product, Transcript};
use moka::future::Cache;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{Instrument as _, instrument};
use uuid::Uuid;

use crate::gemini::{Content, GeminiClient, GeminiError, GenerateContentRequest};

/// Reply recorded when the model can't be reached or returns nothing.
pub const FALLBACK_REPLY: &str =
    "申し訳ございません。現在コンシェルジュが席を外しております。後ほど再度お声がけください。";

/// Greeting shown above an empty transcript.
pub const GREETING: &str = "ようこそ。Luminaコンシェルジュです。何かお探しでしょうか？";

const PERSONA: &str = "あなたはLumina Luxeの専属AIコンシェルジュ「Lumina」です。\
丁寧で洗練された日本語で顧客対応を行ってください。最新の商品リストはこちらです: ";

const IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);
const MAX_CONVERSATIONS: u64 = 10_000;

/// Concierge system instruction embedding the full catalog.
#[must_use]
pub fn system_instruction(catalog: &[Product]) -> String {
    let products = serde_json::to_string(catalog).unwrap_or_else(|_| "[]".to_string());
    format!("{PERSONA}{products}")
}

/// Point-in-time view of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSnapshot {
    pub messages: Vec<ChatMessage>,
    /// A reply is being generated.
    pub composing: bool,
}

/// One visitor's chat with the concierge.
#[derive(Debug, Default)]
pub struct Conversation {
    send_lock: Mutex<()>,
    transcript: RwLock<Transcript>,
    composing: AtomicBool,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reply is in flight.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.composing.load(Ordering::Acquire)
    }

    /// Messages and composing state, read consistently.
    pub async fn snapshot(&self) -> ConversationSnapshot {
        let transcript = self.transcript.read().await;
        ConversationSnapshot {
            messages: transcript.messages().to_vec(),
            composing: self.is_composing(),
        }
    }

    /// Append the shopper's message and return the history to send.
    async fn begin_turn(&self, text: &str) -> Vec<Content> {
        let mut transcript = self.transcript.write().await;
        transcript.push(ChatMessage::user(text));
        self.composing.store(true, Ordering::Release);
        transcript.messages().iter().map(Content::from).collect()
    }

    /// Append the concierge's reply and clear the composing flag.
    async fn finish_turn(&self, reply: String) {
        let mut transcript = self.transcript.write().await;
        transcript.push(ChatMessage::model(reply));
        self.composing.store(false, Ordering::Release);
    }
}

/// Registry of live conversations plus the Gemini client that answers them.
#[derive(Clone)]
pub struct Concierge {
    inner: Arc<ConciergeInner>,
}

struct ConciergeInner {
    gemini: GeminiClient,
    conversations: Cache<Uuid, Arc<Conversation>>,
}

impl Concierge {
    /// Create a concierge with the default idle eviction.
    #[must_use]
    pub fn new(gemini: GeminiClient) -> Self {
        Self::with_idle_timeout(gemini, IDLE_TIMEOUT)
    }

    /// Create a concierge that forgets conversations after `idle` without use.
    #[must_use]
    pub fn with_idle_timeout(gemini: GeminiClient, idle: Duration) -> Self {
        let conversations = Cache::builder()
            .max_capacity(MAX_CONVERSATIONS)
            .time_to_idle(idle)
            .build();

        Self {
            inner: Arc::new(ConciergeInner {
                gemini,
                conversations,
            }),
        }
    }

    /// Get the conversation for `id`, starting a new one if needed.
    pub async fn conversation(&self, id: Uuid) -> Arc<Conversation> {
        self.inner
            .conversations
            .get_with(id, async { Arc::new(Conversation::new()) })
            .await
    }

    /// Send a message on a conversation and wait for the reply.
    ///
    /// Blank messages are ignored. Model failures are logged and answered
    /// with [`FALLBACK_REPLY`]; they never surface to the caller.
    ///
    /// The turn runs on its own task, so it still records a reply and clears
    /// the composing flag if the caller is dropped mid-request.
    #[instrument(skip(self, conversation, text, catalog), fields(len = text.len()))]
    pub async fn send(
        &self,
        conversation: &Arc<Conversation>,
        text: &str,
        catalog: &[Product],
    ) -> ConversationSnapshot {
        if text.trim().is_empty() {
            return conversation.snapshot().await;
        }

        let turn = tokio::spawn(
            {
                let concierge = self.clone();
                let conversation = Arc::clone(conversation);
                let text = text.to_string();
                let catalog = catalog.to_vec();
                async move { concierge.run_turn(&conversation, &text, &catalog).await }
            }
            .in_current_span(),
        );

        if let Err(e) = turn.await {
            tracing::error!(error = %e, "Concierge turn task failed");
        }
        conversation.snapshot().await
    }

    async fn run_turn(&self, conversation: &Conversation, text: &str, catalog: &[Product]) {
        let _turn = conversation.send_lock.lock().await;
        let history = conversation.begin_turn(text).await;

        let reply = match self.request_reply(history, catalog).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Concierge reply failed, sending fallback");
                FALLBACK_REPLY.to_string()
            }
        };

        conversation.finish_turn(reply).await;
    }

    async fn request_reply(
        &self,
        history: Vec<Content>,
        catalog: &[Product],
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: history,
            system_instruction: Some(Content::system(system_instruction(catalog))),
            generation_config: None,
        };
        self.inner.gemini.generate_text(&request).await
    }
}
