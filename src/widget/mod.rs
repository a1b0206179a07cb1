use std::sync::Arc;
use std::sync::atomic::{ AtomicU64, Ordering };

use log::{ debug, warn };

use crate::error::ChatError;
use crate::models::chat::{ ChatMessage, Sender };
use crate::models::wire::ChatRequest;
use crate::transport::ChatTransport;

/// Rendered to the transcript when a send fails, so the user never sees
/// a silent drop.
const SEND_FAILURE_NOTICE: &str = "Sorry, I couldn't reach the chat service. Please try again.";

/// The environment the widget renders into: a message container, an input
/// slot, and the conversation id bound to that input. A browser page in
/// spirit, a terminal or a mock in practice.
pub trait Surface: Send + Sync {
    /// Identifier bound to the input element. Read exactly once, when the
    /// widget initializes.
    fn conversation_id(&self) -> Option<String>;

    /// Append a sender-classed element holding the literal text. The text
    /// is plain content and must never be interpreted as markup.
    fn append_message(&self, message: &ChatMessage);

    /// Empty the text-entry element.
    fn clear_input(&self);

    /// Scroll the container to its maximum offset so the newest message
    /// stays visible.
    fn scroll_to_latest(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    Sending,
}

/// What a call to [`ChatWidget::send`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input: nothing rendered, nothing cleared, nothing sent.
    Skipped,
    /// The reply was rendered as a bot message.
    Replied,
    /// The send failed and a failure notice was rendered in its place.
    Failed,
    /// A newer send was issued before this one settled; its response was
    /// discarded unrendered.
    Superseded,
}

pub struct ChatWidget {
    surface: Arc<dyn Surface>,
    transport: Arc<dyn ChatTransport>,
    conversation_id: String,
    issued: AtomicU64,
    settled: AtomicU64,
}

impl std::fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("conversation_id", &self.conversation_id)
            .field("issued", &self.issued)
            .field("settled", &self.settled)
            .finish_non_exhaustive()
    }
}

impl ChatWidget {
    /// Binds the widget to its surface and transport. Fails fast when the
    /// surface has no conversation id to offer, rather than surfacing the
    /// problem later inside a send.
    pub fn new(
        surface: Arc<dyn Surface>,
        transport: Arc<dyn ChatTransport>
    ) -> Result<Self, ChatError> {
        let conversation_id = surface
            .conversation_id()
            .ok_or(ChatError::MissingConversationId)?;
        debug!("Chat widget bound to conversation {}", conversation_id);

        Ok(Self {
            surface,
            transport,
            conversation_id,
            issued: AtomicU64::new(0),
            settled: AtomicU64::new(0),
        })
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn state(&self) -> WidgetState {
        if self.issued.load(Ordering::SeqCst) > self.settled.load(Ordering::SeqCst) {
            WidgetState::Sending
        } else {
            WidgetState::Idle
        }
    }

    fn render(&self, sender: Sender, text: &str) {
        let message = ChatMessage::now(sender, text);
        self.surface.append_message(&message);
        self.surface.scroll_to_latest();
    }

    /// Submit one line of input: render it, clear the input slot, post it
    /// to the chat endpoint, then render the reply. Failures are rendered
    /// as a bot-styled notice; nothing escapes this boundary.
    ///
    /// Overlapping sends are allowed. Each send carries a sequence number,
    /// and a response that settles after a newer send was issued is
    /// dropped instead of rendered out of order.
    pub async fn send(&self, input: &str) -> SendOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SendOutcome::Skipped;
        }

        self.render(Sender::User, text);
        self.surface.clear_input();

        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let request = ChatRequest {
            message: text.to_string(),
            conversation_id: self.conversation_id.clone(),
        };

        let result = self.transport.send_chat(&request).await;
        self.settled.fetch_add(1, Ordering::SeqCst);
        let superseded = self.issued.load(Ordering::SeqCst) > seq;

        match result {
            Ok(reply) => {
                if superseded {
                    debug!("Dropping reply for send #{}: superseded by a newer send", seq);
                    return SendOutcome::Superseded;
                }
                self.render(Sender::Bot, &reply.message);
                SendOutcome::Replied
            }
            Err(e) => {
                warn!("Send #{} on conversation {} failed: {}", seq, self.conversation_id, e);
                if superseded {
                    debug!("Dropping failure notice for send #{}: superseded", seq);
                    return SendOutcome::Superseded;
                }
                self.render(Sender::Bot, SEND_FAILURE_NOTICE);
                SendOutcome::Failed
            }
        }
    }
}
