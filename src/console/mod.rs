use std::error::Error;
use std::io::{ self, Write };
use std::sync::{ Arc, Mutex };

use log::info;
use tokio::io::{ AsyncBufReadExt, BufReader };

use crate::models::chat::{ ChatMessage, Conversation };
use crate::transport::HttpChatTransport;
use crate::widget::{ ChatWidget, Surface };

/// Terminal rendition of the chat surface. The transcript is an in-memory
/// conversation; appending prints a `sender> text` line.
pub struct ConsoleSurface {
    conversation: Mutex<Conversation>,
}

impl ConsoleSurface {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation: Mutex::new(Conversation::new(conversation_id)),
        }
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.conversation.lock().unwrap_or_else(|e| e.into_inner()).messages.clone()
    }
}

impl Surface for ConsoleSurface {
    fn conversation_id(&self) -> Option<String> {
        let conversation = self.conversation.lock().unwrap_or_else(|e| e.into_inner());
        Some(conversation.id.clone())
    }

    fn append_message(&self, message: &ChatMessage) {
        let mut conversation = self.conversation.lock().unwrap_or_else(|e| e.into_inner());
        println!("{}> {}", message.sender, message.text);
        conversation.messages.push(message.clone());
    }

    fn clear_input(&self) {
        // The terminal consumed the line on submit; there is nothing left
        // in the input slot to clear.
    }

    fn scroll_to_latest(&self) {
        // The terminal scrolls as lines print; flushing keeps the newest
        // line visible even through pipes.
        let _ = io::stdout().flush();
    }
}

/// Interactive chat session against a running server: one send per stdin
/// line, until EOF or `/quit`.
pub async fn run_console(endpoint: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let transport = Arc::new(HttpChatTransport::new(endpoint));

    // The conversation id comes from the server, like the page embedding
    // it at load time. Without one there is no session to run.
    let conversation_id = transport
        .open_session().await
        .map_err(|e| format!("could not open a session on {}: {}", endpoint, e))?;
    info!("Joined conversation {}", conversation_id);

    let surface = Arc::new(ConsoleSurface::new(conversation_id));
    let widget = ChatWidget::new(surface, transport.clone())?;

    println!("Connected to {} (conversation {})", transport.base_url(), widget.conversation_id());
    println!("Type a message and press enter; /quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        widget.send(&line).await;
    }

    info!("Console session on conversation {} closed", widget.conversation_id());
    Ok(())
}
