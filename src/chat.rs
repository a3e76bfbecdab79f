use crate::api::ChatBackend;
use crate::structs::{ChatMessage, MessageRole};

//////////////////////////////////////////////////////////
// Chat panel controller
//////////////////////////////////////////////////////////

/// Owns the transcript and forwards submitted text to the backend. The
/// transcript is append-only; frontends render it bottom-anchored so the
/// newest entry is always visible.
pub struct ChatWidget<B: ChatBackend> {
    backend: B,
    transcript: Vec<ChatMessage>,
}

impl<B: ChatBackend> ChatWidget<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Handles one form submission. Empty or whitespace-only input is a
    /// no-op: nothing appended, no request issued. There is no guard against
    /// overlapping submissions; replies append in completion order.
    pub async fn submit(&mut self, input: &str) {
        let text = input.trim();
        if text.is_empty() {
            return;
        }

        // Optimistic display before the request goes out.
        self.transcript
            .push(ChatMessage::new(text, MessageRole::User));

        match self.backend.send_message(text).await {
            Ok(reply) => {
                self.transcript
                    .push(ChatMessage::new(reply, MessageRole::Assistant));
            }
            Err(err) => {
                log::error!("Erro na requisição ao backend: {}", err);
                self.transcript.push(ChatMessage::new(
                    format!("Desculpe, não consegui me conectar. (Erro: {})", err),
                    MessageRole::Error,
                ));
            }
        }
    }
}
