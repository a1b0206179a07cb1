use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;

use crate::error::ChatError;
use crate::models::wire::{ ApiError, ChatReply, ChatRequest, SessionReply };

/// Network seam of the widget: one outbound request per send action.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;
}

pub struct HttpChatTransport {
    http: HttpClient,
    base_url: String,
}

impl HttpChatTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let url: String = base_url.into();
        Self {
            http: HttpClient::new(),
            base_url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the server for a fresh conversation id.
    pub async fn open_session(&self) -> Result<String, ChatError> {
        let url = format!("{}/session", self.base_url);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(ChatError::Endpoint {
                status: status.as_u16(),
                detail: error_detail(&body, status.as_u16()),
            });
        }
        let session: SessionReply = serde_json
            ::from_str(&body)
            .map_err(|e| ChatError::MalformedReply(e.to_string()))?;
        Ok(session.conversation_id)
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let url = format!("{}/chat", self.base_url);
        debug!("POST {} (conversation {})", url, request.conversation_id);

        let resp = self.http.post(&url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ChatError::Endpoint {
                status: status.as_u16(),
                detail: error_detail(&body, status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|e| ChatError::MalformedReply(e.to_string()))
    }
}

/// Prefer the server's own error message when the body carries one.
fn error_detail(body: &str, status: u16) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_err) => api_err.message,
        Err(_) => format!("HTTP {}", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::get;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener
            ::bind("127.0.0.1:0").await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router.into_make_service()).await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_failure() {
        // Nothing listens on port 9; the connect must fail, not panic.
        let transport = HttpChatTransport::new("http://127.0.0.1:9");
        let request = ChatRequest {
            message: "Hello".into(),
            conversation_id: "c-1".into(),
        };
        let err = transport.send_chat(&request).await.expect_err("expected failure");
        assert!(matches!(err, ChatError::Network(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn non_json_reply_is_malformed() {
        let router = Router::new().route(
            "/chat",
            axum::routing::post(|| async { "this is not json" })
        );
        let base = spawn(router).await;
        let transport = HttpChatTransport::new(&base);
        let request = ChatRequest {
            message: "Hello".into(),
            conversation_id: "c-1".into(),
        };
        let err = transport.send_chat(&request).await.expect_err("expected failure");
        assert!(matches!(err, ChatError::MalformedReply(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn session_reply_is_decoded() {
        let router = Router::new().route(
            "/session",
            get(|| async { r#"{"conversation_id":"abc-123"}"# })
        );
        let base = spawn(router).await;
        let transport = HttpChatTransport::new(format!("{}/", base));
        assert_eq!(transport.open_session().await.expect("session"), "abc-123");
    }
}
