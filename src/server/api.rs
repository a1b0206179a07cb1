use crate::faq::FaqResponder;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    extract::State,
    response::IntoResponse,
    http::StatusCode,
    Json,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn };
use uuid::Uuid;

use crate::models::wire::{ ApiError, ChatReply, ChatRequest, SessionReply };

#[derive(Clone)]
struct AppState {
    responder: Arc<FaqResponder>,
}

pub fn router(responder: Arc<FaqResponder>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/session", get(open_session_handler))
        .route("/chat", post(chat_handler))
        .layer(cors)
        .with_state(AppState { responder })
}

pub async fn start_http_server(
    addr: &str,
    responder: Arc<FaqResponder>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    info!("Starting chat API server on: http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(responder).into_make_service()).await?;
    Ok(())
}

/// Hand out a fresh conversation id. Nothing is registered server-side;
/// the id is purely a correlation token for the client's requests.
async fn open_session_handler() -> Json<SessionReply> {
    let conversation_id = Uuid::new_v4().to_string();
    info!("Opened conversation {}", conversation_id);
    Json(SessionReply { conversation_id })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>
) -> impl IntoResponse {
    if request.message.is_empty() || request.conversation_id.is_empty() {
        warn!("Rejecting chat request with empty message or conversation id");
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "Invalid input".to_string(),
                message: "Message and conversation ID are required.".to_string(),
            }),
        ).into_response();
    }

    let reply = state.responder.generate_response(&request.message);
    info!("Answered message on conversation {}", request.conversation_id);

    (
        StatusCode::OK,
        Json(ChatReply {
            message: reply,
            conversation_id: request.conversation_id,
        }),
    ).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;
    use crate::transport::{ ChatTransport, HttpChatTransport };

    async fn spawn_server() -> String {
        let responder = Arc::new(FaqResponder::load("does/not/exist.json", 0.3).expect("load"));
        let listener = tokio::net::TcpListener
            ::bind("127.0.0.1:0").await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let app = router(responder);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app.into_make_service()).await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn session_endpoint_issues_a_uuid() {
        let base = spawn_server().await;
        let transport = HttpChatTransport::new(&base);
        let id = transport.open_session().await.expect("session");
        assert!(Uuid::parse_str(&id).is_ok(), "not a uuid: {}", id);
    }

    #[tokio::test]
    async fn chat_endpoint_answers_and_echoes_the_conversation_id() {
        let base = spawn_server().await;
        let transport = HttpChatTransport::new(&base);
        let reply = transport
            .send_chat(
                &(ChatRequest {
                    message: "What are your business hours?".into(),
                    conversation_id: "conv-42".into(),
                })
            ).await
            .expect("reply");

        assert_eq!(reply.conversation_id, "conv-42");
        assert_eq!(reply.message, "We are open Monday to Friday from 9 AM to 5 PM.");
    }

    #[tokio::test]
    async fn empty_message_is_rejected_with_400() {
        let base = spawn_server().await;
        let transport = HttpChatTransport::new(&base);
        let err = transport
            .send_chat(
                &(ChatRequest {
                    message: "".into(),
                    conversation_id: "conv-42".into(),
                })
            ).await
            .expect_err("expected rejection");

        match err {
            ChatError::Endpoint { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Message and conversation ID are required.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_conversation_id_is_rejected_with_400() {
        let base = spawn_server().await;
        let transport = HttpChatTransport::new(&base);
        let err = transport
            .send_chat(
                &(ChatRequest {
                    message: "Hello".into(),
                    conversation_id: "".into(),
                })
            ).await
            .expect_err("expected rejection");

        assert!(matches!(err, ChatError::Endpoint { status: 400, .. }), "got {:?}", err);
    }
}
