use serde::{ Serialize, Deserialize };

/// Body of `POST /chat`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: String,
}

/// Successful `POST /chat` response. The conversation id echoes the
/// caller's correlation token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatReply {
    pub message: String,
    pub conversation_id: String,
}

/// Non-2xx response body.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

/// `GET /session` response carrying a freshly issued conversation id.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionReply {
    pub conversation_id: String,
}
