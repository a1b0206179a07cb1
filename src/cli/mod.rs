use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Run mode: "serve" starts the chat API server, "console" opens an
    /// interactive chat session against a running server.
    #[arg(long, env = "CHAT_MODE", default_value = "serve")]
    pub mode: String,

    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4002")]
    pub server_addr: String,

    /// Base URL of the chat server to talk to in console mode.
    #[arg(long, env = "CHAT_ENDPOINT", default_value = "http://127.0.0.1:4002")]
    pub endpoint: String,

    /// Path to the FAQ definition file (JSON array of question/answer
    /// entries). Built-in defaults are used when the file is absent.
    #[arg(long, env = "FAQS_PATH", default_value = "json/faqs.json")]
    pub faqs_path: String,

    /// Minimum token-overlap similarity for an FAQ entry to count as a
    /// match (0.0 to 1.0).
    #[arg(long, env = "FAQ_SIMILARITY_THRESHOLD", default_value = "0.3")]
    pub faq_similarity_threshold: f64,
}
