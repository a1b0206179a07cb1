pub mod cli;
pub mod console;
pub mod error;
pub mod faq;
pub mod models;
pub mod server;
pub mod transport;
pub mod widget;

use cli::Args;
use faq::FaqResponder;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Mode: {}", args.mode);
    info!("Server Address: {}", args.server_addr);
    info!("Chat Endpoint: {}", args.endpoint);
    info!("FAQs Path: {}", args.faqs_path);
    info!("FAQ Similarity Threshold: {}", args.faq_similarity_threshold);
    info!("-------------------------");

    match args.mode.to_lowercase().as_str() {
        "serve" => {
            let responder = Arc::new(
                FaqResponder::load(&args.faqs_path, args.faq_similarity_threshold)?
            );
            info!("Responder ready with {} FAQ entries", responder.len());
            let server = Server::new(args.server_addr.clone(), responder);
            server.run().await
        }
        "console" => console::run_console(&args.endpoint).await,
        other =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported mode: {} (expected serve or console)", other)
                    )
                )
            ),
    }
}
