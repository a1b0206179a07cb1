pub mod api;

use crate::faq::FaqResponder;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    responder: Arc<FaqResponder>,
}

impl Server {
    pub fn new(addr: String, responder: Arc<FaqResponder>) -> Self {
        Self { addr, responder }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(&self.addr, self.responder.clone()).await
    }
}
