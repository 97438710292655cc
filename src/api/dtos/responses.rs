use serde::Serialize;

#[derive(Serialize)]
pub struct ChatbotResponse {
    pub answer: String,
}

#[derive(Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}
