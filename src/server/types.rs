use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

#[derive(Debug, Serialize)]
pub struct OptimizedResponse {
    pub optimized: String,
}

#[derive(Debug, Serialize)]
pub struct PreflightResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
