mod client;
mod types;

pub use client::{HttpLlmClient, LlmClient};
pub use types::*;
