//! AI provider client.

mod http;

pub use http::{AiConfig, HttpAiProvider};
