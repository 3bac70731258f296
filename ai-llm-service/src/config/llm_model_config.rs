use crate::config::llm_provider::LlmProvider;

/// Configuration for one completion model.
///
/// # Fields
///
/// - `provider`: which backend to call.
/// - `model`: model identifier (e.g. `"qwen3:14b"`, `"gpt-4o-mini"`).
/// - `endpoint`: base URL; provider paths are appended.
/// - `api_key`: required for OpenAI, ignored by Ollama.
/// - `max_tokens`: generation cap, if supported.
/// - `temperature` / `top_p`: sampling controls.
/// - `timeout_secs`: per-request timeout (default 60).
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}
