/// Backend used for completions.
///
/// Adding a provider means a new variant here, a new client under
/// `services/`, and a new arm in `CompletionService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI-compatible chat completions API.
    OpenAI,
}

impl LlmProvider {
    /// Parses `LLM_KIND` values (`ollama`, `openai`, `chatgpt`).
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "chatgpt" => Some(Self::OpenAI),
            _ => None,
        }
    }
}
