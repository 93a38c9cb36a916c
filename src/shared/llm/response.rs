use serde::de::DeserializeOwned;

/// Trait for LLM response types that support fallback behavior
///
/// Types implementing this trait can be parsed with graceful degradation -
/// if parsing fails, a default fallback value is returned with error information.
pub trait LlmResponse: DeserializeOwned + Default {
    /// Mark this response as a fallback due to parsing failure
    fn mark_as_fallback(&mut self, error_message: String);

    /// Check if this response was successfully parsed
    fn is_success(&self) -> bool;
}
