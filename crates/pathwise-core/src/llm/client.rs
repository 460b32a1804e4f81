//! TextGenerator trait definition

use async_trait::async_trait;

use super::LlmError;

/// Stateless text-generation client: one prompt in, one text response out.
///
/// Each call is independent and carries no conversation state, so a single
/// client can be shared across concurrent requests behind an `Arc`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider/model label for logs (e.g. "gemini-2.5-flash").
    fn name(&self) -> &str;

    /// Send one prompt and wait for the full text response.
    ///
    /// Implementations must not retry internally; retry policy belongs to
    /// the caller.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

// Compile-time assertion: TextGenerator must be usable as `dyn TextGenerator`.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};
