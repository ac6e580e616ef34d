use std::error::Error;

use crate::error::ErrorKind;
use crate::request::Question;
use crate::response::Answer;

/// The error type for an assistant provider.
pub trait ProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents the remote assistant, which answers one question
/// per request.
///
/// Once the provider is created, it should behave like a stateless object.
/// Requests are independent of each other: the widget may have several of
/// them in flight at once, and the provider must not rely on their order.
pub trait AssistantProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ProviderError;

    /// Sends a question to the assistant.
    ///
    /// The returned future must not borrow from `self` or `question`.
    fn ask(
        &self,
        question: &Question,
    ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + 'static;
}
