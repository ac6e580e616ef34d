use std::pin::Pin;
use std::sync::Arc;

use museo_model::{Answer, AssistantProvider, ProviderError, Question};
use tracing::Instrument;

pub type AskResult = Result<Answer, Box<dyn ProviderError>>;
type BoxedAskFuture = Pin<Box<dyn Future<Output = AskResult> + Send>>;
type HandlerFn = Arc<dyn Fn(Question) -> BoxedAskFuture + Send + Sync>;

/// A wrapper around an assistant provider that provides a type-erased
/// interface for the other modules.
///
/// Cloning is cheap, and every clone may have its own request in flight.
#[derive(Clone)]
pub struct AssistantClient {
    handler_fn: HandlerFn,
}

impl AssistantClient {
    #[inline]
    pub fn new<P: AssistantProvider + 'static>(provider: P) -> Self {
        // Erase `P` so that the widget state doesn't need a generic
        // parameter.
        let handler_fn: HandlerFn = Arc::new(move |question| {
            let fut = provider.ask(&question);
            Box::pin(
                async move {
                    trace!("asking: {:?}", question.text);
                    match fut.await {
                        Ok(answer) => {
                            trace!("got an answer");
                            Ok(answer)
                        }
                        Err(err) => {
                            error!("got an error ({}): {err}", err.kind());
                            Err(Box::new(err) as Box<dyn ProviderError>)
                        }
                    }
                }
                .instrument(debug_span!("assistant req")),
            )
        });
        Self { handler_fn }
    }

    /// Asks the assistant a question.
    #[inline]
    pub async fn ask(&self, question: Question) -> AskResult {
        (self.handler_fn)(question).await
    }
}
