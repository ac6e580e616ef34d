//! An assistant provider that posts questions to an HTTP endpoint.
//!
//! The endpoint receives `{"question": "..."}` as JSON and answers with
//! `{"answer": "..."}`. Anything else is reported as an error whose
//! [`ErrorKind`] tells the widget which message to show.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use museo_model::{
    Answer, AssistantProvider, ErrorKind, ProviderError, Question,
};
use reqwest::{Client, Response, header};

pub use config::{HttpAssistantConfig, HttpAssistantConfigBuilder};
use proto::AskPayload;

/// Error type for [`HttpAssistantProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// HTTP assistant provider.
#[derive(Clone, Debug)]
pub struct HttpAssistantProvider {
    client: Client,
    config: Arc<HttpAssistantConfig>,
}

impl HttpAssistantProvider {
    /// Creates a new `HttpAssistantProvider` with the given configuration.
    #[inline]
    pub fn new(config: HttpAssistantConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl AssistantProvider for HttpAssistantProvider {
    type Error = Error;

    fn ask(
        &self,
        question: &Question,
    ) -> impl Future<Output = Result<Answer, Self::Error>> + Send + 'static
    {
        let url = self.config.ask_url();
        debug!("posting question to {url}");
        let resp_fut = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .timeout(self.config.timeout)
            .json(question)
            .send();

        async move {
            let resp = resp_fut.await.map_err(|err| {
                Error::new(
                    format!("failed to reach the assistant: {err}"),
                    ErrorKind::Connectivity,
                )
            })?;

            let status = resp.status();
            if !status.is_success() {
                let reason = read_error_reason(resp).await;
                return Err(Error::new(
                    match reason {
                        Some(reason) => format!("{status}: {reason}"),
                        None => format!("{status}"),
                    },
                    ErrorKind::Server,
                ));
            }

            // The body is parsed whatever its label says; some servers
            // send JSON as `text/plain` or `text/html`.
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            if !content_type.as_deref().is_some_and(is_json) {
                debug!("answer labelled {content_type:?}, parsing as JSON");
            }

            // Here we got a successful response.
            let body = resp.bytes().await.map_err(|err| {
                Error::new(
                    format!("failed to read the answer: {err}"),
                    ErrorKind::Connectivity,
                )
            })?;
            // An unreadable body is reported like a failed connection.
            let payload: AskPayload =
                serde_json::from_slice(&body).map_err(|err| {
                    Error::new(
                        format!("invalid answer payload: {err}"),
                        ErrorKind::Connectivity,
                    )
                })?;
            match payload.answer {
                Some(text) => Ok(Answer::new(text)),
                None => Err(Error::new(
                    "answer payload has no `answer` field",
                    ErrorKind::MalformedResponse,
                )),
            }
        }
    }
}

#[inline]
fn is_json(content_type: &str) -> bool {
    content_type
        .parse()
        .map(|m: Mime| {
            m.subtype() == mime::JSON
                || m.suffix().is_some_and(|suffix| suffix == mime::JSON)
        })
        .unwrap_or(false)
}

/// Extracts the `error` field of a failed response, if the server sent one.
async fn read_error_reason(resp: Response) -> Option<String> {
    let body = resp.bytes().await.ok()?;
    let payload: AskPayload = serde_json::from_slice(&body).ok()?;
    payload.error
}
