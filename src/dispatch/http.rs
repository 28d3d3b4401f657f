use super::payload::RsvpPayload;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Errors raised while sending a payload
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to reach {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

impl DispatchError {
    /// Message to show the guest; deliberately generic
    pub fn user_message(&self) -> &'static str {
        "Houve um erro ao enviar a sua resposta. Por favor, tente novamente ou contacte os noivos diretamente."
    }
}

/// Capability to deliver a payload to the spreadsheet
///
/// Success only means nothing failed at the transport level; the
/// receiving side's answer is never inspected.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, payload: &RsvpPayload) -> Result<(), DispatchError>;
}

/// Posts the payload as a URL-encoded form
pub struct HttpDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDispatcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(&self, payload: &RsvpPayload) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(payload.to_form_body())
            .send()
            .await
            .map_err(|source| DispatchError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        // Opaque response: status and body are not part of the contract
        tracing::debug!(status = %response.status(), "rsvp payload dispatched");
        Ok(())
    }
}
