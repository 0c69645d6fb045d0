//! [`DraftValidator`] backed by a serverless validation function.
//!
//! `POST /functions/v1/<function>` with the draft as JSON; the reply is
//! `{"valid": bool, "error"?: string}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sessionnotes_core::{ClientConfig, SessionNoteDraft};
use sessionnotes_sync::{DraftValidator, ValidationVerdict, ValidatorError};

use crate::client::{RemoteClient, RemoteError};

/// Reply body from the validation function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReply {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ValidationReply> for ValidationVerdict {
    fn from(reply: ValidationReply) -> Self {
        ValidationVerdict::from_reply(reply.valid, reply.error)
    }
}

#[derive(Debug, Clone)]
pub struct FunctionValidator {
    client: RemoteClient,
    function: String,
}

impl FunctionValidator {
    pub fn new(client: RemoteClient, function: impl Into<String>) -> Self {
        Self {
            client,
            function: function.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, RemoteError> {
        Ok(Self::new(
            RemoteClient::new(config)?,
            config.validator_function.clone(),
        ))
    }
}

#[async_trait]
impl DraftValidator for FunctionValidator {
    async fn validate(&self, draft: &SessionNoteDraft) -> Result<ValidationVerdict, ValidatorError> {
        let response = self
            .client
            .post(&self.client.function_url(&self.function))
            .json(draft)
            .send()
            .await
            .map_err(|e| ValidatorError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ValidatorError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ValidatorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ValidationReply = serde_json::from_str(&body)
            .map_err(|e| ValidatorError::InvalidResponse(e.to_string()))?;
        Ok(reply.into())
    }
}
