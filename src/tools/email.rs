//! Email queuing tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{required_str, Tool};
use crate::store::Store;

/// Queue an email with `pending` status. Nothing is actually sent.
pub struct SendEmail {
    store: Arc<Store>,
}

impl SendEmail {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SendEmail {
    fn name(&self) -> &str {
        "send_email"
    }

    fn description(&self) -> &str {
        "Queue an email to be sent"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient": {
                    "type": "string",
                    "description": "Recipient email address"
                },
                "subject": {
                    "type": "string",
                    "description": "Subject line"
                },
                "content": {
                    "type": "string",
                    "description": "Message body"
                }
            },
            "required": ["recipient", "subject", "content"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let recipient = required_str(&args, "recipient")?;
        let subject = required_str(&args, "subject")?;
        let content = required_str(&args, "content")?;

        let id = self.store.queue_email(recipient, subject, content)?;
        tracing::info!(email_id = id, "Queued email for {}", recipient);

        Ok(format!("Email queued for {}", recipient))
    }
}
