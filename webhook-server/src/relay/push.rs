//! Outbound push: validate a send request and submit it to the platform.
//!
//! Each call sends exactly one message. There is no retry and no
//! idempotency key, so repeating a request repeats the message.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::AppError;
use crate::line::PushApi;
use crate::relay::SendRequest;

#[derive(Clone)]
pub struct PushDispatcher {
    api: Arc<dyn PushApi>,
}

impl PushDispatcher {
    pub fn new(api: Arc<dyn PushApi>) -> Self {
        Self { api }
    }

    pub async fn push(&self, req: &SendRequest) -> Result<(), AppError> {
        if req.group_id.is_empty() || req.text.is_empty() {
            warn!(
                has_group_id = !req.group_id.is_empty(),
                has_message = !req.text.is_empty(),
                "push_validation_failed"
            );
            return Err(AppError::Validation("group_id and message are required"));
        }

        if let Err(e) = self.api.push_text(&req.group_id, &req.text).await {
            error!(group_id = %req.group_id, error = %e, "push_delivery_failed");
            return Err(AppError::Delivery);
        }

        info!(
            group_id = %req.group_id,
            text_length = req.text.len(),
            "push_delivered"
        );
        Ok(())
    }
}
