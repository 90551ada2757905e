use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::models::events::DomainEvent;
use crate::domain::ports::EventPublisher;

/// Publishes domain events as structured log records on a dedicated target.
/// The audit-log writer and notification sender tail these out of process.
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: &DomainEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => info!(target: "pawhub_backend::events", event = %payload, "domain event"),
            Err(e) => error!("Failed to serialize domain event: {e}"),
        }
    }
}
