//! Publisher trait and implementations.
//!
//! The boundary to the transport layer. Implementations own delivery, retry,
//! and backpressure; the sequencing side hands messages over unmodified and
//! never learns the transmission outcome.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::message::{LifecycleRequest, OrderedEvent};

/// Trait for message transport backends.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hand over a lifecycle publish request.
    async fn publish_lifecycle(&self, request: LifecycleRequest) -> Result<()>;

    /// Hand over an ordered tool-stream message.
    async fn publish_ordered(&self, event: OrderedEvent) -> Result<()>;
}

/// In-memory publisher for testing.
///
/// Records every hand-off in order so tests can assert on the produced
/// message sequence.
#[derive(Default)]
pub struct InMemoryPublisher {
    lifecycle: RwLock<Vec<LifecycleRequest>>,
    ordered: RwLock<Vec<OrderedEvent>>,
}

impl InMemoryPublisher {
    /// Create a new in-memory publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new in-memory publisher wrapped in an Arc.
    pub fn new_arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Get all lifecycle requests handed over so far, in order.
    pub async fn lifecycle_requests(&self) -> Vec<LifecycleRequest> {
        self.lifecycle.read().await.clone()
    }

    /// Get all ordered events handed over so far, in order.
    pub async fn ordered_events(&self) -> Vec<OrderedEvent> {
        self.ordered.read().await.clone()
    }

    /// Get the total number of messages handed over.
    pub async fn count(&self) -> usize {
        self.lifecycle.read().await.len() + self.ordered.read().await.len()
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish_lifecycle(&self, request: LifecycleRequest) -> Result<()> {
        self.lifecycle.write().await.push(request);
        Ok(())
    }

    async fn publish_ordered(&self, event: OrderedEvent) -> Result<()> {
        self.ordered.write().await.push(event);
        Ok(())
    }
}

/// A wrapper that adds tracing to a publisher.
pub struct TracingPublisher<P: EventPublisher> {
    inner: P,
}

impl<P: EventPublisher> TracingPublisher<P> {
    /// Create a new tracing publisher.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: EventPublisher> EventPublisher for TracingPublisher<P> {
    async fn publish_lifecycle(&self, request: LifecycleRequest) -> Result<()> {
        tracing::debug!(
            event_type = request.event.event.event_type(),
            stream = %request.event.stream_id,
            sequence = request.event.sequence_number,
            "Publishing lifecycle request"
        );
        self.inner.publish_lifecycle(request).await
    }

    async fn publish_ordered(&self, event: OrderedEvent) -> Result<()> {
        tracing::debug!(
            event_type = event.event.event_type(),
            stream = %event.stream_id,
            sequence = event.sequence_number,
            "Publishing ordered event"
        );
        self.inner.publish_ordered(event).await
    }
}
