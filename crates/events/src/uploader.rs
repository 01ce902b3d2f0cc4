//! Session-level hand-off of sequenced messages to a publisher.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::publisher::EventPublisher;
use crate::sequencer::EventSequencer;
use crate::types::{BuildResult, ToolPayload};

/// Drives one session's messages from the sequencer into a publisher.
///
/// Each method builds exactly one message and hands it over; there is no
/// buffering, no retry, and no sequencing state beyond the sequencer's own.
pub struct EventUploader {
    sequencer: EventSequencer,
    publisher: Arc<dyn EventPublisher>,
}

impl EventUploader {
    /// Create an uploader around a sequencer and a publisher.
    pub fn new(sequencer: EventSequencer, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            sequencer,
            publisher,
        }
    }

    /// Get the underlying sequencer.
    pub fn sequencer(&self) -> &EventSequencer {
        &self.sequencer
    }

    /// Announce the build as enqueued.
    pub async fn announce_build(&self) -> Result<()> {
        let request = self.sequencer.build_enqueued();
        debug!(stream = %request.event.stream_id, "Announcing build");
        self.publisher.publish_lifecycle(request).await
    }

    /// Announce the invocation attempt as started.
    pub async fn announce_invocation(&self) -> Result<()> {
        let request = self.sequencer.invocation_started();
        debug!(stream = %request.event.stream_id, "Announcing invocation");
        self.publisher.publish_lifecycle(request).await
    }

    /// Forward one inline tool payload; returns its assigned sequence number.
    pub async fn forward_tool_event(&self, payload: ToolPayload) -> Result<u32> {
        let event = self.sequencer.tool_event(payload);
        let sequence = event.sequence_number;
        debug!(stream = %event.stream_id, sequence, "Forwarding tool event");
        self.publisher.publish_ordered(event).await?;
        Ok(sequence)
    }

    /// Close the tool stream; returns the terminal marker's sequence number.
    pub async fn finish_stream(&self) -> Result<u32> {
        let marker = self.sequencer.stream_finished();
        let sequence = marker.sequence_number;
        debug!(stream = %marker.stream_id, sequence, "Closing tool stream");
        self.publisher.publish_ordered(marker).await?;
        Ok(sequence)
    }

    /// Report the invocation attempt's terminal outcome.
    pub async fn finish_invocation(&self, status: BuildResult) -> Result<()> {
        let request = self.sequencer.invocation_finished(status);
        debug!(stream = %request.event.stream_id, %status, "Finishing invocation");
        self.publisher.publish_lifecycle(request).await
    }

    /// Report the build's terminal outcome.
    pub async fn finish_build(&self, status: BuildResult) -> Result<()> {
        let request = self.sequencer.build_finished(status);
        debug!(stream = %request.event.stream_id, %status, "Finishing build");
        self.publisher.publish_lifecycle(request).await
    }
}
