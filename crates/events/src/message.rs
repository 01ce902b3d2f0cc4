//! Wire records produced by the sequencer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::event::BuildEvent;
use crate::types::{ServiceLevel, StreamId};

/// One sequenced message on a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedEvent {
    /// Stream the message belongs to.
    pub stream_id: StreamId,
    /// Position within the stream, starting at 1.
    pub sequence_number: u32,
    /// Wall-clock time at message construction, millisecond precision.
    pub event_time: DateTime<Utc>,
    /// The event itself.
    pub event: BuildEvent,
}

impl OrderedEvent {
    /// Encode to the binary wire form.
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Decode from the binary wire form.
    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::serialization(e.to_string()))
    }
}

/// Publish request for a lifecycle transition.
///
/// Wraps the sequenced event with the publish options that only lifecycle
/// messages carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleRequest {
    /// Always [`ServiceLevel::Interactive`] for lifecycle publishes.
    pub service_level: ServiceLevel,
    /// Project the session was configured with; omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// The sequenced lifecycle event.
    pub event: OrderedEvent,
}

impl LifecycleRequest {
    /// Encode to the binary wire form.
    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Decode from the binary wire form.
    pub fn from_bincode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| Error::serialization(e.to_string()))
    }
}
