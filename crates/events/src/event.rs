//! Build session event variants.

use serde::{Deserialize, Serialize};

use crate::types::{BuildResult, FinishType, ToolPayload};

/// Events reported over a build session, closed set.
///
/// Four lifecycle transitions travel on controller streams; the inline tool
/// payload and the terminal marker travel on the tool stream. Stream
/// addressing is derived from the variant by
/// [`EventSequencer::stream_id`](crate::sequencer::EventSequencer::stream_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuildEvent {
    /// The build request was accepted and queued.
    BuildEnqueued,
    /// The build reached a terminal outcome.
    BuildFinished {
        /// Opaque outcome value.
        status: BuildResult,
    },
    /// An invocation attempt began executing.
    InvocationAttemptStarted {
        /// 1-based attempt counter.
        attempt_number: u32,
    },
    /// An invocation attempt reached a terminal outcome.
    InvocationAttemptFinished {
        /// Opaque outcome value.
        status: BuildResult,
    },
    /// A pre-serialized tool event, forwarded verbatim.
    ToolEvent {
        /// Opaque payload; contents are never inspected.
        payload: ToolPayload,
    },
    /// Terminal marker closing the tool stream.
    ComponentStreamFinished {
        /// How the stream was closed.
        finish: FinishType,
    },
}

impl BuildEvent {
    /// Get the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BuildEnqueued => "build_enqueued",
            Self::BuildFinished { .. } => "build_finished",
            Self::InvocationAttemptStarted { .. } => "invocation_attempt_started",
            Self::InvocationAttemptFinished { .. } => "invocation_attempt_finished",
            Self::ToolEvent { .. } => "tool_event",
            Self::ComponentStreamFinished { .. } => "component_stream_finished",
        }
    }

    /// Check if this variant travels on a controller stream.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::BuildEnqueued
                | Self::BuildFinished { .. }
                | Self::InvocationAttemptStarted { .. }
                | Self::InvocationAttemptFinished { .. }
        )
    }

    /// Get the outcome carried by finished-type variants.
    pub fn status(&self) -> Option<BuildResult> {
        match self {
            Self::BuildFinished { status } | Self::InvocationAttemptFinished { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
