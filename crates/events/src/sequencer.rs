//! Per-session sequencing and addressing of build event messages.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::clock::{millis_precision, Clock};
use crate::event::BuildEvent;
use crate::message::{LifecycleRequest, OrderedEvent};
use crate::types::{BuildResult, FinishType, ServiceLevel, SessionIdentity, StreamId, ToolPayload};

/// Produces correctly ordered, correctly addressed messages for one build
/// session.
///
/// Two numbering schemes coexist and are never reconciled: each lifecycle
/// role (build-level, invocation-level) is a closed two-step protocol
/// numbered 1 then 2, while all tool-stream messages share one gapless
/// counter starting at 1. The counter is the only mutable state; it supports
/// concurrent producers through atomic fetch-and-increment.
///
/// The tool stream is implicitly `OPEN -> (tool_event)* -> stream_finished ->
/// CLOSED`; the sequencer does not police calls made after the terminal
/// marker, that contract belongs to the caller.
pub struct EventSequencer {
    identity: SessionIdentity,
    stream_sequence: AtomicU32,
    clock: Arc<dyn Clock>,
}

impl EventSequencer {
    /// Create a sequencer for one build session. The tool-stream counter
    /// starts at 1.
    pub fn new(identity: SessionIdentity, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity,
            stream_sequence: AtomicU32::new(1),
            clock,
        }
    }

    /// Get the session identity.
    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Lifecycle message announcing the build was accepted and queued.
    pub fn build_enqueued(&self) -> LifecycleRequest {
        self.lifecycle_event(1, BuildEvent::BuildEnqueued)
    }

    /// Lifecycle message reporting the build's terminal outcome.
    pub fn build_finished(&self, status: BuildResult) -> LifecycleRequest {
        self.lifecycle_event(2, BuildEvent::BuildFinished { status })
    }

    /// Lifecycle message announcing the invocation attempt started.
    pub fn invocation_started(&self) -> LifecycleRequest {
        self.lifecycle_event(1, BuildEvent::InvocationAttemptStarted { attempt_number: 1 })
    }

    /// Lifecycle message reporting the invocation attempt's terminal outcome.
    pub fn invocation_finished(&self, status: BuildResult) -> LifecycleRequest {
        self.lifecycle_event(2, BuildEvent::InvocationAttemptFinished { status })
    }

    /// Tool-stream message forwarding a pre-serialized payload verbatim.
    pub fn tool_event(&self, payload: ToolPayload) -> OrderedEvent {
        self.tool_event_with_sequence(self.next_sequence(), payload)
    }

    /// Tool-stream terminal marker; no message may follow it on the stream.
    pub fn stream_finished(&self) -> OrderedEvent {
        self.stream_finished_with_sequence(self.next_sequence())
    }

    /// Tool-stream message with an explicit sequence number, bypassing the
    /// counter. Visible for testing.
    pub fn tool_event_with_sequence(
        &self,
        sequence_number: u32,
        payload: ToolPayload,
    ) -> OrderedEvent {
        self.ordered_event(sequence_number, BuildEvent::ToolEvent { payload })
    }

    /// Terminal marker with an explicit sequence number, bypassing the
    /// counter. Visible for testing.
    pub fn stream_finished_with_sequence(&self, sequence_number: u32) -> OrderedEvent {
        self.ordered_event(
            sequence_number,
            BuildEvent::ComponentStreamFinished {
                finish: FinishType::Finished,
            },
        )
    }

    /// Derive the stream address for an event variant.
    ///
    /// Pure and exhaustive over the closed variant set; a new variant fails
    /// compilation here rather than surfacing as a runtime error.
    pub fn stream_id(&self, event: &BuildEvent) -> StreamId {
        let build_id = self.identity.build_request_id().clone();
        match event {
            BuildEvent::BuildEnqueued | BuildEvent::BuildFinished { .. } => {
                StreamId::build_controller(build_id)
            }
            BuildEvent::InvocationAttemptStarted { .. }
            | BuildEvent::InvocationAttemptFinished { .. } => StreamId::invocation_controller(
                build_id,
                self.identity.invocation_id().clone(),
            ),
            BuildEvent::ToolEvent { .. } | BuildEvent::ComponentStreamFinished { .. } => {
                StreamId::invocation_tool(build_id, self.identity.invocation_id().clone())
            }
        }
    }

    fn ordered_event(&self, sequence_number: u32, event: BuildEvent) -> OrderedEvent {
        OrderedEvent {
            stream_id: self.stream_id(&event),
            sequence_number,
            event_time: millis_precision(self.clock.now()),
            event,
        }
    }

    fn lifecycle_event(&self, sequence_number: u32, event: BuildEvent) -> LifecycleRequest {
        LifecycleRequest {
            service_level: ServiceLevel::Interactive,
            project_id: self.identity.project_id().map(str::to_owned),
            event: self.ordered_event(sequence_number, event),
        }
    }

    fn next_sequence(&self) -> u32 {
        self.stream_sequence.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::StreamComponent;

    fn sequencer() -> EventSequencer {
        EventSequencer::new(
            SessionIdentity::new("req1", "inv1"),
            Arc::new(ManualClock::at_millis(1_000)),
        )
    }

    fn payload() -> ToolPayload {
        ToolPayload::new("progress", vec![1, 2, 3])
    }

    #[test]
    fn test_tool_stream_counter_is_gapless_from_one() {
        let seq = sequencer();

        assert_eq!(seq.tool_event(payload()).sequence_number, 1);
        assert_eq!(seq.tool_event(payload()).sequence_number, 2);
        assert_eq!(seq.tool_event(payload()).sequence_number, 3);
        assert_eq!(seq.stream_finished().sequence_number, 4);
    }

    #[test]
    fn test_lifecycle_numbers_are_fixed_literals() {
        let seq = sequencer();

        // Interleave tool events; lifecycle numbering must not move.
        seq.tool_event(payload());
        seq.tool_event(payload());

        assert_eq!(seq.build_enqueued().event.sequence_number, 1);
        assert_eq!(
            seq.build_finished(BuildResult::CommandSucceeded)
                .event
                .sequence_number,
            2
        );
        assert_eq!(seq.invocation_started().event.sequence_number, 1);
        assert_eq!(
            seq.invocation_finished(BuildResult::CommandSucceeded)
                .event
                .sequence_number,
            2
        );

        // And the tool counter was untouched by the lifecycle calls.
        assert_eq!(seq.tool_event(payload()).sequence_number, 3);
    }

    #[test]
    fn test_build_lifecycle_stream_has_no_invocation_id() {
        let seq = sequencer();

        let enqueued = seq.build_enqueued();
        assert_eq!(enqueued.event.stream_id.build_id.as_str(), "req1");
        assert_eq!(
            enqueued.event.stream_id.component,
            StreamComponent::Controller
        );
        assert!(enqueued.event.stream_id.invocation_id.is_none());

        let finished = seq.build_finished(BuildResult::CommandFailed);
        assert_eq!(finished.event.stream_id, enqueued.event.stream_id);
    }

    #[test]
    fn test_invocation_lifecycle_stream_is_controller_with_invocation_id() {
        let seq = sequencer();

        let started = seq.invocation_started();
        assert_eq!(
            started.event.stream_id.component,
            StreamComponent::Controller
        );
        assert_eq!(
            started
                .event
                .stream_id
                .invocation_id
                .as_ref()
                .map(|i| i.as_str()),
            Some("inv1")
        );

        let finished = seq.invocation_finished(BuildResult::CommandSucceeded);
        assert_eq!(finished.event.stream_id, started.event.stream_id);
    }

    #[test]
    fn test_tool_stream_is_tool_with_invocation_id() {
        let seq = sequencer();

        let event = seq.tool_event(payload());
        assert_eq!(event.stream_id.component, StreamComponent::Tool);
        assert_eq!(
            event.stream_id.invocation_id.as_ref().map(|i| i.as_str()),
            Some("inv1")
        );

        let marker = seq.stream_finished();
        assert_eq!(marker.stream_id, event.stream_id);
    }

    #[test]
    fn test_stream_id_derivation_covers_all_variants() {
        let seq = sequencer();

        let build_controller = seq.stream_id(&BuildEvent::BuildEnqueued);
        assert_eq!(
            seq.stream_id(&BuildEvent::BuildFinished {
                status: BuildResult::Cancelled
            }),
            build_controller
        );

        let invocation_controller =
            seq.stream_id(&BuildEvent::InvocationAttemptStarted { attempt_number: 1 });
        assert_eq!(
            seq.stream_id(&BuildEvent::InvocationAttemptFinished {
                status: BuildResult::Cancelled
            }),
            invocation_controller
        );
        assert_ne!(invocation_controller, build_controller);

        let tool = seq.stream_id(&BuildEvent::ToolEvent { payload: payload() });
        assert_eq!(
            seq.stream_id(&BuildEvent::ComponentStreamFinished {
                finish: FinishType::Finished
            }),
            tool
        );
        assert_eq!(tool.component, StreamComponent::Tool);
    }

    #[test]
    fn test_invocation_start_stamps_first_attempt() {
        let seq = sequencer();
        let started = seq.invocation_started();

        assert_eq!(
            started.event.event,
            BuildEvent::InvocationAttemptStarted { attempt_number: 1 }
        );
    }

    #[test]
    fn test_terminal_marker_is_finished() {
        let seq = sequencer();
        let marker = seq.stream_finished();

        assert_eq!(
            marker.event,
            BuildEvent::ComponentStreamFinished {
                finish: FinishType::Finished
            }
        );
    }

    #[test]
    fn test_lifecycle_requests_are_interactive() {
        let seq = sequencer();
        assert_eq!(
            seq.build_enqueued().service_level,
            ServiceLevel::Interactive
        );
        assert_eq!(
            seq.invocation_started().service_level,
            ServiceLevel::Interactive
        );
    }

    #[test]
    fn test_project_id_carried_only_when_configured() {
        let without = sequencer();
        assert!(without.build_enqueued().project_id.is_none());
        assert!(without.invocation_started().project_id.is_none());

        let with = EventSequencer::new(
            SessionIdentity::new("req1", "inv1").with_project_id("proj"),
            Arc::new(ManualClock::at_millis(0)),
        );
        assert_eq!(with.build_enqueued().project_id.as_deref(), Some("proj"));
        assert_eq!(
            with.build_finished(BuildResult::CommandSucceeded)
                .project_id
                .as_deref(),
            Some("proj")
        );
    }

    #[test]
    fn test_timestamps_read_clock_at_message_construction() {
        let clock = Arc::new(ManualClock::at_millis(5_000));
        let seq = EventSequencer::new(SessionIdentity::new("req1", "inv1"), clock.clone());

        let first = seq.tool_event(payload());
        clock.advance_millis(125);
        let second = seq.tool_event(payload());

        assert_eq!(first.event_time.timestamp_millis(), 5_000);
        assert_eq!(second.event_time.timestamp_millis(), 5_125);

        clock.advance_millis(10);
        let finished = seq.build_finished(BuildResult::CommandSucceeded);
        assert_eq!(finished.event.event_time.timestamp_millis(), 5_135);
    }

    #[test]
    fn test_explicit_sequence_constructors_bypass_counter() {
        let seq = sequencer();

        let event = seq.tool_event_with_sequence(41, payload());
        assert_eq!(event.sequence_number, 41);

        let marker = seq.stream_finished_with_sequence(42);
        assert_eq!(marker.sequence_number, 42);

        // The counter never moved.
        assert_eq!(seq.tool_event(payload()).sequence_number, 1);
    }

    #[test]
    fn test_payload_forwarded_verbatim() {
        let seq = sequencer();
        let bytes = vec![0x00, 0xff, 0x7f, 0x80];
        let event = seq.tool_event(ToolPayload::new("bep", bytes.clone()));

        match event.event {
            BuildEvent::ToolEvent { payload } => {
                assert_eq!(payload.kind, "bep");
                assert_eq!(payload.data, bytes);
            }
            other => assert_eq!(other.event_type(), "tool_event"),
        }
    }

    #[test]
    fn test_end_to_end_session_example() {
        let clock = Arc::new(ManualClock::at_millis(0));
        let seq = EventSequencer::new(SessionIdentity::new("req1", "inv1"), clock);

        let enqueued = seq.build_enqueued();
        assert_eq!(enqueued.event.sequence_number, 1);
        assert_eq!(enqueued.event.stream_id.to_string(), "req1/controller");

        let started = seq.invocation_started();
        assert_eq!(started.event.sequence_number, 1);
        assert_eq!(
            started.event.stream_id.to_string(),
            "req1/inv1/controller"
        );

        let p1 = seq.tool_event(ToolPayload::new("progress", vec![1]));
        assert_eq!(p1.sequence_number, 1);
        assert_eq!(p1.stream_id.to_string(), "req1/inv1/tool");

        let p2 = seq.tool_event(ToolPayload::new("progress", vec![2]));
        assert_eq!(p2.sequence_number, 2);
        assert_eq!(p2.stream_id, p1.stream_id);

        let marker = seq.stream_finished();
        assert_eq!(marker.sequence_number, 3);
        assert_eq!(marker.stream_id, p1.stream_id);

        let inv_finished = seq.invocation_finished(BuildResult::CommandSucceeded);
        assert_eq!(inv_finished.event.sequence_number, 2);
        assert_eq!(
            inv_finished.event.stream_id.to_string(),
            "req1/inv1/controller"
        );

        let finished = seq.build_finished(BuildResult::CommandSucceeded);
        assert_eq!(finished.event.sequence_number, 2);
        assert_eq!(finished.event.stream_id.to_string(), "req1/controller");
        assert!(finished.event.stream_id.invocation_id.is_none());
    }
}
