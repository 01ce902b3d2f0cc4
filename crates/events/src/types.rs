//! Core types for the events crate.

use serde::{Deserialize, Serialize};

/// Unique identifier for a build request, assigned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildRequestId(String);

impl BuildRequestId {
    /// Create a build request ID from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BuildRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one invocation attempt within a build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(String);

impl InvocationId {
    /// Create an invocation ID from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which logical channel of the session a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamComponent {
    /// Lifecycle channel: build/invocation start and end transitions.
    Controller,
    /// Inline event channel: forwarded tool payloads and the terminal marker.
    Tool,
}

impl std::fmt::Display for StreamComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Controller => "controller",
            Self::Tool => "tool",
        };
        write!(f, "{s}")
    }
}

/// Address of a logically ordered, independently sequenced message channel.
///
/// Derived from the event variant, never chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId {
    /// Build the stream belongs to.
    pub build_id: BuildRequestId,
    /// Invocation the stream belongs to; absent for build-level streams.
    pub invocation_id: Option<InvocationId>,
    /// Channel role.
    pub component: StreamComponent,
}

impl StreamId {
    /// Controller stream scoped to the build only.
    pub fn build_controller(build_id: BuildRequestId) -> Self {
        Self {
            build_id,
            invocation_id: None,
            component: StreamComponent::Controller,
        }
    }

    /// Controller stream scoped to one invocation attempt.
    pub fn invocation_controller(build_id: BuildRequestId, invocation_id: InvocationId) -> Self {
        Self {
            build_id,
            invocation_id: Some(invocation_id),
            component: StreamComponent::Controller,
        }
    }

    /// Tool stream scoped to one invocation attempt.
    pub fn invocation_tool(build_id: BuildRequestId, invocation_id: InvocationId) -> Self {
        Self {
            build_id,
            invocation_id: Some(invocation_id),
            component: StreamComponent::Tool,
        }
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.invocation_id {
            Some(inv) => write!(f, "{}/{}/{}", self.build_id, inv, self.component),
            None => write!(f, "{}/{}", self.build_id, self.component),
        }
    }
}

/// Closed outcome vocabulary carried in finished-type lifecycle messages.
///
/// The sequencer treats these as opaque values; interpretation belongs to the
/// collection service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildResult {
    /// Outcome not known to the reporting side.
    UnknownStatus,
    /// The build command succeeded.
    CommandSucceeded,
    /// The build command ran and failed.
    CommandFailed,
    /// The request itself was invalid.
    UserError,
    /// Infrastructure failure on the orchestrator side.
    SystemError,
    /// Aborted for lack of resources.
    ResourceExhausted,
    /// The scheduled start time was no longer valid.
    InvalidStartTime,
    /// The request deadline elapsed before completion.
    RequestDeadlineExceeded,
    /// Cancelled by the requester.
    Cancelled,
}

impl BuildResult {
    /// Check if this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::CommandSucceeded)
    }
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::UnknownStatus => "unknown_status",
            Self::CommandSucceeded => "command_succeeded",
            Self::CommandFailed => "command_failed",
            Self::UserError => "user_error",
            Self::SystemError => "system_error",
            Self::ResourceExhausted => "resource_exhausted",
            Self::InvalidStartTime => "invalid_start_time",
            Self::RequestDeadlineExceeded => "request_deadline_exceeded",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// How a tool stream was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinishType {
    /// The stream ended normally with a terminal marker.
    Finished,
    /// The stream was expired by the collection service.
    Expired,
}

impl std::fmt::Display for FinishType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Finished => "finished",
            Self::Expired => "expired",
        };
        write!(f, "{s}")
    }
}

/// Service level requested for lifecycle publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLevel {
    /// Batched, best-effort processing.
    Noninteractive,
    /// Streamed to watchers as it arrives.
    Interactive,
}

/// Pre-serialized inline tool payload, forwarded verbatim.
///
/// The sequencer never inspects `data`; `kind` is the producer's schema tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPayload {
    /// Schema tag of the serialized payload.
    pub kind: String,
    /// Opaque payload bytes.
    pub data: Vec<u8>,
}

impl ToolPayload {
    /// Create a payload from a schema tag and pre-serialized bytes.
    pub fn new(kind: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// Immutable identity of one build session.
///
/// Fixed at construction; the sequencer addresses every message it produces
/// from these three values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    build_request_id: BuildRequestId,
    invocation_id: InvocationId,
    project_id: Option<String>,
}

impl SessionIdentity {
    /// Create a session identity without a project ID.
    pub fn new(build_request_id: impl Into<String>, invocation_id: impl Into<String>) -> Self {
        Self {
            build_request_id: BuildRequestId::new(build_request_id),
            invocation_id: InvocationId::new(invocation_id),
            project_id: None,
        }
    }

    /// Set the project ID.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Get the build request ID.
    pub fn build_request_id(&self) -> &BuildRequestId {
        &self.build_request_id
    }

    /// Get the invocation ID.
    pub fn invocation_id(&self) -> &InvocationId {
        &self.invocation_id
    }

    /// Get the project ID, if configured.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }
}
