//! Build lifecycle sequencing for the result-stream uploader.
//!
//! This crate turns build-lifecycle signals into correctly ordered, correctly
//! addressed protocol messages. Key pieces:
//!
//! - **Event variants**: the closed set of session events
//! - **Sequencer**: per-session numbering, timestamping, and stream addressing
//! - **Publisher**: the seam to the transport layer, with a test double
//! - **Uploader**: hands sequenced messages to a publisher, nothing more
//!
//! # Example
//!
//! ```ignore
//! use brigid_events::{
//!     EventSequencer, EventUploader, InMemoryPublisher, SessionIdentity,
//!     SystemClock, ToolPayload, BuildResult,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let identity = SessionIdentity::new("req1", "inv1").with_project_id("proj");
//!     let sequencer = EventSequencer::new(identity, Arc::new(SystemClock::new()));
//!     let uploader = EventUploader::new(sequencer, InMemoryPublisher::new_arc());
//!
//!     uploader.announce_build().await.unwrap();
//!     uploader.announce_invocation().await.unwrap();
//!     uploader
//!         .forward_tool_event(ToolPayload::new("progress", vec![1, 2, 3]))
//!         .await
//!         .unwrap();
//!     uploader.finish_stream().await.unwrap();
//!     uploader.finish_invocation(BuildResult::CommandSucceeded).await.unwrap();
//!     uploader.finish_build(BuildResult::CommandSucceeded).await.unwrap();
//! }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod clock;
pub mod error;
pub mod event;
pub mod message;
pub mod publisher;
pub mod sequencer;
pub mod types;
pub mod uploader;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use event::BuildEvent;
pub use message::{LifecycleRequest, OrderedEvent};
pub use publisher::{EventPublisher, InMemoryPublisher, TracingPublisher};
pub use sequencer::EventSequencer;
pub use types::{
    BuildRequestId, BuildResult, FinishType, InvocationId, ServiceLevel, SessionIdentity,
    StreamComponent, StreamId, ToolPayload,
};
pub use uploader::EventUploader;
