//! Live stream recording
//!
//! - ManifestResolver finds a station's media manifest
//! - SegmentPoller pulls new segments until the duration is reached
//! - Assembler joins the segments into the output file
//! - Recorder runs the whole sequence after authorizing

pub mod assembler;
pub mod coordinator;
pub mod manifest;
pub mod poller;
pub mod state;

pub use assembler::Assembler;
pub use coordinator::{RecordError, RecordResult, Recorder};
pub use manifest::{ManifestResolver, ResolveError};
pub use poller::{PollIntervals, SegmentPoller};
pub use state::{PollerState, RecordingSession, Segment, SegmentTime};
