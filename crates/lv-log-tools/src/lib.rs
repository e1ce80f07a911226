//! Log retrieval for Signal K servers.
//!
//! Tries an ordered chain of sources (the Venus OS multilog file, the
//! systemd journal, then plain log files), normalizes each line into a
//! `{original, timestamp, message}` record with TAI64N decoding, and
//! encodes the result losslessly as JSON. When nothing is found, a
//! host-type heuristic picks the remediation hint for the 404 body.

pub mod chain;
pub mod command;
pub mod config;
pub mod encode;
pub mod error;
pub mod handler;
pub mod host;
pub mod mock;
pub mod normalize;
pub mod request;
pub mod sandbox;
pub mod service;
pub mod source;
pub mod sources;
pub mod tai64n;
pub mod tail;
pub mod types;

// Re-export key types for convenience
pub use chain::{ChainOutcome, FallbackChain};
pub use command::{BoundedExecutor, CommandRunner, CommandSpec, ExecLimits, ProcessRunner};
pub use config::{RuntimeMode, ViewerConfig};
pub use encode::{EscapePolicy, LinesMode, LogsResponse, LogsUnavailable};
pub use error::{LogError, LogResult};
pub use handler::handle_get_logs;
pub use host::{HostProbe, HostProfile};
pub use mock::{MockCommandRunner, MockLogSource};
pub use request::{LineLimits, LogsRequest};
pub use sandbox::SandboxBoundary;
pub use service::{LogService, LogsOutcome};
pub use source::{LogSource, TailAccess};
pub use types::{Attempt, LogRecord, RetrievalResult, SourceId};
