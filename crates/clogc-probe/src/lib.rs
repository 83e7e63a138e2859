//! Probe subprocess driving, line classification and noise suppression.

pub mod filter;
pub mod parser;
pub mod platform;
pub mod stream;

pub use filter::{is_redundant_failure, suppress_noise};
pub use parser::{classify_line, classify_stream};
pub use platform::{
    detect_dialect, dialect_for, LinuxPing, ProbeDialect, ProbeError, WindowsPing,
};
pub use stream::{spawn_probe_stream, ProbeHandle, ProbeLine, ProbeSource};
