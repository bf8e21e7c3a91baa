//! Error taxonomy for setup, decoding and the two event sources.

use std::path::PathBuf;

/// Errors surfaced by the controller core.
///
/// Descriptor, layout and decode errors are deterministic and depend only on
/// what the device advertises; callers treat them as fatal configuration
/// errors and do not retry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Descriptor text does not match `<e>e:<s><bits>/<padding>>><shift>`.
    #[error("malformed channel descriptor {descriptor:?}")]
    MalformedDescriptor {
        /// The offending descriptor text.
        descriptor: String,
    },
    /// Padding field is not a whole number of bytes.
    #[error("channel padding {padding} is not a multiple of 8")]
    InvalidPadding {
        /// Padding in bits as written in the descriptor.
        padding: u32,
    },
    /// More bits used than the storage word can hold.
    #[error("{bits_used} bits do not fit in {storage_bits}-bit storage")]
    BitsExceedStorage {
        /// Declared significant bits.
        bits_used: u32,
        /// Storage width in bits.
        storage_bits: u32,
    },
    /// Two channels claim the same scan index.
    #[error("scan index {index} used by both {first} and {second}")]
    DuplicateIndex {
        /// The shared index.
        index: u32,
        /// Channel that claimed the index first.
        first: String,
        /// Channel that claimed it again.
        second: String,
    },
    /// Record shorter than the computed layout size.
    #[error("scan record truncated: expected {expected} bytes, got {actual}")]
    TruncatedRecord {
        /// Layout size in bytes.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },
    /// A channel the classifier needs is not part of the scan.
    #[error("channel {channel} is not enabled in the scan layout")]
    MissingChannel {
        /// Channel id, e.g. `in_accel_x`.
        channel: String,
    },
    /// No IIO device advertises the configured name.
    #[error("no IIO device named {name:?}")]
    DeviceNotFound {
        /// The name that was searched for.
        name: String,
    },
    /// The notification socket could not be reached.
    #[error("cannot connect to {}: {source}", .path.display())]
    ConnectionFailed {
        /// Socket path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Reading or writing a device control attribute failed.
    #[error("sysfs attribute {}: {source}", .path.display())]
    Sysfs {
        /// Attribute path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Configuration file could not be read or parsed.
    #[error("config {}: {message}", .path.display())]
    Config {
        /// Config file path.
        path: PathBuf,
        /// Reader or parser message.
        message: String,
    },
    /// Data node or socket I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by an actuator; logged, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("actuator failed: {0}")]
pub struct ActuatorError(pub String);
