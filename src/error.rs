use thiserror::Error;

/// Error types for `U8Map` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum U8MapError {
    /// Arena has insufficient space for the record being inserted
    #[error("buffer full: record needs {requested} bytes, but only {available} bytes remain")]
    BufferOverflow {
        /// Bytes the record requires, header included
        requested: usize,
        /// Contiguous bytes still unallocated in the arena
        available: usize,
    },
    /// Buffer cannot hold the bucket array for the requested configuration
    #[error("buffer too small: {required} bytes required, {provided} provided")]
    BufferTooSmall {
        /// Minimum buffer size for this configuration
        required: usize,
        /// Size of the buffer that was passed in
        provided: usize,
    },
    /// Invalid parameter passed to `U8Map::new`
    #[error("invalid configuration: {parameter} must not be {value}")]
    InvalidConfiguration {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Value that was rejected
        value: usize,
    },
    /// Keys must contain at least one byte
    #[error("zero-length key")]
    EmptyKey,
}
