use std::io;

use thiserror::Error;

/// Errors returned when a hash object is used outside its contract.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Data was written, or finalize was called, on an already finalized hash.
    #[error("hash is finalized, reset it before writing again")]
    Finalized,

    /// The block consumption step received a partial block.
    #[error("data length {len} is not a multiple of the block size {block_size}")]
    UnalignedBlocks {
        /// Length of the rejected data.
        len: usize,
        /// Block size of the algorithm.
        block_size: usize,
    },

    /// The message bit length no longer fits in the algorithm's length field.
    #[error("length overflow: already wrote {written} bytes, trying to write {len} bytes")]
    LengthOverflow {
        /// Bytes absorbed so far.
        written: u64,
        /// Bytes in the rejected write.
        len: usize,
    },

    /// A TupleHash element is too long for its bit length to fit in a u64.
    #[error("tuple element of {len} bytes overflows its bit length")]
    ElementTooLong {
        /// Length of the rejected element.
        len: usize,
    },

    /// TupleHash was configured with an unusable output length.
    #[error("invalid digest length: {0} bytes")]
    InvalidDigestLength(usize),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, err)
    }
}
