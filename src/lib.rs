#![warn(missing_docs)]
//! Streaming implementations of SM3, SHA2-256, SHA2-512/224 and TupleHash.
//!
//! The Merkle–Damgård hashes share one buffering and padding engine,
//! [`Hasher`], parameterized by a [`Compressor`]. Each algorithm is also
//! available through the RustCrypto [`digest`] traits.
//!
//! TupleHash follows [`SP 800-185`] on top of the cSHAKE implementation from
//! the `sha3` crate.
//!
//! # Example
//! ```
//! use streamdigest::{sm3, Result};
//!
//! fn main() -> Result<()> {
//!   let mut h = sm3::new();
//!   h.write(b"ab")?;
//!   h.write(b"c")?;
//!   println!("Result: {}", h.finalize()?.to_hex());
//!
//!   Ok(())
//! }
//! ```
//!
//! [`SP 800-185`]: https://doi.org/10.6028/NIST.SP.800-185
/// `compress` holds the compression function seam and the big-endian word loaders.
pub mod compress;
/// `counter` is the 128-bit message length counter.
pub mod counter;
/// `encode` implements the SP 800-185 §2.3.1 length encodings.
pub mod encode;
mod error;
/// `hasher` is the streaming buffer and padding engine.
pub mod hasher;
/// `sha256` is SHA2-256 from FIPS 180-4.
pub mod sha256;
/// `sha512_224` is SHA2-512/224 from FIPS 180-4.
pub mod sha512_224;
/// `sm3` is the SM3 hash function.
pub mod sm3;
/// `tuple_hash` is TupleHash from SP 800-185.
pub mod tuple_hash;

pub use compress::Compressor;
pub use error::{Error, Result};
pub use hasher::Hasher;
pub use sha256::{Sha256Digest, Sha256Hasher};
pub use sha512_224::{Sha512Trunc224Digest, Sha512Trunc224Hasher};
pub use sm3::{Sm3Digest, Sm3Hasher};
pub use tuple_hash::{TupleHash, TupleHash128, TupleHash256};
