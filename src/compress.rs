use byteorder::{BigEndian, ByteOrder};

/// Compressor is a Merkle–Damgård chaining state together with the block
/// compression function that updates it.
///
/// `Default` must return the algorithm's published initial chaining value.
pub trait Compressor: Clone + Default {
    /// Algorithm name, as it shows up in logs.
    const NAME: &'static str;
    /// Number of message bytes consumed per compression.
    const BLOCK_SIZE: usize;
    /// Width in bytes of the big-endian bit-length field appended by the padding.
    const LENGTH_SIZE: usize;
    /// Number of bytes in the serialized digest.
    const OUTPUT_SIZE: usize;

    /// compress folds exactly one block into the chaining state.
    fn compress(&mut self, block: &[u8]);
    /// output serializes the chaining state big-endian into `out`, truncating
    /// to `OUTPUT_SIZE` bytes.
    fn output(&self, out: &mut [u8]);
}

/// load_u32 reads the `idx`-th big-endian 32-bit word of `bytes`.
///
/// `bytes` may start at any offset of a larger buffer; no alignment is assumed.
#[inline]
pub fn load_u32(bytes: &[u8], idx: usize) -> u32 {
    BigEndian::read_u32(&bytes[4 * idx..4 * idx + 4])
}

/// load_u64 reads the `idx`-th big-endian 64-bit word of `bytes`.
#[inline]
pub fn load_u64(bytes: &[u8], idx: usize) -> u64 {
    BigEndian::read_u64(&bytes[8 * idx..8 * idx + 8])
}
