use crate::compress::Compressor;
use crate::counter::Uint128;
use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder};
use std::io;
use tracing::{debug, trace};

// Largest byte count whose bit length still fits a 64-bit length field.
const MAX_LEN_64: u64 = 1 << 61;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum State {
    Absorbing,
    Finalized,
}

/// Hasher is the streaming buffer and padding engine shared by every
/// Merkle–Damgård algorithm in this crate.
///
/// A hasher absorbs data with [`Hasher::write`] until [`Hasher::finalize`] is
/// called. After that only the digest accessors and [`Hasher::reset`] are
/// valid; further writes are rejected with [`Error::Finalized`].
#[derive(Clone, Debug)]
pub struct Hasher<C: Compressor> {
    c: C,          // chaining state
    x: Vec<u8>,    // data written since last compression
    len: Uint128,  // total number of message bytes compressed so far
    state: State,
}

impl<C: Compressor> Default for Hasher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Compressor> Hasher<C> {
    /// new returns a hasher holding the algorithm's initial chaining value.
    pub fn new() -> Self {
        Hasher {
            c: C::default(),
            // twice the block size so the padding never reallocates
            x: Vec::with_capacity(2 * C::BLOCK_SIZE),
            len: Uint128::default(),
            state: State::Absorbing,
        }
    }

    /// reset discards everything absorbed so far and makes the hasher ready
    /// for new input.
    pub fn reset(&mut self) {
        trace!(algorithm = C::NAME, "reset");
        self.c = C::default();
        self.x.clear();
        self.len = Uint128::default();
        self.state = State::Absorbing;
    }

    /// size returns the number of bytes in the digest.
    pub fn size(&self) -> usize {
        C::OUTPUT_SIZE
    }

    /// block_size returns the number of bytes compressed at a time.
    pub fn block_size(&self) -> usize {
        C::BLOCK_SIZE
    }

    /// is_finalized reports whether finalize has been called since the last reset.
    pub fn is_finalized(&self) -> bool {
        self.state == State::Finalized
    }

    /// write absorbs `p` and returns the number of bytes written, which is
    /// always `p.len()` on success.
    pub fn write(&mut self, mut p: &[u8]) -> Result<usize> {
        let nn = p.len();
        self.check_absorbing()?;
        self.check_overflow(nn)?;

        if !self.x.is_empty() {
            // continue with existing buffer, if nonempty
            let n = (C::BLOCK_SIZE - self.x.len()).min(p.len());
            self.x.extend_from_slice(&p[..n]);
            p = &p[n..];

            if self.x.len() < C::BLOCK_SIZE {
                return Ok(nn);
            }
            let block = std::mem::take(&mut self.x);
            self.blocks(&block)?;
            self.x = block;
            self.x.clear();
        }

        // full blocks bypass the buffer
        let n = p.len() - p.len() % C::BLOCK_SIZE;
        if n > 0 {
            self.blocks(&p[..n])?;
            p = &p[n..];
        }
        self.x.extend_from_slice(p);

        Ok(nn)
    }

    /// finalize pads the pending data, compresses the last block(s) and moves
    /// the hasher to its terminal state.
    pub fn finalize(&mut self) -> Result<&mut Self> {
        self.check_absorbing()?;

        self.len.add(self.x.len() as u64);
        let bitlen = self.len.bits();
        trace!(algorithm = C::NAME, bytes = self.len.low(), "finalize");

        // Padding. Add a 1 bit and 0 bits until the length field fills the block.
        self.x.push(0x80);
        let tail = C::BLOCK_SIZE - C::LENGTH_SIZE;
        let pad = (C::BLOCK_SIZE + tail - self.x.len() % C::BLOCK_SIZE) % C::BLOCK_SIZE;
        self.x.resize(self.x.len() + pad, 0);

        // Write length in bits, big-endian, keeping the low LENGTH_SIZE bytes.
        let mut tmp = [0u8; 16];
        BigEndian::write_u64(&mut tmp[0..8], bitlen.high());
        BigEndian::write_u64(&mut tmp[8..16], bitlen.low());
        self.x.extend_from_slice(&tmp[16 - C::LENGTH_SIZE..]);

        let padded = std::mem::take(&mut self.x);
        for block in padded.chunks_exact(C::BLOCK_SIZE) {
            self.c.compress(block);
        }
        self.x = padded;
        self.x.clear();

        self.state = State::Finalized;
        Ok(self)
    }

    /// to_vec returns the digest bytes. Before [`Hasher::finalize`] this is the
    /// serialized intermediate chaining value, not a digest of the input.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = vec![0; C::OUTPUT_SIZE];
        self.c.output(&mut out);
        out
    }

    /// to_hex returns [`Hasher::to_vec`] as lowercase hexadecimal.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_vec())
    }

    // blocks hashes full blocks of data. data.len() must be a multiple of C::BLOCK_SIZE.
    fn blocks(&mut self, data: &[u8]) -> Result<()> {
        if data.len() % C::BLOCK_SIZE != 0 {
            return Err(Error::UnalignedBlocks {
                len: data.len(),
                block_size: C::BLOCK_SIZE,
            });
        }

        self.len.add(data.len() as u64);
        data.chunks_exact(C::BLOCK_SIZE)
            .for_each(|block| self.c.compress(block));
        Ok(())
    }

    fn check_absorbing(&self) -> Result<()> {
        if self.state == State::Finalized {
            debug!(algorithm = C::NAME, "rejecting use of finalized hash");
            return Err(Error::Finalized);
        }
        Ok(())
    }

    // Check if the new length (in bits) overflows a 64-bit length field. The
    // 128-bit field cannot overflow from a byte count held in the counter.
    fn check_overflow(&self, nn: usize) -> Result<()> {
        if C::LENGTH_SIZE > 8 {
            return Ok(());
        }
        let written = self.len.low() + self.x.len() as u64;
        if nn as u64 >= MAX_LEN_64 - written {
            debug!(algorithm = C::NAME, written, len = nn, "length overflow");
            return Err(Error::LengthOverflow { written, len: nn });
        }
        Ok(())
    }
}

impl<C: Compressor> io::Write for Hasher<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(Hasher::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
