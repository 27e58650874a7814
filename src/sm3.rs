use std::fmt;

use digest::{
    block_buffer::Eager,
    core_api::{AlgorithmName, Buffer, BufferKindUser, CoreWrapper, FixedOutputCore, UpdateCore},
    crypto_common::{Block, BlockSizeUser},
    typenum::{U32, U64},
    HashMarker, Output, OutputSizeUser, Reset,
};
use once_cell::sync::Lazy;

use crate::compress::{load_u32, Compressor};
use crate::error::Result;
use crate::hasher::Hasher;

/// The size in bytes of the SM3 checksum.
pub const DIGEST_SIZE: usize = 32;

/// Block size, in bytes, of the SM3 hash function.
pub const DIGEST_BLOCK_SIZE: usize = 64;

const IV: [u32; 8] = [
    0x7380166f, 0x4914b2b9, 0x172442d7, 0xda8a0600, 0xa96f30bc, 0x163138aa, 0xe38dee4d, 0xb0fb0e4e,
];

// Round constants: T_j rotated left by j, rounds 16..64 restart from the
// second seed already rotated by 16.
static T: Lazy<[u32; 64]> = Lazy::new(|| {
    let mut t = [0u32; 64];
    t.iter_mut().enumerate().for_each(|(j, v)| {
        *v = if j < 16 {
            0x79cc4519u32.rotate_left(j as u32)
        } else {
            0x9d8a7a87u32.rotate_left((j as u32 - 16) % 32)
        }
    });
    t
});

/// Sm3 is the SM3 chaining state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sm3 {
    v: [u32; 8],
}

impl Default for Sm3 {
    fn default() -> Self {
        Self { v: IV }
    }
}

/// Sm3Hasher is a streaming SM3 hash.
pub type Sm3Hasher = Hasher<Sm3>;

/// new returns a streaming SM3 hasher.
pub fn new() -> Sm3Hasher {
    Hasher::new()
}

/// hash returns the SM3 digest of `data`.
pub fn hash(data: &[u8]) -> Result<Vec<u8>> {
    let mut h = new();
    h.write(data)?;
    Ok(h.finalize()?.to_vec())
}

fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

fn ff0(a: u32, b: u32, c: u32) -> u32 {
    a ^ b ^ c
}

fn ff1(a: u32, b: u32, c: u32) -> u32 {
    (a & b) | (c & (a | b))
}

fn gg0(e: u32, f: u32, g: u32) -> u32 {
    e ^ f ^ g
}

fn gg1(e: u32, f: u32, g: u32) -> u32 {
    g ^ (e & (f ^ g))
}

type BoolFn = fn(u32, u32, u32) -> u32;

// round applies one SM3 round and returns the rotated working registers.
fn round(v: [u32; 8], ff: BoolFn, gg: BoolFn, t: u32, w: u32, w_prime: u32) -> [u32; 8] {
    let [a, b, c, d, e, f, g, h] = v;

    let a12 = a.rotate_left(12);
    let ss1 = a12.wrapping_add(e).wrapping_add(t).rotate_left(7);
    let ss2 = ss1 ^ a12;
    let tt1 = ff(a, b, c)
        .wrapping_add(d)
        .wrapping_add(ss2)
        .wrapping_add(w_prime);
    let tt2 = gg(e, f, g)
        .wrapping_add(h)
        .wrapping_add(ss1)
        .wrapping_add(w);

    [tt1, a, b.rotate_left(9), c, p0(tt2), e, f.rotate_left(19), g]
}

impl Compressor for Sm3 {
    const NAME: &'static str = "sm3";
    const BLOCK_SIZE: usize = DIGEST_BLOCK_SIZE;
    const LENGTH_SIZE: usize = 8;
    const OUTPUT_SIZE: usize = DIGEST_SIZE;

    fn compress(&mut self, block: &[u8]) {
        debug_assert_eq!(block.len(), DIGEST_BLOCK_SIZE);

        // message expansion
        let mut w = [0u32; 68];
        (0..16).for_each(|t| w[t] = load_u32(block, t));
        (16..68).for_each(|t| {
            w[t] = p1(w[t - 16] ^ w[t - 9] ^ w[t - 3].rotate_left(15))
                ^ w[t - 13].rotate_left(7)
                ^ w[t - 6]
        });

        let mut r = self.v;
        (0..16).for_each(|j| r = round(r, ff0, gg0, T[j], w[j], w[j] ^ w[j + 4]));
        (16..64).for_each(|j| r = round(r, ff1, gg1, T[j], w[j], w[j] ^ w[j + 4]));

        self.v.iter_mut().zip(r).for_each(|(v, x)| *v ^= x);
    }

    fn output(&self, out: &mut [u8]) {
        out.chunks_exact_mut(4)
            .zip(self.v)
            .for_each(|(o, v)| o.copy_from_slice(&v.to_be_bytes()));
    }
}

/// Sm3Core plugs SM3 into the RustCrypto `digest` traits.
///
/// The `digest` traits cannot report errors, so the 64-bit length field
/// wraps for messages of 2^61 bytes or more. Use [`Hasher`] to get
/// [`crate::Error::LengthOverflow`] instead.
#[derive(Clone, Debug, Default)]
pub struct Sm3Core {
    c: Sm3,
    blocks: u64,
}

/// Sm3Digest is SM3 as a `digest::Digest`.
pub type Sm3Digest = CoreWrapper<Sm3Core>;

impl HashMarker for Sm3Core {}

impl BlockSizeUser for Sm3Core {
    type BlockSize = U64;
}

impl BufferKindUser for Sm3Core {
    type BufferKind = Eager;
}

impl OutputSizeUser for Sm3Core {
    type OutputSize = U32;
}

impl UpdateCore for Sm3Core {
    fn update_blocks(&mut self, blocks: &[Block<Self>]) {
        self.blocks = self.blocks.wrapping_add(blocks.len() as u64);
        for b in blocks {
            self.c.compress(b)
        }
    }
}

impl FixedOutputCore for Sm3Core {
    fn finalize_fixed_core(&mut self, buffer: &mut Buffer<Self>, out: &mut Output<Self>) {
        let bitlen = self
            .blocks
            .wrapping_mul(DIGEST_BLOCK_SIZE as u64)
            .wrapping_add(buffer.get_pos() as u64)
            .wrapping_mul(8);
        buffer.len64_padding_be(bitlen, |b| self.c.compress(b));
        self.c.output(out);
    }
}

impl Reset for Sm3Core {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl AlgorithmName for Sm3Core {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sm3")
    }
}
