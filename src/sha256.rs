use std::fmt;

use digest::{
    block_buffer::Eager,
    core_api::{AlgorithmName, Buffer, BufferKindUser, CoreWrapper, FixedOutputCore, UpdateCore},
    crypto_common::{Block, BlockSizeUser},
    typenum::{U32, U64},
    HashMarker, Output, OutputSizeUser, Reset,
};

use crate::compress::{load_u32, Compressor};
use crate::error::Result;
use crate::hasher::Hasher;

/// The size in bytes of the SHA2-256 checksum.
pub const DIGEST_SIZE: usize = 32;

/// Block size, in bytes, of the SHA2-256 hash function.
pub const DIGEST_BLOCK_SIZE: usize = 64;

const IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// Sha256 is the SHA2-256 chaining state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sha256 {
    h: [u32; 8],
}

impl Default for Sha256 {
    fn default() -> Self {
        Self { h: IV }
    }
}

/// Sha256Hasher is a streaming SHA2-256 hash.
pub type Sha256Hasher = Hasher<Sha256>;

/// new returns a streaming SHA2-256 hasher.
pub fn new() -> Sha256Hasher {
    Hasher::new()
}

/// hash returns the SHA2-256 digest of `data`.
pub fn hash(data: &[u8]) -> Result<Vec<u8>> {
    let mut h = new();
    h.write(data)?;
    Ok(h.finalize()?.to_vec())
}

fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & (y ^ z)) ^ z
}

fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & (y | z)) | (y & z)
}

fn big_sigma0(x: u32) -> u32 {
    x.rotate_right(2) ^ x.rotate_right(13) ^ x.rotate_right(22)
}

fn big_sigma1(x: u32) -> u32 {
    x.rotate_right(6) ^ x.rotate_right(11) ^ x.rotate_right(25)
}

fn small_sigma0(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

fn small_sigma1(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

fn round(r: [u32; 8], k: u32, w: u32) -> [u32; 8] {
    let [a, b, c, d, e, f, g, h] = r;

    let t1 = h
        .wrapping_add(big_sigma1(e))
        .wrapping_add(ch(e, f, g))
        .wrapping_add(k)
        .wrapping_add(w);
    let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));

    [t1.wrapping_add(t2), a, b, c, d.wrapping_add(t1), e, f, g]
}

impl Compressor for Sha256 {
    const NAME: &'static str = "sha2-256";
    const BLOCK_SIZE: usize = DIGEST_BLOCK_SIZE;
    const LENGTH_SIZE: usize = 8;
    const OUTPUT_SIZE: usize = DIGEST_SIZE;

    fn compress(&mut self, block: &[u8]) {
        debug_assert_eq!(block.len(), DIGEST_BLOCK_SIZE);

        // message schedule
        let mut w = [0u32; 64];
        (0..16).for_each(|t| w[t] = load_u32(block, t));
        (16..64).for_each(|t| {
            w[t] = small_sigma1(w[t - 2])
                .wrapping_add(w[t - 7])
                .wrapping_add(small_sigma0(w[t - 15]))
                .wrapping_add(w[t - 16])
        });

        let r = K.iter().zip(w).fold(self.h, |r, (&k, w)| round(r, k, w));

        self.h
            .iter_mut()
            .zip(r)
            .for_each(|(h, x)| *h = h.wrapping_add(x));
    }

    fn output(&self, out: &mut [u8]) {
        out.chunks_exact_mut(4)
            .zip(self.h)
            .for_each(|(o, h)| o.copy_from_slice(&h.to_be_bytes()));
    }
}

/// Sha256Core plugs SHA2-256 into the RustCrypto `digest` traits.
///
/// The `digest` traits cannot report errors, so the 64-bit length field
/// wraps for messages of 2^61 bytes or more. Use [`Hasher`] to get
/// [`crate::Error::LengthOverflow`] instead.
#[derive(Clone, Debug, Default)]
pub struct Sha256Core {
    c: Sha256,
    blocks: u64,
}

/// Sha256Digest is SHA2-256 as a `digest::Digest`.
pub type Sha256Digest = CoreWrapper<Sha256Core>;

impl HashMarker for Sha256Core {}

impl BlockSizeUser for Sha256Core {
    type BlockSize = U64;
}

impl BufferKindUser for Sha256Core {
    type BufferKind = Eager;
}

impl OutputSizeUser for Sha256Core {
    type OutputSize = U32;
}

impl UpdateCore for Sha256Core {
    fn update_blocks(&mut self, blocks: &[Block<Self>]) {
        self.blocks = self.blocks.wrapping_add(blocks.len() as u64);
        for b in blocks {
            self.c.compress(b)
        }
    }
}

impl FixedOutputCore for Sha256Core {
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

impl Reset for Sha256Core {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl AlgorithmName for Sha256Core {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sha256")
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use anyhow::Result;
    use digest::Digest;

    struct TestElement {
        input: &'static str,
        output: &'static str,
    }

    static TEST_VECTOR: &[TestElement] = &[
        TestElement {
            input: "",
            output: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        },
        TestElement {
            input: "abc",
            output: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        },
        TestElement {
            input: "abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq",
            output: "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1",
        },
        TestElement {
            input: "abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmnhijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu",
            output: "cf5b16a778af8380036ce59e7b0492370b249b11e8f07a51afac45037afee9d1",
        },
    ];

    #[test]
    fn test_vector() {
        TEST_VECTOR.iter().enumerate().for_each(|(i, element)| {
            let mut h = new();
            h.write(element.input.as_bytes()).unwrap();

            let sum = h.finalize().unwrap().to_hex();
            assert_eq!(
                element.output, sum,
                "test vector element mismatched on index {} failed! got {}, want {}",
                i, sum, element.output
            );

            let sum = hex::encode(Sha256Digest::digest(element.input.as_bytes()));
            assert_eq!(element.output, sum, "digest core mismatched on index {}", i);
        })
    }

    #[test]
    fn million_a() -> Result<()> {
        let expected = "cdc76e5c9914fb9281a1c7e284d73e67f1809a48a497200e046d39ccc7112cd0";

        // 1000 writes of 1000 bytes keep the buffer path busy
        let mut h = new();
        let chunk = [b'a'; 1000];
        for _ in 0..1000 {
            h.write(&chunk)?;
        }
        assert_eq!(h.finalize()?.to_hex(), expected);
        assert_eq!(hex::encode(hash(&vec![b'a'; 1_000_000])?), expected);
        Ok(())
    }

    #[test]
    fn exact_block_input() -> Result<()> {
        // 64 bytes: the padding must occupy exactly one extra block
        let input = [0u8; 64];
        let mut h = new();
        h.write(&input)?;
        let sum = h.finalize()?.to_vec();
        assert_eq!(sum, Sha256Digest::digest(input).to_vec());
        Ok(())
    }

    #[test]
    fn digest_core_length_wraps() {
        let core = Sha256Core {
            c: Sha256::default(),
            blocks: u64::MAX,
        };
        let mut d = Sha256Digest::from_core(core);
        d.update(b"abc");
        let sum = d.finalize();

        // (2^64 - 1) * 512 + 24 bits, reduced mod 2^64
        let mut c = Sha256::default();
        let mut block = [0u8; DIGEST_BLOCK_SIZE];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[56..].copy_from_slice(&24u64.wrapping_sub(512).to_be_bytes());
        c.compress(&block);
        let mut want = [0u8; DIGEST_SIZE];
        c.output(&mut want);
        assert_eq!(sum.to_vec(), want.to_vec());
    }

    #[test]
    fn intermediate_state() {
        // before finalize the accessors expose the chaining value
        let h = new();
        let iv: Vec<u8> = IV.iter().flat_map(|w| w.to_be_bytes()).collect();
        assert_eq!(h.to_vec(), iv);
    }
}
