use std::fmt;

use digest::{
    block_buffer::Eager,
    core_api::{AlgorithmName, Buffer, BufferKindUser, CoreWrapper, FixedOutputCore, UpdateCore},
    crypto_common::{Block, BlockSizeUser},
    typenum::{U128, U28},
    HashMarker, Output, OutputSizeUser, Reset,
};

use crate::compress::{load_u64, Compressor};
use crate::counter::Uint128;
use crate::error::Result;
use crate::hasher::Hasher;

/// The size in bytes of the SHA2-512/224 checksum.
pub const DIGEST_SIZE: usize = 28;

/// Block size, in bytes, of the SHA2-512/224 hash function.
pub const DIGEST_BLOCK_SIZE: usize = 128;

const IV: [u64; 8] = [
    0x8c3d37c819544da2,
    0x73e1996689dcd4d6,
    0x1dfab7ae32ff9c82,
    0x679dd514582f9fcf,
    0x0f6d2b697bd44da8,
    0x77e36f7304c48942,
    0x3f9d85a86a1d36c8,
    0x1112e6ad91d692a1,
];

const K: [u64; 80] = [
    0x428a2f98d728ae22, 0x7137449123ef65cd, 0xb5c0fbcfec4d3b2f, 0xe9b5dba58189dbbc,
    0x3956c25bf348b538, 0x59f111f1b605d019, 0x923f82a4af194f9b, 0xab1c5ed5da6d8118,
    0xd807aa98a3030242, 0x12835b0145706fbe, 0x243185be4ee4b28c, 0x550c7dc3d5ffb4e2,
    0x72be5d74f27b896f, 0x80deb1fe3b1696b1, 0x9bdc06a725c71235, 0xc19bf174cf692694,
    0xe49b69c19ef14ad2, 0xefbe4786384f25e3, 0x0fc19dc68b8cd5b5, 0x240ca1cc77ac9c65,
    0x2de92c6f592b0275, 0x4a7484aa6ea6e483, 0x5cb0a9dcbd41fbd4, 0x76f988da831153b5,
    0x983e5152ee66dfab, 0xa831c66d2db43210, 0xb00327c898fb213f, 0xbf597fc7beef0ee4,
    0xc6e00bf33da88fc2, 0xd5a79147930aa725, 0x06ca6351e003826f, 0x142929670a0e6e70,
    0x27b70a8546d22ffc, 0x2e1b21385c26c926, 0x4d2c6dfc5ac42aed, 0x53380d139d95b3df,
    0x650a73548baf63de, 0x766a0abb3c77b2a8, 0x81c2c92e47edaee6, 0x92722c851482353b,
    0xa2bfe8a14cf10364, 0xa81a664bbc423001, 0xc24b8b70d0f89791, 0xc76c51a30654be30,
    0xd192e819d6ef5218, 0xd69906245565a910, 0xf40e35855771202a, 0x106aa07032bbd1b8,
    0x19a4c116b8d2d0c8, 0x1e376c085141ab53, 0x2748774cdf8eeb99, 0x34b0bcb5e19b48a8,
    0x391c0cb3c5c95a63, 0x4ed8aa4ae3418acb, 0x5b9cca4f7763e373, 0x682e6ff3d6b2b8a3,
    0x748f82ee5defb2fc, 0x78a5636f43172f60, 0x84c87814a1f0ab72, 0x8cc702081a6439ec,
    0x90befffa23631e28, 0xa4506cebde82bde9, 0xbef9a3f7b2c67915, 0xc67178f2e372532b,
    0xca273eceea26619c, 0xd186b8c721c0c207, 0xeada7dd6cde0eb1e, 0xf57d4f7fee6ed178,
    0x06f067aa72176fba, 0x0a637dc5a2c898a6, 0x113f9804bef90dae, 0x1b710b35131c471b,
    0x28db77f523047d84, 0x32caab7b40c72493, 0x3c9ebe0a15c9bebc, 0x431d67c49c100d4c,
    0x4cc5d4becb3e42b6, 0x597f299cfc657e2a, 0x5fcb6fab3ad6faec, 0x6c44198c4a475817,
];

/// Sha512Trunc224 is the SHA2-512/224 chaining state.
///
/// The full 512-bit state is carried through every block; only the first
/// 224 bits are emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sha512Trunc224 {
    h: [u64; 8],
}

impl Default for Sha512Trunc224 {
    fn default() -> Self {
        Self { h: IV }
    }
}

/// Sha512Trunc224Hasher is a streaming SHA2-512/224 hash.
pub type Sha512Trunc224Hasher = Hasher<Sha512Trunc224>;

/// new returns a streaming SHA2-512/224 hasher.
pub fn new() -> Sha512Trunc224Hasher {
    Hasher::new()
}

/// hash returns the SHA2-512/224 digest of `data`.
pub fn hash(data: &[u8]) -> Result<Vec<u8>> {
    let mut h = new();
    h.write(data)?;
    Ok(h.finalize()?.to_vec())
}

fn ch(x: u64, y: u64, z: u64) -> u64 {
    (x & (y ^ z)) ^ z
}

fn maj(x: u64, y: u64, z: u64) -> u64 {
    (x & (y | z)) | (y & z)
}

fn big_sigma0(x: u64) -> u64 {
    x.rotate_right(28) ^ x.rotate_right(34) ^ x.rotate_right(39)
}

fn big_sigma1(x: u64) -> u64 {
    x.rotate_right(14) ^ x.rotate_right(18) ^ x.rotate_right(41)
}

fn small_sigma0(x: u64) -> u64 {
    x.rotate_right(1) ^ x.rotate_right(8) ^ (x >> 7)
}

fn small_sigma1(x: u64) -> u64 {
    x.rotate_right(19) ^ x.rotate_right(61) ^ (x >> 6)
}

fn round(r: [u64; 8], k: u64, w: u64) -> [u64; 8] {
    let [a, b, c, d, e, f, g, h] = r;

    let t1 = h
        .wrapping_add(big_sigma1(e))
        .wrapping_add(ch(e, f, g))
        .wrapping_add(k)
        .wrapping_add(w);
    let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));

    [t1.wrapping_add(t2), a, b, c, d.wrapping_add(t1), e, f, g]
}

impl Compressor for Sha512Trunc224 {
    const NAME: &'static str = "sha2-512/224";
    const BLOCK_SIZE: usize = DIGEST_BLOCK_SIZE;
    const LENGTH_SIZE: usize = 16;
    const OUTPUT_SIZE: usize = DIGEST_SIZE;

    fn compress(&mut self, block: &[u8]) {
        debug_assert_eq!(block.len(), DIGEST_BLOCK_SIZE);

        let mut w = [0u64; 80];
        (0..16).for_each(|t| w[t] = load_u64(block, t));
        (16..80).for_each(|t| {
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

    // Three full words, then the high half of the fourth.
    fn output(&self, out: &mut [u8]) {
        out[..24]
            .chunks_exact_mut(8)
            .zip(self.h)
            .for_each(|(o, h)| o.copy_from_slice(&h.to_be_bytes()));
        out[24..28].copy_from_slice(&self.h[3].to_be_bytes()[..4]);
    }
}

/// Sha512Trunc224Core plugs SHA2-512/224 into the RustCrypto `digest` traits.
#[derive(Clone, Debug, Default)]
pub struct Sha512Trunc224Core {
    c: Sha512Trunc224,
    len: Uint128,
}

/// Sha512Trunc224Digest is SHA2-512/224 as a `digest::Digest`.
pub type Sha512Trunc224Digest = CoreWrapper<Sha512Trunc224Core>;

impl HashMarker for Sha512Trunc224Core {}

impl BlockSizeUser for Sha512Trunc224Core {
    type BlockSize = U128;
}

impl BufferKindUser for Sha512Trunc224Core {
    type BufferKind = Eager;
}

impl OutputSizeUser for Sha512Trunc224Core {
    type OutputSize = U28;
}

impl UpdateCore for Sha512Trunc224Core {
    fn update_blocks(&mut self, blocks: &[Block<Self>]) {
        for b in blocks {
            self.len.add(DIGEST_BLOCK_SIZE as u64);
            self.c.compress(b)
        }
    }
}

impl FixedOutputCore for Sha512Trunc224Core {
    fn finalize_fixed_core(&mut self, buffer: &mut Buffer<Self>, out: &mut Output<Self>) {
        let mut len = self.len;
        len.add(buffer.get_pos() as u64);
        let bits = len.bits();
        let bitlen = (u128::from(bits.high()) << 64) | u128::from(bits.low());
        buffer.len128_padding_be(bitlen, |b| self.c.compress(b));
        self.c.output(out);
    }
}

impl Reset for Sha512Trunc224Core {
    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl AlgorithmName for Sha512Trunc224Core {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sha512Trunc224")
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
            output: "6ed0dd02806fa89e25de060c19d3ac86cabb87d6a0ddd05c333b84f4",
        },
        TestElement {
            input: "abc",
            output: "4634270f707b6a54daae7530460842e20e37ed265ceee9a43e8924aa",
        },
        TestElement {
            input: "abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmnhijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu",
            output: "23fec5bb94d60b23308192640b0c453335d664734fe40e7268674af9",
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

            let sum = hex::encode(Sha512Trunc224Digest::digest(element.input.as_bytes()));
            assert_eq!(element.output, sum, "digest core mismatched on index {}", i);
        })
    }

    #[test]
    fn truncation() {
        let c = Sha512Trunc224 {
            h: [
                0x0001020304050607,
                0x08090a0b0c0d0e0f,
                0x1011121314151617,
                0x18191a1b1c1d1e1f,
                u64::MAX,
                u64::MAX,
                u64::MAX,
                u64::MAX,
            ],
        };
        let mut out = [0u8; DIGEST_SIZE];
        c.output(&mut out);

        let expected: Vec<u8> = (0u8..28).collect();
        assert_eq!(out.to_vec(), expected);
    }

    #[test]
    fn padding_spills_into_second_block() -> Result<()> {
        // 112..=127 pending bytes leave no room for the 16-byte length field
        for l in [111, 112, 120, 127, 128, 239, 240, 255, 256] {
            let input: Vec<u8> = (0..l).map(|i| i as u8).collect();
            assert_eq!(
                hash(&input)?,
                Sha512Trunc224Digest::digest(&input).to_vec(),
                "len {}",
                l
            );
        }
        Ok(())
    }

    #[test]
    fn sha512_224_reset() -> Result<()> {
        let mut h = new();
        h.write(&[0x11; 1000])?;
        h.reset();
        h.write(b"abc")?;
        assert_eq!(h.finalize()?.to_hex(), TEST_VECTOR[1].output);
        Ok(())
    }
}
