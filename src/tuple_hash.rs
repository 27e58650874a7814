use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    CShake128, CShake128Core, CShake256, CShake256Core,
};
use tracing::{debug, trace};

use crate::encode::{left_encode, right_encode};
use crate::error::{Error, Result};
use crate::hasher::State;

const FUNCTION_NAME: &[u8] = b"TupleHash";

/// CShake is the narrow view of cSHAKE that TupleHash needs.
pub trait CShake: Clone {
    /// with_function_name returns cSHAKE keyed by function name `n` and
    /// customization string `s`.
    fn with_function_name(n: &[u8], s: &[u8]) -> Self;
    /// absorb feeds `data` into the sponge.
    fn absorb(&mut self, data: &[u8]);
    /// squeeze fills `out` with output.
    fn squeeze(self, out: &mut [u8]);
}

impl CShake for CShake128 {
    fn with_function_name(n: &[u8], s: &[u8]) -> Self {
        CShake128::from_core(CShake128Core::new_with_function_name(n, s))
    }

    fn absorb(&mut self, data: &[u8]) {
        Update::update(self, data);
    }

    fn squeeze(self, out: &mut [u8]) {
        self.finalize_xof().read(out);
    }
}

impl CShake for CShake256 {
    fn with_function_name(n: &[u8], s: &[u8]) -> Self {
        CShake256::from_core(CShake256Core::new_with_function_name(n, s))
    }

    fn absorb(&mut self, data: &[u8]) {
        Update::update(self, data);
    }

    fn squeeze(self, out: &mut [u8]) {
        self.finalize_xof().read(out);
    }
}

/// TupleHash hashes a sequence of byte strings so that each element is
/// unambiguously framed: `("abc", "d")` and `("ab", "cd")` hash differently.
///
/// Elements are passed one at a time with [`TupleHash::next_data`]. After
/// [`TupleHash::finalize`] only the digest accessors and
/// [`TupleHash::reset`] are valid.
#[derive(Clone)]
pub struct TupleHash<X: CShake> {
    xof: X,
    initial: X,
    digest_len: usize,
    out: Vec<u8>,
    state: State,
}

/// TupleHash128 is TupleHash over cSHAKE128.
pub type TupleHash128 = TupleHash<CShake128>;

/// TupleHash256 is TupleHash over cSHAKE256.
pub type TupleHash256 = TupleHash<CShake256>;

impl<X: CShake> TupleHash<X> {
    /// new returns a TupleHash producing `digest_len` bytes, customized by
    /// `customization` (which may be empty).
    ///
    /// A length whose output buffer cannot be allocated is rejected with
    /// [`Error::InvalidDigestLength`].
    pub fn new(digest_len: usize, customization: &[u8]) -> Result<Self> {
        if digest_len == 0 || bit_len(digest_len).is_none() {
            debug!(digest_len, "rejecting tuple hash digest length");
            return Err(Error::InvalidDigestLength(digest_len));
        }

        let mut out = Vec::new();
        if out.try_reserve_exact(digest_len).is_err() {
            debug!(digest_len, "cannot allocate tuple hash output");
            return Err(Error::InvalidDigestLength(digest_len));
        }
        out.resize(digest_len, 0);

        let xof = X::with_function_name(FUNCTION_NAME, customization);
        Ok(TupleHash {
            initial: xof.clone(),
            xof,
            digest_len,
            out,
            state: State::Absorbing,
        })
    }

    /// reset drops all absorbed elements; the customization is kept.
    pub fn reset(&mut self) {
        trace!(digest_len = self.digest_len, "tuple hash reset");
        self.xof = self.initial.clone();
        self.out.iter_mut().for_each(|b| *b = 0);
        self.state = State::Absorbing;
    }

    /// size returns the number of bytes in the digest.
    pub fn size(&self) -> usize {
        self.digest_len
    }

    /// is_finalized reports whether finalize has been called since the last reset.
    pub fn is_finalized(&self) -> bool {
        self.state == State::Finalized
    }

    /// next_data appends one element to the tuple.
    pub fn next_data(&mut self, element: &[u8]) -> Result<&mut Self> {
        self.check_absorbing()?;
        let bits = element_bits(element.len())?;

        self.xof.absorb(left_encode(bits).as_bytes());
        self.xof.absorb(element);
        Ok(self)
    }

    /// finalize closes the tuple with the output length and squeezes the digest.
    pub fn finalize(&mut self) -> Result<&mut Self> {
        self.check_absorbing()?;

        // digest_len was validated in new
        let bits = bit_len(self.digest_len).unwrap_or_default();
        self.xof.absorb(right_encode(bits).as_bytes());
        self.xof.clone().squeeze(&mut self.out);

        trace!(digest_len = self.digest_len, "tuple hash finalize");
        self.state = State::Finalized;
        Ok(self)
    }

    /// to_vec returns the digest. It is all zeros until [`TupleHash::finalize`]
    /// has been called.
    pub fn to_vec(&self) -> Vec<u8> {
        self.out.clone()
    }

    /// to_hex returns [`TupleHash::to_vec`] as lowercase hexadecimal.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.out)
    }

    fn check_absorbing(&self) -> Result<()> {
        if self.state == State::Finalized {
            debug!("rejecting use of finalized tuple hash");
            return Err(Error::Finalized);
        }
        Ok(())
    }
}

fn bit_len(bytes: usize) -> Option<u64> {
    u64::try_from(bytes).ok()?.checked_mul(8)
}

fn element_bits(len: usize) -> Result<u64> {
    bit_len(len).ok_or(Error::ElementTooLong { len })
}

/// tuple_hash returns the `digest_len`-byte TupleHash of `elements`.
pub fn tuple_hash<X, I>(digest_len: usize, customization: &[u8], elements: I) -> Result<Vec<u8>>
where
    X: CShake,
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut h = TupleHash::<X>::new(digest_len, customization)?;
    for e in elements {
        h.next_data(e.as_ref())?;
    }
    Ok(h.finalize()?.to_vec())
}
