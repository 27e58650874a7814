/// Uint128 counts absorbed bytes for algorithms whose length field is 128 bits
/// wide.
///
/// Only the two operations the padding needs are provided: adding a byte
/// count and converting bytes to bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Uint128 {
    hi: u64,
    lo: u64,
}

impl Uint128 {
    /// add increments the counter by `n`, carrying into the high half.
    pub fn add(&mut self, n: u64) {
        let (lo, carry) = self.lo.overflowing_add(n);
        self.lo = lo;
        if carry {
            self.hi = self.hi.wrapping_add(1);
        }
    }

    /// bits returns the counter multiplied by 8, i.e. shifted left by 3 with
    /// the top bits of the low half carried into the high half.
    pub fn bits(self) -> Self {
        Self {
            hi: (self.hi << 3) | (self.lo >> 61),
            lo: self.lo << 3,
        }
    }

    /// high returns the upper 64 bits.
    pub fn high(&self) -> u64 {
        self.hi
    }

    /// low returns the lower 64 bits.
    pub fn low(&self) -> u64 {
        self.lo
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn add_carries() {
        let mut c = Uint128::default();
        c.add(u64::MAX);
        assert_eq!((c.high(), c.low()), (0, u64::MAX));

        c.add(2);
        assert_eq!((c.high(), c.low()), (1, 1));
    }

    #[test]
    fn bits_carries() {
        let mut c = Uint128::default();
        c.add(3);
        assert_eq!(c.bits(), Uint128 { hi: 0, lo: 24 });

        // the top three bits of the low half move into the high half
        let mut c = Uint128::default();
        c.add(0xE000_0000_0000_0001);
        let b = c.bits();
        assert_eq!((b.high(), b.low()), (0b111, 8));

        let c = Uint128 { hi: 1, lo: 1 << 61 };
        let b = c.bits();
        assert_eq!((b.high(), b.low()), (9, 0));
    }
}
