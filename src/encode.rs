/// Encoded holds one `left_encode` or `right_encode` output: at most eight
/// value bytes plus the length byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoded {
    buf: [u8; 9],
    len: usize,
}

impl Encoded {
    /// as_bytes returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl AsRef<[u8]> for Encoded {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

// Minimal big-endian representation of x, never shorter than one byte.
fn value_bytes(x: u64) -> ([u8; 8], usize) {
    let n = (8 - x.leading_zeros() as usize / 8).max(1);
    (x.to_be_bytes(), n)
}

/// left_encode encodes `x` as its byte count followed by its minimal
/// big-endian bytes.
pub fn left_encode(x: u64) -> Encoded {
    let (be, n) = value_bytes(x);
    let mut buf = [0u8; 9];
    buf[0] = n as u8;
    buf[1..=n].copy_from_slice(&be[8 - n..]);
    Encoded { buf, len: n + 1 }
}

/// right_encode encodes `x` as its minimal big-endian bytes followed by
/// their count.
pub fn right_encode(x: u64) -> Encoded {
    let (be, n) = value_bytes(x);
    let mut buf = [0u8; 9];
    buf[..n].copy_from_slice(&be[8 - n..]);
    buf[n] = n as u8;
    Encoded { buf, len: n + 1 }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn left() {
        assert_eq!(left_encode(0).as_bytes(), &[0x01, 0x00]);
        assert_eq!(left_encode(24).as_bytes(), &[0x01, 0x18]);
        assert_eq!(left_encode(255).as_bytes(), &[0x01, 0xff]);
        assert_eq!(left_encode(256).as_bytes(), &[0x02, 0x01, 0x00]);
        assert_eq!(left_encode(168).as_bytes(), &[0x01, 0xa8]);
        assert_eq!(
            left_encode(u64::MAX).as_bytes(),
            &[0x08, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn right() {
        assert_eq!(right_encode(0).as_bytes(), &[0x00, 0x01]);
        assert_eq!(right_encode(256).as_bytes(), &[0x01, 0x00, 0x02]);
        assert_eq!(right_encode(512).as_bytes(), &[0x02, 0x00, 0x02]);
        assert_eq!(
            right_encode(0x0102030405060708).as_bytes(),
            &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x08]
        );
    }
}
