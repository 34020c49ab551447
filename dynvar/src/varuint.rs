//! Unsigned LEB128: seven bits per byte, least significant group first, the
//! high bit set on every byte but the last.

use crate::VarUintError;

/// Number of bytes [`encode`] produces for `value`.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Appends the minimal encoding of `value` to `out`.
pub fn encode_into(mut value: u64, out: &mut Vec<u8>) {
    out.reserve(encoded_len(value));
    loop {
        let group = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(group);
            return;
        }
        out.push(group | 0x80);
    }
}

pub fn encode(value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

/// Decodes exactly one minimally encoded varuint spanning all of `bytes`.
pub fn decode(bytes: &[u8]) -> Result<u64, VarUintError> {
    let mut value = 0u64;
    for (i, &byte) in bytes.iter().enumerate() {
        let shift = 7 * i as u32;
        let group = u64::from(byte & 0x7f);
        if shift >= 64 || (shift == 63 && group > 1) {
            return Err(VarUintError::Overflow);
        }
        value |= group << shift;
        if byte & 0x80 == 0 {
            if i > 0 && group == 0 {
                return Err(VarUintError::NonMinimal);
            }
            let rest = bytes.len() - i - 1;
            return if rest == 0 {
                Ok(value)
            } else {
                Err(VarUintError::Trailing(rest))
            };
        }
    }
    if bytes.is_empty() {
        Err(VarUintError::Empty)
    } else {
        Err(VarUintError::Truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn small_values_take_one_byte() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7f]);
    }

    #[test]
    fn multi_byte_values() {
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xac, 0x02]);
        assert_eq!(decode(&[0xac, 0x02]), Ok(300));
        assert_eq!(encoded_len(300), 2);
    }

    #[test]
    fn extremes() {
        let max = encode(u64::MAX);
        assert_eq!(max.len(), 10);
        assert_eq!(encoded_len(u64::MAX), 10);
        assert_eq!(decode(&max), Ok(u64::MAX));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(decode(&[]), Err(VarUintError::Empty));
        assert_eq!(decode(&[0x80]), Err(VarUintError::Truncated));
        assert_eq!(decode(&[0x01, 0x00]), Err(VarUintError::Trailing(1)));
        let mut too_wide = vec![0xff; 9];
        too_wide.push(0x02);
        assert_eq!(decode(&too_wide), Err(VarUintError::Overflow));
        assert_eq!(decode(&[0x80; 11]), Err(VarUintError::Overflow));
    }

    #[test]
    fn rejects_padded_encodings() {
        assert_eq!(decode(&[0x80, 0x00]), Err(VarUintError::NonMinimal));
        assert_eq!(decode(&[0x81, 0x80, 0x00]), Err(VarUintError::NonMinimal));
        assert_eq!(decode(&[0x00]), Ok(0));
        assert_eq!(decode(&[0x80, 0x01]), Ok(128));
    }
}
