//! Base-62 short code encoding and decoding.
//!
//! Record ids are rendered over the alphabet `0-9`, `a-z`, `A-Z`, most
//! significant symbol first and without padding. Symbol value `0` is `'0'`,
//! `35` is `'z'` and `61` is `'Z'`.

use thiserror::Error;

/// Symbols in value order.
const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u64 = 62;

/// `u64::MAX` needs 11 base-62 symbols.
const MAX_CODE_LEN: usize = 11;

/// Errors returned by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The code is empty or contains a symbol outside the alphabet.
    #[error("invalid short code '{code}'")]
    InvalidCode { code: String },

    /// The code is well-formed but its value does not fit in a `u64`.
    #[error("short code '{code}' is out of range")]
    Overflow { code: String },
}

/// Encodes a record id as a base-62 short code.
///
/// Zero encodes to `"0"`, never to an empty string.
///
/// # Examples
///
/// ```
/// use shortlink::utils::base62::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "Z");
/// assert_eq!(encode(62), "10");
/// ```
pub fn encode(id: u64) -> String {
    if id == 0 {
        return "0".to_string();
    }

    let mut buf = [0u8; MAX_CODE_LEN];
    let mut pos = MAX_CODE_LEN;
    let mut n = id;

    while n > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }

    // ALPHABET is pure ASCII
    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Decodes a base-62 short code back into a record id.
///
/// # Errors
///
/// Returns [`CodecError::InvalidCode`] if the code is empty or contains any
/// character outside `[0-9a-zA-Z]`, and [`CodecError::Overflow`] if the value
/// exceeds `u64::MAX`.
///
/// # Examples
///
/// ```
/// use shortlink::utils::base62::{decode, CodecError};
///
/// assert_eq!(decode("10"), Ok(62));
/// assert!(matches!(decode("!!!"), Err(CodecError::InvalidCode { .. })));
/// ```
pub fn decode(code: &str) -> Result<u64, CodecError> {
    if code.is_empty() {
        return Err(CodecError::InvalidCode {
            code: code.to_string(),
        });
    }

    code.bytes().try_fold(0u64, |acc, byte| {
        let digit = symbol_value(byte).ok_or_else(|| CodecError::InvalidCode {
            code: code.to_string(),
        })?;

        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| CodecError::Overflow {
                code: code.to_string(),
            })
    })
}

/// Returns the value of a single alphabet symbol.
fn symbol_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'z' => byte - b'a' + 10,
        b'A'..=b'Z' => byte - b'A' + 36,
        _ => return None,
    };
    Some(u64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_zero_is_single_symbol() {
        assert_eq!(encode(0), "0");
    }

    #[test]
    fn test_encode_single_symbol_boundaries() {
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(35), "z");
        assert_eq!(encode(36), "A");
        assert_eq!(encode(61), "Z");
    }

    #[test]
    fn test_encode_multi_symbol() {
        assert_eq!(encode(62), "10");
        assert_eq!(encode(62 * 62 - 1), "ZZ");
        assert_eq!(encode(62 * 62), "100");
    }

    #[test]
    fn test_encode_has_no_leading_zero() {
        for id in [1u64, 62, 3844, 1_000_000] {
            assert!(!encode(id).starts_with('0'), "id {id}");
        }
    }

    #[test]
    fn test_encode_max_fits_buffer() {
        let code = encode(u64::MAX);
        assert_eq!(code.len(), MAX_CODE_LEN);
        assert_eq!(decode(&code), Ok(u64::MAX));
    }

    #[test]
    fn test_round_trip() {
        let samples = (0..5_000u64)
            .chain([61, 62, 63, 238_327, 238_328, 56_800_235_583])
            .chain([u64::MAX / 62, u64::MAX - 1, u64::MAX]);

        for id in samples {
            assert_eq!(decode(&encode(id)), Ok(id), "id {id}");
        }
    }

    #[test]
    fn test_decode_accepts_leading_zero() {
        assert_eq!(decode("0"), Ok(0));
        assert_eq!(decode("01"), Ok(1));
        assert_eq!(decode("000Z"), Ok(61));
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        assert_eq!(decode("a"), Ok(10));
        assert_eq!(decode("A"), Ok(36));
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        for code in ["!!!", "ab-c", "a_b", "a b", "ab/", "é", "abc=", "+"] {
            assert_eq!(
                decode(code),
                Err(CodecError::InvalidCode {
                    code: code.to_string()
                }),
                "code {code:?}"
            );
        }
    }

    #[test]
    fn test_decode_rejects_empty() {
        assert!(matches!(decode(""), Err(CodecError::InvalidCode { .. })));
    }

    #[test]
    fn test_decode_overflow() {
        assert_eq!(encode(u64::MAX), "lYGhA16ahyf");

        // u64::MAX + 1
        assert_eq!(
            decode("lYGhA16ahyg"),
            Err(CodecError::Overflow {
                code: "lYGhA16ahyg".to_string()
            })
        );
        assert!(matches!(
            decode("ZZZZZZZZZZZZ"),
            Err(CodecError::Overflow { .. })
        ));
    }

    #[test]
    fn test_error_message_names_code() {
        let err = decode("no!").unwrap_err();
        assert!(err.to_string().contains("no!"));
    }
}
