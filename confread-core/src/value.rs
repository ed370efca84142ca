//! Numeric interpretation of value strings.
//!
//! Values are stored as raw text. These helpers read a value as a strictly
//! positive unsigned integer in decimal, `0x` hexadecimal, or leading-zero
//! octal, and reject anything malformed, zero, negative, or out of range.

/// Parse `text` as a positive integer that fits in `T`.
///
/// The whole string must be a number; trailing garbage is rejected.
///
/// ```
/// use confread_core::value::parse_unsigned;
///
/// assert_eq!(parse_unsigned::<u32>("9600"), Some(9600));
/// assert_eq!(parse_unsigned::<u32>("0x1F"), Some(31));
/// assert_eq!(parse_unsigned::<u8>("256"), None);
/// assert_eq!(parse_unsigned::<u32>("0"), None);
/// ```
pub fn parse_unsigned<T>(text: &str) -> Option<T>
where
    T: TryFrom<u64>,
{
    let bytes = text.as_bytes();
    let rest = match bytes.first() {
        Some(b'+') => &bytes[1..],
        Some(b'-') | None => return None,
        Some(_) => bytes,
    };

    let value = match rest {
        [b'0', b'x' | b'X', digits @ ..] => parse_radix(digits, 16)?,
        [b'0', digits @ ..] if !digits.is_empty() => parse_radix(digits, 8)?,
        digits => parse_radix(digits, 10)?,
    };

    if value == 0 {
        return None;
    }
    T::try_from(value).ok()
}

fn parse_radix(bytes: &[u8], radix: u32) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }

    let mut result: u64 = 0;
    for &b in bytes {
        let digit = char::from(b).to_digit(radix)?;
        result = result
            .checked_mul(u64::from(radix))?
            .checked_add(u64::from(digit))?;
    }
    Some(result)
}
