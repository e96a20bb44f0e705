//! Base36 <-> hex transform used by the name resolver's step 2 (spec.md
//! §4.3). The alphabet is the lower-case digits-then-letters alphabet used
//! by subdomain labels: `0123456789abcdefghijklmnopqrstuvwxyz`.

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Decodes a lower-case base36 label into a hex-encoded, `0x`-prefixed
/// 32-byte object id. Returns `None` if the label contains characters
/// outside the base36 alphabet, or if the decoded value doesn't fit in 32
/// bytes.
pub fn base36_to_hex(label: &str) -> Option<String> {
    if label.is_empty() {
        return None;
    }
    let mut value = vec![0u8; 32];
    for ch in label.bytes() {
        let digit = ALPHABET.iter().position(|&c| c == ch)? as u32;
        // value = value * 36 + digit, big-endian byte array arithmetic.
        let mut carry = digit;
        for byte in value.iter_mut().rev() {
            let acc = (*byte as u32) * 36 + carry;
            *byte = (acc & 0xff) as u8;
            carry = acc >> 8;
        }
        if carry != 0 {
            return None; // overflowed 32 bytes
        }
    }
    Some(format!("0x{}", hex::encode(value)))
}

/// Inverse of [`base36_to_hex`]: encodes a `0x`-prefixed 32-byte hex id back
/// into its lower-case base36 form, with no leading-zero padding beyond
/// what's needed to represent zero itself.
pub fn hex_to_base36(hex_id: &str) -> Option<String> {
    let hex_part = hex_id.strip_prefix("0x").unwrap_or(hex_id);
    let mut bytes = hex::decode(hex_part).ok()?;
    if bytes.iter().all(|&b| b == 0) {
        return Some("0".to_string());
    }

    let mut digits = Vec::new();
    while bytes.iter().any(|&b| b != 0) {
        let mut remainder = 0u32;
        for byte in bytes.iter_mut() {
            let acc = remainder * 256 + *byte as u32;
            *byte = (acc / 36) as u8;
            remainder = acc % 36;
        }
        digits.push(ALPHABET[remainder as usize]);
    }
    digits.reverse();
    Some(String::from_utf8(digits).unwrap())
}
