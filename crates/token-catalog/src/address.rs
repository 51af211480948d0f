use tiny_keccak::{Hasher, Keccak};

use crate::error::AddressError;

/// Parse a `0x`-prefixed 20-byte address. Case is not checked here.
pub fn parse_address(address: &str) -> Result<[u8; 20], AddressError> {
    let body = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| AddressError::MissingPrefix(address.to_string()))?;

    if body.len() != 40 {
        return Err(AddressError::InvalidLength(body.len()));
    }

    let mut out = [0u8; 20];
    hex::decode_to_slice(body, &mut out)
        .map_err(|e| AddressError::InvalidHex(format!("{address}: {e}")))?;
    Ok(out)
}

/// EIP-55 mixed-case checksum encoding.
pub fn to_checksum(addr: &[u8; 20]) -> String {
    let hex_addr = hex::encode(addr);
    let mut hasher = Keccak::v256();
    hasher.update(hex_addr.as_bytes());
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, c) in hex_addr.chars().enumerate() {
        let hash_nibble = if i % 2 == 0 {
            (hash[i / 2] >> 4) & 0x0f
        } else {
            hash[i / 2] & 0x0f
        };
        if hash_nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Parse an address and, if it is mixed-case, verify its EIP-55 checksum.
///
/// All-lowercase and all-uppercase spellings carry no checksum and are accepted.
pub fn verify_checksum(address: &str) -> Result<[u8; 20], AddressError> {
    let bytes = parse_address(address)?;
    let body = &address[2..];
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && to_checksum(&bytes)[2..] != *body {
        return Err(AddressError::BadChecksum(address.to_string()));
    }
    Ok(bytes)
}

/// Canonical lookup form of an address: lower-case, `0x`-prefixed.
pub fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}
