use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 helper shared by the EIP-55 checksum and the EIP-191
/// personal-sign prehash.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Validates a string to check if it's a valid Ethereum address.
///
/// This function performs the following checks:
/// 1.  Checks for the "0x" prefix.
/// 2.  Validates the length is exactly 42 characters.
/// 3.  Ensures all characters are valid hexadecimal digits.
/// 4.  Validates the EIP-55 mixed-case checksum if present. If the address
///     is all lowercase or all uppercase, it is also considered valid.
pub fn is_valid_evm_address(address: &str) -> bool {
    // Byte slicing below requires single-byte characters
    if address.len() != 42 || !address.is_ascii() {
        return false;
    }

    let prefix = &address[..2];
    if prefix != "0x" && prefix != "0X" {
        return false;
    }

    let addr_part = &address[2..];

    if !addr_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    // If the address is all lowercase or all uppercase, it's valid (no checksum)
    let is_all_lowercase = addr_part
        .chars()
        .all(|c| c.is_lowercase() || c.is_ascii_digit());
    let is_all_uppercase = addr_part
        .chars()
        .all(|c| c.is_uppercase() || c.is_ascii_digit());

    if is_all_lowercase || is_all_uppercase {
        return true;
    }

    // If it's mixed-case, the casing must match the EIP-55 checksum exactly
    addr_part == checksum_body(addr_part)
}

/// Renders an address in its canonical EIP-55 checksummed form.
///
/// Returns `None` when the input is not a valid Ethereum address.
pub fn to_checksum_address(address: &str) -> Option<String> {
    if !is_valid_evm_address(address) {
        return None;
    }

    let body = checksum_body(&address[2..]);
    Some(format!("0x{}", body))
}

/// Applies EIP-55 casing to an address body (without "0x").
fn checksum_body(address_part: &str) -> String {
    let lower = address_part.to_lowercase();
    let hash = keccak256(lower.as_bytes());

    lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if c.is_ascii_digit() {
                return c;
            }

            // Each byte of the hash covers two hex characters of the address.
            let hash_nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0F
            };

            if hash_nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}
