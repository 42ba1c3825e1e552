/// Bech32 data charset (BIP-173).
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Base58 charset (no 0, O, I, l).
const BASE58_CHARSET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Structural validation of a Bitcoin address.
///
/// Accepts legacy base58 P2PKH ("1...") and P2SH ("3...") addresses as well
/// as bech32 segwit addresses ("bc1..."). Checksum verification is left to
/// the wallet that produced the address.
pub fn is_valid_btc_address(address: &str) -> bool {
    if let Some(data) = address
        .strip_prefix("bc1")
        .or_else(|| address.strip_prefix("BC1"))
    {
        // Segwit: total length 14..=74, data part in the bech32 charset
        return (14..=74).contains(&address.len())
            && !data.is_empty()
            && data
                .chars()
                .all(|c| BECH32_CHARSET.contains(c.to_ascii_lowercase()));
    }

    if address.starts_with('1') || address.starts_with('3') {
        return (26..=35).contains(&address.len())
            && address.chars().all(|c| BASE58_CHARSET.contains(c));
    }

    false
}
