/// Bech32 data charset (BIP-173), shared by Cosmos-SDK chains.
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Structural validation of a Sei address: bech32 with the `sei` HRP.
/// Account addresses are 42 characters; contract addresses are longer, so a
/// range is accepted.
pub fn is_valid_sei_address(address: &str) -> bool {
    let Some(data) = address.strip_prefix("sei1") else {
        return false;
    };

    (38..=90).contains(&data.len()) && data.chars().all(|c| BECH32_CHARSET.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_account_address() {
        assert!(is_valid_sei_address(
            "sei1gxqsqt2kfkfl0m36u2nqyzlvy8zek4cpmsnpvy"
        ));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_sei_address(""));
        assert!(!is_valid_sei_address("sei1short"));
        // Cosmos hub prefix
        assert!(!is_valid_sei_address(
            "cosmos1gxqsqt2kfkfl0m36u2nqyzlvy8zek4cp6e2wgl"
        ));
        // 'b' and 'i' are not in the bech32 charset
        assert!(!is_valid_sei_address(
            "sei1bxqsqt2kfkfl0m36u2nqyzlvy8zek4cpmsnpvi"
        ));
    }
}
