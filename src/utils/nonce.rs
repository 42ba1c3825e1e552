use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of challenge nonces. ERC-4361 requires at least 8 characters;
/// 16 alphanumeric characters gives ~95 bits of entropy.
pub const NONCE_LENGTH: usize = 16;

/// Generates a random alphanumeric nonce for a signing challenge.
pub fn generate_nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Draws a random code from a caller-supplied alphabet.
pub fn random_code(alphabet: &str, size: usize) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() || size == 0 {
        return String::new();
    }

    let mut rng = rand::rng();
    (0..size)
        .map(|_| chars[rng.random_range(0..chars.len())])
        .collect()
}
