use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 9;

/// Generates a fresh 9-character base-36 id token.
///
/// Ids are random on every call, never derived from input — two
/// normalization passes over identical payloads produce disjoint id sets.
/// Downstream consumers must tolerate this (no content-based deduplication).
#[must_use]
pub fn random_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            char::from(ALPHABET[idx])
        })
        .collect()
}
