/// Compare two secrets in constant time
///
/// Used for the administrator credential check so the comparison does not
/// leak how many leading characters matched.
pub fn verify_secret(provided: &str, expected: &str) -> bool {
    provided.as_bytes().len() == expected.as_bytes().len()
        && provided
            .as_bytes()
            .iter()
            .zip(expected.as_bytes().iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Opaque 128-bit session token, hex encoded
pub fn generate_token() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
