//! Short code generation and custom code normalization.
//!
//! Generated codes are drawn from a CSPRNG so that codes on the public redirect
//! endpoint cannot be predicted from earlier ones. Custom codes are normalized with
//! [`clean_code`] and then checked with [`is_valid_code`].

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Symbols used for generated codes (64 entries, so every symbol is equally likely).
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Length of codes produced by the regular allocation loop.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Length of the single fallback code issued after repeated collisions.
pub const FALLBACK_CODE_LENGTH: usize = 12;

pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 20;

/// Codes shadowed by fixed API routes (`/api/status`, `/api/health`, `/api/url`).
pub const RESERVED_CODES: &[&str] = &["status", "health", "url"];

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("static regex is valid"));

/// Generates a random short code of `length` symbols from [`ALPHABET`].
///
/// Uses the thread-local CSPRNG (`rand::rng()`), which is reseeded from the
/// operating system.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(8);
/// assert_eq!(code.len(), 8);
/// ```
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();

    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Normalizes a user-supplied custom code.
///
/// Trims surrounding whitespace, lowercases, drops every character outside
/// `[a-zA-Z0-9_-]` and truncates to [`MAX_CODE_LENGTH`] characters. The result may
/// still be too short to be valid.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(clean_code("  AbC-1 "), "abc-1");
/// assert_eq!(clean_code("my code!"), "mycode");
/// ```
pub fn clean_code(input: &str) -> String {
    let lowered = input.trim().to_lowercase();

    DISALLOWED_CHARS
        .replace_all(&lowered, "")
        .chars()
        .take(MAX_CODE_LENGTH)
        .collect()
}

/// Returns true if `code` has 4 to 20 characters, all from `[a-zA-Z0-9_-]`.
pub fn is_valid_code(code: &str) -> bool {
    (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len())
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Returns true if `code` collides with a fixed route and can never be redirected.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
