//! Postal code (CEP) format validation.

use regex::Regex;
use std::sync::LazyLock;

/// Exactly eight ASCII digits. `\d` is avoided on purpose: it matches any Unicode digit.
static CEP_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{8}$").unwrap());

/// Prefix of every cache key holding a looked-up address.
pub const CACHE_KEY_PREFIX: &str = "cep:";

/// Returns `true` if `input` is a CEP in its canonical `NNNNNNNN` form.
///
/// Separators (`14784-478`), surrounding whitespace and non-ASCII digits are rejected.
///
/// # Examples
///
/// ```
/// use cep_lookup::domain::cep::is_valid_cep;
///
/// assert!(is_valid_cep("14784478"));
/// assert!(!is_valid_cep("14784-478"));
/// assert!(!is_valid_cep("123"));
/// ```
pub fn is_valid_cep(input: &str) -> bool {
    CEP_REGEX.is_match(input)
}

/// Builds the cache key under which the address for `cep` is stored.
pub fn cache_key(cep: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{cep}")
}
