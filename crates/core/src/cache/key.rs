//! Cache key normalization.
//!
//! An address becomes its own cache key after trimming and case-folding.
//! Nothing else is canonicalized: "1 Main St" and "1 Main Street" are
//! distinct keys on purpose, since guessing at abbreviation equivalence
//! would silently change cache identity.

/// Normalize an address into its cache key: trim surrounding whitespace
/// and lowercase the whole string.
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}
