//! Field limits shared by registration and update validation.
//!
//! Lengths are counted in characters (Unicode scalar values), not bytes.

pub const MAX_DESCRIPTION_LEN: usize = 512;
pub const MAX_ADDRESS_LEN: usize = 256;
pub const MAX_LOCATION_LEN: usize = 128;
pub const MAX_TAX_ID_LEN: usize = 100;

/// Default cap on the number of properties a registry accepts.
pub const DEFAULT_MAX_PROPERTIES: u64 = 10_000;

/// Default fee charged per registration.
pub const DEFAULT_REGISTRATION_FEE: u64 = 5_000;

/// Returns `true` if `value` is non-empty and at most `max` characters.
pub fn text_within(value: &str, max: usize) -> bool {
    !value.is_empty() && value.chars().count() <= max
}
