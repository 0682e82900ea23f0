//! Collision-free username derivation.

use std::collections::HashSet;

use crate::core::normalizer::{letter_base, normalize};
use crate::domain::model::Username;
use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::validate_username;

/// 數字後綴空間 000..=999
pub const SUFFIX_SPACE: u32 = 1000;

/// Returns the first `<base><NNN>` not present in `existing` or `created`.
pub fn find_free_username(
    base: &str,
    existing: &HashSet<String>,
    created: &HashSet<String>,
) -> Result<Username> {
    (0..SUFFIX_SPACE)
        .map(|suffix| format!("{}{:03}", base, suffix))
        .find(|candidate| !existing.contains(candidate) && !created.contains(candidate))
        .map(Username::new)
        .ok_or_else(|| ProvisionError::UsernameSpaceExhausted {
            base: base.to_string(),
        })
}

/// Full derivation: normalize, build the letter base, search a suffix, then check the
/// account-name grammar.
pub fn derive_username(
    raw_name: &str,
    existing: &HashSet<String>,
    created: &HashSet<String>,
) -> Result<Username> {
    let tokens = normalize(raw_name);
    let base = letter_base(&tokens);
    tracing::debug!(raw_name, ?tokens, %base, "derived letter base");

    let username = find_free_username(&base, existing, created)?;
    validate_username(username.as_str())?;
    Ok(username)
}
