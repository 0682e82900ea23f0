use rand::Rng;

use crate::domain::model::Password;

/// 密碼範圍：保證 9 位數且無前導零
pub const PASSWORD_MIN: u32 = 111_111_111;
pub const PASSWORD_MAX: u32 = 999_999_999;

/// Generates a 9-digit numeric password from the thread-local RNG.
pub fn generate_password() -> Password {
    generate_password_with(&mut rand::rng())
}

pub fn generate_password_with<R: Rng>(rng: &mut R) -> Password {
    let value = rng.random_range(PASSWORD_MIN..=PASSWORD_MAX);
    Password::new(value.to_string())
}
