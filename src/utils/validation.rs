use crate::utils::error::{ProvisionError, Result};

/// 帳號名稱最大長度 (useradd 預設限制)
pub const MAX_USERNAME_LEN: usize = 32;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ProvisionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ProvisionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProvisionError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 檢查帳號名稱是否符合 `^[a-z_][a-z0-9_-]{0,31}$`
pub fn validate_username(username: &str) -> Result<()> {
    let invalid = |reason: &str| ProvisionError::InvalidUsername {
        username: username.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = username.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("username cannot be empty"));
    };
    if username.len() > MAX_USERNAME_LEN {
        return Err(invalid("username longer than 32 characters"));
    }
    if !(first.is_ascii_lowercase() || first == '_') {
        return Err(invalid("must start with a lowercase letter or underscore"));
    }
    if !chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-') {
        return Err(invalid(
            "only lowercase letters, digits, underscore and hyphen are allowed",
        ));
    }
    Ok(())
}
