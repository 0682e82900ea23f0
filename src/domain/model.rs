use std::fmt;

use crate::utils::error::ProvisionError;

/// 已產生、尚未或已經建立的帳號名稱
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 9 位數字密碼，只出現在報告行中
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*********)")
    }
}

/// Which per-name step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Derivation,
    AccountCreation,
    PasswordAssignment,
}

/// Result of provisioning a single name.
#[derive(Debug)]
pub enum ProvisionOutcome {
    Created {
        username: Username,
        password: Password,
    },
    Failed {
        name: String,
        username: Option<Username>,
        kind: FailureKind,
        error: ProvisionError,
    },
}

impl ProvisionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProvisionOutcome::Created { .. })
    }

    pub fn username(&self) -> Option<&Username> {
        match self {
            ProvisionOutcome::Created { username, .. } => Some(username),
            ProvisionOutcome::Failed { username, .. } => username.as_ref(),
        }
    }
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionOutcome::Created { username, password } => {
                write!(f, "User {} added with password {}", username, password)
            }
            ProvisionOutcome::Failed {
                name, kind, error, ..
            } => match kind {
                FailureKind::Derivation => {
                    write!(f, "Failed to generate username for '{}': {}", name, error)
                }
                FailureKind::AccountCreation => {
                    write!(f, "Failed to create account for '{}': {}", name, error)
                }
                FailureKind::PasswordAssignment => {
                    write!(f, "Failed to set password for '{}': {}", name, error)
                }
            },
        }
    }
}

/// What remains of an outcome once its report line is written; never carries the password.
#[derive(Debug)]
pub enum ProvisionRecord {
    Created {
        username: Username,
    },
    Failed {
        name: String,
        username: Option<Username>,
        kind: FailureKind,
        error: ProvisionError,
    },
}

impl ProvisionRecord {
    pub fn is_success(&self) -> bool {
        matches!(self, ProvisionRecord::Created { .. })
    }

    pub fn username(&self) -> Option<&Username> {
        match self {
            ProvisionRecord::Created { username } => Some(username),
            ProvisionRecord::Failed { username, .. } => username.as_ref(),
        }
    }
}

impl From<ProvisionOutcome> for ProvisionRecord {
    fn from(outcome: ProvisionOutcome) -> Self {
        match outcome {
            // 密碼在此被丟棄
            ProvisionOutcome::Created { username, .. } => ProvisionRecord::Created { username },
            ProvisionOutcome::Failed {
                name,
                username,
                kind,
                error,
            } => ProvisionRecord::Failed {
                name,
                username,
                kind,
                error,
            },
        }
    }
}
