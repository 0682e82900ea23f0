use std::collections::HashSet;

use async_trait::async_trait;

use crate::domain::model::{Password, Username};
use crate::utils::error::Result;

/// External OS tools the provisioner drives. Every call runs to completion before returning.
#[async_trait]
pub trait AccountTools: Send + Sync {
    async fn create_account(&self, username: &Username) -> Result<()>;
    async fn set_password(&self, username: &Username, password: &Password) -> Result<()>;
    /// Best-effort; failures are swallowed by the implementation.
    async fn ensure_home(&self, username: &Username);
}

/// Source of account names that already exist on the host.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn existing_usernames(&self) -> Result<HashSet<String>>;
}
