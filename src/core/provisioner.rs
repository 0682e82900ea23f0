use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use crate::core::password::generate_password;
use crate::core::username::derive_username;
use crate::domain::model::{FailureKind, ProvisionOutcome, ProvisionRecord, Username};
use crate::domain::ports::{AccountDirectory, AccountTools};
use crate::utils::error::Result;

/// Provisions accounts one name at a time. Owns the registry of usernames created in this run.
pub struct AccountProvisioner<T: AccountTools, D: AccountDirectory> {
    tools: T,
    directory: D,
    created_usernames: HashSet<String>,
}

impl<T: AccountTools, D: AccountDirectory> AccountProvisioner<T, D> {
    pub fn new(tools: T, directory: D) -> Self {
        Self {
            tools,
            directory,
            created_usernames: HashSet::new(),
        }
    }

    pub fn created_usernames(&self) -> &HashSet<String> {
        &self.created_usernames
    }

    /// 依據現有系統帳號與本次已建立帳號推導名稱
    pub async fn derive_username(&self, raw_name: &str) -> Result<Username> {
        let existing = self.directory.existing_usernames().await?;
        derive_username(raw_name, &existing, &self.created_usernames)
    }

    /// Runs derive, create, set-password and ensure-home for one name.
    /// Failures stop at the step that failed and never escape as `Err`.
    pub async fn provision_name(&mut self, raw_name: &str) -> ProvisionOutcome {
        let username = match self.derive_username(raw_name).await {
            Ok(username) => username,
            Err(error) => {
                tracing::warn!(raw_name, category = ?error.category(), "❌ {}", error);
                return ProvisionOutcome::Failed {
                    name: raw_name.to_string(),
                    username: None,
                    kind: FailureKind::Derivation,
                    error,
                };
            }
        };

        if let Err(error) = self.tools.create_account(&username).await {
            tracing::warn!(%username, category = ?error.category(), "❌ {}", error);
            return ProvisionOutcome::Failed {
                name: raw_name.to_string(),
                username: Some(username),
                kind: FailureKind::AccountCreation,
                error,
            };
        }

        self.created_usernames.insert(username.as_str().to_string());
        let password = generate_password();

        // 帳號已存在但密碼未設定，不回滾
        if let Err(error) = self.tools.set_password(&username, &password).await {
            tracing::warn!(%username, category = ?error.category(), "❌ {}", error);
            return ProvisionOutcome::Failed {
                name: raw_name.to_string(),
                username: Some(username),
                kind: FailureKind::PasswordAssignment,
                error,
            };
        }

        self.tools.ensure_home(&username).await;

        tracing::info!(%username, "✅ account provisioned");
        ProvisionOutcome::Created { username, password }
    }

    /// Processes names in order, skipping blank lines, and writes one report line per name
    /// to `out`.
    /// Passwords appear only in those lines; the returned records do not hold them.
    pub async fn provision_from_names<I, S, W>(
        &mut self,
        names: I,
        out: &mut W,
    ) -> Result<Vec<ProvisionRecord>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        W: Write,
    {
        let mut records = Vec::new();

        for line in names {
            let name = line.as_ref().trim();
            if name.is_empty() {
                continue;
            }

            let outcome = self.provision_name(name).await;
            writeln!(out, "{}", outcome)?;
            out.flush()?;
            records.push(ProvisionRecord::from(outcome));
        }

        tracing::debug!(
            processed = records.len(),
            created = records.iter().filter(|r| r.is_success()).count(),
            "batch finished"
        );
        Ok(records)
    }
}

/// 讀取名單檔案 (UTF-8，一行一個名字)
pub async fn read_name_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(content.lines().map(str::to_string).collect())
}
