use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::toml_config::ToolsConfig;
use crate::domain::model::{Password, Username};
use crate::domain::ports::{AccountDirectory, AccountTools};
use crate::utils::error::{ProvisionError, Result};

/// Drives `useradd`, `chpasswd` and `mkhomedir_helper` (or configured replacements).
#[derive(Debug, Clone)]
pub struct SystemTools {
    useradd: String,
    chpasswd: String,
    mkhomedir_helper: String,
    home_base: PathBuf,
}

impl SystemTools {
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            useradd: config.useradd.clone(),
            chpasswd: config.chpasswd.clone(),
            mkhomedir_helper: config.mkhomedir_helper.clone(),
            home_base: PathBuf::from(&config.home_base),
        }
    }

    async fn write_credentials(
        &self,
        username: &Username,
        password: &Password,
    ) -> std::io::Result<std::process::ExitStatus> {
        let mut child = Command::new(&self.chpasswd).stdin(Stdio::piped()).spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let line = format!("{}:{}\n", username, password);
            stdin.write_all(line.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        child.wait().await
    }
}

#[async_trait]
impl AccountTools for SystemTools {
    async fn create_account(&self, username: &Username) -> Result<()> {
        tracing::debug!("Running {} {}", self.useradd, username);

        let status = Command::new(&self.useradd)
            .arg(username.as_str())
            .status()
            .await
            .map_err(|e| ProvisionError::AccountCreation {
                username: username.to_string(),
                reason: format!("could not run {}: {}", self.useradd, e),
            })?;

        if !status.success() {
            return Err(ProvisionError::AccountCreation {
                username: username.to_string(),
                reason: format!("{} exited with {}", self.useradd, status),
            });
        }
        Ok(())
    }

    async fn set_password(&self, username: &Username, password: &Password) -> Result<()> {
        tracing::debug!("Running {} for {}", self.chpasswd, username);

        let status = self
            .write_credentials(username, password)
            .await
            .map_err(|e| ProvisionError::PasswordAssignment {
                username: username.to_string(),
                reason: format!("could not run {}: {}", self.chpasswd, e),
            })?;

        if !status.success() {
            return Err(ProvisionError::PasswordAssignment {
                username: username.to_string(),
                reason: format!("{} exited with {}", self.chpasswd, status),
            });
        }
        Ok(())
    }

    async fn ensure_home(&self, username: &Username) {
        let home = self.home_base.join(username.as_str());
        if tokio::fs::try_exists(&home).await.unwrap_or(false) {
            return;
        }

        match Command::new(&self.mkhomedir_helper)
            .arg(username.as_str())
            .status()
            .await
        {
            // helper 的結束碼不影響結果
            Ok(status) => {
                tracing::debug!("{} finished with {}", self.mkhomedir_helper, status);
                return;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "{} not found, creating {} directly",
                    self.mkhomedir_helper,
                    home.display()
                );
            }
            Err(e) => {
                tracing::debug!("{} could not run: {}", self.mkhomedir_helper, e);
                return;
            }
        }

        if let Err(e) = tokio::fs::create_dir_all(&home).await {
            tracing::debug!("Skipping home directory {}: {}", home.display(), e);
        }
    }
}

/// Reads account names from a passwd-format file (`name:x:uid:gid:...`).
#[derive(Debug, Clone)]
pub struct PasswdDirectory {
    path: PathBuf,
}

impl PasswdDirectory {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

pub fn parse_passwd(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split(':').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl AccountDirectory for PasswdDirectory {
    async fn existing_usernames(&self) -> Result<HashSet<String>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ProvisionError::AccountDirectory {
                source_path: self.path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(parse_passwd(&content))
    }
}

/// Enumerates accounts through NSS with `getent passwd`, so LDAP/SSSD users are seen too.
#[derive(Debug, Clone)]
pub struct NssDirectory {
    getent: String,
}

impl NssDirectory {
    pub fn new<S: Into<String>>(getent: S) -> Self {
        Self {
            getent: getent.into(),
        }
    }

    fn source(&self) -> String {
        format!("{} passwd", self.getent)
    }
}

#[async_trait]
impl AccountDirectory for NssDirectory {
    async fn existing_usernames(&self) -> Result<HashSet<String>> {
        let output = Command::new(&self.getent)
            .arg("passwd")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ProvisionError::AccountDirectory {
                source_path: self.source(),
                reason: format!("could not run {}: {}", self.getent, e),
            })?;

        if !output.status.success() {
            return Err(ProvisionError::AccountDirectory {
                source_path: self.source(),
                reason: format!("{} exited with {}", self.getent, output.status),
            });
        }

        let names = parse_passwd(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!("{} returned {} accounts", self.source(), names.len());
        Ok(names)
    }
}

/// 依配置選擇帳號來源：預設 NSS，指定 `passwd_file` 時改讀檔案
#[derive(Debug, Clone)]
pub enum SystemDirectory {
    Nss(NssDirectory),
    File(PasswdDirectory),
}

impl SystemDirectory {
    pub fn from_config(config: &ToolsConfig) -> Self {
        match &config.passwd_file {
            Some(path) => SystemDirectory::File(PasswdDirectory::new(path)),
            None => SystemDirectory::Nss(NssDirectory::new(config.getent.clone())),
        }
    }
}

#[async_trait]
impl AccountDirectory for SystemDirectory {
    async fn existing_usernames(&self) -> Result<HashSet<String>> {
        match self {
            SystemDirectory::Nss(directory) => directory.existing_usernames().await,
            SystemDirectory::File(directory) => directory.existing_usernames().await,
        }
    }
}
