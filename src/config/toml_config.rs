use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::error::{ProvisionError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// External tools and paths used on the host. Every key is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ToolsConfig {
    pub useradd: String,
    pub chpasswd: String,
    pub mkhomedir_helper: String,
    pub getent: String,
    pub home_base: String,
    /// 指定後改讀此 passwd 檔，不再經由 NSS (`getent passwd`) 查詢
    pub passwd_file: Option<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            useradd: "useradd".to_string(),
            chpasswd: "chpasswd".to_string(),
            mkhomedir_helper: "mkhomedir_helper".to_string(),
            getent: "getent".to_string(),
            home_base: "/home".to_string(),
            passwd_file: None,
        }
    }
}

impl ToolsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ProvisionError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ProvisionError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME_BASE})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl Validate for ToolsConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("useradd", &self.useradd)?;
        validate_non_empty_string("chpasswd", &self.chpasswd)?;
        validate_non_empty_string("mkhomedir_helper", &self.mkhomedir_helper)?;
        validate_non_empty_string("getent", &self.getent)?;
        validate_path("home_base", &self.home_base)?;
        if let Some(passwd_file) = &self.passwd_file {
            validate_path("passwd_file", passwd_file)?;
        }
        Ok(())
    }
}
