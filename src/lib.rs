pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{NssDirectory, PasswdDirectory, SystemDirectory, SystemTools};
pub use crate::config::{toml_config::ToolsConfig, CliConfig};
pub use crate::core::provisioner::{read_name_list, AccountProvisioner};
pub use crate::utils::error::{ProvisionError, Result};
