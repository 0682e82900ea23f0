pub mod normalizer;
pub mod password;
pub mod provisioner;
pub mod username;

pub use crate::domain::model::{
    FailureKind, Password, ProvisionOutcome, ProvisionRecord, Username,
};
pub use crate::domain::ports::{AccountDirectory, AccountTools};
pub use crate::utils::error::Result;
