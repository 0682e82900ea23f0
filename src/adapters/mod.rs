// Adapters layer: concrete implementations of the domain ports for a real host.

pub mod system;

pub use system::{NssDirectory, PasswdDirectory, SystemDirectory, SystemTools};
