pub mod config;
pub mod conventional;
pub mod error;
pub mod event;
pub mod forge;
pub mod git;
pub mod hooks;
pub mod outputs;
pub mod release;
pub mod tags;
pub mod version;
pub mod workflow;

pub use error::{ReleaseError, Result};
