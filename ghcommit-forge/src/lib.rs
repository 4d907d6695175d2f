//! # ghcommit-forge
//!
//! Object Store Client: typed operations over a forge's git data API.
//!
//! [`ObjectStore`] is the seam the protocol is written against.
//! [`GitHubClient`] talks to the GitHub REST API; [`MemoryStore`] is an
//! in-process stand-in that records every call.

pub mod error;
pub mod github;
pub mod memory;
pub mod store;
pub mod wire;

pub use error::{ForgeError, Operation};
pub use github::GitHubClient;
pub use memory::{Call, MemoryStore};
pub use store::ObjectStore;
pub use wire::{CommitInfo, Label, NewBlob, NewPullRequest, RepositoryInfo};
