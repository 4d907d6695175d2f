//! # ghcommit-sync
//!
//! The remote commit protocol: ensure branches, build blobs and a tree,
//! create a commit, advance the ref, optionally open a pull request.
//!
//! Call [`pipeline::resolve_repository`] once, then [`pipeline::run`].

pub mod branch;
pub mod commit;
pub mod error;
pub mod outputs;
pub mod pipeline;
pub mod publish;
pub mod tree;

pub use error::SyncError;
pub use outputs::CiOutputs;
pub use pipeline::{resolve_repository, run, RunContext, RunOutcome};
