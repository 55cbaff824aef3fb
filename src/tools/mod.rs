/// Error kinds and the crate-wide [`Result`](error::Result) alias.
pub mod error;
