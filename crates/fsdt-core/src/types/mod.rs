//! Core delegation token types.
//!
//! These types enforce their invariants at construction time, so an absent
//! token kind or a host-less filesystem URI cannot reach the token manager.

mod fs_uri;
mod token_kind;

pub use fs_uri::{FsUri, HDFS_SCHEME, SWEBHDFS_SCHEME, WEBHDFS_SCHEME};
pub use token_kind::TokenKind;
