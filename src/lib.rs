//! Traversal and reporting over the folder/message tree of a PST
//! ("Personal Folders") container.
//!
//! Container decoding is delegated to the `outlook-pst` crate behind
//! the [`node`] traits; this crate owns the depth-first [`walk`]er,
//! the [`report`] renderers, the [`text`] decoder, and the
//! open → traverse → close [`session`] lifecycle.

pub mod error;
pub mod mem;
pub mod node;
pub mod pst;
pub mod report;
pub mod session;
pub mod text;
pub mod walk;

pub use error::{Error, NodeKind, Result};
pub use node::{Archive, Folder, Message};
pub use text::RawText;
pub use walk::{Entry, WalkMode, Walker};
