//! The tree-shaped read-only API the traversal engine consumes.
//!
//! The binary container decoding lives behind these traits: the
//! [`crate::pst`] module wires them to the `outlook-pst` decoder and
//! [`crate::mem`] provides an in-memory tree for tests. The engine
//! itself never touches container bytes.

use crate::error::Result;
use crate::text::RawText;

/// An open handle over one container file.
///
/// The handle is exclusively owned by one session; [`Archive::close`]
/// consumes it, so no node access can outlive the open scope through
/// the handle itself. Run traversals via
/// [`crate::session::with_archive`], which guarantees the close call
/// on every exit path.
pub trait Archive {
    type Folder: Folder;

    /// The root folder of the tree.
    fn root_folder(&self) -> Result<Self::Folder>;

    /// Release the handle. Fallible: a failed release is reported,
    /// never swallowed.
    fn close(self) -> Result<()>;
}

/// A tree node holding ordered child folders and child messages.
///
/// Children are addressed by stable 0-based index for the duration of
/// one traversal; indices are not guaranteed stable across reopens.
/// Handles are cheap to clone (they share the underlying store).
pub trait Folder: Clone {
    type Message: Message;

    /// The folder's display name, if one is stored.
    fn name(&self) -> Option<RawText>;

    fn sub_folder_count(&self) -> usize;

    fn sub_message_count(&self) -> usize;

    /// Materialize the sub-folder at `index`. Fails with
    /// [`crate::error::Error::Accessor`] when the child cannot be
    /// read from the container.
    fn sub_folder(&self, index: usize) -> Result<Self>;

    /// Materialize the sub-message at `index`.
    fn sub_message(&self, index: usize) -> Result<Self::Message>;
}

/// A leaf record holding subject and body fields.
pub trait Message {
    /// The message subject, if one is stored.
    fn subject(&self) -> Option<RawText>;

    /// The plain-text body, if one can be resolved.
    fn plain_text_body(&self) -> Option<RawText>;
}
