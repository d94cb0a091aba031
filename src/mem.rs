//! An in-memory archive tree.
//!
//! The test suite builds small trees with this backend instead of
//! shipping binary container fixtures; it also shows what wiring a new
//! container backend to the [`crate::node`] traits takes. Failure
//! injection covers the accessor and close error paths.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::node::{Archive, Folder, Message};
use crate::text::RawText;

#[derive(Debug, Clone, Default)]
pub struct MemMessage {
    subject: Option<RawText>,
    body: Option<RawText>,
}

impl MemMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = Some(RawText::Text(subject.to_string()));
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(RawText::Text(body.to_string()));
        self
    }

    /// Set the subject to an arbitrary raw value, e.g. invalid bytes.
    pub fn with_subject_raw(mut self, raw: RawText) -> Self {
        self.subject = Some(raw);
        self
    }

    pub fn with_body_raw(mut self, raw: RawText) -> Self {
        self.body = Some(raw);
        self
    }
}

impl Message for MemMessage {
    fn subject(&self) -> Option<RawText> {
        self.subject.clone()
    }

    fn plain_text_body(&self) -> Option<RawText> {
        self.body.clone()
    }
}

#[derive(Debug, Clone, Default)]
struct FolderInner {
    name: Option<RawText>,
    folders: Vec<MemFolder>,
    messages: Vec<MemMessage>,
    broken_folders: Vec<usize>,
    broken_messages: Vec<usize>,
}

/// A folder handle sharing its subtree, so clones are as cheap as the
/// real backend's (which shares the underlying store).
#[derive(Debug, Clone, Default)]
pub struct MemFolder {
    inner: Rc<FolderInner>,
}

impl MemFolder {
    /// A folder with no stored name.
    pub fn unnamed() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            inner: Rc::new(FolderInner {
                name: Some(RawText::Text(name.to_string())),
                ..FolderInner::default()
            }),
        }
    }

    fn inner_mut(&mut self) -> &mut FolderInner {
        Rc::make_mut(&mut self.inner)
    }

    pub fn with_folder(mut self, folder: MemFolder) -> Self {
        self.inner_mut().folders.push(folder);
        self
    }

    pub fn with_message(mut self, message: MemMessage) -> Self {
        self.inner_mut().messages.push(message);
        self
    }

    /// Add a sub-folder slot that fails to materialize.
    pub fn with_broken_folder(mut self) -> Self {
        let inner = self.inner_mut();
        inner.broken_folders.push(inner.folders.len());
        inner.folders.push(MemFolder::unnamed());
        self
    }

    /// Add a sub-message slot that fails to materialize.
    pub fn with_broken_message(mut self) -> Self {
        let inner = self.inner_mut();
        inner.broken_messages.push(inner.messages.len());
        inner.messages.push(MemMessage::new());
        self
    }
}

impl Folder for MemFolder {
    type Message = MemMessage;

    fn name(&self) -> Option<RawText> {
        self.inner.name.clone()
    }

    fn sub_folder_count(&self) -> usize {
        self.inner.folders.len()
    }

    fn sub_message_count(&self) -> usize {
        self.inner.messages.len()
    }

    fn sub_folder(&self, index: usize) -> Result<Self> {
        if self.inner.broken_folders.contains(&index) {
            return Err(Error::Accessor(format!("sub-folder {index} is unreadable")));
        }
        self.inner
            .folders
            .get(index)
            .cloned()
            .ok_or_else(|| Error::Accessor(format!("sub-folder index {index} out of range")))
    }

    fn sub_message(&self, index: usize) -> Result<MemMessage> {
        if self.inner.broken_messages.contains(&index) {
            return Err(Error::Accessor(format!("sub-message {index} is unreadable")));
        }
        self.inner
            .messages
            .get(index)
            .cloned()
            .ok_or_else(|| Error::Accessor(format!("sub-message index {index} out of range")))
    }
}

pub struct MemArchive {
    root: MemFolder,
    close_error: Option<String>,
    close_count: Rc<Cell<usize>>,
}

impl MemArchive {
    pub fn new(root: MemFolder) -> Self {
        Self {
            root,
            close_error: None,
            close_count: Rc::new(Cell::new(0)),
        }
    }

    /// An archive whose close call fails with `reason`.
    pub fn with_failing_close(root: MemFolder, reason: &str) -> Self {
        Self {
            root,
            close_error: Some(reason.to_string()),
            close_count: Rc::new(Cell::new(0)),
        }
    }

    /// A counter observing how many times `close` ran; shared, so it
    /// stays readable after the archive is consumed.
    pub fn close_count(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.close_count)
    }
}

impl Archive for MemArchive {
    type Folder = MemFolder;

    fn root_folder(&self) -> Result<MemFolder> {
        Ok(self.root.clone())
    }

    fn close(self) -> Result<()> {
        self.close_count.set(self.close_count.get() + 1);
        match self.close_error {
            Some(reason) => Err(Error::Close(reason)),
            None => Ok(()),
        }
    }
}
