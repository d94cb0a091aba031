//! Lazy depth-first traversal of the folder tree.
//!
//! [`Walker`] yields entries in pre-order, left to right by child
//! index, driven by an explicit stack of frames so that pathologically
//! deep hierarchies cannot exhaust the call stack. An accessor failure
//! aborts the traversal with position context; it is never skipped.

use crate::error::{Error, NodeKind, Result};
use crate::node::Folder;

/// Which entries a traversal yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Yield every folder with its depth, recursing into each one.
    /// Depth 0 is a direct child of the root; the root itself is not
    /// yielded.
    Hierarchy,
    /// Yield every message: all direct messages of a folder first
    /// (the root's included), then each sub-folder's subtree in turn.
    Listing,
}

/// One traversal entry, consumed by the report renderer.
#[derive(Debug)]
pub enum Entry<F: Folder> {
    Folder { folder: F, depth: usize },
    Message(F::Message),
}

struct Frame<F: Folder> {
    folder: F,
    depth: usize,
    next_folder: usize,
    folder_count: usize,
    next_message: usize,
    message_count: usize,
}

impl<F: Folder> Frame<F> {
    fn new(folder: F, depth: usize) -> Self {
        // Counts are fixed at frame creation; the tree is static for
        // the duration of one traversal.
        let folder_count = folder.sub_folder_count();
        let message_count = folder.sub_message_count();
        Self {
            folder,
            depth,
            next_folder: 0,
            folder_count,
            next_message: 0,
            message_count,
        }
    }
}

/// A finite, lazy pre-order traversal. Not restartable mid-iteration;
/// build a fresh `Walker` to re-walk from the root.
pub struct Walker<F: Folder> {
    mode: WalkMode,
    stack: Vec<Frame<F>>,
    failed: bool,
}

impl<F: Folder> Walker<F> {
    pub fn new(root: F, mode: WalkMode) -> Self {
        Self {
            mode,
            stack: vec![Frame::new(root, 0)],
            failed: false,
        }
    }

    fn fail(&mut self, parent: &F, kind: NodeKind, index: usize, source: Error) -> Error {
        self.failed = true;
        let parent = parent
            .name()
            .map(|n| n.lossy())
            .unwrap_or_else(|| "(unnamed)".to_string());
        Error::Traversal {
            parent,
            kind,
            index,
            source: Box::new(source),
        }
    }
}

impl<F: Folder> Iterator for Walker<F> {
    type Item = Result<Entry<F>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let frame = self.stack.last_mut()?;

            if self.mode == WalkMode::Listing && frame.next_message < frame.message_count {
                let index = frame.next_message;
                frame.next_message += 1;
                let folder = frame.folder.clone();
                return match folder.sub_message(index) {
                    Ok(message) => Some(Ok(Entry::Message(message))),
                    Err(e) => Some(Err(self.fail(&folder, NodeKind::Message, index, e))),
                };
            }

            if frame.next_folder < frame.folder_count {
                let index = frame.next_folder;
                frame.next_folder += 1;
                let depth = frame.depth;
                let parent = frame.folder.clone();
                match parent.sub_folder(index) {
                    Ok(child) => {
                        self.stack.push(Frame::new(child.clone(), depth + 1));
                        if self.mode == WalkMode::Hierarchy {
                            return Some(Ok(Entry::Folder { folder: child, depth }));
                        }
                        // Listing mode descends without yielding folders.
                    }
                    Err(e) => {
                        return Some(Err(self.fail(&parent, NodeKind::Folder, index, e)));
                    }
                }
            } else {
                self.stack.pop();
            }
        }
    }
}
