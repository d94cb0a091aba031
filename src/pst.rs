//! The `outlook-pst` backend: wires the PST container decoder to the
//! [`crate::node`] traits.
//!
//! All container decoding (block allocation, B-tree lookup, property
//! contexts) happens inside `outlook-pst`; this module only projects
//! its store/folder/message API onto the traversal engine's view of
//! the tree.

use std::path::Path;
use std::rc::Rc;

use outlook_pst::{
    UnicodePstFile,
    ltp::prop_context::PropertyValue,
    messaging::{folder::UnicodeFolder, message::UnicodeMessage, store::UnicodeStore},
    ndb::node_id::NodeId,
};

use crate::error::{Error, Result};
use crate::node::{Archive, Folder, Message};
use crate::text::RawText;

const PR_SUBJECT: u16 = 0x0037;
const PR_BODY: u16 = 0x1000;
const PR_HTML: u16 = 0x1013;
const PR_RTF_COMPRESSED: u16 = 0x1009;

/// An open PST file. The root folder is the IPM subtree, where mail
/// folders live.
pub struct PstArchive {
    store: Rc<UnicodeStore>,
}

impl PstArchive {
    pub fn open(path: &Path) -> Result<Self> {
        let open_error = |reason: String| Error::Open {
            path: path.to_path_buf(),
            reason,
        };
        let pst = UnicodePstFile::open(path).map_err(|e| open_error(e.to_string()))?;
        let store = UnicodeStore::read(Rc::new(pst)).map_err(|e| open_error(e.to_string()))?;
        Ok(Self { store })
    }
}

impl Archive for PstArchive {
    type Folder = PstFolder;

    fn root_folder(&self) -> Result<PstFolder> {
        let entry_id = self
            .store
            .properties()
            .ipm_sub_tree_entry_id()
            .map_err(|e| Error::Accessor(format!("IPM subtree entry id: {e}")))?;
        let folder = UnicodeFolder::read(Rc::clone(&self.store), &entry_id)
            .map_err(|e| Error::Accessor(format!("root folder: {e}")))?;
        Ok(PstFolder::read_into(Rc::clone(&self.store), &folder))
    }

    fn close(self) -> Result<()> {
        // The decoder exposes no fallible close; the file handle is
        // released when the last reference to the store drops.
        Ok(())
    }
}

/// A folder projection. Child row ids and the display name are
/// captured once at materialization, so counts and indexing stay
/// stable for the duration of one traversal.
#[derive(Clone)]
pub struct PstFolder {
    store: Rc<UnicodeStore>,
    name: Option<RawText>,
    folder_rows: Vec<u32>,
    message_rows: Vec<u32>,
}

impl PstFolder {
    fn read_into(store: Rc<UnicodeStore>, folder: &UnicodeFolder) -> Self {
        // The decoder reports a folder without a stored display name
        // as an error; that is absence, not a failure.
        let name = folder
            .properties()
            .display_name()
            .ok()
            .map(RawText::Text);
        let folder_rows = folder
            .hierarchy_table()
            .map(|table| table.rows_matrix().map(|row| u32::from(row.id())).collect())
            .unwrap_or_default();
        let message_rows = folder
            .contents_table()
            .map(|table| table.rows_matrix().map(|row| u32::from(row.id())).collect())
            .unwrap_or_default();
        Self {
            store,
            name,
            folder_rows,
            message_rows,
        }
    }

    fn row(&self, rows: &[u32], index: usize) -> Result<u32> {
        rows.get(index)
            .copied()
            .ok_or_else(|| Error::Accessor(format!("row index {index} out of range")))
    }
}

impl Folder for PstFolder {
    type Message = PstMessage;

    fn name(&self) -> Option<RawText> {
        self.name.clone()
    }

    fn sub_folder_count(&self) -> usize {
        self.folder_rows.len()
    }

    fn sub_message_count(&self) -> usize {
        self.message_rows.len()
    }

    fn sub_folder(&self, index: usize) -> Result<PstFolder> {
        let row = self.row(&self.folder_rows, index)?;
        let entry_id = self
            .store
            .properties()
            .make_entry_id(NodeId::from(row))
            .map_err(|e| Error::Accessor(e.to_string()))?;
        let folder = UnicodeFolder::read(Rc::clone(&self.store), &entry_id)
            .map_err(|e| Error::Accessor(e.to_string()))?;
        Ok(PstFolder::read_into(Rc::clone(&self.store), &folder))
    }

    fn sub_message(&self, index: usize) -> Result<PstMessage> {
        let row = self.row(&self.message_rows, index)?;
        let entry_id = self
            .store
            .properties()
            .make_entry_id(NodeId::from(row))
            .map_err(|e| Error::Accessor(e.to_string()))?;
        let message = UnicodeMessage::read(
            Rc::clone(&self.store),
            &entry_id,
            Some(&[PR_SUBJECT, PR_BODY, PR_HTML, PR_RTF_COMPRESSED]),
        )
        .map_err(|e| Error::Accessor(e.to_string()))?;

        let props = message.properties();
        let raw_string = |id: u16| -> Option<RawText> {
            props.get(id).and_then(|value| match value {
                PropertyValue::String8(s) => Some(RawText::Text(s.to_string())),
                PropertyValue::Unicode(s) => Some(RawText::Text(s.to_string())),
                _ => None,
            })
        };

        let subject = raw_string(PR_SUBJECT);
        // Body resolution order: plain text, then HTML, then
        // compressed RTF.
        let body = raw_string(PR_BODY)
            .or_else(|| {
                props.get(PR_HTML).and_then(|value| match value {
                    PropertyValue::Binary(b) => {
                        // Real HTML starts with '<' (possibly after
                        // BOM/whitespace); anything else is likely
                        // still compressed.
                        let bytes = b.buffer();
                        if String::from_utf8_lossy(bytes).trim_start().starts_with('<') {
                            Some(RawText::Html(bytes.to_vec()))
                        } else {
                            None
                        }
                    }
                    PropertyValue::String8(s) => Some(RawText::Html(s.to_string().into_bytes())),
                    PropertyValue::Unicode(s) => Some(RawText::Html(s.to_string().into_bytes())),
                    _ => None,
                })
            })
            .or_else(|| {
                props.get(PR_RTF_COMPRESSED).and_then(|value| match value {
                    PropertyValue::Binary(b) => Some(RawText::CompressedRtf(b.buffer().to_vec())),
                    _ => None,
                })
            });

        Ok(PstMessage { subject, body })
    }
}

/// A message projection; the subject and body fields are extracted
/// eagerly when the message is materialized.
#[derive(Debug, Clone)]
pub struct PstMessage {
    subject: Option<RawText>,
    body: Option<RawText>,
}

impl Message for PstMessage {
    fn subject(&self) -> Option<RawText> {
        self.subject.clone()
    }

    fn plain_text_body(&self) -> Option<RawText> {
        self.body.clone()
    }
}
