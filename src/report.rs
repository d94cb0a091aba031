//! Rendering of traversal entries into report lines.
//!
//! Both renderers stream: each entry is written as soon as it arrives,
//! in input order, to any [`io::Write`] sink. Missing fields render as
//! nothing (never a placeholder); a present field that fails to decode
//! propagates the decode error.

use std::io::Write;

use crate::error::Result;
use crate::node::{Folder, Message};
use crate::text::decode;
use crate::walk::Entry;

/// One level of indentation in the folder tree.
const INDENT: &str = "  ";

/// Write the folder hierarchy as an indented tree, one folder per
/// line. A folder without a name gets the bare indent prefix.
pub fn write_folder_tree<F, W>(
    entries: impl Iterator<Item = Result<Entry<F>>>,
    out: &mut W,
) -> Result<()>
where
    F: Folder,
    W: Write,
{
    for entry in entries {
        if let Entry::Folder { folder, depth } = entry? {
            for _ in 0..depth {
                out.write_all(INDENT.as_bytes())?;
            }
            if let Some(name) = decode("folder name", folder.name())? {
                out.write_all(name.as_bytes())?;
            }
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Write every message as a subject line (when present), a blank
/// separator, the body as-is (when present), and a blank separator.
pub fn write_message_listing<F, W>(
    entries: impl Iterator<Item = Result<Entry<F>>>,
    out: &mut W,
) -> Result<()>
where
    F: Folder,
    W: Write,
{
    for entry in entries {
        if let Entry::Message(message) = entry? {
            if let Some(subject) = decode("message subject", message.subject())? {
                writeln!(out, "Subject: {subject}")?;
            }
            writeln!(out)?;
            if let Some(body) = decode("message body", message.plain_text_body())? {
                writeln!(out, "{body}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mem::{MemFolder, MemMessage};
    use crate::text::RawText;
    use crate::walk::{WalkMode, Walker};

    fn render_tree(root: MemFolder) -> String {
        let mut out = Vec::new();
        write_folder_tree(Walker::new(root, WalkMode::Hierarchy), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn render_listing(root: MemFolder) -> Result<String> {
        let mut out = Vec::new();
        write_message_listing(Walker::new(root, WalkMode::Listing), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn hierarchy_scenario() {
        let root = MemFolder::unnamed()
            .with_folder(MemFolder::named("Inbox").with_folder(MemFolder::named("2024")))
            .with_folder(MemFolder::named("Sent"));
        assert_eq!(render_tree(root), "Inbox\n  2024\nSent\n");
    }

    #[test]
    fn unnamed_folder_renders_bare_indent() {
        let root = MemFolder::unnamed()
            .with_folder(MemFolder::named("Inbox").with_folder(MemFolder::unnamed()));
        assert_eq!(render_tree(root), "Inbox\n  \n");
    }

    #[test]
    fn listing_scenario() {
        let root = MemFolder::unnamed().with_folder(
            MemFolder::named("Inbox")
                .with_message(MemMessage::new().with_subject("Hello").with_body("World")),
        );
        assert_eq!(render_listing(root).unwrap(), "Subject: Hello\n\nWorld\n\n");
    }

    #[test]
    fn absent_subject_emits_no_subject_line() {
        let root = MemFolder::unnamed().with_message(MemMessage::new().with_body("body only"));
        assert_eq!(render_listing(root).unwrap(), "\nbody only\n\n");
    }

    #[test]
    fn absent_body_keeps_separators() {
        let root = MemFolder::unnamed().with_message(MemMessage::new().with_subject("s"));
        assert_eq!(render_listing(root).unwrap(), "Subject: s\n\n\n");
    }

    #[test]
    fn body_with_embedded_line_breaks_is_rendered_as_is() {
        let root = MemFolder::unnamed()
            .with_message(MemMessage::new().with_subject("s").with_body("line one\nline two"));
        assert_eq!(
            render_listing(root).unwrap(),
            "Subject: s\n\nline one\nline two\n\n"
        );
    }

    #[test]
    fn undecodable_present_field_propagates_decode_error() {
        let root = MemFolder::unnamed().with_message(
            MemMessage::new()
                .with_subject("fine")
                .with_body_raw(RawText::Bytes(vec![0xff, 0x00])),
        );
        let err = render_listing(root).unwrap_err();
        assert!(matches!(err, Error::Decode { field: "message body", .. }));
    }

    #[test]
    fn undecodable_subject_propagates_decode_error() {
        let root = MemFolder::unnamed().with_message(
            MemMessage::new()
                .with_subject_raw(RawText::Bytes(vec![0xfe, 0xff]))
                .with_body("fine"),
        );
        let err = render_listing(root).unwrap_err();
        assert!(matches!(err, Error::Decode { field: "message subject", .. }));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let root = MemFolder::unnamed()
            .with_folder(
                MemFolder::named("Inbox")
                    .with_message(MemMessage::new().with_subject("a").with_body("b"))
                    .with_folder(MemFolder::named("2024")),
            )
            .with_folder(MemFolder::named("Sent"));
        assert_eq!(render_tree(root.clone()), render_tree(root.clone()));
        assert_eq!(
            render_listing(root.clone()).unwrap(),
            render_listing(root).unwrap()
        );
    }
}
