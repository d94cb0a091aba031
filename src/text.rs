//! Conversion of raw archive text fields into canonical UTF-8 strings.
//!
//! The container layer hands back text in several shapes: strings it has
//! already decoded, bare 8-bit bytes, HTML bodies, and compressed RTF
//! bodies. [`decode`] normalizes all of them to plain text. Absence is
//! typed (`None` in, `None` out); a present field that cannot be
//! converted is a [`Error::Decode`], never a silently empty string.

use crate::error::{Error, Result};

/// A raw textual field as exposed by the container layer, before
/// normalization to canonical text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawText {
    /// Text the container layer already decoded to Unicode.
    Text(String),
    /// 8-bit text with no declared encoding; must parse as UTF-8.
    Bytes(Vec<u8>),
    /// An HTML body; reduced to plain text after UTF-8 validation.
    Html(Vec<u8>),
    /// A compressed RTF body (PR_RTF_COMPRESSED); decompressed and
    /// de-formatted.
    CompressedRtf(Vec<u8>),
}

impl RawText {
    /// Best-effort rendering for diagnostics only. Report output goes
    /// through [`decode`], which does not substitute characters.
    pub(crate) fn lossy(&self) -> String {
        match self {
            RawText::Text(s) => s.clone(),
            RawText::Bytes(b) | RawText::Html(b) | RawText::CompressedRtf(b) => {
                String::from_utf8_lossy(b).into_owned()
            }
        }
    }
}

/// Decode an optional raw field into optional canonical text.
///
/// `field` names the field in the error when a present value fails to
/// convert.
pub fn decode(field: &'static str, raw: Option<RawText>) -> Result<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let text = match raw {
        RawText::Text(s) => s,
        RawText::Bytes(bytes) => String::from_utf8(bytes)
            .map_err(|e| Error::Decode { field, reason: e.to_string() })?,
        RawText::Html(bytes) => {
            let html = String::from_utf8(bytes)
                .map_err(|e| Error::Decode { field, reason: e.to_string() })?;
            html_to_text(&html)
        }
        RawText::CompressedRtf(bytes) => {
            // The compressed-RTF container starts with a fixed 16-byte
            // header; anything shorter cannot be decompressed.
            if bytes.len() < 16 {
                return Err(Error::Decode {
                    field,
                    reason: format!("compressed RTF truncated: {} bytes", bytes.len()),
                });
            }
            let rtf = compressed_rtf::decompress_rtf(&bytes)
                .map_err(|e| Error::Decode { field, reason: format!("{e:?}") })?;
            let doc = rtf_parser::RtfDocument::try_from(rtf.as_str())
                .map_err(|e| Error::Decode { field, reason: format!("{e:?}") })?;
            doc.get_text()
        }
    };
    Ok(Some(text))
}

/// Strip tags and decode common entities from an HTML body, collapsing
/// runs of blank lines to at most one.
fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    // Inside <style>/<script> content is dropped entirely.
    let mut skipping = 0usize;
    let mut chars = html.chars();

    while let Some(c) = chars.next() {
        if c == '<' {
            let mut tag = String::new();
            for tc in chars.by_ref() {
                if tc == '>' {
                    break;
                }
                tag.push(tc);
            }
            let trimmed = tag.trim();
            let closing = trimmed.starts_with('/');
            let name = trimmed
                .trim_start_matches('/')
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();
            match name.as_str() {
                "style" | "script" => {
                    if closing {
                        skipping = skipping.saturating_sub(1);
                    } else {
                        skipping += 1;
                    }
                }
                // Block-level boundaries become line breaks.
                "br" | "br/" | "p" | "div" | "tr" | "li" | "h1" | "h2" | "h3" | "h4" | "h5"
                | "h6" => {
                    if skipping == 0 {
                        out.push('\n');
                    }
                }
                _ => {}
            }
        } else if skipping > 0 {
            continue;
        } else if c == '&' {
            let mut entity = String::new();
            for ec in chars.by_ref() {
                if ec == ';' {
                    break;
                }
                entity.push(ec);
            }
            match entity.as_str() {
                "amp" => out.push('&'),
                "lt" => out.push('<'),
                "gt" => out.push('>'),
                "quot" => out.push('"'),
                "apos" => out.push('\''),
                "nbsp" => out.push(' '),
                s if s.starts_with('#') => {
                    let n: Option<u32> = if let Some(hex) = s[1..].strip_prefix(['x', 'X']) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        s[1..].parse().ok()
                    };
                    if let Some(decoded) = n.and_then(char::from_u32) {
                        out.push(decoded);
                    }
                }
                // Unknown entity: keep it verbatim.
                _ => {
                    out.push('&');
                    out.push_str(&entity);
                    out.push(';');
                }
            }
        } else {
            out.push(c);
        }
    }

    let mut result = String::with_capacity(out.len());
    let mut blank_run = 0u32;
    for line in out.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run <= 1 {
                result.push('\n');
            }
        } else {
            blank_run = 0;
            result.push_str(trimmed);
            result.push('\n');
        }
    }
    result
}
