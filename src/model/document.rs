// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed extension for persisted documents. Title and URL derive from the
/// file name alone; there are no sidecar files.
pub const DOCUMENT_EXT: &str = ".drawio";

/// A named persisted document with its derived display title and retrieval URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    file_name: String,
    title: String,
    url: String,
}

impl DocumentInfo {
    /// Builds the descriptor for a sanitized base `name` (no extension).
    pub fn from_name(name: &str) -> Self {
        let file_name = format!("{name}{DOCUMENT_EXT}");
        Self {
            title: title_from_name(name),
            url: document_url(&file_name),
            file_name,
        }
    }

    pub fn new(
        file_name: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            title: title.into(),
            url: url.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Public retrieval path for a document file, served by the HTTP surface.
pub fn document_url(file_name: &str) -> String {
    format!("/files/{file_name}")
}

/// Normalizes a raw user-supplied name into a storage identifier.
///
/// Trim, lowercase, replace anything non-alphanumeric (besides `-`/`_`/space)
/// with `-`, collapse runs of spaces, spaces to `-`, trim leading/trailing
/// `-`/`_`, truncate to 64. Idempotent; may yield an empty string, which
/// callers must reject.
///
/// Lowercasing runs before the character filter: some case mappings expand
/// (`İ` becomes `i` plus a combining mark), and the filter must see the
/// expansion or the result would re-sanitize to a different name.
pub fn sanitize_name(raw: &str) -> String {
    let mut cleaned: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '-' || ch == '_' || ch == ' ' {
                ch
            } else {
                '-'
            }
        })
        .collect();
    while cleaned.contains("  ") {
        cleaned = cleaned.replace("  ", " ");
    }
    cleaned = cleaned.replace(' ', "-");
    let cleaned = cleaned.trim_matches(|ch| ch == '-' || ch == '_');
    cleaned.chars().take(64).collect()
}

/// Sanitizes a file name that may or may not already carry the extension.
///
/// Returns the full `name + extension` form, or `None` when sanitization
/// leaves nothing usable.
pub fn sanitized_file_name(file_name: &str) -> Option<String> {
    if file_name.trim().is_empty() {
        return None;
    }
    let split = file_name.len().checked_sub(DOCUMENT_EXT.len());
    let base = match split.and_then(|at| file_name.get(at..).map(|ext| (at, ext))) {
        Some((at, ext)) if ext.eq_ignore_ascii_case(DOCUMENT_EXT) => &file_name[..at],
        _ => file_name,
    };
    let sanitized = sanitize_name(base);
    if sanitized.is_empty() {
        return None;
    }
    Some(format!("{sanitized}{DOCUMENT_EXT}"))
}

/// Human-readable form of a sanitized name: separators to spaces, each word
/// capitalized.
pub fn title_from_name(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Structural liveness check: does the payload look like a draw.io document?
/// A substring sniff, not a parse; unusual but valid documents must pass.
pub fn looks_like_document(xml: &str) -> bool {
    xml.contains("<mxfile") && xml.contains("<diagram")
}

/// A process-unique id for a freshly created diagram page.
pub fn fresh_diagram_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{nanos:x}-{:x}", std::process::id())
}

/// A minimal valid blank document: one empty page, satisfies
/// [`looks_like_document`].
pub fn blank_document_xml(diagram_id: &str) -> String {
    format!(
        "<mxfile host=\"app.diagrams.net\" agent=\"mxdock\" version=\"24.7.0\" type=\"device\">\
<diagram id=\"{diagram_id}\" name=\"Page-1\">\
<mxGraphModel dx=\"1000\" dy=\"600\" grid=\"1\" gridSize=\"10\" guides=\"1\" tooltips=\"1\" \
connect=\"1\" arrows=\"1\" fold=\"1\" page=\"1\" pageScale=\"1\" pageWidth=\"850\" \
pageHeight=\"1100\" math=\"0\" shadow=\"0\">\
<root><mxCell id=\"0\"/><mxCell id=\"1\" parent=\"0\"/></root>\
</mxGraphModel></diagram></mxfile>"
    )
}

/// Weak content fingerprint used to skip redundant persistence: payload length
/// plus `<mxCell` occurrence count. Collisions between near-duplicate states
/// are acceptable; this deduplicates identical content and can under-detect
/// changes that keep both length and cell count stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentFingerprint {
    len: usize,
    cells: usize,
}

impl ContentFingerprint {
    pub fn of(xml: &str) -> Self {
        Self {
            len: xml.len(),
            cells: memchr::memmem::find_iter(xml.as_bytes(), b"<mxCell").count(),
        }
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.len, self.cells)
    }
}
