// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Documents are named `.drawio` files; the session tracks the single document
//! open in the embedded editor.

pub mod document;
pub mod session;

pub use document::{
    blank_document_xml, document_url, fresh_diagram_id, looks_like_document, sanitize_name,
    sanitized_file_name, title_from_name, ContentFingerprint, DocumentInfo, DOCUMENT_EXT,
};
pub use session::{EditorSession, PendingLoad};
