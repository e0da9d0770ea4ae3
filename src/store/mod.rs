// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for documents on disk.
//!
//! One `.drawio` file per document under a flat storage root; writes across
//! the whole store are serialized through a single async gate.

pub mod document_folder;

pub use document_folder::{
    create_failure_message, save_failure_message, DocumentFolder, StoreError,
};
