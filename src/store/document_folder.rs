// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::model::{
    blank_document_xml, document_url, fresh_diagram_id, looks_like_document, sanitize_name,
    sanitized_file_name, title_from_name, DocumentInfo, DOCUMENT_EXT,
};

#[derive(Debug)]
pub enum StoreError {
    /// Sanitization left nothing usable of the supplied name.
    InvalidName,
    /// A document with the sanitized file name already exists.
    AlreadyExists { file_name: String },
    /// Payload failed the structural liveness check.
    InvalidContent,
    /// The underlying storage rejected the write.
    PermissionDenied { path: PathBuf },
    /// Any other I/O fault.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName => write!(f, "invalid document name"),
            Self::AlreadyExists { file_name } => {
                write!(f, "document already exists: {file_name}")
            }
            Self::InvalidContent => write!(f, "content does not look like a diagram document"),
            Self::PermissionDenied { path } => write!(f, "permission denied at {path:?}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// User-facing message for a failed create, matching what the UI shows inline.
pub fn create_failure_message(err: &StoreError) -> &'static str {
    match err {
        StoreError::InvalidName => "Invalid name",
        StoreError::AlreadyExists { .. } => "Diagram already exists",
        StoreError::PermissionDenied { .. } => "Permission denied (container write issue)",
        _ => "Create failed",
    }
}

/// User-facing message for a failed save.
pub fn save_failure_message(err: &StoreError) -> &'static str {
    match err {
        StoreError::InvalidContent => "Invalid diagram xml",
        StoreError::InvalidName => "Invalid file name",
        StoreError::PermissionDenied { .. } => "Permission denied (container write issue)",
        _ => "Save failed",
    }
}

/// The on-disk document store: a flat directory of `.drawio` files.
///
/// Cloning shares the write gate, so every clone participates in the same
/// single-writer discipline.
#[derive(Debug, Clone)]
pub struct DocumentFolder {
    root: PathBuf,
    write_gate: Arc<Mutex<()>>,
}

impl DocumentFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerates documents in the storage root, one per `.drawio` file.
    ///
    /// Order follows directory enumeration and carries no guarantee. A
    /// missing root yields an empty list, not an error; unreadable entries
    /// are skipped.
    pub fn list(&self) -> Vec<DocumentInfo> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                let name = file_name.strip_suffix(DOCUMENT_EXT)?;
                Some(DocumentInfo::new(
                    file_name.as_str(),
                    title_from_name(name),
                    document_url(&file_name),
                ))
            })
            .collect()
    }

    /// True when a document with this (sanitizable) file name exists.
    /// Malformed names are treated as "not found", never an error.
    pub fn exists(&self, file_name: &str) -> bool {
        self.resolve_path(file_name).is_some()
    }

    /// Resolves a sanitized file name to its on-disk path, or `None` when the
    /// name is invalid or the file is absent.
    pub fn resolve_path(&self, file_name: &str) -> Option<PathBuf> {
        let sanitized = sanitized_file_name(file_name)?;
        let path = self.root.join(sanitized);
        path.is_file().then_some(path)
    }

    /// Reads a document's raw content by file name.
    pub async fn read(&self, file_name: &str) -> Result<String, StoreError> {
        let sanitized = sanitized_file_name(file_name).ok_or(StoreError::InvalidName)?;
        let path = self.root.join(sanitized);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| classify_io(path, source))
    }

    /// Creates a new blank document from a raw user-supplied name.
    ///
    /// Safe to call before the storage root exists. Fails with
    /// [`StoreError::AlreadyExists`] rather than overwriting.
    pub async fn create(&self, raw_name: &str) -> Result<DocumentInfo, StoreError> {
        let name = sanitize_name(raw_name);
        if name.is_empty() {
            return Err(StoreError::InvalidName);
        }

        self.ensure_root().await?;

        let info = DocumentInfo::from_name(&name);
        let path = self.root.join(info.file_name());
        if path.is_file() {
            return Err(StoreError::AlreadyExists {
                file_name: info.file_name().to_owned(),
            });
        }

        let blank = blank_document_xml(&fresh_diagram_id());
        tokio::fs::write(&path, blank).await.map_err(|source| {
            let err = classify_io(path.clone(), source);
            error!(file = info.file_name(), error = %err, "create failed");
            err
        })?;

        info!(file = info.file_name(), "created diagram");
        Ok(info)
    }

    /// Overwrites a document with new content.
    ///
    /// At most one save across the whole store executes at a time, whichever
    /// document it targets; concurrent callers queue on the gate. The gate is
    /// released on every exit path. Returns the sanitized file name actually
    /// written.
    pub async fn save(&self, file_name: &str, xml: &str) -> Result<String, StoreError> {
        if !looks_like_document(xml) {
            return Err(StoreError::InvalidContent);
        }
        let sanitized = sanitized_file_name(file_name).ok_or(StoreError::InvalidName)?;

        self.ensure_root().await?;
        let path = self.root.join(&sanitized);

        let _guard = self.write_gate.lock().await;
        tokio::fs::write(&path, xml).await.map_err(|source| {
            let err = classify_io(path.clone(), source);
            error!(file = %sanitized, error = %err, "save failed");
            err
        })?;

        info!(file = %sanitized, "saved diagram");
        Ok(sanitized)
    }

    async fn ensure_root(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| classify_io(self.root.clone(), source))
    }

    #[cfg(test)]
    pub(crate) fn write_gate(&self) -> &Arc<Mutex<()>> {
        &self.write_gate
    }
}

fn classify_io(path: PathBuf, source: io::Error) -> StoreError {
    if source.kind() == io::ErrorKind::PermissionDenied {
        StoreError::PermissionDenied { path }
    } else {
        StoreError::Io { path, source }
    }
}
