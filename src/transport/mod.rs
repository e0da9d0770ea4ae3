// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Request/response channel between the coordinator and the document store.
//!
//! The coordinator never touches files; it issues create/save/fetch calls
//! through this seam. In the embedded deployment the calls cross HTTP; in
//! tests and single-process setups [`LocalTransport`] wires them straight to
//! the store.

use std::fmt;
use std::future::Future;

use crate::model::DocumentInfo;
use crate::store::{create_failure_message, save_failure_message, DocumentFolder};

#[derive(Debug)]
pub enum TransportError {
    /// The call completed and the store refused the operation; `message` is
    /// the store's user-facing explanation.
    Rejected { message: String },
    /// The call itself did not complete.
    Failed { message: String },
}

impl TransportError {
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message } | Self::Failed { message } => message,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { message } => write!(f, "store rejected the request: {message}"),
            Self::Failed { message } => write!(f, "transport failure: {message}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// The store operations the coordinator consumes, as an at-least-once RPC
/// channel with an explicit ok/fail outcome per call.
pub trait DocumentTransport {
    fn create(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<DocumentInfo, TransportError>>;

    fn save(
        &self,
        file_name: &str,
        xml: &str,
    ) -> impl Future<Output = Result<(), TransportError>>;

    /// Retrieves a document's raw content by its public URL.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, TransportError>>;
}

/// In-process transport over a shared [`DocumentFolder`].
///
/// Produces the same user-facing failure messages the HTTP surface would, so
/// the coordinator behaves identically either way.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    folder: DocumentFolder,
}

impl LocalTransport {
    pub fn new(folder: DocumentFolder) -> Self {
        Self { folder }
    }
}

impl DocumentTransport for LocalTransport {
    async fn create(&self, name: &str) -> Result<DocumentInfo, TransportError> {
        self.folder.create(name).await.map_err(|err| TransportError::Rejected {
            message: create_failure_message(&err).to_owned(),
        })
    }

    async fn save(&self, file_name: &str, xml: &str) -> Result<(), TransportError> {
        self.folder
            .save(file_name, xml)
            .await
            .map(|_| ())
            .map_err(|err| TransportError::Rejected {
                message: save_failure_message(&err).to_owned(),
            })
    }

    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        let file_name = url.strip_prefix("/files/").unwrap_or(url);
        self.folder.read(file_name).await.map_err(|err| TransportError::Failed {
            message: err.to_string(),
        })
    }
}
