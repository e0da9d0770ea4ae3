// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::document::ContentFingerprint;

/// A document load queued while the editor peer has not finished initializing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub file_name: String,
    pub xml: String,
}

/// Per-page-instance editor session state.
///
/// Exactly one session is meaningful per embedding instance; it is not
/// persisted across reloads. The session starts in the welcome state (no
/// document open).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    active_file_name: Option<String>,
    last_persisted: Option<ContentFingerprint>,
    loaded_xml: Option<String>,
    editor_ready: bool,
    pending_load: Option<PendingLoad>,
    explicit_save_in_flight: bool,
    deferred_exit: bool,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_file_name(&self) -> Option<&str> {
        self.active_file_name.as_deref()
    }

    /// Marks a document as the active one. The persistence fingerprint resets
    /// when the content is actually pushed to the peer, not here.
    pub fn open(&mut self, file_name: impl Into<String>) {
        self.active_file_name = Some(file_name.into());
    }

    pub fn last_persisted(&self) -> Option<ContentFingerprint> {
        self.last_persisted
    }

    pub fn set_last_persisted(&mut self, fingerprint: Option<ContentFingerprint>) {
        self.last_persisted = fingerprint;
    }

    /// The content most recently pushed to the peer, kept for the manual
    /// normalize action.
    pub fn loaded_xml(&self) -> Option<&str> {
        self.loaded_xml.as_deref()
    }

    pub fn set_loaded_xml(&mut self, xml: Option<String>) {
        self.loaded_xml = xml;
    }

    pub fn editor_ready(&self) -> bool {
        self.editor_ready
    }

    pub fn set_editor_ready(&mut self, ready: bool) {
        self.editor_ready = ready;
    }

    pub fn pending_load(&self) -> Option<&PendingLoad> {
        self.pending_load.as_ref()
    }

    pub fn set_pending_load(&mut self, pending: Option<PendingLoad>) {
        self.pending_load = pending;
    }

    pub fn take_pending_load(&mut self) -> Option<PendingLoad> {
        self.pending_load.take()
    }

    pub fn explicit_save_in_flight(&self) -> bool {
        self.explicit_save_in_flight
    }

    pub fn set_explicit_save_in_flight(&mut self, in_flight: bool) {
        self.explicit_save_in_flight = in_flight;
    }

    pub fn deferred_exit(&self) -> bool {
        self.deferred_exit
    }

    pub fn set_deferred_exit(&mut self, deferred: bool) {
        self.deferred_exit = deferred;
    }

    /// Clears document state back to the welcome screen. Editor readiness is
    /// a property of the peer frame and survives.
    pub fn return_to_welcome(&mut self) {
        self.active_file_name = None;
        self.last_persisted = None;
        self.loaded_xml = None;
        self.pending_load = None;
    }
}
