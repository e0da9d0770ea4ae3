// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::warn;

use crate::geometry::{normalize_manual, normalize_near_origin, NormalizeOutcome};
use crate::model::{blank_document_xml, ContentFingerprint, EditorSession, PendingLoad};
use crate::protocol::{
    decode_peer_frame, EditorCommand, EditorEvent, PeerFrame, PeerLink, PEER_ORIGIN,
};
use crate::transport::{DocumentTransport, TransportError};

/// Delay before a reported content change is persisted. Re-arming cancels
/// and replaces any outstanding timer.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(400);

/// Back-off schedule for recentering commands after the peer reports a load.
/// Large documents may need multiple layout passes before the viewport
/// settles; this is a heuristic mitigation, not a guarantee.
const LOAD_FIT_DELAYS_MS: [u64; 6] = [50, 250, 600, 1200, 2000, 3000];

/// Shorter lead-in when we pushed the content ourselves.
const PUSHED_LOAD_FIT_LEAD_MS: u64 = 100;

/// A transient user-facing notification owned by this session instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
struct PendingSave {
    xml: String,
    fingerprint: ContentFingerprint,
    deadline: Instant,
}

/// Mediates between the embedded editor peer and the document store.
///
/// The coordinator processes one inbound event at a time; handlers may await
/// transport I/O but never interleave with each other. Timers (autosave
/// debounce, fit back-off) are explicit deadlines in coordinator state,
/// surfaced through [`Coordinator::next_timer`] and fired by the driver loop
/// rather than spawned tasks, so they stay deterministic under a paused
/// clock.
pub struct Coordinator<T, P> {
    transport: T,
    peer: P,
    expected_origin: String,
    session: EditorSession,
    pending_save: Option<PendingSave>,
    fit_deadlines: Vec<Instant>,
    notices: Vec<Notice>,
}

impl<T, P> Coordinator<T, P>
where
    T: DocumentTransport,
    P: PeerLink,
{
    pub fn new(transport: T, peer: P) -> Self {
        Self {
            transport,
            peer,
            expected_origin: PEER_ORIGIN.to_owned(),
            session: EditorSession::new(),
            pending_save: None,
            fit_deadlines: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Overrides the origin the editor frame is expected to post from.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.expected_origin = origin.into();
        self
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    /// Takes the accumulated transient notifications for display.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Decodes and dispatches a raw inbound frame. Foreign origins and
    /// unparseable bodies are dropped silently.
    pub async fn handle_frame(&mut self, frame: &PeerFrame) {
        if let Some(event) = decode_peer_frame(frame, &self.expected_origin) {
            self.handle_event(event).await;
        }
    }

    pub async fn handle_event(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::Init => {
                // Re-announced readiness changes nothing.
                if self.session.editor_ready() {
                    return;
                }
                self.session.set_editor_ready(true);
                // The peer always gets a canvas, never an unconfigured frame.
                if self.session.active_file_name().is_none() {
                    self.peer.post(&EditorCommand::Load {
                        xml: blank_document_xml("blank"),
                        autosave: 1,
                        save_and_exit: 1,
                        title: None,
                    });
                }
                if let Some(pending) = self.session.take_pending_load() {
                    self.perform_load(pending.xml, Some(pending.file_name));
                }
            }
            EditorEvent::Load => {
                self.schedule_fit(None);
            }
            EditorEvent::Autosave { xml } => {
                if let Some(xml) = xml {
                    self.queue_save(xml);
                }
            }
            EditorEvent::Save { xml } => {
                self.session.set_explicit_save_in_flight(true);
                // Explicit intent does not wait for the debounce, but the
                // acknowledgment is owed only after the export round-trip
                // lands the canonical form.
                if let Some(xml) = xml {
                    self.persist_now(xml, false).await;
                }
                self.peer.post(&EditorCommand::Export {
                    format: "xml".to_owned(),
                    spin: Some("Saving diagram...".to_owned()),
                });
            }
            EditorEvent::Export { format, data } => {
                if format.as_deref() == Some("xml") {
                    if let Some(data) = data {
                        let ack = self.session.explicit_save_in_flight();
                        self.persist_now(data, ack).await;
                    }
                }
            }
            EditorEvent::Exit => {
                if self.session.explicit_save_in_flight() {
                    self.session.set_deferred_exit(true);
                } else {
                    self.return_to_welcome();
                }
            }
        }
    }

    /// Earliest deadline the driver loop must wake for, if any.
    pub fn next_timer(&self) -> Option<Instant> {
        let fit = self.fit_deadlines.iter().min().copied();
        let save = self.pending_save.as_ref().map(|pending| pending.deadline);
        match (fit, save) {
            (Some(fit), Some(save)) => Some(fit.min(save)),
            (deadline, None) | (None, deadline) => deadline,
        }
    }

    /// Fires every timer whose deadline has passed.
    pub async fn fire_due_timers(&mut self) {
        let now = Instant::now();

        let mut fits_due = 0;
        self.fit_deadlines.retain(|deadline| {
            if *deadline <= now {
                fits_due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..fits_due {
            self.peer.post(&EditorCommand::Fit);
        }

        let save_due = self
            .pending_save
            .as_ref()
            .is_some_and(|pending| pending.deadline <= now);
        if save_due {
            if let Some(pending) = self.pending_save.take() {
                self.flush_debounced_save(pending).await;
            }
        }
    }

    /// Opens a stored document: fetch, normalize, then push to the peer or
    /// queue until it is ready.
    pub async fn open_existing(&mut self, file_name: &str, url: &str) {
        self.session.open(file_name);

        let xml = match self.transport.fetch(url).await {
            Ok(xml) => xml,
            Err(err) => {
                warn!(file = file_name, error = %err, "failed to load diagram");
                return;
            }
        };
        if !xml.contains("<mxfile") {
            warn!(file = file_name, "fetched content is not a draw.io mxfile");
        }

        let xml = self.auto_normalize(xml).await;

        if self.session.editor_ready() {
            self.perform_load(xml, Some(file_name.to_owned()));
        } else {
            self.session.set_pending_load(Some(PendingLoad {
                file_name: file_name.to_owned(),
                xml,
            }));
        }
    }

    /// User-initiated creation: ask the store, then open the new document
    /// through the regular open path.
    pub async fn create_document(&mut self, name: &str) {
        if name.trim().is_empty() {
            return;
        }
        match self.transport.create(name).await {
            Ok(info) => {
                self.push_notice("Diagram created", NoticeKind::Success);
                let file_name = info.file_name().to_owned();
                let url = info.url().to_owned();
                self.open_existing(&file_name, &url).await;
            }
            Err(TransportError::Rejected { message }) => {
                self.push_notice(message, NoticeKind::Error);
            }
            Err(TransportError::Failed { .. }) => {
                self.push_notice("Error creating diagram", NoticeKind::Error);
            }
        }
    }

    /// Manual "normalize" user action with distinguished outcomes.
    pub fn normalize_positions(&mut self) {
        let Some(xml) = self.session.loaded_xml().map(ToOwned::to_owned) else {
            self.push_notice("No diagram loaded", NoticeKind::Error);
            return;
        };
        match normalize_manual(&xml) {
            NormalizeOutcome::NoGeometry => {
                self.push_notice("Nothing to normalize", NoticeKind::Info);
            }
            NormalizeOutcome::NoPositionedCells => {
                self.push_notice("No positioned cells", NoticeKind::Info);
            }
            NormalizeOutcome::NearOrigin => {
                self.push_notice("Already near origin", NoticeKind::Info);
            }
            NormalizeOutcome::Shifted { xml: shifted, .. } => {
                let title = self.session.active_file_name().map(ToOwned::to_owned);
                self.perform_load(shifted, title);
                self.push_notice("Diagram normalized", NoticeKind::Success);
            }
        }
    }

    fn perform_load(&mut self, xml: String, title: Option<String>) {
        self.session.set_last_persisted(None);
        self.session.set_loaded_xml(Some(xml.clone()));
        self.peer.post(&EditorCommand::Load {
            xml,
            autosave: 1,
            save_and_exit: 1,
            title,
        });
        self.schedule_fit(Some(PUSHED_LOAD_FIT_LEAD_MS));
    }

    fn schedule_fit(&mut self, initial_delay_ms: Option<u64>) {
        let now = Instant::now();
        let mut delays = LOAD_FIT_DELAYS_MS;
        if let Some(initial) = initial_delay_ms {
            delays[0] = initial;
        }
        for ms in delays {
            self.fit_deadlines.push(now + Duration::from_millis(ms));
        }
    }

    fn queue_save(&mut self, xml: String) {
        if self.session.active_file_name().is_none() {
            return;
        }
        let fingerprint = ContentFingerprint::of(&xml);
        if self.session.last_persisted() == Some(fingerprint) {
            return;
        }
        // Cancel-and-replace: a new change supersedes the armed timer.
        self.pending_save = Some(PendingSave {
            xml,
            fingerprint,
            deadline: Instant::now() + AUTOSAVE_DEBOUNCE,
        });
    }

    async fn flush_debounced_save(&mut self, pending: PendingSave) {
        let Some(file_name) = self.session.active_file_name().map(ToOwned::to_owned) else {
            return;
        };
        match self.transport.save(&file_name, &pending.xml).await {
            Ok(()) => self.session.set_last_persisted(Some(pending.fingerprint)),
            // Autosave is best-effort: a console diagnostic, no user-facing
            // notification, and the editor keeps its live state for a retry.
            Err(err) => warn!(file = %file_name, error = %err, "autosave failed"),
        }
    }

    /// Persists immediately, bypassing the debounce. `ack` marks an explicit
    /// save whose completion the peer is waiting on; the acknowledgment is
    /// owed even when the fingerprint makes the write itself redundant.
    async fn persist_now(&mut self, xml: String, ack: bool) {
        let fingerprint = ContentFingerprint::of(&xml);
        if self.session.last_persisted() == Some(fingerprint) {
            if ack {
                self.finish_explicit_save();
            }
            return;
        }

        let Some(file_name) = self.session.active_file_name().map(ToOwned::to_owned) else {
            return;
        };
        match self.transport.save(&file_name, &xml).await {
            Ok(()) => {
                self.session.set_last_persisted(Some(fingerprint));
                if ack {
                    self.finish_explicit_save();
                }
            }
            Err(err) => {
                if ack {
                    // The user is actively waiting for confirmation.
                    self.push_notice(err.message().to_owned(), NoticeKind::Error);
                } else {
                    warn!(file = %file_name, error = %err, "best-effort save failed");
                }
            }
        }
    }

    /// Acknowledges the peer after a successful explicit save, then performs
    /// any exit that was deferred behind it. Never called speculatively.
    fn finish_explicit_save(&mut self) {
        self.peer.post(&EditorCommand::Saved);
        self.session.set_explicit_save_in_flight(false);
        if self.session.deferred_exit() {
            self.session.set_deferred_exit(false);
            self.return_to_welcome();
        }
    }

    fn return_to_welcome(&mut self) {
        self.session.return_to_welcome();
        self.pending_save = None;
    }

    async fn auto_normalize(&mut self, xml: String) -> String {
        match normalize_near_origin(&xml) {
            NormalizeOutcome::Shifted { xml: shifted, .. } => {
                // Persist right away so future loads do not shift again.
                if self.session.active_file_name().is_some() {
                    self.persist_now(shifted.clone(), false).await;
                }
                self.push_notice("Normalized positions", NoticeKind::Success);
                shifted
            }
            _ => xml,
        }
    }

    fn push_notice(&mut self, message: impl Into<String>, kind: NoticeKind) {
        self.notices.push(Notice {
            message: message.into(),
            kind,
        });
    }
}

/// Drives a coordinator: inbound frames are processed in arrival order, and
/// the earliest armed deadline wakes the loop between frames. Exits when the
/// inbox closes.
pub async fn run_coordinator<T, P>(
    mut coordinator: Coordinator<T, P>,
    mut inbox: mpsc::UnboundedReceiver<PeerFrame>,
) where
    T: DocumentTransport,
    P: PeerLink,
{
    loop {
        let deadline = coordinator.next_timer();
        tokio::select! {
            frame = inbox.recv() => {
                match frame {
                    Some(frame) => coordinator.handle_frame(&frame).await,
                    None => break,
                }
            }
            () = async {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending().await,
                }
            } => {
                coordinator.fire_due_timers().await;
            }
        }
    }
}
