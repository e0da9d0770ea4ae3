// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed message protocol for the embedded editor peer.
//!
//! The peer is an opaque iframe reached only through JSON-encoded
//! cross-origin messages. Inbound frames from any other origin, and frames
//! whose body does not parse, are dropped without error. Both guards are
//! mandatory, not hardening.

use serde::{Deserialize, Serialize};

/// Origin the embedded editor frame is served from. Frames claiming any other
/// origin are ignored.
pub const PEER_ORIGIN: &str = "https://embed.diagrams.net";

/// A raw inbound message as delivered by the embedding page: the claimed
/// origin plus the JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerFrame {
    pub origin: String,
    pub body: String,
}

impl PeerFrame {
    pub fn new(origin: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            body: body.into(),
        }
    }
}

/// Events the editor peer emits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum EditorEvent {
    /// Peer finished initializing and can accept commands.
    Init,
    /// Peer rendered the content it was given.
    Load,
    /// Content changed inside the editor.
    Autosave { xml: Option<String> },
    /// User triggered an explicit save inside the editor.
    Save { xml: Option<String> },
    /// Peer returned its canonical serialized form.
    Export {
        format: Option<String>,
        data: Option<String>,
    },
    /// User wants to leave the document.
    Exit,
}

/// Commands sent to the editor peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum EditorCommand {
    Load {
        xml: String,
        autosave: u8,
        #[serde(rename = "saveAndExit")]
        save_and_exit: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Export {
        format: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        spin: Option<String>,
    },
    Fit,
    Saved,
}

/// Decodes a frame into a typed event.
///
/// Returns `None` for foreign origins, unparseable bodies, and event kinds
/// this coordinator does not handle (the editor emits more than we consume).
pub fn decode_peer_frame(frame: &PeerFrame, expected_origin: &str) -> Option<EditorEvent> {
    if frame.origin != expected_origin {
        return None;
    }
    serde_json::from_str(&frame.body).ok()
}

/// Outbound half of the peer channel.
///
/// Implementations serialize the command and hand it to whatever bridges to
/// the editor frame. Posting is fire-and-forget; a closed bridge is not an
/// error the coordinator can act on.
pub trait PeerLink {
    fn post(&self, command: &EditorCommand);
}

/// A [`PeerLink`] over an unbounded channel of serialized command strings.
#[derive(Debug, Clone)]
pub struct ChannelPeer {
    outbox: tokio::sync::mpsc::UnboundedSender<String>,
}

impl ChannelPeer {
    pub fn new(outbox: tokio::sync::mpsc::UnboundedSender<String>) -> Self {
        Self { outbox }
    }
}

impl PeerLink for ChannelPeer {
    fn post(&self, command: &EditorCommand) {
        if let Ok(body) = serde_json::to_string(command) {
            let _ = self.outbox.send(body);
        }
    }
}
