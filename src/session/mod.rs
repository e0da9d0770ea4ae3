// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The session coordinator.
//!
//! A single-threaded cooperative state machine that reacts to editor peer
//! events, debounces autosave, and drives persistence through the transport
//! seam.

pub mod coordinator;

pub use coordinator::{
    run_coordinator, Coordinator, Notice, NoticeKind, AUTOSAVE_DEBOUNCE,
};
