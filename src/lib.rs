// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mxdock — embedded draw.io host (session coordinator + diagram store).
//!
//! The coordinator mediates between the embedded editor frame (an opaque peer
//! exchanging JSON messages) and the on-disk diagram store exposed over HTTP.

pub mod geometry;
pub mod http;
pub mod model;
pub mod protocol;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(test)]
mod tests {
    #[test]
    fn sanity() {
        assert_eq!(2 + 2, 4);
    }
}
