// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Third-party service clients.

pub mod puzzle;

pub use puzzle::{PuzzleClient, PuzzleError};
