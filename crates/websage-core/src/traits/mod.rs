// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the gateway layers.
//!
//! The aggregator and conversation controller talk to the backend only through
//! [`AnalysisBackend`], so tests can substitute a scripted implementation.

pub mod backend;

pub use backend::AnalysisBackend;
