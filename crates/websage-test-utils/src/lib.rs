// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for WebSage integration tests.
//!
//! Provides a scripted backend and canned payloads for fast, deterministic
//! tests without a running analysis service.
//!
//! # Components
//!
//! - [`MockBackend`] - Scripted [`AnalysisBackend`](websage_core::AnalysisBackend) with call capture
//! - [`fixtures`] - Representative backend payloads

pub mod fixtures;
pub mod mock_backend;

pub use mock_backend::{MockBackend, RecordedCall};
