// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for WebSage.
//!
//! Exposes one route per backend resource, each a thin pass-through to an
//! [`AnalysisBackend`](websage_core::AnalysisBackend), plus the aggregated
//! session view and an unauthenticated health probe. The gateway holds no
//! state between requests beyond what [`GatewayState`] carries.

pub mod error;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
