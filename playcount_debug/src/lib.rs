// Copyright 2026 the Playcount Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording and pretty-printing for playcount diagnostics.
//!
//! This crate provides [`TraceSink`](playcount_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: owned in-memory event log with JSON Lines
//!   export.

pub mod pretty;
pub mod recorder;
