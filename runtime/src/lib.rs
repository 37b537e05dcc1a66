//! Nyarlathotep: load a single web page in Chromium and extract a
//! fixed-schema vector of DOM, text and heuristic features.
//!
//! The feature engine in [`features`] is pure and browser-independent; the
//! [`renderer`], [`loader`] and [`stealth`] modules handle the browser side,
//! and [`report`] assembles the JSON record printed by the binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod features;
pub mod ledger;
pub mod loader;
pub mod pipeline;
pub mod renderer;
pub mod report;
pub mod stealth;
