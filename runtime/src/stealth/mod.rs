//! Stealth measures for the crawl browser.
//!
//! Pages are fingerprinted as an ordinary desktop Chrome, and the loader
//! waits and moves the pointer the way a visitor would before the snapshot.

pub mod behavior;
pub mod fingerprint;
