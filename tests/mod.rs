//! Test suite for EstateHub
//!
//! Drives the full router in-process over the in-memory store.

pub mod common;
pub mod integration;
