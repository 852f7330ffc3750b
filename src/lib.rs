//! # ProdQuiz Session Library
//!
//! This library provides the core session logic for a real-time product
//! knowledge quiz. A host creates a room, players join it by code, and the
//! host steers everyone through a shared list of multiple-choice questions
//! drawn from a product question bank. The library handles room lifecycle,
//! question selection and shuffling, answer scoring, leaderboards, and the
//! timed answer reveal; delivering events to clients and firing scheduled
//! alarms is left to the embedding transport.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::doc_markdown)]

pub mod bank;
pub mod code;
pub mod constants;
pub mod engine;
pub mod gateway;
mod names;
pub mod registry;
pub mod room;
pub mod session;
