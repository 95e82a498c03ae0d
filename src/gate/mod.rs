//! Request Admission Module
//!
//! This module enforces the fixed request window shared by every caller of
//! one client: at most `limit` admissions per `period`.
//!
//! # Features
//!
//! - Lock-free admission accounting (single compare-and-swap per admission)
//! - Blocking admission with an absolute wait budget of twice the period
//! - Background timer resetting the window at a fixed cadence
//! - Shutdown support that fails parked callers fast
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Request Gate                        │
//! │   admitted counter ── closed flag ── reset broadcast     │
//! └──────────────────────────────────────────────────────────┘
//!        ▲                                        ▲
//!        │ admit() / try_admit()                  │ reset_window()
//!        │                                        │ every period
//!   caller tasks                           Window Timer task
//! ```

pub mod admission;
pub mod timer;

pub use admission::{Admission, RequestGate};
pub use timer::WindowTimer;
