//! System utilities for embedded devices.
//!
//! This module provides the execution primitives the protocol clients are
//! built on. Everything here is `no_std`, allocation free and designed for a
//! single thread of execution that must never block.
//!
//! # Available Utilities
//!
//! - **[`scheduler`]**: Cooperative continuation stack driven by periodic polls
//!
//! # Usage
//!
//! ```rust
//! use tsfeed::system::scheduler::{Resume, Scheduler};
//!
//! #[derive(Debug, Clone, Copy)]
//! enum Step {
//!     Count,
//! }
//!
//! struct Counter(u32);
//!
//! impl Resume<Step, 4> for Counter {
//!     fn resume(&mut self, _step: Step, steps: &mut Scheduler<Step, 4>) {
//!         self.0 += 1;
//!         if self.0 == 3 {
//!             steps.pop();
//!         }
//!     }
//! }
//!
//! let mut steps = Scheduler::<Step, 4>::new();
//! let mut counter = Counter(0);
//! steps.push(Step::Count).unwrap();
//! while steps.poll(&mut counter) {}
//! assert_eq!(counter.0, 3);
//! ```

/// Cooperative continuation scheduler.
///
/// A last-in-first-out stack of resumable steps where each poll runs the top
/// step exactly once.
pub mod scheduler;
