//! Core use-case services.
//!
//! # Responsibility
//! - Coordinate grant book, assumptions, projection and persistence into
//!   run-to-completion mutation entry points.

pub mod planner;
