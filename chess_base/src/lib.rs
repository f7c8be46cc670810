//! # Base types for kestrel
//!
//! This is an auxiliary crate for `kestrel`, which contains the plain value types shared by
//! the board, the move generator and the game controller.
//!
//! Normally you don't want to use this crate directly. Use `kestrel` instead.

pub mod bitboard;
pub mod geometry;
pub mod types;
