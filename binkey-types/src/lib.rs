//! # binkey types
//!
//! Fundamental type definitions shared by the binkey link.
//!
//! ## Modules
//!
//! - [`keycode`] - HID keyboard usage codes and the US ascii table
//! - [`modifier`] - Modifier bits as they appear in a HID keyboard report
//! - [`protocol`] - The protocol byte map: which byte ranges mean what on the wire

#![no_std]

pub mod keycode;
pub mod modifier;
pub mod protocol;
