//! Tests for the templating engine
//!
//! Full-pass scenarios organized into focused submodules; shared document
//! and data fixtures live in helpers.

use super::*;

// Test helper functions
mod helpers;

mod substitution;

mod registration;
