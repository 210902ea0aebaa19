//! Boothmap Application
//!
//! Command-line shell that loads a stored floor plan, drives the editor and
//! saves the result.

mod session;

pub use session::{Session, SessionError};
