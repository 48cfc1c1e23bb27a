//! Alignment session management
//!
//! This module provides the `SessionRegistry`, which owns the single current
//! alignment session:
//! - Starting a session (superseding any open one)
//! - Looking up the active session before an interview begins
//! - Closing the session (idempotent)

mod registry;
mod session;

pub use registry::SessionRegistry;
pub use session::{AlignmentSession, SessionHandle, SessionStatus};
