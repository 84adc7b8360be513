//! Backend services used by the portal routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the logon decision and the session table so route
//! handlers can stay focused on protocol translation.

pub mod access;
pub mod session;
