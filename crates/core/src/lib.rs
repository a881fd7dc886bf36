//! Core client logic for the YouMatter portal.
//!
//! Pure policy engines (attachment screening, password strength) and the
//! view-model controllers behind the submission form, the reporter status
//! view, and the admin triage surface.

pub mod services;

pub use services::*;
