//! Collaborator traits.
//!
//! These traits define the interfaces that applications implement to
//! provide device location, persistence, content and notifications.

pub mod content;
pub mod location;
