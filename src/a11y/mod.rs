//! Accessibility bridge: the widget pushes grid notices, observers read
//! announcements back on a second channel.

pub mod bridge;

pub use bridge::{describe, A11yBridge, Announcement, GridNotice};
