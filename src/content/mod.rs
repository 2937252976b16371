// src/content/mod.rs
//
// The rich content pipeline: every HTML value that enters or leaves the
// system passes through here. Sanitization happens on write (before
// persistence) and again on read (before a value is handed out as markup).

pub mod sanitize;
pub mod text;
pub mod urlcheck;

pub use sanitize::{SanitizedHtml, sanitize};
pub use text::{strip_tags, truncate_plain};
pub use urlcheck::is_safe_url;
