//! Browser glue for the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each module wraps one browser API behind a core trait so pages and
//! components never touch `web_sys` directly. Pure helpers stay compiled in
//! every build so they can be unit tested without a browser.

pub mod location;
pub mod storage;
