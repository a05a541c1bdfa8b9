//! Composition of checks.
//!
//! Two composers, one per phase:
//!
//! | Composer | Strategy | Stops on |
//! |----------|----------|----------|
//! | [`BeforeComposer`] | deny-overrides-grant | first `Deny` or error |
//! | [`AfterComposer`] | sequential pipeline over the result | first `Deny` or error |
//!
//! Both are checks themselves, so a composer can be nested inside another
//! one. Their matcher is the union of their delegates' matchers.

mod after;
mod before;

pub use after::AfterComposer;
pub use before::BeforeComposer;
