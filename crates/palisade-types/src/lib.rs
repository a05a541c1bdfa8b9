//! Core types for palisade.
//!
//! This crate holds the identity and descriptor types that every layer of
//! the authorization engine shares. It carries no decision logic.
//!
//! # Crate Architecture
//!
//! ```text
//! palisade-types  (Principal, Operation, ErrorCode)   ◄── THIS CRATE
//!        ↑
//! palisade-authz  (Matcher, CheckBefore/CheckAfter, composers, registry)
//! ```
//!
//! # Overview
//!
//! - [`Principal`]: who is calling (resolved lazily by the engine)
//! - [`Operation`]: which protected operation is being called
//! - [`ErrorCode`]: stable machine-readable codes for error enums
//!
//! # Example
//!
//! ```
//! use palisade_types::{Operation, Principal, PrincipalId};
//!
//! let op = Operation::new("docs", "read").with_tag("read");
//! assert_eq!(op.fqn(), "docs::read");
//! assert!(op.has_tag("read"));
//!
//! let alice = Principal::user(PrincipalId::new(), "alice").with_authority("ROLE_ADMIN");
//! assert!(alice.has_authority("ROLE_ADMIN"));
//! assert!(!Principal::Anonymous.is_authenticated());
//! ```

mod error;
mod id;
mod operation;
mod principal;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::PrincipalId;
pub use operation::Operation;
pub use principal::Principal;
