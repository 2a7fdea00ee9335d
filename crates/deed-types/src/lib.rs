//! Foundation types for the Deed Registry.
//!
//! This crate provides the identity, content-hash, and record types shared by
//! every other deed crate. Nothing here touches registry state; the types are
//! plain values with parsing and validation helpers.
//!
//! # Key Types
//!
//! - [`Principal`] -- Caller identity (Stacks-style address)
//! - [`DocumentHash`] -- 32-byte content identifier of a deed document
//! - [`Property`] / [`PropertyUpdate`] -- Registered record and its latest amendment
//! - [`Currency`] / [`ZoningType`] -- Closed enumerations accepted at registration
//! - [`BlockHeight`] -- Logical time used for registration and update stamps
//! - [`RejectCode`] -- Closed set of numeric rejection codes

pub mod code;
pub mod error;
pub mod hash;
pub mod limits;
pub mod listing;
pub mod principal;
pub mod property;
pub mod temporal;

pub use code::RejectCode;
pub use error::TypeError;
pub use hash::DocumentHash;
pub use listing::{Currency, ZoningType};
pub use principal::Principal;
pub use property::{Property, PropertyId, PropertyUpdate};
pub use temporal::BlockHeight;
