//! BIOS Config API - Core interfaces and types for the BIOS configuration store
//!
//! This crate provides the vocabulary shared between the attribute store and
//! the bus transport that exposes it to remote callers.
//!
//! # Architecture
//!
//! The API is organized into a few small modules:
//!
//! - **Error**: The two caller-visible error kinds plus the internal persistence error
//! - **Types**: Attributes, bounds, pending changes, boot options, boot order and secure boot values
//! - **Interfaces**: Capability traits the transport calls through, and the collaborator seams
//!   (object exposure and event notification) the store calls out to
//!
//! # Usage
//!
//! ```rust
//! use biosconf_api::{AttributeType, AttributeValue, PendingAttribute};
//!
//! let change = PendingAttribute::new(AttributeType::Integer, AttributeValue::Integer(4));
//! assert_eq!(change.attribute_type, AttributeType::Integer);
//! ```

pub mod error;
pub mod interfaces;
pub mod types;

// Re-export commonly used types
pub use crate::error::{Error, Result};
pub use crate::interfaces::{
    AttributeStore, BootOptionStore, BootOrderStore, EventNotifier, ObjectExposer, SecureBootStore,
};
pub use crate::types::*;
