//! Core types for commerce-fields.
//!
//! This module provides type-safe wrappers for the catalog concepts the
//! pickers deal with.

pub mod field;
pub mod id;
pub mod option;

pub use field::{
    CategoryProductSelection, FieldDescriptor, FieldKind, FieldValue, FieldValueError, StorageType,
};
pub use id::*;
pub use option::{CategoryOption, ProductOption, indent_prefix, strip_indent};
