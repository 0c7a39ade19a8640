//! # xDome Core
//!
//! Pure request shaping for the xDome connector. No I/O happens here.
//!
//! This crate provides:
//! - The resource catalog (endpoints and filterable field checklists)
//! - Label-to-code translation tables
//! - The filter expression model sent under `filter_by`
//! - Payload normalization and filter operand construction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod epoch;
pub mod filter;
pub mod lookup;
pub mod payload;
pub mod resource;

pub use epoch::{format_epoch, EpochZone};
pub use filter::{FieldInput, FilterExpression, FilterOp, FilterOperand, Operand};
pub use lookup::FormatLookup;
pub use payload::{
    build_filter_operands, build_request, normalize_payload, BuildOptions, Params, PayloadError,
    QueryRequest,
};
pub use resource::Resource;
