//! Document validation
//!
//! Validates a write against the property validator tree of its document
//! definition and produces the full list of failures.
//!
//! # Design Principles
//!
//! - Collect every failure, never stop at the first
//! - Deterministic: same inputs, same messages, same order
//! - Documents are never mutated
//! - Schema mistakes are errors, bad data is a message

mod attachments;
mod comparator;
mod constraints;
mod context;
mod formats;
mod item_stack;
pub mod messages;
mod validator;

pub use attachments::{content_type_supported, extension_supported};
pub use comparator::{documents_equal, items_equal, numbers_equal, values_equal};
pub use constraints::{check_bound, item_length, Bound, IncomparableBound, RangeKind};
pub use context::{AttachmentOverrides, ValidationContext};
pub use formats::{parse_date, parse_datetime, parse_time, parse_timezone, parse_uuid, StringFormat};
pub use item_stack::{build_item_path, is_present, ItemFrame, ItemName};
pub use validator::DocumentValidator;
