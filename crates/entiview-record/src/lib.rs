//! Entiview Record Model
//!
//! Schema-less records for APIs whose entity shape is not known at build time.
//!
//! # Core Concepts
//!
//! - [`DynamicRecord`]: Ordered field map for one entity, with coercing accessors
//! - [`FieldValue`]: Closed set of field shapes (text, number, boolean, absent, opaque)
//! - [`TitleStrategy`]: Which field serves as the display title
//! - [`RecordCollection`]: One fetch worth of records plus the declared total
//!
//! # Example
//!
//! ```rust
//! use entiview_record::DynamicRecord;
//!
//! let record = DynamicRecord::from_json_str(r#"{"id": 1, "name": "Widget"}"#).unwrap();
//! assert_eq!(record.get("name"), "Widget");
//! assert_eq!(record.get("colour"), "N/A");
//! assert_eq!(record.display_name(), "1");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod collection;
mod error;
mod record;
mod title;
mod value;

pub use collection::RecordCollection;
pub use error::RecordError;
pub use record::{DynamicRecord, DESCRIPTION_KEYS, NO_DESCRIPTION};
pub use title::{TitleStrategy, UNNAMED_ENTITY};
pub use value::{FieldValue, NOT_AVAILABLE};
