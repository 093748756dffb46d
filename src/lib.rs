//! Recursive casting of loosely-typed maps (parsed JSON and the like) into
//! declared schema records.
//!
//! Schemas are registered up front as `SchemaDef`s whose fields carry type
//! annotations (`"Optional[List[int]]"`, `"Union[int, str]"`, `"Address"`).
//! The resolver lowers each annotation to a `Descriptor`; the caster then
//! converts every input value against it, consulting hooks first, recursing
//! into nested schemas, and falling back to each kind's default constructor.
//!
//! ```
//! use datacast::{Caster, Hooks, Kind, SchemaDef, SchemaRegistry, Value};
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::new()
//!     .with(
//!         SchemaDef::new("Event")
//!             .field("name", "str".parse().unwrap())
//!             .field("at", "datetime".parse().unwrap())
//!             .field_with_default("retries", "int".parse().unwrap(), 0),
//!     )
//!     .unwrap();
//! let hooks = Hooks::new().with(Kind::DateTime, datacast::hooks::iso_datetime);
//!
//! let input = Value::from(json!({"name": 7, "at": "2023-10-11T00:00:00"}));
//! let event = Caster::new(&registry)
//!     .with_hooks(&hooks)
//!     .cast_to_schema("Event", &input)
//!     .unwrap();
//! assert_eq!(event.get("name"), Some(&Value::from("7")));
//! assert_eq!(event.get("retries"), Some(&Value::Int(0)));
//! ```
pub mod annotation;
pub mod cast;
pub mod config;
pub mod error;
pub mod hooks;
pub mod ir;
pub mod path_de;
pub mod resolve;
pub mod schema;
pub mod value;

pub use cast::{cast_to_schema, cast_value, Caster};
pub use config::{CastOptions, FailurePolicy};
pub use error::{ArgumentError, CastError, ConstructError, ConversionError, SchemaError};
pub use hooks::Hooks;
pub use ir::{Descriptor, Kind, TypeExpr};
pub use resolve::{resolve_field_type, resolve_schema_types};
pub use schema::{FieldDef, Record, SchemaDef, SchemaRegistry};
pub use value::Value;
