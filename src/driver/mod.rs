//! Driver decoration layer
//!
//! The capability contract ([`SqlDriver`], [`Connection`]), the guarding
//! decorator, and the registry that hands decorated drivers to callers.

pub mod error;
pub mod registry;
pub mod traits;
pub mod values;
pub mod wrapper;

pub use error::{DriverError, DriverResult};
pub use registry::{guarded_driver_name, DriverRegistry};
pub use traits::{Connection, NamedValueChecker, SqlDriver};
pub use values::{named_to_positional, NamedValue, QueryResult, Value};
pub use wrapper::{GuardedConnection, GuardedDriver, WrapOptions};
