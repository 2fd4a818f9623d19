//! SqlDriver trait definition
//!
//! This is the capability contract that both raw vendor drivers and the
//! guarding decorator implement. The surface is deliberately minimal: a
//! driver opens connections by DSN, a connection executes statements.
//! Optional capabilities are surfaced by the connection itself rather than
//! probed per call.

use crate::driver::error::DriverResult;
use crate::driver::values::{NamedValue, QueryResult, Value};

/// Core trait that all database drivers must implement
///
/// The decorator implements this trait too, so a `GuardedDriver` can stand
/// anywhere a raw driver is expected.
pub trait SqlDriver: Send + Sync {
    /// Opens a connection described by `dsn`
    fn open(&self, dsn: &str) -> DriverResult<Box<dyn Connection>>;
}

/// An open connection to a database
pub trait Connection: Send + std::fmt::Debug {
    /// Executes a statement and returns the affected-row count
    fn exec(&mut self, statement: &str, args: &[Value]) -> DriverResult<u64>;

    /// Executes a query and returns its rows
    fn query(&mut self, statement: &str, args: &[Value]) -> DriverResult<QueryResult>;

    /// Closes the connection and releases resources
    fn close(&mut self) -> DriverResult<()> {
        Ok(())
    }

    /// Optional named-parameter capability.
    ///
    /// Connections that understand named parameters return their checker
    /// here; everything else inherits the `None` default and gets the
    /// named-to-positional fallback.
    fn named_value_checker(&mut self) -> Option<&mut dyn NamedValueChecker> {
        None
    }
}

/// Validates (and possibly rewrites) a named parameter before execution
pub trait NamedValueChecker {
    fn check_named_value(&mut self, value: &NamedValue) -> DriverResult<()>;
}
