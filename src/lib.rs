// dbguard - transparent security interception for pluggable SQL drivers
// Core library

pub mod config;
pub mod driver;
pub mod dsn;
pub mod guard;
pub mod interceptor;
pub mod logging;
pub mod observability;
pub mod stacktrace;

pub use config::GuardConfig;
pub use driver::{
    guarded_driver_name, named_to_positional, Connection, DriverError, DriverRegistry,
    DriverResult, GuardedConnection, GuardedDriver, NamedValue, NamedValueChecker, QueryResult,
    SqlDriver, Value, WrapOptions,
};
pub use dsn::{generic_parser, url_parser, DsnInfo, DsnParser};
pub use guard::{Guard, GuardBuilder};
pub use interceptor::{
    AttackCheck, AttackResult, Blocker, DbConnectionParams, ErrorClass, ErrorInterceptor,
    ExecutionContext, InterceptCode, PolicyCheck, PolicyDecision, RequestInfo, SqlErrorParams,
};
pub use logging::{FileSink, HookSink, Level, LogEntry, LogSink, LogTransport, RemoteHook, TracingSink};
pub use observability::Masked;
