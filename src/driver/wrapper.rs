// SPDX-License-Identifier: Apache-2.0

//! Guarded driver decorator
//!
//! `GuardedDriver` implements the same capability contract as the driver it
//! wraps, routing every connection open through the policy checkpoint and
//! every delegated failure through attack interception. The wrapped driver
//! is owned exclusively by the decorator; delegated errors are propagated
//! unchanged in value, never rewritten.

use std::sync::Arc;

use tracing::debug;

use crate::driver::error::{DriverError, DriverResult};
use crate::driver::traits::{Connection, SqlDriver};
use crate::driver::values::{named_to_positional, NamedValue, QueryResult, Value};
use crate::dsn::{generic_parser, DsnInfo, DsnParser};
use crate::guard::Guard;
use crate::interceptor::attack::{generic_error_interceptor, ErrorInterceptor};
use crate::interceptor::context::ExecutionContext;
use crate::interceptor::types::{InterceptCode, SqlErrorParams};

/// Construction-time options for a decorator
///
/// Unset options fall back to named defaults: a display name derived from
/// the driver's concrete type, the no-op DSN parser, and an error
/// interceptor that never reports a hit.
#[derive(Clone, Default)]
pub struct WrapOptions {
    driver_name: Option<String>,
    dsn_parser: Option<DsnParser>,
    error_interceptor: Option<ErrorInterceptor>,
}

impl WrapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the type-derived driver display name.
    pub fn driver_name(mut self, name: impl Into<String>) -> Self {
        self.driver_name = Some(name.into());
        self
    }

    /// Overrides connection descriptor parsing.
    pub fn dsn_parser(mut self, parser: impl Fn(&str) -> DsnInfo + Send + Sync + 'static) -> Self {
        self.dsn_parser = Some(Arc::new(parser));
        self
    }

    /// Overrides error-hit classification.
    pub fn error_interceptor(
        mut self,
        interceptor: impl Fn(&DriverError) -> Option<crate::interceptor::types::ErrorClass>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.error_interceptor = Some(Arc::new(interceptor));
        self
    }
}

struct DriverShared {
    inner: Box<dyn SqlDriver>,
    driver_name: String,
    dsn_parser: DsnParser,
    error_interceptor: ErrorInterceptor,
    guard: Arc<Guard>,
}

/// Decorator implementing the wrapped driver's capability contract
///
/// Immutable after construction; cloning shares the same wrapped driver.
#[derive(Clone)]
pub struct GuardedDriver {
    shared: Arc<DriverShared>,
}

impl GuardedDriver {
    /// Ad-hoc decoration without registry involvement.
    pub fn wrap<D: SqlDriver + 'static>(driver: D, guard: Arc<Guard>, options: WrapOptions) -> Self {
        let driver_name = options
            .driver_name
            .unwrap_or_else(|| derived_driver_name::<D>());

        Self {
            shared: Arc::new(DriverShared {
                inner: Box::new(driver),
                driver_name,
                dsn_parser: options.dsn_parser.unwrap_or_else(|| Arc::new(generic_parser)),
                error_interceptor: options
                    .error_interceptor
                    .unwrap_or_else(|| Arc::new(generic_error_interceptor)),
                guard,
            }),
        }
    }

    pub fn driver_name(&self) -> &str {
        &self.shared.driver_name
    }

    pub fn dsn_parser(&self) -> DsnParser {
        Arc::clone(&self.shared.dsn_parser)
    }

    /// Opens a connection through the policy checkpoint.
    ///
    /// On `Block` the wrapped driver is never invoked and the distinguished
    /// [`DriverError::Blocked`] is returned. On a delegated failure the
    /// error runs through attack interception and is then propagated
    /// unchanged. A `Log` decision emits its payload only after the
    /// delegated open succeeds.
    pub fn open_in(&self, cx: &ExecutionContext, dsn: &str) -> DriverResult<GuardedConnection> {
        let info = (self.shared.dsn_parser)(dsn);
        let check = self
            .shared
            .guard
            .connection_policy_check(&info, &self.shared.driver_name);

        if check.code == InterceptCode::Block {
            if let Some(payload) = &check.log {
                self.shared.guard.emit_policy_log(payload);
            }
            debug!(driver = %self.shared.driver_name, "connection blocked by policy");
            return Err(DriverError::blocked(format!(
                "connection policy rejected driver {}",
                self.shared.driver_name
            )));
        }

        match self.shared.inner.open(dsn) {
            Err(err) => {
                self.intercept_error(cx, dsn, &err);
                Err(err)
            }
            Ok(conn) => {
                if check.code == InterceptCode::Log {
                    if let Some(payload) = &check.log {
                        self.shared.guard.emit_policy_log(payload);
                    }
                }
                Ok(GuardedConnection {
                    inner: conn,
                    driver: self.clone(),
                    dsn_info: info,
                })
            }
        }
    }

    /// Direct open on the wrapped driver, bypassing interception. Used by
    /// the registry's passthrough path.
    pub(crate) fn open_raw(&self, dsn: &str) -> DriverResult<Box<dyn Connection>> {
        self.shared.inner.open(dsn)
    }

    /// Post-error interception pipeline.
    ///
    /// Observes only: the caller still propagates the original error. The
    /// common no-hit case returns before any allocation. Without a request
    /// descriptor in context there is nothing to attribute an attack to, so
    /// both logging and blocking are skipped. Every non-Ignore result is
    /// logged; a single Block among the results aborts the outer operation
    /// through the context's blocker.
    pub(crate) fn intercept_error(&self, cx: &ExecutionContext, param: &str, err: &DriverError) {
        let Some(class) = (self.shared.error_interceptor)(err) else {
            return;
        };

        let params = SqlErrorParams::new(self.shared.driver_name.clone(), param, class);

        let Some(request) = cx.request() else {
            return;
        };

        let mut should_block = false;
        for result in self.shared.guard.attack_check(&params) {
            if result.intercept == InterceptCode::Ignore {
                continue;
            }
            self.shared.guard.emit_attack_log(&params, request, &result);
            if result.intercept == InterceptCode::Block {
                should_block = true;
            }
        }

        if should_block {
            if let Some(blocker) = cx.blocker() {
                blocker.block();
            }
        }
    }
}

impl SqlDriver for GuardedDriver {
    fn open(&self, dsn: &str) -> DriverResult<Box<dyn Connection>> {
        self.open_in(&ExecutionContext::detached(), dsn)
            .map(|conn| Box::new(conn) as Box<dyn Connection>)
    }
}

/// Connection wrapper carrying the decorator and the parsed descriptor
pub struct GuardedConnection {
    inner: Box<dyn Connection>,
    driver: GuardedDriver,
    dsn_info: DsnInfo,
}

impl std::fmt::Debug for GuardedConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedConnection")
            .field("inner", &self.inner)
            .field("dsn_info", &self.dsn_info)
            .finish_non_exhaustive()
    }
}

impl GuardedConnection {
    /// The descriptor parsed when this connection was opened.
    pub fn dsn_info(&self) -> &DsnInfo {
        &self.dsn_info
    }

    /// Executes a statement, running delegated failures through attack
    /// interception with the statement text as the attack parameter.
    pub fn exec_in(
        &mut self,
        cx: &ExecutionContext,
        statement: &str,
        args: &[NamedValue],
    ) -> DriverResult<u64> {
        let args = self.prepare_args(args)?;
        match self.inner.exec(statement, &args) {
            Err(err) => {
                self.driver.intercept_error(cx, statement, &err);
                Err(err)
            }
            ok => ok,
        }
    }

    /// Query counterpart of [`GuardedConnection::exec_in`].
    pub fn query_in(
        &mut self,
        cx: &ExecutionContext,
        statement: &str,
        args: &[NamedValue],
    ) -> DriverResult<QueryResult> {
        let args = self.prepare_args(args)?;
        match self.inner.query(statement, &args) {
            Err(err) => {
                self.driver.intercept_error(cx, statement, &err);
                Err(err)
            }
            ok => ok,
        }
    }

    /// Runs the connection's named-value capability when present, otherwise
    /// falls back to positional conversion (rejecting named parameters).
    fn prepare_args(&mut self, args: &[NamedValue]) -> DriverResult<Vec<Value>> {
        if let Some(checker) = self.inner.named_value_checker() {
            for arg in args {
                checker.check_named_value(arg)?;
            }
            Ok(args.iter().map(|arg| arg.value.clone()).collect())
        } else {
            named_to_positional(args)
        }
    }
}

impl Connection for GuardedConnection {
    fn exec(&mut self, statement: &str, args: &[Value]) -> DriverResult<u64> {
        match self.inner.exec(statement, args) {
            Err(err) => {
                self.driver
                    .intercept_error(&ExecutionContext::detached(), statement, &err);
                Err(err)
            }
            ok => ok,
        }
    }

    fn query(&mut self, statement: &str, args: &[Value]) -> DriverResult<QueryResult> {
        match self.inner.query(statement, args) {
            Err(err) => {
                self.driver
                    .intercept_error(&ExecutionContext::detached(), statement, &err);
                Err(err)
            }
            ok => ok,
        }
    }

    fn close(&mut self) -> DriverResult<()> {
        self.inner.close()
    }

    fn named_value_checker(&mut self) -> Option<&mut dyn crate::driver::traits::NamedValueChecker> {
        self.inner.named_value_checker()
    }
}

/// Derives a display name from the driver's concrete type.
///
/// `my_crate::MySqlDriver` becomes `mysql`; a bare `Driver` type keeps its
/// own (lowercased) name.
fn derived_driver_name<D>() -> String {
    let full = std::any::type_name::<D>();
    let short = full.rsplit("::").next().unwrap_or(full);
    // strip generics, e.g. `PoolDriver<Inner>`
    let short = short.split('<').next().unwrap_or(short);
    let lowered = short.to_ascii_lowercase();
    let trimmed = lowered.trim_end_matches("driver");
    if trimmed.is_empty() {
        lowered
    } else {
        trimmed.to_string()
    }
}
