// Rust-ocilib - Rust driver for Oracle database on top of OCI
//
// URL: https://github.com/kubo/rust-ocilib
//
//-----------------------------------------------------------------------------
// Copyright (c) 2017-2023 Kubo Takehiro <kubo@jiubao.org>. All rights reserved.
// This program is free software: you can modify it and/or redistribute it
// under the terms of:
//
// (i)  the Universal Permissive License v 1.0 or at your option, any
//      later version (http://oss.oracle.com/licenses/upl); and/or
//
// (ii) the Apache License v 2.0. (http://www.apache.org/licenses/LICENSE-2.0)
//-----------------------------------------------------------------------------

//! Type definitions for connection pooling
//!
//! The pool keeps logged-on sessions and hands them out as guards that give
//! them back on drop.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::connection::ConnInner;
use crate::{Connection, Connector, Error, Privilege, Result};

/// The mode to use when getting connections from a connection pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetMode {
    /// Block until a connection is available.
    Wait,

    /// Return immediately; exhaustion surfaces as `Ok(None)` from
    /// [`Pool::try_get`] and as an error from [`Pool::get`].
    NoWait,

    /// Block for at most the given duration, then fail.
    TimedWait(Duration),
}

/// Builder of [`Pool`]
///
/// # Examples
///
/// ```no_run
/// # use ocilib::*;
/// let pool = PoolBuilder::new("scott", "tiger", "//localhost/XEPDB1")
///     .min_connections(1)
///     .max_connections(8)
///     .connection_increment(2)
///     .build()?;
/// let conn = pool.get()?;
/// conn.execute("insert into t values (1)", &[])?;
/// # Ok::<(), Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    username: String,
    password: String,
    connect_string: String,
    min: u32,
    max: u32,
    increment: u32,
    get_mode: GetMode,
    idle_timeout: Option<Duration>,
    privilege: Option<Privilege>,
    stmt_cache_size: u32,
}

impl PoolBuilder {
    pub fn new<U, P, C>(username: U, password: P, connect_string: C) -> PoolBuilder
    where
        U: Into<String>,
        P: Into<String>,
        C: Into<String>,
    {
        PoolBuilder {
            username: username.into(),
            password: password.into(),
            connect_string: connect_string.into(),
            min: 0,
            max: 1,
            increment: 1,
            get_mode: GetMode::Wait,
            idle_timeout: None,
            privilege: None,
            stmt_cache_size: 20,
        }
    }

    /// Connections opened eagerly when the pool is built.
    pub fn min_connections(&mut self, min: u32) -> &mut PoolBuilder {
        self.min = min;
        self
    }

    /// Upper bound of open connections; never exceeded.
    pub fn max_connections(&mut self, max: u32) -> &mut PoolBuilder {
        self.max = max.max(1);
        self
    }

    /// Connections opened in one growth step under demand.
    pub fn connection_increment(&mut self, increment: u32) -> &mut PoolBuilder {
        self.increment = increment.max(1);
        self
    }

    pub fn get_mode(&mut self, mode: GetMode) -> &mut PoolBuilder {
        self.get_mode = mode;
        self
    }

    /// Idle connections above the minimum are closed when they have not been
    /// used for this long.
    pub fn idle_timeout(&mut self, timeout: Duration) -> &mut PoolBuilder {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn privilege(&mut self, privilege: Privilege) -> &mut PoolBuilder {
        self.privilege = Some(privilege);
        self
    }

    pub fn stmt_cache_size(&mut self, size: u32) -> &mut PoolBuilder {
        self.stmt_cache_size = size;
        self
    }

    pub fn build(&self) -> Result<Pool> {
        if self.min > self.max {
            return Err(Error::invalid_argument(format!(
                "min connections {} above max {}",
                self.min, self.max
            )));
        }
        let inner = Arc::new(PoolInner {
            params: self.clone(),
            state: Mutex::new(PoolState {
                idle: Vec::new(),
                open: 0,
                busy: 0,
                closed: false,
            }),
            cond: Condvar::new(),
        });
        {
            let mut state = inner.state.lock().unwrap_or_else(|e| e.into_inner());
            for _ in 0..self.min {
                let conn = inner.open_connection()?;
                state.idle.push(IdleConn {
                    conn,
                    since: Instant::now(),
                });
                state.open += 1;
            }
        }
        Ok(Pool { inner })
    }
}

struct IdleConn {
    conn: Arc<ConnInner>,
    since: Instant,
}

struct PoolState {
    idle: Vec<IdleConn>,
    open: u32,
    busy: u32,
    closed: bool,
}

struct PoolInner {
    params: PoolBuilder,
    state: Mutex<PoolState>,
    cond: Condvar,
}

impl PoolInner {
    fn open_connection(&self) -> Result<Arc<ConnInner>> {
        let mut connector = Connector::new(
            &*self.params.username,
            &*self.params.password,
            &*self.params.connect_string,
        );
        connector.stmt_cache_size(self.params.stmt_cache_size);
        if let Some(p) = self.params.privilege {
            connector.privilege(p);
        }
        // on failure the partially built connection frees itself
        Ok(connector.connect()?.inner)
    }

    fn evict_idle(&self, state: &mut PoolState) {
        let Some(timeout) = self.params.idle_timeout else {
            return;
        };
        let min = self.params.min;
        let now = Instant::now();
        while state.open > min {
            let Some(pos) = state
                .idle
                .iter()
                .position(|ic| now.duration_since(ic.since) >= timeout)
            else {
                break;
            };
            let ic = state.idle.remove(pos);
            state.open -= 1;
            log::debug!("closing idle pooled connection");
            drop(ic);
        }
    }

    /// One acquisition attempt under the lock. `Ok(None)` means exhausted.
    fn acquire_once(&self, state: &mut PoolState) -> Result<Option<Arc<ConnInner>>> {
        if state.closed {
            return Err(Error::invalid_state("the pool is closed"));
        }
        self.evict_idle(state);
        if let Some(ic) = state.idle.pop() {
            state.busy += 1;
            return Ok(Some(ic.conn));
        }
        if state.open < self.params.max {
            // grow by one increment, bounded by max; the requester takes the
            // first new connection
            let grow = self
                .params
                .increment
                .min(self.params.max - state.open)
                .max(1);
            let conn = self.open_connection()?;
            state.open += 1;
            state.busy += 1;
            for _ in 1..grow {
                match self.open_connection() {
                    Ok(extra) => {
                        state.idle.push(IdleConn {
                            conn: extra,
                            since: Instant::now(),
                        });
                        state.open += 1;
                    }
                    Err(err) => {
                        log::debug!("pool growth stopped early: {}", err);
                        break;
                    }
                }
            }
            return Ok(Some(conn));
        }
        Ok(None)
    }

    fn give_back(&self, conn: Arc<ConnInner>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.busy -= 1;
        if state.closed {
            state.open -= 1;
        } else {
            state.idle.push(IdleConn {
                conn,
                since: Instant::now(),
            });
        }
        drop(state);
        self.cond.notify_one();
    }
}

/// A pool of logged-on connections
///
/// The number of open connections never exceeds the configured maximum;
/// waiters block on the pool until a session is given back unless the get
/// mode says otherwise.
pub struct Pool {
    inner: Arc<PoolInner>,
}

impl Pool {
    /// Acquires a connection, honoring the configured [`GetMode`].
    pub fn get(&self) -> Result<PooledConnection> {
        let deadline = match self.inner.params.get_mode {
            GetMode::TimedWait(timeout) => Some(Instant::now() + timeout),
            _ => None,
        };
        let mut state = self.inner.state.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(conn) = self.inner.acquire_once(&mut state)? {
                return Ok(self.guard(conn));
            }
            match self.inner.params.get_mode {
                GetMode::NoWait => {
                    return Err(Error::new(
                        crate::ErrorKind::Timeout,
                        "the pool is exhausted and the get mode is no-wait",
                    ))
                }
                GetMode::Wait => {
                    state = self
                        .inner
                        .cond
                        .wait(state)
                        .unwrap_or_else(|e| e.into_inner());
                }
                GetMode::TimedWait(_) => {
                    let deadline = deadline.expect("deadline set for timed wait");
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(Error::new(
                            crate::ErrorKind::Timeout,
                            "timed out waiting for a pooled connection",
                        ));
                    }
                    let (guard, _) = self
                        .inner
                        .cond
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(|e| e.into_inner());
                    state = guard;
                }
            }
        }
    }

    /// Acquires a connection without ever blocking; `Ok(None)` when the pool
    /// is exhausted.
    pub fn try_get(&self) -> Result<Option<PooledConnection>> {
        let mut state = self.inner.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.inner.acquire_once(&mut state)?.map(|c| self.guard(c)))
    }

    fn guard(&self, conn: Arc<ConnInner>) -> PooledConnection {
        PooledConnection {
            pool: self.inner.clone(),
            conn: Some(Connection::from_inner(conn)),
        }
    }

    /// Number of open connections, busy and idle.
    pub fn open_count(&self) -> u32 {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .open
    }

    /// Number of connections currently handed out.
    pub fn busy_count(&self) -> u32 {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .busy
    }

    pub fn max_connections(&self) -> u32 {
        self.inner.params.max
    }

    /// Closes the idle connections and refuses further acquisition. Busy
    /// connections are closed as they come back.
    pub fn close(&self) -> Result<()> {
        let mut state = self.inner.state.lock().unwrap_or_else(|e| e.into_inner());
        state.closed = true;
        let idle = std::mem::take(&mut state.idle);
        state.open -= idle.len() as u32;
        drop(state);
        drop(idle);
        self.inner.cond.notify_all();
        Ok(())
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.inner.state.lock().unwrap_or_else(|e| e.into_inner());
        write!(
            f,
            "Pool {{ open: {}, busy: {}, max: {} }}",
            state.open, state.busy, self.inner.params.max
        )
    }
}

/// A pooled connection; gives the session back to the pool on drop.
pub struct PooledConnection {
    pool: Arc<PoolInner>,
    conn: Option<Connection>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection taken")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.give_back(conn.inner);
        }
    }
}

impl fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PooledConnection {{ .. }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_bounds() {
        let err = PoolBuilder::new("u", "p", "db")
            .min_connections(5)
            .max_connections(2)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
    }
}
