use crate::area::Area;
use crate::connection::Connection;
use crate::error::Result;
use crate::protocol::{Request, Response};
use crate::types::Href;
use serde_json::json;
use std::cell::RefCell;
use std::time::Duration;

/// Default LEAP port on the bridge
pub const DEFAULT_PORT: u16 = 8081;

/// Default timeout for the blocking read
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection parameters for a [`Session`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl SessionConfig {
    /// Parameters for `host` with the default port and timeout
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the read timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A connection to one bridge.
///
/// The session owns the encrypted stream and is the sole path by which
/// tree nodes reach the network; [`Area`] and zone nodes hold a plain
/// `&Session` back-reference and never control the connection's
/// lifecycle. The model is single-threaded: exchanges serialize through
/// a `RefCell`, and no internal locking is provided for cross-thread use.
pub struct Session {
    conn: RefCell<Connection>,
}

impl Session {
    /// Connect and complete the TLS handshake
    pub fn connect(config: SessionConfig) -> Result<Self> {
        let conn = Connection::open(&config.host, config.port, config.timeout)?;
        Ok(Self {
            conn: RefCell::new(conn),
        })
    }

    /// Connect to `host` with the default port and timeout
    pub fn connect_to(host: impl Into<String>) -> Result<Self> {
        Self::connect(SessionConfig::new(host))
    }

    /// Authenticate to the bridge.
    ///
    /// Returns the raw response; this layer does not classify success or
    /// failure, the caller inspects the result.
    pub fn login(&self, id: &str, password: &str) -> Result<Response> {
        let request = Request::update(
            "/login",
            json!({
                "Login": {
                    "ContextType": "Application",
                    "LoginID": id,
                    "Password": password,
                }
            }),
        );
        self.exchange(&request)
    }

    /// Discover the full area tree, rooted at `/area/rootarea`.
    ///
    /// This blocks until every area and zone in the tree has been
    /// fetched; any failure along the way aborts the whole call.
    pub fn root(&self) -> Result<Area<'_>> {
        Area::discover(self, Href::new("/area/rootarea"))
    }

    /// Keep-alive primitive. An external driver is expected to call this
    /// periodically; the session itself never does.
    pub fn ping(&self) -> Result<Response> {
        self.exchange(&Request::read("/server/status/ping"))
    }

    pub(crate) fn exchange(&self, request: &Request) -> Result<Response> {
        self.conn.borrow_mut().exchange(request)
    }

    /// Session over an already-connected plain stream, for stub-bridge tests.
    #[cfg(test)]
    pub(crate) fn over(stream: std::net::TcpStream, timeout: Duration) -> Result<Self> {
        Ok(Self {
            conn: RefCell::new(Connection::over(stream, timeout)?),
        })
    }
}
