//! Rust client library for Lutron LEAP bridges and processors
//!
//! LEAP is a JSON request/response protocol carried over a persistent
//! TLS-encrypted TCP socket (default port 8081). This library
//! authenticates to a bridge, discovers its tree of physical areas and
//! controllable zones, and issues live read/write commands against
//! individual zones. It supports:
//!
//! - Framed request/response exchange over the encrypted stream
//! - Login and keep-alive primitives
//! - Full recursive discovery of the area/zone tree
//! - Zone variants by control type (switched, dimmed, spectrum tuning)
//! - On/off control and state reads for switched loads
//!
//! The model is deliberately synchronous: every network operation blocks
//! until the bridge answers or the configured timeout elapses, and the
//! protocol is strict request-then-response with no pipelining. Nothing
//! is retried internally; reconnect and retry policy belong to the
//! caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use lutron_leap::{Child, Session, Zone};
//!
//! fn main() -> lutron_leap::Result<()> {
//!     let session = Session::connect_to("192.168.1.40")?;
//!     session.login("my-integration", "secret")?;
//!
//!     // Discover the whole area tree (blocks until complete).
//!     let root = session.root()?;
//!     for child in root.children() {
//!         println!("{} ({})", child.name(), child.href());
//!         if let Child::Zone(Zone::Switched(light)) = child {
//!             light.set_state(true)?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Custom port and timeout
//!
//! ```no_run
//! use lutron_leap::{Session, SessionConfig};
//! use std::time::Duration;
//!
//! fn main() -> lutron_leap::Result<()> {
//!     let session = Session::connect(
//!         SessionConfig::new("192.168.1.40")
//!             .port(8081)
//!             .timeout(Duration::from_secs(5)),
//!     )?;
//!     session.ping()?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Session**: owns the connection; login, ping, and the discovery
//!   entry point. Tree nodes hold a `&Session` back-reference.
//! - **Area**: a tree node; construction recursively fetches its whole
//!   subtree (child areas, or zones when it is a leaf).
//! - **Zone**: a controllable load, dispatched to a variant by the
//!   control type the bridge reports.
//! - **Connection**: low-level framing — one JSON document plus CRLF per
//!   request, one blocking read per response.
//! - **Protocol**: the communiqué envelope structures.

mod area;
mod connection;
mod error;
mod protocol;
mod session;
#[cfg(test)]
mod testutil;
mod types;
mod zone;

// Public exports
pub use area::{Area, Child};
pub use error::{LeapError, Result};
pub use protocol::{CommuniqueType, Request, RequestHeader, Response, ResponseHeader};
pub use session::{Session, SessionConfig, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use types::{ControlType, Href};
pub use zone::{DimmedZone, SpectrumTuningZone, SwitchedZone, Zone, ZoneBase};
