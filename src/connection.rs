use crate::error::{LeapError, Result};
use crate::protocol::{Request, Response};
use native_tls::{HandshakeError, TlsConnector};
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// One receive call's worth of response bytes. A response larger than
/// this is not reassembled.
const RECV_BUFFER: usize = 16 * 1024;

pub(crate) trait Stream: Read + Write + Send {}
impl<T: Read + Write + Send> Stream for T {}

/// Owns the encrypted stream to the bridge.
///
/// The protocol is strictly request-then-response with no pipelining;
/// `exchange` must not be called again before the previous call returns,
/// which exclusive `&mut self` access enforces.
pub(crate) struct Connection {
    stream: Box<dyn Stream>,
}

impl Connection {
    /// Open a TCP connection to the bridge and complete the TLS handshake.
    ///
    /// Certificate and hostname verification are disabled: bridges present
    /// self-signed certificates.
    pub(crate) fn open(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addr = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            LeapError::Connection(std::io::Error::new(
                ErrorKind::NotFound,
                format!("no address found for {host}:{port}"),
            ))
        })?;

        let tcp = TcpStream::connect_timeout(&addr, timeout)?;
        // The one timeout in this layer governs the blocking read.
        tcp.set_read_timeout(Some(timeout))?;

        let connector = TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()?;

        let stream = match connector.connect(host, tcp) {
            Ok(stream) => stream,
            Err(HandshakeError::Failure(e)) => return Err(LeapError::Tls(e)),
            // The socket read timed out mid-handshake.
            Err(HandshakeError::WouldBlock(_)) => return Err(LeapError::Timeout),
        };

        tracing::info!(host, port, "connected to bridge");

        Ok(Self {
            stream: Box::new(stream),
        })
    }

    /// Wrap an already-connected plain stream, for tests against a stub
    /// bridge that speaks the protocol without TLS.
    #[cfg(test)]
    pub(crate) fn over(stream: TcpStream, timeout: Duration) -> Result<Self> {
        stream.set_read_timeout(Some(timeout))?;
        Ok(Self {
            stream: Box::new(stream),
        })
    }

    /// Send one request and read exactly one response.
    ///
    /// The request is framed as a single JSON document followed by CRLF,
    /// UTF-8 encoded. The response is whatever one blocking read returns,
    /// parsed as a single JSON document.
    pub(crate) fn exchange(&mut self, request: &Request) -> Result<Response> {
        let mut frame = serde_json::to_vec(request)
            .map_err(|e| LeapError::Protocol(format!("request failed to serialize: {e}")))?;
        frame.extend_from_slice(b"\r\n");

        tracing::debug!(frame = %String::from_utf8_lossy(&frame).trim_end(), "send");
        self.stream.write_all(&frame)?;
        self.stream.flush()?;

        let mut buf = vec![0u8; RECV_BUFFER];
        let n = match self.stream.read(&mut buf) {
            Ok(n) => n,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Err(LeapError::Timeout)
            }
            Err(e) => return Err(e.into()),
        };
        if n == 0 {
            return Err(LeapError::Protocol(
                "connection closed before a response arrived".to_string(),
            ));
        }

        tracing::debug!(frame = %String::from_utf8_lossy(&buf[..n]).trim_end(), "recv");
        serde_json::from_slice(&buf[..n])
            .map_err(|e| LeapError::Protocol(format!("response is not a JSON document: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{StubBridge, StubReply};
    use serde_json::json;

    fn connect(bridge: &StubBridge) -> Connection {
        Connection::over(bridge.stream(), Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn exchange_returns_one_response_per_request() {
        let bridge = StubBridge::spawn(|request| {
            StubReply::Json(json!({
                "CommuniqueType": "ReadResponse",
                "Header": { "StatusCode": "200 OK", "Url": request["Header"]["Url"] },
                "Body": {}
            }))
        });
        let mut conn = connect(&bridge);

        for href in ["/server/status/ping", "/area/rootarea", "/zone/7/status"] {
            let response = conn.exchange(&Request::read(href)).unwrap();
            assert_eq!(
                response.header.unwrap().url.unwrap().as_str(),
                href,
                "responses must come back in request order"
            );
        }
    }

    #[test]
    fn non_json_response_is_a_protocol_error() {
        let bridge = StubBridge::spawn(|_| StubReply::Raw("this is not json\r\n"));
        let mut conn = connect(&bridge);

        let err = conn.exchange(&Request::read("/area/rootarea")).unwrap_err();
        assert!(matches!(err, LeapError::Protocol(_)), "got {err:?}");
    }

    #[test]
    fn closed_connection_is_a_protocol_error_not_an_empty_object() {
        let bridge = StubBridge::spawn(|_| StubReply::Close);
        let mut conn = connect(&bridge);

        let err = conn.exchange(&Request::read("/area/rootarea")).unwrap_err();
        assert!(matches!(err, LeapError::Protocol(_)), "got {err:?}");
    }

    #[test]
    fn silent_bridge_times_out() {
        let bridge = StubBridge::spawn(|_| StubReply::Hang);
        let mut conn = connect(&bridge);

        let err = conn.exchange(&Request::read("/area/rootarea")).unwrap_err();
        assert!(matches!(err, LeapError::Timeout), "got {err:?}");
    }
}
