//! In-process stub bridge for tests: a plain-TCP listener speaking the
//! newline-framed JSON protocol, so transport and discovery logic can be
//! exercised without a TLS identity.

use crate::session::Session;
use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What the stub sends back for one request
pub(crate) enum StubReply {
    Json(Value),
    /// Arbitrary bytes, for non-JSON payloads
    Raw(&'static str),
    /// Keep the connection open without answering
    Hang,
    /// Drop the connection
    Close,
}

pub(crate) struct StubBridge {
    addr: SocketAddr,
}

impl StubBridge {
    /// Serve one connection on a background thread, answering each
    /// request with whatever `respond` returns.
    pub(crate) fn spawn<F>(respond: F) -> Self
    where
        F: Fn(&Value) -> StubReply + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (stream, _) = match listener.accept() {
                Ok(accepted) => accepted,
                Err(_) => return,
            };
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => return,
                    Ok(_) => {}
                }
                let request: Value = match serde_json::from_str(line.trim()) {
                    Ok(request) => request,
                    Err(_) => return,
                };

                match respond(&request) {
                    StubReply::Json(reply) => {
                        let mut frame = serde_json::to_vec(&reply).unwrap();
                        frame.extend_from_slice(b"\r\n");
                        if writer.write_all(&frame).is_err() {
                            return;
                        }
                    }
                    StubReply::Raw(bytes) => {
                        if writer.write_all(bytes.as_bytes()).is_err() {
                            return;
                        }
                    }
                    StubReply::Hang => {
                        // Outlive the client's read timeout, then hold the
                        // socket open until the client hangs up.
                        thread::sleep(Duration::from_secs(2));
                    }
                    StubReply::Close => return,
                }
            }
        });

        Self { addr }
    }

    /// A plain stream connected to the stub
    pub(crate) fn stream(&self) -> TcpStream {
        TcpStream::connect(self.addr).unwrap()
    }

    /// A [`Session`] connected to the stub, with a short read timeout
    pub(crate) fn session(&self) -> Session {
        Session::over(self.stream(), Duration::from_millis(500)).unwrap()
    }
}

/// The `Header.Url` of a captured request
pub(crate) fn url_of(request: &Value) -> String {
    request["Header"]["Url"].as_str().unwrap_or_default().to_string()
}

/// Run `f` with a subscriber installed on this thread that counts the
/// WARN events `f` emits. Returns `f`'s value and the count.
pub(crate) fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    struct WarnCounter(Arc<AtomicUsize>);

    impl tracing::Subscriber for WarnCounter {
        fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }
        fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}
        fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}
        fn event(&self, event: &tracing::Event<'_>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn enter(&self, _span: &tracing::span::Id) {}
        fn exit(&self, _span: &tracing::span::Id) {}
    }

    let count = Arc::new(AtomicUsize::new(0));
    let value = tracing::subscriber::with_default(WarnCounter(count.clone()), f);
    let warnings = count.load(Ordering::SeqCst);
    (value, warnings)
}
