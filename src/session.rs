use std::fmt;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::{Arc, Once};

use log::debug;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use crate::error::{classify, Error, Result};

static CRYPTO_INIT: Once = Once::new();

// the crypto provider is process-wide state; install it exactly once,
// never per context.
fn init_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    });
}

/// Client-side TLS configuration. Built once per invocation and able to
/// produce any number of sessions from it.
pub struct TlsContext {
    config: Arc<ClientConfig>,
}

impl TlsContext {
    pub fn new() -> TlsContext {
        init_crypto();
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        TlsContext {
            config: Arc::new(config),
        }
    }

    /// Bind a connected socket to a fresh session and drive the handshake
    /// to completion.
    ///
    /// A socket without a peer and an unusable server name are both setup
    /// violations (`Error::Configuration`). A handshake failure carries its
    /// classification and releases the socket; retry means a fresh call.
    pub fn negotiate(&self, host: &str, mut sock: TcpStream) -> Result<TlsSession> {
        let peer = sock
            .peer_addr()
            .map_err(|err| Error::Configuration(format!("socket is not connected: {err}")))?;
        let name = ServerName::try_from(host.to_owned())
            .map_err(|err| Error::Configuration(format!("bad server name {host:?}: {err}")))?;
        let mut conn = ClientConnection::new(Arc::clone(&self.config), name)
            .map_err(|err| Error::Configuration(err.to_string()))?;

        while conn.is_handshaking() {
            conn.complete_io(&mut sock).map_err(|source| Error::Handshake {
                class: classify(&source),
                source,
            })?;
        }
        debug!("handshake with {peer} complete");

        Ok(TlsSession {
            stream: StreamOwned::new(conn, sock),
        })
    }
}

impl Default for TlsContext {
    fn default() -> TlsContext {
        TlsContext::new()
    }
}

/// An established session. Existing at all means the handshake succeeded;
/// application data moves through the `Read`/`Write` impls. The socket
/// closes when the session drops.
pub struct TlsSession {
    stream: StreamOwned<ClientConnection, TcpStream>,
}

impl TlsSession {
    /// Negotiated suite, for observability.
    pub fn cipher_suite(&self) -> Option<rustls::SupportedCipherSuite> {
        self.stream.conn.negotiated_cipher_suite()
    }

    /// Certificate chain the peer presented, leaf first.
    pub fn peer_certificates(&self) -> Option<&[CertificateDer<'static>]> {
        self.stream.conn.peer_certificates()
    }

    /// Queue close_notify and flush it out. Best-effort; the socket itself
    /// is released on drop either way.
    pub fn close(&mut self) -> io::Result<()> {
        self.stream.conn.send_close_notify();
        while self.stream.conn.wants_write() {
            self.stream.conn.write_tls(&mut self.stream.sock)?;
        }
        self.stream.sock.flush()
    }
}

// opaque on purpose; the connection internals are not printable state
impl fmt::Debug for TlsSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsSession")
            .field("peer", &self.stream.sock.peer_addr().ok())
            .finish_non_exhaustive()
    }
}

impl Read for TlsSession {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for TlsSession {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Class;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn bad_server_name_is_a_configuration_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let sock = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let err = TlsContext::new().negotiate("bad name!", sock).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn garbage_server_fails_handshake_as_protocol() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (mut peer, _) = listener.accept().unwrap();
            let mut discard = [0u8; 4096];
            let _ = peer.read(&mut discard);
            let _ = peer.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n");
        });

        let sock = TcpStream::connect(addr).unwrap();
        let err = TlsContext::new().negotiate("localhost", sock).unwrap_err();
        match err {
            Error::Handshake { class, .. } => assert_eq!(class, Class::Protocol),
            other => panic!("expected handshake error, got {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn peer_abort_fails_handshake() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (peer, _) = listener.accept().unwrap();
            drop(peer);
        });

        let sock = TcpStream::connect(addr).unwrap();
        let err = TlsContext::new().negotiate("localhost", sock).unwrap_err();
        assert!(matches!(err, Error::Handshake { .. }));
        server.join().unwrap();
    }
}
