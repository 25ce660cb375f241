use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// One failure kind per pipeline stage. Per-candidate connect failures are
/// recovered inside the establisher and never reach this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("resolve {host}:{service}: {cause}")]
    Resolution {
        host: String,
        service: String,
        cause: String,
    },

    #[error("no candidate accepted a connection ({attempts} tried): {cause}")]
    Connection { attempts: usize, cause: String },

    #[error("tls configuration: {0}")]
    Configuration(String),

    #[error("tls handshake ({class}): {source}")]
    Handshake { class: Class, source: io::Error },

    #[error("request write ({class}): {source}")]
    Write { class: Class, source: io::Error },

    #[error("response read ({class}): {source}")]
    Read { class: Class, source: io::Error },

    #[error("request format: {0}")]
    Format(#[from] fmt::Error),

    #[error("output: {0}")]
    Output(#[from] io::Error),
}

/// Diagnostic category for a TLS-layer status. Exactly one category per
/// status; `Async` is kept for taxonomy parity but has no producer in this
/// blocking design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    None,
    PeerClosed,
    WantIo,
    Protocol,
    Syscall,
    Lookup,
    Async,
    Callback,
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Class::None => "none",
            Class::PeerClosed => "peer-closed",
            Class::WantIo => "want-io",
            Class::Protocol => "protocol",
            Class::Syscall => "syscall",
            Class::Lookup => "lookup",
            Class::Async => "async",
            Class::Callback => "callback",
        };
        f.write_str(name)
    }
}

/// Classify an I/O status from a TLS read/write/handshake call.
///
/// rustls surfaces its own faults wrapped inside `io::Error`; those are
/// unwrapped and classified at the TLS layer, everything else by errno-ish
/// kind.
pub fn classify(err: &io::Error) -> Class {
    if let Some(tls) = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
    {
        return classify_tls(tls);
    }
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut => {
            Class::WantIo
        }
        // close without close_notify; tolerable under `Connection: close`
        io::ErrorKind::UnexpectedEof => Class::PeerClosed,
        _ => Class::Syscall,
    }
}

pub fn classify_tls(err: &rustls::Error) -> Class {
    use rustls::Error::*;
    match err {
        InvalidMessage(_)
        | InappropriateMessage { .. }
        | InappropriateHandshakeMessage { .. }
        | PeerMisbehaved(_)
        | PeerIncompatible(_)
        | AlertReceived(_)
        | DecryptError
        | EncryptError
        | PeerSentOversizedRecord
        | NoApplicationProtocol => Class::Protocol,
        InvalidCertificate(_)
        | InvalidCertRevocationList(_)
        | NoCertificatesPresented
        | UnsupportedNameType => Class::Lookup,
        // remaining library-side conditions (config, time, randomness, ...)
        _ => Class::Callback,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tls_faults_are_protocol() {
        assert_eq!(classify_tls(&rustls::Error::DecryptError), Class::Protocol);
        assert_eq!(
            classify_tls(&rustls::Error::PeerSentOversizedRecord),
            Class::Protocol
        );
        assert_eq!(
            classify_tls(&rustls::Error::AlertReceived(
                rustls::AlertDescription::HandshakeFailure
            )),
            Class::Protocol
        );
    }

    #[test]
    fn certificate_faults_are_lookup() {
        assert_eq!(
            classify_tls(&rustls::Error::NoCertificatesPresented),
            Class::Lookup
        );
        assert_eq!(
            classify_tls(&rustls::Error::InvalidCertificate(
                rustls::CertificateError::Expired
            )),
            Class::Lookup
        );
    }

    #[test]
    fn wrapped_tls_error_is_unwrapped() {
        let err = io::Error::new(io::ErrorKind::InvalidData, rustls::Error::DecryptError);
        assert_eq!(classify(&err), Class::Protocol);
    }

    #[test]
    fn io_kinds_map_once() {
        let cases = [
            (io::ErrorKind::WouldBlock, Class::WantIo),
            (io::ErrorKind::Interrupted, Class::WantIo),
            (io::ErrorKind::UnexpectedEof, Class::PeerClosed),
            (io::ErrorKind::ConnectionReset, Class::Syscall),
            (io::ErrorKind::BrokenPipe, Class::Syscall),
        ];
        for (kind, class) in cases {
            assert_eq!(classify(&io::Error::from(kind)), class);
        }
    }

    #[test]
    fn class_names() {
        assert_eq!(Class::PeerClosed.to_string(), "peer-closed");
        assert_eq!(Class::WantIo.to_string(), "want-io");
    }
}
