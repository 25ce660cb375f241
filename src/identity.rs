use log::warn;
use x509_parser::prelude::*;

use crate::session::TlsSession;

/// Read-only snapshot of the peer's leaf certificate.
#[derive(Debug, Clone)]
pub struct PeerIdentity {
    pub der: Vec<u8>,
    pub subject: Option<String>,
}

/// Take the identity snapshot from an established session.
///
/// `None` means the peer presented no certificate at all; a certificate
/// whose subject cannot be read still yields an identity, with
/// `subject: None`. Neither case is fatal.
pub fn inspect(session: &TlsSession) -> Option<PeerIdentity> {
    let certs = session.peer_certificates()?;
    let leaf = certs.first()?;
    Some(PeerIdentity {
        der: leaf.as_ref().to_vec(),
        subject: subject_name(leaf.as_ref()),
    })
}

/// Subject DN of a DER certificate, or `None` when it cannot be parsed.
pub fn subject_name(der: &[u8]) -> Option<String> {
    match X509Certificate::from_der(der) {
        Ok((_, cert)) => Some(cert.subject().to_string()),
        Err(err) => {
            warn!("cannot read certificate subject: {err}");
            None
        }
    }
}
