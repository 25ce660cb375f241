use std::io::Write;

use log::{debug, info, warn};

use crate::error::Result;
use crate::{connect, exchange, identity, request, resolve, session};

/// The externally supplied target: bare host name, absolute path, service
/// name or port.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub path: String,
    pub service: String,
}

/// Run one full exchange: resolve, connect, handshake, send the request,
/// stream the response body into `out` until the peer closes.
///
/// The peer identity is observed on the side; a missing certificate or an
/// unreadable subject name is logged and the exchange proceeds.
pub fn fetch(config: &Config, out: &mut dyn Write) -> Result<()> {
    let candidates = resolve::resolve(&config.host, &config.service)?;
    let sock = connect::establish(&candidates)?;

    let ctx = session::TlsContext::new();
    let mut session = ctx.negotiate(&config.host, sock)?;
    if let Some(suite) = session.cipher_suite() {
        info!("tls session using {:?}", suite.suite());
    }

    match identity::inspect(&session) {
        Some(peer) => match &peer.subject {
            Some(subject) => info!("peer subject: {subject}"),
            None => warn!("peer certificate has no readable subject name"),
        },
        None => warn!("no certificate from {}", config.host),
    }

    let req = request::format(&config.host, &config.path)?;
    exchange::send(&mut session, &req)?;

    let mut chunks = exchange::receive(&mut session);
    for chunk in &mut chunks {
        out.write_all(&chunk?)?;
    }
    debug!("response complete ({})", chunks.termination());
    drop(chunks);

    if let Err(err) = session.close() {
        debug!("close: {err}");
    }
    Ok(())
}
