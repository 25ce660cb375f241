use std::fmt::Write;

use crate::error::Result;

/// Build the request bytes for `GET path` against `host`.
///
/// `Connection: close` tells the origin to shut the transport down after
/// responding, which is what lets the receive loop treat peer-close as
/// end-of-response instead of parsing framing headers. Input hygiene
/// (leading `/`, no control bytes in the host) is the caller's concern.
pub fn format(host: &str, path: &str) -> Result<Vec<u8>> {
    let mut req = String::with_capacity(48 + host.len() + path.len());
    write!(
        req,
        "GET {path} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n"
    )?;
    Ok(req.into_bytes())
}
