use std::net::{SocketAddr, TcpStream};

use log::debug;

use crate::error::{Error, Result};

/// Try each candidate in order and keep the first connection that succeeds.
///
/// A candidate that refuses or errors is released and skipped; only full
/// exhaustion is an error. `TcpStream::connect` owns socket creation and
/// cleanup on failure, so nothing leaks from the skipped attempts.
pub fn establish(candidates: &[SocketAddr]) -> Result<TcpStream> {
    let mut last: Option<std::io::Error> = None;
    for addr in candidates {
        match TcpStream::connect(addr) {
            Ok(stream) => {
                debug!("connected to {addr}");
                return Ok(stream);
            }
            Err(err) => {
                debug!("connect {addr}: {err}");
                last = Some(err);
            }
        }
    }
    Err(Error::Connection {
        attempts: candidates.len(),
        cause: match last {
            Some(err) => err.to_string(),
            None => "no candidates".to_owned(),
        },
    })
}
