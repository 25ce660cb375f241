use std::io::{Read, Write};

use crate::error::{classify, Class, Error, Result};

/// read granularity for the response stream
pub const CHUNK_LEN: usize = 255;

/// Write the whole request out, including anything the TLS layer buffered.
pub fn send<S: Write>(stream: &mut S, request: &[u8]) -> Result<()> {
    stream.write_all(request).map_err(write_error)?;
    stream.flush().map_err(write_error)
}

fn write_error(source: std::io::Error) -> Error {
    Error::Write {
        class: classify(&source),
        source,
    }
}

/// Lazy single-pass sequence of response chunks, ending exactly once when
/// the peer closes.
pub fn receive<R: Read>(stream: R) -> Chunks<R> {
    Chunks {
        stream,
        terminal: Class::None,
    }
}

pub struct Chunks<R: Read> {
    stream: R,
    terminal: Class,
}

impl<R: Read> Chunks<R> {
    /// How the sequence ended; `Class::None` while chunks remain. A clean
    /// close reports `Class::PeerClosed`.
    pub fn termination(&self) -> Class {
        self.terminal
    }
}

impl<R: Read> Iterator for Chunks<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Result<Vec<u8>>> {
        if self.terminal != Class::None {
            return None;
        }
        let mut buf = [0u8; CHUNK_LEN];
        loop {
            match self.stream.read(&mut buf) {
                Ok(0) => {
                    self.terminal = Class::PeerClosed;
                    return None;
                }
                Ok(n) => return Some(Ok(buf[..n].to_vec())),
                Err(source) => match classify(&source) {
                    // close without close_notify still ends the response
                    Class::PeerClosed => {
                        self.terminal = Class::PeerClosed;
                        return None;
                    }
                    Class::WantIo => continue,
                    class => {
                        self.terminal = class;
                        return Some(Err(Error::Read { class, source }));
                    }
                },
            }
        }
    }
}
