use std::net::{SocketAddr, ToSocketAddrs};

use log::debug;

use crate::error::{Error, Result};

// service database reduced to what this tool meaningfully reaches;
// anything else must be a numeric port.
fn service_port(service: &str) -> Option<u16> {
    match service {
        "https" => Some(443),
        "http" => Some(80),
        _ => service.parse().ok(),
    }
}

/// Resolve `host` + `service` into an ordered candidate list.
///
/// Candidate order is whatever the system resolver returns; an empty result
/// counts as a resolution failure.
pub fn resolve(host: &str, service: &str) -> Result<Vec<SocketAddr>> {
    if host.is_empty() || service.is_empty() {
        return Err(resolution(host, service, "empty host or service"));
    }
    let port = match service_port(service) {
        Some(port) => port,
        None => return Err(resolution(host, service, "unknown service")),
    };

    lookup((host, port), host, service)
}

fn lookup(target: impl ToSocketAddrs, host: &str, service: &str) -> Result<Vec<SocketAddr>> {
    let candidates: Vec<SocketAddr> = target
        .to_socket_addrs()
        .map_err(|err| resolution(host, service, err.to_string()))?
        .collect();
    if candidates.is_empty() {
        return Err(resolution(host, service, "name resolved to no addresses"));
    }

    debug!("{host}:{service}: {} candidate(s)", candidates.len());
    Ok(candidates)
}

fn resolution(host: &str, service: &str, cause: impl Into<String>) -> Error {
    Error::Resolution {
        host: host.to_owned(),
        service: service.to_owned(),
        cause: cause.into(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn service_names_map_to_ports() {
        assert_eq!(service_port("https"), Some(443));
        assert_eq!(service_port("http"), Some(80));
        assert_eq!(service_port("8443"), Some(8443));
        assert_eq!(service_port("gopher"), None);
    }

    #[test]
    fn numeric_host_resolves_without_dns() {
        let candidates = resolve("127.0.0.1", "https").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].port(), 443);
        assert!(candidates[0].is_ipv4());
    }

    #[test]
    fn empty_input_is_a_resolution_error() {
        assert!(matches!(resolve("", "https"), Err(Error::Resolution { .. })));
        assert!(matches!(
            resolve("localhost", ""),
            Err(Error::Resolution { .. })
        ));
    }

    #[test]
    fn empty_resolver_result_is_a_resolution_error() {
        let none: &[SocketAddr] = &[];
        let err = lookup(none, "example.test", "https").unwrap_err();
        match err {
            Error::Resolution { cause, .. } => {
                assert_eq!(cause, "name resolved to no addresses")
            }
            other => panic!("expected resolution error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_service_is_a_resolution_error() {
        let err = resolve("127.0.0.1", "gopher").unwrap_err();
        match err {
            Error::Resolution { cause, .. } => assert_eq!(cause, "unknown service"),
            other => panic!("expected resolution error, got {other:?}"),
        }
    }
}
