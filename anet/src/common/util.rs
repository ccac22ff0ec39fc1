use crate::Value;
use anyhow::{bail, Result};
use std::net::{IpAddr, ToSocketAddrs};

///
///
///
pub fn lookup_ip<S: AsRef<str>>(host: S) -> Result<IpAddr> {
    let host = host.as_ref();

    // First, try to parse host as an IP literal.
    if let Ok(ip) = host.parse() {
        return Ok(ip);
    }

    // Otherwise, host is probably a domain name. IPv4 is preferred.
    let addresses: Vec<IpAddr> = (host, 0u16).to_socket_addrs()?.map(|a| a.ip()).collect();
    match addresses.iter().find(|ip| ip.is_ipv4()) {
        Some(ip) => Ok(*ip),
        None => match addresses[..] {
            [first, ..] => Ok(first),
            [] => bail!("Domain name didn't resolve to an IP address."),
        },
    }
}

/// Parses a caller-supplied value as a CLI argument value: `nil`, booleans,
/// integers and floats are recognized, anything else is text.
pub fn parse_literal(literal: &str) -> Value {
    match literal {
        "nil" => Value::Nil,
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => {
            if let Ok(integer) = literal.parse::<i64>() {
                Value::Integer(integer)
            } else if let Ok(number) = literal.parse::<f64>() {
                Value::Number(number)
            } else {
                Value::Text(literal.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_pass_through() {
        assert_eq!(lookup_ip("127.0.0.1").unwrap().to_string(), "127.0.0.1");
        assert_eq!(lookup_ip("::1").unwrap().to_string(), "::1");
    }

    #[test]
    fn localhost_resolves() {
        assert!(lookup_ip("localhost").unwrap().is_loopback());
    }

    #[test]
    fn garbage_does_not_resolve() {
        assert!(lookup_ip("").is_err());
        assert!(lookup_ip("no such host.invalid").is_err());
    }

    #[test]
    fn parses_cli_literals() {
        assert_eq!(parse_literal("nil"), Value::Nil);
        assert_eq!(parse_literal("true"), Value::Boolean(true));
        assert_eq!(parse_literal("8080"), Value::Integer(8080));
        assert_eq!(parse_literal("1.5"), Value::Number(1.5));
        assert_eq!(parse_literal("localhost"), Value::Text("localhost".into()));
    }
}
