use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use tracing::debug;

use crate::registry::RegistryEndpoint;

/// Send a single WHOIS query line to `endpoint` and return the raw reply.
///
/// The line terminator (CR LF) is appended here; the reply is everything the
/// peer sends until it closes the connection. Connect and every read/write
/// are bounded by `endpoint.timeout`. The payload is not interpreted in any
/// way.
pub fn query(endpoint: &RegistryEndpoint, query: &str) -> io::Result<String> {
    let addr = (endpoint.host.as_str(), endpoint.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {}", endpoint.address()),
            )
        })?;

    debug!("connecting to {} ({})", endpoint.address(), addr);

    let mut stream = TcpStream::connect_timeout(&addr, endpoint.timeout)?;
    stream.set_read_timeout(Some(endpoint.timeout))?;
    stream.set_write_timeout(Some(endpoint.timeout))?;

    stream.write_all(query.as_bytes())?;
    stream.write_all(b"\r\n")?;

    // Registries occasionally emit non-UTF-8 bytes in comment banners, so
    // decode lossily rather than failing the whole query.
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw)?;

    debug!("received {} bytes from {}", raw.len(), endpoint.host);
    Ok(String::from_utf8_lossy(&raw).into_owned())
}
