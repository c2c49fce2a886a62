// Listener module
// Creates the gateway's TCP listener

use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;

use crate::logger;

/// Pending connections the kernel queues before `accept`
const BACKLOG: i32 = 1024;

/// Create a `TcpListener` bound to `addr`.
///
/// `SO_REUSEADDR` lets a restarted server bind while old connections sit in
/// `TIME_WAIT`. `SO_REUSEPORT` is left off, so a second instance on the same
/// port fails with `AddrInUse` instead of silently sharing the port.
///
/// An unspecified IPv6 address (`[::]`) is bound dual-stack so IPv4 clients
/// are accepted too. Hosts without IPv6 fall back to `0.0.0.0` on the same
/// port; a port already in use is never retried.
///
/// Must be called from within a Tokio runtime.
pub fn create_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    match bind_socket(addr) {
        Err(e) if can_fall_back_to_ipv4(addr, &e) => {
            let fallback = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), addr.port());
            logger::log_warning(&format!("IPv6 bind on {addr} failed ({e}), using {fallback}"));
            bind_socket(fallback)
        }
        result => result,
    }
}

fn can_fall_back_to_ipv4(addr: SocketAddr, err: &io::Error) -> bool {
    addr.is_ipv6() && addr.ip().is_unspecified() && err.kind() != io::ErrorKind::AddrInUse
}

fn bind_socket(addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }

    // Required before handing the socket to tokio
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[tokio::test]
    async fn test_binds_ephemeral_port() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_unspecified_v6_accepts_ipv4_clients() {
        let listener = create_listener("[::]:0".parse().unwrap()).unwrap();
        let port = listener.local_addr().unwrap().port();

        let client = tokio::net::TcpStream::connect((Ipv4Addr::LOCALHOST, port));
        let (accepted, connected) = tokio::join!(listener.accept(), client);
        connected.unwrap();
        accepted.unwrap();
    }

    #[tokio::test]
    async fn test_second_bind_on_same_port_fails() {
        let first = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = first.local_addr().unwrap();

        let err = create_listener(addr).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AddrInUse);
    }
}
