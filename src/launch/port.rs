//! Port availability check before spawning the server

use std::io;
use std::net::TcpListener;

use crate::error::{self, Result};

/// Bind address used when none is configured
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Fail with `PortInUse` when `address:port` cannot be bound
///
/// The test listener is dropped immediately. There is a window between the
/// check and the server's own bind; a bind failure there shows up in the
/// server's exit code.
pub fn ensure_port_free(address: &str, port: u16) -> Result<()> {
    match TcpListener::bind((address, port)) {
        Ok(listener) => {
            drop(listener);
            tracing::debug!(%address, port, "port is free");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            Err(error::launch::port_in_use(port, address))
        }
        Err(e) => Err(error::launch::failed(
            format!("bind {address}:{port}"),
            e.to_string(),
        )),
    }
}

/// Whether `address:port` can be bound right now
pub fn is_port_free(address: &str, port: u16) -> bool {
    TcpListener::bind((address, port)).is_ok()
}
