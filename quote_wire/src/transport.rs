//! Multicast UDP transport.
//!
//! `MulticastTransport` owns one datagram socket configured once at open time
//! (TTL, loopback, optional outgoing interface) and sends every record as a
//! single datagram to the configured group. Delivery is fire-and-forget: a
//! successful `send` only means the OS accepted the datagram.
//!
//! The transport is not synchronized. One handle is meant for one sender;
//! callers sharing it across threads must serialize access themselves.
use std::io::{self, ErrorKind};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};

use log::{debug, info};
use socket2::{Domain, Protocol, Socket, Type};

use crate::error::WireError;
use crate::net::TransportConfig;
use crate::result::Result;

/// Destination for encoded records.
pub trait DatagramSink {
    /// Sends `datagram` as one unit.
    fn send_datagram(&mut self, datagram: &[u8]) -> Result<()>;
}

/// UDP socket sending to one multicast group.
#[derive(Debug)]
pub struct MulticastTransport {
    socket: Option<UdpSocket>,
    target: SocketAddrV4,
}

impl MulticastTransport {
    /// Opens a transport for `config.group:config.port`.
    ///
    /// Fails with [`WireError::SocketSetup`] if the group is not an IPv4
    /// multicast address, the interface is not an IPv4 address, or the OS
    /// rejects the socket or one of its options.
    pub fn open(config: &TransportConfig) -> Result<Self> {
        let target_str = config.target();
        let setup = |source: io::Error| WireError::socket_setup(target_str.clone(), source);

        let group: Ipv4Addr = config.group.trim().parse().map_err(|_| {
            setup(io::Error::new(
                ErrorKind::InvalidInput,
                format!("{:?} is not an IPv4 address", config.group),
            ))
        })?;
        if !group.is_multicast() {
            return Err(setup(io::Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a multicast group address", group),
            )));
        }
        let interface = parse_interface(config.interface.as_deref()).map_err(setup)?;

        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(setup)?;
        socket.set_reuse_address(true).map_err(setup)?;
        let bind_addr = SocketAddrV4::new(interface.unwrap_or(Ipv4Addr::UNSPECIFIED), 0);
        socket.bind(&bind_addr.into()).map_err(setup)?;
        socket.set_multicast_ttl_v4(u32::from(config.ttl)).map_err(setup)?;
        socket.set_multicast_loop_v4(config.loopback).map_err(setup)?;
        if let Some(interface) = interface {
            socket.set_multicast_if_v4(&interface).map_err(setup)?;
        }
        let socket: UdpSocket = socket.into();

        info!(
            "Multicast transport open: {} -> {} (ttl={}, loopback={}, interface={})",
            socket.local_addr().map_err(setup)?,
            target_str,
            config.ttl,
            config.loopback,
            interface.map_or_else(|| "default".to_string(), |i| i.to_string())
        );

        Ok(MulticastTransport {
            socket: Some(socket),
            target: SocketAddrV4::new(group, config.port),
        })
    }

    /// Sends `record` as one datagram to the group.
    ///
    /// Fails with [`WireError::Transport`] if the transport is closed, the OS
    /// rejects the datagram, or it is only partially written.
    pub fn send(&self, record: &[u8]) -> Result<()> {
        let sent = self
            .open_socket()?
            .send_to(record, self.target)
            .map_err(WireError::Transport)?;
        if sent != record.len() {
            return Err(WireError::Transport(io::Error::new(
                ErrorKind::WriteZero,
                format!("short datagram: {} of {} bytes sent", sent, record.len()),
            )));
        }
        debug!("Sent {} bytes to {}", sent, self.target);
        Ok(())
    }

    /// Releases the socket. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.socket.take().is_some() {
            info!("Multicast transport to {} closed", self.target);
        }
    }

    /// Whether the socket is still held.
    pub fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    /// Group address and port datagrams are sent to.
    pub fn target(&self) -> SocketAddrV4 {
        self.target
    }

    /// Local address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.open_socket()?.local_addr().map_err(WireError::Transport)
    }

    /// TTL currently set on the socket.
    pub fn multicast_ttl(&self) -> Result<u32> {
        self.open_socket()?.multicast_ttl_v4().map_err(WireError::Transport)
    }

    fn open_socket(&self) -> Result<&UdpSocket> {
        self.socket.as_ref().ok_or_else(|| {
            WireError::Transport(io::Error::new(
                ErrorKind::NotConnected,
                "multicast transport is closed",
            ))
        })
    }
}

impl DatagramSink for MulticastTransport {
    fn send_datagram(&mut self, datagram: &[u8]) -> Result<()> {
        self.send(datagram)
    }
}

impl Drop for MulticastTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn parse_interface(interface: Option<&str>) -> io::Result<Option<Ipv4Addr>> {
    match interface.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            io::Error::new(
                ErrorKind::InvalidInput,
                format!("{:?} is not an IPv4 interface address", raw),
            )
        }),
    }
}
