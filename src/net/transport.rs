//! Probe transports.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::error::{Result, SyncError};
use crate::estimate::Measurement;
use crate::protocol::timing::{ProbePacket, ProbeTimestamp};

/// Source of one measurement per call.
///
/// Implementations issue exactly one probe per call and do not retry; a
/// lost or late reply surfaces as an error and the caller drops the round.
#[async_trait]
pub trait ProbeTransport: Send {
    /// Perform one probe round trip.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Timeout`] if no matching reply arrives in time,
    /// or [`SyncError::NetworkError`] if the socket fails.
    async fn probe(&mut self) -> Result<Measurement>;
}

/// Probes a single responder over UDP.
pub struct UdpProbeTransport {
    socket: UdpSocket,
    peer: SocketAddr,
    timeout: Duration,
    recv_buf: Vec<u8>,
}

impl UdpProbeTransport {
    /// Default receive buffer size.
    pub const DEFAULT_RECV_BUF_SIZE: usize = 64;

    /// Bind an ephemeral local port and connect it to `peer`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NetworkError`] if binding or connecting fails.
    pub async fn connect(peer: SocketAddr, timeout: Duration) -> Result<Self> {
        let local = if peer.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await?;
        Self::from_socket(socket, peer, timeout).await
    }

    /// Use an existing socket, connecting it to `peer`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NetworkError`] if connecting fails.
    pub async fn from_socket(socket: UdpSocket, peer: SocketAddr, timeout: Duration) -> Result<Self> {
        socket.connect(peer).await?;
        Ok(Self {
            socket,
            peer,
            timeout,
            recv_buf: vec![0u8; Self::DEFAULT_RECV_BUF_SIZE],
        })
    }

    /// Set the receive buffer size (at least one probe packet).
    #[must_use]
    pub fn with_recv_buf_size(mut self, size: usize) -> Self {
        self.recv_buf = vec![0u8; size.max(ProbePacket::SIZE)];
        self
    }

    /// The responder being probed.
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// The local socket address.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NetworkError`] if the address is unavailable.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive buffer size.
    #[must_use]
    pub fn recv_buf_size(&self) -> usize {
        self.recv_buf.len()
    }

    /// Per-probe timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl ProbeTransport for UdpProbeTransport {
    async fn probe(&mut self) -> Result<Measurement> {
        let origin = ProbeTimestamp::now();
        let request = ProbePacket::request(origin);
        self.socket.send(&request.encode()).await?;

        let deadline = tokio::time::Instant::now() + self.timeout;
        loop {
            let len = tokio::time::timeout_at(deadline, self.socket.recv(&mut self.recv_buf))
                .await
                .map_err(|_| SyncError::Timeout)??;
            let destination = ProbeTimestamp::now();

            match ProbePacket::decode(&self.recv_buf[..len]) {
                Ok(response) if response.origin == origin => {
                    return Ok(Measurement::from_response(&response, destination));
                }
                Ok(response) => {
                    // Late reply to an earlier probe.
                    tracing::debug!(
                        peer = %self.peer,
                        origin = %response.origin,
                        "ignoring stale probe reply"
                    );
                }
                Err(e) => {
                    tracing::warn!(peer = %self.peer, error = %e, "malformed probe reply");
                }
            }
        }
    }
}
