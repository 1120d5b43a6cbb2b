//! Probe responder.

use std::net::SocketAddr;

use tokio::net::{ToSocketAddrs, UdpSocket};

use crate::error::Result;
use crate::protocol::timing::{ProbePacket, ProbeTimestamp};

/// Answers timing probes with its receive and transmit times.
///
/// An optional skew shifts every stamped time, which lets a single host
/// stand in for a remote clock that runs ahead or behind.
pub struct ProbeResponder {
    socket: UdpSocket,
    skew_micros: i64,
    recv_buf_size: usize,
    served: u64,
}

impl ProbeResponder {
    /// Bind the responder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SyncError::NetworkError`] if binding fails.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self::from_socket(socket))
    }

    /// Wrap an already bound socket.
    #[must_use]
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self {
            socket,
            skew_micros: 0,
            recv_buf_size: 64,
            served: 0,
        }
    }

    /// Offset every stamped time by `secs` seconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn with_skew(mut self, secs: f64) -> Self {
        self.skew_micros = if secs.is_finite() {
            (secs * 1e6).round() as i64
        } else {
            0
        };
        self
    }

    /// Set the receive buffer size (at least one probe packet).
    #[must_use]
    pub fn with_recv_buf_size(mut self, size: usize) -> Self {
        self.recv_buf_size = size.max(ProbePacket::SIZE);
        self
    }

    /// The bound address.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SyncError::NetworkError`] if the address is unavailable.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive buffer size.
    #[must_use]
    pub fn recv_buf_size(&self) -> usize {
        self.recv_buf_size
    }

    /// Probes answered so far.
    #[must_use]
    pub fn served(&self) -> u64 {
        self.served
    }

    /// Current time on the responder's (possibly skewed) clock.
    #[must_use]
    pub fn clock(&self) -> ProbeTimestamp {
        let now = i64::try_from(ProbeTimestamp::now().to_micros()).unwrap_or(i64::MAX);
        let skewed = now.saturating_add(self.skew_micros);
        ProbeTimestamp::from_micros(u64::try_from(skewed).unwrap_or(0))
    }

    /// Serve probes until `shutdown` is set or its sender is dropped.
    ///
    /// Malformed datagrams are logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SyncError::NetworkError`] if a socket operation fails.
    pub async fn run(&mut self, mut shutdown: tokio::sync::watch::Receiver<bool>) -> Result<()> {
        let mut buf = vec![0u8; self.recv_buf_size];
        tracing::info!(addr = ?self.socket.local_addr().ok(), "probe responder started");

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buf) => {
                    let (len, src) = result?;
                    let receive = self.clock();
                    self.handle_probe(&buf[..len], src, receive).await?;
                }

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!(served = self.served, "probe responder shutting down");
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    async fn handle_probe(
        &mut self,
        data: &[u8],
        src: SocketAddr,
        receive: ProbeTimestamp,
    ) -> Result<()> {
        let request = match ProbePacket::decode(data) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(%src, error = %e, "dropping malformed probe");
                return Ok(());
            }
        };

        let response = request.respond(receive, self.clock());
        self.socket.send_to(&response.encode(), src).await?;
        self.served += 1;
        tracing::debug!(%src, origin = %request.origin, "answered probe");
        Ok(())
    }
}
