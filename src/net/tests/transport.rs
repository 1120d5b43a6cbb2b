use std::time::Duration;

use tokio::net::UdpSocket;

use crate::error::SyncError;
use crate::net::{ProbeTransport, UdpProbeTransport};
use crate::protocol::timing::{ProbePacket, ProbeTimestamp};

/// Receive one request on `server` and answer it with each of `replies`,
/// built from the request.
async fn answer_with(server: &UdpSocket, replies: impl Fn(ProbePacket) -> Vec<Vec<u8>>) {
    let mut buf = [0u8; 64];
    let (len, src) = server.recv_from(&mut buf).await.unwrap();
    let request = ProbePacket::decode(&buf[..len]).unwrap();
    for reply in replies(request) {
        server.send_to(&reply, src).await.unwrap();
    }
}

// ===== Construction =====

#[tokio::test]
async fn test_connect_reports_addresses() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let peer = server.local_addr().unwrap();

    let transport = UdpProbeTransport::connect(peer, Duration::from_millis(250))
        .await
        .unwrap();
    assert_eq!(transport.peer_addr(), peer);
    assert!(transport.local_addr().unwrap().is_ipv4());
    assert_eq!(transport.timeout(), Duration::from_millis(250));
    assert_eq!(
        transport.recv_buf_size(),
        UdpProbeTransport::DEFAULT_RECV_BUF_SIZE
    );
}

#[tokio::test]
async fn test_recv_buf_size_holds_a_packet() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let peer = server.local_addr().unwrap();

    let small = UdpProbeTransport::connect(peer, Duration::from_secs(1))
        .await
        .unwrap()
        .with_recv_buf_size(4);
    assert_eq!(small.recv_buf_size(), ProbePacket::SIZE);

    let large = UdpProbeTransport::connect(peer, Duration::from_secs(1))
        .await
        .unwrap()
        .with_recv_buf_size(256);
    assert_eq!(large.recv_buf_size(), 256);
}

// ===== Reply matching =====

#[tokio::test]
async fn test_probe_skips_stale_and_malformed_replies() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let mut transport =
        UdpProbeTransport::connect(server.local_addr().unwrap(), Duration::from_secs(2))
            .await
            .unwrap();

    let responder = async {
        answer_with(&server, |request| {
            let stale = ProbePacket::request(ProbeTimestamp::new(1, 0))
                .respond(ProbeTimestamp::new(400, 0), ProbeTimestamp::new(400, 5));
            let current =
                request.respond(ProbeTimestamp::new(500, 0), ProbeTimestamp::new(500, 10));
            vec![
                stale.encode().to_vec(),
                vec![0xAB; 5],
                current.encode().to_vec(),
            ]
        })
        .await;
    };

    let (measurement, ()) = tokio::join!(transport.probe(), responder);
    let measurement = measurement.unwrap();

    assert_eq!(measurement.receive, ProbeTimestamp::new(500, 0));
    assert_eq!(measurement.transmit, ProbeTimestamp::new(500, 10));
    assert!(measurement.destination >= measurement.origin);
}

#[tokio::test]
async fn test_probe_times_out_on_malformed_replies_only() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let mut transport =
        UdpProbeTransport::connect(server.local_addr().unwrap(), Duration::from_millis(200))
            .await
            .unwrap();

    let responder = answer_with(&server, |_| vec![vec![0u8; 12], vec![0xFF; ProbePacket::SIZE]]);

    let (result, ()) = tokio::join!(transport.probe(), responder);
    assert!(matches!(result, Err(SyncError::Timeout)));
}
