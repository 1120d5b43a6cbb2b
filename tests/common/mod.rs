//! Common test utilities and fixtures
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Once;

use clockquorum::ProbeResponder;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialize test logging (call once per test module)
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env()
            .add_directive("clockquorum=debug".parse().unwrap());

        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// A responder running on loopback in the background
pub struct LoopbackResponder {
    pub addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<(ProbeResponder, clockquorum::Result<()>)>,
}

impl LoopbackResponder {
    /// Start a responder whose clock runs `skew` seconds ahead
    pub async fn start(skew: f64) -> Self {
        let responder = ProbeResponder::bind("127.0.0.1:0")
            .await
            .unwrap()
            .with_skew(skew);
        let addr = responder.local_addr().unwrap();

        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut responder = responder;
            let result = responder.run(rx).await;
            (responder, result)
        });

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    /// Stop the responder and return it
    pub async fn stop(self) -> ProbeResponder {
        self.shutdown.send(true).unwrap();
        let (responder, result) = self.handle.await.unwrap();
        result.unwrap();
        responder
    }
}
