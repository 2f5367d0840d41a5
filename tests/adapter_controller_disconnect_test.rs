use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use card_crush::adapter::{
    create_tap, run_server, AdapterStats, CommandRouter, InboundCommand, OutboundMessage,
    ServerConfig, PROTOCOL_VERSION,
};
use card_crush::core::{Session, SessionSnapshot};

const TIMEOUT: Duration = Duration::from_secs(2);

async fn start_server() -> (SocketAddr, Arc<AdapterStats>) {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    let stats = Arc::new(AdapterStats::default());

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_stats = Arc::clone(&stats);
    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx), Some(server_stats)).await;
    });
    tokio::spawn(async move {
        let mut session = Session::new("abc").unwrap();
        let mut router = CommandRouter::new();
        let mut snap = SessionSnapshot::default();
        while let Some(inbound) = cmd_rx.recv().await {
            router.handle(inbound, &mut session, &mut snap, &out_tx);
        }
    });

    let addr = tokio::time::timeout(TIMEOUT, ready_rx).await.unwrap().unwrap();
    (addr, stats)
}

struct Client {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let (read_half, writer) = TcpStream::connect(addr).await.unwrap().into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send(&mut self, value: &impl serde::Serialize) {
        let mut line = serde_json::to_string(value).unwrap();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(TIMEOUT, self.lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    async fn hello(&mut self) -> Value {
        self.send(&json!({
            "type": "hello",
            "seq": 1,
            "ts": 0,
            "client": { "name": "disconnect-test", "version": "0" },
            "protocol_version": PROTOCOL_VERSION,
            "requested": { "stream_observations": false },
        }))
        .await;
        self.recv().await
    }
}

async fn wait_for_controller(stats: &AdapterStats, expected: Option<u64>) {
    for _ in 0..100 {
        if stats.controller_id() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "controller is {:?}, expected {:?}",
        stats.controller_id(),
        expected
    );
}

#[tokio::test]
async fn controller_disconnect_promotes_next_client() {
    let (addr, stats) = start_server().await;

    let mut first = Client::connect(addr).await;
    assert_eq!(first.hello().await["role"], "controller");

    let mut second = Client::connect(addr).await;
    assert_eq!(second.hello().await["role"], "observer");
    assert_eq!(stats.client_count(), 2);

    second.send(&create_tap(2, 0, 0)).await;
    assert_eq!(second.recv().await["code"], "not_controller");

    drop(first);
    wait_for_controller(&stats, Some(2)).await;
    assert_eq!(stats.client_count(), 1);

    second.send(&create_tap(3, 0, 0)).await;
    let ack = second.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 3);
}

#[tokio::test]
async fn promotion_skips_clients_without_handshake() {
    let (addr, stats) = start_server().await;

    let mut first = Client::connect(addr).await;
    first.hello().await;
    // Connected, never says hello.
    let _silent = Client::connect(addr).await;
    let mut third = Client::connect(addr).await;
    assert_eq!(third.hello().await["client_id"], 3);

    drop(first);
    wait_for_controller(&stats, Some(3)).await;

    drop(third);
    wait_for_controller(&stats, None).await;
    assert_eq!(stats.client_count(), 0);
}
