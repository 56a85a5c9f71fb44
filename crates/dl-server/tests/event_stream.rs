//! End-to-end event streaming through the gateway.

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use dl_proto::Event;
use dl_server::{router, ControlService, GatewayOptions, ServerConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

fn ids_in(text: &str) -> Vec<u64> {
    text.lines()
        .filter_map(|line| line.strip_prefix("id:"))
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}

async fn read_until(stream: &mut TcpStream, buf: &mut String, done: impl Fn(&str) -> bool) {
    let mut chunk = [0u8; 4096];
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(buf) {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.push_str(&String::from_utf8_lossy(&chunk[..n]));
        }
    })
    .await
    .expect("timed out waiting for stream data");
}

#[tokio::test]
async fn live_stream_over_tcp_replays_then_tails() {
    let mut config = ServerConfig::default();
    config.session.artifacts = vec!["app".to_string()];
    let service = ControlService::from_config(&config);

    service.append(Event::build("app", "In Progress")).unwrap();
    service.append(Event::build("app", "Complete")).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = {
        let service = service.clone();
        let on_stop = service.clone();
        tokio::spawn(dl_server::serve(
            listener,
            service,
            GatewayOptions::from_config(&config),
            async move {
                let _ = stop_rx.await;
                on_stop.shutdown("Completed").unwrap();
            },
        ))
    };

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /v2/events HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut buf = String::new();
    read_until(&mut stream, &mut buf, |b| ids_in(b).contains(&1)).await;
    assert!(buf.starts_with("HTTP/1.1 200"));
    assert!(buf.to_ascii_lowercase().contains("text/event-stream"));

    // Live tail.
    service.append(Event::deploy("In Progress")).unwrap();
    service.append(Event::deploy("Complete")).unwrap();
    read_until(&mut stream, &mut buf, |b| ids_in(b).contains(&3)).await;

    // Ending the session appends termination and closes the stream.
    stop_tx.send(()).unwrap();
    read_until(&mut stream, &mut buf, |_| false).await;

    assert_eq!(ids_in(&buf), vec![0, 1, 2, 3, 4]);
    assert!(buf.contains("terminationEvent"));
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn lagging_sse_client_gets_final_lagged_event() {
    let mut config = ServerConfig::default();
    config.events.max_pending = Some(1);
    let service = ControlService::from_config(&config);
    let app = router(service.clone(), GatewayOptions::from_config(&config));

    let resp = app
        .oneshot(Request::builder().uri("/v2/events").body(Body::empty()).unwrap())
        .await
        .unwrap();

    // Nobody reads the body yet, so the queue fills past its bound.
    for i in 0..3 {
        service.append(Event::dev_loop(i, "In Progress")).unwrap();
    }

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert_eq!(ids_in(&text), vec![0]);
    assert!(text.contains("event: lagged") || text.contains("event:lagged"));
    assert!(text.contains("\"lastDelivered\":0"));

    // The writer was never affected.
    assert_eq!(service.hub().len().unwrap(), 3);
    assert_eq!(service.hub().subscriber_count().unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn observers_joining_mid_run_see_contiguous_log() {
    let service = ControlService::from_config(&ServerConfig::default());
    let producer = {
        let service = service.clone();
        tokio::spawn(async move {
            for i in 0..500 {
                service.append(Event::dev_loop(i, "In Progress")).unwrap();
                if i % 50 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        })
    };

    let mut observers = Vec::new();
    for _ in 0..4 {
        let sub = service.events().unwrap();
        observers.push(tokio::spawn(async move {
            let mut sub = sub;
            let mut seen = Vec::new();
            while let Some(entry) = sub.recv().await.unwrap() {
                seen.push(entry.sequence);
            }
            seen
        }));
        tokio::task::yield_now().await;
    }

    producer.await.unwrap();
    service.shutdown("Completed").unwrap();

    let total = service.hub().len().unwrap() as u64;
    for observer in observers {
        let seen = observer.await.unwrap();
        assert_eq!(seen, (0..total).collect::<Vec<_>>());
    }
}
