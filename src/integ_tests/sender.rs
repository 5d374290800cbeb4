// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use super::env::{drain, init_log, ChannelSink, FailingSink, StalledSink};
use crate::{ErrorKind, FrameEncoder, FrameFields, PingConfig, PingSender};

fn reference_frame() -> Vec<u8> {
    let mut payload = b"PING".to_vec();
    payload.resize(132, 0);
    FrameEncoder::new(FrameFields::default())
        .encode(&payload)
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn send_configured_count() {
    init_log();
    let (sink, mut rx) = ChannelSink::new();
    let mut config = PingConfig::default();
    config.set_count(Some(3));

    let sender = PingSender::new(config, sink).unwrap();
    assert_eq!(sender.frame(), reference_frame().as_slice());

    let start = tokio::time::Instant::now();
    let stats = sender.run(std::future::pending()).await.unwrap();

    assert_eq!(stats.frames_sent, 3);
    assert_eq!(stats.bytes_sent, 3 * 174);
    // First frame immediately, then one per second
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(start.elapsed() < Duration::from_secs(3));

    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 3);
    for frame in frames {
        assert_eq!(frame, reference_frame());
    }
}

#[tokio::test(start_paused = true)]
async fn stop_spawned_task() {
    init_log();
    let (sink, mut rx) = ChannelSink::new();
    let mut config = PingConfig::new("eth0");
    config.set_interval(Duration::from_millis(100));

    let task = PingSender::new(config, sink).unwrap().spawn();
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!task.is_finished());

    let stats = task.stop().await.unwrap();
    assert_eq!(stats.frames_sent, 3);
    assert_eq!(drain(&mut rx).len(), 3);
}

#[tokio::test(start_paused = true)]
async fn stop_during_stalled_send() {
    init_log();
    let task = PingSender::new(PingConfig::default(), StalledSink)
        .unwrap()
        .spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!task.is_finished());

    let stats = tokio::time::timeout(Duration::from_secs(60), task.stop())
        .await
        .expect("stop() blocked by a pending send")
        .unwrap();
    assert_eq!(stats.frames_sent, 0);
}

#[tokio::test(start_paused = true)]
async fn drop_task_stops_sending() {
    init_log();
    let (sink, mut rx) = ChannelSink::new();
    let mut config = PingConfig::new("eth0");
    config.set_interval(Duration::from_millis(100));

    let task = PingSender::new(config, sink).unwrap().spawn();
    tokio::time::sleep(Duration::from_millis(250)).await;
    drop(task);
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(drain(&mut rx).len(), 3);
    // The task ended and dropped its sink
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn wait_for_count() {
    init_log();
    let (sink, mut rx) = ChannelSink::new();
    let mut config = PingConfig::default();
    config.set_count(Some(2)).set_marker_payload(b"HI", 0);

    let stats = PingSender::new(config, sink)
        .unwrap()
        .spawn()
        .wait()
        .await
        .unwrap();

    assert_eq!(stats.frames_sent, 2);
    assert_eq!(stats.bytes_sent, 2 * 44);
    let frames = drain(&mut rx);
    assert_eq!(frames.len(), 2);
    assert_eq!(&frames[0][42..], b"HI");
}

#[tokio::test(start_paused = true)]
async fn surface_send_failure() {
    init_log();
    let task = PingSender::new(PingConfig::default(), FailingSink::new(2))
        .unwrap()
        .spawn();

    let e = task.wait().await.unwrap_err();
    assert_eq!(e.kind(), ErrorKind::IoError);
    assert_eq!(e.msg(), "Network is down");
}

#[tokio::test(start_paused = true)]
async fn reject_invalid_config() {
    let (sink, _rx) = ChannelSink::new();
    let mut config = PingConfig::default();
    config.set_payload(&[0u8; 2000]);

    let e = PingSender::new(config, sink).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::InvalidArgument);
}
