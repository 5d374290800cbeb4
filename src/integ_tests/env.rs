// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use crate::{ErrorKind, FrameSink, PingError};

pub(crate) fn init_log() {
    let _ = env_logger::Builder::new()
        .filter(Some("ethping"), log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// Forwards every sent frame to a channel.
#[derive(Debug)]
pub(crate) struct ChannelSink {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelSink {
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl FrameSink for ChannelSink {
    async fn send(&self, frame: &[u8]) -> Result<(), PingError> {
        self.tx.send(frame.to_vec()).map_err(|e| {
            PingError::new(ErrorKind::IoError, format!("Channel closed: {e}"))
        })
    }
}

/// Accepts `remaining` frames, then fails every send like a downed link.
#[derive(Debug)]
pub(crate) struct FailingSink {
    remaining: AtomicU64,
}

impl FailingSink {
    pub(crate) fn new(remaining: u64) -> Self {
        Self {
            remaining: AtomicU64::new(remaining),
        }
    }
}

impl FrameSink for FailingSink {
    async fn send(&self, _frame: &[u8]) -> Result<(), PingError> {
        if self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |r| {
                r.checked_sub(1)
            })
            .is_ok()
        {
            Ok(())
        } else {
            Err(PingError::new(
                ErrorKind::IoError,
                "Network is down".to_string(),
            ))
        }
    }
}

/// Never completes a send, like a socket that never becomes writable.
#[derive(Debug)]
pub(crate) struct StalledSink;

impl FrameSink for StalledSink {
    async fn send(&self, _frame: &[u8]) -> Result<(), PingError> {
        std::future::pending().await
    }
}

pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<Vec<u8>>) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(frame);
    }
    frames
}
