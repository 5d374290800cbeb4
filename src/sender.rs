// SPDX-License-Identifier: Apache-2.0

use std::future::Future;

use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};

use crate::{
    inspect::FrameSummary, ErrorKind, FrameEncoder, FrameSink, PingConfig,
    PingError,
};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct PingStats {
    pub frames_sent: u64,
    pub bytes_sent: u64,
}

impl std::fmt::Display for PingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames sent, {} bytes",
            self.frames_sent, self.bytes_sent
        )
    }
}

/// Sends one pre-encoded frame to a [`FrameSink`] on a fixed interval.
#[derive(Debug)]
pub struct PingSender<S> {
    config: PingConfig,
    sink: S,
    frame: Vec<u8>,
}

impl<S> PingSender<S>
where
    S: FrameSink + Send + Sync + 'static,
{
    /// Validate the config and encode the frame. The same frame bytes are
    /// sent on every tick.
    pub fn new(config: PingConfig, sink: S) -> Result<Self, PingError> {
        config.validate()?;
        let encoder = FrameEncoder::new(config.fields().clone());
        let frame = encoder.encode(config.payload())?;
        match FrameSummary::parse(&frame) {
            Ok(summary) => log::debug!("Frame to send: {summary}"),
            Err(e) => log::debug!("Cannot summarize frame: {e}"),
        }
        Ok(Self {
            config,
            sink,
            frame,
        })
    }

    pub fn frame(&self) -> &[u8] {
        self.frame.as_slice()
    }

    pub fn config(&self) -> &PingConfig {
        &self.config
    }

    /// Send until `stop` resolves, the configured count is reached or the
    /// sink fails. The first frame goes out immediately.
    pub async fn run<F>(&self, stop: F) -> Result<PingStats, PingError>
    where
        F: Future<Output = ()>,
    {
        let mut stats = PingStats::default();
        let mut ticker = interval(self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(stop);

        log::debug!(
            "Sending {} bytes frame to {} every {:?}",
            self.frame.len(),
            self.config.iface_name(),
            self.config.interval()
        );
        loop {
            if let Some(count) = self.config.count() {
                if stats.frames_sent >= count {
                    log::debug!("Sent all {count} frames");
                    break;
                }
            }
            tokio::select! {
                _ = &mut stop => {
                    log::debug!("Stop requested");
                    break;
                }
                // `stop` also interrupts a send in progress
                result = async {
                    ticker.tick().await;
                    log::info!("ping");
                    self.sink.send(&self.frame).await
                } => {
                    result?;
                    stats.frames_sent += 1;
                    stats.bytes_sent += self.frame.len() as u64;
                }
            }
        }
        Ok(stats)
    }

    /// Run on the current tokio runtime in background.
    pub fn spawn(self) -> PingTask {
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            self.run(async move {
                // A dropped `PingTask` also stops the task
                let _ = stop_rx.await;
            })
            .await
        });
        PingTask {
            stop_tx,
            handle,
        }
    }
}

/// Handle of a spawned [`PingSender`].
#[derive(Debug)]
pub struct PingTask {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<Result<PingStats, PingError>>,
}

impl PingTask {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop sending and return what was sent so far.
    pub async fn stop(self) -> Result<PingStats, PingError> {
        let Self { stop_tx, handle } = self;
        // Fails only when the task already ended on its own
        let _ = stop_tx.send(());
        join(handle).await
    }

    /// Wait for the task to end on its own: count reached or send failure.
    pub async fn wait(self) -> Result<PingStats, PingError> {
        let Self { stop_tx, handle } = self;
        let ret = join(handle).await;
        drop(stop_tx);
        ret
    }
}

async fn join(
    handle: JoinHandle<Result<PingStats, PingError>>,
) -> Result<PingStats, PingError> {
    handle.await.map_err(|e| {
        let e = PingError::new(
            ErrorKind::Bug,
            format!("Transmission task failed: {e}"),
        );
        log::error!("{e}");
        e
    })?
}
