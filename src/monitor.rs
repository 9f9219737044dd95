use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::AgentApi;
use crate::config::MonitorConfig;
use crate::types::{AlarmState, Instance, MonitorSnapshot, MonitorStatus, TelemetryState};

/// Handle to the telemetry polling task of a single instance.
///
/// Spawning issues an immediate poll; afterwards the task sleeps for the
/// configured interval between polls, so polls never overlap and a slow
/// agent stretches the cadence instead of piling up requests. A failed poll
/// flips the feed to [`MonitorStatus::Error`] and keeps polling at the same
/// interval.
///
/// Dropping the handle (or calling [`stop`](Self::stop)) cancels the task.
/// A request still in flight at that moment is abandoned; its response
/// never reaches the published state.
pub struct TelemetryMonitor {
    instance: watch::Sender<Instance>,
    state_rx: watch::Receiver<TelemetryState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl TelemetryMonitor {
    /// Starts polling the instance's telemetry.
    pub fn spawn(instance: Instance, api: Arc<dyn AgentApi>, cfg: &MonitorConfig) -> Self {
        let uuid = instance.uuid;
        let (instance_tx, _) = watch::channel(instance);
        let (state_tx, state_rx) = watch::channel(TelemetryState::default());
        let cancel = CancellationToken::new();

        let cancel_child = cancel.clone();
        let interval = cfg.poll_interval();
        let task = tokio::spawn(poll_loop(api, uuid, state_tx, cancel_child, interval));

        Self { instance: instance_tx, state_rx, cancel, task }
    }

    /// Latest feed state with alarms evaluated against the current instance
    /// record. Alarms are computed here, per read, never stored.
    pub fn snapshot(&self) -> MonitorSnapshot {
        let instance = self.instance.borrow().clone();
        let state = self.state_rx.borrow().clone();
        let alarms = state
            .sample
            .as_ref()
            .map(|sample| AlarmState::evaluate(&instance.limits, sample))
            .unwrap_or_default();
        MonitorSnapshot { instance, status: state.status, sample: state.sample, alarms }
    }

    /// Replaces the instance record, e.g. after the panel pushed new limits
    /// or flags. The identity must stay the same; the poll target does not
    /// change.
    pub fn set_instance(&self, instance: Instance) {
        self.instance.send_replace(instance);
    }

    pub fn instance(&self) -> Instance {
        self.instance.borrow().clone()
    }

    /// Subscribes to feed changes. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<TelemetryState> {
        self.state_rx.clone()
    }

    /// Stream of feed changes for reactive consumers.
    pub fn updates(&self) -> WatchStream<TelemetryState> {
        WatchStream::new(self.state_rx.clone())
    }

    /// Stops the polling task. Idempotent; also happens on drop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TelemetryMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// The polling loop. Sole writer of the feed state.
///
/// Both the in-flight request and the interval sleep are raced against the
/// cancellation token, so teardown takes effect mid-poll and mid-sleep
/// alike. Cancellation wins every race and is re-checked before a response
/// is applied.
async fn poll_loop(
    api: Arc<dyn AgentApi>,
    instance: Uuid,
    state: watch::Sender<TelemetryState>,
    cancel: CancellationToken,
    interval: Duration,
) {
    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            res = api.fetch_telemetry(instance) => res,
        };
        // Ein Ergebnis, das zeitgleich mit stop() eintrifft, wird verworfen
        if cancel.is_cancelled() {
            break;
        }

        match result {
            Ok(sample) => {
                state.send_modify(|s| {
                    s.status = MonitorStatus::Ready;
                    s.sample = Some(sample);
                });
            }
            Err(e) => {
                warn!("telemetry poll for {} failed: {}", instance, e);
                // Der letzte Messwert bleibt erhalten
                state.send_modify(|s| s.status = MonitorStatus::Error);
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = sleep(interval) => {}
        }
    }
    debug!("telemetry monitor for {} stopped", instance);
}
