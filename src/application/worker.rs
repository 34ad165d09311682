//! Refresh worker: runs the monitor cycle on a fixed cadence.
//!
//! The cycle runs on one background thread that owns the service (and with
//! it the cache); the presentation boundary talks to it through a shared
//! profile slot and an update channel, so a slow network round-trip never
//! blocks the presenter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::{CycleOutcome, HealthReport, MonitorService};
use crate::domain::PersonalProfile;
use crate::ports::{FeedSource, RiskModel};

/// Default pause between cycle completions.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Granularity of the shutdown check while sleeping between cycles.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// One cycle's outcome as delivered to the presentation boundary.
#[derive(Debug, Clone)]
pub enum MonitorUpdate {
    /// A verdict was produced for a served reading
    Report(HealthReport),
    /// No fresh reading and the cache has never been filled
    NoData,
    /// The scaler/model pair failed; no verdict exists for this cycle
    InferenceFailed(String),
}

/// Handle to a running refresh worker.
pub struct RefreshWorkerHandle {
    /// Receiver for per-cycle updates
    pub updates: Receiver<MonitorUpdate>,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl RefreshWorkerHandle {
    /// Try to receive the next update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<MonitorUpdate> {
        self.updates.try_recv().ok()
    }

    /// Request a stop and wait for the thread to finish its cycle.
    pub fn shutdown(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }
}

/// Worker that re-runs the monitor cycle until shut down.
pub struct RefreshWorker;

impl RefreshWorker {
    /// Spawn the refresh loop on a background thread.
    ///
    /// The profile slot is re-read at the start of every cycle, so the
    /// presenter may change it between cycles without restarting the
    /// worker.
    pub fn spawn<F, M>(
        service: MonitorService<F, M>,
        profile: Arc<Mutex<PersonalProfile>>,
        interval: Duration,
    ) -> RefreshWorkerHandle
    where
        F: FeedSource + 'static,
        M: RiskModel + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            Self::run_loop(service, profile, interval, &tx, &stop_flag);
        });

        RefreshWorkerHandle {
            updates: rx,
            stop,
            handle,
        }
    }

    fn run_loop<F, M>(
        mut service: MonitorService<F, M>,
        profile: Arc<Mutex<PersonalProfile>>,
        interval: Duration,
        tx: &Sender<MonitorUpdate>,
        stop: &AtomicBool,
    ) where
        F: FeedSource,
        M: RiskModel,
    {
        while !stop.load(Ordering::Relaxed) {
            let current_profile = match profile.lock() {
                Ok(guard) => guard.clone(),
                Err(_) => {
                    tracing::error!("Profile lock poisoned, stopping refresh loop");
                    break;
                }
            };

            let update = match service.run_cycle(&current_profile) {
                Ok(CycleOutcome::Report(report)) => MonitorUpdate::Report(report),
                Ok(CycleOutcome::NoData) => MonitorUpdate::NoData,
                Err(e) => {
                    tracing::error!(error = %e, "Inference failed, no verdict this cycle");
                    MonitorUpdate::InferenceFailed(e.to_string())
                }
            };

            // A closed receiver means the presenter is gone.
            if tx.send(update).is_err() {
                break;
            }

            Self::interruptible_sleep(interval, stop);
        }
    }

    /// Sleep in short slices so shutdown stays responsive.
    fn interruptible_sleep(interval: Duration, stop: &AtomicBool) {
        let mut remaining = interval;
        while !remaining.is_zero() && !stop.load(Ordering::Relaxed) {
            let slice = remaining.min(SLEEP_SLICE);
            thread::sleep(slice);
            remaining = remaining.saturating_sub(slice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureVector, Gender, RiskVerdict, FEATURE_COUNT};
    use crate::ports::{FeedEntry, FeedResponse, FetchError, InferenceError};
    use std::time::Instant;

    struct ConstantFeed;

    impl FeedSource for ConstantFeed {
        fn fetch(&self) -> Result<FeedResponse, FetchError> {
            Ok(FeedResponse {
                feeds: vec![FeedEntry {
                    created_at: Some("2024-03-01T10:00:00Z".to_string()),
                    heart_rate: Some("78".to_string()),
                    o2_saturation: Some("97".to_string()),
                    body_temperature: Some("36.6".to_string()),
                }],
            })
        }
    }

    struct AlwaysLow;

    impl RiskModel for AlwaysLow {
        fn transform(
            &self,
            features: &FeatureVector,
        ) -> Result<[f64; FEATURE_COUNT], InferenceError> {
            Ok(*features.as_slice())
        }

        fn predict(&self, _standardized: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError> {
            Ok(0)
        }
    }

    fn shared_profile() -> Arc<Mutex<PersonalProfile>> {
        Arc::new(Mutex::new(
            PersonalProfile::new(30, Gender::Male, 70.0, 175.0).expect("valid profile"),
        ))
    }

    #[test]
    fn test_worker_emits_reports_and_shuts_down() {
        let service = MonitorService::new(ConstantFeed, AlwaysLow);
        let handle = RefreshWorker::spawn(service, shared_profile(), Duration::from_millis(10));

        let update = handle
            .updates
            .recv_timeout(Duration::from_secs(2))
            .expect("first cycle update");
        match update {
            MonitorUpdate::Report(report) => {
                assert_eq!(report.verdict, RiskVerdict::LowRisk);
                assert_eq!(report.local_time, "01 March 2024, 17:00:00");
            }
            other => panic!("expected a report, got {other:?}"),
        }

        handle.shutdown();
    }

    #[test]
    fn test_worker_rereads_profile_each_cycle() {
        struct PulseSensitive;

        impl RiskModel for PulseSensitive {
            fn transform(
                &self,
                features: &FeatureVector,
            ) -> Result<[f64; FEATURE_COUNT], InferenceError> {
                Ok(*features.as_slice())
            }

            fn predict(&self, standardized: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError> {
                // Flag older profiles so a profile edit flips the verdict.
                Ok(i64::from(standardized[0] >= 60.0))
            }
        }

        let profile = shared_profile();
        let service = MonitorService::new(ConstantFeed, PulseSensitive);
        let handle =
            RefreshWorker::spawn(service, Arc::clone(&profile), Duration::from_millis(10));

        let first = handle
            .updates
            .recv_timeout(Duration::from_secs(2))
            .expect("first update");
        assert!(matches!(
            first,
            MonitorUpdate::Report(HealthReport {
                verdict: RiskVerdict::LowRisk,
                ..
            })
        ));

        profile.lock().expect("profile lock").age = 75;

        // The edit lands between cycles; wait for the flipped verdict.
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut flipped = false;
        while Instant::now() < deadline {
            match handle.updates.recv_timeout(Duration::from_secs(2)) {
                Ok(MonitorUpdate::Report(report)) if report.verdict == RiskVerdict::HighRisk => {
                    flipped = true;
                    break;
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        assert!(flipped, "profile change never reached the cycle");

        handle.shutdown();
    }

    #[test]
    fn test_worker_surfaces_inference_failure() {
        struct Broken;

        impl RiskModel for Broken {
            fn transform(
                &self,
                _features: &FeatureVector,
            ) -> Result<[f64; FEATURE_COUNT], InferenceError> {
                Err(InferenceError::Transform("artifact unavailable".into()))
            }

            fn predict(&self, _standardized: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError> {
                unreachable!("transform always fails first")
            }
        }

        let service = MonitorService::new(ConstantFeed, Broken);
        let handle = RefreshWorker::spawn(service, shared_profile(), Duration::from_millis(10));

        let update = handle
            .updates
            .recv_timeout(Duration::from_secs(2))
            .expect("first cycle update");
        assert!(matches!(update, MonitorUpdate::InferenceFailed(_)));

        handle.shutdown();
    }
}
