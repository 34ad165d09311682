//! Monitor service: Orchestrates one acquisition-and-classification cycle.
//!
//! This service coordinates:
//! - Feed fetch and newest-entry selection
//! - Three-tier validation with stale-data fallback
//! - Timestamp normalization for display
//! - Feature assembly and model inference

use crate::application::acquisition::{
    select_latest, validate_entry, AcquisitionError, ReadingCache,
};
use crate::domain::{time, FeatureVector, PersonalProfile, RiskVerdict, SensorReading};
use crate::ports::{FeedSource, InferenceError, RiskModel};

/// What one cycle hands to the presentation boundary on success.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    /// Reading timestamp rendered in the display time zone
    pub local_time: String,
    /// The reading the verdict was computed from (fresh or cached)
    pub reading: SensorReading,
    /// Binary classification result
    pub verdict: RiskVerdict,
}

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Acquisition failed and the cache has never held a valid reading
    NoData,
    /// A verdict was produced for the served reading
    Report(HealthReport),
}

/// Service driving the fetch → validate → cache → assemble → classify cycle.
///
/// Owns the cache (no hidden module-level state) and all of its mutation:
/// cycles run on one thread, so the cache needs no locking.
pub struct MonitorService<F, M>
where
    F: FeedSource,
    M: RiskModel,
{
    feed: F,
    model: M,
    cache: ReadingCache,
}

impl<F, M> MonitorService<F, M>
where
    F: FeedSource,
    M: RiskModel,
{
    /// Create a service with an empty cache.
    pub fn new(feed: F, model: M) -> Self {
        Self {
            feed,
            model,
            cache: ReadingCache::new(),
        }
    }

    /// Run one full cycle against the supplied profile.
    ///
    /// Acquisition failures of any kind degrade to the cached reading, or
    /// to `CycleOutcome::NoData` when the cache is still empty.
    ///
    /// # Errors
    /// Returns `InferenceError` when the scaler/model pair fails; there is
    /// no fallback prediction, and the caller must surface the failure
    /// explicitly instead of a verdict.
    pub fn run_cycle(
        &mut self,
        profile: &PersonalProfile,
    ) -> Result<CycleOutcome, InferenceError> {
        let reading = match self.acquire() {
            Some(reading) => reading,
            None => return Ok(CycleOutcome::NoData),
        };

        let local_time = match time::to_local_display(&reading.timestamp_utc) {
            Ok(local_time) => local_time,
            Err(e) => {
                // Everything in the cache passed the format gate, so this
                // only fires if the cache was corrupted in memory.
                tracing::error!(error = %e, "Cached reading has unformattable timestamp");
                return Ok(CycleOutcome::NoData);
            }
        };

        tracing::debug!(timestamp = %reading.timestamp_utc, "Assembling feature vector");
        let features = FeatureVector::assemble(profile, &reading);

        let verdict = self.model.classify(&features)?;
        tracing::info!(%verdict, %local_time, "Cycle produced verdict");

        Ok(CycleOutcome::Report(HealthReport {
            local_time,
            reading,
            verdict,
        }))
    }

    /// Acquire a reading: freshly validated if possible, cached otherwise.
    fn acquire(&mut self) -> Option<SensorReading> {
        match self.fresh_reading() {
            Ok(reading) => {
                self.cache.write(reading.clone());
                Some(reading)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Acquisition failed, serving cached reading");
                self.cache.read().cloned()
            }
        }
    }

    /// One fetch round-trip through all validation gates.
    fn fresh_reading(&self) -> Result<SensorReading, AcquisitionError> {
        let response = self.feed.fetch()?;
        let entry = select_latest(&response.feeds).ok_or(AcquisitionError::EmptyFeed)?;
        Ok(validate_entry(entry)?)
    }

    /// Read access for the presentation boundary and tests.
    #[must_use]
    pub fn cached_reading(&self) -> Option<&SensorReading> {
        self.cache.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, FEATURE_COUNT};
    use crate::ports::{FeedEntry, FeedResponse, FetchError};
    use std::sync::Mutex;

    /// Feed stub replaying a scripted sequence of responses.
    struct ScriptedFeed {
        script: Mutex<Vec<Result<FeedResponse, FetchError>>>,
    }

    impl ScriptedFeed {
        fn new(mut script: Vec<Result<FeedResponse, FetchError>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
            }
        }
    }

    impl FeedSource for ScriptedFeed {
        fn fetch(&self) -> Result<FeedResponse, FetchError> {
            self.script
                .lock()
                .expect("script lock")
                .pop()
                .unwrap_or(Err(FetchError::Transport("script exhausted".into())))
        }
    }

    /// Model stub flagging high risk above a heart-rate threshold.
    struct ThresholdModel;

    impl RiskModel for ThresholdModel {
        fn transform(
            &self,
            features: &FeatureVector,
        ) -> Result<[f64; FEATURE_COUNT], InferenceError> {
            Ok(*features.as_slice())
        }

        fn predict(&self, standardized: &[f64; FEATURE_COUNT]) -> Result<i64, InferenceError> {
            Ok(i64::from(standardized[3] > 100.0))
        }
    }

    /// Model stub that always fails.
    struct BrokenModel;

    impl RiskModel for BrokenModel {
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

    fn entry(created_at: &str, hr: &str) -> FeedEntry {
        FeedEntry {
            created_at: Some(created_at.to_string()),
            heart_rate: Some(hr.to_string()),
            o2_saturation: Some("97".to_string()),
            body_temperature: Some("36.6".to_string()),
        }
    }

    fn response(entries: Vec<FeedEntry>) -> Result<FeedResponse, FetchError> {
        Ok(FeedResponse { feeds: entries })
    }

    fn profile() -> PersonalProfile {
        PersonalProfile::new(30, Gender::Male, 70.0, 175.0).expect("valid profile")
    }

    #[test]
    fn test_valid_cycle_produces_report() {
        let feed = ScriptedFeed::new(vec![response(vec![entry("2024-03-01T10:00:00Z", "78")])]);
        let mut service = MonitorService::new(feed, ThresholdModel);

        let outcome = service.run_cycle(&profile()).expect("no inference error");
        let report = match outcome {
            CycleOutcome::Report(report) => report,
            CycleOutcome::NoData => panic!("expected a report"),
        };

        assert_eq!(report.local_time, "01 March 2024, 17:00:00");
        assert_eq!(report.verdict, RiskVerdict::LowRisk);
        assert!((report.reading.heart_rate - 78.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_feed_with_cold_cache_reports_no_data() {
        let feed = ScriptedFeed::new(vec![response(vec![])]);
        let mut service = MonitorService::new(feed, ThresholdModel);

        let outcome = service.run_cycle(&profile()).expect("no inference error");
        assert_eq!(outcome, CycleOutcome::NoData);
        assert!(service.cached_reading().is_none());
    }

    #[test]
    fn test_empty_feed_with_warm_cache_serves_cached_reading() {
        let feed = ScriptedFeed::new(vec![
            response(vec![entry("2024-03-01T10:00:00Z", "78")]),
            response(vec![]),
        ]);
        let mut service = MonitorService::new(feed, ThresholdModel);

        let first = service.run_cycle(&profile()).expect("no inference error");
        let second = service.run_cycle(&profile()).expect("no inference error");
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_record_leaves_cache_unchanged() {
        let mut broken = entry("2024-03-01T10:05:00Z", "82");
        broken.body_temperature = Some("hot".to_string());

        let feed = ScriptedFeed::new(vec![
            response(vec![entry("2024-03-01T10:00:00Z", "78")]),
            response(vec![broken]),
        ]);
        let mut service = MonitorService::new(feed, ThresholdModel);

        service.run_cycle(&profile()).expect("no inference error");
        let cached_before = service.cached_reading().cloned().expect("warm cache");

        service.run_cycle(&profile()).expect("no inference error");
        assert_eq!(service.cached_reading(), Some(&cached_before));
    }

    #[test]
    fn test_fetch_failure_falls_back_to_cache() {
        let feed = ScriptedFeed::new(vec![
            response(vec![entry("2024-03-01T10:00:00Z", "110")]),
            Err(FetchError::Status(503)),
        ]);
        let mut service = MonitorService::new(feed, ThresholdModel);

        service.run_cycle(&profile()).expect("no inference error");
        let outcome = service.run_cycle(&profile()).expect("no inference error");
        let report = match outcome {
            CycleOutcome::Report(report) => report,
            CycleOutcome::NoData => panic!("cache should have answered"),
        };
        assert_eq!(report.verdict, RiskVerdict::HighRisk);
    }

    #[test]
    fn test_newer_valid_reading_replaces_cache() {
        let feed = ScriptedFeed::new(vec![
            response(vec![entry("2024-03-01T10:00:00Z", "78")]),
            response(vec![entry("2024-03-01T10:05:00Z", "105")]),
        ]);
        let mut service = MonitorService::new(feed, ThresholdModel);

        service.run_cycle(&profile()).expect("no inference error");
        service.run_cycle(&profile()).expect("no inference error");

        let cached = service.cached_reading().expect("warm cache");
        assert_eq!(cached.timestamp_utc, "2024-03-01T10:05:00Z");
    }

    #[test]
    fn test_cycle_with_trained_artifact_parameters() {
        use crate::adapters::artifact::{ExportedModel, ModelArtifact};
        use crate::domain::FEATURE_NAMES;

        // Same parameters as models/artifact.json.
        let artifact = ModelArtifact::from_exported(ExportedModel {
            feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            scaler_mean: vec![41.2, 0.48, 24.7, 79.3, 96.4, 36.9],
            scaler_scale: vec![16.5, 0.4996, 4.31, 11.8, 2.7, 0.52],
            coefficients: vec![0.92, 0.18, 0.55, 0.74, -1.12, 0.66],
            intercept: -1.35,
        })
        .expect("valid artifact");

        let feed = ScriptedFeed::new(vec![response(vec![entry("2024-03-01T10:00:00Z", "78")])]);
        let mut service = MonitorService::new(feed, artifact);

        // Worked scenario: features [30, 1, 22.86, 78, 97, 36.6].
        let outcome = service.run_cycle(&profile()).expect("no inference error");
        match outcome {
            CycleOutcome::Report(report) => assert_eq!(report.verdict, RiskVerdict::LowRisk),
            CycleOutcome::NoData => panic!("expected a report"),
        }
    }

    #[test]
    fn test_inference_failure_is_fatal_to_cycle() {
        let feed = ScriptedFeed::new(vec![response(vec![entry("2024-03-01T10:00:00Z", "78")])]);
        let mut service = MonitorService::new(feed, BrokenModel);

        let err = service
            .run_cycle(&profile())
            .expect_err("inference must fail");
        assert!(matches!(err, InferenceError::Transform(_)));
        // The reading itself was valid, so the cache still updated.
        assert!(service.cached_reading().is_some());
    }
}
