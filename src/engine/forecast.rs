use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::ForecastError;
use super::policy::SecondaryCurrencyPolicy;
use super::results::{round2, to_decimal, ChangeDirection, Forecast, ForecastResponse, Projection};
use crate::config::{ArtifactPaths, ForecastSettings, ForecasterConfig};
use crate::data::{SeedSeries, WorkingSeries};
use crate::ml::{Normalizer, ReturnPredictor, SequenceModel};
use crate::types::{Country, RateObservation, YearMonth};

/// Process-wide, read-only model state shared by every forecast call
pub struct ModelContext<P = SequenceModel> {
    predictor: P,
    normalizer: Normalizer,
}

impl ModelContext<SequenceModel> {
    /// Loads model weights and both scalers; any missing artifact is fatal
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let predictor = SequenceModel::load(&paths.model)?;
        if predictor.n_features() != Normalizer::INPUT_FEATURES {
            return Err(anyhow!(
                "Model consumes {} features, scalers provide {}",
                predictor.n_features(),
                Normalizer::INPUT_FEATURES
            ));
        }
        let normalizer = Normalizer::load(&paths.input_scaler, &paths.output_scaler)?;
        info!(
            "Loaded scalers: input={}, output={}",
            paths.input_scaler.display(),
            paths.output_scaler.display()
        );
        Ok(Self::new(predictor, normalizer))
    }
}

impl<P: ReturnPredictor> ModelContext<P> {
    pub fn new(predictor: P, normalizer: Normalizer) -> Self {
        Self { predictor, normalizer }
    }

    pub fn lookback(&self) -> usize {
        self.predictor.lookback()
    }

    /// Trailing window → normalize → predict → denormalize
    pub fn predict_return(&self, window: &[RateObservation]) -> Result<f64> {
        let features: Vec<[f64; 2]> = window.iter().map(|o| o.features()).collect();
        let scaled_input = self.normalizer.normalize_input(&features);
        let scaled_output = self.predictor.predict(&scaled_input)?;
        Ok(self.normalizer.denormalize_output(scaled_output))
    }
}

/// Historical lookup plus recursive month-by-month forecasting.
///
/// Cheap to clone: the model context and seed template are shared; every
/// forecast call rolls forward on its own working copy.
pub struct ForecastEngine<P = SequenceModel> {
    context: Arc<ModelContext<P>>,
    seed: Arc<SeedSeries>,
    policy: SecondaryCurrencyPolicy,
    horizon_cap: u32,
}

impl<P> Clone for ForecastEngine<P> {
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
            seed: Arc::clone(&self.seed),
            policy: self.policy,
            horizon_cap: self.horizon_cap,
        }
    }
}

impl ForecastEngine<SequenceModel> {
    pub fn from_config(config: &ForecasterConfig) -> Result<Self> {
        let context = ModelContext::load(&config.artifacts)?;
        let seed = SeedSeries::builtin()?;
        Self::new(Arc::new(context), seed, &config.forecast)
    }
}

impl<P: ReturnPredictor> ForecastEngine<P> {
    pub fn new(context: Arc<ModelContext<P>>, seed: SeedSeries, settings: &ForecastSettings) -> Result<Self> {
        let lookback = context.lookback();
        if lookback != settings.lookback {
            return Err(anyhow!(
                "Model lookback is {} months but configuration expects {}",
                lookback,
                settings.lookback
            ));
        }
        if seed.len() < lookback {
            return Err(anyhow!(
                "Seed series has {} months, need at least {} for one window",
                seed.len(),
                lookback
            ));
        }

        info!(
            "Forecast engine ready: seed {}..{} ({} months), lookback={}, horizon cap={} months",
            seed.first().date,
            seed.latest().date,
            seed.len(),
            lookback,
            settings.horizon_cap_months
        );

        Ok(Self {
            context,
            seed: Arc::new(seed),
            policy: SecondaryCurrencyPolicy::new(settings.correlation_factor),
            horizon_cap: settings.horizon_cap_months,
        })
    }

    pub fn latest_month(&self) -> YearMonth {
        self.seed.latest().date
    }

    pub fn horizon_cap(&self) -> u32 {
        self.horizon_cap
    }

    pub fn seed(&self) -> &SeedSeries {
        &self.seed
    }

    /// Boundary entry point: never panics, every failure becomes a structured response
    pub fn predict_exchange_rate(&self, year: i32, month: i32, country: &str) -> ForecastResponse {
        let result = Self::resolve(year, month, country).and_then(|(target, country)| self.forecast(target, country));

        match &result {
            Ok(forecast) => debug!(
                "Forecast {}-{:02} {}: {} (historical={})",
                year, month, forecast.country, forecast.predicted_rate, forecast.is_historical
            ),
            Err(e) => warn!("Forecast request {}-{:02} '{}' rejected: {}", year, month, country, e),
        }

        ForecastResponse::from(result)
    }

    /// Validates raw request fields before any lookup or model work
    pub fn resolve(year: i32, month: i32, country: &str) -> Result<(YearMonth, Country), ForecastError> {
        let country: Country = country
            .parse()
            .map_err(ForecastError::UnsupportedCountry)?;
        let target = u32::try_from(month)
            .ok()
            .and_then(|m| YearMonth::new(year, m))
            .ok_or(ForecastError::InvalidMonth(month))?;
        Ok((target, country))
    }

    pub fn forecast(&self, target: YearMonth, country: Country) -> Result<Forecast, ForecastError> {
        let latest = self.seed.latest().date;
        if target <= latest {
            return self.historical(target, country);
        }

        let months_ahead = latest.months_until(target);
        if months_ahead > self.horizon_cap as i64 {
            return Err(ForecastError::HorizonExceeded {
                cap: self.horizon_cap,
                latest,
                requested: target,
                months_ahead,
            });
        }

        let working = self.roll_forward(months_ahead as usize)?;
        self.finalize(target, country, &working, months_ahead as u32)
    }

    fn historical(&self, target: YearMonth, country: Country) -> Result<Forecast, ForecastError> {
        let observation = self.seed.get(target).ok_or(ForecastError::MissingMonth(target))?;
        let rate = observation.level(country);

        Ok(Forecast {
            year: target.year,
            month: target.month,
            country,
            predicted_rate: to_decimal(rate)?,
            currency: country.currency_label().to_string(),
            is_historical: true,
            note: "historical data (recorded rate)".to_string(),
            projection: None,
            raw_rate: rate,
        })
    }

    /// Extends a fresh copy of the seed by `steps` predicted months
    pub fn roll_forward(&self, steps: usize) -> Result<WorkingSeries, ForecastError> {
        let lookback = self.context.lookback();
        let mut working = self.seed.working_copy();

        for _ in 0..steps {
            let last = *working.last();
            let predicted_return = self.context.predict_return(working.last_n(lookback))?;
            if !predicted_return.is_finite() {
                return Err(ForecastError::Internal(format!(
                    "model produced a non-finite return after {}",
                    last.date
                )));
            }

            let secondary_return = self.policy.secondary_return(predicted_return);
            let next = RateObservation {
                date: last.date.next(),
                level_primary: last.level_primary * (1.0 + predicted_return),
                level_secondary: last.level_secondary * (1.0 + secondary_return),
                return_primary: predicted_return,
                return_secondary: secondary_return,
            };
            if !next.is_valid() {
                return Err(ForecastError::Internal(format!(
                    "predicted return {:.6} gives an invalid level for {}",
                    predicted_return, next.date
                )));
            }

            debug!(
                "Roll-forward {}: return={:.6}, primary={:.4}, secondary={:.4}",
                next.date, predicted_return, next.level_primary, next.level_secondary
            );
            working.push(next);
        }

        Ok(working)
    }

    fn finalize(
        &self,
        target: YearMonth,
        country: Country,
        working: &WorkingSeries,
        months_ahead: u32,
    ) -> Result<Forecast, ForecastError> {
        let predicted = working.last().level(country);
        let latest = self.seed.latest();
        let latest_rate = latest.level(country);

        // relative to the last seeded month, not the previous forecast step
        let change_rate = (predicted - latest_rate) / latest_rate * 100.0;
        if !change_rate.is_finite() {
            return Err(ForecastError::Internal(format!("change rate for {} is not finite", target)));
        }

        Ok(Forecast {
            year: target.year,
            month: target.month,
            country,
            predicted_rate: round2(predicted)?,
            currency: country.currency_label().to_string(),
            is_historical: false,
            note: format!("model forecast ({} months ahead)", months_ahead),
            projection: Some(Projection {
                latest_rate: round2(latest_rate)?,
                latest_date: latest.date.to_string(),
                change_rate: round2(change_rate)?,
                change_direction: ChangeDirection::from_change_rate(change_rate),
                months_ahead,
            }),
            raw_rate: predicted,
        })
    }
}

impl<P: ReturnPredictor + 'static> ForecastEngine<P> {
    /// Forecasts every month up to the horizon cap on blocking worker tasks.
    /// Results come back in month order.
    pub async fn forecast_horizon(&self, country: Country) -> Vec<(YearMonth, Result<Forecast, ForecastError>)> {
        let latest = self.latest_month();

        let handles: Vec<_> = (1..=self.horizon_cap)
            .map(|step| {
                let target = latest.add_months(step);
                let engine = self.clone();
                (target, tokio::task::spawn_blocking(move || engine.forecast(target, country)))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (target, handle) in handles {
            let result = handle
                .await
                .unwrap_or_else(|e| Err(ForecastError::Internal(format!("forecast worker failed: {}", e))));
            results.push((target, result));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::ErrorKind;
    use crate::ml::normalizer::MinMaxScaler;
    use crate::ml::MockReturnPredictor;
    use rust_decimal::Decimal;
    use std::path::PathBuf;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn fixture_config() -> ForecasterConfig {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models");
        let mut config = ForecasterConfig::default();
        config.artifacts = ArtifactPaths {
            model: dir.join("fx_lstm_attention.json"),
            input_scaler: dir.join("scaler_x.json"),
            output_scaler: dir.join("scaler_y.json"),
        };
        config
    }

    fn fixture_engine() -> ForecastEngine {
        ForecastEngine::from_config(&fixture_config()).unwrap()
    }

    /// Output scaler maps scaled 0.5 to a 0.0 return and 0.55 to +1%
    fn symmetric_normalizer() -> Normalizer {
        Normalizer::new(
            MinMaxScaler::new(vec![-0.1, -0.1], vec![0.1, 0.1]).unwrap(),
            MinMaxScaler::new(vec![-0.1], vec![0.1]).unwrap(),
        )
        .unwrap()
    }

    fn mock_engine_with_seed(mock: MockReturnPredictor, seed: SeedSeries) -> ForecastEngine<MockReturnPredictor> {
        let context = Arc::new(ModelContext::new(mock, symmetric_normalizer()));
        ForecastEngine::new(context, seed, &ForecastSettings::default()).unwrap()
    }

    fn mock_engine(mock: MockReturnPredictor) -> ForecastEngine<MockReturnPredictor> {
        mock_engine_with_seed(mock, SeedSeries::builtin().unwrap())
    }

    fn mock_with_lookback() -> MockReturnPredictor {
        let mut mock = MockReturnPredictor::new();
        mock.expect_lookback().return_const(24usize);
        mock
    }

    #[test]
    fn test_missing_artifacts_fail_at_construction() {
        let mut config = fixture_config();
        config.artifacts.output_scaler = PathBuf::from("/nonexistent/scaler_y.json");
        assert!(ForecastEngine::from_config(&config).is_err());

        let mut config = fixture_config();
        config.artifacts.model = PathBuf::from("/nonexistent/model.json");
        assert!(ForecastEngine::from_config(&config).is_err());
    }

    #[test]
    fn test_lookback_mismatch_fails_at_construction() {
        let mut mock = MockReturnPredictor::new();
        mock.expect_lookback().return_const(12usize);
        let context = Arc::new(ModelContext::new(mock, symmetric_normalizer()));
        let result = ForecastEngine::new(context, SeedSeries::builtin().unwrap(), &ForecastSettings::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_short_seed_fails_at_construction() {
        let context = Arc::new(ModelContext::new(mock_with_lookback(), symmetric_normalizer()));
        let seed = SeedSeries::from_levels(ym(2025, 1), &[1300.0, 1310.0, 1320.0], &[900.0, 905.0, 910.0]).unwrap();
        assert!(ForecastEngine::new(context, seed, &ForecastSettings::default()).is_err());
    }

    #[test]
    fn test_validation_rejects_before_model_invocation() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().never();
        let engine = mock_engine(mock);

        let bad_month = engine.predict_exchange_rate(2026, 13, "us");
        assert!(!bad_month.success);
        assert_eq!(bad_month.error_kind, Some(ErrorKind::Validation));

        let zero_month = engine.predict_exchange_rate(2026, 0, "us");
        assert_eq!(zero_month.error_kind, Some(ErrorKind::Validation));

        let bad_country = engine.predict_exchange_rate(2026, 1, "france");
        assert_eq!(bad_country.error_kind, Some(ErrorKind::Validation));
        assert!(bad_country.error.unwrap().contains("france"));
    }

    #[test]
    fn test_historical_months_return_exact_levels() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().never();
        let engine = mock_engine(mock);

        let seed = SeedSeries::builtin().unwrap();
        for obs in seed.iter() {
            for country in Country::ALL {
                let forecast = engine.forecast(obs.date, country).unwrap();
                assert!(forecast.is_historical);
                assert_eq!(forecast.raw_rate, obs.level(country));
                assert_eq!(forecast.predicted_rate, to_decimal(obs.level(country)).unwrap());
                assert!(forecast.projection.is_none());
            }
        }
    }

    #[test]
    fn test_latest_month_takes_historical_path() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().never();
        let engine = mock_engine(mock);

        let forecast = engine.forecast(ym(2025, 10), Country::UnitedStates).unwrap();
        assert!(forecast.is_historical);
        assert_eq!(forecast.predicted_rate, Decimal::from(1420));
    }

    #[test]
    fn test_anchor_month_is_data_completeness_error() {
        let engine = mock_engine(mock_with_lookback());
        let err = engine.forecast(ym(2023, 10), Country::Japan).unwrap_err();
        assert_eq!(err, ForecastError::MissingMonth(ym(2023, 10)));
        assert_eq!(err.kind(), ErrorKind::DataCompleteness);
    }

    #[test]
    fn test_gap_in_seed_is_data_completeness_error() {
        let mut observations = Vec::new();
        let mut date = ym(2023, 1);
        for i in 0..26 {
            if i != 5 {
                observations.push(RateObservation {
                    date,
                    level_primary: 1300.0 + i as f64,
                    level_secondary: 900.0 + i as f64,
                    return_primary: 0.001,
                    return_secondary: 0.001,
                });
            }
            date = date.next();
        }
        let seed = SeedSeries::from_observations(observations).unwrap();
        let engine = mock_engine_with_seed(mock_with_lookback(), seed);

        let missing = ym(2023, 6);
        let response = engine.predict_exchange_rate(missing.year, missing.month as i32, "jp");
        assert!(!response.success);
        assert_eq!(response.error_kind, Some(ErrorKind::DataCompleteness));
        assert!(response.error.unwrap().contains("2023-06"));
    }

    #[test]
    fn test_beyond_horizon_is_rejected_for_every_country() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().never();
        let engine = mock_engine(mock);

        for country in ["us", "japan"] {
            let response = engine.predict_exchange_rate(2027, 4, country);
            assert!(!response.success);
            assert_eq!(response.error_kind, Some(ErrorKind::Horizon));
            let message = response.error.unwrap();
            assert!(message.contains("2025-10"));
            assert!(message.contains("18 months ahead"));
        }

        let err = engine.forecast(ym(2026, 11), Country::UnitedStates).unwrap_err();
        assert!(matches!(err, ForecastError::HorizonExceeded { months_ahead: 13, .. }));
    }

    #[test]
    fn test_roll_forward_runs_one_model_call_per_month() {
        for months_ahead in 1..=12u32 {
            let mut mock = mock_with_lookback();
            mock.expect_predict()
                .times(months_ahead as usize)
                .returning(|_| Ok(0.55));
            let engine = mock_engine(mock);

            let target = ym(2025, 10).add_months(months_ahead);
            let forecast = engine.forecast(target, Country::UnitedStates).unwrap();
            assert!(!forecast.is_historical);
            assert_eq!(forecast.projection.unwrap().months_ahead, months_ahead);
        }
    }

    #[test]
    fn test_working_series_grows_by_steps() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().returning(|_| Ok(0.55));
        let engine = mock_engine(mock);

        for steps in 0..=12 {
            let working = engine.roll_forward(steps).unwrap();
            assert_eq!(working.forecast_len(), steps);
            assert_eq!(working.len(), 24 + steps);
            assert_eq!(engine.seed().len(), 24);
        }
    }

    #[test]
    fn test_model_sees_trailing_window_including_forecasts() {
        let mut mock = mock_with_lookback();
        let mut call = 0;
        mock.expect_predict().times(2).returning(move |window| {
            call += 1;
            assert_eq!(window.shape(), &[24, 2]);
            if call == 2 {
                // the appended +1% month is the newest row, 0.01 → 0.55 under the input scaler
                assert!((window[[23, 0]] - 0.55).abs() < 1e-12);
                assert!((window[[23, 1]] - 0.54).abs() < 1e-12);
            }
            Ok(0.55)
        });
        let engine = mock_engine(mock);
        engine.forecast(ym(2025, 12), Country::UnitedStates).unwrap();
    }

    #[test]
    fn test_constant_return_compounds_for_both_currencies() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().returning(|_| Ok(0.55));
        let engine = mock_engine(mock);

        let usd = engine.forecast(ym(2026, 1), Country::UnitedStates).unwrap();
        let jpy = engine.forecast(ym(2026, 1), Country::Japan).unwrap();

        let r = symmetric_normalizer().denormalize_output(0.55);
        let mut expected_usd = 1420.0;
        let mut expected_jpy = 995.0;
        for _ in 0..3 {
            expected_usd *= 1.0 + r;
            expected_jpy *= 1.0 + 0.8 * r;
        }
        assert!((usd.raw_rate - expected_usd).abs() < 1e-9);
        assert!((jpy.raw_rate - expected_jpy).abs() < 1e-9);

        let projection = usd.projection.unwrap();
        assert_eq!(projection.latest_rate, Decimal::from(1420));
        assert_eq!(projection.latest_date, "2025-10");
        assert_eq!(projection.change_direction, ChangeDirection::Up);
        assert_eq!(projection.change_rate, round2((expected_usd - 1420.0) / 1420.0 * 100.0).unwrap());
    }

    #[test]
    fn test_zero_predicted_return_is_classified_down() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().returning(|_| Ok(0.5));
        let engine = mock_engine(mock);

        let forecast = engine.forecast(ym(2025, 11), Country::UnitedStates).unwrap();
        let projection = forecast.projection.unwrap();
        assert_eq!(forecast.raw_rate, 1420.0);
        assert_eq!(projection.change_rate, Decimal::ZERO);
        assert_eq!(projection.change_direction, ChangeDirection::Down);
    }

    #[test]
    fn test_negative_return_is_down() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().returning(|_| Ok(0.4));
        let engine = mock_engine(mock);

        let forecast = engine.forecast(ym(2025, 12), Country::Japan).unwrap();
        assert!(forecast.raw_rate < 995.0);
        assert_eq!(forecast.projection.unwrap().change_direction, ChangeDirection::Down);
    }

    #[test]
    fn test_model_failure_becomes_internal_error() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().returning(|_| Err(anyhow!("weights corrupted")));
        let engine = mock_engine(mock);

        let response = engine.predict_exchange_rate(2026, 1, "us");
        assert!(!response.success);
        assert_eq!(response.error_kind, Some(ErrorKind::Internal));
        assert!(response.error.unwrap().contains("weights corrupted"));
    }

    #[test]
    fn test_non_finite_prediction_becomes_internal_error() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().returning(|_| Ok(f64::NAN));
        let engine = mock_engine(mock);
        let err = engine.forecast(ym(2025, 11), Country::UnitedStates).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_collapsing_level_becomes_internal_error() {
        let mut mock = mock_with_lookback();
        // denormalizes to a -110% return
        mock.expect_predict().returning(|_| Ok(-5.0));
        let engine = mock_engine(mock);
        let err = engine.forecast(ym(2025, 11), Country::UnitedStates).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_three_months_ahead_with_fixture_model() {
        let engine = fixture_engine();
        let response = engine.predict_exchange_rate(2026, 1, "us");
        assert!(response.success);

        let forecast = response.forecast.unwrap();
        assert!(!forecast.is_historical);
        assert_eq!(forecast.currency, "USD");

        let projection = forecast.projection.unwrap();
        assert_eq!(projection.months_ahead, 3);
        assert_eq!(projection.latest_rate, Decimal::from(1420));
        let expected_change = (forecast.raw_rate - 1420.0) / 1420.0 * 100.0;
        assert_eq!(projection.change_rate, round2(expected_change).unwrap());
        assert_eq!(projection.change_direction, ChangeDirection::from_change_rate(expected_change));
    }

    #[test]
    fn test_fixture_forecasts_are_deterministic() {
        let engine = fixture_engine();
        let other = fixture_engine();

        for country in ["us", "japan"] {
            let first = engine.predict_exchange_rate(2026, 6, country);
            let second = other.predict_exchange_rate(2026, 6, country);
            let a = first.forecast.unwrap();
            let b = second.forecast.unwrap();
            assert_eq!(a.raw_rate.to_bits(), b.raw_rate.to_bits());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_secondary_level_derives_from_primary_returns() {
        let engine = fixture_engine();
        let working = engine.roll_forward(5).unwrap();

        let mut expected_usd = 1420.0;
        let mut expected_jpy = 995.0;
        for obs in working.forecasts() {
            expected_usd *= 1.0 + obs.return_primary;
            expected_jpy *= 1.0 + 0.8 * obs.return_primary;
            assert_eq!(obs.return_secondary, obs.return_primary * 0.8);
        }

        let usd = engine.forecast(ym(2026, 3), Country::UnitedStates).unwrap();
        let jpy = engine.forecast(ym(2026, 3), Country::Japan).unwrap();
        assert!((usd.raw_rate - expected_usd).abs() < 1e-9);
        assert!((jpy.raw_rate - expected_jpy).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_horizon_sweep_matches_sequential_calls() {
        let engine = fixture_engine();
        let sweep = engine.forecast_horizon(Country::Japan).await;
        assert_eq!(sweep.len(), 12);

        for (i, (target, result)) in sweep.into_iter().enumerate() {
            assert_eq!(target, ym(2025, 10).add_months(i as u32 + 1));
            let concurrent = result.unwrap();
            let sequential = engine.forecast(target, Country::Japan).unwrap();
            assert_eq!(concurrent.raw_rate.to_bits(), sequential.raw_rate.to_bits());
            assert_eq!(concurrent.projection.unwrap().months_ahead, i as u32 + 1);
        }
    }

    #[test]
    fn test_horizon_sweep_reports_failures_per_month() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().returning(|_| Err(anyhow!("weights corrupted")));
        let engine = mock_engine(mock);

        let sweep = tokio_test::block_on(engine.forecast_horizon(Country::UnitedStates));
        assert_eq!(sweep.len(), 12);
        assert_eq!(sweep[0].0, ym(2025, 11));
        assert_eq!(sweep[11].0, ym(2026, 10));
        assert!(sweep
            .iter()
            .all(|(_, result)| matches!(result, Err(ForecastError::Internal(_)))));
    }

    #[test]
    fn test_configured_cap_bounds_the_sweep() {
        let mut mock = mock_with_lookback();
        mock.expect_predict().returning(|_| Ok(0.5));
        let settings = ForecastSettings {
            horizon_cap_months: 6,
            ..ForecastSettings::default()
        };
        let context = Arc::new(ModelContext::new(mock, symmetric_normalizer()));
        let engine = ForecastEngine::new(context, SeedSeries::builtin().unwrap(), &settings).unwrap();

        assert_eq!(engine.horizon_cap(), 6);
        let sweep = tokio_test::block_on(engine.forecast_horizon(Country::UnitedStates));
        assert_eq!(sweep.len(), 6);
        assert_eq!(sweep[5].0, ym(2026, 4));
        assert!(matches!(
            engine.forecast(ym(2026, 5), Country::UnitedStates),
            Err(ForecastError::HorizonExceeded { cap: 6, .. })
        ));
    }
}
