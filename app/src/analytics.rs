use serde::Serialize;
use utoipa::ToSchema;

use crate::models::sensor_reading::SensorReadingDao;

/// Assumed sampling cadence of the plant poller: one reading every 2 minutes,
/// so an hour of look-ahead is 30 index steps. If the real cadence drifts or
/// has gaps, the prediction horizon skews with it.
pub(crate) const READINGS_PER_HOUR: i64 = 30;
/// How many of the newest readings feed a prediction.
pub(crate) const PREDICTION_WINDOW: i64 = 100;

const MIN_PREDICTION_POINTS: usize = 10;
const MEDIUM_CONFIDENCE_POINTS: usize = 50;
const STABLE_BAND_PCT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Stable,
    Rising,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Trend {
    pub direction: TrendDirection,
    pub change_pct: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignalTrend {
    pub current: Option<f64>,
    pub avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrendsReport {
    pub period_hours: i64,
    pub data_points: usize,
    pub temperature: SignalTrend,
    pub humidity: SignalTrend,
    pub vpd: SignalTrend,
    pub soil_moisture: SignalTrend,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictedSignals {
    pub air_temp: Option<f64>,
    pub humidity: Option<f64>,
    pub vpd: Option<f64>,
    pub soil_moisture: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PredictionReport {
    pub prediction_horizon_hours: i64,
    pub based_on_readings: usize,
    pub predictions: PredictedSignals,
    pub current: PredictedSignals,
    pub confidence: Confidence,
}

/// First-degree least-squares fit of `values` against their indices.
/// Returns `(slope, intercept)`, or `None` below two points.
fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let sum_x = (nf - 1.0) * nf / 2.0;
    let sum_x2 = (nf - 1.0) * nf * (2.0 * nf - 1.0) / 6.0;
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();

    let denominator = nf * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }
    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;
    Some((slope, intercept))
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Classifies a series as stable/rising/falling. The change percentage is
/// the fitted slope projected over the whole series, relative to its mean.
pub(crate) fn trend_of(values: &[f64]) -> Trend {
    let (slope, _) = match linear_fit(values) {
        Some(fit) => fit,
        None => {
            return Trend {
                direction: TrendDirection::Stable,
                change_pct: 0.0,
            }
        }
    };

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let change_pct = round2(slope * values.len() as f64 / mean.max(1.0) * 100.0);
    let direction = if change_pct.abs() < STABLE_BAND_PCT {
        TrendDirection::Stable
    } else if change_pct > 0.0 {
        TrendDirection::Rising
    } else {
        TrendDirection::Falling
    };
    Trend {
        direction,
        change_pct,
    }
}

/// Extrapolates the fitted line `steps` indices past the end of the series.
pub(crate) fn predict_value(values: &[f64], steps: i64) -> Option<f64> {
    let (slope, intercept) = linear_fit(values)?;
    let future_x = values.len() as f64 + steps as f64;
    Some(round2(slope * future_x + intercept))
}

fn signal_trend(values: &[f64], with_extrema: bool) -> SignalTrend {
    SignalTrend {
        current: values.last().copied(),
        avg: mean(values).map(round2),
        min: with_extrema
            .then(|| values.iter().copied().reduce(f64::min))
            .flatten(),
        max: with_extrema
            .then(|| values.iter().copied().reduce(f64::max))
            .flatten(),
        trend: trend_of(values),
    }
}

/// Builds the trend report over a history window, or `None` below two
/// readings.
pub(crate) fn trends(readings: &[SensorReadingDao], period_hours: i64) -> Option<TrendsReport> {
    if readings.len() < 2 {
        return None;
    }

    let temps: Vec<f64> = readings.iter().filter_map(|r| r.air_temp).collect();
    let humidities: Vec<f64> = readings.iter().filter_map(|r| r.humidity).collect();
    let vpds: Vec<f64> = readings.iter().filter_map(|r| r.vpd).collect();
    let soils: Vec<f64> = readings.iter().filter_map(|r| r.soil_moisture).collect();

    Some(TrendsReport {
        period_hours,
        data_points: readings.len(),
        temperature: signal_trend(&temps, true),
        humidity: signal_trend(&humidities, false),
        vpd: signal_trend(&vpds, false),
        soil_moisture: signal_trend(&soils, false),
    })
}

/// Builds the prediction report from readings ordered oldest first, or
/// `None` below ten readings.
pub(crate) fn predictions(
    readings: &[SensorReadingDao],
    hours_ahead: i64,
) -> Option<PredictionReport> {
    if readings.len() < MIN_PREDICTION_POINTS {
        return None;
    }

    let temps: Vec<f64> = readings.iter().filter_map(|r| r.air_temp).collect();
    let humidities: Vec<f64> = readings.iter().filter_map(|r| r.humidity).collect();
    let vpds: Vec<f64> = readings.iter().filter_map(|r| r.vpd).collect();
    let soils: Vec<f64> = readings.iter().filter_map(|r| r.soil_moisture).collect();

    let steps = hours_ahead * READINGS_PER_HOUR;

    Some(PredictionReport {
        prediction_horizon_hours: hours_ahead,
        based_on_readings: readings.len(),
        predictions: PredictedSignals {
            air_temp: predict_value(&temps, steps),
            humidity: predict_value(&humidities, steps),
            vpd: predict_value(&vpds, steps),
            soil_moisture: predict_value(&soils, steps),
        },
        current: PredictedSignals {
            air_temp: temps.last().copied(),
            humidity: humidities.last().copied(),
            vpd: vpds.last().copied(),
            soil_moisture: soils.last().copied(),
        },
        confidence: if readings.len() < MEDIUM_CONFIDENCE_POINTS {
            Confidence::Low
        } else {
            Confidence::Medium
        },
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;

    fn reading(air_temp: Option<f64>) -> SensorReadingDao {
        SensorReadingDao {
            timestamp: Utc::now().naive_utc(),
            air_temp,
            humidity: air_temp.map(|t| t * 2.0),
            vpd: None,
            soil_moisture: None,
            co2: None,
            leaf_temp_delta: None,
        }
    }

    #[test]
    fn fit_recovers_line() {
        // y = 2x + 1
        let values: Vec<f64> = (0..10).map(|x| 2.0 * x as f64 + 1.0).collect();
        let (slope, intercept) = linear_fit(&values).unwrap();
        assert!((slope - 2.0).abs() < 1e-9);
        assert!((intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn fit_needs_two_points() {
        assert!(linear_fit(&[]).is_none());
        assert!(linear_fit(&[1.0]).is_none());
    }

    #[test]
    fn flat_series_is_stable() {
        let values = vec![20.0; 30];
        let trend = trend_of(&values);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.change_pct, 0.0);
    }

    #[test]
    fn steep_series_classifies_by_sign() {
        let rising: Vec<f64> = (0..30).map(|x| 10.0 + x as f64).collect();
        assert_eq!(trend_of(&rising).direction, TrendDirection::Rising);
        assert!(trend_of(&rising).change_pct > STABLE_BAND_PCT);

        let falling: Vec<f64> = (0..30).map(|x| 40.0 - x as f64).collect();
        assert_eq!(trend_of(&falling).direction, TrendDirection::Falling);
        assert!(trend_of(&falling).change_pct < -STABLE_BAND_PCT);
    }

    #[test]
    fn short_series_is_stable_zero() {
        let trend = trend_of(&[25.0]);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.change_pct, 0.0);
    }

    #[test]
    fn predict_extrapolates_line() {
        let values: Vec<f64> = (0..20).map(|x| x as f64).collect();
        // slope 1, so 5 steps past the end lands at len + 5
        assert_eq!(predict_value(&values, 5), Some(25.0));
        assert_eq!(predict_value(&[1.0], 5), None);
    }

    #[test]
    fn trends_need_two_readings() {
        assert!(trends(&[], 24).is_none());
        assert!(trends(&[reading(Some(20.0))], 24).is_none());
        assert!(trends(&[reading(Some(20.0)), reading(Some(21.0))], 24).is_some());
    }

    #[test]
    fn trends_skip_null_values() {
        let readings = vec![
            reading(Some(20.0)),
            reading(None),
            reading(Some(22.0)),
            reading(Some(24.0)),
        ];
        let report = trends(&readings, 24).unwrap();
        assert_eq!(report.data_points, 4);
        assert_eq!(report.temperature.current, Some(24.0));
        assert_eq!(report.temperature.min, Some(20.0));
        assert_eq!(report.temperature.max, Some(24.0));
        // non-temperature signals carry no extrema
        assert_eq!(report.humidity.min, None);
    }

    #[test]
    fn predictions_need_ten_readings() {
        let readings: Vec<_> = (0..9).map(|i| reading(Some(20.0 + i as f64))).collect();
        assert!(predictions(&readings, 6).is_none());

        let readings: Vec<_> = (0..10).map(|i| reading(Some(20.0 + i as f64))).collect();
        let report = predictions(&readings, 6).unwrap();
        assert_eq!(report.based_on_readings, 10);
        assert_eq!(report.confidence, Confidence::Low);
    }

    #[test]
    fn confidence_turns_medium_at_fifty() {
        let readings: Vec<_> = (0..50).map(|i| reading(Some(20.0 + i as f64))).collect();
        let report = predictions(&readings, 1).unwrap();
        assert_eq!(report.confidence, Confidence::Medium);
    }

    #[test]
    fn prediction_steps_follow_cadence() {
        // flat series: prediction equals the constant regardless of steps
        let readings: Vec<_> = (0..60).map(|_| reading(Some(22.0))).collect();
        let report = predictions(&readings, 24).unwrap();
        assert_eq!(report.predictions.air_temp, Some(22.0));
        assert_eq!(report.current.air_temp, Some(22.0));
    }
}
