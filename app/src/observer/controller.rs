use chrono::{Duration, Utc};
use tracing::{debug, info};

use super::{ConcurrentObserver, SignedFrame, StoreStats, WebcamFrame};
use crate::analytics::{self, PredictionReport, TrendsReport, PREDICTION_WINDOW};
use crate::config::CONFIG;
use crate::error::{ObserverError, StorageError};
use crate::models::ai_output::{self, AiOutputDao};
use crate::models::coin_metric::{self, CoinMetricDao};
use crate::models::device_state::{self, DeviceStateDao};
use crate::models::hourly_aggregate::{self, HourlyAggregateDao};
use crate::models::like_event::{self, LikeEventDao};
use crate::models::sensor_reading::{self, SensorReadingDao};

const SIGNED_URL_TTL: i64 = 3600;
const OG_IMAGE_TTL: i64 = 86_400;

impl ConcurrentObserver {
    pub async fn latest_sensor_reading(
        &self,
    ) -> Result<Option<SensorReadingDao>, ObserverError> {
        Ok(sensor_reading::get_latest(&self.db_conn).await?)
    }

    pub async fn sensor_history(
        &self,
        hours: i64,
    ) -> Result<Vec<SensorReadingDao>, ObserverError> {
        let since = Utc::now().naive_utc() - Duration::hours(hours);
        Ok(sensor_reading::get_since(&self.db_conn, since).await?)
    }

    pub async fn latest_device_state(&self) -> Result<Option<DeviceStateDao>, ObserverError> {
        Ok(device_state::get_latest(&self.db_conn).await?)
    }

    pub async fn device_history(&self, hours: i64) -> Result<Vec<DeviceStateDao>, ObserverError> {
        let since = Utc::now().naive_utc() - Duration::hours(hours);
        Ok(device_state::get_since(&self.db_conn, since).await?)
    }

    pub async fn latest_coin_metric(&self) -> Result<Option<CoinMetricDao>, ObserverError> {
        Ok(coin_metric::get_latest(&self.db_conn).await?)
    }

    pub async fn coin_history(&self, hours: i64) -> Result<Vec<CoinMetricDao>, ObserverError> {
        let since = Utc::now().naive_utc() - Duration::hours(hours);
        Ok(coin_metric::get_since(&self.db_conn, since).await?)
    }

    pub async fn latest_ai_output(&self) -> Result<Option<AiOutputDao>, ObserverError> {
        Ok(ai_output::get_latest(&self.db_conn).await?)
    }

    pub async fn hourly_aggregates(
        &self,
        hours: i64,
    ) -> Result<Vec<HourlyAggregateDao>, ObserverError> {
        let since = Utc::now().naive_utc() - Duration::hours(hours);
        Ok(hourly_aggregate::get_since(&self.db_conn, since).await?)
    }

    /// Trend report over the requested window, `None` below two readings.
    pub async fn trends_report(&self, hours: i64) -> Result<Option<TrendsReport>, ObserverError> {
        let readings = self.sensor_history(hours).await?;
        debug!(data_points = readings.len(), "Computed trend report");
        Ok(analytics::trends(&readings, hours))
    }

    /// Prediction report over the newest readings, `None` below ten.
    pub async fn prediction_report(
        &self,
        hours_ahead: i64,
    ) -> Result<Option<PredictionReport>, ObserverError> {
        let mut readings = sensor_reading::get_recent(&self.db_conn, PREDICTION_WINDOW).await?;
        readings.reverse();
        Ok(analytics::predictions(&readings, hours_ahead))
    }

    pub async fn stats(&self) -> Result<StoreStats, ObserverError> {
        let sensor_readings = sensor_reading::count(&self.db_conn).await?;
        let device_states = device_state::count(&self.db_conn).await?;
        let coin_metrics = coin_metric::count(&self.db_conn).await?;
        let ai_outputs = ai_output::count(&self.db_conn).await?;
        let (oldest, newest) = sensor_reading::time_range(&self.db_conn).await?;

        Ok(StoreStats {
            sensor_readings,
            device_states,
            coin_metrics,
            ai_outputs,
            oldest,
            newest,
        })
    }

    /// Appends a like event and returns the new total.
    pub async fn add_like(&self, message: Option<String>) -> Result<i64, ObserverError> {
        like_event::insert(&self.db_conn, "web", message).await?;
        let total = like_event::count(&self.db_conn).await?;
        info!(total_likes = total, "Stored like event");
        Ok(total)
    }

    pub async fn like_count(&self) -> Result<i64, ObserverError> {
        Ok(like_event::count(&self.db_conn).await?)
    }

    pub async fn export_likes(&self) -> Result<Vec<LikeEventDao>, ObserverError> {
        Ok(like_event::get_all(&self.db_conn).await?)
    }

    /// Resolves the most recent webcam frame with signed and public URLs.
    pub async fn webcam_latest(&self) -> Result<WebcamFrame, ObserverError> {
        let path = self
            .cached_webcam_frame()
            .await
            .ok_or_else(StorageError::NoFrames)?;
        let signed_url = self.storage.signed_url(&path, SIGNED_URL_TTL).await?;
        let public_url = self.storage.public_url(&path)?;
        Ok(WebcamFrame {
            path,
            signed_url,
            public_url,
        })
    }

    /// Lists stored webcam frames, newest first, each signed best-effort.
    pub async fn webcam_frames(&self, limit: usize) -> Result<Vec<SignedFrame>, ObserverError> {
        let mut frames = self.storage.list_files("webcam/").await?;
        frames.truncate(limit);

        let mut signed = Vec::with_capacity(frames.len());
        for frame in frames {
            let signed_url = self.storage.signed_url(&frame.path, SIGNED_URL_TTL).await.ok();
            signed.push(SignedFrame {
                path: frame.path,
                signed_url,
                size: frame.size,
                updated: frame.updated,
            });
        }
        Ok(signed)
    }

    /// Location for the og-image redirect: a long-lived signed URL for the
    /// latest frame, or the upstream webcam endpoint as last resort.
    pub async fn og_image_location(&self) -> String {
        if let Some(path) = self.cached_webcam_frame().await {
            if let Ok(url) = self.storage.signed_url(&path, OG_IMAGE_TTL).await {
                return url;
            }
        }
        CONFIG.webcam_url()
    }
}
