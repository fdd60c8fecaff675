use chrono::Utc;
use std::time::Duration;
use tracing::info;
use verdant_core::{CoinMessage, DeviceFlags, SensorValues, StatusMessage};

use super::ConcurrentObserver;
use crate::config::CONFIG;
use crate::error::{ObserverError, PollError};
use crate::ftp;
use crate::models::{ai_output, coin_metric, device_state, sensor_reading};

const STATUS_TIMEOUT: Duration = Duration::from_secs(15);
const WEBCAM_TIMEOUT: Duration = Duration::from_secs(30);

impl ConcurrentObserver {
    /// One plant telemetry tick: fetch the status document and append a
    /// sensor reading, a device state and, when present, an AI output.
    pub(crate) async fn poll_plant_status(&self) -> Result<(), ObserverError> {
        let resp = self
            .http
            .get(CONFIG.plant_status_url())
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(PollError::from)?;
        if !resp.status().is_success() {
            return Err(PollError::Status(resp.status().as_u16()).into());
        }
        let msg: StatusMessage = resp.json().await.map_err(PollError::from)?;

        sensor_reading::insert(&self.db_conn, &msg.sensors).await?;
        device_state::insert(&self.db_conn, &msg.devices).await?;
        if !msg.verdant_output.is_empty() {
            ai_output::insert(&self.db_conn, &msg.verdant_output, msg.sol_day).await?;
        }

        info!("Stored plant telemetry");
        Ok(())
    }

    /// One coin metrics tick.
    pub(crate) async fn poll_coin_metrics(&self) -> Result<(), ObserverError> {
        let resp = self
            .http
            .get(CONFIG.coin_api_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, "SolDashboard/1.0")
            .timeout(STATUS_TIMEOUT)
            .send()
            .await
            .map_err(PollError::from)?;
        if !resp.status().is_success() {
            return Err(PollError::Status(resp.status().as_u16()).into());
        }
        let msg: CoinMessage = resp.json().await.map_err(PollError::from)?;

        coin_metric::insert(&self.db_conn, &msg).await?;
        info!("Stored coin metrics");
        Ok(())
    }

    /// Fetches the current webcam frame, rejecting non-image responses.
    pub(crate) async fn fetch_webcam_frame(&self) -> Result<Vec<u8>, PollError> {
        let resp = self
            .http
            .get(CONFIG.webcam_url())
            .timeout(WEBCAM_TIMEOUT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PollError::Status(resp.status().as_u16()));
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_owned();
        if !content_type.contains("image") {
            return Err(PollError::NotAnImage(content_type));
        }

        Ok(resp.bytes().await?.to_vec())
    }

    /// One webcam tick: capture a frame, store it under a timestamped path
    /// and remember that path for the read side.
    pub(crate) async fn poll_webcam_frame(&self) -> Result<(), ObserverError> {
        let bytes = self.fetch_webcam_frame().await?;

        let filename = format!(
            "webcam/frame_{}.jpg",
            Utc::now().format("%Y-%m-%d_%H-%M-%S")
        );
        let path = self
            .storage
            .save_file(&bytes, &filename, "image/jpeg")
            .await?;
        self.remember_webcam_frame(path);

        info!("Stored webcam frame: {}", filename);
        Ok(())
    }

    /// One FTP tick: rebuild the status document from the latest stored
    /// rows and push it, together with a fresh webcam frame, to the
    /// external host.
    pub(crate) async fn republish_status(&self) -> Result<(), ObserverError> {
        let sensors = sensor_reading::get_latest(&self.db_conn)
            .await?
            .map(SensorValues::from)
            .unwrap_or_default();
        let devices = device_state::get_latest(&self.db_conn)
            .await?
            .map(DeviceFlags::from)
            .unwrap_or_default();
        let verdant_output = ai_output::get_latest(&self.db_conn)
            .await?
            .map(|dao| dao.output_text)
            .unwrap_or_default();

        let document = ftp::status_document(sensors, devices, verdant_output, Utc::now());
        let json = serde_json::to_string_pretty(&document).map_err(PollError::from)?;
        // the image is optional; a missed frame never blocks the status upload
        let image = self.fetch_webcam_frame().await.ok();

        ftp::upload_status(json.into_bytes(), image).await?;
        Ok(())
    }
}
