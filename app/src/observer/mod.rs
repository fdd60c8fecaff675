use chrono::NaiveDateTime;
use parking_lot::RwLock;
use sqlx::PgPool;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::CONFIG;
use crate::storage::ObjectStorageClient;

pub mod aggregate;
pub mod controller;
pub mod poll;

const PLANT_POLL_INTERVAL: Duration = Duration::from_secs(2 * 60);
const COIN_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);
const WEBCAM_POLL_INTERVAL: Duration = Duration::from_secs(2 * 60);
const AGGREGATION_INTERVAL: Duration = Duration::from_secs(10 * 60);
const FTP_REPUBLISH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Latest webcam frame with resolved access URLs.
pub struct WebcamFrame {
    pub path: String,
    pub signed_url: String,
    pub public_url: String,
}

/// One listed webcam frame; signing is best-effort.
pub struct SignedFrame {
    pub path: String,
    pub signed_url: Option<String>,
    pub size: Option<u64>,
    pub updated: Option<String>,
}

/// Row counts per family plus the sensor-data time range.
pub struct StoreStats {
    pub sensor_readings: i64,
    pub device_states: i64,
    pub coin_metrics: i64,
    pub ai_outputs: i64,
    pub oldest: Option<NaiveDateTime>,
    pub newest: Option<NaiveDateTime>,
}

pub struct ConcurrentObserver {
    pub(crate) db_conn: PgPool,
    pub(crate) http: reqwest::Client,
    pub(crate) storage: ObjectStorageClient,
    // guarded process-local cache, lazily repopulated from storage after a
    // restart
    webcam_frame_path: RwLock<Option<String>>,
}

impl Debug for ConcurrentObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentObserver").finish()
    }
}

impl ConcurrentObserver {
    pub fn new(db_conn: PgPool) -> Arc<Self> {
        let observer = ConcurrentObserver {
            db_conn,
            http: reqwest::Client::new(),
            storage: ObjectStorageClient::new(),
            webcam_frame_path: RwLock::new(None),
        };
        Arc::new(observer)
    }

    pub(crate) fn remember_webcam_frame(&self, path: String) {
        *self.webcam_frame_path.write() = Some(path);
    }

    pub(crate) async fn cached_webcam_frame(&self) -> Option<String> {
        let cached = self.webcam_frame_path.read().clone();
        if let Some(path) = cached {
            return Some(path);
        }
        let frames = self.storage.list_files("webcam/").await.ok()?;
        let path = frames.first().map(|f| f.path.clone())?;
        self.remember_webcam_frame(path.clone());
        Some(path)
    }

    /// Dispatches the plant telemetry polling loop
    /// Blocks caller thread in infinite loop
    pub async fn dispatch_plant_poll_loop(self: Arc<ConcurrentObserver>) {
        let mut interval = tokio::time::interval(PLANT_POLL_INTERVAL);
        info!("Start polling plant telemetry");
        loop {
            interval.tick().await;
            if let Err(e) = self.poll_plant_status().await {
                warn!("Failed polling plant status: {}", e);
            }
        }
    }

    /// Dispatches the coin metrics polling loop
    /// Blocks caller thread in infinite loop
    pub async fn dispatch_coin_poll_loop(self: Arc<ConcurrentObserver>) {
        let mut interval = tokio::time::interval(COIN_POLL_INTERVAL);
        info!("Start polling coin metrics");
        loop {
            interval.tick().await;
            if let Err(e) = self.poll_coin_metrics().await {
                warn!("Failed polling coin metrics: {}", e);
            }
        }
    }

    /// Dispatches the webcam capture loop
    /// Blocks caller thread in infinite loop
    pub async fn dispatch_webcam_poll_loop(self: Arc<ConcurrentObserver>) {
        let mut interval = tokio::time::interval(WEBCAM_POLL_INTERVAL);
        info!("Start capturing webcam frames");
        loop {
            interval.tick().await;
            if let Err(e) = self.poll_webcam_frame().await {
                warn!("Failed capturing webcam frame: {}", e);
            }
        }
    }

    /// Dispatches the hourly aggregation loop
    /// Each tick aggregates the most recently completed hour, once
    /// Blocks caller thread in infinite loop
    pub async fn dispatch_aggregation_loop(self: Arc<ConcurrentObserver>) {
        let mut interval = tokio::time::interval(AGGREGATION_INTERVAL);
        info!("Start computing hourly aggregates");
        loop {
            interval.tick().await;
            if let Err(e) = self.aggregate_last_hour().await {
                warn!("Failed computing hourly aggregate: {}", e);
            }
        }
    }

    /// Dispatches the FTP republishing loop, if configured
    /// Blocks caller thread in infinite loop
    pub async fn dispatch_ftp_republish_loop(self: Arc<ConcurrentObserver>) {
        if CONFIG.ftp().is_none() {
            info!("FTP republishing is not configured");
            return;
        }

        let mut interval = tokio::time::interval(FTP_REPUBLISH_INTERVAL);
        info!("Start republishing status over FTP");
        loop {
            interval.tick().await;
            match self.republish_status().await {
                Ok(_) => info!("Republished status over FTP"),
                Err(e) => warn!("Failed republishing status: {}", e),
            }
        }
    }
}
