use chrono::{DateTime, NaiveDate, Utc};
use std::io::Cursor;
use suppaftp::types::FileType;
use suppaftp::FtpStream;
use tracing::debug;
use verdant_core::{DeviceFlags, SensorValues, StatusMessage};

use crate::config::{FtpConfig, CONFIG};
use crate::error::FtpError;

const STATUS_FILENAME: &str = "verdant_status.json";
const WEBCAM_FILENAME: &str = "latest_webcam.jpg";

/// Sol's planting date; day 1 is the planting day itself.
fn planted_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 24).expect("valid planting date")
}

pub(crate) fn sol_day(now: DateTime<Utc>) -> i32 {
    (now.date_naive() - planted_date()).num_days() as i32 + 1
}

/// Builds the fixed-shape status document the external dashboard expects.
pub(crate) fn status_document(
    sensors: SensorValues,
    devices: DeviceFlags,
    verdant_output: String,
    now: DateTime<Utc>,
) -> StatusMessage {
    StatusMessage {
        timestamp: Some(now),
        sol_day: Some(sol_day(now)),
        verdant_output,
        sensors,
        devices,
    }
}

/// Uploads the status document and, when captured, the latest webcam frame
/// over one authenticated FTP session.
pub(crate) async fn upload_status(json: Vec<u8>, image: Option<Vec<u8>>) -> Result<(), FtpError> {
    let config = CONFIG.ftp().ok_or_else(FtpError::NotConfigured)?;
    tokio::task::spawn_blocking(move || upload_blocking(&config, &json, image.as_deref())).await?
}

fn upload_blocking(config: &FtpConfig, json: &[u8], image: Option<&[u8]>) -> Result<(), FtpError> {
    let mut ftp = FtpStream::connect((config.host.as_str(), config.port))?;
    ftp.login(&config.username, &config.password)?;
    if config.remote_path != "/" {
        ftp.cwd(&config.remote_path)?;
    }
    ftp.transfer_type(FileType::Binary)?;

    ftp.put_file(STATUS_FILENAME, &mut Cursor::new(json))?;
    debug!("Uploaded {}", STATUS_FILENAME);
    if let Some(image) = image {
        ftp.put_file(WEBCAM_FILENAME, &mut Cursor::new(image))?;
        debug!("Uploaded {}", WEBCAM_FILENAME);
    }

    ftp.quit()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sol_day_counts_from_planting() {
        let planted = Utc.with_ymd_and_hms(2025, 11, 24, 12, 0, 0).unwrap();
        assert_eq!(sol_day(planted), 1);

        let later = Utc.with_ymd_and_hms(2026, 1, 5, 8, 30, 0).unwrap();
        assert_eq!(sol_day(later), 43);
    }

    #[test]
    fn status_document_shape() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 8, 30, 0).unwrap();
        let sensors = SensorValues {
            air_temp: Some(29.5),
            humidity: Some(44.2),
            vpd: Some(2.31),
            soil_moisture: Some(42.0),
            co2: Some(520.0),
            leaf_temp_delta: Some(-3.2),
        };
        let devices = DeviceFlags {
            grow_light: true,
            heat_mat: true,
            ..Default::default()
        };

        let doc = status_document(sensors, devices, "Keep growing strong!".to_owned(), now);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["sol_day"], 43);
        assert_eq!(value["verdant_output"], "Keep growing strong!");
        assert_eq!(value["sensors"]["air_temp"], 29.5);
        assert_eq!(value["sensors"]["co2"], 520.0);
        assert_eq!(value["devices"]["grow_light"], true);
        assert_eq!(value["devices"]["water_pump"], false);
    }

    #[test]
    fn empty_output_serializes_as_empty_string() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 8, 30, 0).unwrap();
        let doc = status_document(
            SensorValues::default(),
            DeviceFlags::default(),
            String::new(),
            now,
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["verdant_output"], "");
        assert_eq!(value["sensors"]["air_temp"], serde_json::Value::Null);
    }
}
