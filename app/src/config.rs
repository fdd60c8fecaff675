use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::env;

#[derive(Debug, Clone)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub remote_path: String,
}

pub struct Config {
    inner: RwLock<InnerConfig>,
}

struct InnerConfig {
    server_port: String,
    database_url: String,
    plant_status_url: String,
    webcam_url: String,
    coin_api_url: String,
    storage_sidecar_url: String,
    public_object_search_paths: Vec<String>,
    ftp: Option<FtpConfig>,
}

impl Config {
    pub fn server_port(&self) -> String {
        self.inner.read().server_port.clone()
    }

    pub fn database_url(&self) -> String {
        self.inner.read().database_url.clone()
    }

    pub fn plant_status_url(&self) -> String {
        self.inner.read().plant_status_url.clone()
    }

    pub fn webcam_url(&self) -> String {
        self.inner.read().webcam_url.clone()
    }

    pub fn coin_api_url(&self) -> String {
        self.inner.read().coin_api_url.clone()
    }

    pub fn storage_sidecar_url(&self) -> String {
        self.inner.read().storage_sidecar_url.clone()
    }

    pub fn first_object_search_path(&self) -> Option<String> {
        self.inner.read().public_object_search_paths.first().cloned()
    }

    pub fn ftp(&self) -> Option<FtpConfig> {
        self.inner.read().ftp.clone()
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv::dotenv().ok();

    let server_port = env::var("SERVER_PORT").expect("SERVER_PORT must be set");
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let plant_api_base = env::var("PLANT_API_BASE").expect("PLANT_API_BASE must be set");
    let coin_api_url = env::var("COIN_API_URL").expect("COIN_API_URL must be set");
    let storage_sidecar_url =
        env::var("STORAGE_SIDECAR_URL").unwrap_or_else(|_| "http://127.0.0.1:1106".to_owned());
    let public_object_search_paths: Vec<String> = env::var("PUBLIC_OBJECT_SEARCH_PATHS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect();

    // FTP republishing is optional and only active when a host is given
    let ftp = env::var("FTP_HOST").ok().map(|host| FtpConfig {
        host,
        port: env::var("FTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(21),
        username: env::var("FTP_USER").expect("FTP_USER must be set"),
        password: env::var("FTP_PASSWORD").expect("FTP_PASSWORD must be set"),
        remote_path: env::var("FTP_REMOTE_PATH").unwrap_or_else(|_| "/".to_owned()),
    });

    Config {
        inner: RwLock::new(InnerConfig {
            server_port,
            database_url,
            plant_status_url: format!("{}get_status.php", plant_api_base),
            webcam_url: format!("{}get_webcam.php", plant_api_base),
            coin_api_url,
            storage_sidecar_url,
            public_object_search_paths,
            ftp,
        }),
    }
});
