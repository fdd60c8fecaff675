mod analytics;
mod config;
mod error;
mod ftp;
mod logging;
mod models;
mod observer;
mod rest;
mod storage;

use tracing::error;

#[tokio::main]
pub async fn main() -> std::io::Result<()> {
    logging::init();

    let db_conn = match models::establish_db_connection().await {
        Some(conn) => conn,
        None => {
            error!("Failed connecting database");
            panic!();
        }
    };
    if let Err(e) = models::run_migrations(&db_conn).await {
        error!("Failed migrating database: {}", e);
        panic!();
    }
    if let Err(e) = models::check_schema(&db_conn).await {
        error!("Invalid database schema: {}", e);
        panic!();
    }

    let observer = observer::ConcurrentObserver::new(db_conn);

    let plant_loop = observer.clone().dispatch_plant_poll_loop();
    let coin_loop = observer.clone().dispatch_coin_poll_loop();
    let webcam_loop = observer.clone().dispatch_webcam_poll_loop();
    let aggregation_loop = observer.clone().dispatch_aggregation_loop();
    let ftp_loop = observer.clone().dispatch_ftp_republish_loop();
    let server_daemon = rest::dispatch_server(observer.clone());

    let _ = tokio::join!(
        plant_loop,
        coin_loop,
        webcam_loop,
        aggregation_loop,
        ftp_loop,
        server_daemon
    );
    Ok(())
}
