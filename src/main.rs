use weather_report::{web, Settings, WeatherReportError};

#[tokio::main]
async fn main() -> Result<(), WeatherReportError> {
    // RUST_LOG overrides the default level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load()?;
    web::serve(&settings).await
}
