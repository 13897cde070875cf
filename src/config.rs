use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Directory holding the invoice PDF assets (Roboto-Regular.ttf, logo.png).
    pub assets_dir: PathBuf,
    /// When true, invoice line items keep the caller-supplied quantities
    /// instead of the legacy fixed quantity of 1.
    pub carry_line_quantities: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let assets_dir = env::var("ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./assets"));
        let carry_line_quantities = env::var("CARRY_LINE_QUANTITIES")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);
        Ok(Self {
            database_url,
            host,
            port,
            assets_dir,
            carry_line_quantities,
        })
    }
}
