use std::str::FromStr;

use dotenvy;
use rust_decimal::Decimal;

#[derive(Debug)]
pub struct AppConfig {
    pub db_namespace: String,
    pub db_database: String,
    pub db_password: Option<String>,
    pub db_username: Option<String>,
    pub db_url: String,
    pub port: u16,
    pub admin_password: String,
    pub user_percentage: Decimal,
    pub system_percentage: Decimal,
    pub store_timeout_ms: u64,
    pub catalog_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let db_namespace = std::env::var("DB_NAMESPACE").unwrap_or("namespace".to_string());
        let db_database = std::env::var("DB_DATABASE").unwrap_or("database".to_string());
        let db_password = std::env::var("DB_PASSWORD").ok();
        let db_username = std::env::var("DB_USERNAME").ok();
        let db_url = std::env::var("DB_URL").unwrap_or("mem://".to_string());

        let port = std::env::var("PORT")
            .unwrap_or("10000".to_string())
            .parse::<u16>()
            .expect("PORT must be a port number");

        let admin_password =
            std::env::var("ADMIN_PASSWORD").expect("Missing ADMIN_PASSWORD in env");

        let user_percentage = std::env::var("USER_PERCENTAGE")
            .ok()
            .map(|v| Decimal::from_str(v.trim()).expect("USER_PERCENTAGE must be a decimal"))
            .unwrap_or(Decimal::new(7, 1));
        let system_percentage = std::env::var("SYSTEM_PERCENTAGE")
            .ok()
            .map(|v| Decimal::from_str(v.trim()).expect("SYSTEM_PERCENTAGE must be a decimal"))
            .unwrap_or(Decimal::new(3, 1));

        let store_timeout_ms = std::env::var("STORE_TIMEOUT_MS")
            .unwrap_or("5000".to_string())
            .parse::<u64>()
            .expect("STORE_TIMEOUT_MS must be number");
        let catalog_limit = std::env::var("CATALOG_LIMIT")
            .unwrap_or("20".to_string())
            .parse::<usize>()
            .expect("CATALOG_LIMIT must be number");

        Self {
            db_namespace,
            db_database,
            db_password,
            db_username,
            db_url,
            port,
            admin_password,
            user_percentage,
            system_percentage,
            store_timeout_ms,
            catalog_limit,
        }
    }
}
