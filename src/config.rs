use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_public_key: String, // Ed25519 public key (PEM), issued by the identity service
    pub auth_issuer: String,
    pub facility_daily_cap: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://id.pawhub.local".to_string()),
            facility_daily_cap: env::var("FACILITY_DAILY_CAP")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("FACILITY_DAILY_CAP must be a number"),
        }
    }
}
