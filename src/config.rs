use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub profile: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::with_profile_override(None)
    }

    pub fn with_profile_override(profile: Option<String>) -> Self {
        let profile = profile
            .or_else(|| env::var("PROFILE").ok())
            .unwrap_or_else(|| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://numera.db?mode=rwc".to_string()
            } else {
                format!("sqlite://numera_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            profile,
        }
    }
}
