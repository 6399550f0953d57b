use anyhow::{Context, Result, anyhow};

use super::{
    config_model::{BackendServer, Database, DotEnvyConfig, UserSecret},
    stage::Stage,
};

pub const DEFAULT_JWT_TTL_MINUTES: i64 = 24 * 60;
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?
            .parse()
            .context("SERVER_PORT_BACKEND is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .context("DATABASE_MAX_CONNECTIONS is invalid")?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        },
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        user_secret: get_user_secret()?,
        stage: get_stage(),
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_user_secret() -> Result<UserSecret> {
    dotenvy::dotenv().ok();

    let ttl_minutes = match optional("JWT_TTL_MINUTES") {
        Some(raw) => raw.parse().context("JWT_TTL_MINUTES is invalid")?,
        None => DEFAULT_JWT_TTL_MINUTES,
    };
    if ttl_minutes <= 0 {
        return Err(anyhow!("JWT_TTL_MINUTES must be positive"));
    }

    Ok(UserSecret {
        secret: required("JWT_USER_SECRET")?,
        ttl_minutes,
    })
}

fn required(key: &str) -> Result<String> {
    optional(key).ok_or_else(|| anyhow!("{} is invalid", key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
