use error_stack::ResultExt;
use kernel::KernelError;

static JWT_SIGNING_KEY: &str = "JWT_SIGNING_KEY";
static JWT_ISSUER: &str = "JWT_ISSUER";
static JWT_AUDIENCE: &str = "JWT_AUDIENCE";
static CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
static SERVER_PORT: &str = "SERVER_PORT";
static RUN_MIGRATIONS: &str = "RUN_MIGRATIONS";

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub signing_key: String,
    pub issuer: String,
    pub audience: String,
}

impl AuthConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Ok(Self {
            signing_key: required(JWT_SIGNING_KEY)?,
            issuer: required(JWT_ISSUER)?,
            audience: required(JWT_AUDIENCE)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let allowed_origins = optional(CORS_ALLOWED_ORIGINS)
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();
        let port = match optional(SERVER_PORT) {
            Some(port) => port
                .parse::<u16>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("Invalid {SERVER_PORT}: {port}"))?,
            None => DEFAULT_PORT,
        };
        let run_migrations = optional(RUN_MIGRATIONS)
            .map(|flag| flag.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            auth: AuthConfig::from_env()?,
            allowed_origins,
            port,
            run_migrations,
        })
    }
}

/// Splits a comma separated origin list, dropping blanks and trailing slashes.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn required(key: &str) -> error_stack::Result<String, KernelError> {
    driver::env(key)
}

fn optional(key: &str) -> Option<String> {
    dotenvy::var(key).ok().filter(|value| !value.trim().is_empty())
}
