use std::ops::Deref;
use std::sync::Arc;

use driver::database::PostgresDatabase;
use kernel::KernelError;

use crate::auth::JwtAuthenticator;
use crate::config::AppConfig;

pub struct AppModule<D>(Arc<Handler<D>>);

impl AppModule<PostgresDatabase> {
    pub async fn new(config: &AppConfig) -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init(config).await?)))
    }
}

impl<D> AppModule<D> {
    pub fn with_database(database: D, authenticator: JwtAuthenticator) -> Self {
        Self(Arc::new(Handler {
            database,
            authenticator,
        }))
    }
}

impl<D> Clone for AppModule<D> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<D> Deref for AppModule<D> {
    type Target = Handler<D>;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler<D> {
    database: D,
    authenticator: JwtAuthenticator,
}

impl Handler<PostgresDatabase> {
    pub async fn init(config: &AppConfig) -> error_stack::Result<Self, KernelError> {
        let database = PostgresDatabase::new().await?;
        if config.run_migrations {
            database.migrate().await?;
            tracing::info!("database migrations applied");
        }

        Ok(Self {
            database,
            authenticator: JwtAuthenticator::new(&config.auth),
        })
    }
}

impl<D> Handler<D> {
    pub fn database(&self) -> &D {
        &self.database
    }

    pub fn authenticator(&self) -> &JwtAuthenticator {
        &self.authenticator
    }
}
