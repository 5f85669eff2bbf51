mod appointments;
mod availability;
mod doctors;
mod users;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;

pub use appointments::{AppointmentRepository, PgAppointmentRepository};
pub use availability::{AvailabilityRepository, PgAvailabilityRepository};
pub use doctors::{DoctorRepository, PgDoctorRepository};
pub use users::{PgUserRepository, UserRepository};

#[derive(Clone)]
pub struct Database {
    pub pg: PgPool,
}

impl Database {
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pg = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");

        Ok(Self { pg })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pg)
            .await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    pub async fn close(&self) {
        self.pg.close().await;
        tracing::info!("PostgreSQL connection pool closed");
    }
}

/// Storage handles shared by every request.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub doctors: Arc<dyn DoctorRepository>,
    pub availability: Arc<dyn AvailabilityRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
}

impl Repositories {
    pub fn postgres(db: &Database) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.pg.clone())),
            doctors: Arc::new(PgDoctorRepository::new(db.pg.clone())),
            availability: Arc::new(PgAvailabilityRepository::new(db.pg.clone())),
            appointments: Arc::new(PgAppointmentRepository::new(db.pg.clone())),
        }
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
