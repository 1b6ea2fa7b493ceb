use mongodb::{Database, bson::doc};

use crate::error::{DatabaseError, DatabaseResult};

/// Ping the database, mapping any failure to [`DatabaseError::HealthCheckFailed`].
pub async fn check_health(db: &Database) -> DatabaseResult<()> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))
}
