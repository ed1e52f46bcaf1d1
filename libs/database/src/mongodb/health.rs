use mongodb::{Database, bson::doc};

use crate::common::{DatabaseError, DatabaseResult};

/// Send `{ ping: 1 }` to the database
pub async fn ping(db: &Database) -> DatabaseResult<()> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))
}
