//! Property cache CRUD operations.
//!
//! Reads and writes are each a single SQL statement so concurrent requests
//! for the same address cannot lose updates: the read hit bumps its access
//! statistics inside the same UPDATE that returns the row, and the write is
//! an upsert with last-writer-wins payload and additive access_count.

use super::connection::CacheDb;
use super::key::normalize_address;
use crate::Error;
use crate::property::TransformedProperty;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cache read hit: the stored payload plus the timestamp it was written.
#[derive(Debug, Clone)]
pub struct CachedProperty {
    pub payload: TransformedProperty,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: i64,
    pub avg_access_count: f64,
    pub oldest_entry: DateTime<Utc>,
    pub newest_entry: DateTime<Utc>,
}

/// Whether a cached record is still usable without refetching.
///
/// Wall-clock only, strict `<`: a record aged exactly `max_age_hours` is
/// already stale.
pub fn is_fresh(updated_at: DateTime<Utc>, max_age_hours: i64) -> bool {
    Utc::now() - updated_at < Duration::hours(max_age_hours)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::CorruptRow(format!("bad timestamp {raw:?}: {e}")))
}

impl CacheDb {
    /// Look up a property by address.
    ///
    /// The address is normalized into the cache key first. On a hit the
    /// access statistics are bumped atomically in the same statement that
    /// returns the row. Returns `None` when no entry exists.
    pub async fn get_property(&self, address: &str) -> Result<Option<CachedProperty>, Error> {
        let key = normalize_address(address);
        let now = Utc::now().to_rfc3339();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<(String, String)>, Error> {
                let mut stmt = conn.prepare(
                    "UPDATE properties
                     SET last_accessed_at = ?2,
                         access_count = access_count + 1
                     WHERE address = ?1
                     RETURNING property_json, updated_at",
                )?;

                let result = stmt.query_row(params![key, now], |row| Ok((row.get(0)?, row.get(1)?)));

                match result {
                    Ok(pair) => Ok(Some(pair)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        match row {
            Some((json, updated_at)) => {
                let payload: TransformedProperty =
                    serde_json::from_str(&json).map_err(|e| Error::CorruptRow(e.to_string()))?;
                Ok(Some(CachedProperty { payload, updated_at: parse_timestamp(&updated_at)? }))
            }
            None => Ok(None),
        }
    }

    /// Insert or replace a property record.
    ///
    /// Uses UPSERT semantics keyed by normalized address: on first insert
    /// `access_count` starts at 1; on conflict the payload is replaced,
    /// `updated_at`/`last_accessed_at` move to now, and `access_count`
    /// is incremented. `created_at` never changes after insert.
    pub async fn put_property(&self, address: &str, payload: &TransformedProperty) -> Result<(), Error> {
        let key = normalize_address(address);
        let json = serde_json::to_string(payload).map_err(|e| Error::CorruptRow(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO properties (address, property_json, created_at, updated_at, last_accessed_at, access_count)
                     VALUES (?1, ?2, ?3, ?3, ?3, 1)
                     ON CONFLICT(address) DO UPDATE SET
                         property_json = excluded.property_json,
                         updated_at = excluded.updated_at,
                         last_accessed_at = excluded.last_accessed_at,
                         access_count = properties.access_count + 1",
                    params![key, json, now],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete entries whose `updated_at` is older than the retention cutoff.
    ///
    /// Returns the number of deleted entries. Maintenance operation, not on
    /// the read/write path.
    pub async fn sweep_stale(&self, older_than_days: i64) -> Result<u64, Error> {
        let cutoff = (Utc::now() - Duration::days(older_than_days)).to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM properties WHERE updated_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Aggregate statistics over the cache, or `None` when it is empty.
    pub async fn property_stats(&self) -> Result<Option<CacheStats>, Error> {
        let row = self
            .conn
            .call(|conn| -> Result<(i64, Option<f64>, Option<String>, Option<String>), Error> {
                conn.query_row(
                    "SELECT COUNT(*), AVG(access_count), MIN(created_at), MAX(created_at) FROM properties",
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )
                .map_err(Error::from)
            })
            .await
            .map_err(Error::from)?;

        match row {
            (total, Some(avg), Some(oldest), Some(newest)) if total > 0 => Ok(Some(CacheStats {
                total_entries: total,
                avg_access_count: avg,
                oldest_entry: parse_timestamp(&oldest)?,
                newest_entry: parse_timestamp(&newest)?,
            })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_property(owner: &str) -> TransformedProperty {
        serde_json::from_value(json!({
            "address": "11760 Baltimore Ave",
            "city": "Beltsville",
            "state": "MD",
            "zipCode": "20705",
            "ownerName": owner,
            "propertyType": "Residential",
            "yearBuilt": 1959,
            "assessedValue": { "land": 100_000.0, "building": 200_000.0, "total": 300_000.0 },
            "assessedDate": 2023,
        }))
        .unwrap()
    }

    async fn access_count(db: &CacheDb, key: &str) -> i64 {
        let key = key.to_string();
        db.conn
            .call(move |conn| {
                conn.query_row("SELECT access_count FROM properties WHERE address = ?1", params![key], |row| {
                    row.get(0)
                })
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get_roundtrip() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let property = make_property("Jane Doe");

        db.put_property("11760 Baltimore Ave, Beltsville, MD 20705", &property)
            .await
            .unwrap();

        let hit = db
            .get_property("11760 Baltimore Ave, Beltsville, MD 20705")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.payload, property);
    }

    #[tokio::test]
    async fn test_get_is_case_and_whitespace_insensitive() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_property("11760 Baltimore Ave", &make_property("Jane Doe"))
            .await
            .unwrap();

        let hit = db.get_property("  11760 BALTIMORE AVE  ").await.unwrap();
        assert!(hit.is_some());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db.get_property("1 nowhere ln").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_bumps_access_count() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_property("1 Main St", &make_property("Jane Doe")).await.unwrap();
        assert_eq!(access_count(&db, "1 main st").await, 1);

        db.get_property("1 Main St").await.unwrap();
        db.get_property("1 Main St").await.unwrap();
        assert_eq!(access_count(&db, "1 main st").await, 3);
    }

    #[tokio::test]
    async fn test_upsert_replaces_payload_and_increments() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let first = make_property("Jane Doe");
        let second = make_property("John Roe");

        db.put_property("1 Main St", &first).await.unwrap();
        db.put_property("1 Main St", &second).await.unwrap();

        let total: i64 = db
            .conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM properties", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert!(access_count(&db, "1 main st").await >= 2);

        let hit = db.get_property("1 Main St").await.unwrap().unwrap();
        assert_eq!(hit.payload, second);
    }

    #[tokio::test]
    async fn test_upsert_preserves_created_at() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_property("1 Main St", &make_property("Jane Doe")).await.unwrap();

        let created_before: String = db
            .conn
            .call(|conn| {
                conn.query_row("SELECT created_at FROM properties WHERE address = '1 main st'", [], |row| {
                    row.get(0)
                })
            })
            .await
            .unwrap();

        db.put_property("1 Main St", &make_property("John Roe")).await.unwrap();

        let created_after: String = db
            .conn
            .call(|conn| {
                conn.query_row("SELECT created_at FROM properties WHERE address = '1 main st'", [], |row| {
                    row.get(0)
                })
            })
            .await
            .unwrap();
        assert_eq!(created_before, created_after);
    }

    #[test]
    fn test_freshness_boundary() {
        let now = Utc::now();
        assert!(is_fresh(now - Duration::hours(23) - Duration::minutes(59), 24));
        assert!(!is_fresh(now - Duration::hours(24) - Duration::minutes(1), 24));
    }

    #[tokio::test]
    async fn test_sweep_removes_only_old_entries() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_property("1 Old St", &make_property("Jane Doe")).await.unwrap();
        db.put_property("2 New St", &make_property("John Roe")).await.unwrap();

        let backdated = (Utc::now() - Duration::days(120)).to_rfc3339();
        db.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE properties SET updated_at = ?1 WHERE address = '1 old st'",
                    params![backdated],
                )
            })
            .await
            .unwrap();

        let deleted = db.sweep_stale(90).await.unwrap();
        assert_eq!(deleted, 1);
        assert!(db.get_property("1 Old St").await.unwrap().is_none());
        assert!(db.get_property("2 New St").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stats_empty_and_populated() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.property_stats().await.unwrap().is_none());

        db.put_property("1 Main St", &make_property("Jane Doe")).await.unwrap();
        db.put_property("2 Side St", &make_property("John Roe")).await.unwrap();
        db.get_property("1 Main St").await.unwrap();

        let stats = db.property_stats().await.unwrap().unwrap();
        assert_eq!(stats.total_entries, 2);
        assert!(stats.avg_access_count >= 1.0);
        assert!(stats.oldest_entry <= stats.newest_entry);
    }
}
