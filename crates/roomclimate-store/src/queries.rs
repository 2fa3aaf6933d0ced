//! Query builder for stored measurements.
//!
//! [`MeasurementQuery`] follows the builder pattern for filtering and
//! paginating readings.
//!
//! # Example
//!
//! ```
//! use roomclimate_store::{MeasurementQuery, Store};
//! use roomclimate_types::{DeviceId, RoomId};
//! use time::{Duration, OffsetDateTime};
//!
//! let store = Store::open_in_memory()?;
//! let yesterday = OffsetDateTime::now_utc() - Duration::hours(24);
//!
//! // Recent readings for one device, newest first
//! let query = MeasurementQuery::new()
//!     .device(DeviceId(1))
//!     .since(yesterday)
//!     .limit(50);
//! let readings = store.query_readings(&query)?;
//!
//! // Every reading from one room, in chronological order
//! let room_query = MeasurementQuery::new().room(RoomId(2)).oldest_first();
//! let history = store.query_readings(&room_query)?;
//! # Ok::<(), roomclimate_store::Error>(())
//! ```

use time::OffsetDateTime;

use roomclimate_types::{DeviceId, RoomId, TimeWindow};

/// Fluent query builder for measurements.
///
/// Use this to construct queries for [`Store::query_readings`](crate::Store::query_readings).
/// All filter methods are optional and can be chained in any order.
///
/// By default, queries return results ordered by `timestamp` descending
/// (newest first). Time bounds are inclusive.
#[derive(Debug, Default, Clone)]
pub struct MeasurementQuery {
    /// Filter by device.
    pub device_id: Option<DeviceId>,
    /// Filter by the room the device is assigned to.
    pub room_id: Option<RoomId>,
    /// Include only readings at or after this time.
    pub since: Option<OffsetDateTime>,
    /// Include only readings at or before this time.
    pub until: Option<OffsetDateTime>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
    /// Order by timestamp descending (newest first).
    pub newest_first: bool,
}

/// Timestamps are stored at second resolution, so a lower bound with a
/// fractional second starts at the next whole second.
fn lower_bound_secs(time: OffsetDateTime) -> i64 {
    let secs = time.unix_timestamp();
    if time.nanosecond() > 0 { secs + 1 } else { secs }
}

impl MeasurementQuery {
    /// Create a new query with default settings.
    ///
    /// Default behavior:
    /// - No device or room filter
    /// - No time range filter
    /// - No limit (all matching records)
    /// - Ordered by newest first
    pub fn new() -> Self {
        Self {
            newest_first: true,
            ..Default::default()
        }
    }

    /// Filter by device.
    pub fn device(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    /// Filter to devices assigned to `room_id`.
    pub fn room(mut self, room_id: RoomId) -> Self {
        self.room_id = Some(room_id);
        self
    }

    /// Filter to readings taken at or after this time.
    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to readings taken at or before this time.
    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Restrict to an inclusive time window.
    pub fn window(self, window: &TimeWindow) -> Self {
        self.since(window.start()).until(window.end())
    }

    /// Limit the maximum number of results returned.
    ///
    /// Use with `offset()` for pagination.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order results by oldest first (ascending by `timestamp`).
    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(device_id) = self.device_id {
            conditions.push("m.device_id = ?");
            params.push(Box::new(device_id.0));
        }

        if let Some(room_id) = self.room_id {
            conditions.push("d.room_id = ?");
            params.push(Box::new(room_id.0));
        }

        if let Some(since) = self.since {
            conditions.push("m.timestamp >= ?");
            params.push(Box::new(lower_bound_secs(since)));
        }

        if let Some(until) = self.until {
            conditions.push("m.timestamp <= ?");
            params.push(Box::new(until.unix_timestamp()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };
        let join = if self.room_id.is_some() {
            " JOIN devices d ON d.id = m.device_id"
        } else {
            ""
        };

        let mut sql = format!(
            "SELECT m.device_id, m.timestamp, m.temperature, m.humidity, m.co2, m.productivity \
             FROM measurements m{} {} ORDER BY m.timestamp {}, m.id {}",
            join, where_clause, order, order
        );

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            // SQLite only accepts OFFSET after a LIMIT.
            if self.limit.is_none() {
                sql.push_str(" LIMIT -1");
            }
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_query_new_defaults() {
        let query = MeasurementQuery::new();
        assert!(query.device_id.is_none());
        assert!(query.room_id.is_none());
        assert!(query.since.is_none());
        assert!(query.until.is_none());
        assert!(query.limit.is_none());
        assert!(query.offset.is_none());
        assert!(query.newest_first);
    }

    #[test]
    fn test_query_default_is_different_from_new() {
        assert!(!MeasurementQuery::default().newest_first);
        assert!(MeasurementQuery::new().newest_first);
    }

    #[test]
    fn test_query_chaining() {
        let since = datetime!(2024-01-01 00:00:00 UTC);
        let until = datetime!(2024-12-31 23:59:59 UTC);

        let query = MeasurementQuery::new()
            .device(DeviceId(3))
            .room(RoomId(1))
            .since(since)
            .until(until)
            .limit(10)
            .offset(5)
            .oldest_first();

        assert_eq!(query.device_id, Some(DeviceId(3)));
        assert_eq!(query.room_id, Some(RoomId(1)));
        assert_eq!(query.since, Some(since));
        assert_eq!(query.until, Some(until));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(5));
        assert!(!query.newest_first);
    }

    #[test]
    fn test_query_window() {
        let start = datetime!(2024-01-01 00:00:00 UTC);
        let end = datetime!(2024-01-02 00:00:00 UTC);
        let window = TimeWindow::new(start, end).unwrap();

        let query = MeasurementQuery::new().window(&window);
        assert_eq!(query.since, Some(start));
        assert_eq!(query.until, Some(end));
    }

    #[test]
    fn test_build_where_empty() {
        let (where_clause, params) = MeasurementQuery::new().build_where();
        assert_eq!(where_clause, "");
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_where_all_filters() {
        let query = MeasurementQuery::new()
            .device(DeviceId(1))
            .room(RoomId(2))
            .since(datetime!(2024-01-01 00:00:00 UTC))
            .until(datetime!(2024-12-31 23:59:59 UTC));
        let (where_clause, params) = query.build_where();

        assert_eq!(
            where_clause,
            "WHERE m.device_id = ? AND d.room_id = ? AND m.timestamp >= ? AND m.timestamp <= ?"
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_build_sql_joins_only_for_room() {
        let sql = MeasurementQuery::new().build_sql();
        assert!(!sql.contains("JOIN"));
        assert!(sql.contains("ORDER BY m.timestamp DESC"));

        let sql = MeasurementQuery::new().room(RoomId(1)).oldest_first().build_sql();
        assert!(sql.contains("JOIN devices d ON d.id = m.device_id"));
        assert!(sql.contains("ORDER BY m.timestamp ASC"));
    }

    #[test]
    fn test_build_sql_pagination() {
        let sql = MeasurementQuery::new().limit(50).offset(100).build_sql();
        assert!(sql.ends_with("LIMIT 50 OFFSET 100"));

        let sql = MeasurementQuery::new().offset(10).build_sql();
        assert!(sql.ends_with("LIMIT -1 OFFSET 10"));
    }

    #[test]
    fn test_fractional_lower_bound_rounds_up() {
        let exact = datetime!(2024-01-01 00:00:00 UTC);
        assert_eq!(lower_bound_secs(exact), exact.unix_timestamp());

        let fractional = datetime!(2024-01-01 00:00:00.25 UTC);
        assert_eq!(lower_bound_secs(fractional), exact.unix_timestamp() + 1);
    }
}
