use crate::db::migrate::NIGHTS_TABLE;
use crate::errors::AppResult;
use crate::models::night::SleepNight;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<SleepNight> {
    Ok(SleepNight {
        night_id: row.get("nightId")?,
        start_time_milli: row.get("start_time_milli")?,
        end_time_milli: row.get("end_time_milli")?,
        sleep_quality: row.get("quality_rating")?,
    })
}

/// Insert a night and return the id generated by SQLite.
pub fn insert_night(conn: &Connection, night: &SleepNight) -> AppResult<i64> {
    conn.execute(
        &format!(
            "INSERT INTO {NIGHTS_TABLE} (start_time_milli, end_time_milli, quality_rating)
             VALUES (?1, ?2, ?3)"
        ),
        params![
            night.start_time_milli,
            night.end_time_milli,
            night.sleep_quality
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update a night (all fields except id). Returns the number of rows touched.
pub fn update_night(conn: &Connection, night: &SleepNight) -> AppResult<usize> {
    let n = conn.execute(
        &format!(
            "UPDATE {NIGHTS_TABLE}
             SET start_time_milli = ?1, end_time_milli = ?2, quality_rating = ?3
             WHERE nightId = ?4"
        ),
        params![
            night.start_time_milli,
            night.end_time_milli,
            night.sleep_quality,
            night.night_id,
        ],
    )?;
    Ok(n)
}

pub fn get_night(conn: &Connection, key: i64) -> AppResult<Option<SleepNight>> {
    let night = conn
        .query_row(
            &format!("SELECT * FROM {NIGHTS_TABLE} WHERE nightId = ?1"),
            [key],
            map_row,
        )
        .optional()?;
    Ok(night)
}

/// Delete every night. Returns how many rows were removed.
pub fn clear_nights(conn: &Connection) -> AppResult<usize> {
    let n = conn.execute(&format!("DELETE FROM {NIGHTS_TABLE}"), [])?;
    Ok(n)
}

/// Most recently created night, whatever its state.
pub fn get_tonight(conn: &Connection) -> AppResult<Option<SleepNight>> {
    let night = conn
        .query_row(
            &format!("SELECT * FROM {NIGHTS_TABLE} ORDER BY nightId DESC LIMIT 1"),
            [],
            map_row,
        )
        .optional()?;
    Ok(night)
}

/// All nights, newest first.
pub fn load_all_nights(conn: &Connection) -> AppResult<Vec<SleepNight>> {
    let mut stmt =
        conn.prepare_cached(&format!("SELECT * FROM {NIGHTS_TABLE} ORDER BY nightId DESC"))?;

    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        conn
    }

    #[test]
    fn tonight_is_the_latest_inserted_night() {
        let conn = setup();
        insert_night(&conn, &SleepNight::started_at(100)).unwrap();
        let second = insert_night(&conn, &SleepNight::started_at(50)).unwrap();

        let tonight = get_tonight(&conn).unwrap().unwrap();
        assert_eq!(tonight.night_id, second);
        assert_eq!(tonight.start_time_milli, 50);
    }

    #[test]
    fn all_nights_are_newest_first() {
        let conn = setup();
        let a = insert_night(&conn, &SleepNight::started_at(1)).unwrap();
        let b = insert_night(&conn, &SleepNight::started_at(2)).unwrap();
        let c = insert_night(&conn, &SleepNight::started_at(3)).unwrap();

        let ids: Vec<i64> = load_all_nights(&conn)
            .unwrap()
            .iter()
            .map(|n| n.night_id)
            .collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[test]
    fn update_and_clear() {
        let conn = setup();
        let id = insert_night(&conn, &SleepNight::started_at(1_000)).unwrap();

        let mut night = get_night(&conn, id).unwrap().unwrap();
        night.end_time_milli = 9_000;
        night.sleep_quality = 3;
        assert_eq!(update_night(&conn, &night).unwrap(), 1);
        assert_eq!(get_night(&conn, id).unwrap().unwrap(), night);

        assert_eq!(clear_nights(&conn).unwrap(), 1);
        assert!(get_tonight(&conn).unwrap().is_none());
        assert!(load_all_nights(&conn).unwrap().is_empty());
    }
}
