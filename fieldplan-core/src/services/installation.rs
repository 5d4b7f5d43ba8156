//! Installation service - CRUD over the `installations` collection
//!
//! Owns the date-range query for the calendar day view and the conversion
//! between domain instants and the store's timestamp representation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::{json, Value as JsonValue};

use crate::domain::result::{Error, Result};
use crate::domain::{Installation, InstallationUpdate, NewInstallation};
use crate::ports::{Document, DocumentStore, Filter};

use super::wire::{now_ms, read_instant, read_string, to_store_ms};

const COLLECTION: &str = "installations";

/// Service for scheduling and tracking installation appointments
#[derive(Clone)]
pub struct InstallationService {
    store: Arc<dyn DocumentStore>,
}

impl InstallationService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Schedule a new installation, returning the store-assigned id
    ///
    /// The creation timestamp is set here; the caller never supplies it.
    pub fn add(&self, installation: &NewInstallation) -> Result<String> {
        let fields = json!({
            "title": installation.title,
            "description": installation.description,
            "date": to_store_ms(installation.date),
            "address": installation.address,
            "client": installation.client,
            "phone": installation.phone,
            "status": installation.status.as_str(),
            "createdBy": installation.created_by,
            "createdAt": now_ms(),
        });
        self.store.add(COLLECTION, fields)
    }

    /// Apply a partial update; only set fields are written
    pub fn update(&self, id: &str, update: &InstallationUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut fields = serde_json::Map::new();
        if let Some(title) = &update.title {
            fields.insert("title".to_string(), json!(title));
        }
        if let Some(description) = &update.description {
            fields.insert("description".to_string(), json!(description));
        }
        if let Some(date) = update.date {
            fields.insert("date".to_string(), json!(to_store_ms(date)));
        }
        if let Some(address) = &update.address {
            fields.insert("address".to_string(), json!(address));
        }
        if let Some(client) = &update.client {
            fields.insert("client".to_string(), json!(client));
        }
        if let Some(phone) = &update.phone {
            fields.insert("phone".to_string(), json!(phone));
        }
        if let Some(status) = update.status {
            fields.insert("status".to_string(), json!(status.as_str()));
        }

        self.store.update(COLLECTION, id, JsonValue::Object(fields))
    }

    /// Delete an installation; no existence pre-check
    pub fn remove(&self, id: &str) -> Result<()> {
        self.store.delete(COLLECTION, id)
    }

    /// Installations whose instant falls on the given local calendar day
    ///
    /// The range is [local 00:00:00.000, local 23:59:59.999], both bounds
    /// inclusive. Ordering is store-defined.
    pub fn get_by_date(&self, day: NaiveDate) -> Result<Vec<Installation>> {
        let (start, end) = local_day_bounds(day);
        let documents = self.store.query(
            COLLECTION,
            &Filter::TimestampBetween {
                field: "date".to_string(),
                start_ms: to_store_ms(start),
                end_ms: to_store_ms(end),
            },
        )?;
        documents.into_iter().map(decode).collect()
    }

    /// Every installation, used by the calendar marker aggregation
    pub fn get_all(&self) -> Result<Vec<Installation>> {
        let documents = self.store.list(COLLECTION)?;
        documents.into_iter().map(decode).collect()
    }

    pub fn get_by_id(&self, id: &str) -> Result<Installation> {
        match self.store.get(COLLECTION, id)? {
            Some(document) => decode(document),
            None => Err(Error::not_found(format!("installation {}", id))),
        }
    }
}

/// Start and end instants of a local calendar day
///
/// Both bounds are resolved from the day's own wall clock, so a DST
/// transition day covers its real 23- or 25-hour span. Zones that skip a
/// wall-clock reading on a transition fall back to the UTC reading.
fn local_day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = day.and_time(NaiveTime::MIN);
    let start = midnight
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight));
    let last = midnight + Duration::days(1) - Duration::milliseconds(1);
    let end = last
        .and_local_timezone(Local)
        .latest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&last));
    (start, end)
}

fn decode(document: Document) -> Result<Installation> {
    let fields = &document.fields;
    let date = fields
        .get("date")
        .and_then(read_instant)
        .ok_or_else(|| Error::store(format!("installation {} has no readable date", document.id)))?;
    let created_at = fields
        .get("createdAt")
        .and_then(read_instant)
        .unwrap_or(date);
    let status = read_string(fields, "status")
        .parse()
        .map_err(|_| Error::store(format!("installation {} has an invalid status", document.id)))?;

    Ok(Installation {
        id: document.id,
        title: read_string(fields, "title"),
        description: read_string(fields, "description"),
        date,
        address: read_string(fields, "address"),
        client: read_string(fields, "client"),
        phone: read_string(fields, "phone"),
        status,
        created_by: read_string(fields, "createdBy"),
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryBackend;
    use crate::domain::InstallationStatus;

    fn service() -> InstallationService {
        InstallationService::new(Arc::new(MemoryBackend::new()))
    }

    fn local_instant(day: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
        day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
            .and_local_timezone(Local)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample(date: DateTime<Utc>) -> NewInstallation {
        NewInstallation {
            title: "Fiber install".to_string(),
            description: "Drop from pole, router in hallway".to_string(),
            date,
            address: "Rua A 123".to_string(),
            client: "Cliente Exemplo".to_string(),
            phone: "+55 11 99999-0000".to_string(),
            status: InstallationStatus::Pending,
            created_by: "uid-creator".to_string(),
        }
    }

    #[test]
    fn test_add_then_get_by_id_roundtrip() {
        let service = service();
        let day = NaiveDate::from_ymd_opt(2026, 5, 20).unwrap();
        let new = sample(local_instant(day, 14, 30));

        let id = service.add(&new).unwrap();
        let stored = service.get_by_id(&id).unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.title, new.title);
        assert_eq!(stored.client, new.client);
        assert_eq!(stored.status, InstallationStatus::Pending);
        assert_eq!(stored.created_by, new.created_by);
        // The instant survives timestamp conversion to the millisecond,
        // comfortably within the to-the-minute requirement
        assert_eq!(stored.date, new.date);
    }

    #[test]
    fn test_get_by_id_missing_is_not_found() {
        let err = service().get_by_id("missing").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_get_by_date_includes_day_excludes_neighbors() {
        let service = service();
        let day = NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();

        let on_day_early = service.add(&sample(local_instant(day, 0, 0))).unwrap();
        let on_day_late = service.add(&sample(local_instant(day, 23, 59))).unwrap();
        service
            .add(&sample(local_instant(day.pred_opt().unwrap(), 23, 59)))
            .unwrap();
        service
            .add(&sample(local_instant(day.succ_opt().unwrap(), 0, 0)))
            .unwrap();

        let found = service.get_by_date(day).unwrap();
        let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(found.len(), 2);
        assert!(ids.contains(&on_day_early.as_str()));
        assert!(ids.contains(&on_day_late.as_str()));
    }

    #[test]
    fn test_update_status_only_leaves_other_fields() {
        let service = service();
        let day = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        let new = sample(local_instant(day, 9, 0));
        let id = service.add(&new).unwrap();

        service
            .update(&id, &InstallationUpdate::status(InstallationStatus::Completed))
            .unwrap();

        let stored = service.get_by_id(&id).unwrap();
        assert_eq!(stored.status, InstallationStatus::Completed);
        assert_eq!(stored.title, new.title);
        assert_eq!(stored.description, new.description);
        assert_eq!(stored.date, new.date);
        assert_eq!(stored.phone, new.phone);
    }

    #[test]
    fn test_update_missing_installation_fails() {
        let err = service()
            .update("missing", &InstallationUpdate::status(InstallationStatus::Cancelled))
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_empty_update_is_noop() {
        // No document exists, but an empty patch never reaches the store
        service()
            .update("missing", &InstallationUpdate::default())
            .unwrap();
    }

    #[test]
    fn test_remove_without_existence_precheck() {
        service().remove("missing").unwrap();
    }

    #[test]
    fn test_decode_tolerates_string_timestamp() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .set(
                "installations",
                "migrated",
                serde_json::json!({
                    "title": "Old record",
                    "date": "2026-02-01T12:00:00Z",
                    "status": "pending",
                }),
            )
            .unwrap();

        let service = InstallationService::new(backend);
        let stored = service.get_by_id("migrated").unwrap();
        assert_eq!(stored.date.timestamp(), 1_769_947_200);
    }
}
