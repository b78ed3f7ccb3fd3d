use drill_core::model::{AttemptRecord, ModuleId, UserId, UserProgress};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn user_key(user_id: UserId) -> String {
    user_id.to_string()
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u8(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn encode_progress(progress: &UserProgress) -> Result<String, StorageError> {
    serde_json::to_string(progress).map_err(ser)
}

pub(crate) fn decode_progress(json: &str) -> Result<UserProgress, StorageError> {
    serde_json::from_str(json).map_err(ser)
}

pub(crate) fn map_attempt_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AttemptRecord, StorageError> {
    let module_id =
        ModuleId::new(row.try_get::<String, _>("module_id").map_err(ser)?).map_err(ser)?;
    let score = i64_to_u8("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let time_spent = i64_to_u64(
        "time_spent_seconds",
        row.try_get::<i64, _>("time_spent_seconds").map_err(ser)?,
    )?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;

    AttemptRecord::new(module_id, score, time_spent, completed_at).map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_document_round_trips() {
        let progress = UserProgress::new();
        let json = encode_progress(&progress).unwrap();
        assert_eq!(decode_progress(&json).unwrap(), progress);
    }

    #[test]
    fn corrupt_document_is_a_serialization_error() {
        let err = decode_progress("{not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn oversized_counters_are_rejected() {
        assert!(u64_to_i64("time_spent_seconds", u64::MAX).is_err());
        assert!(i64_to_u8("score", 300).is_err());
        assert!(i64_to_u64("time_spent_seconds", -1).is_err());
    }
}
