use surrealdb::RecordId;

use crate::errors::{Error, Result};

pub fn get_record_id_from_string(val: &str) -> Result<RecordId> {
    let mut id_part = val.trim().splitn(2, ':');
    let table = id_part.next().ok_or(Error::Validation("Malformed id"))?;
    let key = id_part.next().ok_or(Error::Validation("Malformed id"))?;
    if table.is_empty() || key.is_empty() {
        return Err(Error::Validation("Malformed id"));
    }
    Ok(RecordId::from_table_key(table, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_table_and_key() {
        let id = get_record_id_from_string("users:abc123").expect("should parse");
        assert_eq!(id.to_string(), "users:abc123");
    }

    #[test]
    fn test_rejects_missing_key() {
        assert!(get_record_id_from_string("users").is_err());
        assert!(get_record_id_from_string("users:").is_err());
    }
}
