use chrono::NaiveDate;
use flow_core::enums::WorkStatus;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a work status. Accepts `in-progress` and `in_progress`; anything
/// outside the four known states is rejected.
pub fn parse_status(raw: &str) -> anyhow::Result<WorkStatus> {
    let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
    WorkStatus::KNOWN
        .into_iter()
        .find(|status| status.as_str() == normalized)
        .ok_or_else(|| {
            let known: Vec<&str> = WorkStatus::KNOWN.iter().map(|s| s.as_str()).collect();
            anyhow::anyhow!("invalid status '{raw}': expected one of {}", known.join(", "))
        })
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}' (expected YYYY-MM-DD): {error}"))
}

#[cfg(test)]
mod tests {
    use flow_core::enums::{AuditAction, EntityType, Priority, WorkStatus};

    use super::{parse_date, parse_enum, parse_status};

    #[test]
    fn parses_status_spellings() {
        assert_eq!(parse_status("in-progress").unwrap(), WorkStatus::InProgress);
        assert_eq!(parse_status("NOT_ACKNOWLEDGE").unwrap(), WorkStatus::NotAcknowledge);
    }

    #[test]
    fn rejects_unknown_status() {
        let err = parse_status("on-hold").expect_err("should fail");
        assert!(err.to_string().contains("expected one of"));
    }

    #[test]
    fn parses_snake_case_enums() {
        let action: AuditAction = parse_enum("status_changed", "action").expect("action should parse");
        assert_eq!(action, AuditAction::StatusChanged);
        let entity: EntityType = parse_enum("comment", "entity type").expect("entity should parse");
        assert_eq!(entity, EntityType::Comment);
        let priority: Priority = parse_enum("high", "priority").expect("priority should parse");
        assert_eq!(priority, Priority::High);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Priority>("urgent", "priority").expect_err("should fail");
        assert!(err.to_string().contains("invalid priority 'urgent'"));
    }

    #[test]
    fn parses_dates() {
        assert!(parse_date("2026-10-31", "deadline").is_ok());
        let err = parse_date("31/10/2026", "deadline").expect_err("should fail");
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
