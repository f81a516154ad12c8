//! Status enums shared by several entities

use super::text_enum;

text_enum! {
    /// Operational status used by tables, categories, modifier options and users
    ActiveStatus: "status" {
        Active => "active",
        Inactive => "inactive",
    }
}

impl ActiveStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Default for ActiveStatus {
    fn default() -> Self {
        Self::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lowercase_only() {
        assert_eq!(ActiveStatus::parse("active"), Some(ActiveStatus::Active));
        assert_eq!(ActiveStatus::parse("inactive"), Some(ActiveStatus::Inactive));
        assert_eq!(ActiveStatus::parse("Active"), None);
    }

    #[test]
    fn try_from_reports_offending_value() {
        let err = ActiveStatus::try_from("archived".to_string()).unwrap_err();
        assert_eq!(err.value, "archived");
        assert_eq!(err.to_string(), "unknown status value: archived");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&ActiveStatus::Inactive).unwrap();
        assert_eq!(json, "\"inactive\"");
        let status: ActiveStatus = serde_json::from_str("\"active\"").unwrap();
        assert!(status.is_active());
    }
}
