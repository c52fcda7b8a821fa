use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

const USER_ID_MAX_LEN: usize = 64;

/// Platform user id, assigned by the chat platform. Numeric ids are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() || value.len() > USER_ID_MAX_LEN {
            return None;
        }
        Some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match RawUserId::deserialize(deserializer)? {
            RawUserId::Number(number) => number.to_string(),
            RawUserId::Text(text) => text,
        };
        UserId::new(raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "user_id must be a number or a non-empty string of at most {USER_ID_MAX_LEN} characters"
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalance {
    pub user_id: UserId,
    pub name: Option<String>,
    pub balance: Decimal,
    pub completed_tasks: u64,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemWallet {
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numeric_and_text_ids() {
        let numeric: UserId = serde_json::from_value(json!(123456789)).unwrap();
        let text: UserId = serde_json::from_value(json!(" 123456789 ")).unwrap();
        assert_eq!(numeric, text);
        assert_eq!(numeric.as_str(), "123456789");
    }

    #[test]
    fn rejects_empty_and_structured_ids() {
        assert!(serde_json::from_value::<UserId>(json!("  ")).is_err());
        assert!(serde_json::from_value::<UserId>(json!({"id": 1})).is_err());
        assert!(serde_json::from_value::<UserId>(json!("x".repeat(65))).is_err());
    }
}
