//! Top-up transaction models

use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lifecycle status reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Completed,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TransactionStatus {
    /// `SUCCESS` and `COMPLETED` are both terminal successes.
    pub fn is_completed(self) -> bool {
        matches!(self, TransactionStatus::Success | TransactionStatus::Completed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Cancelled => "CANCELLED",
            TransactionStatus::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// A processed top-up as returned by `POST /topup` and `GET /topup/history`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub cell_phone: String,
    #[serde(rename = "value", deserialize_with = "deserialize_amount")]
    pub amount: i64,
    #[serde(default)]
    pub supplier_name: String,
    pub status: TransactionStatus,
    #[serde(rename = "transactionalID", default)]
    pub transactional_id: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Request body for `POST /topup`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopupRequest {
    pub cell_phone: String,
    pub value: i64,
    pub supplier_id: String,
}

/// The backend serializes amounts as decimals (`5000` or `5000.00`).
fn deserialize_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let amount = match &raw {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    };
    amount.ok_or_else(|| de::Error::custom(format!("invalid amount: {}", raw)))
}
