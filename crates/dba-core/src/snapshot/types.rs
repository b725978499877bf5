use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

pub const CRITICAL_CLASSIFICATION: &str = "CRITICAL";

// Snapshot files are produced by loosely-shaped analysis jobs. A field with
// the wrong type reads as absent instead of rejecting the whole document.

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(value) => Some(value),
        _ => None,
    })
}

fn lenient_risks<'de, D>(deserializer: D) -> Result<Vec<RiskEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(RiskEntry::from_value).collect(),
        _ => Vec::new(),
    })
}

/// Result of the last security audit (`last_audit.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SecurityAudit {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<Number>,
    #[serde(default, alias = "vulnerabilities", deserialize_with = "lenient_risks")]
    pub risks: Vec<RiskEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SecurityAudit {
    pub fn with_score(score: i64) -> Self {
        Self {
            score: Some(Number::from(score)),
            ..Self::default()
        }
    }

    pub fn score_value(&self) -> Option<f64> {
        self.score.as_ref().and_then(Number::as_f64)
    }

    pub fn status(&self) -> SecurityStatus {
        SecurityStatus::from_score(Some(self.score_value().unwrap_or(0.0)))
    }

    pub fn risk_names(&self) -> impl Iterator<Item = &str> {
        self.risks.iter().filter_map(RiskEntry::name)
    }
}

/// Audit findings come either as bare labels or as objects. Anything else is
/// kept verbatim and has no name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RiskEntry {
    Label(String),
    Detailed(RiskDetail),
    Other(Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RiskDetail {
    #[serde(
        default,
        alias = "risk",
        alias = "title",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RiskEntry {
    pub fn named(name: impl Into<String>) -> Self {
        RiskEntry::Detailed(RiskDetail {
            name: Some(name.into()),
            extra: Map::new(),
        })
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(label) => RiskEntry::Label(label),
            Value::Object(_) => match serde_json::from_value(value.clone()) {
                Ok(detail) => RiskEntry::Detailed(detail),
                Err(_) => RiskEntry::Other(value),
            },
            other => RiskEntry::Other(other),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            RiskEntry::Label(label) => Some(label.as_str()),
            RiskEntry::Detailed(detail) => detail.name.as_deref(),
            RiskEntry::Other(_) => None,
        }
    }
}

/// One analysed statement from `query_analysis.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryAnalysis {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub sql_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryAnalysis {
    pub fn new(sql_id: impl Into<String>) -> Self {
        Self {
            sql_id: Some(sql_id.into()),
            extra: Map::new(),
        }
    }
}

/// One entry of `detected_anomalies.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Anomaly {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub classification: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Anomaly {
    pub fn classified(classification: impl Into<String>) -> Self {
        Self {
            classification: Some(classification.into()),
            extra: Map::new(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.classification.as_deref() == Some(CRITICAL_CLASSIFICATION)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemSnapshots {
    pub security: Option<SecurityAudit>,
    pub performance: Option<Vec<QueryAnalysis>>,
    pub anomalies: Option<Vec<Anomaly>>,
}

impl SystemSnapshots {
    pub fn critical_anomalies(&self) -> usize {
        self.anomalies
            .as_deref()
            .map(|anomalies| anomalies.iter().filter(|a| a.is_critical()).count())
            .unwrap_or(0)
    }
}

/// Dashboard colour tier for a security score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SecurityStatus {
    Grey,
    Danger,
    Warning,
    Success,
}

impl SecurityStatus {
    /// `None` means no audit has run yet.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            None => SecurityStatus::Grey,
            Some(score) if score >= 80.0 => SecurityStatus::Success,
            Some(score) if score >= 50.0 => SecurityStatus::Warning,
            Some(_) => SecurityStatus::Danger,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityStatus::Grey => "grey",
            SecurityStatus::Danger => "danger",
            SecurityStatus::Warning => "warning",
            SecurityStatus::Success => "success",
        }
    }
}
