use actix_web::{web, HttpResponse, Responder};
use dba_core::{SecurityStatus, SystemSnapshots};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;

/// Headline numbers for the overview page.
#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardStats {
    /// The audit score, or `"N/A"` when there is none.
    pub sec_score: Value,
    pub sec_color: SecurityStatus,
    pub slow_queries: usize,
    pub anomalies_crit: usize,
}

impl DashboardStats {
    pub fn from_snapshots(snapshots: &SystemSnapshots) -> Self {
        let na = || Value::String("N/A".to_string());
        let (sec_score, sec_color) = match &snapshots.security {
            Some(audit) => (
                audit.score.clone().map(Value::Number).unwrap_or_else(na),
                audit.status(),
            ),
            None => (na(), SecurityStatus::Grey),
        };

        Self {
            sec_score,
            sec_color,
            slow_queries: snapshots.performance.as_ref().map_or(0, Vec::len),
            anomalies_crit: snapshots.critical_anomalies(),
        }
    }
}

pub async fn handler(state: web::Data<AppState>) -> impl Responder {
    let snapshots = state.snapshots.read_all().await;
    HttpResponse::Ok().json(DashboardStats::from_snapshots(&snapshots))
}
