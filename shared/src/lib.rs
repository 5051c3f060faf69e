use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod query;

pub use protocol::{AccessScope, ApiRequest, HttpMethod, RequestBody, ValidationError};
pub use query::{QueryError, QueryParams, QueryValue};

// =========================================================
// Account
// =========================================================

/// Profile of the signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    /// Internal staff see every record, customers only their own.
    #[serde(default)]
    pub is_dinawin_employee: bool,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserProfile {
    pub fn scope(&self) -> AccessScope {
        if self.is_dinawin_employee {
            AccessScope::Staff
        } else {
            AccessScope::Customer
        }
    }

    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
}

// =========================================================
// Paging
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page: 1,
            size: 0,
        }
    }
}

// =========================================================
// Service admissions
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    pub id: i64,
    pub plate_number: String,
    pub vehicle_model: String,
    pub customer_name: String,
    pub customer_mobile: String,
    pub admitted_at: NaiveDateTime,
    pub is_discharged: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdmission {
    pub plate_number: String,
    pub vehicle_model: String,
    pub customer_name: String,
    pub customer_mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =========================================================
// Repair receptions
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReceptionStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl ReceptionStatus {
    pub const ALL: [ReceptionStatus; 4] = [
        ReceptionStatus::Open,
        ReceptionStatus::InProgress,
        ReceptionStatus::Completed,
        ReceptionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatus::Open => "Open",
            ReceptionStatus::InProgress => "InProgress",
            ReceptionStatus::Completed => "Completed",
            ReceptionStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub title: String,
    /// Labour wage in rials.
    pub wage: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: i64,
    pub admission_id: i64,
    pub mechanic_name: String,
    pub complaint: String,
    #[serde(default)]
    pub status: ReceptionStatus,
    #[serde(default)]
    pub services: Vec<ServiceLine>,
}

impl Reception {
    pub fn total_wage(&self) -> u64 {
        self.services
            .iter()
            .fold(0u64, |total, line| total.saturating_add(line.wage))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReception {
    pub admission_id: i64,
    pub mechanic_name: String,
    pub complaint: String,
    #[serde(default)]
    pub services: Vec<ServiceLine>,
}

// =========================================================
// Mechanic product requests
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductRequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Delivered,
}

impl ProductRequestStatus {
    pub const ALL: [ProductRequestStatus; 4] = [
        ProductRequestStatus::Pending,
        ProductRequestStatus::Approved,
        ProductRequestStatus::Rejected,
        ProductRequestStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductRequestStatus::Pending => "Pending",
            ProductRequestStatus::Approved => "Approved",
            ProductRequestStatus::Rejected => "Rejected",
            ProductRequestStatus::Delivered => "Delivered",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Pending requests are the only ones a storekeeper still has to act on.
    pub fn is_open(&self) -> bool {
        matches!(self, ProductRequestStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub id: i64,
    pub reception_id: i64,
    pub product_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub status: ProductRequestStatus,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductRequest {
    pub reception_id: i64,
    pub product_name: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =========================================================
// Reports
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub open_admissions: u64,
    pub discharged_today: u64,
    pub open_receptions: u64,
    pub pending_product_requests: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionReportRow {
    pub mechanic_name: String,
    pub reception_count: u64,
    pub total_wage: u64,
}

/// Inclusive date range for report endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
