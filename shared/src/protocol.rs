use crate::query::{QueryError, QueryParams};
use crate::{
    Admission, DashboardSummary, LoginResponse, NewAdmission, NewProductRequest, NewReception,
    Page, ProductRequest, ProductRequestStatus, Reception, ReceptionReportRow, ReceptionStatus,
    ReportRange, TokenResponse, UserProfile,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_JSON_PATCH: &str = "application/json-patch+json";

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which family of endpoints a user may read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessScope {
    /// Internal staff: full data set.
    #[default]
    Staff,
    /// External customer: only records that belong to them.
    Customer,
}

/// Payload rejected before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("`{field}` must not be empty")]
    Empty { field: &'static str },
    #[error("`{field}` must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("report range starts after it ends")]
    InvalidRange,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}

fn require_id(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        Err(ValidationError::NotPositive { field })
    } else {
        Ok(())
    }
}

// =========================================================
// Request bodies
// =========================================================

/// RFC 6902 operation names used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Test,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value),
        }
    }

    fn check(&self) -> Result<(), ValidationError> {
        if !self.path.starts_with('/') {
            return Err(ValidationError::MalformedBody(format!(
                "patch path `{}` must start with '/'",
                self.path
            )));
        }
        let needs_value = !matches!(self.op, PatchOp::Remove);
        if needs_value && self.value.is_none() {
            return Err(ValidationError::MalformedBody(format!(
                "patch operation on `{}` needs a value",
                self.path
            )));
        }
        Ok(())
    }
}

/// Tagged request body. The tag decides the content type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    JsonPatch(Vec<PatchOperation>),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(RequestBody::Json)
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some(CONTENT_TYPE_JSON),
            RequestBody::JsonPatch(_) => Some(CONTENT_TYPE_JSON_PATCH),
        }
    }

    /// Rejects bodies the API would never accept: JSON bodies must be
    /// documents, patch documents must hold well-formed operations.
    pub fn check(&self) -> Result<(), ValidationError> {
        match self {
            RequestBody::Empty => Ok(()),
            RequestBody::Json(Value::Object(_)) | RequestBody::Json(Value::Array(_)) => Ok(()),
            RequestBody::Json(other) => Err(ValidationError::MalformedBody(format!(
                "expected a JSON object or array, got `{}`",
                other
            ))),
            RequestBody::JsonPatch(ops) if ops.is_empty() => Err(ValidationError::MalformedBody(
                "patch document has no operations".to_string(),
            )),
            RequestBody::JsonPatch(ops) => ops.iter().try_for_each(PatchOperation::check),
        }
    }

    pub fn encode(&self) -> Result<Option<String>, serde_json::Error> {
        match self {
            RequestBody::Empty => Ok(None),
            RequestBody::Json(value) => serde_json::to_string(value).map(Some),
            RequestBody::JsonPatch(ops) => serde_json::to_string(ops).map(Some),
        }
    }
}

// =========================================================
// Endpoint trait
// =========================================================

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The resource path for staff users.
    const PATH: &'static str;
    /// Customer-scoped variant of the path, when the endpoint has one.
    const CUSTOMER_PATH: Option<&'static str> = None;
    /// Whether a 401 from this endpoint means the session has expired.
    const REQUIRES_AUTH: bool = true;

    fn path(&self, scope: AccessScope) -> &'static str {
        match (scope, Self::CUSTOMER_PATH) {
            (AccessScope::Customer, Some(path)) => path,
            _ => Self::PATH,
        }
    }

    fn query(&self) -> Result<QueryParams, QueryError> {
        Ok(QueryParams::new())
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        Ok(RequestBody::Empty)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Endpoints that take nothing but a record id in the query string.
macro_rules! id_request {
    ($(#[$meta:meta])* $name:ident, $method:ident, $path:literal, $response:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub id: i64,
        }

        impl ApiRequest for $name {
            type Response = $response;
            const METHOD: HttpMethod = HttpMethod::$method;
            const PATH: &'static str = $path;

            fn query(&self) -> Result<QueryParams, QueryError> {
                Ok(QueryParams::new().with("id", self.id))
            }

            fn validate(&self) -> Result<(), ValidationError> {
                require_id("id", self.id)
            }
        }
    };
}

// =========================================================
// Account
// =========================================================

#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl ApiRequest for Credentials {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/api/account/login";
    const REQUIRES_AUTH: bool = false;

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("username", &self.username)?;
        if self.password.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        Ok(())
    }
}

/// Exchange the current token for a fresh one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RefreshTokenRequest;

impl ApiRequest for RefreshTokenRequest {
    type Response = TokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/api/account/refresh";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiRequest for CurrentUserRequest {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/api/account/me";
}

// =========================================================
// Admissions
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionQuery {
    pub page: u32,
    pub size: u32,
    pub is_discharged: Option<bool>,
    pub search_text: Option<String>,
}

impl Default for AdmissionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            is_discharged: None,
            search_text: None,
        }
    }
}

impl ApiRequest for AdmissionQuery {
    type Response = Page<Admission>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/api/admissions";
    const CUSTOMER_PATH: Option<&'static str> = Some("/api/customer/admissions");

    fn query(&self) -> Result<QueryParams, QueryError> {
        QueryParams::from_serialize(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.size == 0 {
            return Err(ValidationError::NotPositive { field: "size" });
        }
        Ok(())
    }
}

id_request!(AdmissionDetailRequest, Get, "/api/admissions/detail", Admission);
id_request!(
    /// Marks the vehicle as released from the shop.
    DischargeAdmission,
    Put,
    "/api/admissions/discharge",
    ()
);
id_request!(DeleteAdmission, Delete, "/api/admissions", ());

impl ApiRequest for NewAdmission {
    type Response = Admission;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/api/admissions";

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("plateNumber", &self.plate_number)?;
        require_text("customerName", &self.customer_name)
    }
}

/// Full replacement of an admission record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAdmission(pub Admission);

impl ApiRequest for UpdateAdmission {
    type Response = Admission;
    const METHOD: HttpMethod = HttpMethod::Put;
    const PATH: &'static str = "/api/admissions";

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(&self.0)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id("id", self.0.id)?;
        require_text("plateNumber", &self.0.plate_number)
    }
}

// =========================================================
// Receptions
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionQuery {
    pub page: u32,
    pub size: u32,
    pub admission_id: Option<i64>,
    pub status: Option<ReceptionStatus>,
    pub search_text: Option<String>,
}

impl Default for ReceptionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            admission_id: None,
            status: None,
            search_text: None,
        }
    }
}

impl ApiRequest for ReceptionQuery {
    type Response = Page<Reception>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/api/receptions";
    const CUSTOMER_PATH: Option<&'static str> = Some("/api/customer/receptions");

    fn query(&self) -> Result<QueryParams, QueryError> {
        QueryParams::from_serialize(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.size == 0 {
            return Err(ValidationError::NotPositive { field: "size" });
        }
        Ok(())
    }
}

id_request!(DeleteReception, Delete, "/api/receptions", ());

impl ApiRequest for NewReception {
    type Response = Reception;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/api/receptions";

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id("admissionId", self.admission_id)?;
        require_text("mechanicName", &self.mechanic_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReception(pub Reception);

impl ApiRequest for UpdateReception {
    type Response = Reception;
    const METHOD: HttpMethod = HttpMethod::Put;
    const PATH: &'static str = "/api/receptions";

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(&self.0)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id("id", self.0.id)?;
        require_text("mechanicName", &self.0.mechanic_name)
    }
}

// =========================================================
// Product requests
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequestQuery {
    pub page: u32,
    pub size: u32,
    pub reception_id: Option<i64>,
    pub status: Option<ProductRequestStatus>,
}

impl Default for ProductRequestQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            reception_id: None,
            status: None,
        }
    }
}

impl ApiRequest for ProductRequestQuery {
    type Response = Page<ProductRequest>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/api/product-requests";

    fn query(&self) -> Result<QueryParams, QueryError> {
        QueryParams::from_serialize(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.size == 0 {
            return Err(ValidationError::NotPositive { field: "size" });
        }
        Ok(())
    }
}

id_request!(DeleteProductRequest, Delete, "/api/product-requests", ());

impl ApiRequest for NewProductRequest {
    type Response = ProductRequest;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "/api/product-requests";

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        RequestBody::json(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id("receptionId", self.reception_id)?;
        require_text("productName", &self.product_name)?;
        if self.quantity == 0 {
            return Err(ValidationError::NotPositive { field: "quantity" });
        }
        Ok(())
    }
}

/// Storekeeper decision on a product request, sent as a JSON Patch document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetProductRequestStatus {
    pub id: i64,
    pub status: ProductRequestStatus,
    pub note: Option<String>,
}

impl ApiRequest for SetProductRequestStatus {
    type Response = ProductRequest;
    const METHOD: HttpMethod = HttpMethod::Patch;
    const PATH: &'static str = "/api/product-requests";

    fn query(&self) -> Result<QueryParams, QueryError> {
        Ok(QueryParams::new().with("id", self.id))
    }

    fn body(&self) -> Result<RequestBody, serde_json::Error> {
        let mut ops = vec![PatchOperation::replace(
            "/status",
            serde_json::to_value(self.status)?,
        )];
        if let Some(note) = &self.note {
            ops.push(PatchOperation::replace("/note", Value::String(note.clone())));
        }
        Ok(RequestBody::JsonPatch(ops))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id("id", self.id)
    }
}

// =========================================================
// Reports
// =========================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DashboardSummaryRequest;

impl ApiRequest for DashboardSummaryRequest {
    type Response = DashboardSummary;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/api/reports/dashboard";
    const CUSTOMER_PATH: Option<&'static str> = Some("/api/customer/reports/dashboard");
}

impl ApiRequest for ReportRange {
    type Response = Vec<ReceptionReportRow>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "/api/reports/receptions";

    fn query(&self) -> Result<QueryParams, QueryError> {
        QueryParams::from_serialize(self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.from > self.to {
            return Err(ValidationError::InvalidRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn customer_scope_uses_customer_path_when_present() {
        let query = AdmissionQuery::default();
        assert_eq!(query.path(AccessScope::Staff), "/api/admissions");
        assert_eq!(query.path(AccessScope::Customer), "/api/customer/admissions");

        let create = NewProductRequest {
            reception_id: 1,
            product_name: "filter".to_string(),
            quantity: 1,
            note: None,
        };
        assert_eq!(create.path(AccessScope::Customer), "/api/product-requests");
    }

    #[test]
    fn admission_query_drops_unset_filters() {
        let query = AdmissionQuery {
            search_text: Some("206".to_string()),
            ..AdmissionQuery::default()
        };
        assert_eq!(
            query.query().unwrap().serialize(),
            "page=1&size=10&searchText=206"
        );
    }

    #[test]
    fn reception_status_filter_is_sent_by_name() {
        let query = ReceptionQuery {
            status: Some(ReceptionStatus::InProgress),
            ..ReceptionQuery::default()
        };
        assert_eq!(
            query.query().unwrap().serialize(),
            "page=1&size=10&status=InProgress"
        );
    }

    #[test]
    fn id_requests_put_id_in_query_and_send_no_body() {
        let delete = DeleteAdmission { id: 42 };
        assert_eq!(delete.query().unwrap().serialize(), "id=42");
        assert_eq!(delete.body().unwrap(), RequestBody::Empty);
        assert_eq!(DeleteAdmission::METHOD, HttpMethod::Delete);
        assert_eq!(
            DeleteAdmission { id: 0 }.validate(),
            Err(ValidationError::NotPositive { field: "id" })
        );
    }

    #[test]
    fn status_change_is_a_json_patch_document() {
        let request = SetProductRequestStatus {
            id: 9,
            status: ProductRequestStatus::Approved,
            note: Some("in stock".to_string()),
        };
        let body = request.body().unwrap();
        assert_eq!(body.content_type(), Some(CONTENT_TYPE_JSON_PATCH));
        body.check().unwrap();
        let encoded: Value = serde_json::from_str(&body.encode().unwrap().unwrap()).unwrap();
        assert_eq!(
            encoded,
            json!([
                { "op": "replace", "path": "/status", "value": "Approved" },
                { "op": "replace", "path": "/note", "value": "in stock" }
            ])
        );
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        assert!(RequestBody::Json(json!("text")).check().is_err());
        assert!(RequestBody::JsonPatch(vec![]).check().is_err());
        let bad_path = PatchOperation::replace("status", json!("Approved"));
        assert!(RequestBody::JsonPatch(vec![bad_path]).check().is_err());
        let remove = PatchOperation {
            op: PatchOp::Remove,
            path: "/note".to_string(),
            value: None,
        };
        assert!(RequestBody::JsonPatch(vec![remove]).check().is_ok());
    }

    #[test]
    fn credentials_are_validated_and_redacted() {
        let creds = Credentials {
            username: "  ".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(
            creds.validate(),
            Err(ValidationError::Empty { field: "username" })
        );
        assert!(!format!("{:?}", creds).contains("secret"));
    }

    #[test]
    fn product_request_needs_quantity() {
        let create = NewProductRequest {
            reception_id: 3,
            product_name: "spark plug".to_string(),
            quantity: 0,
            note: None,
        };
        assert_eq!(
            create.validate(),
            Err(ValidationError::NotPositive { field: "quantity" })
        );
    }

    #[test]
    fn report_range_serializes_dates_and_checks_order() {
        let range = ReportRange {
            from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        };
        assert_eq!(
            range.query().unwrap().serialize(),
            "from=2024-03-01&to=2024-03-31"
        );
        let reversed = ReportRange {
            from: range.to,
            to: range.from,
        };
        assert_eq!(reversed.validate(), Err(ValidationError::InvalidRange));
    }
}
