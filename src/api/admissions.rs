use super::ApiClient;
use crate::error::ApiResult;
use crate::request::HttpClient;
use dinawin_shared::protocol::{
    AdmissionDetailRequest, AdmissionQuery, DeleteAdmission, DischargeAdmission, UpdateAdmission,
};
use dinawin_shared::{Admission, NewAdmission, Page};

impl<C: HttpClient> ApiClient<C> {
    /// Customers only see their own vehicles.
    pub async fn admissions(&self, query: &AdmissionQuery) -> ApiResult<Page<Admission>> {
        self.call(query).await
    }

    pub async fn admission(&self, id: i64) -> ApiResult<Admission> {
        self.call(&AdmissionDetailRequest { id }).await
    }

    pub async fn create_admission(&self, admission: &NewAdmission) -> ApiResult<Admission> {
        self.call(admission).await
    }

    pub async fn update_admission(&self, admission: Admission) -> ApiResult<Admission> {
        self.call(&UpdateAdmission(admission)).await
    }

    pub async fn discharge_admission(&self, id: i64) -> ApiResult<()> {
        self.call(&DischargeAdmission { id }).await
    }

    pub async fn delete_admission(&self, id: i64) -> ApiResult<()> {
        self.call(&DeleteAdmission { id }).await
    }
}
