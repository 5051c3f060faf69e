use super::ApiClient;
use crate::error::ApiResult;
use crate::request::HttpClient;
use dinawin_shared::protocol::DashboardSummaryRequest;
use dinawin_shared::{DashboardSummary, ReceptionReportRow, ReportRange};

impl<C: HttpClient> ApiClient<C> {
    pub async fn dashboard_summary(&self) -> ApiResult<DashboardSummary> {
        self.call(&DashboardSummaryRequest).await
    }

    /// Per-mechanic totals for receptions opened within `range`.
    pub async fn reception_report(&self, range: ReportRange) -> ApiResult<Vec<ReceptionReportRow>> {
        self.call(&range).await
    }
}
