use super::ApiClient;
use crate::error::ApiResult;
use crate::request::HttpClient;
use dinawin_shared::protocol::{DeleteProductRequest, ProductRequestQuery, SetProductRequestStatus};
use dinawin_shared::{NewProductRequest, Page, ProductRequest, ProductRequestStatus};

impl<C: HttpClient> ApiClient<C> {
    pub async fn product_requests(
        &self,
        query: &ProductRequestQuery,
    ) -> ApiResult<Page<ProductRequest>> {
        self.call(query).await
    }

    pub async fn create_product_request(
        &self,
        request: &NewProductRequest,
    ) -> ApiResult<ProductRequest> {
        self.call(request).await
    }

    /// Approve, reject or mark delivered. Sent as `application/json-patch+json`.
    pub async fn set_product_request_status(
        &self,
        id: i64,
        status: ProductRequestStatus,
        note: Option<String>,
    ) -> ApiResult<ProductRequest> {
        self.call(&SetProductRequestStatus { id, status, note }).await
    }

    pub async fn delete_product_request(&self, id: i64) -> ApiResult<()> {
        self.call(&DeleteProductRequest { id }).await
    }
}
