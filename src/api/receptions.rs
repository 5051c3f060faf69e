use super::ApiClient;
use crate::error::ApiResult;
use crate::request::HttpClient;
use dinawin_shared::protocol::{DeleteReception, ReceptionQuery, UpdateReception};
use dinawin_shared::{NewReception, Page, Reception};

impl<C: HttpClient> ApiClient<C> {
    pub async fn receptions(&self, query: &ReceptionQuery) -> ApiResult<Page<Reception>> {
        self.call(query).await
    }

    pub async fn create_reception(&self, reception: &NewReception) -> ApiResult<Reception> {
        self.call(reception).await
    }

    pub async fn update_reception(&self, reception: Reception) -> ApiResult<Reception> {
        self.call(&UpdateReception(reception)).await
    }

    pub async fn delete_reception(&self, id: i64) -> ApiResult<()> {
        self.call(&DeleteReception { id }).await
    }
}
