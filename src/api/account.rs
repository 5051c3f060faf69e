use super::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::request::HttpClient;
use dinawin_shared::UserProfile;
use dinawin_shared::protocol::{Credentials, CurrentUserRequest, RefreshTokenRequest};

impl<C: HttpClient> ApiClient<C> {
    /// Signs in and moves the session to `Authenticated`.
    ///
    /// A rejected login leaves the session as it was.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<UserProfile> {
        let response = self.call(credentials).await?;
        if response.token.trim().is_empty() {
            return Err(ApiError::InvalidResponse("login response carries no token"));
        }
        self.session.login(response.token, response.user.clone());
        Ok(response.user)
    }

    /// Local only: the API keeps no server-side session.
    pub fn logout(&self) -> bool {
        self.session.logout()
    }

    pub async fn refresh_token(&self) -> ApiResult<()> {
        let response = self.call(&RefreshTokenRequest).await?;
        if response.token.trim().is_empty() {
            return Err(ApiError::InvalidResponse("refresh response carries no token"));
        }
        self.session.refresh_token(response.token);
        Ok(())
    }

    /// Reloads the profile of the signed-in user into the session.
    pub async fn current_user(&self) -> ApiResult<UserProfile> {
        let user = self.call(&CurrentUserRequest).await?;
        self.session.update_user(user.clone());
        Ok(user)
    }
}
