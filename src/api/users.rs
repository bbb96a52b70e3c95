use chrono::{DateTime, Utc};
use reqwest::Method;

use crate::api::response::access_token::{
    AccessToken, AccessTokensResponse, CreateAccessTokenResponse, ACCESS_TOKENS_RESPONSE,
    CREATE_ACCESS_TOKEN_RESPONSE,
};
use crate::api::response::site::{
    Site, SiteExtended, UserSitesExtendedResponse, UserSitesResponse,
    USER_SITES_EXTENDED_RESPONSE, USER_SITES_RESPONSE,
};
use crate::api::response::user::{CurrentUser, MeResponse, ME_RESPONSE};
use crate::api::response::{SuccessResponse, SUCCESS_RESPONSE};
use crate::client::VrmClient;
use crate::error::Error;
use crate::routes::format_route;
use crate::utils::datetime_to_epoch;

/// Expiry of a newly created access token, as an epoch second or a point
/// in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expiry {
    Epoch(i64),
    At(DateTime<Utc>),
}

impl Expiry {
    pub fn as_epoch(&self) -> i64 {
        match self {
            Expiry::Epoch(seconds) => *seconds,
            Expiry::At(at) => datetime_to_epoch(at),
        }
    }
}

impl From<i64> for Expiry {
    fn from(seconds: i64) -> Self {
        Expiry::Epoch(seconds)
    }
}

impl From<DateTime<Utc>> for Expiry {
    fn from(at: DateTime<Utc>) -> Self {
        Expiry::At(at)
    }
}

/// Operations under `/users`, borrowed from a connected [`VrmClient`].
pub struct UsersApi<'a> {
    client: &'a VrmClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a VrmClient) -> Self {
        UsersApi { client }
    }

    /// The non-extended list of installations visible to a user.
    pub async fn get_installations(&self, user_id: i64) -> Result<Vec<Site>, Error> {
        let path = format_route(
            &self.client.routes().users_installations,
            &[("user_id", &user_id.to_string())],
        );
        let raw = self.client.request(Method::GET, &path, None, None).await?;
        let response: UserSitesResponse = USER_SITES_RESPONSE.parse(raw)?;
        Ok(response.records)
    }

    /// The extended list of installations, including the attribute block.
    pub async fn get_installations_extended(
        &self,
        user_id: i64,
    ) -> Result<Vec<SiteExtended>, Error> {
        let path = format_route(
            &self.client.routes().users_installations,
            &[("user_id", &user_id.to_string())],
        );
        let query = [("extended", "1".to_string())];
        let raw = self
            .client
            .request(Method::GET, &path, Some(&query), None)
            .await?;
        let response: UserSitesExtendedResponse = USER_SITES_EXTENDED_RESPONSE.parse(raw)?;
        Ok(response.records)
    }

    /// The account the session is authenticated as.
    pub async fn get_me(&self) -> Result<CurrentUser, Error> {
        let raw = self
            .client
            .request(Method::GET, &self.client.routes().users_me, None, None)
            .await?;
        let response: MeResponse = ME_RESPONSE.parse(raw)?;
        Ok(response.user)
    }

    pub async fn list_access_tokens(&self, user_id: i64) -> Result<Vec<AccessToken>, Error> {
        let path = format_route(
            &self.client.routes().users_access_tokens_list,
            &[("user_id", &user_id.to_string())],
        );
        let raw = self.client.request(Method::GET, &path, None, None).await?;
        let response: AccessTokensResponse = ACCESS_TOKENS_RESPONSE.parse(raw)?;
        Ok(response.tokens)
    }

    /// Create an access token. The returned secret is only ever shown in
    /// this response; an omitted `expiry` creates a non-expiring token.
    pub async fn create_access_token(
        &self,
        user_id: i64,
        name: &str,
        expiry: Option<Expiry>,
    ) -> Result<CreateAccessTokenResponse, Error> {
        let path = format_route(
            &self.client.routes().users_access_tokens_create,
            &[("user_id", &user_id.to_string())],
        );
        let mut query = vec![("name", name.to_string())];
        if let Some(expiry) = expiry {
            query.push(("expiry", expiry.as_epoch().to_string()));
        }
        let raw = self
            .client
            .request(Method::POST, &path, Some(query.as_slice()), None)
            .await?;
        CREATE_ACCESS_TOKEN_RESPONSE.parse(raw)
    }

    pub async fn revoke_access_token(
        &self,
        user_id: i64,
        access_token_id: i64,
    ) -> Result<SuccessResponse, Error> {
        let path = format_route(
            &self.client.routes().users_access_tokens_revoke,
            &[
                ("user_id", &user_id.to_string()),
                ("access_token_id", &access_token_id.to_string()),
            ],
        );
        let raw = self.client.request(Method::GET, &path, None, None).await?;
        SUCCESS_RESPONSE.parse(raw)
    }
}
