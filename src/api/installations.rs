use chrono::{DateTime, Utc};
use reqwest::Method;

use crate::api::response::stats::{ConsumptionStatsResponse, CONSUMPTION_STATS_RESPONSE};
use crate::api::response::user::{SiteUsersResponse, SITE_USERS_RESPONSE};
use crate::client::VrmClient;
use crate::error::Error;
use crate::routes::format_route;
use crate::utils::datetime_to_epoch;

/// Operations under `/installations`, borrowed from a connected
/// [`VrmClient`].
pub struct InstallationsApi<'a> {
    client: &'a VrmClient,
}

impl<'a> InstallationsApi<'a> {
    pub(crate) fn new(client: &'a VrmClient) -> Self {
        InstallationsApi { client }
    }

    /// Consumption statistics for an installation. `start`/`end` are sent
    /// as integer epoch seconds, rounded up to the whole second.
    pub async fn get_consumption_stats(
        &self,
        site_id: i64,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<ConsumptionStatsResponse, Error> {
        let path = format_route(
            &self.client.routes().installations_stats,
            &[("site_id", &site_id.to_string())],
        );
        let mut query = vec![("type", "consumption".to_string())];
        if let Some(start) = start {
            query.push(("start", datetime_to_epoch(&start).to_string()));
        }
        if let Some(end) = end {
            query.push(("end", datetime_to_epoch(&end).to_string()));
        }
        let raw = self
            .client
            .request(Method::GET, &path, Some(query.as_slice()), None)
            .await?;
        CONSUMPTION_STATS_RESPONSE.parse(raw)
    }

    /// Everyone with access to an installation, invited and pending
    /// users included.
    pub async fn list_users(&self, site_id: i64) -> Result<SiteUsersResponse, Error> {
        let path = format_route(
            &self.client.routes().installations_users_list,
            &[("site_id", &site_id.to_string())],
        );
        let raw = self.client.request(Method::GET, &path, None, None).await?;
        SITE_USERS_RESPONSE.parse(raw)
    }
}
