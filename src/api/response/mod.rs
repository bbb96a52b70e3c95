pub mod access_token;
pub mod login;
pub mod site;
pub mod stats;
pub mod user;

pub use access_token::{AccessToken, AccessTokensResponse, CreateAccessTokenResponse};
pub use login::LoginResponse;
pub use site::{
    ExtendedAttribute, Site, SiteExtended, UserSitesExtendedResponse, UserSitesResponse,
};
pub use stats::{ConsumptionRecords, ConsumptionStatsResponse, StatsPoint, StatsSeries};
pub use user::{CurrentUser, InvitedSiteUser, MeResponse, SiteUser, SiteUsersResponse};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::schema::Schema;

lazy_static! {
    pub static ref SUCCESS_RESPONSE: Schema = Schema::permissive("SuccessResponse")
        .field("success")
        .finish();
}

/* Generic success body (revoke and other endpoints with no richer model) */
#[derive(Debug, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
