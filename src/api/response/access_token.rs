use serde::Deserialize;

use crate::schema::{Schema, Shape};

lazy_static! {
    pub static ref ACCESS_TOKEN: Schema = Schema::strict("AccessToken")
        .field("id_access_token")
        .field("name")
        .field("created_on")
        .field("scope")
        .optional("expires")
        .optional("last_seen")
        .optional("last_successful_auth")
        .finish();

    pub static ref ACCESS_TOKENS_RESPONSE: Schema = Schema::strict("AccessTokensResponse")
        .field("success")
        .field("tokens")
        .shape(Shape::ModelList(&ACCESS_TOKEN))
        .finish();

    /* The create endpoint has returned the new token id as both a number
     * and a string; it is folded to a string either way. */
    pub static ref CREATE_ACCESS_TOKEN_RESPONSE: Schema =
        Schema::strict("CreateAccessTokenResponse")
            .field("success")
            .field("token")
            .field("id_access_token")
            .shape(Shape::Stringy)
            .finish();
}

/// A listed access token. Epoch-second fields; `expires` is `null` for
/// non-expiring tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub id_access_token: i64,
    pub name: String,
    pub created_on: i64,
    pub scope: String,
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(default)]
    pub last_successful_auth: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AccessTokensResponse {
    pub success: bool,
    pub tokens: Vec<AccessToken>,
}

/// Body of a successful token creation. `token` is the secret itself and
/// is only ever returned here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccessTokenResponse {
    pub success: bool,
    pub token: String,
    pub id_access_token: String,
}
