use serde::Deserialize;

use crate::schema::Schema;

lazy_static! {
    pub static ref LOGIN_RESPONSE: Schema = Schema::strict("LoginResponse")
        .field("token")
        .field("id_user")
        .optional("verification_mode")
        .optional("verification_sent")
        .optional("status")
        .finish();
}

/// Body of a successful `/auth/login` (and, with the user id injected,
/// `/auth/loginAsDemo`) response. The verification fields are absent on
/// some login paths.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub id_user: i64,
    #[serde(default)]
    pub verification_mode: Option<String>,
    #[serde(default)]
    pub verification_sent: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
}
