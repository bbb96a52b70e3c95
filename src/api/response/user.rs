use serde::Deserialize;
use serde_json::{Map, Value};

use crate::schema::{Schema, SchemaBuilder, Shape};

fn site_user_fields(table: SchemaBuilder) -> SchemaBuilder {
    table
        .optional("id_user")
        .optional("name")
        .optional("email")
        .field("site_id")
        .wire("idSite")
        .field("access_level")
        .field("receives_alarm_notifications")
        .shape(Shape::LenientBool)
        .optional("avatar_url")
}

lazy_static! {
    pub static ref CURRENT_USER: Schema = Schema::permissive("CurrentUser")
        .optional("id_user")
        .optional("name")
        .optional("email")
        .optional("country")
        .finish();

    pub static ref ME_RESPONSE: Schema = Schema::strict("MeResponse")
        .field("success")
        .field("user")
        .shape(Shape::Model(&CURRENT_USER))
        .finish();

    pub static ref SITE_USER: Schema =
        site_user_fields(Schema::permissive("SiteUser")).finish();

    pub static ref INVITED_SITE_USER: Schema =
        site_user_fields(Schema::permissive("InvitedSiteUser"))
            .optional("created")
            .finish();

    pub static ref SITE_USERS_RESPONSE: Schema = Schema::strict("SiteUsersResponse")
        .field("success")
        .field("users")
        .shape(Shape::ModelList(&SITE_USER))
        .field("invites")
        .shape(Shape::ModelList(&INVITED_SITE_USER))
        .field("pending")
        .field("user_groups")
        .field("site_groups")
        .finish();
}

/// The authenticated account, from `/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub id_user: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: CurrentUser,
}

/// A user with access to an installation.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteUser {
    #[serde(default)]
    pub id_user: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub site_id: i64,
    pub access_level: i64,
    pub receives_alarm_notifications: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An invited-but-not-yet-registered user; `created` is the invitation
/// epoch second.
#[derive(Debug, Clone, Deserialize)]
pub struct InvitedSiteUser {
    #[serde(flatten)]
    pub user: SiteUser,
    #[serde(default)]
    pub created: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SiteUsersResponse {
    pub success: bool,
    pub users: Vec<SiteUser>,
    pub invites: Vec<InvitedSiteUser>,
    pub pending: Vec<Value>,
    pub user_groups: Vec<Value>,
    pub site_groups: Vec<Value>,
}
