use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::schema::{Schema, SchemaBuilder, Shape};

/* Field table shared by the plain and the extended site record. Several
 * boolean flags arrive as 0/1 integers, phone numbers arrive as bare
 * integers, and the geofence is a JSON document wrapped in a string. */
fn site_fields(table: SchemaBuilder) -> SchemaBuilder {
    table
        .field("id_site")
        .field("access_level")
        .field("owner")
        .shape(Shape::LenientBool)
        .field("is_admin")
        .shape(Shape::LenientBool)
        .field("name")
        .field("identifier")
        .field("id_user")
        .field("pv_max")
        .field("timezone")
        .optional("phonenumber")
        .shape(Shape::Stringy)
        .optional("notes")
        .optional("geofence")
        .shape(Shape::JsonText)
        .field("geofence_enabled")
        .shape(Shape::LenientBool)
        .field("realtime_updates")
        .shape(Shape::LenientBool)
        .field("has_mains")
        .shape(Shape::LenientBool)
        .field("has_generator")
        .shape(Shape::LenientBool)
        .optional("no_data_alarm_timeout")
        .field("alarm_monitoring")
        .field("invalid_vrm_auth_token_used_in_log_request")
        .wire("invalidVRMAuthTokenUsedInLogRequest")
        .shape(Shape::LenientBool)
        .field("syscreated")
        .field("shared")
        .shape(Shape::LenientBool)
        .optional("device_icon")
        .field("is_paygo")
        .shape(Shape::LenientBool)
        .optional("paygo_currency")
        .optional("paygo_total_amount")
        .optional("id_currency")
        .optional("currency_code")
        .optional("currency_sign")
        .optional("currency_name")
        .field("inverter_charger_control")
        .shape(Shape::LenientBool)
}

lazy_static! {
    pub static ref SITE: Schema = site_fields(Schema::strict("Site")).finish();

    /* The extended payload adds top-level fields over time; anything not
     * declared here is retained verbatim. Its own wire names are snake_case
     * already, which populate-by-name covers without overrides. */
    pub static ref SITE_EXTENDED: Schema = site_fields(Schema::permissive("SiteExtended"))
        .optional("alarm")
        .shape(Shape::LenientBool)
        .optional("last_timestamp")
        .optional("current_time")
        .optional("timezone_offset")
        .optional("demo_mode")
        .shape(Shape::LenientBool)
        .optional("mqtt_webhost")
        .optional("mqtt_host")
        .optional("high_workload")
        .shape(Shape::LenientBool)
        .optional("current_alarms")
        .optional("tags")
        .optional("extended")
        .finish();

    pub static ref EXTENDED_ATTRIBUTE: Schema = Schema::permissive("ExtendedAttribute")
        .optional("id_data_attribute")
        .optional("code")
        .optional("description")
        .optional("format_with_unit")
        .optional("data_type")
        .optional("raw_value")
        .optional("formatted_value")
        .optional("timestamp")
        .optional("attributes")
        .shape(Shape::SelfList)
        .finish();

    pub static ref USER_SITES_RESPONSE: Schema = Schema::strict("UserSitesResponse")
        .field("success")
        .field("records")
        .shape(Shape::ModelList(&SITE))
        .finish();

    pub static ref USER_SITES_EXTENDED_RESPONSE: Schema =
        Schema::strict("UserSitesExtendedResponse")
            .field("success")
            .field("records")
            .shape(Shape::ModelList(&SITE_EXTENDED))
            .finish();
}

/// A non-extended installation record.
#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    pub id_site: i64,
    pub access_level: i64,
    pub owner: bool,
    pub is_admin: bool,
    pub name: String,
    pub identifier: String,
    pub id_user: i64,
    pub pv_max: i64,
    pub timezone: String,
    #[serde(default)]
    pub phonenumber: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub geofence: Option<Value>,
    pub geofence_enabled: bool,
    pub realtime_updates: bool,
    pub has_mains: bool,
    pub has_generator: bool,
    #[serde(default)]
    pub no_data_alarm_timeout: Option<i64>,
    pub alarm_monitoring: i64,
    pub invalid_vrm_auth_token_used_in_log_request: bool,
    pub syscreated: i64,
    pub shared: bool,
    #[serde(default)]
    pub device_icon: Option<String>,
    /* present on every record, null on non-paygo accounts */
    pub is_paygo: Option<bool>,
    #[serde(default)]
    pub paygo_currency: Option<String>,
    #[serde(default)]
    pub paygo_total_amount: Option<f64>,
    #[serde(default)]
    pub id_currency: Option<i64>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub currency_sign: Option<String>,
    #[serde(default)]
    pub currency_name: Option<String>,
    pub inverter_charger_control: Option<bool>,
}

/// An extended installation record: the base site shape plus the extra
/// top-level fields of `extended=1` responses, plus whatever undeclared
/// fields the portal added since.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteExtended {
    #[serde(flatten)]
    pub site: Site,
    #[serde(default)]
    pub alarm: Option<bool>,
    #[serde(default)]
    pub last_timestamp: Option<i64>,
    #[serde(default)]
    pub current_time: Option<String>,
    #[serde(default)]
    pub timezone_offset: Option<i64>,
    #[serde(default)]
    pub demo_mode: Option<bool>,
    #[serde(default)]
    pub mqtt_webhost: Option<String>,
    #[serde(default)]
    pub mqtt_host: Option<String>,
    #[serde(default)]
    pub high_workload: Option<bool>,
    #[serde(default)]
    pub current_alarms: Option<Vec<Value>>,
    #[serde(default)]
    pub tags: Option<Value>,
    /// Raw `extended` block; see [`SiteExtended::extended_attributes`].
    #[serde(default)]
    pub extended: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteExtended {
    /// Validate the raw `extended` block into attribute nodes on demand.
    /// An absent or `null` block yields an empty vector; anything other
    /// than a list of attribute objects is a validation error.
    pub fn extended_attributes(&self) -> Result<Vec<ExtendedAttribute>, Error> {
        let items = match &self.extended {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(Error::validation(
                    "SiteExtended.extended",
                    "expected a list of attribute objects",
                    other,
                ))
            }
        };
        let mut attributes = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let path = format!("SiteExtended.extended[{}]", index);
            attributes.push(EXTENDED_ATTRIBUTE.parse_at(&path, item.clone())?);
        }
        Ok(attributes)
    }
}

/// One node of the recursive `extended` attribute tree. A leaf simply has
/// no child attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedAttribute {
    #[serde(default)]
    pub id_data_attribute: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub format_with_unit: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub raw_value: Option<Value>,
    #[serde(default)]
    pub formatted_value: Option<String>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub attributes: Vec<ExtendedAttribute>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct UserSitesResponse {
    pub success: bool,
    pub records: Vec<Site>,
}

#[derive(Debug, Deserialize)]
pub struct UserSitesExtendedResponse {
    pub success: bool,
    pub records: Vec<SiteExtended>,
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn extended_attribute_nodes_nest() {
        let node: ExtendedAttribute = EXTENDED_ATTRIBUTE
            .parse(json!({
                "idDataAttribute": 81,
                "code": "bs",
                "description": "Battery state",
                "attributes": [
                    {"code": "v", "rawValue": 52.1, "attributes": []},
                    {"code": "i", "rawValue": -3.2}
                ]
            }))
            .unwrap();
        assert_eq!(node.id_data_attribute, Some(81));
        assert_eq!(node.attributes.len(), 2);
        assert_eq!(node.attributes[0].code.as_deref(), Some("v"));
        assert!(node.attributes[1].attributes.is_empty());
    }

    #[test]
    fn extended_attribute_keeps_undeclared_fields() {
        let node: ExtendedAttribute = EXTENDED_ATTRIBUTE
            .parse(json!({"code": "bs", "secondsAgo": {"value": 5}}))
            .unwrap();
        assert_eq!(node.extra.get("secondsAgo"), Some(&json!({"value": 5})));
    }

    #[test]
    fn extended_attribute_rejects_non_object_children() {
        let err = EXTENDED_ATTRIBUTE
            .parse::<ExtendedAttribute>(json!({"attributes": [42]}))
            .unwrap_err();
        match err {
            Error::Validation { path, .. } => {
                assert_eq!(path, "ExtendedAttribute.attributes[0]")
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
