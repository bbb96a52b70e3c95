//! String-casing and epoch-time conversions.
//!
//! The VRM portal mixes `camelCase`, `snake_case` and bare abbreviations in
//! its wire payloads; the schema layer folds them all onto snake_case field
//! names using the converters in this module. Time ranges are sent to the
//! API as integer epoch seconds, rounded up.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use regex::Regex;

lazy_static! {
    static ref SEPARATOR_RUNS: Regex = Regex::new(r"[-\s]+").unwrap();
    static ref UPPER_WORD_START: Regex = Regex::new(r"(.)([A-Z][a-z]+)").unwrap();
    static ref LOWER_TO_UPPER: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    static ref UNDERSCORE_RUNS: Regex = Regex::new(r"_+").unwrap();
}

/// Convert a wire identifier (camelCase, PascalCase, kebab-case,
/// space-separated, or any mix of those) to snake_case.
///
/// Acronym runs keep their last capital as the start of the next word
/// (`HTTPRequest` becomes `http_request`), a trailing acronym run stays one
/// word (`ALLCAPS` becomes `allcaps`). The function is idempotent.
pub fn to_snake_case(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let s = SEPARATOR_RUNS.replace_all(s.trim(), "_");
    let s = UPPER_WORD_START.replace_all(&s, "${1}_${2}");
    let s = LOWER_TO_UPPER.replace_all(&s, "${1}_${2}");
    let s = s.to_lowercase();
    let s = UNDERSCORE_RUNS.replace_all(&s, "_");

    s.trim_matches('_').to_string()
}

/// Convert a snake_case identifier to camelCase.
///
/// A string without underscores is returned unchanged, case preserved.
/// Otherwise the first segment is kept as-is and every following segment is
/// title-cased; empty segments contribute nothing, so `a___b` gives `aB`
/// and an underscores-only input gives an empty string. A leading
/// underscore therefore puts the first named segment in title-cased
/// position (`_leading_underscore` gives `LeadingUnderscore`). Not an
/// inverse of [`to_snake_case`]: `a_b_c_d` gives `aBCD`.
pub fn snake_case_to_camel_case(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let components: Vec<&str> = s.split('_').collect();
    if components.len() == 1 {
        return components[0].to_string();
    }
    let mut out = String::from(components[0]);
    for component in &components[1..] {
        out.push_str(&title_case(component));
    }
    out
}

/* Title-case one segment: uppercase each letter that follows a non-letter
 * (or the segment start), lowercase every other letter. Digits break words,
 * so "v10" gives "V10" and "2update" gives "2Update". */
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alphabetic = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(c);
            prev_alphabetic = false;
        }
    }
    out
}

/// Convert a timezone-aware datetime to integer epoch seconds, rounding
/// any sub-second remainder up to the next whole second. A microsecond past
/// the hour already counts as the next second; the API treats range bounds
/// as inclusive whole seconds.
pub fn datetime_to_epoch<Tz: TimeZone>(dt: &DateTime<Tz>) -> i64 {
    let seconds = dt.timestamp();
    /* chrono keeps the subsecond part non-negative, pre-epoch included */
    if dt.timestamp_subsec_nanos() > 0 {
        seconds + 1
    } else {
        seconds
    }
}

/// [`datetime_to_epoch`] for a naive datetime, which is taken to be UTC.
/// No local-timezone inference happens anywhere in this crate.
pub fn naive_datetime_to_epoch(dt: &NaiveDateTime) -> i64 {
    datetime_to_epoch(&dt.and_utc())
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, micro: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_micro_opt(h, mi, s, micro)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn snake_case_from_camel_and_pascal() {
        let cases: &[(&str, &str)] = &[
            ("someVariableName", "some_variable_name"),
            ("SomeVariableName", "some_variable_name"),
            ("Value", "value"),
            ("Single", "single"),
            ("A", "a"),
            ("CapWord", "cap_word"),
        ];
        for &(input, expected) in cases {
            assert_eq!(to_snake_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn snake_case_from_kebab_and_spaces() {
        let cases: &[(&str, &str)] = &[
            ("my-kebab-string", "my_kebab_string"),
            ("A String With Spaces", "a_string_with_spaces"),
            ("  leading and trailing spaces  ", "leading_and_trailing_spaces"),
            ("word  multiple   spaces", "word_multiple_spaces"),
        ];
        for &(input, expected) in cases {
            assert_eq!(to_snake_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn snake_case_acronyms_and_alphanumerics() {
        let cases: &[(&str, &str)] = &[
            ("SGViolationRate", "sg_violation_rate"),
            ("HTTPRequest", "http_request"),
            ("MyURLAddress", "my_url_address"),
            ("Ver1Value", "ver1_value"),
            ("Version2Update", "version2_update"),
            ("ANHTMLAbbreviation", "anhtml_abbreviation"),
            ("ABCCode", "abc_code"),
            ("CAMELValue", "camel_value"),
            ("SpecialHTTPRequest", "special_http_request"),
            ("anACRONYMNext", "an_acronym_next"),
        ];
        for &(input, expected) in cases {
            assert_eq!(to_snake_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn snake_case_all_caps() {
        assert_eq!(to_snake_case("ALLCAPS"), "allcaps");
        assert_eq!(to_snake_case("ALLCAPSWord"), "allcaps_word");
    }

    #[test]
    fn snake_case_already_snake() {
        let cases: &[(&str, &str)] = &[
            ("already_snake_case", "already_snake_case"),
            ("already_snake_case_with_UPPER", "already_snake_case_with_upper"),
            ("ALL_CAPS_SNAKE", "all_caps_snake"),
        ];
        for &(input, expected) in cases {
            assert_eq!(to_snake_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn snake_case_leading_trailing_and_mixed_separators() {
        let cases: &[(&str, &str)] = &[
            ("endsWithSeparator-", "ends_with_separator"),
            ("__DoubleUnderscorePascal__", "double_underscore_pascal"),
            ("_leadingUnderscore", "leading_underscore"),
            ("trailingUnderscore_", "trailing_underscore"),
            ("word__WithDoubleUnderscores", "word_with_double_underscores"),
            ("hyphenated-word_with_underscore", "hyphenated_word_with_underscore"),
        ];
        for &(input, expected) in cases {
            assert_eq!(to_snake_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn snake_case_keeps_non_ascii_letters() {
        assert_eq!(to_snake_case("überCamelCase"), "über_camel_case");
        assert_eq!(to_snake_case("caféLatteCup"), "café_latte_cup");
    }

    #[test]
    fn snake_case_edge_cases() {
        assert_eq!(to_snake_case(""), "");
        assert_eq!(to_snake_case("a"), "a");
        assert_eq!(to_snake_case(" "), "");
    }

    #[test]
    fn snake_case_common_wire_field_names() {
        let cases: &[(&str, &str)] = &[
            ("idSite", "id_site"),
            ("userId", "user_id"),
            (
                "invalidVRMAuthTokenUsedInLogRequest",
                "invalid_vrm_auth_token_used_in_log_request",
            ),
            ("inverterChargerControl", "inverter_charger_control"),
            ("idAccessToken", "id_access_token"),
            ("Pc", "pc"),
            ("Gc", "gc"),
            ("users", "users"),
            ("accessLevel", "access_level"),
            ("receivesAlarmNotifications", "receives_alarm_notifications"),
            ("siteId", "site_id"),
        ];
        for &(input, expected) in cases {
            assert_eq!(to_snake_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn snake_case_is_idempotent() {
        let inputs = [
            "someVariableName",
            "HTTPRequest",
            "my-kebab-string",
            "word  multiple   spaces",
            "__DoubleUnderscorePascal__",
            "ALLCAPSWord",
            "already_snake_case",
            "invalidVRMAuthTokenUsedInLogRequest",
            "Version2Update",
            "endsWithSeparator-",
        ];
        for input in &inputs {
            let once = to_snake_case(input);
            assert_eq!(to_snake_case(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn camel_case_empty_and_single_words() {
        let cases: &[(&str, &str)] = &[
            ("", ""),
            ("word", "word"),
            ("WORD", "WORD"),
            ("AnotherWord", "AnotherWord"),
            ("alreadyCamel", "alreadyCamel"),
        ];
        for &(input, expected) in cases {
            assert_eq!(snake_case_to_camel_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn camel_case_standard_conversions() {
        let cases: &[(&str, &str)] = &[
            ("snake_case", "snakeCase"),
            ("a_simple_example", "aSimpleExample"),
            ("id_currency", "idCurrency"),
            ("user_profile_image_url", "userProfileImageUrl"),
            ("first_name", "firstName"),
            ("is_active", "isActive"),
            ("http_response_code", "httpResponseCode"),
            ("a_b_c_d", "aBCD"),
        ];
        for &(input, expected) in cases {
            assert_eq!(snake_case_to_camel_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn camel_case_with_numbers() {
        let cases: &[(&str, &str)] = &[
            ("field_1", "field1"),
            ("version_2_update", "version2Update"),
            ("item_name_v10", "itemNameV10"),
            ("section_007_agent", "section007Agent"),
            ("q1_report", "q1Report"),
        ];
        for &(input, expected) in cases {
            assert_eq!(snake_case_to_camel_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn camel_case_underscore_edge_cases() {
        let cases: &[(&str, &str)] = &[
            ("_leading_underscore", "LeadingUnderscore"),
            ("trailing_underscore_", "trailingUnderscore"),
            ("__double_leading", "DoubleLeading"),
            ("double__underscore", "doubleUnderscore"),
            ("a___b", "aB"),
            ("_", ""),
            ("__", ""),
            ("___", ""),
        ];
        for &(input, expected) in cases {
            assert_eq!(snake_case_to_camel_case(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn camel_case_mixed_segments() {
        assert_eq!(
            snake_case_to_camel_case("YetAnother_word_With_Capitals"),
            "YetAnotherWordWithCapitals"
        );
    }

    #[test]
    fn epoch_naive_is_treated_as_utc() {
        let cases: &[(NaiveDateTime, i64)] = &[
            (utc(2023, 1, 1, 12, 0, 0, 0).naive_utc(), 1672574400),
            (utc(2023, 1, 1, 12, 0, 0, 1).naive_utc(), 1672574401),
            (utc(1970, 1, 1, 0, 0, 0, 0).naive_utc(), 0),
            (utc(1970, 1, 1, 0, 0, 0, 1).naive_utc(), 1),
        ];
        for &(input, expected) in cases {
            assert_eq!(naive_datetime_to_epoch(&input), expected, "input {}", input);
        }
    }

    #[test]
    fn epoch_aware_utc() {
        let cases: &[(DateTime<Utc>, i64)] = &[
            (utc(1970, 1, 1, 0, 0, 0, 0), 0),
            (utc(2023, 5, 15, 10, 30, 45, 0), 1684146645),
            (utc(2023, 5, 15, 10, 30, 45, 123456), 1684146646),
            (utc(2024, 1, 1, 0, 0, 0, 0), 1704067200),
        ];
        for &(input, expected) in cases {
            assert_eq!(datetime_to_epoch(&input), expected, "input {}", input);
        }
    }

    #[test]
    fn epoch_aware_other_timezones() {
        let cases: &[(i32, u32, u32, u32, u32, u32, u32, i32, i64)] = &[
            (2023, 7, 15, 12, 0, 0, 0, 2, 1689415200),
            (2023, 7, 15, 5, 0, 0, 0, -5, 1689415200),
            (2023, 7, 15, 12, 0, 0, 1, 2, 1689415201),
            (2023, 7, 15, 5, 0, 0, 999999, -5, 1689415201),
        ];
        for &(y, mo, d, h, mi, s, micro, offset_hours, expected) in cases {
            let tz = FixedOffset::east_opt(offset_hours * 3600).unwrap();
            let dt = NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_micro_opt(h, mi, s, micro)
                .unwrap()
                .and_local_timezone(tz)
                .unwrap();
            assert_eq!(datetime_to_epoch(&dt), expected, "input {}", dt);
        }
    }

    #[test]
    fn epoch_ceiling_rounding() {
        let cases: &[(u32, i64)] = &[
            (0, 1748563200),
            (1, 1748563201),
            (500000, 1748563201),
            (999999, 1748563201),
        ];
        for &(micro, expected) in cases {
            assert_eq!(datetime_to_epoch(&utc(2025, 5, 30, 0, 0, 0, micro)), expected);
        }
        // 1970-01-01T00:00:00.999999Z rounds up to 1
        assert_eq!(datetime_to_epoch(&utc(1970, 1, 1, 0, 0, 0, 999999)), 1);
        // pre-epoch instants also round toward the next whole second
        assert_eq!(datetime_to_epoch(&utc(1969, 12, 31, 23, 59, 59, 500000)), 0);
    }

    #[test]
    fn epoch_known_timestamps() {
        assert_eq!(datetime_to_epoch(&utc(2021, 9, 1, 12, 30, 15, 0)), 1630499415);
        assert_eq!(naive_datetime_to_epoch(&utc(2021, 9, 1, 12, 30, 15, 500).naive_utc()), 1630499416);
        assert_eq!(datetime_to_epoch(&utc(2025, 1, 18, 22, 10, 30, 987654)), 1737238231);
    }

    #[test]
    fn epoch_naive_matches_aware_utc() {
        let aware = utc(2023, 5, 15, 10, 30, 45, 123456);
        assert_eq!(naive_datetime_to_epoch(&aware.naive_utc()), datetime_to_epoch(&aware));
    }
}
