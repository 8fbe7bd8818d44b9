//! Tests for configuration loading, the facility table and booking URLs.

use canoebot_src::{
    CacheConfig, CacheConfigBuilder, Facilities, Facility, SrcConfig, SrcWebsite, request_date,
};
use chrono::NaiveDate;
use std::io::Write;
use std::time::Duration;

const BUNDLED: &str = include_str!("../../../canoebot.toml");

#[test]
fn test_bundled_config_parses() {
    let config = SrcConfig::from_toml_str(BUNDLED).unwrap();

    assert_eq!(config.cache(), &CacheConfig::default());
    assert_eq!(config.cache().long_ttl(), Duration::from_secs(600));
    assert_eq!(config.cache().short_ttl(), Duration::from_secs(60));
    assert_eq!(config.cache().fetch_timeout(), Duration::from_secs(10));

    let facilities = config.facilities().unwrap();
    assert_eq!(facilities.len(), 6);
    assert_eq!(facilities.get(0).unwrap().code_name(), "WG");
}

#[test]
fn test_from_file_with_partial_cache_section() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[cache]
long_ttl_secs = 900

[[facilities]]
name = "Squash Courts"
short_name = "squash"
code_name = "SQ"
courts = 4
"#
    )
    .unwrap();

    let config = SrcConfig::from_file(file.path()).unwrap();

    assert_eq!(*config.cache().long_ttl_secs(), 900);
    assert_eq!(*config.cache().short_ttl_secs(), 60);
    assert_eq!(config.facilities().unwrap().len(), 1);
}

#[test]
fn test_missing_file_is_config_error() {
    let err = SrcConfig::from_file("/nonexistent/canoebot.toml").unwrap_err();

    assert!(err.to_string().contains("Failed to read config file"));
    assert_eq!(err.as_config().unwrap().setting, "/nonexistent/canoebot.toml");
}

#[test]
fn test_short_ttl_above_long_ttl_is_rejected() {
    let toml = r#"
[cache]
long_ttl_secs = 30
short_ttl_secs = 60

[[facilities]]
name = "Wave Gym"
short_name = "wavegym"
code_name = "WG"
courts = 20
"#;

    let err = SrcConfig::from_toml_str(toml).unwrap_err();

    let config_err = err.as_config().unwrap();
    assert_eq!(config_err.setting, "short_ttl_secs");
    assert_eq!(config_err.reason, "60s must not exceed long_ttl_secs (30s)");
}

#[test]
fn test_empty_facility_list_is_rejected() {
    let err = SrcConfig::from_toml_str("[cache]\nlong_ttl_secs = 600\n").unwrap_err();

    assert!(err.to_string().contains("facility list is empty"));
    assert_eq!(err.as_config().unwrap().setting, "facilities");
}

#[test]
fn test_facility_validation() {
    let no_courts = Facilities::new(vec![Facility::new("Gym", "gym", "WG", 0)]).unwrap_err();
    assert_eq!(no_courts.as_config().unwrap().setting, "facilities.WG.courts");
    assert!(
        Facilities::new(vec![
            Facility::new("Gym", "gym", "WG", 20),
            Facility::new("Other Gym", "gym2", "wg", 10),
        ])
        .is_err()
    );
    assert!(Facilities::new(vec![Facility::new("Gym", "gym", " ", 20)]).is_err());
}

#[test]
fn test_facility_lookup() {
    let facilities = SrcConfig::from_toml_str(BUNDLED).unwrap().facilities().unwrap();

    assert_eq!(facilities.find("2"), Some(1));
    assert_eq!(facilities.find("0"), None);
    assert_eq!(facilities.find("7"), None);
    assert_eq!(facilities.find("tc"), Some(2));
    assert_eq!(facilities.find("Squash"), Some(3));
    assert_eq!(facilities.find("swimming pool lane"), Some(5));
    assert_eq!(facilities.find("rowing"), None);
}

#[test]
fn test_facility_listings() {
    let facilities = Facilities::new(vec![
        Facility::new("Wave Gym", "wavegym", "WG", 20),
        Facility::new("Tennis Courts", "tennis", "TC", 6),
    ])
    .unwrap();

    assert_eq!(facilities.shortform_list(), vec!["wavegym", "tennis"]);
    assert_eq!(facilities.show_table(), "no  facility\n 1  Wave Gym\n 2  Tennis Courts\n");
}

#[test]
fn test_builder_defaults_and_setters() {
    let config = CacheConfigBuilder::default()
        .fetch_timeout_secs(3u64)
        .build()
        .unwrap()
        .with_short_ttl_secs(5);

    assert_eq!(*config.fetch_timeout_secs(), 3);
    assert_eq!(*config.short_ttl_secs(), 5);
    assert_eq!(*config.long_ttl_secs(), 600);
    assert_eq!(config.refresh_interval(), Duration::from_secs(600));
}

#[test]
fn test_request_date_format() {
    let date = NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();

    assert_eq!(request_date(date), "05-DEC-24");
}

#[test]
fn test_table_url_fills_placeholders() {
    let config = CacheConfig::default()
        .with_url_template("https://src.example/q?f={code}&c={courts}&d={date}".to_string());
    let website = SrcWebsite::new(&config).unwrap();
    let facility = Facility::new("Badminton Courts", "badminton", "BB", 6);

    let url = website.table_url(&facility, NaiveDate::from_ymd_opt(2023, 7, 3).unwrap());

    assert_eq!(url, "https://src.example/q?f=BB&c=6&d=03-JUL-23");
}

#[test]
fn test_default_url_points_at_src() {
    let website = SrcWebsite::new(&CacheConfig::default()).unwrap();
    let facility = Facility::new("Wave Gym", "wavegym", "WG", 20);

    let url = website.table_url(&facility, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());

    assert!(url.contains("fcode=WG"));
    assert!(url.contains("fcourt=20"));
    assert!(url.contains("p_date=01-JAN-24"));
}
