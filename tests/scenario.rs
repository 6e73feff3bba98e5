//! Scenario-to-journey tests
//!
//! Load YAML scenarios from disk, compile them and run them against a
//! seeded mock driver.

use std::io::Write;
use std::sync::Arc;

use journey::common::config::Config;
use journey::driver::mock::{DriverCall, MockDriver};
use journey::scenario::{compile, Scenario};
use journey::{Error, Runner};

fn write_scenario(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("create temp scenario");
    file.write_all(content.as_bytes()).expect("write scenario");
    file
}

#[tokio::test]
async fn test_scenario_runs_against_seeded_page() {
    let file = write_scenario(
        r#"
        name: Example journey
        steps:
          - action: navigate
            url: https://www.example.com/
            description: Open https://www.example.com/
            category: Example Journey
          - action: assert_title
            equals: Example Domain
          - action: find
            selector: p > a
          - action: click
            description: Click the link on the page
        "#,
    );

    let scenario = Scenario::load(file.path()).unwrap();
    let steps = compile(&scenario);

    let driver = Arc::new(MockDriver::default().with_title("Example Domain"));
    let report = Runner::new(driver.clone(), Config::default())
        .run(steps)
        .await
        .unwrap();

    assert_eq!(report.steps, 4);

    let calls = driver.calls();
    assert!(calls.contains(&DriverCall::Navigate("https://www.example.com/".to_string())));
    assert!(calls.contains(&DriverCall::Title));
    assert!(calls.contains(&DriverCall::Find("p > a".to_string())));
    assert!(calls.iter().any(|c| matches!(c, DriverCall::Click(_))));
}

#[tokio::test]
async fn test_soft_title_mismatch_fails_journey_with_count() {
    let file = write_scenario(
        r#"
        name: Title check
        steps:
          - action: navigate
            url: https://www.example.com/
          - action: assert_title
            equals: Example Domain
            severity: soft
        "#,
    );

    let scenario = Scenario::load(file.path()).unwrap();
    let driver = Arc::new(MockDriver::default().with_title("Service Unavailable"));
    let err = Runner::new(driver, Config::default())
        .run(compile(&scenario))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::JourneyFailed { count: 1 }));
}

#[tokio::test]
async fn test_missing_element_is_a_hard_stop_by_default() {
    let file = write_scenario(
        r##"
        name: Broken selector
        steps:
          - action: navigate
            url: https://www.example.com/
          - action: find
            selector: "#nope"
          - action: click
        "##,
    );

    let scenario = Scenario::load(file.path()).unwrap();
    let driver = Arc::new(MockDriver::default().with_missing_element("#nope"));
    let err = Runner::new(driver.clone(), Config::default())
        .run(compile(&scenario))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no such element"));
    // The click step after the hard failure never ran.
    assert!(!driver
        .calls()
        .iter()
        .any(|c| matches!(c, DriverCall::Click(_))));
}

#[tokio::test]
async fn test_click_without_selector_or_carried_element_fails() {
    let file = write_scenario(
        r#"
        name: Orphan click
        steps:
          - action: click
        "#,
    );

    let scenario = Scenario::load(file.path()).unwrap();
    let driver = Arc::new(MockDriver::default());
    let err = Runner::new(driver, Config::default())
        .run(compile(&scenario))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no carried element"));
}

#[test]
fn test_load_rejects_invalid_yaml() {
    let file = write_scenario("name: [unclosed");
    let err = Scenario::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::ScenarioParse(_)));
}

#[test]
fn test_load_reports_missing_file() {
    let err = Scenario::load(std::path::Path::new("/nonexistent/journey.yaml")).unwrap_err();
    assert!(matches!(err, Error::FileRead { .. }));
}
