use assert_cmd::Command;
use chrono::{Local, TimeZone};
use nina_warnings::cli::{format_message, run, Cli, Commands};
use nina_warnings::load_config::BASE_URL_ENV;
use nina_warnings_core::adapter::{ContentType, SeverityLevel, Urgency};
use nina_warnings_core::{MessageId, WarningMessage, WarningMessageDetails};
use predicates::prelude::*;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

fn config_without_endpoint() -> NamedTempFile {
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    write(config.path(), b"warnings:\n  base_url: null\nsources: [dwd]\n")
        .expect("Writing temp config failed");
    config
}

fn sample_message() -> WarningMessage {
    WarningMessage::new(
        MessageId::new("dwd.1"),
        1,
        Local.with_ymd_and_hms(2023, 11, 14, 23, 13, 0).unwrap(),
        SeverityLevel::Severe,
        ContentType::Alert,
        "Amtliche WARNUNG vor STURMBÖEN".to_string(),
    )
}

#[test]
fn test_format_message_without_details() {
    assert_eq!(
        format_message(&sample_message()),
        "14.11.2023 23:13 Uhr: (Alarm / schwerwiegend) Amtliche WARNUNG vor STURMBÖEN"
    );
}

#[test]
fn test_format_message_with_details() {
    let message = sample_message().with_details(Some(WarningMessageDetails {
        title: "Sturmböen".to_string(),
        area_description: "Stadt Erfurt".to_string(),
        description: "Es treten Sturmböen auf.".to_string(),
        instruction: "Fenster schließen.".to_string(),
        severity_level: SeverityLevel::Severe,
        urgency: Urgency::Urgent,
        status: None,
    }));

    let formatted = format_message(&message);

    assert!(formatted.contains("\n    Sturmböen [Stadt Erfurt]"));
    assert!(formatted.ends_with("\n    Fenster schließen."));
}

#[tokio::test]
#[serial]
async fn emits_trace_initialised_event_and_fails_without_endpoint() {
    env::remove_var(BASE_URL_ENV);
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let config = config_without_endpoint();
    let cli = Cli {
        command: Commands::Warnings {
            config: Some(config.path().to_path_buf()),
            sources: vec![],
            details: false,
        },
    };

    let result = run(cli).await;

    assert!(result.is_err(), "A missing base URL must fail before any request");
    assert!(format!("{:#}", result.unwrap_err()).contains("invalid configuration"));
    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

#[test]
fn sources_command_lists_every_source() {
    let mut cmd = Command::cargo_bin("nina-warnings").expect("Binary exists");

    cmd.arg("sources")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("katwarn")
                .and(predicate::str::contains("Deutscher Wetterdienst"))
                .and(predicate::str::contains("lhp")),
        );
}

#[test]
fn warnings_command_exits_non_zero_on_configuration_error() {
    let config = config_without_endpoint();
    let mut cmd = Command::cargo_bin("nina-warnings").expect("Binary exists");

    cmd.arg("warnings")
        .arg("--config")
        .arg(config.path())
        .env_remove(BASE_URL_ENV)
        .assert()
        .failure();
}

#[test]
fn warnings_command_rejects_unknown_source() {
    let mut cmd = Command::cargo_bin("nina-warnings").expect("Binary exists");

    cmd.arg("warnings")
        .arg("--source")
        .arg("tsunami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown source"));
}
