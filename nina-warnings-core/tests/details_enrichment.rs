use nina_warnings_core::adapter::{SeverityLevel, StatusType, Urgency};
use nina_warnings_core::contract::MockTransport;
use nina_warnings_core::details::{details_path, fetch_details};
use nina_warnings_core::{MessageId, WarnError};

fn transport_returning(body: String) -> MockTransport {
    let mut transport = MockTransport::new();
    transport
        .expect_get()
        .times(1)
        .returning(move |path: &str| {
            assert_eq!(path, "warnings/lhp.HOCHWASSERZENTRALEN.DE.1.json");
            Ok(body.clone())
        });
    transport
}

fn info_block(areas: usize, severity: &str, urgency: Option<&str>) -> String {
    let area_list = (0..areas)
        .map(|i| format!(r#"{{ "areaDesc": "Gebiet {i}" }}"#))
        .collect::<Vec<_>>()
        .join(",");
    let urgency = urgency
        .map(|u| format!(r#""urgency": "{u}","#))
        .unwrap_or_default();
    format!(
        r#"{{
            "headline": "Hochwasserwarnung",
            "description": "Pegel steigt.",
            "instruction": "Ufer meiden.",
            "severity": "{severity}",
            {urgency}
            "area": [{area_list}]
        }}"#
    )
}

fn document(infos: Vec<String>) -> String {
    format!(
        r#"{{ "identifier": "lhp.HOCHWASSERZENTRALEN.DE.1", "msgType": "Update", "info": [{}] }}"#,
        infos.join(",")
    )
}

fn id() -> MessageId {
    MessageId::new("lhp.HOCHWASSERZENTRALEN.DE.1")
}

#[test]
fn test_details_path_uses_message_id() {
    assert_eq!(
        details_path(&MessageId::new("mow.DE-NW-BN-SE030")),
        "warnings/mow.DE-NW-BN-SE030.json"
    );
}

#[test]
fn test_details_path_encodes_id_as_single_segment() {
    assert_eq!(
        details_path(&MessageId::new("biw.a/b?c#d e%")),
        "warnings/biw.a%2Fb%3Fc%23d%20e%25.json"
    );
}

#[tokio::test]
async fn test_single_info_and_area_is_fully_populated() {
    let transport = transport_returning(document(vec![info_block(1, "Severe", Some("Urgent"))]));

    let details = fetch_details(&transport, &id())
        .await
        .expect("Details should load")
        .expect("A single info/area document should produce details");

    assert_eq!(details.title, "Hochwasserwarnung");
    assert_eq!(details.area_description, "Gebiet 0");
    assert_eq!(details.description, "Pegel steigt.");
    assert_eq!(details.instruction, "Ufer meiden.");
    assert_eq!(details.severity_level, SeverityLevel::Severe);
    assert_eq!(details.urgency, Urgency::Urgent);
    assert_eq!(details.status, Some(StatusType::Update));
}

#[tokio::test]
async fn test_missing_urgency_defaults_to_undefined() {
    let transport = transport_returning(document(vec![info_block(1, "Minor", None)]));

    let details = fetch_details(&transport, &id()).await.unwrap().unwrap();

    assert_eq!(details.urgency, Urgency::Undefined);
}

#[tokio::test]
async fn test_zero_info_blocks_yields_no_details() {
    let transport = transport_returning(document(vec![]));
    let details = fetch_details(&transport, &id()).await.expect("No error expected");
    assert!(details.is_none());
}

#[tokio::test]
async fn test_two_info_blocks_yields_no_details() {
    let transport = transport_returning(document(vec![
        info_block(1, "Minor", None),
        info_block(1, "Minor", None),
    ]));
    let details = fetch_details(&transport, &id()).await.expect("No error expected");
    assert!(details.is_none());
}

#[tokio::test]
async fn test_area_cardinality_other_than_one_yields_no_details() {
    for areas in [0, 2] {
        let transport = transport_returning(document(vec![info_block(areas, "Minor", None)]));
        let details = fetch_details(&transport, &id()).await.expect("No error expected");
        assert!(details.is_none(), "{areas} areas should yield no details");
    }
}

#[tokio::test]
async fn test_null_shapes_yield_no_details() {
    let bodies = [
        "null".to_string(),
        r#"{ "msgType": "Alert", "info": null }"#.to_string(),
        document(vec![r#"{ "headline": "h", "severity": "Minor", "area": null }"#.to_string()]),
    ];

    for body in bodies {
        let transport = transport_returning(body.clone());
        let details = fetch_details(&transport, &id())
            .await
            .unwrap_or_else(|e| panic!("No error expected for {body}, got {e}"));
        assert!(details.is_none(), "Expected no details for {body}");
    }
}

#[tokio::test]
async fn test_unknown_detail_severity_is_fatal() {
    let transport = transport_returning(document(vec![info_block(1, "Unknown", None)]));

    let result = fetch_details(&transport, &id()).await;

    assert!(matches!(
        result,
        Err(WarnError::UnrecognizedToken { field: "severity", .. })
    ));
}

#[tokio::test]
async fn test_unknown_detail_urgency_is_fatal() {
    let transport = transport_returning(document(vec![info_block(1, "Minor", Some("Immediate"))]));

    let result = fetch_details(&transport, &id()).await;

    assert!(matches!(
        result,
        Err(WarnError::UnrecognizedToken { field: "urgency", .. })
    ));
}

#[tokio::test]
async fn test_invalid_detail_json_is_malformed() {
    let transport = transport_returning("not json".to_string());
    let result = fetch_details(&transport, &id()).await;
    assert!(matches!(result, Err(WarnError::MalformedResponse(_))));
}
