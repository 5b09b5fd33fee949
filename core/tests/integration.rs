//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port in a background thread
//! and talks to it through the default `ureq` transport, so request building,
//! headers, status handling, and JSON decoding are exercised together.

use chrono::NaiveDate;
use hydros_client::models::AmendWellPermitsRequest;
use hydros_client::query::{ProductionQuery, SearchQuery, Sort};
use hydros_client::{set_access_token, set_host, Client, Error, Model, RemoteError, Service};
use uuid::Uuid;

/// Start the mock server and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn connect() -> Client {
    Client::new([set_host(start_server()), set_access_token("integration")]).unwrap()
}

#[test]
fn well_reads() {
    let client = connect();

    let well = client.well.get(1).unwrap();
    assert_eq!(well.serial, "W-0001");
    assert!(well.base.created_at.is_some());

    let wells = client.well.get_wells_by_ids(&[3, 2]).unwrap();
    assert_eq!(wells.iter().map(Model::id).collect::<Vec<_>>(), vec![3, 2]);

    let page = client
        .well
        .search(SearchQuery {
            filters: vec!["W-".to_string()],
            size: 10,
            sort: vec![Sort::desc("serial")],
            ..SearchQuery::default()
        })
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.results[0].serial, "W-0002");

    client.well.trigger_update(1).unwrap();
    assert!(client.well.get(1).unwrap().base.updated_at.is_some());
}

#[test]
fn missing_resources_surface_the_api_error() {
    let client = connect();

    let err = client.well.get(99).unwrap_err();
    match &err {
        Error::Remote(remote) => assert_eq!(remote.status(), 404),
        other => panic!("expected a remote error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "not found: well 99 does not exist");

    assert!(matches!(
        client.well.trigger_update(99),
        Err(Error::Remote(RemoteError::Api { status: 404, .. }))
    ));
}

#[test]
fn requests_without_a_token_are_rejected() {
    let client = Client::new([set_host(start_server())]).unwrap();
    let err = client.driller.get(7).unwrap_err();
    assert_eq!(err.to_string(), "unauthorized: a bearer token is required");
}

#[test]
fn model_methods_follow_their_service() {
    let client = connect();

    let well = client.well.get(1).unwrap();
    let permits = well.permits().unwrap();
    assert_eq!(permits.len(), 1);
    assert!(permits[0].base.spec().is_none());

    let permit = permits[0].clone().init(client.permit.spec());
    let metrics = permit.metrics(None, None, false).unwrap();
    assert_eq!(metrics.meters_count, 2);
    assert_eq!(metrics.total_volume_produced, 325.0);
    assert!(!metrics.over_permitted_production);
}

#[test]
fn amendment_is_recorded_in_history() {
    let client = connect();
    let update_id = Uuid::new_v4();

    let amended = client
        .permit
        .amend_well_permits(
            1,
            AmendWellPermitsRequest {
                history_update_id: update_id,
                patch: r#"[{"op":"replace","path":"/aggregate","value":true}]"#.to_string(),
            },
        )
        .unwrap();
    assert_eq!(amended.len(), 1);
    assert!(amended[0].aggregate);
    assert_eq!(amended[0].history_update_id, Some(update_id));

    let entry = client.history.get(update_id).unwrap();
    assert_eq!(entry.kind, "PermitModel");
    assert_eq!(entry.operation, "amend");

    let err = client
        .permit
        .amend_well_permits(
            1,
            AmendWellPermitsRequest {
                history_update_id: update_id,
                patch: "not json".to_string(),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Remote(RemoteError::Api { status: 400, .. })
    ));
}

#[test]
fn meters_readings_and_production() {
    let client = connect();

    let meters = client.meter.list_by_well_id(1).unwrap();
    assert_eq!(meters.len(), 2);
    assert_eq!(client.meter.get(1, 5).unwrap().name, "South");

    let reading = client.meter_reading.get(1, 4, 10).unwrap();
    assert_eq!(reading.reading, 350.0);

    let window = ProductionQuery {
        from_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        to_date: NaiveDate::from_ymd_opt(2024, 6, 30),
        estimate_bounds: false,
    };
    let by_well = client
        .meter_reading
        .get_production_by_well(1, window.clone())
        .unwrap();
    assert_eq!(by_well.len(), 2);
    assert_eq!(by_well[0].volume, 250.0);

    let by_meter = client
        .meter_reading
        .get_production_by_well_and_meter(1, 4, window)
        .unwrap();
    assert_eq!(by_meter.meter_id, 4);
    assert_eq!(by_meter.volume, 250.0);
    assert!(by_meter.from_date.is_some());
}

#[test]
fn seeded_history_and_drillers() {
    let client = connect();

    let entry = client.history.get(mock_server::SEEDED_UPDATE_ID).unwrap();
    assert_eq!(entry.kind, "WellModel");

    let driller = client.driller.get(7).unwrap();
    assert_eq!(driller.license_number.as_deref(), Some("TX-5581"));
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::new([set_host(format!("http://{addr}")), set_access_token("t")]).unwrap();
    assert!(matches!(client.well.get(1), Err(Error::Transport(_))));
}
