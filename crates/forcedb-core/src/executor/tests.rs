use super::*;
use crate::{
    codec::QueryResult,
    config::{ClientConfig, MAX_BATCH_REQUESTS},
    error::{Error, ErrorKind},
    session::Session,
    test_fixtures::{Account, SimpleBean, registry},
    transport::{Method, mock::ScriptedTransport},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing_test::traced_test;

fn session(transport: &Arc<ScriptedTransport>, config: ClientConfig) -> Session {
    Session::with_registry(transport.clone(), Arc::new(registry()), config)
}

fn bean(name: &str) -> SimpleBean {
    SimpleBean {
        name: Some(name.to_string()),
        ..SimpleBean::default()
    }
}

fn created(id: &str) -> Value {
    json!({ "statusCode": 201, "result": { "id": id, "success": true, "errors": [] } })
}

fn batch_requests(body: Option<&Value>) -> usize {
    body.and_then(|body| body["batchRequests"].as_array())
        .map_or(0, Vec::len)
}

#[test]
fn single_operation_bypasses_batch_envelope() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(201, &json!({ "id": "a01", "success": true, "errors": [] }));
    let session = session(&transport, ClientConfig::default());

    let result = session.create(&bean("one")).unwrap();

    assert_eq!(result.id, "a01");
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Post);
    assert_eq!(requests[0].path, "v58.0/sobjects/SimpleBean");
    assert_eq!(
        requests[0].body,
        Some(json!({ "attributes": { "type": "SimpleBean" }, "Name": "one" }))
    );
}

#[test]
fn results_are_matched_by_submission_order() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(
        200,
        &json!({
            "hasErrors": false,
            "trace": { "ignored": true },
            "results": [
                { "statusCode": 201, "result": { "id": "a1", "success": true, "errors": [] }, "headers": {} },
                { "statusCode": 201, "result": { "id": "a2", "success": true, "errors": [] }, "note": "x" },
                { "statusCode": 201, "result": { "id": "a3", "success": true, "errors": [] } }
            ]
        }),
    );
    let session = session(&transport, ClientConfig::default());

    let mut batch = session.batch();
    let ops = ["one", "two", "three"]
        .map(|name| batch.create(&bean(name)).unwrap());
    batch.execute();

    let ids = ops
        .iter()
        .map(|op| op.get().unwrap().id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["a1", "a2", "a3"]);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "v58.0/composite/batch");
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["haltOnError"], json!(false));
    assert_eq!(body["batchRequests"][1]["url"], json!("v58.0/sobjects/SimpleBean"));
    assert_eq!(body["batchRequests"][1]["method"], json!("POST"));
    assert_eq!(body["batchRequests"][1]["richInput"]["Name"], json!("two"));
}

#[test]
#[traced_test]
fn result_count_mismatch_fails_every_operation() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(200, &json!({ "results": [created("a1"), created("a2")] }));
    let session = session(&transport, ClientConfig::default());

    let mut batch = session.batch();
    let ops = ["one", "two", "three"]
        .map(|name| batch.create(&bean(name)).unwrap());
    batch.execute();

    for op in &ops {
        assert!(op.is_done());
        assert_eq!(op.get().unwrap_err().kind(), ErrorKind::BatchProtocolViolation);
    }
    assert!(logs_contain("round trip failed"));
}

#[test]
fn operations_are_chunked_at_protocol_cap() {
    let transport = Arc::new(ScriptedTransport::new());
    let first = (0..MAX_BATCH_REQUESTS)
        .map(|i| created(&format!("a{i}")))
        .collect::<Vec<_>>();
    transport.push_json(200, &json!({ "results": first }));
    transport.push_json(200, &json!({ "results": (0..5).map(|i| created(&format!("b{i}"))).collect::<Vec<_>>() }));
    let session = session(
        &transport,
        ClientConfig {
            batch_limit: 100,
            ..ClientConfig::default()
        },
    );

    let mut batch = session.batch();
    let ops = (0..30)
        .map(|i| batch.create(&bean(&i.to_string())).unwrap())
        .collect::<Vec<_>>();
    batch.execute();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(batch_requests(requests[0].body.as_ref()), MAX_BATCH_REQUESTS);
    assert_eq!(batch_requests(requests[1].body.as_ref()), 5);
    assert_eq!(ops[24].get().unwrap().id, "a24");
    assert_eq!(ops[25].get().unwrap().id, "b0");
}

#[test]
#[traced_test]
fn halt_on_error_fails_round_trips_not_yet_sent() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_failure("connection reset");
    let session = session(
        &transport,
        ClientConfig {
            halt_on_error: true,
            batch_limit: 2,
            ..ClientConfig::default()
        },
    );

    let mut batch = session.batch();
    let ops = ["a", "b", "c", "d", "e"].map(|name| batch.create(&bean(name)).unwrap());
    batch.execute();

    assert_eq!(transport.requests().len(), 1);
    for op in &ops {
        assert_eq!(op.get().unwrap_err().kind(), ErrorKind::Transport);
    }
    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(body["haltOnError"], json!(true));
    assert!(logs_contain("halted"));
}

#[test]
fn failed_round_trip_without_halt_leaves_later_round_trips_alone() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_failure("connection reset");
    transport.push_json(200, &json!({ "results": [created("c1"), created("d1")] }));
    let session = session(
        &transport,
        ClientConfig {
            batch_limit: 2,
            ..ClientConfig::default()
        },
    );

    let mut batch = session.batch();
    let ops = ["a", "b", "c", "d"].map(|name| batch.create(&bean(name)).unwrap());
    batch.execute();

    assert_eq!(ops[0].get().unwrap_err().kind(), ErrorKind::Transport);
    assert_eq!(ops[1].get().unwrap_err().kind(), ErrorKind::Transport);
    assert_eq!(ops[2].get().unwrap().id, "c1");
    assert_eq!(ops[3].get().unwrap().id, "d1");
}

#[test]
fn sub_request_errors_stay_on_their_operation() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(
        200,
        &json!({
            "hasErrors": true,
            "results": [
                created("a1"),
                { "statusCode": 400, "result": [
                    { "errorCode": "REQUIRED_FIELD_MISSING", "message": "Required fields are missing", "fields": ["Name"] }
                ] }
            ]
        }),
    );
    let session = session(&transport, ClientConfig::default());

    let mut batch = session.batch();
    let ok = batch.create(&bean("one")).unwrap();
    let bad = batch.create(&bean("two")).unwrap();
    batch.execute();

    assert_eq!(ok.get().unwrap().id, "a1");
    let err = bad.into_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteRequest);
    assert_eq!(
        err.to_string(),
        "REQUIRED_FIELD_MISSING: Required fields are missing (fields: Name)"
    );
}

#[test]
fn unparseable_batch_response_is_a_transport_error() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_raw(200, "<html>gateway</html>");
    let session = session(&transport, ClientConfig::default());

    let mut batch = session.batch();
    let ops = ["a", "b"].map(|name| batch.create(&bean(name)).unwrap());
    batch.execute();

    for op in &ops {
        assert_eq!(op.get().unwrap_err().kind(), ErrorKind::Transport);
    }
}

#[test]
fn disabled_batching_sends_each_operation_directly() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(201, &json!({ "id": "a1", "success": true }));
    transport.push_json(201, &json!({ "id": "a2", "success": true }));
    let session = session(
        &transport,
        ClientConfig {
            api_version: "30.0".to_string(),
            ..ClientConfig::default()
        },
    );

    let mut batch = session.batch();
    let ops = ["a", "b"].map(|name| batch.create(&bean(name)).unwrap());
    batch.execute();

    let paths = transport
        .requests()
        .into_iter()
        .map(|request| request.path)
        .collect::<Vec<_>>();
    assert_eq!(paths, ["v30.0/sobjects/SimpleBean", "v30.0/sobjects/SimpleBean"]);
    assert_eq!(ops[1].get().unwrap().id, "a2");
}

#[test]
fn get_requests_simple_fields_and_maps_missing_record() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(200, &json!({ "Id": "a1", "Name": "one", "Description": null }));
    transport.push_json(404, &json!([{ "errorCode": "NOT_FOUND", "message": "gone" }]));
    let session = session(&transport, ClientConfig::default());

    let found = session.get::<SimpleBean>("a1").unwrap();
    assert_eq!(found.name.as_deref(), Some("one"));
    assert_eq!(
        transport.requests()[0].path,
        "v58.0/sobjects/SimpleBean/a1?fields=Id%2CName%2CDescription"
    );

    let err = session.get::<SimpleBean>("a2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RecordNotFound);
}

#[test]
fn unauthorized_status_is_its_own_kind() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(
        401,
        &json!([{ "errorCode": "INVALID_SESSION_ID", "message": "Session expired" }]),
    );
    let session = session(&transport, ClientConfig::default());

    let err = session.delete::<SimpleBean>("a1").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.server_errors()[0].error_code, "INVALID_SESSION_ID");
    assert_eq!(transport.requests()[0].method, Method::Delete);
}

#[test]
fn remote_error_without_entries_reports_status() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(503);
    let session = session(&transport, ClientConfig::default());

    let err = session.delete::<SimpleBean>("a1").unwrap_err();

    assert_eq!(err.to_string(), "HTTP status 503");
}

#[test]
fn non_json_error_bodies_keep_their_status_kind() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_raw(401, "Session expired or invalid");
    transport.push_raw(502, "<html><body>Bad Gateway</body></html>");
    transport.push_raw(404, "Not Found");
    let session = session(&transport, ClientConfig::default());

    let unauthorized = session.delete::<SimpleBean>("a1").unwrap_err();
    assert_eq!(unauthorized.kind(), ErrorKind::Unauthorized);
    assert!(unauthorized.server_errors().is_empty());
    assert_eq!(unauthorized.to_string(), "unauthorized: HTTP status 401");

    let gateway = session.delete::<SimpleBean>("a1").unwrap_err();
    assert_eq!(gateway.kind(), ErrorKind::RemoteRequest);
    assert_eq!(gateway.to_string(), "HTTP status 502");

    let missing = session.get::<SimpleBean>("a2").unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::RecordNotFound);
}

#[test]
fn non_json_success_body_is_a_transport_error() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_raw(200, "<html>maintenance</html>");
    let session = session(&transport, ClientConfig::default());

    let err = session.get::<SimpleBean>("a1").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn server_error_status_does_not_halt_direct_operations() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_raw(502, "<html>Bad Gateway</html>");
    transport.push_json(201, &json!({ "id": "a2", "success": true }));
    let session = session(
        &transport,
        ClientConfig {
            api_version: "30.0".to_string(),
            halt_on_error: true,
            ..ClientConfig::default()
        },
    );

    let mut batch = session.batch();
    let ops = ["a", "b"].map(|name| batch.create(&bean(name)).unwrap());
    batch.execute();

    assert_eq!(transport.requests().len(), 2);
    assert_eq!(ops[0].get().unwrap_err().kind(), ErrorKind::RemoteRequest);
    assert_eq!(ops[1].get().unwrap().id, "a2");
}

#[test]
fn non_json_batch_error_status_is_a_remote_request_error() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_raw(503, "Service Unavailable");
    let session = session(&transport, ClientConfig::default());

    let mut batch = session.batch();
    let ops = ["a", "b"].map(|name| batch.create(&bean(name)).unwrap());
    batch.execute();

    for op in &ops {
        let err = op.get().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteRequest);
        assert_eq!(err.to_string(), "HTTP status 503");
    }
}

#[test]
fn synchronous_direct_query_follows_continuations() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(
        200,
        &json!({
            "totalSize": 2, "done": false,
            "nextRecordsUrl": "/services/data/v58.0/query/01g-1",
            "records": [{ "Id": "a1", "Name": "one" }]
        }),
    );
    transport.push_json(
        200,
        &json!({ "totalSize": 2, "done": true, "records": [{ "Id": "a2", "Name": "two" }] }),
    );
    let session = session(&transport, ClientConfig::default());

    let page: QueryResult<SimpleBean> = session.query("SELECT * FROM SimpleBean").unwrap();

    assert!(page.done);
    assert_eq!(page.len(), 2);
    let requests = transport.requests();
    assert_eq!(
        requests[0].path,
        "v58.0/query?q=SELECT+Id%2CName%2CDescription+FROM+SimpleBean"
    );
    assert_eq!(requests[1].path, "v58.0/query/01g-1");
}

#[test]
fn batched_query_with_continuation_is_too_many_rows() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(
        200,
        &json!({ "results": [
            { "statusCode": 200, "result": {
                "totalSize": 4000, "done": false,
                "nextRecordsUrl": "/services/data/v58.0/query/01g-1",
                "records": [{ "Id": "a1" }]
            } },
            { "statusCode": 200, "result": { "totalSize": 1, "done": true, "records": [{ "Id": "a9" }] } }
        ] }),
    );
    let session = session(&transport, ClientConfig::default());

    let mut batch = session.batch();
    let partial = batch.query::<SimpleBean>("SELECT Id FROM SimpleBean").unwrap();
    let complete = batch.query::<SimpleBean>("SELECT Id FROM SimpleBean LIMIT 1").unwrap();
    batch.execute();

    assert_eq!(partial.get().unwrap_err().kind(), ErrorKind::TooManyRows);
    assert_eq!(complete.get().unwrap().records[0].id.as_deref(), Some("a9"));
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn asynchronous_transport_never_follows_continuations() {
    let transport = Arc::new(ScriptedTransport::asynchronous());
    transport.push_json(
        200,
        &json!({
            "totalSize": 2, "done": false,
            "nextRecordsUrl": "/services/data/v58.0/query/01g-1",
            "records": []
        }),
    );
    let session = session(&transport, ClientConfig::default());

    let err = session.query::<SimpleBean>("SELECT Id FROM SimpleBean").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TooManyRows);
}

#[test]
fn query_all_uses_its_own_resource() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(200, &json!({ "totalSize": 0, "done": true, "records": [] }));
    let session = session(&transport, ClientConfig::default());

    let page = session.query_all::<SimpleBean>("SELECT Id FROM SimpleBean").unwrap();

    assert!(page.is_empty());
    assert!(transport.requests()[0].path.starts_with("v58.0/queryAll?q="));
}

#[test]
fn update_requires_an_id_before_anything_is_sent() {
    let transport = Arc::new(ScriptedTransport::new());
    let session = session(&transport, ClientConfig::default());

    let err = session.update(&bean("nameless")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Codec);
    assert!(transport.requests().is_empty());
}

#[test]
fn update_and_patch_address_the_record() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(204);
    transport.push_status(204);
    let session = session(&transport, ClientConfig::default());
    let account = Account {
        id: Some("001A".to_string()),
        name: Some("Acme".to_string()),
        ..Account::default()
    };

    session.update(&account).unwrap();
    session.patch(&account).unwrap();

    let requests = transport.requests();
    assert!(requests.iter().all(|r| r.method == Method::Patch));
    assert!(requests.iter().all(|r| r.path == "v58.0/sobjects/Account/001A"));
    assert_eq!(requests[0].body.as_ref().unwrap()["Rating"], Value::Null);
    assert!(requests[1].body.as_ref().unwrap().get("Rating").is_none());
}

#[test]
fn upsert_addresses_external_key_and_omits_it_from_body() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(201, &json!({ "id": "001N", "success": true, "created": true }));
    transport.push_status(204);
    let session = session(&transport, ClientConfig::default());
    let account = Account {
        name: Some("Acme".to_string()),
        site: Some("HQ 1".to_string()),
        ..Account::default()
    };

    let created = session.upsert("Site", &account).unwrap();
    let updated = session.upsert("Site", &account).unwrap();

    assert!(created.created);
    assert_eq!(created.id.as_deref(), Some("001N"));
    assert!(!updated.created);
    let request = &transport.requests()[0];
    assert_eq!(request.path, "v58.0/sobjects/Account/Site/HQ%201");
    assert!(request.body.as_ref().unwrap().get("Site").is_none());
}

#[test]
fn unexecuted_operation_cannot_be_taken() {
    let transport = Arc::new(ScriptedTransport::new());
    let session = session(&transport, ClientConfig::default());

    let mut batch = session.batch();
    let op = batch.create(&bean("one")).unwrap();

    assert_eq!(batch.len(), 1);
    assert!(matches!(op.into_result(), Err(Error::Incomplete)));
    drop(batch);
}
