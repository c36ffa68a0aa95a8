// SPDX-FileCopyrightText: 2025 Explorer Client Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the pull operations
//!
//! These use wiremock for the HTTP side and a websocket stub for the push
//! channel the client dials at construction.

use explorer_client::{ClientError, ExplorerClient};
use explorer_types::{Address, Txid};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fixtures::*;

const HASH_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

async fn connect_client(server: &MockServer) -> ExplorerClient {
    let stub = spawn_push_stub().await;
    ExplorerClient::connect(test_config(server.uri(), stub.url.clone()))
        .await
        .expect("client connects")
}

#[tokio::test]
async fn get_transaction_decodes_string_amounts() {
    let server = MockServer::start().await;
    let txid: Txid = make_txid(1).parse().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/tx/{txid}")))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(transaction_json(txid.as_str(), json!("1.25"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let tx = client.transaction(&txid).await.unwrap();
    assert_eq!(tx.txid, txid);
    assert_eq!(tx.inputs[0].value, 1.25);
    assert_eq!(tx.outputs[0].value, 1.25);
}

#[tokio::test]
async fn get_transaction_number_and_string_amounts_agree() {
    let server = MockServer::start().await;
    let txid_number: Txid = make_txid(2).parse().unwrap();
    let txid_string: Txid = make_txid(3).parse().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/tx/{txid_number}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(transaction_json(txid_number.as_str(), json!(0.0005))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/tx/{txid_string}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(transaction_json(txid_string.as_str(), json!("0.0005"))),
        )
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let from_number = client.transaction(&txid_number).await.unwrap();
    let from_string = client.transaction(&txid_string).await.unwrap();
    assert_eq!(from_number.outputs[0].value, from_string.outputs[0].value);
}

#[tokio::test]
async fn spurious_400_is_retried_exactly_once() {
    let server = MockServer::start().await;
    let txid: Txid = make_txid(4).parse().unwrap();

    // First attempt answers 400, the identical retry succeeds.
    Mock::given(method("GET"))
        .and(path(format!("/tx/{txid}")))
        .respond_with(ResponseTemplate::new(400))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/tx/{txid}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(transaction_json(txid.as_str(), json!("2.0"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let tx = client.transaction(&txid).await.unwrap();
    assert_eq!(tx.txid, txid);
}

#[tokio::test]
async fn persistent_400_fails_after_the_single_retry() {
    let server = MockServer::start().await;
    let txid: Txid = make_txid(5).parse().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/tx/{txid}")))
        .respond_with(ResponseTemplate::new(400))
        .expect(2)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let err = client.transaction(&txid).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::RequestFailed { status } if status.as_u16() == 400
    ));
}

#[tokio::test]
async fn server_errors_are_not_retried() {
    let server = MockServer::start().await;
    let txid: Txid = make_txid(6).parse().unwrap();

    Mock::given(method("GET"))
        .and(path(format!("/tx/{txid}")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let err = client.transaction(&txid).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::RequestFailed { status } if status.as_u16() == 500
    ));
}

#[tokio::test]
async fn transaction_history_paginates_in_windows_of_fifty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/addrs/txs"))
        .and(body_partial_json(json!({"from": 0, "to": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(120, 0..50)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/addrs/txs"))
        .and(body_partial_json(json!({"from": 50, "to": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(120, 50..100)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/addrs/txs"))
        .and(body_partial_json(json!({"from": 100, "to": 150})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(120, 100..120)))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let addrs = [Address::new("addr1"), Address::new("addr2")];
    let txs = client.transactions(&addrs).await.unwrap();

    assert_eq!(txs.len(), 120);
    // Page order is preserved.
    assert_eq!(txs[0].txid.as_str(), make_txid(0));
    assert_eq!(txs[50].txid.as_str(), make_txid(50));
    assert_eq!(txs[119].txid.as_str(), make_txid(119));
}

#[tokio::test]
async fn transaction_history_sends_comma_joined_addresses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/addrs/txs"))
        .and(body_json(json!({"addrs": "addr1,addr2", "from": 0, "to": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, 0..0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let addrs = [Address::new("addr1"), Address::new("addr2")];
    let txs = client.transactions(&addrs).await.unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn non_converging_listing_trips_the_page_guard() {
    let server = MockServer::start().await;

    // A server whose declared total never converges: every window yields a
    // single item against a claimed total of 1000.
    for (page, from) in [(0usize, 0usize), (1, 50), (2, 100)] {
        Mock::given(method("POST"))
            .and(path("/addrs/txs"))
            .and(body_partial_json(json!({"from": from, "to": from + 50})))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(1000, page..page + 1)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let stub = spawn_push_stub().await;
    let mut config = test_config(server.uri(), stub.url.clone());
    config.max_pages = 3;
    let client = ExplorerClient::connect(config).await.unwrap();

    let err = client
        .transactions(&[Address::new("addr1")])
        .await
        .unwrap_err();

    // One item per window, three windows, then the guard stops the loop
    // and hands back what was fetched.
    assert_eq!(err.partial.len(), 3);
    assert_eq!(err.partial[0].txid.as_str(), make_txid(0));
    assert_eq!(err.partial[2].txid.as_str(), make_txid(2));
    assert!(matches!(
        err.source,
        ClientError::TooManyPages { max_pages: 3 }
    ));
}

#[tokio::test]
async fn failed_page_returns_the_partial_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/addrs/txs"))
        .and(body_partial_json(json!({"from": 0, "to": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(120, 0..50)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/addrs/txs"))
        .and(body_partial_json(json!({"from": 50, "to": 100})))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let err = client
        .transactions(&[Address::new("addr1")])
        .await
        .unwrap_err();

    assert_eq!(err.partial.len(), 50);
    assert_eq!(err.partial[0].txid.as_str(), make_txid(0));
    assert!(matches!(
        err.source,
        ClientError::RequestFailed { status } if status.as_u16() == 500
    ));
}

#[tokio::test]
async fn utxos_normalize_mixed_amount_representations() {
    let server = MockServer::start().await;

    let response = json!([
        {
            "address": "addr1",
            "txid": make_txid(10),
            "vout": 0,
            "scriptPubKey": "76a914000000000000000000000000000000000000000088ac",
            "amount": 0.25,
            "confirmations": 10
        },
        {
            "address": "addr2",
            "txid": make_txid(11),
            "vout": 1,
            "scriptPubKey": "76a914000000000000000000000000000000000000000088ac",
            "amount": "0.25",
            "confirmations": 3
        }
    ]);
    Mock::given(method("POST"))
        .and(path("/addrs/utxo"))
        .and(body_json(json!({"addrs": "addr1,addr2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let addrs = [Address::new("addr1"), Address::new("addr2")];
    let utxos = client.utxos(&addrs).await.unwrap();

    assert_eq!(utxos.len(), 2);
    assert_eq!(utxos[0].amount, utxos[1].amount);
    assert_eq!(utxos[0].amount, 0.25);
}

#[tokio::test]
async fn best_block_pairs_tip_with_its_parent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocks"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(block_summaries(&[HASH_A, HASH_B])))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let block = client.best_block().await.unwrap();
    assert_eq!(block.hash, HASH_A);
    assert_eq!(block.parent, HASH_B);
}

#[tokio::test]
async fn best_block_needs_two_summaries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(block_summaries(&[HASH_A])))
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let err = client.best_block().await.unwrap_err();
    assert!(matches!(err, ClientError::InsufficientData { count: 1 }));
}

#[tokio::test]
async fn broadcast_sends_hex_and_decodes_the_txid() {
    let server = MockServer::start().await;
    let txid = make_txid(7);

    Mock::given(method("POST"))
        .and(path("/tx/send"))
        .and(body_json(json!({"rawtx": "deadbeef"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"txid": txid})))
        .expect(1)
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let result = client.broadcast(&[0xde, 0xad, 0xbe, 0xef]).await.unwrap();
    assert_eq!(result.as_str(), txid);
}

#[tokio::test]
async fn broadcast_without_a_txid_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tx/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .mount(&server)
        .await;

    let client = connect_client(&server).await;
    let err = client.broadcast(&[0x01]).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}
