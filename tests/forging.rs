//! End-to-end tests over the public API.
//!
//! The forged-bytes vectors come from a live node of the targeted protocol
//! era: every hex string here is what the node's own forge endpoint
//! produces for the same input, so these tests pin the wire contract, not
//! just internal consistency. The RPC flows run against an in-memory
//! transport standing in for the node.

use std::sync::{Arc, Mutex};

use mxp_client::forge::{forge_operation, unforge_operation};
use mxp_client::{
    BlockId, Contents, Delegation, MxpClient, OperationHeader, Origination, Reveal, RpcError,
    Transaction, Transport, TransportError,
};

const SRC: &str = "tz1LSAycAVcNdYnXCy18bwVksXci8gUC2YpA";
const KT: &str = "KT1MJZWHKZU7ViybRLsphP3ppiiTc7myP2aj";
const PHK: &str = "edpktnktxAzmXPD9XVNqAvdCFb76vxzQtkbVkSEtXcTz33QZQdb4JQ";
const BRANCH: &str = "BLyvCRkxuTXkx1KeGvrcEXiPYj4p1tFxzvFDhoHE7SFKtmP1rbk";

const FORGED_BATCH: &str = "a732d3520eeaa3de98d78e5e5cb6c85f72204fd46feb9f76853841d4a701add36c0008ba0cb2fad622697145cf1665124096d25bc31ef44e0af44e00b960000008ba0cb2fad622697145cf1665124096d25bc31e006c0008ba0cb2fad622697145cf1665124096d25bc31ed3e7bd1008d3bb0300b1a803018b88e99e66c1c2587f87118449f781cb7d44c9c40000";
const FORGED_REVEALS: &str = "a732d3520eeaa3de98d78e5e5cb6c85f72204fd46feb9f76853841d4a701add36b0008ba0cb2fad622697145cf1665124096d25bc31ef44e0af44e0000136083897bc97879c53e3e7855838fbbc87303ddd376080fc3d3e136b55d028b6b0008ba0cb2fad622697145cf1665124096d25bc31ed3e7bd1008d3bb030000136083897bc97879c53e3e7855838fbbc87303ddd376080fc3d3e136b55d028b";
const FORGED_DELEGATION: &str = "a732d3520eeaa3de98d78e5e5cb6c85f72204fd46feb9f76853841d4a701add36e0008ba0cb2fad622697145cf1665124096d25bc31ef44e0af44e00ff0008ba0cb2fad622697145cf1665124096d25bc31e";
const FORGED_ORIGINATION: &str = "a732d3520eeaa3de98d78e5e5cb6c85f72204fd46feb9f76853841d4a701add36d0008ba0cb2fad622697145cf1665124096d25bc31ef44e0af44e00928fe29c01ff0008ba0cb2fad622697145cf1665124096d25bc31e000000c602000000c105000764085e036c055f036d0000000325646f046c000000082564656661756c740501035d050202000000950200000012020000000d03210316051f02000000020317072e020000006a0743036a00000313020000001e020000000403190325072c020000000002000000090200000004034f0327020000000b051f02000000020321034c031e03540348020000001e020000000403190325072c020000000002000000090200000004034f0327034f0326034202000000080320053d036d03420000001a0a000000150008ba0cb2fad622697145cf1665124096d25bc31e";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn header(fee: i64, counter: i64, gas_limit: i64, storage_limit: i64) -> OperationHeader {
    OperationHeader::new(SRC, fee, counter, gas_limit, storage_limit)
}

fn transaction(fee: i64, counter: i64, gas: i64, amount: i64, destination: &str) -> Contents {
    Contents::Transaction(Transaction {
        header: header(fee, counter, gas, 0),
        amount: Some(amount.into()),
        destination: Some(destination.into()),
        metadata: None,
    })
}

fn reveal(fee: i64, counter: i64, gas: i64) -> Contents {
    Contents::Reveal(Reveal {
        header: header(fee, counter, gas, 0),
        phk: Some(PHK.into()),
        metadata: None,
    })
}

/// A scripted node: each registered path fragment answers with a canned
/// body, everything else is a 404. Mirrors how the library is exercised
/// against `httptest`-style mocks elsewhere.
struct ScriptedNode {
    routes: Vec<(String, Vec<u8>)>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedNode {
    fn new(routes: Vec<(&str, Vec<u8>)>) -> Arc<Self> {
        Arc::new(Self {
            routes: routes
                .into_iter()
                .map(|(fragment, body)| (fragment.to_string(), body))
                .collect(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn find(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        for (fragment, body) in &self.routes {
            if url.contains(fragment.as_str()) {
                return Ok(body.clone());
            }
        }
        Err(TransportError::Status {
            status: 404,
            body: Vec::new(),
        })
    }
}

struct NodeHandle(Arc<ScriptedNode>);

impl Transport for NodeHandle {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.0.find(url)
    }

    fn post(&self, url: &str, _body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.0.find(url)
    }
}

fn client_for(node: &Arc<ScriptedNode>) -> MxpClient {
    MxpClient::with_transport(
        "http://localhost:8732",
        Box::new(NodeHandle(Arc::clone(node))),
    )
}

// ---------------------------------------------------------------------------
// Forging golden vectors
// ---------------------------------------------------------------------------

#[test]
fn forges_transaction_batch_to_node_bytes() {
    let contents = vec![
        transaction(10_100, 10, 10_100, 12_345, SRC),
        transaction(34_567_123, 8, 56_787, 54_321, KT),
    ];
    assert_eq!(forge_operation(BRANCH, &contents).unwrap(), FORGED_BATCH);
}

#[test]
fn forges_reveal_batch_to_node_bytes() {
    let contents = vec![reveal(10_100, 10, 10_100), reveal(34_567_123, 8, 56_787)];
    assert_eq!(forge_operation(BRANCH, &contents).unwrap(), FORGED_REVEALS);
}

#[test]
fn forges_delegation_to_node_bytes() {
    let contents = vec![Contents::Delegation(Delegation {
        header: header(10_100, 10, 10_100, 0),
        delegate: Some(SRC.into()),
        metadata: None,
    })];
    assert_eq!(
        forge_operation(BRANCH, &contents).unwrap(),
        FORGED_DELEGATION
    );
}

#[test]
fn forges_origination_to_node_bytes() {
    let contents = vec![Contents::Origination(Origination {
        header: header(10_100, 10, 10_100, 0),
        balance: Some(328_763_282.into()),
        delegate: Some(SRC.into()),
        metadata: None,
    })];
    assert_eq!(
        forge_operation(BRANCH, &contents).unwrap(),
        FORGED_ORIGINATION
    );
}

// ---------------------------------------------------------------------------
// Unforging and round trips
// ---------------------------------------------------------------------------

#[test]
fn unforges_every_golden_vector_back_to_its_inputs() {
    for (forged, expected_len) in [
        (FORGED_BATCH, 2),
        (FORGED_REVEALS, 2),
        (FORGED_DELEGATION, 1),
        (FORGED_ORIGINATION, 1),
    ] {
        let (branch, contents) = unforge_operation(forged, false).unwrap();
        assert_eq!(branch, BRANCH);
        assert_eq!(contents.len(), expected_len);
        // Re-forging the decoded contents reproduces the bytes.
        assert_eq!(forge_operation(&branch, &contents).unwrap(), forged);
    }
}

#[test]
fn unforge_recovers_the_exact_transaction_fields() {
    let (_, contents) = unforge_operation(FORGED_BATCH, false).unwrap();
    assert_eq!(contents[0], transaction(10_100, 10, 10_100, 12_345, SRC));
    assert_eq!(contents[1], transaction(34_567_123, 8, 56_787, 54_321, KT));
}

#[test]
fn unforge_drops_a_signature_when_told_to() {
    let signed = format!("{}{}", FORGED_DELEGATION, "00".repeat(64));
    let (branch, contents) = unforge_operation(&signed, true).unwrap();
    assert_eq!(branch, BRANCH);
    match &contents[..] {
        [Contents::Delegation(d)] => assert_eq!(d.delegate.as_deref(), Some(SRC)),
        other => panic!("expected one delegation, got {:?}", other),
    }
}

#[test]
fn validation_gates_the_forge() {
    let incomplete = Contents::Transaction(Transaction {
        header: header(10_100, 10, 10_100, 0),
        amount: None,
        destination: None,
        metadata: None,
    });
    let err = forge_operation(BRANCH, &[incomplete]).unwrap_err();
    let text = format!("{}", source_chain(&err));
    assert!(text.contains("missing amount"));
    assert!(text.contains("missing destination"));
    assert!(text.contains("missing amount: missing destination"));
}

/// Renders an error with its full cause chain, the way a caller logging
/// the failure would see it.
fn source_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        text.push_str(": ");
        text.push_str(&e.to_string());
        cause = e.source();
    }
    text
}

// ---------------------------------------------------------------------------
// RPC flows
// ---------------------------------------------------------------------------

#[test]
fn verified_forge_against_a_scripted_node() {
    let node = ScriptedNode::new(vec![(
        "/helpers/forge/operations",
        format!("\"{}\"", FORGED_BATCH).into_bytes(),
    )]);
    let client = client_for(&node);

    let contents = vec![
        transaction(10_100, 10, 10_100, 12_345, SRC),
        transaction(34_567_123, 8, 56_787, 54_321, KT),
    ];
    let forged = client
        .forge_operation_with_rpc("head", BRANCH, &contents)
        .unwrap();
    assert_eq!(forged, FORGED_BATCH);
}

#[test]
fn verified_forge_catches_a_lying_node() {
    // The node swaps the destination for its own: same shape, different
    // bytes than requested.
    let node = ScriptedNode::new(vec![(
        "/helpers/forge/operations",
        format!("\"{}\"", FORGED_BATCH).into_bytes(),
    )]);
    let client = client_for(&node);

    let contents = vec![
        transaction(10_100, 10, 10_100, 12_345, SRC),
        transaction(34_567_123, 8, 56_787, 54_321, SRC), // asked for tz1, node forged KT1
    ];
    match client
        .forge_operation_with_rpc("head", BRANCH, &contents)
        .unwrap_err()
    {
        RpcError::ForgeMismatch { forged } => assert_eq!(forged, FORGED_BATCH),
        other => panic!("expected ForgeMismatch, got {:?}", other),
    }
}

#[test]
fn head_and_block_queries_hit_the_right_paths() {
    let block_json = br#"{
        "protocol": "PsBabyM1eUXZseaJdmXFApDSBqj8YBfwELoxZHHW77EMcAbbwAS",
        "chain_id": "NetXdQprcVkpaWU",
        "hash": "BLzGD63HA4RP8Fh5xEtvdQSMKa2WzJMZjQPNVUc4Rqy8Lh5BEY1",
        "header": {
            "level": 650000, "proto": 5,
            "predecessor": "BLyvCRkxuTXkx1KeGvrcEXiPYj4p1tFxzvFDhoHE7SFKtmP1rbk",
            "timestamp": "2019-11-01T12:00:00Z", "validation_pass": 4,
            "operations_hash": "LLoa", "fitness": [], "context": "CoVu"
        }
    }"#;
    let node = ScriptedNode::new(vec![("/chains/main/blocks/", block_json.to_vec())]);
    let client = client_for(&node);

    assert_eq!(client.head().unwrap().header.level, 650_000);
    assert_eq!(
        client.block(&BlockId::Level(650_000)).unwrap().chain_id,
        "NetXdQprcVkpaWU"
    );

    let requests = node.requests.lock().unwrap();
    assert!(requests[0].ends_with("/chains/main/blocks/head"));
    assert!(requests[1].ends_with("/chains/main/blocks/650000"));
}

#[test]
fn injection_round_trip() {
    let node = ScriptedNode::new(vec![(
        "/injection/operation",
        b"\"ooPsiypVdzK3gRYLKkXdXtYsRvuUKDRpSCh5kuWFWyrVxDG7not\"".to_vec(),
    )]);
    let client = client_for(&node);

    let signed = format!("{}{}", FORGED_DELEGATION, "00".repeat(64));
    let hash = client.inject_operation(&signed).unwrap();
    assert_eq!(hash, "ooPsiypVdzK3gRYLKkXdXtYsRvuUKDRpSCh5kuWFWyrVxDG7not");
}
