//! Permission-broker tests. Relocated from `src/permissions/broker.rs`
//! to an integration test (see the note in `tests/select.rs` for why).

use std::sync::Arc;

use camera_capture_core::permissions::capability::Capability;
use camera_capture_core::{PermissionBroker, RequiringCapabilities};

use camera_capture_sim::SimAuthorizationHost;

struct NeedsCaps(Vec<Capability>);

impl RequiringCapabilities for NeedsCaps {
    fn required_capabilities(&self) -> Vec<Capability> {
        self.0.clone()
    }
}

fn two_capabilities() -> NeedsCaps {
    NeedsCaps(vec![
        Capability::new("camera", "to see"),
        Capability::new("record-audio", "to hear"),
    ])
}

#[tokio::test]
async fn fails_closed_without_a_host() {
    let broker: PermissionBroker<SimAuthorizationHost> = PermissionBroker::new();
    assert!(!broker.verify(&two_capabilities()).await);
}

#[tokio::test]
async fn fails_closed_after_unbind() {
    let broker = PermissionBroker::new();
    let host = Arc::new(SimAuthorizationHost::new());
    host.grant("camera");
    host.grant("record-audio");
    broker.bind(Arc::clone(&host));
    broker.unbind();
    assert!(!broker.verify(&two_capabilities()).await);
}

#[tokio::test]
async fn already_granted_short_circuits_without_prompting() {
    let broker = PermissionBroker::new();
    let host = Arc::new(SimAuthorizationHost::new());
    host.grant("camera");
    host.grant("record-audio");
    broker.bind(Arc::clone(&host));

    assert!(broker.verify(&two_capabilities()).await);
    assert!(host.requests().is_empty());
    assert!(host.rationales_shown().is_empty());
}

#[tokio::test]
async fn rationale_fires_only_for_ungranted_capability() {
    let broker = PermissionBroker::new();
    let host = Arc::new(SimAuthorizationHost::new());
    host.grant("camera");
    host.mark_explain("camera");
    host.mark_explain("record-audio");
    host.plan_response("record-audio", true);
    broker.bind(Arc::clone(&host));

    assert!(broker.verify(&two_capabilities()).await);

    let rationales = host.rationales_shown();
    assert_eq!(rationales.len(), 1);
    assert_eq!(rationales[0].0, "record-audio");
    assert_eq!(rationales[0].1, "to hear");
}

#[tokio::test]
async fn result_tracks_the_request_outcome() {
    let broker = PermissionBroker::new();
    let host = Arc::new(SimAuthorizationHost::new());
    host.grant("camera");
    host.plan_response("record-audio", false);
    broker.bind(Arc::clone(&host));

    assert!(!broker.verify(&two_capabilities()).await);

    // One bundled request covering both capabilities:
    assert_eq!(host.requests(), vec![vec!["camera".to_string(), "record-audio".to_string()]]);
    // Denial notification lists only the missing one:
    assert_eq!(host.denials(), vec![vec!["record-audio".to_string()]]);
}

#[tokio::test]
async fn denial_is_advisory_only_when_everything_granted() {
    let broker = PermissionBroker::new();
    let host = Arc::new(SimAuthorizationHost::new());
    host.plan_response("camera", true);
    host.plan_response("record-audio", true);
    broker.bind(Arc::clone(&host));

    assert!(broker.verify(&two_capabilities()).await);
    assert!(host.denials().is_empty());
}
