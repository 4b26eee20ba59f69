//! In-memory authorization host.
//!
//! Holds a grant store and a scripted response plan, and records every
//! user-facing side effect (rationales, requests, denial notices) for
//! tests to inspect. Like a real host, it never asks to explain a
//! capability that is already granted, and grants won in a request are
//! written back to the store.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use camera_capture_core::{AuthorizationCallback, AuthorizationHost, PermissionResult};

#[derive(Default)]
struct HostInner {
    granted: HashSet<String>,
    explain: HashSet<String>,
    responses: HashMap<String, bool>,
    rationales: Vec<(String, String)>,
    requests: Vec<Vec<String>>,
    denials: Vec<Vec<String>>,
}

/// In-memory [`AuthorizationHost`] implementation.
#[derive(Default)]
pub struct SimAuthorizationHost {
    inner: Mutex<HostInner>,
}

impl SimAuthorizationHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-grant a capability in the grant store.
    pub fn grant(&self, capability: &str) {
        self.inner.lock().granted.insert(capability.to_string());
    }

    /// Flag a capability as rationale-eligible.
    pub fn mark_explain(&self, capability: &str) {
        self.inner.lock().explain.insert(capability.to_string());
    }

    /// Script the outcome of a future authorization request for one
    /// capability. Unscripted capabilities are denied.
    pub fn plan_response(&self, capability: &str, granted: bool) {
        self.inner
            .lock()
            .responses
            .insert(capability.to_string(), granted);
    }

    /// Every `(capability, reason)` pair shown to the user so far.
    pub fn rationales_shown(&self) -> Vec<(String, String)> {
        self.inner.lock().rationales.clone()
    }

    /// Every request issued so far, each with its bundled capabilities.
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.inner.lock().requests.clone()
    }

    /// Every denial notification shown so far.
    pub fn denials(&self) -> Vec<Vec<String>> {
        self.inner.lock().denials.clone()
    }
}

impl AuthorizationHost for SimAuthorizationHost {
    fn is_granted(&self, capability: &str) -> bool {
        self.inner.lock().granted.contains(capability)
    }

    fn should_explain(&self, capability: &str) -> bool {
        let inner = self.inner.lock();
        inner.explain.contains(capability) && !inner.granted.contains(capability)
    }

    fn show_rationale(&self, capability: &str, reason: &str) {
        self.inner
            .lock()
            .rationales
            .push((capability.to_string(), reason.to_string()));
    }

    fn request_all(&self, capabilities: Vec<String>, on_result: AuthorizationCallback) {
        let result: PermissionResult = {
            let mut inner = self.inner.lock();
            inner.requests.push(capabilities.clone());

            let result: PermissionResult = capabilities
                .iter()
                .map(|name| {
                    let granted = inner.granted.contains(name)
                        || inner.responses.get(name).copied().unwrap_or(false);
                    (name.clone(), granted)
                })
                .collect();

            // The user's answers land in the grant store, like any host
            // would persist them.
            for (name, granted) in &result {
                if *granted {
                    inner.granted.insert(name.clone());
                }
            }
            result
        };

        on_result(result);
    }

    fn notify_denied(&self, missing: &[String]) {
        log::info!("authorization denied for: {}", missing.join(", "));
        self.inner.lock().denials.push(missing.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_are_visible_and_suppress_explanations() {
        let host = SimAuthorizationHost::new();
        host.mark_explain("camera");
        assert!(host.should_explain("camera"));

        host.grant("camera");
        assert!(host.is_granted("camera"));
        assert!(!host.should_explain("camera"));
    }

    #[test]
    fn request_resolves_once_with_the_scripted_plan() {
        let host = SimAuthorizationHost::new();
        host.plan_response("camera", true);

        let (tx, rx) = std::sync::mpsc::channel();
        host.request_all(
            vec!["camera".into(), "record-audio".into()],
            // One-shot: this closure is consumed by the call.
            Box::new(move |result| tx.send(result).unwrap()),
        );

        let result = rx.try_recv().unwrap();
        assert_eq!(result.get("camera"), Some(&true));
        assert_eq!(result.get("record-audio"), Some(&false));
        // The granted capability was persisted:
        assert!(host.is_granted("camera"));
        assert!(!host.is_granted("record-audio"));
    }
}
