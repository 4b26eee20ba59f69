use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::oneshot;

use super::capability::RequiringCapabilities;
use super::host::AuthorizationHost;

/// Turns the host's asynchronous yes/no authorization flow into an
/// awaitable boolean.
///
/// The broker holds at most one bound host at a time. Overlapping
/// [`verify`](Self::verify) calls are each independent registrations
/// against the host; nothing here serializes them, so two prompts can be
/// in flight at once.
pub struct PermissionBroker<H: AuthorizationHost> {
    host: RwLock<Option<Arc<H>>>,
}

impl<H: AuthorizationHost> PermissionBroker<H> {
    pub fn new() -> Self {
        Self {
            host: RwLock::new(None),
        }
    }

    /// Attach the authorization host. Replaces any previous binding.
    pub fn bind(&self, host: Arc<H>) {
        *self.host.write() = Some(host);
    }

    /// Detach the host. Subsequent checks fail closed.
    pub fn unbind(&self) {
        *self.host.write() = None;
    }

    /// Check, explain, and if necessary request the capabilities the given
    /// service needs. Returns `true` only when every required capability
    /// ends up granted.
    pub async fn verify(&self, requiring: &dyn RequiringCapabilities) -> bool {
        // With nobody to ask, fail closed.
        let Some(host) = self.host.read().clone() else {
            return false;
        };

        let capabilities = requiring.required_capabilities();

        // Maybe everything is already granted:
        if capabilities.iter().all(|c| host.is_granted(&c.name)) {
            return true;
        }

        // No? Then tell the user why each capability is wanted. Never blocks.
        for capability in &capabilities {
            if host.should_explain(&capability.name) {
                host.show_rationale(&capability.name, &capability.reason);
            }
        }

        // One bundled request; the listener resolves exactly once.
        let names: Vec<String> = capabilities.iter().map(|c| c.name.clone()).collect();
        let (tx, rx) = oneshot::channel();
        host.request_all(
            names.clone(),
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        let result = match rx.await {
            Ok(result) => result,
            // The host dropped the request without answering.
            Err(_) => return false,
        };

        let missing: Vec<String> = names
            .into_iter()
            .filter(|name| result.get(name).copied() != Some(true))
            .collect();
        if !missing.is_empty() {
            host.notify_denied(&missing);
            log::info!("permission request denied: {}", missing.join(", "));
            return false;
        }

        log::info!("permissions granted: all {} requested", result.len());
        true
    }
}

impl<H: AuthorizationHost> Default for PermissionBroker<H> {
    fn default() -> Self {
        Self::new()
    }
}

// Tests for this module live in `tests/broker.rs`: they depend on
// `camera-capture-sim` (see the note in `session/select.rs`).
