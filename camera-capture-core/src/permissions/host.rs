use super::capability::PermissionResult;

/// One-shot continuation for an authorization request. The host resolves
/// it exactly once with a capability → granted map.
pub type AuthorizationCallback = Box<dyn FnOnce(PermissionResult) + Send + 'static>;

/// The external component that owns the user-facing permission prompt and
/// grant store.
///
/// Hosts come and go with the surrounding application lifecycle; the
/// broker treats an unbound host as "deny everything". All notification
/// methods are fire-and-forget side effects and must not block.
pub trait AuthorizationHost: Send + Sync {
    /// Whether the capability is already granted in the host's grant store.
    fn is_granted(&self, capability: &str) -> bool;

    /// Whether the host wants the user told why this capability is needed
    /// before prompting again.
    fn should_explain(&self, capability: &str) -> bool;

    /// Surface the justification for one capability to the user.
    fn show_rationale(&self, capability: &str, reason: &str);

    /// Issue one asynchronous authorization request bundling all the given
    /// capabilities. `on_result` is resolved exactly once.
    fn request_all(&self, capabilities: Vec<String>, on_result: AuthorizationCallback);

    /// Tell the user which capabilities were denied. Advisory only.
    fn notify_denied(&self, missing: &[String]);
}
