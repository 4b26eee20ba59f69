use std::collections::HashMap;

/// A named permission the authorization host can grant or deny, together
/// with the user-facing reason why it is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    pub name: String,
    pub reason: String,
}

impl Capability {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Capability name → granted, as delivered by the authorization host.
pub type PermissionResult = HashMap<String, bool>;

/// Implemented by any service that needs capabilities granted before it
/// can run.
pub trait RequiringCapabilities: Send + Sync {
    /// The required capabilities, each with the reason why it is needed.
    fn required_capabilities(&self) -> Vec<Capability>;
}

/// Platform API generation, used to vary the capability list across
/// platform versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlatformVersion(pub u32);

impl PlatformVersion {
    /// Last generation that requires an explicit storage grant before the
    /// capture service may write snapshots.
    pub const LEGACY_STORAGE_MAX: PlatformVersion = PlatformVersion(28);
}

pub const CAMERA: &str = "camera";
pub const RECORD_AUDIO: &str = "record-audio";
pub const WRITE_EXTERNAL_STORAGE: &str = "write-external-storage";

/// The capabilities the capture service needs on the given platform
/// generation. Pure function of its argument; no global state.
pub fn capture_capabilities(platform: PlatformVersion) -> Vec<Capability> {
    let mut capabilities = vec![
        Capability::new(
            CAMERA,
            "The camera shows the point of view of your vehicle; without it this service is useless.",
        ),
        Capability::new(
            RECORD_AUDIO,
            "Recording audio lets you hear what is happening around your vehicle.",
        ),
    ];
    if platform <= PlatformVersion::LEGACY_STORAGE_MAX {
        capabilities.push(Capability::new(
            WRITE_EXTERNAL_STORAGE,
            "Writing to external storage enables taking snapshots.",
        ));
    }
    capabilities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_platforms_need_camera_and_audio() {
        let capabilities = capture_capabilities(PlatformVersion(33));
        let names: Vec<&str> = capabilities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![CAMERA, RECORD_AUDIO]);
    }

    #[test]
    fn legacy_platforms_also_need_storage() {
        let capabilities = capture_capabilities(PlatformVersion::LEGACY_STORAGE_MAX);
        let names: Vec<&str> = capabilities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![CAMERA, RECORD_AUDIO, WRITE_EXTERNAL_STORAGE]);
    }

    #[test]
    fn every_capability_carries_a_reason() {
        for capability in capture_capabilities(PlatformVersion(28)) {
            assert!(!capability.reason.is_empty(), "{} has no reason", capability.name);
        }
    }
}
