use serde::{Deserialize, Serialize};

use super::device::SelectedDeviceDescription;
use super::error::CameraError;

/// Externally observable states of the camera workflow.
///
/// State transitions:
/// ```text
/// stopped → requesting-permission → permission-granted ↔ starting-up ↔ running
///                    ↓                                        ↓
///          permission-not-granted                  error / stopping → permission-granted
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowState {
    #[default]
    Stopped,
    RequestingPermission,
    PermissionGranted,
    PermissionNotGranted,
    StartingUp,
    Error,
    Running,
    Stopping,
}

impl WorkflowState {
    /// The camera is not running right now, although it could start.
    ///
    /// `Stopped` and `RequestingPermission` count as startable: the
    /// permission outcome is still pending and the UI may already offer
    /// the start action.
    pub fn can_start(self) -> bool {
        match self {
            Self::Stopped | Self::RequestingPermission | Self::PermissionGranted => true,
            Self::PermissionNotGranted
            | Self::StartingUp
            | Self::Error
            | Self::Running
            | Self::Stopping => false,
        }
    }

    /// The camera is running or about to run.
    pub fn is_running(self) -> bool {
        match self {
            Self::StartingUp | Self::Running => true,
            Self::Stopped
            | Self::RequestingPermission
            | Self::PermissionGranted
            | Self::PermissionNotGranted
            | Self::Error
            | Self::Stopping => false,
        }
    }
}

/// The value published to workflow observers: the current state plus
/// whatever device and error context accompanies it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    pub selected_device: Option<SelectedDeviceDescription>,
    pub error: Option<CameraError>,
}
