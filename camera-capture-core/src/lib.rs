//! # camera-capture-core
//!
//! Platform-agnostic camera capture core library.
//!
//! Grants controlled, exclusive access to a shared capture device and
//! coordinates that access with an external, asynchronous authorization
//! flow. Platform backends implement the `CameraDriver` and
//! `AuthorizationHost` traits and plug into the generic session and
//! broker; `camera-capture-sim` ships an in-memory backend for
//! development and tests.
//!
//! ## Architecture
//!
//! ```text
//! camera-capture-core (this crate)
//! ├── traits/       ← CameraDriver, DeviceHandle, CaptureSessionHandle
//! ├── models/       ← SelectionCriteria, SelectedDeviceDescription,
//! │                   CameraError, WorkflowState
//! ├── session/      ← device selector + CameraSession state machine
//! ├── permissions/  ← Capability, AuthorizationHost, PermissionBroker
//! └── workflow/     ← CameraWorkflow observable controller
//! ```
//!
//! Control flow: `CameraWorkflow` verifies capabilities through the
//! `PermissionBroker` once at start, then drives the `CameraSession`
//! (select device, subscribe/unsubscribe targets, stop), which consults
//! the driver's device registry during selection.

pub mod models;
pub mod permissions;
pub mod session;
pub mod traits;
pub mod workflow;

// Re-export key types at crate root for convenience.
pub use models::criteria::{Facing, FocalLengthBand, SelectionCriteria};
pub use models::device::{
    DeviceCharacteristics, OutputTarget, Resolution, SelectedDeviceDescription,
};
pub use models::error::{error_code, CameraError, OpenErrorKind};
pub use models::state::{WorkflowSnapshot, WorkflowState};
pub use permissions::broker::PermissionBroker;
pub use permissions::capability::{
    capture_capabilities, Capability, PermissionResult, PlatformVersion, RequiringCapabilities,
};
pub use permissions::host::{AuthorizationCallback, AuthorizationHost};
pub use session::camera::CameraSession;
pub use session::select::select_device;
pub use traits::driver::{
    AccessDenied, CameraDriver, CaptureSessionHandle, ConfigureCallback, ConfigureOutcome,
    DeviceHandle, DeviceRegistry, OpenCallback, OpenOutcome,
};
pub use workflow::CameraWorkflow;
