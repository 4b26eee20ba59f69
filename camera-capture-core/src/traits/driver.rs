//! Hardware driver contract.
//!
//! The camera stack below this library is callback-driven: opening a
//! device and configuring a capture session both complete on the driver's
//! own callback context, some time after the call returns. Each callback
//! here is a boxed `FnOnce` resolved exactly once; the session bridges it
//! into an awaitable result through a oneshot channel. Drivers must invoke
//! every callback they are handed (dropping one unresolved is reported to
//! the caller as a service fault).
//!
//! Implemented by platform backends; `camera-capture-sim` provides an
//! in-memory implementation for development and tests.

use crate::models::device::{DeviceCharacteristics, OutputTarget};

/// Synchronous refusal to even begin opening a device, raised by the
/// platform when the caller lacks the required grants.
#[derive(Debug, Clone)]
pub struct AccessDenied {
    pub reason: String,
}

/// Terminal outcome of an asynchronous device open.
pub enum OpenOutcome<H> {
    Opened(H),
    /// The device went away between selection and open.
    Disconnected,
    /// The driver failed with a numeric code (see
    /// [`crate::models::error::error_code`]). A partially created handle,
    /// when present, must be closed by the receiver before the failure is
    /// surfaced.
    Error { handle: Option<H>, code: i32 },
}

/// Terminal outcome of an asynchronous session configuration.
pub enum ConfigureOutcome<S> {
    Configured(S),
    ConfigureFailed,
}

/// One-shot continuation for a device open. Resolved exactly once, on the
/// driver's callback context.
pub type OpenCallback<H> = Box<dyn FnOnce(OpenOutcome<H>) + Send + 'static>;

/// One-shot continuation for a session configuration.
pub type ConfigureCallback<S> = Box<dyn FnOnce(ConfigureOutcome<S>) + Send + 'static>;

/// Read-only device enumeration, used during selection.
pub trait DeviceRegistry: Send + Sync {
    /// Ids of the currently attached capture devices, in platform order.
    fn list_devices(&self) -> Vec<String>;

    /// Characteristics of one device, or `None` if it vanished since
    /// listing.
    fn characteristics(&self, device_id: &str) -> Option<DeviceCharacteristics>;
}

/// Full driver contract: enumeration plus exclusive device access.
pub trait CameraDriver: DeviceRegistry {
    type Handle: DeviceHandle;

    /// Begin opening a device. The outcome arrives through `on_outcome`;
    /// a synchronous `AccessDenied` means the platform refused before any
    /// hardware was touched.
    fn open(&self, device_id: &str, on_outcome: OpenCallback<Self::Handle>)
        -> Result<(), AccessDenied>;
}

/// An exclusively owned open device.
pub trait DeviceHandle: Send + 'static {
    type Session: CaptureSessionHandle;

    fn id(&self) -> &str;

    /// Begin configuring a capture session feeding every given target.
    fn create_session(
        &mut self,
        outputs: Vec<OutputTarget>,
        on_outcome: ConfigureCallback<Self::Session>,
    );

    /// Release the device. Must be idempotent.
    fn close(&mut self);
}

/// A live capture session bound to a device handle.
pub trait CaptureSessionHandle: Send + 'static {
    /// Tear down the session. Must be idempotent.
    fn close(&mut self);
}
