use std::fmt;

use thiserror::Error;

use super::criteria::SelectionCriteria;

/// Numeric error codes a driver may report when opening a device fails.
///
/// Anything outside this table surfaces as [`OpenErrorKind::Unknown`].
pub mod error_code {
    pub const DEVICE_IN_USE: i32 = 1;
    pub const MAX_DEVICES_IN_USE: i32 = 2;
    pub const DEVICE_DISABLED: i32 = 3;
    pub const DEVICE_FAULT: i32 = 4;
    pub const SERVICE_FAULT: i32 = 5;
}

/// Why opening a camera device failed, derived from the driver's error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenErrorKind {
    Busy,
    TooManyInUse,
    Disabled,
    DeviceFault,
    ServiceFault,
    Unknown(i32),
}

impl OpenErrorKind {
    pub fn from_code(code: i32) -> Self {
        match code {
            error_code::DEVICE_IN_USE => Self::Busy,
            error_code::MAX_DEVICES_IN_USE => Self::TooManyInUse,
            error_code::DEVICE_DISABLED => Self::Disabled,
            error_code::DEVICE_FAULT => Self::DeviceFault,
            error_code::SERVICE_FAULT => Self::ServiceFault,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for OpenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "device already in use"),
            Self::TooManyInUse => write!(f, "too many devices in use"),
            Self::Disabled => write!(f, "device disabled by policy"),
            Self::DeviceFault => write!(f, "device reported a fatal error"),
            Self::ServiceFault => write!(f, "camera service reported a fatal error"),
            Self::Unknown(code) => write!(f, "unknown camera error: {}", code),
        }
    }
}

/// Errors that can occur while selecting, opening, or configuring a camera.
///
/// A closed enum instead of an exception hierarchy; every failure is a
/// value the caller can store, compare, and render.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("no camera matches the selection criteria: {0}")]
    NoMatchingDevice(SelectionCriteria),

    #[error("no camera selected")]
    NoDeviceSelected,

    #[error("cannot open camera: {0}")]
    CannotOpenDevice(OpenErrorKind),

    #[error("camera access denied: {0}")]
    SecurityDenied(String),

    #[error("camera disconnected while opening")]
    DeviceDisconnected,

    #[error("cannot configure capture session for device {0}")]
    ConfigureSessionFailed(String),
}

impl CameraError {
    /// Whether the failure stems from what the caller asked for, as
    /// opposed to the device or the platform service misbehaving.
    pub fn is_user_caused(&self) -> bool {
        matches!(self, Self::NoMatchingDevice(_) | Self::NoDeviceSelected)
    }

    pub fn is_service_caused(&self) -> bool {
        !self.is_user_caused()
    }
}
