//! # camera-capture-sim
//!
//! In-memory simulated backend for camera-capture-kit.
//!
//! Provides:
//! - `SimCameraDriver` — scripted device table and open/configure
//!   outcomes, delivered on a dedicated callback worker thread
//! - `SimAuthorizationHost` — grant store with scripted prompt outcomes
//!   and recorded user-facing side effects
//! - `DriverJournal` — ordered record of hardware-shaped calls, for
//!   asserting close-before-open ordering
//!
//! No hardware anywhere: everything runs in-process, deterministically.
//! Useful for presentation-layer development, demos, and as the fake
//! driver behind `camera-capture-core`'s tests.
//!
//! ## Usage
//! ```ignore
//! use camera_capture_core::{CameraSession, PlatformVersion};
//! use camera_capture_sim::{SimCameraDriver, SimDeviceSpec};
//!
//! let driver = SimCameraDriver::new(vec![SimDeviceSpec::new("back", characteristics)]);
//! let session = CameraSession::new(driver, PlatformVersion(33));
//! ```

pub mod driver;
pub mod host;

pub use driver::{
    ConfigurePlan, DriverEvent, DriverJournal, OpenPlan, SimCameraDriver, SimDeviceHandle,
    SimDeviceSpec, SimSessionHandle,
};
pub use host::SimAuthorizationHost;
