//! The capture-session state machine.
//!
//! Owns the hardware driver, the set of subscribed output targets, and,
//! while a session is live, the open device and session handles. Every
//! mutating operation serializes on one async lock held for the entire
//! device-replacement sequence, so no two replacements ever overlap and
//! close always happens before the next open. The lock is a guard and is
//! released on every exit path, including failures mid-sequence.

use std::mem;

use tokio::sync::{oneshot, Mutex};

use crate::models::criteria::SelectionCriteria;
use crate::models::device::{OutputTarget, SelectedDeviceDescription};
use crate::models::error::{CameraError, OpenErrorKind};
use crate::permissions::capability::{
    capture_capabilities, Capability, PlatformVersion, RequiringCapabilities,
};
use crate::session::select;
use crate::traits::driver::{
    CameraDriver, CaptureSessionHandle, ConfigureOutcome, DeviceHandle, OpenOutcome,
};

/// Inner state of the camera service. Exactly one variant is active at a
/// time, and the handle fields exist only while a session is live.
enum SessionState<D: CameraDriver> {
    Unselected,
    Standby {
        criteria: SelectionCriteria,
        description: SelectedDeviceDescription,
    },
    InSession {
        criteria: SelectionCriteria,
        description: SelectedDeviceDescription,
        device: D::Handle,
        session: <D::Handle as DeviceHandle>::Session,
    },
}

struct Inner<D: CameraDriver> {
    state: SessionState<D>,
    targets: Vec<OutputTarget>,
}

/// Simplified, exclusive access to the camera.
///
/// Callers never see raw device or session handles, only descriptions and
/// success/failure signals. One instance owns at most one open device and
/// one capture session at any instant.
pub struct CameraSession<D: CameraDriver> {
    driver: D,
    platform: PlatformVersion,
    inner: Mutex<Inner<D>>,
}

impl<D: CameraDriver> CameraSession<D> {
    pub fn new(driver: D, platform: PlatformVersion) -> Self {
        Self {
            driver,
            platform,
            inner: Mutex::new(Inner {
                state: SessionState::Unselected,
                targets: Vec::new(),
            }),
        }
    }

    /// Choose the camera that best fits the selection criteria.
    ///
    /// A running session is closed first; the new selection does not
    /// reopen it, that happens on the next subscription change. On
    /// failure the previous selection (if any) is kept, demoted to
    /// standby.
    pub async fn select_device(
        &self,
        criteria: SelectionCriteria,
    ) -> Result<SelectedDeviceDescription, CameraError> {
        let mut inner = self.inner.lock().await;

        // A session must not outlive the device it was built on.
        Self::close_any_session(&mut inner.state);

        let description = select::select_device(&self.driver, &criteria)?;
        log::info!(
            "camera {} selected at {}",
            description.device_id,
            description.resolution
        );
        inner.state = SessionState::Standby {
            criteria,
            description: description.clone(),
        };
        Ok(description)
    }

    /// Description of the currently selected camera.
    pub async fn describe_selected(&self) -> Result<SelectedDeviceDescription, CameraError> {
        let inner = self.inner.lock().await;
        match &inner.state {
            SessionState::Standby { description, .. }
            | SessionState::InSession { description, .. } => Ok(description.clone()),
            SessionState::Unselected => Err(CameraError::NoDeviceSelected),
        }
    }

    /// Subscribe a target to the camera stream, restarting the session so
    /// it feeds every current target. Subscribing a target twice is a
    /// no-op: the target set never holds duplicates and the session is
    /// not cycled.
    pub async fn subscribe(&self, target: OutputTarget) -> Result<(), CameraError> {
        let mut inner = self.inner.lock().await;
        if inner.targets.contains(&target) {
            return Ok(());
        }
        inner.targets.push(target);
        self.restart(&mut inner).await
    }

    /// Unsubscribe a target, restarting the session without it. Removing
    /// the last target stops the session. Unknown targets are ignored.
    pub async fn unsubscribe(&self, target: &OutputTarget) -> Result<(), CameraError> {
        let mut inner = self.inner.lock().await;
        let before = inner.targets.len();
        inner.targets.retain(|t| t != target);
        if inner.targets.len() == before {
            return Ok(());
        }
        self.restart(&mut inner).await
    }

    /// Stop the camera and forget all subscribed targets. Idempotent:
    /// without a running session this does nothing.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if matches!(inner.state, SessionState::InSession { .. }) {
            Self::close_any_session(&mut inner.state);
            inner.targets.clear();
            log::info!("camera stopped");
        }
    }

    /// Whether a capture session is currently live.
    pub async fn is_in_session(&self) -> bool {
        matches!(self.inner.lock().await.state, SessionState::InSession { .. })
    }

    /// Number of currently subscribed output targets.
    pub async fn target_count(&self) -> usize {
        self.inner.lock().await.targets.len()
    }

    /// Close a live session and demote the state to standby. Any other
    /// state is left untouched.
    fn close_any_session(state: &mut SessionState<D>) {
        let previous = mem::replace(state, SessionState::Unselected);
        *state = match previous {
            SessionState::InSession {
                criteria,
                description,
                mut device,
                mut session,
            } => {
                session.close();
                device.close();
                SessionState::Standby {
                    criteria,
                    description,
                }
            }
            other => other,
        };
    }

    /// Tear down and, when targets remain, bring up a session feeding all
    /// of them. Caller must hold the lock for the whole sequence.
    async fn restart(&self, inner: &mut Inner<D>) -> Result<(), CameraError> {
        Self::close_any_session(&mut inner.state);

        let (criteria, description) = match &inner.state {
            SessionState::Standby {
                criteria,
                description,
            } => (criteria.clone(), description.clone()),
            SessionState::Unselected => return Err(CameraError::NoDeviceSelected),
            // close_any_session never leaves a live session behind.
            SessionState::InSession { .. } => unreachable!("session closed above"),
        };

        if inner.targets.is_empty() {
            // Nothing to feed; stay in standby.
            return Ok(());
        }

        let mut device = self.open_device(&description.device_id).await?;
        match self.configure_session(&mut device, inner.targets.clone()).await {
            Ok(session) => {
                log::debug!(
                    "camera {} in session with {} target(s)",
                    description.device_id,
                    inner.targets.len()
                );
                inner.state = SessionState::InSession {
                    criteria,
                    description,
                    device,
                    session,
                };
                Ok(())
            }
            Err(error) => {
                log::warn!(
                    "closing camera {} after failed session configuration",
                    description.device_id
                );
                device.close();
                Err(error)
            }
        }
    }

    /// Open the device, bridging the driver's three-way callback into an
    /// awaitable result.
    async fn open_device(&self, device_id: &str) -> Result<D::Handle, CameraError> {
        let (tx, rx) = oneshot::channel();
        self.driver
            .open(
                device_id,
                Box::new(move |outcome| {
                    let _ = tx.send(outcome);
                }),
            )
            .map_err(|denied| CameraError::SecurityDenied(denied.reason))?;

        match rx.await {
            Ok(OpenOutcome::Opened(handle)) => Ok(handle),
            Ok(OpenOutcome::Disconnected) => Err(CameraError::DeviceDisconnected),
            Ok(OpenOutcome::Error { handle, code }) => {
                // Close whatever the driver managed to create before failing.
                if let Some(mut handle) = handle {
                    handle.close();
                }
                Err(CameraError::CannotOpenDevice(OpenErrorKind::from_code(code)))
            }
            // The driver dropped the callback without resolving it.
            Err(_) => Err(CameraError::CannotOpenDevice(OpenErrorKind::ServiceFault)),
        }
    }

    async fn configure_session(
        &self,
        device: &mut D::Handle,
        targets: Vec<OutputTarget>,
    ) -> Result<<D::Handle as DeviceHandle>::Session, CameraError> {
        let (tx, rx) = oneshot::channel();
        device.create_session(
            targets,
            Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }),
        );

        match rx.await {
            Ok(ConfigureOutcome::Configured(session)) => Ok(session),
            Ok(ConfigureOutcome::ConfigureFailed) | Err(_) => {
                Err(CameraError::ConfigureSessionFailed(device.id().to_string()))
            }
        }
    }
}

impl<D: CameraDriver> RequiringCapabilities for CameraSession<D> {
    fn required_capabilities(&self) -> Vec<Capability> {
        capture_capabilities(self.platform)
    }
}

// Tests for this module live in `tests/camera.rs`: they depend on
// `camera-capture-sim` (see the note in `session/select.rs`).
