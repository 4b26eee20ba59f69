//! Workflow controller: sequences the permission broker and the camera
//! session into one observable state stream.
//!
//! The controller owns no hardware state itself. It publishes
//! [`WorkflowSnapshot`] values on a watch channel; a presentation layer
//! subscribes and renders them. Calls whose precondition state does not
//! hold are silently ignored rather than errors; a stale button press is
//! not a fault.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::criteria::SelectionCriteria;
use crate::models::device::OutputTarget;
use crate::models::error::CameraError;
use crate::models::state::{WorkflowSnapshot, WorkflowState};
use crate::permissions::broker::PermissionBroker;
use crate::permissions::host::AuthorizationHost;
use crate::session::camera::CameraSession;
use crate::traits::driver::CameraDriver;

/// Drives the camera through permission verification, device selection,
/// and target activation.
///
/// Created once per observer, inside a tokio runtime (construction spawns
/// the permission check). Dropping the controller aborts any still
/// pending permission check; a session left running remains stoppable
/// through [`CameraSession::stop`] from outside.
pub struct CameraWorkflow<D, H>
where
    D: CameraDriver + 'static,
    H: AuthorizationHost + 'static,
{
    session: Arc<CameraSession<D>>,
    broker: Arc<PermissionBroker<H>>,
    criteria: SelectionCriteria,
    state: Arc<watch::Sender<WorkflowSnapshot>>,
    permission_task: Mutex<Option<JoinHandle<()>>>,
}

impl<D, H> CameraWorkflow<D, H>
where
    D: CameraDriver + 'static,
    H: AuthorizationHost + 'static,
{
    /// Create the workflow and immediately begin verifying permissions
    /// with the default selection criteria.
    pub fn new(session: Arc<CameraSession<D>>, broker: Arc<PermissionBroker<H>>) -> Self {
        Self::with_criteria(session, broker, SelectionCriteria::default())
    }

    /// Like [`new`](Self::new), with the criteria `start_camera` will use.
    pub fn with_criteria(
        session: Arc<CameraSession<D>>,
        broker: Arc<PermissionBroker<H>>,
        criteria: SelectionCriteria,
    ) -> Self {
        let (state, _) = watch::channel(WorkflowSnapshot::default());
        let workflow = Self {
            session,
            broker,
            criteria,
            state: Arc::new(state),
            permission_task: Mutex::new(None),
        };
        workflow.request_permission();
        workflow
    }

    /// Observe the workflow state. The receiver immediately sees the
    /// current snapshot and every change after it.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.state.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.state.borrow().clone()
    }

    /// Signal that the user wants to start the camera. Selects a device;
    /// the observer is expected to come back with a target for
    /// [`activate_camera`](Self::activate_camera) once it has a surface.
    /// Only honored in `PermissionGranted`.
    pub async fn start_camera(&self) {
        if self.snapshot().state != WorkflowState::PermissionGranted {
            return;
        }
        match self.session.select_device(self.criteria.clone()).await {
            Ok(description) => self.state.send_modify(|s| {
                s.state = WorkflowState::StartingUp;
                s.selected_device = Some(description);
            }),
            Err(error) => self.fail(error),
        }
    }

    /// Provide a target to feed from the camera. Only honored in
    /// `StartingUp`.
    pub async fn activate_camera(&self, target: OutputTarget) {
        if self.snapshot().state != WorkflowState::StartingUp {
            return;
        }
        match self.session.subscribe(target).await {
            Ok(()) => self.state.send_modify(|s| s.state = WorkflowState::Running),
            Err(error) => self.fail(error),
        }
    }

    /// Withdraw a target from the camera. Only honored in `Running`.
    pub async fn deactivate_camera(&self, target: &OutputTarget) {
        if self.snapshot().state != WorkflowState::Running {
            return;
        }
        match self.session.unsubscribe(target).await {
            Ok(()) => self.state.send_modify(|s| s.state = WorkflowState::StartingUp),
            Err(error) => self.fail(error),
        }
    }

    /// Stop the camera. Only honored in `Running`; ends back in
    /// `PermissionGranted`, ready for another start.
    pub async fn stop_camera(&self) {
        if self.snapshot().state != WorkflowState::Running {
            return;
        }
        self.state
            .send_modify(|s| s.state = WorkflowState::Stopping);
        self.session.stop().await;
        self.state
            .send_modify(|s| s.state = WorkflowState::PermissionGranted);
    }

    fn request_permission(&self) {
        self.state
            .send_modify(|s| s.state = WorkflowState::RequestingPermission);
        let session = Arc::clone(&self.session);
        let broker = Arc::clone(&self.broker);
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let granted = broker.verify(session.as_ref()).await;
            state.send_modify(|s| {
                s.state = if granted {
                    WorkflowState::PermissionGranted
                } else {
                    WorkflowState::PermissionNotGranted
                };
            });
        });
        *self.permission_task.lock() = Some(task);
    }

    fn fail(&self, error: CameraError) {
        log::warn!("camera workflow error: {}", error);
        self.state.send_modify(|s| {
            s.state = WorkflowState::Error;
            s.error = Some(error);
        });
    }
}

impl<D, H> Drop for CameraWorkflow<D, H>
where
    D: CameraDriver + 'static,
    H: AuthorizationHost + 'static,
{
    fn drop(&mut self) {
        // The observer is gone; a still-pending permission check with it.
        if let Some(task) = self.permission_task.lock().take() {
            task.abort();
        }
    }
}

// Tests for this module live in `tests/workflow.rs`: they depend on
// `camera-capture-sim` (see the note in `session/select.rs`).
