//! In-memory camera driver.
//!
//! Devices are declared up front as [`SimDeviceSpec`] entries; what
//! happens when one is opened or configured is scripted through
//! [`OpenPlan`] and [`ConfigurePlan`]. Open and configure outcomes are
//! delivered on one dedicated worker thread, never inline, matching the
//! single callback context a real driver would use. Every hardware-shaped
//! call is recorded in a shared [`DriverJournal`] so tests can assert
//! call ordering.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use camera_capture_core::models::error::error_code;
use camera_capture_core::{
    AccessDenied, CameraDriver, CaptureSessionHandle, ConfigureCallback, ConfigureOutcome,
    DeviceCharacteristics, DeviceHandle, DeviceRegistry, OpenCallback, OpenOutcome, OutputTarget,
};

/// What the driver should do when a device is opened.
#[derive(Debug, Clone)]
pub enum OpenPlan {
    Succeed,
    /// Report the device gone immediately after the open attempt.
    Disconnect,
    /// Fail with the given numeric code, handing back a partially created
    /// handle for the caller to close.
    FailWith(i32),
    /// Refuse synchronously, before any hardware is touched.
    DenyAccess(String),
}

/// What the driver should do when a capture session is configured.
#[derive(Debug, Clone, Copy)]
pub enum ConfigurePlan {
    Succeed,
    Fail,
}

/// One simulated device: its identity, what it reports, and how it
/// behaves.
#[derive(Clone)]
pub struct SimDeviceSpec {
    pub id: String,
    pub characteristics: DeviceCharacteristics,
    pub open_plan: OpenPlan,
    pub configure_plan: ConfigurePlan,
}

impl SimDeviceSpec {
    /// A well-behaved device: opens and configures successfully.
    pub fn new(id: impl Into<String>, characteristics: DeviceCharacteristics) -> Self {
        Self {
            id: id.into(),
            characteristics,
            open_plan: OpenPlan::Succeed,
            configure_plan: ConfigurePlan::Succeed,
        }
    }

    pub fn with_open_plan(mut self, plan: OpenPlan) -> Self {
        self.open_plan = plan;
        self
    }

    pub fn with_configure_plan(mut self, plan: ConfigurePlan) -> Self {
        self.configure_plan = plan;
        self
    }
}

/// A hardware-shaped call observed by the driver or one of its handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    Open(String),
    CloseDevice(String),
    /// Device id plus the number of output targets configured.
    CreateSession(String, usize),
    CloseSession(String),
}

/// Ordered, shared record of every hardware-shaped call.
#[derive(Clone, Default)]
pub struct DriverJournal {
    events: Arc<Mutex<Vec<DriverEvent>>>,
}

impl DriverJournal {
    fn record(&self, event: DriverEvent) {
        log::debug!("driver event: {:?}", event);
        self.events.lock().push(event);
    }

    /// All events recorded so far, in call order.
    pub fn events(&self) -> Vec<DriverEvent> {
        self.events.lock().clone()
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

/// The single execution context all driver callbacks run on. The thread
/// exits when the owning driver is dropped.
struct CallbackWorker {
    queue: Mutex<mpsc::Sender<Job>>,
}

impl CallbackWorker {
    fn new() -> Self {
        let (queue, jobs) = mpsc::channel::<Job>();
        thread::Builder::new()
            .name("camera-callbacks".into())
            .spawn(move || {
                while let Ok(job) = jobs.recv() {
                    job();
                }
            })
            .expect("failed to spawn callback worker");
        Self {
            queue: Mutex::new(queue),
        }
    }

    fn post(&self, job: impl FnOnce() + Send + 'static) {
        let _ = self.queue.lock().send(Box::new(job));
    }
}

/// In-memory [`CameraDriver`] implementation.
pub struct SimCameraDriver {
    devices: Vec<SimDeviceSpec>,
    journal: DriverJournal,
    worker: Arc<CallbackWorker>,
}

impl SimCameraDriver {
    pub fn new(devices: Vec<SimDeviceSpec>) -> Self {
        Self {
            devices,
            journal: DriverJournal::default(),
            worker: Arc::new(CallbackWorker::new()),
        }
    }

    /// Handle onto the shared call journal.
    pub fn journal(&self) -> DriverJournal {
        self.journal.clone()
    }

    fn handle_for(&self, spec: &SimDeviceSpec) -> SimDeviceHandle {
        SimDeviceHandle {
            id: spec.id.clone(),
            configure_plan: spec.configure_plan,
            journal: self.journal.clone(),
            worker: Arc::clone(&self.worker),
            closed: false,
        }
    }
}

impl DeviceRegistry for SimCameraDriver {
    fn list_devices(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.id.clone()).collect()
    }

    fn characteristics(&self, device_id: &str) -> Option<DeviceCharacteristics> {
        self.devices
            .iter()
            .find(|d| d.id == device_id)
            .map(|d| d.characteristics.clone())
    }
}

impl CameraDriver for SimCameraDriver {
    type Handle = SimDeviceHandle;

    fn open(
        &self,
        device_id: &str,
        on_outcome: OpenCallback<Self::Handle>,
    ) -> Result<(), AccessDenied> {
        let spec = self.devices.iter().find(|d| d.id == device_id);

        if let Some(SimDeviceSpec {
            open_plan: OpenPlan::DenyAccess(reason),
            ..
        }) = spec
        {
            return Err(AccessDenied {
                reason: reason.clone(),
            });
        }

        self.journal.record(DriverEvent::Open(device_id.to_string()));

        let outcome = match spec {
            Some(spec) => match &spec.open_plan {
                OpenPlan::Succeed => OpenOutcome::Opened(self.handle_for(spec)),
                OpenPlan::Disconnect => OpenOutcome::Disconnected,
                OpenPlan::FailWith(code) => OpenOutcome::Error {
                    handle: Some(self.handle_for(spec)),
                    code: *code,
                },
                OpenPlan::DenyAccess(_) => unreachable!("denied above"),
            },
            // Opening an id that was never listed: device fault.
            None => OpenOutcome::Error {
                handle: None,
                code: error_code::DEVICE_FAULT,
            },
        };

        self.worker.post(move || on_outcome(outcome));
        Ok(())
    }
}

/// An open simulated device.
pub struct SimDeviceHandle {
    id: String,
    configure_plan: ConfigurePlan,
    journal: DriverJournal,
    worker: Arc<CallbackWorker>,
    closed: bool,
}

impl DeviceHandle for SimDeviceHandle {
    type Session = SimSessionHandle;

    fn id(&self) -> &str {
        &self.id
    }

    fn create_session(
        &mut self,
        outputs: Vec<OutputTarget>,
        on_outcome: ConfigureCallback<Self::Session>,
    ) {
        self.journal
            .record(DriverEvent::CreateSession(self.id.clone(), outputs.len()));

        let outcome = match self.configure_plan {
            ConfigurePlan::Succeed => ConfigureOutcome::Configured(SimSessionHandle {
                device_id: self.id.clone(),
                journal: self.journal.clone(),
                closed: false,
            }),
            ConfigurePlan::Fail => ConfigureOutcome::ConfigureFailed,
        };

        self.worker.post(move || on_outcome(outcome));
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.journal.record(DriverEvent::CloseDevice(self.id.clone()));
        }
    }
}

impl Drop for SimDeviceHandle {
    fn drop(&mut self) {
        // Backstop for owners that forget to close explicitly.
        self.close();
    }
}

/// A live simulated capture session.
pub struct SimSessionHandle {
    device_id: String,
    journal: DriverJournal,
    closed: bool,
}

impl CaptureSessionHandle for SimSessionHandle {
    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.journal
                .record(DriverEvent::CloseSession(self.device_id.clone()));
        }
    }
}

impl Drop for SimSessionHandle {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera_capture_core::{Facing, Resolution};

    use std::sync::mpsc;
    use std::time::Duration;

    fn spec(id: &str) -> SimDeviceSpec {
        SimDeviceSpec::new(
            id,
            DeviceCharacteristics {
                facing: Facing::Back,
                focal_lengths: vec![1.0],
                resolutions: vec![Resolution::new(640, 480)],
                sensor_orientation: 0,
            },
        )
    }

    #[test]
    fn registry_lists_devices_in_declaration_order() {
        let driver = SimCameraDriver::new(vec![spec("a"), spec("b")]);
        assert_eq!(driver.list_devices(), vec!["a".to_string(), "b".to_string()]);
        assert!(driver.characteristics("a").is_some());
        assert!(driver.characteristics("missing").is_none());
    }

    #[test]
    fn open_outcome_arrives_off_the_calling_thread() {
        let driver = SimCameraDriver::new(vec![spec("a")]);
        let caller = thread::current().id();
        let (tx, rx) = mpsc::channel();

        driver
            .open(
                "a",
                Box::new(move |outcome| {
                    let opened = matches!(outcome, OpenOutcome::Opened(_));
                    tx.send((opened, thread::current().id())).unwrap();
                }),
            )
            .unwrap();

        let (opened, callback_thread) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(opened);
        assert_ne!(callback_thread, caller);
    }

    #[test]
    fn unknown_device_reports_a_device_fault() {
        let driver = SimCameraDriver::new(vec![]);
        let (tx, rx) = mpsc::channel();

        driver
            .open(
                "nope",
                Box::new(move |outcome| {
                    tx.send(matches!(
                        outcome,
                        OpenOutcome::Error {
                            handle: None,
                            code: error_code::DEVICE_FAULT,
                        }
                    ))
                    .unwrap();
                }),
            )
            .unwrap();

        assert!(rx.recv_timeout(Duration::from_secs(5)).unwrap());
    }

    #[test]
    fn dropping_handles_closes_them_once() {
        let driver = SimCameraDriver::new(vec![spec("a")]);
        let journal = driver.journal();
        let mut handle = driver.handle_for(&driver.devices[0]);

        handle.close();
        drop(handle); // must not record a second close

        assert_eq!(
            journal.events(),
            vec![DriverEvent::CloseDevice("a".into())]
        );
    }
}
