//! Device selection: scores every attached camera against the selection
//! criteria and returns the best match.

use crate::models::criteria::SelectionCriteria;
use crate::models::device::SelectedDeviceDescription;
use crate::models::error::CameraError;
use crate::traits::driver::DeviceRegistry;

/// Pick the camera and output resolution that best fit `criteria`.
///
/// Facing must match exactly and at least one focal length must fall in
/// the requested band. Among the surviving candidates, the resolution
/// with the globally smallest symmetric area difference wins; ties keep
/// the earliest listed device. Fails with
/// [`CameraError::NoMatchingDevice`] when nothing survives the filters.
pub fn select_device(
    registry: &impl DeviceRegistry,
    criteria: &SelectionCriteria,
) -> Result<SelectedDeviceDescription, CameraError> {
    let mut best: Option<(u64, SelectedDeviceDescription)> = None;

    for device_id in registry.list_devices() {
        // The device may have been unplugged since listing.
        let Some(characteristics) = registry.characteristics(&device_id) else {
            continue;
        };

        if characteristics.facing != criteria.facing {
            continue;
        }
        if !criteria.focal_length.matches(&characteristics.focal_lengths) {
            continue;
        }

        for resolution in &characteristics.resolutions {
            let error = criteria.resolution.fit_error(*resolution);
            // Strict comparison: the earliest listed device keeps ties.
            if best.as_ref().is_none_or(|(least, _)| error < *least) {
                best = Some((
                    error,
                    SelectedDeviceDescription {
                        device_id: device_id.clone(),
                        resolution: *resolution,
                        orientation: characteristics.sensor_orientation,
                    },
                ));
            }
        }
    }

    match best {
        Some((error, description)) => {
            log::debug!(
                "selected camera {} at {} (fit error {})",
                description.device_id,
                description.resolution,
                error
            );
            Ok(description)
        }
        None => Err(CameraError::NoMatchingDevice(criteria.clone())),
    }
}

// Tests for this module live in `tests/select.rs`: they depend on
// `camera-capture-sim`, whose own dependency on this crate forms a
// dev-dependency cycle that makes sim-backed unit tests see two
// incompatible copies of the core types. Integration tests link the same
// instance sim does, so they are kept there instead.
