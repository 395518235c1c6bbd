use std::sync::Arc;

use serde_json::Value;

use crate::coordinator::UpdateCoordinator;
use crate::descriptor::SensorDescriptor;
use crate::error::CoreError;

/// One numeric/text sensor backed by a descriptor.
pub struct Sensor {
    coordinator: Arc<UpdateCoordinator>,
    descriptor: &'static SensorDescriptor,
}

impl Sensor {
    pub fn new(coordinator: Arc<UpdateCoordinator>, descriptor: &'static SensorDescriptor) -> Self {
        Self {
            coordinator,
            descriptor,
        }
    }

    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.coordinator.device_id(), self.descriptor.key)
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &'static SensorDescriptor {
        self.descriptor
    }

    /// Current value through the descriptor's extraction rule.
    ///
    /// A missing key fails this sensor only -- the snapshot and sibling
    /// entities are unaffected.
    pub fn value(&self) -> Result<Value, CoreError> {
        let snapshot = self.coordinator.require_snapshot()?;
        self.descriptor.extract(&snapshot)
    }
}
