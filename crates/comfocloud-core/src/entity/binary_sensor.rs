use std::sync::Arc;

use crate::coordinator::UpdateCoordinator;
use crate::descriptor::BinarySensorDescriptor;
use crate::error::CoreError;

/// One on/off sensor backed by a descriptor.
pub struct BinarySensor {
    coordinator: Arc<UpdateCoordinator>,
    descriptor: &'static BinarySensorDescriptor,
}

impl BinarySensor {
    pub fn new(
        coordinator: Arc<UpdateCoordinator>,
        descriptor: &'static BinarySensorDescriptor,
    ) -> Self {
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

    pub fn descriptor(&self) -> &'static BinarySensorDescriptor {
        self.descriptor
    }

    pub fn is_on(&self) -> Result<bool, CoreError> {
        let snapshot = self.coordinator.require_snapshot()?;
        self.descriptor.extract(&snapshot)
    }
}
