use std::sync::Arc;

use tracing::debug;

use crate::coordinator::UpdateCoordinator;
use crate::descriptor::SelectDescriptor;
use crate::error::CoreError;

/// One select entity backed by a descriptor's option list.
pub struct Select {
    coordinator: Arc<UpdateCoordinator>,
    descriptor: &'static SelectDescriptor,
}

impl Select {
    pub fn new(coordinator: Arc<UpdateCoordinator>, descriptor: &'static SelectDescriptor) -> Self {
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

    pub fn options(&self) -> &'static [&'static str] {
        self.descriptor.options
    }

    /// The option matching the device's reported state.
    pub fn current_option(&self) -> Result<&'static str, CoreError> {
        let snapshot = self.coordinator.require_snapshot()?;
        let raw = snapshot
            .state
            .value(self.descriptor.key)
            .ok_or(CoreError::FieldMissing {
                key: self.descriptor.key,
            })?;
        Ok((self.descriptor.current)(raw))
    }

    /// Apply an option: push the descriptor's settings patch, then
    /// refresh so the new state is visible without waiting for the
    /// next timer tick.
    pub async fn select_option(&self, option: &str) -> Result<(), CoreError> {
        let patch = (self.descriptor.command)(option).ok_or_else(|| {
            CoreError::ValidationFailed {
                message: format!(
                    "unknown option '{option}' (expected one of: {})",
                    self.descriptor.options.join(", ")
                ),
            }
        })?;
        debug!(
            device = %self.coordinator.device_id(),
            option, "applying select option"
        );

        self.coordinator
            .client()
            .set_device_settings(self.coordinator.device_id(), &patch)
            .await
            .map_err(CoreError::from_command)?;

        self.coordinator.refresh_now().await
    }
}
