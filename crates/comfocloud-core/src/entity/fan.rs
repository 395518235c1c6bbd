use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::coordinator::UpdateCoordinator;
use crate::error::CoreError;

/// Number of discrete speeds. "Away" is not included in the speed range
/// and is instead mapped to off (preset 0, below the range).
pub const SPEED_COUNT: u8 = 3;

/// The ventilation unit as a 3-speed fan.
///
/// Percentages map onto the discrete presets 1..=3: percentage→speed
/// rounds up to the nearest step, speed→percentage reports the midpoint
/// of the step's band so the round trip is the identity.
pub struct Fan {
    coordinator: Arc<UpdateCoordinator>,
}

impl Fan {
    pub fn new(coordinator: Arc<UpdateCoordinator>) -> Self {
        Self { coordinator }
    }

    pub fn unique_id(&self) -> String {
        format!("{}_fan", self.coordinator.device_id())
    }

    pub fn speed_count(&self) -> u8 {
        SPEED_COUNT
    }

    /// The preset the unit is currently running at (0 = away/off).
    pub fn preset(&self) -> Result<u8, CoreError> {
        let snapshot = self.coordinator.require_snapshot()?;
        let raw = snapshot
            .state
            .value("ventilationPreset")
            .ok_or(CoreError::FieldMissing {
                key: "ventilationPreset",
            })?;
        raw.as_u64()
            .and_then(|preset| u8::try_from(preset).ok())
            .ok_or(CoreError::InvalidValue {
                key: "ventilationPreset",
            })
    }

    pub fn is_on(&self) -> Result<bool, CoreError> {
        Ok(self.preset()? > 0)
    }

    /// Current speed as a percentage (0 when off/away).
    pub fn percentage(&self) -> Result<u8, CoreError> {
        Ok(speed_to_percentage(self.preset()?))
    }

    /// Set the fan speed as a percentage. 0 turns the unit off (away),
    /// anything else rounds up to the nearest preset.
    pub async fn set_percentage(&self, percentage: u8) -> Result<(), CoreError> {
        let speed = percentage_to_speed(percentage);
        debug!(
            device = %self.coordinator.device_id(),
            percentage, speed, "changing fan speed"
        );

        self.coordinator
            .client()
            .set_device_settings(
                self.coordinator.device_id(),
                &json!({"setVentilationPreset": {"value": speed}}),
            )
            .await
            .map_err(CoreError::from_command)?;

        self.coordinator.refresh_now().await
    }

    /// Turn the unit on, at the lowest preset unless a percentage is given.
    pub async fn turn_on(&self, percentage: Option<u8>) -> Result<(), CoreError> {
        let pct = percentage.unwrap_or_else(|| speed_to_percentage(1));
        self.set_percentage(pct).await
    }

    /// Turn the unit off (away preset, below the speed range).
    pub async fn turn_off(&self) -> Result<(), CoreError> {
        self.set_percentage(0).await
    }
}

// ── Percentage <-> speed mapping ─────────────────────────────────────

/// 0 maps to off; otherwise round up to the nearest speed step, capped
/// at the top of the range.
pub fn percentage_to_speed(percentage: u8) -> u8 {
    let pct = u16::from(percentage.min(100));
    u8::try_from((pct * u16::from(SPEED_COUNT)).div_ceil(100)).unwrap_or(SPEED_COUNT)
}

/// Midpoint of the speed's percentage band, so converting back rounds
/// to the same speed. Off and out-of-range presets report 0.
pub fn speed_to_percentage(speed: u8) -> u8 {
    if speed == 0 || speed > SPEED_COUNT {
        return 0;
    }
    let s = u16::from(speed);
    u8::try_from((2 * s - 1) * 100 / (2 * u16::from(SPEED_COUNT))).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_percent_is_off() {
        assert_eq!(percentage_to_speed(0), 0);
    }

    #[test]
    fn midband_percentages_map_to_speed_2() {
        for pct in 34..=66 {
            assert_eq!(percentage_to_speed(pct), 2, "pct {pct}");
        }
    }

    #[test]
    fn full_percentage_is_top_speed() {
        assert_eq!(percentage_to_speed(100), 3);
    }

    #[test]
    fn low_percentages_map_to_speed_1() {
        for pct in 1..=33 {
            assert_eq!(percentage_to_speed(pct), 1, "pct {pct}");
        }
    }

    #[test]
    fn round_trip_is_identity_for_all_speeds() {
        for speed in 1..=SPEED_COUNT {
            assert_eq!(percentage_to_speed(speed_to_percentage(speed)), speed);
        }
    }

    #[test]
    fn preset_2_reports_fifty_percent() {
        assert_eq!(speed_to_percentage(2), 50);
    }

    #[test]
    fn away_reports_zero_percent() {
        assert_eq!(speed_to_percentage(0), 0);
    }
}
