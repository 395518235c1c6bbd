// ── Entity views ──
//
// Thin read/command views over a coordinator's snapshot. Each entity
// pairs an `Arc<UpdateCoordinator>` with a `'static` descriptor; reads
// never touch the network, commands patch settings and then request an
// immediate refresh.

mod binary_sensor;
mod fan;
mod select;
mod sensor;

pub use binary_sensor::BinarySensor;
pub use fan::{Fan, SPEED_COUNT, percentage_to_speed, speed_to_percentage};
pub use select::Select;
pub use sensor::Sensor;
