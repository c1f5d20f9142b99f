pub mod alerts;
pub mod due;
pub mod events;
pub mod stats;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The two parallel service dimensions tracked per machine. Structurally
/// identical; they differ only in which field pair and history table they read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTrack {
    Calibration,
    Maintenance,
}
