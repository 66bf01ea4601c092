/// Shared constants for the market normalization services
use uuid::Uuid;

/// Separator between the away and home team in an event display name
pub const EVENT_NAME_SEPARATOR: &str = " @ ";

/// Event state that marks a fixture as in-play
pub const LIVE_STATE: &str = "LIVE";

/// Default number of normalization workers
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Namespace for name-based fixture identifiers.
///
/// Changing this value changes every fixture id ever produced.
pub const FIXTURE_NAMESPACE: Uuid = Uuid::from_u128(0x5f1c_2a8e_9d3b_4c71_a0e4_6b2f_8d17_c395);
