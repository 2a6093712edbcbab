//! Domain layer containing core types, traits, and error definitions.

pub mod error;
pub mod heartbeat;
pub mod path;
pub mod traits;
pub mod types;

pub use error::{AppError, ConfigError, MAX_ERROR_BODY_CHARS, NodeError};
pub use heartbeat::Heartbeat;
pub use path::{coerce_to_f64, descend_key_path};
pub use traits::{Collector, NodeClient};
pub use types::{
    Channel, ChannelsResponse, MetricFamily, MetricSpecEntry,
    ParsedCommand, Payment, PaymentStatus, PaymentsResponse, Sample, ShortChannelId,
};
