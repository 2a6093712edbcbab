use std::fmt;

use serde::{Deserialize, Deserializer};

/// One `label=command` declaration from the metrics specification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpecEntry {
    pub label: String,
    pub command: String,
}

impl MetricSpecEntry {
    pub fn new(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            command: command.into(),
        }
    }
}

/// The closed set of commands a specification entry can resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Fetch `endpoint` and descend `key_path` (never empty).
    PathQuery {
        endpoint: String,
        key_path: Vec<String>,
    },
    BuiltinHtlc,
    BuiltinFailedPayments,
}

/// Human-readable rendering of a packed 64-bit channel id.
///
/// Bits 40..64 carry the block height, bits 16..40 the transaction index
/// within the block and bits 0..16 the funding output index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortChannelId {
    pub block_height: u32,
    pub tx_index: u32,
    pub output_index: u16,
}

impl From<u64> for ShortChannelId {
    fn from(chan_id: u64) -> Self {
        Self {
            block_height: ((chan_id >> 40) & 0xFF_FFFF) as u32,
            tx_index: ((chan_id >> 16) & 0xFF_FFFF) as u32,
            output_index: (chan_id & 0xFFFF) as u16,
        }
    }
}

impl fmt::Display for ShortChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}",
            self.block_height, self.tx_index, self.output_index
        )
    }
}

/// A channel entry from `/v1/channels`. Only the fields the exporter reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub chan_id: u64,
    #[serde(default)]
    pub pending_htlcs: Vec<serde_json::Value>,
}

impl Channel {
    #[must_use]
    pub fn short_channel_id(&self) -> ShortChannelId {
        ShortChannelId::from(self.chan_id)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelsResponse {
    #[serde(default)]
    pub channels: Vec<Channel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Unknown,
    InFlight,
    Succeeded,
    Failed,
    Initiated,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub status: Option<PaymentStatus>,
}

impl Payment {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == Some(PaymentStatus::Failed)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentsResponse {
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// A single gauge reading with its label set.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl Sample {
    pub fn unlabeled(value: f64) -> Self {
        Self {
            labels: Vec::new(),
            value,
        }
    }

    pub fn labeled(key: impl Into<String>, label_value: impl Into<String>, value: f64) -> Self {
        Self {
            labels: vec![(key.into(), label_value.into())],
            value,
        }
    }
}

/// All samples a collector produced for one gauge name during one scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            samples: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sample(mut self, sample: Sample) -> Self {
        self.samples.push(sample);
        self
    }
}

// LND's REST gateway encodes uint64 fields as JSON strings.
fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_channel_id_decoding() {
        let scid = ShortChannelId::from(0x0000_0100_0002_0003);
        assert_eq!(scid.block_height, 1);
        assert_eq!(scid.tx_index, 2);
        assert_eq!(scid.output_index, 3);
        assert_eq!(scid.to_string(), "1x2x3");
    }

    #[test]
    fn test_short_channel_id_real_mainnet_id() {
        // 700000x1234x1
        let chan_id: u64 = (700_000u64 << 40) | (1234u64 << 16) | 1;
        assert_eq!(ShortChannelId::from(chan_id).to_string(), "700000x1234x1");
    }

    #[test]
    fn test_short_channel_id_field_maxima() {
        let scid = ShortChannelId::from(u64::MAX);
        assert_eq!(scid.to_string(), "16777215x16777215x65535");
    }

    #[test]
    fn test_channel_accepts_string_and_numeric_ids() {
        let from_string: Channel =
            serde_json::from_str(r#"{"chan_id": "1099511758851", "pending_htlcs": [{}]}"#)
                .unwrap();
        assert_eq!(from_string.chan_id, 1_099_511_758_851);
        assert_eq!(from_string.pending_htlcs.len(), 1);

        let from_number: Channel = serde_json::from_str(r#"{"chan_id": 42}"#).unwrap();
        assert_eq!(from_number.chan_id, 42);
        assert!(from_number.pending_htlcs.is_empty());
    }

    #[test]
    fn test_channel_rejects_garbage_id() {
        let result = serde_json::from_str::<Channel>(r#"{"chan_id": "abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_channels_response_missing_key_is_empty() {
        let resp: ChannelsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.channels.is_empty());
    }

    #[test]
    fn test_payment_status_parsing() {
        let resp: PaymentsResponse = serde_json::from_str(
            r#"{"payments": [
                {"status": "FAILED"},
                {"status": "SUCCEEDED"},
                {"status": "IN_FLIGHT"},
                {"status": "SOMETHING_NEW"},
                {}
            ]}"#,
        )
        .unwrap();
        let statuses: Vec<_> = resp.payments.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![
                Some(PaymentStatus::Failed),
                Some(PaymentStatus::Succeeded),
                Some(PaymentStatus::InFlight),
                Some(PaymentStatus::Other),
                None,
            ]
        );
        assert_eq!(resp.payments.iter().filter(|p| p.is_failed()).count(), 1);
    }

    #[test]
    fn test_metric_family_builder() {
        let family = MetricFamily::new("pending_htlcs", "pending HTLCs")
            .with_sample(Sample::labeled("scid", "1x2x3", 3.0))
            .with_sample(Sample::unlabeled(1.0));
        assert_eq!(family.samples.len(), 2);
        assert_eq!(
            family.samples[0].labels,
            vec![("scid".to_string(), "1x2x3".to_string())]
        );
        assert!(family.samples[1].labels.is_empty());
    }
}
