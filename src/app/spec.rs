//! Metrics specification text parsing.
//!
//! The text is a list of `label=command` tokens separated by whitespace or
//! newlines. Blank lines and lines starting with `#` are ignored.

use crate::domain::MetricSpecEntry;

/// The specification used when `METRICS` is not set.
pub const DEFAULT_METRICS_SPEC: &str = r#"
lnd_balance_channels=parse("/v1/balance/channels","balance")
lnd_local_balance_channels=parse("/v1/balance/channels","local_balance.sat")
lnd_remote_balance_channels=parse("/v1/balance/channels","remote_balance.sat")
lnd_peers=parse("/v1/getinfo","num_peers")
"#;

/// Split specification text into ordered entries.
///
/// Tokens without `=` are dropped. Each token is split on its first `=`
/// only, so commands cannot contain whitespace.
pub fn parse_metrics_spec(spec: &str) -> Vec<MetricSpecEntry> {
    spec.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .filter_map(|token| {
            let (label, command) = token.split_once('=')?;
            Some(MetricSpecEntry::new(label.trim(), command.trim()))
        })
        .collect()
}
