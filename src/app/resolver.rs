//! Command resolution for metrics specification entries.
//!
//! Only three command shapes are executable:
//!
//! ```text
//! parse("<endpoint>", "<dotted.key.path>")
//! PENDING_HTLCS
//! FAILED_PAYMENTS
//! ```
//!
//! Anything else is rejected at startup.

use crate::domain::{ConfigError, MetricSpecEntry, ParsedCommand};

pub const PENDING_HTLCS_COMMAND: &str = "PENDING_HTLCS";
pub const FAILED_PAYMENTS_COMMAND: &str = "FAILED_PAYMENTS";

/// Resolve an entry's command or fail with [`ConfigError::UnsupportedCommand`].
pub fn resolve_command(entry: &MetricSpecEntry) -> Result<ParsedCommand, ConfigError> {
    parse_command(&entry.command).ok_or_else(|| ConfigError::UnsupportedCommand {
        label: entry.label.clone(),
        command: entry.command.clone(),
    })
}

/// Classify a command string. `None` for every unsupported shape.
pub fn parse_command(command: &str) -> Option<ParsedCommand> {
    match command.trim() {
        PENDING_HTLCS_COMMAND => Some(ParsedCommand::BuiltinHtlc),
        FAILED_PAYMENTS_COMMAND => Some(ParsedCommand::BuiltinFailedPayments),
        other => parse_path_query(other),
    }
}

fn parse_path_query(command: &str) -> Option<ParsedCommand> {
    let args = command.strip_prefix("parse(")?.strip_suffix(')')?;

    let (endpoint, rest) = take_quoted(args.trim_start())?;
    let rest = rest.trim_start().strip_prefix(',')?;
    let (key_path, rest) = take_quoted(rest.trim_start())?;
    if !rest.trim().is_empty() {
        return None;
    }

    if !endpoint.starts_with('/') {
        return None;
    }

    let key_path: Vec<String> = key_path.split('.').map(str::to_string).collect();
    if key_path.iter().any(String::is_empty) {
        return None;
    }

    Some(ParsedCommand::PathQuery {
        endpoint: endpoint.to_string(),
        key_path,
    })
}

/// Take one single- or double-quoted literal off the front of `input`.
/// Escapes are not supported.
fn take_quoted(input: &str) -> Option<(&str, &str)> {
    let quote = input.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &input[1..];
    let end = body.find(quote)?;
    let literal = &body[..end];
    if literal.contains('\\') {
        return None;
    }
    Some((literal, &body[end + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(endpoint: &str, key_path: &[&str]) -> ParsedCommand {
        ParsedCommand::PathQuery {
            endpoint: endpoint.to_string(),
            key_path: key_path.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_builtin_commands() {
        assert_eq!(
            parse_command("PENDING_HTLCS"),
            Some(ParsedCommand::BuiltinHtlc)
        );
        assert_eq!(
            parse_command("FAILED_PAYMENTS"),
            Some(ParsedCommand::BuiltinFailedPayments)
        );
    }

    #[test]
    fn test_builtins_are_case_sensitive() {
        assert_eq!(parse_command("pending_htlcs"), None);
        assert_eq!(parse_command("Failed_Payments"), None);
    }

    #[test]
    fn test_path_query_single_segment() {
        assert_eq!(
            parse_command(r#"parse("/v1/getinfo","num_peers")"#),
            Some(query("/v1/getinfo", &["num_peers"]))
        );
    }

    #[test]
    fn test_path_query_dotted_segments() {
        assert_eq!(
            parse_command(r#"parse("/v1/balance/channels","local_balance.sat")"#),
            Some(query("/v1/balance/channels", &["local_balance", "sat"]))
        );
    }

    #[test]
    fn test_path_query_single_quotes_and_query_string() {
        assert_eq!(
            parse_command("parse('/v1/payments?include_incomplete=true','total_num_payments')"),
            Some(query(
                "/v1/payments?include_incomplete=true",
                &["total_num_payments"]
            ))
        );
    }

    #[test]
    fn test_unsupported_shapes_are_rejected() {
        for command in [
            "",
            "get(\"/v1/getinfo\")",
            "parse(\"/v1/getinfo\")",
            "parse(\"/v1/getinfo\",\"num_peers\"",
            "parse(/v1/getinfo,num_peers)",
            "parse(\"/v1/getinfo\",\"num_peers\",\"x\")",
            "parse(\"/v1/getinfo\",\"num_peers\").__class__",
            "parse(\"v1/getinfo\",\"num_peers\")",
            "parse(\"/v1/getinfo\",\"\")",
            "parse(\"/v1/getinfo\",\"a..b\")",
            "parse(\"/v1/getinfo\",\"a\\\"b\")",
            "parse(\"/v1/getinfo\",'num_peers\")",
            "__import__('os').system('id')",
        ] {
            assert_eq!(parse_command(command), None, "{command} should be rejected");
        }
    }

    #[test]
    fn test_resolve_reports_label_and_command() {
        let entry = MetricSpecEntry::new("bad", "DROP_TABLES");
        let err = resolve_command(&entry).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedCommand { ref label, ref command }
                if label == "bad" && command == "DROP_TABLES"
        ));
    }

    #[test]
    fn test_resolve_supported_entry() {
        let entry = MetricSpecEntry::new("htlcs", "PENDING_HTLCS");
        assert_eq!(resolve_command(&entry).unwrap(), ParsedCommand::BuiltinHtlc);
    }
}
