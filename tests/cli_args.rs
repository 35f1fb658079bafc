//! Integration tests for CLI argument handling
//!
//! Only exercises paths that exit before any network access.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pharmawatch"))
        .args(args)
        .output()
        .expect("Failed to execute pharmawatch")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pharmawatch"), "Help should mention pharmawatch");
    assert!(stdout.contains("quotes"), "Help should list the quotes subcommand");
    assert!(stdout.contains("recalls"), "Help should list the recalls subcommand");
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_limit_prints_error_and_exits() {
    let output = run_cli(&["approvals", "--limit", "500"]);
    assert!(!output.status.success(), "Expected invalid limit to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid limit") || stderr.contains("invalid"),
        "Should print error message about invalid limit: {}",
        stderr
    );
}

#[test]
fn test_company_help_is_valid() {
    let output = run_cli(&["company", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NAME"));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use pharmawatch::cli::{parse_limit_arg, Cli, Command, DEFAULT_APPROVALS_LIMIT};

    #[test]
    fn test_cli_recalls_has_no_arguments() {
        let cli = Cli::parse_from(["pharmawatch", "recalls"]);
        assert_eq!(cli.command, Command::Recalls);
    }

    #[test]
    fn test_cli_dashboard_with_approvals() {
        let cli = Cli::parse_from(["pharmawatch", "dashboard", "--approvals", "10"]);
        assert_eq!(cli.command, Command::Dashboard { approvals: 10 });
    }

    #[test]
    fn test_cli_approvals_default_limit() {
        let cli = Cli::parse_from(["pharmawatch", "approvals"]);
        assert_eq!(
            cli.command,
            Command::Approvals {
                limit: DEFAULT_APPROVALS_LIMIT
            }
        );
    }

    #[test]
    fn test_cli_history_symbol() {
        let cli = Cli::parse_from(["pharmawatch", "history", "NVO"]);
        assert_eq!(
            cli.command,
            Command::History {
                symbol: "NVO".to_string()
            }
        );
    }

    #[test]
    fn test_parse_limit_arg_invalid_returns_error() {
        assert!(parse_limit_arg("zero").is_err());
        assert!(parse_limit_arg("0").is_err());
    }
}
