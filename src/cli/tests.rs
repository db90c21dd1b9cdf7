//! Unit tests for CLI commands

use crate::cli::{Cli, Commands};
use clap::Parser;

#[test]
fn test_serve_command_with_flags() {
    let cli = Cli::try_parse_from([
        "trellis",
        "serve",
        "--port",
        "8080",
        "--host",
        "127.0.0.1",
    ])
    .unwrap();

    match cli.command {
        Commands::Serve { port, host } => {
            assert_eq!(port, 8080);
            assert_eq!(host, "127.0.0.1");
        }
        _ => panic!("Expected Serve command"),
    }
}

#[test]
fn test_routes_command_exists() {
    let cli = Cli::try_parse_from(["trellis", "routes"]).unwrap();
    assert!(matches!(cli.command, Commands::Routes));
}

#[test]
fn test_all_commands_parse() {
    let commands = vec![
        vec!["trellis", "serve"],
        vec!["trellis", "serve", "-p", "9000"],
        vec!["trellis", "routes"],
    ];

    for args in commands {
        let cli = Cli::try_parse_from(&args);
        assert!(cli.is_ok(), "Failed to parse command: {:?}", args);
    }
}
