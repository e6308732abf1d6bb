use crate::cli::{Cli, Command, HistoryAction, KindArg};

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[test]
fn given_generate_arguments_when_parsed_then_fields_populated() {
    // GIVEN
    let argv = [
        "channel-studio",
        "generate",
        "thumbnail",
        "--prompt",
        "surprised face, bold title",
        "--image",
        "face.png",
        "--label",
        "Episode 12",
    ];

    // WHEN
    let cli = Cli::try_parse_from(argv).unwrap();

    // THEN
    let Command::Generate(args) = cli.command else {
        panic!("expected generate");
    };
    assert_eq!(args.kind, KindArg::Thumbnail);
    assert_eq!(args.prompt, "surprised face, bold title");
    assert_eq!(args.image, Some(PathBuf::from("face.png")));
    assert_eq!(args.label.as_deref(), Some("Episode 12"));
}

#[test]
fn given_width_without_height_when_parsed_then_rejected() {
    let result = Cli::try_parse_from([
        "channel-studio",
        "generate",
        "banner",
        "--prompt",
        "retro",
        "--width",
        "2048",
    ]);

    assert!(result.is_err());
}

#[test]
fn given_global_flags_after_subcommand_when_parsed_then_applied() {
    // GIVEN
    let argv = [
        "channel-studio",
        "history",
        "clear",
        "--yes",
        "--data-dir",
        "/tmp/studio",
        "-v",
    ];

    // WHEN
    let cli = Cli::try_parse_from(argv).unwrap();

    // THEN
    assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/studio")));
    assert_eq!(cli.terminal_level(), LevelFilter::Debug);
    assert!(matches!(
        cli.command,
        Command::History {
            action: HistoryAction::Clear { yes: true }
        }
    ));
}

#[test]
fn given_unknown_kind_when_parsed_then_rejected() {
    let result = Cli::try_parse_from(["channel-studio", "generate", "podcast", "--prompt", "x"]);

    assert!(result.is_err());
}
