use clap::{Parser, Subcommand};

use self::play::PlayArg;

mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play the game in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_args_are_consistent() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_play_is_the_default_mode() {
        let args = CommandArgs::try_parse_from(["blockfall"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_parse_play_arguments() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "play",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
            "--fps",
            "30",
            "--save-result",
            "result.json",
        ])
        .unwrap();
        let Some(Mode::Play(arg)) = args.mode else {
            panic!("expected play mode");
        };
        assert_eq!(
            arg.seed.map(|seed| seed.to_string()).as_deref(),
            Some("000102030405060708090a0b0c0d0e0f")
        );
        assert_eq!(arg.fps, 30);
        assert_eq!(arg.save_result.as_deref(), Some(Path::new("result.json")));
        assert_eq!(arg.log_level, "info");
        assert!(arg.log_file.is_none());
    }

    #[test]
    fn test_reject_malformed_seed() {
        let result = CommandArgs::try_parse_from(["blockfall", "play", "--seed", "xyz"]);
        assert!(result.is_err());
    }
}
