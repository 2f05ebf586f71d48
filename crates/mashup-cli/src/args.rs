use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const USAGE: &str =
    "Usage: mashup <SingerName> <NumberOfVideos> <AudioDuration> <OutputFileName>";
pub const EXAMPLE: &str = "Example: mashup \"Sharry Maan\" 20 20 102303975-output.mp3";

#[derive(Parser)]
#[command(name = "mashup")]
#[command(author, version, about = "Build an audio mashup from an artist's top videos")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true, allow_negative_numbers = true)]
#[command(after_help = "An artist whose name is also a subcommand goes after `--`:\n  mashup -- doctor 10 20 out.mp3")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub mashup: MashupArgs,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

// Positional arguments are kept as text; the validator owns their rules.
#[derive(clap::Args, Clone, Debug)]
pub struct MashupArgs {
    /// Artist to search for
    #[arg(value_name = "SingerName")]
    pub singer_name: Option<String>,

    /// How many videos to download (at least 10)
    #[arg(value_name = "NumberOfVideos")]
    pub num_videos: Option<String>,

    /// Seconds to keep from the start of each video (at least 20)
    #[arg(value_name = "AudioDuration")]
    pub audio_duration: Option<String>,

    /// Output file, must end with .mp3
    #[arg(value_name = "OutputFileName")]
    pub output_file: Option<String>,
}

impl MashupArgs {
    /// All four positionals, or `None` if any is missing.
    pub fn complete(&self) -> Option<(&str, &str, &str, &str)> {
        Some((
            self.singer_name.as_deref()?,
            self.num_videos.as_deref()?,
            self.audio_duration.as_deref()?,
            self.output_file.as_deref()?,
        ))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that yt-dlp, ffmpeg and SMTP settings are usable
    Doctor,

    /// Show configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positionals_stay_raw() {
        let cli = Cli::try_parse_from(["mashup", "Test Artist", "ten", "-5", "test.mp3"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(
            cli.mashup.complete(),
            Some(("Test Artist", "ten", "-5", "test.mp3"))
        );
    }

    #[test]
    fn test_missing_positionals() {
        let cli = Cli::try_parse_from(["mashup", "Test Artist", "10"]).unwrap();
        assert!(cli.mashup.complete().is_none());
    }

    #[test]
    fn test_subcommand_named_artist_after_escape() {
        let cli = Cli::try_parse_from(["mashup", "--", "doctor", "10", "20", "a.mp3"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.mashup.complete(), Some(("doctor", "10", "20", "a.mp3")));
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["mashup", "doctor"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Doctor)));

        let cli = Cli::try_parse_from(["mashup", "-vv", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
        assert_eq!(cli.verbose, 2);
    }
}
