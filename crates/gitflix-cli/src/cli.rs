use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gitflix",
    about = "GitFlix — raw video stored as a commit chain, one frame per commit",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Encode a frame sequence into a new repository
    Encode(EncodeArgs),
    /// Play a repository's frame chain
    Play(PlayArgs),
    /// List the frames on the chain
    Log(LogArgs),
    /// Decode the whole chain and check its integrity
    Verify(VerifyArgs),
}

/// Frame target shared by all commands. Channels are fixed at 3 (RGB).
#[derive(Args)]
pub struct GeometryArgs {
    #[arg(long, default_value_t = 1920)]
    pub width: u32,
    #[arg(long, default_value_t = 1080)]
    pub height: u32,
}

#[derive(Args)]
pub struct EncodeArgs {
    /// Repository directory to create
    pub repo: PathBuf,
    /// Directory of raw frame_NNNNNN.rgb files
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Generate this many synthetic gradient frames instead
    #[arg(long)]
    pub pattern: Option<u32>,
    #[command(flatten)]
    pub geometry: GeometryArgs,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Repository directory to play
    pub repo: PathBuf,
    /// Present as fast as frames decode instead of pacing
    #[arg(long)]
    pub flat_out: bool,
    /// Presentation rate when paced
    #[arg(long, default_value_t = 60)]
    pub fps: u32,
    /// Read hex commit ids from stdin instead of walking the chain
    /// (streamed playback is unpaced)
    #[arg(long)]
    pub stdin_ids: bool,
    #[command(flatten)]
    pub geometry: GeometryArgs,
}

#[derive(Args)]
pub struct LogArgs {
    pub repo: PathBuf,
    #[command(flatten)]
    pub geometry: GeometryArgs,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub repo: PathBuf,
    #[command(flatten)]
    pub geometry: GeometryArgs,
}
