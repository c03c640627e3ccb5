use std::io::BufRead;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;

use gitflix_codec::decode_frame;
use gitflix_frame::FrameRecord;
use gitflix_pipeline::{
    encode_source, play, play_ids, FrameSource, HeadlessPresenter, PatternSource, PlayerConfig,
    RgbSequenceSource,
};
use gitflix_repo::{RepoConfig, VideoRepo};
use gitflix_types::{FrameGeometry, ObjectId, RawFrame};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Encode(args) => cmd_encode(args),
        Command::Play(args) => cmd_play(args),
        Command::Log(args) => cmd_log(args),
        Command::Verify(args) => cmd_verify(args),
    }
}

fn geometry(args: &GeometryArgs) -> anyhow::Result<FrameGeometry> {
    Ok(FrameGeometry::new(args.width, args.height, 3)?)
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let geometry = geometry(&args.geometry)?;
    let mut source: Box<dyn FrameSource> = match (&args.input, args.pattern) {
        (Some(dir), None) => Box::new(RgbSequenceSource::new(dir, geometry)),
        (None, Some(frames)) => Box::new(PatternSource::new(geometry, frames)),
        (None, None) => bail!("pass --input <dir> or --pattern <frames>"),
        (Some(_), Some(_)) => bail!("--input and --pattern are mutually exclusive"),
    };

    let repo = VideoRepo::init(&args.repo, RepoConfig::default())
        .with_context(|| format!("initializing repository at {}", args.repo.display()))?;
    let stats = encode_source(&repo, source.as_mut(), geometry)?;
    repo.close();

    let mib = |bytes: u64| bytes as f64 / (1024.0 * 1024.0);
    println!(
        "{} Encoded {} frames ({} raw, {} delta) at {}",
        "✓".green().bold(),
        stats.frames.to_string().bold(),
        stats.raw_frames,
        stats.delta_frames,
        geometry.to_string().cyan(),
    );
    println!(
        "  Stored {:.2} MiB from {:.2} MiB ({:.1}x)",
        mib(stats.stored_bytes),
        mib(stats.input_bytes),
        stats.compression_ratio(),
    );
    println!("  Play it with: gitflix play {}", args.repo.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let geometry = geometry(&args.geometry)?;
    let repo = Arc::new(
        VideoRepo::open(&args.repo, RepoConfig::default())
            .with_context(|| format!("opening repository at {}", args.repo.display()))?,
    );

    let config = PlayerConfig {
        target_fps: args.fps,
        // Streamed ids run flat-out, like piping hashes did originally.
        paced: !(args.flat_out || args.stdin_ids),
        ..PlayerConfig::default()
    };
    let mut presenter = HeadlessPresenter::default();

    let stats = if args.stdin_ids {
        let ids = read_ids_from_stdin()?;
        if ids.is_empty() {
            bail!("no commit ids on stdin");
        }
        play_ids(&repo, &mut presenter, geometry, config, ids)?
    } else {
        play(&repo, &mut presenter, geometry, config)?
    };

    println!(
        "{} Played {} frames in {:.2}s ({:.1} fps)",
        "✓".green().bold(),
        stats.frames_presented.to_string().bold(),
        stats.elapsed.as_secs_f64(),
        stats.mean_fps(),
    );
    Ok(())
}

fn read_ids_from_stdin() -> anyhow::Result<Vec<ObjectId>> {
    let mut ids = Vec::new();
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        ids.push(ObjectId::from_hex(trimmed).with_context(|| format!("bad commit id {trimmed}"))?);
    }
    Ok(ids)
}

fn cmd_log(args: LogArgs) -> anyhow::Result<()> {
    let geometry = geometry(&args.geometry)?;
    let repo = VideoRepo::open(&args.repo, RepoConfig::default())?;
    let chain = repo.walk_chain()?;

    for id in &chain {
        let bytes = repo.get_blob(id)?;
        let record = FrameRecord::deserialize(&bytes, geometry)?;
        println!(
            "{}  frame {:>6}  {:>5}  {:>9} bytes",
            id.short_hex().yellow(),
            record.frame_number,
            record.kind.to_string().cyan(),
            record.payload.len(),
        );
    }
    println!("{} frames on the chain", chain.len().to_string().bold());
    Ok(())
}

fn cmd_verify(args: VerifyArgs) -> anyhow::Result<()> {
    let geometry = geometry(&args.geometry)?;
    let repo = VideoRepo::open(&args.repo, RepoConfig::default())?;
    let chain = repo.walk_chain()?;

    let mut previous: Option<RawFrame> = None;
    for (index, id) in chain.iter().enumerate() {
        let bytes = repo.get_blob(id)?;
        let record = FrameRecord::deserialize(&bytes, geometry)
            .with_context(|| format!("frame {index} ({})", id.short_hex()))?;
        if record.frame_number != index as u32 {
            bail!(
                "{} chain break: commit {} holds frame {} at position {}",
                "✗".red().bold(),
                id.short_hex(),
                record.frame_number,
                index,
            );
        }
        let frame = decode_frame(&record, previous.as_ref())
            .with_context(|| format!("frame {index} ({})", id.short_hex()))?;
        previous = Some(frame);
    }

    println!(
        "{} {} frames verified, chain decodes drift-free",
        "✓".green().bold(),
        chain.len().to_string().bold(),
    );
    Ok(())
}
