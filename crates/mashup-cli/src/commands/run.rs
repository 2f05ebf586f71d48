use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;
use tokio::sync::mpsc;

use crate::args::{MashupArgs, EXAMPLE, USAGE};
use mashup_core::{
    codec::{AudioCodec, Ffmpeg},
    config::Config,
    fetcher::{MediaSource, YtDlp},
    pipeline::{MashupRequest, Pipeline, PipelineStage},
    validate::validate_cli,
    workspace::Workspace,
};
use tracing::{error, info};

pub async fn run(args: &MashupArgs, config_path: Option<&Path>) -> Result<ExitCode> {
    let Some((singer, count, duration, output)) = args.complete() else {
        println!("{}", USAGE);
        println!("{}", EXAMPLE);
        return Ok(ExitCode::FAILURE);
    };

    // Reject bad input before touching config, tools or the network
    let cli_request = match validate_cli(singer, count, duration, output) {
        Ok(request) => request,
        Err(e) => {
            for reason in &e.reasons {
                println!("Error: {}", reason);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let config = Config::load(config_path)?;
    let source = YtDlp::from_config(&config)?;
    let codec = Ffmpeg::from_config(&config)?;
    let workspace = Workspace::new(config.download_dir(), config.audio_dir());

    let request = MashupRequest {
        params: cli_request.params,
        output: cli_request.output,
    };

    run_with(
        &source,
        &codec,
        &config.fetch.search_suffix,
        &request,
        &workspace,
    )
    .await
}

/// Run a validated request against the given tools and report the result.
pub async fn run_with(
    source: &dyn MediaSource,
    codec: &dyn AudioCodec,
    search_suffix: &str,
    request: &MashupRequest,
    workspace: &Workspace,
) -> Result<ExitCode> {
    info!(
        "Mashup of '{}' into {}",
        request.params.artist,
        request.output.display()
    );

    // Create progress channel
    let (tx, mut rx) = mpsc::channel(32);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {msg}",
        )?
        .progress_chars("=>-"),
    );

    let progress_handle = tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            match stage {
                PipelineStage::Fetching { query } => {
                    pb.set_position(5);
                    pb.set_message(format!("Downloading: {}", truncate(&query, 40)));
                }
                PipelineStage::Fetched { files } => {
                    pb.set_position(40);
                    pb.set_message(format!("Downloaded {} files", files));
                }
                PipelineStage::Transcoding { files } => {
                    pb.set_message(format!("Converting {} files to mp3...", files));
                }
                PipelineStage::Transcoded { kept, skipped } => {
                    pb.set_position(65);
                    pb.set_message(format!("Converted {} ({} skipped)", kept, skipped));
                }
                PipelineStage::Trimming { files, clip_secs } => {
                    pb.set_message(format!("Cutting {}s from {} files...", clip_secs, files));
                }
                PipelineStage::Trimmed { kept, skipped } => {
                    pb.set_position(85);
                    pb.set_message(format!("Cut {} segments ({} skipped)", kept, skipped));
                }
                PipelineStage::Merging { segments } => {
                    pb.set_message(format!("Merging {} segments...", segments));
                }
                PipelineStage::Complete {
                    output,
                    audio,
                    elapsed,
                } => {
                    pb.set_position(100);
                    pb.finish_with_message(format!(
                        "Done: {} ({:.1}s of audio in {:.1}s)",
                        output.display(),
                        audio.as_secs_f32(),
                        elapsed.as_secs_f32()
                    ));
                }
                PipelineStage::Failed { stage, error } => {
                    pb.abandon_with_message(format!("Failed at {}: {}", stage, error));
                }
            }
        }
    });

    let pipeline = Pipeline::new(source, codec, search_suffix, tx);
    let result = pipeline.run(request, workspace).await;
    drop(pipeline);

    // Wait for progress handler
    progress_handle.await?;

    match result {
        Ok(report) => {
            println!("\nMashup saved to: {}", report.merge.output.display());
            if !report.skipped.is_empty() {
                println!("Skipped {} item(s):", report.skipped.len());
                for failure in &report.skipped {
                    println!("  {}: {}", failure.path.display(), failure.reason);
                }
            }
            println!("Mashup created successfully!");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Mashup failed: {}", e);
            println!("\nError: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
