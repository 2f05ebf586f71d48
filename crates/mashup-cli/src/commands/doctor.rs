use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use which::which;

use mashup_core::config::Config;
use mashup_core::notifier::NOT_CONFIGURED;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("mashup dependency check\n");

    let mut all_ok = true;

    // Check yt-dlp
    print!("yt-dlp:  ");
    match resolve(config.paths.yt_dlp.as_deref(), "yt-dlp") {
        Some(path) => match first_line(&path, "--version") {
            Some(v) => println!("OK ({})", v),
            None => {
                println!("FOUND but failed to get version");
                all_ok = false;
            }
        },
        None => {
            println!("NOT FOUND");
            println!("         Install with: pip install yt-dlp");
            all_ok = false;
        }
    }

    // Check FFmpeg
    print!("ffmpeg:  ");
    match resolve(config.paths.ffmpeg.as_deref(), "ffmpeg") {
        Some(path) => match first_line(&path, "-version") {
            Some(line) => {
                // "ffmpeg version 6.1.1 Copyright ..." -> "6.1.1"
                let version = line.split_whitespace().nth(2).unwrap_or("unknown");
                println!("OK ({})", version);
            }
            None => {
                println!("FOUND but failed to get version");
                all_ok = false;
            }
        },
        None => {
            println!("NOT FOUND");
            println!("         Install with: apt install ffmpeg");
            all_ok = false;
        }
    }

    // SMTP is optional: the web front end still works without it
    print!("smtp:    ");
    if config.smtp.credentials().is_some() {
        println!("configured ({}:{})", config.smtp.server, config.smtp.port);
    } else {
        println!("{}", NOT_CONFIGURED);
        println!("         Set SENDER_EMAIL and SENDER_PASSWORD to enable email delivery");
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}

fn resolve(configured: Option<&Path>, name: &str) -> Option<PathBuf> {
    match configured {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => which(name).ok(),
    }
}

fn first_line(binary: &Path, flag: &str) -> Option<String> {
    let out = Command::new(binary).arg(flag).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .next()
        .map(|l| l.trim().to_string())
}
