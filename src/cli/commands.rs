//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::media::MediaSource;
use crate::pipeline::TranscriptionPipeline;
use crate::transcript::render_text;

/// Transcribe a single media file end to end
pub async fn transcribe(
    settings: &Settings,
    input: &PathBuf,
    output: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    if !matches!(format, "txt" | "json") {
        anyhow::bail!("Unsupported format: {}. Supported: txt, json", format);
    }

    // Validation happens before any collaborator is constructed
    let source = MediaSource::from_path(input)?;

    let pipeline = TranscriptionPipeline::from_settings(settings)?;
    let result = pipeline.run(&source).await;

    if !result.success {
        anyhow::bail!("{}", result.message);
    }

    let content = match format {
        "txt" => render_text(&result.segments),
        "json" => serde_json::to_string_pretty(&result)?,
        _ => unreachable!(),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &content)
                .with_context(|| format!("Failed to write transcript to {}", path.display()))?;
            println!(
                "Transcript saved to {} ({} segments, {:.1}s)",
                path.display(),
                result.total_segments,
                result.processing_time
            );
        }
        None => {
            println!("{}", content);
        }
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    checks: Vec<DoctorCheck>,
    notes: Vec<String>,
}

/// Run diagnostic checks to help troubleshoot local setup issues.
pub async fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("callscribe doctor");
    println!();

    for check in &report.checks {
        println!("{:<14} {:<8} {}", check.name, check.status, check.detail);
    }

    if !report.notes.is_empty() {
        println!();
        for note in &report.notes {
            println!("{}", note);
        }
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> DoctorReport {
    let ffmpeg = if settings.general.ffmpeg_path.trim().is_empty() {
        "ffmpeg"
    } else {
        settings.general.ffmpeg_path.trim()
    };
    let ffmpeg_ok = command_exists(ffmpeg);
    let model_path = settings.model_path();
    let model_ok = model_path.exists();
    let diarization_key = !settings.diarization.api_key.trim().is_empty();
    let classifier_key = !settings.classifier.api_key.trim().is_empty();

    let mut notes = Vec::new();
    if !ffmpeg_ok {
        notes.push(
            "warning: ffmpeg not found; video inputs cannot be processed (audio files still work)."
                .to_string(),
        );
    }
    if !model_ok {
        notes.push(format!(
            "warning: whisper model missing at {}; download it before transcribing.",
            model_path.display()
        ));
    }
    if !diarization_key {
        notes.push(
            "info: no AssemblyAI key (ASSEMBLYAI_API_KEY); speaker labels fall back to alternating Speaker 1/2."
                .to_string(),
        );
    }

    DoctorReport {
        checks: vec![
            DoctorCheck {
                name: "ffmpeg",
                status: if ffmpeg_ok { "ok" } else { "missing" },
                detail: "required for audio extraction from video".to_string(),
            },
            DoctorCheck {
                name: "whisper model",
                status: if model_ok { "ok" } else { "missing" },
                detail: model_path.display().to_string(),
            },
            DoctorCheck {
                name: "diarization",
                status: if diarization_key { "ok" } else { "unset" },
                detail: "AssemblyAI API key".to_string(),
            },
            DoctorCheck {
                name: "classifier",
                status: if classifier_key { "ok" } else { "unset" },
                detail: "Hugging Face API token".to_string(),
            },
        ],
        notes,
    }
}

// Helper functions

fn command_exists(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
