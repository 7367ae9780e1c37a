//! Diagnostics harness.
//!
//! Runs environment/API preflight checks, then a fixed sequential
//! demonstration of every capability against one robot session. Preflight
//! failures (FAIL, not WARN) abort before any demo step runs. Demo steps
//! never block each other: every step executes and records PASS/FAIL
//! regardless of earlier outcomes. Artifacts (captured JPEGs and a markdown
//! report) land in a timestamped run directory.

use crate::motion;
use crate::robot::{HeadPose, Robot, RobotConnector};
use crate::tts::{self, ConfigOverrides, ElevenLabsConfig, TtsError, VoiceSettings};
use crate::vision::{self, FaceDetector, ScanEntry, TrackOutcome};
use anyhow::{Context, Result};
use console::Style;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const ANNOUNCE_PAUSE_ENV: &str = "REACHY_DEBUG_ANNOUNCE_PAUSE_S";
pub const TTS_SPEED_ENV: &str = "REACHY_DEBUG_TTS_SPEED";
const DEFAULT_ANNOUNCE_PAUSE_S: f64 = 0.6;
const DEFAULT_TTS_SPEED: f64 = 0.8;

const TOTAL_STEPS: usize = 13;
const RULE: &str = "-------------------------------------------------------------";

const BANNER: &str = r"
██████╗ ███████╗ █████╗  ██████╗██╗  ██╗██╗   ██╗    ███╗   ███╗██╗███╗   ██╗██╗
██╔══██╗██╔════╝██╔══██╗██╔════╝██║  ██║╚██╗ ██╔╝    ████╗ ████║██║████╗  ██║██║
██████╔╝█████╗  ███████║██║     ███████║ ╚████╔╝     ██╔████╔██║██║██╔██╗ ██║██║
██╔══██╗██╔══╝  ██╔══██║██║     ██╔══██║  ╚██╔╝      ██║╚██╔╝██║██║██║╚██╗██║██║
██║  ██║███████╗██║  ██║╚██████╗██║  ██║   ██║       ██║ ╚═╝ ██║██║██║ ╚████║██║
╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝ ╚═════╝╚═╝  ╚═╝   ╚═╝       ╚═╝     ╚═╝╚═╝╚═╝  ╚═══╝╚═╝

███╗   ███╗ ██████╗██████╗
████╗ ████║██╔════╝██╔══██╗
██╔████╔██║██║     ██████╔╝
██║╚██╔╝██║██║     ██╔═══╝
██║ ╚═╝ ██║╚██████╗██║
╚═╝     ╚═╝ ╚═════╝╚═╝
";

const REACHY_ASCII: &str = r"
                 .-.
                /___\
                [o o]
               /|_=_|\
              //|   |\\
             /_/|___|\_\
               /_/ \_\
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl CheckStatus {
    pub fn label(self) -> &'static str {
        match self {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreflightCheck {
    pub name: &'static str,
    pub status: CheckStatus,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Pass,
    Fail,
}

impl StepStatus {
    pub fn label(self) -> &'static str {
        match self {
            StepStatus::Pass => "PASS",
            StepStatus::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepResult {
    pub name: &'static str,
    pub status: StepStatus,
    pub details: String,
    pub started_at: String,
    pub finished_at: String,
}

/// Proceed only when no FAIL-severity check exists; WARN is non-blocking.
pub fn preflight_passed(checks: &[PreflightCheck]) -> bool {
    !checks.iter().any(|c| c.status == CheckStatus::Fail)
}

#[derive(Debug, Clone)]
pub struct DebugOptions {
    pub announce_pause: Duration,
    pub tts_speed: f64,
}

impl DebugOptions {
    pub fn from_env() -> Self {
        let float_env = |name: &str, default: f64| {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(default)
        };
        Self {
            announce_pause: Duration::from_secs_f64(
                float_env(ANNOUNCE_PAUSE_ENV, DEFAULT_ANNOUNCE_PAUSE_S).max(0.0),
            ),
            tts_speed: float_env(TTS_SPEED_ENV, DEFAULT_TTS_SPEED),
        }
    }
}

fn use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) => !term.is_empty() && term.to_lowercase() != "dumb",
        Err(_) => false,
    }
}

fn paint(text: &str, style: Style) -> String {
    if use_color() {
        style.apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

fn badge(label: &str) -> String {
    let style = match label {
        "OK" | "PASS" => Style::new().green().bold(),
        "WARN" => Style::new().yellow().bold(),
        "FAIL" | "FATAL" => Style::new().red().bold(),
        _ => Style::new().blue().bold(),
    };
    paint(label, style)
}

fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// One directory per run, named by timestamp.
pub fn create_run_dir(results_root: &Path) -> Result<PathBuf> {
    let run_id = chrono::Utc::now().format("run-%Y%m%d-%H%M%S").to_string();
    let run_dir = results_root.join(run_id);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("creating run directory {}", run_dir.display()))?;
    Ok(run_dir)
}

fn print_banner(run_dir: &Path) {
    println!("{}", BANNER.trim_matches('\n'));
    println!("{}", paint("Debug Run", Style::new().magenta().bold()));
    println!("{}", REACHY_ASCII.trim_matches('\n'));
    println!("{} full sequential demo", paint("Mode:", Style::new().dim()));
    println!("Results folder: {}", run_dir.display());
    println!("{RULE}");
}

// ── Announcements ───────────────────────────────────────────────

/// Run-scoped announcement state. TTS gets disabled for the remainder of
/// one run after a permission-type failure; the flag lives here, never in
/// process-wide state.
pub struct Announcer {
    config: Option<ElevenLabsConfig>,
    disabled: bool,
    speed: f64,
}

impl Announcer {
    pub fn new(config: Option<ElevenLabsConfig>, speed: f64) -> Self {
        Self {
            config,
            disabled: false,
            speed,
        }
    }

    /// Best-effort spoken announcement. Always prints; speaks only while
    /// TTS is configured and not yet disabled for this run.
    pub async fn announce(&mut self, robot: &dyn Robot, message: &str) {
        println!(
            "{} {message}",
            paint("[ANNOUNCE]", Style::new().cyan().bold())
        );
        if self.disabled {
            return;
        }
        let Some(config) = self.config.clone() else {
            return;
        };

        let settings = VoiceSettings {
            use_speaker_boost: Some(true),
            speed: Some(self.speed),
            ..VoiceSettings::default()
        };
        if let Err(e) = speak_once(robot, message, &config, &settings).await {
            match e.downcast_ref::<TtsError>() {
                Some(TtsError::Api { status, .. }) if status.as_u16() == 403 => {
                    println!(
                        "{} ElevenLabs returned 403 Forbidden. Check API key permissions/plan or output format.",
                        paint("[TTS][ERROR]", Style::new().red().bold())
                    );
                }
                _ => {
                    println!(
                        "{} Announcement failed: {e:#}",
                        paint("[TTS][ERROR]", Style::new().red().bold())
                    );
                }
            }
            println!(
                "{} Disabling TTS for the rest of this run.",
                paint("[TTS][INFO]", Style::new().blue())
            );
            self.disabled = true;
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Synthesize and play one utterance; the temp file is removed on every
/// exit path.
async fn speak_once(
    robot: &dyn Robot,
    text: &str,
    config: &ElevenLabsConfig,
    settings: &VoiceSettings,
) -> Result<()> {
    let path = tts::synthesize_to_temp_file(text, config, Some(settings)).await?;
    let played = robot.play_sound(&path.to_string_lossy());
    let _ = tts::remove_temp_audio(&path);
    played
}

/// Spoken "Debug Run." intro, played once after a successful TTS probe.
async fn shout_debug_run(robot: &dyn Robot, config: &ElevenLabsConfig, speed: f64) {
    let settings = VoiceSettings {
        use_speaker_boost: Some(true),
        style: Some(0.6),
        stability: Some(0.4),
        speed: Some(speed),
        ..VoiceSettings::default()
    };
    if let Err(e) = speak_once(robot, "Debug Run.", config, &settings).await {
        println!(
            "{} Intro speech failed: {e:#}",
            paint("[TTS][WARN]", Style::new().yellow().bold())
        );
    }
}

// ── Preflight checks ────────────────────────────────────────────

pub fn check_results_dir(run_dir: &Path) -> PreflightCheck {
    let probe = run_dir.join(".precheck_write_probe");
    let outcome = std::fs::create_dir_all(run_dir)
        .and_then(|()| std::fs::write(&probe, "ok"))
        .and_then(|()| std::fs::remove_file(&probe));
    match outcome {
        Ok(()) => PreflightCheck {
            name: "results_directory_write_access",
            status: CheckStatus::Ok,
            details: format!("Writable: {}", run_dir.display()),
        },
        Err(e) => PreflightCheck {
            name: "results_directory_write_access",
            status: CheckStatus::Fail,
            details: e.to_string(),
        },
    }
}

pub fn check_api_key_with(lookup: impl Fn(&str) -> Option<String>) -> PreflightCheck {
    let api_key = lookup("REACHY_ELEVENLABS_API_KEY").or_else(|| lookup("ELEVENLABS_API_KEY"));
    match api_key {
        Some(key) => {
            let tail: String = key.chars().rev().take(4).collect::<Vec<_>>().iter().rev().collect();
            PreflightCheck {
                name: "elevenlabs_api_key",
                status: CheckStatus::Ok,
                details: format!("Set (...{tail})"),
            }
        }
        None => PreflightCheck {
            name: "elevenlabs_api_key",
            status: CheckStatus::Warn,
            details: "Missing (TTS announcements disabled)".to_string(),
        },
    }
}

pub fn check_voice_id_with(lookup: impl Fn(&str) -> Option<String>) -> PreflightCheck {
    let voice_id = lookup("REACHY_ELEVENLABS_VOICE_ID").or_else(|| lookup("ELEVENLABS_VOICE_ID"));
    PreflightCheck {
        name: "elevenlabs_voice_id",
        status: CheckStatus::Ok,
        details: match voice_id {
            Some(id) => format!("Set ({id})"),
            None => format!(
                "Not set in env, using default ({})",
                tts::DEFAULT_VOICE_ID
            ),
        },
    }
}

pub fn check_configuration(config: &Result<ElevenLabsConfig, TtsError>) -> PreflightCheck {
    match config {
        Ok(cfg) => PreflightCheck {
            name: "elevenlabs_configuration",
            status: CheckStatus::Ok,
            details: format!(
                "Loaded (voice_id={}, model={}, output={})",
                cfg.voice_id, cfg.model_id, cfg.output_format
            ),
        },
        Err(e) => PreflightCheck {
            name: "elevenlabs_configuration",
            status: CheckStatus::Warn,
            details: format!("Invalid config ({e})"),
        },
    }
}

pub async fn check_dns() -> PreflightCheck {
    match tokio::net::lookup_host("api.elevenlabs.io:443").await {
        Ok(addrs) => {
            if addrs.count() > 0 {
                PreflightCheck {
                    name: "elevenlabs_dns_resolution",
                    status: CheckStatus::Ok,
                    details: "api.elevenlabs.io resolves".to_string(),
                }
            } else {
                PreflightCheck {
                    name: "elevenlabs_dns_resolution",
                    status: CheckStatus::Warn,
                    details: "Host resolved to no addresses".to_string(),
                }
            }
        }
        Err(e) => PreflightCheck {
            name: "elevenlabs_dns_resolution",
            status: CheckStatus::Warn,
            details: format!("Could not resolve host ({e})"),
        },
    }
}

/// GET the configured voice's metadata to verify the key can reach it.
pub async fn check_voice_access(config: &ElevenLabsConfig) -> PreflightCheck {
    let url = format!("{}/voices/{}", config.base_url, config.voice_id);
    let response = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .context("building HTTP client");
    let response = match response {
        Ok(client) => {
            client
                .get(&url)
                .header("xi-api-key", &config.api_key)
                .send()
                .await
        }
        Err(e) => {
            return PreflightCheck {
                name: "elevenlabs_voice_access",
                status: CheckStatus::Warn,
                details: format!("{e:#}"),
            }
        }
    };
    match response {
        Ok(resp) if resp.status().is_success() => {
            let name = resp
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("name").and_then(|n| n.as_str()).map(String::from))
                .unwrap_or_else(|| "unknown".to_string());
            PreflightCheck {
                name: "elevenlabs_voice_access",
                status: CheckStatus::Ok,
                details: format!("voice={name}"),
            }
        }
        Ok(resp) => {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            PreflightCheck {
                name: "elevenlabs_voice_access",
                status: CheckStatus::Warn,
                details: format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()),
            }
        }
        Err(e) => PreflightCheck {
            name: "elevenlabs_voice_access",
            status: CheckStatus::Warn,
            details: format!("Request failed ({e})"),
        },
    }
}

/// Live synthesis probe: one short request through the real TTS path.
pub async fn check_tts_probe(config: &ElevenLabsConfig) -> PreflightCheck {
    match tts::synthesize("Debug run.", config, None).await {
        Ok(audio) => PreflightCheck {
            name: "elevenlabs_tts_probe",
            status: CheckStatus::Ok,
            details: format!("ok (bytes={})", audio.len()),
        },
        Err(e) => PreflightCheck {
            name: "elevenlabs_tts_probe",
            status: CheckStatus::Warn,
            details: e.to_string(),
        },
    }
}

/// Detection on a tiny blank frame verifies the model loads end to end.
pub fn check_detector(detector: &dyn FaceDetector) -> PreflightCheck {
    match detector.detect(&[0u8; 32 * 32], 32, 32) {
        Ok(_) => PreflightCheck {
            name: "face_detector_model",
            status: CheckStatus::Ok,
            details: "Face detector model loaded".to_string(),
        },
        Err(e) => PreflightCheck {
            name: "face_detector_model",
            status: CheckStatus::Fail,
            details: e.to_string(),
        },
    }
}

pub fn check_camera(robot: &dyn Robot) -> PreflightCheck {
    match robot.get_frame() {
        Ok(Some(frame)) => PreflightCheck {
            name: "reachy_camera_frame",
            status: CheckStatus::Ok,
            details: format!("Frame received ({}x{})", frame.width, frame.height),
        },
        Ok(None) => PreflightCheck {
            name: "reachy_camera_frame",
            status: CheckStatus::Fail,
            details: "No frame returned from camera".to_string(),
        },
        Err(e) => PreflightCheck {
            name: "reachy_camera_frame",
            status: CheckStatus::Fail,
            details: format!("{e:#}"),
        },
    }
}

pub fn check_doa(robot: &dyn Robot) -> PreflightCheck {
    match robot.get_sound_direction() {
        Ok(Some((angle, speech))) => PreflightCheck {
            name: "reachy_audio_doa",
            status: CheckStatus::Ok,
            details: format!("angle={angle:.2} rad, speech={speech}"),
        },
        Ok(None) => PreflightCheck {
            name: "reachy_audio_doa",
            status: CheckStatus::Warn,
            details: "Not available on this audio hardware/backend".to_string(),
        },
        Err(e) => PreflightCheck {
            name: "reachy_audio_doa",
            status: CheckStatus::Fail,
            details: format!("{e:#}"),
        },
    }
}

async fn run_preflight(
    robot: &dyn Robot,
    detector: &dyn FaceDetector,
    run_dir: &Path,
) -> (Vec<PreflightCheck>, Option<ElevenLabsConfig>) {
    let env = |name: &str| std::env::var(name).ok();
    let mut checks = vec![
        check_results_dir(run_dir),
        check_api_key_with(env),
        check_voice_id_with(env),
    ];

    let has_key = env("REACHY_ELEVENLABS_API_KEY")
        .or_else(|| env("ELEVENLABS_API_KEY"))
        .is_some();
    let config = tts::load_config(&ConfigOverrides::default());
    if has_key {
        checks.push(check_configuration(&config));
    }

    checks.push(check_dns().await);

    let resolved = config.ok();
    if let Some(cfg) = &resolved {
        checks.push(check_voice_access(cfg).await);
        checks.push(check_tts_probe(cfg).await);
    }

    checks.push(check_detector(detector));
    checks.push(check_camera(robot));
    checks.push(check_doa(robot));
    checks.push(PreflightCheck {
        name: "reachy_audio_playback",
        status: CheckStatus::Ok,
        details: "play_sound available".to_string(),
    });

    (checks, resolved)
}

fn print_preflight_report(checks: &[PreflightCheck]) -> bool {
    println!(
        "{} Configuration and readiness checks",
        paint("[PRECHECK]", Style::new().magenta().bold())
    );
    println!("{RULE}");
    for check in checks {
        println!(
            "[{:<4}] {}: {}",
            badge(check.status.label()),
            check.name,
            check.details
        );
    }
    println!("{RULE}");

    let fails = checks.iter().filter(|c| c.status == CheckStatus::Fail).count();
    let warns = checks.iter().filter(|c| c.status == CheckStatus::Warn).count();
    let summary = format!("{} checks, {warns} warning(s), {fails} failure(s)", checks.len());
    let summary_style = if fails == 0 {
        Style::new().green().bold()
    } else {
        Style::new().red().bold()
    };
    println!(
        "{} {}",
        paint("[PRECHECK] Summary:", Style::new().magenta().bold()),
        paint(&summary, summary_style)
    );
    println!("{RULE}");
    preflight_passed(checks)
}

// ── Demonstration steps ─────────────────────────────────────────

fn step_move_antennas(robot: &dyn Robot) -> Result<String> {
    motion::move_antennas(robot, 0.8, -0.8, 0.4)?;
    motion::move_antennas(robot, -0.8, 0.8, 0.4)?;
    motion::move_antennas(robot, 0.0, 0.0, 0.4)?;
    Ok("Antenna sequence executed".to_string())
}

fn step_detect_sound_direction(robot: &dyn Robot) -> Result<String> {
    match robot.get_sound_direction()? {
        Some((angle, speech)) => Ok(format!("Detected angle={angle:.2} rad, speech={speech}")),
        None => Ok("Sound direction (DoA) not available on this audio hardware/backend".to_string()),
    }
}

fn step_capture_image(robot: &dyn Robot, run_dir: &Path) -> Result<String> {
    let frame = vision::capture_best_frame(robot, 2, 4)?
        .ok_or_else(|| anyhow::anyhow!("Camera not available"))?;
    let jpeg = frame.to_jpeg(95)?;
    let path = run_dir.join("capture_image.jpg");
    std::fs::write(&path, jpeg)
        .with_context(|| format!("saving image to {}", path.display()))?;
    Ok("Saved image: capture_image.jpg".to_string())
}

fn step_scan_surroundings(robot: &dyn Robot, run_dir: &Path) -> Result<String> {
    let entries = vision::scan_surroundings(robot, 5, 120.0, 95)?;
    let mut saved = Vec::new();
    let mut index = 0usize;
    for entry in &entries {
        if let ScanEntry::Capture { label, jpeg } = entry {
            index += 1;
            let angle = label.trim_start_matches("yaw ").replace('°', "");
            let name = format!("scan_{index:02}_yaw_{angle}.jpg");
            let path = run_dir.join(&name);
            std::fs::write(&path, jpeg)
                .with_context(|| format!("saving image to {}", path.display()))?;
            saved.push(name);
        }
    }
    if saved.is_empty() {
        anyhow::bail!("No scan frames captured");
    }
    Ok(format!(
        "Saved {} panoramic images: {}",
        saved.len(),
        saved.join(", ")
    ))
}

fn step_track_face(robot: &dyn Robot, detector: &dyn FaceDetector) -> Result<String> {
    match vision::track_face(robot, detector, 0.5)? {
        TrackOutcome::Moved { yaw, pitch } => Ok(format!(
            "Face tracked: moved to yaw={yaw:+.1}°, pitch={pitch:+.1}°"
        )),
        TrackOutcome::NoFace => Ok("No face detected (step completed without movement)".to_string()),
        TrackOutcome::CameraUnavailable => anyhow::bail!("Camera not available"),
    }
}

/// Execute all 13 demonstration steps in order, recording every outcome.
pub async fn run_demo_steps(
    robot: &dyn Robot,
    detector: &dyn FaceDetector,
    run_dir: &Path,
    announcer: &mut Announcer,
    announce_pause: Duration,
) -> Vec<StepResult> {
    let mut results: Vec<StepResult> = Vec::with_capacity(TOTAL_STEPS);

    // The announce/sleep pair runs before each step; failures inside
    // announce only mute later announcements, never the step itself.
    macro_rules! step {
        ($name:literal, $announce:literal, $body:expr) => {{
            let no = results.len() + 1;
            println!(
                "{} step {no:02}/{TOTAL_STEPS:02}",
                paint("[STEP]", Style::new().magenta().bold())
            );
            debug!(step = no, name = $name, "running demo step");
            announcer.announce(robot, $announce).await;
            tokio::time::sleep(announce_pause).await;

            let started = utc_now_iso();
            let (status, details) = match $body {
                Ok(details) => (StepStatus::Pass, details),
                Err(e) => (StepStatus::Fail, format!("{e:#}")),
            };
            let finished = utc_now_iso();
            println!("[{}] {}: {details}", badge(status.label()), $name);
            println!("{RULE}");
            results.push(StepResult {
                name: $name,
                status,
                details,
                started_at: started,
                finished_at: finished,
            });
        }};
    }

    step!("wake_up", "Now testing robot wake-up behavior.", {
        robot.wake_up().map(|()| "Wake-up animation executed".to_string())
    });
    step!("move_head", "Now testing 6-DoF head movement.", {
        motion::move_head(
            robot,
            HeadPose {
                x: 10.0,
                z: 15.0,
                roll: 8.0,
                pitch: -10.0,
                yaw: 20.0,
                ..HeadPose::default()
            },
            1.0,
        )
        .map(|()| "Head pose executed".to_string())
    });
    step!("move_antennas", "Now testing antenna movement.", {
        step_move_antennas(robot)
    });
    step!(
        "look_at_point",
        "Now testing look-at-point behavior in 3D space.",
        motion::look_at(robot, 0.5, 0.0, 0.1, 1.0).map(|()| "Look-at executed".to_string())
    );
    step!("gesture_nod", "Now testing nod gesture.", {
        motion::nod(robot, 1, 0.3).map(|_| "Nod gesture executed".to_string())
    });
    step!("gesture_shake_head", "Now testing shake-head gesture.", {
        motion::shake_head(robot, 1, 0.3).map(|_| "Shake-head gesture executed".to_string())
    });
    step!("play_sound", "Now testing onboard audio playback.", {
        robot
            .play_sound("happy1")
            .map(|()| "Sound played: happy1".to_string())
    });
    step!(
        "detect_sound_direction",
        "Now testing sound direction detection.",
        step_detect_sound_direction(robot)
    );
    step!("capture_image", "Now testing single camera capture.", {
        step_capture_image(robot, run_dir)
    });
    step!(
        "scan_surroundings",
        "Now testing panoramic surroundings scan.",
        step_scan_surroundings(robot, run_dir)
    );
    step!("track_face", "Now testing face tracking.", {
        step_track_face(robot, detector)
    });
    step!("do_barrel_roll", "Now testing barrel-roll sequence.", {
        motion::barrel_roll(robot).map(|()| "Barrel roll sequence executed".to_string())
    });
    step!("go_to_sleep", "Finally, testing sleep mode transition.", {
        robot
            .goto_sleep()
            .map(|()| "Sleep-mode animation executed".to_string())
    });

    results
}

// ── Report ──────────────────────────────────────────────────────

/// Markdown report: per-step table, captured-image list, overall verdict.
pub fn build_markdown_report(run_dir: &Path, results: &[StepResult]) -> Result<PathBuf> {
    let mut lines = vec![
        "# Reachy Debug Run Report".to_string(),
        String::new(),
        format!("- Run directory: `{}`", run_dir.display()),
        format!("- Generated at (UTC): {}", utc_now_iso()),
        String::new(),
        "## Step Status Checks".to_string(),
        String::new(),
        "| Step | Status | Started (UTC) | Finished (UTC) | Details |".to_string(),
        "|------|--------|---------------|----------------|---------|".to_string(),
    ];
    for row in results {
        let details = row.details.replace('|', "\\|");
        lines.push(format!(
            "| `{}` | **{}** | `{}` | `{}` | {details} |",
            row.name,
            row.status.label(),
            row.started_at,
            row.finished_at
        ));
    }

    let mut images: Vec<String> = std::fs::read_dir(run_dir)
        .map(|entries| {
            entries
                .filter_map(std::result::Result::ok)
                .filter_map(|e| e.file_name().into_string().ok())
                .filter(|name| name.ends_with(".jpg"))
                .collect()
        })
        .unwrap_or_default();
    images.sort();

    lines.extend([String::new(), "## Captured Images".to_string(), String::new()]);
    if images.is_empty() {
        lines.push("- No images captured.".to_string());
    } else {
        for name in images {
            lines.push(format!("- `{name}`"));
        }
    }

    let failed = results.iter().filter(|r| r.status != StepStatus::Pass).count();
    lines.extend([String::new(), "## Summary".to_string(), String::new()]);
    if failed > 0 {
        lines.push(format!("- Result: FAILED ({failed} step(s) failed)"));
    } else {
        lines.push(format!("- Result: PASS ({} step(s) passed)", results.len()));
    }

    let report_path = run_dir.join("run_report.md");
    std::fs::write(&report_path, lines.join("\n") + "\n")
        .with_context(|| format!("writing report to {}", report_path.display()))?;
    println!("[INFO] Report saved: {}", report_path.display());
    Ok(report_path)
}

// ── Entry point ─────────────────────────────────────────────────

/// Run the full diagnostics suite. Returns the process exit code: 0 only
/// when preflight passed and every demo step passed.
pub async fn run_debug_suite(
    connector: &dyn RobotConnector,
    detector: &dyn FaceDetector,
    results_root: &Path,
    options: &DebugOptions,
) -> Result<i32> {
    let run_dir = create_run_dir(results_root)?;
    let session = connector.connect()?;
    print_banner(&run_dir);
    println!(
        "{} Connected to Reachy Mini / simulator",
        paint("[INFO]", Style::new().blue())
    );

    let (checks, config) = run_preflight(&*session, detector, &run_dir).await;
    if !print_preflight_report(&checks) {
        println!(
            "{} Precheck failed. Aborting debug run before demo steps.",
            paint("[FATAL]", Style::new().red().bold())
        );
        return Ok(1);
    }

    if let Some(cfg) = &config {
        let probe_ok = checks
            .iter()
            .any(|c| c.name == "elevenlabs_tts_probe" && c.status == CheckStatus::Ok);
        if probe_ok {
            shout_debug_run(&*session, cfg, options.tts_speed).await;
        } else {
            println!(
                "{} TTS not ready; continuing without spoken intro. See PRECHECK warnings above.",
                paint("[TTS][INFO]", Style::new().blue())
            );
        }
    }

    let mut announcer = Announcer::new(config, options.tts_speed);
    let results = run_demo_steps(
        &*session,
        detector,
        &run_dir,
        &mut announcer,
        options.announce_pause,
    )
    .await;
    drop(session);

    build_markdown_report(&run_dir, &results)?;
    let all_passed = results.iter().all(|r| r.status == StepStatus::Pass);
    Ok(i32::from(!all_passed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{SimConnector, SimRobot};
    use crate::vision::detector::StubDetector;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn stub_detector() -> StubDetector {
        StubDetector { boxes: vec![] }
    }

    fn test_config(base_url: &str) -> ElevenLabsConfig {
        ElevenLabsConfig {
            api_key: "test-key".into(),
            voice_id: "voice123".into(),
            model_id: tts::DEFAULT_MODEL_ID.into(),
            output_format: tts::DEFAULT_OUTPUT_FORMAT.into(),
            base_url: base_url.to_string(),
        }
    }

    #[test]
    fn preflight_fails_only_on_fail_severity() {
        let ok = PreflightCheck {
            name: "a",
            status: CheckStatus::Ok,
            details: String::new(),
        };
        let warn = PreflightCheck {
            name: "b",
            status: CheckStatus::Warn,
            details: String::new(),
        };
        let fail = PreflightCheck {
            name: "c",
            status: CheckStatus::Fail,
            details: String::new(),
        };
        assert!(preflight_passed(&[ok.clone(), warn.clone()]));
        assert!(!preflight_passed(&[ok, warn, fail]));
        assert!(preflight_passed(&[]));
    }

    #[test]
    fn results_dir_check_passes_on_writable_dir() {
        let tmp = TempDir::new().unwrap();
        let check = check_results_dir(&tmp.path().join("run-x"));
        assert_eq!(check.status, CheckStatus::Ok);
    }

    #[test]
    fn api_key_check_reports_tail_only() {
        let check = check_api_key_with(|name| {
            (name == "ELEVENLABS_API_KEY").then(|| "sk-secret-abcd".to_string())
        });
        assert_eq!(check.status, CheckStatus::Ok);
        assert!(check.details.contains("...abcd"));
        assert!(!check.details.contains("secret"));
    }

    #[test]
    fn missing_api_key_is_a_warning_not_a_failure() {
        let check = check_api_key_with(|_| None);
        assert_eq!(check.status, CheckStatus::Warn);
    }

    #[test]
    fn voice_id_check_mentions_default_when_unset() {
        let check = check_voice_id_with(|_| None);
        assert_eq!(check.status, CheckStatus::Ok);
        assert!(check.details.contains(tts::DEFAULT_VOICE_ID));
    }

    #[test]
    fn camera_and_doa_checks_against_sim() {
        let sim = SimRobot::new();
        assert_eq!(check_camera(&sim).status, CheckStatus::Ok);
        assert_eq!(check_doa(&sim).status, CheckStatus::Ok);

        let dead = SimRobot::without_camera().without_sound_direction();
        assert_eq!(check_camera(&dead).status, CheckStatus::Fail);
        assert_eq!(check_doa(&dead).status, CheckStatus::Warn);
    }

    #[test]
    fn detector_check_passes_with_stub() {
        assert_eq!(check_detector(&stub_detector()).status, CheckStatus::Ok);
    }

    #[tokio::test]
    async fn dns_check_never_fails_the_run() {
        // Resolution may or may not succeed in the test environment; either
        // way the check is advisory (OK or WARN), never FAIL.
        let check = check_dns().await;
        assert_eq!(check.name, "elevenlabs_dns_resolution");
        assert_ne!(check.status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn voice_access_check_reads_voice_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/voices/voice123"))
            .and(header("xi-api-key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "George"})),
            )
            .mount(&server)
            .await;

        let check = check_voice_access(&test_config(&server.uri())).await;
        assert_eq!(check.status, CheckStatus::Ok);
        assert!(check.details.contains("George"));
    }

    #[tokio::test]
    async fn voice_access_non_success_is_a_warning() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let check = check_voice_access(&test_config(&server.uri())).await;
        assert_eq!(check.status, CheckStatus::Warn);
        assert!(check.details.contains("401"));
    }

    #[tokio::test]
    async fn tts_probe_reports_byte_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"12345".to_vec()))
            .mount(&server)
            .await;

        let check = check_tts_probe(&test_config(&server.uri())).await;
        assert_eq!(check.status, CheckStatus::Ok);
        assert!(check.details.contains("bytes=5"));
    }

    #[tokio::test]
    async fn demo_steps_all_pass_against_sim() {
        let tmp = TempDir::new().unwrap();
        let sim = SimRobot::new();
        let mut announcer = Announcer::new(None, DEFAULT_TTS_SPEED);

        let results = run_demo_steps(
            &sim,
            &stub_detector(),
            tmp.path(),
            &mut announcer,
            Duration::ZERO,
        )
        .await;

        assert_eq!(results.len(), 13);
        assert!(
            results.iter().all(|r| r.status == StepStatus::Pass),
            "{results:?}"
        );
        assert_eq!(results[0].name, "wake_up");
        assert_eq!(results[12].name, "go_to_sleep");
        assert!(tmp.path().join("capture_image.jpg").exists());
        // 5 scan captures written alongside the single capture.
        let jpgs = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".jpg"))
            .count();
        assert_eq!(jpgs, 6);
    }

    #[tokio::test]
    async fn camera_failures_do_not_block_later_steps() {
        let tmp = TempDir::new().unwrap();
        let sim = SimRobot::without_camera();
        let mut announcer = Announcer::new(None, DEFAULT_TTS_SPEED);

        let results = run_demo_steps(
            &sim,
            &stub_detector(),
            tmp.path(),
            &mut announcer,
            Duration::ZERO,
        )
        .await;

        assert_eq!(results.len(), 13);
        let by_name = |name: &str| results.iter().find(|r| r.name == name).unwrap();
        assert_eq!(by_name("capture_image").status, StepStatus::Fail);
        assert_eq!(by_name("scan_surroundings").status, StepStatus::Fail);
        assert_eq!(by_name("track_face").status, StepStatus::Fail);
        // Steps after the vision failures still ran and passed.
        assert_eq!(by_name("do_barrel_roll").status, StepStatus::Pass);
        assert_eq!(by_name("go_to_sleep").status, StepStatus::Pass);
    }

    #[tokio::test]
    async fn report_reflects_step_outcomes_and_artifacts() {
        let tmp = TempDir::new().unwrap();
        let sim = SimRobot::new();
        let mut announcer = Announcer::new(None, DEFAULT_TTS_SPEED);
        let results = run_demo_steps(
            &sim,
            &stub_detector(),
            tmp.path(),
            &mut announcer,
            Duration::ZERO,
        )
        .await;

        let report_path = build_markdown_report(tmp.path(), &results).unwrap();
        let report = std::fs::read_to_string(report_path).unwrap();
        assert!(report.contains("# Reachy Debug Run Report"));
        assert!(report.contains("| `wake_up` | **PASS** |"));
        assert!(report.contains("- `capture_image.jpg`"));
        assert!(report.contains("Result: PASS (13 step(s) passed)"));
    }

    #[tokio::test]
    async fn full_suite_exit_code_against_sim() {
        // No API key in the announcer path; preflight may warn but the sim
        // robot and stub detector keep every FAIL-capable check green.
        let tmp = TempDir::new().unwrap();
        let connector = SimConnector::new();
        let options = DebugOptions {
            announce_pause: Duration::ZERO,
            tts_speed: DEFAULT_TTS_SPEED,
        };
        let code = run_debug_suite(&connector, &stub_detector(), tmp.path(), &options)
            .await
            .unwrap();
        assert_eq!(code, 0);

        // One run directory with a report inside.
        let run_dirs: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(run_dirs.len(), 1);
        assert!(run_dirs[0].path().join("run_report.md").exists());
    }

    #[tokio::test]
    async fn failing_steps_yield_exit_code_one() {
        let tmp = TempDir::new().unwrap();
        let connector = SimConnector::with_robot(SimRobot::without_camera());
        let options = DebugOptions {
            announce_pause: Duration::ZERO,
            tts_speed: DEFAULT_TTS_SPEED,
        };
        let code = run_debug_suite(&connector, &stub_detector(), tmp.path(), &options)
            .await
            .unwrap();
        // Camera preflight FAIL aborts before the demo sequence.
        assert_eq!(code, 1);
    }

    #[test]
    fn announcer_starts_enabled_without_config() {
        let announcer = Announcer::new(None, DEFAULT_TTS_SPEED);
        assert!(!announcer.is_disabled());
    }
}
