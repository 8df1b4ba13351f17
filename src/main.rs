use bilingual_recorder::{
    config, Config, HttpBackend, MicCapture, Recorder, RecorderOptions, RecorderState,
    TranscriptionBackend,
};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "bilingual-recorder",
    version,
    about = "User-assisted bilingual (EN/ZH) speech transcription client"
)]
struct Args {
    /// Backend base URL (overrides BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Input device name to capture from (overrides INPUT_DEVICE)
    #[arg(long)]
    input_device: Option<String>,

    /// List available input devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Client label reported to the backend (overrides CLIENT_LABEL)
    #[arg(long)]
    client_label: Option<String>,

    /// Free-form note attached to the session (overrides SESSION_NOTE)
    #[arg(long)]
    note: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list_devices {
        let devices = MicCapture::list_input_devices()?;
        if devices.is_empty() {
            println!("No input devices found.");
        }
        for device in devices {
            println!("{}", device);
        }
        return Ok(());
    }

    let mut cfg = Config::from_env();
    if let Some(url) = args.backend_url {
        cfg.backend_base_url = config::normalize_base_url(&url);
    }
    if let Some(label) = args.client_label {
        cfg.client_label = config::normalize_label(&label);
    }
    if args.note.is_some() {
        cfg.note = args.note;
    }
    if args.input_device.is_some() {
        cfg.input_device_name = args.input_device;
    }

    let backend = HttpBackend::new(&cfg.backend_base_url, cfg.request_timeout_secs)?;
    match backend.health().await {
        Ok(true) => info!("Backend reachable at {}", cfg.backend_base_url),
        Ok(false) => warn!("Backend at {} reported not-ok", cfg.backend_base_url),
        Err(e) => warn!("Backend health check failed ({}); continuing anyway", e),
    }

    let capture = MicCapture::new(cfg.input_device_name.clone());
    let mut recorder = Recorder::new(
        Box::new(capture),
        Box::new(backend),
        RecorderOptions {
            client_label: cfg.client_label.clone(),
            note: cfg.note.clone(),
            min_segment_ms: cfg.min_segment_ms,
        },
    );

    recorder.start().await?;
    println!(
        "Recording session {} started.",
        recorder.session_id().unwrap_or("?")
    );
    println!("Enter/t = switch language, s = stop and end session, Ctrl-C = stop.");
    render(&recorder);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    None => {
                        finish(&mut recorder).await;
                        break;
                    }
                    Some(cmd) => match cmd.trim() {
                        "" | "t" | "toggle" => match recorder.toggle_language().await {
                            Ok(true) => render(&recorder),
                            Ok(false) => println!("Not recording; toggle ignored."),
                            Err(e) => eprintln!("Toggle failed: {}", e),
                        },
                        "s" | "q" | "stop" => {
                            finish(&mut recorder).await;
                            break;
                        }
                        other => println!(
                            "Unknown command '{}'. Enter = switch language, s = stop.",
                            other
                        ),
                    },
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                finish(&mut recorder).await;
                break;
            }
        }
    }

    Ok(())
}

async fn finish(recorder: &mut Recorder) {
    let final_transcript = recorder.stop().await;
    render(recorder);
    if let Some(text) = final_transcript {
        println!("\nBackend transcript:\n{}", text);
    }
}

fn render(recorder: &Recorder) {
    println!();
    println!(
        "-- {} | language: {} --",
        state_label(recorder.state()),
        recorder.current_language().label()
    );
    if let Some(err) = recorder.last_error() {
        println!("error: {}", err);
    }

    if recorder.segments().is_empty() {
        println!("No segments yet.");
        return;
    }

    println!("{}", recorder.transcript_text());
    for seg in recorder.segments() {
        let path = seg
            .audio_path
            .as_deref()
            .map(|p| format!("  [{}]", p))
            .unwrap_or_default();
        println!(
            "  {} {}ms to {}ms  {}{}",
            seg.language.tag(),
            seg.start_ms,
            seg.end_ms,
            seg.text.as_deref().unwrap_or("(no transcript returned)"),
            path
        );
    }
}

fn state_label(state: RecorderState) -> &'static str {
    match state {
        RecorderState::Idle => "idle",
        RecorderState::Recording => "recording",
        RecorderState::Flushing => "flushing",
    }
}
