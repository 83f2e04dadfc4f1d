use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use murmur_agent::voice::{AudioCapture, AudioPlayback, Microphone, WhisperRecognizer};
use murmur_agent::{
    Config, ConsolePrompter, NullSpeaker, OllamaRunner, Session, Speaker, SynthesisSpeaker,
    VoiceInput,
};

/// Murmur - Voice and text chat agent for locally-run language models
#[derive(Parser)]
#[command(name = "murmur", version, about)]
struct Cli {
    /// Model identifier passed to the runner (e.g. "tinyllama")
    #[arg(short, long, env = "MURMUR_MODEL")]
    model: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable voice features (for headless machines without audio hardware)
    #[arg(long, env = "MURMUR_DISABLE_VOICE")]
    disable_voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Interactive first-run setup
    Setup,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,murmur_agent=info",
        1 => "info,murmur_agent=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
            Command::TestTts { text } => test_tts(&text).await,
            Command::Setup => murmur_agent::setup::run_setup(),
        };
    }

    let config = Config::load_with_options(cli.model.as_deref(), cli.disable_voice)?;
    tracing::debug!(?config, "loaded configuration");

    tracing::info!(
        model = %config.agent.model,
        activation = %config.agent.activation_phrase,
        voice = config.voice.enabled,
        "starting murmur agent"
    );

    // Voice capabilities degrade gracefully: a missing key or missing audio
    // device turns the session into keyboard/text-only
    let voice_input = if config.voice.enabled {
        match build_voice_input(&config) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, "voice input unavailable, using keyboard only");
                None
            }
        }
    } else {
        None
    };

    let speaker: Box<dyn Speaker> = if config.voice.enabled {
        match build_speaker(&config) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "voice output unavailable, responses will be printed only");
                Box::new(NullSpeaker)
            }
        }
    } else {
        Box::new(NullSpeaker)
    };

    if voice_input.is_some() {
        tracing::info!(
            activation = %config.agent.activation_phrase,
            "voice input ready - say the activation phrase"
        );
    }

    let prompter = ConsolePrompter::new(voice_input.is_some());
    let runner = OllamaRunner::new(config.agent.runner_program.clone());

    let mut session = Session::new(
        config,
        Box::new(prompter),
        Box::new(runner),
        speaker,
        voice_input,
    )?;

    session.run().await?;

    Ok(())
}

/// Build microphone + recognizer from config
fn build_voice_input(config: &Config) -> anyhow::Result<VoiceInput> {
    let api_key = config
        .api_keys
        .openai
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no OpenAI API key configured"))?;

    let recognizer = WhisperRecognizer::new(api_key, config.voice.stt_model.clone())?;

    Ok(VoiceInput {
        audio: Box::new(Microphone::new()),
        recognizer: Box::new(recognizer),
    })
}

/// Build the TTS speaker from config
fn build_speaker(config: &Config) -> anyhow::Result<Box<dyn Speaker>> {
    let api_key = config
        .api_keys
        .openai
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no OpenAI API key configured"))?;

    let speaker = SynthesisSpeaker::new(
        api_key,
        config.voice.tts_voice.clone(),
        config.voice.tts_speed,
        config.voice.tts_model.clone(),
    )?;

    Ok(Box::new(speaker))
}

/// Test microphone input
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    let sample_rate = capture.sample_rate();
    println!("Sample rate: {sample_rate} Hz");
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.peek_buffer();
        let energy = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );

        // Clear buffer each second
        capture.clear_buffer();
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");
    println!("  4. Try: pavucontrol (to check levels)");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a sine wave
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let mut playback = AudioPlayback::new()?;

    // Generate 2 seconds of 440Hz sine wave at 24kHz sample rate
    let sample_rate = 24000_i32;
    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let num_samples = (sample_rate as f32 * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    println!("Playing {} samples at {} Hz...", samples.len(), sample_rate);

    playback.play_samples(samples)?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");
    println!("If you didn't hear anything, check:");
    println!("  1. Run: pactl info | grep 'Default Sink'");
    println!("  2. Run: pactl list sinks short");
    println!("  3. Try: pavucontrol (to check output levels)");

    Ok(())
}

/// Test TTS output
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load()?;
    let mut speaker = build_speaker(&config)?;

    println!("Synthesizing and playing speech...");
    speaker.speak(text).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
