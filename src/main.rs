use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

use stimme_gateway::api::{self, ApiState};
use stimme_gateway::bot::TelegramBot;
use stimme_gateway::voice::{SpeechToText, TextToSpeech};
use stimme_gateway::{
    Config, GroqEngine, Orchestrator, ToolSet, VoicePipeline, prompt,
};

/// Session key for CLI conversations
const CLI_SESSION: &str = "cli";

/// Stimme - voice assistant gateway (STT, LLM agent with tools, TTS)
#[derive(Parser)]
#[command(name = "stimme", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Text chat; without MESSAGE an interactive session is started
    Chat {
        /// Message for a one-shot turn
        message: Option<String>,
    },
    /// Run the full voice pipeline on an audio file
    Process {
        /// Path to the audio file (OGG, MP3, WAV, ...)
        audio: PathBuf,
        /// Where to write the synthesized reply
        #[arg(short, long, default_value = "antwort.mp3")]
        output: PathBuf,
        /// Skip synthesis, print text only
        #[arg(long)]
        no_audio: bool,
    },
    /// Run the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, env = "STIMME_PORT", default_value = "18790")]
        port: u16,
    },
    /// Run the Telegram bot
    Telegram,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,stimme_gateway=info",
        1 => "info,stimme_gateway=debug",
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

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let pipeline = build_pipeline(&config)?;

    match cli.command {
        Command::Chat { message: Some(message) } => {
            let reply = pipeline.orchestrator().converse(CLI_SESSION, &message).await?;
            println!("{reply}");
            Ok(())
        }
        Command::Chat { message: None } => interactive_chat(&pipeline).await,
        Command::Process {
            audio,
            output,
            no_audio,
        } => process_file(&pipeline, &audio, &output, no_audio).await,
        Command::Serve { port } => {
            let state = Arc::new(ApiState {
                orchestrator: pipeline.orchestrator().clone(),
                pipeline: pipeline.clone(),
            });
            api::serve(state, port).await?;
            Ok(())
        }
        Command::Telegram => {
            let token = config.telegram_token()?.to_string();
            let bot = TelegramBot::new(token, pipeline);
            bot.run().await?;
            Ok(())
        }
    }
}

/// Wire up the collaborators into a shared pipeline
fn build_pipeline(config: &Config) -> anyhow::Result<Arc<VoicePipeline>> {
    let tools = ToolSet::from_config(config)?;
    let engine = GroqEngine::from_config(config, tools)?;

    // The turn budget covers the whole tool loop, one request timeout per
    // possible round
    let turn_timeout = config.request_timeout * (config.max_tool_rounds + 1);

    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(engine),
        config.max_history,
        prompt::system_prompt(&config.language),
        turn_timeout,
    ));

    let stt = SpeechToText::new(
        config.groq_api_key.clone(),
        config.stt_model.clone(),
        config.language.clone(),
    )?;
    let tts = TextToSpeech::new(
        config.elevenlabs_api_key.clone(),
        config.voice_id.clone(),
        config.tts_model.clone(),
    )?;

    Ok(Arc::new(VoicePipeline::new(stt, tts, orchestrator)))
}

/// Interactive chat loop on stdin
async fn interactive_chat(pipeline: &Arc<VoicePipeline>) -> anyhow::Result<()> {
    println!("Stimme Chat — /reset löscht die Konversation, /quit beendet.");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => {}
            "/quit" | "/exit" => break,
            "/reset" => {
                pipeline.orchestrator().reset(CLI_SESSION).await;
                println!("Konversation zurückgesetzt.");
            }
            message => match pipeline.orchestrator().converse(CLI_SESSION, message).await {
                Ok(reply) => println!("{reply}\n"),
                Err(e) => eprintln!("Fehler: {e}\n"),
            },
        }
    }

    Ok(())
}

/// Run the voice pipeline on an audio file
async fn process_file(
    pipeline: &Arc<VoicePipeline>,
    audio_path: &PathBuf,
    output: &PathBuf,
    no_audio: bool,
) -> anyhow::Result<()> {
    let audio = tokio::fs::read(audio_path).await?;
    let filename = audio_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio.ogg");

    let outcome = pipeline
        .process(CLI_SESSION, &audio, filename, !no_audio)
        .await?;

    println!("Transkription: {}", outcome.transcription);
    println!("Antwort: {}", outcome.response);

    if let Some(reply_audio) = outcome.audio {
        tokio::fs::write(output, &reply_audio).await?;
        println!("Audio-Antwort: {}", output.display());
    }

    Ok(())
}
