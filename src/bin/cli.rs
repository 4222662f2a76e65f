//! Persona Chat - terminal chat with Gemini-backed assistants
//!
//! This is the CLI entry point for the persona-chat tool.
//! Run with: cargo run --bin persona-chat

use std::env;
use std::io::{self, BufRead, Write};

use clap::Parser;
use persona_chat::config::{find_assistant, search_assistants};
use persona_chat::interview::{CoachError, InterviewCoach, InterviewState, INTERVIEW_TOPICS};
use persona_chat::{AppSettings, ChatSession, GeminiClient, ModelError, Persona};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "persona-chat", version, about = "Chat with persona assistants or practice a mock interview")]
struct Cli {
    /// Assistant to chat with (e.g. general, travel, finance, or a catalog key like math)
    #[arg(short, long)]
    persona: Option<String>,

    /// Start the interview coach
    #[arg(short, long)]
    interview: bool,

    /// List the core assistants and exit
    #[arg(long)]
    list: bool,

    /// Search all assistants and exit
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Remember the selected assistant in the settings file
    #[arg(long)]
    save: bool,

    /// Send a single message and exit
    message: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list || cli.search.is_some() {
        print_assistants(cli.search.as_deref().unwrap_or(""));
        return Ok(());
    }

    let mut settings = AppSettings::load();
    apply_env_overrides(&mut settings);

    let persona = if cli.interview {
        Persona::Interview
    } else {
        match cli.persona.as_deref() {
            Some(key) => resolve_persona(key)?,
            None => settings.persona(),
        }
    };

    if cli.save {
        settings.set_persona(persona);
        let path = settings.save()?;
        println!("💾 Saved settings to {}", path.display());
    }

    let client = GeminiClient::new(settings.model_config());
    let api_key = settings.api_key.clone();
    let policy = &client.config().retry;

    println!("🤖 Persona Chat - {}", persona.title());
    println!("================================================");
    println!("Model: {} @ {}", client.config().model_name, client.config().base_url);
    println!(
        "Retry: max {} attempts, {}ms initial delay, x{} backoff",
        policy.attempts(),
        policy.initial_delay.as_millis(),
        policy.multiplier
    );
    if api_key.trim().is_empty() {
        println!("API key: not set (GEMINI_API_KEY)");
    }
    println!("================================================\n");

    if persona.is_interview() {
        return run_interview(&client, &api_key).await;
    }

    let mut session = ChatSession::new(persona);

    if !cli.message.is_empty() {
        let message = cli.message.join(" ");
        return match session.send(&client, &api_key, &message).await {
            Ok(Some(reply)) => {
                println!("{}", reply.text);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => Err(e.into()),
        };
    }

    run_chat(&client, &api_key, session).await
}

/// Environment variables take precedence over the settings file.
fn apply_env_overrides(settings: &mut AppSettings) {
    if let Ok(key) = env::var("GEMINI_API_KEY") {
        settings.api_key = key;
    }
    if let Ok(url) = env::var("GEMINI_BASE_URL") {
        settings.base_url = url;
    }
    if let Ok(model) = env::var("GEMINI_MODEL") {
        settings.model_name = model;
    }
    if let Some(attempts) = env::var("GEMINI_MAX_ATTEMPTS").ok().and_then(|s| s.parse().ok()) {
        settings.max_attempts = attempts;
    }
    if let Some(delay) = env::var("GEMINI_INITIAL_DELAY_MS").ok().and_then(|s| s.parse().ok()) {
        settings.initial_delay_ms = delay;
    }
}

/// Accept a persona key or any catalog key.
fn resolve_persona(key: &str) -> anyhow::Result<Persona> {
    if let Ok(persona) = key.parse::<Persona>() {
        return Ok(persona);
    }
    find_assistant(key)
        .map(|entry| entry.persona)
        .ok_or_else(|| anyhow::anyhow!("Unknown assistant '{}'. Try --list or --search.", key))
}

fn print_assistants(query: &str) {
    let entries = search_assistants(query);
    if entries.is_empty() {
        println!("No assistants match '{}'.", query);
        return;
    }
    for entry in entries {
        println!("{:<12} {:<16} {}", entry.key, entry.title, entry.description);
        println!("{:<12} e.g. {}", "", entry.samples.join(" · "));
    }
}

/// Print a prompt and read one trimmed line. `None` on end of input.
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn print_chat_help() {
    println!("Commands:");
    println!("  /persona <key>     switch assistant");
    println!("  /assistants [q]    list or search assistants");
    println!("  /interview         start the interview coach");
    println!("  /clear             start the conversation over");
    println!("  quit | exit        leave\n");
}

async fn run_chat(client: &GeminiClient, api_key: &str, mut session: ChatSession) -> anyhow::Result<()> {
    for message in session.messages() {
        println!("🤖 {}\n", message.text);
    }
    println!("Type your message and press Enter. /help for commands.\n");

    while let Some(input) = read_line("🧑 You: ")? {
        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "exit" {
            break;
        }

        if let Some(command) = input.strip_prefix('/') {
            let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
            match name {
                "help" => print_chat_help(),
                "clear" => {
                    session.reset();
                    println!("🧹 Conversation cleared.\n");
                }
                "assistants" => print_assistants(arg.trim()),
                "interview" => {
                    run_interview(client, api_key).await?;
                    println!("\nBack to {} chat.\n", session.persona().title());
                }
                "persona" => match resolve_persona(arg.trim()) {
                    Ok(persona) if persona.is_interview() => {
                        run_interview(client, api_key).await?;
                    }
                    Ok(persona) => {
                        session.switch_persona(persona);
                        if let Some(welcome) = session.messages().first() {
                            println!("🤖 {}\n", welcome.text);
                        }
                    }
                    Err(e) => eprintln!("❌ {}\n", e),
                },
                _ => println!("Unknown command. /help for commands.\n"),
            }
            continue;
        }

        let outcome = session
            .send(client, api_key, &input)
            .await
            .map(|reply| reply.map(|message| message.text.clone()));
        match outcome {
            Ok(Some(text)) => println!("\n🤖 {}\n", text),
            Ok(None) => {}
            Err(_) => {
                if let Some(notice) = session.messages().last() {
                    eprintln!("\n❌ {}\n", notice.text);
                }
            }
        }
    }

    println!("Goodbye! 👋");
    Ok(())
}

async fn run_interview(client: &GeminiClient, api_key: &str) -> anyhow::Result<()> {
    let mut coach = InterviewCoach::new();

    println!("🎤 Interview Coach");
    println!("Choose a role to practice:");
    for (i, topic) in INTERVIEW_TOPICS.iter().enumerate() {
        println!("  {}. {}", i + 1, topic);
    }
    println!("Or type any other role (e.g. DevOps Architect). Empty line to go back.\n");

    let Some(choice) = read_line("Role: ")? else {
        return Ok(());
    };
    if choice.is_empty() {
        return Ok(());
    }
    let topic = choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| INTERVIEW_TOPICS.get(i).copied())
        .unwrap_or(choice.as_str());

    println!("\n🤖 {}\n", coach.start(topic)?);

    while coach.state() != InterviewState::Finished {
        let label = if coach.state() == InterviewState::AwaitingQuestionCount {
            "Questions (1-7): "
        } else {
            "🧑 Answer: "
        };
        let Some(input) = read_line(label)? else {
            break;
        };
        if input == "quit" || input == "exit" {
            println!("Interview cancelled.");
            return Ok(());
        }
        if input.is_empty() {
            continue;
        }

        match coach.submit(client, api_key, &input).await {
            Ok(reply) => println!("\n🤖 {}\n", reply),
            Err(CoachError::Model(ModelError::CredentialMissing)) => {
                eprintln!("❌ API Key is missing. Please set GEMINI_API_KEY.");
                return Ok(());
            }
            Err(e) => eprintln!("\n❌ Error connecting to AI: {}. Send your answer again to retry.\n", e),
        }
    }

    if let Some(report) = coach.feedback() {
        println!("{}\n", report.render(coach.topic()));
    }
    Ok(())
}
