use careline_ai::OpenAiBackend;
use careline_bot::{Bot, BotConfig, TelegramClient};
use careline_dialogue::{DEFAULT_SYSTEM_DIRECTIVE, DialogueOrchestrator};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credentials are a fatal startup condition; do not serve.
    let config = BotConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let backend = Arc::new(OpenAiBackend::new(config.openai.api_key.clone()));
    let directive = config
        .dialogue
        .system_directive
        .clone()
        .unwrap_or_else(|| DEFAULT_SYSTEM_DIRECTIVE.to_string());

    let orchestrator = Arc::new(
        DialogueOrchestrator::new(backend, directive, config.openai.completion_options())
            .with_window_size(config.dialogue.window_size),
    );

    let bot = Bot::new(TelegramClient::new(&config.telegram.bot_token), orchestrator);

    tracing::info!(
        model = %config.openai.model,
        window_size = config.dialogue.window_size,
        "Health assistant bot is running"
    );
    bot.run().await;
}
