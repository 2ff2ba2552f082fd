//! `synergy chat`: interactive REPL command.
//!
//! Each line is handed to the conversation through the widget readiness
//! adapter, exactly like a chat widget submit. The conversation registers
//! with the adapter right away; the backend health probe runs alongside and
//! only logs.

use std::sync::Arc;

use sy_domain::config::Config;
use sy_domain::{ConversationState, Speaker, Turn};
use sy_orchestrator::{
    Conversation, ConversationMachine, DeliveryOptions, SharedConversation, TurnOutcome,
    WidgetReadinessAdapter,
};
use tokio::sync::watch;

use super::render;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
pub async fn chat(config: Arc<Config>) -> anyhow::Result<()> {
    // 1. Wire the conversation to the adapter; the health probe runs alongside.
    let (adapter, conversation, machine) = connect(&config)?;

    // 2. Follow state transitions for progress output.
    tokio::spawn(follow_state(machine.subscribe()));

    // 3. Initialize rustyline editor with persistent history.
    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".synergy")
        .join("chat_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    eprintln!("Synergy interactive chat");
    eprintln!("Backend: {}  |  Type /help for commands, Ctrl+D to exit", config.backend.base_url);
    eprintln!();
    for turn in conversation.lock().await.transcript().turns() {
        println!("{}", render::turn(turn));
    }

    // 4. REPL loop.
    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    rl.add_history_entry(&line).ok();
                }

                if trimmed.starts_with('/') {
                    if handle_slash_command(trimmed, &conversation).await {
                        break;
                    }
                    continue;
                }

                send_message(&adapter, &conversation, &machine, &line).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    rl.save_history(&history_path).ok();
    eprintln!("Goodbye!");
    Ok(())
}

/// Build the conversation and register it with a fresh adapter, then
/// start a background health probe that only logs.
fn connect(
    config: &Config,
) -> anyhow::Result<(WidgetReadinessAdapter, SharedConversation, ConversationMachine)> {
    let backend = sy_client::create_backend(&config.backend)?;
    let machine = ConversationMachine::new();
    let adapter = WidgetReadinessAdapter::new(&config.widget, machine.clone());
    let conversation =
        SharedConversation::new(Conversation::with_machine(backend.clone(), config, machine.clone()));
    adapter.register(Arc::new(conversation.clone()));

    let base_url = config.backend.base_url.clone();
    tokio::spawn(async move {
        match backend.health().await {
            Ok(true) => tracing::debug!(%base_url, "backend healthy"),
            Ok(false) => tracing::warn!(%base_url, "backend reports degraded health"),
            Err(e) => tracing::warn!(%base_url, error = %e, "backend health probe failed"),
        }
    });

    Ok((adapter, conversation, machine))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message sending
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn send_message(
    adapter: &WidgetReadinessAdapter,
    conversation: &SharedConversation,
    machine: &ConversationMachine,
    line: &str,
) {
    // Where this exchange's turns will start.
    let (session, start) = {
        let conv = conversation.lock().await;
        (conv.session_id().clone(), conv.transcript().len())
    };

    let options = DeliveryOptions {
        add_client_message: true,
    };
    let outcome = match adapter.deliver(line, options).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::debug!(error = %e, "delivery failed");
            if let Some(message) = machine.state().error() {
                eprintln!("\x1B[33m{message}\x1B[0m");
            }
            return;
        }
    };

    if outcome == TurnOutcome::Busy {
        eprintln!("(still working on your last message)");
        return;
    }

    let conv = conversation.lock().await;
    for turn in exchange_replies(&conv, session.as_str(), start, outcome) {
        println!("{}", render::turn(turn));
    }

    match outcome {
        TurnOutcome::Matched => {
            if let Some(result) = conv.result() {
                println!();
                println!("{}", render::result(result));
                println!();
            }
            // Opening turns of the rotated session.
            for turn in conv.transcript().turns() {
                println!("{}", render::turn(turn));
            }
        }
        TurnOutcome::MatchFailed => {
            if let Some(message) = conv.state().error() {
                eprintln!("\x1B[31m{message}\x1B[0m");
            }
            eprintln!("(type /retry to try matching again)");
        }
        _ => {}
    }
}

/// Assistant turns produced by the exchange that started at `start` in
/// `session`.
fn exchange_replies<'a>(
    conv: &'a Conversation,
    session: &str,
    start: usize,
    outcome: TurnOutcome,
) -> Vec<&'a Turn> {
    // A repeated nudge is not appended twice; it is still the answer.
    if outcome == TurnOutcome::Nudged {
        return conv.transcript().last().into_iter().collect();
    }

    let log = match conv.matched_transcript() {
        Some(retired) if retired.session_id().as_str() == session => retired,
        _ => conv.transcript(),
    };
    log.turns()
        .iter()
        .skip(start)
        .filter(|turn| turn.speaker == Speaker::Assistant)
        .collect()
}

/// Print a progress line whenever a matching cycle starts.
async fn follow_state(mut rx: watch::Receiver<ConversationState>) {
    while rx.changed().await.is_ok() {
        let matching = rx.borrow_and_update().is_matching();
        if matching {
            eprintln!("\x1B[2mMatching in progress... finding your collaborators\x1B[0m");
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process a slash command. Returns `true` if the REPL should exit.
async fn handle_slash_command(input: &str, conversation: &SharedConversation) -> bool {
    let cmd = input.split_whitespace().next().unwrap_or(input);

    match cmd {
        "/exit" | "/quit" => return true,

        "/reset" => {
            let mut conv = conversation.lock().await;
            conv.reset();
            eprintln!("Conversation reset. New session: {}", conv.session_id());
            for turn in conv.transcript().turns() {
                println!("{}", render::turn(turn));
            }
        }

        "/retry" => match conversation.retry_matching().await {
            Ok(TurnOutcome::Matched) => {
                let conv = conversation.lock().await;
                if let Some(result) = conv.result() {
                    println!("{}", render::result(result));
                }
                for turn in conv.transcript().turns() {
                    println!("{}", render::turn(turn));
                }
            }
            Ok(_) => {
                let conv = conversation.lock().await;
                if let Some(message) = conv.state().error() {
                    eprintln!("\x1B[31m{message}\x1B[0m");
                }
            }
            Err(e) => eprintln!("Cannot retry: {e}"),
        },

        "/transcript" => {
            let conv = conversation.lock().await;
            eprintln!("Session: {}  |  state: {}", conv.session_id(), conv.state());
            println!("{}", conv.transcript().render());
        }

        "/help" => {
            eprintln!("Commands:");
            eprintln!("  /retry           Retry matching after a failure");
            eprintln!("  /reset           Start a fresh session");
            eprintln!("  /transcript      Show the current session transcript");
            eprintln!("  /exit, /quit     Exit the chat");
            eprintln!("  /help            Show this help");
        }

        other => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use sy_domain::config::BackendConfig;

    use super::*;

    fn conversation(config: &Config) -> Conversation {
        let backend = sy_client::create_backend(&BackendConfig::default()).unwrap();
        Conversation::new(backend, config)
    }

    #[tokio::test]
    async fn widget_is_ready_before_the_health_probe_answers() {
        // Accepts connections but never answers, so the probe hangs.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = Config::default();
        config.backend.base_url = format!("http://{}", listener.local_addr().unwrap());

        let (adapter, _conversation, machine) = connect(&config).unwrap();

        assert!(adapter.is_ready());
        let outcome = adapter.deliver("", DeliveryOptions::default()).await.unwrap();
        assert_eq!(outcome, TurnOutcome::Nudged);
        assert_eq!(machine.state(), ConversationState::Idle);
    }

    #[tokio::test]
    async fn second_blank_line_still_prints_the_nudge() {
        let config = Config::default();
        let mut conv = conversation(&config);
        let nudge = Turn::assistant(config.conversation.empty_input_nudge.clone());

        for _ in 0..2 {
            let session = conv.session_id().clone();
            let start = conv.transcript().len();
            let outcome = conv
                .handle_user_message("  ", DeliveryOptions::default())
                .await;

            let replies = exchange_replies(&conv, session.as_str(), start, outcome);
            assert_eq!(replies, vec![&nudge]);
        }
    }

    #[tokio::test]
    async fn overlong_line_prints_the_long_nudge() {
        let config = Config::default();
        let mut conv = conversation(&config);
        let session = conv.session_id().clone();

        let start = conv.transcript().len();
        let outcome = conv
            .handle_user_message(&"x".repeat(5000), DeliveryOptions::default())
            .await;

        let replies = exchange_replies(&conv, session.as_str(), start, outcome);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].text, config.conversation.long_input_nudge);
    }
}
