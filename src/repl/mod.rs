use log::warn;
use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{ self, AsyncBufReadExt, BufReader };

use crate::config::ErrorMessages;
use crate::history::ConversationLog;
use crate::transport::ChatService;

/// Interactive chat loop on stdin. Each send is awaited before the next line
/// is read, so at most one request is ever in flight.
pub async fn run(
    client: Arc<dyn ChatService>,
    messages: ErrorMessages
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut history = ConversationLog::new();
    let stdin = BufReader::new(io::stdin());
    let mut lines = stdin.lines();

    println!("Q-bot ready. Type a message, or /health, /history, /clear, /quit.");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => {
                break;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => {
                break;
            }
            "/clear" => {
                history.clear();
                println!("History cleared.");
            }
            "/history" => {
                if history.is_empty() {
                    println!("No messages yet.");
                } else {
                    print!("{}", history.render_transcript());
                }
            }
            "/health" => {
                let health = client.check_health().await;
                if health.is_healthy {
                    println!("Backend healthy (HTTP {}): {}", health.status, health.message);
                } else if health.status == 0 {
                    println!("Backend unreachable: {}", health.message);
                } else {
                    println!("Backend unhealthy (HTTP {}): {}", health.status, health.message);
                }
            }
            message => {
                println!("Q-bot is typing...");
                match client.send_chat(message, history.messages()).await {
                    Ok(reply) => {
                        history.push_user(message);
                        history.push_assistant(&reply);
                        println!("Q-bot: {}", reply);
                    }
                    Err(err) => {
                        warn!("chat request failed: {}", err);
                        println!("Q-bot: {}", err.user_message(&messages));
                    }
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
