use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::client::{Conversation, HttpRelayClient, Outcome};

const CLEAR_COMMAND: &str = "/clear";

pub async fn run(url: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let transport = HttpRelayClient::new(url);
    let mut conversation = Conversation::new();

    println!("Chatting via {}. Type {} to start over.", transport.url(), CLEAR_COMMAND);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim() == CLEAR_COMMAND {
                    if conversation.can_clear() {
                        conversation.clear();
                        println!("(cleared)");
                    }
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());
                conversation.set_input(&line);
                match conversation.send(&transport).await {
                    Outcome::Replied(reply) => println!("AI: {}", reply),
                    Outcome::Failed(error) => println!("Error: {}", error),
                    Outcome::Skipped => {}
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
