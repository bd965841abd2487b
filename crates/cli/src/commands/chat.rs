//! `dave chat`: interactive or single-message chat.

use std::io::Write;

use dave_assistant::Assistant;
use dave_core::message::{Message, Role};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Context;

pub async fn run(
    session: Option<String>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(session).await?;
    let mut assistant = ctx.assistant().await?;

    if let Some(msg) = message {
        // Single message mode
        eprint!("  DAVE está digitando...");
        let reply = assistant.send(&msg).await?;
        eprint!("\r                        \r");
        match reply {
            Some(reply) => {
                println!("{}", reply.assistant.content);
                eprintln!();
                eprintln!("  session: {}", assistant.session_id());
                eprintln!("  message: {}", reply.assistant.id);
            }
            None => return Err("Message is empty".into()),
        }
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║            DAVE, Assistente Virtual          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Session:   {}", assistant.session_id());
    println!("  Knowledge: {} entries", ctx.knowledge.entries().len());
    println!();
    println!("  Commands: /new (new conversation), /good or /bad [comment]");
    println!("  (rate the last answer), 'exit' or Ctrl+D to quit.");
    println!();

    for msg in assistant.messages() {
        print_message(msg);
    }
    print_suggestions(&assistant);
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "exit" | "quit" => break,
            "/new" => {
                assistant.new_conversation().await?;
                println!();
                for msg in assistant.messages() {
                    print_message(msg);
                }
                print_suggestions(&assistant);
            }
            _ if input.starts_with('/') => match parse_rating(input) {
                Some((helpful, comment)) => {
                    rate_last_answer(&mut assistant, helpful, comment).await?
                }
                None => println!("  Unknown command: {input}"),
            },
            _ => {
                eprint!("  DAVE está digitando...");
                let reply = assistant.send(input).await;
                eprint!("\r                        \r");
                match reply {
                    Ok(Some(reply)) => {
                        println!();
                        print_message(&reply.assistant);
                        print_suggestions(&assistant);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        eprintln!("  [Error] {e}");
                        println!();
                    }
                }
            }
        }
        prompt()?;
    }

    println!();
    println!("  Até logo! 👋");
    println!();

    Ok(())
}

/// `/good [comment]` or `/bad [comment]`, matched on the whole first word.
fn parse_rating(input: &str) -> Option<(bool, Option<String>)> {
    let (command, rest) = input
        .split_once(char::is_whitespace)
        .unwrap_or((input, ""));
    let helpful = match command {
        "/good" => true,
        "/bad" => false,
        _ => return None,
    };
    let comment = Some(rest.trim().to_string()).filter(|c| !c.is_empty());
    Some((helpful, comment))
}

async fn rate_last_answer(
    assistant: &mut Assistant,
    helpful: bool,
    comment: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let last_answer = assistant
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
        .map(|m| m.id.clone());

    let recorded = match last_answer {
        Some(id) => assistant.give_feedback(&id, helpful, comment).await?,
        None => false,
    };

    if recorded {
        println!("  ✅ Obrigado pelo feedback!");
    } else {
        println!("  ⚠️  Nothing to rate (no answer yet, or already rated)");
    }
    Ok(())
}

fn print_message(msg: &Message) {
    let prefix = match msg.role {
        Role::User => "  You  > ",
        Role::Assistant => "  DAVE > ",
    };
    for line in msg.content.lines() {
        println!("{prefix}{line}");
    }
    println!();
}

fn print_suggestions(assistant: &Assistant) {
    if assistant.suggestions().is_empty() {
        return;
    }
    println!("  Perguntas sugeridas:");
    for suggestion in assistant.suggestions() {
        println!("    • {suggestion}");
    }
    println!();
}

fn prompt() -> std::io::Result<()> {
    print!("  You  > ");
    std::io::stdout().flush()
}

#[cfg(test)]
mod tests {
    use super::parse_rating;

    #[test]
    fn rating_commands_parse() {
        assert_eq!(parse_rating("/good"), Some((true, None)));
        assert_eq!(parse_rating("/bad   "), Some((false, None)));
        assert_eq!(
            parse_rating("/bad faltou o passo a passo"),
            Some((false, Some("faltou o passo a passo".to_string())))
        );
    }

    #[test]
    fn words_starting_like_ratings_are_not_ratings() {
        assert_eq!(parse_rating("/goodbye"), None);
        assert_eq!(parse_rating("/badge"), None);
        assert_eq!(parse_rating("/good-ish"), None);
        assert_eq!(parse_rating("good"), None);
    }
}
