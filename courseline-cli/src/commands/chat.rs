//! Chat command - interactive session with the scripted assistant

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;

use super::get_context;
use courseline_core::domain::ChatSender;
use courseline_core::services::QUICK_ACTIONS;

use crate::output;

pub fn run(message: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.auth_service.current_user()?;

    let mut conversation = ctx.chatbot_service.start_conversation(user.as_ref())?;

    // One-shot mode: answer and exit
    if let Some(message) = message {
        let reply = ctx
            .chatbot_service
            .send(&mut conversation, user.as_ref(), &message)?;
        println!("{} {}", "Edward:".cyan().bold(), reply.text);
        if let Some(user) = &user {
            ctx.chatbot_service
                .mark_read(user.id, conversation.last_message_id())?;
        }
        return Ok(());
    }

    // Interactive mode
    if let Some(user) = &user {
        if ctx.chatbot_service.has_unread(user.id, &conversation)? {
            output::info("You have unread messages");
        }
        ctx.chatbot_service.mark_greeting_shown(user.id)?;
    }
    for message in conversation.messages() {
        print_message(&message.sender, &message.text);
    }
    println!(
        "{}",
        format!(
            "Quick actions: {}. Type 'quit' to leave.",
            QUICK_ACTIONS.join(", ")
        )
        .dimmed()
    );

    loop {
        let input: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        let pb = output::spinner("Edward is thinking...");
        let reply = ctx
            .chatbot_service
            .send(&mut conversation, user.as_ref(), trimmed)?;
        pb.finish_and_clear();

        print_message(&reply.sender, &reply.text);
        // The chat is open, so everything is read as it arrives
        if let Some(user) = &user {
            ctx.chatbot_service
                .mark_read(user.id, conversation.last_message_id())?;
        }
    }

    Ok(())
}

fn print_message(sender: &ChatSender, text: &str) {
    match sender {
        ChatSender::Assistant => println!("{} {}", "Edward:".cyan().bold(), text),
        ChatSender::User => println!("{} {}", "You:".bold(), text),
    }
}
