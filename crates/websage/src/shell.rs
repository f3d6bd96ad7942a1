// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `websage shell` command implementation.
//!
//! Loads one session view, prints it, then reads follow-up questions with
//! readline history. Ctrl+C or Ctrl+D tears the view down: the view's
//! cancellation token fires and any pending answer is discarded.

use std::sync::Arc;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use websage_core::{AnalysisBackend, ConversationMessage, Role, WebsageError};
use websage_session::{ConversationController, SessionAggregator, SessionView};

/// Runs the `websage shell` interactive REPL for session `id`.
pub async fn run_shell(backend: Arc<dyn AnalysisBackend>, id: &str) -> Result<(), WebsageError> {
    let cancel = CancellationToken::new();
    let aggregator = SessionAggregator::new(Arc::clone(&backend));

    let mut view = tokio::select! {
        view = aggregator.load_session_view_until(id, &cancel) => view?,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            return Ok(());
        }
    };
    print_view(&view);

    let mut rl = DefaultEditor::new()
        .map_err(|e| WebsageError::Internal(format!("failed to initialize readline: {e}")))?;
    println!("Type {} to exit.\n", "/quit".yellow());

    let mut controller = ConversationController::new(cancel.clone());
    let prompt = format!("{}> ", "websage".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let Some(submission) = controller.begin(&mut view, trimmed) else {
                    continue;
                };
                println!("{}", "asking...".dimmed());

                let outcome = tokio::select! {
                    outcome = controller.send(backend.as_ref(), &submission) => outcome,
                    _ = tokio::signal::ctrl_c() => {
                        cancel.cancel();
                        Err(WebsageError::Cancelled)
                    }
                };
                let failed = outcome.is_err();
                match controller.finish(&mut view, outcome) {
                    Some(reply) => print_reply(&reply, failed),
                    None => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    cancel.cancel();
    debug!(session_id = id, "shell session closed");
    Ok(())
}

fn print_view(view: &SessionView) {
    let model = view.to_view_model();
    println!("{}", model.title.bold().green());
    println!("{} {}", "url:".dimmed(), model.session.url);
    println!(
        "{} {}  {} {}",
        "status:".dimmed(),
        model.session.status,
        "created:".dimmed(),
        model.session.created_at
    );

    let insights = &model.company_insights;
    println!();
    println!("{}", "Company insights".bold());
    for (label, value) in [
        ("industry", &insights.industry),
        ("size", &insights.company_size),
        ("audience", &insights.target_audience),
        ("business model", &insights.business_model),
        ("location", &insights.location),
    ] {
        println!("  {:<15} {value}", format!("{label}:").dimmed());
    }
    if !insights.core_products_services.is_empty() {
        println!(
            "  {:<15} {}",
            "products:".dimmed(),
            insights.core_products_services.join(", ")
        );
    }

    println!();
    println!("{} {}", "Q:".bold(), model.query.original_query);
    println!("{} {}", "A:".bold(), model.query.ai_response);

    for degraded in &model.degraded {
        println!("{}", format!("({degraded} unavailable, showing partial data)").yellow());
    }

    if !model.conversation_history.is_empty() {
        println!();
        for message in &model.conversation_history {
            print_message(message);
        }
    }
    println!();
}

fn print_message(message: &ConversationMessage) {
    match message.role {
        Role::User => println!("{} {}", "you:".blue().bold(), message.text),
        Role::Assistant => println!("{} {}", "sage:".cyan().bold(), message.text),
    }
}

fn print_reply(reply: &ConversationMessage, failed: bool) {
    if failed {
        println!("{} {}", "sage:".cyan().bold(), reply.text.red());
    } else {
        print_message(reply);
    }
}
