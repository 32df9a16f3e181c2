//! Interactive REPL for the Travel Buddy CLI
//!
//! Drives a booking session: plain lines answer the current step, slash
//! commands navigate, switch language or stand in for the microphone.

use anyhow::Result;
use booking_wizard::{BookingError, BookingSession, BookingType, Locale, SessionEvent};
use colored::Colorize;
use rustyline::{error::ReadlineError, history::DefaultHistory, Editor};
use tracing::warn;

use crate::{config::Config, output::OutputHandler, speech::TranscriptFeed};

/// Interactive REPL for the Travel Buddy CLI
pub struct BuddyRepl {
    session: BookingSession,
    config: Config,
    feed: Option<TranscriptFeed>,
    output: OutputHandler,
    editor: Editor<(), DefaultHistory>,
}

impl BuddyRepl {
    pub fn new(session: BookingSession, config: Config, feed: Option<TranscriptFeed>) -> Result<Self> {
        let output = OutputHandler::new(config.display.color);
        let editor = Editor::new()?;

        Ok(Self {
            session,
            config,
            feed,
            output,
            editor,
        })
    }

    /// Run the interactive REPL, optionally opening a wizard right away
    pub async fn run(&mut self, open: Option<BookingType>) -> Result<()> {
        self.output
            .print_banner(&self.config.server.url, self.session.ui());

        if let Some(booking_type) = open {
            self.open(booking_type).await;
        }

        // Main REPL loop
        loop {
            let prompt = self.build_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();

                    if input.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_command(input).await {
                            Ok(should_exit) => {
                                if should_exit {
                                    break;
                                }
                            }
                            Err(e) => {
                                self.output.print_error(&format!("Command error: {}", e));
                            }
                        }
                    } else if let Err(e) = self.answer(input).await {
                        self.output.print_error(&format!("Error: {}", e));
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.output
                        .print_info("Use /cancel to close the booking or /exit to quit.");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    self.output.print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        self.session.cancel().await;
        Ok(())
    }

    /// Build the prompt string
    fn build_prompt(&self) -> String {
        let step_part = self
            .session
            .view()
            .map(|view| {
                format!(
                    " [{} {}]",
                    view.booking_type.to_string().bright_cyan(),
                    view.progress.dimmed()
                )
            })
            .unwrap_or_default();

        format!(
            "\n{}{} {} ",
            "buddy".bright_green().bold(),
            step_part,
            ">".bright_green()
        )
    }

    /// Handle slash commands
    async fn handle_command(&mut self, input: &str) -> Result<bool> {
        let (command, rest) = input
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((input, ""));

        match command {
            "/exit" | "/quit" | "/q" => {
                return Ok(true);
            }

            "/help" | "/h" | "/?" => {
                self.print_help();
            }

            "/hotel" => self.open(BookingType::Hotel).await,
            "/taxi" => self.open(BookingType::Taxi).await,

            "/next" | "/n" => {
                self.announce_confirming();
                let event = self.session.next().await;
                self.render(event);
            }

            "/confirm" => {
                self.announce_confirming();
                let event = self.session.confirm().await;
                self.render(event);
            }

            "/back" | "/b" => {
                let event = self.session.back().await;
                self.render(event);
            }

            "/cancel" => {
                let event = self.session.cancel().await;
                self.render(Ok(event));
            }

            "/+" | "/-" => {
                let delta = if command == "/+" { 1 } else { -1 };
                match self.session.nudge(delta) {
                    Ok(Some(_)) => self.show_step(),
                    Ok(None) => self.output.print_warning("This step is not a number."),
                    Err(e) => self.print_booking_error(&e),
                }
            }

            "/voice" | "/v" => self.voice(None).await?,

            "/say" => {
                if rest.is_empty() {
                    self.output.print_error("Usage: /say <what you would say>");
                } else {
                    self.voice(Some(rest.to_string())).await?;
                }
            }

            "/retry" => {
                self.announce_confirming();
                let event = self.session.retry().await;
                self.render(event);
            }

            "/lang" => self.switch_locale(rest).await,

            "/mute" => {
                self.session.set_muted(true);
                self.output.print_success("Prompts muted.");
            }

            "/unmute" => {
                self.session.set_muted(false);
                self.output.print_success("Prompts will be read aloud.");
            }

            "/show" => self.show_step(),

            "/clear" => {
                print!("\x1B[2J\x1B[1;1H"); // Clear screen
            }

            _ => {
                self.output.print_error(&format!(
                    "Unknown command: {}. Use /help for available commands.",
                    command
                ));
            }
        }

        Ok(false)
    }

    /// Print help information
    fn print_help(&self) {
        println!();
        println!("{}", "Travel Buddy Commands".bright_white().bold());
        println!("{}", "─".repeat(50).dimmed());
        println!();

        println!("{}", "Booking:".bright_cyan());
        println!("  {}            Start a hotel booking", "/hotel".bright_yellow());
        println!("  {}             Start a taxi booking", "/taxi".bright_yellow());
        println!("  {}           Answer the current step and continue", "<text>".bright_yellow());
        println!("  {}             Continue with the current answer", "/next".bright_yellow());
        println!("  {}             Go back one step", "/back".bright_yellow());
        println!("  {}           Run the final checks and submit", "/confirm".bright_yellow());
        println!("  {}          Step a number up or down", "/+ /-".bright_yellow());
        println!("  {}           Close the booking", "/cancel".bright_yellow());
        println!("  {}            Resend the last booking", "/retry".bright_yellow());
        println!();

        println!("{}", "Voice:".bright_cyan());
        println!("  {}            Answer by voice", "/voice".bright_yellow());
        println!("  {}      Answer as if spoken", "/say <words>".bright_yellow());
        println!("  {}    Mute or unmute prompts", "/mute /unmute".bright_yellow());
        println!();

        println!("{}", "Other:".bright_cyan());
        println!("  {}      Switch language", "/lang en|fr".bright_yellow());
        println!("  {}             Show the current step", "/show".bright_yellow());
        println!("  {}            Clear screen", "/clear".bright_yellow());
        println!("  {}             Exit the CLI", "/exit".bright_yellow());
        println!();
    }

    async fn open(&mut self, booking_type: BookingType) {
        let event = self.session.open(booking_type).await;
        self.render(event);
    }

    /// Typed answer for the current step, then continue
    async fn answer(&mut self, input: &str) -> Result<()> {
        if !self.session.is_open() {
            self.output
                .print_info("No booking in progress. Start one with /hotel or /taxi.");
            return Ok(());
        }

        match self.session.type_answer(input) {
            Ok(()) => {
                self.announce_confirming();
                let event = self.session.next().await;
                self.render(event);
            }
            Err(e) => self.print_booking_error(&e),
        }
        Ok(())
    }

    async fn voice(&mut self, spoken: Option<String>) -> Result<()> {
        if self.session.is_open() && self.session.voice_supported() {
            let utterance = match spoken {
                Some(words) => words,
                None => {
                    let ui = self.session.ui();
                    let prompt = format!("{} ", format!("🎙 {}", ui.listening()).bright_magenta());
                    match self.editor.readline(&prompt) {
                        Ok(line) => line,
                        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => String::new(),
                        Err(e) => return Err(e.into()),
                    }
                }
            };
            if let Some(feed) = &self.feed {
                feed.push(utterance);
            }
        }

        let event = self.session.answer_by_voice().await;
        self.render(event);
        Ok(())
    }

    async fn switch_locale(&mut self, arg: &str) {
        let target = if arg.is_empty() {
            match self.session.locale() {
                Locale::En => Locale::Fr,
                Locale::Fr => Locale::En,
            }
        } else {
            match arg.parse::<Locale>() {
                Ok(locale) => locale,
                Err(e) => {
                    self.output.print_error(&e);
                    return;
                }
            }
        };

        let event = self.session.set_locale(target).await;
        if let Err(e) = Config::remember_locale(target) {
            warn!("Could not save language preference: {}", e);
        }
        self.output
            .print_success(self.session.ui().language_switched());
        self.render(Ok(event));
    }

    fn announce_confirming(&self) {
        if self.session.view().is_some_and(|v| v.is_last_step) {
            self.output
                .print_info(self.session.ui().confirming_status());
        }
    }

    fn show_step(&self) {
        match self.session.view() {
            Some(view) => self.output.print_step(&view, self.session.ui()),
            None => self
                .output
                .print_info("No booking in progress. Start one with /hotel or /taxi."),
        }
    }

    fn render(&self, event: booking_wizard::Result<SessionEvent>) {
        let ui = self.session.ui();
        match event {
            Ok(SessionEvent::StepChanged { .. }) | Ok(SessionEvent::Notice(_)) => self.show_step(),
            Ok(SessionEvent::Confirmed(confirmation)) => {
                self.output.print_confirmation(&confirmation, ui)
            }
            Ok(SessionEvent::SubmissionFailed(notice)) => {
                self.output.print_failure(&notice);
                if self.session.is_open() {
                    self.show_step();
                }
            }
            Ok(SessionEvent::Closed) => self.output.print_info("Booking cancelled."),
            Ok(SessionEvent::Unchanged) => {}
            Err(e) => self.print_booking_error(&e),
        }
    }

    fn print_booking_error(&self, error: &BookingError) {
        match error {
            BookingError::NoActiveWizard => self
                .output
                .print_info("No booking in progress. Start one with /hotel or /taxi."),
            BookingError::WizardBusy => self.output.print_warning(self.session.ui().confirming()),
            other => self.output.print_error(&other.to_string()),
        }
    }
}
