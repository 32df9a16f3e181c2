//! Output formatting and terminal rendering
//!
//! Renders the wizard step, chat confirmations and notices with colors.

use booking_wizard::{
    BookingType, Confirmation, FailureNotice, FollowUpAction, StepKind, UiText, WizardView,
};
use colored::Colorize;

/// Output handler for terminal display
pub struct OutputHandler {
    pub color: bool,
}

impl OutputHandler {
    pub fn new(color: bool) -> Self {
        colored::control::set_override(color);
        Self { color }
    }

    /// Print the welcome banner
    pub fn print_banner(&self, server: &str, ui: UiText) {
        println!();
        println!(
            "{}",
            "╔═══════════════════════════════════════════════════════════════╗"
                .bright_cyan()
        );
        println!(
            "{}",
            "║             Travel Buddy Booking Assistant                    ║"
                .bright_cyan()
        );
        println!(
            "{}",
            "╚═══════════════════════════════════════════════════════════════╝"
                .bright_cyan()
        );
        println!("  {} {}", "Server:".dimmed(), server);
        println!();
        println!("  {}   {}", "/hotel".bright_yellow(), ui.title(BookingType::Hotel));
        println!("  {}    {}", "/taxi".bright_yellow(), ui.title(BookingType::Taxi));
        println!("  {}    {}", "/help".bright_yellow(), "All commands".dimmed());
        println!();
    }

    /// Print a section header
    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", format!("▶ {}", text).bright_yellow().bold());
        println!("{}", "─".repeat(60).dimmed());
    }

    /// Print a success message
    pub fn print_success(&self, text: &str) {
        println!("{} {}", "✓".bright_green(), text.bright_white());
    }

    /// Print an error message
    pub fn print_error(&self, text: &str) {
        println!("{} {}", "✗".bright_red(), text.bright_red());
    }

    /// Print a warning message
    pub fn print_warning(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow(), text.yellow());
    }

    /// Print an info message
    pub fn print_info(&self, text: &str) {
        println!("{} {}", "ℹ".bright_blue(), text);
    }

    /// Transient notification, shown once
    pub fn print_toast(&self, text: &str) {
        println!("{}", format!(" {} ", text).black().on_bright_yellow());
    }

    /// Print the current wizard step
    pub fn print_step(&self, view: &WizardView, ui: UiText) {
        println!();
        println!(
            "{}  {}",
            view.title.bright_cyan().bold(),
            view.progress.dimmed()
        );

        let hint = match view.kind {
            StepKind::Date => " (YYYY-MM-DD)",
            StepKind::Time => " (HH:MM)",
            StepKind::Number => " (/+ /-)",
            StepKind::Text => "",
        };
        println!("  {}{}", view.label.bright_white(), hint.dimmed());

        if !view.value.is_empty() {
            println!("  {} {}", "›".bright_green(), view.value);
        } else if let Some(placeholder) = view.placeholder {
            println!("  {} {}", "›".dimmed(), placeholder.dimmed().italic());
        }

        if let Some(error) = &view.error {
            println!("  {} {}", "✗".bright_red(), error.bright_red());
            if view.can_retry {
                println!("  {} {}", "↻".bright_yellow(), ui.retry_booking().yellow());
            }
        }
        if view.listening {
            println!("  {}", view.voice_label.bright_magenta());
        }

        let back = if view.can_go_back {
            format!("/back {}", ui.back())
        } else {
            String::new()
        };
        println!(
            "  {}  {}  {}",
            format!("/next {}", view.primary_label).bright_green(),
            back.dimmed(),
            format!("/cancel {}", ui.cancel()).dimmed()
        );
    }

    /// Print the booking confirmation with its follow-up actions
    pub fn print_confirmation(&self, confirmation: &Confirmation, ui: UiText) {
        self.print_header(ui.booking_confirmed_spoken());
        for line in confirmation.text.lines() {
            println!("  {}", line);
        }
        self.print_actions(&confirmation.actions);
        if let Some(qr) = &confirmation.qr_url {
            println!("  {} {}", ui.scan_to_continue().dimmed(), qr.underline());
        }
        println!();
    }

    /// Print a failed submission with the retry action
    pub fn print_failure(&self, notice: &FailureNotice) {
        self.print_toast(&notice.reason);
        println!();
        for line in notice.text.lines() {
            println!("  {}", line.yellow());
        }
        self.print_actions(&notice.actions);
    }

    fn print_actions(&self, actions: &[FollowUpAction]) {
        for action in actions {
            match action {
                FollowUpAction::OpenLink { label, url }
                | FollowUpAction::OpenCalendar { label, url } => {
                    println!("  {} {}", label.bright_cyan(), url.underline());
                }
                FollowUpAction::RetryBooking { label } => {
                    println!("  {} {}", label.bright_yellow(), "/retry".dimmed());
                }
            }
        }
    }
}
