//! A simple program demonstrates how to use `museo` as a library.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use museo::SessionBuilder;
use museo::core::conversation::Role;
use museo::core::render::{RenderedContent, RenderedMessage, Segment};
use museo::core::{Notice, Presence};
use museo_http_provider::{HttpAssistantConfigBuilder, HttpAssistantProvider};
use owo_colors::OwoColorize;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::interval;

enum SessionEvent {
    Render(Vec<RenderedMessage>),
    Notice(Notice),
    Input(String),
    CloseRequested,
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = HttpAssistantConfigBuilder::default();
    if let Ok(base_url) = env::var("MUSEO_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    if let Ok(ask_path) = env::var("MUSEO_ASK_PATH") {
        config = config.with_ask_path(ask_path);
    }
    if let Ok(timeout) = env::var("MUSEO_TIMEOUT_SECS") {
        let Ok(secs) = timeout.parse() else {
            eprintln!("MUSEO_TIMEOUT_SECS must be a number of seconds");
            return;
        };
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let config = config.build();
    info!("asking {}", config.ask_url());
    let provider = HttpAssistantProvider::new(config);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut session = SessionBuilder::with_assistant_provider(provider)
        .on_render({
            let event_tx = event_tx.clone();
            move |messages| {
                event_tx.send(SessionEvent::Render(messages.to_vec())).ok();
            }
        })
        .on_input({
            let event_tx = event_tx.clone();
            move |input| {
                event_tx.send(SessionEvent::Input(input.to_owned())).ok();
            }
        })
        .on_notice({
            let event_tx = event_tx.clone();
            move |notice| {
                event_tx.send(SessionEvent::Notice(notice)).ok();
            }
        })
        .on_close({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(SessionEvent::CloseRequested).ok();
            }
        })
        .build();

    let mut line_rx = spawn_line_reader();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut progress_bar: Option<ProgressBar> = None;
    let mut ticker = interval(Duration::from_millis(100));

    let mut printer = TranscriptPrinter::default();

    session.set_open(true);
    print_launcher(session.glyph().symbol(), true);

    loop {
        select! {
            line = line_rx.recv() => {
                let Some(line) = line else {
                    break;
                };
                if let Some(progress_bar) = progress_bar.take() {
                    progress_bar.finish_and_clear();
                }
                match line.trim() {
                    "/quit" => break,
                    "/open" => {
                        if !session.is_open() {
                            printer.start_over();
                        }
                        session.set_open(true);
                        print_launcher(session.glyph().symbol(), true);
                    }
                    "/close" => session.request_close(),
                    "/voice" => session.start_voice_capture(),
                    _ if !session.is_open() => {
                        println!("The chat is closed. Type /open to open it.");
                    }
                    "" => session.submit(),
                    line => session.send_message(line),
                }
            }
            event = event_rx.recv() => {
                let Some(event) = event else {
                    break;
                };

                // Finish the progress bar before printing anything else.
                if let Some(progress_bar) = progress_bar.take() {
                    progress_bar.finish_and_clear();
                }

                match event {
                    SessionEvent::Render(messages) => {
                        for message in printer.unseen(&messages) {
                            if message.role == Role::Assistant {
                                print_assistant_message(message);
                            }
                        }
                    }
                    SessionEvent::Notice(notice) => {
                        println!(
                            "{}⚠️  {}",
                            BAR_CHAR.bright_yellow(),
                            notice.bright_white()
                        );
                    }
                    SessionEvent::Input(input) => {
                        if !input.is_empty() {
                            println!(
                                "{}🎤 {} {}",
                                BAR_CHAR.bright_magenta(),
                                strip_controls(&input).bright_white(),
                                "(press Enter to send)".dimmed()
                            );
                        }
                    }
                    SessionEvent::CloseRequested => {
                        if session.is_open() {
                            printer.start_over();
                        }
                        session.set_open(false);
                        print_launcher(session.glyph().symbol(), false);
                    }
                }
            }
            _ = ticker.tick() => {}
        }

        let awaiting = match session.snapshot().await {
            Ok(snapshot) => {
                snapshot.presence == Presence::Open
                    && snapshot.awaiting_answers > 0
            }
            Err(err) => {
                error!("widget is gone: {err}");
                break;
            }
        };
        if awaiting {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("🏛️  Looking it up...");
                    progress_bar
                })
                .inc(1);
        } else if let Some(progress_bar) = progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

/// Reads stdin on a dedicated thread, so that quitting never waits for a
/// pending read.
fn spawn_line_reader() -> mpsc::UnboundedReceiver<String> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    error!("error reading input: {}", err);
                    break;
                }
            }
        }
    });
    line_rx
}

/// Tracks which transcript messages are already on screen.
#[derive(Default)]
struct TranscriptPrinter {
    printed: usize,
}

impl TranscriptPrinter {
    /// Forgets the printed messages; the next render is a new transcript.
    #[inline]
    fn start_over(&mut self) {
        self.printed = 0;
    }

    /// Returns the messages not printed yet and marks them as printed.
    fn unseen<'a>(
        &mut self,
        messages: &'a [RenderedMessage],
    ) -> &'a [RenderedMessage] {
        let start = self.printed.min(messages.len());
        self.printed = messages.len();
        &messages[start..]
    }
}

fn print_launcher(symbol: &str, open: bool) {
    let hint = if open {
        "Ask anything, or type /voice, /close, /quit."
    } else {
        "Type /open to chat again, or /quit."
    };
    println!("\n{} {}", symbol.bold(), hint.dimmed());
    std::io::stdout().flush().ok();
}

fn print_assistant_message(message: &RenderedMessage) {
    let mut line = String::new();
    match &message.content {
        RenderedContent::Text(text) => line.push_str(&strip_controls(text)),
        RenderedContent::Markup(html) => {
            for segment in html.segments() {
                match segment {
                    Segment::Text(text) => line.push_str(&strip_controls(&text)),
                    Segment::Link { href, text } => {
                        let label = strip_controls(&text);
                        let href = strip_controls(&href);
                        line.push_str(&format!(
                            "{} ({})",
                            label.underline(),
                            href.bright_blue()
                        ));
                    }
                }
            }
        }
    }
    println!("{}🤖 {}", BAR_CHAR.bright_cyan(), line.bright_white());
}

/// Keeps the answer from moving the cursor or recoloring the terminal.
#[inline]
fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}
