use std::time::Duration;

use museo_model::RecognitionConfig;
use museo_test_provider::{
    FakeSpeechRecognizer, PresetReply, ScriptedAssistantProvider,
};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, timeout};

use crate::conversation::Role;
use crate::render::{RenderedContent, RenderedMessage};
use crate::sanitizer::sanitize;
use crate::{
    CONNECTIVITY_ERROR_TEXT, DEFAULT_GREETING, Notice, Presence,
    SERVER_ERROR_TEXT, Widget, WidgetBuilder,
};

struct Harness {
    widget: Widget,
    rendered_rx: watch::Receiver<Vec<RenderedMessage>>,
    notice_rx: mpsc::UnboundedReceiver<Notice>,
    input_rx: mpsc::UnboundedReceiver<String>,
    close_rx: mpsc::UnboundedReceiver<()>,
}

impl Harness {
    fn new(builder: WidgetBuilder) -> Self {
        let (rendered_tx, rendered_rx) = watch::channel(Vec::new());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = mpsc::unbounded_channel();
        let widget = builder
            .on_render(move |messages| {
                rendered_tx.send(messages.to_vec()).ok();
            })
            .on_notice(move |notice| {
                notice_tx.send(notice).ok();
            })
            .on_input(move |input| {
                input_tx.send(input.to_owned()).ok();
            })
            .on_close(move || {
                close_tx.send(()).ok();
            })
            .build();
        Self {
            widget,
            rendered_rx,
            notice_rx,
            input_rx,
            close_rx,
        }
    }

    fn with_provider(provider: ScriptedAssistantProvider) -> Self {
        Self::new(WidgetBuilder::with_assistant_provider(provider))
    }

    async fn wait_for_rendered(&mut self, len: usize) -> Vec<RenderedMessage> {
        timeout(
            Duration::from_millis(500),
            self.rendered_rx.wait_for(|messages| messages.len() == len),
        )
        .await
        .unwrap()
        .unwrap()
        .clone()
    }

    fn send(&self, text: &str) {
        self.widget.update_input(text);
        self.widget.submit();
    }
}

fn markup(message: &RenderedMessage) -> &str {
    match &message.content {
        RenderedContent::Markup(markup) => markup.as_str(),
        RenderedContent::Text(text) => {
            panic!("expected assistant markup, got text {text:?}")
        }
    }
}

fn hello_provider() -> ScriptedAssistantProvider {
    let mut provider = ScriptedAssistantProvider::default();
    provider.add_reply("Hello", PresetReply::answer("Hi!"));
    provider
}

#[tokio::test]
async fn test_open_seeds_greeting() {
    let mut harness = Harness::with_provider(hello_provider());

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.presence, Presence::Closed);
    assert!(snapshot.transcript.is_empty());

    harness.widget.open();
    let rendered = harness.wait_for_rendered(1).await;
    assert_eq!(rendered[0].role, Role::Assistant);
    assert_eq!(markup(&rendered[0]), DEFAULT_GREETING);

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.presence, Presence::Open);
    assert_eq!(snapshot.transcript.len(), 1);
}

#[tokio::test]
async fn test_reopen_starts_over() {
    let mut harness = Harness::new(
        WidgetBuilder::with_assistant_provider(hello_provider())
            .with_greeting("Welcome to the museum!"),
    );
    harness.widget.open();
    harness.send("Hello");
    harness.wait_for_rendered(3).await;

    harness.widget.update_input("half-typed");
    harness.widget.close();
    harness.widget.open();

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.transcript.len(), 1);
    let seed = &snapshot.transcript.messages()[0];
    assert_eq!(seed.role(), Role::Assistant);
    assert_eq!(seed.text(), "Welcome to the museum!");
    assert_eq!(snapshot.pending_input, "");
}

#[tokio::test]
async fn test_setting_same_flag_is_noop() {
    let mut harness = Harness::with_provider(hello_provider());
    harness.widget.open();
    harness.send("Hello");
    harness.wait_for_rendered(3).await;

    harness.widget.set_open(true);
    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.transcript.len(), 3);
}

#[tokio::test]
async fn test_blank_submission_is_ignored() {
    let harness = Harness::with_provider(hello_provider());
    harness.widget.open();
    harness.send("  ");

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.transcript.len(), 1);
    assert_eq!(snapshot.awaiting_answers, 0);
}

#[tokio::test]
async fn test_submission_while_closed_is_ignored() {
    let harness = Harness::with_provider(hello_provider());
    harness.send("Hello");

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert!(snapshot.transcript.is_empty());
    assert_eq!(snapshot.pending_input, "");
}

#[tokio::test(start_paused = true)]
async fn test_successful_answer() {
    let mut provider = ScriptedAssistantProvider::default();
    provider.add_reply(
        "Hello",
        PresetReply::answer("Hi!").with_delay(Duration::from_millis(20)),
    );
    let mut harness = Harness::with_provider(provider);
    harness.widget.open();
    harness.send("Hello");

    // The visitor's message is there before the answer arrives.
    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.transcript.len(), 2);
    let question = &snapshot.transcript.messages()[1];
    assert_eq!(question.role(), Role::User);
    assert_eq!(question.text(), "Hello");
    assert_eq!(snapshot.pending_input, "");
    assert_eq!(snapshot.awaiting_answers, 1);

    let rendered = harness.wait_for_rendered(3).await;
    assert_eq!(
        rendered[1].content,
        RenderedContent::Text("Hello".to_owned())
    );
    assert_eq!(rendered[2].role, Role::Assistant);
    assert_eq!(markup(&rendered[2]), sanitize("Hi!"));

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.awaiting_answers, 0);
}

#[tokio::test]
async fn test_user_text_is_kept_raw() {
    let mut provider = ScriptedAssistantProvider::default();
    provider.set_default_reply(PresetReply::answer("ok"));
    let mut harness = Harness::with_provider(provider);
    harness.widget.open();
    harness.send("  <b>Hello</b> ");

    let rendered = harness.wait_for_rendered(3).await;
    assert_eq!(
        rendered[1].content,
        RenderedContent::Text("  <b>Hello</b> ".to_owned())
    );
}

#[tokio::test]
async fn test_answer_is_sanitized_on_display() {
    let raw = "<b>Open</b> daily. <script>steal()</script>\
               Book <a href=\"https://t.example\" target=\"_blank\">here</a>";
    let mut provider = ScriptedAssistantProvider::default();
    provider.add_reply("Tickets?", PresetReply::answer(raw));
    let mut harness = Harness::with_provider(provider);
    harness.widget.open();
    harness.send("Tickets?");

    let rendered = harness.wait_for_rendered(3).await;
    assert_eq!(
        markup(&rendered[2]),
        "Open daily. Book <a href=\"https://t.example\" target=\"_blank\">here</a>"
    );

    // The transcript keeps what the assistant actually said.
    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.transcript.messages()[2].text(), raw);
}

#[tokio::test]
async fn test_server_error() {
    let mut provider = ScriptedAssistantProvider::default();
    provider.add_reply("Hello", PresetReply::server_error());
    provider.add_reply("Again", PresetReply::malformed());
    let mut harness = Harness::with_provider(provider);
    harness.widget.open();

    harness.send("Hello");
    let rendered = harness.wait_for_rendered(3).await;
    assert_eq!(markup(&rendered[2]), SERVER_ERROR_TEXT);

    // The conversation stays usable.
    harness.send("Again");
    let rendered = harness.wait_for_rendered(5).await;
    assert_eq!(markup(&rendered[4]), SERVER_ERROR_TEXT);
}

#[tokio::test]
async fn test_connectivity_error() {
    let mut provider = ScriptedAssistantProvider::default();
    provider.add_reply("Hello", PresetReply::unreachable());
    let mut harness = Harness::with_provider(provider);
    harness.widget.open();
    harness.send("Hello");

    let rendered = harness.wait_for_rendered(3).await;
    assert_eq!(markup(&rendered[2]), CONNECTIVITY_ERROR_TEXT);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_submissions_keep_order() {
    let mut provider = ScriptedAssistantProvider::default();
    provider.add_reply(
        "First",
        PresetReply::answer("Answer to first")
            .with_delay(Duration::from_millis(80)),
    );
    provider.add_reply(
        "Second",
        PresetReply::answer("Answer to second")
            .with_delay(Duration::from_millis(10)),
    );
    let mut harness = Harness::with_provider(provider);
    harness.widget.open();
    harness.send("First");
    harness.send("Second");

    let snapshot = harness.widget.snapshot().await.unwrap();
    let texts: Vec<_> = snapshot
        .transcript
        .messages()
        .iter()
        .map(|message| (message.role(), message.text()))
        .collect();
    assert_eq!(
        texts,
        [
            (Role::Assistant, DEFAULT_GREETING),
            (Role::User, "First"),
            (Role::User, "Second"),
        ]
    );
    assert_eq!(snapshot.awaiting_answers, 2);

    // Answers land in completion order, each carrying its own reply.
    let rendered = harness.wait_for_rendered(5).await;
    assert_eq!(markup(&rendered[3]), "Answer to second");
    assert_eq!(markup(&rendered[4]), "Answer to first");
}

#[tokio::test(start_paused = true)]
async fn test_answer_after_close_lands_in_hidden_transcript() {
    let mut provider = ScriptedAssistantProvider::default();
    provider.add_reply(
        "Hello",
        PresetReply::answer("Hi!").with_delay(Duration::from_millis(30)),
    );
    let mut harness = Harness::with_provider(provider);
    harness.widget.open();
    harness.send("Hello");
    harness.wait_for_rendered(2).await;
    harness.widget.close();

    sleep(Duration::from_millis(80)).await;
    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.presence, Presence::Closed);
    assert_eq!(snapshot.transcript.len(), 3);
    // Nothing is rendered while closed.
    assert_eq!(harness.rendered_rx.borrow().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_answer_after_reopen_is_dropped() {
    let mut provider = ScriptedAssistantProvider::default();
    provider.add_reply(
        "Hello",
        PresetReply::answer("Hi!").with_delay(Duration::from_millis(30)),
    );
    let harness = Harness::with_provider(provider);
    harness.widget.open();
    harness.send("Hello");
    harness.widget.close();
    harness.widget.open();

    sleep(Duration::from_millis(80)).await;
    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.transcript.len(), 1);
    assert_eq!(snapshot.awaiting_answers, 0);
}

#[tokio::test]
async fn test_request_close_only_notifies() {
    let mut harness = Harness::with_provider(hello_provider());
    harness.widget.open();
    harness.widget.request_close();

    timeout(Duration::from_millis(500), harness.close_rx.recv())
        .await
        .unwrap()
        .unwrap();
    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.presence, Presence::Open);
}

#[tokio::test]
async fn test_voice_capture_fills_input() {
    let recognizer = FakeSpeechRecognizer::succeeding("Where is the bronze gallery?");
    let mut harness = Harness::new(
        WidgetBuilder::with_assistant_provider(hello_provider())
            .with_speech_recognizer(recognizer.clone()),
    );
    harness.widget.open();
    // Cleared on open.
    assert_eq!(harness.input_rx.recv().await.unwrap(), "");

    harness.widget.start_voice_capture();
    let input = timeout(Duration::from_millis(500), harness.input_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(input, "Where is the bronze gallery?");

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.pending_input, "Where is the bronze gallery?");
    // Filling the input doesn't submit it.
    assert_eq!(snapshot.transcript.len(), 1);
    assert_eq!(recognizer.started_with(), [RecognitionConfig::default()]);
}

#[tokio::test]
async fn test_voice_capture_uses_configured_language() {
    let recognizer = FakeSpeechRecognizer::succeeding("vanakkam");
    let config = RecognitionConfig {
        language: "ta-IN".to_owned(),
        interim_results: false,
    };
    let mut harness = Harness::new(
        WidgetBuilder::with_assistant_provider(hello_provider())
            .with_speech_recognizer(recognizer.clone())
            .with_recognition_config(config.clone()),
    );
    harness.widget.open();
    harness.widget.start_voice_capture();
    harness.input_rx.recv().await.unwrap();
    harness.input_rx.recv().await.unwrap();

    assert_eq!(recognizer.started_with(), [config]);
}

#[tokio::test]
async fn test_voice_capture_without_recognizer() {
    let mut harness = Harness::with_provider(hello_provider());
    harness.widget.open();
    harness.widget.start_voice_capture();

    let notice = timeout(Duration::from_millis(500), harness.notice_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notice, Notice::VoiceUnavailable);
}

#[tokio::test]
async fn test_voice_capture_unavailable() {
    let recognizer = FakeSpeechRecognizer::unavailable();
    let mut harness = Harness::new(
        WidgetBuilder::with_assistant_provider(hello_provider())
            .with_speech_recognizer(recognizer.clone()),
    );
    harness.widget.open();
    harness.widget.start_voice_capture();

    let notice = timeout(Duration::from_millis(500), harness.notice_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notice, Notice::VoiceUnavailable);
    assert!(recognizer.started_with().is_empty());
}

#[tokio::test]
async fn test_voice_capture_error_keeps_input() {
    let mut harness = Harness::new(
        WidgetBuilder::with_assistant_provider(hello_provider())
            .with_speech_recognizer(FakeSpeechRecognizer::failing("no-speech")),
    );
    harness.widget.open();
    harness.widget.update_input("typed so far");
    harness.widget.start_voice_capture();

    let notice = timeout(Duration::from_millis(500), harness.notice_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notice.to_string(), "Voice recognition error: no-speech");

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.pending_input, "typed so far");
}

#[tokio::test(start_paused = true)]
async fn test_voice_transcript_for_stale_session_is_dropped() {
    let mut recognizer = FakeSpeechRecognizer::succeeding("Where is the cafe?");
    recognizer.set_delay(Duration::from_millis(50));
    let mut harness = Harness::new(
        WidgetBuilder::with_assistant_provider(hello_provider())
            .with_speech_recognizer(recognizer.clone()),
    );
    harness.widget.open();
    assert_eq!(harness.input_rx.recv().await.unwrap(), "");

    // Closed before recognition resolves.
    harness.widget.start_voice_capture();
    harness.widget.close();
    sleep(Duration::from_millis(100)).await;

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.presence, Presence::Closed);
    assert_eq!(snapshot.pending_input, "");
    assert!(harness.input_rx.try_recv().is_err());

    // Reopened before recognition resolves.
    harness.widget.open();
    assert_eq!(harness.input_rx.recv().await.unwrap(), "");
    harness.widget.start_voice_capture();
    harness.widget.close();
    harness.widget.open();
    assert_eq!(harness.input_rx.recv().await.unwrap(), "");
    sleep(Duration::from_millis(100)).await;

    let snapshot = harness.widget.snapshot().await.unwrap();
    assert_eq!(snapshot.presence, Presence::Open);
    assert_eq!(snapshot.pending_input, "");
    assert!(harness.input_rx.try_recv().is_err());
    assert_eq!(recognizer.started_with().len(), 2);
}
