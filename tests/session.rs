//! Interaction loop integration tests
//!
//! Drives the session end-to-end with scripted capabilities: no audio
//! hardware, no model process, no terminal.

use std::cell::RefCell;
use std::rc::Rc;

use murmur_agent::voice::RecognitionError;
use murmur_agent::{
    FALLBACK_RESPONSE, InputChannel, NOT_UNDERSTOOD_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE, Session,
    VoiceInput,
};

mod common;

use common::{
    CannedAudioSource, CapturingRunner, FailingRunner, FailingSpeaker, RecordingSpeaker,
    ScriptedPrompter, ScriptedRecognizer, test_config,
};

fn voice_input(results: Vec<Result<String, RecognitionError>>) -> VoiceInput {
    VoiceInput {
        audio: Box::new(CannedAudioSource),
        recognizer: Box::new(ScriptedRecognizer::new(results)),
    }
}

#[tokio::test]
async fn completed_turns_then_exit_persist_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let prompts = Rc::new(RefCell::new(Vec::new()));
    let spoken = Rc::new(RefCell::new(Vec::new()));

    let prompter = ScriptedPrompter::keyboard(
        vec!["hello", "how are you", "exit"],
        vec!["yes", "no"],
    );
    let runner = CapturingRunner::new(Rc::clone(&prompts), "Hi!");
    let speaker = RecordingSpeaker::new(Rc::clone(&spoken));

    let mut session = Session::new(
        test_config(path.clone()),
        Box::new(prompter),
        Box::new(runner),
        Box::new(speaker),
        None,
    )
    .unwrap();

    session.run().await.unwrap();

    // In-memory log holds one record per completed turn, in order
    assert_eq!(session.feedback().len(), 2);
    assert_eq!(session.feedback().turns()[0].prompt, "hello");
    assert_eq!(session.feedback().turns()[0].feedback, "yes");
    assert_eq!(session.feedback().turns()[1].prompt, "how are you");
    assert_eq!(session.feedback().turns()[1].feedback, "no");

    // "exit" never reaches the model
    assert_eq!(*prompts.borrow(), vec!["hello", "how are you"]);

    // Both responses and the farewell were spoken, in order
    assert_eq!(*spoken.borrow(), vec!["Hi!", "Hi!", "Goodbye!"]);

    // Persisted file: two blocks, each closed by a 50-dash separator
    let content = std::fs::read_to_string(&path).unwrap();
    let separator = "-".repeat(50);
    assert_eq!(content.matches(&separator).count(), 2);
    assert!(content.starts_with("Prompt: hello\nResponse: Hi!\nFeedback: yes\n"));
    assert!(content.contains("Prompt: how are you\nResponse: Hi!\nFeedback: no\n"));
    assert!(content.ends_with(&format!("{separator}\n")));
}

#[tokio::test]
async fn exit_matching_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let prompts = Rc::new(RefCell::new(Vec::new()));
    let spoken = Rc::new(RefCell::new(Vec::new()));

    let prompter = ScriptedPrompter::keyboard(vec!["QUIT"], vec![]);
    let runner = CapturingRunner::new(Rc::clone(&prompts), "Hi!");
    let speaker = RecordingSpeaker::new(Rc::clone(&spoken));

    let mut session = Session::new(
        test_config(path.clone()),
        Box::new(prompter),
        Box::new(runner),
        Box::new(speaker),
        None,
    )
    .unwrap();

    session.run().await.unwrap();

    assert!(session.feedback().is_empty());
    assert!(prompts.borrow().is_empty());
    assert_eq!(*spoken.borrow(), vec!["Goodbye!"]);

    // A clean exit with zero turns still writes (an empty) log
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[tokio::test]
async fn model_failure_falls_back_and_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let spoken = Rc::new(RefCell::new(Vec::new()));

    let prompter = ScriptedPrompter::keyboard(vec!["hello", "exit"], vec!["no"]);
    let speaker = RecordingSpeaker::new(Rc::clone(&spoken));

    let mut session = Session::new(
        test_config(path),
        Box::new(prompter),
        Box::new(FailingRunner),
        Box::new(speaker),
        None,
    )
    .unwrap();

    session.run().await.unwrap();

    assert_eq!(session.feedback().len(), 1);
    assert_eq!(session.feedback().turns()[0].response, FALLBACK_RESPONSE);
}

#[tokio::test]
async fn activated_utterance_is_stripped_before_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let prompts = Rc::new(RefCell::new(Vec::new()));
    let spoken = Rc::new(RefCell::new(Vec::new()));

    let prompter = ScriptedPrompter::new(
        vec![InputChannel::Microphone, InputChannel::Keyboard],
        vec!["exit"],
        vec!["yes"],
    );
    let runner = CapturingRunner::new(Rc::clone(&prompts), "It is noon.");
    let speaker = RecordingSpeaker::new(Rc::clone(&spoken));
    let voice = voice_input(vec![Ok("jarvis what time is it".to_string())]);

    let mut session = Session::new(
        test_config(path),
        Box::new(prompter),
        Box::new(runner),
        Box::new(speaker),
        Some(voice),
    )
    .unwrap();

    session.run().await.unwrap();

    assert_eq!(*prompts.borrow(), vec!["what time is it"]);
    assert_eq!(session.feedback().turns()[0].prompt, "what time is it");
}

#[tokio::test]
async fn non_activated_utterance_reprompts_without_invoking_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let prompts = Rc::new(RefCell::new(Vec::new()));
    let spoken = Rc::new(RefCell::new(Vec::new()));

    // First turn: audio without the activation phrase — the loop asks
    // again instead of proceeding or crashing
    let prompter = ScriptedPrompter::new(
        vec![InputChannel::Microphone, InputChannel::Keyboard],
        vec!["exit"],
        vec![],
    );
    let runner = CapturingRunner::new(Rc::clone(&prompts), "Hi!");
    let speaker = RecordingSpeaker::new(Rc::clone(&spoken));
    let voice = voice_input(vec![Ok("what time is it".to_string())]);

    let mut session = Session::new(
        test_config(path),
        Box::new(prompter),
        Box::new(runner),
        Box::new(speaker),
        Some(voice),
    )
    .unwrap();

    session.run().await.unwrap();

    assert!(prompts.borrow().is_empty());
    assert!(session.feedback().is_empty());
}

#[tokio::test]
async fn recognition_failures_become_user_messages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let prompts = Rc::new(RefCell::new(Vec::new()));
    let spoken = Rc::new(RefCell::new(Vec::new()));

    let prompter = ScriptedPrompter::new(
        vec![
            InputChannel::Microphone,
            InputChannel::Microphone,
            InputChannel::Keyboard,
        ],
        vec!["exit"],
        vec!["no", "no"],
    );
    let runner = CapturingRunner::new(Rc::clone(&prompts), "Hmm.");
    let speaker = RecordingSpeaker::new(Rc::clone(&spoken));
    let voice = voice_input(vec![
        Err(RecognitionError::NotUnderstood),
        Err(RecognitionError::ServiceUnavailable("dns failure".to_string())),
    ]);

    let mut session = Session::new(
        test_config(path),
        Box::new(prompter),
        Box::new(runner),
        Box::new(speaker),
        Some(voice),
    )
    .unwrap();

    session.run().await.unwrap();

    // The substituted strings are treated as the user's message and are
    // forwarded to the model verbatim
    assert_eq!(
        *prompts.borrow(),
        vec![NOT_UNDERSTOOD_MESSAGE, SERVICE_UNAVAILABLE_MESSAGE]
    );
    assert_eq!(session.feedback().len(), 2);
    assert_eq!(session.feedback().turns()[0].prompt, NOT_UNDERSTOOD_MESSAGE);
    assert_eq!(
        session.feedback().turns()[1].prompt,
        SERVICE_UNAVAILABLE_MESSAGE
    );
}

#[tokio::test]
async fn spoken_exit_terminates_after_stripping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let prompts = Rc::new(RefCell::new(Vec::new()));
    let spoken = Rc::new(RefCell::new(Vec::new()));

    let prompter = ScriptedPrompter::new(vec![InputChannel::Microphone], vec![], vec![]);
    let runner = CapturingRunner::new(Rc::clone(&prompts), "Hi!");
    let speaker = RecordingSpeaker::new(Rc::clone(&spoken));
    let voice = voice_input(vec![Ok("Jarvis exit".to_string())]);

    let mut session = Session::new(
        test_config(path),
        Box::new(prompter),
        Box::new(runner),
        Box::new(speaker),
        Some(voice),
    )
    .unwrap();

    session.run().await.unwrap();

    assert!(prompts.borrow().is_empty());
    assert_eq!(*spoken.borrow(), vec!["Goodbye!"]);
}

#[tokio::test]
async fn playback_failure_does_not_abort_the_turn() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let prompter = ScriptedPrompter::keyboard(vec!["hello", "exit"], vec!["yes"]);

    let mut session = Session::new(
        test_config(path),
        Box::new(prompter),
        Box::new(FailingRunner),
        Box::new(FailingSpeaker),
        None,
    )
    .unwrap();

    session.run().await.unwrap();
    assert_eq!(session.feedback().len(), 1);
}

#[tokio::test]
async fn persistence_failure_is_reported_not_raised() {
    // Point the log at a directory that does not exist
    let path = std::path::PathBuf::from("/nonexistent-murmur-test/feedback_log.txt");

    let spoken = Rc::new(RefCell::new(Vec::new()));
    let prompter = ScriptedPrompter::keyboard(vec!["exit"], vec![]);
    let speaker = RecordingSpeaker::new(Rc::clone(&spoken));

    let mut session = Session::new(
        test_config(path),
        Box::new(prompter),
        Box::new(FailingRunner),
        Box::new(speaker),
        None,
    )
    .unwrap();

    // The write fails; the session still exits cleanly
    session.run().await.unwrap();
    assert_eq!(*spoken.borrow(), vec!["Goodbye!"]);
}
