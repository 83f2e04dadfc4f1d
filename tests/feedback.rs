//! Feedback log persistence tests

use murmur_agent::FeedbackLog;
use murmur_agent::session::SEPARATOR_WIDTH;

#[test]
fn record_block_format_is_exact() {
    let mut log = FeedbackLog::new();
    log.record(
        "what time is it".to_string(),
        "It is noon.".to_string(),
        "yes".to_string(),
    );

    let separator = "-".repeat(SEPARATOR_WIDTH);
    assert_eq!(
        log.render(),
        format!("Prompt: what time is it\nResponse: It is noon.\nFeedback: yes\n{separator}\n")
    );
}

#[test]
fn separator_lines_are_fifty_dashes() {
    let mut log = FeedbackLog::new();
    log.record("a".to_string(), "b".to_string(), "c".to_string());
    log.record("d".to_string(), "e".to_string(), "f".to_string());

    let rendered = log.render();
    let separators: Vec<&str> = rendered
        .lines()
        .filter(|l| l.starts_with('-'))
        .collect();

    assert_eq!(separators.len(), 2);
    for line in separators {
        assert_eq!(line.len(), 50);
        assert!(line.chars().all(|c| c == '-'));
    }
}

#[test]
fn saved_file_holds_one_block_per_turn_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let mut log = FeedbackLog::new();
    for i in 0..3 {
        log.record(format!("prompt {i}"), format!("response {i}"), "yes".to_string());
    }

    log.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let blocks: Vec<&str> = content
        .split(&format!("{}\n", "-".repeat(SEPARATOR_WIDTH)))
        .filter(|b| !b.is_empty())
        .collect();

    assert_eq!(blocks.len(), 3);
    for (i, block) in blocks.iter().enumerate() {
        assert!(block.starts_with(&format!("Prompt: prompt {i}\n")));
        assert!(block.contains(&format!("Response: response {i}\n")));
    }
}

#[test]
fn save_overwrites_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback_log.txt");

    let mut first = FeedbackLog::new();
    for i in 0..5 {
        first.record(format!("p{i}"), "r".to_string(), "yes".to_string());
    }
    first.save(&path).unwrap();

    let mut second = FeedbackLog::new();
    second.record("only".to_string(), "one".to_string(), "no".to_string());
    second.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("Prompt:").count(), 1);
    assert!(content.starts_with("Prompt: only\n"));
}

#[test]
fn save_to_unwritable_path_errors() {
    let log = FeedbackLog::new();
    let result = log.save(std::path::Path::new(
        "/nonexistent-murmur-test/feedback_log.txt",
    ));
    assert!(result.is_err());
}

#[test]
fn feedback_text_is_stored_verbatim() {
    let mut log = FeedbackLog::new();
    log.record(
        "p".to_string(),
        "r".to_string(),
        "  Absolutely not!! 🤖  ".to_string(),
    );
    assert_eq!(log.turns()[0].feedback, "  Absolutely not!! 🤖  ");
}
