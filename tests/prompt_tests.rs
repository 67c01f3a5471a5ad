use series_sketch::error::SketchError;
use series_sketch::prompt::{PromptRequest, Prompter};
use std::io::Cursor;

fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn output(prompter: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    let (_, output) = prompter.into_inner();
    String::from_utf8(output).expect("utf-8 output")
}

#[test]
fn empty_answer_falls_back_to_the_default() {
    let mut prompter = prompter("\n");
    let answer = prompter
        .response(PromptRequest::new("Period: ").with_default("5min"))
        .expect("answer");

    assert_eq!(answer, "5min");
    assert_eq!(output(prompter), "Period: ");
}

#[test]
fn required_prompts_repeat_until_something_is_entered() {
    let mut prompter = prompter("\n  \nload\n");
    let answer = prompter
        .response(PromptRequest::new("Name: ").required())
        .expect("answer");

    assert_eq!(answer, "load");
    assert_eq!(
        output(prompter).matches("You must provide a response").count(),
        2
    );
}

#[test]
fn conditions_reject_answers_until_one_passes() {
    let mut prompter = prompter("abc\n-3\n7\n");
    let answer = prompter
        .response_where(PromptRequest::new("Y min: "), |raw| raw.parse::<f64>().is_ok_and(|n| n > 0.0))
        .expect("answer");

    assert_eq!(answer, "7");
    assert_eq!(
        output(prompter)
            .matches("Response did not meet conditions")
            .count(),
        2
    );
}

#[test]
fn closed_input_is_an_error() {
    let mut prompter = prompter("");
    assert!(matches!(
        prompter.response(PromptRequest::new("Name: ")),
        Err(SketchError::InputClosed)
    ));
}

#[test]
fn attempt_cap_stops_endless_retries() {
    let mut prompter = prompter("a\nb\nc\n").with_max_attempts(2);
    let result = prompter.response_where(PromptRequest::new("Pick: "), |raw| raw == "c");

    assert!(matches!(result, Err(SketchError::InvalidData(_))));
}

#[test]
fn only_y_means_yes() {
    let mut prompter = prompter("Y\nyes\nn\n");
    assert!(prompter.ask_yes_no("Again? ").expect("first"));
    assert!(!prompter.ask_yes_no("Again? ").expect("second"));
    assert!(!prompter.ask_yes_no("Again? ").expect("third"));
}
