use call_nope::engine::{Classification, Classifier, RuleSet};
use std::sync::Arc;

fn classifier_with(lines: &[&str]) -> Arc<Classifier> {
    Classifier::new(RuleSet::parse(lines.iter().copied()))
}

fn is_spam(classification: Classification) {
    assert_eq!(Classification::Spam, classification);
}

fn is_ham(classification: Classification) {
    assert_eq!(Classification::Ham, classification);
}

fn is_undecided(classification: Classification) {
    assert_eq!(Classification::Unknown, classification);
}

#[test]
fn should_classify_ham_and_spam() {
    let classifier = classifier_with(&["[spam]", "123", "5*", "[ham]", "9NN"]);

    is_spam(classifier.classify("123"));
    is_undecided(classifier.classify("1234"));
    is_undecided(classifier.classify("124"));
    is_undecided(classifier.classify("12"));
    is_undecided(classifier.classify("0123"));

    is_spam(classifier.classify("5"));
    is_spam(classifier.classify("55"));
    is_spam(classifier.classify("5555555555"));
    is_spam(classifier.classify("5123"));
    is_undecided(classifier.classify("65555"));

    is_ham(classifier.classify("911"));
    is_ham(classifier.classify("955"));
    is_undecided(classifier.classify("9"));
    is_undecided(classifier.classify("91"));
    is_undecided(classifier.classify("9111"));
}

#[test]
fn should_process_sections_in_different_order() {
    let classifier = classifier_with(&["[ham]", "123", "[spam]", "456"]);

    is_ham(classifier.classify("123"));
    is_spam(classifier.classify("456"));
    is_undecided(classifier.classify("789"));
}

#[test]
fn should_prioritize_ham_if_number_matches_both() {
    let classifier = classifier_with(&["[spam]", "123", "[ham]", "123"]);

    is_ham(classifier.classify("123"));
}

#[test]
fn should_treat_unmarked_entries_as_spam() {
    let classifier = classifier_with(&["123"]);

    is_spam(classifier.classify("123"));
}

#[test]
fn should_ignore_non_pattern_characters() {
    let classifier = classifier_with(&["1-2.3 N myFriend"]);

    is_spam(classifier.classify("1234"));
}

#[test]
fn should_return_unknown_without_any_patterns() {
    let classifier = classifier_with(&[]);

    is_undecided(classifier.classify("123"));
    is_undecided(classifier.classify(""));
}

#[test]
fn reinstalling_an_unchanged_rule_set_classifies_identically() {
    let lines = ["[spam]", "123", "5*", "[ham]", "9NN"];
    let classifier = classifier_with(&lines);

    let inputs = ["123", "1234", "5", "5555555555", "911", "9", "9111", ""];
    let before: Vec<_> = inputs.iter().map(|i| classifier.classify(i)).collect();

    classifier.install(RuleSet::parse(lines.iter().copied()));

    let after: Vec<_> = inputs.iter().map(|i| classifier.classify(i)).collect();
    assert_eq!(before, after);
}

#[test]
fn list_patterns_round_trips_raw_text() {
    let classifier = classifier_with(&["[spam]", "0800 *", "[ham]", "1-2.3 N myFriend"]);

    assert_eq!(
        classifier.list_patterns(),
        vec!["[spam]", "0800 *", "[ham]", "1-2.3 N myFriend"]
    );
}
