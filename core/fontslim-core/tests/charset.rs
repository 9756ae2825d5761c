use std::collections::HashSet;
use std::fs;

use fontslim_core::charset::{dedup_chars, write_keep_set, CharOrder, KeepSet};
use proptest::prelude::*;

#[test]
fn merged_sample_yields_expected_membership() {
    let merged = "<p>A</p>\n\n<p>B</p>\n\n";
    let set = KeepSet::from_text(merged);

    let expected: HashSet<char> = ['<', 'p', '>', 'A', 'B', '/', '\n'].into_iter().collect();
    let found: HashSet<char> = set.chars().collect();
    assert_eq!(found, expected);
}

#[test]
fn write_keep_set_round_trips_through_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("output_unique.txt");
    let output = temp.path().join("word.txt");
    fs::write(&input, "héllo\nwörld\n").unwrap();

    let rendered = write_keep_set(&input, &output, CharOrder::FirstOccurrence, &[])
        .expect("keep set")
        .expect("non-empty");

    assert_eq!(rendered, "hélo\nwörd");
    assert_eq!(fs::read_to_string(&output).unwrap(), rendered);
}

#[test]
fn extra_characters_are_added_once() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("output_unique.txt");
    let output = temp.path().join("word.txt");
    fs::write(&input, "ab").unwrap();

    let rendered = write_keep_set(&input, &output, CharOrder::FirstOccurrence, &['b', '0', '1'])
        .expect("keep set")
        .expect("non-empty");

    assert_eq!(rendered, "ab01");
}

#[test]
fn whitespace_only_keep_set_is_not_written() {
    let temp = tempfile::tempdir().expect("tempdir");
    let input = temp.path().join("output_unique.txt");
    let output = temp.path().join("word.txt");
    fs::write(&input, " \n\n\t").unwrap();

    let rendered = write_keep_set(&input, &output, CharOrder::FirstOccurrence, &[])
        .expect("keep set");

    assert!(rendered.is_none());
    assert!(!output.exists());
}

#[test]
fn missing_input_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let result = write_keep_set(
        &temp.path().join("nope.txt"),
        &temp.path().join("word.txt"),
        CharOrder::FirstOccurrence,
        &[],
    );
    assert!(result.is_err());
}

#[test]
fn legacy_order_puts_characters_missing_from_last_line_first() {
    let rendered = dedup_chars("<p>A</p>\n\n<p>B</p>\n\n", CharOrder::LegacyLastLine);
    // the last line read is "\n", so every other character keys to -1
    assert_eq!(rendered, "<p>A/B\n");
}

proptest! {
    #[test]
    fn every_character_appears_exactly_once(text in "\\PC{0,64}") {
        for order in [CharOrder::FirstOccurrence, CharOrder::LegacyLastLine] {
            let rendered = dedup_chars(&text, order);
            let rendered_chars: Vec<char> = rendered.chars().collect();
            let unique: HashSet<char> = rendered_chars.iter().copied().collect();
            let input: HashSet<char> = text.chars().collect();

            prop_assert_eq!(rendered_chars.len(), unique.len());
            prop_assert_eq!(unique, input);
        }
    }

    #[test]
    fn first_occurrence_matches_a_seen_guard(text in "[a-d\n]{0,40}") {
        let mut seen = HashSet::new();
        let expected: String = text.chars().filter(|c| seen.insert(*c)).collect();
        prop_assert_eq!(dedup_chars(&text, CharOrder::FirstOccurrence), expected);
    }
}
