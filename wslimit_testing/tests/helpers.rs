//! Tests for the fragment builders.

use rstest::rstest;
use wslimit::Fragment;
use wslimit_testing::{binary_fragments, text_fragments};

#[rstest]
#[case("TEST1", 2, vec![Fragment::text("TE", false), Fragment::text("ST", false), Fragment::text("1", true)])]
#[case("TEST1", 5, vec![Fragment::text("TEST1", true)])]
#[case("", 3, vec![Fragment::text("", true)])]
#[case("ééé", 2, vec![Fragment::text("éé", false), Fragment::text("é", true)])]
fn text_is_split_on_characters(
    #[case] text: &str,
    #[case] chunk: usize,
    #[case] expected: Vec<Fragment>,
) {
    assert_eq!(text_fragments(text, chunk), expected);
}

#[test]
fn binary_split_marks_only_last_final() {
    let fragments = binary_fragments(&[1, 2, 3, 4, 5], 2);
    let flags: Vec<bool> = fragments.iter().map(Fragment::is_final).collect();
    assert_eq!(flags, [false, false, true]);
}
