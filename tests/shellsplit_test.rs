use rstest::rstest;

use riptables_save::error::RIPTAnalysisError;
use riptables_save::iptparser;

#[rstest]
#[case::basic(
  "-A INPUT -s 1.1.1.2/32 -j CHECKSUM --checksum-fill \n",
  &["-A", "INPUT", "-s", "1.1.1.2/32", "-j", "CHECKSUM", "--checksum-fill"]
)]
#[case::with_negation(
  "-A INPUT -s 1.1.1.1/32 -p tcp -m tos ! --tos 0x05/0x06 \n",
  &["-A", "INPUT", "-s", "1.1.1.1/32", "-p", "tcp", "-m", "tos", "!", "--tos", "0x05/0x06"]
)]
#[case::with_quotes(
  "-A INPUT -p sctp -m string ! --string \"00BBCC\" --algo bm --to 65535 \n",
  &["-A", "INPUT", "-p", "sctp", "-m", "string", "!", "--string", "00BBCC", "--algo", "bm", "--to", "65535"]
)]
#[case::with_spaced_quotes(
  "-A INPUT -p tcp -m comment --comment \"000 foo\" -j ACCEPT \n",
  &["-A", "INPUT", "-p", "tcp", "-m", "comment", "--comment", "000 foo", "-j", "ACCEPT"]
)]
#[case::no_trailing_space(
  "-A INPUT -s 1.1.1.2/32 -j CHECKSUM --checksum-fill",
  &["-A", "INPUT", "-s", "1.1.1.2/32", "-j", "CHECKSUM", "--checksum-fill"]
)]
#[case::adjacent_pieces("foo\"bar baz\"qux", &["foobar bazqux"])]
#[case::single_quotes_literal("'a \\\"b' c", &["a \\\"b", "c"])]
#[case::double_quote_escapes("\"a \\\"b\\\\\"", &["a \"b\\"])]
#[case::bare_escape("a\\ b c", &["a b", "c"])]
#[case::empty_quotes("-m comment --comment \"\"", &["-m", "comment", "--comment", ""])]
#[case::repeated_whitespace("  -A\t\tINPUT   -j  DROP  ", &["-A", "INPUT", "-j", "DROP"])]
#[case::trailing_backslash("a \\", &["a", "\\"])]
#[case::trailing_backslash_joins("-A INPUT --comment x\\", &["-A", "INPUT", "--comment", "x\\"])]
#[case::unicode_space_is_part_of_word("--comment a\u{a0}b", &["--comment", "a\u{a0}b"])]
#[case::vertical_tab_separates("a\x0bb", &["a", "b"])]
#[case::empty("", &[])]
fn test_shellsplit(#[case] input: &str, #[case] expected: &[&str]) {
  let tokens = iptparser::shellsplit(input).unwrap();
  assert_eq!(tokens, expected);
}

#[rstest]
#[case::double("-A INPUT -m comment --comment \"000 foo", '"')]
#[case::double_trailing_escape("--comment \"foo\\", '"')]
#[case::single("-A INPUT -m comment --comment '000 foo", '\'')]
fn test_shellsplit_unmatched_quote(#[case] input: &str, #[case] expected: char) {
  match iptparser::shellsplit(input) {
    Err(RIPTAnalysisError::UnmatchedQuote { quote }) => assert_eq!(quote, expected),
    other => panic!("expected an unmatched quote, got {:?}", other),
  }
}
