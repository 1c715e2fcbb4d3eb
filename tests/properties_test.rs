use proptest::prelude::*;

use riptables_save::iptparser;

fn token() -> impl Strategy<Value=&'static str> {
  prop::sample::select(vec![
    "-s", "-p", "-m", "-j", "--tcp-flags", "--comment", "!", "tcp", "1.1.1.1/32", "ACCEPT", "SYN",
  ])
}

proptest! {
  #[test]
  fn one_unit_per_switch(rest in prop::collection::vec(token(), 0..24)) {
    let mut tokens = vec!["-A", "INPUT"];
    tokens.extend(rest);

    let units = iptparser::group_switches(&tokens).unwrap();
    let switches = tokens.iter().filter(|token| token.starts_with('-')).count();
    prop_assert_eq!(units.iter().filter(|unit| unit.switch.is_some()).count(), switches);

    let rule = iptparser::build_rule(&units).unwrap();
    prop_assert_eq!(rule.chain, "INPUT");
    let matches = units.iter().filter(|unit| unit.name() == Some("m")).count();
    prop_assert_eq!(rule.matches.len(), matches);
  }

  #[test]
  fn negation_binds_next_switch(rest in prop::collection::vec(token(), 0..24)) {
    let mut tokens = vec!["-A", "INPUT"];
    tokens.extend(rest);

    let units = iptparser::group_switches(&tokens).unwrap();
    let negated = tokens.windows(2)
      .filter(|pair| pair[0] == "!" && pair[1].starts_with('-'))
      .count();
    prop_assert_eq!(units.iter().filter(|unit| unit.negate && unit.switch.is_some()).count(), negated);
  }

  #[test]
  fn shellsplit_reads_back_quoted_words(words in prop::collection::vec("[a-zA-Z0-9./:! \"-]{0,8}", 0..8)) {
    let line = words.iter()
      .map(|word| format!("'{}'", word))
      .collect::<Vec<_>>()
      .join(" ");
    prop_assert_eq!(iptparser::shellsplit(&line).unwrap(), words);
  }
}
