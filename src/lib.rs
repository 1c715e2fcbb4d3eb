//! Decode `iptables-save` output into tables, chains and rules.
//!
//! ```text
//! *filter
//! :INPUT ACCEPT [0:0]
//! -A INPUT -p tcp -m comment --comment "000 foo" -j ACCEPT
//! COMMIT
//! ```
//!
//! becomes a [`Document`](rule/struct.Document.html) keyed by table then chain,
//! each rule carrying its parameters, matches, target and target options.

use tracing::{debug, trace};

use error::{RIPTAnalysisResult, RIPTError, RIPTResult};
use rule::{Archive, Document, RIPTRule, RuleRecord, Source, SwitchUnit};

pub mod error;
pub mod iptparser;
pub mod rule;


/// Decoder position carried from one line to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
  /// Last `*table` header seen.
  pub current_table: Option<String>,
  /// 0-based number of the line about to be read.
  pub line_number: usize,
}

/// Takes the output of iptables-save and returns the decoded document.
///
/// Fails on the first line that cannot be decoded.
///
/// # Example
///
/// ```rust
/// let document = riptables_save::decode("*filter\n-A INPUT -p tcp -j ACCEPT\nCOMMIT\n").unwrap();
/// let rules = document.chain("filter", "INPUT").unwrap();
/// assert_eq!(rules[0].rule.target, Some("ACCEPT".to_string()));
/// ```
pub fn decode<S: AsRef<str>>(text: S) -> RIPTResult<Document> {
  let mut document = Document::new();
  let mut state = ParserState::default();
  for line in text.as_ref().lines() {
    state = self::decode_step(state, line, &mut document)?;
  }
  Ok(document)
}

/// Decode a single line against `state`, returning the state for the next line.
pub fn decode_step(state: ParserState, line: &str, document: &mut Document) -> RIPTResult<ParserState> {
  let ParserState { mut current_table, line_number } = state;

  match iptparser::classify(line) {
    Archive::Table(table) => {
      debug!("found table [{}] on line [{}]", table, line_number);
      current_table = Some(table);
    }
    Archive::Append(chain) => {
      let table = match current_table {
        Some(ref table) => table,
        None => return Err(RIPTError::NoTableDeclared { line: line.to_string(), line_number }),
      };
      let (tokens, units, rule) = self::decode_line(line)
        .map_err(|err| err.at(line, line_number))?;
      debug!("append to [{}] chain [{}] on line [{}]", table, chain, line_number);
      document.push(table, RuleRecord {
        rule,
        tokens,
        units,
        source: Source {
          original_line: line.to_string(),
          line_number,
        },
      });
    }
    Archive::Policy(chain) => trace!("skipping policy of chain [{}] on line [{}]", chain, line_number),
    Archive::Commit => trace!("skipping commit on line [{}]", line_number),
    Archive::Other => {}
  }

  Ok(ParserState {
    current_table,
    line_number: line_number + 1,
  })
}

/// Parses an append line into its shell split, its switches and the rule.
pub fn decode_line(line: &str) -> RIPTAnalysisResult<(Vec<String>, Vec<SwitchUnit>, RIPTRule)> {
  let tokens = iptparser::shellsplit(line)?;
  trace!("shell split {:?}", tokens);
  let units = iptparser::group_switches(&tokens)?;
  trace!("switches {:?}", units);
  let rule = iptparser::build_rule(&units)?;
  Ok((tokens, units, rule))
}
