use once_cell::sync::Lazy;
use regex::Regex;
use string_builder::Builder;
use text_reader::TextReader;
use tracing::trace;

use crate::error::{RIPTAnalysisError, RIPTAnalysisResult};
use crate::rule::{Archive, Match, Options, RIPTRule, SwitchUnit};

static TABLE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*([A-Za-z]+)$").unwrap());
static APPEND_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-A (\S+)").unwrap());
static POLICY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:(\S+)").unwrap());
static SWITCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^--?(.+)").unwrap());

/// Switches that are basic rule parameters when seen before any `-m`/`-j`.
const PARAMETERS: &'static [&'static str] = &["p", "s", "d", "i", "o", "f"];

/// Classify one line of iptables-save output.
pub fn classify(line: &str) -> Archive {
  if let Some(caps) = TABLE_LINE.captures(line) {
    return Archive::Table(caps[1].to_string());
  }
  if let Some(caps) = APPEND_LINE.captures(line) {
    return Archive::Append(caps[1].to_string());
  }
  if let Some(caps) = POLICY_LINE.captures(line) {
    return Archive::Policy(caps[1].to_string());
  }
  if line.trim_end() == "COMMIT" {
    return Archive::Commit;
  }
  Archive::Other
}

/// Break a rule line into words like a POSIX shell.
///
/// Single quotes are taken literally, double quotes honour `\x` escapes, a bare
/// `\x` yields `x` and a trailing lone `\` is kept. Adjacent pieces not separated by whitespace join into one
/// word, so `foo"bar baz"qux` is the single word `foobar bazqux`.
pub fn shellsplit<S: AsRef<str>>(line: S) -> RIPTAnalysisResult<Vec<String>> {
  let mut reader = TextReader::new(line.as_ref().to_string());
  let mut words = vec![];
  let mut field = Builder::default();

  loop {
    self::skip_whitespace(&mut reader);
    let ch = match reader.next() {
      Some(ch) => ch,
      None => break,
    };
    match ch {
      '\'' => self::single_quoted(&mut reader, &mut field)?,
      '"' => self::double_quoted(&mut reader, &mut field)?,
      '\\' => {
        match reader.next() {
          Some(escaped) => {
            field.append(escaped);
          }
          // lone trailing backslash stays literal
          None => {
            field.append('\\');
          }
        }
      }
      _ => self::bare(ch, &mut reader, &mut field),
    }
    if self::at_separator(&mut reader) {
      words.push(std::mem::replace(&mut field, Builder::default()).string()?);
    }
  }

  Ok(words)
}

/// ASCII whitespace, vertical tab included. Other Unicode spaces belong to the word.
fn is_separator(ch: char) -> bool {
  ch.is_ascii_whitespace() || ch == '\x0b'
}

fn skip_whitespace(reader: &mut TextReader) {
  while let Some(ch) = reader.next() {
    if !self::is_separator(ch) {
      reader.back();
      break;
    }
  }
}

fn at_separator(reader: &mut TextReader) -> bool {
  match reader.next() {
    None => true,
    Some(ch) if self::is_separator(ch) => true,
    Some(_) => {
      reader.back();
      false
    }
  }
}

fn single_quoted(reader: &mut TextReader, field: &mut Builder) -> RIPTAnalysisResult<()> {
  while let Some(ch) = reader.next() {
    if ch == '\'' {
      return Ok(());
    }
    field.append(ch);
  }
  Err(RIPTAnalysisError::UnmatchedQuote { quote: '\'' })
}

fn double_quoted(reader: &mut TextReader, field: &mut Builder) -> RIPTAnalysisResult<()> {
  while let Some(ch) = reader.next() {
    match ch {
      '"' => return Ok(()),
      '\\' => match reader.next() {
        Some(escaped) => {
          field.append(escaped);
        }
        None => break,
      },
      _ => {
        field.append(ch);
      }
    }
  }
  Err(RIPTAnalysisError::UnmatchedQuote { quote: '"' })
}

fn bare(first: char, reader: &mut TextReader, field: &mut Builder) {
  field.append(first);
  while let Some(ch) = reader.next() {
    if self::is_separator(ch) || ch == '\'' || ch == '"' || ch == '\\' {
      reader.back();
      break;
    }
    field.append(ch);
  }
}

/// Group a shell split into switches, their negation and their values.
///
/// A `!` negates the switch right after it. A `!` with no switch after it is
/// kept as a unit without a name.
pub fn group_switches<S: AsRef<str>>(tokens: &[S]) -> RIPTAnalysisResult<Vec<SwitchUnit>> {
  let mut units = vec![];
  let mut current: Option<SwitchUnit> = None;

  for token in tokens {
    let token = token.as_ref();
    if let Some(caps) = SWITCH.captures(token) {
      let unit = match current.take() {
        // `! -x`: the switch lands on the pending negation
        Some(open) if open.negate && open.switch.is_none() && open.values.is_empty() => open,
        Some(open) => {
          units.push(open);
          SwitchUnit::default()
        }
        None => SwitchUnit::default(),
      };
      current = Some(SwitchUnit { switch: Some(caps[1].to_string()), ..unit });
    } else if token == "!" {
      if let Some(open) = current.take() {
        units.push(open);
      }
      current = Some(SwitchUnit { negate: true, ..SwitchUnit::default() });
    } else {
      match current.as_mut() {
        Some(open) => open.values.push(token.to_string()),
        None => return Err(RIPTAnalysisError::ValueWithoutSwitch(token.to_string())),
      }
    }
  }
  units.extend(current);

  Ok(units)
}

enum Scope {
  Parameter,
  Match(Match),
  Target,
}

impl Scope {
  /// Leave the current scope, stowing an open match into `rule`.
  fn close(&mut self, rule: &mut RIPTRule) {
    if let Scope::Match(current) = std::mem::replace(self, Scope::Parameter) {
      rule.matches.push(current);
    }
  }
}

/// Build a rule out of grouped switches. The first unit must be `-A <chain>`.
pub fn build_rule(units: &[SwitchUnit]) -> RIPTAnalysisResult<RIPTRule> {
  let (first, rest) = units.split_first().ok_or(RIPTAnalysisError::MissingChainDeclaration)?;
  if first.name() != Some("A") {
    return Err(RIPTAnalysisError::MissingChainDeclaration);
  }
  let chain = first.values.first().ok_or(RIPTAnalysisError::MissingChainDeclaration)?;

  let mut rule = RIPTRule {
    chain: chain.clone(),
    ..RIPTRule::default()
  };
  let mut scope = Scope::Parameter;

  for unit in rest {
    match unit.name() {
      Some("m") => {
        scope.close(&mut rule);
        scope = Scope::Match(Match {
          name: unit.values.first().cloned().unwrap_or_default(),
          options: Options::new(),
        });
      }
      Some("A") => trace!("ignoring repeated chain declaration {:?}", unit.values),
      Some("j") => {
        scope.close(&mut rule);
        rule.target = unit.values.first().cloned();
        scope = Scope::Target;
      }
      name => match scope {
        Scope::Parameter => {
          if name.map_or(false, |name| PARAMETERS.contains(&name)) {
            rule.parameters.insert(unit.key(), unit.values.clone());
          } else {
            trace!("dropping [{}] outside of a match or target", unit.key());
          }
        }
        Scope::Match(ref mut current) => {
          current.options.insert(unit.key(), unit.values.clone());
        }
        Scope::Target => {
          rule.target_options.insert(unit.key(), unit.values.clone());
        }
      },
    }
  }
  scope.close(&mut rule);

  Ok(rule)
}
