use std::vec::Vec;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered `switch -> values` mapping. Negated switches are keyed as `!name`.
pub type Options = IndexMap<String, Vec<String>>;

/// What a single line of iptables-save output declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Archive {
  /// `*filter`
  Table(String),
  /// `-A INPUT ...`
  Append(String),
  /// `:INPUT ACCEPT [0:0]`
  Policy(String),
  /// `COMMIT`
  Commit,
  Other,
}

/// A switch with its negation flag and the values following it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchUnit {
  /// Switch name without leading dashes. `None` for a `!` that no switch followed.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub switch: Option<String>,
  #[serde(default)]
  pub negate: bool,
  #[serde(default)]
  pub values: Vec<String>,
}

impl SwitchUnit {
  pub fn new(switch: &str, values: &[&str]) -> SwitchUnit {
    SwitchUnit {
      switch: Some(switch.to_string()),
      negate: false,
      values: values.iter().map(|value| value.to_string()).collect(),
    }
  }

  pub fn negated(mut self) -> SwitchUnit {
    self.negate = true;
    self
  }

  pub fn name(&self) -> Option<&str> {
    self.switch.as_deref()
  }

  /// Map key for this unit: the switch name, prefixed with `!` when negated.
  pub fn key(&self) -> String {
    format!("{}{}", if self.negate { "!" } else { "" }, self.name().unwrap_or(""))
  }
}

/// A `-m NAME ...` match extension and its options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
  pub name: String,
  #[serde(default)]
  pub options: Options,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RIPTRule {
  pub chain: String,
  /// `-p -s -d -i -o -f` given before the first match or target.
  pub parameters: Options,
  pub matches: Vec<Match>,
  pub target: Option<String>,
  pub target_options: Options,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
  pub original_line: String,
  /// 0-based
  pub line_number: usize,
}

/// A decoded append line together with the stages it went through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
  pub rule: RIPTRule,
  pub tokens: Vec<String>,
  pub units: Vec<SwitchUnit>,
  pub source: Source,
}

/// `table -> chain -> rules`, each level in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
  tables: IndexMap<String, IndexMap<String, Vec<RuleRecord>>>,
}

impl Document {
  pub fn new() -> Document {
    Document::default()
  }

  pub fn tables(&self) -> &IndexMap<String, IndexMap<String, Vec<RuleRecord>>> {
    &self.tables
  }

  pub fn table(&self, table: &str) -> Option<&IndexMap<String, Vec<RuleRecord>>> {
    self.tables.get(table)
  }

  pub fn chain(&self, table: &str, chain: &str) -> Option<&[RuleRecord]> {
    self.table(table)
      .and_then(|chains| chains.get(chain))
      .map(|rules| rules.as_slice())
  }

  /// Every record, table by table and chain by chain.
  pub fn rules(&self) -> impl Iterator<Item=&RuleRecord> {
    self.tables.values()
      .flat_map(|chains| chains.values())
      .flat_map(|rules| rules.iter())
  }

  pub fn is_empty(&self) -> bool {
    self.tables.is_empty()
  }

  /// Appends `record` under `table` and the record's own chain, creating
  /// both on first use.
  pub(crate) fn push(&mut self, table: &str, record: RuleRecord) {
    self.tables
      .entry(table.to_string())
      .or_insert_with(IndexMap::new)
      .entry(record.rule.chain.clone())
      .or_insert_with(Vec::new)
      .push(record);
  }
}
