use crate::core::data::{
    FIXED_FIELDS, MetadataValue, SequenceRecord, bare_field_name, field_category, field_chain,
};
use crate::core::error::CoreError;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, trace};

/// search-term category that matches fields of any category.
pub const WILDCARD_CATEGORY: &str = "simple";

/// Display state of one metadata column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCode {
    Hidden,
    Visible,
    SortedAscending,
    SortedDescending,
}

impl ColumnCode {
    /// Numeric code used by sort icons and external consumers.
    ///
    /// Ascending sorts carry `2` and descending `3`.
    #[must_use]
    pub fn wire_code(self) -> u8 {
        match self {
            ColumnCode::Hidden => 0,
            ColumnCode::Visible => 1,
            ColumnCode::SortedAscending => 2,
            ColumnCode::SortedDescending => 3,
        }
    }

    #[must_use]
    pub fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ColumnCode::Hidden),
            1 => Some(ColumnCode::Visible),
            2 => Some(ColumnCode::SortedAscending),
            3 => Some(ColumnCode::SortedDescending),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, ColumnCode::Hidden)
    }

    #[must_use]
    pub fn sort_direction(self) -> Option<SortDirection> {
        match self {
            ColumnCode::SortedAscending => Some(SortDirection::Ascending),
            ColumnCode::SortedDescending => Some(SortDirection::Descending),
            ColumnCode::Hidden | ColumnCode::Visible => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn sorted_code(self) -> ColumnCode {
        match self {
            SortDirection::Ascending => ColumnCode::SortedAscending,
            SortDirection::Descending => ColumnCode::SortedDescending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            "descending" | "desc" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// A search term restricted to one metadata category, or any with `simple`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchTerm {
    pub category: String,
    pub term: String,
}

/// Inputs used whenever the column state is (re)initialised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    /// Bare field names shown on load.
    pub default_visible: Vec<String>,
    pub search_terms: Vec<SearchTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    pub field: String,
    pub code: ColumnCode,
}

impl ColumnEntry {
    #[must_use]
    pub fn bare_name(&self) -> &str {
        bare_field_name(&self.field)
    }
}

/// Columns belonging to one chain type, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainColumns {
    pub chain: String,
    pub columns: Vec<ColumnEntry>,
}

/// Per chain-type column codes for the metadata table.
///
/// At most one column across all chains holds a sorted code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnState {
    chains: Vec<ChainColumns>,
}

struct SearchMatcher {
    category: String,
    regex: Regex,
}

impl SearchMatcher {
    fn matches(&self, field: &str, value: &MetadataValue) -> bool {
        (self.category == WILDCARD_CATEGORY || self.category == field_category(field))
            && self.regex.is_match(&value.as_text())
    }
}

fn build_matchers(search_terms: &[SearchTerm]) -> Vec<SearchMatcher> {
    search_terms
        .iter()
        .filter(|search| !search.term.is_empty())
        .filter_map(|search| {
            RegexBuilder::new(&regex::escape(&search.term))
                .case_insensitive(true)
                .build()
                .ok()
                .map(|regex| SearchMatcher {
                    category: search.category.clone(),
                    regex,
                })
        })
        .collect()
}

impl ColumnState {
    /// Builds column codes from every metadata field present on `records`.
    ///
    /// Fields whose bare name is in `default_visible` start visible. Fields with a value
    /// matching an active search term start hidden. Codes held by `prior` always win.
    #[must_use]
    pub fn init(
        records: &[SequenceRecord],
        default_visible: &[String],
        search_terms: &[SearchTerm],
        prior: Option<&ColumnState>,
    ) -> Self {
        let matchers = build_matchers(search_terms);
        let mut state = ColumnState::default();

        for record in records {
            for field in &record.metadata {
                if FIXED_FIELDS.contains(&field.name.as_str()) {
                    continue;
                }
                let chain = field_chain(&field.name);
                let search_hit = matchers
                    .iter()
                    .any(|matcher| matcher.matches(&field.name, &field.value));

                if let Some(entry) = state.entry_mut(&field.name) {
                    if search_hit && prior.and_then(|p| p.code(&field.name)).is_none() {
                        entry.code = ColumnCode::Hidden;
                    }
                    continue;
                }

                let code = if let Some(code) = prior.and_then(|p| p.code(&field.name)) {
                    code
                } else if search_hit {
                    ColumnCode::Hidden
                } else if default_visible
                    .iter()
                    .any(|name| name == bare_field_name(&field.name))
                {
                    ColumnCode::Visible
                } else {
                    ColumnCode::Hidden
                };
                state.push(chain, &field.name, code);
            }
        }

        debug!(
            chain_count = state.chains.len(),
            column_count = state.columns().count(),
            visible_count = state.visible_columns().count(),
            search_term_count = matchers.len(),
            "initialised column state"
        );
        state
    }

    fn push(&mut self, chain: &str, field: &str, code: ColumnCode) {
        let entry = ColumnEntry {
            field: field.to_string(),
            code,
        };
        if let Some(group) = self.chains.iter_mut().find(|group| group.chain == chain) {
            group.columns.push(entry);
        } else {
            self.chains.push(ChainColumns {
                chain: chain.to_string(),
                columns: vec![entry],
            });
        }
    }

    fn entry_mut(&mut self, field: &str) -> Option<&mut ColumnEntry> {
        self.chains
            .iter_mut()
            .flat_map(|group| group.columns.iter_mut())
            .find(|entry| entry.field == field)
    }

    #[must_use]
    pub fn code(&self, field: &str) -> Option<ColumnCode> {
        self.columns()
            .find(|(_, entry)| entry.field == field)
            .map(|(_, entry)| entry.code)
    }

    #[must_use]
    pub fn chains(&self) -> &[ChainColumns] {
        &self.chains
    }

    /// All columns with their chain name, in display order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnEntry)> {
        self.chains.iter().flat_map(|group| {
            group
                .columns
                .iter()
                .map(move |entry| (group.chain.as_str(), entry))
        })
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = (&str, &ColumnEntry)> {
        self.columns().filter(|(_, entry)| entry.code.is_visible())
    }

    /// The sorted column and its direction, if any.
    #[must_use]
    pub fn active_sort(&self) -> Option<(&str, SortDirection)> {
        self.columns().find_map(|(_, entry)| {
            entry
                .code
                .sort_direction()
                .map(|direction| (entry.field.as_str(), direction))
        })
    }

    /// Flips a column between hidden and visible. Sorted columns are left as they are.
    pub fn toggle(&mut self, field: &str) -> Result<ColumnCode, CoreError> {
        let entry = self
            .entry_mut(field)
            .ok_or_else(|| CoreError::UnknownColumn(field.to_string()))?;
        entry.code = match entry.code {
            ColumnCode::Hidden => ColumnCode::Visible,
            ColumnCode::Visible => ColumnCode::Hidden,
            sorted => {
                trace!(field, code = ?sorted, "ignored toggle on sorted column");
                sorted
            }
        };
        Ok(entry.code)
    }

    /// Marks `field` as the single sorted column; other shown columns become plain visible.
    pub fn sort_by(&mut self, field: &str, direction: SortDirection) -> Result<(), CoreError> {
        if self.code(field).is_none() {
            return Err(CoreError::UnknownColumn(field.to_string()));
        }
        for entry in self.chains.iter_mut().flat_map(|group| group.columns.iter_mut()) {
            if entry.field == field {
                entry.code = direction.sorted_code();
            } else if entry.code.is_visible() {
                entry.code = ColumnCode::Visible;
            }
        }
        Ok(())
    }

    /// Drops any sort marker, leaving the sorted column visible.
    pub fn clear_sort(&mut self) {
        for entry in self.chains.iter_mut().flat_map(|group| group.columns.iter_mut()) {
            if entry.code.sort_direction().is_some() {
                entry.code = ColumnCode::Visible;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Number(a), SortKey::Number(b)) => compare_numbers(*a, *b),
        (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    }
}

fn sort_keys(records: &[SequenceRecord], field: &str) -> Vec<SortKey> {
    let values: Vec<Option<&MetadataValue>> =
        records.iter().map(|record| record.field(field)).collect();
    let numeric = values.iter().any(Option::is_some)
        && values
            .iter()
            .flatten()
            .all(|value| value.as_number().is_some());

    values
        .into_iter()
        .map(|value| {
            if numeric {
                SortKey::Number(value.and_then(MetadataValue::as_number).unwrap_or(f64::NAN))
            } else {
                SortKey::Text(value.map(|v| v.as_text().into_owned()).unwrap_or_default())
            }
        })
        .collect()
}

/// Orders record indices by the value of `field`.
///
/// Values compare numerically when every present value is a number, otherwise as
/// strings. Missing values become NaN (the smallest number) or the empty string. Each
/// pass takes the first remaining record that is strictly smaller (ascending) or larger
/// (descending) than the current pick, so equal values keep their record order.
#[must_use]
pub fn sort_rows(records: &[SequenceRecord], field: &str, direction: SortDirection) -> Vec<usize> {
    let keys = sort_keys(records, field);
    let wanted = match direction {
        SortDirection::Ascending => Ordering::Less,
        SortDirection::Descending => Ordering::Greater,
    };

    let mut remaining: Vec<usize> = (0..records.len()).collect();
    let mut order = Vec::with_capacity(records.len());
    while !remaining.is_empty() {
        let mut best = 0;
        for position in 1..remaining.len() {
            if compare_keys(&keys[remaining[position]], &keys[remaining[best]]) == wanted {
                best = position;
            }
        }
        order.push(remaining.remove(best));
    }

    debug!(
        field,
        direction = ?direction,
        record_count = records.len(),
        "sorted rows by column"
    );
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::MetadataField;

    fn record(id: &str, fields: &[(&str, MetadataValue)]) -> SequenceRecord {
        let mut record = SequenceRecord::new(id, b"ACGT");
        record.metadata = fields
            .iter()
            .map(|(name, value)| MetadataField {
                name: (*name).to_string(),
                value: value.clone(),
            })
            .collect();
        record
    }

    fn text(value: &str) -> MetadataValue {
        MetadataValue::Text(value.to_string())
    }

    fn sample_records() -> Vec<SequenceRecord> {
        vec![
            record(
                "a",
                &[
                    ("heavy.General.species", text("human")),
                    ("heavy.CDRs.H3", text("ARDY")),
                    ("light.General.length", MetadataValue::Number(110.0)),
                ],
            ),
            record(
                "b",
                &[
                    ("heavy.General.species", text("mouse")),
                    ("heavy.CDRs.H3", text("ARGGY")),
                    ("light.General.length", MetadataValue::Number(9.0)),
                ],
            ),
            record(
                "c",
                &[
                    ("heavy.General.species", text("Human")),
                    ("light.General.length", text("25")),
                ],
            ),
        ]
    }

    #[test]
    fn wire_codes_keep_inverted_pairing() {
        assert_eq!(ColumnCode::SortedAscending.wire_code(), 2);
        assert_eq!(ColumnCode::SortedDescending.wire_code(), 3);
        for code in 0..4 {
            assert_eq!(ColumnCode::from_wire_code(code).unwrap().wire_code(), code);
        }
        assert_eq!(ColumnCode::from_wire_code(4), None);
    }

    #[test]
    fn init_uses_default_visible_bare_names() {
        let state = ColumnState::init(&sample_records(), &["species".to_string()], &[], None);
        assert_eq!(state.code("heavy.General.species"), Some(ColumnCode::Visible));
        assert_eq!(state.code("heavy.CDRs.H3"), Some(ColumnCode::Hidden));
        let chains: Vec<_> = state.chains().iter().map(|c| c.chain.as_str()).collect();
        assert_eq!(chains, vec!["heavy", "light"]);
    }

    #[test]
    fn search_hits_are_hidden_unless_prior_state_exists() {
        let records = sample_records();
        let defaults = vec!["species".to_string(), "H3".to_string()];
        let terms = vec![SearchTerm {
            category: "General".to_string(),
            term: "HUMAN".to_string(),
        }];

        let state = ColumnState::init(&records, &defaults, &terms, None);
        assert_eq!(state.code("heavy.General.species"), Some(ColumnCode::Hidden));
        assert_eq!(state.code("heavy.CDRs.H3"), Some(ColumnCode::Visible));

        let prior = ColumnState::init(&records, &defaults, &[], None);
        let state = ColumnState::init(&records, &defaults, &terms, Some(&prior));
        assert_eq!(state.code("heavy.General.species"), Some(ColumnCode::Visible));
    }

    #[test]
    fn wildcard_search_matches_any_category() {
        let terms = vec![SearchTerm {
            category: WILDCARD_CATEGORY.to_string(),
            term: "rgg".to_string(),
        }];
        let state = ColumnState::init(&sample_records(), &["H3".to_string()], &terms, None);
        assert_eq!(state.code("heavy.CDRs.H3"), Some(ColumnCode::Hidden));
    }

    #[test]
    fn toggle_flips_only_hidden_and_visible() {
        let mut state = ColumnState::init(&sample_records(), &[], &[], None);
        assert_eq!(state.toggle("heavy.CDRs.H3").unwrap(), ColumnCode::Visible);
        assert_eq!(state.toggle("heavy.CDRs.H3").unwrap(), ColumnCode::Hidden);

        state.sort_by("heavy.CDRs.H3", SortDirection::Descending).unwrap();
        assert_eq!(
            state.toggle("heavy.CDRs.H3").unwrap(),
            ColumnCode::SortedDescending
        );
        assert!(state.toggle("heavy.CDRs.missing").is_err());
    }

    #[test]
    fn sort_by_keeps_a_single_sorted_column() {
        let defaults = vec!["species".to_string(), "H3".to_string(), "length".to_string()];
        let mut state = ColumnState::init(&sample_records(), &defaults, &[], None);
        state.sort_by("heavy.CDRs.H3", SortDirection::Ascending).unwrap();
        state.sort_by("heavy.General.species", SortDirection::Descending).unwrap();
        state.sort_by("light.General.length", SortDirection::Ascending).unwrap();

        let sorted: Vec<_> = state
            .columns()
            .filter(|(_, entry)| entry.code.sort_direction().is_some())
            .map(|(_, entry)| entry.field.as_str())
            .collect();
        assert_eq!(sorted, vec!["light.General.length"]);
        assert_eq!(state.code("heavy.CDRs.H3"), Some(ColumnCode::Visible));
        assert_eq!(
            state.active_sort(),
            Some(("light.General.length", SortDirection::Ascending))
        );
    }

    #[test]
    fn sort_rows_numeric_when_all_values_parse() {
        let records = sample_records();
        let ascending = sort_rows(&records, "light.General.length", SortDirection::Ascending);
        assert_eq!(ascending, vec![1, 2, 0]);
        let descending = sort_rows(&records, "light.General.length", SortDirection::Descending);
        assert_eq!(descending, vec![0, 2, 1]);
    }

    #[test]
    fn sort_rows_strings_with_missing_values_first() {
        let records = sample_records();
        let order = sort_rows(&records, "heavy.CDRs.H3", SortDirection::Ascending);
        assert_eq!(order, vec![2, 0, 1]);
        let order = sort_rows(&records, "heavy.General.species", SortDirection::Ascending);
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn sort_rows_keeps_record_order_for_ties() {
        let records = vec![
            record("a", &[("x.General.v", text("same"))]),
            record("b", &[("x.General.v", text("same"))]),
            record("c", &[("x.General.v", text("same"))]),
        ];
        assert_eq!(sort_rows(&records, "x.General.v", SortDirection::Descending), vec![0, 1, 2]);
    }

    #[test]
    fn missing_numbers_sort_as_smallest_value() {
        let records = vec![
            record("a", &[("x.General.n", MetadataValue::Number(2.0))]),
            record("b", &[]),
            record("c", &[("x.General.n", MetadataValue::Number(1.0))]),
        ];
        assert_eq!(sort_rows(&records, "x.General.n", SortDirection::Ascending), vec![1, 2, 0]);
        assert_eq!(sort_rows(&records, "x.General.n", SortDirection::Descending), vec![0, 2, 1]);
    }
}
