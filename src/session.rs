//! Reconciliation session that owns both ledgers and drives the engine

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::config::ReconcileConfig;
use crate::matching::{auto_match, manual_match, unmatch};
use crate::parser::parse;
use crate::registry::MatchRegistry;
use crate::traits::*;
use crate::types::*;
use crate::utils::amount::amounts_equal;
use crate::utils::validation::{check_integrity, IntegrityReport};
use crate::view::{self, FilterMode, Totals};

/// Counts reported after loading both ledgers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub bank_entries: usize,
    pub other_entries: usize,
    pub auto_matched: usize,
}

/// A validated manual selection awaiting confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualMatchProposal {
    pub bank_ids: Vec<String>,
    pub other_ids: Vec<String>,
    pub bank_sum: BigDecimal,
    pub other_sum: BigDecimal,
    /// Sums differ at cent precision; callers usually ask before committing
    pub is_discrepancy: bool,
}

/// Main reconciliation system: both ledgers, their match groups and the active view
///
/// Each operation runs to completion and replaces the collections only once it has
/// fully succeeded, so a failed load or a rejected match leaves the session as it was.
pub struct Reconciler {
    config: ReconcileConfig,
    ranker: Box<dyn CandidateRanker>,
    bank_entries: Vec<TransactionEntry>,
    other_entries: Vec<TransactionEntry>,
    registry: MatchRegistry,
    filter_mode: FilterMode,
    search_query: String,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    /// Create an empty session with the default configuration
    pub fn new() -> Self {
        Self::with_config(ReconcileConfig::default())
    }

    /// Create an empty session using the configured tie-break
    pub fn with_config(config: ReconcileConfig) -> Self {
        let ranker = config.tie_break.ranker();
        Self::with_ranker(config, ranker)
    }

    /// Create an empty session with a custom tie-break ranker
    pub fn with_ranker(config: ReconcileConfig, ranker: Box<dyn CandidateRanker>) -> Self {
        Self {
            config,
            ranker,
            bank_entries: Vec::new(),
            other_entries: Vec::new(),
            registry: MatchRegistry::new(),
            filter_mode: FilterMode::All,
            search_query: String::new(),
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn bank_entries(&self) -> &[TransactionEntry] {
        &self.bank_entries
    }

    pub fn other_entries(&self) -> &[TransactionEntry] {
        &self.other_entries
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    /// Look up an entry of either ledger
    pub fn entry(&self, entry_id: &str) -> Option<&TransactionEntry> {
        self.bank_entries
            .iter()
            .chain(self.other_entries.iter())
            .find(|e| e.id == entry_id)
    }

    // Loading
    /// Read both exports from their sources and start a new session
    #[tracing::instrument(skip_all)]
    pub async fn load(
        &mut self,
        bank_source: &dyn StatementSource,
        other_source: &dyn StatementSource,
    ) -> ReconcileResult<LoadSummary> {
        tracing::debug!(bank = %bank_source.name(), other = %other_source.name(), "reading exports");
        let bank_text = bank_source.read_text().await?;
        let other_text = other_source.read_text().await?;
        self.load_from_text(&bank_text, &other_text)
    }

    /// Parse both exports and start a new session.
    ///
    /// Previous entries, match groups, filter and search are discarded. Both sides are
    /// sorted by date and, when configured and both are non-empty, auto-matched.
    /// A header error in either export leaves the current session untouched.
    #[tracing::instrument(skip_all)]
    pub fn load_from_text(&mut self, bank_text: &str, other_text: &str) -> ReconcileResult<LoadSummary> {
        let bank = view::sort_by_date(parse(bank_text, LedgerSource::Bank)?);
        let other = view::sort_by_date(parse(other_text, LedgerSource::Other)?);

        let mut registry = MatchRegistry::new();
        let (bank, other) =
            if self.config.auto_match_on_load && !bank.is_empty() && !other.is_empty() {
                let outcome = auto_match(&bank, &other, self.ranker.as_ref());
                registry.extend(outcome.match_groups)?;
                (
                    view::sort_by_date(outcome.bank_entries),
                    view::sort_by_date(outcome.other_entries),
                )
            } else {
                (bank, other)
            };

        let summary = LoadSummary {
            bank_entries: bank.len(),
            other_entries: other.len(),
            auto_matched: registry.len(),
        };
        self.bank_entries = bank;
        self.other_entries = other;
        self.registry = registry;
        self.filter_mode = FilterMode::All;
        self.search_query.clear();

        tracing::debug!(
            bank = summary.bank_entries,
            other = summary.other_entries,
            auto_matched = summary.auto_matched,
            "session loaded"
        );
        Ok(summary)
    }

    // Matching
    /// Run the automatic pass over the currently unmatched entries; returns the number of new groups
    #[tracing::instrument(skip_all)]
    pub fn auto_match(&mut self) -> ReconcileResult<usize> {
        let outcome = auto_match(&self.bank_entries, &self.other_entries, self.ranker.as_ref());
        let mut registry = self.registry.clone();
        let created = outcome.match_groups.len();
        registry.extend(outcome.match_groups)?;

        self.bank_entries = view::sort_by_date(outcome.bank_entries);
        self.other_entries = view::sort_by_date(outcome.other_entries);
        self.registry = registry;
        Ok(created)
    }

    /// Validate a manual selection and compute its sums.
    ///
    /// `None` if either side is empty or any selected id is unknown or not unmatched;
    /// the selection is then rejected as a whole. Repeated ids count once.
    pub fn prepare_manual_match<S: AsRef<str>>(
        &self,
        bank_ids: &[S],
        other_ids: &[S],
    ) -> Option<ManualMatchProposal> {
        let (bank_ids, bank_sum) = validated_selection(bank_ids, &self.bank_entries)?;
        let (other_ids, other_sum) = validated_selection(other_ids, &self.other_entries)?;

        let is_discrepancy = !amounts_equal(&bank_sum, &other_sum);
        Some(ManualMatchProposal {
            bank_ids,
            other_ids,
            bank_sum,
            other_sum,
            is_discrepancy,
        })
    }

    /// Apply a proposal; returns the new group or `None` if the entries changed meanwhile
    #[tracing::instrument(skip_all)]
    pub fn commit_manual_match(&mut self, proposal: &ManualMatchProposal) -> Option<MatchGroup> {
        let outcome = manual_match(
            proposal.bank_ids.as_slice(),
            proposal.other_ids.as_slice(),
            &self.bank_entries,
            &self.other_entries,
            &proposal.bank_sum,
            &proposal.other_sum,
        );
        let group = outcome.match_group?;

        let mut registry = self.registry.clone();
        if let Err(err) = registry.insert(group.clone()) {
            tracing::warn!(%err, "manual match conflicts with the registry");
            return None;
        }

        self.bank_entries = view::sort_by_date(outcome.bank_entries);
        self.other_entries = view::sort_by_date(outcome.other_entries);
        self.registry = registry;
        Some(group)
    }

    /// Prepare and commit in one step, without a confirmation point
    pub fn manual_match<S: AsRef<str>>(
        &mut self,
        bank_ids: &[S],
        other_ids: &[S],
    ) -> Option<MatchGroup> {
        let proposal = self.prepare_manual_match(bank_ids, other_ids)?;
        self.commit_manual_match(&proposal)
    }

    /// Dissolve one group; `false` if it did not exist
    pub fn unmatch_group(&mut self, match_id: &str) -> bool {
        let outcome = unmatch(match_id, &self.bank_entries, &self.other_entries);
        let removed = self.registry.remove(match_id).is_some();
        self.bank_entries = view::sort_by_date(outcome.bank_entries);
        self.other_entries = view::sort_by_date(outcome.other_entries);
        removed || outcome.affected > 0
    }

    /// Dissolve every group owning one of the selected entries; returns the number of groups
    #[tracing::instrument(skip_all)]
    pub fn unmatch_selected<S: AsRef<str>>(&mut self, entry_ids: &[S]) -> usize {
        let mut match_ids: Vec<String> = Vec::new();
        for id in entry_ids {
            if let Some(match_id) = self.entry(id.as_ref()).and_then(|e| e.match_id.clone()) {
                if !match_ids.contains(&match_id) {
                    match_ids.push(match_id);
                }
            }
        }

        for match_id in &match_ids {
            self.unmatch_group(match_id);
        }
        tracing::debug!(groups = match_ids.len(), "unmatched selection");
        match_ids.len()
    }

    /// Discard all data and return to an empty session
    pub fn reset(&mut self) {
        self.bank_entries.clear();
        self.other_entries.clear();
        self.registry.clear();
        self.filter_mode = FilterMode::All;
        self.search_query.clear();
        tracing::debug!("session reset");
    }

    // Views
    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter_mode = mode;
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Ledger totals under the active filter mode
    pub fn totals(&self) -> Totals {
        view::compute_totals(&self.bank_entries, &self.other_entries, self.filter_mode)
    }

    /// Unmatched entries of both ledgers under the active filter and search
    pub fn unmatched_combined(&self) -> Vec<TransactionEntry> {
        view::unmatched_combined(
            &self.bank_entries,
            &self.other_entries,
            self.filter_mode,
            &self.search_query,
        )
    }

    pub fn displayed_bank(&self) -> Vec<TransactionEntry> {
        view::displayed_entries(&self.bank_entries, self.filter_mode, &self.search_query)
    }

    pub fn displayed_other(&self) -> Vec<TransactionEntry> {
        view::displayed_entries(&self.other_entries, self.filter_mode, &self.search_query)
    }

    pub fn all_matched(&self) -> bool {
        view::all_matched(&self.bank_entries, &self.other_entries)
    }

    /// Check entries and registry against each other
    pub fn validate_integrity(&self) -> IntegrityReport {
        check_integrity(&self.bank_entries, &self.other_entries, &self.registry)
    }
}

fn validated_selection<S: AsRef<str>>(
    ids: &[S],
    entries: &[TransactionEntry],
) -> Option<(Vec<String>, BigDecimal)> {
    if ids.is_empty() {
        tracing::debug!("manual selection is empty on one side");
        return None;
    }

    let mut selected: Vec<String> = Vec::new();
    let mut sum = BigDecimal::from(0);
    for id in ids {
        let id = id.as_ref();
        if selected.iter().any(|seen| seen == id) {
            continue;
        }
        match entries.iter().find(|e| e.id == id) {
            Some(entry) if entry.is_unmatched() => {
                sum += &entry.amount;
                selected.push(entry.id.clone());
            }
            found => {
                tracing::debug!(entry = id, known = found.is_some(), "manual selection rejected");
                return None;
            }
        }
    }
    Some((selected, sum))
}
