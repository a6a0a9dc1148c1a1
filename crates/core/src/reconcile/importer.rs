//! Reconciling importer.
//!
//! Merges a batch of candidate movements into a store without creating a
//! second record for a transaction that is already there. Re-running the same
//! or an overlapping batch is always safe.
//!
//! The in-memory match set only saves round trips. The store's own
//! natural-key uniqueness is what keeps concurrent imports from double
//! inserting; a `DuplicateMovement` from `add` is counted as skipped.
//! A period reset goes through the store's atomic `replace_period`.

use std::collections::{BTreeMap, HashSet};

use caixa_shared::types::{MatchStrategy, Period, UnitId, UserId};

use super::types::{ImportFailure, ImportSummary, PeriodSummary, ResetOutcome};
use crate::ledger::{
    BatchRecord, LedgerError, LedgerStore, MatchKey, MovementDraft, MovementFilter, NewMovement,
    ValidationError,
};

/// Imports candidate movements into a ledger store.
pub struct ReconcilingImporter<'a, S: ?Sized> {
    store: &'a S,
    strategy: MatchStrategy,
}

impl<'a, S> ReconcilingImporter<'a, S>
where
    S: LedgerStore + ?Sized,
{
    /// Creates an importer using exact description matching.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            strategy: MatchStrategy::Exact,
        }
    }

    /// Uses `strategy` when comparing descriptions.
    #[must_use]
    pub const fn with_strategy(self, strategy: MatchStrategy) -> Self {
        Self {
            store: self.store,
            strategy,
        }
    }

    /// Description matching in use.
    #[must_use]
    pub const fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Imports `batch` for `unit_id`.
    ///
    /// Candidates are grouped by period. For each period the stored movements
    /// are fetched once; a candidate whose day, amount and description match
    /// one of them (or an earlier candidate) is skipped, otherwise it is
    /// validated and added. Validation failures are counted and the batch
    /// continues.
    ///
    /// # Errors
    ///
    /// `UnitNotFound` for an unknown unit. Any store failure other than a
    /// natural-key conflict aborts the batch; movements already added stay.
    pub async fn import(
        &self,
        unit_id: UnitId,
        recorded_by: UserId,
        batch: &[MovementDraft],
    ) -> Result<ImportSummary, LedgerError> {
        self.run(unit_id, recorded_by, batch.iter().enumerate().collect(), Vec::new())
            .await
    }

    /// Imports records read from an external batch, some of which may not
    /// have been typed.
    ///
    /// A [`BatchRecord::Rejected`] is counted as failed under its position and
    /// belongs to no period summary. Typed records go through [`Self::import`].
    ///
    /// # Errors
    ///
    /// As [`Self::import`].
    pub async fn import_records(
        &self,
        unit_id: UnitId,
        recorded_by: UserId,
        batch: &[BatchRecord],
    ) -> Result<ImportSummary, LedgerError> {
        let mut drafts = Vec::with_capacity(batch.len());
        let mut rejected = Vec::new();
        for (index, record) in batch.iter().enumerate() {
            match record {
                BatchRecord::Draft(draft) => drafts.push((index, draft)),
                BatchRecord::Rejected {
                    description,
                    reason,
                } => {
                    tracing::warn!(index, %description, %reason, "record could not be read");
                    rejected.push(ImportFailure {
                        index,
                        description: description.clone(),
                        reason: reason.to_string(),
                    });
                }
            }
        }
        self.run(unit_id, recorded_by, drafts, rejected).await
    }

    async fn run(
        &self,
        unit_id: UnitId,
        recorded_by: UserId,
        drafts: Vec<(usize, &MovementDraft)>,
        rejected: Vec<ImportFailure>,
    ) -> Result<ImportSummary, LedgerError> {
        self.store.get_unit(unit_id).await?;

        let candidates = drafts.len() + rejected.len();
        let mut groups: BTreeMap<(i32, u8), Vec<(usize, &MovementDraft)>> = BTreeMap::new();
        for (index, draft) in drafts {
            groups
                .entry((draft.year, draft.month))
                .or_default()
                .push((index, draft));
        }

        let mut summary = ImportSummary {
            failed: rejected.len(),
            failures: rejected,
            ..ImportSummary::default()
        };
        for ((year, month), group) in groups {
            let counts = self
                .import_group(
                    unit_id,
                    recorded_by,
                    (month, year),
                    &group,
                    &mut summary.failures,
                )
                .await?;
            summary.push(counts);
        }
        summary.failures.sort_by_key(|failure| failure.index);

        tracing::info!(
            unit = %unit_id,
            candidates,
            inserted = summary.inserted,
            skipped = summary.skipped,
            failed = summary.failed,
            "import finished"
        );
        Ok(summary)
    }

    async fn import_group(
        &self,
        unit_id: UnitId,
        recorded_by: UserId,
        (month, year): (u8, i32),
        candidates: &[(usize, &MovementDraft)],
        failures: &mut Vec<ImportFailure>,
    ) -> Result<PeriodSummary, LedgerError> {
        let mut counts = PeriodSummary {
            month,
            year,
            ..PeriodSummary::default()
        };

        let period = match Period::new(month, year) {
            Ok(period) => period,
            Err(err) => {
                let reason = ValidationError::from(err);
                for &(index, draft) in candidates {
                    Self::reject(failures, index, draft, &reason);
                }
                counts.failed = candidates.len();
                return Ok(counts);
            }
        };

        let existing = self
            .store
            .list(unit_id, MovementFilter::period(period))
            .await?;
        counts.existing = existing.len();
        let mut seen: HashSet<MatchKey> = existing
            .iter()
            .map(|movement| MatchKey::of_stored(self.strategy, movement))
            .collect();

        for &(index, draft) in candidates {
            let key = MatchKey::of_draft(self.strategy, draft);
            if seen.contains(&key) {
                tracing::debug!(
                    unit = %unit_id,
                    %period,
                    index,
                    day = draft.day,
                    description = %draft.description,
                    "candidate already present, skipping"
                );
                counts.skipped += 1;
                continue;
            }

            match self.store.add_draft(unit_id, recorded_by, draft).await {
                Ok(_) => {
                    counts.inserted += 1;
                    seen.insert(key);
                }
                Err(LedgerError::Validation(reason)) => {
                    Self::reject(failures, index, draft, &reason);
                    counts.failed += 1;
                }
                Err(LedgerError::DuplicateMovement { .. }) => {
                    tracing::debug!(
                        unit = %unit_id,
                        %period,
                        index,
                        "candidate stored concurrently, skipping"
                    );
                    counts.skipped += 1;
                    seen.insert(key);
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            unit = %unit_id,
            %period,
            existing = counts.existing,
            inserted = counts.inserted,
            skipped = counts.skipped,
            failed = counts.failed,
            "period imported"
        );
        Ok(counts)
    }

    fn reject(
        failures: &mut Vec<ImportFailure>,
        index: usize,
        draft: &MovementDraft,
        reason: &ValidationError,
    ) {
        tracing::warn!(
            index,
            day = draft.day,
            month = draft.month,
            year = draft.year,
            description = %draft.description,
            %reason,
            "candidate rejected"
        );
        failures.push(ImportFailure {
            index,
            description: draft.description.clone(),
            reason: reason.to_string(),
        });
    }

    /// Replaces every stored movement of `unit_id` in `period` with `batch`.
    ///
    /// This is the only import path that deletes. Every candidate must be
    /// dated in `period`; otherwise nothing is deleted. Candidates are matched
    /// against each other only, validated, and handed to the store as one
    /// replacement, so a store failure leaves the period as it was.
    ///
    /// # Errors
    ///
    /// `Validation(OutsideResetPeriod)` before any deletion if a candidate is
    /// dated elsewhere, `UnitNotFound` for an unknown unit, and any store
    /// failure from the replacement.
    pub async fn reset_period(
        &self,
        unit_id: UnitId,
        recorded_by: UserId,
        period: Period,
        batch: &[MovementDraft],
    ) -> Result<ResetOutcome, LedgerError> {
        self.store.get_unit(unit_id).await?;

        if let Some((index, draft)) = batch
            .iter()
            .enumerate()
            .find(|(_, d)| (d.month, d.year) != (period.month(), period.year()))
        {
            return Err(ValidationError::OutsideResetPeriod {
                index,
                expected: period,
                found: format!("{:02}/{:04}", draft.month, draft.year),
            }
            .into());
        }

        let mut counts = PeriodSummary {
            month: period.month(),
            year: period.year(),
            ..PeriodSummary::default()
        };
        let mut failures = Vec::new();
        let mut seen = HashSet::new();
        let mut replacements = Vec::with_capacity(batch.len());
        for (index, draft) in batch.iter().enumerate() {
            let key = MatchKey::of_draft(self.strategy, draft);
            if seen.contains(&key) {
                counts.skipped += 1;
                continue;
            }
            match NewMovement::from_draft(unit_id, recorded_by, draft) {
                Ok(movement) => {
                    replacements.push(movement);
                    seen.insert(key);
                }
                Err(reason) => {
                    Self::reject(&mut failures, index, draft, &reason);
                    counts.failed += 1;
                }
            }
        }

        let (removed, stored) = self
            .store
            .replace_period(unit_id, period, replacements)
            .await?;
        counts.inserted = stored.len();
        tracing::warn!(
            unit = %unit_id,
            %period,
            removed,
            inserted = counts.inserted,
            skipped = counts.skipped,
            failed = counts.failed,
            "period reset: stored movements replaced"
        );

        let mut summary = ImportSummary {
            failures,
            ..ImportSummary::default()
        };
        summary.push(counts);
        Ok(ResetOutcome {
            period,
            removed,
            summary,
        })
    }
}
