use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use super::domain::{Grant, GrantDraft, GrantId};
use super::import::{self, ImportError, ImportOutcome};
use super::store::{GrantStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid grant: {0}")]
    Invalid(String),
    #[error("no grant found with id {0}")]
    NotFound(GrantId),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Mutation API over the record store. Every mutation persists the whole
/// collection synchronously before returning.
pub struct GrantService<S: GrantStore> {
    store: S,
}

impl<S: GrantStore> GrantService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Grant>, ServiceError> {
        Ok(self.store.load()?)
    }

    /// Validates the draft, assigns a fresh id, and appends the record.
    pub fn create(&self, draft: GrantDraft) -> Result<Grant, ServiceError> {
        validate(&draft)?;
        let grant = draft.into_grant(GrantId::new());
        let mut grants = self.store.load()?;
        grants.push(grant.clone());
        self.store.save(&grants)?;
        info!(id = %grant.id, name = %grant.name, "created grant");
        Ok(grant)
    }

    /// Replaces every non-identity field of an existing record. Unknown ids
    /// are an error, not a silent no-op.
    pub fn update(&self, id: &GrantId, draft: GrantDraft) -> Result<Grant, ServiceError> {
        validate(&draft)?;
        let mut grants = self.store.load()?;
        let slot = grants
            .iter_mut()
            .find(|grant| grant.id == *id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
        *slot = draft.into_grant(id.clone());
        let updated = slot.clone();
        self.store.save(&grants)?;
        info!(id = %updated.id, name = %updated.name, "updated grant");
        Ok(updated)
    }

    /// Removes the record if present; returns whether anything was removed.
    /// Interactive confirmation is the caller's responsibility.
    pub fn delete(&self, id: &GrantId) -> Result<bool, ServiceError> {
        let mut grants = self.store.load()?;
        let before = grants.len();
        grants.retain(|grant| grant.id != *id);
        if grants.len() == before {
            return Ok(false);
        }
        self.store.save(&grants)?;
        info!(%id, "deleted grant");
        Ok(true)
    }

    /// Runs the CSV pipeline and, only when every row validated, mints fresh
    /// ids and appends after the existing records. Existing records keep
    /// their order and identity.
    pub fn import<R: Read>(&self, reader: R) -> Result<ImportOutcome, ServiceError> {
        let parsed = import::read_import(reader)?;
        if !parsed.errors.is_empty() {
            return Ok(ImportOutcome::Rejected {
                valid_rows: parsed.drafts.len(),
                errors: parsed.errors,
            });
        }
        if parsed.drafts.is_empty() {
            return Ok(ImportOutcome::Empty);
        }

        let mut grants = self.store.load()?;
        let count = parsed.drafts.len();
        grants.extend(
            parsed
                .drafts
                .into_iter()
                .map(|draft| draft.into_grant(GrantId::new())),
        );
        self.store.save(&grants)?;
        info!(count, "imported grants");
        Ok(ImportOutcome::Imported { count })
    }

    pub fn import_from_path<P: AsRef<Path>>(&self, path: P) -> Result<ImportOutcome, ServiceError> {
        let file = File::open(path).map_err(ImportError::Io)?;
        self.import(file)
    }
}

fn validate(draft: &GrantDraft) -> Result<(), ServiceError> {
    let problems = draft.validation_problems();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Invalid(problems.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grants::domain::{
        CallStatus, Currency, GrantType, Order, RequirementStatus, UsmStatus,
    };
    use crate::grants::import::CSV_HEADERS;
    use crate::grants::store::InMemoryStore;
    use std::collections::HashSet;
    use std::io::Cursor;

    fn draft(name: &str, deadline: &str) -> GrantDraft {
        GrantDraft {
            name: name.to_string(),
            entity: "Acme Trust".to_string(),
            order: Order::default(),
            grant_type: GrantType::default(),
            sector: String::new(),
            components: String::new(),
            amount: 100.0,
            currency: Currency::default(),
            meets_requirements: RequirementStatus::default(),
            missing_requirements: String::new(),
            deadline: deadline.parse().expect("valid date"),
            link: String::new(),
            call_status: CallStatus::default(),
            usm_status: UsmStatus::default(),
        }
    }

    fn service() -> GrantService<InMemoryStore> {
        GrantService::new(InMemoryStore::default())
    }

    #[test]
    fn create_assigns_distinct_ids_and_appends_in_order() {
        let service = service();
        let first = service.create(draft("Alpha", "2025-01-01")).expect("create");
        let second = service.create(draft("Beta", "2025-02-01")).expect("create");
        assert_ne!(first.id, second.id);

        let grants = service.list().expect("list");
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].name, "Alpha");
        assert_eq!(grants[1].name, "Beta");
    }

    #[test]
    fn create_rejects_a_draft_with_an_empty_name() {
        let service = service();
        let mut invalid = draft("", "2025-01-01");
        invalid.entity = " ".to_string();
        match service.create(invalid) {
            Err(ServiceError::Invalid(message)) => {
                assert!(message.contains("\"name\""));
                assert!(message.contains("\"entity\""));
            }
            other => panic!("expected invalid error, got {other:?}"),
        }
        assert!(service.list().expect("list").is_empty());
    }

    #[test]
    fn update_preserves_identity_and_replaces_fields() {
        let service = service();
        let created = service.create(draft("Alpha", "2025-01-01")).expect("create");

        let mut replacement = draft("Alpha Renamed", "2025-06-01");
        replacement.amount = 999.0;
        let updated = service
            .update(&created.id, replacement)
            .expect("update succeeds");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Alpha Renamed");
        assert_eq!(updated.amount, 999.0);

        let grants = service.list().expect("list");
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].name, "Alpha Renamed");
    }

    #[test]
    fn update_of_an_unknown_id_is_not_found_and_changes_nothing() {
        let service = service();
        service.create(draft("Alpha", "2025-01-01")).expect("create");
        let before = service.list().expect("list");

        match service.update(&GrantId::new(), draft("Ghost", "2025-01-01")) {
            Err(ServiceError::NotFound(_)) => {}
            other => panic!("expected not found, got {other:?}"),
        }
        assert_eq!(service.list().expect("list"), before);
    }

    #[test]
    fn delete_removes_the_record_and_unknown_ids_are_noops() {
        let service = service();
        let created = service.create(draft("Alpha", "2025-01-01")).expect("create");

        assert!(!service.delete(&GrantId::new()).expect("delete unknown"));
        assert_eq!(service.list().expect("list").len(), 1);

        assert!(service.delete(&created.id).expect("delete"));
        assert!(service.list().expect("list").is_empty());
    }

    #[test]
    fn import_appends_after_existing_records_with_fresh_ids() {
        let service = service();
        let existing = service.create(draft("Existing", "2025-05-01")).expect("create");

        let csv = format!(
            "{}\nAlpha,Acme,,,,,10,,,,2025-01-01,,,\nBeta,Acme,,,,,20,,,,2025-02-01,,,\n",
            CSV_HEADERS.join(",")
        );
        let outcome = service.import(Cursor::new(csv)).expect("import");
        assert_eq!(outcome, ImportOutcome::Imported { count: 2 });

        let grants = service.list().expect("list");
        assert_eq!(grants.len(), 3);
        assert_eq!(grants[0], existing);
        assert_eq!(grants[1].name, "Alpha");
        assert_eq!(grants[2].name, "Beta");

        let ids: HashSet<_> = grants.iter().map(|grant| grant.id.clone()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn import_with_any_row_error_commits_nothing() {
        let service = service();
        let csv = format!(
            "{}\nAlpha,Acme,,,,,10,,,,2025-01-01,,,\nBeta,Acme,,,,,abc,,,,2025-02-01,,,\n",
            CSV_HEADERS.join(",")
        );
        match service.import(Cursor::new(csv)).expect("import") {
            ImportOutcome::Rejected { errors, valid_rows } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(valid_rows, 1);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(service.list().expect("list").is_empty());
    }

    #[test]
    fn import_of_a_header_only_file_is_inert_but_explicit() {
        let service = service();
        let csv = format!("{}\n", CSV_HEADERS.join(","));
        assert_eq!(
            service.import(Cursor::new(csv)).expect("import"),
            ImportOutcome::Empty
        );
        assert!(service.list().expect("list").is_empty());
    }
}
