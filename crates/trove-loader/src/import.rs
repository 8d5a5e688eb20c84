//! Ingestion: one document, one session.
//!
//! Every row a document produces is written in a single session, so a
//! document either lands completely or not at all. Ingesting the same
//! document again leaves the warehouse unchanged.

use std::path::Path;

use serde::de::DeserializeOwned;
use trove_core::{
  EntityDescriptor, Record,
  clinical::{NewContact, NewInvestigator, NewLocation},
  kinds::{MeshTermType, SponsorType},
  registry,
};
use trove_store_sqlite::{Dal, Session, Warehouse};

use crate::{
  Error, Result,
  document::{
    ContactDocument, DescriptorDocument, InvestigatorDocument, QualifierDocument,
    StudyDocument,
  },
};

/// Outcome of importing a document file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
  pub imported: usize,
  pub failed:   usize,
}

/// Read a JSON array of documents.
pub fn read_documents<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
  let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })?;
  serde_json::from_str(&raw).map_err(|source| Error::Json {
    path: path.to_path_buf(),
    source,
  })
}

pub async fn import_studies(
  warehouse: &Warehouse,
  documents: Vec<StudyDocument>,
) -> Result<ImportReport> {
  let report = warehouse
    .run(move |dal| {
      Ok(import_each(&documents, |doc| {
        ingest_study(&dal, doc).map(|_| ()).map_err(|e| (doc.study.nct_id.clone(), e))
      }))
    })
    .await?;
  Ok(report)
}

pub async fn import_descriptors(
  warehouse: &Warehouse,
  documents: Vec<DescriptorDocument>,
) -> Result<ImportReport> {
  let report = warehouse
    .run(move |dal| {
      Ok(import_each(&documents, |doc| {
        ingest_descriptor(&dal, doc)
          .map(|_| ())
          .map_err(|e| (doc.descriptor.ui.clone(), e))
      }))
    })
    .await?;
  Ok(report)
}

pub async fn import_qualifiers(
  warehouse: &Warehouse,
  documents: Vec<QualifierDocument>,
) -> Result<ImportReport> {
  let report = warehouse
    .run(move |dal| {
      Ok(import_each(&documents, |doc| {
        ingest_qualifier(&dal, doc)
          .map(|_| ())
          .map_err(|e| (doc.qualifier.ui.clone(), e))
      }))
    })
    .await?;
  Ok(report)
}

/// A failed document is logged and skipped; its session has already been
/// rolled back.
fn import_each<T>(
  documents: &[T],
  mut ingest: impl FnMut(&T) -> Result<(), (String, trove_store_sqlite::Error)>,
) -> ImportReport {
  let mut report = ImportReport::default();
  for doc in documents {
    match ingest(doc) {
      Ok(()) => report.imported += 1,
      Err((id, err)) => {
        tracing::warn!(document = %id, error = %err, "document skipped");
        report.failed += 1;
      }
    }
  }
  tracing::info!(imported = report.imported, failed = report.failed, "import finished");
  report
}

// ─── Studies ─────────────────────────────────────────────────────────────────

/// Write a registration and everything hanging off it. Returns the study key.
pub fn ingest_study(dal: &Dal<'_>, doc: &StudyDocument) -> trove_store_sqlite::Result<i64> {
  dal.with_session(None, |session| {
    let s = Some(session);
    let existing = session.get_by_attr(&registry::STUDY, "nct_id", &doc.study.nct_id)?;
    let existing_fact = |column: &str| existing.as_ref().and_then(|row| row.integer(column));

    let mut study = doc.study.clone();
    study.oversight_info_id = doc
      .oversight_info
      .as_ref()
      .map(|o| {
        put_fact(
          session,
          &registry::OVERSIGHT_INFO,
          existing_fact("oversight_info_id"),
          o.to_record(),
        )
      })
      .transpose()?;
    study.eligibility_id = doc
      .eligibility
      .as_ref()
      .map(|e| {
        put_fact(
          session,
          &registry::ELIGIBILITY,
          existing_fact("eligibility_id"),
          e.to_record(),
        )
      })
      .transpose()?;
    let study_id = dal.iodu_study(&study, s)?;

    // A block the document no longer carries leaves its old row unreferenced.
    let dropped = [
      (&registry::OVERSIGHT_INFO, "oversight_info_id", study.oversight_info_id),
      (&registry::ELIGIBILITY, "eligibility_id", study.eligibility_id),
    ];
    for (entity, column, current) in dropped {
      if let (Some(old), None) = (existing_fact(column), current) {
        session.delete(entity, old)?;
        tracing::debug!(table = entity.table(), id = old, "dropped fact row removed");
      }
    }

    for keyword in &doc.keywords {
      let id = dal.iodi_keyword(keyword, s)?;
      dal.iodi_study_keyword(study_id, id, s)?;
    }
    for condition in &doc.conditions {
      let id = dal.iodi_condition(condition, s)?;
      dal.iodi_study_condition(study_id, id, s)?;
    }
    for intervention in &doc.interventions {
      let id = dal.iodi_intervention(intervention, s)?;
      dal.iodi_study_intervention(study_id, id, s)?;
    }
    for alias in &doc.aliases {
      let id = dal.iodi_alias(alias, s)?;
      dal.iodi_study_alias(study_id, id, s)?;
    }

    let sponsors = doc
      .lead_sponsor
      .iter()
      .map(|sp| (sp, SponsorType::Lead))
      .chain(doc.collaborators.iter().map(|sp| (sp, SponsorType::Collaborator)));
    for (sponsor, role) in sponsors {
      let id = dal.iodi_sponsor(&sponsor.agency, sponsor.agency_class, s)?;
      dal.iodu_study_sponsor(study_id, id, role, s)?;
    }

    let mesh = doc
      .mesh_conditions
      .iter()
      .map(|t| (t, MeshTermType::Condition))
      .chain(doc.mesh_interventions.iter().map(|t| (t, MeshTermType::Intervention)));
    for (term, kind) in mesh {
      let id = dal.iodi_mesh_term(term, s)?;
      dal.iodu_study_mesh_term(study_id, id, kind, s)?;
    }

    for official in &doc.overall_officials {
      let id = put_investigator(dal, official, s)?;
      dal.iodi_study_investigator(study_id, id, s)?;
    }

    for location in &doc.locations {
      let facility_id = dal.iodi_facility(&location.facility, s)?;
      dal.iodi_study_facility(study_id, facility_id, s)?;

      let contact_primary_id = location
        .contact_primary
        .as_ref()
        .map(|c| put_contact(dal, c, s))
        .transpose()?;
      let contact_backup_id = location
        .contact_backup
        .as_ref()
        .map(|c| put_contact(dal, c, s))
        .transpose()?;
      let location_id = dal.iodi_location(
        &NewLocation {
          facility_id,
          status: location.status,
          contact_primary_id,
          contact_backup_id,
        },
        s,
      )?;
      dal.iodi_study_location(study_id, location_id, s)?;

      for investigator in &location.investigators {
        let id = put_investigator(dal, investigator, s)?;
        dal.iodi_location_investigator(location_id, id, s)?;
      }
    }

    tracing::debug!(nct_id = %doc.study.nct_id, study_id, "study ingested");
    Ok(study_id)
  })
}

/// Oversight and eligibility rows have no identity of their own. A study
/// that already points at one has it rewritten in place; otherwise a new
/// row is inserted. Rows a study stops pointing at are deleted by the
/// caller.
fn put_fact(
  session: &Session<'_>,
  entity: &'static EntityDescriptor,
  existing: Option<i64>,
  record: Record,
) -> trove_store_sqlite::Result<i64> {
  let Some(id) = existing else {
    return session.insert(entity, record);
  };
  for (column, value) in record.iter() {
    session.update_attr_value(entity, id, column, value.clone())?;
  }
  Ok(id)
}

fn put_investigator(
  dal: &Dal<'_>,
  doc: &InvestigatorDocument,
  s: Option<&Session<'_>>,
) -> trove_store_sqlite::Result<i64> {
  let person_id = dal.iodi_person(&doc.person, s)?;
  dal.iodi_investigator(
    &NewInvestigator {
      person_id,
      role: doc.role,
      affiliation: doc.affiliation.clone(),
    },
    s,
  )
}

fn put_contact(
  dal: &Dal<'_>,
  doc: &ContactDocument,
  s: Option<&Session<'_>>,
) -> trove_store_sqlite::Result<i64> {
  let person_id = dal.iodi_person(&doc.person, s)?;
  dal.iodi_contact(
    &NewContact {
      person_id,
      phone: doc.phone.clone(),
      phone_ext: doc.phone_ext.clone(),
      email: doc.email.clone(),
    },
    s,
  )
}

// ─── Descriptors ─────────────────────────────────────────────────────────────

/// Write a descriptor with its tree numbers, qualifiers, concepts, terms and
/// synonyms. Returns the descriptor key.
pub fn ingest_descriptor(
  dal: &Dal<'_>,
  doc: &DescriptorDocument,
) -> trove_store_sqlite::Result<i64> {
  dal.with_session(None, |session| {
    let s = Some(session);
    let descriptor_id = dal.iodu_descriptor(&doc.descriptor, s)?;

    for tree_number in &doc.tree_numbers {
      let id = dal.iodi_tree_number(tree_number, s)?;
      dal.iodi_descriptor_tree_number(descriptor_id, id, s)?;
    }

    for qualifier in &doc.allowable_qualifiers {
      let id = dal.iodu(&registry::QUALIFIER, qualifier.to_record(), s)?;
      dal.iodi_descriptor_allowable_qualifier(descriptor_id, id, s)?;
    }

    for concept in &doc.concepts {
      let concept_id = dal.iodu_concept(&concept.concept, s)?;
      dal.iodu_descriptor_concept(descriptor_id, concept_id, concept.is_preferred, s)?;
      for term in &concept.terms {
        let term_id = dal.iodu_term(&term.term, s)?;
        dal.iodu_concept_term(concept_id, term_id, term.flags, s)?;
      }
    }

    let added = dal.biodi_descriptor_synonyms(descriptor_id, &doc.synonyms, s)?;
    tracing::debug!(
      ui = %doc.descriptor.ui,
      descriptor_id,
      synonyms_added = added,
      "descriptor ingested"
    );
    Ok(descriptor_id)
  })
}

// ─── Qualifiers ──────────────────────────────────────────────────────────────

/// Write a qualifier with its tree numbers, concepts, terms and synonyms.
/// Returns the qualifier key.
pub fn ingest_qualifier(
  dal: &Dal<'_>,
  doc: &QualifierDocument,
) -> trove_store_sqlite::Result<i64> {
  dal.with_session(None, |session| {
    let s = Some(session);
    let qualifier_id = dal.iodu_qualifier(&doc.qualifier, s)?;

    for tree_number in &doc.tree_numbers {
      let id = dal.iodi_tree_number(tree_number, s)?;
      dal.iodi_qualifier_tree_number(qualifier_id, id, s)?;
    }

    for concept in &doc.concepts {
      let concept_id = dal.iodu_concept(&concept.concept, s)?;
      dal.iodu_qualifier_concept(qualifier_id, concept_id, concept.is_preferred, s)?;
      for term in &concept.terms {
        let term_id = dal.iodu_term(&term.term, s)?;
        dal.iodu_concept_term(concept_id, term_id, term.flags, s)?;
      }
    }

    let added = dal.biodi_qualifier_synonyms(qualifier_id, &doc.synonyms, s)?;
    tracing::debug!(
      ui = %doc.qualifier.ui,
      qualifier_id,
      synonyms_added = added,
      "qualifier ingested"
    );
    Ok(qualifier_id)
  })
}
