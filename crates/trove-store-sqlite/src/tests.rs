//! Integration tests for the DAL against in-memory and temp-file databases.

use std::{
  path::{Path, PathBuf},
  thread,
};

use chrono::NaiveDate;
use rusqlite::Connection;
use trove_core::{
  ConflictPolicy, EntityDescriptor, Identity, Record, Value,
  clinical::{NewContact, NewFacility, NewOversightInfo, NewPerson, NewStudy},
  kinds::{AgencyClass, MeshTermType, SponsorType},
  registry,
  thesaurus::{NewConcept, NewDescriptor, NewQualifier, NewTerm, TermFlags},
};
use uuid::Uuid;

use crate::{Dal, Error, StoreConfig, Warehouse, connect_in_memory, schema};

fn conn() -> Connection { connect_in_memory().expect("in-memory warehouse") }

fn temp_db() -> PathBuf {
  std::env::temp_dir().join(format!("trove-{}.db", Uuid::new_v4()))
}

fn remove_db(path: &Path) {
  for suffix in ["", "-wal", "-shm"] {
    let mut file = path.as_os_str().to_owned();
    file.push(suffix);
    let _ = std::fs::remove_file(file);
  }
}

fn core_err<T: std::fmt::Debug>(result: crate::Result<T>) -> trove_core::Error {
  match result.unwrap_err() {
    Error::Core(e) => e,
    other => panic!("expected a core error, got {other:?}"),
  }
}

// ─── IODI ────────────────────────────────────────────────────────────────────

#[test]
fn keyword_identity_ignores_case_and_stores_lowercase() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let a = dal.iodi_keyword("Asthma", None).unwrap();
  let b = dal.iodi_keyword("ASTHMA", None).unwrap();
  assert_eq!(a, b);

  let row = dal.get(&registry::KEYWORD, a, None).unwrap().unwrap();
  assert_eq!(row.text("keyword"), Some("asthma"));
  assert_eq!(dal.count(&registry::KEYWORD, None).unwrap(), 1);
}

#[test]
fn condition_keeps_first_spelling() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let a = dal.iodi_condition("Lung Cancer", None).unwrap();
  let b = dal.iodi_condition("lung cancer", None).unwrap();
  assert_eq!(a, b);
  let row = dal.get(&registry::CONDITION, a, None).unwrap().unwrap();
  assert_eq!(row.text("condition"), Some("Lung Cancer"));
}

#[test]
fn sponsor_sequence_resolves_existing_keys() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let first = dal.iodi_sponsor("Pfizer", Some(AgencyClass::Industry), None).unwrap();
  let again = dal.iodi_sponsor("PFIZER", Some(AgencyClass::Industry), None).unwrap();
  let other = dal.iodi_sponsor("Pfizer", Some(AgencyClass::Other), None).unwrap();

  assert_eq!((first, again, other), (1, 1, 2));
}

#[test]
fn any_attribute_change_is_a_new_row() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let boston = NewFacility {
    name: Some("General Hospital".into()),
    city: Some("Boston".into()),
    country: Some("United States".into()),
    ..NewFacility::default()
  };
  let shouting = NewFacility {
    name: Some("GENERAL HOSPITAL".into()),
    ..boston.clone()
  };
  let denver = NewFacility { city: Some("Denver".into()), ..boston.clone() };

  let a = dal.iodi_facility(&boston, None).unwrap();
  assert_eq!(dal.iodi_facility(&shouting, None).unwrap(), a);
  assert_ne!(dal.iodi_facility(&denver, None).unwrap(), a);

  let jane = NewPerson {
    name_first: Some("Jane".into()),
    name_last: Some("Doe".into()),
    ..NewPerson::default()
  };
  let jane_md = NewPerson { degrees: Some("MD".into()), ..jane.clone() };
  assert_ne!(
    dal.iodi_person(&jane, None).unwrap(),
    dal.iodi_person(&jane_md, None).unwrap()
  );
}

#[test]
fn contact_without_person_fails_and_inserts_nothing() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let contact = NewContact {
    person_id: 42,
    phone:     Some("555-0100".into()),
    phone_ext: None,
    email:     None,
  };
  let err = dal.iodi_contact(&contact, None).unwrap_err();
  assert!(matches!(err, Error::ForeignKey { table: "contact", .. }), "{err:?}");
  assert_eq!(dal.count(&registry::CONTACT, None).unwrap(), 0);
}

#[test]
fn association_links_are_deduplicated() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let study = dal.iodu_study(&NewStudy::new("NCT00000102"), None).unwrap();
  let keyword = dal.iodi_keyword("asthma", None).unwrap();

  let a = dal.iodi_study_keyword(study, keyword, None).unwrap();
  let b = dal.iodi_study_keyword(study, keyword, None).unwrap();
  assert_eq!(a, b);
  assert_eq!(dal.count(&registry::STUDY_KEYWORD, None).unwrap(), 1);
}

#[test]
fn negative_foreign_key_is_rejected() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let err = core_err(dal.iodi_study_keyword(-1, 1, None));
  assert!(matches!(
    err,
    trove_core::Error::NegativeKey { attribute: "study_id", value: -1, .. }
  ));
}

#[test]
fn absent_required_column_fails_before_sql() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let err = core_err(dal.iodi(&registry::KEYWORD, Record::new(), None));
  assert!(matches!(
    err,
    trove_core::Error::MissingKeyAttribute { entity: "keyword", attribute: "keyword" }
  ));

  let nameless = Record::new().with("ui", "Q000008");
  let err = core_err(dal.iodu(&registry::QUALIFIER, nameless, None));
  assert!(matches!(err, trove_core::Error::MissingKeyAttribute { attribute: "name", .. }));

  let orphan = Record::new().with("phone", "555-0100");
  let err = core_err(dal.iodi(&registry::CONTACT, orphan, None));
  assert!(matches!(err, trove_core::Error::MissingKeyAttribute { attribute: "person_id", .. }));
  assert_eq!(dal.count(&registry::CONTACT, None).unwrap(), 0);
}

#[test]
fn tree_numbers_match_case_sensitively() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let upper = dal.iodi_tree_number("C04.557", None).unwrap();
  assert_eq!(dal.iodi_tree_number("C04.557", None).unwrap(), upper);
  assert_ne!(dal.iodi_tree_number("c04.557", None).unwrap(), upper);
}

// ─── IODU ────────────────────────────────────────────────────────────────────

#[test]
fn descriptor_update_overwrites_in_place() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let mut descriptor = NewDescriptor::new("D000001", "Calcimycin");
  descriptor.created = NaiveDate::from_ymd_opt(1974, 11, 19);
  let id = dal.iodu_descriptor(&descriptor, None).unwrap();

  descriptor.name = "Calcimycin A23187".into();
  descriptor.annotation = Some("an ionophore".into());
  assert_eq!(dal.iodu_descriptor(&descriptor, None).unwrap(), id);
  assert_eq!(dal.iodu_descriptor(&descriptor, None).unwrap(), id);

  let row = dal.get(&registry::DESCRIPTOR, id, None).unwrap().unwrap();
  assert_eq!(row.text("name"), Some("Calcimycin A23187"));
  assert_eq!(row.text("annotation"), Some("an ionophore"));
  assert_eq!(row.date("created"), NaiveDate::from_ymd_opt(1974, 11, 19));
  assert_eq!(dal.count(&registry::DESCRIPTOR, None).unwrap(), 1);
}

#[test]
fn concept_and_term_links_update_flags() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let concept = dal.iodu_concept(&NewConcept::new("M0000001", "Calcimycin"), None).unwrap();
  let term = dal.iodu_term(&NewTerm::new("T000002", "Calcimycin"), None).unwrap();

  let link = dal
    .iodu_concept_term(concept, term, TermFlags::default(), None)
    .unwrap();
  let preferred = TermFlags {
    is_concept_preferred: true,
    is_record_preferred: true,
    ..TermFlags::default()
  };
  assert_eq!(dal.iodu_concept_term(concept, term, preferred, None).unwrap(), link);

  let row = dal.get(&registry::CONCEPT_TERM, link, None).unwrap().unwrap();
  assert_eq!(row.boolean("is_concept_preferred"), Some(true));
  assert_eq!(row.boolean("is_permuted"), Some(false));
}

#[test]
fn qualifier_update_overwrites_in_place() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let mut qualifier = NewQualifier::new("Q000008", "administration & dosage");
  let id = dal.iodu_qualifier(&qualifier, None).unwrap();

  qualifier.name = "administration and dosage".into();
  qualifier.annotation = Some("used with drugs".into());
  assert_eq!(dal.iodu_qualifier(&qualifier, None).unwrap(), id);

  let row = dal.get(&registry::QUALIFIER, id, None).unwrap().unwrap();
  assert_eq!(row.text("name"), Some("administration and dosage"));
  assert_eq!(row.text("annotation"), Some("used with drugs"));
  assert_eq!(dal.count(&registry::QUALIFIER, None).unwrap(), 1);
}

#[test]
fn qualifier_links_deduplicate_and_update_role() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let qualifier = dal
    .iodu_qualifier(&NewQualifier::new("Q000008", "administration & dosage"), None)
    .unwrap();
  let tree = dal.iodi_tree_number("Y05.010", None).unwrap();
  let link = dal.iodi_qualifier_tree_number(qualifier, tree, None).unwrap();
  assert_eq!(dal.iodi_qualifier_tree_number(qualifier, tree, None).unwrap(), link);
  assert_eq!(dal.count(&registry::QUALIFIER_TREE_NUMBER, None).unwrap(), 1);

  let concept = dal
    .iodu_concept(&NewConcept::new("M0030904", "administration & dosage"), None)
    .unwrap();
  let role = dal.iodu_qualifier_concept(qualifier, concept, false, None).unwrap();
  assert_eq!(dal.iodu_qualifier_concept(qualifier, concept, true, None).unwrap(), role);

  let row = dal.get(&registry::QUALIFIER_CONCEPT, role, None).unwrap().unwrap();
  assert_eq!(row.boolean("is_preferred"), Some(true));
  assert_eq!(dal.count(&registry::QUALIFIER_CONCEPT, None).unwrap(), 1);

  let joined = dal
    .get_joined(&registry::QUALIFIER, qualifier, &["tree_numbers", "concepts"], None)
    .unwrap()
    .unwrap();
  assert_eq!(joined.related("tree_numbers")[0].text("tree_number"), Some("Y05.010"));
  assert_eq!(joined.related("concepts")[0].text("ui"), Some("M0030904"));
}

#[test]
fn sponsor_role_is_updated_on_relink() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let study = dal.iodu_study(&NewStudy::new("NCT00000102"), None).unwrap();
  let sponsor = dal.iodi_sponsor("NHLBI", Some(AgencyClass::Nih), None).unwrap();

  let link = dal
    .iodu_study_sponsor(study, sponsor, SponsorType::Lead, None)
    .unwrap();
  let relink = dal
    .iodu_study_sponsor(study, sponsor, SponsorType::Collaborator, None)
    .unwrap();
  assert_eq!(link, relink);

  let row = dal.get(&registry::STUDY_SPONSOR, link, None).unwrap().unwrap();
  assert_eq!(row.text("sponsor_type"), Some("collaborator"));

  let mesh = dal.iodi_mesh_term("Asthma", None).unwrap();
  let a = dal
    .iodu_study_mesh_term(study, mesh, MeshTermType::Condition, None)
    .unwrap();
  let b = dal
    .iodu_study_mesh_term(study, mesh, MeshTermType::Intervention, None)
    .unwrap();
  assert_eq!(a, b);
}

#[test]
fn key_only_upsert_resolves_without_touching_row() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let study = NewStudy {
    brief_title: Some("Asthma in adults".into()),
    ..NewStudy::new("NCT00000102")
  };
  let id = dal.iodu_study(&study, None).unwrap();

  let bare = Record::new().with("nct_id", "NCT00000102");
  assert_eq!(dal.iodu(&registry::STUDY, bare, None).unwrap(), id);

  let row = dal.get(&registry::STUDY, id, None).unwrap().unwrap();
  assert_eq!(row.text("brief_title"), Some("Asthma in adults"));
}

#[test]
fn protocol_must_match_entity() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let record = Record::new().with("keyword", "asthma");
  let err = core_err(dal.iodu(&registry::KEYWORD, record.clone(), None));
  assert!(matches!(err, trove_core::Error::UnsupportedOperation { operation: "iodu", .. }));

  let err = core_err(dal.insert(&registry::KEYWORD, record, None));
  assert!(matches!(err, trove_core::Error::UnsupportedOperation { operation: "insert", .. }));

  let err = core_err(dal.iodi(&registry::OVERSIGHT_INFO, Record::new(), None));
  assert!(matches!(err, trove_core::Error::UnsupportedOperation { operation: "iodi", .. }));
}

// ─── Unkeyed inserts ─────────────────────────────────────────────────────────

#[test]
fn unkeyed_insert_always_creates_a_row() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let oversight = NewOversightInfo { has_dmc: Some(true), ..NewOversightInfo::default() };
  let a = dal.insert_oversight_info(&oversight, None).unwrap();
  let b = dal.insert_oversight_info(&oversight, None).unwrap();
  assert_ne!(a, b);

  let c = dal.upsert(&registry::OVERSIGHT_INFO, oversight.to_record(), None).unwrap();
  assert_eq!(dal.count(&registry::OVERSIGHT_INFO, None).unwrap(), 3);
  assert!(c > b);

  let row = dal.get(&registry::OVERSIGHT_INFO, a, None).unwrap().unwrap();
  assert_eq!(row.boolean("has_dmc"), Some(true));
  assert_eq!(row.get("is_ppsd"), Some(&Value::Null));
}

// ─── BIODI ───────────────────────────────────────────────────────────────────

#[test]
fn synonym_batches_skip_existing_rows() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let d = dal.iodu_descriptor(&NewDescriptor::new("D000001", "Calcimycin"), None).unwrap();
  let batch = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

  let first = batch(&["A23187", "Antibiotic A23187", "Calcimycin"]);
  assert_eq!(dal.biodi_descriptor_synonyms(d, &first, None).unwrap(), 3);
  let second = batch(&["calcimycin", "A-23187"]);
  assert_eq!(dal.biodi_descriptor_synonyms(d, &second, None).unwrap(), 1);
  assert_eq!(dal.biodi_descriptor_synonyms(d, &[], None).unwrap(), 0);

  let rows = dal.bget_descriptor_synonyms(&[d], None).unwrap();
  assert_eq!(rows.len(), 4);
  assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
  assert_eq!(rows[2].text("synonym"), Some("Calcimycin"));
}

#[test]
fn synonym_batch_deduplicates_within_itself() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let d = dal.iodu_descriptor(&NewDescriptor::new("D000001", "Calcimycin"), None).unwrap();
  let other = dal.iodu_descriptor(&NewDescriptor::new("D000002", "Temefos"), None).unwrap();
  let names = vec!["Abate".to_string(), "ABATE".to_string()];

  assert_eq!(dal.biodi_descriptor_synonyms(d, &names, None).unwrap(), 1);
  // Same text under another parent is a distinct row.
  assert_eq!(dal.biodi_descriptor_synonyms(other, &names, None).unwrap(), 1);
}

#[test]
fn synonym_batch_checks_lengths_first() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let children = vec![Record::new().with("synonym", "Abate")];
  let err = core_err(dal.biodi(&registry::DESCRIPTOR_SYNONYM, 1, &children, &[], None));
  assert!(matches!(
    err,
    trove_core::Error::LengthMismatch { records: 1, fingerprints: 0, .. }
  ));
}

#[test]
fn synonym_batch_under_missing_parent_fails() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let err = dal
    .biodi_qualifier_synonyms(99, &["Administration".to_string()], None)
    .unwrap_err();
  assert!(matches!(err, Error::ForeignKey { .. }), "{err:?}");
}

// ─── Retrieval ───────────────────────────────────────────────────────────────

#[test]
fn get_by_attr_and_missing_rows() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let id = dal.iodu_study(&NewStudy::new("NCT00000102"), None).unwrap();
  let row = dal
    .get_by_attr(&registry::STUDY, "nct_id", "NCT00000102", None)
    .unwrap()
    .unwrap();
  assert_eq!(row.id, id);

  assert!(dal.get(&registry::STUDY, 999, None).unwrap().is_none());
  assert!(
    dal
      .get_by_attr(&registry::STUDY, "nct_id", "NCT99999999", None)
      .unwrap()
      .is_none()
  );

  let err = core_err(dal.get_by_attr(&registry::STUDY, "nct_id; DROP TABLE study", "x", None));
  assert!(matches!(err, trove_core::Error::UnknownAttribute { .. }));
}

#[test]
fn bulk_get_sorts_and_handles_empty_input() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let ids = ["copd", "asthma", "emphysema"]
    .iter()
    .map(|k| dal.iodi_keyword(k, None).unwrap())
    .collect::<Vec<_>>();

  let wanted = [Value::from("emphysema"), Value::from("copd"), Value::from("missing")];
  let rows = dal
    .bget_by_attr(&registry::KEYWORD, "keyword", &wanted, true, None)
    .unwrap();
  assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![ids[0], ids[2]]);

  assert!(
    dal
      .bget_by_attr(&registry::KEYWORD, "keyword", &[], true, None)
      .unwrap()
      .is_empty()
  );
  let err = core_err(dal.bget_by_attr(&registry::KEYWORD, "nope", &[], false, None));
  assert!(matches!(err, trove_core::Error::UnknownAttribute { .. }));
}

#[test]
fn bulk_get_spans_parameter_chunks() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let session = dal.begin().unwrap();
  for i in 0..1_200 {
    dal.iodi_alias(&format!("alias-{i}"), Some(&session)).unwrap();
  }
  session.commit().unwrap();

  let wanted = (0..1_200).map(|i| Value::from(format!("alias-{i}"))).collect::<Vec<_>>();
  let rows = dal.bget_by_attr(&registry::ALIAS, "alias", &wanted, true, None).unwrap();
  assert_eq!(rows.len(), 1_200);
  assert_eq!(rows.first().map(|r| r.id), Some(1));
}

#[test]
fn bulk_get_returns_each_row_once() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let id = dal.iodi_alias("x", None).unwrap();
  let wanted = vec![Value::from("x"); 1_000];
  let rows = dal.bget_by_attr(&registry::ALIAS, "alias", &wanted, false, None).unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].id, id);
}

#[test]
fn joined_rows_follow_relations() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let study = dal.iodu_study(&NewStudy::new("NCT00000102"), None).unwrap();
  for k in ["copd", "asthma"] {
    let keyword = dal.iodi_keyword(k, None).unwrap();
    dal.iodi_study_keyword(study, keyword, None).unwrap();
  }
  let sponsor = dal.iodi_sponsor("NHLBI", Some(AgencyClass::Nih), None).unwrap();
  dal.iodu_study_sponsor(study, sponsor, SponsorType::Lead, None).unwrap();

  let joined = dal
    .get_joined(&registry::STUDY, study, &["keywords", "sponsors", "oversight_info"], None)
    .unwrap()
    .unwrap();
  let keywords = joined
    .related("keywords")
    .iter()
    .filter_map(|r| r.text("keyword"))
    .collect::<Vec<_>>();
  assert_eq!(keywords, vec!["copd", "asthma"]);
  assert_eq!(joined.related("sponsors")[0].text("agency"), Some("NHLBI"));
  assert!(joined.related("oversight_info").is_empty());

  let d = dal.iodu_descriptor(&NewDescriptor::new("D000001", "Calcimycin"), None).unwrap();
  dal.biodi_descriptor_synonyms(d, &["A23187".to_string()], None).unwrap();
  let joined = dal
    .get_joined(&registry::DESCRIPTOR, d, &["synonyms"], None)
    .unwrap()
    .unwrap();
  assert_eq!(joined.related("synonyms").len(), 1);

  let err = core_err(dal.get_joined(&registry::STUDY, study, &["nonsense"], None));
  assert!(matches!(err, trove_core::Error::UnknownRelation { .. }));
  assert!(dal.get_joined(&registry::STUDY, 999, &["keywords"], None).unwrap().is_none());
}

#[test]
fn attribute_update_refreshes_fingerprint() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let id = dal.iodi_keyword("asthma", None).unwrap();
  dal
    .update_attr_value(&registry::KEYWORD, id, "keyword", "copd", None)
    .unwrap();
  assert_eq!(dal.iodi_keyword("COPD", None).unwrap(), id);
  assert_ne!(dal.iodi_keyword("asthma", None).unwrap(), id);

  dal
    .update_attr_value(&registry::KEYWORD, id, "keyword", "Chronic Bronchitis", None)
    .unwrap();
  let row = dal.get(&registry::KEYWORD, id, None).unwrap().unwrap();
  assert_eq!(row.text("keyword"), Some("chronic bronchitis"));
  assert_eq!(dal.iodi_keyword("chronic bronchitis", None).unwrap(), id);

  let err = core_err(dal.update_attr_value(&registry::KEYWORD, id, "keyword", Value::Null, None));
  assert!(matches!(err, trove_core::Error::MissingKeyAttribute { .. }));

  let study = dal.iodu_study(&NewStudy::new("NCT00000102"), None).unwrap();
  dal
    .update_attr_value(&registry::STUDY, study, "enrollment", 120, None)
    .unwrap();
  let row = dal.get(&registry::STUDY, study, None).unwrap().unwrap();
  assert_eq!(row.integer("enrollment"), Some(120));

  let err = dal
    .update_attr_value(&registry::STUDY, 999, "enrollment", 1, None)
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { table: "study", id: 999 }));

  let err = core_err(dal.update_attr_value(&registry::KEYWORD, id, "md5", Value::Null, None));
  assert!(matches!(err, trove_core::Error::UnsupportedOperation { .. }));
}

#[test]
fn delete_reports_existence_and_respects_references() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let alias = dal.iodi_alias("ACT-1", None).unwrap();
  assert!(dal.delete(&registry::ALIAS, alias, None).unwrap());
  assert!(!dal.delete(&registry::ALIAS, alias, None).unwrap());

  let person = dal.iodi_person(&NewPerson::default(), None).unwrap();
  let contact = NewContact { person_id: person, phone: None, phone_ext: None, email: None };
  dal.iodi_contact(&contact, None).unwrap();
  let err = dal.delete(&registry::PERSON, person, None).unwrap_err();
  assert!(matches!(err, Error::ForeignKey { table: "person", .. }), "{err:?}");
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[test]
fn failed_step_rolls_back_the_whole_unit() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let result = dal.with_session(None, |s| {
    dal.iodi_keyword("asthma", Some(s))?;
    let contact = NewContact { person_id: 7, phone: None, phone_ext: None, email: None };
    dal.iodi_contact(&contact, Some(s))
  });
  assert!(matches!(result, Err(Error::ForeignKey { .. })));
  assert_eq!(dal.count(&registry::KEYWORD, None).unwrap(), 0);
}

#[test]
fn supplied_session_is_left_to_its_owner() {
  let conn = conn();
  let dal = Dal::new(&conn);

  let session = dal.begin().unwrap();
  dal.iodi_keyword("asthma", Some(&session)).unwrap();
  dal.iodi_keyword("copd", Some(&session)).unwrap();
  assert_eq!(dal.count(&registry::KEYWORD, Some(&session)).unwrap(), 2);
  session.rollback().unwrap();
  assert_eq!(dal.count(&registry::KEYWORD, None).unwrap(), 0);

  let session = dal.begin().unwrap();
  dal.iodi_keyword("asthma", Some(&session)).unwrap();
  session.commit().unwrap();
  assert_eq!(dal.count(&registry::KEYWORD, None).unwrap(), 1);
}

static GHOST: EntityDescriptor = EntityDescriptor {
  name:      "ghost",
  columns:   &["label"],
  identity:  Identity::NaturalKey(&["label"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[],
};

#[test]
fn conflict_without_row_is_an_invariant_violation() {
  let conn = conn();
  conn
    .execute_batch(
      "CREATE TABLE ghost (id INTEGER PRIMARY KEY, label TEXT NOT NULL UNIQUE);
       CREATE TRIGGER ghost_swallow BEFORE INSERT ON ghost
       BEGIN SELECT RAISE(IGNORE); END;",
    )
    .unwrap();
  let dal = Dal::new(&conn);

  let err = dal
    .iodi(&GHOST, Record::new().with("label", "boo"), None)
    .unwrap_err();
  assert!(
    matches!(&err, Error::InvariantViolation { table: "ghost", key } if key.contains("boo")),
    "{err:?}"
  );
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[test]
fn schema_matches_registry() {
  let conn = conn();
  for entity in registry::ALL {
    let mut stmt = conn
      .prepare(&format!("PRAGMA table_info({})", entity.table()))
      .unwrap();
    let columns = stmt
      .query_map([], |r| r.get::<_, String>(1))
      .unwrap()
      .collect::<rusqlite::Result<Vec<_>>>()
      .unwrap();

    let mut expected = vec!["id".to_string()];
    expected.extend(entity.stored_columns().iter().map(|c| c.to_string()));
    assert_eq!(columns, expected, "table {}", entity.name);
  }
}

#[test]
fn schema_is_idempotent() {
  let conn = conn();
  schema::apply(&conn).unwrap();
  let version: i64 = conn
    .pragma_query_value(None, "user_version", |r| r.get(0))
    .unwrap();
  assert_eq!(version, 1);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[test]
fn concurrent_writers_converge_on_one_row() {
  let path = temp_db();
  let config = StoreConfig { busy_timeout_ms: 10_000 };
  drop(crate::connect(&path, &config).unwrap());

  let handles = (0..8)
    .map(|_| {
      let path = path.clone();
      let config = config.clone();
      thread::spawn(move || {
        let conn = Connection::open(&path).unwrap();
        schema::configure(&conn, config.busy_timeout()).unwrap();
        let dal = Dal::new(&conn);
        dal.iodi_sponsor("Acme Pharma", Some(AgencyClass::Industry), None).unwrap()
      })
    })
    .collect::<Vec<_>>();
  let ids = handles
    .into_iter()
    .map(|h| h.join().unwrap())
    .collect::<Vec<_>>();

  assert!(ids.iter().all(|&id| id == ids[0]));
  let conn = crate::connect(&path, &config).unwrap();
  assert_eq!(Dal::new(&conn).count(&registry::SPONSOR, None).unwrap(), 1);
  drop(conn);
  remove_db(&path);
}

#[test]
fn held_write_lock_reports_busy() {
  let path = temp_db();
  let config = StoreConfig { busy_timeout_ms: 0 };
  let holder = crate::connect(&path, &config).unwrap();
  let other = crate::connect(&path, &config).unwrap();

  let session = Dal::new(&holder).begin().unwrap();
  let err = Dal::new(&other).iodi_keyword("asthma", None).unwrap_err();
  assert!(err.is_busy(), "{err:?}");
  assert!(!Error::NotFound { table: "keyword", id: 1 }.is_busy());

  session.rollback().unwrap();
  Dal::new(&other).iodi_keyword("asthma", None).unwrap();
  drop((holder, other));
  remove_db(&path);
}

// ─── Async warehouse ─────────────────────────────────────────────────────────

#[tokio::test]
async fn warehouse_runs_dal_calls() {
  let warehouse = Warehouse::open_in_memory().await.unwrap();

  let id = warehouse
    .run(|dal| dal.iodi_keyword("Asthma", None))
    .await
    .unwrap();
  let again = warehouse
    .run(|dal| dal.iodi_keyword("asthma", None))
    .await
    .unwrap();
  assert_eq!(id, again);

  let counts = warehouse.counts().await.unwrap();
  assert_eq!(counts.len(), registry::ALL.len());
  assert!(counts.contains(&("keyword", 1)));
}

#[tokio::test]
async fn warehouse_reopens_existing_file() {
  let path = temp_db();

  let warehouse = Warehouse::open(&path).await.unwrap();
  let id = warehouse
    .run(|dal| dal.iodi_condition("Asthma", None))
    .await
    .unwrap();
  drop(warehouse);

  let warehouse = Warehouse::open(&path).await.unwrap();
  let again = warehouse
    .run(|dal| dal.iodi_condition("ASTHMA", None))
    .await
    .unwrap();
  assert_eq!(id, again);
  drop(warehouse);
  remove_db(&path);
}

#[tokio::test]
async fn warehouse_transaction_is_atomic() {
  let warehouse = Warehouse::open_in_memory().await.unwrap();

  let result = warehouse
    .transaction(|dal, s| {
      let study = dal.iodu_study(&NewStudy::new("NCT00000102"), Some(s))?;
      let keyword = dal.iodi_keyword("asthma", Some(s))?;
      dal.iodi_study_keyword(study, keyword + 100, Some(s))
    })
    .await;
  assert!(matches!(result, Err(Error::ForeignKey { .. })));

  let studies = warehouse
    .run(|dal| dal.count(&registry::STUDY, None))
    .await
    .unwrap();
  assert_eq!(studies, 0);

  let link = warehouse
    .transaction(|dal, s| {
      let study = dal.iodu_study(&NewStudy::new("NCT00000102"), Some(s))?;
      let keyword = dal.iodi_keyword("asthma", Some(s))?;
      dal.iodi_study_keyword(study, keyword, Some(s))
    })
    .await
    .unwrap();
  assert_eq!(link, 1);
}
