//! Per-entity operations for the MeSH thesaurus.

use trove_core::{
  Fingerprint, Record, Row, Value,
  registry,
  thesaurus::{NewConcept, NewDescriptor, NewQualifier, NewTerm, TermFlags},
};

use crate::{Dal, Result, Session};

impl Dal<'_> {
  pub fn iodu_descriptor(
    &self,
    descriptor: &NewDescriptor,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodu(&registry::DESCRIPTOR, descriptor.to_record(), session)
  }

  pub fn iodu_qualifier(
    &self,
    qualifier: &NewQualifier,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodu(&registry::QUALIFIER, qualifier.to_record(), session)
  }

  pub fn iodu_concept(
    &self,
    concept: &NewConcept,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodu(&registry::CONCEPT, concept.to_record(), session)
  }

  pub fn iodu_term(&self, term: &NewTerm, session: Option<&Session<'_>>) -> Result<i64> {
    self.iodu(&registry::TERM, term.to_record(), session)
  }

  /// Tree numbers are matched exactly; `C04.557` and `c04.557` are distinct.
  pub fn iodi_tree_number(
    &self,
    tree_number: &str,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new().with("tree_number", tree_number);
    self.iodi(&registry::TREE_NUMBER, record, session)
  }

  pub fn iodi_descriptor_tree_number(
    &self,
    descriptor_id: i64,
    tree_number_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::DESCRIPTOR_TREE_NUMBER,
      ("descriptor_id", descriptor_id),
      ("tree_number_id", tree_number_id),
      session,
    )
  }

  pub fn iodi_qualifier_tree_number(
    &self,
    qualifier_id: i64,
    tree_number_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::QUALIFIER_TREE_NUMBER,
      ("qualifier_id", qualifier_id),
      ("tree_number_id", tree_number_id),
      session,
    )
  }

  pub fn iodi_descriptor_allowable_qualifier(
    &self,
    descriptor_id: i64,
    qualifier_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::DESCRIPTOR_ALLOWABLE_QUALIFIER,
      ("descriptor_id", descriptor_id),
      ("qualifier_id", qualifier_id),
      session,
    )
  }

  pub fn iodu_descriptor_concept(
    &self,
    descriptor_id: i64,
    concept_id: i64,
    is_preferred: bool,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new()
      .with("descriptor_id", descriptor_id)
      .with("concept_id", concept_id)
      .with("is_preferred", is_preferred);
    self.iodu(&registry::DESCRIPTOR_CONCEPT, record, session)
  }

  pub fn iodu_qualifier_concept(
    &self,
    qualifier_id: i64,
    concept_id: i64,
    is_preferred: bool,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new()
      .with("qualifier_id", qualifier_id)
      .with("concept_id", concept_id)
      .with("is_preferred", is_preferred);
    self.iodu(&registry::QUALIFIER_CONCEPT, record, session)
  }

  pub fn iodu_concept_term(
    &self,
    concept_id: i64,
    term_id: i64,
    flags: TermFlags,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new()
      .with("concept_id", concept_id)
      .with("term_id", term_id)
      .with("is_concept_preferred", flags.is_concept_preferred)
      .with("is_record_preferred", flags.is_record_preferred)
      .with("is_permuted", flags.is_permuted)
      .with("lexical_tag", flags.lexical_tag);
    self.iodu(&registry::CONCEPT_TERM, record, session)
  }

  /// Attach synonyms to a descriptor, skipping ones it already carries
  /// (case-insensitively). Returns how many were new.
  pub fn biodi_descriptor_synonyms(
    &self,
    descriptor_id: i64,
    synonyms: &[String],
    session: Option<&Session<'_>>,
  ) -> Result<usize> {
    let (records, fingerprints) = synonym_rows(synonyms);
    self.biodi(
      &registry::DESCRIPTOR_SYNONYM,
      descriptor_id,
      &records,
      &fingerprints,
      session,
    )
  }

  pub fn biodi_qualifier_synonyms(
    &self,
    qualifier_id: i64,
    synonyms: &[String],
    session: Option<&Session<'_>>,
  ) -> Result<usize> {
    let (records, fingerprints) = synonym_rows(synonyms);
    self.biodi(
      &registry::QUALIFIER_SYNONYM,
      qualifier_id,
      &records,
      &fingerprints,
      session,
    )
  }

  /// Every synonym row of the given descriptors, in key order.
  pub fn bget_descriptor_synonyms(
    &self,
    descriptor_ids: &[i64],
    session: Option<&Session<'_>>,
  ) -> Result<Vec<Row>> {
    let values = descriptor_ids.iter().copied().map(Value::from).collect::<Vec<_>>();
    self.bget_by_attr(&registry::DESCRIPTOR_SYNONYM, "descriptor_id", &values, true, session)
  }
}

fn synonym_rows(synonyms: &[String]) -> (Vec<Record>, Vec<Fingerprint>) {
  synonyms
    .iter()
    .map(|s| {
      let record = Record::new().with("synonym", s);
      let fp = Fingerprint::of([&Value::from(s)], true);
      (record, fp)
    })
    .unzip()
}
