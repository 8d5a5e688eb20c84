//! Per-entity operations for the clinical-trial side of the warehouse.
//!
//! Each is a thin call into the generic protocols with the entity's
//! descriptor; references to other rows are keys returned by earlier calls.

use trove_core::{
  Record,
  clinical::{
    NewContact, NewEligibility, NewFacility, NewIntervention, NewInvestigator,
    NewLocation, NewOversightInfo, NewPerson, NewStudy,
  },
  kinds::{AgencyClass, MeshTermType, SponsorType},
  registry,
};

use crate::{Dal, Result, Session};

impl Dal<'_> {
  // ─── Reference entities ────────────────────────────────────────────────────

  /// Keywords match case-insensitively and are stored lower-cased.
  pub fn iodi_keyword(&self, keyword: &str, session: Option<&Session<'_>>) -> Result<i64> {
    let record = Record::new().with("keyword", keyword);
    self.iodi(&registry::KEYWORD, record, session)
  }

  pub fn iodi_condition(
    &self,
    condition: &str,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new().with("condition", condition);
    self.iodi(&registry::CONDITION, record, session)
  }

  pub fn iodi_intervention(
    &self,
    intervention: &NewIntervention,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodi(&registry::INTERVENTION, intervention.to_record(), session)
  }

  pub fn iodi_sponsor(
    &self,
    agency: &str,
    agency_class: Option<AgencyClass>,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new()
      .with("agency", agency)
      .with("agency_class", agency_class);
    self.iodi(&registry::SPONSOR, record, session)
  }

  pub fn iodi_person(
    &self,
    person: &NewPerson,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodi(&registry::PERSON, person.to_record(), session)
  }

  /// Fails with [`Error::ForeignKey`](crate::Error::ForeignKey) if the
  /// person does not exist.
  pub fn iodi_contact(
    &self,
    contact: &NewContact,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodi(&registry::CONTACT, contact.to_record(), session)
  }

  pub fn iodi_facility(
    &self,
    facility: &NewFacility,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodi(&registry::FACILITY, facility.to_record(), session)
  }

  pub fn iodi_investigator(
    &self,
    investigator: &NewInvestigator,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodi(&registry::INVESTIGATOR, investigator.to_record(), session)
  }

  pub fn iodi_location(
    &self,
    location: &NewLocation,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.iodi(&registry::LOCATION, location.to_record(), session)
  }

  pub fn iodi_alias(&self, alias: &str, session: Option<&Session<'_>>) -> Result<i64> {
    self.iodi(&registry::ALIAS, Record::new().with("alias", alias), session)
  }

  pub fn iodi_mesh_term(&self, term: &str, session: Option<&Session<'_>>) -> Result<i64> {
    self.iodi(&registry::MESH_TERM, Record::new().with("term", term), session)
  }

  // ─── Per-study facts ───────────────────────────────────────────────────────

  pub fn insert_oversight_info(
    &self,
    oversight: &NewOversightInfo,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.insert(&registry::OVERSIGHT_INFO, oversight.to_record(), session)
  }

  pub fn insert_eligibility(
    &self,
    eligibility: &NewEligibility,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.insert(&registry::ELIGIBILITY, eligibility.to_record(), session)
  }

  /// Insert the study, or overwrite every non-key attribute of the existing
  /// registration with the same NCT ID.
  pub fn iodu_study(&self, study: &NewStudy, session: Option<&Session<'_>>) -> Result<i64> {
    self.iodu(&registry::STUDY, study.to_record(), session)
  }

  // ─── Associations ──────────────────────────────────────────────────────────

  pub fn iodi_study_keyword(
    &self,
    study_id: i64,
    keyword_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::STUDY_KEYWORD,
      ("study_id", study_id),
      ("keyword_id", keyword_id),
      session,
    )
  }

  pub fn iodi_study_condition(
    &self,
    study_id: i64,
    condition_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::STUDY_CONDITION,
      ("study_id", study_id),
      ("condition_id", condition_id),
      session,
    )
  }

  pub fn iodi_study_intervention(
    &self,
    study_id: i64,
    intervention_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::STUDY_INTERVENTION,
      ("study_id", study_id),
      ("intervention_id", intervention_id),
      session,
    )
  }

  pub fn iodi_study_alias(
    &self,
    study_id: i64,
    alias_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::STUDY_ALIAS,
      ("study_id", study_id),
      ("alias_id", alias_id),
      session,
    )
  }

  pub fn iodi_study_facility(
    &self,
    study_id: i64,
    facility_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::STUDY_FACILITY,
      ("study_id", study_id),
      ("facility_id", facility_id),
      session,
    )
  }

  pub fn iodi_study_investigator(
    &self,
    study_id: i64,
    investigator_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::STUDY_INVESTIGATOR,
      ("study_id", study_id),
      ("investigator_id", investigator_id),
      session,
    )
  }

  pub fn iodi_study_location(
    &self,
    study_id: i64,
    location_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::STUDY_LOCATION,
      ("study_id", study_id),
      ("location_id", location_id),
      session,
    )
  }

  pub fn iodi_location_investigator(
    &self,
    location_id: i64,
    investigator_id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.link(
      &registry::LOCATION_INVESTIGATOR,
      ("location_id", location_id),
      ("investigator_id", investigator_id),
      session,
    )
  }

  /// A sponsor's role on a study is overwritten on re-link.
  pub fn iodu_study_sponsor(
    &self,
    study_id: i64,
    sponsor_id: i64,
    sponsor_type: SponsorType,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new()
      .with("study_id", study_id)
      .with("sponsor_id", sponsor_id)
      .with("sponsor_type", sponsor_type);
    self.iodu(&registry::STUDY_SPONSOR, record, session)
  }

  pub fn iodu_study_mesh_term(
    &self,
    study_id: i64,
    mesh_term_id: i64,
    mesh_term_type: MeshTermType,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new()
      .with("study_id", study_id)
      .with("mesh_term_id", mesh_term_id)
      .with("mesh_term_type", mesh_term_type);
    self.iodu(&registry::STUDY_MESH_TERM, record, session)
  }

  /// IODI of a two-key association row.
  pub(crate) fn link(
    &self,
    entity: &'static trove_core::EntityDescriptor,
    near: (&'static str, i64),
    far: (&'static str, i64),
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    let record = Record::new().with(near.0, near.1).with(far.0, far.1);
    self.iodi(entity, record, session)
  }
}
