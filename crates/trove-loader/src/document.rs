//! JSON shapes of the parsed records the loader ingests.
//!
//! A study document is one trial registration with its nested people,
//! places and vocabulary; a descriptor document is one MeSH descriptor with
//! its concepts, terms and qualifiers; a qualifier document is one MeSH
//! qualifier with its tree numbers, concepts and synonyms. Scalar attributes use the same field
//! names as the warehouse columns.

use serde::{Deserialize, Serialize};
use trove_core::{
  Record,
  clinical::{
    NewEligibility, NewFacility, NewIntervention, NewOversightInfo, NewPerson, NewStudy,
  },
  kinds::{AgencyClass, InvestigatorRole, RecruitmentStatus},
  thesaurus::{NewConcept, NewDescriptor, NewQualifier, NewTerm, TermFlags},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyDocument {
  #[serde(flatten)]
  pub study:              NewStudy,
  #[serde(default)]
  pub oversight_info:     Option<NewOversightInfo>,
  #[serde(default)]
  pub eligibility:        Option<NewEligibility>,
  #[serde(default)]
  pub keywords:           Vec<String>,
  #[serde(default)]
  pub conditions:         Vec<String>,
  #[serde(default)]
  pub interventions:      Vec<NewIntervention>,
  #[serde(default)]
  pub aliases:            Vec<String>,
  #[serde(default)]
  pub lead_sponsor:       Option<SponsorDocument>,
  #[serde(default)]
  pub collaborators:      Vec<SponsorDocument>,
  /// MeSH headings the registry assigned to the conditions.
  #[serde(default)]
  pub mesh_conditions:    Vec<String>,
  /// MeSH headings the registry assigned to the interventions.
  #[serde(default)]
  pub mesh_interventions: Vec<String>,
  #[serde(default)]
  pub overall_officials:  Vec<InvestigatorDocument>,
  #[serde(default)]
  pub locations:          Vec<LocationDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorDocument {
  pub agency:       String,
  #[serde(default)]
  pub agency_class: Option<AgencyClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigatorDocument {
  #[serde(flatten)]
  pub person:      NewPerson,
  #[serde(default)]
  pub role:        Option<InvestigatorRole>,
  #[serde(default)]
  pub affiliation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDocument {
  #[serde(flatten)]
  pub person:    NewPerson,
  #[serde(default)]
  pub phone:     Option<String>,
  #[serde(default)]
  pub phone_ext: Option<String>,
  #[serde(default)]
  pub email:     Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDocument {
  pub facility:        NewFacility,
  #[serde(default)]
  pub status:          Option<RecruitmentStatus>,
  #[serde(default)]
  pub contact_primary: Option<ContactDocument>,
  #[serde(default)]
  pub contact_backup:  Option<ContactDocument>,
  #[serde(default)]
  pub investigators:   Vec<InvestigatorDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorDocument {
  #[serde(flatten)]
  pub descriptor:           NewDescriptor,
  #[serde(default)]
  pub tree_numbers:         Vec<String>,
  #[serde(default)]
  pub allowable_qualifiers: Vec<QualifierRef>,
  #[serde(default)]
  pub concepts:             Vec<ConceptDocument>,
  #[serde(default)]
  pub synonyms:             Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifierDocument {
  #[serde(flatten)]
  pub qualifier:    NewQualifier,
  #[serde(default)]
  pub tree_numbers: Vec<String>,
  #[serde(default)]
  pub concepts:     Vec<ConceptDocument>,
  #[serde(default)]
  pub synonyms:     Vec<String>,
}

/// A qualifier as referenced from a descriptor: identifier and name only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifierRef {
  pub ui:   String,
  pub name: String,
}

impl QualifierRef {
  /// Only `ui` and `name`, so an upsert leaves the qualifier's other
  /// attributes alone.
  pub fn to_record(&self) -> Record {
    Record::new().with("ui", &self.ui).with("name", &self.name)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDocument {
  #[serde(flatten)]
  pub concept:      NewConcept,
  #[serde(default)]
  pub is_preferred: bool,
  #[serde(default)]
  pub terms:        Vec<TermDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermDocument {
  #[serde(flatten)]
  pub term:  NewTerm,
  #[serde(flatten)]
  pub flags: TermFlags,
}
