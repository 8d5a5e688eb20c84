//! Typed inputs for MeSH thesaurus entities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{kinds::LexicalTag, value::Record};

/// A descriptor record keyed by its `D…` unique identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDescriptor {
  pub ui:                        String,
  pub name:                      String,
  pub created:                   Option<NaiveDate>,
  pub revised:                   Option<NaiveDate>,
  pub established:               Option<NaiveDate>,
  pub annotation:                Option<String>,
  pub history_note:              Option<String>,
  pub nlm_classification_number: Option<String>,
  pub online_note:               Option<String>,
  pub public_mesh_note:          Option<String>,
  pub consider_also:             Option<String>,
}

impl NewDescriptor {
  pub fn new(ui: impl Into<String>, name: impl Into<String>) -> Self {
    Self { ui: ui.into(), name: name.into(), ..Self::default() }
  }

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("ui", &self.ui)
      .with("name", &self.name)
      .with("created", self.created)
      .with("revised", self.revised)
      .with("established", self.established)
      .with("annotation", self.annotation.as_deref())
      .with("history_note", self.history_note.as_deref())
      .with("nlm_classification_number", self.nlm_classification_number.as_deref())
      .with("online_note", self.online_note.as_deref())
      .with("public_mesh_note", self.public_mesh_note.as_deref())
      .with("consider_also", self.consider_also.as_deref())
  }
}

/// A qualifier (subheading) record keyed by its `Q…` unique identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewQualifier {
  pub ui:           String,
  pub name:         String,
  pub created:      Option<NaiveDate>,
  pub revised:      Option<NaiveDate>,
  pub established:  Option<NaiveDate>,
  pub annotation:   Option<String>,
  pub history_note: Option<String>,
  pub online_note:  Option<String>,
}

impl NewQualifier {
  pub fn new(ui: impl Into<String>, name: impl Into<String>) -> Self {
    Self { ui: ui.into(), name: name.into(), ..Self::default() }
  }

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("ui", &self.ui)
      .with("name", &self.name)
      .with("created", self.created)
      .with("revised", self.revised)
      .with("established", self.established)
      .with("annotation", self.annotation.as_deref())
      .with("history_note", self.history_note.as_deref())
      .with("online_note", self.online_note.as_deref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewConcept {
  pub ui:                             String,
  pub name:                           String,
  pub casn1_name:                     Option<String>,
  pub registry_number:                Option<String>,
  pub scope_note:                     Option<String>,
  pub translators_english_scope_note: Option<String>,
  pub translators_scope_note:         Option<String>,
}

impl NewConcept {
  pub fn new(ui: impl Into<String>, name: impl Into<String>) -> Self {
    Self { ui: ui.into(), name: name.into(), ..Self::default() }
  }

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("ui", &self.ui)
      .with("name", &self.name)
      .with("casn1_name", self.casn1_name.as_deref())
      .with("registry_number", self.registry_number.as_deref())
      .with("scope_note", self.scope_note.as_deref())
      .with(
        "translators_english_scope_note",
        self.translators_english_scope_note.as_deref(),
      )
      .with("translators_scope_note", self.translators_scope_note.as_deref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTerm {
  pub ui:            String,
  pub name:          String,
  pub created:       Option<NaiveDate>,
  pub abbreviation:  Option<String>,
  pub sort_version:  Option<String>,
  pub entry_version: Option<String>,
  pub note:          Option<String>,
}

impl NewTerm {
  pub fn new(ui: impl Into<String>, name: impl Into<String>) -> Self {
    Self { ui: ui.into(), name: name.into(), ..Self::default() }
  }

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("ui", &self.ui)
      .with("name", &self.name)
      .with("created", self.created)
      .with("abbreviation", self.abbreviation.as_deref())
      .with("sort_version", self.sort_version.as_deref())
      .with("entry_version", self.entry_version.as_deref())
      .with("note", self.note.as_deref())
  }
}

/// Per-link attributes of a term within a concept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFlags {
  #[serde(default)]
  pub is_concept_preferred: bool,
  #[serde(default)]
  pub is_record_preferred:  bool,
  #[serde(default)]
  pub is_permuted:          bool,
  pub lexical_tag:          Option<LexicalTag>,
}
