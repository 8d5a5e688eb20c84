//! Typed inputs for clinical-trial entities.
//!
//! These mirror the shapes the registration parser emits. Each converts into
//! the [`Record`] its registry descriptor expects; key attributes that are
//! foreign keys are plain `i64`s resolved by earlier calls.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  kinds::{Gender, InterventionType, InvestigatorRole, RecruitmentStatus, StudyType},
  value::Record,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIntervention {
  pub intervention_type: InterventionType,
  pub name:              String,
  pub description:       Option<String>,
}

impl NewIntervention {
  pub fn to_record(&self) -> Record {
    Record::new()
      .with("intervention_type", self.intervention_type)
      .with("name", &self.name)
      .with("description", self.description.as_deref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPerson {
  pub name_first:  Option<String>,
  pub name_middle: Option<String>,
  pub name_last:   Option<String>,
  pub degrees:     Option<String>,
}

impl NewPerson {
  pub fn to_record(&self) -> Record {
    Record::new()
      .with("name_first", self.name_first.as_deref())
      .with("name_middle", self.name_middle.as_deref())
      .with("name_last", self.name_last.as_deref())
      .with("degrees", self.degrees.as_deref())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
  pub person_id: i64,
  pub phone:     Option<String>,
  pub phone_ext: Option<String>,
  pub email:     Option<String>,
}

impl NewContact {
  pub fn to_record(&self) -> Record {
    Record::new()
      .with("person_id", self.person_id)
      .with("phone", self.phone.as_deref())
      .with("phone_ext", self.phone_ext.as_deref())
      .with("email", self.email.as_deref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewFacility {
  pub name:     Option<String>,
  pub city:     Option<String>,
  pub state:    Option<String>,
  pub zip_code: Option<String>,
  pub country:  Option<String>,
}

impl NewFacility {
  pub fn to_record(&self) -> Record {
    Record::new()
      .with("name", self.name.as_deref())
      .with("city", self.city.as_deref())
      .with("state", self.state.as_deref())
      .with("zip_code", self.zip_code.as_deref())
      .with("country", self.country.as_deref())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvestigator {
  pub person_id:   i64,
  pub role:        Option<InvestigatorRole>,
  pub affiliation: Option<String>,
}

impl NewInvestigator {
  pub fn to_record(&self) -> Record {
    Record::new()
      .with("person_id", self.person_id)
      .with("role", self.role)
      .with("affiliation", self.affiliation.as_deref())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
  pub facility_id:        i64,
  pub status:             Option<RecruitmentStatus>,
  pub contact_primary_id: Option<i64>,
  pub contact_backup_id:  Option<i64>,
}

impl NewLocation {
  pub fn to_record(&self) -> Record {
    Record::new()
      .with("facility_id", self.facility_id)
      .with("status", self.status)
      .with("contact_primary_id", self.contact_primary_id)
      .with("contact_backup_id", self.contact_backup_id)
  }
}

/// Oversight block of one registration; stored once per ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewOversightInfo {
  pub has_dmc:                 Option<bool>,
  pub is_fda_regulated_drug:   Option<bool>,
  pub is_fda_regulated_device: Option<bool>,
  pub is_unapproved_device:    Option<bool>,
  pub is_ppsd:                 Option<bool>,
  pub is_us_export:            Option<bool>,
}

impl NewOversightInfo {
  pub fn to_record(&self) -> Record {
    Record::new()
      .with("has_dmc", self.has_dmc)
      .with("is_fda_regulated_drug", self.is_fda_regulated_drug)
      .with("is_fda_regulated_device", self.is_fda_regulated_device)
      .with("is_unapproved_device", self.is_unapproved_device)
      .with("is_ppsd", self.is_ppsd)
      .with("is_us_export", self.is_us_export)
  }
}

/// Eligibility block of one registration; stored once per ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEligibility {
  pub study_pop:          Option<String>,
  pub sampling_method:    Option<String>,
  pub criteria:           Option<String>,
  pub gender:             Option<Gender>,
  pub gender_based:       Option<bool>,
  pub gender_description: Option<String>,
  pub minimum_age:        Option<String>,
  pub maximum_age:        Option<String>,
  pub healthy_volunteers: Option<String>,
}

impl NewEligibility {
  pub fn to_record(&self) -> Record {
    Record::new()
      .with("study_pop", self.study_pop.as_deref())
      .with("sampling_method", self.sampling_method.as_deref())
      .with("criteria", self.criteria.as_deref())
      .with("gender", self.gender)
      .with("gender_based", self.gender_based)
      .with("gender_description", self.gender_description.as_deref())
      .with("minimum_age", self.minimum_age.as_deref())
      .with("maximum_age", self.maximum_age.as_deref())
      .with("healthy_volunteers", self.healthy_volunteers.as_deref())
  }
}

/// A registration keyed by its NCT accession. Everything but `nct_id` is
/// overwritten when the registration is re-ingested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStudy {
  pub nct_id:             String,
  pub org_study_id:       Option<String>,
  pub brief_title:        Option<String>,
  pub acronym:            Option<String>,
  pub official_title:     Option<String>,
  pub brief_summary:      Option<String>,
  pub overall_status:     Option<RecruitmentStatus>,
  pub start_date:         Option<NaiveDate>,
  pub completion_date:    Option<NaiveDate>,
  pub study_type:         Option<StudyType>,
  pub phase:              Option<String>,
  pub enrollment:         Option<i64>,
  pub last_update_posted: Option<NaiveDate>,
  #[serde(skip)]
  pub oversight_info_id:  Option<i64>,
  #[serde(skip)]
  pub eligibility_id:     Option<i64>,
}

impl NewStudy {
  pub fn new(nct_id: impl Into<String>) -> Self {
    Self { nct_id: nct_id.into(), ..Self::default() }
  }

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("nct_id", &self.nct_id)
      .with("org_study_id", self.org_study_id.as_deref())
      .with("brief_title", self.brief_title.as_deref())
      .with("acronym", self.acronym.as_deref())
      .with("official_title", self.official_title.as_deref())
      .with("brief_summary", self.brief_summary.as_deref())
      .with("overall_status", self.overall_status)
      .with("start_date", self.start_date)
      .with("completion_date", self.completion_date)
      .with("study_type", self.study_type)
      .with("phase", self.phase.as_deref())
      .with("enrollment", self.enrollment)
      .with("last_update_posted", self.last_update_posted)
      .with("oversight_info_id", self.oversight_info_id)
      .with("eligibility_id", self.eligibility_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{registry, value::Value};

  #[test]
  fn records_match_their_descriptors() {
    let study = NewStudy {
      overall_status: Some(RecruitmentStatus::Recruiting),
      start_date: NaiveDate::from_ymd_opt(2019, 5, 1),
      ..NewStudy::new("NCT00000102")
    };
    registry::STUDY.check_record(&study.to_record()).unwrap();
    registry::ELIGIBILITY
      .check_record(&NewEligibility::default().to_record())
      .unwrap();
    registry::OVERSIGHT_INFO
      .check_record(&NewOversightInfo::default().to_record())
      .unwrap();
    registry::PERSON
      .check_record(&NewPerson::default().to_record())
      .unwrap();
    registry::FACILITY
      .check_record(&NewFacility::default().to_record())
      .unwrap();
    let location = NewLocation {
      facility_id:        1,
      status:             None,
      contact_primary_id: None,
      contact_backup_id:  None,
    };
    registry::LOCATION.check_record(&location.to_record()).unwrap();
  }

  #[test]
  fn study_record_carries_kinds_as_text() {
    let study = NewStudy {
      study_type: Some(StudyType::Interventional),
      ..NewStudy::new("NCT1")
    };
    let record = study.to_record();
    assert_eq!(
      record.get("study_type"),
      Some(&Value::Text("interventional".into()))
    );
    assert_eq!(record.get("phase"), Some(&Value::Null));
  }
}
