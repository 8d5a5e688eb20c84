//! Closed vocabularies stored as text columns.
//!
//! Each kind round-trips through its stored spelling: `as_str` on write,
//! [`FromStr`](std::str::FromStr) on read.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, value::Value};

macro_rules! kind {
  (
    $(#[$meta:meta])*
    $name:ident, $label:literal {
      $($variant:ident => $text:literal),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum $name {
      $(#[serde(rename = $text)] $variant),+
    }

    impl $name {
      pub const ALL: &'static [Self] = &[$(Self::$variant),+];

      pub fn as_str(self) -> &'static str {
        match self {
          $(Self::$variant => $text),+
        }
      }
    }

    impl std::str::FromStr for $name {
      type Err = Error;

      fn from_str(s: &str) -> Result<Self> {
        match s {
          $($text => Ok(Self::$variant),)+
          other => Err(Error::UnknownKind {
            kind:  $label,
            value: other.to_owned(),
          }),
        }
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl From<$name> for Value {
      fn from(k: $name) -> Self { Value::Text(k.as_str().to_owned()) }
    }
  };
}

// ─── Clinical trials ─────────────────────────────────────────────────────────

kind! {
  /// Funding agency class of a sponsor.
  AgencyClass, "agency class" {
    Nih      => "nih",
    UsFed    => "us_fed",
    Industry => "industry",
    Other    => "other",
  }
}

kind! {
  /// Role a sponsor plays for one study.
  SponsorType, "sponsor type" {
    Lead         => "lead",
    Collaborator => "collaborator",
  }
}

kind! {
  /// Which browse list a MeSH term was attached to a study from.
  MeshTermType, "mesh term type" {
    Condition    => "condition",
    Intervention => "intervention",
  }
}

kind! {
  InterventionType, "intervention type" {
    Drug               => "drug",
    Device             => "device",
    Biological         => "biological",
    Procedure          => "procedure",
    Radiation          => "radiation",
    Behavioral         => "behavioral",
    Genetic            => "genetic",
    DietarySupplement  => "dietary_supplement",
    CombinationProduct => "combination_product",
    DiagnosticTest     => "diagnostic_test",
    Other              => "other",
  }
}

kind! {
  InvestigatorRole, "investigator role" {
    PrincipalInvestigator => "principal_investigator",
    SubInvestigator       => "sub_investigator",
    StudyChair            => "study_chair",
    StudyDirector         => "study_director",
  }
}

kind! {
  /// Recruitment status of a study or of one of its locations.
  RecruitmentStatus, "recruitment status" {
    NotYetRecruiting      => "not_yet_recruiting",
    Recruiting            => "recruiting",
    EnrollingByInvitation => "enrolling_by_invitation",
    ActiveNotRecruiting   => "active_not_recruiting",
    Suspended             => "suspended",
    Terminated            => "terminated",
    Completed             => "completed",
    Withdrawn             => "withdrawn",
    Unknown               => "unknown",
  }
}

kind! {
  StudyType, "study type" {
    Interventional => "interventional",
    Observational  => "observational",
    ExpandedAccess => "expanded_access",
  }
}

kind! {
  Gender, "gender" {
    All    => "all",
    Female => "female",
    Male   => "male",
  }
}

// ─── Thesaurus ───────────────────────────────────────────────────────────────

kind! {
  /// Lexical category of a MeSH term.
  LexicalTag, "lexical tag" {
    Abb => "abb",
    Abx => "abx",
    Acr => "acr",
    Acx => "acx",
    Epo => "epo",
    Lab => "lab",
    Nam => "nam",
    Non => "non",
    Trd => "trd",
  }
}
