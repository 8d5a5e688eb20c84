//! The warehouse entity registry.
//!
//! One static [`EntityDescriptor`] per table. Adding a table to the loader is
//! a matter of adding a row here, a table to the schema, and (optionally) a
//! typed wrapper in the store crate.

use crate::{
  Error, Result,
  entity::{ConflictPolicy, EntityDescriptor, Identity, Relation, RelationKind},
};

/// Column holding the MD5 fingerprint of fingerprinted entities.
pub const HASH: &str = "md5";

const fn hashed(fields: &'static [&'static str]) -> Identity {
  Identity::Fingerprint { column: HASH, fields, fold_case: true, scope: None }
}

const fn scoped(scope: &'static str, fields: &'static [&'static str]) -> Identity {
  Identity::Fingerprint { column: HASH, fields, fold_case: true, scope: Some(scope) }
}

// ─── Clinical trials: reference entities ─────────────────────────────────────

pub static KEYWORD: EntityDescriptor = EntityDescriptor {
  name:      "keyword",
  columns:   &["keyword"],
  identity:  hashed(&["keyword"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["keyword"],
  lowercase: &["keyword"],
  relations: &[],
};

pub static CONDITION: EntityDescriptor = EntityDescriptor {
  name:      "condition",
  columns:   &["condition"],
  identity:  hashed(&["condition"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["condition"],
  lowercase: &[],
  relations: &[],
};

pub static INTERVENTION: EntityDescriptor = EntityDescriptor {
  name:      "intervention",
  columns:   &["intervention_type", "name", "description"],
  identity:  hashed(&["intervention_type", "name", "description"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["intervention_type", "name"],
  lowercase: &[],
  relations: &[],
};

pub static SPONSOR: EntityDescriptor = EntityDescriptor {
  name:      "sponsor",
  columns:   &["agency", "agency_class"],
  identity:  hashed(&["agency", "agency_class"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["agency"],
  lowercase: &[],
  relations: &[],
};

pub static PERSON: EntityDescriptor = EntityDescriptor {
  name:      "person",
  columns:   &["name_first", "name_middle", "name_last", "degrees"],
  identity:  hashed(&["name_first", "name_middle", "name_last", "degrees"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[],
};

pub static CONTACT: EntityDescriptor = EntityDescriptor {
  name:      "contact",
  columns:   &["person_id", "phone", "phone_ext", "email"],
  identity:  hashed(&["person_id", "phone", "phone_ext", "email"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["person_id"],
  lowercase: &[],
  relations: &[Relation {
    name: "person",
    kind: RelationKind::ToOne { column: "person_id", target: &PERSON },
  }],
};

pub static FACILITY: EntityDescriptor = EntityDescriptor {
  name:      "facility",
  columns:   &["name", "city", "state", "zip_code", "country"],
  identity:  hashed(&["name", "city", "state", "zip_code", "country"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[],
};

pub static INVESTIGATOR: EntityDescriptor = EntityDescriptor {
  name:      "investigator",
  columns:   &["person_id", "role", "affiliation"],
  identity:  hashed(&["person_id", "role", "affiliation"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["person_id"],
  lowercase: &[],
  relations: &[Relation {
    name: "person",
    kind: RelationKind::ToOne { column: "person_id", target: &PERSON },
  }],
};

pub static LOCATION: EntityDescriptor = EntityDescriptor {
  name:      "location",
  columns:   &["facility_id", "status", "contact_primary_id", "contact_backup_id"],
  identity:  hashed(&["facility_id", "status", "contact_primary_id", "contact_backup_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["facility_id"],
  lowercase: &[],
  relations: &[
    Relation {
      name: "facility",
      kind: RelationKind::ToOne { column: "facility_id", target: &FACILITY },
    },
    Relation {
      name: "contact_primary",
      kind: RelationKind::ToOne { column: "contact_primary_id", target: &CONTACT },
    },
    Relation {
      name: "contact_backup",
      kind: RelationKind::ToOne { column: "contact_backup_id", target: &CONTACT },
    },
    Relation {
      name: "investigators",
      kind: RelationKind::Through {
        link:   &LOCATION_INVESTIGATOR,
        near:   "location_id",
        far:    "investigator_id",
        target: &INVESTIGATOR,
      },
    },
  ],
};

pub static ALIAS: EntityDescriptor = EntityDescriptor {
  name:      "alias",
  columns:   &["alias"],
  identity:  hashed(&["alias"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["alias"],
  lowercase: &[],
  relations: &[],
};

pub static MESH_TERM: EntityDescriptor = EntityDescriptor {
  name:      "mesh_term",
  columns:   &["term"],
  identity:  hashed(&["term"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["term"],
  lowercase: &[],
  relations: &[],
};

// ─── Clinical trials: unkeyed facts ──────────────────────────────────────────

pub static OVERSIGHT_INFO: EntityDescriptor = EntityDescriptor {
  name:      "oversight_info",
  columns:   &[
    "has_dmc",
    "is_fda_regulated_drug",
    "is_fda_regulated_device",
    "is_unapproved_device",
    "is_ppsd",
    "is_us_export",
  ],
  identity:  Identity::Unkeyed,
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[],
};

pub static ELIGIBILITY: EntityDescriptor = EntityDescriptor {
  name:      "eligibility",
  columns:   &[
    "study_pop",
    "sampling_method",
    "criteria",
    "gender",
    "gender_based",
    "gender_description",
    "minimum_age",
    "maximum_age",
    "healthy_volunteers",
  ],
  identity:  Identity::Unkeyed,
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[],
};

// ─── Clinical trials: studies ────────────────────────────────────────────────

const STUDY_MUTABLE: &[&str] = &[
  "org_study_id",
  "brief_title",
  "acronym",
  "official_title",
  "brief_summary",
  "overall_status",
  "start_date",
  "completion_date",
  "study_type",
  "phase",
  "enrollment",
  "last_update_posted",
  "oversight_info_id",
  "eligibility_id",
];

pub static STUDY: EntityDescriptor = EntityDescriptor {
  name:      "study",
  columns:   &[
    "nct_id",
    "org_study_id",
    "brief_title",
    "acronym",
    "official_title",
    "brief_summary",
    "overall_status",
    "start_date",
    "completion_date",
    "study_type",
    "phase",
    "enrollment",
    "last_update_posted",
    "oversight_info_id",
    "eligibility_id",
  ],
  identity:  Identity::NaturalKey(&["nct_id"]),
  policy:    ConflictPolicy::Update(STUDY_MUTABLE),
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "oversight_info",
      kind: RelationKind::ToOne { column: "oversight_info_id", target: &OVERSIGHT_INFO },
    },
    Relation {
      name: "eligibility",
      kind: RelationKind::ToOne { column: "eligibility_id", target: &ELIGIBILITY },
    },
    Relation {
      name: "keywords",
      kind: RelationKind::Through {
        link:   &STUDY_KEYWORD,
        near:   "study_id",
        far:    "keyword_id",
        target: &KEYWORD,
      },
    },
    Relation {
      name: "conditions",
      kind: RelationKind::Through {
        link:   &STUDY_CONDITION,
        near:   "study_id",
        far:    "condition_id",
        target: &CONDITION,
      },
    },
    Relation {
      name: "interventions",
      kind: RelationKind::Through {
        link:   &STUDY_INTERVENTION,
        near:   "study_id",
        far:    "intervention_id",
        target: &INTERVENTION,
      },
    },
    Relation {
      name: "aliases",
      kind: RelationKind::Through {
        link:   &STUDY_ALIAS,
        near:   "study_id",
        far:    "alias_id",
        target: &ALIAS,
      },
    },
    Relation {
      name: "sponsors",
      kind: RelationKind::Through {
        link:   &STUDY_SPONSOR,
        near:   "study_id",
        far:    "sponsor_id",
        target: &SPONSOR,
      },
    },
    Relation {
      name: "sponsor_links",
      kind: RelationKind::ToMany { target: &STUDY_SPONSOR, column: "study_id" },
    },
    Relation {
      name: "mesh_terms",
      kind: RelationKind::Through {
        link:   &STUDY_MESH_TERM,
        near:   "study_id",
        far:    "mesh_term_id",
        target: &MESH_TERM,
      },
    },
    Relation {
      name: "facilities",
      kind: RelationKind::Through {
        link:   &STUDY_FACILITY,
        near:   "study_id",
        far:    "facility_id",
        target: &FACILITY,
      },
    },
    Relation {
      name: "locations",
      kind: RelationKind::Through {
        link:   &STUDY_LOCATION,
        near:   "study_id",
        far:    "location_id",
        target: &LOCATION,
      },
    },
    Relation {
      name: "investigators",
      kind: RelationKind::Through {
        link:   &STUDY_INVESTIGATOR,
        near:   "study_id",
        far:    "investigator_id",
        target: &INVESTIGATOR,
      },
    },
  ],
};

// ─── Clinical trials: associations ───────────────────────────────────────────

pub static STUDY_KEYWORD: EntityDescriptor = EntityDescriptor {
  name:      "study_keyword",
  columns:   &["study_id", "keyword_id"],
  identity:  Identity::NaturalKey(&["study_id", "keyword_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "keyword",
      kind: RelationKind::ToOne { column: "keyword_id", target: &KEYWORD },
    },
  ],
};

pub static STUDY_CONDITION: EntityDescriptor = EntityDescriptor {
  name:      "study_condition",
  columns:   &["study_id", "condition_id"],
  identity:  Identity::NaturalKey(&["study_id", "condition_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "condition",
      kind: RelationKind::ToOne { column: "condition_id", target: &CONDITION },
    },
  ],
};

pub static STUDY_INTERVENTION: EntityDescriptor = EntityDescriptor {
  name:      "study_intervention",
  columns:   &["study_id", "intervention_id"],
  identity:  Identity::NaturalKey(&["study_id", "intervention_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "intervention",
      kind: RelationKind::ToOne { column: "intervention_id", target: &INTERVENTION },
    },
  ],
};

pub static STUDY_ALIAS: EntityDescriptor = EntityDescriptor {
  name:      "study_alias",
  columns:   &["study_id", "alias_id"],
  identity:  Identity::NaturalKey(&["study_id", "alias_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "alias",
      kind: RelationKind::ToOne { column: "alias_id", target: &ALIAS },
    },
  ],
};

pub static STUDY_FACILITY: EntityDescriptor = EntityDescriptor {
  name:      "study_facility",
  columns:   &["study_id", "facility_id"],
  identity:  Identity::NaturalKey(&["study_id", "facility_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "facility",
      kind: RelationKind::ToOne { column: "facility_id", target: &FACILITY },
    },
  ],
};

pub static STUDY_INVESTIGATOR: EntityDescriptor = EntityDescriptor {
  name:      "study_investigator",
  columns:   &["study_id", "investigator_id"],
  identity:  Identity::NaturalKey(&["study_id", "investigator_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "investigator",
      kind: RelationKind::ToOne { column: "investigator_id", target: &INVESTIGATOR },
    },
  ],
};

pub static STUDY_LOCATION: EntityDescriptor = EntityDescriptor {
  name:      "study_location",
  columns:   &["study_id", "location_id"],
  identity:  Identity::NaturalKey(&["study_id", "location_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "location",
      kind: RelationKind::ToOne { column: "location_id", target: &LOCATION },
    },
  ],
};

pub static LOCATION_INVESTIGATOR: EntityDescriptor = EntityDescriptor {
  name:      "location_investigator",
  columns:   &["location_id", "investigator_id"],
  identity:  Identity::NaturalKey(&["location_id", "investigator_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "location",
      kind: RelationKind::ToOne { column: "location_id", target: &LOCATION },
    },
    Relation {
      name: "investigator",
      kind: RelationKind::ToOne { column: "investigator_id", target: &INVESTIGATOR },
    },
  ],
};

pub static STUDY_SPONSOR: EntityDescriptor = EntityDescriptor {
  name:      "study_sponsor",
  columns:   &["study_id", "sponsor_id", "sponsor_type"],
  identity:  Identity::NaturalKey(&["study_id", "sponsor_id"]),
  policy:    ConflictPolicy::Update(&["sponsor_type"]),
  required:  &["sponsor_type"],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "sponsor",
      kind: RelationKind::ToOne { column: "sponsor_id", target: &SPONSOR },
    },
  ],
};

pub static STUDY_MESH_TERM: EntityDescriptor = EntityDescriptor {
  name:      "study_mesh_term",
  columns:   &["study_id", "mesh_term_id", "mesh_term_type"],
  identity:  Identity::NaturalKey(&["study_id", "mesh_term_id"]),
  policy:    ConflictPolicy::Update(&["mesh_term_type"]),
  required:  &["mesh_term_type"],
  lowercase: &[],
  relations: &[
    Relation {
      name: "study",
      kind: RelationKind::ToOne { column: "study_id", target: &STUDY },
    },
    Relation {
      name: "mesh_term",
      kind: RelationKind::ToOne { column: "mesh_term_id", target: &MESH_TERM },
    },
  ],
};

// ─── Thesaurus: records ──────────────────────────────────────────────────────

pub static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
  name:      "descriptor",
  columns:   &[
    "ui",
    "name",
    "created",
    "revised",
    "established",
    "annotation",
    "history_note",
    "nlm_classification_number",
    "online_note",
    "public_mesh_note",
    "consider_also",
  ],
  identity:  Identity::NaturalKey(&["ui"]),
  policy:    ConflictPolicy::Update(&[
    "name",
    "created",
    "revised",
    "established",
    "annotation",
    "history_note",
    "nlm_classification_number",
    "online_note",
    "public_mesh_note",
    "consider_also",
  ]),
  required:  &["name"],
  lowercase: &[],
  relations: &[
    Relation {
      name: "tree_numbers",
      kind: RelationKind::Through {
        link:   &DESCRIPTOR_TREE_NUMBER,
        near:   "descriptor_id",
        far:    "tree_number_id",
        target: &TREE_NUMBER,
      },
    },
    Relation {
      name: "concepts",
      kind: RelationKind::Through {
        link:   &DESCRIPTOR_CONCEPT,
        near:   "descriptor_id",
        far:    "concept_id",
        target: &CONCEPT,
      },
    },
    Relation {
      name: "allowable_qualifiers",
      kind: RelationKind::Through {
        link:   &DESCRIPTOR_ALLOWABLE_QUALIFIER,
        near:   "descriptor_id",
        far:    "qualifier_id",
        target: &QUALIFIER,
      },
    },
    Relation {
      name: "synonyms",
      kind: RelationKind::ToMany { target: &DESCRIPTOR_SYNONYM, column: "descriptor_id" },
    },
  ],
};

pub static QUALIFIER: EntityDescriptor = EntityDescriptor {
  name:      "qualifier",
  columns:   &[
    "ui",
    "name",
    "created",
    "revised",
    "established",
    "annotation",
    "history_note",
    "online_note",
  ],
  identity:  Identity::NaturalKey(&["ui"]),
  policy:    ConflictPolicy::Update(&[
    "name",
    "created",
    "revised",
    "established",
    "annotation",
    "history_note",
    "online_note",
  ]),
  required:  &["name"],
  lowercase: &[],
  relations: &[
    Relation {
      name: "tree_numbers",
      kind: RelationKind::Through {
        link:   &QUALIFIER_TREE_NUMBER,
        near:   "qualifier_id",
        far:    "tree_number_id",
        target: &TREE_NUMBER,
      },
    },
    Relation {
      name: "concepts",
      kind: RelationKind::Through {
        link:   &QUALIFIER_CONCEPT,
        near:   "qualifier_id",
        far:    "concept_id",
        target: &CONCEPT,
      },
    },
    Relation {
      name: "synonyms",
      kind: RelationKind::ToMany { target: &QUALIFIER_SYNONYM, column: "qualifier_id" },
    },
  ],
};

pub static CONCEPT: EntityDescriptor = EntityDescriptor {
  name:      "concept",
  columns:   &[
    "ui",
    "name",
    "casn1_name",
    "registry_number",
    "scope_note",
    "translators_english_scope_note",
    "translators_scope_note",
  ],
  identity:  Identity::NaturalKey(&["ui"]),
  policy:    ConflictPolicy::Update(&[
    "name",
    "casn1_name",
    "registry_number",
    "scope_note",
    "translators_english_scope_note",
    "translators_scope_note",
  ]),
  required:  &["name"],
  lowercase: &[],
  relations: &[Relation {
    name: "terms",
    kind: RelationKind::Through {
      link:   &CONCEPT_TERM,
      near:   "concept_id",
      far:    "term_id",
      target: &TERM,
    },
  }],
};

pub static TERM: EntityDescriptor = EntityDescriptor {
  name:      "term",
  columns:   &["ui", "name", "created", "abbreviation", "sort_version", "entry_version", "note"],
  identity:  Identity::NaturalKey(&["ui"]),
  policy:    ConflictPolicy::Update(&[
    "name",
    "created",
    "abbreviation",
    "sort_version",
    "entry_version",
    "note",
  ]),
  required:  &["name"],
  lowercase: &[],
  relations: &[],
};

/// Tree numbers are case-significant codes, so their digest skips folding.
pub static TREE_NUMBER: EntityDescriptor = EntityDescriptor {
  name:      "tree_number",
  columns:   &["tree_number"],
  identity:  Identity::Fingerprint {
    column:    HASH,
    fields:    &["tree_number"],
    fold_case: false,
    scope:     None,
  },
  policy:    ConflictPolicy::Ignore,
  required:  &["tree_number"],
  lowercase: &[],
  relations: &[],
};

// ─── Thesaurus: associations ─────────────────────────────────────────────────

pub static DESCRIPTOR_TREE_NUMBER: EntityDescriptor = EntityDescriptor {
  name:      "descriptor_tree_number",
  columns:   &["descriptor_id", "tree_number_id"],
  identity:  Identity::NaturalKey(&["descriptor_id", "tree_number_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "descriptor",
      kind: RelationKind::ToOne { column: "descriptor_id", target: &DESCRIPTOR },
    },
    Relation {
      name: "tree_number",
      kind: RelationKind::ToOne { column: "tree_number_id", target: &TREE_NUMBER },
    },
  ],
};

pub static QUALIFIER_TREE_NUMBER: EntityDescriptor = EntityDescriptor {
  name:      "qualifier_tree_number",
  columns:   &["qualifier_id", "tree_number_id"],
  identity:  Identity::NaturalKey(&["qualifier_id", "tree_number_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "qualifier",
      kind: RelationKind::ToOne { column: "qualifier_id", target: &QUALIFIER },
    },
    Relation {
      name: "tree_number",
      kind: RelationKind::ToOne { column: "tree_number_id", target: &TREE_NUMBER },
    },
  ],
};

pub static DESCRIPTOR_ALLOWABLE_QUALIFIER: EntityDescriptor = EntityDescriptor {
  name:      "descriptor_allowable_qualifier",
  columns:   &["descriptor_id", "qualifier_id"],
  identity:  Identity::NaturalKey(&["descriptor_id", "qualifier_id"]),
  policy:    ConflictPolicy::Ignore,
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "descriptor",
      kind: RelationKind::ToOne { column: "descriptor_id", target: &DESCRIPTOR },
    },
    Relation {
      name: "qualifier",
      kind: RelationKind::ToOne { column: "qualifier_id", target: &QUALIFIER },
    },
  ],
};

pub static DESCRIPTOR_CONCEPT: EntityDescriptor = EntityDescriptor {
  name:      "descriptor_concept",
  columns:   &["descriptor_id", "concept_id", "is_preferred"],
  identity:  Identity::NaturalKey(&["descriptor_id", "concept_id"]),
  policy:    ConflictPolicy::Update(&["is_preferred"]),
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "descriptor",
      kind: RelationKind::ToOne { column: "descriptor_id", target: &DESCRIPTOR },
    },
    Relation {
      name: "concept",
      kind: RelationKind::ToOne { column: "concept_id", target: &CONCEPT },
    },
  ],
};

pub static QUALIFIER_CONCEPT: EntityDescriptor = EntityDescriptor {
  name:      "qualifier_concept",
  columns:   &["qualifier_id", "concept_id", "is_preferred"],
  identity:  Identity::NaturalKey(&["qualifier_id", "concept_id"]),
  policy:    ConflictPolicy::Update(&["is_preferred"]),
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "qualifier",
      kind: RelationKind::ToOne { column: "qualifier_id", target: &QUALIFIER },
    },
    Relation {
      name: "concept",
      kind: RelationKind::ToOne { column: "concept_id", target: &CONCEPT },
    },
  ],
};

pub static CONCEPT_TERM: EntityDescriptor = EntityDescriptor {
  name:      "concept_term",
  columns:   &[
    "concept_id",
    "term_id",
    "is_concept_preferred",
    "is_record_preferred",
    "is_permuted",
    "lexical_tag",
  ],
  identity:  Identity::NaturalKey(&["concept_id", "term_id"]),
  policy:    ConflictPolicy::Update(&[
    "is_concept_preferred",
    "is_record_preferred",
    "is_permuted",
    "lexical_tag",
  ]),
  required:  &[],
  lowercase: &[],
  relations: &[
    Relation {
      name: "concept",
      kind: RelationKind::ToOne { column: "concept_id", target: &CONCEPT },
    },
    Relation {
      name: "term",
      kind: RelationKind::ToOne { column: "term_id", target: &TERM },
    },
  ],
};

// ─── Thesaurus: batch children ───────────────────────────────────────────────

pub static DESCRIPTOR_SYNONYM: EntityDescriptor = EntityDescriptor {
  name:      "descriptor_synonym",
  columns:   &["descriptor_id", "synonym"],
  identity:  scoped("descriptor_id", &["synonym"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["synonym"],
  lowercase: &[],
  relations: &[Relation {
    name: "descriptor",
    kind: RelationKind::ToOne { column: "descriptor_id", target: &DESCRIPTOR },
  }],
};

pub static QUALIFIER_SYNONYM: EntityDescriptor = EntityDescriptor {
  name:      "qualifier_synonym",
  columns:   &["qualifier_id", "synonym"],
  identity:  scoped("qualifier_id", &["synonym"]),
  policy:    ConflictPolicy::Ignore,
  required:  &["synonym"],
  lowercase: &[],
  relations: &[Relation {
    name: "qualifier",
    kind: RelationKind::ToOne { column: "qualifier_id", target: &QUALIFIER },
  }],
};

// ─── Lookup ──────────────────────────────────────────────────────────────────

/// Every registered entity, parents before dependents.
pub static ALL: &[&EntityDescriptor] = &[
  &KEYWORD,
  &CONDITION,
  &INTERVENTION,
  &SPONSOR,
  &PERSON,
  &CONTACT,
  &FACILITY,
  &INVESTIGATOR,
  &LOCATION,
  &ALIAS,
  &MESH_TERM,
  &OVERSIGHT_INFO,
  &ELIGIBILITY,
  &STUDY,
  &STUDY_KEYWORD,
  &STUDY_CONDITION,
  &STUDY_INTERVENTION,
  &STUDY_ALIAS,
  &STUDY_FACILITY,
  &STUDY_INVESTIGATOR,
  &STUDY_LOCATION,
  &LOCATION_INVESTIGATOR,
  &STUDY_SPONSOR,
  &STUDY_MESH_TERM,
  &TREE_NUMBER,
  &DESCRIPTOR,
  &QUALIFIER,
  &CONCEPT,
  &TERM,
  &DESCRIPTOR_TREE_NUMBER,
  &QUALIFIER_TREE_NUMBER,
  &DESCRIPTOR_ALLOWABLE_QUALIFIER,
  &DESCRIPTOR_CONCEPT,
  &QUALIFIER_CONCEPT,
  &CONCEPT_TERM,
  &DESCRIPTOR_SYNONYM,
  &QUALIFIER_SYNONYM,
];

pub fn by_name(name: &str) -> Result<&'static EntityDescriptor> {
  ALL
    .iter()
    .copied()
    .find(|e| e.name == name)
    .ok_or_else(|| Error::UnknownEntity(name.to_owned()))
}
