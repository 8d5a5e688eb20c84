//! SQL schema for the trove warehouse.
//!
//! Executed at connection startup; idempotent thanks to `CREATE TABLE IF NOT
//! EXISTS`. Every table mirrors one registry descriptor: `id` first, then the
//! descriptor's columns in order, then the `md5` fingerprint where the entity
//! has one. The UNIQUE constraint on each table is exactly its dedup key.

use std::time::Duration;

use rusqlite::Connection;

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── Clinical trials: reference entities ────────────────────────────────────

CREATE TABLE IF NOT EXISTS keyword (
    id       INTEGER PRIMARY KEY,
    keyword  TEXT NOT NULL,
    md5      BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS condition (
    id         INTEGER PRIMARY KEY,
    condition  TEXT NOT NULL,
    md5        BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS intervention (
    id                 INTEGER PRIMARY KEY,
    intervention_type  TEXT NOT NULL,
    name               TEXT NOT NULL,
    description        TEXT,
    md5                BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS sponsor (
    id            INTEGER PRIMARY KEY,
    agency        TEXT NOT NULL,
    agency_class  TEXT,
    md5           BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS person (
    id           INTEGER PRIMARY KEY,
    name_first   TEXT,
    name_middle  TEXT,
    name_last    TEXT,
    degrees      TEXT,
    md5          BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS contact (
    id         INTEGER PRIMARY KEY,
    person_id  INTEGER NOT NULL REFERENCES person(id),
    phone      TEXT,
    phone_ext  TEXT,
    email      TEXT,
    md5        BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS facility (
    id        INTEGER PRIMARY KEY,
    name      TEXT,
    city      TEXT,
    state     TEXT,
    zip_code  TEXT,
    country   TEXT,
    md5       BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS investigator (
    id           INTEGER PRIMARY KEY,
    person_id    INTEGER NOT NULL REFERENCES person(id),
    role         TEXT,
    affiliation  TEXT,
    md5          BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS location (
    id                  INTEGER PRIMARY KEY,
    facility_id         INTEGER NOT NULL REFERENCES facility(id),
    status              TEXT,
    contact_primary_id  INTEGER REFERENCES contact(id),
    contact_backup_id   INTEGER REFERENCES contact(id),
    md5                 BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS alias (
    id     INTEGER PRIMARY KEY,
    alias  TEXT NOT NULL,
    md5    BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS mesh_term (
    id    INTEGER PRIMARY KEY,
    term  TEXT NOT NULL,
    md5   BLOB NOT NULL UNIQUE
);

-- ── Clinical trials: unkeyed facts ─────────────────────────────────────────

CREATE TABLE IF NOT EXISTS oversight_info (
    id                       INTEGER PRIMARY KEY,
    has_dmc                  INTEGER,
    is_fda_regulated_drug    INTEGER,
    is_fda_regulated_device  INTEGER,
    is_unapproved_device     INTEGER,
    is_ppsd                  INTEGER,
    is_us_export             INTEGER
);

CREATE TABLE IF NOT EXISTS eligibility (
    id                  INTEGER PRIMARY KEY,
    study_pop           TEXT,
    sampling_method     TEXT,
    criteria            TEXT,
    gender              TEXT,
    gender_based        INTEGER,
    gender_description  TEXT,
    minimum_age         TEXT,
    maximum_age         TEXT,
    healthy_volunteers  TEXT
);

-- ── Clinical trials: studies ───────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS study (
    id                  INTEGER PRIMARY KEY,
    nct_id              TEXT NOT NULL UNIQUE,
    org_study_id        TEXT,
    brief_title         TEXT,
    acronym             TEXT,
    official_title      TEXT,
    brief_summary       TEXT,
    overall_status      TEXT,
    start_date          TEXT,
    completion_date     TEXT,
    study_type          TEXT,
    phase               TEXT,
    enrollment          INTEGER,
    last_update_posted  TEXT,
    oversight_info_id   INTEGER REFERENCES oversight_info(id),
    eligibility_id      INTEGER REFERENCES eligibility(id)
);

-- ── Clinical trials: associations ──────────────────────────────────────────

CREATE TABLE IF NOT EXISTS study_keyword (
    id          INTEGER PRIMARY KEY,
    study_id    INTEGER NOT NULL REFERENCES study(id),
    keyword_id  INTEGER NOT NULL REFERENCES keyword(id),
    UNIQUE (study_id, keyword_id)
);

CREATE TABLE IF NOT EXISTS study_condition (
    id            INTEGER PRIMARY KEY,
    study_id      INTEGER NOT NULL REFERENCES study(id),
    condition_id  INTEGER NOT NULL REFERENCES condition(id),
    UNIQUE (study_id, condition_id)
);

CREATE TABLE IF NOT EXISTS study_intervention (
    id               INTEGER PRIMARY KEY,
    study_id         INTEGER NOT NULL REFERENCES study(id),
    intervention_id  INTEGER NOT NULL REFERENCES intervention(id),
    UNIQUE (study_id, intervention_id)
);

CREATE TABLE IF NOT EXISTS study_alias (
    id        INTEGER PRIMARY KEY,
    study_id  INTEGER NOT NULL REFERENCES study(id),
    alias_id  INTEGER NOT NULL REFERENCES alias(id),
    UNIQUE (study_id, alias_id)
);

CREATE TABLE IF NOT EXISTS study_facility (
    id           INTEGER PRIMARY KEY,
    study_id     INTEGER NOT NULL REFERENCES study(id),
    facility_id  INTEGER NOT NULL REFERENCES facility(id),
    UNIQUE (study_id, facility_id)
);

CREATE TABLE IF NOT EXISTS study_investigator (
    id               INTEGER PRIMARY KEY,
    study_id         INTEGER NOT NULL REFERENCES study(id),
    investigator_id  INTEGER NOT NULL REFERENCES investigator(id),
    UNIQUE (study_id, investigator_id)
);

CREATE TABLE IF NOT EXISTS study_location (
    id           INTEGER PRIMARY KEY,
    study_id     INTEGER NOT NULL REFERENCES study(id),
    location_id  INTEGER NOT NULL REFERENCES location(id),
    UNIQUE (study_id, location_id)
);

CREATE TABLE IF NOT EXISTS location_investigator (
    id               INTEGER PRIMARY KEY,
    location_id      INTEGER NOT NULL REFERENCES location(id),
    investigator_id  INTEGER NOT NULL REFERENCES investigator(id),
    UNIQUE (location_id, investigator_id)
);

-- The role is re-asserted on every ingestion and overwritten in place.
CREATE TABLE IF NOT EXISTS study_sponsor (
    id            INTEGER PRIMARY KEY,
    study_id      INTEGER NOT NULL REFERENCES study(id),
    sponsor_id    INTEGER NOT NULL REFERENCES sponsor(id),
    sponsor_type  TEXT NOT NULL,
    UNIQUE (study_id, sponsor_id)
);

CREATE TABLE IF NOT EXISTS study_mesh_term (
    id              INTEGER PRIMARY KEY,
    study_id        INTEGER NOT NULL REFERENCES study(id),
    mesh_term_id    INTEGER NOT NULL REFERENCES mesh_term(id),
    mesh_term_type  TEXT NOT NULL,
    UNIQUE (study_id, mesh_term_id)
);

-- ── Thesaurus: records ─────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS tree_number (
    id           INTEGER PRIMARY KEY,
    tree_number  TEXT NOT NULL,
    md5          BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS descriptor (
    id                         INTEGER PRIMARY KEY,
    ui                         TEXT NOT NULL UNIQUE,
    name                       TEXT NOT NULL,
    created                    TEXT,
    revised                    TEXT,
    established                TEXT,
    annotation                 TEXT,
    history_note               TEXT,
    nlm_classification_number  TEXT,
    online_note                TEXT,
    public_mesh_note           TEXT,
    consider_also              TEXT
);

CREATE TABLE IF NOT EXISTS qualifier (
    id            INTEGER PRIMARY KEY,
    ui            TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    created       TEXT,
    revised       TEXT,
    established   TEXT,
    annotation    TEXT,
    history_note  TEXT,
    online_note   TEXT
);

CREATE TABLE IF NOT EXISTS concept (
    id                              INTEGER PRIMARY KEY,
    ui                              TEXT NOT NULL UNIQUE,
    name                            TEXT NOT NULL,
    casn1_name                      TEXT,
    registry_number                 TEXT,
    scope_note                      TEXT,
    translators_english_scope_note  TEXT,
    translators_scope_note          TEXT
);

CREATE TABLE IF NOT EXISTS term (
    id             INTEGER PRIMARY KEY,
    ui             TEXT NOT NULL UNIQUE,
    name           TEXT NOT NULL,
    created        TEXT,
    abbreviation   TEXT,
    sort_version   TEXT,
    entry_version  TEXT,
    note           TEXT
);

-- ── Thesaurus: associations ────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS descriptor_tree_number (
    id              INTEGER PRIMARY KEY,
    descriptor_id   INTEGER NOT NULL REFERENCES descriptor(id),
    tree_number_id  INTEGER NOT NULL REFERENCES tree_number(id),
    UNIQUE (descriptor_id, tree_number_id)
);

CREATE TABLE IF NOT EXISTS qualifier_tree_number (
    id              INTEGER PRIMARY KEY,
    qualifier_id    INTEGER NOT NULL REFERENCES qualifier(id),
    tree_number_id  INTEGER NOT NULL REFERENCES tree_number(id),
    UNIQUE (qualifier_id, tree_number_id)
);

CREATE TABLE IF NOT EXISTS descriptor_allowable_qualifier (
    id             INTEGER PRIMARY KEY,
    descriptor_id  INTEGER NOT NULL REFERENCES descriptor(id),
    qualifier_id   INTEGER NOT NULL REFERENCES qualifier(id),
    UNIQUE (descriptor_id, qualifier_id)
);

CREATE TABLE IF NOT EXISTS descriptor_concept (
    id             INTEGER PRIMARY KEY,
    descriptor_id  INTEGER NOT NULL REFERENCES descriptor(id),
    concept_id     INTEGER NOT NULL REFERENCES concept(id),
    is_preferred   INTEGER NOT NULL DEFAULT 0,
    UNIQUE (descriptor_id, concept_id)
);

CREATE TABLE IF NOT EXISTS qualifier_concept (
    id            INTEGER PRIMARY KEY,
    qualifier_id  INTEGER NOT NULL REFERENCES qualifier(id),
    concept_id    INTEGER NOT NULL REFERENCES concept(id),
    is_preferred  INTEGER NOT NULL DEFAULT 0,
    UNIQUE (qualifier_id, concept_id)
);

CREATE TABLE IF NOT EXISTS concept_term (
    id                    INTEGER PRIMARY KEY,
    concept_id            INTEGER NOT NULL REFERENCES concept(id),
    term_id               INTEGER NOT NULL REFERENCES term(id),
    is_concept_preferred  INTEGER NOT NULL DEFAULT 0,
    is_record_preferred   INTEGER NOT NULL DEFAULT 0,
    is_permuted           INTEGER NOT NULL DEFAULT 0,
    lexical_tag           TEXT,
    UNIQUE (concept_id, term_id)
);

-- ── Thesaurus: synonym lists ───────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS descriptor_synonym (
    id             INTEGER PRIMARY KEY,
    descriptor_id  INTEGER NOT NULL REFERENCES descriptor(id),
    synonym        TEXT NOT NULL,
    md5            BLOB NOT NULL,
    UNIQUE (descriptor_id, md5)
);

CREATE TABLE IF NOT EXISTS qualifier_synonym (
    id            INTEGER PRIMARY KEY,
    qualifier_id  INTEGER NOT NULL REFERENCES qualifier(id),
    synonym       TEXT NOT NULL,
    md5           BLOB NOT NULL,
    UNIQUE (qualifier_id, md5)
);

CREATE INDEX IF NOT EXISTS descriptor_synonym_md5_idx ON descriptor_synonym(md5);
CREATE INDEX IF NOT EXISTS qualifier_synonym_md5_idx  ON qualifier_synonym(md5);

PRAGMA user_version = 1;
";

/// Per-connection settings. Foreign key enforcement is not persisted by
/// SQLite, so every connection that writes must run this.
pub fn configure(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
  conn.busy_timeout(busy_timeout)?;
  conn.pragma_update(None, "foreign_keys", true)?;
  Ok(())
}

pub fn apply(conn: &Connection) -> rusqlite::Result<()> { conn.execute_batch(SCHEMA) }
