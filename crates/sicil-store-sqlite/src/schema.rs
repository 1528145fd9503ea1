//! SQL schema for the sicil SQLite store.
//!
//! Executed once at connection startup. Column names and order must match
//! the `entity!` declarations in `sicil_core::tables`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
///
/// Every natural key carries a unique index. The ingester never relies on
/// them for deduplication, but they stop two concurrent ingestions from
/// inserting the same key twice.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Lookup tables ---------------------------------------------------------------

CREATE TABLE IF NOT EXISTS addresses (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    address   TEXT NOT NULL UNIQUE,
    relevance TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS statuses (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    status    TEXT NOT NULL UNIQUE,
    relevance TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tax_numbers (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    tax_number TEXT NOT NULL UNIQUE,
    relevance  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS industries (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    industry  TEXT NOT NULL UNIQUE,
    relevance TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS former_names (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    former_name TEXT NOT NULL UNIQUE,
    relevance   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS occupation_groups (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    occupation_group TEXT NOT NULL UNIQUE,
    relevance        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS media_reg_doc_types (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    reg_doc_type TEXT NOT NULL UNIQUE,
    relevance    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS media_transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    \"transaction\" TEXT NOT NULL UNIQUE,
    relevance   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS participant_names (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT NOT NULL UNIQUE,
    relevance TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS participant_positions (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    position  TEXT NOT NULL UNIQUE,
    relevance TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS participant_types (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    status    TEXT NOT NULL UNIQUE,
    relevance TEXT NOT NULL
);

-- Company aggregate -----------------------------------------------------------

CREATE TABLE IF NOT EXISTS companies (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    uin                    TEXT NOT NULL UNIQUE,
    chamber_reg_no         TEXT,
    central_reg_system_no  TEXT,
    name                   TEXT NOT NULL,
    status_id              INTEGER REFERENCES statuses(id),
    reg_date               TEXT,
    address_id             INTEGER REFERENCES addresses(id),
    main_contract_reg_date TEXT,
    tax_number_id          INTEGER REFERENCES tax_numbers(id),
    capital                REAL,
    occupation_group_id    INTEGER REFERENCES occupation_groups(id),
    relevance              TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS participants (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name_id     INTEGER NOT NULL REFERENCES participant_names(id),
    position_id INTEGER NOT NULL REFERENCES participant_positions(id),
    capital     REAL,
    type_id     INTEGER NOT NULL REFERENCES participant_types(id),
    relevance   TEXT NOT NULL,
    UNIQUE (name_id, position_id, type_id)
);

-- Junction rows ---------------------------------------------------------------

CREATE TABLE IF NOT EXISTS company_former_names (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    former_name_id INTEGER NOT NULL REFERENCES former_names(id),
    company_id     INTEGER NOT NULL REFERENCES companies(id),
    relevance      TEXT NOT NULL,
    UNIQUE (former_name_id, company_id)
);

CREATE TABLE IF NOT EXISTS company_industries (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    industry_id INTEGER NOT NULL REFERENCES industries(id),
    company_id  INTEGER NOT NULL REFERENCES companies(id),
    relevance   TEXT NOT NULL,
    UNIQUE (industry_id, company_id)
);

CREATE TABLE IF NOT EXISTS company_participants (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    participant_id INTEGER NOT NULL REFERENCES participants(id),
    company_id     INTEGER NOT NULL REFERENCES companies(id),
    relevance      TEXT NOT NULL,
    UNIQUE (participant_id, company_id)
);

-- Contacts --------------------------------------------------------------------

CREATE TABLE IF NOT EXISTS contacts_faxes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES companies(id),
    fax        TEXT NOT NULL,
    relevance  TEXT NOT NULL,
    UNIQUE (company_id, fax)
);

CREATE TABLE IF NOT EXISTS contacts_phones (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES companies(id),
    phone      TEXT NOT NULL,
    relevance  TEXT NOT NULL,
    UNIQUE (company_id, phone)
);

CREATE TABLE IF NOT EXISTS contacts_websites (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES companies(id),
    website    TEXT NOT NULL,
    relevance  TEXT NOT NULL,
    UNIQUE (company_id, website)
);

-- Media -----------------------------------------------------------------------

CREATE TABLE IF NOT EXISTS company_medias (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    document_number INTEGER NOT NULL,
    transaction_id  INTEGER NOT NULL REFERENCES media_transactions(id),
    reg_doc_type_id INTEGER NOT NULL REFERENCES media_reg_doc_types(id),
    company_id      INTEGER NOT NULL REFERENCES companies(id),
    reg_history     TEXT NOT NULL,
    relevance       TEXT NOT NULL,
    UNIQUE (document_number, transaction_id, reg_doc_type_id, company_id, reg_history)
);

-- Participant history ---------------------------------------------------------

-- One row per participant; a newer end date overwrites the stored one.
CREATE TABLE IF NOT EXISTS former_officials_dates (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    participant_id INTEGER NOT NULL UNIQUE REFERENCES participants(id),
    end_date       TEXT,
    relevance      TEXT NOT NULL
);

-- Search outbox ---------------------------------------------------------------

CREATE TABLE IF NOT EXISTS search_outbox (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    document_key TEXT NOT NULL UNIQUE,
    document     TEXT NOT NULL,
    relevance    TEXT NOT NULL,
    published_at TEXT
);

PRAGMA user_version = 1;
";
