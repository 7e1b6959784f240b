// Executed in order by `migrate`; every statement must be idempotent.
pub(super) const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS donors (
        id                 BLOB PRIMARY KEY NOT NULL,
        name               TEXT NOT NULL,
        age                INTEGER NOT NULL CHECK (age BETWEEN 18 AND 100),
        gender             TEXT NOT NULL CHECK (gender IN ('Male', 'Female', 'Other')),
        blood_group        TEXT NOT NULL CHECK (blood_group IN ('A+', 'A-', 'B+', 'B-', 'AB+', 'AB-', 'O+', 'O-')),
        phone              TEXT NOT NULL,
        email              TEXT NOT NULL,
        address            TEXT NOT NULL,
        last_donation_date TEXT,
        created_at         TEXT NOT NULL,
        updated_at         TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipients (
        id             BLOB PRIMARY KEY NOT NULL,
        name           TEXT NOT NULL,
        age            INTEGER NOT NULL CHECK (age BETWEEN 1 AND 120),
        gender         TEXT NOT NULL CHECK (gender IN ('Male', 'Female', 'Other')),
        blood_group    TEXT NOT NULL CHECK (blood_group IN ('A+', 'A-', 'B+', 'B-', 'AB+', 'AB-', 'O+', 'O-')),
        phone          TEXT NOT NULL,
        email          TEXT NOT NULL,
        address        TEXT NOT NULL,
        request_status TEXT NOT NULL DEFAULT 'Pending'
                       CHECK (request_status IN ('Pending', 'Approved', 'Completed', 'Cancelled')),
        created_at     TEXT NOT NULL,
        updated_at     TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS donations (
        id              BLOB PRIMARY KEY NOT NULL,
        donor_id        BLOB NOT NULL REFERENCES donors (id) ON DELETE RESTRICT,
        donation_date   TEXT NOT NULL,
        blood_volume_ml INTEGER NOT NULL CHECK (blood_volume_ml BETWEEN 100 AND 500),
        hospital        TEXT NOT NULL,
        created_at      TEXT NOT NULL,
        updated_at      TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_donations_donor_id ON donations (donor_id)",
    r#"
    CREATE TABLE IF NOT EXISTS blood_requests (
        id                 BLOB PRIMARY KEY NOT NULL,
        recipient_id       BLOB NOT NULL REFERENCES recipients (id) ON DELETE RESTRICT,
        blood_group        TEXT NOT NULL CHECK (blood_group IN ('A+', 'A-', 'B+', 'B-', 'AB+', 'AB-', 'O+', 'O-')),
        quantity_needed_ml INTEGER NOT NULL CHECK (quantity_needed_ml BETWEEN 100 AND 2000),
        status             TEXT NOT NULL DEFAULT 'Pending'
                           CHECK (status IN ('Pending', 'Approved', 'Completed', 'Cancelled')),
        created_at         TEXT NOT NULL,
        updated_at         TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_blood_requests_recipient_id ON blood_requests (recipient_id)",
    "CREATE INDEX IF NOT EXISTS idx_blood_requests_status ON blood_requests (status)",
    r#"
    CREATE TABLE IF NOT EXISTS blood_inventory (
        blood_group  TEXT PRIMARY KEY NOT NULL
                     CHECK (blood_group IN ('A+', 'A-', 'B+', 'B-', 'AB+', 'AB-', 'O+', 'O-')),
        total_units  INTEGER NOT NULL DEFAULT 0 CHECK (total_units >= 0),
        last_updated TEXT NOT NULL
    )
    "#,
];
