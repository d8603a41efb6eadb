//! The analytical report catalog.
//!
//! An immutable, ordered list of the reports this tool knows how to run.
//! The order of `REPORTS` is the order reports execute and print in, and
//! changing it changes the output contract, so treat it as part of the
//! public interface.
//!
//! Two reports are parameterized by a patient identifier. Each carries a
//! built-in default so a plain `clinreport` run works against the demo
//! dataset; pass `--patient` (or set `[report] patient` in the config) to
//! point them at a different patient.

/// A single report definition: a stable name, a display title, and the
/// SQL that computes it.
#[derive(Debug, Clone, Copy)]
pub struct ReportDef {
    /// Unique machine-readable key, e.g. `active_patients`.
    pub name: &'static str,

    /// Human-readable title printed in the section header.
    pub title: &'static str,

    /// PostgreSQL query text. Patient-scoped reports reference `$1`.
    pub sql: &'static str,

    /// Default patient identifier for patient-scoped reports.
    /// `None` means the query takes no parameters.
    pub default_patient: Option<&'static str>,
}

impl ReportDef {
    /// Returns true if this report binds a patient identifier.
    pub fn takes_patient(&self) -> bool {
        self.default_patient.is_some()
    }
}

/// All reports, in execution order.
pub const REPORTS: &[ReportDef] = &[
    ReportDef {
        name: "active_patients",
        title: "List of Active Patients",
        sql: r#"
            SELECT * FROM "Patient" WHERE active = true LIMIT 10
        "#,
        default_patient: None,
    },
    ReportDef {
        name: "encounters_by_patient",
        title: "Encounters for a Specific Patient",
        sql: r#"
            SELECT
                e.id,
                e.status,
                e.reason,
                pr.name AS practitioner,
                p.name AS patient
            FROM "Encounter" e
            JOIN "Patient" p ON e.patient_id = p.id
            JOIN "Practitioner" pr ON e.practitioner_id = pr.id
            WHERE p.id::text = $1
            ORDER BY e.encounter_date DESC
        "#,
        default_patient: Some("9d18a0c6-8682-43fe-b465-938ce66133d1"),
    },
    ReportDef {
        name: "observations_by_patient",
        title: "Observations for a Specific Patient",
        sql: r#"
            SELECT
                o.id,
                o.patient_id,
                o.encounter_id,
                o.type,
                o.value,
                o.unit,
                o.recorded_at,
                p.name AS patient
            FROM "Observation" o
            JOIN "Patient" p ON o.patient_id = p.id
            WHERE p.id::text = $1
            ORDER BY o.recorded_at DESC
        "#,
        default_patient: Some("3ed52e91-9a01-4a38-b8b6-55f0fe3662e6"),
    },
    ReportDef {
        name: "last_encounter_per_patient",
        title: "Last Encounter per Patient",
        sql: r#"
            SELECT DISTINCT ON (e.patient_id)
                e.encounter_date,
                e.status,
                p.name
            FROM "Encounter" e
            JOIN "Patient" p ON e.patient_id = p.id
            ORDER BY e.patient_id, e.encounter_date DESC
        "#,
        default_patient: None,
    },
    ReportDef {
        name: "multi_practitioner_patients",
        title: "Patients Seen by Multiple Practitioners",
        sql: r#"
            WITH multi_practitioner_patients AS (
                SELECT patient_id
                FROM "Encounter"
                GROUP BY patient_id
                HAVING COUNT(DISTINCT practitioner_id) > 1
            )
            SELECT
                p.id AS patient_id,
                p.name AS patient_name,
                STRING_AGG(DISTINCT pr.name, ', ') AS practitioner_names
            FROM "Patient" p
            JOIN "Encounter" e ON p.id = e.patient_id
            JOIN "Practitioner" pr ON e.practitioner_id = pr.id
            WHERE p.id IN (SELECT patient_id FROM multi_practitioner_patients)
            GROUP BY p.id, p.name
        "#,
        default_patient: None,
    },
    ReportDef {
        name: "top_medications",
        title: "Top 3 Prescribed Medications",
        // Ties on prescription_count resolve by medication name so the
        // output order is deterministic across runs.
        sql: r#"
            SELECT
                medication_name, COUNT(*) AS prescription_count
            FROM "MedicationRequest"
            GROUP BY medication_name
            ORDER BY prescription_count DESC, medication_name ASC
            LIMIT 3
        "#,
        default_patient: None,
    },
    ReportDef {
        name: "inactive_prescribers",
        title: "Practitioners Who Never Prescribed",
        sql: r#"
            SELECT
                p.*
            FROM "Practitioner" p
            LEFT JOIN "MedicationRequest" mr ON p.id = mr.practitioner_id
            WHERE mr.practitioner_id IS NULL
        "#,
        default_patient: None,
    },
    ReportDef {
        name: "average_encounters",
        title: "Average Encounter per Patient",
        sql: r#"
            SELECT ROUND(AVG(encounter_count), 2) AS avg_encounters_per_patient
            FROM (
                SELECT patient_id, COUNT(*) AS encounter_count
                FROM "Encounter"
                GROUP BY patient_id
            ) AS patient_encounters
        "#,
        default_patient: None,
    },
    ReportDef {
        name: "patients_with_meds_no_encounter",
        title: "Patients with Medications but No Encounter",
        sql: r#"
            SELECT DISTINCT
                p.*
            FROM "Patient" p
            JOIN "MedicationRequest" mr ON p.id = mr.patient_id
            LEFT JOIN "Encounter" e ON p.id = e.patient_id
            WHERE e.patient_id IS NULL
        "#,
        default_patient: None,
    },
    ReportDef {
        name: "retention_by_cohort",
        title: "Patient Retention by Cohort",
        sql: r#"
            WITH first_encounters AS (
                SELECT patient_id, DATE_TRUNC('month', MIN(encounter_date)) AS first_encounter_month
                FROM "Encounter"
                GROUP BY patient_id
            ),
            follow_up_encounters AS (
                SELECT fe.patient_id, fe.first_encounter_month,
                       MAX(CASE WHEN e.encounter_date BETWEEN fe.first_encounter_month AND
                                (fe.first_encounter_month + INTERVAL '6 months') THEN 1 ELSE 0 END) AS retained
                FROM first_encounters fe
                JOIN "Encounter" e ON fe.patient_id = e.patient_id
                GROUP BY fe.patient_id, fe.first_encounter_month
            )
            SELECT
                TO_CHAR(first_encounter_month, 'YYYY-MM') AS cohort_month,
                COUNT(*) AS total_patients,
                SUM(retained) AS retained_patients,
                ROUND(100.0 * SUM(retained) / COUNT(*), 2) AS retention_rate
            FROM follow_up_encounters
            GROUP BY first_encounter_month
            ORDER BY first_encounter_month
        "#,
        default_patient: None,
    },
];

/// Looks up a report by name.
pub fn find(name: &str) -> Option<&'static ReportDef> {
    REPORTS.iter().find(|r| r.name == name)
}

/// Returns the names of all reports, in execution order.
pub fn names() -> Vec<&'static str> {
    REPORTS.iter().map(|r| r.name).collect()
}
