//! crates/training_portal_core/src/forms.rs
//!
//! The fixed catalog of fillable form templates, field validation for filled-in
//! values, and the plain-text preview of a blank form.

use std::fmt;

use chrono::NaiveDate;

use crate::domain::{FieldValue, FormData};

/// Every form template the portal knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormId {
    LeadInspection,
    LeadAbatement,
    HomelessIntake,
    ShelterPlacement,
    RelocationAssistance,
    ClientGrievance,
    GrievanceResolution,
    SafetyInspection,
}

impl FormId {
    pub const ALL: [FormId; 8] = [
        FormId::LeadInspection,
        FormId::LeadAbatement,
        FormId::HomelessIntake,
        FormId::ShelterPlacement,
        FormId::RelocationAssistance,
        FormId::ClientGrievance,
        FormId::GrievanceResolution,
        FormId::SafetyInspection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormId::LeadInspection => "lead-inspection",
            FormId::LeadAbatement => "lead-abatement",
            FormId::HomelessIntake => "homeless-intake",
            FormId::ShelterPlacement => "shelter-placement",
            FormId::RelocationAssistance => "relocation-assistance",
            FormId::ClientGrievance => "client-grievance",
            FormId::GrievanceResolution => "grievance-resolution",
            FormId::SafetyInspection => "safety-inspection",
        }
    }

    pub fn parse(id: &str) -> FormLookup {
        Self::ALL
            .into_iter()
            .find(|form| form.as_str() == id)
            .map_or_else(|| FormLookup::Unknown(id.to_string()), FormLookup::Known)
    }

    pub fn template(self) -> &'static FormTemplate {
        match self {
            FormId::LeadInspection => &LEAD_INSPECTION,
            FormId::LeadAbatement => &LEAD_ABATEMENT,
            FormId::HomelessIntake => &HOMELESS_INTAKE,
            FormId::ShelterPlacement => &SHELTER_PLACEMENT,
            FormId::RelocationAssistance => &RELOCATION_ASSISTANCE,
            FormId::ClientGrievance => &CLIENT_GRIEVANCE,
            FormId::GrievanceResolution => &GRIEVANCE_RESOLUTION,
            FormId::SafetyInspection => &SAFETY_INSPECTION,
        }
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of resolving a form identifier supplied from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormLookup {
    Known(FormId),
    Unknown(String),
}

impl FormLookup {
    pub fn known(self) -> Result<FormId, FormError> {
        match self {
            FormLookup::Known(id) => Ok(id),
            FormLookup::Unknown(id) => Err(FormError::UnknownForm(id)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
    Number,
    Date,
    Select,
    CheckboxGroup,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::CheckboxGroup => "checkbox-group",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Only used by `Select` and `CheckboxGroup`.
    pub options: &'static [&'static str],
}

#[derive(Debug, PartialEq, Eq)]
pub struct FormTemplate {
    pub id: FormId,
    pub title: &'static str,
    pub category: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormTemplate {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Renders the blank form as text, one line per field. Required fields are
    /// starred; choice fields list their options.
    pub fn preview(&self) -> String {
        let mut lines = vec![self.title.to_string()];
        for field in self.fields {
            let marker = if field.required { " *" } else { "" };
            let input = match field.kind {
                FieldKind::Text => "________________".to_string(),
                FieldKind::TextArea => "________________ (multiple lines)".to_string(),
                FieldKind::Number => "_______".to_string(),
                FieldKind::Date => "____/____/________".to_string(),
                FieldKind::Select | FieldKind::CheckboxGroup => field
                    .options
                    .iter()
                    .map(|option| format!("☐ {option}"))
                    .collect::<Vec<_>>()
                    .join(" "),
            };
            lines.push(format!("{}{}: {}", field.label, marker, input));
        }
        lines.join("\n")
    }
}

/// Narrows the form library. A blank criterion matches every form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFilter {
    /// Case-insensitive text looked for in the title and the category.
    pub search: Option<String>,
    /// Exact category name, ignoring case.
    pub category: Option<String>,
}

impl FormFilter {
    pub fn matches(&self, template: &FormTemplate) -> bool {
        let search_ok = match non_blank(&self.search) {
            Some(term) => {
                let term = term.to_lowercase();
                template.title.to_lowercase().contains(&term)
                    || template.category.to_lowercase().contains(&term)
            }
            None => true,
        };
        let category_ok = non_blank(&self.category)
            .map_or(true, |category| template.category.eq_ignore_ascii_case(category));
        search_ok && category_ok
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The forms passing the filter, in catalog order.
pub fn search_forms(filter: &FormFilter) -> Vec<FormId> {
    FormId::ALL
        .into_iter()
        .filter(|form| filter.matches(form.template()))
        .collect()
}

//=========================================================================================
// Validation
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    Missing,
    NotANumber,
    NotADate,
    NotAnOption(String),
    UnknownField,
    ExpectedSingleValue,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => f.write_str("is required"),
            FieldProblem::NotANumber => f.write_str("must be a number"),
            FieldProblem::NotADate => f.write_str("must be a date (YYYY-MM-DD)"),
            FieldProblem::NotAnOption(value) => write!(f, "'{value}' is not one of the options"),
            FieldProblem::UnknownField => f.write_str("is not a field of this form"),
            FieldProblem::ExpectedSingleValue => f.write_str("takes a single value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.problem)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Form template not found: {0}")]
    UnknownForm(String),
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),
}

/// Checks filled-in values against the template. Blank optional fields are fine.
pub fn validate(template: &FormTemplate, data: &FormData) -> Result<(), FormError> {
    let mut errors = Vec::new();
    let mut fail = |field: &str, problem| {
        errors.push(FieldError {
            field: field.to_string(),
            problem,
        })
    };

    for name in data.keys() {
        if template.field(name).is_none() {
            fail(name, FieldProblem::UnknownField);
        }
    }

    for field in template.fields {
        let value = match data.get(field.name) {
            Some(value) if !value.is_blank() => value,
            _ => {
                if field.required {
                    fail(field.name, FieldProblem::Missing);
                }
                continue;
            }
        };

        match (field.kind, value) {
            (FieldKind::CheckboxGroup, FieldValue::Multiple(values)) => {
                for picked in values.iter().filter(|v| !v.trim().is_empty()) {
                    if !field.options.contains(&picked.as_str()) {
                        fail(field.name, FieldProblem::NotAnOption(picked.clone()));
                    }
                }
            }
            (FieldKind::CheckboxGroup, FieldValue::Single(picked)) => {
                if !field.options.contains(&picked.as_str()) {
                    fail(field.name, FieldProblem::NotAnOption(picked.clone()));
                }
            }
            (_, FieldValue::Multiple(_)) => fail(field.name, FieldProblem::ExpectedSingleValue),
            (FieldKind::Number, FieldValue::Single(raw)) => {
                if !raw.trim().parse::<f64>().is_ok_and(f64::is_finite) {
                    fail(field.name, FieldProblem::NotANumber);
                }
            }
            (FieldKind::Date, FieldValue::Single(raw)) => {
                if NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").is_err() {
                    fail(field.name, FieldProblem::NotADate);
                }
            }
            (FieldKind::Select, FieldValue::Single(picked)) => {
                if !field.options.contains(&picked.as_str()) {
                    fail(field.name, FieldProblem::NotAnOption(picked.clone()));
                }
            }
            (FieldKind::Text | FieldKind::TextArea, FieldValue::Single(_)) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormError::Invalid(errors))
    }
}

//=========================================================================================
// Templates
//=========================================================================================

const fn field(name: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
        options: &[],
    }
}

const fn choice(
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
    options: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
        options,
    }
}

use FieldKind::{CheckboxGroup, Date, Number, Select, Text, TextArea};

static LEAD_INSPECTION: FormTemplate = FormTemplate {
    id: FormId::LeadInspection,
    title: "Lead Hazard Inspection Request",
    category: "Lead Abatement",
    fields: &[
        field("client_name", "Client Name", Text, true),
        field("property_address", "Property Address", Text, true),
        field("child_age", "Child Age", Number, false),
        field("blood_lead_level", "Blood Lead Level (μg/dL)", Number, false),
        field("complaint_description", "Description of Lead Hazard", TextArea, true),
        field("landlord_contact", "Landlord Contact Information", Text, false),
        choice(
            "inspection_urgency",
            "Inspection Urgency",
            Select,
            false,
            &["Standard", "High Priority", "Emergency"],
        ),
    ],
};

static LEAD_ABATEMENT: FormTemplate = FormTemplate {
    id: FormId::LeadAbatement,
    title: "Lead Abatement Certification",
    category: "Lead Abatement",
    fields: &[
        field("property_address", "Property Address", Text, true),
        field("abatement_date", "Abatement Completion Date", Date, true),
        field("contractor_name", "Contractor Name", Text, true),
        field("contractor_license", "Contractor License Number", Text, true),
        field("work_description", "Work Performed", TextArea, true),
        choice(
            "clearance_testing",
            "Clearance Testing Results",
            Select,
            false,
            &["Pass", "Fail", "Pending"],
        ),
        field("certification_number", "Certification Number", Text, false),
    ],
};

static HOMELESS_INTAKE: FormTemplate = FormTemplate {
    id: FormId::HomelessIntake,
    title: "Homeless Services Intake Form",
    category: "Homeless Services",
    fields: &[
        field("client_name", "Client Name", Text, true),
        field("dob", "Date of Birth", Date, true),
        field("location_found", "Location Found", Text, false),
        field("family_size", "Family Size", Number, false),
        field("housing_history", "Previous Housing", TextArea, false),
        field("medical_needs", "Medical Needs", TextArea, false),
        choice(
            "services_needed",
            "Services Requested",
            CheckboxGroup,
            false,
            &[
                "Emergency Shelter",
                "Transitional Housing",
                "Mental Health Services",
                "Job Training",
            ],
        ),
    ],
};

static SHELTER_PLACEMENT: FormTemplate = FormTemplate {
    id: FormId::ShelterPlacement,
    title: "Shelter Placement Request",
    category: "Homeless Services",
    fields: &[
        field("client_name", "Client Name", Text, true),
        field("emergency_contact", "Emergency Contact", Text, false),
        choice(
            "placement_type",
            "Placement Type",
            Select,
            false,
            &["Emergency Shelter", "Transitional Housing", "Family Shelter"],
        ),
        field("special_needs", "Special Accommodations Needed", TextArea, false),
        field("intake_worker", "Intake Worker", Text, true),
        choice(
            "priority_level",
            "Priority Level",
            Select,
            false,
            &["Standard", "High", "Emergency"],
        ),
    ],
};

static RELOCATION_ASSISTANCE: FormTemplate = FormTemplate {
    id: FormId::RelocationAssistance,
    title: "Relocation Assistance Application",
    category: "Relocation",
    fields: &[
        field("client_name", "Client Name", Text, true),
        field("current_address", "Current Address", Text, true),
        choice(
            "reason_for_relocation",
            "Reason for Relocation",
            Select,
            false,
            &["Lead Hazard", "Unsafe Conditions", "Landlord Harassment", "Other"],
        ),
        field("family_size", "Household Size", Number, true),
        field("preferred_area", "Preferred Relocation Area", Text, false),
        field("move_date", "Desired Move Date", Date, false),
        choice(
            "assistance_needed",
            "Type of Assistance Needed",
            CheckboxGroup,
            false,
            &["Temporary Housing", "Moving Expenses", "Storage", "Transportation"],
        ),
    ],
};

static CLIENT_GRIEVANCE: FormTemplate = FormTemplate {
    id: FormId::ClientGrievance,
    title: "Client Grievance Form",
    category: "Grievance",
    fields: &[
        field("client_name", "Client Name", Text, true),
        field("case_number", "Case Number (if applicable)", Text, false),
        field("incident_date", "Date of Incident", Date, true),
        field("location", "Location of Incident", Text, true),
        field("staff_involved", "Staff Member(s) Involved", Text, false),
        choice(
            "grievance_type",
            "Type of Grievance",
            Select,
            false,
            &[
                "Service Denial",
                "Staff Misconduct",
                "Facility Conditions",
                "Discrimination",
                "Other",
            ],
        ),
        field("description", "Detailed Description", TextArea, true),
        field("desired_outcome", "Desired Resolution", TextArea, false),
    ],
};

static GRIEVANCE_RESOLUTION: FormTemplate = FormTemplate {
    id: FormId::GrievanceResolution,
    title: "Grievance Resolution Report",
    category: "Grievance",
    fields: &[
        field("grievance_id", "Grievance ID", Text, true),
        field("client_name", "Client Name", Text, true),
        field("investigation_date", "Investigation Date", Date, true),
        field("investigator_name", "Investigator Name", Text, true),
        field("findings", "Investigation Findings", TextArea, true),
        field("resolution_actions", "Resolution Actions Taken", TextArea, true),
        choice(
            "resolution_status",
            "Resolution Status",
            Select,
            false,
            &["Resolved", "Partially Resolved", "Unresolved", "Referred"],
        ),
        choice(
            "follow_up_required",
            "Follow-up Required",
            Select,
            false,
            &["Yes", "No"],
        ),
    ],
};

static SAFETY_INSPECTION: FormTemplate = FormTemplate {
    id: FormId::SafetyInspection,
    title: "Property Safety Inspection",
    category: "Inspection",
    fields: &[
        field("property_address", "Property Address", Text, true),
        field("inspection_date", "Inspection Date", Date, true),
        field("inspector_name", "Inspector Name", Text, true),
        field("structural_issues", "Structural Issues Found", TextArea, false),
        choice(
            "electrical_safety",
            "Electrical Safety",
            Select,
            false,
            &["Pass", "Fail", "Needs Repair"],
        ),
        choice(
            "plumbing_condition",
            "Plumbing Condition",
            Select,
            false,
            &["Good", "Fair", "Poor"],
        ),
        choice(
            "overall_rating",
            "Overall Safety Rating",
            Select,
            false,
            &["Safe", "Needs Improvement", "Unsafe"],
        ),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn single(value: &str) -> FieldValue {
        FieldValue::Single(value.to_string())
    }

    fn filled(pairs: &[(&str, FieldValue)]) -> FormData {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn ids_parse_back_to_their_form() {
        for form in FormId::ALL {
            assert_eq!(FormId::parse(form.as_str()), FormLookup::Known(form));
            assert_eq!(form.template().id, form);
        }
        assert_eq!(
            FormId::parse("tax-return").known(),
            Err(FormError::UnknownForm("tax-return".to_string()))
        );
    }

    #[test]
    fn only_choice_fields_carry_options() {
        for form in FormId::ALL {
            for field in form.template().fields {
                let is_choice = matches!(field.kind, FieldKind::Select | FieldKind::CheckboxGroup);
                assert_eq!(is_choice, !field.options.is_empty(), "{}", field.name);
            }
        }
    }

    #[test]
    fn complete_form_passes_validation() {
        let data = filled(&[
            ("client_name", single("Maria Hernandez")),
            ("current_address", single("45 Ash St")),
            ("reason_for_relocation", single("Lead Hazard")),
            ("family_size", single("4")),
            ("move_date", single("2026-11-01")),
            (
                "assistance_needed",
                FieldValue::Multiple(vec!["Storage".to_string(), "Transportation".to_string()]),
            ),
        ]);
        assert_eq!(validate(FormId::RelocationAssistance.template(), &data), Ok(()));
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let data = filled(&[("client_name", single("  "))]);
        let Err(FormError::Invalid(errors)) = validate(FormId::ClientGrievance.template(), &data)
        else {
            panic!("expected validation errors");
        };
        let missing: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            missing,
            vec!["client_name", "incident_date", "location", "description"]
        );
        assert!(errors.iter().all(|e| e.problem == FieldProblem::Missing));
    }

    #[test]
    fn typed_fields_are_checked() {
        let data = filled(&[
            ("client_name", single("Robert Johnson")),
            ("dob", single("last spring")),
            ("family_size", single("four")),
            (
                "services_needed",
                FieldValue::Multiple(vec!["Job Training".to_string(), "Pony".to_string()]),
            ),
            ("favourite_colour", single("blue")),
        ]);
        let Err(FormError::Invalid(errors)) = validate(FormId::HomelessIntake.template(), &data)
        else {
            panic!("expected validation errors");
        };
        assert!(errors.contains(&FieldError {
            field: "dob".to_string(),
            problem: FieldProblem::NotADate
        }));
        assert!(errors.contains(&FieldError {
            field: "family_size".to_string(),
            problem: FieldProblem::NotANumber
        }));
        assert!(errors.contains(&FieldError {
            field: "services_needed".to_string(),
            problem: FieldProblem::NotAnOption("Pony".to_string())
        }));
        assert!(errors.contains(&FieldError {
            field: "favourite_colour".to_string(),
            problem: FieldProblem::UnknownField
        }));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn number_fields_reject_non_finite_values() {
        for raw in ["NaN", "inf", "-infinity", "1e400"] {
            let data = filled(&[
                ("client_name", single("Robert Johnson")),
                ("dob", single("1980-02-29")),
                ("family_size", single(raw)),
            ]);
            assert_eq!(
                validate(FormId::HomelessIntake.template(), &data),
                Err(FormError::Invalid(vec![FieldError {
                    field: "family_size".to_string(),
                    problem: FieldProblem::NotANumber,
                }])),
                "{raw}"
            );
        }
        let data = filled(&[
            ("client_name", single("Robert Johnson")),
            ("dob", single("1980-02-29")),
            ("family_size", single(" 2.5 ")),
        ]);
        assert_eq!(validate(FormId::HomelessIntake.template(), &data), Ok(()));
    }

    #[test]
    fn select_rejects_values_outside_its_options() {
        let data = filled(&[
            ("grievance_id", single("G-1")),
            ("client_name", single("Sarah Wilson")),
            ("investigation_date", single("2026-10-01")),
            ("investigator_name", single("K. Brown")),
            ("findings", single("Confirmed")),
            ("resolution_actions", single("Retraining")),
            ("follow_up_required", single("Maybe")),
        ]);
        assert_eq!(
            validate(FormId::GrievanceResolution.template(), &data),
            Err(FormError::Invalid(vec![FieldError {
                field: "follow_up_required".to_string(),
                problem: FieldProblem::NotAnOption("Maybe".to_string()),
            }]))
        );
    }

    fn filter(search: Option<&str>, category: Option<&str>) -> Vec<FormId> {
        search_forms(&FormFilter {
            search: search.map(str::to_string),
            category: category.map(str::to_string),
        })
    }

    #[test]
    fn library_search_looks_at_titles_and_categories() {
        assert_eq!(filter(None, None), FormId::ALL.to_vec());
        assert_eq!(filter(Some("   "), Some("")), FormId::ALL.to_vec());
        assert_eq!(
            filter(Some("GRIEVANCE"), None),
            vec![FormId::ClientGrievance, FormId::GrievanceResolution]
        );
        assert_eq!(
            filter(Some("request"), None),
            vec![FormId::LeadInspection, FormId::ShelterPlacement]
        );
        assert!(filter(Some("tax return"), None).is_empty());
    }

    #[test]
    fn library_category_filter_combines_with_search() {
        assert_eq!(
            filter(None, Some("homeless services")),
            vec![FormId::HomelessIntake, FormId::ShelterPlacement]
        );
        assert_eq!(
            filter(Some("shelter"), Some("Homeless Services")),
            vec![FormId::ShelterPlacement]
        );
        assert!(filter(None, Some("Homeless")).is_empty());
    }

    #[test]
    fn preview_marks_required_fields_and_lists_options() {
        let preview = FormId::SafetyInspection.template().preview();
        let lines: Vec<_> = preview.lines().collect();
        assert_eq!(lines[0], "Property Safety Inspection");
        assert_eq!(lines[1], "Property Address *: ________________");
        assert_eq!(lines[5], "Electrical Safety: ☐ Pass ☐ Fail ☐ Needs Repair");
        assert_eq!(lines.len(), 8);
    }
}
