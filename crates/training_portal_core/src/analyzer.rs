//! crates/training_portal_core/src/analyzer.rs
//!
//! Maps a free-text case description to the forms a caseworker should fill in and
//! the follow-up actions to take. This is plain keyword matching in a fixed
//! priority order, plus two best-effort pattern extractions.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{CaseAnalysis, ExtractedInfo};
use crate::forms::FormId;

static CLIENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)client:\s*([^,\n]+)").expect("client name pattern is valid")
});

static STREET_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+\s+[^,\n]+(?:st|street|ave|avenue|rd|road|blvd|boulevard)[^,\n]*)")
        .expect("street address pattern is valid")
});

const LEAD_KEYWORDS: &[&str] = &["lead", "paint", "blood lead"];
const RELOCATION_KEYWORDS: &[&str] = &["relocation", "relocate"];
const HOMELESS_KEYWORDS: &[&str] = &["homeless", "shelter"];
const GRIEVANCE_KEYWORDS: &[&str] = &["grievance", "complaint", "mistreatment"];

/// Collects suggestions while keeping the form list free of duplicates.
#[derive(Default)]
struct Suggestions {
    forms: Vec<FormId>,
    actions: Vec<&'static str>,
}

impl Suggestions {
    fn suggest(&mut self, form: FormId, actions: &[&'static str]) {
        if self.forms.contains(&form) {
            return;
        }
        self.forms.push(form);
        self.actions.extend_from_slice(actions);
    }

    fn contains(&self, form: FormId) -> bool {
        self.forms.contains(&form)
    }
}

fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Analyses a case description. Never fails: text without any known keyword gets
/// the generic intake suggestion.
pub fn analyze(description: &str) -> CaseAnalysis {
    let lower = description.to_lowercase();
    let mut suggestions = Suggestions::default();

    if mentions_any(&lower, LEAD_KEYWORDS) {
        suggestions.suggest(
            FormId::LeadInspection,
            &[
                "Schedule lead inspection within 24 hours",
                "Notify landlord of inspection requirement",
            ],
        );
        if mentions_any(&lower, RELOCATION_KEYWORDS) {
            suggestions.suggest(
                FormId::RelocationAssistance,
                &["Process relocation assistance application"],
            );
        }
    }

    if mentions_any(&lower, HOMELESS_KEYWORDS) {
        suggestions.suggest(
            FormId::HomelessIntake,
            &[
                "Complete eligibility assessment",
                "Search for available shelter beds",
            ],
        );
    }

    if mentions_any(&lower, GRIEVANCE_KEYWORDS) {
        suggestions.suggest(
            FormId::ClientGrievance,
            &[
                "Initiate grievance investigation",
                "Notify supervisor within 2 hours",
            ],
        );
    }

    if lower.contains("relocation") && !suggestions.contains(FormId::RelocationAssistance) {
        suggestions.suggest(
            FormId::RelocationAssistance,
            &["Assess eligibility for relocation assistance"],
        );
    }

    if suggestions.forms.is_empty() {
        suggestions.suggest(FormId::HomelessIntake, &["Complete general intake assessment"]);
    }

    CaseAnalysis {
        extracted_info: extract_info(description),
        suggested_forms: suggestions.forms,
        actions: suggestions.actions,
    }
}

/// Pulls the client's name and a street address out of the raw text, if present.
pub fn extract_info(description: &str) -> ExtractedInfo {
    let capture = |pattern: &Regex| {
        pattern
            .captures(description)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    };

    ExtractedInfo {
        client_name: capture(&CLIENT_NAME),
        address: capture(&STREET_ADDRESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CaseTemplate;

    #[test]
    fn lead_with_relocation_suggests_both_forms_in_order() {
        let analysis = analyze("Peeling lead paint in the unit, family asks about relocation.");
        assert_eq!(
            analysis.suggested_forms,
            vec![FormId::LeadInspection, FormId::RelocationAssistance]
        );
        assert_eq!(
            analysis.actions,
            vec![
                "Schedule lead inspection within 24 hours",
                "Notify landlord of inspection requirement",
                "Process relocation assistance application",
            ]
        );
    }

    #[test]
    fn no_keywords_falls_back_to_generic_intake() {
        let analysis = analyze("Caller wants to know the office opening hours.");
        assert_eq!(analysis.suggested_forms, vec![FormId::HomelessIntake]);
        assert_eq!(analysis.actions, vec!["Complete general intake assessment"]);
    }

    #[test]
    fn relocation_alone_gets_its_own_action() {
        let analysis = analyze("Tenant requests relocation after the fire.");
        assert_eq!(analysis.suggested_forms, vec![FormId::RelocationAssistance]);
        assert_eq!(
            analysis.actions,
            vec!["Assess eligibility for relocation assistance"]
        );
    }

    #[test]
    fn relocate_only_counts_next_to_lead() {
        // "relocate" without a lead keyword is not a relocation request.
        let analysis = analyze("They may relocate to another city.");
        assert_eq!(analysis.suggested_forms, vec![FormId::HomelessIntake]);
    }

    #[test]
    fn several_categories_keep_priority_order() {
        let analysis = analyze("Complaint from a shelter resident about lead paint.");
        assert_eq!(
            analysis.suggested_forms,
            vec![
                FormId::LeadInspection,
                FormId::HomelessIntake,
                FormId::ClientGrievance
            ]
        );
        assert_eq!(analysis.actions.len(), 6);
    }

    #[test]
    fn matching_ignores_case() {
        let analysis = analyze("HOMELESS VETERAN NEEDS HELP");
        assert_eq!(analysis.suggested_forms, vec![FormId::HomelessIntake]);
        assert_eq!(analysis.actions[0], "Complete eligibility assessment");
    }

    #[test]
    fn lead_template_extracts_name_and_address() {
        let analysis = analyze(CaseTemplate::Lead.description());
        assert_eq!(
            analysis.extracted_info,
            ExtractedInfo {
                client_name: Some("Maria Hernandez".to_string()),
                address: Some("45 Ash St".to_string()),
            }
        );
        assert_eq!(
            analysis.suggested_forms,
            vec![FormId::LeadInspection, FormId::RelocationAssistance]
        );
    }

    #[test]
    fn extraction_is_optional() {
        let info = extract_info("Family of 4 needs immediate relocation.");
        assert_eq!(info, ExtractedInfo::default());
    }

    #[test]
    fn client_name_stops_at_newline() {
        let info = extract_info("client:   Robert Johnson\nfound downtown");
        assert_eq!(info.client_name.as_deref(), Some("Robert Johnson"));
    }

    #[test]
    fn suggestions_never_repeat() {
        for template in CaseTemplate::ALL {
            let forms = analyze(template.description()).suggested_forms;
            let unique: std::collections::BTreeSet<_> = forms.iter().collect();
            assert_eq!(forms.len(), unique.len());
            assert!(!forms.is_empty());
        }
    }
}
