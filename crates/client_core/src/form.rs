//! Engagement form state: ten free-text fields and one validation rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The structured engagement description submitted to the generate
/// operation. Field names serialize to the backend's camelCase contract.
///
/// Only direct user edits mutate a form; the session controller clones a
/// snapshot at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SowForm {
    pub project_objectives: String,
    pub project_scope: String,
    pub services_description: String,
    pub specific_features: String,
    pub platforms_technologies: String,
    pub integrations: String,
    pub design_specifications: String,
    pub out_of_scope: String,
    pub deliverables: String,
    pub timeline: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SowFormField {
    ProjectObjectives,
    ProjectScope,
    ServicesDescription,
    SpecificFeatures,
    PlatformsTechnologies,
    Integrations,
    DesignSpecifications,
    OutOfScope,
    Deliverables,
    Timeline,
}

impl SowFormField {
    pub const ALL: [SowFormField; 10] = [
        SowFormField::ProjectObjectives,
        SowFormField::ProjectScope,
        SowFormField::ServicesDescription,
        SowFormField::SpecificFeatures,
        SowFormField::PlatformsTechnologies,
        SowFormField::Integrations,
        SowFormField::DesignSpecifications,
        SowFormField::OutOfScope,
        SowFormField::Deliverables,
        SowFormField::Timeline,
    ];

    /// Wire name of the field, as the backend expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            SowFormField::ProjectObjectives => "projectObjectives",
            SowFormField::ProjectScope => "projectScope",
            SowFormField::ServicesDescription => "servicesDescription",
            SowFormField::SpecificFeatures => "specificFeatures",
            SowFormField::PlatformsTechnologies => "platformsTechnologies",
            SowFormField::Integrations => "integrations",
            SowFormField::DesignSpecifications => "designSpecifications",
            SowFormField::OutOfScope => "outOfScope",
            SowFormField::Deliverables => "deliverables",
            SowFormField::Timeline => "timeline",
        }
    }
}

impl fmt::Display for SowFormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownFormField(pub String);

impl FromStr for SowFormField {
    type Err = UnknownFormField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = Self::ALL
            .iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s))
            .copied();
        field.ok_or_else(|| UnknownFormField(s.to_string()))
    }
}

/// Outcome of the single pre-dispatch validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValidation {
    Valid,
    Invalid { reason: String },
}

impl SowForm {
    /// Sets exactly one named field, leaving all others untouched.
    pub fn set_field(&mut self, field: SowFormField, value: impl Into<String>) {
        let slot = self.field_mut(field);
        *slot = value.into();
    }

    pub fn field(&self, field: SowFormField) -> &str {
        match field {
            SowFormField::ProjectObjectives => &self.project_objectives,
            SowFormField::ProjectScope => &self.project_scope,
            SowFormField::ServicesDescription => &self.services_description,
            SowFormField::SpecificFeatures => &self.specific_features,
            SowFormField::PlatformsTechnologies => &self.platforms_technologies,
            SowFormField::Integrations => &self.integrations,
            SowFormField::DesignSpecifications => &self.design_specifications,
            SowFormField::OutOfScope => &self.out_of_scope,
            SowFormField::Deliverables => &self.deliverables,
            SowFormField::Timeline => &self.timeline,
        }
    }

    fn field_mut(&mut self, field: SowFormField) -> &mut String {
        match field {
            SowFormField::ProjectObjectives => &mut self.project_objectives,
            SowFormField::ProjectScope => &mut self.project_scope,
            SowFormField::ServicesDescription => &mut self.services_description,
            SowFormField::SpecificFeatures => &mut self.specific_features,
            SowFormField::PlatformsTechnologies => &mut self.platforms_technologies,
            SowFormField::Integrations => &mut self.integrations,
            SowFormField::DesignSpecifications => &mut self.design_specifications,
            SowFormField::OutOfScope => &mut self.out_of_scope,
            SowFormField::Deliverables => &mut self.deliverables,
            SowFormField::Timeline => &mut self.timeline,
        }
    }

    /// Project objectives must be non-empty after trimming before a generate
    /// may be dispatched. Every other field may be empty, arbitrary-length
    /// text.
    pub fn validate_for_submission(&self) -> FormValidation {
        if self.project_objectives.trim().is_empty() {
            FormValidation::Invalid {
                reason: "Project Objectives is required".to_string(),
            }
        } else {
            FormValidation::Valid
        }
    }

    /// Starter form pre-filled with the boilerplate engagement text shipped
    /// with the original tool, placeholders included.
    pub fn boilerplate() -> Self {
        Self {
            project_objectives: BOILERPLATE_OBJECTIVES.to_string(),
            project_scope: BOILERPLATE_SCOPE.to_string(),
            services_description: BOILERPLATE_SERVICES.to_string(),
            specific_features: BOILERPLATE_FEATURES.to_string(),
            platforms_technologies: String::new(),
            integrations: String::new(),
            design_specifications: String::new(),
            out_of_scope: BOILERPLATE_OUT_OF_SCOPE.to_string(),
            deliverables: BOILERPLATE_DELIVERABLES.to_string(),
            timeline: BOILERPLATE_TIMELINE.to_string(),
        }
    }
}

const BOILERPLATE_OBJECTIVES: &str = "The Client operates a complex on-premise environment, primarily leveraging Microsoft SQL Server for multiple transactional systems, both homegrown and commercial. These systems encompass transportation management, order management, finished vehicle tracking, inspections, and claims processing. While these systems generate substantial data volumes, they offer limited analytical and reporting capabilities. Currently, different departments rely on a centralized BI function for ad-hoc reporting, which creates bottlenecks in data access and strains the transactional databases";

const BOILERPLATE_SCOPE: &str = "The Discovery and Assessment phase will be considered complete upon delivery and acceptance of:\n5.1.\tAll documented deliverables outlined in Section 3\n5.2.\tFinal presentation of findings and recommendations\n5.3.\tProposed implementation roadmap\n";

const BOILERPLATE_SERVICES: &str = "[PROVIDER_NAME] will provide the following Services: \n2.1.\tStakeholder Engagement and Current State Analysis A thorough review of existing systems and processes through structured interviews and documentation review.\n2.2.\tTechnical Evaluation Detailed assessment of current architecture, system capabilities, and integration points.\n2.3.\tGap Analysis and Recommendations Comprehensive analysis of current state versus industry best practices, leading to actionable recommendations.\n2.4.\tImplementation Planning Development of a strategic roadmap for modernizing the data platform environment.\n";

const BOILERPLATE_FEATURES: &str = "The Discovery and Assessment phase will be considered complete upon delivery and acceptance of:\n5.1.\tAll documented deliverables outlined in Section 3\n5.2.\tFinal presentation of findings and recommendations\n5.3.\tProposed implementation roadmap\n";

const BOILERPLATE_OUT_OF_SCOPE: &str = "As a condition for recovery of any liability, the parties must assert any claim under this SOW within three (3) months after discovery or sixty (60) days after the termination or expiration of this SOW, whichever is earlier. In no event will either party to this Agreement be liable for incidental, consequential, punitive, indirect or special damages, including, without limitation, interruption or loss of business, profit or goodwill.  In no event shall [PROVIDER_NAME]'s liability to Client exceed the fees received from Client under this SOW during the six (6) month period preceding the claim to which the liability relates, whether arising from an alleged breach of the Agreement or this SOW, an alleged tort, or any other cause of action.";

const BOILERPLATE_DELIVERABLES: &str = ".  [PROVIDER_NAME] will provide the following Deliverables: \n3.1.\tCurrent State Analysis report of existing systems, data flows, and identified opportunities for improvement.\n3.2.\tTechnical Assessment report with detailed evaluation of current architecture, including integration analysis and technology stack assessment.\n3.3.\tFinal Recommendations report of complete modernization strategy including target architecture, implementation roadmap, and strategy\n";

const BOILERPLATE_TIMELINE: &str = ". The Services and Deliverables shall be delivered in accordance with the following schedule:\n4.1.\tDiscovery (Weeks 1-3)\n\u{2022}\tStakeholder interviews\n\u{2022}\tSystem documentation review\n\u{2022}\tInitial findings compilation\n4.2.\tTechnical Analysis (Weeks 4-5)\n\u{2022}\tArchitecture evaluation\n\u{2022}\tIntegration assessment\n\u{2022}\tTechnology stack review\n4.3.\tFeasibility Evaluation (Weeks 6-7)\n\u{2022}\tGap analysis\n\u{2022}\tRecommendations\n4.4.\tFinal Recommendations (Weeks 8-10)\n\u{2022}\tRoadmap development\n\u{2022}\tFinal deliverable preparation\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_touches_exactly_one_field() {
        let mut form = SowForm::default();
        form.set_field(SowFormField::Integrations, "Salesforce, SAP");

        assert_eq!(form.integrations, "Salesforce, SAP");
        for field in SowFormField::ALL {
            if field != SowFormField::Integrations {
                assert_eq!(form.field(field), "", "field {field} should be untouched");
            }
        }
    }

    #[test]
    fn validation_requires_non_whitespace_objectives() {
        let mut form = SowForm::default();
        assert!(matches!(
            form.validate_for_submission(),
            FormValidation::Invalid { .. }
        ));

        form.project_objectives = "  \n\t ".to_string();
        assert!(matches!(
            form.validate_for_submission(),
            FormValidation::Invalid { .. }
        ));

        form.project_objectives = "Build inventory sync".to_string();
        assert_eq!(form.validate_for_submission(), FormValidation::Valid);
    }

    #[test]
    fn objectives_is_the_only_required_field() {
        let form = SowForm {
            project_objectives: "Modernize the data platform".to_string(),
            ..SowForm::default()
        };
        assert_eq!(form.validate_for_submission(), FormValidation::Valid);
    }

    #[test]
    fn boilerplate_form_is_submittable() {
        assert_eq!(
            SowForm::boilerplate().validate_for_submission(),
            FormValidation::Valid
        );
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let mut form = SowForm::default();
        form.set_field(SowFormField::ProjectObjectives, "objectives text");
        form.set_field(SowFormField::OutOfScope, "not this");

        let value = serde_json::to_value(&form).expect("serialize");
        assert_eq!(value["projectObjectives"], "objectives text");
        assert_eq!(value["outOfScope"], "not this");
        for field in SowFormField::ALL {
            assert!(
                value.get(field.as_str()).is_some(),
                "missing wire key {field}"
            );
        }
    }

    #[test]
    fn field_names_round_trip_through_from_str() {
        for field in SowFormField::ALL {
            assert_eq!(field.as_str().parse::<SowFormField>(), Ok(field));
        }
        assert_eq!("projectscope".parse::<SowFormField>(), Ok(SowFormField::ProjectScope));
        assert!("notAField".parse::<SowFormField>().is_err());
    }
}
