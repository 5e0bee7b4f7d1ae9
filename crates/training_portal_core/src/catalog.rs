//! crates/training_portal_core/src/catalog.rs
//!
//! The fixed curriculum: ten modules, their outlines, and the video lessons with
//! the quizzes that gate completion. Lookups by raw number or video id go through
//! explicit fallbacks instead of string-keyed tables.

use std::borrow::Cow;

use crate::assessment::Question;

/// A module of the curriculum. Declaration order is curriculum order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrainingModule {
    IntroContext,
    LeadAbatement,
    HomelessServices,
    HousingCode,
    EmergencyResponse,
    DataManagement,
    CommunityOutreach,
    LegalCompliance,
    AiTools,
    ProgramEvaluation,
}

impl TrainingModule {
    pub const ALL: [TrainingModule; 10] = [
        TrainingModule::IntroContext,
        TrainingModule::LeadAbatement,
        TrainingModule::HomelessServices,
        TrainingModule::HousingCode,
        TrainingModule::EmergencyResponse,
        TrainingModule::DataManagement,
        TrainingModule::CommunityOutreach,
        TrainingModule::LegalCompliance,
        TrainingModule::AiTools,
        TrainingModule::ProgramEvaluation,
    ];

    /// The 1-based module number.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn video_id(self) -> &'static str {
        match self {
            TrainingModule::IntroContext => "intro-context",
            TrainingModule::LeadAbatement => "lead-abatement",
            TrainingModule::HomelessServices => "homeless-services",
            TrainingModule::HousingCode => "housing-code",
            TrainingModule::EmergencyResponse => "emergency-response",
            TrainingModule::DataManagement => "data-management",
            TrainingModule::CommunityOutreach => "community-outreach",
            TrainingModule::LegalCompliance => "legal-compliance",
            TrainingModule::AiTools => "ai-tools",
            TrainingModule::ProgramEvaluation => "program-evaluation",
        }
    }

    pub fn from_video_id(video_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.video_id() == video_id)
    }

    pub fn outline(self) -> ModuleOutline {
        match self {
            TrainingModule::IntroContext => known_outline(
                self,
                "Introduction & Context",
                "Introduction to AI-Enhanced Services",
                "15 minutes",
                "1.5 hours",
                "Lecture + Discussion",
                &[
                    "Current challenges in Newark's health and homeless services",
                    "Goals and objectives of the AI-enabled system",
                    "How this training will improve service delivery",
                    "Overview of all training modules",
                ],
            ),
            TrainingModule::LeadAbatement => known_outline(
                self,
                "Lead Abatement & Regulation",
                "Understanding Lead Laws and Regulations",
                "22 minutes",
                "2 hours",
                "Lecture + Case Study",
                &[
                    "Federal, state, and local lead laws",
                    "Municipal lead certifications and requirements",
                    "Inspection protocols and procedures",
                    "Interim controls vs. full abatement",
                    "Required documentation and recordkeeping",
                ],
            ),
            TrainingModule::HomelessServices => known_outline(
                self,
                "Homeless Services Coordination",
                "Homeless Services Coordination",
                "18 minutes",
                "2.5 hours",
                "Interactive + Role Play",
                &[
                    "Comprehensive intake and assessment procedures",
                    "Resource mapping and availability tracking",
                    "Inter-agency collaboration strategies",
                    "Case management and follow-up protocols",
                    "Crisis intervention techniques",
                ],
            ),
            TrainingModule::HousingCode => known_outline(
                self,
                "Housing Code Enforcement",
                "Housing Code Enforcement",
                "25 minutes",
                "2 hours",
                "Field Training + Case Studies",
                &[
                    "Common housing code violations",
                    "Health and safety hazards assessment",
                    "Structural and mechanical issues",
                    "Documentation and evidence collection",
                    "Photography and reporting standards",
                ],
            ),
            TrainingModule::EmergencyResponse => known_outline(
                self,
                "Emergency Response Protocols",
                "Emergency Response Protocols",
                "20 minutes",
                "2 hours",
                "Simulation + Drills",
                &[
                    "Public health emergencies",
                    "Housing emergencies and displacement",
                    "Environmental hazards",
                    "Mental health crises",
                    "Domestic violence situations",
                ],
            ),
            TrainingModule::DataManagement => known_outline(
                self,
                "Data Management & Privacy",
                "Data Management and Privacy",
                "16 minutes",
                "1.5 hours",
                "Workshop + Compliance Review",
                &[
                    "HIPAA compliance and requirements",
                    "Local privacy policies and procedures",
                    "Client confidentiality protocols",
                    "Data sharing agreements and limitations",
                    "Consent and authorization procedures",
                ],
            ),
            TrainingModule::CommunityOutreach => known_outline(
                self,
                "Community Outreach & Engagement",
                "Community Outreach and Engagement",
                "19 minutes",
                "2 hours",
                "Planning + Community Visit",
                &[
                    "Community needs assessment",
                    "Culturally competent engagement",
                    "Building trust and credibility",
                    "Multilingual communication",
                    "Accessibility and inclusion",
                ],
            ),
            TrainingModule::LegalCompliance => known_outline(
                self,
                "Legal Compliance & Documentation",
                "Legal Compliance and Documentation",
                "23 minutes",
                "2.5 hours",
                "Legal Workshop + Case Analysis",
                &[
                    "Federal, state, and local legal requirements",
                    "Constitutional rights and protections",
                    "Due process procedures",
                    "Equal protection and non-discrimination",
                    "Administrative law compliance",
                ],
            ),
            TrainingModule::AiTools => known_outline(
                self,
                "AI Tools & Technology Integration",
                "AI Tools and Technology Integration",
                "21 minutes",
                "2 hours",
                "Hands-On Technology Lab",
                &[
                    "AI-powered form generation and customization",
                    "Automated workflow systems",
                    "Data analysis and predictive insights",
                    "Natural language processing applications",
                    "Decision support systems",
                ],
            ),
            TrainingModule::ProgramEvaluation => known_outline(
                self,
                "Program Evaluation & Continuous Improvement",
                "Program Evaluation and Continuous Improvement",
                "17 minutes",
                "2.5 hours",
                "Project-Based Learning",
                &[
                    "Performance metrics and indicators",
                    "Data collection and analysis techniques",
                    "Client satisfaction measurement",
                    "Outcome tracking and assessment",
                    "Cost-effectiveness analysis",
                ],
            ),
        }
    }

    /// Only the first five modules have a recorded lesson; the rest share the generic one.
    pub fn lesson(self) -> &'static VideoLesson {
        match self {
            TrainingModule::IntroContext => &INTRO_CONTEXT_LESSON,
            TrainingModule::LeadAbatement => &LEAD_ABATEMENT_LESSON,
            TrainingModule::HomelessServices => &HOMELESS_SERVICES_LESSON,
            TrainingModule::HousingCode => &HOUSING_CODE_LESSON,
            TrainingModule::EmergencyResponse => &EMERGENCY_RESPONSE_LESSON,
            TrainingModule::DataManagement
            | TrainingModule::CommunityOutreach
            | TrainingModule::LegalCompliance
            | TrainingModule::AiTools
            | TrainingModule::ProgramEvaluation => &GENERIC_LESSON,
        }
    }
}

fn known_outline(
    module: TrainingModule,
    title: &'static str,
    video_title: &'static str,
    video_duration: &'static str,
    duration: &'static str,
    format: &'static str,
    topics: &'static [&'static str],
) -> ModuleOutline {
    ModuleOutline {
        number: module.number(),
        title: Cow::Borrowed(title),
        video_id: Cow::Borrowed(module.video_id()),
        video_title: Cow::Borrowed(video_title),
        video_duration,
        duration,
        format,
        topics,
    }
}

/// A module number as asked for by a caller, which may be outside the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleRef {
    Known(TrainingModule),
    Unknown(u32),
}

impl ModuleRef {
    pub fn from_number(number: u32) -> Self {
        TrainingModule::from_number(number).map_or(ModuleRef::Unknown(number), ModuleRef::Known)
    }

    pub fn number(self) -> u32 {
        match self {
            ModuleRef::Known(module) => module.number(),
            ModuleRef::Unknown(number) => number,
        }
    }

    pub fn outline(self) -> ModuleOutline {
        match self {
            ModuleRef::Known(module) => module.outline(),
            ModuleRef::Unknown(number) => ModuleOutline {
                number,
                title: Cow::Owned(format!("Module {number}")),
                video_id: Cow::Owned(format!("module-{number}")),
                video_title: Cow::Owned(format!("Training Video {number}")),
                video_duration: "15 minutes",
                duration: "1.5 hours",
                format: "Interactive",
                topics: &[],
            },
        }
    }

    pub fn lesson(self) -> &'static VideoLesson {
        match self {
            ModuleRef::Known(module) => module.lesson(),
            ModuleRef::Unknown(_) => &GENERIC_LESSON,
        }
    }
}

/// Resolves a video id to its lesson, falling back to the generic lesson.
pub fn lesson_for_video_id(video_id: &str) -> &'static VideoLesson {
    TrainingModule::from_video_id(video_id).map_or(&GENERIC_LESSON, TrainingModule::lesson)
}

/// What a module card and the module overview show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutline {
    pub number: u32,
    pub title: Cow<'static, str>,
    pub video_id: Cow<'static, str>,
    pub video_title: Cow<'static, str>,
    pub video_duration: &'static str,
    pub duration: &'static str,
    pub format: &'static str,
    pub topics: &'static [&'static str],
}

/// A recorded training video and the quiz that follows it.
#[derive(Debug, PartialEq, Eq)]
pub struct VideoLesson {
    pub title: &'static str,
    pub duration: &'static str,
    pub video_url: &'static str,
    pub presenter: &'static str,
    pub description: &'static str,
    pub objectives: &'static [&'static str],
    pub quiz: &'static [Question],
}

/// Sample case descriptions offered as starting text on the case analysis page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseTemplate {
    Lead,
    Homeless,
    Grievance,
    Relocation,
}

impl CaseTemplate {
    pub const ALL: [CaseTemplate; 4] = [
        CaseTemplate::Lead,
        CaseTemplate::Homeless,
        CaseTemplate::Grievance,
        CaseTemplate::Relocation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CaseTemplate::Lead => "lead",
            CaseTemplate::Homeless => "homeless",
            CaseTemplate::Grievance => "grievance",
            CaseTemplate::Relocation => "relocation",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn description(self) -> &'static str {
        match self {
            CaseTemplate::Lead => "Client: Maria Hernandez, age 3, lives at 45 Ash St, Newark. Complains of peeling paint, has elevated blood lead. Landlord refused to act. Wants relocation.",
            CaseTemplate::Homeless => "Client: Robert Johnson, found at Newark Penn Station. Single adult male, no fixed address for 3 months. Needs emergency shelter and job assistance.",
            CaseTemplate::Grievance => "Client: Sarah Wilson reports mistreatment by shelter staff at downtown location. Incident occurred yesterday evening. Requests investigation and staff retraining.",
            CaseTemplate::Relocation => "Family of 4 needs immediate relocation due to unsafe building conditions. Heating system broken, water damage, landlord unresponsive to repair requests.",
        }
    }
}

//=========================================================================================
// Lessons
//=========================================================================================

static INTRO_CONTEXT_LESSON: VideoLesson = VideoLesson {
    title: "AI Integration in Newark Health & Homeless Services",
    duration: "18 minutes",
    video_url: "https://www.youtube.com/embed/aircAruvnKk",
    presenter: "Dr. Maria Rodriguez, Newark H&HS Technology Director",
    description: "Introduction to AI implementation specifically for Newark Health & Homeless Services department, focusing on local challenges and solutions.",
    objectives: &[
        "Understand AI applications for Newark homeless population",
        "Learn Newark-specific AI implementation strategies",
        "Explore automated case management for local services",
        "Master AI-powered resource allocation for Newark",
    ],
    quiz: &[
        Question {
            prompt: "What is the primary benefit of AI in government services according to the video?",
            options: &["Cost reduction", "Automation of repetitive tasks", "Job replacement", "Data storage"],
            correct: 1,
        },
        Question {
            prompt: "How does AI improve form generation in health departments?",
            options: &[
                "By creating forms manually",
                "By automating form creation based on case needs",
                "By eliminating forms",
                "By making forms longer",
            ],
            correct: 1,
        },
    ],
};

static LEAD_ABATEMENT_LESSON: VideoLesson = VideoLesson {
    title: "Lead Safety in Newark Housing Programs",
    duration: "22 minutes",
    video_url: "https://www.youtube.com/embed/GCdwKhTtNNw",
    presenter: "James Thompson, Newark Environmental Health Specialist",
    description: "Essential lead safety protocols for Newark housing inspectors working with homeless services, focusing on the city's older housing stock.",
    objectives: &[
        "Identify lead hazards in Newark's aging housing stock",
        "Implement EPA-compliant safety procedures for Newark properties",
        "Protect homeless clients from lead exposure",
        "Coordinate with Newark housing remediation teams",
    ],
    quiz: &[
        Question {
            prompt: "According to EPA regulations, what year triggers lead-based paint disclosure requirements?",
            options: &["1976", "1978", "1980", "1982"],
            correct: 1,
        },
        Question {
            prompt: "What does the EPA RRP rule regulate?",
            options: &[
                "Only lead abatement",
                "Renovation, Repair, and Painting activities",
                "Only new construction",
                "Only residential sales",
            ],
            correct: 1,
        },
    ],
};

static HOMELESS_SERVICES_LESSON: VideoLesson = VideoLesson {
    title: "Newark Coordinated Entry System Training",
    duration: "25 minutes",
    video_url: "https://www.youtube.com/embed/liptMbjF3EE",
    presenter: "Sandra Williams, Newark Homeless Services Coordinator",
    description: "Comprehensive training on Newark's coordinated entry system, local resources, and case management protocols specific to our city's homeless population.",
    objectives: &[
        "Navigate Newark's coordinated entry system effectively",
        "Conduct vulnerability assessments using Newark protocols",
        "Coordinate with local Newark service providers",
        "Track client progress through Newark's housing continuum",
    ],
    quiz: &[
        Question {
            prompt: "What is the core principle of the Housing First approach?",
            options: &[
                "Treatment first, then housing",
                "Housing as a basic right without preconditions",
                "Employment before housing",
                "Sobriety required for housing",
            ],
            correct: 1,
        },
        Question {
            prompt: "What is trauma-informed care in homeless services?",
            options: &[
                "Medical treatment only",
                "Understanding trauma's impact on behavior and service delivery",
                "Psychiatric evaluation",
                "Crisis intervention only",
            ],
            correct: 1,
        },
    ],
};

static HOUSING_CODE_LESSON: VideoLesson = VideoLesson {
    title: "Newark Housing Code Enforcement for Homeless Services",
    duration: "25 minutes",
    video_url: "https://www.youtube.com/embed/8p1bLqeP7dQ",
    presenter: "Michael Chen, Newark Senior Housing Inspector",
    description: "Specialized housing inspection training for properties serving Newark's homeless population, including SROs, transitional housing, and permanent supportive housing.",
    objectives: &[
        "Apply Newark housing codes to homeless housing programs",
        "Inspect SROs and transitional facilities effectively",
        "Ensure habitability standards for vulnerable populations",
        "Coordinate enforcement with homeless service providers",
    ],
    quiz: &[
        Question {
            prompt: "What is the most important aspect of housing code enforcement documentation?",
            options: &[
                "Speed of completion",
                "Detailed written descriptions with photos",
                "Minimal paperwork",
                "Verbal warnings only",
            ],
            correct: 1,
        },
        Question {
            prompt: "When should emergency enforcement action be taken?",
            options: &[
                "For any violation",
                "Only when there's immediate danger to health or safety",
                "After 30 days",
                "Never",
            ],
            correct: 1,
        },
    ],
};

static EMERGENCY_RESPONSE_LESSON: VideoLesson = VideoLesson {
    title: "Emergency Response for Newark Homeless Population",
    duration: "21 minutes",
    video_url: "https://www.youtube.com/embed/tFHHnV-sz5g",
    presenter: "Lisa Rodriguez, Newark Emergency Management Director",
    description: "Emergency response protocols specifically designed for Newark's homeless population during weather emergencies, public health crises, and natural disasters.",
    objectives: &[
        "Activate homeless emergency response protocols",
        "Coordinate warming and cooling centers in Newark",
        "Manage emergency shelter surge capacity",
        "Communicate effectively with unsheltered populations",
    ],
    quiz: &[
        Question {
            prompt: "What is the purpose of the Incident Command System (ICS)?",
            options: &[
                "To create confusion",
                "To provide standardized emergency response structure",
                "To limit communication",
                "To slow response times",
            ],
            correct: 1,
        },
        Question {
            prompt: "Who typically leads public health emergency response?",
            options: &["Police department", "Fire department", "Health department", "Mayor's office"],
            correct: 2,
        },
    ],
};

static GENERIC_LESSON: VideoLesson = VideoLesson {
    title: "Training Video",
    duration: "15 minutes",
    video_url: "https://www.youtube.com/embed/aircAruvnKk",
    presenter: "Subject Matter Expert",
    description: "Professional training content with real presenters.",
    objectives: &["Learn key concepts", "Apply knowledge in practice", "Improve service delivery"],
    quiz: &[Question {
        prompt: "What is the main goal of this training?",
        options: &["Learn concepts", "Apply knowledge", "Improve service", "All of the above"],
        correct: 3,
    }],
};
