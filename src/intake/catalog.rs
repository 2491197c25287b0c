//! Static intake catalog: preliminary steps, business-plan sections, tiers.
//!
//! Everything here is immutable and defined at compile time. The ordering of
//! each table is significant: the sequencer and the traversal both walk these
//! tables front to back and stop at the first unanswered entry.

use serde::{Deserialize, Serialize};

/// Every field the intake can collect.
///
/// Preliminary steps and questionnaire questions share one key space, so a
/// profile can never hold two answers under the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    // Preliminary
    CompanyName,
    Language,
    Sphere,
    Education,
    Experience,
    Location,
    // Section 1
    BusinessIdea,
    #[serde(rename = "vision_3_5_years")]
    Vision3To5Years,
    SkillsPassion,
    Industry,
    // Section 2
    IdealCustomer,
    ProblemYouSolve,
    ProductsServicesPricing,
    Differentiation,
    CustomerPurchaseCriteria,
    CustomerRisks,
    // Section 3
    LaunchPlan,
    SalesMarketingChannels,
    ProductionLogistics,
    DeliveryOperations,
    DistributionNetwork,
    ThirdPartiesPartners,
    Internationalization,
    // Section 4
    StartupCosts,
    SwotAnalysis,
    CompanyBasics,
    ProfitabilityTimeline,
    OperatingRisks,
    IntellectualProperty,
    PermitsNotices,
    Insurance,
    KeyContracts,
}

impl FieldKey {
    pub const ALL: [FieldKey; 32] = [
        Self::CompanyName,
        Self::Language,
        Self::Sphere,
        Self::Education,
        Self::Experience,
        Self::Location,
        Self::BusinessIdea,
        Self::Vision3To5Years,
        Self::SkillsPassion,
        Self::Industry,
        Self::IdealCustomer,
        Self::ProblemYouSolve,
        Self::ProductsServicesPricing,
        Self::Differentiation,
        Self::CustomerPurchaseCriteria,
        Self::CustomerRisks,
        Self::LaunchPlan,
        Self::SalesMarketingChannels,
        Self::ProductionLogistics,
        Self::DeliveryOperations,
        Self::DistributionNetwork,
        Self::ThirdPartiesPartners,
        Self::Internationalization,
        Self::StartupCosts,
        Self::SwotAnalysis,
        Self::CompanyBasics,
        Self::ProfitabilityTimeline,
        Self::OperatingRisks,
        Self::IntellectualProperty,
        Self::PermitsNotices,
        Self::Insurance,
        Self::KeyContracts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyName => "company_name",
            Self::Language => "language",
            Self::Sphere => "sphere",
            Self::Education => "education",
            Self::Experience => "experience",
            Self::Location => "location",
            Self::BusinessIdea => "business_idea",
            Self::Vision3To5Years => "vision_3_5_years",
            Self::SkillsPassion => "skills_passion",
            Self::Industry => "industry",
            Self::IdealCustomer => "ideal_customer",
            Self::ProblemYouSolve => "problem_you_solve",
            Self::ProductsServicesPricing => "products_services_pricing",
            Self::Differentiation => "differentiation",
            Self::CustomerPurchaseCriteria => "customer_purchase_criteria",
            Self::CustomerRisks => "customer_risks",
            Self::LaunchPlan => "launch_plan",
            Self::SalesMarketingChannels => "sales_marketing_channels",
            Self::ProductionLogistics => "production_logistics",
            Self::DeliveryOperations => "delivery_operations",
            Self::DistributionNetwork => "distribution_network",
            Self::ThirdPartiesPartners => "third_parties_partners",
            Self::Internationalization => "internationalization",
            Self::StartupCosts => "startup_costs",
            Self::SwotAnalysis => "swot_analysis",
            Self::CompanyBasics => "company_basics",
            Self::ProfitabilityTimeline => "profitability_timeline",
            Self::OperatingRisks => "operating_risks",
            Self::IntellectualProperty => "intellectual_property",
            Self::PermitsNotices => "permits_notices",
            Self::Insurance => "insurance",
            Self::KeyContracts => "key_contracts",
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fact collected before the questionnaire.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PreliminaryStep {
    #[serde(rename = "id")]
    pub key: FieldKey,
    pub label: &'static str,
    /// Minimum trimmed length (in characters) for the reply to count.
    #[serde(skip)]
    pub min_chars: usize,
    /// What the assistant should ask for at this step.
    #[serde(skip)]
    pub instruction: &'static str,
}

/// A single questionnaire prompt.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    #[serde(rename = "id")]
    pub key: FieldKey,
    pub label: &'static str,
    pub guidance: &'static str,
}

/// Core questions gate the optional ones of the same section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Core,
    Optional,
}

/// A business-plan section.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub core_questions: &'static [Question],
    pub optional_questions: &'static [Question],
}

/// A reward level unlocked by points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub id: &'static str,
    pub name: &'static str,
    pub points_required: u32,
    pub icon: &'static str,
}

pub static PRELIMINARY_STEPS: [PreliminaryStep; 6] = [
    PreliminaryStep {
        key: FieldKey::CompanyName,
        label: "Company Name",
        min_chars: 2,
        instruction: "Ask for the company name. Be friendly and welcoming.",
    },
    PreliminaryStep {
        key: FieldKey::Language,
        label: "Language",
        min_chars: 2,
        instruction: "Ask for the preferred language (e.g., English, Spanish, French, German).",
    },
    PreliminaryStep {
        key: FieldKey::Sphere,
        label: "Business Sphere",
        min_chars: 3,
        instruction: "Ask what industry or business sphere the company operates in.",
    },
    PreliminaryStep {
        key: FieldKey::Education,
        label: "Education",
        min_chars: 3,
        instruction: "Ask about the educational background (e.g., Bachelor's in Business, MBA, etc.).",
    },
    // A number of years may be a single digit.
    PreliminaryStep {
        key: FieldKey::Experience,
        label: "Experience",
        min_chars: 1,
        instruction: "Ask how many years of business experience they have.",
    },
    PreliminaryStep {
        key: FieldKey::Location,
        label: "Location",
        min_chars: 3,
        instruction: "Ask where the business is located.",
    },
];

pub static SECTIONS: [Section; 4] = [
    Section {
        id: "section_1",
        title: "Section 1: The Big Picture",
        description: "Your Vision and Foundation",
        core_questions: &[
            Question {
                key: FieldKey::BusinessIdea,
                label: "Your Business Idea",
                guidance: "In a few sentences: what will you sell, and who will buy it? Keep it simple and clear.",
            },
            Question {
                key: FieldKey::Vision3To5Years,
                label: "Your Vision (3–5 years)",
                guidance: "Imagine your business in 3-5 years. What does it look like? What impact are you making? Don't be afraid to dream a little.",
            },
            Question {
                key: FieldKey::SkillsPassion,
                label: "Your Skills & Passion",
                guidance: "What experience, skills, or passion do you have that relates to this business? Why are YOU the right person to do this?",
            },
        ],
        optional_questions: &[Question {
            key: FieldKey::Industry,
            label: "Industry",
            guidance: "Briefly describe your industry, typical price levels, and trends affecting you (e.g., seasonality, regulation, technology). Keep to 3–5 bullets.",
        }],
    },
    Section {
        id: "section_2",
        title: "Section 2: Your Market, Customers, and Offer",
        description: "Who you're serving and what you're selling",
        core_questions: &[
            Question {
                key: FieldKey::IdealCustomer,
                label: "Your Ideal Customer",
                guidance: "Describe 1-2 types of customers you want to serve (e.g., small cafes in Helsinki, busy parents). Are they consumers (B2C) or other businesses (B2B)?",
            },
            Question {
                key: FieldKey::ProblemYouSolve,
                label: "The Problem You Solve",
                guidance: "What specific problem, need, or desire does your product/service address for your ideal customer? Why would they pay for your solution?",
            },
            Question {
                key: FieldKey::ProductsServicesPricing,
                label: "Your Products, Services & Pricing",
                guidance: "List your main 1-3 products or services. How will you charge for them (e.g., per hour, fixed price, subscription)? What is a rough price point and your estimated cost per unit?",
            },
            Question {
                key: FieldKey::Differentiation,
                label: "What Makes You Different?",
                guidance: "Who are your top 2-3 competitors or alternatives? What is the main reason a customer would choose you over them? (e.g., better price, higher quality, more convenient, unique expertise).",
            },
        ],
        optional_questions: &[
            Question {
                key: FieldKey::CustomerPurchaseCriteria,
                label: "Customer Purchase Criteria",
                guidance: "What 3–5 factors customers compare when choosing (e.g., price, speed, quality, location, reviews, warranty, language, payment options). Rank them by importance.",
            },
            Question {
                key: FieldKey::CustomerRisks,
                label: "Customer Risks",
                guidance: "List things that might stop a customer from buying (e.g., price too high, trust, delivery delay, privacy concerns). Add how you will reduce each risk.",
            },
        ],
    },
    Section {
        id: "section_3",
        title: "Section 3: Operations and Go-to-Market",
        description: "How you'll run the business and reach customers",
        core_questions: &[
            Question {
                key: FieldKey::LaunchPlan,
                label: "Your Launch Plan",
                guidance: "What are the first few practical steps you will take to get your first customer in the first 3 months? (e.g., build a simple website, contact 10 potential clients, run a small social media ad).",
            },
            Question {
                key: FieldKey::SalesMarketingChannels,
                label: "Sales & Marketing Channels",
                guidance: "How will your first customers hear about you? Pick 1-2 channels to start with (e.g., Instagram, local networking events, Google search, word-of-mouth).",
            },
        ],
        optional_questions: &[
            Question {
                key: FieldKey::ProductionLogistics,
                label: "Production and logistics (goods)",
                guidance: "If you sell goods: where you get them, minimum order sizes, lead times, shipping methods/costs, return process, and main cost drivers.",
            },
            Question {
                key: FieldKey::DeliveryOperations,
                label: "Delivery operations (services)",
                guidance: "If you sell services: how you deliver, hours of operation, tools/software used, capacity per week, service level targets, and variable costs (e.g., travel, subcontracting).",
            },
            Question {
                key: FieldKey::DistributionNetwork,
                label: "Distribution network",
                guidance: "List partners/channels that will sell or deliver your offer (marketplaces, resellers, distributors). Include expected share of sales and fees/commissions.",
            },
            Question {
                key: FieldKey::ThirdPartiesPartners,
                label: "Other third parties and key partners",
                guidance: "Suppliers, subcontractors, or advisors you rely on. For each: role and key terms (price, notice period).",
            },
            Question {
                key: FieldKey::Internationalization,
                label: "Internationalization plans",
                guidance: "If you plan to sell outside your country: target countries, timeline, language/currency needs, and any rules you must follow.",
            },
        ],
    },
    Section {
        id: "section_4",
        title: "Section 4: Finances, Risks, and Formalities",
        description: "Numbers, challenges, and legal setup",
        core_questions: &[
            Question {
                key: FieldKey::StartupCosts,
                label: "Startup Costs & Initial Financing",
                guidance: "What are the essential things you need to buy to get started (e.g., laptop, materials, website domain)? How much cash do you need to cover costs for the first 3 months? (Estimates are fine!)",
            },
            Question {
                key: FieldKey::SwotAnalysis,
                label: "SWOT Analysis",
                guidance: "List your top 2 strengths, weaknesses, opportunities, and threats. Be honest! This is a great way to summarize your situation.",
            },
            Question {
                key: FieldKey::CompanyBasics,
                label: "Company Basics",
                guidance: "What is your planned company name and legal form (e.g., sole trader/toiminimi, limited company/osakeyhtiö)? Who are the owners and what are the ownership percentages?",
            },
        ],
        optional_questions: &[
            Question {
                key: FieldKey::ProfitabilityTimeline,
                label: "Profitability Timeline",
                guidance: "Estimate monthly fixed costs, expected monthly sales for months 1–6, and when you break even. Include how much cash you need until break-even (runway).",
            },
            Question {
                key: FieldKey::OperatingRisks,
                label: "Potential risks in the operating environment",
                guidance: "Big external risks you cannot control (e.g., regulation changes, supplier issues, economic downturn). For each, note likelihood (low/med/high) and a simple backup plan.",
            },
            Question {
                key: FieldKey::IntellectualProperty,
                label: "Intellectual Property",
                guidance: "Names/brands, domains, designs, or inventions. Say if registered/applied, and any next steps (e.g., file trademark).",
            },
            Question {
                key: FieldKey::PermitsNotices,
                label: "Permits and notices",
                guidance: "Licenses/permits you may need (food, construction, health), who issues them, and expected timing/cost.",
            },
            Question {
                key: FieldKey::Insurance,
                label: "Insurance",
                guidance: "What insurance you plan to have (liability, professional, product, property). Add estimated annual premium or a quote if available.",
            },
            Question {
                key: FieldKey::KeyContracts,
                label: "Key contracts",
                guidance: "Any important contracts you need or already have (supplier, landlord, key customer). Note main terms (length, price, termination).",
            },
        ],
    },
];

/// Sorted ascending by `points_required`; the first tier is always reachable.
pub static TIERS: [Tier; 5] = [
    Tier {
        id: "beginner",
        name: "Beginner",
        points_required: 0,
        icon: "🌱",
    },
    Tier {
        id: "motivated_entrepreneur",
        name: "Motivated Entrepreneur",
        points_required: 3,
        icon: "🚀",
    },
    Tier {
        id: "growing_entrepreneur",
        name: "Growing Entrepreneur",
        points_required: 6,
        icon: "🌟",
    },
    Tier {
        id: "experienced_business_professional",
        name: "Experienced Business Professional",
        points_required: 10,
        icon: "💼",
    },
    Tier {
        id: "master_entrepreneur",
        name: "Master Entrepreneur",
        points_required: 20,
        icon: "👑",
    },
];
