//! # Catalog
//!
//! Fixed field names and selectable options for every recruiting category.
//!
//! Each category group is keyed by a closed enum of field names, so a
//! misspelled or retired field fails deserialization instead of being
//! carried around as an untyped key. Option values are plain strings checked
//! against the catalog when criteria cross the gateway boundary.
//!
//! | Category        | Field enum       | Tab label            |
//! |-----------------|------------------|----------------------|
//! | Basic profile   | [`BasicField`]   | Basic Profile        |
//! | Devices         | [`DeviceField`]  | Devices & Tech       |
//! | Education/work  | [`WorkField`]    | Education & Work     |
//! | AI/tech fluency | [`AiTechField`]  | AI & Tech Fluency    |
//! | Social/skills   | [`SocialField`]  | Social & Skills      |

use std::fmt;

use serde::{Deserialize, Serialize};

/// One selectable choice: the stored `value` and its display `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> FilterOption {
    FilterOption { value, label }
}

/// Common surface of the per-category field enums.
pub trait CriteriaField: Copy + Ord + fmt::Debug + 'static {
    /// Every field of the category, in display order.
    const ALL: &'static [Self];

    /// Storage key, identical to the serde name.
    fn key(self) -> &'static str;

    fn label(self) -> &'static str;

    fn options(self) -> &'static [FilterOption];

    fn allows(self, value: &str) -> bool {
        self.options().iter().any(|o| o.value == value)
    }
}

macro_rules! criteria_fields {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($key:literal, $label:literal, $options:ident) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( #[serde(rename = $key)] $variant, )+
        }

        impl CriteriaField for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant, )+ ];

            fn key(self) -> &'static str {
                match self { $( $name::$variant => $key, )+ }
            }

            fn label(self) -> &'static str {
                match self { $( $name::$variant => $label, )+ }
            }

            fn options(self) -> &'static [FilterOption] {
                match self { $( $name::$variant => $options, )+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

// ── Basic profile ────────────────────────────────────────────────────

const AGE_RANGES: &[FilterOption] = &[
    opt("18-24", "18–24"),
    opt("25-34", "25–34"),
    opt("35-44", "35–44"),
    opt("45-54", "45–54"),
    opt("55-64", "55–64"),
    opt("65+", "65+"),
];

const GENDERS: &[FilterOption] = &[
    opt("female", "Female"),
    opt("male", "Male"),
    opt("non-binary", "Non-binary"),
    opt("prefer-not-to-say", "Prefer not to say"),
];

const COUNTRIES: &[FilterOption] = &[
    opt("us", "United States"),
    opt("ca", "Canada"),
    opt("gb", "United Kingdom"),
    opt("de", "Germany"),
    opt("fr", "France"),
    opt("es", "Spain"),
    opt("in", "India"),
    opt("br", "Brazil"),
    opt("au", "Australia"),
];

const LANGUAGES: &[FilterOption] = &[
    opt("english", "English"),
    opt("spanish", "Spanish"),
    opt("french", "French"),
    opt("german", "German"),
    opt("portuguese", "Portuguese"),
    opt("hindi", "Hindi"),
];

const INCOME_BANDS: &[FilterOption] = &[
    opt("under-25k", "Under $25k"),
    opt("25k-50k", "$25k–$50k"),
    opt("50k-100k", "$50k–$100k"),
    opt("100k-150k", "$100k–$150k"),
    opt("150k+", "$150k+"),
];

criteria_fields! {
    /// Fields of the basic profile group.
    BasicField {
        AgeRange => ("age_range", "Age range", AGE_RANGES),
        Gender => ("gender", "Gender", GENDERS),
        Country => ("country", "Country", COUNTRIES),
        Language => ("language", "Language", LANGUAGES),
        HouseholdIncome => ("household_income", "Household income", INCOME_BANDS),
    }
}

// ── Devices ──────────────────────────────────────────────────────────

const OPERATING_SYSTEMS: &[FilterOption] = &[
    opt("windows", "Windows"),
    opt("macos", "macOS"),
    opt("linux", "Linux"),
    opt("ios", "iOS"),
    opt("android", "Android"),
];

const BROWSERS: &[FilterOption] = &[
    opt("chrome", "Chrome"),
    opt("safari", "Safari"),
    opt("firefox", "Firefox"),
    opt("edge", "Edge"),
    opt("other", "Other"),
];

const DAILY_HOURS: &[FilterOption] = &[
    opt("0-1", "Less than 1 hour"),
    opt("1-3", "1–3 hours"),
    opt("3-5", "3–5 hours"),
    opt("5+", "More than 5 hours"),
];

criteria_fields! {
    /// Device-usage fields. The flat list of owned devices lives in
    /// [`DEVICES`], outside this group.
    DeviceField {
        OperatingSystem => ("operating_system", "Operating system", OPERATING_SYSTEMS),
        Browser => ("browser", "Primary browser", BROWSERS),
        SmartphoneHours => ("smartphone_hours", "Daily smartphone use", DAILY_HOURS),
        ComputerHours => ("computer_hours", "Daily computer use", DAILY_HOURS),
    }
}

/// Devices a tester can own, selected as one flat set.
pub const DEVICES: &[FilterOption] = &[
    opt("smartphone", "Smartphone"),
    opt("tablet", "Tablet"),
    opt("laptop", "Laptop"),
    opt("desktop", "Desktop"),
    opt("smartwatch", "Smartwatch"),
    opt("smart-tv", "Smart TV"),
    opt("game-console", "Game console"),
    opt("vr-headset", "VR headset"),
];

pub fn is_known_device(value: &str) -> bool {
    DEVICES.iter().any(|o| o.value == value)
}

// ── Education & work ─────────────────────────────────────────────────

const EDUCATION_LEVELS: &[FilterOption] = &[
    opt("high-school", "High school"),
    opt("some-college", "Some college"),
    opt("bachelors", "Bachelor's degree"),
    opt("masters", "Master's degree"),
    opt("doctorate", "Doctorate"),
];

const EMPLOYMENT_STATUSES: &[FilterOption] = &[
    opt("full-time", "Full-time"),
    opt("part-time", "Part-time"),
    opt("self-employed", "Self-employed"),
    opt("student", "Student"),
    opt("unemployed", "Not employed"),
    opt("retired", "Retired"),
];

const INDUSTRIES: &[FilterOption] = &[
    opt("technology", "Technology"),
    opt("finance", "Finance"),
    opt("healthcare", "Healthcare"),
    opt("education", "Education"),
    opt("retail", "Retail"),
    opt("manufacturing", "Manufacturing"),
    opt("government", "Government"),
];

const JOB_ROLES: &[FilterOption] = &[
    opt("engineering", "Engineering"),
    opt("design", "Design"),
    opt("product", "Product management"),
    opt("marketing", "Marketing"),
    opt("sales", "Sales"),
    opt("operations", "Operations"),
    opt("executive", "Executive"),
];

const COMPANY_SIZES: &[FilterOption] = &[
    opt("1-10", "1–10 employees"),
    opt("11-50", "11–50 employees"),
    opt("51-200", "51–200 employees"),
    opt("201-1000", "201–1,000 employees"),
    opt("1000+", "1,000+ employees"),
];

criteria_fields! {
    WorkField {
        EducationLevel => ("education_level", "Education level", EDUCATION_LEVELS),
        EmploymentStatus => ("employment_status", "Employment status", EMPLOYMENT_STATUSES),
        Industry => ("industry", "Industry", INDUSTRIES),
        JobRole => ("job_role", "Job role", JOB_ROLES),
        CompanySize => ("company_size", "Company size", COMPANY_SIZES),
    }
}

// ── AI & tech fluency ────────────────────────────────────────────────

const AI_TOOLS: &[FilterOption] = &[
    opt("chatgpt", "ChatGPT"),
    opt("claude", "Claude"),
    opt("gemini", "Gemini"),
    opt("copilot", "Copilot"),
    opt("midjourney", "Midjourney"),
];

const AI_FREQUENCIES: &[FilterOption] = &[
    opt("never", "Never"),
    opt("monthly", "A few times a month"),
    opt("weekly", "Weekly"),
    opt("daily", "Daily"),
];

const TECH_LEVELS: &[FilterOption] = &[
    opt("beginner", "Beginner"),
    opt("intermediate", "Intermediate"),
    opt("advanced", "Advanced"),
    opt("expert", "Expert"),
];

const PROGRAMMING_LANGUAGES: &[FilterOption] = &[
    opt("javascript", "JavaScript"),
    opt("python", "Python"),
    opt("java", "Java"),
    opt("csharp", "C#"),
    opt("go", "Go"),
    opt("rust", "Rust"),
];

criteria_fields! {
    AiTechField {
        AiTools => ("ai_tools", "AI tools used", AI_TOOLS),
        AiFrequency => ("ai_frequency", "AI usage frequency", AI_FREQUENCIES),
        TechnicalLevel => ("technical_level", "Technical proficiency", TECH_LEVELS),
        ProgrammingLanguages => ("programming_languages", "Programming languages", PROGRAMMING_LANGUAGES),
    }
}

// ── Social & skills ──────────────────────────────────────────────────

const SOCIAL_NETWORKS: &[FilterOption] = &[
    opt("instagram", "Instagram"),
    opt("tiktok", "TikTok"),
    opt("linkedin", "LinkedIn"),
    opt("x", "X / Twitter"),
    opt("facebook", "Facebook"),
    opt("reddit", "Reddit"),
    opt("youtube", "YouTube"),
];

const SKILLS: &[FilterOption] = &[
    opt("writing", "Writing"),
    opt("video-editing", "Video editing"),
    opt("photography", "Photography"),
    opt("data-analysis", "Data analysis"),
    opt("public-speaking", "Public speaking"),
];

const INTERESTS: &[FilterOption] = &[
    opt("gaming", "Gaming"),
    opt("fitness", "Fitness"),
    opt("travel", "Travel"),
    opt("cooking", "Cooking"),
    opt("finance", "Personal finance"),
    opt("fashion", "Fashion"),
];

criteria_fields! {
    SocialField {
        SocialNetworks => ("social_networks", "Social networks", SOCIAL_NETWORKS),
        SocialHours => ("social_hours", "Daily social media use", DAILY_HOURS),
        Skills => ("skills", "Skills", SKILLS),
        Interests => ("interests", "Interests", INTERESTS),
    }
}
