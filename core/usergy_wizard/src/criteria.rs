//! # Recruiting criteria
//!
//! The targeting profile written to a project's `recruitingCriteria` field.
//!
//! The record is a value object: every save replaces it wholesale, so a
//! repeated save of the same content leaves the stored record unchanged.
//!
//! ```text
//! RecruitingCriteria
//!  ├─ user_count             u32 (> 0 once persisted)
//!  ├─ basic_profile          { BasicField  -> {value} }
//!  ├─ device_usage           { DeviceField -> {value} }
//!  ├─ education_work         { WorkField   -> {value} }
//!  ├─ ai_tech                { AiTechField -> {value} }
//!  ├─ social_skills          { SocialField -> {value} }
//!  └─ devices                {device}   (flat, independent of device_usage)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    self, AiTechField, BasicField, CriteriaField, DeviceField, SocialField, WorkField,
};
use crate::errors::ValidationError;
use crate::filter::FilterSelection;

/// Selections of one category, keyed by field name.
///
/// Empty selections are dropped, so "no filter" has a single representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryGroup<F: Ord> {
    fields: BTreeMap<F, FilterSelection>,
}

impl<F: Ord> Default for CategoryGroup<F> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
}

impl<F: CriteriaField> CategoryGroup<F> {
    pub fn get(&self, field: F) -> FilterSelection {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    /// Replace the selection of `field` as a whole.
    pub fn set(&mut self, field: F, selection: FilterSelection) {
        if selection.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, selection);
        }
    }

    pub fn toggle(&mut self, field: F, value: &str) {
        let next = self.get(field).toggled(value);
        self.set(field, next);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with at least one selected value.
    pub fn active_filters(&self) -> usize {
        self.fields.len()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, selection) in &self.fields {
            if let Some(value) = selection.unknown_values(field.options()).next() {
                return Err(ValidationError::UnknownOption {
                    field: field.key().to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Tabs of the recruiting step, one per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaTab {
    #[default]
    BasicProfile,
    Devices,
    EducationWork,
    AiTech,
    SocialSkills,
}

impl CriteriaTab {
    pub const ALL: [CriteriaTab; 5] = [
        CriteriaTab::BasicProfile,
        CriteriaTab::Devices,
        CriteriaTab::EducationWork,
        CriteriaTab::AiTech,
        CriteriaTab::SocialSkills,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CriteriaTab::BasicProfile => "Basic Profile",
            CriteriaTab::Devices => "Devices & Tech",
            CriteriaTab::EducationWork => "Education & Work",
            CriteriaTab::AiTech => "AI & Tech Fluency",
            CriteriaTab::SocialSkills => "Social & Skills",
        }
    }
}

impl fmt::Display for CriteriaTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single addressable field across every category group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    Basic(BasicField),
    Device(DeviceField),
    Work(WorkField),
    AiTech(AiTechField),
    Social(SocialField),
}

impl FieldRef {
    pub fn tab(self) -> CriteriaTab {
        match self {
            FieldRef::Basic(_) => CriteriaTab::BasicProfile,
            FieldRef::Device(_) => CriteriaTab::Devices,
            FieldRef::Work(_) => CriteriaTab::EducationWork,
            FieldRef::AiTech(_) => CriteriaTab::AiTech,
            FieldRef::Social(_) => CriteriaTab::SocialSkills,
        }
    }

    pub fn options(self) -> &'static [catalog::FilterOption] {
        match self {
            FieldRef::Basic(f) => f.options(),
            FieldRef::Device(f) => f.options(),
            FieldRef::Work(f) => f.options(),
            FieldRef::AiTech(f) => f.options(),
            FieldRef::Social(f) => f.options(),
        }
    }
}

/// Category groups plus the flat device set, without the user count.
///
/// This is the part of the draft the filter chips edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingProfile {
    #[serde(default)]
    pub basic_profile: CategoryGroup<BasicField>,
    #[serde(default)]
    pub device_usage: CategoryGroup<DeviceField>,
    #[serde(default)]
    pub education_work: CategoryGroup<WorkField>,
    #[serde(default)]
    pub ai_tech: CategoryGroup<AiTechField>,
    #[serde(default)]
    pub social_skills: CategoryGroup<SocialField>,
    #[serde(default)]
    pub devices: FilterSelection,
}

impl TargetingProfile {
    pub fn selection(&self, field: FieldRef) -> FilterSelection {
        match field {
            FieldRef::Basic(f) => self.basic_profile.get(f),
            FieldRef::Device(f) => self.device_usage.get(f),
            FieldRef::Work(f) => self.education_work.get(f),
            FieldRef::AiTech(f) => self.ai_tech.get(f),
            FieldRef::Social(f) => self.social_skills.get(f),
        }
    }

    pub fn set_selection(&mut self, field: FieldRef, selection: FilterSelection) {
        match field {
            FieldRef::Basic(f) => self.basic_profile.set(f, selection),
            FieldRef::Device(f) => self.device_usage.set(f, selection),
            FieldRef::Work(f) => self.education_work.set(f, selection),
            FieldRef::AiTech(f) => self.ai_tech.set(f, selection),
            FieldRef::Social(f) => self.social_skills.set(f, selection),
        }
    }

    pub fn toggle(&mut self, field: FieldRef, value: &str) {
        let next = self.selection(field).toggled(value);
        self.set_selection(field, next);
    }

    pub fn toggle_device(&mut self, device: &str) {
        self.devices = self.devices.toggled(device);
    }

    /// Total number of fields carrying a filter, the device set counting as one.
    pub fn active_filters(&self) -> usize {
        self.basic_profile.active_filters()
            + self.device_usage.active_filters()
            + self.education_work.active_filters()
            + self.ai_tech.active_filters()
            + self.social_skills.active_filters()
            + usize::from(!self.devices.is_empty())
    }

    /// Every selected value must exist in its field's catalog.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.basic_profile.validate()?;
        self.device_usage.validate()?;
        self.education_work.validate()?;
        self.ai_tech.validate()?;
        self.social_skills.validate()?;
        if let Some(device) = self.devices.unknown_values(catalog::DEVICES).next() {
            return Err(ValidationError::UnknownDevice(device.to_string()));
        }
        Ok(())
    }
}

/// The persisted targeting profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruitingCriteria {
    pub user_count: u32,
    #[serde(flatten)]
    pub profile: TargetingProfile,
}

impl RecruitingCriteria {
    /// Build a persistable record from the raw user-count input.
    ///
    /// Rejects anything that is not a whole number above zero, and any
    /// option value missing from the catalog.
    pub fn from_input(user_count: &str, profile: TargetingProfile) -> Result<Self, ValidationError> {
        let user_count = parse_user_count(user_count).ok_or(ValidationError::InvalidUserCount)?;
        let criteria = Self {
            user_count,
            profile,
        };
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_count == 0 {
            return Err(ValidationError::InvalidUserCount);
        }
        self.profile.validate()
    }
}

/// Strict parse of the tester-count field: a whole number greater than zero.
pub fn parse_user_count(input: &str) -> Option<u32> {
    match input.trim().parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> TargetingProfile {
        let mut p = TargetingProfile::default();
        p.toggle(FieldRef::Basic(BasicField::Country), "us");
        p.toggle(FieldRef::Basic(BasicField::Country), "de");
        p.toggle(FieldRef::AiTech(AiTechField::AiTools), "chatgpt");
        p.toggle_device("laptop");
        p
    }

    #[test]
    fn parse_user_count_accepts_positive_integers_only() {
        assert_eq!(parse_user_count("50"), Some(50));
        assert_eq!(parse_user_count(" 7 "), Some(7));
        assert_eq!(parse_user_count("0"), None);
        assert_eq!(parse_user_count("-3"), None);
        assert_eq!(parse_user_count("abc"), None);
        assert_eq!(parse_user_count(""), None);
        assert_eq!(parse_user_count("12.5"), None);
    }

    #[test]
    fn from_input_rejects_bad_counts() {
        let err = RecruitingCriteria::from_input("0", TargetingProfile::default()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidUserCount);
        let err = RecruitingCriteria::from_input("lots", TargetingProfile::default()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidUserCount);
    }

    #[test]
    fn from_input_accepts_empty_profile() {
        let c = RecruitingCriteria::from_input("50", TargetingProfile::default()).unwrap();
        assert_eq!(c.user_count, 50);
        assert_eq!(c.profile.active_filters(), 0);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut p = TargetingProfile::default();
        p.toggle(FieldRef::Work(WorkField::Industry), "piracy");
        let err = RecruitingCriteria::from_input("5", p).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownOption {
                field: "industry".into(),
                value: "piracy".into()
            }
        );
    }

    #[test]
    fn unknown_device_is_rejected() {
        let mut p = TargetingProfile::default();
        p.toggle_device("pager");
        assert_eq!(
            RecruitingCriteria::from_input("5", p).unwrap_err(),
            ValidationError::UnknownDevice("pager".into())
        );
    }

    #[test]
    fn toggling_off_the_last_value_clears_the_field() {
        let mut p = TargetingProfile::default();
        let field = FieldRef::Social(SocialField::Skills);
        p.toggle(field, "writing");
        assert_eq!(p.active_filters(), 1);
        p.toggle(field, "writing");
        assert_eq!(p.active_filters(), 0);
        assert!(p.social_skills.is_empty());
    }

    #[test]
    fn device_set_is_independent_of_device_usage() {
        let mut p = TargetingProfile::default();
        p.toggle_device("tablet");
        assert!(p.device_usage.is_empty());
        p.toggle(FieldRef::Device(DeviceField::OperatingSystem), "ios");
        assert_eq!(p.devices.len(), 1);
        assert_eq!(p.active_filters(), 2);
    }

    #[test]
    fn serialized_shape_is_one_nested_object() {
        let c = RecruitingCriteria::from_input("50", sample_profile()).unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["userCount"], 50);
        assert_eq!(json["basicProfile"]["country"], serde_json::json!(["de", "us"]));
        assert_eq!(json["aiTech"]["ai_tools"], serde_json::json!(["chatgpt"]));
        assert_eq!(json["devices"], serde_json::json!(["laptop"]));
        assert_eq!(json["socialSkills"], serde_json::json!({}));

        let back: RecruitingCriteria = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn unknown_field_name_fails_to_deserialize() {
        let json = serde_json::json!({
            "userCount": 3,
            "basicProfile": { "shoe_size": ["42"] }
        });
        assert!(serde_json::from_value::<RecruitingCriteria>(json).is_err());
    }

    #[test]
    fn field_ref_maps_to_its_tab() {
        assert_eq!(FieldRef::Device(DeviceField::Browser).tab(), CriteriaTab::Devices);
        assert_eq!(FieldRef::Work(WorkField::JobRole).tab(), CriteriaTab::EducationWork);
        assert!(!FieldRef::Basic(BasicField::Gender).options().is_empty());
    }
}
