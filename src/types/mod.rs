pub mod cv_data;
pub mod response;

pub use cv_data::{
    CvForm, CvRecord, EducationEntry, EducationInput, ExperienceEntry, ExperienceInput, FieldPath,
    Header, SkillCategories, SkillCategory,
};
pub use response::{RefineVersion, TweakOutcome, TweakResult};
