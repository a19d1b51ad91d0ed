use std::collections::HashSet;

use serde::Deserialize;
use snafu::{ResultExt, ensure};

use super::error::{CatalogInvalidSnafu, CatalogParseSnafu, WorkbenchResult};

/// Catalog shipped with the binary.
const BUILTIN_CATALOG_JSON: &str = include_str!("../assets/skills.json");
pub const SUPPORTED_CATALOG_VERSION: u32 = 1;

/// A single preset prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Skill {
    #[serde(rename = "skill")]
    pub id: String,
    pub description: String,
    pub prompt_message: String,
    pub input_draft: String,
}

impl Skill {
    /// "seo-audit" renders as "Seo Audit".
    pub fn display_name(&self) -> String {
        display_name(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillPack {
    pub name: String,
    pub icon: String,
    pub skills: Vec<Skill>,
}

impl SkillPack {
    pub fn skill(&self, skill_id: &str) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id == skill_id)
    }

    pub fn contains(&self, skill_id: &str) -> bool {
        self.skill(skill_id).is_some()
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

/// Immutable list of skill packs, loaded once and shared by every session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillCatalog {
    pub version: u32,
    packs: Vec<SkillPack>,
}

impl SkillCatalog {
    pub fn builtin() -> WorkbenchResult<Self> {
        Self::from_json(BUILTIN_CATALOG_JSON)
    }

    pub fn from_json(raw: &str) -> WorkbenchResult<Self> {
        let catalog: Self = serde_json::from_str(raw).context(CatalogParseSnafu {
            stage: "parse-skill-catalog",
        })?;
        catalog.validate()?;
        tracing::debug!(
            "loaded skill catalog v{} with {} packs",
            catalog.version,
            catalog.packs.len()
        );
        Ok(catalog)
    }

    pub fn packs(&self) -> &[SkillPack] {
        &self.packs
    }

    pub fn pack(&self, index: usize) -> Option<&SkillPack> {
        self.packs.get(index)
    }

    pub fn skill(&self, pack_index: usize, skill_id: &str) -> Option<&Skill> {
        self.pack(pack_index)?.skill(skill_id)
    }

    fn validate(&self) -> WorkbenchResult<()> {
        ensure!(
            self.version == SUPPORTED_CATALOG_VERSION,
            CatalogInvalidSnafu {
                stage: "validate-catalog-version",
                details: format!("unsupported catalog version {}", self.version),
            }
        );

        for pack in &self.packs {
            ensure!(
                !pack.skills.is_empty(),
                CatalogInvalidSnafu {
                    stage: "validate-pack-skills",
                    details: format!("pack '{}' has no skills", pack.name),
                }
            );

            let mut seen = HashSet::with_capacity(pack.skills.len());
            for skill in &pack.skills {
                ensure!(
                    is_kebab_case(&skill.id),
                    CatalogInvalidSnafu {
                        stage: "validate-skill-id",
                        details: format!("skill id '{}' is not kebab-case", skill.id),
                    }
                );
                ensure!(
                    seen.insert(skill.id.as_str()),
                    CatalogInvalidSnafu {
                        stage: "validate-skill-unique",
                        details: format!(
                            "skill id '{}' appears twice in pack '{}'",
                            skill.id, pack.name
                        ),
                    }
                );
            }
        }

        Ok(())
    }
}

pub fn display_name(skill_id: &str) -> String {
    skill_id
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_kebab_case(raw: &str) -> bool {
    !raw.is_empty()
        && !raw.starts_with('-')
        && !raw.ends_with('-')
        && !raw.contains("--")
        && raw
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkbenchError;

    #[test]
    fn builtin_catalog_loads_marketing_pack() {
        let catalog = SkillCatalog::builtin().expect("embedded catalog must be valid");
        let pack = catalog.pack(0).expect("first pack");

        assert_eq!(pack.name, "Marketing Skills");
        assert_eq!(pack.skills.len(), 25);
        assert!(pack.contains("seo-audit"));
        assert!(catalog.pack(1).is_none());
    }

    #[test]
    fn display_name_title_cases_each_word() {
        assert_eq!(display_name("seo-audit"), "Seo Audit");
        assert_eq!(display_name("paywall-upgrade-cro"), "Paywall Upgrade Cro");
    }

    #[test]
    fn duplicate_skill_ids_are_rejected() {
        let raw = r#"{
            "version": 1,
            "packs": [{
                "name": "Dup",
                "icon": "x",
                "skills": [
                    {"skill": "a", "description": "", "prompt_message": "", "input_draft": ""},
                    {"skill": "a", "description": "", "prompt_message": "", "input_draft": ""}
                ]
            }]
        }"#;

        let error = SkillCatalog::from_json(raw).expect_err("duplicates must fail");
        assert!(matches!(
            error,
            WorkbenchError::CatalogInvalid {
                stage: "validate-skill-unique",
                ..
            }
        ));
    }

    #[test]
    fn non_kebab_ids_and_bad_versions_are_rejected() {
        let bad_id = r#"{"version": 1, "packs": [{"name": "P", "icon": "x", "skills": [
            {"skill": "Not_Kebab", "description": "", "prompt_message": "", "input_draft": ""}
        ]}]}"#;
        assert!(SkillCatalog::from_json(bad_id).is_err());

        let bad_version = r#"{"version": 9, "packs": []}"#;
        assert!(SkillCatalog::from_json(bad_version).is_err());

        assert!(matches!(
            SkillCatalog::from_json("{"),
            Err(WorkbenchError::CatalogParse { .. })
        ));
    }
}
