//! Doctor - Dependency checking

use anyhow::Result;
use serde::Serialize;

use crate::backends::git::is_git_available;
use crate::core::render::{RenderConfig, Renderer, ToMarkdown};
use crate::core::tokenizer::{check_tiktoken_model, TokenModel};

/// Dependency status
#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub name: String,
    pub available: bool,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// All dependency checks
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub dependencies: Vec<DependencyStatus>,
}

impl DoctorReport {
    /// Whether every required dependency is present
    pub fn healthy(&self) -> bool {
        self.dependencies
            .iter()
            .all(|dep| dep.available || !dep.required)
    }
}

impl ToMarkdown for DoctorReport {
    fn to_markdown(&self) -> String {
        let mut output = String::from("## Dependencies\n\n");
        for dep in &self.dependencies {
            let status = if dep.available { "✓" } else { "✗" };
            let required = if dep.required { "required" } else { "optional" };
            output.push_str(&format!("- {} {} ({})\n", status, dep.name, required));
            if let Some(notes) = &dep.notes {
                output.push_str(&format!("  Note: {}\n", notes));
            }
        }
        output
    }
}

/// Check all dependencies
pub fn check_dependencies() -> DoctorReport {
    let mut dependencies = vec![DependencyStatus {
        name: "git".to_string(),
        available: is_git_available(),
        required: true,
        notes: Some("Needed to clone or validate remote repositories".to_string()),
    }];

    for model in [TokenModel::Cl100k, TokenModel::O200k] {
        let (available, error) = check_tiktoken_model(model);
        dependencies.push(DependencyStatus {
            name: format!("tiktoken {}", model),
            available,
            required: false,
            notes: error.or_else(|| Some("Used for token estimates".to_string())),
        });
    }

    DoctorReport { dependencies }
}

/// Run the doctor command
pub fn run_doctor(config: RenderConfig) -> Result<()> {
    let report = check_dependencies();

    let renderer = Renderer::with_config(config);
    renderer.render_to(&report, std::io::stdout().lock())?;

    if !report.healthy() {
        anyhow::bail!("required dependencies are missing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lists_git_first() {
        let report = check_dependencies();
        assert_eq!(report.dependencies[0].name, "git");
        assert!(report.dependencies[0].required);
        assert_eq!(report.dependencies.len(), 3);
    }

    #[test]
    fn test_healthy_ignores_optional() {
        let report = DoctorReport {
            dependencies: vec![
                DependencyStatus {
                    name: "git".to_string(),
                    available: true,
                    required: true,
                    notes: None,
                },
                DependencyStatus {
                    name: "extra".to_string(),
                    available: false,
                    required: false,
                    notes: None,
                },
            ],
        };
        assert!(report.healthy());
        assert!(report.to_markdown().contains("✗ extra (optional)"));
    }
}
