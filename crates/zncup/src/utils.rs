use colored::Colorize;
use std::io::Write;
use std::path::Path;

use crate::PLACEHOLDER_PROJECT_ID;

/// Region of a zone, obtained by stripping the final hyphen-delimited
/// segment (`us-west1-a` reserves in `us-west1`).
pub fn derive_region(zone: &str) -> Option<String> {
    match zone.rsplit_once('-') {
        Some((region, _)) if !region.is_empty() => Some(region.to_string()),
        _ => None,
    }
}

/// Reject the unset or placeholder project id before any remote call.
pub fn validate_project_id(project_id: &str) -> Result<(), String> {
    if project_id.is_empty() || project_id == PLACEHOLDER_PROJECT_ID {
        return Err(format!(
            "--project-id is required (got '{project_id}'); pass your real Google Cloud project ID"
        ));
    }
    Ok(())
}

/// Read the startup script, degrading to no script when the file is
/// missing or unreadable.
pub fn read_startup_script(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            println!(
                "  ✓ Read startup script from '{}'",
                path.display().to_string().cyan()
            );
            Some(content)
        }
        Err(e) => {
            println!(
                "{}",
                format!(
                    "  ⚠ Startup script '{}' not readable ({e}); proceeding without one",
                    path.display()
                )
                .yellow()
            );
            None
        }
    }
}

/// Interactive yes/no gate. Anything other than `y`/`yes` declines.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} (yes/no): ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let answer = input.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_strips_zone_suffix() {
        assert_eq!(derive_region("us-west1-a").as_deref(), Some("us-west1"));
        assert_eq!(
            derive_region("europe-west4-b").as_deref(),
            Some("europe-west4")
        );
    }

    #[test]
    fn region_underivable_from_bare_string() {
        assert_eq!(derive_region("uswest1a"), None);
        assert_eq!(derive_region("-a"), None);
        assert_eq!(derive_region(""), None);
    }

    #[test]
    fn placeholder_project_id_is_rejected() {
        assert!(validate_project_id("your-gcp-project-id-here").is_err());
        assert!(validate_project_id("").is_err());
        assert!(validate_project_id("my-project-123").is_ok());
    }

    #[test]
    fn missing_startup_script_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_startup_script(&dir.path().join("nope.sh")), None);
    }

    #[test]
    fn startup_script_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("startup-script.sh");
        std::fs::write(&path, "#!/bin/bash\necho hi\n").unwrap();
        assert_eq!(
            read_startup_script(&path).as_deref(),
            Some("#!/bin/bash\necho hi\n")
        );
    }
}
