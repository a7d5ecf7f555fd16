//! Output file naming and persistence.

use chrono::NaiveDateTime;
use ctb_prompt::Team;
use std::path::{Path, PathBuf};

/// Timestamp layout used as the filename prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Build `{timestamp}_{model}_{prompt}_{team}.png`.
///
/// Aliases are lower-cased with spaces replaced by underscores; other
/// characters (dots, dashes) are kept as they are.
pub fn output_filename(
    timestamp: &NaiveDateTime,
    model_alias: &str,
    prompt_alias: &str,
    team: Team,
) -> String {
    format!(
        "{}_{}_{}_{}.png",
        timestamp.format(TIMESTAMP_FORMAT),
        slug(model_alias),
        slug(prompt_alias),
        team.as_str()
    )
}

fn slug(alias: &str) -> String {
    alias.replace(' ', "_").to_lowercase()
}

/// Write image bytes into `dir` under `filename`.
pub fn save_image(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn new_year_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_output_filename() {
        let name = output_filename(&new_year_noon(), "FLUX.1-dev", "Castle Siege", Team::Red);
        assert_eq!(name, "20240101_120000_flux.1-dev_castle_siege_red.png");
    }

    #[test]
    fn test_output_filename_multi_word_aliases() {
        let name = output_filename(
            &new_year_noon(),
            "Stable Diffusion 3.5 turbo",
            "Burning Castle Battle",
            Team::Blue,
        );
        assert_eq!(
            name,
            "20240101_120000_stable_diffusion_3.5_turbo_burning_castle_battle_blue.png"
        );
    }

    #[test]
    fn test_save_image() {
        let dir = TempDir::new().unwrap();
        let path = save_image(dir.path(), "image.png", b"png-bytes").unwrap();

        assert_eq!(path, dir.path().join("image.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does/not/exist");
        assert!(save_image(&missing, "image.png", b"png-bytes").is_err());
    }
}
