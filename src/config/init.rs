use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::ensure_parent_dir;

/// Starter evaluation written by `carescore init`: three candidate sites
/// for a new center, scored on proximity and Tennessee-specific factors.
pub const STARTER_EVALUATION: &str = r#"# carescore evaluation
#
# Ratings are integers 1-10; an unset rating counts as 5.
name: Center location shortlist

scoring:
  scale: 100          # 10 or 100
  threshold: 5        # ratings below this are listed as weak
  max_weak: 5
  mode:
    category:
      # Relative weights, they do not need to sum to 1
      weights:
        proximity: 0.5
        tennessee: 0.3
        site: 0.2
  # Formula mode instead sums weighted 0-10 terms and divides:
  #
  # mode:
  #   formula:
  #     divisor: 5
  #     weights: { cost: 10, timeline: 5 }
  #     terms:
  #       - weight: cost
  #         source: { inverse_attribute: { attribute: cost, max: 5000 } }
  #       - weight: timeline
  #         source: { inverse_attribute: { attribute: months, max: 36 } }

categories:
  - name: proximity
    factors: [residential_density, employers, schools]
  - name: tennessee
    factors: [county_demand, subsidy_participation, licensing_support]
  - name: site
    factors: [parking, outdoor_space, visibility]

candidates:
  - id: midtown
    label: Midtown storefront
    ratings:
      residential_density: 8
      employers: 9
      schools: 7
      county_demand: 7
      subsidy_participation: 6
      licensing_support: 7
      parking: 3
      outdoor_space: 4
      visibility: 9
  - id: suburb
    label: Suburban church annex
    ratings:
      residential_density: 7
      employers: 4
      schools: 8
      county_demand: 6
      subsidy_participation: 5
      licensing_support: 7
      parking: 9
      outdoor_space: 9
      visibility: 5
  - id: rural
    label: Rural county site
    ratings:
      residential_density: 3
      employers: 2
      schools: 5
      county_demand: 9
      subsidy_participation: 8
      licensing_support: 6
      parking: 10
      outdoor_space: 10
      visibility: 4
"#;

/// Write the starter evaluation to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_starter(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it",
            path.display()
        );
    }

    ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(STARTER_EVALUATION.as_bytes())
        .context("Failed to write starter evaluation")?;
    file.commit().context("Failed to save starter evaluation")?;

    tracing::info!(path = %path.display(), "wrote starter evaluation");
    Ok(())
}
