use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

/// Required directories that will be created if missing
const REQUIRED_DIRS: &[&str] = &[
    "website",
    "website/db",
    "website/images",
    "website/images/ProfilePicture",
    "website/resources",
    "website/templates",
    "website/templates/pages",
];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories and aborts if the database
/// directory cannot be written.
pub fn run() {
    info!("Driftlog boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    for dir in REQUIRED_DIRS {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // Database directory writable
    let db_dir = Path::new("website/db");
    if db_dir.exists() {
        let test_file = db_dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Database directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // Page templates present
    let pages_dir = Path::new("website/templates/pages");
    let has_templates = fs::read_dir(pages_dir)
        .map(|entries| {
            entries.filter_map(|e| e.ok()).any(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "tera")
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false);
    if !has_templates {
        warn!("  No page templates found in website/templates/pages (pages will 500)");
        warnings += 1;
    }

    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found — using default config");
        warnings += 1;
    }

    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
