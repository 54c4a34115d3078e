use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use drakon_cli::{Args, run};

/// Collects all .drakon files from a directory
fn collect_drakon_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("drakon")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn demos_dir() -> PathBuf {
    // Demos live at the workspace root, not in the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Writes a config that measures text at a fixed width, so results do not
/// depend on installed fonts.
fn write_fixed_config(dir: &Path) -> String {
    let path = dir.join("config.toml");
    fs::write(&path, "[text]\nmeasure = \"fixed\"\nfixed_char_width = 8.0\n")
        .expect("Failed to write config");
    path.to_string_lossy().to_string()
}

fn args_for(input: &Path, output: &Path, config: &str, lenient: bool) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: Some(config.to_string()),
        log_level: "off".to_string(),
        lenient,
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_fixed_config(temp_dir.path());

    let valid_demos = collect_drakon_files(demos_dir());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!(
            "{}.toml",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        match run(&args_for(demo_path, &output_path, &config, false)) {
            Ok(()) => {
                let report = fs::read_to_string(&output_path).expect("Failed to read report");
                let table: toml::Table = report.parse().expect("Report is not valid TOML");
                assert!(
                    table["nodes"].as_array().is_some_and(|nodes| !nodes.is_empty()),
                    "{} produced no nodes",
                    demo_path.display()
                );
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_fixed_config(temp_dir.path());

    let error_demos = collect_drakon_files(demos_dir().join("errors"));
    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.toml",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if run(&args_for(demo_path, &output_path, &config, false)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_lenient_mode_writes_degraded_report() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_fixed_config(temp_dir.path());
    let input = demos_dir().join("errors").join("duplicate_id.drakon");
    let output = temp_dir.path().join("lenient.toml");

    run(&args_for(&input, &output, &config, true)).expect("Lenient run should succeed");

    let report = fs::read_to_string(&output).expect("Failed to read report");
    assert!(report.contains("title = \"dup\""));
}

#[test]
fn e2e_lenient_mode_without_root_writes_placeholder() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_fixed_config(temp_dir.path());
    let input = demos_dir().join("errors").join("missing_root.drakon");
    let output = temp_dir.path().join("placeholder.toml");

    assert!(run(&args_for(&input, &output, &config, true)).is_err());

    let report = fs::read_to_string(&output).expect("Failed to read report");
    assert!(report.contains("Fix syntax errors in the HCL diagram to see a preview."));
}

#[test]
fn e2e_missing_config_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_dir().join("checkout.drakon");
    let output = temp_dir.path().join("out.toml");
    let missing = temp_dir.path().join("absent.toml");

    let result = run(&args_for(&input, &output, &missing.to_string_lossy(), false));
    assert!(result.is_err());
    assert!(!output.exists());
}
