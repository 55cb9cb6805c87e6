use pretty_assertions::assert_eq;
use reports_manifest::dates::at_noon_utc;
use reports_manifest::output::write_json;
use reports_manifest::{build_manifest, loader, BuildConfig, Manifest, ManifestError};
use tempfile::TempDir;

fn site_with_reports(files: &[&str]) -> (TempDir, BuildConfig) {
    let temp = TempDir::new().expect("tempdir");
    let public = temp.path().join("public");
    for rel in files {
        let path = public.join("reports").join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, b"%PDF-1.7\n").expect("write pdf");
    }
    std::fs::create_dir_all(public.join("reports")).expect("reports dir");
    let config = BuildConfig::for_public_dir(&public);
    (temp, config)
}

fn hrefs(manifest: &Manifest) -> Vec<&str> {
    manifest.items.iter().map(|i| i.href.as_str()).collect()
}

#[test]
fn builds_ranked_manifest_from_tree() {
    let (_temp, config) = site_with_reports(&[
        "2025/BlueNord_Q2_2025_Results.pdf",
        "2025/BlueNord_Q1_2025_Results.pdf",
        "2024/Annual_Report_2024.pdf",
        "2024/notes.txt",
    ]);

    let manifest = build_manifest(&config).expect("build");
    assert_eq!(manifest.count, 3);
    assert_eq!(
        hrefs(&manifest),
        vec![
            "/reports/2025/BlueNord_Q2_2025_Results.pdf",
            "/reports/2025/BlueNord_Q1_2025_Results.pdf",
            "/reports/2024/Annual_Report_2024.pdf",
        ]
    );

    let q2 = &manifest.items[0];
    assert_eq!(q2.title, "BlueNord Q2 2025 Results");
    assert_eq!(q2.folder_year, Some(2025));
    assert_eq!(q2.inferred_iso, at_noon_utc(2025, 6, 30));
    assert_eq!(q2.size_bytes, 9);
}

#[test]
fn overrides_file_is_applied_in_order() {
    let (_temp, config) = site_with_reports(&[
        "2025/BlueNord_Q2_2025_Results.pdf",
        "2023/Capital_Markets_Day.pdf",
        "2020/Annual_Report_2020.pdf",
    ]);
    std::fs::write(
        &config.overrides_path,
        r#"{"overrides": [
            {"contains": "capital_markets", "date": "2023-09", "pin": 1},
            {"contains": "capital", "featured": true},
            {"file": "Annual_Report_2020.pdf", "featured": true, "date": "not a date"}
        ]}"#,
    )
    .expect("write overrides");

    let manifest = build_manifest(&config).expect("build");
    assert_eq!(
        hrefs(&manifest),
        vec![
            "/reports/2020/Annual_Report_2020.pdf",
            "/reports/2023/Capital_Markets_Day.pdf",
            "/reports/2025/BlueNord_Q2_2025_Results.pdf",
        ]
    );

    let annual = &manifest.items[0];
    assert!(annual.featured);
    assert_eq!(Some(annual.display_iso), at_noon_utc(2020, 12, 31));

    let cmd = &manifest.items[1];
    assert!(!cmd.featured, "second contains rule must not apply");
    assert_eq!(cmd.pin, Some(1));
    assert_eq!(Some(cmd.display_iso), at_noon_utc(2023, 9, 30));
    assert_eq!(cmd.content_year, 2023);
}

#[test]
fn latin1_overrides_file_does_not_block_build() {
    let (_temp, config) = site_with_reports(&["2025/BlueNord_Q2_2025_Results.pdf"]);
    std::fs::write(
        &config.overrides_path,
        b"{\"overrides\":[{\"contains\":\"caf\xe9\"}]}",
    )
    .expect("write overrides");

    let manifest = build_manifest(&config).expect("build");
    assert_eq!(manifest.count, 1);
    assert!(!manifest.items[0].featured);
}

#[test]
fn rebuilding_unchanged_tree_is_identical() {
    let (_temp, config) = site_with_reports(&[
        "2025/Q3_2025_Presentation.pdf",
        "2024/H2_2024_Report.pdf",
        "governance/Articles_of_Association.pdf",
    ]);

    let first = build_manifest(&config).expect("first build");
    write_json(&config.out_path, &first).expect("write");
    let first_bytes = std::fs::read(&config.out_path).expect("read");

    let second = build_manifest(&config).expect("second build");
    write_json(&config.out_path, &second).expect("rewrite");
    let second_bytes = std::fs::read(&config.out_path).expect("read");

    assert_eq!(first.items, second.items);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn written_manifest_round_trips_for_listing() {
    let (_temp, config) = site_with_reports(&["2025/BlueNord_Q2_2025_Results.pdf"]);
    let built = build_manifest(&config).expect("build");
    write_json(&config.out_path, &built).expect("write");

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.out_path).expect("read"))
            .expect("json");
    assert_eq!(raw["count"], 1);
    assert_eq!(raw["items"][0]["displayISO"], "2025-06-30T12:00:00.000Z");
    assert_eq!(raw["items"][0]["folderYear"], 2025);
    assert_eq!(raw["items"][0]["pin"], serde_json::Value::Null);

    let loaded = loader::load_manifest(&config.out_path).expect("load");
    assert_eq!(loaded, built);
}

#[test]
fn missing_reports_folder_fails() {
    let temp = TempDir::new().expect("tempdir");
    let config = BuildConfig::for_public_dir(temp.path().join("public"));
    let err = build_manifest(&config).expect_err("no reports folder");
    assert!(matches!(err, ManifestError::MissingReportsDir(_)));
}
