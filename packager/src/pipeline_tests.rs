//! Unit tests for pipeline orchestration.
//!
//! These tests run the full pipeline against an in-memory release source and
//! a stub `dpkg-deb`, inside a temporary package root.

use super::*;
use crate::github::MockReleaseSource;
use crate::test_utils::{FakeReleaseSource, StubExecutor, asset, failure_output};
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

const JAR_BYTES: &[u8] = b"\x50\x4b\x03\x04vineflower";

struct PackageTree {
    _temp: TempDir,
    config: PipelineConfig,
}

impl PackageTree {
    fn control_text(&self) -> String {
        fs::read_to_string(self.config.control_path()).expect("read control")
    }
}

#[fixture]
fn tree() -> PackageTree {
    let temp = tempfile::tempdir().expect("temp dir");
    let base = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
    let config = PipelineConfig {
        package_root: base.join("src"),
        output_dir: base.join("out"),
        quiet: false,
    };
    fs::create_dir_all(config.package_root.join("DEBIAN")).expect("DEBIAN dir");
    fs::write(
        config.control_path(),
        "Package: vineflower\nVersion: 1.0.0\nArchitecture: all\n",
    )
    .expect("seed control");
    PackageTree {
        _temp: temp,
        config,
    }
}

fn single_release_source() -> FakeReleaseSource {
    let jar = asset("tool-2.5.0.jar");
    let url = jar.download_url.clone();
    FakeReleaseSource::new()
        .with_release(42, "2.5.0", vec![asset("checksums.txt"), jar])
        .with_artifact(&url, JAR_BYTES)
}

#[rstest]
fn end_to_end_stages_patches_and_builds(tree: PackageTree) {
    let source = single_release_source();
    let executor = StubExecutor::accepting();
    let mut stderr = Vec::new();

    let outcome = run_pipeline(&tree.config, &source, &executor, &mut stderr).expect("pipeline");

    let staging = tree.config.staging_dir();
    assert_eq!(outcome.release.id, 42);
    assert_eq!(outcome.staged.artifact_path, staging.join("tool-2.5.0.jar"));
    assert_eq!(outcome.staged.link_path, staging.join("vineflower.jar"));
    assert_eq!(fs::read(staging.join("tool-2.5.0.jar")).expect("artifact"), JAR_BYTES);
    assert_eq!(tree.control_text(), "Package: vineflower\nVersion: 2.5.0\nArchitecture: all\n");
    assert_eq!(outcome.control_patch.replacements, 1);

    let expected_package = tree.config.output_dir.join("vineflower-2.5.0.deb");
    assert_eq!(outcome.package_path, expected_package);
    assert_eq!(
        executor.invocations(),
        vec![vec![
            "dpkg-deb".to_owned(),
            "--build".to_owned(),
            tree.config.package_root.to_string(),
            expected_package.to_string(),
        ]]
    );
}

#[cfg(unix)]
#[rstest]
fn stable_link_points_at_new_artifact(tree: PackageTree) {
    let source = single_release_source();
    let executor = StubExecutor::accepting();

    run_pipeline(&tree.config, &source, &executor, &mut Vec::new()).expect("pipeline");

    let link = tree.config.staging_dir().join("vineflower.jar");
    assert_eq!(
        fs::read_link(&link).expect("read link"),
        std::path::Path::new("tool-2.5.0.jar")
    );
    assert_eq!(fs::read(&link).expect("follow link"), JAR_BYTES);
}

#[rstest]
fn progress_mirrors_each_stage(tree: PackageTree) {
    let source = single_release_source();
    let executor = StubExecutor::accepting();
    let mut stderr = Vec::new();

    run_pipeline(&tree.config, &source, &executor, &mut stderr).expect("pipeline");

    let output = String::from_utf8(stderr).expect("UTF-8 progress");
    let expected = [
        "Found latest Vineflower version: v2.5.0 (42)",
        "Found JAR asset: tool-2.5.0.jar",
        "Downloading JAR...",
        "Written JAR bytes to file.",
        "Created symlink to ",
        "Updated control file.",
        "Building package...",
        "Package built!",
    ];
    let mut rest = output.as_str();
    for line in expected {
        let at = rest.find(line).unwrap_or_else(|| panic!("missing {line:?} in {output}"));
        rest = rest.split_at(at + line.len()).1;
    }
}

#[rstest]
fn quiet_mode_suppresses_progress(mut tree: PackageTree) {
    tree.config.quiet = true;
    let source = single_release_source();
    let executor = StubExecutor::accepting();
    let mut stderr = Vec::new();

    run_pipeline(&tree.config, &source, &executor, &mut stderr).expect("pipeline");

    assert!(stderr.is_empty(), "expected no output in quiet mode");
}

#[rstest]
fn second_run_replaces_previous_artifacts(tree: PackageTree) {
    let executor = StubExecutor::accepting();
    run_pipeline(&tree.config, &single_release_source(), &executor, &mut Vec::new())
        .expect("first run");

    let jar = asset("tool-2.6.0.jar");
    let url = jar.download_url.clone();
    let newer = FakeReleaseSource::new()
        .with_release(43, "2.6.0", vec![jar])
        .with_artifact(&url, b"newer");
    let mut stderr = Vec::new();
    let outcome =
        run_pipeline(&tree.config, &newer, &executor, &mut stderr).expect("second run");

    let staging = tree.config.staging_dir();
    assert_eq!(
        outcome.removed,
        vec![staging.join("tool-2.5.0.jar"), staging.join("vineflower.jar")]
    );
    assert!(!staging.join("tool-2.5.0.jar").exists());
    assert_eq!(fs::read(staging.join("vineflower.jar")).expect("link"), b"newer");
    assert!(String::from_utf8_lossy(&stderr).contains("Cleaning old jar: "));
    assert!(tree.control_text().contains("Version: 2.6.0\n"));
}

#[rstest]
fn stale_jars_are_announced_during_cleaning(tree: PackageTree) {
    let staging = tree.config.staging_dir();
    fs::create_dir_all(&staging).expect("staging dir");
    fs::write(staging.join("tool-1.0.0.jar"), b"old").expect("seed stale jar");
    let source = FakeReleaseSource::new().with_release(42, "2.5.0", vec![asset("notes.md")]);
    let mut stderr = Vec::new();

    run_pipeline(&tree.config, &source, &StubExecutor::accepting(), &mut stderr)
        .expect_err("no jar asset");

    let output = String::from_utf8(stderr).expect("UTF-8 progress");
    let cleaning = output
        .find(&format!("Cleaning old jar: {}", staging.join("tool-1.0.0.jar")))
        .expect("stale jar reported");
    let resolved = output.find("Found latest").expect("release reported");
    assert!(cleaning < resolved);
}

#[rstest]
fn missing_jar_asset_fails_before_download(tree: PackageTree) {
    let source = FakeReleaseSource::new().with_release(42, "2.5.0", vec![asset("notes.md")]);
    let executor = StubExecutor::accepting();

    let err = run_pipeline(&tree.config, &source, &executor, &mut Vec::new())
        .expect_err("no jar asset");

    assert!(matches!(err, PackagerError::NoJarAsset { tag } if tag == "2.5.0"));
    assert!(source.downloads().is_empty());
    assert!(executor.invocations().is_empty());
    assert!(tree.control_text().contains("Version: 1.0.0"));
}

#[rstest]
fn invalid_tag_aborts_the_run(tree: PackageTree) {
    let source = FakeReleaseSource::new()
        .with_release(1, "1.0.0", vec![asset("a.jar")])
        .with_release(2, "nightly", vec![asset("b.jar")]);
    let executor = StubExecutor::accepting();

    let err = run_pipeline(&tree.config, &source, &executor, &mut Vec::new())
        .expect_err("invalid tag");

    assert!(matches!(err, PackagerError::InvalidTag { tag, .. } if tag == "nightly"));
    assert!(executor.invocations().is_empty());
}

#[rstest]
fn failed_build_is_reported(tree: PackageTree) {
    let source = single_release_source();
    let executor =
        StubExecutor::answering("dpkg-deb", Ok(failure_output("dpkg-deb: error: bad control\n")));
    let mut stderr = Vec::new();

    let err = run_pipeline(&tree.config, &source, &executor, &mut stderr).expect_err("build fails");

    assert!(matches!(
        &err,
        PackagerError::PackageBuildFailed { stderr, .. } if stderr == "dpkg-deb: error: bad control"
    ));
    executor.assert_finished();
    assert!(!String::from_utf8_lossy(&stderr).contains("Package built!"));
    assert!(tree.control_text().contains("Version: 2.5.0"));
}

#[rstest]
fn control_without_version_line_is_left_alone(tree: PackageTree) {
    fs::write(tree.config.control_path(), "Package: vineflower\n").expect("rewrite control");
    let source = single_release_source();
    let executor = StubExecutor::accepting();

    let outcome =
        run_pipeline(&tree.config, &source, &executor, &mut Vec::new()).expect("pipeline");

    assert_eq!(outcome.control_patch.replacements, 0);
    assert_eq!(tree.control_text(), "Package: vineflower\n");
    assert_eq!(executor.invocations().len(), 1);
}

#[rstest]
fn missing_control_file_fails_after_staging(tree: PackageTree) {
    fs::remove_file(tree.config.control_path()).expect("remove control");
    let source = single_release_source();
    let executor = StubExecutor::accepting();

    let err = run_pipeline(&tree.config, &source, &executor, &mut Vec::new())
        .expect_err("missing control");

    assert!(matches!(err, PackagerError::ControlFile { .. }));
    assert!(tree.config.staging_dir().join("tool-2.5.0.jar").exists());
    assert!(executor.invocations().is_empty());
}

#[test]
fn plan_release_resolves_without_downloading() {
    let mut source = MockReleaseSource::new();
    source.expect_list_releases().returning(|| {
        Ok(vec![
            crate::release::ReleaseRecord {
                id: 7,
                tag_name: "1.9.3".to_owned(),
            },
            crate::release::ReleaseRecord {
                id: 9,
                tag_name: "1.10.1".to_owned(),
            },
        ])
    });
    source
        .expect_list_assets()
        .withf(|id| *id == 9)
        .returning(|_| Ok(vec![asset("vineflower-1.10.1.jar")]));
    source.expect_download().never();

    let (release, jar) = plan_release(&source).expect("plan");

    assert_eq!(release.raw_tag, "1.10.1");
    assert_eq!(jar.map(|a| a.name), Some("vineflower-1.10.1.jar".to_owned()));
}

#[test]
fn config_derives_package_paths() {
    let config = PipelineConfig {
        package_root: Utf8PathBuf::from("src"),
        output_dir: Utf8PathBuf::from("."),
        quiet: false,
    };
    assert_eq!(config.staging_dir(), Utf8PathBuf::from("src/usr/share/vineflower"));
    assert_eq!(config.control_path(), Utf8PathBuf::from("src/DEBIAN/control"));
    assert_eq!(config.package_path("1.10.1"), Utf8PathBuf::from("./vineflower-1.10.1.deb"));
}
