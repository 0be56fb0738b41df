use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use pathmap::{GlobSpec, MapError, MatchMode, PathMapper, PathPair};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

const FILE_FIXTURE: [&str; 4] = ["a/b/crane.txt", "coco.txt", "beryl.rb", "johannesburg"];

/// Create the standard file fixture.
///
/// Structure:
/// ```text
/// incoming/
///   a/b/crane.txt
///   coco.txt
///   beryl.rb
///   johannesburg
/// ```
fn setup_files() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("incoming");
    let output = tmp.path().join("outgoing");
    for rel in FILE_FIXTURE {
        let path = input.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
    }
    (tmp, input, output)
}

/// Create the directory-granularity fixture.
///
/// Structure:
/// ```text
/// incoming/
///   bread/lettuce/
///   pancake/
///   muffin            (file)
///   waffle/
///   waffle/syrup      (file)
/// ```
fn setup_dirs() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("incoming");
    let output = tmp.path().join("outgoing");
    fs::create_dir_all(input.join("bread/lettuce")).unwrap();
    fs::create_dir_all(input.join("pancake")).unwrap();
    fs::create_dir_all(input.join("waffle")).unwrap();
    fs::write(input.join("muffin"), "").unwrap();
    fs::write(input.join("waffle/syrup"), "").unwrap();
    (tmp, input, output)
}

fn input_names(mapper: &PathMapper) -> HashSet<String> {
    mapper
        .iter_input()
        .map(|item| {
            item.unwrap()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

fn names(items: impl IntoIterator<Item = &'static str>) -> HashSet<String> {
    items.into_iter().map(str::to_string).collect()
}

// ---------------------------------------------------------------------------
// File granularity
// ---------------------------------------------------------------------------

#[test]
fn file_mapper_visits_every_regular_file_exactly_once() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output).build().unwrap();

    let expected_inputs: HashSet<PathBuf> = FILE_FIXTURE.iter().map(|f| input.join(f)).collect();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut outputs: HashSet<PathBuf> = HashSet::new();

    for pair in &mapper {
        let PathPair { input: i, output: o } = pair.unwrap();
        assert!(visited.insert(i.clone()), "{} visited twice", i.display());
        assert!(
            expected_inputs.contains(&i),
            "{} is not a fixture file",
            i.display()
        );
        assert!(
            o.parent().unwrap().exists(),
            "output parent must exist when the pair is handed over"
        );
        assert!(!o.exists(), "mapper must not create the output itself");
        outputs.insert(o);
    }

    assert_eq!(visited, expected_inputs, "directories must not be yielded");
    let expected_outputs: HashSet<PathBuf> = FILE_FIXTURE.iter().map(|f| output.join(f)).collect();
    assert_eq!(outputs, expected_outputs);
}

#[test]
fn single_glob_narrows_the_match() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output)
        .glob("**/*.txt")
        .build()
        .unwrap();

    assert_eq!(input_names(&mapper), names(["crane.txt", "coco.txt"]));
}

#[test]
fn multiple_globs_merge_in_order() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output)
        .globs(&["**/*.txt", "**/*.rb"])
        .build()
        .unwrap();

    assert_eq!(
        input_names(&mapper),
        names(["crane.txt", "coco.txt", "beryl.rb"])
    );
}

#[test]
fn overlapping_globs_are_deduplicated() {
    let (_tmp, input, output) = setup_files();
    // Every .txt file is matched by both patterns.
    let mapper = PathMapper::file_mapper(&input, &output)
        .globs(&["**/*.txt", "**/*"])
        .build()
        .unwrap();

    let mut seen: HashSet<PathBuf> = HashSet::new();
    for item in mapper.iter_input() {
        let path = item.unwrap();
        assert!(seen.insert(path.clone()), "{} yielded twice", path.display());
    }
    let expected: HashSet<PathBuf> = FILE_FIXTURE.iter().map(|f| input.join(f)).collect();
    assert_eq!(seen, expected, "union of both patterns, no duplicates");
}

#[test]
fn iteration_is_restartable_and_deterministic() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output).build().unwrap();

    let first: Vec<PathPair> = mapper.pairs().map(Result::unwrap).collect();
    let second: Vec<PathPair> = mapper.pairs().map(Result::unwrap).collect();
    assert_eq!(first, second, "same mapper, same sequence, same order");
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

#[test]
fn count_agrees_with_iteration_in_either_order() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output).build().unwrap();

    // count first, then iterate
    let counted = mapper.count().unwrap();
    let iterated = mapper.pairs().count();
    assert_eq!(counted, iterated);

    // iterate first, then count
    let iterated = mapper.pairs().count();
    let counted = mapper.count().unwrap();
    assert_eq!(counted, iterated);
    assert_eq!(counted, FILE_FIXTURE.len());
}

#[test]
fn count_creates_no_directories() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output).build().unwrap();

    mapper.count().unwrap();
    assert!(
        !output.exists(),
        "counting must not materialize output paths"
    );
}

// ---------------------------------------------------------------------------
// Parent creation
// ---------------------------------------------------------------------------

#[test]
fn parents_false_never_creates_directories() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output)
        .parents(false)
        .build()
        .unwrap();

    for pair in &mapper {
        let PathPair { input: i, output: o } = pair.unwrap();
        if i.file_name().unwrap() == "crane.txt" {
            assert!(
                !o.parent().unwrap().exists(),
                "parents(false) must not create output parents"
            );
        }
    }
    assert!(!output.exists());
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

#[test]
fn stem_suffix_renames_outputs() {
    let (_tmp, input, output) = setup_files();
    fs::write(input.join("brain.nii"), "").unwrap();

    let mapper = PathMapper::file_mapper(&input, &output)
        .glob("**/*.nii")
        .stem_suffix("_segmentation")
        .build()
        .unwrap();

    let pairs: Vec<PathPair> = mapper.pairs().map(Result::unwrap).collect();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].output, output.join("brain_segmentation.nii"));
}

#[test]
fn suffix_replaces_extension_in_outputs() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output)
        .glob("**/*.txt")
        .suffix(".fruity")
        .build()
        .unwrap();

    let outputs: HashSet<PathBuf> = mapper
        .pairs()
        .map(|pair| pair.unwrap().output)
        .collect();
    let expected: HashSet<PathBuf> =
        [output.join("a/b/crane.fruity"), output.join("coco.fruity")]
            .into_iter()
            .collect();
    assert_eq!(outputs, expected);
}

#[test]
fn template_naming_keeps_the_input_extension() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output)
        .glob("**/*.txt")
        .template("prefix_{}")
        .build()
        .unwrap();

    let outputs: HashSet<PathBuf> = mapper
        .pairs()
        .map(|pair| pair.unwrap().output)
        .collect();
    let expected: HashSet<PathBuf> = [
        output.join("a/b/prefix_crane.txt"),
        output.join("prefix_coco.txt"),
    ]
    .into_iter()
    .collect();
    assert_eq!(outputs, expected);
}

#[test]
fn custom_naming_bypasses_the_relative_convention() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output)
        .glob("**/*.txt")
        .name_with(|input_path, output_root| {
            output_root.join("flat").join(input_path.file_name().unwrap())
        })
        .build()
        .unwrap();

    let outputs: HashSet<PathBuf> = mapper
        .pairs()
        .map(|pair| pair.unwrap().output)
        .collect();
    let expected: HashSet<PathBuf> =
        [output.join("flat/crane.txt"), output.join("flat/coco.txt")]
            .into_iter()
            .collect();
    assert_eq!(outputs, expected);
    assert!(output.join("flat").exists());
}

// ---------------------------------------------------------------------------
// Directory granularity
// ---------------------------------------------------------------------------

#[test]
fn dir_mapper_shallow_lists_immediate_child_directories() {
    let (_tmp, input, output) = setup_dirs();
    let mapper = PathMapper::dir_mapper_shallow(&input, &output)
        .build()
        .unwrap();

    // muffin is a file; lettuce is one level too deep
    assert_eq!(input_names(&mapper), names(["bread", "pancake", "waffle"]));
}

#[test]
fn dir_mapper_deep_lists_leaf_directories() {
    let (_tmp, input, output) = setup_dirs();
    let mapper = PathMapper::dir_mapper_deep(&input, &output).build().unwrap();

    // bread is excluded: it has a child directory, lettuce.
    // waffle only contains a file, so it is a leaf.
    assert_eq!(input_names(&mapper), names(["lettuce", "pancake", "waffle"]));
}

#[test]
fn dir_mapper_outputs_mirror_relative_paths() {
    let (_tmp, input, output) = setup_dirs();
    let mapper = PathMapper::dir_mapper_deep(&input, &output).build().unwrap();

    let outputs: HashSet<PathBuf> = mapper
        .pairs()
        .map(|pair| pair.unwrap().output)
        .collect();
    let expected: HashSet<PathBuf> = [
        output.join("bread/lettuce"),
        output.join("pancake"),
        output.join("waffle"),
    ]
    .into_iter()
    .collect();
    assert_eq!(outputs, expected);
}

#[test]
fn directories_only_glob_mode_skips_files() {
    let (_tmp, input, output) = setup_dirs();
    let mapper = PathMapper::glob_mapper(&input, &output, MatchMode::DirectoriesOnly)
        .glob("**/*")
        .build()
        .unwrap();

    assert_eq!(
        input_names(&mapper),
        names(["bread", "lettuce", "pancake", "waffle"])
    );
}

#[test]
fn prebuilt_glob_spec_selects_like_a_pattern_list() {
    let (_tmp, input, output) = setup_files();
    let spec = GlobSpec::new(["**/*.txt", "**/*.rb"]).unwrap();
    let mapper = PathMapper::file_mapper(&input, &output)
        .glob_spec(spec)
        .build()
        .unwrap();

    assert_eq!(
        input_names(&mapper),
        names(["crane.txt", "coco.txt", "beryl.rb"])
    );
}

// ---------------------------------------------------------------------------
// Empty input
// ---------------------------------------------------------------------------

const EMPTY_INPUT_ROOT: &str = "PATHMAP_EMPTY_INPUT_ROOT";

/// Consuming a mapper that matches nothing terminates the process, so the
/// consuming side runs in a re-invoked copy of this test binary while the
/// parent asserts on its exit status and stderr.
#[test]
fn empty_input_terminates_with_a_diagnostic() {
    if let Ok(root) = env::var(EMPTY_INPUT_ROOT) {
        let input = PathBuf::from(root);
        let mapper = PathMapper::file_mapper(&input, input.join("output"))
            .globs(&["**/*.something", "another"])
            .build()
            .unwrap();
        for _pair in &mapper {
            panic!("input should be empty");
        }
        return;
    }

    let tmp = tempfile::tempdir().unwrap();
    let child = Command::new(env::current_exe().unwrap())
        .args([
            "empty_input_terminates_with_a_diagnostic",
            "--exact",
            "--nocapture",
        ])
        .env(EMPTY_INPUT_ROOT, tmp.path())
        .output()
        .unwrap();

    assert_eq!(
        child.status.code(),
        Some(1),
        "an empty batch must terminate the process"
    );
    let stderr = String::from_utf8_lossy(&child.stderr);
    let expected = format!(
        "no input found for \"{}\"",
        tmp.path().join("{**/*.something,another}").display()
    );
    assert!(
        stderr.contains(&expected),
        "expected {expected:?} on stderr, got: {stderr}"
    );
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

#[test]
fn apply_invokes_the_callback_once_per_pair() {
    let (_tmp, input, output) = setup_files();
    let mapper = PathMapper::file_mapper(&input, &output).build().unwrap();

    let mut calls = 0;
    mapper
        .apply(|pair| {
            assert!(pair.input.is_file());
            calls += 1;
        })
        .unwrap();
    assert_eq!(calls, FILE_FIXTURE.len());
}

// ---------------------------------------------------------------------------
// Construction-time validation
// ---------------------------------------------------------------------------

#[test]
fn build_rejects_malformed_patterns() {
    let (_tmp, input, output) = setup_files();
    let err = PathMapper::file_mapper(&input, &output)
        .glob("[")
        .build()
        .unwrap_err();
    assert!(matches!(err, MapError::InvalidPattern { .. }));
    assert!(err.is_configuration());
}

#[test]
fn build_rejects_empty_pattern_lists() {
    let (_tmp, input, output) = setup_files();
    let empty: [&str; 0] = [];
    let err = PathMapper::file_mapper(&input, &output)
        .globs(&empty)
        .build()
        .unwrap_err();
    assert!(matches!(err, MapError::EmptyPatternSet));
}

#[test]
fn build_rejects_bad_templates() {
    let (_tmp, input, output) = setup_files();
    let err = PathMapper::file_mapper(&input, &output)
        .template("no_placeholder")
        .build()
        .unwrap_err();
    assert!(matches!(err, MapError::InvalidTemplate(_)));

    let err = PathMapper::file_mapper(&input, &output)
        .template("{}_{}")
        .build()
        .unwrap_err();
    assert!(matches!(err, MapError::InvalidTemplate(_)));
}

#[test]
fn build_rejects_patterns_on_directory_listing_mappers() {
    let (_tmp, input, output) = setup_dirs();
    let err = PathMapper::dir_mapper_shallow(&input, &output)
        .glob("**/*")
        .build()
        .unwrap_err();
    assert!(matches!(err, MapError::PatternsWithDirMode));
}
