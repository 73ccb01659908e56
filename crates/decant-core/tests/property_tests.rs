//! Property-based tests for path normalization, chunked transfer, and
//! directory reconstruction.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use decant_core::EntryPath;
use decant_core::ExtractionError;
use decant_core::copy::CopyBuffer;
use decant_core::copy::copy_with_buffer;
use decant_core::test_utils::TarGzTestBuilder;
use decant_core::test_utils::ZipTestBuilder;
use decant_core::test_utils::write_archive;
use decant_core::untar_gz;
use decant_core::unzip;
use proptest::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use tempfile::TempDir;

proptest! {
    /// Any name with a `..` segment is rejected.
    #[test]
    fn prop_parent_traversal_rejected(
        prefix in "([a-z]+/){0,5}",
        suffix in "([a-z]+/?){0,5}"
    ) {
        let raw = format!("{prefix}../{suffix}");
        let result = EntryPath::parse(&raw);
        prop_assert!(matches!(result, Err(ExtractionError::PathEscape { .. })), "{raw}");
    }

    /// Plain relative names normalize to themselves.
    #[test]
    fn prop_valid_relative_paths_accepted(
        components in prop::collection::vec("[a-zA-Z0-9_-]{1,20}", 1..6)
    ) {
        let raw = components.join("/");
        let path = EntryPath::parse(&raw).expect("valid path should be accepted");
        prop_assert_eq!(path.as_str(), raw.as_str());
        prop_assert_eq!(path.depth(), components.len());
    }

    /// Backslash-separated names normalize the same as slash-separated ones.
    #[test]
    fn prop_backslashes_equivalent(
        components in prop::collection::vec("[a-z0-9]{1,10}", 1..6)
    ) {
        let forward = EntryPath::parse(&components.join("/")).unwrap();
        let backward = EntryPath::parse(&components.join("\\")).unwrap();
        prop_assert_eq!(forward, backward);
    }

    /// Absolute names are always rejected.
    #[test]
    fn prop_absolute_rejected(
        components in prop::collection::vec("[a-z]{1,10}", 1..4)
    ) {
        let raw = format!("/{}", components.join("/"));
        prop_assert!(EntryPath::parse(&raw).is_err());
    }

    /// Chunked transfer copies every byte for any buffer size.
    #[test]
    fn prop_copy_preserves_bytes(
        data in prop::collection::vec(any::<u8>(), 0..10_000),
        buffer_size in 1usize..5_000
    ) {
        let mut buffer = CopyBuffer::with_capacity(buffer_size);
        let mut input = Cursor::new(&data);
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
        prop_assert_eq!(copied, data.len() as u64);
        prop_assert_eq!(output, data);
    }
}

/// All strict ancestors of a file entry's path.
fn ancestors(name: &str) -> Vec<String> {
    let parts: Vec<&str> = name.split('/').collect();
    (1..parts.len()).map(|n| parts[..n].join("/")).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Every ancestor of every file entry appears exactly once in the result,
    /// whatever order the entries come in.
    #[test]
    fn prop_directory_completeness(
        names in prop::collection::hash_set(
            prop::collection::vec("[a-c]", 1..5).prop_map(|p| p.join("/")),
            1..12
        )
    ) {
        // A name that is also another name's ancestor would be both a file and
        // a directory.
        let all_ancestors: HashSet<String> = names.iter().flat_map(|n| ancestors(n)).collect();
        let files: Vec<String> = names
            .into_iter()
            .filter(|n| !all_ancestors.contains(n))
            .collect();
        prop_assume!(!files.is_empty());

        let mut expected: HashSet<String> = HashSet::new();
        let mut zip = ZipTestBuilder::new();
        let mut tgz = TarGzTestBuilder::new();
        for name in &files {
            expected.extend(ancestors(name));
            zip = zip.add_file(name, name.as_bytes());
            tgz = tgz.add_file(name, name.as_bytes());
        }

        let temp = TempDir::new().unwrap();
        let zip_path = write_archive(temp.path(), "p.zip", &zip.build());
        let tgz_path = write_archive(temp.path(), "p.tar.gz", &tgz.build());

        for dirs in [
            unzip(&zip_path, temp.path().join("zip-out")).unwrap(),
            untar_gz(&tgz_path, temp.path().join("tgz-out")).unwrap(),
        ] {
            let unique: HashSet<String> = dirs.iter().cloned().collect();
            prop_assert_eq!(unique.len(), dirs.len(), "duplicates in {:?}", dirs);
            prop_assert_eq!(&unique, &expected);
        }

        for name in &files {
            let content = std::fs::read(temp.path().join("tgz-out").join(name)).unwrap();
            prop_assert_eq!(content, name.as_bytes().to_vec());
        }
    }
}
