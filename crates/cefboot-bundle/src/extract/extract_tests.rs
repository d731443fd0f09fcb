#![allow(non_snake_case)]

use super::*;
use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{Builder, EntryType, Header};
use tempfile::TempDir;

enum TestEntry<'a> {
    Dir(&'a str, u32),
    File(&'a str, &'a [u8], u32),
    Symlink(&'a str, &'a str),
    RawName(&'a [u8], &'a [u8]),
}

fn build_archive(entries: &[TestEntry<'_>]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = Builder::new(encoder);

    for entry in entries {
        let mut header = Header::new_gnu();
        match entry {
            TestEntry::Dir(path, mode) => {
                header.set_entry_type(EntryType::Directory);
                header.set_path(path).unwrap();
                header.set_size(0);
                header.set_mode(*mode);
                header.set_cksum();
                builder.append(&header, io::empty()).unwrap();
            }
            TestEntry::File(path, content, mode) => {
                header.set_entry_type(EntryType::Regular);
                header.set_path(path).unwrap();
                header.set_size(content.len() as u64);
                header.set_mode(*mode);
                header.set_cksum();
                builder.append(&header, *content).unwrap();
            }
            TestEntry::Symlink(path, target) => {
                header.set_entry_type(EntryType::Symlink);
                header.set_path(path).unwrap();
                // Raw bytes so absolute and escaping targets can be written
                let link = target.as_bytes();
                header.as_old_mut().linkname[..link.len()].copy_from_slice(link);
                header.set_size(0);
                header.set_mode(0o777);
                header.set_cksum();
                builder.append(&header, io::empty()).unwrap();
            }
            TestEntry::RawName(name, content) => {
                // Bypasses the builder's own path validation
                header.as_old_mut().name[..name.len()].copy_from_slice(name);
                header.set_entry_type(EntryType::Regular);
                header.set_size(content.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder.append(&header, *content).unwrap();
            }
        }
    }

    builder.into_inner().unwrap().finish().unwrap()
}

fn sample_archive() -> Vec<u8> {
    build_archive(&[
        TestEntry::Dir("bin/", 0o755),
        TestEntry::File("bin/jcef_helper", b"#!/bin/sh\necho helper\n", 0o755),
        TestEntry::File("bin/icudtl.dat", b"data", 0o644),
    ])
}

#[test]
fn ArchiveExtractor___extract___recreates_directory_and_file() {
    let temp_dir = TempDir::new().unwrap();

    let summary = ArchiveExtractor::new()
        .extract(sample_archive().as_slice(), temp_dir.path())
        .unwrap();

    assert!(temp_dir.path().join("bin").is_dir());
    assert_eq!(
        fs::read(temp_dir.path().join("bin/jcef_helper")).unwrap(),
        b"#!/bin/sh\necho helper\n"
    );
    assert_eq!(summary.directories, 1);
    assert_eq!(summary.files, 2);
    assert_eq!(summary.bytes, 26);
}

#[cfg(unix)]
#[test]
fn ArchiveExtractor___extract___sets_execute_bit_only_where_archived() {
    use std::os::unix::fs::PermissionsExt;
    let temp_dir = TempDir::new().unwrap();

    ArchiveExtractor::new()
        .extract(sample_archive().as_slice(), temp_dir.path())
        .unwrap();

    let helper = fs::metadata(temp_dir.path().join("bin/jcef_helper")).unwrap();
    let data = fs::metadata(temp_dir.path().join("bin/icudtl.dat")).unwrap();
    assert_ne!(helper.permissions().mode() & 0o100, 0);
    assert_eq!(data.permissions().mode() & 0o111, 0);
}

#[test]
fn ArchiveExtractor___extract___twice_over_existing_layout_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let extractor = ArchiveExtractor::new();

    extractor
        .extract(sample_archive().as_slice(), temp_dir.path())
        .unwrap();
    let second = extractor
        .extract(sample_archive().as_slice(), temp_dir.path())
        .unwrap();

    assert_eq!(second.files, 2);
    assert_eq!(
        fs::read(temp_dir.path().join("bin/icudtl.dat")).unwrap(),
        b"data"
    );
}

#[test]
fn ArchiveExtractor___extract___overwrites_changed_files() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("README"), b"stale contents that are longer").unwrap();
    let archive = build_archive(&[TestEntry::File("README", b"fresh", 0o644)]);

    ArchiveExtractor::new()
        .extract(archive.as_slice(), temp_dir.path())
        .unwrap();

    assert_eq!(fs::read(temp_dir.path().join("README")).unwrap(), b"fresh");
}

#[test]
fn ArchiveExtractor___extract___creates_missing_parents_for_files() {
    let temp_dir = TempDir::new().unwrap();
    let archive = build_archive(&[TestEntry::File("a/b/c/libcef.so", b"elf", 0o755)]);

    ArchiveExtractor::new()
        .extract(archive.as_slice(), temp_dir.path())
        .unwrap();

    assert!(temp_dir.path().join("a/b/c/libcef.so").is_file());
}

#[test]
fn ArchiveExtractor___extract___small_buffer_copies_everything() {
    let temp_dir = TempDir::new().unwrap();
    let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let archive = build_archive(&[TestEntry::File("blob.pak", &content, 0o644)]);

    let summary = ArchiveExtractor::new()
        .with_buffer_size(7)
        .extract(archive.as_slice(), temp_dir.path())
        .unwrap();

    assert_eq!(fs::read(temp_dir.path().join("blob.pak")).unwrap(), content);
    assert_eq!(summary.bytes, 10_000);
}

#[test]
fn ArchiveExtractor___extract___records_archive_digest() {
    let temp_dir = TempDir::new().unwrap();
    let archive = sample_archive();
    let expected = hex::encode(Sha256::digest(&archive));

    let summary = ArchiveExtractor::new()
        .extract(archive.as_slice(), temp_dir.path())
        .unwrap();

    assert_eq!(summary.archive_sha256, expected);
}

#[test]
fn ArchiveExtractor___extract___parent_dir_entry_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("dest");
    let archive = build_archive(&[TestEntry::RawName(b"../escape.txt", b"x")]);

    let result = ArchiveExtractor::new().extract(archive.as_slice(), &dest);

    assert!(matches!(result, Err(BundleError::UnsafeEntryPath(_))));
    assert!(!temp_dir.path().join("escape.txt").exists());
}

#[test]
fn ArchiveExtractor___extract___corrupt_stream_is_extraction_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut archive = sample_archive();
    archive.truncate(archive.len() / 2);

    let result = ArchiveExtractor::new().extract(archive.as_slice(), temp_dir.path());

    assert!(matches!(result, Err(BundleError::Extraction { .. })));
}

#[test]
fn ArchiveExtractor___extract___not_gzip_is_extraction_error() {
    let temp_dir = TempDir::new().unwrap();

    let result = ArchiveExtractor::new().extract(b"plain text".as_slice(), temp_dir.path());

    assert!(matches!(result, Err(BundleError::Extraction { .. })));
}

#[test]
fn ArchiveExtractor___extract_path___reads_file() {
    let temp_dir = TempDir::new().unwrap();
    let archive_path = temp_dir.path().join("bundle.tar.gz");
    fs::write(&archive_path, sample_archive()).unwrap();
    let dest = temp_dir.path().join("out");

    let summary = ArchiveExtractor::new()
        .extract_path(&archive_path, &dest)
        .unwrap();

    assert_eq!(summary.files, 2);
    assert!(dest.join("bin/jcef_helper").is_file());
}

#[cfg(unix)]
#[test]
fn ArchiveExtractor___extract___recreates_internal_symlinks() {
    let temp_dir = TempDir::new().unwrap();
    let archive = build_archive(&[
        TestEntry::Dir("Frameworks/Versions/A/", 0o755),
        TestEntry::File("Frameworks/Versions/A/libcef.dylib", b"macho", 0o755),
        TestEntry::Symlink("Frameworks/Versions/Current", "A"),
        TestEntry::Symlink("Frameworks/libcef.dylib", "Versions/Current/libcef.dylib"),
    ]);

    let summary = ArchiveExtractor::new()
        .extract(archive.as_slice(), temp_dir.path())
        .unwrap();

    assert_eq!(summary.symlinks, 2);
    assert_eq!(
        fs::read(temp_dir.path().join("Frameworks/libcef.dylib")).unwrap(),
        b"macho"
    );

    // Extracting again replaces the links instead of failing
    ArchiveExtractor::new()
        .extract(archive.as_slice(), temp_dir.path())
        .unwrap();
}

#[test]
fn ArchiveExtractor___extract___skips_escaping_symlinks() {
    let temp_dir = TempDir::new().unwrap();
    let archive = build_archive(&[
        TestEntry::Symlink("lib/evil", "../../etc/passwd"),
        TestEntry::Symlink("abs", "/etc/passwd"),
    ]);

    let summary = ArchiveExtractor::new()
        .extract(archive.as_slice(), temp_dir.path())
        .unwrap();

    assert_eq!(summary.skipped, 2);
    assert!(fs::symlink_metadata(temp_dir.path().join("lib/evil")).is_err());
}

#[test]
fn link_stays_inside___relative_links() {
    assert!(link_stays_inside(Path::new("a/b/link"), Path::new("../c")));
    assert!(link_stays_inside(Path::new("a/link"), Path::new("./x/y")));
    assert!(!link_stays_inside(Path::new("a/link"), Path::new("../../x")));
    assert!(!link_stays_inside(Path::new("link"), Path::new("/abs")));
}

#[cfg(unix)]
#[test]
fn ArchiveExtractor___extract___link_chained_through_earlier_link_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("root/bundle");
    let archive = build_archive(&[
        TestEntry::Symlink("a/l1", ".."),
        TestEntry::Symlink("l2", "a/l1/.."),
        TestEntry::File("l2/evil.txt", b"x", 0o644),
    ]);

    let summary = ArchiveExtractor::new()
        .extract(archive.as_slice(), &dest)
        .unwrap();

    assert_eq!(summary.symlinks, 1);
    assert_eq!(summary.skipped, 1);
    assert!(!temp_dir.path().join("root/evil.txt").exists());
    assert!(fs::symlink_metadata(dest.join("l2")).unwrap().is_dir());
    assert!(dest.join("l2/evil.txt").is_file());
}

#[cfg(unix)]
#[test]
fn ArchiveExtractor___extract___existing_link_out_of_destination_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("bundle");
    let outside = temp_dir.path().join("outside");
    fs::create_dir_all(&dest).unwrap();
    fs::create_dir_all(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, dest.join("lib")).unwrap();
    let archive = build_archive(&[TestEntry::File("lib/evil.txt", b"x", 0o644)]);

    let result = ArchiveExtractor::new().extract(archive.as_slice(), &dest);

    assert!(matches!(result, Err(BundleError::UnsafeEntryPath(_))));
    assert!(!outside.join("evil.txt").exists());
}

#[cfg(unix)]
#[test]
fn ArchiveExtractor___extract___existing_link_out_of_destination_not_used_for_directories() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("bundle");
    let outside = temp_dir.path().join("outside");
    fs::create_dir_all(&dest).unwrap();
    fs::create_dir_all(&outside).unwrap();
    std::os::unix::fs::symlink(&outside, dest.join("lib")).unwrap();
    let archive = build_archive(&[TestEntry::Dir("lib/locales/", 0o755)]);

    let result = ArchiveExtractor::new().extract(archive.as_slice(), &dest);

    assert!(matches!(result, Err(BundleError::UnsafeEntryPath(_))));
    assert!(!outside.join("locales").exists());
}

#[test]
fn ArchiveExtractor___extract___blocked_directory_is_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("bin"), b"not a directory").unwrap();
    let archive = build_archive(&[
        TestEntry::Dir("bin/", 0o755),
        TestEntry::File("lib/libcef.so", b"elf", 0o755),
    ]);

    let summary = ArchiveExtractor::new()
        .extract(archive.as_slice(), temp_dir.path())
        .unwrap();

    assert_eq!(summary.files, 1);
    assert!(temp_dir.path().join("bin").is_file());
    assert_eq!(
        fs::read(temp_dir.path().join("lib/libcef.so")).unwrap(),
        b"elf"
    );
}

#[test]
fn ArchiveExtractor___extract___creates_missing_destination() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("x/y/bundle");

    let summary = ArchiveExtractor::new()
        .extract(sample_archive().as_slice(), &dest)
        .unwrap();

    assert_eq!(summary.files, 2);
    assert!(dest.join("bin/icudtl.dat").is_file());
}
