#![cfg(all(feature = "bzip2", feature = "xz", feature = "zstd"))]

mod common;

use common::{TarFixture, ZipFixture, compress, write_archive};
use dlx_archive::{ArchiveType, ExtractOptions, detect_file, extract_to};
use rstest::rstest;

const TOOL: &[u8] = b"#!/bin/sh\necho hello\n";
const README: &[u8] = b"read me\n";

fn tar_release() -> Vec<u8> {
    TarFixture::new()
        .dir("release/")
        .dir("release/bin/")
        .file_with_mode("release/bin/tool", TOOL, 0o755)
        .file("release/README", README)
        .symlink("release/bin/tool-latest", "tool")
        .hard_link("release/README.copy", "release/README")
        .finish()
}

fn zip_release() -> Vec<u8> {
    ZipFixture::new()
        .dir("release/")
        .dir("release/bin/")
        .file_with_mode("release/bin/tool", TOOL, 0o755)
        .file("release/README", README)
        .symlink("release/bin/tool-latest", "tool")
        .finish()
}

#[rstest]
#[case::tar(ArchiveType::Tar)]
#[case::gzip(ArchiveType::Gzip)]
#[case::bzip2(ArchiveType::Bzip2)]
#[case::xz(ArchiveType::Xz)]
#[case::zstd(ArchiveType::Zstd)]
#[case::zip(ArchiveType::Zip)]
fn release_round_trip(#[case] archive_type: ArchiveType) {
    let data = match archive_type {
        ArchiveType::Zip => zip_release(),
        other => compress(tar_release(), other),
    };
    let scratch = tempfile::tempdir().unwrap();
    let archive = write_archive(scratch.path(), &data);
    let dest = scratch.path().join("out");

    let detected = detect_file(&archive).unwrap();
    assert_eq!(detected, archive_type);

    let extracted = extract_to(&archive, detected, &dest, &ExtractOptions::default()).unwrap();
    assert_eq!(extracted.bytes, (TOOL.len() + README.len()) as u64);

    let release = dest.join("release");
    assert!(release.join("bin").is_dir());
    assert_eq!(std::fs::read(release.join("bin/tool")).unwrap(), TOOL);
    assert_eq!(std::fs::read(release.join("README")).unwrap(), README);

    #[cfg(unix)]
    {
        assert_eq!(common::mode_of(&release.join("bin/tool")), 0o755);
        assert_eq!(
            std::fs::read_link(release.join("bin/tool-latest")).unwrap(),
            std::path::Path::new("tool")
        );
        assert_eq!(std::fs::read(release.join("bin/tool-latest")).unwrap(), TOOL);
    }

    if archive_type != ArchiveType::Zip {
        assert_eq!(std::fs::read(release.join("README.copy")).unwrap(), README);
    }
}

#[rstest]
#[case::gzip(ArchiveType::Gzip)]
#[case::zstd(ArchiveType::Zstd)]
fn compressed_size_ceiling(#[case] archive_type: ArchiveType) {
    let tar = TarFixture::new().file("zeros.bin", &[0u8; 4096]).finish();
    let scratch = tempfile::tempdir().unwrap();
    let archive = write_archive(scratch.path(), &compress(tar, archive_type));

    let result = extract_to(
        &archive,
        archive_type,
        scratch.path().join("out"),
        &ExtractOptions::default().max_bytes(1024),
    );

    assert!(matches!(result, Err(dlx_archive::Error::SizeLimitExceeded { .. })));
}
