#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;
    use tokio_util::sync::CancellationToken;

    use crate::scanner::{page, scan, PageParams, ScanError};
    use crate::types::ScanOptions;

    fn write(root: &Path, rel: &str, len: usize) {
        let p = root.join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(p, vec![b'x'; len]).unwrap();
    }

    fn run(root: &Path) -> crate::types::ScanSummary {
        scan(root, &ScanOptions::default(), None, CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_small_tree() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", 100);
        write(dir.path(), "b.py", 200);
        write(dir.path(), "sub/c.txt", 50);

        let summary = run(dir.path());
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.total_size_bytes, 350);
        assert_eq!(summary.skipped_count, 0);

        let txt = summary.extensions[".txt"];
        assert_eq!((txt.count, txt.size_bytes), (2, 150));
        let py = summary.extensions[".py"];
        assert_eq!((py.count, py.size_bytes), (1, 200));

        let largest: Vec<&str> = summary.largest_files.iter().map(|r| r.name()).collect();
        assert_eq!(largest, vec!["b.py", "a.txt", "c.txt"]);

        // traversal order: entries of a directory sorted by name
        let all: Vec<&str> = summary.all_files.iter().map(|r| r.name()).collect();
        assert_eq!(all, vec!["a.txt", "b.py", "c.txt"]);
    }

    #[test]
    fn test_two_text_files_and_a_picture() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", 10);
        write(dir.path(), "b.txt", 20);
        write(dir.path(), "c.jpg", 5);

        let summary = run(dir.path());
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.total_size_bytes, 35);
        assert_eq!(summary.extensions.len(), 2);
        assert_eq!((summary.extensions[".txt"].count, summary.extensions[".txt"].size_bytes), (2, 30));
        assert_eq!((summary.extensions[".jpg"].count, summary.extensions[".jpg"].size_bytes), (1, 5));
    }

    #[test]
    fn test_bucket_invariants() {
        let dir = TempDir::new().unwrap();
        for (i, name) in ["x.rs", "y.RS", "Makefile", ".bashrc", "arch.tar.gz", "deep/er/z.md"].iter().enumerate() {
            write(dir.path(), name, i * 7 + 1);
        }

        let summary = run(dir.path());
        let bucket_count: u64 = summary.extensions.values().map(|s| s.count).sum();
        let bucket_size: u64 = summary.extensions.values().map(|s| s.size_bytes).sum();
        let file_size: u64 = summary.all_files.iter().map(|r| r.size_bytes()).sum();

        assert_eq!(bucket_count, summary.file_count);
        assert_eq!(bucket_size, summary.total_size_bytes);
        assert_eq!(file_size, summary.total_size_bytes);
        assert_eq!(summary.all_files.len() as u64, summary.file_count);
        assert_eq!(summary.extensions[".rs"].count, 2);
        assert_eq!(summary.extensions[""].count, 2);
        assert_eq!(summary.extensions[".gz"].count, 1);
    }

    #[test]
    fn test_rescan_is_identical() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "one.txt", 10);
        write(dir.path(), "two/three.log", 20);

        let first = run(dir.path());
        let second = run(dir.path());
        assert_eq!(first, second);
    }

    #[test]
    fn test_extension_filter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", 100);
        write(dir.path(), "b.py", 200);
        write(dir.path(), "sub/c.TXT", 50);

        let summary = scan(dir.path(), &ScanOptions::default(), Some("TXT"), CancellationToken::new()).unwrap();
        assert_eq!(summary.extension_filter.as_deref(), Some(".txt"));
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.total_size_bytes, 150);
        assert_eq!(summary.extensions.len(), 1);
        assert!(summary.all_files.iter().all(|r| r.extension() == ".txt"));
    }

    #[test]
    fn test_excludes_prune_directories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "keep.txt", 1);
        write(dir.path(), "node_modules/pkg/index.js", 1000);

        let options = ScanOptions { excludes: vec!["**/node_modules".to_string()] };
        let summary = scan(dir.path(), &options, None, CancellationToken::new()).unwrap();
        assert_eq!(summary.file_count, 1);
        assert_eq!(summary.all_files[0].name(), "keep.txt");
    }

    #[test]
    fn test_invalid_roots() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "file.txt", 1);

        let missing = dir.path().join("nope");
        let err = scan(&missing, &ScanOptions::default(), None, CancellationToken::new()).unwrap_err();
        assert!(matches!(err, ScanError::InvalidRoot { .. }));

        let err = scan(&dir.path().join("file.txt"), &ScanOptions::default(), None, CancellationToken::new())
            .unwrap_err();
        match err {
            ScanError::InvalidRoot { reason, .. } => assert_eq!(reason, "not a directory"),
            other => panic!("expected InvalidRoot, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        for i in 1..=5 {
            write(dir.path(), &format!("ok{}.txt", i), i);
        }
        write(dir.path(), "locked/hidden.txt", 5);
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores permission bits
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let summary = run(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(summary.file_count, 5);
        assert!(summary.all_files.iter().all(|r| r.name().starts_with("ok")));
        assert!(summary.skipped_count >= 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_special_files_are_not_skips() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", 10);
        write(dir.path(), "sub/b.txt", 20);
        let status = std::process::Command::new("mkfifo").arg(dir.path().join("sub/pipe")).status().unwrap();
        assert!(status.success());

        let summary = run(dir.path());
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.total_size_bytes, 30);
        assert_eq!(summary.skipped_count, 0);
        assert!(!summary.extensions.contains_key(""));
    }

    #[test]
    fn test_pages_cover_all_files() {
        let dir = TempDir::new().unwrap();
        for i in 0..15 {
            write(dir.path(), &format!("f{:02}.dat", i), i + 1);
        }
        let summary = run(dir.path());

        let first = page(&summary.all_files, PageParams::new(10, 0).unwrap());
        let second = page(&summary.all_files, PageParams::new(10, 10).unwrap());
        assert_eq!(first.results.len(), 10);
        assert_eq!(second.results.len(), 5);
        assert!(first.has_next());
        assert!(!second.has_next());

        let joined: Vec<_> = first.results.iter().chain(second.results.iter()).cloned().collect();
        assert_eq!(joined, summary.all_files);

        let tail = page(&summary.all_files, PageParams::new(5, 10).unwrap());
        assert_eq!(tail.total, 15);
        assert_eq!(tail.results, summary.all_files[10..15].to_vec());
        assert_eq!(tail.results[0].name(), "f10.dat");
    }
}
