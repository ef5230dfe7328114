use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use tern_path::{Kind, Path, PathFlags};

fn scratch() -> (TempDir, Path) {
    let tmp = TempDir::new().unwrap();
    let root = Path::from(tmp.path());
    (tmp, root)
}

fn file(root: &Path, name: &str, content: &[u8]) -> Path {
    let path = root.join(&Path::new(name));
    path.parent().make_directory(PathFlags::RECURSE).unwrap();
    path.save(content, PathFlags::OVERWRITE).unwrap();
    path
}

#[test]
fn save_and_load() {
    let (_tmp, root) = scratch();
    let path = root.join(&Path::new("data.bin"));

    path.save(b"hello", PathFlags::empty()).unwrap();
    assert!(path.exists(PathFlags::empty()));
    assert_eq!(path.file_kind(PathFlags::empty()), Kind::File);
    assert_eq!(path.load(usize::MAX, PathFlags::empty()).unwrap(), b"hello");

    // Plain save refuses to clobber.
    assert!(path.save(b"x", PathFlags::empty()).is_err());

    path.save(b" world", PathFlags::APPEND).unwrap();
    assert_eq!(
        path.load(usize::MAX, PathFlags::empty()).unwrap(),
        b"hello world"
    );

    path.save(b"reset", PathFlags::OVERWRITE).unwrap();
    assert_eq!(path.load(usize::MAX, PathFlags::empty()).unwrap(), b"reset");

    // Truncated read.
    assert_eq!(path.load(3, PathFlags::empty()).unwrap(), b"res");

    // APPEND and OVERWRITE together are rejected.
    assert!(path
        .save(b"x", PathFlags::APPEND | PathFlags::OVERWRITE)
        .is_err());

    // Missing file: error unless MAY_FAIL.
    let missing = root.join(&Path::new("nope"));
    assert!(missing.load(usize::MAX, PathFlags::empty()).is_err());
    assert_eq!(
        missing.load(usize::MAX, PathFlags::MAY_FAIL).unwrap(),
        Vec::<u8>::new()
    );
}

#[test]
fn make_directory_variants() {
    let (_tmp, root) = scratch();

    let deep = root.join(&Path::new("a/b/c"));
    assert!(deep.make_directory(PathFlags::empty()).is_err());
    deep.make_directory(PathFlags::RECURSE).unwrap();
    assert!(deep.is_directory(PathFlags::empty()));

    // Idempotent on an existing directory.
    deep.make_directory(PathFlags::empty()).unwrap();

    // A file in the way needs OVERWRITE.
    let clash = file(&root, "clash", b"x");
    assert!(clash.make_directory(PathFlags::empty()).is_err());
    clash.make_directory(PathFlags::OVERWRITE).unwrap();
    assert!(clash.is_directory(PathFlags::empty()));
}

#[test]
fn remove_is_recursive_and_idempotent() {
    let (_tmp, root) = scratch();
    file(&root, "tree/x.txt", b"1");
    file(&root, "tree/sub/y.txt", b"2");
    let tree = root.join(&Path::new("tree"));

    assert!(tree.remove(PathFlags::empty()).is_err());
    tree.remove(PathFlags::RECURSE).unwrap();
    assert!(!tree.exists(PathFlags::empty()));

    // Removing a missing target is fine.
    tree.remove(PathFlags::RECURSE).unwrap();
}

#[test]
fn copy_and_move() {
    let (_tmp, root) = scratch();
    file(&root, "src/a.txt", b"alpha");
    file(&root, "src/sub/b.txt", b"beta");
    let src = root.join(&Path::new("src"));
    let dst = root.join(&Path::new("dst"));

    // Directories need RECURSE.
    assert!(src.copy_to(&dst, PathFlags::empty()).is_err());
    src.copy_to(&dst, PathFlags::RECURSE).unwrap();
    assert_eq!(
        dst.join(&Path::new("sub/b.txt"))
            .load(usize::MAX, PathFlags::empty())
            .unwrap(),
        b"beta"
    );

    // Existing destination needs OVERWRITE.
    assert!(src.copy_to(&dst, PathFlags::RECURSE).is_err());
    src.copy_to(&dst, PathFlags::RECURSE | PathFlags::OVERWRITE)
        .unwrap();

    let moved = root.join(&Path::new("moved"));
    src.move_to(&moved, PathFlags::empty()).unwrap();
    assert!(!src.exists(PathFlags::empty()));
    assert!(moved.join(&Path::new("a.txt")).is_file(PathFlags::empty()));

    // Moving onto an existing tree needs OVERWRITE.
    assert!(moved.move_to(&dst, PathFlags::empty()).is_err());
    moved.move_to(&dst, PathFlags::OVERWRITE).unwrap();
}

#[test]
fn same_file_detection() {
    let (_tmp, root) = scratch();
    let path = file(&root, "x/file.txt", b"data");
    let respelled = root.join(&Path::new("x/./file.txt"));
    assert_eq!(
        path.id(PathFlags::empty()),
        respelled.id(PathFlags::empty())
    );
    assert_ne!(
        path.id(PathFlags::empty()),
        root.id(PathFlags::empty())
    );
}

#[test]
fn directory_iteration_and_filters() {
    let (_tmp, root) = scratch();
    file(&root, "a.txt", b"");
    file(&root, "b.txt", b"");
    file(&root, ".hidden", b"");

    let mut names: Vec<String> = root
        .directory(PathFlags::empty())
        .map(|p| p.leaf().name())
        .collect();
    names.sort();
    assert_eq!(names, vec![".hidden", "a.txt", "b.txt"]);

    let mut visible: Vec<String> = root
        .directory(PathFlags::NO_HIDDEN)
        .map(|p| p.leaf().name())
        .collect();
    visible.sort();
    assert_eq!(visible, vec!["a.txt", "b.txt"]);

    // A missing directory iterates as empty.
    assert_eq!(root.join(&Path::new("nope")).directory(PathFlags::empty()).count(), 0);

    // Clones share the stream.
    let mut it = root.directory(PathFlags::empty());
    let mut clone = it.clone();
    let mut count = 0;
    while it.next().is_some() || clone.next().is_some() {
        count += 1;
    }
    assert_eq!(count, 3);
}

#[test]
fn deep_search_orders() {
    let (_tmp, root) = scratch();
    file(&root, "d1/f1", b"");
    file(&root, "d1/d2/f2", b"");

    let rel = |p: &Path| p.relative_to(&root, PathFlags::empty()).unwrap().name();

    let top_down: Vec<String> = root.deep_search(PathFlags::empty()).map(|p| rel(&p)).collect();
    // The directory comes before its contents.
    let d1 = top_down.iter().position(|n| n == "d1").unwrap();
    let f1 = top_down.iter().position(|n| n == "d1/f1").unwrap();
    let d2 = top_down.iter().position(|n| n == "d1/d2").unwrap();
    let f2 = top_down.iter().position(|n| n == "d1/d2/f2").unwrap();
    assert!(d1 < f1 && d1 < d2 && d2 < f2);
    assert_eq!(top_down.len(), 4);

    let bottom_up: Vec<String> = root
        .deep_search(PathFlags::BOTTOM_UP)
        .map(|p| rel(&p))
        .collect();
    let d1 = bottom_up.iter().position(|n| n == "d1").unwrap();
    let f1 = bottom_up.iter().position(|n| n == "d1/f1").unwrap();
    let d2 = bottom_up.iter().position(|n| n == "d1/d2").unwrap();
    let f2 = bottom_up.iter().position(|n| n == "d1/d2/f2").unwrap();
    assert!(f1 < d1 && d2 < d1 && f2 < d2);

    // Bottom-up order allows deleting as we go.
    for p in root.deep_search(PathFlags::BOTTOM_UP) {
        p.remove(PathFlags::empty()).unwrap();
    }
    assert_eq!(root.deep_search(PathFlags::empty()).count(), 0);
}

#[test]
fn recursive_size() {
    let (_tmp, root) = scratch();
    file(&root, "s/a", &[0u8; 100]);
    file(&root, "s/sub/b", &[0u8; 50]);
    let dir = root.join(&Path::new("s"));
    assert!(dir.size(PathFlags::RECURSE) >= 150);
    assert_eq!(
        dir.join(&Path::new("a")).size(PathFlags::empty()),
        100
    );
}

#[cfg(unix)]
#[test]
fn symlinks() {
    let (_tmp, root) = scratch();
    let target = file(&root, "target.txt", b"data");
    let link = root.join(&Path::new("link"));

    target.make_symlink(&link, PathFlags::empty()).unwrap();
    assert!(link.is_symlink());
    assert_eq!(link.file_kind(PathFlags::NO_FOLLOW), Kind::Symlink);
    assert_eq!(link.file_kind(PathFlags::empty()), Kind::File);
    assert_eq!(link.resolve_symlink().unwrap(), target);

    // Linking again to the same target is a no-op.
    target.make_symlink(&link, PathFlags::empty()).unwrap();

    // Non-links resolve to themselves.
    assert_eq!(target.resolve_symlink().unwrap(), target);
}

#[cfg(unix)]
#[test]
fn file_times() {
    let (_tmp, root) = scratch();
    let path = file(&root, "stamped", b"x");

    let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
    path.set_modify_time(past, PathFlags::empty()).unwrap();
    let got = path.modify_time(PathFlags::empty()).unwrap();
    assert_eq!(got, past);

    path.set_access_time(past, PathFlags::empty()).unwrap();
    assert_eq!(path.access_time(PathFlags::empty()).unwrap(), past);

    assert!(path.set_create_time(past, PathFlags::empty()).is_err());
    assert!(path.set_status_time(past, PathFlags::empty()).is_err());
    assert!(path.status_time(PathFlags::empty()).is_ok());
}

#[test]
fn create_and_resolve() {
    let (_tmp, root) = scratch();
    let path = root.join(&Path::new("made"));
    path.create().unwrap();
    assert!(path.is_file(PathFlags::empty()));
    path.create().unwrap(); // second call is a no-op

    let abs = Path::new("some/relative").resolve().unwrap();
    assert!(abs.is_absolute());
    assert!(Path::current_directory().unwrap().is_absolute());
}
