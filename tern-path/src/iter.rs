use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use crate::flags::PathFlags;
use crate::path::Path;

/// Iterator over the children of one directory.
///
/// Clones share the underlying OS directory stream, so advancing any clone
/// advances them all; the stream closes when the last clone is dropped. A
/// missing or unreadable directory behaves as empty. `.` and `..` are never
/// produced.
#[derive(Clone)]
pub struct DirIterator {
    shared: Option<Rc<RefCell<DirState>>>,
}

struct DirState {
    entries: fs::ReadDir,
    prefix: Path,
    flags: PathFlags,
}

impl DirIterator {
    pub(crate) fn new(dir: &Path, flags: PathFlags) -> Self {
        if flags.contains(PathFlags::UNICODE) && !dir.is_unicode() {
            return Self { shared: None };
        }
        let target = if dir.is_empty() {
            Path::new(".")
        } else {
            dir.clone()
        };
        let shared = fs::read_dir(target.as_std()).ok().map(|entries| {
            Rc::new(RefCell::new(DirState {
                entries,
                prefix: dir.clone(),
                flags,
            }))
        });
        Self { shared }
    }

    /// True when nothing remains.
    pub fn is_exhausted(&self) -> bool {
        self.shared.is_none()
    }
}

impl Iterator for DirIterator {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        let shared = self.shared.clone()?;
        let mut state = shared.borrow_mut();
        loop {
            let entry = match state.entries.next() {
                None => {
                    drop(state);
                    self.shared = None;
                    return None;
                }
                Some(Err(_)) => continue,
                Some(Ok(entry)) => entry,
            };
            let leaf = entry.file_name();
            if state.flags.contains(PathFlags::UNICODE) && leaf.to_str().is_none() {
                continue;
            }
            let child = state.prefix.join(&Path::new(&leaf));
            if state.flags.contains(PathFlags::NO_HIDDEN) && child.is_hidden() {
                continue;
            }
            return Some(child);
        }
    }
}

/// Iterator over a whole subtree.
///
/// Top-down by default (directories before their contents);
/// [`PathFlags::BOTTOM_UP`] switches to post-order, re-visiting each
/// directory after its contents so callers can delete as they go. The
/// starting directory itself is not produced.
pub struct DeepIterator {
    stack: Vec<Frame>,
    flags: PathFlags,
}

struct Frame {
    iter: DirIterator,
    // The directory this frame enumerates; emitted on pop in bottom-up
    // order. None for the search root.
    dir: Option<Path>,
}

impl DeepIterator {
    pub(crate) fn new(dir: &Path, flags: PathFlags) -> Self {
        let stack = if dir.is_directory(flags) {
            vec![Frame {
                iter: dir.directory(flags),
                dir: None,
            }]
        } else {
            Vec::new()
        };
        Self { stack, flags }
    }

    fn descend(&mut self, dir: Path) {
        let iter = dir.directory(self.flags);
        self.stack.push(Frame {
            iter,
            dir: Some(dir),
        });
    }
}

impl Iterator for DeepIterator {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        let bottom_up = self.flags.contains(PathFlags::BOTTOM_UP);
        loop {
            let top = self.stack.last_mut()?;
            match top.iter.next() {
                Some(entry) => {
                    if entry.is_directory(self.flags) {
                        if bottom_up {
                            self.descend(entry);
                            continue;
                        }
                        self.descend(entry.clone());
                        return Some(entry);
                    }
                    return Some(entry);
                }
                None => {
                    let frame = self.stack.pop().expect("non-empty stack");
                    if bottom_up {
                        if let Some(dir) = frame.dir {
                            return Some(dir);
                        }
                    }
                }
            }
        }
    }
}

