use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::time::SystemTime;

use tracing::debug;

use crate::error::PathError;
use crate::flags::PathFlags;
use crate::iter::{DeepIterator, DirIterator};
use crate::path::{Kind, Path};

impl Path {
    fn metadata(&self, flags: PathFlags) -> io::Result<fs::Metadata> {
        if flags.contains(PathFlags::NO_FOLLOW) {
            fs::symlink_metadata(self.as_std())
        } else {
            fs::metadata(self.as_std())
        }
    }

    // Queries

    pub fn exists(&self, flags: PathFlags) -> bool {
        self.metadata(flags).is_ok()
    }

    pub fn file_kind(&self, flags: PathFlags) -> Kind {
        let Ok(meta) = self.metadata(flags) else {
            return Kind::None;
        };
        let ft = meta.file_type();
        if ft.is_symlink() {
            Kind::Symlink
        } else if ft.is_dir() {
            Kind::Directory
        } else if ft.is_file() {
            Kind::File
        } else {
            Kind::Special
        }
    }

    pub fn is_directory(&self, flags: PathFlags) -> bool {
        self.metadata(flags).map(|m| m.is_dir()).unwrap_or(false)
    }

    pub fn is_file(&self, flags: PathFlags) -> bool {
        self.metadata(flags)
            .map(|m| m.file_type().is_file())
            .unwrap_or(false)
    }

    pub fn is_special(&self, flags: PathFlags) -> bool {
        self.metadata(flags)
            .map(|m| {
                let ft = m.file_type();
                !ft.is_dir() && !ft.is_file() && !ft.is_symlink()
            })
            .unwrap_or(false)
    }

    pub fn is_symlink(&self) -> bool {
        fs::symlink_metadata(self.as_std())
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Device and inode pair, identifying the file independently of its
    /// spelling. Zero on platforms without the concept.
    pub fn id(&self, flags: PathFlags) -> (u64, u64) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            match self.metadata(flags) {
                Ok(m) => (m.dev(), m.ino()),
                Err(_) => (0, 0),
            }
        }
        #[cfg(not(unix))]
        {
            let _ = flags;
            (0, 0)
        }
    }

    /// File size; [`PathFlags::RECURSE`] adds the subtree under a
    /// directory.
    pub fn size(&self, flags: PathFlags) -> u64 {
        let mut bytes = self.metadata(flags).map(|m| m.len()).unwrap_or(0);
        if flags.contains(PathFlags::RECURSE) {
            for child in self.directory(PathFlags::empty()) {
                bytes += child.size(PathFlags::NO_FOLLOW | PathFlags::RECURSE);
            }
        }
        bytes
    }

    pub fn access_time(&self, flags: PathFlags) -> Result<SystemTime, PathError> {
        let meta = self.metadata(flags).map_err(|e| PathError::from_io(self, e))?;
        meta.accessed().map_err(|e| PathError::from_io(self, e))
    }

    pub fn create_time(&self, flags: PathFlags) -> Result<SystemTime, PathError> {
        let meta = self.metadata(flags).map_err(|e| PathError::from_io(self, e))?;
        meta.created()
            .map_err(|_| PathError::Unsupported("file creation time".to_owned()))
    }

    pub fn modify_time(&self, flags: PathFlags) -> Result<SystemTime, PathError> {
        let meta = self.metadata(flags).map_err(|e| PathError::from_io(self, e))?;
        meta.modified().map_err(|e| PathError::from_io(self, e))
    }

    /// Status-change time (ctime); POSIX only.
    pub fn status_time(&self, flags: PathFlags) -> Result<SystemTime, PathError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            let meta = self.metadata(flags).map_err(|e| PathError::from_io(self, e))?;
            Ok(tern_time::unix_to_system_time(
                meta.ctime(),
                meta.ctime_nsec() as u32,
            ))
        }
        #[cfg(not(unix))]
        {
            let _ = flags;
            Err(PathError::Unsupported("file status time".to_owned()))
        }
    }

    pub fn set_access_time(&self, t: SystemTime, flags: PathFlags) -> Result<(), PathError> {
        self.set_file_times(Some(t), None, flags)
    }

    pub fn set_modify_time(&self, t: SystemTime, flags: PathFlags) -> Result<(), PathError> {
        self.set_file_times(None, Some(t), flags)
    }

    pub fn set_create_time(&self, _t: SystemTime, _flags: PathFlags) -> Result<(), PathError> {
        Err(PathError::Unsupported(
            "modifying file creation time".to_owned(),
        ))
    }

    pub fn set_status_time(&self, _t: SystemTime, _flags: PathFlags) -> Result<(), PathError> {
        Err(PathError::Unsupported(
            "modifying file status time".to_owned(),
        ))
    }

    #[cfg(unix)]
    fn set_file_times(
        &self,
        atime: Option<SystemTime>,
        mtime: Option<SystemTime>,
        flags: PathFlags,
    ) -> Result<(), PathError> {
        use std::os::unix::ffi::OsStrExt;

        let omit = libc::timespec {
            tv_sec: 0,
            tv_nsec: libc::UTIME_OMIT,
        };
        let times = [
            atime.map_or(omit, tern_time::system_time_to_timespec),
            mtime.map_or(omit, tern_time::system_time_to_timespec),
        ];
        let cname = std::ffi::CString::new(self.as_os_string().as_bytes())
            .map_err(|_| PathError::InvalidArgument(format!("invalid file name: {:?}", self.name())))?;
        let at_flags = if flags.contains(PathFlags::NO_FOLLOW) {
            libc::AT_SYMLINK_NOFOLLOW
        } else {
            0
        };
        let rc = unsafe { libc::utimensat(libc::AT_FDCWD, cname.as_ptr(), times.as_ptr(), at_flags) };
        if rc == -1 {
            return Err(PathError::from_io(self, io::Error::last_os_error()));
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn set_file_times(
        &self,
        _atime: Option<SystemTime>,
        _mtime: Option<SystemTime>,
        _flags: PathFlags,
    ) -> Result<(), PathError> {
        Err(PathError::Unsupported("setting file times".to_owned()))
    }

    // Iteration

    /// Iterates over the children of a directory. Honours
    /// [`PathFlags::NO_HIDDEN`] and [`PathFlags::UNICODE`] as entry
    /// filters; a missing or unreadable directory yields nothing.
    pub fn directory(&self, flags: PathFlags) -> DirIterator {
        DirIterator::new(self, flags)
    }

    /// Enumerates the whole subtree, top-down unless
    /// [`PathFlags::BOTTOM_UP`] asks for post-order (so callers can delete
    /// what they visit).
    pub fn deep_search(&self, flags: PathFlags) -> DeepIterator {
        DeepIterator::new(self, flags)
    }

    // Mutation

    /// Creates a directory. [`PathFlags::RECURSE`] creates missing
    /// parents; [`PathFlags::OVERWRITE`] replaces a conflicting non-directory
    /// entry.
    pub fn make_directory(&self, flags: PathFlags) -> Result<(), PathError> {
        match fs::create_dir(self.as_std()) {
            Ok(()) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if self.is_directory(PathFlags::empty()) {
                    return Ok(());
                }
                if !flags.contains(PathFlags::OVERWRITE) {
                    return Err(PathError::AlreadyExists(self.name()));
                }
                self.remove(PathFlags::empty())?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound
                && flags.contains(PathFlags::RECURSE)
                && !self.is_empty() =>
            {
                let parent = self.parent();
                if parent == *self {
                    return Err(PathError::from_io(self, e));
                }
                parent.make_directory(flags)?;
            }
            Err(e) => return Err(PathError::from_io(self, e)),
        }
        debug!(path = %self, "creating directory");
        fs::create_dir(self.as_std()).map_err(|e| PathError::from_io(self, e))
    }

    /// Copies to `dst`. Directories need [`PathFlags::RECURSE`]; symlinks
    /// are re-created pointing at their resolved target;
    /// [`PathFlags::OVERWRITE`] replaces an existing destination.
    pub fn copy_to(&self, dst: &Path, flags: PathFlags) -> Result<(), PathError> {
        if !self.exists(PathFlags::NO_FOLLOW) {
            return Err(PathError::NotFound(self.name()));
        }
        if self == dst
            || (dst.exists(PathFlags::NO_FOLLOW)
                && self.id(PathFlags::NO_FOLLOW) == dst.id(PathFlags::NO_FOLLOW))
        {
            return Err(PathError::AlreadyExists(dst.name()));
        }
        if self.is_directory(PathFlags::empty()) && !flags.contains(PathFlags::RECURSE) {
            return Err(PathError::InvalidArgument(format!(
                "copying a directory needs RECURSE: {:?}",
                self.name()
            )));
        }
        if dst.exists(PathFlags::NO_FOLLOW) {
            if !flags.contains(PathFlags::OVERWRITE) {
                return Err(PathError::AlreadyExists(dst.name()));
            }
            dst.remove(PathFlags::RECURSE)?;
        }

        debug!(src = %self, dst = %dst, "copying");

        if self.is_symlink() {
            self.resolve_symlink()?.make_symlink(dst, PathFlags::empty())
        } else if self.is_directory(PathFlags::empty()) {
            dst.make_directory(PathFlags::empty())?;
            for child in self.directory(PathFlags::empty()) {
                child.copy_to(&dst.join(&child.leaf()), PathFlags::RECURSE)?;
            }
            Ok(())
        } else {
            fs::copy(self.as_std(), dst.as_std())
                .map(|_| ())
                .map_err(|e| PathError::from_io(self, e))
        }
    }

    /// Moves to `dst`, preferring an atomic rename and falling back to
    /// copy-then-remove across devices only when [`PathFlags::MAY_COPY`] is
    /// set.
    pub fn move_to(&self, dst: &Path, flags: PathFlags) -> Result<(), PathError> {
        if !self.exists(PathFlags::NO_FOLLOW) {
            return Err(PathError::NotFound(self.name()));
        }
        if self == dst {
            return Ok(());
        }
        if dst.exists(PathFlags::NO_FOLLOW) && self.id(PathFlags::empty()) != dst.id(PathFlags::empty()) {
            if !flags.contains(PathFlags::OVERWRITE) {
                return Err(PathError::AlreadyExists(dst.name()));
            }
            dst.remove(PathFlags::RECURSE)?;
        }

        debug!(src = %self, dst = %dst, "moving");

        match fs::rename(self.as_std(), dst.as_std()) {
            Ok(()) => Ok(()),
            Err(e) if cross_device(&e) && flags.contains(PathFlags::MAY_COPY) => {
                self.copy_to(dst, PathFlags::RECURSE)?;
                self.remove(PathFlags::RECURSE)
            }
            Err(e) => Err(PathError::from_io(self, e)),
        }
    }

    /// Deletes the entry; [`PathFlags::RECURSE`] deletes subtrees.
    /// Idempotent: a missing target is a success.
    pub fn remove(&self, flags: PathFlags) -> Result<(), PathError> {
        if flags.contains(PathFlags::RECURSE)
            && self.is_directory(PathFlags::empty())
            && !self.is_symlink()
        {
            for child in self.directory(PathFlags::empty()) {
                child.remove(PathFlags::RECURSE)?;
            }
        }

        debug!(path = %self, "removing");

        let result = if self.is_directory(PathFlags::NO_FOLLOW) {
            fs::remove_dir(self.as_std())
        } else {
            fs::remove_file(self.as_std())
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PathError::from_io(self, e)),
        }
    }

    /// Creates `linkname` as a symlink to `self`. On platforms without
    /// symlinks, [`PathFlags::MAY_COPY`] substitutes a copy.
    pub fn make_symlink(&self, linkname: &Path, flags: PathFlags) -> Result<(), PathError> {
        #[cfg(unix)]
        {
            if linkname.is_symlink() {
                if let Ok(target) = linkname.resolve_symlink() {
                    if &target == self {
                        return Ok(());
                    }
                }
            }
            if flags.contains(PathFlags::OVERWRITE) && linkname.exists(PathFlags::NO_FOLLOW) {
                linkname.remove(flags)?;
            }
            match std::os::unix::fs::symlink(self.as_std(), linkname.as_std()) {
                Ok(()) => Ok(()),
                Err(_) if flags.contains(PathFlags::MAY_COPY) => {
                    self.copy_to(linkname, PathFlags::RECURSE)
                }
                Err(e) => Err(PathError::from_io(linkname, e)),
            }
        }
        #[cfg(not(unix))]
        {
            if flags.contains(PathFlags::MAY_COPY) {
                self.copy_to(linkname, PathFlags::RECURSE)
            } else {
                Err(PathError::Unsupported(
                    "symbolic links are not supported here".to_owned(),
                ))
            }
        }
    }

    /// Creates an empty file if nothing exists at this path.
    pub fn create(&self) -> Result<(), PathError> {
        if !self.exists(PathFlags::NO_FOLLOW) {
            self.save(b"", PathFlags::empty())?;
        }
        Ok(())
    }

    // I/O

    /// Reads up to `maxlen` bytes. [`PathFlags::MAY_FAIL`] turns open
    /// errors into empty data; [`PathFlags::STDIO`] maps the empty or `-`
    /// name onto standard input.
    pub fn load(&self, maxlen: usize, flags: PathFlags) -> Result<Vec<u8>, PathError> {
        let mut content = Vec::new();
        self.load_into(&mut content, maxlen, flags & !PathFlags::APPEND)?;
        Ok(content)
    }

    /// [`load`](Self::load) onto the end of an existing buffer when
    /// [`PathFlags::APPEND`] is set.
    pub fn load_into(
        &self,
        content: &mut Vec<u8>,
        maxlen: usize,
        flags: PathFlags,
    ) -> Result<(), PathError> {
        let use_stdin =
            flags.contains(PathFlags::STDIO) && (self.is_empty() || self.name == b"-");

        if !flags.contains(PathFlags::APPEND) {
            content.clear();
        }

        let reader: Box<dyn Read> = if use_stdin {
            Box::new(io::stdin())
        } else {
            match fs::File::open(self.as_std()) {
                Ok(f) => Box::new(f),
                Err(e) => {
                    if flags.contains(PathFlags::MAY_FAIL) {
                        content.clear();
                        return Ok(());
                    }
                    return Err(PathError::from_io(self, e));
                }
            }
        };

        reader
            .take(maxlen as u64)
            .read_to_end(content)
            .map_err(|e| PathError::from_io(self, e))?;
        Ok(())
    }

    /// Writes `content`. [`PathFlags::APPEND`] and
    /// [`PathFlags::OVERWRITE`] are mutually exclusive; with neither set an
    /// existing file is an error. [`PathFlags::STDIO`] maps the empty or
    /// `-` name onto standard output.
    pub fn save(&self, content: &[u8], flags: PathFlags) -> Result<(), PathError> {
        let options = PathFlags::APPEND | PathFlags::OVERWRITE;
        if flags.contains(options) {
            return Err(PathError::InvalidArgument(
                "save() accepts APPEND or OVERWRITE, not both".to_owned(),
            ));
        }

        if flags.contains(PathFlags::STDIO) && (self.is_empty() || self.name == b"-") {
            let mut out = io::stdout();
            return out
                .write_all(content)
                .and_then(|()| out.flush())
                .map_err(|e| PathError::from_io(self, e));
        }

        if !flags.intersects(options) && self.exists(PathFlags::NO_FOLLOW) {
            return Err(PathError::AlreadyExists(self.name()));
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .append(flags.contains(PathFlags::APPEND))
            .truncate(!flags.contains(PathFlags::APPEND))
            .open(self.as_std())
            .map_err(|e| PathError::from_io(self, e))?;
        file.write_all(content).map_err(|e| PathError::from_io(self, e))
    }

    // Process state

    pub fn current_directory() -> Result<Path, PathError> {
        env::current_dir()
            .map(|p| Path::new(p.as_os_str()))
            .map_err(|e| PathError::Io {
                path: ".".to_owned(),
                source: e,
            })
    }

    pub fn change_directory(&self) -> Result<(), PathError> {
        env::set_current_dir(self.as_std()).map_err(|e| PathError::from_io(self, e))
    }

    /// Absolute form: expands a leading `~`, resolves relative paths
    /// against the working directory.
    pub fn resolve(&self) -> Result<Path, PathError> {
        let mut result = Path::default();

        if self.is_empty() {
            result = Path::current_directory()?;
        } else {
            if cfg!(unix) && self.name.first() == Some(&b'~') {
                let delim = self.name.iter().position(|&c| c == crate::path::DELIMITER);
                let (user_end, tail_start) = match delim {
                    Some(p) => (p, p + 1),
                    None => (self.name.len(), self.name.len()),
                };
                let user = String::from_utf8_lossy(&self.name[1..user_end]).into_owned();
                let tail = Path::from_raw(self.name[tail_start.min(self.name.len())..].to_vec());
                if let Some(home) = user_home(&user) {
                    result = home.join(&tail);
                }
            }

            if result.is_empty() && self.is_relative() {
                if let Ok(cwd) = Path::current_directory() {
                    result = cwd.join(self);
                }
            }
        }

        if result.is_empty() {
            result = self.clone();
        }
        if !result.is_absolute() {
            return Err(PathError::NotFound(self.name()));
        }
        Ok(result)
    }

    /// The target of a symlink; non-links resolve to themselves.
    pub fn resolve_symlink(&self) -> Result<Path, PathError> {
        match fs::read_link(self.as_std()) {
            Ok(target) => Ok(Path::new(target.as_os_str())),
            Err(e) => match e.raw_os_error() {
                #[cfg(unix)]
                Some(code)
                    if code == libc::EINVAL || code == libc::ENOENT || code == libc::ENOTDIR =>
                {
                    Ok(self.clone())
                }
                _ => Err(PathError::from_io(self, e)),
            },
        }
    }
}

fn cross_device(e: &io::Error) -> bool {
    #[cfg(unix)]
    {
        e.raw_os_error() == Some(libc::EXDEV)
    }
    #[cfg(not(unix))]
    {
        let _ = e;
        false
    }
}

fn user_home(user: &str) -> Option<Path> {
    if !cfg!(unix) {
        return None;
    }
    if user.is_empty() {
        if let Some(home) = env::var_os("HOME") {
            if !home.is_empty() {
                return Some(Path::new(home));
            }
        }
    }
    let base = if cfg!(target_os = "macos") {
        "/Users"
    } else {
        "/home"
    };
    let name = if user.is_empty() {
        env::var("USER").ok()?
    } else {
        user.to_owned()
    };
    Some(Path::new(base).join(&Path::new(name.as_str())))
}
