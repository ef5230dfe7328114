use bitflags::bitflags;

bitflags! {
    /// Behaviour switches accepted by the path operations. Each operation
    /// documents which flags it honours; unrelated flags are ignored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PathFlags: u32 {
        /// Add to existing content instead of replacing it.
        const APPEND = 1 << 0;
        /// Deep search visits directories after their contents.
        const BOTTOM_UP = 1 << 1;
        /// Reject file names the platform cannot create.
        const LEGAL_NAME = 1 << 2;
        /// Fall back to copying when a rename or symlink is impossible.
        const MAY_COPY = 1 << 3;
        /// Return empty data instead of failing.
        const MAY_FAIL = 1 << 4;
        /// Refuse to emit `..` segments in relative paths.
        const NO_BACKTRACK = 1 << 5;
        /// Do not dereference symlinks.
        const NO_FOLLOW = 1 << 6;
        /// Skip hidden entries when iterating.
        const NO_HIDDEN = 1 << 7;
        /// Replace a conflicting target.
        const OVERWRITE = 1 << 8;
        /// Recurse into directories.
        const RECURSE = 1 << 9;
        /// Map the empty or `-` name onto standard input/output.
        const STDIO = 1 << 10;
        /// Reject or skip names that are not valid Unicode.
        const UNICODE = 1 << 11;
    }
}
