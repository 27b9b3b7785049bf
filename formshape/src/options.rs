/// Options for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Skip keys that do not name a field instead of reporting them (default: false)
    pub ignore_unknown_keys: bool,

    /// Largest list a path index may grow a sequence of records to (default: 16000)
    pub max_list_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            ignore_unknown_keys: false,
            max_list_len: Self::DEFAULT_MAX_LIST_LEN,
        }
    }
}

impl DecodeOptions {
    /// Default for [`DecodeOptions::max_list_len`].
    pub const DEFAULT_MAX_LIST_LEN: usize = 16_000;

    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Silently skip keys that do not map to any field.
    pub const fn ignore_unknown_keys(mut self, ignore: bool) -> Self {
        self.ignore_unknown_keys = ignore;
        self
    }

    /// Bound the growth of sequences of records: `items.N.field` fails once
    /// `N + 1` exceeds `len`.
    pub const fn max_list_len(mut self, len: usize) -> Self {
        self.max_list_len = len;
        self
    }
}
