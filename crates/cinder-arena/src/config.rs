//! Arena configuration parameters.

/// Configuration for the bump arena.
///
/// Validated at construction; immutable for the arena's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Alignment applied by `allocate_struct` and typed record storage.
    ///
    /// Default: the pointer width of the target. Must be a power of two.
    pub struct_align: usize,

    /// Whether freshly allocated regions are zero-filled.
    ///
    /// Default: `true`. After a `reset()` the buffer still holds data from
    /// the previous generation; zero-fill keeps it from leaking into new
    /// allocations.
    pub zero_fill: bool,

    /// Upper bound on arena capacity in bytes.
    ///
    /// Handles store offsets as `u32`, so the default is `u32::MAX`.
    pub max_capacity: usize,
}

impl ArenaConfig {
    /// Default struct alignment: the pointer width.
    pub const DEFAULT_STRUCT_ALIGN: usize = std::mem::size_of::<usize>();

    /// Default capacity limit, bounded by the `u32` offsets in handles.
    pub const DEFAULT_MAX_CAPACITY: usize = u32::MAX as usize;

    /// Capacity limit of the [`compact`](ArenaConfig::compact) preset.
    pub const COMPACT_MAX_CAPACITY: usize = u16::MAX as usize;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            struct_align: Self::DEFAULT_STRUCT_ALIGN,
            zero_fill: true,
            max_capacity: Self::DEFAULT_MAX_CAPACITY,
        }
    }

    /// Preset for small targets: capacity limited to a 16-bit range.
    pub fn compact() -> Self {
        Self {
            max_capacity: Self::COMPACT_MAX_CAPACITY,
            ..Self::new()
        }
    }

    /// Check the invariants documented on each field.
    pub fn validate(&self) -> Result<(), String> {
        if !self.struct_align.is_power_of_two() {
            return Err(format!(
                "struct_align must be a non-zero power of two (got {})",
                self.struct_align
            ));
        }
        if self.max_capacity > Self::DEFAULT_MAX_CAPACITY {
            return Err(format!(
                "max_capacity {} exceeds the u32 handle range",
                self.max_capacity
            ));
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
