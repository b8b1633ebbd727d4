use crate::regmap::{
    RegmapError,
    adapter::{ControlAdapter, ControlConfig},
    cache::CacheStore,
    classify::{RegClass, RegClassifier},
    defaults::DefaultTable,
    field::RegField,
    helpers::{check_reg, merge_bits},
    transport::ControlTransport,
};

/// Address layout of a register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapLayout {
    /// Distance between consecutive registers.
    pub reg_stride: u16,
    /// Highest valid register address.
    pub max_register: u16,
}

impl Default for MapLayout {
    fn default() -> Self {
        Self {
            reg_stride: 4,
            max_register: 0xFFFF,
        }
    }
}

/// Cached register map over a control transport.
///
/// Every access is classified first. Only normal registers are ever served
/// from the cache or given a cache slot; precious and volatile registers
/// always cost one exchange.
/// Writes always reach the transport and update the cache only on success,
/// so a failed call leaves the cache exactly as it was.
///
/// The map owns its transport session and performs at most one exchange at a
/// time. It has no internal locking; wrap it in a
/// [`SharedRegmap`](crate::regmap::SharedRegmap) to share it.
///
/// # Type Parameters
/// - `T`: Transport carrying the register exchanges
/// - `C`: Classifier deciding which registers may be cached
/// - `RC`: Cache store (`NoCache` or `SlotCache<N>`)
pub struct Regmap<T, C, RC> {
    adapter: ControlAdapter<T>,
    classifier: C,
    cache: RC,
    defaults: DefaultTable,
    layout: MapLayout,
}

impl<T, C, RC> core::fmt::Debug for Regmap<T, C, RC>
where
    RC: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Regmap")
            .field("adapter", &self.adapter)
            .field("cache", &self.cache)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl<T, C, RC> Regmap<T, C, RC>
where
    T: ControlTransport,
    C: RegClassifier,
    RC: CacheStore,
{
    pub(crate) fn new(
        adapter: ControlAdapter<T>,
        classifier: C,
        cache: RC,
        defaults: DefaultTable,
        layout: MapLayout,
    ) -> Result<Self, RegmapError> {
        let mut map = Self {
            adapter,
            classifier,
            cache,
            defaults,
            layout,
        };
        map.seed_defaults()?;
        Ok(map)
    }

    /// Reads a register, from cache when the register is normal and cached.
    pub fn read(&mut self, reg: u16) -> Result<u32, RegmapError> {
        self.check(reg)?;

        if self.classifier.classify(reg).is_cacheable() {
            if let Some(val) = self.cache.get(reg) {
                log::trace!("cache hit {:#06x} - {:#010x}", reg, val);
                return Ok(val);
            }
        }

        let val = self.adapter.read(reg)?;
        self.remember(reg, val, true);
        Ok(val)
    }

    /// Writes a register. The write always reaches the transport.
    pub fn write(&mut self, reg: u16, val: u32) -> Result<(), RegmapError> {
        self.check(reg)?;
        self.adapter.write(reg, val)?;
        self.remember(reg, val, true);
        Ok(())
    }

    /// Read-modify-write of the bits selected by `mask`.
    ///
    /// The write is skipped when the merged value equals the current one.
    /// Returns true if a write was issued.
    pub fn update_bits(&mut self, reg: u16, mask: u32, val: u32) -> Result<bool, RegmapError> {
        let orig = self.read(reg)?;
        let new = merge_bits(orig, mask, val);
        if new == orig {
            return Ok(false);
        }
        self.write(reg, new)?;
        Ok(true)
    }

    /// Like [`Self::update_bits`] but always issues the write.
    pub fn force_update_bits(&mut self, reg: u16, mask: u32, val: u32) -> Result<(), RegmapError> {
        let orig = self.read(reg)?;
        self.write(reg, merge_bits(orig, mask, val))
    }

    /// Sets every bit of `bits` in `reg`. Returns true if a write was issued.
    pub fn set_bits(&mut self, reg: u16, bits: u32) -> Result<bool, RegmapError> {
        self.update_bits(reg, bits, bits)
    }

    /// Clears every bit of `bits` in `reg`. Returns true if a write was issued.
    pub fn clear_bits(&mut self, reg: u16, bits: u32) -> Result<bool, RegmapError> {
        self.update_bits(reg, bits, 0)
    }

    /// Reads a bit field, shifted down to bit 0.
    pub fn read_field(&mut self, field: RegField) -> Result<u32, RegmapError> {
        Ok(field.extract(self.read(field.reg)?))
    }

    /// Writes a bit field, leaving the rest of the register untouched.
    ///
    /// Returns true if a write was issued.
    pub fn write_field(&mut self, field: RegField, val: u32) -> Result<bool, RegmapError> {
        self.update_bits(field.reg, field.mask(), field.place(val))
    }

    /// Reads `reg` straight from the transport.
    ///
    /// Accepts any address, never consults or updates the cache.
    pub fn raw_read(&mut self, reg: u16) -> Result<u32, RegmapError> {
        self.adapter.read(reg)
    }

    /// Writes `reg` straight to the transport.
    ///
    /// Accepts any address. On success the cached copy of `reg` is updated so
    /// later cached reads see the poked value. Addresses outside the layout
    /// never take a cache slot.
    pub fn raw_write(&mut self, reg: u16, val: u32) -> Result<(), RegmapError> {
        self.adapter.write(reg, val)?;
        let in_layout = self.check(reg).is_ok();
        self.remember(reg, val, in_layout);
        Ok(())
    }

    /// Classification of `reg`, as consulted on every access.
    pub fn classify(&self, reg: u16) -> RegClass {
        self.classifier.classify(reg)
    }

    /// Returns what the cache holds for `reg`, whatever its classification.
    pub fn cached(&self, reg: u16) -> Option<u32> {
        self.cache.get(reg)
    }

    /// Returns the reset value of `reg` from the default table.
    pub fn default_value(&self, reg: u16) -> Option<u32> {
        self.defaults.lookup(reg)
    }

    /// Drops the cached value of `reg`; the next read goes to the transport.
    pub fn invalidate(&mut self, reg: u16) {
        self.cache.invalidate(reg);
    }

    /// Drops every cached value. Slots stay owned by their registers.
    pub fn invalidate_all(&mut self) {
        self.cache.invalidate_all();
    }

    /// Forgets every cached value and re-seeds the defaults.
    ///
    /// Performs no I/O. Use after the device was reset; restoring any other
    /// state is up to the caller.
    pub fn reset_cache(&mut self) -> Result<(), RegmapError> {
        self.cache.clear();
        self.seed_defaults()
    }

    /// Stride and highest address accepted by the checked accessors.
    pub fn layout(&self) -> &MapLayout {
        &self.layout
    }

    /// Request codes, timeouts and byte order of the adapter.
    pub fn control_config(&self) -> &ControlConfig {
        self.adapter.config()
    }

    /// The cache store, for inspection.
    pub fn cache(&self) -> &RC {
        &self.cache
    }

    /// Shared access to the transport session.
    pub fn transport(&self) -> &T {
        self.adapter.transport()
    }

    /// Exclusive access to the transport session.
    ///
    /// Exchanges made through it bypass the cache; invalidate what they touch.
    pub fn transport_mut(&mut self) -> &mut T {
        self.adapter.transport_mut()
    }

    /// Tears the map down, discarding the cache.
    pub fn into_transport(self) -> T {
        self.adapter.into_transport()
    }

    fn check(&self, reg: u16) -> Result<(), RegmapError> {
        check_reg(reg, self.layout.reg_stride, self.layout.max_register)
    }

    fn seed_defaults(&mut self) -> Result<(), RegmapError> {
        let defaults = self.defaults;
        for d in defaults.iter() {
            self.check(d.reg)?;
            if self.classifier.classify(d.reg).is_cacheable() {
                self.cache.put(d.reg, d.def)?;
            }
        }
        Ok(())
    }

    /// Records a value that just crossed the transport.
    ///
    /// Only normal registers inside the layout may claim a new slot; anything
    /// else is updated only if it already owns one.
    fn remember(&mut self, reg: u16, val: u32, in_layout: bool) {
        if !in_layout || !self.classifier.classify(reg).is_cacheable() {
            self.cache.refresh(reg, val);
        } else if self.cache.put(reg, val).is_err() {
            log::debug!("cache full, {:#06x} not cached", reg);
        }
    }
}
