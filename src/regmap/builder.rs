use bitmaps::{Bits, BitsImpl};

use crate::regmap::{
    RegmapError,
    adapter::{ControlAdapter, ControlConfig},
    cache::{CacheStore, NoCache, SlotCache},
    classify::{NoClassification, RegClassifier},
    defaults::{DefaultTable, RegDefault},
    map::{MapLayout, Regmap},
    transport::ControlTransport,
};

/// Builder for [`Regmap`].
///
/// Starts with every register classified normal, caching disabled, no
/// defaults, a register stride of 4 and the full 16-bit address range.
///
/// ```
/// # use core::time::Duration;
/// # use embedded_regmap::regmap::{ControlRequest, ControlTransport, TransportFault};
/// # struct Loopback([u8; 4]);
/// # impl ControlTransport for Loopback {
/// #     fn read_control(&mut self, _: ControlRequest, buf: &mut [u8], _: Duration) -> Result<usize, TransportFault> {
/// #         buf.copy_from_slice(&self.0);
/// #         Ok(4)
/// #     }
/// #     fn write_control(&mut self, _: ControlRequest, buf: &[u8], _: Duration) -> Result<usize, TransportFault> {
/// #         self.0.copy_from_slice(buf);
/// #         Ok(4)
/// #     }
/// # }
/// use embedded_regmap::regmap::{RegDefault, RegRange, RegmapBuilder, TableClassifier};
///
/// static VOLATILE: [RegRange; 1] = [RegRange::new(0x8000, 0x800C)];
/// static DEFAULTS: [RegDefault; 1] = [RegDefault::new(0x0040, 0x0000_0001)];
///
/// let mut map = RegmapBuilder::new(Loopback([0; 4]))
///     .classifier(TableClassifier::new(&[], &VOLATILE))
///     .slot_cache::<32>()
///     .defaults(&DEFAULTS)
///     .build()
///     .unwrap();
///
/// assert_eq!(map.read(0x0040).unwrap(), 1);
/// map.write(0x8004, 0xDEAD_BEEF).unwrap();
/// ```
pub struct RegmapBuilder<T, C, RC> {
    transport: T,
    classifier: C,
    cache: RC,
    defaults: DefaultTable,
    control: ControlConfig,
    layout: MapLayout,
}

impl<T: ControlTransport> RegmapBuilder<T, NoClassification, NoCache> {
    /// Starts a builder over `transport`. Nothing is exchanged until used.
    pub fn new(transport: T) -> Self {
        RegmapBuilder {
            transport,
            classifier: NoClassification::default(),
            cache: NoCache,
            defaults: DefaultTable::EMPTY,
            control: ControlConfig::default(),
            layout: MapLayout::default(),
        }
    }
}

impl<T, C, RC> RegmapBuilder<T, C, RC> {
    /// Set the precious/volatile classifier.
    pub fn classifier<C2: RegClassifier>(self, classifier: C2) -> RegmapBuilder<T, C2, RC> {
        RegmapBuilder {
            transport: self.transport,
            classifier,
            cache: self.cache,
            defaults: self.defaults,
            control: self.control,
            layout: self.layout,
        }
    }

    /// Set a custom cache store.
    pub fn cache<RC2: CacheStore>(self, cache: RC2) -> RegmapBuilder<T, C, RC2> {
        RegmapBuilder {
            transport: self.transport,
            classifier: self.classifier,
            cache,
            defaults: self.defaults,
            control: self.control,
            layout: self.layout,
        }
    }

    /// Cache up to `N` registers.
    pub fn slot_cache<const N: usize>(self) -> RegmapBuilder<T, C, SlotCache<N>>
    where
        BitsImpl<N>: Bits,
    {
        self.cache(SlotCache::new())
    }

    /// Send every access to the transport.
    pub fn no_cache(self) -> RegmapBuilder<T, C, NoCache> {
        self.cache(NoCache)
    }

    /// Reset values seeded into the cache at build time.
    pub fn defaults(mut self, defaults: &'static [RegDefault]) -> Self {
        self.defaults = DefaultTable::new(defaults);
        self
    }

    /// Request codes, timeouts and payload byte order.
    pub fn control_config(mut self, control: ControlConfig) -> Self {
        self.control = control;
        self
    }

    /// Set the register stride.
    ///
    /// # Panics
    /// Panics if `stride` is 0.
    pub fn reg_stride(mut self, stride: u16) -> Self {
        assert!(stride > 0, "register stride must be non-zero");
        self.layout.reg_stride = stride;
        self
    }

    /// Set the highest valid register address.
    pub fn max_register(mut self, max_register: u16) -> Self {
        self.layout.max_register = max_register;
        self
    }
}

impl<T, C, RC> RegmapBuilder<T, C, RC>
where
    T: ControlTransport,
    C: RegClassifier,
    RC: CacheStore,
{
    /// Builds the map and seeds the cache from the defaults. No I/O is performed.
    ///
    /// # Errors
    /// * [`RegmapError::InvalidAddress`] - if a default names an invalid register
    /// * [`RegmapError::Alloc`] - if the defaults do not fit in the cache
    pub fn build(self) -> Result<Regmap<T, C, RC>, RegmapError> {
        let regmap = Regmap::new(
            ControlAdapter::new(self.transport, self.control),
            self.classifier,
            self.cache,
            self.defaults,
            self.layout,
        )?;
        log::info!("configured register map ({} defaults)", self.defaults.len());
        Ok(regmap)
    }
}
