pub mod adapter;
pub mod builder;
pub mod cache;
pub mod classify;
#[cfg(feature = "debug-regs")]
pub mod debug;
pub mod defaults;
pub mod error;
pub mod field;
pub mod helpers;
pub mod map;
pub mod shared;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use adapter::{ControlAdapter, ControlConfig, Endian};
pub use builder::RegmapBuilder;
pub use cache::{CacheStore, NoCache, SlotCache};
pub use classify::{FnClassifier, NoClassification, RegClass, RegClassifier, RegRange, TableClassifier};
#[cfg(feature = "debug-regs")]
pub use debug::RegDebug;
pub use defaults::{DefaultTable, RegDefault};
pub use error::{RegmapError, TransportFault};
pub use field::RegField;
pub use map::{MapLayout, Regmap};
pub use shared::SharedRegmap;
pub use transport::{ControlRequest, ControlTransport, Direction};

pub mod prelude {
    pub use super::{
        CacheStore, ControlConfig, ControlRequest, ControlTransport, DefaultTable, Direction,
        Endian, FnClassifier, MapLayout, NoCache, NoClassification, RegClass, RegClassifier,
        RegDefault, RegField, RegRange, Regmap, RegmapBuilder, RegmapError, SharedRegmap,
        SlotCache, TableClassifier, TransportFault,
    };

    #[cfg(feature = "debug-regs")]
    pub use super::RegDebug;
}
