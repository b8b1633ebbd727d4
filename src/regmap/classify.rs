/// Classification of a single register address.
///
/// The two attributes are independent; a register may be both.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegClass {
    /// Reading has side effects; the value must always come from hardware.
    pub precious: bool,
    /// Hardware may change the value on its own; a cached copy is never current.
    pub volatile: bool,
}

impl RegClass {
    /// Neither precious nor volatile.
    pub const NORMAL: Self = Self {
        precious: false,
        volatile: false,
    };

    /// Returns true if a cached value may be served for reads.
    #[inline]
    pub const fn is_cacheable(&self) -> bool {
        !self.precious && !self.volatile
    }
}

/// Decides which registers may be served from cache.
///
/// Both predicates must be pure and total: addresses the implementation knows
/// nothing about classify as normal.
pub trait RegClassifier {
    /// Returns true if reading `reg` has side effects.
    fn is_precious(&self, _reg: u16) -> bool {
        false
    }

    /// Returns true if `reg` may change without a software write.
    fn is_volatile(&self, _reg: u16) -> bool {
        false
    }

    /// Evaluates both predicates for `reg`.
    #[inline]
    fn classify(&self, reg: u16) -> RegClass {
        RegClass {
            precious: self.is_precious(reg),
            volatile: self.is_volatile(reg),
        }
    }
}

impl<C: RegClassifier + ?Sized> RegClassifier for &C {
    fn is_precious(&self, reg: u16) -> bool {
        (**self).is_precious(reg)
    }

    fn is_volatile(&self, reg: u16) -> bool {
        (**self).is_volatile(reg)
    }
}

/// Default classifier: every register is normal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClassification {}

impl RegClassifier for NoClassification {}

/// Inclusive range of register addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegRange {
    pub start: u16,
    pub end: u16,
}

impl RegRange {
    pub const fn new(start: u16, end: u16) -> Self {
        assert!(start <= end, "register range start must not exceed end");
        Self { start, end }
    }

    pub const fn single(reg: u16) -> Self {
        Self {
            start: reg,
            end: reg,
        }
    }

    #[inline]
    pub const fn contains(&self, reg: u16) -> bool {
        self.start <= reg && reg <= self.end
    }
}

/// Classifier backed by static tables of register ranges.
#[derive(Debug, Clone, Copy)]
pub struct TableClassifier<'a> {
    precious: &'a [RegRange],
    volatile: &'a [RegRange],
}

impl<'a> TableClassifier<'a> {
    pub const fn new(precious: &'a [RegRange], volatile: &'a [RegRange]) -> Self {
        Self { precious, volatile }
    }
}

impl RegClassifier for TableClassifier<'_> {
    fn is_precious(&self, reg: u16) -> bool {
        self.precious.iter().any(|r| r.contains(reg))
    }

    fn is_volatile(&self, reg: u16) -> bool {
        self.volatile.iter().any(|r| r.contains(reg))
    }
}

/// Classifier backed by two predicate functions.
///
/// ```
/// use embedded_regmap::regmap::{FnClassifier, RegClassifier};
///
/// fn precious(reg: u16) -> bool { reg == 0x8048 }
/// fn volatile(reg: u16) -> bool { reg & 0xFF00 == 0x8000 }
///
/// let c = FnClassifier::new(precious, volatile);
/// assert!(c.is_precious(0x8048));
/// assert!(c.is_volatile(0x8004));
/// assert!(c.classify(0x0040).is_cacheable());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnClassifier<P, V> {
    precious: P,
    volatile: V,
}

impl<P, V> FnClassifier<P, V>
where
    P: Fn(u16) -> bool,
    V: Fn(u16) -> bool,
{
    pub const fn new(precious: P, volatile: V) -> Self {
        Self { precious, volatile }
    }
}

impl<P, V> RegClassifier for FnClassifier<P, V>
where
    P: Fn(u16) -> bool,
    V: Fn(u16) -> bool,
{
    fn is_precious(&self, reg: u16) -> bool {
        (self.precious)(reg)
    }

    fn is_volatile(&self, reg: u16) -> bool {
        (self.volatile)(reg)
    }
}
