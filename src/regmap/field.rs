/// A contiguous bit field inside one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegField {
    pub reg: u16,
    pub lsb: u8,
    pub msb: u8,
}

impl RegField {
    /// Describes bits `lsb..=msb` of `reg`.
    ///
    /// # Panics
    /// Panics if `lsb > msb` or `msb > 31`. In a `const` this is a compile error.
    pub const fn new(reg: u16, lsb: u8, msb: u8) -> Self {
        assert!(lsb <= msb, "field lsb must not exceed msb");
        assert!(msb < 32, "field must fit in a 32-bit register");
        Self { reg, lsb, msb }
    }

    /// Number of bits in the field.
    #[inline]
    pub const fn width(&self) -> u32 {
        (self.msb - self.lsb) as u32 + 1
    }

    /// Mask of the field in register position.
    #[inline]
    pub const fn mask(&self) -> u32 {
        (u32::MAX >> (32 - self.width())) << self.lsb
    }

    /// Extracts the field from a full register value.
    #[inline]
    pub const fn extract(&self, reg_val: u32) -> u32 {
        (reg_val & self.mask()) >> self.lsb
    }

    /// Places `val` in register position. Bits beyond the field width are dropped.
    #[inline]
    pub const fn place(&self, val: u32) -> u32 {
        (val << self.lsb) & self.mask()
    }
}

/// Declares register address constants and their bit fields.
///
/// Each register becomes a `u16` constant, and each field a [`RegField`]
/// constant named `<REGISTER>_<FIELD>`.
///
/// ```
/// use embedded_regmap::reg_fields;
///
/// reg_fields! {
///     VGA_CTRL @ 0x8004 {
///         CLK_INV: 0..=0,
///         BPP: 4..=7,
///     }
///     IRQ_STATUS @ 0x8000 {}
/// }
///
/// assert_eq!(VGA_CTRL, 0x8004);
/// assert_eq!(IRQ_STATUS, 0x8000);
/// assert_eq!(VGA_CTRL_BPP.mask(), 0xF0);
/// assert_eq!(VGA_CTRL_CLK_INV.reg, VGA_CTRL);
/// ```
#[macro_export]
macro_rules! reg_fields {
    ($(
        $reg:ident @ $addr:literal {
            $($field:ident : $lsb:literal ..= $msb:literal),* $(,)?
        }
    )*) => {
        $(
            pub const $reg: u16 = $addr;
            $crate::__paste::paste! {
                $(
                    pub const [<$reg _ $field>]: $crate::regmap::RegField =
                        $crate::regmap::RegField::new($addr, $lsb, $msb);
                )*
            }
        )*
    };
}
