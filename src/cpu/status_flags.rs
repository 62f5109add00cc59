bitflags! {
  /// Processor status register (P)
  ///
  /// All eight bits are declared so that any byte pulled from the stack
  /// round trips exactly. Bit 5 is unused on the 2A03 and reads as set.
  #[derive(Default)]
  pub struct StatusFlags: u8 {
    const CARRY_FLAG             = 0b0000_0001;
    const ZERO_FLAG              = 0b0000_0010;
    const INTERRUPT_DISABLE_FLAG = 0b0000_0100;
    const DECIMAL_FLAG           = 0b0000_1000;
    const BREAK_FLAG             = 0b0001_0000;
    const UNUSED_FLAG            = 0b0010_0000;
    const OVERFLOW_FLAG          = 0b0100_0000;
    const NEGATIVE_FLAG          = 0b1000_0000;
  }
}

impl StatusFlags {
    /// The register contents at power on, only the unused bit is set
    pub fn power_on() -> Self {
        StatusFlags::UNUSED_FLAG
    }

    pub fn from_byte(value: u8) -> Self {
        StatusFlags::from_bits_truncate(value)
    }

    /// The copy of the register written to the stack by PHP & BRK
    pub(crate) fn pushed_copy(self) -> u8 {
        (self | StatusFlags::BREAK_FLAG).bits()
    }

    /// Zero & negative are derived from the same result byte by most instructions
    pub(crate) fn set_zero_negative(&mut self, value: u8) {
        self.set(StatusFlags::ZERO_FLAG, value == 0);
        self.set(StatusFlags::NEGATIVE_FLAG, value & 0b1000_0000 != 0);
    }
}
