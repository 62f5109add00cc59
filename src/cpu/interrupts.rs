#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone)]
pub(crate) enum Interrupt {
    IRQ_BRK,
    RESET,
}

impl Interrupt {
    /// Address of the low byte of the little endian vector
    pub(super) fn offset(&self) -> u16 {
        match self {
            Interrupt::IRQ_BRK => 0xFFFE,
            Interrupt::RESET => 0xFFFC,
        }
    }
}
