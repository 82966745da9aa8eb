use thiserror::Error;

/// Fatal interpreter faults.
///
/// Every variant indicates a malformed program image or an interpreter bug;
/// none are retried. An instruction either fully commits its effects or the
/// run halts with the diagnostic context below.
#[derive(Debug, Error)]
pub enum VmError {
    /// The category/sub-opcode combination is not part of the instruction
    /// set. Distinct from a runtime fault: the image is corrupt or targets
    /// an unsupported dialect.
    #[error("unknown opcode {opcode:#06X} at {pc:#06X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("program counter {pc:#06X} left the program range")]
    PcOutOfRange { pc: u16 },

    #[error("memory access out of bounds at {address:#06X}")]
    AddressOutOfRange { address: u16 },

    #[error("stack overflow on call at {pc:#06X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow on return at {pc:#06X}")]
    StackUnderflow { pc: u16 },

    #[error("rom is {size} bytes but at most {max_size} fit")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("failed to read rom")]
    Io(#[from] std::io::Error),
}
