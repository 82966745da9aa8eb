use crate::opcode::Opcode;
use crate::operations::{self, Operation};

/// Selects the operation for an opcode, dispatching on the category nibble
/// and the sub-opcode fields. Combinations outside the 35-instruction set
/// decode to `None`; the machine turns that into a fatal decode fault.
pub fn decode(op: Opcode) -> Option<Operation> {
    let operation: Operation = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => operations::clear,
        (0x0, 0x0, 0xE, 0xE) => operations::ret,
        (0x1, ..) => operations::jump,
        (0x2, ..) => operations::call,
        (0x3, ..) => operations::ske,
        (0x4, ..) => operations::skne,
        (0x5, .., 0x0) => operations::skre,
        (0x6, ..) => operations::load,
        (0x7, ..) => operations::add,
        // The sub-opcode is validated inside the ALU dispatch
        (0x8, ..) => operations::alu,
        (0x9, .., 0x0) => operations::skrne,
        (0xA, ..) => operations::loadi,
        (0xB, ..) => operations::jumpo,
        (0xC, ..) => operations::rand,
        (0xD, ..) => operations::draw,
        (0xE, .., 0x9, 0xE) => operations::skpr,
        (0xE, .., 0xA, 0x1) => operations::skup,
        (0xF, .., 0x0, 0x7) => operations::moved,
        (0xF, .., 0x0, 0xA) => operations::keyd,
        (0xF, .., 0x1, 0x5) => operations::loadd,
        (0xF, .., 0x1, 0x8) => operations::beep,
        (0xF, .., 0x1, 0xE) => operations::addi,
        (0xF, .., 0x2, 0x9) => operations::ldspr,
        (0xF, .., 0x3, 0x3) => operations::bcd,
        (0xF, .., 0x5, 0x5) => operations::stor,
        (0xF, .., 0x6, 0x5) => operations::read,
        _ => return None,
    };
    Some(operation)
}
