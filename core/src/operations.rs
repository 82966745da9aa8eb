use rand::rngs::StdRng;
use rand::Rng;

use crate::constants::{FONT_GLYPH_BYTES, MEMORY_SIZE, STACK_DEPTH};
use crate::error::VmError;
use crate::opcode::Opcode;
use crate::state::State;

/// Everything an operation can observe besides the `State` itself: the
/// keypad's resolved key and the injected random byte source. Both are
/// capabilities handed in per cycle so execution stays reproducible.
pub struct Peripherals<'a> {
    pub key: Option<u8>,
    pub rng: &'a mut StdRng,
}

/// One instruction's semantics: old state in, new state out, or a fatal
/// fault. Operations never partially commit.
pub type Operation = fn(op: Opcode, state: &State, io: &mut Peripherals) -> Result<State, VmError>;

/// 00E0: clear the framebuffer and schedule a present
pub fn clear(_op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let mut frame_buffer = state.frame_buffer;
    frame_buffer.clear();
    Ok(State {
        pc: state.pc + 0x2,
        frame_buffer,
        draw_flag: true,
        ..*state
    })
}

/// 00EE: PC = STACK.pop()
pub fn ret(_op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    if state.sp == 0 {
        return Err(VmError::StackUnderflow { pc: state.pc });
    }
    Ok(State {
        // The stored address is the call site; resume just past it
        pc: state.stack[state.sp as usize] + 0x2,
        sp: state.sp - 0x1,
        ..*state
    })
}

/// 1nnn: PC = nnn
pub fn jump(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    Ok(State {
        pc: op.nnn(),
        ..*state
    })
}

/// 2nnn: STACK.push(PC); PC = nnn
pub fn call(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let sp = state.sp + 0x1;
    if sp as usize >= STACK_DEPTH {
        return Err(VmError::StackOverflow { pc: state.pc });
    }
    let mut stack = state.stack;
    stack[sp as usize] = state.pc;
    Ok(State {
        pc: op.nnn(),
        sp,
        stack,
        ..*state
    })
}

/// 3xnn: if Vx == nn then skip
pub fn ske(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let pc = if state.v[op.x() as usize] == op.nn() {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 4xnn: if Vx != nn then skip
pub fn skne(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let pc = if state.v[op.x() as usize] != op.nn() {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 5xy0: if Vx == Vy then skip
pub fn skre(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let pc = if state.v[op.x() as usize] == state.v[op.y() as usize] {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// 6xnn: Vx = nn
pub fn load(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] = op.nn();
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 7xnn: Vx += nn, wrapping mod 256; no flag
pub fn add(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] = v[op.x() as usize].wrapping_add(op.nn());
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 8xyn: the ALU family.
///
/// Every op reads both operands up front and yields a result plus an
/// optional flag. The result goes to Vx first and the flag to VF last, so
/// VF holds the flag even when x == F.
pub fn alu(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let x = state.v[op.x() as usize];
    let y = state.v[op.y() as usize];
    let (result, flag) = match op.n() {
        0x0 => (y, None),
        0x1 => (x | y, None),
        0x2 => (x & y, None),
        0x3 => (x ^ y, None),
        0x4 => {
            let (result, carry) = x.overflowing_add(y);
            (result, Some(carry as u8))
        }
        // Borrow flags are strict: equal operands leave VF at 0
        0x5 => (x.wrapping_sub(y), Some((x > y) as u8)),
        0x6 => (x >> 1, Some(x & 0x1)),
        0x7 => (y.wrapping_sub(x), Some((y > x) as u8)),
        0xE => (x << 1, Some(x >> 7)),
        _ => {
            return Err(VmError::UnknownOpcode {
                opcode: op.word(),
                pc: state.pc,
            })
        }
    };
    let mut v = state.v;
    v[op.x() as usize] = result;
    if let Some(flag) = flag {
        v[0xF] = flag;
    }
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// 9xy0: if Vx != Vy then skip
pub fn skrne(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let pc = if state.v[op.x() as usize] != state.v[op.y() as usize] {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// Annn: I = nnn
pub fn loadi(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    Ok(State {
        pc: state.pc + 0x2,
        i: op.nnn(),
        ..*state
    })
}

/// Bnnn: PC = V0 + nnn, unmasked as the historical instruction defines it
pub fn jumpo(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    Ok(State {
        pc: u16::from(state.v[0x0]) + op.nnn(),
        ..*state
    })
}

/// Cxnn: Vx = random_byte & nn
pub fn rand(op: Opcode, state: &State, io: &mut Peripherals) -> Result<State, VmError> {
    let byte: u8 = io.rng.gen();
    let mut v = state.v;
    v[op.x() as usize] = byte & op.nn();
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Dxyn: XOR-draw the n-row sprite at I with origin (Vx, Vy); VF = collision
pub fn draw(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let start = state.i as usize;
    let end = start + op.n() as usize;
    if end > MEMORY_SIZE {
        return Err(VmError::AddressOutOfRange {
            address: state.i.wrapping_add(u16::from(op.n())),
        });
    }
    let mut v = state.v;
    let mut frame_buffer = state.frame_buffer;
    let collided = frame_buffer.draw_sprite(
        v[op.x() as usize],
        v[op.y() as usize],
        &state.memory[start..end],
    );
    v[0xF] = collided as u8;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        frame_buffer,
        draw_flag: true,
        ..*state
    })
}

/// Ex9E: if the resolved key == Vx then skip
pub fn skpr(op: Opcode, state: &State, io: &mut Peripherals) -> Result<State, VmError> {
    let pc = if io.key == Some(state.v[op.x() as usize]) {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// ExA1: if the resolved key != Vx then skip; "none" never matches
pub fn skup(op: Opcode, state: &State, io: &mut Peripherals) -> Result<State, VmError> {
    let pc = if io.key != Some(state.v[op.x() as usize]) {
        state.pc + 0x4
    } else {
        state.pc + 0x2
    };
    Ok(State { pc, ..*state })
}

/// Fx07: Vx = DT
pub fn moved(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let mut v = state.v;
    v[op.x() as usize] = state.delay_timer;
    Ok(State {
        pc: state.pc + 0x2,
        v,
        ..*state
    })
}

/// Fx0A: enter key-wait mode for Vx; the machine stalls until a key resolves
pub fn keyd(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    Ok(State {
        pc: state.pc + 0x2,
        register_needing_key: Some(op.x()),
        ..*state
    })
}

/// Fx15: DT = Vx
pub fn loadd(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    Ok(State {
        pc: state.pc + 0x2,
        delay_timer: state.v[op.x() as usize],
        ..*state
    })
}

/// Fx18: request a tone from the audio collaborator
pub fn beep(_op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    Ok(State {
        pc: state.pc + 0x2,
        beep_flag: true,
        ..*state
    })
}

/// Fx1E: I += Vx
pub fn addi(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    Ok(State {
        pc: state.pc + 0x2,
        i: state.i.wrapping_add(u16::from(state.v[op.x() as usize])),
        ..*state
    })
}

/// Fx29: I = address of the font glyph for Vx
pub fn ldspr(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    Ok(State {
        pc: state.pc + 0x2,
        i: u16::from(state.v[op.x() as usize]) * FONT_GLYPH_BYTES,
        ..*state
    })
}

/// Fx33: mem[I..I+3] = the decimal digits of Vx
pub fn bcd(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let start = state.i as usize;
    if start + 3 > MEMORY_SIZE {
        return Err(VmError::AddressOutOfRange {
            address: state.i.wrapping_add(3),
        });
    }
    let value = state.v[op.x() as usize];
    let mut memory = state.memory;
    memory[start] = value / 100;
    memory[start + 1] = value / 10 % 10;
    memory[start + 2] = value % 10;
    Ok(State {
        pc: state.pc + 0x2,
        memory,
        ..*state
    })
}

/// Fx55: mem[I..=I+x] = V0..=Vx; then I += x + 1
pub fn stor(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let count = op.x() as usize + 1;
    let start = state.i as usize;
    if start + count > MEMORY_SIZE {
        return Err(VmError::AddressOutOfRange { address: state.i });
    }
    let mut memory = state.memory;
    memory[start..start + count].copy_from_slice(&state.v[..count]);
    Ok(State {
        pc: state.pc + 0x2,
        i: state.i + count as u16,
        memory,
        ..*state
    })
}

/// Fx65: V0..=Vx = mem[I..=I+x]; then I += x + 1
pub fn read(op: Opcode, state: &State, _io: &mut Peripherals) -> Result<State, VmError> {
    let count = op.x() as usize + 1;
    let start = state.i as usize;
    if start + count > MEMORY_SIZE {
        return Err(VmError::AddressOutOfRange { address: state.i });
    }
    let mut v = state.v;
    v[..count].copy_from_slice(&state.memory[start..start + count]);
    Ok(State {
        pc: state.pc + 0x2,
        i: state.i + count as u16,
        v,
        ..*state
    })
}
