use crate::compiler::semantics::SAVE_AREA;
use crate::mips;

use super::assembly::{Address, Inst};
use super::registers::Register::{self, *};

/**
Collects the instruction stream for a program and provides the small set of
instruction sequences that the code generator builds everything else from:
pushing and popping the runtime stack, saving and restoring the callee saved
registers, and the console syscalls.

Generated labels come from a single counter so every label handed out by an
`Emitter` is distinct.
*/
pub struct Emitter {
    code: Vec<Inst>,
    label_count: u32,
}

impl Emitter {
    pub fn new() -> Emitter {
        Emitter {
            code: vec![],
            label_count: 0,
        }
    }

    pub fn push(&mut self, inst: Inst) {
        self.code.push(inst);
    }

    /// Returns a fresh label of the form `labelN`.
    pub fn new_label(&mut self) -> String {
        let label = format!("label{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// The entry label of the procedure `name`.
    pub fn proc_label(name: &str) -> String {
        format!("proc_{}", name)
    }

    /// The data label of the global variable `name`.  The suffix keeps user
    /// identifiers such as `j` or `b` from colliding with mnemonics.
    pub fn global_label(name: &str) -> String {
        format!("{}_", name)
    }

    pub fn instructions(&self) -> &[Inst] {
        &self.code
    }

    /// Pushes the value in `reg` onto the runtime stack.
    pub fn push_reg(&mut self, reg: Register) {
        mips! {(self) {
            subi Sp, Sp, 4;
            sw reg, Address::Offset(4, Sp);
        }};
    }

    /// Pops the top of the runtime stack into `reg`.
    pub fn pop_reg(&mut self, reg: Register) {
        mips! {(self) {
            lw reg, Address::Offset(4, Sp);
            addi Sp, Sp, 4;
        }};
    }

    /// Stores `$ra`, `$s0`-`$s7`, and `$fp` in a fresh save area.
    pub fn save_registers(&mut self) {
        mips! {(self) {
            subi Sp, Sp, SAVE_AREA;
            sw Ra, Address::Offset(SAVE_AREA, Sp);
        }};
        for (i, reg) in Register::SAVED.iter().enumerate() {
            let offset = SAVE_AREA - 4 * (i as i32 + 1);
            mips! {(self) {
                sw *reg, Address::Offset(offset, Sp);
            }};
        }
        mips! {(self) {
            sw Fp, Address::Offset(4, Sp);
        }};
    }

    /// Reloads the registers stored by [`Emitter::save_registers`] and
    /// releases the save area.
    pub fn restore_registers(&mut self) {
        mips! {(self) {
            lw Fp, Address::Offset(4, Sp);
        }};
        for (i, reg) in Register::SAVED.iter().enumerate().rev() {
            let offset = SAVE_AREA - 4 * (i as i32 + 1);
            mips! {(self) {
                lw *reg, Address::Offset(offset, Sp);
            }};
        }
        mips! {(self) {
            lw Ra, Address::Offset(SAVE_AREA, Sp);
            addi Sp, Sp, SAVE_AREA;
        }};
    }

    /// Prints the integer in `$a0` followed by a newline.
    pub fn print_int(&mut self) {
        mips! {(self) {
            li V0, 1;
            syscall;
            li V0, 11;
            li A0, 10;
            syscall;
        }};
    }

    /// Reads an integer from the console into `$v0`.
    pub fn read_int(&mut self) {
        mips! {(self) {
            li V0, 5;
            syscall;
        }};
    }

    pub fn print(&self, output: &mut dyn std::io::Write) -> std::io::Result<()> {
        for inst in &self.code {
            writeln!(output, "{}", inst)?;
        }
        Ok(())
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Emitter::new()
    }
}
