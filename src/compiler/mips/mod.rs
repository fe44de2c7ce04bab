/*!
 # MIPS
 ## About
 This module models the subset of the MIPS32 assembly language that the
 code generator emits, as accepted by the SPIM simulator.

 `assembly` holds the instruction type and the `mips!` macro, a small DSL
 for writing sequences of instructions inline.  `emitter` owns the output
 buffer, hands out unique labels, and provides the stack and syscall
 sequences that every procedure uses.

 ## Example
 ```ignore
 mips!{(emitter) {
     lw T0, Address::Offset(4, Sp);
     add S0, T0, T1;
 }}
 ```
 */
pub mod assembly;
pub mod emitter;
pub mod registers;

pub use assembly::{Address, Inst};
pub use emitter::Emitter;
pub use registers::Register;
