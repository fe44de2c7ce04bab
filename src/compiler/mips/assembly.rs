use std::fmt::*;

use super::registers::Register;

/*
Assembly DSL

Every instruction is written as its mnemonic followed by comma separated
operands and terminated with a ;  Operands are ordinary Rust expressions:
registers are `Register` values, immediates are `i32`s, branch targets are
`String`s, and memory locations are `Address`es.  A label is written as
`@{expr}:`.

```
mips!{(code) {
    @{"loop"}:
        li T0, 4;
        lw S0, Address::Offset(4, Sp);
        add S0, S0, T0;
        bnez S0, "loop".into();
        syscall;
}}
```

would translate to:
```
loop:
	li	$t0, 4
	lw	$s0, 4($sp)
	add	$s0, $s0, $t0
	bnez	$s0, loop
	syscall
```

`move` is a Rust keyword so the register copy instruction is written `mov`.
*/

/// A memory operand of a load or store.
#[derive(Clone, Debug, PartialEq)]
pub enum Address {
    /// `offset($reg)`
    Offset(i32, Register),
    /// `($reg)`
    Indirect(Register),
    /// `label`
    Label(String),
    /// `label($reg)`
    Indexed(String, Register),
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Address::*;
        match self {
            Offset(o, reg) => f.write_fmt(format_args!("{}({})", o, reg)),
            Indirect(reg) => f.write_fmt(format_args!("({})", reg)),
            Label(lbl) => f.write_str(lbl),
            Indexed(lbl, reg) => f.write_fmt(format_args!("{}({})", lbl, reg)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    Section(String),
    Global(String),
    /// A zero initialized block of the given number of words.
    Word(String, u32),
    Label(String),

    Li(Register, i32),
    Move(Register, Register),
    Lw(Register, Address),
    Sw(Register, Address),

    Add(Register, Register, Register),
    AddI(Register, Register, i32),
    Sub(Register, Register, Register),
    SubI(Register, Register, i32),
    Mul(Register, Register, Register),
    Div(Register, Register, Register),
    Rem(Register, Register, Register),

    Slt(Register, Register, Register),
    Sle(Register, Register, Register),
    Seq(Register, Register, Register),

    J(String),
    Jal(String),
    Jr(Register),
    Beqz(Register, String),
    Bnez(Register, String),
    Syscall,
}

impl Inst {
    /// The change in `$sp`, in bytes, caused by this instruction.  Only
    /// immediate adjustments of the stack pointer are counted.
    pub fn stack_effect(&self) -> i32 {
        match self {
            Inst::AddI(Register::Sp, Register::Sp, n) => *n,
            Inst::SubI(Register::Sp, Register::Sp, n) => -*n,
            _ => 0,
        }
    }
}

impl Display for Inst {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Inst::*;
        // Separate procedures with a blank line
        match self {
            Label(lbl) if !lbl.starts_with("label") => f.write_str("\n")?,
            _ => (),
        };

        match self {
            Section(s) => f.write_str(s),
            Global(g) => f.write_fmt(format_args!("\t.globl\t{}", g)),
            Word(lbl, 1) => f.write_fmt(format_args!("{}:\t.word 0", lbl)),
            Word(lbl, n) => f.write_fmt(format_args!("{}:\t.word\t0:{}", lbl, n)),
            Label(lbl) => f.write_fmt(format_args!("{}:", lbl)),

            Li(r, v) => f.write_fmt(format_args!("\tli\t{}, {}", r, v)),
            Move(a, b) => f.write_fmt(format_args!("\tmove\t{}, {}", a, b)),
            Lw(r, addr) => f.write_fmt(format_args!("\tlw\t{}, {}", r, addr)),
            Sw(r, addr) => f.write_fmt(format_args!("\tsw\t{}, {}", r, addr)),

            Add(d, a, b) => three(f, "add", d, a, b),
            AddI(d, a, v) => f.write_fmt(format_args!("\tadd\t{}, {}, {}", d, a, v)),
            Sub(d, a, b) => three(f, "sub", d, a, b),
            SubI(d, a, v) => f.write_fmt(format_args!("\tsub\t{}, {}, {}", d, a, v)),
            Mul(d, a, b) => three(f, "mul", d, a, b),
            Div(d, a, b) => three(f, "div", d, a, b),
            Rem(d, a, b) => three(f, "rem", d, a, b),

            Slt(d, a, b) => three(f, "slt", d, a, b),
            Sle(d, a, b) => three(f, "sle", d, a, b),
            Seq(d, a, b) => three(f, "seq", d, a, b),

            J(lbl) => f.write_fmt(format_args!("\tj\t{}", lbl)),
            Jal(lbl) => f.write_fmt(format_args!("\tjal\t{}", lbl)),
            Jr(r) => f.write_fmt(format_args!("\tjr\t{}", r)),
            Beqz(r, lbl) => f.write_fmt(format_args!("\tbeqz\t{}, {}", r, lbl)),
            Bnez(r, lbl) => f.write_fmt(format_args!("\tbnez\t{}, {}", r, lbl)),
            Syscall => f.write_str("\tsyscall"),
        }
    }
}

fn three(f: &mut Formatter<'_>, op: &str, d: &Register, a: &Register, b: &Register) -> Result {
    f.write_fmt(format_args!("\t{}\t{}, {}, {}", op, d, a, b))
}

#[macro_export]
macro_rules! mips_op {
    (syscall) => {
        $crate::compiler::mips::Inst::Syscall
    };
    (li) => {
        $crate::compiler::mips::Inst::Li
    };
    (mov) => {
        $crate::compiler::mips::Inst::Move
    };
    (lw) => {
        $crate::compiler::mips::Inst::Lw
    };
    (sw) => {
        $crate::compiler::mips::Inst::Sw
    };
    (add) => {
        $crate::compiler::mips::Inst::Add
    };
    (addi) => {
        $crate::compiler::mips::Inst::AddI
    };
    (sub) => {
        $crate::compiler::mips::Inst::Sub
    };
    (subi) => {
        $crate::compiler::mips::Inst::SubI
    };
    (mul) => {
        $crate::compiler::mips::Inst::Mul
    };
    (div) => {
        $crate::compiler::mips::Inst::Div
    };
    (rem) => {
        $crate::compiler::mips::Inst::Rem
    };
    (slt) => {
        $crate::compiler::mips::Inst::Slt
    };
    (sle) => {
        $crate::compiler::mips::Inst::Sle
    };
    (seq) => {
        $crate::compiler::mips::Inst::Seq
    };
    (j) => {
        $crate::compiler::mips::Inst::J
    };
    (jal) => {
        $crate::compiler::mips::Inst::Jal
    };
    (jr) => {
        $crate::compiler::mips::Inst::Jr
    };
    (beqz) => {
        $crate::compiler::mips::Inst::Beqz
    };
    (bnez) => {
        $crate::compiler::mips::Inst::Bnez
    };
}

#[macro_export]
macro_rules! mips {
    (($buf:expr) {}) => {
    };

    /********************/
    /*     LABELS       */
    /********************/
    (($buf:expr) {@{$label:expr}: $($tail:tt)*}) => {
        $buf.push($crate::compiler::mips::Inst::Label($label.into()));
        $crate::mips!(($buf) {$($tail)*})
    };

    /********************/
    /* UNIT OPERATORS   */
    /********************/
    (($buf:expr) {$inst:ident; $($tail:tt)*}) => {
        $buf.push($crate::mips_op!($inst));
        $crate::mips!(($buf) {$($tail)*})
    };

    /********************/
    /* OPERATORS        */
    /********************/
    (($buf:expr) {$inst:ident $($arg:expr),+; $($tail:tt)*}) => {
        $buf.push($crate::mips_op!($inst)($($arg),+));
        $crate::mips!(($buf) {$($tail)*})
    };
}
