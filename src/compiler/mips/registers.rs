use std::fmt::*;

/// The MIPS general purpose registers that generated code touches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Register {
    V0,
    A0,
    T0,
    T1,
    T2,
    T4,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    Sp,
    Fp,
    Ra,
}

impl Register {
    /// The callee saved registers in the order that they are stored in the save
    /// area, from the highest address down.  `$ra` and `$fp` bracket these.
    pub const SAVED: [Register; 8] = [
        Register::S0,
        Register::S1,
        Register::S2,
        Register::S3,
        Register::S4,
        Register::S5,
        Register::S6,
        Register::S7,
    ];
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Register::*;
        match self {
            V0 => f.write_str("$v0"),
            A0 => f.write_str("$a0"),
            T0 => f.write_str("$t0"),
            T1 => f.write_str("$t1"),
            T2 => f.write_str("$t2"),
            T4 => f.write_str("$t4"),
            S0 => f.write_str("$s0"),
            S1 => f.write_str("$s1"),
            S2 => f.write_str("$s2"),
            S3 => f.write_str("$s3"),
            S4 => f.write_str("$s4"),
            S5 => f.write_str("$s5"),
            S6 => f.write_str("$s6"),
            S7 => f.write_str("$s7"),
            Sp => f.write_str("$sp"),
            Fp => f.write_str("$fp"),
            Ra => f.write_str("$ra"),
        }
    }
}
