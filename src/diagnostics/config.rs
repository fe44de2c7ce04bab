use std::str::FromStr;

/// Selects which source lines a tracing stage prints diagnostics for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TracingConfig {
    All,
    Between(usize, usize),
    Before(usize),
    After(usize),
    Only(usize),
    Off,
}

impl TracingConfig {
    /// Returns true if a trace event on line `ln` should be printed.
    pub fn includes(&self, ln: usize) -> bool {
        match *self {
            TracingConfig::Only(only) => ln == only,
            TracingConfig::Before(end) => ln <= end,
            TracingConfig::After(start) => ln >= start,
            TracingConfig::Between(start, end) => ln >= start && ln <= end,
            TracingConfig::All => true,
            TracingConfig::Off => false,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        TracingConfig::Off
    }
}

/**
Parses the text given to a `--trace-*` argument:

* `all` or `off`
* `N` only line N
* `N:M` lines N through M
* `..N` every line up to and including N
* `N..` every line from N on
 */
impl FromStr for TracingConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_ln = |t: &str| {
            t.trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid line number in trace config: {}", s))
        };

        match s.trim() {
            "all" => Ok(TracingConfig::All),
            "off" => Ok(TracingConfig::Off),
            t if t.starts_with("..") => Ok(TracingConfig::Before(parse_ln(&t[2..])?)),
            t if t.ends_with("..") => Ok(TracingConfig::After(parse_ln(&t[..t.len() - 2])?)),
            t => match t.find(':') {
                Some(idx) => {
                    let start = parse_ln(&t[..idx])?;
                    let end = parse_ln(&t[idx + 1..])?;
                    if start > end {
                        Err(format!("Trace range start is after its end: {}", s))
                    } else {
                        Ok(TracingConfig::Between(start, end))
                    }
                }
                None => Ok(TracingConfig::Only(parse_ln(t)?)),
            },
        }
    }
}

pub trait Tracing {
    fn set_tracing(&mut self, config: TracingConfig);
}
