use std::convert::TryFrom;

use indexmap::IndexMap;
use serde::Serialize;

use super::SemanticError;

/// Bytes reserved at the bottom of every frame for `$ra`, `$s0`-`$s7`, and `$fp`.
pub const SAVE_AREA: i32 = 40;

/// Bytes in one machine word.
pub const WORD_SIZE: i32 = 4;

/// The most bytes of arguments and locals a frame can hold.  The save area
/// sits below them and every offset from `$fp` must fit in an `i32`.
pub const MAX_FRAME_SIZE: i32 = i32::MAX - SAVE_AREA;

/// Storage assigned to one argument or local variable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Slot {
    /// Before [`FrameDescriptor::finish`] this is the raw byte position in
    /// declaration order.  Afterwards it is the offset from `$fp`.
    pub offset: i32,
    /// Size of the slot in bytes.
    pub size: i32,
}

/**
Accumulates the stack layout of a single procedure.

Arguments and locals are appended in the order that they are declared, each
one beginning where the previous one ended.  Once the whole procedure has been
analyzed, `finish` rewrites every raw position into an offset from the frame
pointer, which sits directly above the register save area.  Arguments are pushed
by the caller left to right so the first argument lives at the highest address.
*/
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameDescriptor {
    slots: IndexMap<String, Slot>,
    args: Vec<String>,
    last_location: i32,
    last_size: i32,
    finished: bool,
}

impl FrameDescriptor {
    pub fn new() -> FrameDescriptor {
        FrameDescriptor {
            slots: IndexMap::new(),
            args: vec![],
            last_location: 0,
            last_size: 0,
            finished: false,
        }
    }

    /// Reserves `words` words of storage for `name`.
    ///
    /// If `name` already has a slot that is too small, the slot grows and every
    /// slot placed after it shifts up by the growth.  Fails, leaving the frame
    /// unchanged, if the frame would grow past [`MAX_FRAME_SIZE`].
    pub fn insert(&mut self, name: &str, words: u32) -> Result<(), SemanticError> {
        let too_large = || SemanticError::FrameTooLarge(name.into());
        let size = i32::try_from(words)
            .ok()
            .and_then(|w| w.checked_mul(WORD_SIZE))
            .ok_or_else(too_large)?;

        match self.slots.get(name).copied() {
            None => {
                let offset = self.size();
                match offset.checked_add(size) {
                    Some(end) if end <= MAX_FRAME_SIZE => (),
                    _ => return Err(too_large()),
                }
                self.slots.insert(name.into(), Slot { offset, size });
                self.last_location = offset;
                self.last_size = size;
            }
            Some(slot) if slot.size < size => {
                let diff = size - slot.size;
                match self.size().checked_add(diff) {
                    Some(end) if end <= MAX_FRAME_SIZE => (),
                    _ => return Err(too_large()),
                }

                if slot.offset == self.last_location {
                    self.last_size = size;
                }

                let mut new_last = self.last_location;
                for s in self.slots.values_mut() {
                    if s.offset > slot.offset {
                        if s.offset == self.last_location {
                            new_last = s.offset + diff;
                        }
                        s.offset += diff;
                    }
                }
                self.last_location = new_last;

                if let Some(s) = self.slots.get_mut(name) {
                    s.size = size;
                }
            }
            Some(_) => (),
        }
        Ok(())
    }

    /// Reserves one word for the argument `name` and records it as the next
    /// parameter of the procedure.
    pub fn insert_arg(&mut self, name: &str) -> Result<(), SemanticError> {
        self.insert(name, 1)?;
        self.args.push(name.into());
        Ok(())
    }

    /// Rewrites every slot so that its offset is relative to the frame pointer.
    /// Calling this more than once has no further effect.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }

        let top = SAVE_AREA + self.size();
        for slot in self.slots.values_mut() {
            slot.offset = -(slot.offset - top + (slot.size - WORD_SIZE));
        }
        self.finished = true;
    }

    /// Returns the offset of `name` from the frame pointer.  For an array this is
    /// the offset of its first element.
    pub fn lookup(&self, name: &str) -> Option<i32> {
        self.slots.get(name).map(|s| s.offset)
    }

    pub fn get(&self, name: &str) -> Option<&Slot> {
        self.slots.get(name)
    }

    /// Total bytes occupied by arguments and locals.
    pub fn size(&self) -> i32 {
        self.last_location + self.last_size
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn slots(&self) -> impl Iterator<Item = (&String, &Slot)> {
        self.slots.iter()
    }
}

impl Default for FrameDescriptor {
    fn default() -> Self {
        FrameDescriptor::new()
    }
}

impl std::fmt::Display for FrameDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("size: {}\n", self.size()))?;
        for (name, slot) in &self.slots {
            f.write_fmt(format_args!("{}: {} [{}]\n", name, slot.offset, slot.size))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_positions_follow_declaration_order() {
        let mut frame = FrameDescriptor::new();
        frame.insert("x", 1).unwrap();
        frame.insert("a", 10).unwrap();
        frame.insert("y", 1).unwrap();

        assert_eq!(frame.lookup("x"), Some(0));
        assert_eq!(frame.lookup("a"), Some(4));
        assert_eq!(frame.lookup("y"), Some(44));
        assert_eq!(frame.size(), 48);
        assert_eq!(frame.lookup("z"), None);
    }

    #[test]
    fn test_finish_single_words() {
        let mut frame = FrameDescriptor::new();
        frame.insert_arg("a").unwrap();
        frame.insert_arg("b").unwrap();
        frame.insert("x", 1).unwrap();
        frame.finish();

        // size 12, top of frame is 52
        assert_eq!(frame.lookup("a"), Some(52));
        assert_eq!(frame.lookup("b"), Some(48));
        assert_eq!(frame.lookup("x"), Some(44));
        assert_eq!(frame.args(), &["a".to_string(), "b".to_string()]);
        assert_eq!(frame.arg_count(), 2);
        assert!(frame.is_finished());
    }

    #[test]
    fn test_finish_array() {
        let mut frame = FrameDescriptor::new();
        frame.insert("x", 1).unwrap();
        frame.insert("a", 10).unwrap();
        frame.finish();

        // size 44, top of frame is 84
        assert_eq!(frame.lookup("x"), Some(84));
        assert_eq!(frame.lookup("a"), Some(44));

        // the array spans [44, 84) and never overlaps x at [84, 88)
        let a = frame.get("a").unwrap();
        assert_eq!(a.size, 40);
        assert_eq!(a.offset % WORD_SIZE, 0);
        assert!(a.offset + a.size <= frame.lookup("x").unwrap());
        // first element sits just above the save area
        assert_eq!(a.offset, SAVE_AREA + WORD_SIZE);
    }

    #[test]
    fn test_finish_is_deterministic() {
        let build = || {
            let mut frame = FrameDescriptor::new();
            frame.insert_arg("n").unwrap();
            frame.insert("i", 1).unwrap();
            frame.insert("buf", 3).unwrap();
            frame.insert("j", 1).unwrap();
            frame.finish();
            frame
        };

        let a = build();
        let b = build();
        assert_eq!(a, b);
        assert_eq!(a.lookup("n"), Some(64));
        assert_eq!(a.lookup("i"), Some(60));
        assert_eq!(a.lookup("buf"), Some(48));
        assert_eq!(a.lookup("j"), Some(44));
    }

    #[test]
    fn test_finish_twice() {
        let mut frame = FrameDescriptor::new();
        frame.insert("x", 1).unwrap();
        frame.finish();
        frame.finish();
        assert_eq!(frame.lookup("x"), Some(44));
    }

    #[test]
    fn test_empty_frame() {
        let mut frame = FrameDescriptor::new();
        frame.finish();
        assert_eq!(frame.size(), 0);
        assert_eq!(frame.arg_count(), 0);
    }

    #[test]
    fn test_widen_existing_slot() {
        let mut frame = FrameDescriptor::new();
        frame.insert("x", 1).unwrap();
        frame.insert("a", 1).unwrap();
        frame.insert("y", 1).unwrap();

        frame.insert("a", 4).unwrap();
        assert_eq!(frame.lookup("x"), Some(0));
        assert_eq!(frame.lookup("a"), Some(4));
        assert_eq!(frame.get("a").unwrap().size, 16);
        assert_eq!(frame.lookup("y"), Some(20));
        assert_eq!(frame.size(), 24);

        // a smaller request leaves the slot alone
        frame.insert("a", 2).unwrap();
        assert_eq!(frame.get("a").unwrap().size, 16);
        assert_eq!(frame.size(), 24);
    }

    #[test]
    fn test_widen_last_slot() {
        let mut frame = FrameDescriptor::new();
        frame.insert("x", 1).unwrap();
        frame.insert("a", 1).unwrap();
        frame.insert("a", 3).unwrap();
        assert_eq!(frame.lookup("a"), Some(4));
        assert_eq!(frame.size(), 16);
    }

    #[test]
    fn test_frame_too_large() {
        let mut frame = FrameDescriptor::new();
        frame.insert("x", 1).unwrap();

        assert_eq!(
            frame.insert("a", 600_000_000),
            Err(SemanticError::FrameTooLarge("a".into()))
        );
        assert_eq!(
            frame.insert("b", u32::MAX),
            Err(SemanticError::FrameTooLarge("b".into()))
        );
        // a failed insert leaves the frame as it was
        assert_eq!(frame.lookup("a"), None);
        assert_eq!(frame.size(), 4);

        // each array fits alone but not together
        let words = (MAX_FRAME_SIZE / WORD_SIZE / 2) as u32 + 1;
        frame.insert("c", words).unwrap();
        assert_eq!(
            frame.insert("d", words),
            Err(SemanticError::FrameTooLarge("d".into()))
        );

        // widening is bounded the same way
        assert_eq!(
            frame.insert("x", words + 1),
            Err(SemanticError::FrameTooLarge("x".into()))
        );
        assert_eq!(frame.get("x").unwrap().size, WORD_SIZE);
    }
}
