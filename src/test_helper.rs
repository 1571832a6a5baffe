use rand::{SeedableRng, XorShiftRng};
use crate::pick::Pick;

// A random source replaying a fixed script of indices (modulo the number
// of remaining items), cycling when it runs out.
pub struct Scripted {
    script: Vec<usize>,
    pos: usize,
}

impl Scripted {
    pub fn new(script: &[usize]) -> Self {
        assert!(!script.is_empty());
        Scripted {
            script: script.to_vec(),
            pos: 0,
        }
    }
}

impl Pick for Scripted {
    fn pick(&mut self, remaining: usize) -> usize {
        let i = self.script[self.pos % self.script.len()];
        self.pos += 1;
        i % remaining
    }
}

pub fn seeded(seed: u32) -> XorShiftRng {
    // XorShift refuses an all-zero seed
    XorShiftRng::from_seed([seed, 0x193a_6754, 0xa8a7_d469, 0x9783_0e05])
}
