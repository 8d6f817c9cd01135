use sha3::{digest::{ExtendableOutput, Update, XofReader}, Shake256};

/// Hash-chained RNG. Every draw is a pure function of the seed and the
/// sequence of contexts passed so far.
pub struct ONDRng {
    state: [u8; 32],
    step: u64,
}

impl ONDRng {
    pub fn new(seed: &[u8]) -> Self {
        let mut state = [0u8; 32];
        shake(&[seed, b"OND_INIT"], &mut state);
        Self { state, step: 0 }
    }

    /// Seed from OS entropy. Returns the seed string so the stream can be
    /// replayed with [`ONDRng::new`].
    pub fn from_entropy() -> (Self, String) {
        let seed = format!("{:016x}", rand::random::<u64>());
        (Self::new(seed.as_bytes()), seed)
    }

    /// Uniform in `[0, 1]`.
    pub fn next_f64(&mut self, ctx: &[u8]) -> f64 {
        (self.next_u64(ctx) as f64) / (u64::MAX as f64)
    }

    /// Uniform in `[0, 1)` with 53 bits of resolution.
    pub fn next_unit(&mut self, ctx: &[u8]) -> f64 {
        (self.next_u64(ctx) >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_u64(&mut self, ctx: &[u8]) -> u64 {
        self.step += 1;

        let state = self.state;
        let step_bytes = self.step.to_be_bytes();
        let mut next_state = self.state;
        shake(&[&state, &step_bytes, b"QSIM"], &mut next_state);
        self.state = next_state;

        let mut out = [0u8; 8];
        shake(&[&self.state, ctx], &mut out);

        if self.state[0] < 16 {
            let state = self.state;
            let mut next_state = self.state;
            shake(&[&state, b"SKIP"], &mut next_state);
            self.state = next_state;
        }

        u64::from_be_bytes(out)
    }
}

fn shake(parts: &[&[u8]], out: &mut [u8]) {
    let mut h = Shake256::default();
    for p in parts {
        h.update(p);
    }
    let mut r = h.finalize_xof();
    r.read(out);
}
