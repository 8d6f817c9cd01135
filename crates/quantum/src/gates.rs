use num_complex::Complex64;

pub type C64 = Complex64;

pub fn hadamard() -> [[C64; 2]; 2] {
    let s = 1.0 / 2.0_f64.sqrt();
    [
        [C64::new(s, 0.0), C64::new(s, 0.0)],
        [C64::new(s, 0.0), C64::new(-s, 0.0)],
    ]
}

/// diag(1, -i)
pub fn sdg() -> [[C64; 2]; 2] {
    let z = C64::new(0.0, 0.0);
    [[C64::new(1.0, 0.0), z], [z, C64::new(0.0, -1.0)]]
}

pub fn ry(theta: f64) -> [[C64; 2]; 2] {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [
        [C64::new(c, 0.0), C64::new(-s, 0.0)],
        [C64::new(s, 0.0), C64::new(c, 0.0)],
    ]
}

pub fn rz(theta: f64) -> [[C64; 2]; 2] {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    let z = C64::new(0.0, 0.0);
    [[C64::new(c, -s), z], [z, C64::new(c, s)]]
}

/// Control on the lower site: |00>→|00>, |01>→|01>, |10>→|11>, |11>→|10>
pub fn cnot() -> [[C64; 4]; 4] {
    let z = C64::new(0.0, 0.0);
    let o = C64::new(1.0, 0.0);
    [
        [o, z, z, z],
        [z, o, z, z],
        [z, z, z, o],
        [z, z, o, z],
    ]
}

/// Control on the upper site: |01>→|11>, |11>→|01>
pub fn cnot_reversed() -> [[C64; 4]; 4] {
    let z = C64::new(0.0, 0.0);
    let o = C64::new(1.0, 0.0);
    [
        [o, z, z, z],
        [z, z, z, o],
        [z, z, o, z],
        [z, o, z, z],
    ]
}
