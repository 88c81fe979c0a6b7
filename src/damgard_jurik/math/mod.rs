// Réexporte toutes les fonctions mathématiques

mod math;

pub use math::{crt_combine, gcd, l_function, lcm, mod_inverse, mod_pow, n_adic_digits};
