//! Phone number generator.

use rand::Rng;

/// A North American style number, `ddd-ddd-dddd`.
pub fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut number = String::with_capacity(12);
    for i in 0..12 {
        if i == 3 || i == 7 {
            number.push('-');
        } else {
            let digit = rng.random_range(0..10u32);
            number.push(char::from_digit(digit, 10).unwrap_or('0'));
        }
    }
    number
}
