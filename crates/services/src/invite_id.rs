use rand::Rng;

/// Characters used for invite ids. `I`, `O`, `0` and `1` are left out so
/// ids survive being read aloud or copied by hand.
pub const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub fn generate_invite_id(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
