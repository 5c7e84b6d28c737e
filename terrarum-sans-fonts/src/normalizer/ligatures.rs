//! Fixed ligature tables for Tamil and Sundanese.

pub const TAMIL_VIRAMA: u32 = 0x0BCD;
pub const TAMIL_I: u32 = 0x0BBF;
pub const TAMIL_II: u32 = 0x0BC0;
pub const TAMIL_U: u32 = 0x0BC1;
pub const TAMIL_UU: u32 = 0x0BC2;
pub const TAMIL_KSSA: u32 = 0xF_00ED;
pub const TAMIL_SHRII: u32 = 0xF_00EE;

const TAMIL_TTA: u32 = 0x0B9F;

/// Consonants with dedicated U and UU ligatures, in glyph order.
const TAMIL_LIGATING_CONSONANTS: [u32; 18] = [
    0x0B95, 0x0B99, 0x0B9A, 0x0B9E, 0x0B9F, 0x0BA3, 0x0BA4, 0x0BA8, 0x0BA9, 0x0BAA, 0x0BAE, 0x0BAF,
    0x0BB0, 0x0BB1, 0x0BB2, 0x0BB3, 0x0BB4, 0x0BB5,
];
const TAMIL_U_FORMS: u32 = 0xF_00C2;
const TAMIL_UU_FORMS: u32 = 0xF_00D4;

/// Consonants whose I sign fuses with the body.
const TAMIL_I_LIGATURES: [(u32, u32); 6] = [
    (0x0B99, 0xF_00F0),
    (0x0BAA, 0xF_00F1),
    (0x0BAF, 0xF_00F2),
    (0x0BB2, 0xF_00F3),
    (0x0BB5, 0xF_00F4),
    (0x0BB8, 0xF_00F5),
];

const SUNDANESE_PAIRS: [(u32, u32, u32); 7] = [
    (0x1BA4, 0x1B80, 0xF_0500), // ing
    (0x1BA8, 0x1B80, 0xF_0501), // eng
    (0x1BA9, 0x1B80, 0xF_0502), // eung
    (0x1BA4, 0x1B81, 0xF_0503), // ir
    (0x1BA8, 0x1B81, 0xF_0504), // er
    (0x1BA9, 0x1B81, 0xF_0505), // eur
    (0x1BA3, 0x1BA5, 0xF_0506), // lu
];

/// Longest Tamil ligature starting at `input[0]`, as `(consumed, glyph)`.
pub fn match_tamil(input: &[u32]) -> Option<(usize, u32)> {
    match input {
        [0x0BB6 | 0x0BB8, TAMIL_VIRAMA, 0x0BB0, TAMIL_II, ..] => Some((4, TAMIL_SHRII)),
        [0x0B95, TAMIL_VIRAMA, 0x0BB7, ..] => Some((3, TAMIL_KSSA)),
        [TAMIL_TTA, TAMIL_I, ..] => Some((2, 0xF_00C0)),
        [TAMIL_TTA, TAMIL_II, ..] => Some((2, 0xF_00C1)),
        [c, TAMIL_I, ..] => TAMIL_I_LIGATURES
            .iter()
            .find(|(cons, _)| cons == c)
            .map(|(_, lig)| (2, *lig)),
        [c, sign @ (TAMIL_U | TAMIL_UU), ..] => {
            let idx = TAMIL_LIGATING_CONSONANTS.iter().position(|cons| cons == c)? as u32;
            let base = if *sign == TAMIL_U { TAMIL_U_FORMS } else { TAMIL_UU_FORMS };
            Some((2, base + idx))
        }
        _ => None,
    }
}

/// Sundanese vowel sign + final combination starting at `input[0]`.
pub fn match_sundanese(input: &[u32]) -> Option<(usize, u32)> {
    let [a, b, ..] = input else {
        return None;
    };
    SUNDANESE_PAIRS
        .iter()
        .find(|(x, y, _)| x == a && y == b)
        .map(|(_, _, lig)| (2, *lig))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match_first() {
        assert_eq!(
            match_tamil(&[0x0BB8, TAMIL_VIRAMA, 0x0BB0, TAMIL_II]),
            Some((4, TAMIL_SHRII))
        );
        assert_eq!(match_tamil(&[0x0BB6, TAMIL_VIRAMA, 0x0BB0, TAMIL_II, 0x20]), Some((4, TAMIL_SHRII)));
        assert_eq!(match_tamil(&[0x0B95, TAMIL_VIRAMA, 0x0BB7]), Some((3, TAMIL_KSSA)));
        // KA + virama alone is no ligature
        assert_eq!(match_tamil(&[0x0B95, TAMIL_VIRAMA, 0x0B95]), None);
    }

    #[test]
    fn test_consonant_vowel_ligatures() {
        assert_eq!(match_tamil(&[0x0B9F, TAMIL_I]), Some((2, 0xF_00C0)));
        assert_eq!(match_tamil(&[0x0B9F, TAMIL_II]), Some((2, 0xF_00C1)));
        assert_eq!(match_tamil(&[0x0BAA, TAMIL_I]), Some((2, 0xF_00F1)));
        assert_eq!(match_tamil(&[0x0B95, TAMIL_U]), Some((2, 0xF_00C2)));
        assert_eq!(match_tamil(&[0x0BB5, TAMIL_UU]), Some((2, 0xF_00D4 + 17)));
        assert_eq!(match_tamil(&[0x0B95, TAMIL_I]), None);
        assert_eq!(match_tamil(&[0x0B95]), None);
    }

    #[test]
    fn test_sundanese_pairs() {
        assert_eq!(match_sundanese(&[0x1BA4, 0x1B80]), Some((2, 0xF_0500)));
        assert_eq!(match_sundanese(&[0x1BA3, 0x1BA5, 0x1B80]), Some((2, 0xF_0506)));
        assert_eq!(match_sundanese(&[0x1BA3, 0x1B80]), None);
        assert_eq!(match_sundanese(&[0x1BA4]), None);
    }
}
