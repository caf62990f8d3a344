use primitives::{bytes_to_hex, hex_to_array, hex_to_bytes};
use proptest::prelude::*;

proptest! {
    #[test]
    fn hex_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..200)) {
        let s = bytes_to_hex(&bytes);
        prop_assert_eq!(s.len(), bytes.len() * 2);
        prop_assert!(s.bytes().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c)));
        prop_assert_eq!(hex_to_bytes(&s).unwrap(), bytes.clone());
        prop_assert_eq!(hex_to_bytes(&s.to_ascii_uppercase()).unwrap(), bytes);
    }

    #[test]
    fn fixed_width_round_trip(id in prop::array::uniform32(any::<u8>())) {
        prop_assert_eq!(hex_to_array::<32>(&bytes_to_hex(&id)).unwrap(), id);
    }

    #[test]
    fn odd_length_is_rejected(bytes in prop::collection::vec(any::<u8>(), 0..50)) {
        let mut s = bytes_to_hex(&bytes);
        s.push('0');
        prop_assert!(hex_to_bytes(&s).is_err());
    }
}
