use proptest::prelude::*;

use alb_types::{Address, Timestamp};

proptest! {
    /// Any 20 bytes print and parse back to the same address.
    #[test]
    fn address_text_form_is_canonical(bytes in prop::array::uniform20(0u8..)) {
        let address = Address::new(bytes);
        let text = address.to_string();
        prop_assert!(text.starts_with("0x"));
        prop_assert_eq!(text.len(), 42);
        prop_assert_eq!(text.parse::<Address>().unwrap(), address);
    }

    /// Strings of the wrong length never parse.
    #[test]
    fn short_hex_is_rejected(len in 0usize..40) {
        let s = "a".repeat(len);
        prop_assert!(s.parse::<Address>().is_err());
    }

    /// Timestamp ordering mirrors the underlying seconds.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(tb.has_reached(ta), b >= a);
    }

    /// A deadline `delay` seconds out is reached exactly when `offset >= delay`.
    #[test]
    fn deadline_reached_after_delay(
        start in 0u64..1_000_000,
        delay in 0u64..1_000_000,
        offset in 0u64..2_000_000,
    ) {
        let deadline = Timestamp::new(start).saturating_add(delay);
        let now = Timestamp::new(start + offset);
        prop_assert_eq!(now.has_reached(deadline), offset >= delay);
        prop_assert_eq!(now.secs_until(deadline), delay.saturating_sub(offset));
    }
}
