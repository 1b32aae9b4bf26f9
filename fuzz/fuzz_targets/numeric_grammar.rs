#![no_main]

use libfuzzer_sys::fuzz_target;
use csvrows::{Value, is_numeric};

fuzz_target!(|s: &str| {
    if is_numeric(s) {
        // Verify: everything the grammar accepts parses as a float
        let n: f64 = s.parse().unwrap();
        assert!(!s.starts_with('+') && !s.contains(['e', 'E', ' ']));
        let expected = if n.is_finite() { Value::Number(n) } else { Value::from(s) };
        assert_eq!(Value::classify(s.to_string(), true), expected);
    } else {
        assert_eq!(Value::classify(s.to_string(), true), Value::from(s));
    }
});
