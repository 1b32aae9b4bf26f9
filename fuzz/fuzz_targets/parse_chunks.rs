#![no_main]

use libfuzzer_sys::fuzz_target;
use csvrows::{CsvParser, ParserConfig, parse_bytes};

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (step, data) = input;
    let step = usize::from(step).max(1);

    let configs = [
        ParserConfig::default(),
        ParserConfig::default().with_delimiter(';'),
        ParserConfig::default().with_quote('\'').with_classify_numbers(false),
    ];

    for config in configs {
        // Reference: the whole input in one chunk
        let whole = parse_bytes(&data, config);

        // Verify: fixed-size chunks give the same result
        let mut parser = CsvParser::new(config).unwrap();
        let mut chunked = Ok(());
        for chunk in data.chunks(step) {
            chunked = parser.feed_chunk(chunk);
            if chunked.is_err() {
                break;
            }
        }
        let chunked = chunked.and_then(|()| parser.finalize());

        match (&whole, &chunked) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a, b);
                assert_eq!(a.count, a.rows.len());
                for row in &a.rows {
                    assert!(row.len() <= a.headers.len());
                }
            }
            (Err(a), Err(b)) => assert_eq!(format!("{a:?}"), format!("{b:?}")),
            _ => panic!("split at {step} changed the outcome: {whole:?} vs {chunked:?}"),
        }
    }
});
