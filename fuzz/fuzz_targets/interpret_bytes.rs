#![no_main]
use binview::interpret::{FlagGroup, FormatContext, IntFormat, Interpretation, Locale};
use binview::io::ByteSource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let ctx = FormatContext::new(Locale::EnUs);
    let source = ByteSource::from(data.to_vec());
    let interpretations = [
        Interpretation::Ascii,
        Interpretation::Asciz,
        Interpretation::Hex,
        Interpretation::MsdosDate,
        Interpretation::MsdosTime,
        Interpretation::int(IntFormat::LITTLE.with_hex()),
        Interpretation::int(IntFormat::BIG),
        Interpretation::enumeration(IntFormat::LITTLE, vec![(0, "zero".into())], "other"),
    ];
    for interpretation in &interpretations {
        let mut cursor = source.cursor().unwrap();
        interpretation.format(&mut cursor, &ctx).unwrap();
    }
    if let Some(&width) = data.first() {
        let width = u32::from(width % 64) + 1;
        if let Ok(flags) = Interpretation::flags(vec![FlagGroup::named(width, "bits")]) {
            let mut cursor = source.cursor().unwrap();
            flags.format(&mut cursor, &ctx).unwrap();
        }
    }
});
