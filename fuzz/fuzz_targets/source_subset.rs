#![no_main]
use binview::io::ByteSource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let (ranges, body) = data.split_at(4);
    let cut = usize::from(ranges[0]).min(body.len());
    let (head, tail) = body.split_at(cut);
    let source = ByteSource::aggregate(vec![
        ByteSource::from(head.to_vec()),
        ByteSource::from(tail.to_vec()),
    ]);
    let start = u64::from(ranges[1]);
    let len = u64::from(ranges[2]);
    if let Ok(sub) = source.subset(start, len) {
        let bytes = sub.to_vec().unwrap();
        assert_eq!(bytes.as_slice(), &body[start as usize..(start + len) as usize]);
        let _ = sub.subset(u64::from(ranges[3]), 1);
    }
});
